//! Listing filter built from the `q` query parameter

use super::Participant;

/// Maximum number of records returned by an unfiltered listing
pub const LISTING_CAP: usize = 200;

/// How participants are selected for a listing.
///
/// Results are always ordered by surname, then name, ascending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingFilter {
    /// Everything, capped at [`LISTING_CAP`]
    All,
    /// Substring search
    Search {
        /// Trimmed query, matched against name or surname
        query: String,
        /// First whitespace-separated token, matched against the name
        first: String,
        /// Remaining tokens joined by single spaces, matched against the
        /// surname. `None` for single-word queries.
        rest: Option<String>,
    },
}

impl ListingFilter {
    /// Build a filter from an optional query string.
    ///
    /// # Example
    /// ```
    /// use registro_server::models::ListingFilter;
    ///
    /// assert_eq!(ListingFilter::from_query(Some("   ")), ListingFilter::All);
    /// match ListingFilter::from_query(Some("Ada  King Lovelace")) {
    ///     ListingFilter::Search { first, rest, .. } => {
    ///         assert_eq!(first, "Ada");
    ///         assert_eq!(rest.as_deref(), Some("King Lovelace"));
    ///     }
    ///     _ => unreachable!(),
    /// }
    /// ```
    pub fn from_query(q: Option<&str>) -> Self {
        let query = q.map(str::trim).unwrap_or_default();
        let mut tokens = query.split_whitespace();

        let Some(first) = tokens.next() else {
            return Self::All;
        };

        let rest = tokens.collect::<Vec<_>>().join(" ");

        Self::Search {
            query: query.to_owned(),
            first: first.to_owned(),
            rest: (!rest.is_empty()).then_some(rest),
        }
    }

    /// Row limit to apply, if any.
    pub fn limit(&self) -> Option<usize> {
        match self {
            Self::All => Some(LISTING_CAP),
            Self::Search { .. } => None,
        }
    }

    /// Whether a record is selected by this filter (case-sensitive).
    pub fn matches(&self, p: &Participant) -> bool {
        match self {
            Self::All => true,
            Self::Search { query, first, rest } => {
                p.name.contains(query.as_str())
                    || p.surnames.contains(query.as_str())
                    || rest.as_deref().is_some_and(|rest| {
                        p.name.contains(first.as_str()) && p.surnames.contains(rest)
                    })
            }
        }
    }
}

/// Listing order: surname, then name.
pub fn listing_order(a: &Participant, b: &Participant) -> std::cmp::Ordering {
    a.surnames
        .cmp(&b.surnames)
        .then_with(|| a.name.cmp(&b.name))
}
