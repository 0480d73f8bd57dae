//! Terms-of-participation consent

/// Textual values accepted as "yes", compared case-insensitively.
///
/// HTML checkboxes submit `on`; the rest cover JSON clients and the Spanish
/// form labels. Anything outside this set is a refusal.
pub const TRUTHY_TOKENS: [&str; 5] = ["on", "true", "1", "sí", "si"];

/// Raw consent value as submitted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsentInput {
    Bool(bool),
    Text(String),
}

/// Outcome of parsing the consent field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Consent {
    Given,
    Withheld,
}

impl Consent {
    /// Parse a consent value. A missing value is a refusal.
    ///
    /// # Example
    /// ```
    /// use registro_server::models::{Consent, ConsentInput};
    ///
    /// assert!(Consent::parse(Some(&ConsentInput::Text("Sí".into()))).is_given());
    /// assert!(!Consent::parse(Some(&ConsentInput::Text("yes".into()))).is_given());
    /// assert!(!Consent::parse(None).is_given());
    /// ```
    pub fn parse(input: Option<&ConsentInput>) -> Self {
        let given = match input {
            Some(ConsentInput::Bool(b)) => *b,
            Some(ConsentInput::Text(s)) => {
                let token = s.trim().to_lowercase();
                TRUTHY_TOKENS.contains(&token.as_str())
            }
            None => false,
        };

        if given {
            Self::Given
        } else {
            Self::Withheld
        }
    }

    pub fn is_given(self) -> bool {
        self == Self::Given
    }

    /// Proof of acceptance, required to build a
    /// [`NewParticipant`](super::NewParticipant).
    pub fn accepted(self) -> Option<TermsAccepted> {
        self.is_given().then_some(TermsAccepted(()))
    }
}

/// Only obtainable through [`Consent::accepted`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TermsAccepted(());
