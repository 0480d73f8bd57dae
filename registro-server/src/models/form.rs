//! Raw registration submission, before validation

use serde_json::{Map, Value as JsonValue};

use super::ConsentInput;
use crate::storage::AvatarUpload;

/// Wire names of the registration fields.
pub mod fields {
    pub const NAME: &str = "nombre";
    pub const SURNAMES: &str = "apellidos";
    pub const EMAIL: &str = "email";
    pub const SOCIAL_HANDLE: &str = "twitter";
    pub const OCCUPATION: &str = "ocupacion";
    pub const AVATAR: &str = "avatar";
    pub const CONSENT: &str = "aceptoTerminos";
}

/// Registration submission exactly as received, multipart or JSON.
///
/// Nothing here has been checked yet; see
/// [`ParticipantFields::validate`](super::ParticipantFields::validate).
#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub name: Option<String>,
    pub surnames: Option<String>,
    pub email: Option<String>,
    pub social_handle: Option<String>,
    pub occupation: Option<String>,
    /// External avatar URL, used only when no file is attached
    pub avatar_url: Option<String>,
    pub avatar_file: Option<AvatarUpload>,
    pub consent: Option<ConsentInput>,
}

impl RegistrationForm {
    /// Record a text field by its wire name. Unknown fields are ignored.
    pub fn set_text(&mut self, field: &str, value: String) {
        match field {
            fields::NAME => self.name = Some(value),
            fields::SURNAMES => self.surnames = Some(value),
            fields::EMAIL => self.email = Some(value),
            fields::SOCIAL_HANDLE => self.social_handle = Some(value),
            fields::OCCUPATION => self.occupation = Some(value),
            fields::AVATAR => self.avatar_url = Some(value),
            fields::CONSENT => self.consent = Some(ConsentInput::Text(value)),
            _ => {}
        }
    }

    /// Build a form from a JSON object body.
    ///
    /// Only string values are taken for text fields; the consent field may
    /// also be a JSON boolean. Values of any other type count as absent.
    pub fn from_json_object(object: Map<String, JsonValue>) -> Self {
        let mut form = Self::default();
        for (key, value) in object {
            match value {
                JsonValue::String(s) => form.set_text(&key, s),
                JsonValue::Bool(b) if key == fields::CONSENT => {
                    form.consent = Some(ConsentInput::Bool(b));
                }
                _ => {}
            }
        }
        form
    }

    /// External avatar URL, if one was supplied and is not blank.
    pub fn external_avatar(&self) -> Option<&str> {
        self.avatar_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: JsonValue) -> Map<String, JsonValue> {
        match value {
            JsonValue::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn maps_wire_names() {
        let form = RegistrationForm::from_json_object(object(json!({
            "nombre": "Ada",
            "apellidos": "Lovelace",
            "email": "ada@example.com",
            "twitter": "@ada",
            "ocupacion": "Mathematician",
            "avatar": "https://example.com/ada.png",
            "aceptoTerminos": true,
            "unknown": "ignored"
        })));

        assert_eq!(form.name.as_deref(), Some("Ada"));
        assert_eq!(form.surnames.as_deref(), Some("Lovelace"));
        assert_eq!(form.social_handle.as_deref(), Some("@ada"));
        assert_eq!(form.occupation.as_deref(), Some("Mathematician"));
        assert_eq!(form.external_avatar(), Some("https://example.com/ada.png"));
        assert_eq!(form.consent, Some(ConsentInput::Bool(true)));
    }

    #[test]
    fn non_string_values_are_absent() {
        let form = RegistrationForm::from_json_object(object(json!({
            "nombre": 42,
            "email": null,
            "avatar": ["x"]
        })));

        assert!(form.name.is_none());
        assert!(form.email.is_none());
        assert!(form.avatar_url.is_none());
    }

    #[test]
    fn blank_avatar_url_is_ignored() {
        let mut form = RegistrationForm::default();
        form.set_text("avatar", "   ".into());
        assert_eq!(form.external_avatar(), None);

        form.set_text("avatar", "  /static/a.png ".into());
        assert_eq!(form.external_avatar(), Some("/static/a.png"));
    }

    #[test]
    fn consent_text_is_kept_raw() {
        let mut form = RegistrationForm::default();
        form.set_text("aceptoTerminos", "on".into());
        assert_eq!(form.consent, Some(ConsentInput::Text("on".into())));
    }
}
