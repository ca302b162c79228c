use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A person mentioned on a page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Person {
    /// First and last name
    pub full_name: Option<String>,

    /// Role or title at their company
    pub job_title: Option<String>,

    /// Ways to reach the person
    #[serde(default)]
    pub contact: Contact,
}

/// Contact channels for a [`Person`]. Any of them may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Contact {
    /// Email address
    pub email: Option<String>,

    /// Phone number, including country code when known
    pub phone: Option<String>,

    /// LinkedIn profile URL
    pub linkedin_url: Option<String>,

    /// X (Twitter) profile URL
    pub x_url: Option<String>,

    /// Instagram profile URL
    pub instagram_url: Option<String>,

    /// Facebook profile URL
    pub facebook_url: Option<String>,
}

impl Contact {
    pub fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.phone.is_none()
            && self.linkedin_url.is_none()
            && self.x_url.is_none()
            && self.instagram_url.is_none()
            && self.facebook_url.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_person_missing_fields_default() {
        let person: Person = serde_json::from_value(json!({"full_name": "Ada Lovelace"})).unwrap();

        assert_eq!(person.full_name.as_deref(), Some("Ada Lovelace"));
        assert!(person.job_title.is_none());
        assert!(person.contact.is_empty());
    }

    #[test]
    fn test_null_contact_fields() {
        let person: Person = serde_json::from_value(json!({
            "full_name": null,
            "job_title": "CTO",
            "contact": {"email": "cto@example.com", "phone": null}
        }))
        .unwrap();

        assert_eq!(person.contact.email.as_deref(), Some("cto@example.com"));
        assert!(person.contact.phone.is_none());
        assert!(!person.contact.is_empty());
    }
}
