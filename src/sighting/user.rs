// Backend user accounts

use super::de;
use serde::Deserialize;

/// A user account as listed by `GET /api/users`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct User {
    pub user_id: u64,

    #[serde(default, deserialize_with = "de::text")]
    pub username: Option<String>,

    #[serde(default, deserialize_with = "de::text")]
    pub friendly_name: Option<String>,

    #[serde(default, deserialize_with = "de::text")]
    pub email: Option<String>,

    #[serde(default, deserialize_with = "de::flag")]
    pub is_admin: Option<bool>,

    #[serde(default, deserialize_with = "de::flag")]
    pub is_active: Option<bool>,
}

impl User {
    pub fn new(user_id: u64) -> Self {
        Self {
            user_id,
            username: None,
            friendly_name: None,
            email: None,
            is_admin: None,
            is_active: None,
        }
    }

    /// Friendly name, else username, else `User {id}`
    pub fn display_name(&self) -> String {
        self.friendly_name
            .as_deref()
            .or(self.username.as_deref())
            .map(str::to_string)
            .unwrap_or_else(|| format!("User {}", self.user_id))
    }

    /// Secondary line for the user list
    ///
    /// Username (when it differs from the display name), email, an admin
    /// marker and an inactive marker, joined with " · ".
    pub fn meta_line(&self) -> String {
        let name = self.display_name();
        let mut parts = Vec::new();
        if let Some(username) = self.username.as_deref() {
            if username != name {
                parts.push(username.to_string());
            }
        }
        if let Some(email) = self.email.as_deref() {
            parts.push(email.to_string());
        }
        if self.is_admin == Some(true) {
            parts.push("Admin".to_string());
        }
        if self.is_active == Some(false) {
            parts.push("inactive".to_string());
        }
        parts.join(" · ")
    }

    /// Case-insensitive substring match on friendly name or username
    ///
    /// `filter` is expected to be trimmed and lowercased already; an empty
    /// filter matches every user.
    pub fn matches(&self, filter: &str) -> bool {
        if filter.is_empty() {
            return true;
        }
        [&self.friendly_name, &self.username]
            .into_iter()
            .filter_map(|field| field.as_deref())
            .any(|field| field.to_lowercase().contains(filter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(friendly: Option<&str>, username: Option<&str>) -> User {
        User {
            friendly_name: friendly.map(str::to_string),
            username: username.map(str::to_string),
            ..User::new(42)
        }
    }

    #[test]
    fn test_display_name_fallbacks() {
        assert_eq!(named(Some("Anna"), Some("anna77")).display_name(), "Anna");
        assert_eq!(named(None, Some("anna77")).display_name(), "anna77");
        assert_eq!(named(None, None).display_name(), "User 42");
    }

    #[test]
    fn test_meta_line() {
        let mut user = named(Some("Anna"), Some("anna77"));
        user.email = Some("anna@example.org".to_string());
        user.is_admin = Some(true);
        user.is_active = Some(false);
        assert_eq!(user.meta_line(), "anna77 · anna@example.org · Admin · inactive");

        // Username equal to display name is not repeated
        let user = named(None, Some("anna77"));
        assert_eq!(user.meta_line(), "");
    }

    #[test]
    fn test_matches_filter() {
        let user = named(Some("Anna Schmidt"), Some("anna77"));
        assert!(user.matches(""));
        assert!(user.matches("schmidt"));
        assert!(user.matches("a77"));
        assert!(!user.matches("bob"));
    }

    #[test]
    fn test_deserialize_backend_user() {
        let json = r#"{"user_id": 7, "username": "bob", "friendly_name": "",
                       "email": null, "is_admin": 0, "is_active": 1}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.user_id, 7);
        assert_eq!(user.friendly_name, None);
        assert_eq!(user.display_name(), "bob");
        assert_eq!(user.is_admin, Some(false));
        assert_eq!(user.is_active, Some(true));
    }
}
