//! User references attached to authored content

use crate::types::Validator;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(Uuid);

impl UserId {
    /// Creates a new random UserId
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a UserId from a UUID string
    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }

    /// Returns the UserId as a string
    pub fn as_string(&self) -> String {
        self.0.to_string()
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lightweight reference to the author of a story
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    pub id: UserId,
    pub display_name: String,
    #[serde(default)]
    pub avatar: Option<String>,
}

impl UserRef {
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            id: UserId::new(),
            display_name: display_name.into(),
            avatar: None,
        }
    }

    pub fn with_avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = Some(avatar.into());
        self
    }
}

impl Validator for UserRef {
    fn validate(&self) -> Result<(), Vec<String>> {
        if self.display_name.trim().is_empty() {
            Err(vec!["Display name cannot be empty".to_string()])
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_roundtrip_string() {
        let id = UserId::new();
        let parsed = UserId::from_string(&id.as_string()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_user_id_invalid_string() {
        assert!(UserId::from_string("not-a-uuid").is_err());
    }

    #[test]
    fn test_user_ref_builder() {
        let user = UserRef::new("Amara").with_avatar("avatars/amara.png");
        assert_eq!(user.display_name, "Amara");
        assert_eq!(user.avatar.as_deref(), Some("avatars/amara.png"));
        assert!(user.is_valid());
    }

    #[test]
    fn test_blank_display_name_invalid() {
        let user = UserRef::new("   ");
        assert!(!user.is_valid());
    }
}
