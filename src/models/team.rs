//! Team model for storage.

use serde::{Deserialize, Serialize};

/// A team of users, stored in Firestore.
///
/// Membership is a set of user ids. The creator is referenced but need not
/// be a member.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    /// Server-generated UUID (also used as document ID)
    pub id: String,
    /// Unique team name
    pub name: String,
    /// Free-text description
    pub description: String,
    /// User id of the creator
    pub created_by: String,
    /// User ids of members
    pub members: Vec<String>,
    /// When the team was created (RFC3339)
    pub created_at: String,
}

impl Team {
    pub fn is_member(&self, user_id: &str) -> bool {
        self.members.iter().any(|m| m == user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_member() {
        let team = Team {
            id: "t1".to_string(),
            name: "Track Stars".to_string(),
            description: String::new(),
            created_by: "u1".to_string(),
            members: vec!["u2".to_string(), "u3".to_string()],
            created_at: "2024-01-01T00:00:00Z".to_string(),
        };

        assert!(team.is_member("u2"));
        assert!(!team.is_member("u1")); // Creator is not automatically a member
    }
}
