//! User model for storage.

use serde::{Deserialize, Serialize};

/// User profile stored in Firestore.
///
/// The document id is the server-generated `id`. The password is stored only
/// as a bcrypt hash; API response types never include it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Server-generated UUID (also used as document ID)
    pub id: String,
    /// Unique login name
    pub username: String,
    /// Unique email address
    pub email: String,
    /// Bcrypt hash of the password
    pub password_hash: String,
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// When the user joined (RFC3339)
    pub date_joined: String,
    /// Whether the account is active
    pub is_active: bool,
}
