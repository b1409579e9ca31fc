use serde::{Serialize, Deserialize};

/// Profile edit form. `password` is the current password and must match.
#[derive(Debug, Serialize, Deserialize)]
pub struct EditProfileCredentials {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub new_password: Option<String>,
}
