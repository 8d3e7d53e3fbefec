/// Account types
use serde::{Deserialize, Serialize};

/// Sign-up details
#[derive(Clone, Serialize)]
pub struct Registration {
    /// Lowercase email address
    pub email: String,

    /// Password, at least 8 characters
    pub password: String,

    /// Display name
    pub name: String,
}

impl Registration {
    /// Create sign-up details
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            name: name.into(),
        }
    }
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("email", &self.email)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Signed-in account
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Display name, when the server knows one
    pub name: Option<String>,

    /// Whether the account has admin rights
    pub is_admin: bool,
}
