use serde::{Deserialize, Serialize};

/// Identity carried by the bearer token. Tokens are minted by whatever
/// signs in the user; this service only verifies them.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    pub sub: String, // caller id, stored as the todo owner
    pub exp: usize,  // expiry (unix)
    pub iat: usize,  // issued at
}

impl Claims {
    pub fn subject(&self) -> &str {
        &self.sub
    }
}
