use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Body of `POST /token`: an identity payload whose `email` becomes the verified identity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TokenRequest {
    pub email: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TokenRequest {
    pub fn new(email: impl Into<String>) -> Self {
        Self { email: email.into(), extra: Map::new() }
    }
}

/// Signed claim set. Caller-supplied extras are embedded verbatim next to the registered claims.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    pub email: String,
    pub iat: i64,
    pub exp: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Response of `POST /token`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssuedToken {
    pub token: String,
}
