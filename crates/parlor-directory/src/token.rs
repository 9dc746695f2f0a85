use jsonwebtoken::{EncodingKey, Header, encode};
use serde::{Deserialize, Serialize};

use crate::DirectoryError;

/// Claims of a server-side directory token. Server tokens carry no expiry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerClaims {
    pub server: bool,
}

/// Sign the HS256 server token the directory expects in `Authorization`.
pub fn server_token(api_secret: &str) -> Result<String, DirectoryError> {
    let token = encode(
        &Header::default(),
        &ServerClaims { server: true },
        &EncodingKey::from_secret(api_secret.as_bytes()),
    )?;

    Ok(token)
}
