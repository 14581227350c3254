//! Authentication credentials for the Bitnut API
//!
//! Implements the HMAC-SHA256 body signature required by signed endpoints.
//!
//! # Security
//!
//! The secret key is stored using the `secrecy` crate which:
//! - Zeroizes memory on drop
//! - Prevents accidental logging via Debug impl
//! - Provides explicit access via `expose_secret()`

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;

use crate::error::{AuthError, AuthResult};

type HmacSha256 = Hmac<Sha256>;

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "BITNUT_API_KEY";

/// Environment variable holding the secret key
pub const SECRET_KEY_ENV: &str = "BITNUT_SECRET_KEY";

/// API credentials for authenticated requests
///
/// The secret key is zeroized when the Credentials are dropped.
pub struct Credentials {
    /// API key (sent verbatim in the access-key header)
    api_key: String,
    /// Secret key (HMAC key, zeroized on drop)
    secret_key: SecretString,
}

impl Credentials {
    /// Create new credentials from an API key and secret key
    ///
    /// The secret is used as raw HMAC key bytes; it is not base64-decoded.
    ///
    /// # Errors
    /// Returns [`AuthError::InvalidCredentials`] if either value is empty.
    pub fn new(api_key: impl Into<String>, secret_key: impl Into<String>) -> AuthResult<Self> {
        let api_key = api_key.into();
        let secret_key = secret_key.into();

        if api_key.trim().is_empty() {
            return Err(AuthError::InvalidCredentials("API key is empty".to_string()));
        }
        if secret_key.is_empty() {
            return Err(AuthError::InvalidCredentials("Secret key is empty".to_string()));
        }

        Ok(Self {
            api_key,
            secret_key: SecretString::from(secret_key),
        })
    }

    /// Create credentials from environment variables
    ///
    /// Reads `BITNUT_API_KEY` and `BITNUT_SECRET_KEY` from the environment.
    pub fn from_env() -> AuthResult<Self> {
        let api_key = std::env::var(API_KEY_ENV)
            .map_err(|_| AuthError::EnvVarNotSet(API_KEY_ENV.to_string()))?;
        let secret_key = std::env::var(SECRET_KEY_ENV)
            .map_err(|_| AuthError::EnvVarNotSet(SECRET_KEY_ENV.to_string()))?;

        Self::new(api_key, secret_key)
    }

    /// Get the API key
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Sign a request payload
    ///
    /// Bitnut signature algorithm:
    /// 1. HMAC-SHA256(secret_key, payload)
    /// 2. Base64 encode result (standard alphabet, padded)
    ///
    /// Callers pass the form-encoded body only. The query string is not part
    /// of the signed payload.
    pub fn sign(&self, payload: &str) -> AuthResult<String> {
        let mut mac = HmacSha256::new_from_slice(self.secret_key.expose_secret().as_bytes())
            .map_err(|e| AuthError::InvalidCredentials(format!("HMAC key rejected: {e}")))?;
        mac.update(payload.as_bytes());

        Ok(BASE64.encode(mac.finalize().into_bytes()))
    }
}

impl Clone for Credentials {
    fn clone(&self) -> Self {
        Self {
            api_key: self.api_key.clone(),
            secret_key: SecretString::from(self.secret_key.expose_secret().to_string()),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let visible: String = self.api_key.chars().take(8).collect();
        f.debug_struct("Credentials")
            .field("api_key", &format!("{visible}..."))
            .field("secret_key", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_values() {
        assert!(matches!(
            Credentials::new("", "secret"),
            Err(AuthError::InvalidCredentials(_))
        ));
        assert!(matches!(
            Credentials::new("key", ""),
            Err(AuthError::InvalidCredentials(_))
        ));
    }

    #[test]
    fn test_credentials_debug_redacts_secret() {
        let creds = Credentials::new("test_api_key_123", "super_secret_value").unwrap();
        let debug = format!("{:?}", creds);
        assert!(!debug.contains("super_secret_value"));
        assert!(!debug.contains("test_api_key_123"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_sign_matches_rfc4231_vector() {
        // RFC 4231 test case 2, base64 instead of hex
        let creds = Credentials::new("key", "Jefe").unwrap();
        let signature = creds.sign("what do ya want for nothing?").unwrap();
        assert_eq!(signature, "W9zBRr9gdU5qBCQmCJV1x1oAPwidJzmDnexYuWTsOEM=");
    }

    #[test]
    fn test_sign_form_body() {
        let creds = Credentials::new("key", "secret").unwrap();
        assert_eq!(
            creds.sign("coin=BTC").unwrap(),
            "Ob+zqo7lkcJ+hTHFna5DgPna2d58zjCaFSUSEDVnaec="
        );
    }

    #[test]
    fn test_sign_empty_payload() {
        let creds = Credentials::new("key", "secret").unwrap();
        let signature = creds.sign("").unwrap();
        assert_eq!(signature, "+eZuF5tnR65UEI+C+K3os8Jddv0wr95sOVgixTAZYWk=");
        assert!(BASE64.decode(&signature).is_ok());
    }

    #[test]
    fn test_clone_keeps_signing_key() {
        let creds = Credentials::new("key", "secret").unwrap();
        let cloned = creds.clone();
        assert_eq!(cloned.api_key(), "key");
        assert_eq!(creds.sign("a=1").unwrap(), cloned.sign("a=1").unwrap());
    }
}
