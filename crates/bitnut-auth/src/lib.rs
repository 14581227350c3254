//! API credentials and request signing for the Bitnut exchange
//!
//! Bitnut authenticates private REST calls with two headers:
//!
//! - `BU-ACCESS-KEY`: the raw API key
//! - `BU-ACCESS-SIGN`: base64 of HMAC-SHA256 over the form-encoded request body,
//!   keyed by the secret key
//!
//! This crate owns the credential pair and the signature computation. Request
//! assembly lives in `bitnut-rest`.
//!
//! # Example
//!
//! ```no_run
//! use bitnut_auth::Credentials;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let creds = Credentials::from_env()?;
//!     let signature = creds.sign("coin=BTC")?;
//!     println!("{}: {}", creds.api_key(), signature);
//!     Ok(())
//! }
//! ```

mod credentials;
mod error;

pub use credentials::{Credentials, API_KEY_ENV, SECRET_KEY_ENV};
pub use error::{AuthError, AuthResult};
