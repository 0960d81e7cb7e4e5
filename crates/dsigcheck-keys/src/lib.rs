#![forbid(unsafe_code)]

//! Key handling for dsigcheck.
//!
//! - [`keyinfo`]: the `KeyInfo` model read from a signature
//! - [`x509`]: `X509Data` contents and certificate key extraction
//! - [`key`]: public keys and their algorithm family
//! - [`selector`]: the policy choosing the verification key

pub mod key;
pub mod keyinfo;
pub mod selector;
pub mod x509;

pub use key::PublicKey;
pub use keyinfo::{KeyInfo, KeyInfoEntry, KeyValue};
pub use selector::{algorithm_matches, KeySelector, KeyValueKeySelector};
pub use x509::{X509Certificate, X509Data, X509Item};

#[cfg(test)]
mod fixtures;
