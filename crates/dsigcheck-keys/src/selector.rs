#![forbid(unsafe_code)]

//! Choosing the verification key for a signature.
//!
//! [`KeyValueKeySelector`] walks the signature's `KeyInfo` in document
//! order. A `KeyValue` offers its embedded key; an `X509Data` offers the
//! subject key of each of its certificates in turn. The first offered key
//! whose algorithm fits the signature method is returned and nothing after
//! it is looked at. Only two pairings fit: DSA keys with DSA-SHA1 and RSA
//! keys with RSA-SHA1.

use crate::key::PublicKey;
use crate::keyinfo::{KeyInfo, KeyInfoEntry};
use dsigcheck_core::{algorithm, KeySelectionError};

/// Produces the key a signature is verified with.
pub trait KeySelector {
    /// `key_info` is `None` when the signature has no `KeyInfo` element.
    fn select(
        &self,
        key_info: Option<&KeyInfo>,
        signature_method: &str,
    ) -> Result<PublicKey, KeySelectionError>;
}

/// Selects the first `KeyValue` or X.509 certificate key compatible with
/// the signature method. Stateless.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeyValueKeySelector;

impl KeySelector for KeyValueKeySelector {
    fn select(
        &self,
        key_info: Option<&KeyInfo>,
        signature_method: &str,
    ) -> Result<PublicKey, KeySelectionError> {
        let key_info = key_info.ok_or(KeySelectionError::MissingKeyInfo)?;
        let mut rejected = Vec::new();

        for entry in &key_info.content {
            match entry {
                KeyInfoEntry::KeyValue(kv) => {
                    let key = kv.public_key()?;
                    if let Some(key) = accept(key, signature_method, &mut rejected) {
                        return Ok(key);
                    }
                }
                KeyInfoEntry::X509Data(data) => {
                    for cert in data.certificates() {
                        let key = cert
                            .public_key()
                            .map_err(|e| KeySelectionError::KeyExtraction(e.to_string()))?;
                        if let Some(key) = accept(key, signature_method, &mut rejected) {
                            return Ok(key);
                        }
                    }
                }
            }
        }

        Err(KeySelectionError::NoCompatibleKey {
            signature_method: signature_method.to_owned(),
            rejected,
        })
    }
}

fn accept(key: PublicKey, signature_method: &str, rejected: &mut Vec<String>) -> Option<PublicKey> {
    if algorithm_matches(signature_method, key.algorithm()) {
        tracing::debug!(key = key.algorithm(), signature_method, "selected key");
        Some(key)
    } else {
        tracing::debug!(key = key.algorithm(), signature_method, "key does not fit signature method");
        rejected.push(key.algorithm().to_owned());
        None
    }
}

/// Whether a key of algorithm family `key_algorithm` may verify a signature
/// made with `signature_method`. Both sides compare ASCII case-insensitively.
pub fn algorithm_matches(signature_method: &str, key_algorithm: &str) -> bool {
    let pairs = [("DSA", algorithm::DSA_SHA1), ("RSA", algorithm::RSA_SHA1)];
    pairs.iter().any(|(alg, uri)| {
        key_algorithm.eq_ignore_ascii_case(alg) && signature_method.eq_ignore_ascii_case(uri)
    })
}
