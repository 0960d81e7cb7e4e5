#![forbid(unsafe_code)]

//! The `KeyInfo` model.
//!
//! Only `KeyValue` and `X509Data` children are kept; everything else a
//! `KeyInfo` may carry (`KeyName`, `RetrievalMethod`, `PGPData`, ...) is
//! skipped when the element is read.

use crate::key::PublicKey;
use crate::x509::X509Data;
use base64::Engine;
use dsigcheck_core::{algorithm, ns, Error, KeySelectionError};
use dsigcheck_xml::document::{child_elements, element_text, find_child_element, require_child_element};
use roxmltree::Node;

/// Key material attached to one signature.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyInfo {
    pub id: Option<String>,
    pub content: Vec<KeyInfoEntry>,
}

/// A `KeyInfo` child the key selector can use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyInfoEntry {
    KeyValue(KeyValue),
    X509Data(X509Data),
}

/// The content of a `KeyValue` element, with CryptoBinary values decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyValue {
    Rsa {
        modulus: Vec<u8>,
        exponent: Vec<u8>,
    },
    /// `P`, `Q` and `G` may be omitted when the domain parameters are known
    /// out of band; such a key cannot be built from the document alone.
    Dsa {
        p: Option<Vec<u8>>,
        q: Option<Vec<u8>>,
        g: Option<Vec<u8>>,
        y: Vec<u8>,
    },
    Ec {
        named_curve: String,
        public_key: Vec<u8>,
    },
    Unsupported {
        element: String,
    },
}

impl KeyInfo {
    /// Read a `ds:KeyInfo` element.
    pub fn from_node(node: Node<'_, '_>) -> Result<Self, Error> {
        let mut content = Vec::new();
        for child in child_elements(node) {
            let name = child.tag_name();
            match (name.namespace(), name.name()) {
                (Some(ns::DSIG), ns::node::KEY_VALUE) => {
                    content.push(KeyInfoEntry::KeyValue(KeyValue::from_node(child)?));
                }
                (Some(ns::DSIG), ns::node::X509_DATA) => {
                    content.push(KeyInfoEntry::X509Data(X509Data::from_node(child)?));
                }
                (_, other) => {
                    tracing::debug!(element = other, "ignoring KeyInfo child");
                }
            }
        }
        Ok(Self {
            id: node.attribute(ns::attr::ID).map(str::to_owned),
            content,
        })
    }
}

impl KeyValue {
    /// Read a `ds:KeyValue` element.
    pub fn from_node(node: Node<'_, '_>) -> Result<Self, Error> {
        let inner = child_elements(node)
            .next()
            .ok_or_else(|| Error::MissingElement("KeyValue content".into()))?;
        let name = inner.tag_name();
        match (name.namespace().unwrap_or(""), name.name()) {
            (ns::DSIG, ns::node::RSA_KEY_VALUE) => Ok(Self::Rsa {
                modulus: crypto_binary(inner, ns::node::RSA_MODULUS)?,
                exponent: crypto_binary(inner, ns::node::RSA_EXPONENT)?,
            }),
            (ns::DSIG, ns::node::DSA_KEY_VALUE) => Ok(Self::Dsa {
                p: optional_crypto_binary(inner, ns::node::DSA_P)?,
                q: optional_crypto_binary(inner, ns::node::DSA_Q)?,
                g: optional_crypto_binary(inner, ns::node::DSA_G)?,
                y: crypto_binary(inner, ns::node::DSA_Y)?,
            }),
            (ns::DSIG11 | ns::DSIG, ns::node::EC_KEY_VALUE) => {
                let curve = require_child_element(inner, name.namespace().unwrap_or(""), ns::node::NAMED_CURVE)?;
                let named_curve = curve
                    .attribute(ns::attr::URI)
                    .ok_or_else(|| Error::MissingAttribute("URI on NamedCurve".into()))?;
                Ok(Self::Ec {
                    named_curve: named_curve.to_owned(),
                    public_key: crypto_binary(inner, ns::node::PUBLIC_KEY)?,
                })
            }
            (uri, local) => Ok(Self::Unsupported {
                element: format!("{{{uri}}}{local}"),
            }),
        }
    }

    /// Build the public key this value describes.
    pub fn public_key(&self) -> Result<PublicKey, KeySelectionError> {
        let extraction = KeySelectionError::KeyExtraction;
        match self {
            Self::Rsa { modulus, exponent } => rsa::RsaPublicKey::new(
                rsa::BigUint::from_bytes_be(modulus),
                rsa::BigUint::from_bytes_be(exponent),
            )
            .map(PublicKey::Rsa)
            .map_err(|e| extraction(format!("invalid RSA public key: {e}"))),
            Self::Dsa { p, q, g, y } => {
                let (Some(p), Some(q), Some(g)) = (p, q, g) else {
                    return Err(extraction("DSAKeyValue without P, Q and G".into()));
                };
                let big = |b: &[u8]| dsa::BigUint::from_bytes_be(b);
                let components = dsa::Components::from_components(big(p), big(q), big(g))
                    .map_err(|e| extraction(format!("invalid DSA components: {e}")))?;
                dsa::VerifyingKey::from_components(components, big(y))
                    .map(PublicKey::Dsa)
                    .map_err(|e| extraction(format!("invalid DSA public key: {e}")))
            }
            Self::Ec {
                named_curve,
                public_key,
            } => match named_curve.as_str() {
                algorithm::CURVE_P256 => p256::ecdsa::VerifyingKey::from_sec1_bytes(public_key)
                    .map(PublicKey::EcP256)
                    .map_err(|e| extraction(format!("invalid P-256 point: {e}"))),
                algorithm::CURVE_P384 => p384::ecdsa::VerifyingKey::from_sec1_bytes(public_key)
                    .map(PublicKey::EcP384)
                    .map_err(|e| extraction(format!("invalid P-384 point: {e}"))),
                other => {
                    tracing::debug!(curve = other, "EC key on an unsupported curve");
                    Ok(PublicKey::Other {
                        algorithm: "EC".into(),
                    })
                }
            },
            Self::Unsupported { element } => {
                Err(extraction(format!("unsupported KeyValue type {element}")))
            }
        }
    }
}

fn optional_crypto_binary(parent: Node<'_, '_>, name: &str) -> Result<Option<Vec<u8>>, Error> {
    find_child_element(parent, ns::DSIG, name)
        .map(|node| decode_crypto_binary(&element_text(node), name))
        .transpose()
}

fn crypto_binary(parent: Node<'_, '_>, name: &str) -> Result<Vec<u8>, Error> {
    optional_crypto_binary(parent, name)?
        .ok_or_else(|| Error::MissingElement(format!("{name} in {}", parent.tag_name().name())))
}

/// Decode a CryptoBinary value: base64, or hex as some interop vectors use.
fn decode_crypto_binary(text: &str, name: &str) -> Result<Vec<u8>, Error> {
    let clean: String = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    if clean.is_empty() {
        return Err(Error::Base64(format!("{name}: empty value")));
    }
    match base64::engine::general_purpose::STANDARD.decode(&clean) {
        Ok(bytes) => Ok(bytes),
        Err(e) => hex::decode(&clean).map_err(|_| Error::Base64(format!("{name}: {e}"))),
    }
}
