#![forbid(unsafe_code)]

/// Errors produced while locating, unmarshaling and validating signatures.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("XML parsing error: {0}")]
    XmlParse(String),

    #[error("invalid XML structure: {0}")]
    XmlStructure(String),

    #[error("cannot find Signature element")]
    NoSignatureFound,

    #[error("signature engine unavailable: {0}")]
    EngineInit(String),

    #[error("unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("cryptographic error: {0}")]
    Crypto(String),

    #[error("key error: {0}")]
    Key(String),

    #[error("key selection failed: {0}")]
    KeySelection(#[from] KeySelectionError),

    #[error("transform error: {0}")]
    Transform(String),

    #[error("base64 decode error: {0}")]
    Base64(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("missing required element: {0}")]
    MissingElement(String),

    #[error("missing required attribute: {0}")]
    MissingAttribute(String),

    #[error("invalid URI reference: {0}")]
    InvalidUri(String),

    #[error("certificate error: {0}")]
    Certificate(String),
}

/// Why a key selector could not produce a verification key.
///
/// `MissingKeyInfo` (the signature has no `KeyInfo` at all) and
/// `NoCompatibleKey` (it has one, but nothing in it fits the signature
/// method) are distinct conditions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeySelectionError {
    #[error("null KeyInfo: the signature carries no KeyInfo element")]
    MissingKeyInfo,

    #[error("cannot extract public key: {0}")]
    KeyExtraction(String),

    #[error("no KeyValue or X509Certificate key compatible with {signature_method}{}", rejected_suffix(.rejected))]
    NoCompatibleKey {
        signature_method: String,
        /// Key algorithms that were seen and rejected, in KeyInfo order.
        rejected: Vec<String>,
    },
}

fn rejected_suffix(rejected: &[String]) -> String {
    if rejected.is_empty() {
        String::new()
    } else {
        format!(" (rejected: {})", rejected.join(", "))
    }
}
