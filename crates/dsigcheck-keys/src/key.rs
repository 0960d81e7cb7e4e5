#![forbid(unsafe_code)]

//! Public keys usable (or at least recognisable) for signature verification.

use dsigcheck_core::Error;
use dsigcheck_crypto::VerifyingKey;
use spki::{DecodePublicKey, ObjectIdentifier};

const OID_RSA_ENCRYPTION: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.1");
const OID_DSA: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10040.4.1");
const OID_EC_PUBLIC_KEY: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.2.1");
const OID_ED25519: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.101.112");
const OID_ED448: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.101.113");

/// A public key taken from a `KeyValue` or an X.509 certificate.
#[derive(Debug, Clone, PartialEq)]
pub enum PublicKey {
    Rsa(rsa::RsaPublicKey),
    Dsa(dsa::VerifyingKey),
    EcP256(p256::ecdsa::VerifyingKey),
    EcP384(p384::ecdsa::VerifyingKey),
    /// A well-formed key of an algorithm (or curve) without a verifier here.
    Other { algorithm: String },
}

impl PublicKey {
    /// Algorithm family name: `"RSA"`, `"DSA"`, `"EC"`, or the name carried
    /// by [`PublicKey::Other`].
    pub fn algorithm(&self) -> &str {
        match self {
            Self::Rsa(_) => "RSA",
            Self::Dsa(_) => "DSA",
            Self::EcP256(_) | Self::EcP384(_) => "EC",
            Self::Other { algorithm } => algorithm.as_str(),
        }
    }

    /// Decode a DER `SubjectPublicKeyInfo`.
    pub fn from_spki_der(der: &[u8]) -> Result<Self, Error> {
        use der::Decode;
        let info = spki::SubjectPublicKeyInfoRef::from_der(der)
            .map_err(|e| Error::Key(format!("invalid SubjectPublicKeyInfo: {e}")))?;
        let oid = info.algorithm.oid;

        if oid == OID_RSA_ENCRYPTION {
            rsa::RsaPublicKey::from_public_key_der(der)
                .map(Self::Rsa)
                .map_err(|e| Error::Key(format!("invalid RSA public key: {e}")))
        } else if oid == OID_DSA {
            dsa::VerifyingKey::from_public_key_der(der)
                .map(Self::Dsa)
                .map_err(|e| Error::Key(format!("invalid DSA public key: {e}")))
        } else if oid == OID_EC_PUBLIC_KEY {
            if let Ok(vk) = p256::ecdsa::VerifyingKey::from_public_key_der(der) {
                Ok(Self::EcP256(vk))
            } else if let Ok(vk) = p384::ecdsa::VerifyingKey::from_public_key_der(der) {
                Ok(Self::EcP384(vk))
            } else {
                Ok(Self::Other {
                    algorithm: "EC".into(),
                })
            }
        } else if oid == OID_ED25519 || oid == OID_ED448 {
            Ok(Self::Other {
                algorithm: "EdDSA".into(),
            })
        } else {
            Ok(Self::Other {
                algorithm: oid.to_string(),
            })
        }
    }

    /// Convert into the key type the signature verifiers accept.
    pub fn to_verifying_key(&self) -> Result<VerifyingKey, Error> {
        match self {
            Self::Rsa(pk) => Ok(VerifyingKey::Rsa(pk.clone())),
            Self::Dsa(vk) => Ok(VerifyingKey::Dsa(vk.clone())),
            other => Err(Error::UnsupportedAlgorithm(format!(
                "verification with {} keys",
                other.algorithm()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine;

    fn spki_of(cert_b64: &str) -> Vec<u8> {
        use der::{Decode, Encode};
        let der = base64::engine::general_purpose::STANDARD
            .decode(cert_b64.trim())
            .unwrap();
        let cert = x509_cert::Certificate::from_der(&der).unwrap();
        cert.tbs_certificate.subject_public_key_info.to_der().unwrap()
    }

    #[test]
    fn spki_dispatch_by_algorithm() {
        let rsa = PublicKey::from_spki_der(&spki_of(include_str!("../testdata/rsa_cert.b64"))).unwrap();
        assert_eq!(rsa.algorithm(), "RSA");
        assert!(matches!(rsa.to_verifying_key(), Ok(VerifyingKey::Rsa(_))));

        let dsa = PublicKey::from_spki_der(&spki_of(include_str!("../testdata/dsa_cert.b64"))).unwrap();
        assert_eq!(dsa.algorithm(), "DSA");
        assert!(matches!(dsa.to_verifying_key(), Ok(VerifyingKey::Dsa(_))));

        let ec = PublicKey::from_spki_der(&spki_of(include_str!("../testdata/ec_cert.b64"))).unwrap();
        assert!(matches!(ec, PublicKey::EcP256(_)));
        assert_eq!(ec.algorithm(), "EC");
        assert!(matches!(ec.to_verifying_key(), Err(Error::UnsupportedAlgorithm(_))));
    }

    #[test]
    fn garbage_spki_is_a_key_error() {
        assert!(matches!(PublicKey::from_spki_der(b"\x30\x03\x02\x01"), Err(Error::Key(_))));
    }
}
