#![forbid(unsafe_code)]

//! Signature verification (RSA PKCS#1 v1.5, DSA).

use dsigcheck_core::{algorithm, Error};

/// Public key material for signature verification.
#[derive(Debug, Clone)]
pub enum VerifyingKey {
    Rsa(rsa::RsaPublicKey),
    Dsa(dsa::VerifyingKey),
}

/// A signature method selected by its XML-DSig URI.
pub trait SignatureAlgorithm: Send {
    fn uri(&self) -> &'static str;

    /// Check `signature` over `data`. `Ok(false)` means the signature does not
    /// match; `Err` means the inputs could not be used at all.
    fn verify(&self, key: &VerifyingKey, data: &[u8], signature: &[u8]) -> Result<bool, Error>;
}

/// Create a signature algorithm from its URI.
pub fn from_uri(uri: &str) -> Result<Box<dyn SignatureAlgorithm>, Error> {
    match uri {
        algorithm::RSA_SHA1 => Ok(Box::new(RsaPkcs1v15 { uri: algorithm::RSA_SHA1, hash: HashType::Sha1 })),
        algorithm::RSA_SHA224 => Ok(Box::new(RsaPkcs1v15 { uri: algorithm::RSA_SHA224, hash: HashType::Sha224 })),
        algorithm::RSA_SHA256 => Ok(Box::new(RsaPkcs1v15 { uri: algorithm::RSA_SHA256, hash: HashType::Sha256 })),
        algorithm::RSA_SHA384 => Ok(Box::new(RsaPkcs1v15 { uri: algorithm::RSA_SHA384, hash: HashType::Sha384 })),
        algorithm::RSA_SHA512 => Ok(Box::new(RsaPkcs1v15 { uri: algorithm::RSA_SHA512, hash: HashType::Sha512 })),

        algorithm::DSA_SHA1 => Ok(Box::new(Dsa { uri: algorithm::DSA_SHA1, hash: HashType::Sha1 })),
        algorithm::DSA_SHA256 => Ok(Box::new(Dsa { uri: algorithm::DSA_SHA256, hash: HashType::Sha256 })),

        _ => Err(Error::UnsupportedAlgorithm(format!("signature algorithm: {uri}"))),
    }
}

#[derive(Debug, Clone, Copy)]
enum HashType {
    Sha1,
    Sha224,
    Sha256,
    Sha384,
    Sha512,
}

// ── RSA PKCS#1 v1.5 ─────────────────────────────────────────────────

struct RsaPkcs1v15 {
    uri: &'static str,
    hash: HashType,
}

impl SignatureAlgorithm for RsaPkcs1v15 {
    fn uri(&self) -> &'static str {
        self.uri
    }

    fn verify(&self, key: &VerifyingKey, data: &[u8], sig_bytes: &[u8]) -> Result<bool, Error> {
        use signature::Verifier;
        let VerifyingKey::Rsa(public_key) = key else {
            return Err(Error::Key("RSA key required".into()));
        };
        let sig = rsa::pkcs1v15::Signature::try_from(sig_bytes)
            .map_err(|e| Error::Crypto(format!("invalid RSA signature: {e}")))?;
        macro_rules! do_verify {
            ($hasher:ty) => {{
                let vk = rsa::pkcs1v15::VerifyingKey::<$hasher>::new(public_key.clone());
                Ok(vk.verify(data, &sig).is_ok())
            }};
        }
        match self.hash {
            HashType::Sha1 => do_verify!(sha1::Sha1),
            HashType::Sha224 => do_verify!(sha2::Sha224),
            HashType::Sha256 => do_verify!(sha2::Sha256),
            HashType::Sha384 => do_verify!(sha2::Sha384),
            HashType::Sha512 => do_verify!(sha2::Sha512),
        }
    }
}

// ── DSA ──────────────────────────────────────────────────────────────

struct Dsa {
    uri: &'static str,
    hash: HashType,
}

impl SignatureAlgorithm for Dsa {
    fn uri(&self) -> &'static str {
        self.uri
    }

    /// The XML-DSig encoding is the big-endian `r` and `s` values
    /// concatenated, each half of the signature value.
    fn verify(&self, key: &VerifyingKey, data: &[u8], sig_bytes: &[u8]) -> Result<bool, Error> {
        use digest::Digest;
        use signature::DigestVerifier;
        let VerifyingKey::Dsa(public_key) = key else {
            return Err(Error::Key("DSA key required".into()));
        };
        if sig_bytes.is_empty() || sig_bytes.len() % 2 != 0 {
            return Err(Error::Crypto(format!(
                "invalid DSA signature length: {}",
                sig_bytes.len()
            )));
        }
        let (r, s) = sig_bytes.split_at(sig_bytes.len() / 2);
        let Ok(sig) = dsa::Signature::from_components(
            dsa::BigUint::from_bytes_be(r),
            dsa::BigUint::from_bytes_be(s),
        ) else {
            // r or s of zero can never verify
            return Ok(false);
        };
        macro_rules! do_verify {
            ($hasher:ty) => {{
                let digest = <$hasher>::new_with_prefix(data);
                Ok(public_key.verify_digest(digest, &sig).is_ok())
            }};
        }
        match self.hash {
            HashType::Sha1 => do_verify!(sha1::Sha1),
            HashType::Sha256 => do_verify!(sha2::Sha256),
            other => Err(Error::UnsupportedAlgorithm(format!("DSA with {other:?}"))),
        }
    }
}
