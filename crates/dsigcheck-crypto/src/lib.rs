#![forbid(unsafe_code)]

//! Cryptographic primitives for dsigcheck: message digests selected by
//! algorithm URI, and RSA / DSA signature verification.

pub mod digest;
pub mod sign;

pub use sign::VerifyingKey;
