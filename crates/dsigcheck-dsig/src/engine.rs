#![forbid(unsafe_code)]

//! The signature-engine interface.

use dsigcheck_core::Error;

use crate::context::ValidateContext;
use crate::dom::DomEngine;
use crate::signature::{Reference, XmlSignature};

/// Name of the engine used when none is chosen.
pub const DEFAULT_ENGINE: &str = "dom";

/// An XML-DSig validation engine.
///
/// `Err` from any validation method means the check could not be carried
/// out (no usable key, unsupported algorithm, unresolvable reference); the
/// caller decides whether that counts as invalid.
pub trait SignatureEngine {
    fn name(&self) -> &str;

    /// Read the `Signature` element bound to `ctx`.
    fn unmarshal(&self, ctx: &ValidateContext<'_, '_>) -> Result<XmlSignature, Error>;

    /// Verify `SignatureValue` over the canonicalized `SignedInfo`, using the
    /// key `ctx.key_selector` picks.
    fn validate_signature_value(
        &self,
        signature: &XmlSignature,
        ctx: &ValidateContext<'_, '_>,
    ) -> Result<bool, Error>;

    /// Recompute one reference's digest and compare it with `DigestValue`.
    fn validate_reference(
        &self,
        signature: &XmlSignature,
        reference: &Reference,
        ctx: &ValidateContext<'_, '_>,
    ) -> Result<bool, Error>;

    /// Core validation: the signature value, then every reference in order.
    fn validate(
        &self,
        signature: &XmlSignature,
        ctx: &ValidateContext<'_, '_>,
    ) -> Result<bool, Error> {
        if !self.validate_signature_value(signature, ctx)? {
            return Ok(false);
        }
        for reference in &signature.signed_info.references {
            if !self.validate_reference(signature, reference, ctx)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

/// Instantiate an engine by name.
pub fn engine_by_name(name: &str) -> Result<Box<dyn SignatureEngine>, Error> {
    match name {
        DEFAULT_ENGINE => Ok(Box::new(DomEngine)),
        _ => Err(Error::EngineInit(format!(
            "unknown signature engine '{name}' (available: {DEFAULT_ENGINE})"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_and_unknown_engines() {
        assert_eq!(engine_by_name("dom").unwrap().name(), "dom");
        let err = engine_by_name("jsr105").err().unwrap();
        assert!(matches!(err, Error::EngineInit(ref m) if m.contains("jsr105")));
    }
}
