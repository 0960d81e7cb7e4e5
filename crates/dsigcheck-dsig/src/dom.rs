#![forbid(unsafe_code)]

//! The DOM signature engine.
//!
//! Validation order for a signature value:
//! 1. Ask the key selector for a key matching `SignatureMethod`
//! 2. Canonicalize `SignedInfo` with its `CanonicalizationMethod`
//! 3. Verify `SignatureValue` over the canonical bytes
//!
//! and for each reference:
//! 1. Dereference `URI` to a node set
//! 2. Run the transform chain
//! 3. Digest the result and compare with `DigestValue`

use dsigcheck_c14n::{canonicalize, C14nMode};
use dsigcheck_core::Error;
use dsigcheck_crypto::{digest, sign};
use dsigcheck_xml::NodeSet;

use crate::context::ValidateContext;
use crate::engine::{SignatureEngine, DEFAULT_ENGINE};
use crate::reference::dereference;
use crate::signature::{Reference, XmlSignature};
use crate::transforms::{self, TransformData};

/// Validates signatures directly over the parsed document tree.
#[derive(Debug, Default, Clone, Copy)]
pub struct DomEngine;

impl SignatureEngine for DomEngine {
    fn name(&self) -> &str {
        DEFAULT_ENGINE
    }

    fn unmarshal(&self, ctx: &ValidateContext<'_, '_>) -> Result<XmlSignature, Error> {
        XmlSignature::from_node(ctx.signature)
    }

    fn validate_signature_value(
        &self,
        signature: &XmlSignature,
        ctx: &ValidateContext<'_, '_>,
    ) -> Result<bool, Error> {
        let signed_info = &signature.signed_info;
        let key = ctx
            .key_selector
            .select(signature.key_info.as_ref(), &signed_info.signature_method)?;
        tracing::debug!(algorithm = key.algorithm(), "key selected");
        let verifying_key = key.to_verifying_key()?;
        let method = sign::from_uri(&signed_info.signature_method)?;

        let c14n_uri = signed_info.canonicalization.algorithm.as_str();
        let mode = C14nMode::from_uri(c14n_uri)
            .ok_or_else(|| Error::UnsupportedAlgorithm(format!("canonicalization: {c14n_uri}")))?;
        let node = ctx
            .doc
            .get_node(signed_info.node)
            .ok_or_else(|| Error::XmlStructure("SignedInfo not in document".into()))?;
        let nodes = NodeSet::tree(node, mode.with_comments());
        let canonical = canonicalize(
            ctx.doc,
            mode,
            Some(&nodes),
            &signed_info.canonicalization.inclusive_prefixes,
        )?;

        let valid = method.verify(&verifying_key, &canonical, &signature.signature_value)?;
        if !valid {
            tracing::debug!(method = method.uri(), "signature value does not verify");
        }
        Ok(valid)
    }

    fn validate_reference(
        &self,
        signature: &XmlSignature,
        reference: &Reference,
        ctx: &ValidateContext<'_, '_>,
    ) -> Result<bool, Error> {
        let uri = reference.uri.as_deref().unwrap_or("");
        let nodes = dereference(uri, ctx.doc, ctx.id_map)?;
        let data = transforms::apply_all(
            &reference.transforms,
            TransformData::NodeSet(nodes),
            ctx.doc,
            signature.node,
        )?;
        let bytes = data.into_octets(ctx.doc)?;
        let computed = digest::digest(&reference.digest_method, &bytes)?;

        let valid = computed == reference.digest_value;
        if !valid {
            tracing::debug!(uri, "digest mismatch");
        }
        Ok(valid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dsigcheck_core::{ns, KeySelectionError};
    use dsigcheck_keys::{KeyInfo, KeySelector, PublicKey};
    use dsigcheck_xml::document::{build_id_map, find_elements};

    struct NoKey;

    impl KeySelector for NoKey {
        fn select(
            &self,
            _key_info: Option<&KeyInfo>,
            _signature_method: &str,
        ) -> Result<PublicKey, KeySelectionError> {
            Err(KeySelectionError::MissingKeyInfo)
        }
    }

    // Digests of <data Id="obj">hello</data> and of the document without
    // its Signature: <root><data Id="obj">hello</data></root>.
    const SHA1_OBJ: &str = "0mUB+CtDyDtdsJACckUPwl/gJEU=";
    const SHA256_OBJ: &str = "//2lVaWhPRBk2UHKSg3q/Gs7KxfxU41YdXdFbjGZMHg=";
    const SHA1_DOC: &str = "RMGETFvwQlYzsDdSSMGmo6eAGds=";

    fn document(references: &str) -> String {
        format!(
            r#"<root><data Id="obj">hello</data><ds:Signature xmlns:ds="http://www.w3.org/2000/09/xmldsig#">
  <ds:SignedInfo>
    <ds:CanonicalizationMethod Algorithm="http://www.w3.org/TR/2001/REC-xml-c14n-20010315"/>
    <ds:SignatureMethod Algorithm="http://www.w3.org/2000/09/xmldsig#rsa-sha1"/>
    {references}
  </ds:SignedInfo>
  <ds:SignatureValue>AAAA</ds:SignatureValue>
</ds:Signature></root>"#
        )
    }

    fn reference(uri: &str, transforms: &str, digest_method: &str, value: &str) -> String {
        format!(
            r#"<ds:Reference URI="{uri}">{transforms}<ds:DigestMethod Algorithm="{digest_method}"/><ds:DigestValue>{value}</ds:DigestValue></ds:Reference>"#
        )
    }

    const ENVELOPED: &str = r#"<ds:Transforms><ds:Transform Algorithm="http://www.w3.org/2000/09/xmldsig#enveloped-signature"/></ds:Transforms>"#;
    const SHA1: &str = "http://www.w3.org/2000/09/xmldsig#sha1";
    const SHA256: &str = "http://www.w3.org/2001/04/xmlenc#sha256";

    /// Validate every reference of the single signature in `xml`.
    fn reference_results(xml: &str) -> Vec<Result<bool, Error>> {
        let doc = dsigcheck_xml::parse(xml).unwrap();
        let ids = build_id_map(&doc, &[]);
        let node = find_elements(&doc, ns::DSIG, ns::node::SIGNATURE)[0];
        let ctx = ValidateContext::new(&doc, node, &NoKey, &ids);
        let sig = DomEngine.unmarshal(&ctx).unwrap();
        sig.signed_info
            .references
            .iter()
            .map(|r| DomEngine.validate_reference(&sig, r, &ctx))
            .collect()
    }

    #[test]
    fn reference_digests() {
        let refs = [
            reference("#obj", "", SHA1, SHA1_OBJ),
            reference("#obj", "", SHA256, SHA256_OBJ),
            reference("", ENVELOPED, SHA1, SHA1_DOC),
            reference("#obj", "", SHA1, SHA1_DOC),
        ]
        .concat();
        let results: Vec<_> = reference_results(&document(&refs))
            .into_iter()
            .map(Result::unwrap)
            .collect();
        assert_eq!(results, [true, true, true, false]);
    }

    #[test]
    fn tampered_content_fails_digest() {
        let xml = document(&reference("", ENVELOPED, SHA1, SHA1_DOC)).replace("hello", "HELLO");
        assert!(!reference_results(&xml)[0].as_ref().unwrap());
    }

    #[test]
    fn reference_errors() {
        let refs = [
            reference("#nowhere", "", SHA1, SHA1_OBJ),
            reference("#obj", "", "urn:example:digest", SHA1_OBJ),
            reference("http://example.com/", "", SHA1, SHA1_OBJ),
        ]
        .concat();
        let results = reference_results(&document(&refs));
        assert!(matches!(results[0], Err(Error::InvalidUri(_))));
        assert!(matches!(results[1], Err(Error::UnsupportedAlgorithm(_))));
        assert!(matches!(results[2], Err(Error::InvalidUri(_))));
    }

    #[test]
    fn key_selection_failure_is_an_error() {
        let xml = document(&reference("#obj", "", SHA1, SHA1_OBJ));
        let doc = dsigcheck_xml::parse(&xml).unwrap();
        let ids = build_id_map(&doc, &[]);
        let node = find_elements(&doc, ns::DSIG, ns::node::SIGNATURE)[0];
        let ctx = ValidateContext::new(&doc, node, &NoKey, &ids);
        let sig = DomEngine.unmarshal(&ctx).unwrap();

        let err = DomEngine.validate_signature_value(&sig, &ctx).unwrap_err();
        assert!(matches!(
            err,
            Error::KeySelection(KeySelectionError::MissingKeyInfo)
        ));
        // Core validation stops at the signature value.
        assert!(DomEngine.validate(&sig, &ctx).is_err());
    }
}
