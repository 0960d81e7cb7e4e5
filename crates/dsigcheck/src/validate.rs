#![forbid(unsafe_code)]

//! The validation driver.
//!
//! Finds every `ds:Signature` in a document and runs it through the
//! signature engine. Only setup problems are returned as errors: a file
//! that cannot be read, XML that does not parse, a document without
//! signatures. Whatever goes wrong inside one signature ends up in that
//! signature's report and the next signature is still validated.

use std::path::Path;

use dsigcheck_core::{ns, Error};
use dsigcheck_dsig::{SignatureEngine, ValidateContext, XmlSignature};
use dsigcheck_keys::KeySelector;
use dsigcheck_xml::document::{build_id_map, find_elements};
use roxmltree::Document;

use crate::report::{SignatureOutcome, SignatureReport};

/// Validates documents with one engine and one key selector.
pub struct Validator<'a> {
    engine: &'a dyn SignatureEngine,
    key_selector: &'a dyn KeySelector,
    id_attrs: Vec<String>,
}

impl<'a> Validator<'a> {
    pub fn new(engine: &'a dyn SignatureEngine, key_selector: &'a dyn KeySelector) -> Self {
        Self {
            engine,
            key_selector,
            id_attrs: Vec::new(),
        }
    }

    /// Register extra ID attribute names (besides `Id`, `ID` and `id`).
    pub fn with_id_attrs<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.id_attrs.extend(names.into_iter().map(Into::into));
        self
    }

    /// Read and validate an XML file.
    pub fn validate_file(&self, path: impl AsRef<Path>) -> Result<Vec<SignatureReport>, Error> {
        let xml = std::fs::read_to_string(path.as_ref())?;
        self.validate_str(&xml)
    }

    /// Parse and validate an XML document.
    pub fn validate_str(&self, xml: &str) -> Result<Vec<SignatureReport>, Error> {
        let doc = dsigcheck_xml::parse(xml)?;
        self.validate_document(&doc)
    }

    /// Validate every signature in `doc`, in document order.
    pub fn validate_document(&self, doc: &Document<'_>) -> Result<Vec<SignatureReport>, Error> {
        let signatures = find_elements(doc, ns::DSIG, ns::node::SIGNATURE);
        if signatures.is_empty() {
            return Err(Error::NoSignatureFound);
        }
        tracing::debug!(count = signatures.len(), "found signatures");

        let id_map = build_id_map(doc, &self.id_attrs);
        let reports = signatures
            .into_iter()
            .enumerate()
            .map(|(index, node)| {
                let ctx = ValidateContext::new(doc, node, self.key_selector, &id_map);
                SignatureReport {
                    index,
                    outcome: self.validate_signature(index, &ctx),
                }
            })
            .collect();
        Ok(reports)
    }

    fn validate_signature(&self, index: usize, ctx: &ValidateContext<'_, '_>) -> SignatureOutcome {
        let signature = match self.engine.unmarshal(ctx) {
            Ok(signature) => signature,
            Err(e) => {
                tracing::warn!(signature = index, error = %e, "cannot unmarshal signature");
                return SignatureOutcome::Unreadable {
                    reason: e.to_string(),
                };
            }
        };

        if checked(index, "core validation", self.engine.validate(&signature, ctx)) {
            return SignatureOutcome::Valid;
        }
        self.diagnose(index, &signature, ctx)
    }

    fn diagnose(
        &self,
        index: usize,
        signature: &XmlSignature,
        ctx: &ValidateContext<'_, '_>,
    ) -> SignatureOutcome {
        let signature_value = checked(
            index,
            "signature value",
            self.engine.validate_signature_value(signature, ctx),
        );
        let references = signature
            .signed_info
            .references
            .iter()
            .map(|reference| {
                checked(
                    index,
                    "reference",
                    self.engine.validate_reference(signature, reference, ctx),
                )
            })
            .collect();
        SignatureOutcome::Invalid {
            signature_value,
            references,
        }
    }
}

/// An engine error counts as a failed check.
fn checked(index: usize, check: &str, result: Result<bool, Error>) -> bool {
    result.unwrap_or_else(|e| {
        tracing::warn!(signature = index, check, error = %e, "validation could not be completed");
        false
    })
}
