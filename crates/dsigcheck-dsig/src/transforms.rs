#![forbid(unsafe_code)]

//! Reference transforms.
//!
//! Data flows through a reference's transform chain either as a node set
//! over the signed document or as an octet stream. A node set left at the
//! end of the chain is serialized with Canonical XML 1.0 without comments.

use dsigcheck_c14n::{canonicalize, C14nMode};
use dsigcheck_core::{algorithm, Error};
use dsigcheck_xml::{document::decode_base64, NodeSet};
use roxmltree::{Document, NodeId};

use crate::signature::TransformSpec;

/// Data flowing through the transform chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransformData {
    /// Nodes of the signed document.
    NodeSet(NodeSet),
    /// Raw bytes.
    Octets(Vec<u8>),
}

impl TransformData {
    /// Convert to octets, canonicalizing a node set if needed.
    pub fn into_octets(self, doc: &Document<'_>) -> Result<Vec<u8>, Error> {
        match self {
            Self::Octets(data) => Ok(data),
            Self::NodeSet(nodes) => canonicalize(doc, C14nMode::Inclusive, Some(&nodes), &[]),
        }
    }
}

/// A single transform step.
pub trait Transform {
    /// The algorithm URI for this transform.
    fn uri(&self) -> &str;

    fn execute(&self, input: TransformData, doc: &Document<'_>) -> Result<TransformData, Error>;
}

/// Build the transform named by `spec`. `signature` is the `Signature`
/// element the reference belongs to.
pub fn from_spec(spec: &TransformSpec, signature: NodeId) -> Result<Box<dyn Transform>, Error> {
    let uri = spec.algorithm.as_str();
    match uri {
        algorithm::ENVELOPED_SIGNATURE => Ok(Box::new(EnvelopedSignature { signature })),
        algorithm::C14N
        | algorithm::C14N_WITH_COMMENTS
        | algorithm::EXC_C14N
        | algorithm::EXC_C14N_WITH_COMMENTS => {
            let mode = C14nMode::from_uri(uri)
                .ok_or_else(|| Error::UnsupportedAlgorithm(format!("C14N: {uri}")))?;
            Ok(Box::new(Canonicalize {
                mode,
                inclusive_prefixes: spec.inclusive_prefixes.clone(),
            }))
        }
        algorithm::BASE64 => Ok(Box::new(Base64Decode)),
        _ => Err(Error::UnsupportedAlgorithm(format!("transform: {uri}"))),
    }
}

/// Run `specs` in order over `input`.
pub fn apply_all(
    specs: &[TransformSpec],
    input: TransformData,
    doc: &Document<'_>,
    signature: NodeId,
) -> Result<TransformData, Error> {
    let mut data = input;
    for spec in specs {
        let transform = from_spec(spec, signature)?;
        tracing::debug!(transform = transform.uri(), "applying transform");
        data = transform.execute(data, doc)?;
    }
    Ok(data)
}

// ── Enveloped signature ──────────────────────────────────────────────

/// Removes the enclosing `Signature` element from the node set.
struct EnvelopedSignature {
    signature: NodeId,
}

impl Transform for EnvelopedSignature {
    fn uri(&self) -> &str {
        algorithm::ENVELOPED_SIGNATURE
    }

    fn execute(&self, input: TransformData, doc: &Document<'_>) -> Result<TransformData, Error> {
        let TransformData::NodeSet(mut nodes) = input else {
            return Err(Error::Transform(
                "enveloped-signature transform requires a node set".into(),
            ));
        };
        let signature = doc
            .get_node(self.signature)
            .ok_or_else(|| Error::Transform("Signature element not in document".into()))?;
        nodes.remove_subtree(signature);
        Ok(TransformData::NodeSet(nodes))
    }
}

// ── Canonicalization ─────────────────────────────────────────────────

struct Canonicalize {
    mode: C14nMode,
    inclusive_prefixes: Vec<String>,
}

impl Transform for Canonicalize {
    fn uri(&self) -> &str {
        self.mode.uri()
    }

    fn execute(&self, input: TransformData, doc: &Document<'_>) -> Result<TransformData, Error> {
        let bytes = match input {
            TransformData::NodeSet(nodes) => {
                canonicalize(doc, self.mode, Some(&nodes), &self.inclusive_prefixes)?
            }
            TransformData::Octets(data) => {
                // Octets are parsed into a fresh document and canonicalized whole.
                let text = std::str::from_utf8(&data)
                    .map_err(|e| Error::Transform(format!("C14N input is not UTF-8: {e}")))?;
                let parsed = dsigcheck_xml::parse(text)?;
                canonicalize(&parsed, self.mode, None, &self.inclusive_prefixes)?
            }
        };
        Ok(TransformData::Octets(bytes))
    }
}

// ── Base64 ───────────────────────────────────────────────────────────

/// Decodes base64 content. A node set contributes the text of its text
/// nodes, in document order.
struct Base64Decode;

impl Transform for Base64Decode {
    fn uri(&self) -> &str {
        algorithm::BASE64
    }

    fn execute(&self, input: TransformData, doc: &Document<'_>) -> Result<TransformData, Error> {
        let text = match input {
            TransformData::Octets(data) => String::from_utf8(data)
                .map_err(|e| Error::Transform(format!("base64 input is not UTF-8: {e}")))?,
            TransformData::NodeSet(nodes) => doc
                .descendants()
                .filter(|n| n.is_text() && nodes.contains(n))
                .filter_map(|n| n.text())
                .collect(),
        };
        let decoded =
            decode_base64(&text).map_err(|e| Error::Base64(format!("base64 transform: {e}")))?;
        Ok(TransformData::Octets(decoded))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dsigcheck_core::ns;

    fn spec(algorithm: &str) -> TransformSpec {
        TransformSpec {
            algorithm: algorithm.into(),
            inclusive_prefixes: Vec::new(),
        }
    }

    fn signature_id(doc: &Document<'_>) -> NodeId {
        dsigcheck_xml::document::find_elements(doc, ns::DSIG, ns::node::SIGNATURE)[0].id()
    }

    const ENVELOPED: &str = r#"<doc xmlns:n="urn:n"><n:item>42</n:item><!--note--><ds:Signature xmlns:ds="http://www.w3.org/2000/09/xmldsig#"><ds:SignatureValue>AA==</ds:SignatureValue></ds:Signature></doc>"#;

    #[test]
    fn enveloped_then_node_set_output() {
        let doc = dsigcheck_xml::parse(ENVELOPED).unwrap();
        let input = TransformData::NodeSet(NodeSet::all(&doc, false));
        let out = apply_all(
            &[spec(algorithm::ENVELOPED_SIGNATURE)],
            input,
            &doc,
            signature_id(&doc),
        )
        .unwrap();
        assert_eq!(
            out.into_octets(&doc).unwrap(),
            br#"<doc xmlns:n="urn:n"><n:item>42</n:item></doc>"#
        );
    }

    #[test]
    fn enveloped_then_exclusive_with_comments() {
        let doc = dsigcheck_xml::parse(ENVELOPED).unwrap();
        let input = TransformData::NodeSet(NodeSet::all(&doc, true));
        let specs = [
            spec(algorithm::ENVELOPED_SIGNATURE),
            spec(algorithm::EXC_C14N_WITH_COMMENTS),
        ];
        let out = apply_all(&specs, input, &doc, signature_id(&doc)).unwrap();
        assert_eq!(
            out,
            TransformData::Octets(br#"<doc><n:item xmlns:n="urn:n">42</n:item><!--note--></doc>"#.to_vec())
        );
    }

    #[test]
    fn enveloped_rejects_octets() {
        let doc = dsigcheck_xml::parse(ENVELOPED).unwrap();
        let err = apply_all(
            &[spec(algorithm::ENVELOPED_SIGNATURE)],
            TransformData::Octets(b"x".to_vec()),
            &doc,
            signature_id(&doc),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Transform(_)));
    }

    #[test]
    fn base64_then_c14n_of_octets() {
        // "<a   b='1'/>" in base64
        let xml = r#"<data xmlns:ds="http://www.w3.org/2000/09/xmldsig#">PGEgICBiPScxJy8+<ds:Signature/></data>"#;
        let doc = dsigcheck_xml::parse(xml).unwrap();
        let specs = [spec(algorithm::BASE64), spec(algorithm::C14N)];
        let out = apply_all(
            &specs,
            TransformData::NodeSet(NodeSet::all(&doc, false)),
            &doc,
            signature_id(&doc),
        )
        .unwrap();
        assert_eq!(out, TransformData::Octets(br#"<a b="1"></a>"#.to_vec()));
    }

    #[test]
    fn unknown_transform_is_unsupported() {
        let doc = dsigcheck_xml::parse(ENVELOPED).unwrap();
        let err = apply_all(
            &[spec("http://www.w3.org/TR/1999/REC-xpath-19991116")],
            TransformData::NodeSet(NodeSet::all(&doc, false)),
            &doc,
            signature_id(&doc),
        )
        .unwrap_err();
        assert!(matches!(err, Error::UnsupportedAlgorithm(ref m) if m.starts_with("transform:")));
    }
}
