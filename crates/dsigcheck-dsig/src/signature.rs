#![forbid(unsafe_code)]

//! The unmarshaled form of a `ds:Signature` element.
//!
//! Reading a signature checks its structure only. Algorithm URIs are kept
//! as written; an algorithm the engine cannot run fails later, when the
//! part that uses it is validated.

use dsigcheck_core::{ns, Error};
use dsigcheck_keys::KeyInfo;
use dsigcheck_xml::document::{
    child_elements, decode_base64_text, find_child_element, require_attribute,
    require_child_element,
};
use roxmltree::{Node, NodeId};

/// A `Signature` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlSignature {
    pub id: Option<String>,
    pub signed_info: SignedInfo,
    pub signature_value: Vec<u8>,
    pub key_info: Option<KeyInfo>,
    /// The `Signature` element in the document it was read from.
    pub node: NodeId,
}

/// The `SignedInfo` element: what the signature value covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedInfo {
    pub canonicalization: TransformSpec,
    pub signature_method: String,
    pub references: Vec<Reference>,
    pub node: NodeId,
}

/// One `Reference` inside `SignedInfo`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub id: Option<String>,
    /// `None` when the `URI` attribute is absent.
    pub uri: Option<String>,
    pub transforms: Vec<TransformSpec>,
    pub digest_method: String,
    pub digest_value: Vec<u8>,
}

/// An algorithm element (`Transform` or `CanonicalizationMethod`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformSpec {
    pub algorithm: String,
    /// `InclusiveNamespaces/@PrefixList`, for exclusive canonicalization.
    pub inclusive_prefixes: Vec<String>,
}

impl XmlSignature {
    /// Unmarshal a `ds:Signature` element.
    pub fn from_node(node: Node<'_, '_>) -> Result<Self, Error> {
        let tag = node.tag_name();
        if tag.namespace() != Some(ns::DSIG) || tag.name() != ns::node::SIGNATURE {
            return Err(Error::XmlStructure(format!(
                "expected ds:Signature, found {}",
                tag.name()
            )));
        }

        let signed_info =
            SignedInfo::from_node(require_child_element(node, ns::DSIG, ns::node::SIGNED_INFO)?)?;
        let signature_value = decode_base64_text(require_child_element(
            node,
            ns::DSIG,
            ns::node::SIGNATURE_VALUE,
        )?)?;
        let key_info = find_child_element(node, ns::DSIG, ns::node::KEY_INFO)
            .map(KeyInfo::from_node)
            .transpose()?;

        Ok(Self {
            id: node.attribute(ns::attr::ID).map(str::to_owned),
            signed_info,
            signature_value,
            key_info,
            node: node.id(),
        })
    }
}

impl SignedInfo {
    fn from_node(node: Node<'_, '_>) -> Result<Self, Error> {
        let canonicalization = TransformSpec::from_node(require_child_element(
            node,
            ns::DSIG,
            ns::node::CANONICALIZATION_METHOD,
        )?)?;
        let method = require_child_element(node, ns::DSIG, ns::node::SIGNATURE_METHOD)?;
        let signature_method = require_attribute(method, ns::attr::ALGORITHM)?.to_owned();

        let references = child_elements(node)
            .filter(|n| is_dsig(n, ns::node::REFERENCE))
            .map(Reference::from_node)
            .collect::<Result<Vec<_>, _>>()?;
        if references.is_empty() {
            return Err(Error::MissingElement("Reference in SignedInfo".into()));
        }

        Ok(Self {
            canonicalization,
            signature_method,
            references,
            node: node.id(),
        })
    }
}

impl Reference {
    fn from_node(node: Node<'_, '_>) -> Result<Self, Error> {
        let transforms = match find_child_element(node, ns::DSIG, ns::node::TRANSFORMS) {
            Some(list) => child_elements(list)
                .filter(|n| is_dsig(n, ns::node::TRANSFORM))
                .map(TransformSpec::from_node)
                .collect::<Result<Vec<_>, _>>()?,
            None => Vec::new(),
        };
        let method = require_child_element(node, ns::DSIG, ns::node::DIGEST_METHOD)?;
        let digest_method = require_attribute(method, ns::attr::ALGORITHM)?.to_owned();
        let digest_value =
            decode_base64_text(require_child_element(node, ns::DSIG, ns::node::DIGEST_VALUE)?)?;

        Ok(Self {
            id: node.attribute(ns::attr::ID).map(str::to_owned),
            uri: node.attribute(ns::attr::URI).map(str::to_owned),
            transforms,
            digest_method,
            digest_value,
        })
    }
}

impl TransformSpec {
    fn from_node(node: Node<'_, '_>) -> Result<Self, Error> {
        Ok(Self {
            algorithm: require_attribute(node, ns::attr::ALGORITHM)?.to_owned(),
            inclusive_prefixes: read_inclusive_prefixes(node),
        })
    }
}

fn is_dsig(node: &Node<'_, '_>, local_name: &str) -> bool {
    node.tag_name().namespace() == Some(ns::DSIG) && node.tag_name().name() == local_name
}

fn read_inclusive_prefixes(node: Node<'_, '_>) -> Vec<String> {
    find_child_element(node, ns::EXC_C14N, ns::node::INCLUSIVE_NAMESPACES)
        .and_then(|n| n.attribute(ns::attr::PREFIX_LIST))
        .map(|list| list.split_whitespace().map(str::to_owned).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use dsigcheck_core::algorithm;

    const SIGNATURE: &str = r##"<ds:Signature xmlns:ds="http://www.w3.org/2000/09/xmldsig#" Id="sig1">
  <ds:SignedInfo>
    <ds:CanonicalizationMethod Algorithm="http://www.w3.org/2001/10/xml-exc-c14n#">
      <ec:InclusiveNamespaces xmlns:ec="http://www.w3.org/2001/10/xml-exc-c14n#" PrefixList="a  #default b"/>
    </ds:CanonicalizationMethod>
    <ds:SignatureMethod Algorithm="http://www.w3.org/2000/09/xmldsig#dsa-sha1"/>
    <ds:Reference URI="">
      <ds:Transforms>
        <ds:Transform Algorithm="http://www.w3.org/2000/09/xmldsig#enveloped-signature"/>
      </ds:Transforms>
      <ds:DigestMethod Algorithm="http://www.w3.org/2000/09/xmldsig#sha1"/>
      <ds:DigestValue>AAEC
        Aw==</ds:DigestValue>
    </ds:Reference>
    <ds:Reference Id="r2">
      <ds:DigestMethod Algorithm="urn:example:unknown-digest"/>
      <ds:DigestValue>BA==</ds:DigestValue>
    </ds:Reference>
  </ds:SignedInfo>
  <ds:SignatureValue>
    BQYH
  </ds:SignatureValue>
</ds:Signature>"##;

    fn parse_signature(xml: &str) -> Result<XmlSignature, Error> {
        let doc = dsigcheck_xml::parse(xml).unwrap();
        XmlSignature::from_node(doc.root_element())
    }

    #[test]
    fn unmarshal_full_signature() {
        let sig = parse_signature(SIGNATURE).unwrap();
        assert_eq!(sig.id.as_deref(), Some("sig1"));
        assert_eq!(sig.signature_value, vec![5, 6, 7]);
        assert!(sig.key_info.is_none());

        let si = &sig.signed_info;
        assert_eq!(si.canonicalization.algorithm, algorithm::EXC_C14N);
        assert_eq!(si.canonicalization.inclusive_prefixes, ["a", "#default", "b"]);
        assert_eq!(si.signature_method, algorithm::DSA_SHA1);
        assert_eq!(si.references.len(), 2);

        let first = &si.references[0];
        assert_eq!(first.uri.as_deref(), Some(""));
        assert_eq!(first.transforms.len(), 1);
        assert_eq!(first.transforms[0].algorithm, algorithm::ENVELOPED_SIGNATURE);
        assert_eq!(first.digest_value, vec![0, 1, 2, 3]);

        let second = &si.references[1];
        assert_eq!(second.id.as_deref(), Some("r2"));
        assert_eq!(second.uri, None);
        assert!(second.transforms.is_empty());
        assert_eq!(second.digest_method, "urn:example:unknown-digest");
    }

    #[test]
    fn missing_signature_value() {
        let xml = SIGNATURE.replace("<ds:SignatureValue>\n    BQYH\n  </ds:SignatureValue>", "");
        let err = parse_signature(&xml).unwrap_err();
        assert!(matches!(err, Error::MissingElement(ref m) if m.starts_with("SignatureValue")));
    }

    #[test]
    fn signed_info_without_references() {
        let xml = r#"<Signature xmlns="http://www.w3.org/2000/09/xmldsig#">
  <SignedInfo>
    <CanonicalizationMethod Algorithm="http://www.w3.org/TR/2001/REC-xml-c14n-20010315"/>
    <SignatureMethod Algorithm="http://www.w3.org/2000/09/xmldsig#rsa-sha1"/>
  </SignedInfo>
  <SignatureValue>AA==</SignatureValue>
</Signature>"#;
        let err = parse_signature(xml).unwrap_err();
        assert!(matches!(err, Error::MissingElement(_)));
    }

    #[test]
    fn signature_method_requires_algorithm() {
        let xml = SIGNATURE.replace(
            r#"<ds:SignatureMethod Algorithm="http://www.w3.org/2000/09/xmldsig#dsa-sha1"/>"#,
            "<ds:SignatureMethod/>",
        );
        let err = parse_signature(&xml).unwrap_err();
        assert!(matches!(err, Error::MissingAttribute(_)));
    }

    #[test]
    fn bad_base64_digest_value() {
        let xml = SIGNATURE.replace("BA==", "!!!");
        assert!(matches!(parse_signature(&xml), Err(Error::Base64(_))));
    }

    #[test]
    fn rejects_non_signature_element() {
        let err = parse_signature("<ds:Other xmlns:ds=\"http://www.w3.org/2000/09/xmldsig#\"/>")
            .unwrap_err();
        assert!(matches!(err, Error::XmlStructure(_)));
    }

    #[test]
    fn key_info_is_read() {
        let xml = SIGNATURE.replace(
            "</ds:Signature>",
            "<ds:KeyInfo Id=\"ki\"><ds:KeyName>k</ds:KeyName></ds:KeyInfo></ds:Signature>",
        );
        let sig = parse_signature(&xml).unwrap();
        let key_info = sig.key_info.unwrap();
        assert_eq!(key_info.id.as_deref(), Some("ki"));
        assert!(key_info.content.is_empty());
    }
}
