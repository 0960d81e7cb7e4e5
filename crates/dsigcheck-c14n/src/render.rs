#![forbid(unsafe_code)]

//! Rendering pieces shared by both canonicalization variants.

use crate::escape;
use dsigcheck_core::ns;
use dsigcheck_xml::document::{attribute_qname, element_qname};
use roxmltree::{Node, NodeType};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Namespace bindings keyed by prefix (`""` for the default namespace).
pub type NsMap = BTreeMap<String, String>;

/// A namespace declaration to be rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NsDecl {
    /// The prefix ("" for default namespace).
    pub prefix: String,
    /// The namespace URI ("" undeclares the default namespace).
    pub uri: String,
}

impl NsDecl {
    pub fn new(prefix: &str, uri: &str) -> Self {
        Self {
            prefix: prefix.to_owned(),
            uri: uri.to_owned(),
        }
    }

    fn write(&self, out: &mut Vec<u8>) {
        if self.prefix.is_empty() {
            out.extend_from_slice(b" xmlns=\"");
        } else {
            out.extend_from_slice(b" xmlns:");
            out.extend_from_slice(self.prefix.as_bytes());
            out.extend_from_slice(b"=\"");
        }
        out.extend_from_slice(escape::escape_attr(&self.uri).as_bytes());
        out.push(b'"');
    }
}

// Default namespace first, then by prefix.
impl Ord for NsDecl {
    fn cmp(&self, other: &Self) -> Ordering {
        self.prefix.cmp(&other.prefix)
    }
}

impl PartialOrd for NsDecl {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// An attribute to be rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attr {
    /// The namespace URI of the attribute ("" for no namespace).
    pub ns_uri: String,
    pub local_name: String,
    /// The name as written (`prefix:local` or `local`).
    pub qualified_name: String,
    pub value: String,
}

impl Attr {
    fn write(&self, out: &mut Vec<u8>) {
        out.push(b' ');
        out.extend_from_slice(self.qualified_name.as_bytes());
        out.extend_from_slice(b"=\"");
        out.extend_from_slice(escape::escape_attr(&self.value).as_bytes());
        out.push(b'"');
    }
}

// Sorted by (namespace URI, local name); unqualified attributes have the
// empty URI and therefore come first.
impl Ord for Attr {
    fn cmp(&self, other: &Self) -> Ordering {
        self.ns_uri
            .cmp(&other.ns_uri)
            .then_with(|| self.local_name.cmp(&other.local_name))
    }
}

impl PartialOrd for Attr {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// The namespaces in scope at an element, excluding the implicit `xml`
/// binding and an undeclared default namespace.
pub fn in_scope_namespaces(node: &Node<'_, '_>) -> NsMap {
    node.namespaces()
        .filter(|n| n.name() != Some("xml") && !n.uri().is_empty())
        .map(|n| (n.name().unwrap_or("").to_owned(), n.uri().to_owned()))
        .collect()
}

/// The attribute axis of an element.
pub fn attributes(node: &Node<'_, '_>) -> Vec<Attr> {
    node.attributes()
        .map(|a| Attr {
            ns_uri: a.namespace().unwrap_or("").to_owned(),
            local_name: a.name().to_owned(),
            qualified_name: attribute_qname(node, &a),
            value: a.value().to_owned(),
        })
        .collect()
}

/// `xml:*` attributes of the ancestors that `node` does not set itself,
/// nearest ancestor winning.
pub fn inherited_xml_attributes(node: &Node<'_, '_>, own: &[Attr]) -> Vec<Attr> {
    let mut inherited: BTreeMap<&str, &str> = BTreeMap::new();
    for ancestor in node.ancestors().skip(1).filter(|n| n.is_element()) {
        for attr in ancestor.attributes() {
            if attr.namespace() == Some(ns::XML) {
                inherited.entry(attr.name()).or_insert(attr.value());
            }
        }
    }
    inherited
        .into_iter()
        .filter(|(name, _)| {
            !own.iter()
                .any(|a| a.ns_uri == ns::XML && a.local_name == *name)
        })
        .map(|(name, value)| Attr {
            ns_uri: ns::XML.to_owned(),
            local_name: name.to_owned(),
            qualified_name: format!("xml:{name}"),
            value: value.to_owned(),
        })
        .collect()
}

/// Write `<name decls attrs>`; `decls` and `attrs` must already be sorted.
pub fn write_start_tag(node: &Node<'_, '_>, decls: &[NsDecl], attrs: &[Attr], out: &mut Vec<u8>) {
    out.push(b'<');
    out.extend_from_slice(element_qname(node).as_bytes());
    for decl in decls {
        decl.write(out);
    }
    for attr in attrs {
        attr.write(out);
    }
    out.push(b'>');
}

pub fn write_end_tag(node: &Node<'_, '_>, out: &mut Vec<u8>) {
    out.extend_from_slice(b"</");
    out.extend_from_slice(element_qname(node).as_bytes());
    out.push(b'>');
}

/// Write a text, comment or processing-instruction node.
///
/// Comments and PIs outside the document element are separated from it by
/// a line feed. Text outside the document element is never output.
pub fn write_leaf(node: &Node<'_, '_>, with_comments: bool, out: &mut Vec<u8>) {
    let top_level = node.parent().is_some_and(|p| p.is_root());
    match node.node_type() {
        NodeType::Text if !top_level => {
            out.extend_from_slice(escape::escape_text(node.text().unwrap_or("")).as_bytes());
        }
        NodeType::Comment if with_comments => {
            let body = node.text().unwrap_or("");
            write_delimited(node, top_level, out, |out| {
                out.extend_from_slice(b"<!--");
                out.extend_from_slice(body.as_bytes());
                out.extend_from_slice(b"-->");
            });
        }
        NodeType::PI => {
            if let Some(pi) = node.pi() {
                write_delimited(node, top_level, out, |out| {
                    out.extend_from_slice(b"<?");
                    out.extend_from_slice(pi.target.as_bytes());
                    if let Some(value) = pi.value.filter(|v| !v.is_empty()) {
                        out.push(b' ');
                        out.extend_from_slice(escape::escape_pi(value).as_bytes());
                    }
                    out.extend_from_slice(b"?>");
                });
            }
        }
        _ => {}
    }
}

fn write_delimited(
    node: &Node<'_, '_>,
    top_level: bool,
    out: &mut Vec<u8>,
    body: impl FnOnce(&mut Vec<u8>),
) {
    if top_level && node.prev_siblings().any(|s| s.is_element()) {
        out.push(b'\n');
    }
    body(out);
    if top_level && node.next_siblings().any(|s| s.is_element()) {
        out.push(b'\n');
    }
}
