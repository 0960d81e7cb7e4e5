#![forbid(unsafe_code)]

//! Element lookup, text extraction and ID registration over a parsed
//! `roxmltree::Document`.

use base64::Engine;
use dsigcheck_core::{ns, Error};
use roxmltree::{Attribute, Document, Node, NodeId};
use std::collections::HashMap;

/// Maps ID attribute values to the element carrying them. A value carried by
/// more than one element maps to `None` and resolves to nothing.
pub type IdMap = HashMap<String, Option<NodeId>>;

/// Build the ID → NodeId mapping for a parsed document.
///
/// The default names `Id`, `ID` and `id` are always registered. Extra names
/// are matched against attributes without a namespace, or, when they carry a
/// prefix (`wsu:Id`), against the attribute's qualified name as written.
///
/// A value carried by two different elements is kept as unresolvable.
pub fn build_id_map(doc: &Document<'_>, extra_id_attrs: &[String]) -> IdMap {
    let mut map = IdMap::new();
    let mut register = |value: &str, node: &Node<'_, '_>| {
        let entry = map.entry(value.to_owned()).or_insert(Some(node.id()));
        if entry.is_some_and(|previous| previous != node.id()) {
            tracing::warn!(id = value, "duplicate ID attribute value, ID is unresolvable");
            *entry = None;
        }
    };
    for node in doc.descendants().filter(|n| n.is_element()) {
        for attr_name in ns::DEFAULT_ID_ATTRS {
            if let Some(val) = node.attribute(attr_name) {
                register(val, &node);
            }
        }
        for attr_name in extra_id_attrs {
            if attr_name.contains(':') {
                for attr in node.attributes() {
                    if attribute_qname(&node, &attr) == *attr_name {
                        register(attr.value(), &node);
                    }
                }
            } else if let Some(val) = node.attribute(attr_name.as_str()) {
                register(val, &node);
            }
        }
    }
    map
}

/// Find the element carrying a unique ID value.
pub fn find_by_id<'a, 'input>(
    doc: &'a Document<'input>,
    id_map: &IdMap,
    id: &str,
) -> Option<Node<'a, 'input>> {
    let node_id = id_map.get(id).copied().flatten()?;
    doc.get_node(node_id)
}

fn is_named(node: &Node<'_, '_>, ns: &str, local_name: &str) -> bool {
    node.is_element()
        && node.tag_name().name() == local_name
        && node.tag_name().namespace().unwrap_or("") == ns
}

/// Find all descendant elements with the given local name and namespace,
/// in document order.
pub fn find_elements<'a, 'input>(
    doc: &'a Document<'input>,
    ns: &str,
    local_name: &str,
) -> Vec<Node<'a, 'input>> {
    doc.descendants()
        .filter(|n| is_named(n, ns, local_name))
        .collect()
}

/// Find the first child element with the given namespace and local name.
pub fn find_child_element<'a, 'input>(
    node: Node<'a, 'input>,
    ns: &str,
    local_name: &str,
) -> Option<Node<'a, 'input>> {
    node.children().find(|n| is_named(n, ns, local_name))
}

/// Find a child element or fail with `Error::MissingElement`.
pub fn require_child_element<'a, 'input>(
    node: Node<'a, 'input>,
    ns: &str,
    local_name: &str,
) -> Result<Node<'a, 'input>, Error> {
    find_child_element(node, ns, local_name).ok_or_else(|| {
        Error::MissingElement(format!("{local_name} in {}", node.tag_name().name()))
    })
}

/// Iterate over the element children of a node.
pub fn child_elements<'a, 'input: 'a>(
    node: Node<'a, 'input>,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(|n| n.is_element())
}

/// Read a required attribute.
pub fn require_attribute<'a>(node: Node<'a, '_>, name: &str) -> Result<&'a str, Error> {
    node.attribute(name).ok_or_else(|| {
        Error::MissingAttribute(format!("{name} on {}", node.tag_name().name()))
    })
}

/// Concatenate all descendant text of an element.
pub fn element_text(node: Node<'_, '_>) -> String {
    node.descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect()
}

/// Decode base64 element content, ignoring embedded whitespace.
pub fn decode_base64_text(node: Node<'_, '_>) -> Result<Vec<u8>, Error> {
    decode_base64(&element_text(node))
        .map_err(|e| Error::Base64(format!("{}: {e}", node.tag_name().name())))
}

/// Decode a base64 string, ignoring embedded whitespace.
pub fn decode_base64(text: &str) -> Result<Vec<u8>, base64::DecodeError> {
    let clean: String = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    base64::engine::general_purpose::STANDARD.decode(clean)
}

/// Return the namespace prefix an element was written with, if any.
///
/// roxmltree resolves names to (namespace, local) pairs, so the prefix is
/// read back from the input text. Elements that came from entity expansion
/// do not map onto the input text; for those the prefix is looked up from
/// the in-scope declarations instead.
pub fn element_prefix<'input>(node: &Node<'_, 'input>) -> Option<&'input str> {
    let text = node.document().input_text();
    let local = node.tag_name().name();
    let written = text
        .get(node.range().start..)
        .and_then(|s| s.strip_prefix('<'))
        .map(|s| {
            let end = s
                .find(|c: char| c.is_ascii_whitespace() || c == '/' || c == '>')
                .unwrap_or(s.len());
            &s[..end]
        });
    match written.map(|qname| qname.split_once(':')) {
        Some(Some((prefix, name))) if name == local => Some(prefix),
        Some(None) if written == Some(local) => None,
        _ => node
            .tag_name()
            .namespace()
            .and_then(|uri| node.lookup_prefix(uri)),
    }
}

/// Return the qualified element name (`prefix:local` or `local`).
pub fn element_qname(node: &Node<'_, '_>) -> String {
    match element_prefix(node) {
        Some(prefix) => format!("{prefix}:{}", node.tag_name().name()),
        None => node.tag_name().name().to_owned(),
    }
}

/// Return the namespace prefix of an attribute, if it has one.
pub fn attribute_prefix<'input>(
    node: &Node<'_, 'input>,
    attr: &Attribute<'_, 'input>,
) -> Option<&'input str> {
    let uri = attr.namespace()?;
    if uri == ns::XML {
        return Some("xml");
    }
    let written = node.document().input_text().get(attr.range_qname());
    match written.and_then(|q| q.split_once(':')) {
        Some((prefix, name)) if name == attr.name() => Some(prefix),
        _ => node.lookup_prefix(uri),
    }
}

/// Return the qualified attribute name (`prefix:local` or `local`).
pub fn attribute_qname(node: &Node<'_, '_>, attr: &Attribute<'_, '_>) -> String {
    match attribute_prefix(node, attr) {
        Some(prefix) => format!("{prefix}:{}", attr.name()),
        None => attr.name().to_owned(),
    }
}
