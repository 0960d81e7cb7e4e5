#![forbid(unsafe_code)]

//! Exclusive Canonical XML 1.0 (exc-C14N).
//!
//! Algorithm URI: `http://www.w3.org/2001/10/xml-exc-c14n#`
//! With comments: `http://www.w3.org/2001/10/xml-exc-c14n#WithComments`
//!
//! Only visibly utilized namespaces are rendered: the prefix of the element
//! itself (or the default namespace for an unprefixed element), the prefixes
//! of its attributes, and any prefix named in the InclusiveNamespaces
//! PrefixList. `xml:*` attributes are never inherited.

use crate::render::{self, NsDecl, NsMap};
use dsigcheck_core::Error;
use dsigcheck_xml::document::{attribute_prefix, element_prefix};
use dsigcheck_xml::NodeSet;
use roxmltree::{Node, NodeType};
use std::collections::BTreeSet;

/// Token in a PrefixList that stands for the default namespace.
pub const DEFAULT_PREFIX_TOKEN: &str = "#default";

/// Canonicalize using Exclusive C14N 1.0.
pub fn canonicalize(
    doc: &roxmltree::Document<'_>,
    with_comments: bool,
    node_set: Option<&NodeSet>,
    inclusive_prefixes: &[String],
) -> Result<Vec<u8>, Error> {
    let inclusive_prefixes = inclusive_prefixes
        .iter()
        .map(|p| {
            if p == DEFAULT_PREFIX_TOKEN {
                String::new()
            } else {
                p.clone()
            }
        })
        .collect();
    let ctx = ExcC14nContext {
        with_comments,
        node_set,
        inclusive_prefixes,
    };
    let mut output = Vec::new();
    ctx.process_node(doc.root(), &mut output, &NsMap::new());
    Ok(output)
}

struct ExcC14nContext<'a> {
    with_comments: bool,
    node_set: Option<&'a NodeSet>,
    inclusive_prefixes: BTreeSet<String>,
}

impl ExcC14nContext<'_> {
    fn is_visible(&self, node: &Node<'_, '_>) -> bool {
        self.node_set.map_or(true, |set| set.contains(node))
    }

    fn process_node(&self, node: Node<'_, '_>, output: &mut Vec<u8>, rendered: &NsMap) {
        match node.node_type() {
            NodeType::Root => {
                for child in node.children() {
                    self.process_node(child, output, rendered);
                }
            }
            NodeType::Element => self.process_element(node, output, rendered),
            _ => {
                if self.is_visible(&node) {
                    render::write_leaf(&node, self.with_comments, output);
                }
            }
        }
    }

    /// Prefixes this element visibly utilizes, plus the inclusive ones.
    fn utilized_prefixes(&self, node: &Node<'_, '_>) -> BTreeSet<String> {
        let mut utilized = self.inclusive_prefixes.clone();
        utilized.insert(element_prefix(node).unwrap_or("").to_owned());
        for attr in node.attributes() {
            if let Some(prefix) = attribute_prefix(node, &attr) {
                if prefix != "xml" {
                    utilized.insert(prefix.to_owned());
                }
            }
        }
        utilized
    }

    fn process_element(&self, node: Node<'_, '_>, output: &mut Vec<u8>, rendered: &NsMap) {
        if !self.is_visible(&node) {
            for child in node.children() {
                self.process_node(child, output, rendered);
            }
            return;
        }

        let in_scope = render::in_scope_namespaces(&node);
        let mut decls = Vec::new();
        for prefix in self.utilized_prefixes(&node) {
            match in_scope.get(&prefix) {
                Some(uri) if rendered.get(&prefix) != Some(uri) => {
                    decls.push(NsDecl::new(&prefix, uri));
                }
                None if prefix.is_empty()
                    && rendered.get("").is_some_and(|uri| !uri.is_empty()) =>
                {
                    decls.push(NsDecl::new("", ""));
                }
                _ => {}
            }
        }
        decls.sort();

        let mut attrs = render::attributes(&node);
        attrs.sort();

        render::write_start_tag(&node, &decls, &attrs, output);

        let mut child_rendered = rendered.clone();
        for decl in &decls {
            child_rendered.insert(decl.prefix.clone(), decl.uri.clone());
        }
        for child in node.children() {
            self.process_node(child, output, &child_rendered);
        }
        render::write_end_tag(&node, output);
    }
}
