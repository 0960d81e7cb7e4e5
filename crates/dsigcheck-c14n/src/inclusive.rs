#![forbid(unsafe_code)]

//! Inclusive Canonical XML 1.0 (C14N 1.0).
//!
//! Algorithm URI: `http://www.w3.org/TR/2001/REC-xml-c14n-20010315`
//! With comments: `http://www.w3.org/TR/2001/REC-xml-c14n-20010315#WithComments`
//!
//! Every in-scope namespace is rendered on the first output element where
//! it differs from the nearest output ancestor. In a document subset, an
//! element whose parent is not output also picks up the `xml:*` attributes
//! of its ancestors.

use crate::render::{self, NsDecl, NsMap};
use dsigcheck_core::Error;
use dsigcheck_xml::NodeSet;
use roxmltree::{Node, NodeType};

/// Canonicalize a document using Inclusive C14N 1.0.
pub fn canonicalize(
    doc: &roxmltree::Document<'_>,
    with_comments: bool,
    node_set: Option<&NodeSet>,
) -> Result<Vec<u8>, Error> {
    let mut output = Vec::new();
    let ctx = C14nContext {
        with_comments,
        node_set,
    };
    ctx.process_node(doc.root(), &mut output, &NsMap::new());
    Ok(output)
}

struct C14nContext<'a> {
    with_comments: bool,
    node_set: Option<&'a NodeSet>,
}

impl C14nContext<'_> {
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

    fn process_element(&self, node: Node<'_, '_>, output: &mut Vec<u8>, rendered: &NsMap) {
        if !self.is_visible(&node) {
            // Output context stays that of the nearest visible ancestor.
            for child in node.children() {
                self.process_node(child, output, rendered);
            }
            return;
        }

        let in_scope = render::in_scope_namespaces(&node);
        let mut decls: Vec<NsDecl> = in_scope
            .iter()
            .filter(|(prefix, uri)| rendered.get(*prefix) != Some(*uri))
            .map(|(prefix, uri)| NsDecl::new(prefix, uri))
            .collect();
        if !in_scope.contains_key("") && rendered.get("").is_some_and(|uri| !uri.is_empty()) {
            decls.push(NsDecl::new("", ""));
        }
        decls.sort();

        let mut attrs = render::attributes(&node);
        if self.node_set.is_some() {
            let parent_hidden = node
                .parent()
                .map_or(true, |p| !p.is_element() || !self.is_visible(&p));
            if parent_hidden {
                let inherited = render::inherited_xml_attributes(&node, &attrs);
                attrs.extend(inherited);
            }
        }
        attrs.sort();

        render::write_start_tag(&node, &decls, &attrs, output);
        for child in node.children() {
            self.process_node(child, output, &in_scope);
        }
        render::write_end_tag(&node, output);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c14n(xml: &str, with_comments: bool) -> String {
        let doc = dsigcheck_xml::parse(xml).unwrap();
        String::from_utf8(canonicalize(&doc, with_comments, None).unwrap()).unwrap()
    }

    #[test]
    fn sorts_attributes_and_expands_empty_elements() {
        assert_eq!(
            c14n(r#"<root><a b="1" a="2"/></root>"#, false),
            r#"<root><a a="2" b="1"></a></root>"#
        );
    }

    #[test]
    fn drops_redundant_namespace_declarations() {
        let xml = r#"<a xmlns="urn:d" xmlns:p="urn:p"><p:b xmlns:p="urn:p"><c xmlns=""/></p:b></a>"#;
        assert_eq!(
            c14n(xml, false),
            r#"<a xmlns="urn:d" xmlns:p="urn:p"><p:b><c xmlns=""></c></p:b></a>"#
        );
    }

    #[test]
    fn escapes_text_and_attributes() {
        let xml = "<r a=\"&quot;x&#9;\">1 &lt; 2 &amp;&gt;</r>";
        assert_eq!(c14n(xml, false), "<r a=\"&quot;x&#x9;\">1 &lt; 2 &amp;&gt;</r>");
    }

    #[test]
    fn comments_and_pis_around_document_element() {
        let xml = "<?xml version=\"1.0\"?>\n<!--a-->\n<?pi data?>\n<r><!--b--></r>\n<!--c-->";
        assert_eq!(
            c14n(xml, true),
            "<!--a-->\n<?pi data?>\n<r><!--b--></r>\n<!--c-->"
        );
        assert_eq!(c14n(xml, false), "<?pi data?>\n<r></r>");
    }

    #[test]
    fn cdata_becomes_escaped_text() {
        assert_eq!(c14n("<r><![CDATA[<x>&]]></r>", false), "<r>&lt;x&gt;&amp;</r>");
    }

    #[test]
    fn subset_renders_inherited_namespaces_and_xml_attrs() {
        let xml = r#"<a xmlns="urn:d" xmlns:p="urn:p" xml:lang="en"><p:b Id="x"><c/></p:b></a>"#;
        let doc = dsigcheck_xml::parse(xml).unwrap();
        let b = doc.descendants().find(|n| n.has_tag_name(("urn:p", "b"))).unwrap();
        let set = NodeSet::tree(b, false);
        let out = canonicalize(&doc, false, Some(&set)).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            r#"<p:b xmlns="urn:d" xmlns:p="urn:p" Id="x" xml:lang="en"><c></c></p:b>"#
        );
    }

    #[test]
    fn subset_with_removed_subtree() {
        let xml = r#"<r><keep>1</keep><drop>2</drop></r>"#;
        let doc = dsigcheck_xml::parse(xml).unwrap();
        let mut set = NodeSet::all(&doc, false);
        let drop = doc.descendants().find(|n| n.has_tag_name("drop")).unwrap();
        set.remove_subtree(drop);
        let out = canonicalize(&doc, false, Some(&set)).unwrap();
        assert_eq!(out, b"<r><keep>1</keep></r>");
    }
}
