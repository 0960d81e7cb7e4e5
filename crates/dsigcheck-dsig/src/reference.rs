#![forbid(unsafe_code)]

//! Same-document reference URIs.
//!
//! Supported forms:
//! - `""`: the whole document, without comments
//! - `#id`: the element with that ID and its subtree, without comments
//! - `#xpointer(/)`: the whole document, with comments
//! - `#xpointer(id('id'))`: the element with that ID, with comments
//!
//! Anything else points outside the document and is rejected.

use dsigcheck_core::Error;
use dsigcheck_xml::{document::find_by_id, IdMap, NodeSet};
use roxmltree::Document;

/// What a reference URI selects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target<'u> {
    Document { with_comments: bool },
    Element { id: &'u str, with_comments: bool },
}

/// Parse a reference URI into the part of the document it selects.
pub fn parse_uri(uri: &str) -> Result<Target<'_>, Error> {
    if uri.is_empty() {
        return Ok(Target::Document {
            with_comments: false,
        });
    }
    let fragment = uri
        .strip_prefix('#')
        .ok_or_else(|| Error::InvalidUri(format!("external URI not supported: {uri}")))?;

    if fragment == "xpointer(/)" {
        return Ok(Target::Document {
            with_comments: true,
        });
    }
    if let Some(inner) = fragment
        .strip_prefix("xpointer(id(")
        .and_then(|rest| rest.strip_suffix("))"))
    {
        let id = strip_quotes(inner)
            .ok_or_else(|| Error::InvalidUri(format!("malformed XPointer: {uri}")))?;
        return Ok(Target::Element {
            id,
            with_comments: true,
        });
    }
    if fragment.is_empty() || fragment.starts_with("xpointer(") {
        return Err(Error::InvalidUri(format!("unsupported fragment: {uri}")));
    }
    Ok(Target::Element {
        id: fragment,
        with_comments: false,
    })
}

fn strip_quotes(s: &str) -> Option<&str> {
    s.strip_prefix('\'')
        .and_then(|r| r.strip_suffix('\''))
        .or_else(|| s.strip_prefix('"').and_then(|r| r.strip_suffix('"')))
        .filter(|id| !id.is_empty())
}

/// Resolve a reference URI to the node set it selects.
pub fn dereference(uri: &str, doc: &Document<'_>, id_map: &IdMap) -> Result<NodeSet, Error> {
    match parse_uri(uri)? {
        Target::Document { with_comments } => Ok(NodeSet::all(doc, with_comments)),
        Target::Element { id, with_comments } => {
            let node = find_by_id(doc, id_map, id).ok_or_else(|| match id_map.get(id) {
                Some(None) => Error::InvalidUri(format!("ID '{id}' is not unique")),
                _ => Error::InvalidUri(format!("no element with ID '{id}'")),
            })?;
            tracing::debug!(id, element = node.tag_name().name(), "resolved same-document reference");
            Ok(NodeSet::tree(node, with_comments))
        }
    }
}
