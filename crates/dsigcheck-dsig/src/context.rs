#![forbid(unsafe_code)]

//! Validation context: what an engine needs besides the signature itself.

use dsigcheck_keys::KeySelector;
use dsigcheck_xml::IdMap;
use roxmltree::{Document, Node};

/// Binds one `Signature` element to its document, the key selector and the
/// document's ID map.
pub struct ValidateContext<'a, 'input> {
    /// The parsed document holding the signature.
    pub doc: &'a Document<'input>,
    /// The `ds:Signature` element being validated.
    pub signature: Node<'a, 'input>,
    /// Called back when the engine needs the verification key.
    pub key_selector: &'a dyn KeySelector,
    /// ID attribute values for same-document URI resolution.
    pub id_map: &'a IdMap,
}

impl<'a, 'input> ValidateContext<'a, 'input> {
    pub fn new(
        doc: &'a Document<'input>,
        signature: Node<'a, 'input>,
        key_selector: &'a dyn KeySelector,
        id_map: &'a IdMap,
    ) -> Self {
        Self {
            doc,
            signature,
            key_selector,
            id_map,
        }
    }
}
