#![forbid(unsafe_code)]

//! XML document helpers for dsigcheck.
//!
//! Thin functions over `roxmltree`: element lookup, ID attribute maps,
//! recovering namespace prefixes from the source text, and the `NodeSet`
//! type used by canonicalization and reference transforms.

pub mod document;
pub mod nodeset;

pub use document::IdMap;
pub use nodeset::NodeSet;

use dsigcheck_core::Error;

/// Return roxmltree parsing options that allow DTD.
///
/// roxmltree never fetches external entities and only expands internal
/// ones, so accepting a DOCTYPE is safe.
pub fn parsing_options() -> roxmltree::ParsingOptions {
    roxmltree::ParsingOptions {
        allow_dtd: true,
        ..roxmltree::ParsingOptions::default()
    }
}

/// Parse XML text with [`parsing_options`].
pub fn parse(text: &str) -> Result<roxmltree::Document<'_>, Error> {
    roxmltree::Document::parse_with_options(text, parsing_options())
        .map_err(|e| Error::XmlParse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_internal_dtd() {
        let xml = r#"<!DOCTYPE r [ <!ATTLIST r Id ID #IMPLIED> ]><r Id="a"/>"#;
        let doc = parse(xml).unwrap();
        assert_eq!(doc.root_element().attribute("Id"), Some("a"));
    }

    #[test]
    fn parse_reports_malformed_input() {
        let err = parse("<r><unclosed></r>").unwrap_err();
        assert!(matches!(err, Error::XmlParse(_)));
    }
}
