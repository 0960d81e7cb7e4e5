#![forbid(unsafe_code)]

//! `X509Data` contents and public key extraction from certificates.
//!
//! Certificates are kept as DER and only parsed when their key is needed,
//! so a broken certificate is reported as a key-extraction failure at
//! selection time rather than making the whole signature unreadable.

use crate::key::PublicKey;
use dsigcheck_core::{ns, Error};
use dsigcheck_xml::document::{child_elements, decode_base64_text, element_text, require_child_element};

/// An `X509Data` element: its recognised children in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct X509Data {
    pub content: Vec<X509Item>,
}

/// One child of `X509Data`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum X509Item {
    Certificate(X509Certificate),
    SubjectName(String),
    IssuerSerial {
        issuer_name: String,
        serial_number: String,
    },
    Ski(Vec<u8>),
    Crl(Vec<u8>),
}

/// A DER-encoded X.509 certificate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct X509Certificate {
    der: Vec<u8>,
}

impl X509Certificate {
    pub fn from_der(der: Vec<u8>) -> Self {
        Self { der }
    }

    fn parse(&self) -> Result<x509_cert::Certificate, Error> {
        use der::Decode;
        x509_cert::Certificate::from_der(&self.der)
            .map_err(|e| Error::Certificate(format!("failed to parse X.509 certificate: {e}")))
    }

    /// The certificate's subject public key.
    pub fn public_key(&self) -> Result<PublicKey, Error> {
        use der::Encode;
        let cert = self.parse()?;
        let spki_der = cert
            .tbs_certificate
            .subject_public_key_info
            .to_der()
            .map_err(|e| Error::Certificate(format!("failed to encode SPKI: {e}")))?;
        PublicKey::from_spki_der(&spki_der)
    }
}

impl X509Data {
    /// Read an `X509Data` element. Children outside the recognised set
    /// (for example `dsig11:X509Digest`) are skipped.
    pub fn from_node(node: roxmltree::Node<'_, '_>) -> Result<Self, Error> {
        let mut content = Vec::new();
        for child in child_elements(node) {
            if child.tag_name().namespace() != Some(ns::DSIG) {
                tracing::debug!(element = child.tag_name().name(), "skipping foreign X509Data child");
                continue;
            }
            let item = match child.tag_name().name() {
                ns::node::X509_CERTIFICATE => {
                    X509Item::Certificate(X509Certificate::from_der(decode_base64_text(child)?))
                }
                ns::node::X509_SUBJECT_NAME => {
                    X509Item::SubjectName(element_text(child).trim().to_owned())
                }
                ns::node::X509_ISSUER_SERIAL => {
                    let issuer = require_child_element(child, ns::DSIG, ns::node::X509_ISSUER_NAME)?;
                    let serial = require_child_element(child, ns::DSIG, ns::node::X509_SERIAL_NUMBER)?;
                    X509Item::IssuerSerial {
                        issuer_name: element_text(issuer).trim().to_owned(),
                        serial_number: element_text(serial).trim().to_owned(),
                    }
                }
                ns::node::X509_SKI => X509Item::Ski(decode_base64_text(child)?),
                ns::node::X509_CRL => X509Item::Crl(decode_base64_text(child)?),
                other => {
                    tracing::debug!(element = other, "skipping unknown X509Data child");
                    continue;
                }
            };
            content.push(item);
        }
        Ok(Self { content })
    }

    /// The certificates, in document order.
    pub fn certificates(&self) -> impl Iterator<Item = &X509Certificate> {
        self.content.iter().filter_map(|item| match item {
            X509Item::Certificate(cert) => Some(cert),
            _ => None,
        })
    }
}
