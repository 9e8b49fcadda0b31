//! Envelope scanning (panic-free).
//!
//! Only the envelope skeleton is parsed here. `Header` and `Body` contents
//! are kept as raw XML text so binding can decode them later against the
//! argument type.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{Result, RpcError};

use super::ENVELOPE_NS;

/// Raw envelope parts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Envelope {
    pub header: Option<String>,
    pub body: String,
}

/// The single element inside `Body`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodElement {
    /// Local tag name (prefix stripped).
    pub name: String,
    /// Inner XML, unparsed.
    pub params: String,
}

impl Envelope {
    pub fn parse(xml: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(xml)
            .map_err(|e| RpcError::Decode(format!("soap: envelope is not utf-8: {e}")))?;
        let mut reader = Reader::from_str(text);

        // Root element, skipping the XML declaration, comments and whitespace.
        let prefix = loop {
            match reader.read_event().map_err(xml_err)? {
                Event::Start(e) => {
                    check_envelope(&e)?;
                    break e.name().prefix().map(|p| p.as_ref().to_vec());
                }
                Event::Empty(e) => {
                    check_envelope(&e)?;
                    return Err(RpcError::Decode("soap: envelope has no Body".into()));
                }
                Event::Eof => return Err(RpcError::Decode("soap: missing Envelope".into())),
                _ => {}
            }
        };

        let mut env = Envelope::default();
        let mut saw_body = false;
        loop {
            match reader.read_event().map_err(xml_err)? {
                Event::Start(e) => {
                    let end = e.to_end().into_owned();
                    let inner = reader.read_text(end.name()).map_err(xml_err)?;
                    if is_envelope_child(&e, prefix.as_deref(), b"Body") {
                        env.body = inner.into_owned();
                        saw_body = true;
                    } else if is_envelope_child(&e, prefix.as_deref(), b"Header") {
                        env.header = Some(inner.into_owned());
                    }
                }
                Event::Empty(e) => {
                    if is_envelope_child(&e, prefix.as_deref(), b"Body") {
                        saw_body = true;
                    } else if is_envelope_child(&e, prefix.as_deref(), b"Header") {
                        env.header = Some(String::new());
                    }
                }
                Event::End(_) => break,
                Event::Eof => {
                    return Err(RpcError::Decode("soap: unterminated Envelope".into()))
                }
                _ => {}
            }
        }

        if !saw_body {
            return Err(RpcError::Decode("soap: envelope has no Body".into()));
        }
        Ok(env)
    }
}

impl MethodElement {
    /// Find the one element inside a raw `Body`.
    pub fn parse(body: &str) -> Result<Self> {
        let mut reader = Reader::from_str(body);
        let mut found: Option<MethodElement> = None;

        loop {
            let (name, params) = match reader.read_event().map_err(xml_err)? {
                Event::Start(e) => {
                    let end = e.to_end().into_owned();
                    let params = reader.read_text(end.name()).map_err(xml_err)?;
                    (local_name(&e)?, params.into_owned())
                }
                Event::Empty(e) => (local_name(&e)?, String::new()),
                Event::Eof => break,
                _ => continue,
            };
            if found.is_some() {
                return Err(RpcError::Decode(
                    "soap: Body must contain exactly one method element".into(),
                ));
            }
            found = Some(MethodElement { name, params });
        }

        found.ok_or_else(|| RpcError::UnresolvableMethod("soap: Body has no method element".into()))
    }
}

fn check_envelope(e: &BytesStart<'_>) -> Result<()> {
    if e.local_name().as_ref() != b"Envelope" {
        return Err(RpcError::Decode(format!(
            "soap: expected Envelope, got {}",
            String::from_utf8_lossy(e.name().as_ref())
        )));
    }

    let decl: Vec<u8> = match e.name().prefix() {
        Some(p) => [b"xmlns:".as_slice(), p.as_ref()].concat(),
        None => b"xmlns".to_vec(),
    };
    for attr in e.attributes() {
        let attr = attr.map_err(|err| RpcError::Decode(format!("soap: {err}")))?;
        if attr.key.as_ref() == decl.as_slice() && attr.value.as_ref() == ENVELOPE_NS.as_bytes() {
            return Ok(());
        }
    }
    Err(RpcError::Decode(format!(
        "soap: Envelope is not in namespace {ENVELOPE_NS}"
    )))
}

fn is_envelope_child(e: &BytesStart<'_>, prefix: Option<&[u8]>, local: &[u8]) -> bool {
    let name = e.name();
    e.local_name().as_ref() == local && name.prefix().map(|p| p.as_ref().to_vec()).as_deref() == prefix
}

fn local_name(e: &BytesStart<'_>) -> Result<String> {
    std::str::from_utf8(e.local_name().as_ref())
        .map(str::to_string)
        .map_err(|err| RpcError::Decode(format!("soap: element name is not utf-8: {err}")))
}

fn xml_err(e: quick_xml::Error) -> RpcError {
    tracing::debug!(error = %e, "soap: malformed xml");
    RpcError::Decode(format!("soap: {e}"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn prefixed_envelope_with_header() {
        let xml = br#"<?xml version="1.0"?>
<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/">
  <soap:Header><Token>abc</Token></soap:Header>
  <soap:Body>
    <GetPrice xmlns="http://www.example.com/stock"><StockName>IBM</StockName></GetPrice>
  </soap:Body>
</soap:Envelope>"#;

        let env = Envelope::parse(xml).unwrap();
        assert_eq!(env.header.as_deref(), Some("<Token>abc</Token>"));

        let call = MethodElement::parse(&env.body).unwrap();
        assert_eq!(call.name, "GetPrice");
        assert_eq!(call.params, "<StockName>IBM</StockName>");
    }

    #[test]
    fn wrong_namespace_is_rejected() {
        let xml = br#"<Envelope xmlns="urn:other"><Body><M/></Body></Envelope>"#;
        let err = Envelope::parse(xml).unwrap_err();
        assert_eq!(err.client_code().as_str(), "DECODE_ERROR");
    }

    #[test]
    fn empty_method_element_has_no_params() {
        let call = MethodElement::parse("  <Ping/>  ").unwrap();
        assert_eq!(call.name, "Ping");
        assert!(call.params.is_empty());
    }

    #[test]
    fn two_method_elements_are_rejected() {
        assert!(MethodElement::parse("<A/><B/>").is_err());
    }

    #[test]
    fn mismatched_inner_tags_fail_to_parse() {
        let xml = br#"<Envelope xmlns="http://schemas.xmlsoap.org/soap/envelope/"><Body><M><A>1</B></M></Body></Envelope>"#;
        assert!(Envelope::parse(xml).is_err());
    }
}
