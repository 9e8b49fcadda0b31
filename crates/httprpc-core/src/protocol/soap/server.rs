use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::Writer;
use serde::Serialize;

use crate::binding::RpcArgs;
use crate::error::{Result, RpcError};
use crate::method::MethodName;
use crate::protocol::{RawRequest, WireResponse};

use super::envelope::{Envelope, MethodElement};
use super::{decode_fragment, Fault, CONTENT_TYPE, ENVELOPE_NS};

const FAULT_STATUS: u16 = 400;
const FALLBACK_BODY: &[u8] = br#"<Envelope xmlns="http://schemas.xmlsoap.org/soap/envelope/"><Body><Fault><faultcode>Server</faultcode><faultstring>response encoding failed</faultstring></Fault></Body></Envelope>"#;

#[derive(Serialize)]
struct FaultBody<'a> {
    #[serde(rename = "Fault")]
    fault: &'a Fault,
}

/// One parsed SOAP request.
#[derive(Debug)]
pub struct SoapRequest {
    port: String,
    call: Option<MethodElement>,
    err: Option<RpcError>,
}

impl SoapRequest {
    pub fn parse(raw: RawRequest) -> Self {
        let Some(idx) = raw.path.rfind('/') else {
            return Self::failed(RpcError::MissingPort(raw.path));
        };
        let port = raw.path[idx + 1..].to_string();

        let parsed = Envelope::parse(&raw.body)
            .and_then(|env| MethodElement::parse(&env.body));
        match parsed {
            Ok(call) => Self {
                port,
                call: Some(call),
                err: None,
            },
            Err(err) => Self {
                port,
                ..Self::failed(err)
            },
        }
    }

    fn failed(err: RpcError) -> Self {
        Self {
            port: String::new(),
            call: None,
            err: Some(err),
        }
    }

    /// `Port.LocalMethodName`, or the recorded port/parse error.
    pub fn method(&self) -> Result<MethodName> {
        if let Some(err) = &self.err {
            return Err(err.clone());
        }
        let local = self.call.as_ref().map(|c| c.name.as_str()).unwrap_or_default();
        MethodName::new(self.port.as_str(), local)
    }

    /// Decode the method element's inner XML onto `A`.
    pub fn read_request<A: RpcArgs>(&mut self) -> Result<A> {
        if let Some(err) = &self.err {
            return Err(err.clone());
        }
        let params = self.call.as_ref().map(|c| c.params.as_str()).unwrap_or_default();
        decode_fragment::<A>(params).inspect_err(|err| {
            self.err = Some(err.clone());
        })
    }

    /// Reply becomes the `Body` of a fresh envelope.
    pub fn write_response<R: Serialize>(&self, reply: &R) -> Result<WireResponse> {
        if let Some(err) = &self.err {
            return Ok(self.write_error(err));
        }
        let body = quick_xml::se::to_string_with_root("Body", reply)
            .map_err(|e| RpcError::Encode(format!("soap: {e}")))?;
        Ok(WireResponse {
            status: 200,
            content_type: CONTENT_TYPE,
            body: wrap_envelope(&body)?,
        })
    }

    /// Handler failures are client faults, same as binding failures.
    pub fn write_handler_error(&self, message: &str) -> WireResponse {
        if let Some(err) = &self.err {
            return self.write_error(err);
        }
        self.write_fault(&Fault::new("", message))
    }

    pub fn write_error(&self, err: &RpcError) -> WireResponse {
        let code = if err.http_status() >= 500 { "Server" } else { "" };
        self.write_fault(&Fault::new(code, err.to_string()))
    }

    /// Fault envelope with status 400.
    pub fn write_fault(&self, fault: &Fault) -> WireResponse {
        let body = quick_xml::se::to_string_with_root("Body", &FaultBody { fault })
            .map_err(|e| RpcError::Encode(format!("soap: {e}")))
            .and_then(|b| wrap_envelope(&b))
            .unwrap_or_else(|_| FALLBACK_BODY.to_vec());
        WireResponse {
            status: FAULT_STATUS,
            content_type: CONTENT_TYPE,
            body,
        }
    }
}

fn wrap_envelope(body: &str) -> Result<Vec<u8>> {
    let mut writer = Writer::new(Vec::new());
    writer
        .write_event(Event::Start(
            BytesStart::new("Envelope").with_attributes([("xmlns", ENVELOPE_NS)]),
        ))
        .map_err(|e| RpcError::Encode(format!("soap: {e}")))?;
    writer.get_mut().extend_from_slice(body.as_bytes());
    writer
        .write_event(Event::End(BytesEnd::new("Envelope")))
        .map_err(|e| RpcError::Encode(format!("soap: {e}")))?;
    Ok(writer.into_inner())
}
