//! SOAP codec behaviour.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use serde::{Deserialize, Serialize};

use httprpc_core::protocol::soap::{self, Fault};
use httprpc_core::protocol::{CodecRequest, Protocol, RawRequest};
use httprpc_core::{QueryBinding, RpcArgs};

#[derive(Debug, Default, PartialEq, Deserialize)]
struct MultiplyArgs {
    #[serde(rename = "A")]
    a: i32,
    #[serde(rename = "B")]
    b: i32,
}

impl RpcArgs for MultiplyArgs {}

#[derive(Debug, Serialize)]
struct MultiplyReply {
    #[serde(rename = "Result")]
    result: i32,
}

#[derive(Debug, Default, Deserialize)]
struct ClientReply {
    #[serde(rename = "Result", default)]
    result: i32,
    #[serde(rename = "Fault", default)]
    fault: Option<Fault>,
}

fn envelope(method_xml: &str) -> String {
    format!(
        r#"<Envelope xmlns="http://schemas.xmlsoap.org/soap/envelope/"><Body>{method_xml}</Body></Envelope>"#
    )
}

fn request(path: &str, method_xml: &str) -> CodecRequest {
    Protocol::Soap.new_request(RawRequest::new(path, None, envelope(method_xml)))
}

#[test]
fn multiply_resolves_and_binds() {
    let mut req = request("/Service1", "<Multiply><A>4</A><B>2</B></Multiply>");
    assert_eq!(req.method().unwrap().to_string(), "Service1.Multiply");

    let args: MultiplyArgs = req.read_request(&QueryBinding::new()).unwrap();
    assert_eq!(args, MultiplyArgs { a: 4, b: 2 });
}

#[test]
fn reply_becomes_the_body() {
    let req = request("/Service1", "<Multiply><A>4</A><B>2</B></Multiply>");
    let res = req.write_response(&MultiplyReply { result: 8 }).unwrap();
    assert_eq!(res.status, 200);
    assert_eq!(res.content_type, "application/soap+xml; charset=utf-8");
    assert_eq!(
        res.body_str(),
        r#"<Envelope xmlns="http://schemas.xmlsoap.org/soap/envelope/"><Body><Result>8</Result></Body></Envelope>"#
    );

    let reply: ClientReply = soap::decode_response(&res.body).unwrap();
    assert_eq!(reply.result, 8);
    assert!(reply.fault.is_none());
}

#[test]
fn handler_error_is_a_client_fault_with_400() {
    let req = request("/Service1", "<ResponseError><A>4</A><B>2</B></ResponseError>");
    let res = req.write_outcome::<MultiplyReply>(Err("response error".into()));
    assert_eq!(res.status, 400);

    let reply: ClientReply = soap::decode_response(&res.body).unwrap();
    let fault = reply.fault.expect("fault body");
    assert_eq!(fault.code, "Client");
    assert_eq!(fault.string, "response error");
    assert!(fault.detail.is_none());
}

#[test]
fn type_mismatch_short_circuits_as_client_fault() {
    let mut req = request("/Service1", "<Multiply><A>four</A><B>2</B></Multiply>");
    assert!(req.method().is_ok());

    let err = req
        .read_request::<MultiplyArgs>(&QueryBinding::new())
        .unwrap_err();
    assert_eq!(err.client_code().as_str(), "DECODE_ERROR");

    let res = req.write_outcome(Ok(MultiplyReply { result: 0 }));
    assert_eq!(res.status, 400);
    let reply: ClientReply = soap::decode_response(&res.body).unwrap();
    assert_eq!(reply.fault.unwrap().code, "Client");
}

#[test]
fn malformed_envelope_is_reported_by_method() {
    let req = request("/Service1", "<Multiply><A>4</B></Multiply>");
    let err = req.method().unwrap_err();
    let res = req.write_error(&err);
    assert_eq!(res.status, 400);
    let reply: ClientReply = soap::decode_response(&res.body).unwrap();
    assert!(reply.fault.unwrap().string.starts_with("decode error: soap:"));
}

#[test]
fn fault_detail_is_written_when_present() {
    let CodecRequest::Soap(req) = request("/Service1", "<Multiply/>") else {
        panic!("expected soap request");
    };
    let res = req.write_fault(&Fault::new("Server", "overloaded").with_detail("retry later"));
    assert_eq!(res.status, 400);
    assert_eq!(
        res.body_str(),
        concat!(
            r#"<Envelope xmlns="http://schemas.xmlsoap.org/soap/envelope/"><Body><Fault>"#,
            "<faultcode>Server</faultcode><faultstring>overloaded</faultstring>",
            "<detail>retry later</detail></Fault></Body></Envelope>"
        )
    );
}
