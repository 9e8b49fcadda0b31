//! Dispatcher never invokes a handler once parsing or binding has failed.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use httprpc_core::protocol::{Protocol, RawRequest};
use httprpc_core::{QueryBinding, RpcArgs};
use httprpc_gateway::dispatch::Dispatcher;

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct Pair {
    #[serde(rename = "A")]
    a: i32,
    #[serde(rename = "B")]
    b: i32,
}

impl RpcArgs for Pair {
    fn query_binding() -> QueryBinding<Self> {
        QueryBinding::<Self>::new().field("A", |p, v| p.a = v.parse().unwrap_or_default())
    }
}

fn counting_dispatcher() -> (Dispatcher, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let dispatcher = Dispatcher::new();
    let seen = Arc::clone(&calls);
    dispatcher
        .register("Counter.Add", move |p: Pair| {
            let seen = Arc::clone(&seen);
            async move {
                seen.fetch_add(1, Ordering::SeqCst);
                Ok::<_, String>(p.a + p.b)
            }
        })
        .unwrap();
    (dispatcher, calls)
}

fn soap(inner: &str) -> String {
    format!(r#"<Envelope xmlns="http://schemas.xmlsoap.org/soap/envelope/"><Body>{inner}</Body></Envelope>"#)
}

#[tokio::test]
async fn well_formed_requests_reach_the_handler() {
    let (dispatcher, calls) = counting_dispatcher();

    let mut req = Protocol::Soap.new_request(RawRequest::new(
        "/rpc/Counter",
        None,
        soap("<Add><A>2</A><B>3</B></Add>"),
    ));
    let res = dispatcher.dispatch(&mut req).await;
    assert_eq!(res.status, 200);

    let mut req = Protocol::Rest.new_request(RawRequest::new(
        "/rpc",
        Some("_rest_method=Counter.Add&A=4"),
        r#"{"B":1}"#,
    ));
    let res = dispatcher.dispatch(&mut req).await;
    assert_eq!(res.status, 200);
    assert!(res.body_str().contains(r#""result":5"#), "{}", res.body_str());

    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn malformed_soap_arguments_skip_the_handler() {
    let (dispatcher, calls) = counting_dispatcher();

    for inner in ["<Add><A>x</A></Add>", "<Add><A>1</B></Add>", "<Add/><Add/>"] {
        let mut req = Protocol::Soap.new_request(RawRequest::new("/rpc/Counter", None, soap(inner)));
        let res = dispatcher.dispatch(&mut req).await;
        assert_eq!(res.status, 400, "{inner}");
        assert!(res.body_str().contains("<faultcode>Client</faultcode>"), "{inner}");
    }

    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn malformed_rest_body_skips_the_handler() {
    let (dispatcher, calls) = counting_dispatcher();

    let mut req = Protocol::Rest.new_request(RawRequest::new(
        "/rpc",
        Some("_rest_method=Counter.Add&A=1"),
        "{not json",
    ));
    let res = dispatcher.dispatch(&mut req).await;
    assert_eq!(res.status, 400);
    assert!(res.body_str().contains("decode error"), "{}", res.body_str());

    let mut req = Protocol::Rest.new_request(RawRequest::new("/rpc", Some("A=1"), ""));
    let res = dispatcher.dispatch(&mut req).await;
    assert_eq!(res.status, 400);

    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn jsonrpc_missing_method_is_an_invalid_request() {
    let (dispatcher, calls) = counting_dispatcher();

    let mut req = Protocol::JsonRpc.new_request(RawRequest::new(
        "/rpc",
        None,
        r#"{"jsonrpc":"2.0","params":{"A":1},"id":3}"#,
    ));
    let res = dispatcher.dispatch(&mut req).await;
    let v: serde_json::Value = serde_json::from_slice(&res.body).unwrap();
    assert_eq!(v["error"]["code"], -32600);
    assert_eq!(v["id"], 3);

    assert_eq!(calls.load(Ordering::SeqCst), 0);
}
