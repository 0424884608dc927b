//! Scripted transport for client tests.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use serde_json::Value;

use crate::client::{ClientOptions, ConfluenceClient, HttpRequest, HttpResponse, Method, Transport};

/// Request as seen by the transport.
#[derive(Debug, Clone)]
pub(crate) struct RecordedCall {
    pub method: Method,
    pub url: String,
    pub authorization: String,
    pub body: Option<Value>,
}

/// Shared view of the calls a [`ScriptedTransport`] received.
#[derive(Clone, Default)]
pub(crate) struct Calls(Rc<RefCell<Vec<RecordedCall>>>);

impl Calls {
    pub(crate) fn count(&self) -> usize {
        self.0.borrow().len()
    }

    pub(crate) fn all(&self) -> Vec<RecordedCall> {
        self.0.borrow().clone()
    }

    pub(crate) fn last(&self) -> RecordedCall {
        self.0.borrow().last().cloned().expect("no calls recorded")
    }

    pub(crate) fn with_method(&self, method: Method) -> Vec<RecordedCall> {
        self.all().into_iter().filter(|c| c.method == method).collect()
    }
}

/// Transport that replays queued responses in order.
pub(crate) struct ScriptedTransport {
    responses: RefCell<VecDeque<Result<HttpResponse, ureq::Error>>>,
    calls: Calls,
}

impl ScriptedTransport {
    /// Client against `https://wiki.example.com` with zero backoff.
    pub(crate) fn client(
        responses: Vec<Result<HttpResponse, ureq::Error>>,
        retries: u32,
    ) -> (ConfluenceClient, Calls) {
        Self::client_at("https://wiki.example.com", responses, retries)
    }

    pub(crate) fn client_at(
        base_url: &str,
        responses: Vec<Result<HttpResponse, ureq::Error>>,
        retries: u32,
    ) -> (ConfluenceClient, Calls) {
        let calls = Calls::default();
        let transport = Self {
            responses: RefCell::new(responses.into()),
            calls: calls.clone(),
        };
        let options = ClientOptions {
            retries,
            backoff: Duration::ZERO,
            ..ClientOptions::default()
        };
        let client =
            ConfluenceClient::with_transport(base_url, "secret-token", options, Box::new(transport));
        (client, calls)
    }
}

impl Transport for ScriptedTransport {
    fn send(&self, request: &HttpRequest<'_>) -> Result<HttpResponse, ureq::Error> {
        self.calls.0.borrow_mut().push(RecordedCall {
            method: request.method,
            url: request.url.to_owned(),
            authorization: request.authorization.to_owned(),
            body: request
                .body
                .map(|b| serde_json::from_slice(b).expect("request body is JSON")),
        });
        self.responses
            .borrow_mut()
            .pop_front()
            .expect("no scripted response left")
    }
}

/// Connection failure as raised by the HTTP stack.
pub(crate) fn network_error() -> ureq::Error {
    ureq::Error::Io(std::io::Error::new(
        std::io::ErrorKind::ConnectionRefused,
        "connection refused",
    ))
}

/// 200 response with a JSON body.
pub(crate) fn ok(body: &Value) -> Result<HttpResponse, ureq::Error> {
    Ok(HttpResponse::new(200, body.to_string()))
}
