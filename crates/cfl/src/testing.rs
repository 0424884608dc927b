//! Canned-response client for command tests.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use cfl_confluence::{
    ClientOptions, ConfluenceClient, HttpRequest, HttpResponse, Method, Transport,
};
use serde_json::Value;

/// Requests seen by a [`QueueTransport`], as `(method, url, body)`.
#[derive(Clone, Default)]
pub(crate) struct Seen(Rc<RefCell<Vec<(Method, String, Option<Value>)>>>);

impl Seen {
    pub(crate) fn methods(&self) -> Vec<Method> {
        self.0.borrow().iter().map(|(m, _, _)| *m).collect()
    }

    pub(crate) fn url(&self, index: usize) -> String {
        self.0.borrow()[index].1.clone()
    }

    pub(crate) fn body(&self, index: usize) -> Value {
        self.0.borrow()[index].2.clone().unwrap_or(Value::Null)
    }
}

/// Replays `(status, body)` pairs in order.
struct QueueTransport {
    responses: RefCell<VecDeque<(u16, Value)>>,
    seen: Seen,
}

impl Transport for QueueTransport {
    fn send(&self, request: &HttpRequest<'_>) -> Result<HttpResponse, ureq::Error> {
        self.seen.0.borrow_mut().push((
            request.method,
            request.url.to_owned(),
            request.body.map(|b| serde_json::from_slice(b).unwrap()),
        ));
        let (status, body) = self.responses.borrow_mut().pop_front().unwrap();
        Ok(HttpResponse::new(status, body.to_string()))
    }
}

/// Client at `https://wiki.example.com` without retries.
pub(crate) fn client(responses: Vec<(u16, Value)>) -> (ConfluenceClient, Seen) {
    let seen = Seen::default();
    let transport = QueueTransport {
        responses: RefCell::new(responses.into()),
        seen: seen.clone(),
    };
    let options = ClientOptions {
        retries: 0,
        backoff: Duration::ZERO,
        ..ClientOptions::default()
    };
    let client = ConfluenceClient::with_transport(
        "https://wiki.example.com",
        "token",
        options,
        Box::new(transport),
    );
    (client, seen)
}
