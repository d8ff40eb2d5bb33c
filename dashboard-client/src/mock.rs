use crate::error::ClientError;
use crate::transport::{AdminTransport, ApiRequest};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Records every request and answers from a queue of canned `data` payloads.
#[derive(Default)]
pub struct RecordingTransport {
    pub requests: Mutex<Vec<ApiRequest>>,
    responses: Mutex<VecDeque<Result<Value, ClientError>>>,
}

impl RecordingTransport {
    pub fn replying(responses: Vec<Value>) -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            responses: Mutex::new(responses.into_iter().map(Ok).collect()),
        }
    }

    pub fn failing(status: u16) -> Self {
        let transport = Self::default();
        transport.responses.lock().unwrap().push_back(Err(ClientError::Status {
            status,
            body: "boom".into(),
        }));
        transport
    }

    pub fn last(&self) -> ApiRequest {
        self.requests.lock().unwrap().last().cloned().expect("no request sent")
    }

    pub fn count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl AdminTransport for RecordingTransport {
    async fn send(&self, request: ApiRequest) -> Result<Value, ClientError> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(Value::Null))
    }
}
