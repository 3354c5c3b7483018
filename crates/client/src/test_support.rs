//! In-memory transport for exercising the pipeline without a server.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use ssassist_protocol::{ChatRequest, FeedbackRecord};

use crate::transport::{Transport, TransportError};

/// Scripted transport: chat responses are popped from a queue, feedback
/// attempts are recorded (even when scripted to fail).
#[derive(Default)]
pub(crate) struct MockTransport {
    chat_responses: Mutex<VecDeque<Result<String, TransportError>>>,
    chat_requests: Mutex<Vec<ChatRequest>>,
    feedback_records: Mutex<Vec<FeedbackRecord>>,
    feedback_failure: Mutex<Option<u16>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue_chat(&self, body: impl Into<String>) {
        self.chat_responses
            .lock()
            .unwrap()
            .push_back(Ok(body.into()));
    }

    pub fn queue_chat_error(&self, err: TransportError) {
        self.chat_responses.lock().unwrap().push_back(Err(err));
    }

    pub fn fail_feedback_with_status(&self, status: u16) {
        *self.feedback_failure.lock().unwrap() = Some(status);
    }

    /// Chat requests seen so far, in order.
    pub fn chat_requests(&self) -> Vec<ChatRequest> {
        self.chat_requests.lock().unwrap().clone()
    }

    /// Feedback submission attempts seen so far, in order.
    pub fn feedback_records(&self) -> Vec<FeedbackRecord> {
        self.feedback_records.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn chat(&self, request: &ChatRequest) -> Result<String, TransportError> {
        self.chat_requests.lock().unwrap().push(request.clone());
        self.chat_responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(TransportError::Other(
                    "no scripted chat response".to_string(),
                ))
            })
    }

    async fn feedback(&self, record: &FeedbackRecord) -> Result<(), TransportError> {
        self.feedback_records.lock().unwrap().push(record.clone());
        match *self.feedback_failure.lock().unwrap() {
            Some(status) => Err(TransportError::Status(status)),
            None => Ok(()),
        }
    }
}
