//! HTTP export sink.

use cb_editor::export::check_status;
use cb_editor::{ExportPayload, SaveError};
use std::time::Duration;

pub struct HttpSink {
    client: reqwest::Client,
    endpoint: String,
    timeout: Duration,
}

impl HttpSink {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            timeout,
        })
    }

    /// POST the payload as JSON. Only a 2xx status counts as saved.
    pub async fn submit(&self, payload: &ExportPayload) -> Result<(), SaveError> {
        log::info!("posting drawing to {}", self.endpoint);
        let response = self
            .client
            .post(&self.endpoint)
            .json(payload)
            .send()
            .await
            .map_err(|err| self.classify(err))?;
        check_status(response.status().as_u16())
    }

    fn classify(&self, err: reqwest::Error) -> SaveError {
        if err.is_timeout() {
            SaveError::Timeout(self.timeout)
        } else {
            SaveError::Transport(err.to_string())
        }
    }
}
