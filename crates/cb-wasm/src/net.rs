//! Fetching image bytes and posting the export payload.

use cb_editor::SaveError;
use cb_editor::export::check_status;
use futures::future::{Either, select};
use gloo_net::http::Request;
use gloo_timers::future::TimeoutFuture;
use std::time::Duration;
use web_sys::AbortController;

/// GET a resource as raw bytes. `data:` and `blob:` URLs work as well.
pub async fn fetch_bytes(src: &str) -> Result<Vec<u8>, String> {
    let response = Request::get(src).send().await.map_err(|e| e.to_string())?;
    if !response.ok() {
        return Err(format!("HTTP {}", response.status()));
    }
    response.binary().await.map_err(|e| e.to_string())
}

/// POST a JSON body, giving up after `timeout`.
pub async fn post_json(endpoint: &str, body: String, timeout: Duration) -> Result<(), SaveError> {
    let controller = AbortController::new().ok();
    let signal = controller.as_ref().map(AbortController::signal);
    let request = Request::post(endpoint)
        .header("Content-Type", "application/json")
        .abort_signal(signal.as_ref())
        .body(body)
        .map_err(|e| SaveError::Transport(e.to_string()))?;

    let send = Box::pin(request.send());
    let timer = Box::pin(TimeoutFuture::new(timeout_millis(timeout)));
    match select(send, timer).await {
        Either::Left((Ok(response), _)) => check_status(response.status()),
        Either::Left((Err(err), _)) => Err(SaveError::Transport(err.to_string())),
        Either::Right(((), _)) => {
            if let Some(controller) = controller {
                controller.abort();
            }
            Err(SaveError::Timeout(timeout))
        }
    }
}

/// Browser timers take a `u32` millisecond count.
pub fn timeout_millis(timeout: Duration) -> u32 {
    u32::try_from(timeout.as_millis()).unwrap_or(u32::MAX)
}
