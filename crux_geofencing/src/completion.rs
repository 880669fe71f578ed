//! Turns a success/error callback pair into a future.
//!
//! Native bridges usually report back through two callbacks. [`completion`] creates a
//! [`Completer`] to hand out as those callbacks and a [`Completion`] future that resolves with
//! whichever of them fires first. Later calls are ignored.
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

use futures::FutureExt;
use futures::channel::oneshot;
use serde_json::{Value, json};

use crate::NativeOutcome;

/// Create a connected [`Completer`] and [`Completion`].
pub fn completion() -> (Completer, Completion) {
    let (sender, receiver) = oneshot::channel();
    (
        Completer {
            sender: Arc::new(Mutex::new(Some(sender))),
        },
        Completion { receiver },
    )
}

/// The sending half of a native call. Clones share the same call.
#[derive(Clone, Debug)]
pub struct Completer {
    sender: Arc<Mutex<Option<oneshot::Sender<NativeOutcome>>>>,
}

impl Completer {
    /// Resolve the call with a success value.
    ///
    /// Returns false if the call was already resolved.
    pub fn succeed(&self, payload: Value) -> bool {
        self.complete(Ok(payload))
    }

    /// Resolve the call with an error value.
    ///
    /// Returns false if the call was already resolved.
    pub fn fail(&self, error: Value) -> bool {
        self.complete(Err(error))
    }

    fn complete(&self, outcome: NativeOutcome) -> bool {
        let sender = self
            .sender
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
        let Some(sender) = sender else {
            tracing::warn!(?outcome, "Native call completed more than once, ignoring");
            return false;
        };
        // The receiver may be gone if nobody waits for the result any more.
        if sender.send(outcome).is_err() {
            tracing::debug!("Native call completed after its result was dropped");
        }
        true
    }
}

/// The result of a native call.
///
/// If every [`Completer`] is dropped without resolving the call, this resolves with a
/// `nativeFailure` error.
#[derive(Debug)]
#[must_use = "futures do nothing unless polled"]
pub struct Completion {
    receiver: oneshot::Receiver<NativeOutcome>,
}

impl Future for Completion {
    type Output = NativeOutcome;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.receiver.poll_unpin(cx).map(|result| {
            result.unwrap_or_else(|oneshot::Canceled| {
                tracing::warn!("Native call was dropped without completing");
                Err(json!({
                    "code": "nativeFailure",
                    "message": "The native call was dropped without completing",
                }))
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;

    use super::*;
    use crate::{GeofenceError, GeofenceResponse};

    #[test]
    fn resolves_with_success() {
        let (completer, completion) = completion();
        assert!(completer.succeed(json!("OK")));
        assert_eq!(block_on(completion), Ok(json!("OK")));
    }

    #[test]
    fn first_completion_wins() {
        let (completer, completion) = completion();
        let on_error = completer.clone();
        assert!(on_error.fail(json!("denied")));
        assert!(!completer.succeed(Value::Null));
        assert!(!on_error.fail(json!("notDetermined")));
        assert_eq!(block_on(completion), Err(json!("denied")));
    }

    #[test]
    fn dropped_completer_is_a_native_failure() {
        let (completer, completion) = completion();
        drop(completer);
        let response = GeofenceResponse::from_outcome(block_on(completion));
        assert!(matches!(
            response,
            GeofenceResponse::Failure(GeofenceError::NativeFailure { .. })
        ));
    }

    #[test]
    fn completing_without_a_waiter_is_fine() {
        let (completer, completion) = completion();
        drop(completion);
        assert!(completer.succeed(Value::Null));
        assert!(!completer.succeed(Value::Null));
    }
}
