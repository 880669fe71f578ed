//! Stub bridge for shells without a native geofencing layer, e.g. desktop or CI builds.
//!
//! Every call fails with a `nativeFailure` error.
use futures::FutureExt;
use futures::future::{self, LocalBoxFuture};
use serde_json::json;

use crate::{BridgeCall, NativeBridge, NativeOutcome};

/// A bridge which rejects every call.
#[derive(Clone, Copy, Debug, Default)]
pub struct StubBridge;

impl NativeBridge for StubBridge {
    fn exec(&self, call: BridgeCall) -> LocalBoxFuture<'static, NativeOutcome> {
        tracing::warn!(action = %call.action, "Geofencing call on stub bridge");
        future::ready(Err(json!({
            "code": "nativeFailure",
            "message": "Geofencing is not available on this platform",
        })))
        .boxed_local()
    }
}
