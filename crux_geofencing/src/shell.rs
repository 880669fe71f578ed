use std::future::Future;

use serde_json::Value;

use crate::{BridgeConfig, GeofenceOperation, GeofenceResponse, NativeBridge, NativeOutcome};

/// Handler for the error value of a native call.
pub type ErrorCallback = Box<dyn FnOnce(Value)>;

/// Carries out geofencing operations for the shell by calling the native plugin.
///
/// The shell takes the operation out of a `Request<GeofenceOperation>`, awaits
/// [`GeofencingShell::dispatch`] and resolves the request with the response.
pub struct GeofencingShell<B> {
    bridge: B,
    config: BridgeConfig,
}

impl<B: NativeBridge> GeofencingShell<B> {
    pub fn new(bridge: B) -> Self {
        Self::with_config(bridge, BridgeConfig::default())
    }

    pub fn with_config(bridge: B, config: BridgeConfig) -> Self {
        Self { bridge, config }
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Call the native plugin and wait for its answer.
    ///
    /// The call is issued immediately; the returned future only waits for the answer.
    pub fn dispatch(
        &self,
        operation: &GeofenceOperation,
    ) -> impl Future<Output = GeofenceResponse> + 'static {
        let action = operation.action();
        let pending = self.exec(operation);
        async move {
            let response = GeofenceResponse::from_outcome(pending.await);
            tracing::trace!(%action, ?response, "Geofencing call resolved");
            response
        }
    }

    /// Call the native plugin and hand its answer, unmodified, to one of two callbacks.
    ///
    /// Exactly one of the callbacks is called, once, when the returned future completes. Without
    /// an error callback, errors are only logged.
    pub fn exec_with_callbacks<S>(
        &self,
        operation: &GeofenceOperation,
        on_success: S,
        on_error: Option<ErrorCallback>,
    ) -> impl Future<Output = ()> + 'static
    where
        S: FnOnce(Value) + 'static,
    {
        let action = operation.action();
        let pending = self.exec(operation);
        async move {
            match (pending.await, on_error) {
                (Ok(payload), _) => on_success(payload),
                (Err(error), Some(on_error)) => on_error(error),
                (Err(error), None) => {
                    tracing::debug!(
                        %action,
                        %error,
                        "Geofencing call failed without an error callback"
                    );
                }
            }
        }
    }

    fn exec(
        &self,
        operation: &GeofenceOperation,
    ) -> impl Future<Output = NativeOutcome> + 'static {
        let call = operation.to_bridge_call(&self.config.plugin);
        tracing::debug!(
            plugin = %call.plugin,
            action = %call.action,
            args = ?call.args,
            "Calling native geofencing plugin"
        );
        self.bridge.exec(call)
    }
}
