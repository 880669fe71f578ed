//! The contract with the native geofencing plugin.
//!
//! Every operation becomes one call naming the plugin, an action and a list of positional
//! arguments:
//!
//! | Action                     | Arguments                              |
//! |----------------------------|----------------------------------------|
//! | `requestPermissions`       | `[]`                                   |
//! | `startMonitoringRegion`    | `[identifier, lat, lon, radius]`       |
//! | `stopMonitoringRegion`     | `[identifier]`                         |
//! | `stopMonitoringAllRegions` | `[]`                                   |
//!
//! The plugin answers with either a success value or an error value, both arbitrary JSON.
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use futures::future::LocalBoxFuture;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{GeofenceError, GeofenceOperation, GeofenceResponse};

/// The name the native plugin is registered under.
pub const PLUGIN_NAME: &str = "MBGeofencing";

/// Selects the native handler of a call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Action {
    RequestPermissions,
    StartMonitoringRegion,
    StopMonitoringRegion,
    StopMonitoringAllRegions,
}

impl Action {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RequestPermissions => "requestPermissions",
            Self::StartMonitoringRegion => "startMonitoringRegion",
            Self::StopMonitoringRegion => "stopMonitoringRegion",
            Self::StopMonitoringAllRegions => "stopMonitoringAllRegions",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One invocation of the native plugin.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BridgeCall {
    pub plugin: String,
    pub action: Action,
    /// Positional arguments, in the order the action expects them.
    pub args: Vec<Value>,
}

/// What the native layer answered: `Ok` with the success value or `Err` with the error value.
pub type NativeOutcome = Result<Value, Value>;

/// Settings for talking to the native plugin.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BridgeConfig {
    /// The name of the native plugin. Default: [`PLUGIN_NAME`].
    pub plugin: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            plugin: PLUGIN_NAME.to_string(),
        }
    }
}

/// A way to call into the native layer.
///
/// The returned future must resolve exactly once, with the success or the error value of the
/// call. Implementations must not retry or reinterpret the values.
pub trait NativeBridge {
    fn exec(&self, call: BridgeCall) -> LocalBoxFuture<'static, NativeOutcome>;
}

impl<B: NativeBridge + ?Sized> NativeBridge for &B {
    fn exec(&self, call: BridgeCall) -> LocalBoxFuture<'static, NativeOutcome> {
        (**self).exec(call)
    }
}

impl<B: NativeBridge + ?Sized> NativeBridge for Box<B> {
    fn exec(&self, call: BridgeCall) -> LocalBoxFuture<'static, NativeOutcome> {
        (**self).exec(call)
    }
}

impl<B: NativeBridge + ?Sized> NativeBridge for Rc<B> {
    fn exec(&self, call: BridgeCall) -> LocalBoxFuture<'static, NativeOutcome> {
        (**self).exec(call)
    }
}

impl<B: NativeBridge + ?Sized> NativeBridge for Arc<B> {
    fn exec(&self, call: BridgeCall) -> LocalBoxFuture<'static, NativeOutcome> {
        (**self).exec(call)
    }
}

impl GeofenceOperation {
    pub fn action(&self) -> Action {
        match self {
            Self::RequestPermissions => Action::RequestPermissions,
            Self::StartMonitoringRegion(_) => Action::StartMonitoringRegion,
            Self::StopMonitoringRegion(_) => Action::StopMonitoringRegion,
            Self::StopMonitoringAllRegions => Action::StopMonitoringAllRegions,
        }
    }

    /// The positional arguments of the native call.
    pub fn args(&self) -> Vec<Value> {
        match self {
            Self::RequestPermissions | Self::StopMonitoringAllRegions => Vec::new(),
            Self::StartMonitoringRegion(region) => vec![
                region.id().as_str().into(),
                region.latitude().into(),
                region.longitude().into(),
                region.radius().into(),
            ],
            Self::StopMonitoringRegion(identifier) => vec![identifier.as_str().into()],
        }
    }

    pub fn to_bridge_call(&self, plugin: &str) -> BridgeCall {
        BridgeCall {
            plugin: plugin.to_string(),
            action: self.action(),
            args: self.args(),
        }
    }
}

impl GeofenceResponse {
    /// Build a response from the raw answer of the native layer.
    ///
    /// Any success value counts as success; its content isn't part of the contract.
    pub fn from_outcome(outcome: NativeOutcome) -> Self {
        match outcome {
            Ok(_) => Self::Success,
            Err(value) => Self::Failure(GeofenceError::from_native(value)),
        }
    }
}

impl GeofenceError {
    /// Categorize an error value from the native layer.
    ///
    /// The value is either a bare code string, like `"denied"` or `"notDetermined"`, or an object
    /// with a `code` and optionally a `message` and an `identifier`. Codes are compared ignoring
    /// case and punctuation, so `"PERMISSION_DENIED"` and `"kCLAuthorizationStatusDenied"` are
    /// understood too. Everything else becomes [`GeofenceError::Unrecognized`].
    pub fn from_native(value: Value) -> Self {
        let (code, fields) = match &value {
            Value::String(code) => (Some(code.as_str()), None),
            Value::Object(fields) => (fields.get("code").and_then(Value::as_str), Some(fields)),
            _ => (None, None),
        };
        let field = |name: &str| -> String {
            fields
                .and_then(|fields| fields.get(name))
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        match code.map(normalize_code).as_deref() {
            Some(
                "denied"
                | "permissiondenied"
                | "previouslydenied"
                | "restricted"
                | "kclauthorizationstatusdenied"
                | "kclauthorizationstatusrestricted",
            ) => Self::PermissionDenied,
            Some(
                "notdetermined"
                | "notrequested"
                | "permissionnotrequested"
                | "kclauthorizationstatusnotdetermined",
            ) => Self::PermissionNotRequested,
            Some("registrationfailed") => Self::RegistrationFailed {
                reason: field("message"),
            },
            Some("unknownidentifier") => Self::UnknownIdentifier {
                identifier: field("identifier"),
            },
            Some("nativefailure" | "error") => Self::NativeFailure {
                message: field("message"),
            },
            _ => {
                tracing::warn!(%value, "Unrecognized error from the native geofencing layer");
                Self::Unrecognized {
                    raw: value.to_string(),
                }
            }
        }
    }
}

/// Lowercase and drop everything but letters and digits.
fn normalize_code(code: &str) -> String {
    code.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}
