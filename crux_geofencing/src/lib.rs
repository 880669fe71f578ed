//! A capability for monitoring circular regions (geofences) through the native platform.
//!
//! The app asks for one of four operations: request location permissions, start monitoring a
//! region, stop monitoring a region or stop monitoring all regions. The shell carries it out by
//! calling the native geofencing plugin (see [`bridge`] and [`GeofencingShell`]) and resolves the
//! request with a [`GeofenceResponse`].
//!
//! The capability keeps no state. Which regions are monitored is known only by the native layer.
pub mod bridge;
mod completion;
#[cfg(all(target_arch = "wasm32", feature = "cordova"))]
pub mod cordova;
mod error;
mod region;
mod shell;
mod stub;

use std::future::Future;
use std::marker::PhantomData;

use crux_core::{
    Request,
    capability::Operation,
    command::{Command, RequestBuilder},
};
use serde::{Deserialize, Serialize};

pub use bridge::{Action, BridgeCall, BridgeConfig, NativeBridge, NativeOutcome, PLUGIN_NAME};
pub use completion::{Completer, Completion, completion};
pub use error::{GeofenceError, GeofenceResult, InvalidRegion};
pub use region::{Region, RegionId};
pub use shell::{ErrorCallback, GeofencingShell};
pub use stub::StubBridge;

/// A geofencing operation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GeofenceOperation {
    /// Ask for the permissions needed to monitor regions. This may show a prompt to the user.
    RequestPermissions,
    /// Start monitoring a region. Enter and exit events are delivered by the platform, not
    /// through this capability.
    StartMonitoringRegion(Region),
    /// Stop monitoring the region with the given identifier.
    StopMonitoringRegion(RegionId),
    StopMonitoringAllRegions,
}

/// The outcome of a geofencing operation, as reported by the native layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GeofenceResponse {
    Success,
    Failure(GeofenceError),
}

impl GeofenceResponse {
    pub fn into_result(self) -> GeofenceResult<()> {
        match self {
            Self::Success => Ok(()),
            Self::Failure(e) => Err(e),
        }
    }
}

impl Operation for GeofenceOperation {
    type Output = GeofenceResponse;
}

/// The Geofencing capability API
///
/// Every method sends exactly one request to the shell, and the returned future resolves exactly
/// once with the result of the native call.
#[derive(Clone)]
pub struct Geofencing<Effect, Event> {
    effect: PhantomData<Effect>,
    event: PhantomData<Event>,
}

impl<Effect, Event> Geofencing<Effect, Event>
where
    Effect: Send + From<Request<GeofenceOperation>> + 'static,
    Event: Send + 'static,
{
    /// Request location permissions.
    ///
    /// Succeeds if the permissions are already granted. Otherwise it fails with
    /// [`GeofenceError::PermissionDenied`] if the user has refused before, or
    /// [`GeofenceError::PermissionNotRequested`] if the user hasn't been asked yet.
    pub fn request_permissions()
    -> RequestBuilder<Effect, Event, impl Future<Output = GeofenceResult<()>>> {
        Self::request(GeofenceOperation::RequestPermissions)
    }

    /// Start monitoring a region.
    ///
    /// Success means the native layer accepted the registration. It stays active until it is
    /// stopped with [`Self::stop_monitoring_region`] or [`Self::stop_monitoring_all_regions`].
    pub fn start_monitoring_region(
        region: Region,
    ) -> RequestBuilder<Effect, Event, impl Future<Output = GeofenceResult<()>>> {
        Self::request(GeofenceOperation::StartMonitoringRegion(region))
    }

    /// Stop monitoring a region previously started with the same identifier.
    pub fn stop_monitoring_region(
        identifier: RegionId,
    ) -> RequestBuilder<Effect, Event, impl Future<Output = GeofenceResult<()>>> {
        Self::request(GeofenceOperation::StopMonitoringRegion(identifier))
    }

    pub fn stop_monitoring_all_regions()
    -> RequestBuilder<Effect, Event, impl Future<Output = GeofenceResult<()>>> {
        Self::request(GeofenceOperation::StopMonitoringAllRegions)
    }

    fn request(
        operation: GeofenceOperation,
    ) -> RequestBuilder<Effect, Event, impl Future<Output = GeofenceResult<()>>> {
        Command::request_from_shell(operation).map(GeofenceResponse::into_result)
    }
}
