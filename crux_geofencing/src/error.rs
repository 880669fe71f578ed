use serde::{Deserialize, Serialize};

/// An error reported by the native geofencing layer.
///
/// The native side decides which of these happened. Values it sends that don't match a known
/// category end up in [`GeofenceError::Unrecognized`] with the original value kept as JSON text.
#[derive(
    Clone, Debug, PartialEq, Eq, Serialize, Deserialize, derive_more::Display, derive_more::Error,
)]
#[serde(rename_all = "camelCase")]
pub enum GeofenceError {
    /// Location access was denied by the user earlier, or is restricted by the system.
    #[display("Permission denied")]
    PermissionDenied,
    /// The user has not been asked for location access yet.
    #[display("Permission not requested")]
    PermissionNotRequested,
    /// The native layer refused to register a region.
    #[display("Region registration failed: {reason}")]
    RegistrationFailed { reason: String },
    /// No region with this identifier is monitored.
    #[display("Unknown region identifier: {identifier:?}")]
    UnknownIdentifier { identifier: String },
    #[display("Native failure: {message}")]
    NativeFailure { message: String },
    /// A native error value which doesn't belong to any of the other categories.
    #[display("Unrecognized native error: {raw}")]
    Unrecognized {
        /// The error value as JSON.
        raw: String,
    },
}

pub type GeofenceResult<T, E = GeofenceError> = Result<T, E>;

/// A region descriptor which was rejected before reaching the native layer.
#[derive(Clone, Copy, Debug, PartialEq, derive_more::Display, derive_more::Error)]
pub enum InvalidRegion {
    #[display("The region identifier is empty")]
    EmptyIdentifier,
    #[display("Latitude {latitude} is not within [-90, 90] degrees")]
    LatitudeOutOfRange { latitude: f64 },
    #[display("Longitude {longitude} is not within [-180, 180] degrees")]
    LongitudeOutOfRange { longitude: f64 },
    /// The radius must be a finite number of metres greater than zero.
    #[display("Radius {radius} is not a positive number of metres")]
    InvalidRadius { radius: f64 },
}
