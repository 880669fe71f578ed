//! The circular regions handed to the native layer for monitoring.
use std::fmt;

use jord::{LatLong, Length};
use serde::{Deserialize, Serialize};

use crate::InvalidRegion;

/// The caller-chosen name of a region.
///
/// The native layer keys its registrations by this name, so it is what stops the monitoring of a
/// region later on. Uniqueness is up to the caller.
///
/// Deserializing validates like [`RegionId::new`], except with the `typegen` feature, where the
/// type is traced with placeholder values.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String")]
#[cfg_attr(not(feature = "typegen"), serde(try_from = "String"))]
#[cfg_attr(feature = "typegen", serde(from = "String"))]
pub struct RegionId(String);

impl RegionId {
    /// Create an identifier. Fails if it has no non-whitespace characters.
    pub fn new(identifier: impl Into<String>) -> Result<Self, InvalidRegion> {
        let identifier = identifier.into();
        if identifier.trim().is_empty() {
            Err(InvalidRegion::EmptyIdentifier)
        } else {
            Ok(Self(identifier))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RegionId {
    type Error = InvalidRegion;

    fn try_from(identifier: String) -> Result<Self, Self::Error> {
        Self::new(identifier)
    }
}

#[cfg(feature = "typegen")]
impl From<String> for RegionId {
    fn from(identifier: String) -> Self {
        Self(identifier)
    }
}

impl From<RegionId> for String {
    fn from(id: RegionId) -> Self {
        id.0
    }
}

impl AsRef<str> for RegionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A circular region on the earth's surface.
///
/// The values are sent to the native layer exactly as given, but only after they passed
/// validation: a latitude in [-90, 90], a longitude in [-180, 180] and a finite, positive radius.
/// As with [`RegionId`], deserializing only skips validation with the `typegen` feature.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[cfg_attr(not(feature = "typegen"), serde(try_from = "RawRegion"))]
pub struct Region {
    identifier: RegionId,
    /// The latitude of the center in decimal degrees.
    latitude: f64,
    /// The longitude of the center in decimal degrees.
    longitude: f64,
    /// The radius in meters.
    radius: f64,
}

/// Unvalidated form of `Region`, only used when deserializing.
#[cfg(not(feature = "typegen"))]
#[derive(Deserialize)]
struct RawRegion {
    identifier: RegionId,
    latitude: f64,
    longitude: f64,
    radius: f64,
}

#[cfg(not(feature = "typegen"))]
impl TryFrom<RawRegion> for Region {
    type Error = InvalidRegion;

    fn try_from(raw: RawRegion) -> Result<Self, Self::Error> {
        Self::with_id(raw.identifier, raw.latitude, raw.longitude, raw.radius)
    }
}

impl Region {
    /// Create a region from an identifier, a center in decimal degrees and a radius in meters.
    pub fn new(
        identifier: impl Into<String>,
        latitude: f64,
        longitude: f64,
        radius: f64,
    ) -> Result<Self, InvalidRegion> {
        Self::with_id(RegionId::new(identifier)?, latitude, longitude, radius)
    }

    /// Like [`Region::new`] but with an already validated identifier.
    pub fn with_id(
        identifier: RegionId,
        latitude: f64,
        longitude: f64,
        radius: f64,
    ) -> Result<Self, InvalidRegion> {
        // The range checks also reject NaN.
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(InvalidRegion::LatitudeOutOfRange { latitude });
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(InvalidRegion::LongitudeOutOfRange { longitude });
        }
        if !(radius.is_finite() && radius > 0.0) {
            return Err(InvalidRegion::InvalidRadius { radius });
        }
        Ok(Self {
            identifier,
            latitude,
            longitude,
            radius,
        })
    }

    /// Create a region around a `LatLong`.
    pub fn from_lat_long(
        identifier: RegionId,
        center: LatLong,
        radius: Length,
    ) -> Result<Self, InvalidRegion> {
        Self::with_id(
            identifier,
            center.latitude().as_degrees(),
            center.longitude().as_degrees(),
            radius.as_metres(),
        )
    }

    pub fn id(&self) -> &RegionId {
        &self.identifier
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// The radius in meters.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn center(&self) -> LatLong {
        LatLong::from_degrees(self.latitude, self.longitude)
    }

    pub fn radius_length(&self) -> Length {
        Length::from_metres(self.radius)
    }
}
