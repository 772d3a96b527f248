use std::{fmt, ops};

use bevy_math::DVec2;

/// A WGS-84 geographic position.
///
/// `x` is the longitude and `y` is the latitude, both in degrees.
/// Serialized as a GeoJSON position `[lng, lat]`.
#[derive(Clone, Copy, PartialEq)]
pub struct LngLat(pub DVec2);

impl LngLat {
    #[must_use]
    pub const fn new(lng: f64, lat: f64) -> Self { Self(DVec2::new(lng, lat)) }

    #[must_use]
    pub const fn lng(self) -> f64 { self.0.x }

    #[must_use]
    pub const fn lat(self) -> f64 { self.0.y }

    #[must_use]
    pub fn is_finite(self) -> bool { self.0.is_finite() }

    /// Whether both components differ by no more than `epsilon` degrees.
    #[must_use]
    pub fn abs_diff_eq(self, other: Self, epsilon: f64) -> bool {
        self.0.abs_diff_eq(other.0, epsilon)
    }

    #[must_use]
    pub fn midpoint(self, other: Self) -> Self { Self((self.0 + other.0) * 0.5) }

    /// Parses a GeoJSON position, ignoring any altitude component.
    #[must_use]
    pub fn from_position(position: &[f64]) -> Option<Self> {
        match *position {
            [lng, lat, ..] => Some(Self::new(lng, lat)),
            _ => None,
        }
    }

    #[must_use]
    pub fn into_position(self) -> Vec<f64> { vec![self.lng(), self.lat()] }
}

impl fmt::Debug for LngLat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LngLat").field("lng", &self.lng()).field("lat", &self.lat()).finish()
    }
}

/// Formats as `lng,lat` with the shortest representation that parses back to the same value.
impl fmt::Display for LngLat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lng(), self.lat())
    }
}

impl ops::Sub for LngLat {
    type Output = DVec2;

    fn sub(self, rhs: Self) -> DVec2 { self.0 - rhs.0 }
}

impl ops::Add<DVec2> for LngLat {
    type Output = Self;

    fn add(self, rhs: DVec2) -> Self { Self(self.0 + rhs) }
}

impl serde::Serialize for LngLat {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        [self.lng(), self.lat()].serialize(serializer)
    }
}

impl<'de> serde::Deserialize<'de> for LngLat {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let position = Vec::<f64>::deserialize(deserializer)?;
        let value = Self::from_position(&position).ok_or_else(|| {
            <D::Error as serde::de::Error>::invalid_length(position.len(), &"at least 2 components")
        })?;
        if !value.is_finite() {
            return Err(<D::Error as serde::de::Error>::custom("non-finite coordinate"));
        }
        Ok(value)
    }
}

#[cfg(feature = "schema")]
impl schemars::JsonSchema for LngLat {
    fn schema_name() -> std::borrow::Cow<'static, str> { "LngLat".into() }

    fn json_schema(_: &mut schemars::SchemaGenerator) -> schemars::Schema {
        schemars::json_schema!({
            "type": "array",
            "items": { "type": "number" },
            "minItems": 2,
            "description": "[longitude, latitude] in degrees",
        })
    }
}
