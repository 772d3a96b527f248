use std::f64::consts::{FRAC_PI_2, PI, TAU};
use std::{fmt, ops};

use super::Angle;


/// An absolute compass bearing, clockwise from true north.
#[derive(Clone, Copy, PartialEq)]
pub struct Heading(
    Angle, // always -PI < heading <= PI
);

impl Heading {
    /// Heading north.
    pub const NORTH: Self = Self(Angle::new(0.));
    /// Heading east.
    pub const EAST: Self = Self(Angle::new(FRAC_PI_2));
    /// Heading south.
    pub const SOUTH: Self = Self(Angle::new(PI));
    /// Heading west.
    pub const WEST: Self = Self(Angle::new(-FRAC_PI_2));

    /// Creates a heading from an absolute bearing in degrees.
    /// Any finite value is accepted and normalized.
    #[must_use]
    pub fn from_degrees(degrees: f64) -> Self { Self::from_radians(Angle::from_degrees(degrees)) }

    /// Returns the heading in degrees in the range 0..360.
    #[must_use]
    pub fn degrees(self) -> f64 {
        let degrees = self.0.into_degrees();
        if degrees < 0. { degrees + 360. } else { degrees }
    }

    /// Returns the heading in degrees in the range `-180 < value <= 180`.
    #[must_use]
    pub fn signed_degrees(self) -> f64 { self.0.into_degrees() }

    /// Rounds the heading to the nearest whole degree.
    #[must_use]
    pub fn round_degrees(self) -> Self { Self::from_degrees(self.degrees().round()) }

    /// Creates a heading from an absolute bearing in radians.
    #[must_use]
    pub fn from_radians(radians: Angle) -> Self { Self::NORTH + radians }

    /// Returns the heading in radians in the range `-STRAIGHT < value <= STRAIGHT`.
    #[must_use]
    pub fn radians(self) -> Angle { self.0 }

    /// Rotate by `delta` radians in the direction of `dir`.
    #[must_use]
    pub fn add_direction(self, dir: TurnDirection, delta: Angle) -> Self {
        match dir {
            TurnDirection::CounterClockwise => self - delta,
            TurnDirection::Clockwise => self + delta,
        }
    }

    /// Whether the two headings are within `epsilon` of each other in either direction.
    #[must_use]
    pub fn approx_eq(self, other: Heading, epsilon: Angle) -> bool {
        (self - other.0).0.abs() <= epsilon
    }
}

impl fmt::Debug for Heading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Heading").field("degrees", &self.degrees()).finish()
    }
}

impl fmt::Display for Heading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.0}\u{b0}", self.degrees())
    }
}

impl ops::Add<Angle> for Heading {
    type Output = Self;
    /// Offsets `self` by `angle` clockwise.
    fn add(self, angle: Angle) -> Self {
        let radians = (self.0 + angle).into_radians().rem_euclid(TAU);
        Self(Angle::from_radians(if radians > PI { radians - TAU } else { radians }))
    }
}

impl ops::Sub<Angle> for Heading {
    type Output = Self;
    /// Offsets `self` by `angle` counter-clockwise.
    fn sub(self, angle: Angle) -> Self { self + (-angle) }
}

/// Serialized as compass degrees in the range 0..360.
impl serde::Serialize for Heading {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.degrees().serialize(serializer)
    }
}

impl<'de> serde::Deserialize<'de> for Heading {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let degrees = f64::deserialize(deserializer)?;
        if !degrees.is_finite() {
            return Err(<D::Error as serde::de::Error>::custom("non-finite heading"));
        }
        Ok(Self::from_degrees(degrees))
    }
}

#[cfg(feature = "schema")]
impl schemars::JsonSchema for Heading {
    fn schema_name() -> std::borrow::Cow<'static, str> { "Heading".into() }

    fn json_schema(_: &mut schemars::SchemaGenerator) -> schemars::Schema {
        schemars::json_schema!({
            "type": "number",
            "description": "Compass bearing in degrees, clockwise from true north",
        })
    }
}

/// The direction of a turn or an orbit.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    serde::Serialize,
    serde::Deserialize,
    strum::Display,
    strum::EnumString,
    strum::IntoStaticStr,
)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum TurnDirection {
    /// A left turn.
    #[serde(alias = "ccw", alias = "counterclockwise")]
    #[strum(to_string = "counter-clockwise", serialize = "ccw", serialize = "counterclockwise")]
    CounterClockwise,
    /// A right turn.
    #[default]
    #[serde(alias = "cw")]
    #[strum(to_string = "clockwise", serialize = "cw")]
    Clockwise,
}
