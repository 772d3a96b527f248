use std::f64::consts::{FRAC_PI_2, PI, TAU};
use std::marker::PhantomData;
use std::time::Duration;
use std::{cmp, fmt, iter, ops};

mod heading;
pub use heading::{Heading, TurnDirection};
mod position;
pub use position::LngLat;

/// Mean earth radius used by every spherical formula in this crate, in meters.
pub const EARTH_RADIUS_METERS: f64 = 6_371_008.8;

/// Flat-earth conversion factor between meters and degrees of latitude.
///
/// This is a known precision limit of survey-scale planning:
/// scan line spacing is defined relative to this constant,
/// so replacing it changes every derived spacing and point count.
pub const METERS_PER_DEGREE: f64 = 111_111.;

pub struct Quantity<Base, Dt>(pub f64, pub PhantomData<(Base, Dt)>);

impl<Base, Dt> Quantity<Base, Dt> {
    pub const ZERO: Self = Self(0., PhantomData);

    pub const fn new(value: f64) -> Self { Self(value, PhantomData) }

    #[must_use]
    pub fn abs(self) -> Self { Self(self.0.abs(), PhantomData) }

    #[must_use]
    pub fn min(self, other: Self) -> Self { Self(self.0.min(other.0), PhantomData) }

    #[must_use]
    pub fn max(self, other: Self) -> Self { Self(self.0.max(other.0), PhantomData) }

    #[must_use]
    pub fn is_finite(self) -> bool { self.0.is_finite() }

    #[must_use]
    pub fn is_positive(self) -> bool { self.0 > 0. }
}

impl<Base, Dt> Default for Quantity<Base, Dt> {
    fn default() -> Self { Self::ZERO }
}

impl<Base, Dt> Clone for Quantity<Base, Dt> {
    fn clone(&self) -> Self { *self }
}

impl<Base, Dt> Copy for Quantity<Base, Dt> {}

impl<Base, Dt> PartialEq for Quantity<Base, Dt> {
    fn eq(&self, other: &Self) -> bool { self.0 == other.0 }
}

impl<Base, Dt> PartialOrd for Quantity<Base, Dt> {
    fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> { self.0.partial_cmp(&other.0) }
}

impl<Base, Dt> ops::Add for Quantity<Base, Dt> {
    type Output = Self;

    fn add(self, other: Self) -> Self { Self(self.0 + other.0, PhantomData) }
}

impl<Base, Dt> ops::AddAssign for Quantity<Base, Dt> {
    fn add_assign(&mut self, other: Self) { self.0 += other.0; }
}

impl<Base, Dt> ops::Sub for Quantity<Base, Dt> {
    type Output = Self;

    fn sub(self, other: Self) -> Self { Self(self.0 - other.0, PhantomData) }
}

impl<Base, Dt> ops::Mul<f64> for Quantity<Base, Dt> {
    type Output = Self;

    fn mul(self, other: f64) -> Self { Self(self.0 * other, PhantomData) }
}

impl<Base, Dt> ops::Div<f64> for Quantity<Base, Dt> {
    type Output = Self;

    fn div(self, other: f64) -> Self { Self(self.0 / other, PhantomData) }
}

impl<Base, Dt> ops::Div for Quantity<Base, Dt> {
    type Output = f64;

    fn div(self, other: Self) -> f64 { self.0 / other.0 }
}

impl<Base, Dt> ops::Neg for Quantity<Base, Dt> {
    type Output = Self;

    fn neg(self) -> Self { Self(-self.0, PhantomData) }
}

impl<Base, Dt> iter::Sum for Quantity<Base, Dt> {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |sum, value| sum + value)
    }
}

/// Used as `Dt` in `Quantity` to indicate that the unit is not a rate of change.
pub struct DtZero;
/// Used as `Dt` in `Quantity` to indicate that the unit is the rate of change of `Quantity<Dt=Dt>`.
pub struct Ddt<Dt>(Dt);

pub type DtOne = Ddt<DtZero>;

impl<Base, Dt> ops::Div<Duration> for Quantity<Base, Dt> {
    type Output = Quantity<Base, Ddt<Dt>>;

    fn div(self, other: Duration) -> Self::Output {
        Quantity(self.0 / other.as_secs_f64(), PhantomData)
    }
}

/// (B / T^n) / (B / T^(n+1)) = T
impl<Base, Dt> Quantity<Base, Dt> {
    /// Returns `None` if the result is negative, infinite or NaN.
    pub fn try_div(self, rhs: Quantity<Base, Ddt<Dt>>) -> Option<Duration> {
        Duration::try_from_secs_f64(self.0 / rhs.0).ok()
    }
}

pub struct LengthBase;

/// A distance quantity. Internal representation is in meters.
pub type Length = Quantity<LengthBase, DtZero>;

/// A linear speed (rate of [length](Length) change) quantity.
pub type Speed = Quantity<LengthBase, DtOne>;

pub struct AngleBase;

/// A relative angle. Internal representation is in radians.
pub type Angle = Quantity<AngleBase, DtZero>;

impl fmt::Debug for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Length").field("meters", &self.into_meters()).finish()
    }
}

impl fmt::Debug for Speed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Speed").field("m/s", &self.into_meters_per_sec()).finish()
    }
}

impl fmt::Debug for Angle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Angle").field("degrees", &self.into_degrees()).finish()
    }
}

impl Length {
    #[must_use]
    pub const fn into_meters(self) -> f64 { self.0 }

    #[must_use]
    pub const fn from_meters(meters: f64) -> Self { Self(meters, PhantomData) }

    /// Converts to degrees of latitude with the flat-earth [`METERS_PER_DEGREE`] factor.
    #[must_use]
    pub const fn into_flat_degrees(self) -> f64 { self.0 / METERS_PER_DEGREE }

    /// Converts into the central angle subtended on the earth sphere.
    #[must_use]
    pub const fn into_central_angle(self) -> Angle {
        Angle::from_radians(self.0 / EARTH_RADIUS_METERS)
    }

    /// Converts from the central angle subtended on the earth sphere.
    #[must_use]
    pub const fn from_central_angle(angle: Angle) -> Self {
        Self(angle.into_radians() * EARTH_RADIUS_METERS, PhantomData)
    }
}

impl Speed {
    #[must_use]
    pub const fn into_meters_per_sec(self) -> f64 { self.0 }

    #[must_use]
    pub const fn from_meters_per_sec(mps: f64) -> Self { Self(mps, PhantomData) }
}

impl Angle {
    pub const RIGHT: Self = Self(FRAC_PI_2, PhantomData);
    pub const STRAIGHT: Self = Self(PI, PhantomData);
    pub const FULL: Self = Self(TAU, PhantomData);

    #[must_use]
    pub const fn from_radians(radians: f64) -> Self { Self(radians, PhantomData) }

    #[must_use]
    pub const fn into_radians(self) -> f64 { self.0 }

    #[must_use]
    pub const fn from_degrees(degrees: f64) -> Self { Self(degrees.to_radians(), PhantomData) }

    #[must_use]
    pub fn into_degrees(self) -> f64 { self.0.to_degrees() }

    #[must_use]
    pub fn sin(self) -> f64 { self.0.sin() }
    #[must_use]
    pub fn cos(self) -> f64 { self.0.cos() }
    #[must_use]
    pub fn tan(self) -> f64 { self.0.tan() }
}

impl<Base, Dt> serde::Serialize for Quantity<Base, Dt> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de, Base, Dt> serde::Deserialize<'de> for Quantity<Base, Dt> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::de::Deserializer<'de>,
    {
        let value = f64::deserialize(deserializer)?;

        if !value.is_finite() {
            return Err(<D::Error as serde::de::Error>::custom("non-finite quantity"));
        }

        Ok(Self(value, PhantomData))
    }
}

#[cfg(feature = "schema")]
impl<Base, Dt> schemars::JsonSchema for Quantity<Base, Dt> {
    fn schema_name() -> std::borrow::Cow<'static, str> { "Quantity".into() }

    fn json_schema(generator: &mut schemars::SchemaGenerator) -> schemars::Schema {
        f64::json_schema(generator)
    }

    fn inline_schema() -> bool { true }
}
