//! Validation of [`MissionSettings`] and resolution of preset-derived values.

use std::time::Duration;

use math::Angle;
use store::MissionSettings;

use crate::preset::{self, Preset};


/// Settings checked for planning, with drone preset defaults filled in.
///
/// Generators only consume this type,
/// so every value they read has already been validated.
#[derive(Debug, Clone, Copy)]
pub struct Resolved<'a> {
    pub settings:        &'a MissionSettings,
    pub preset:          &'static Preset,
    /// Horizontal field of view of the camera.
    pub hfov:            Angle,
    pub photo_interval:  Duration,
    pub max_flight_time: Option<Duration>,
}

impl<'a> Resolved<'a> {
    pub fn new(settings: &'a MissionSettings) -> Result<Self, Error> {
        positive("altitude", settings.altitude.into_meters())?;
        positive("speed", settings.speed.into_meters_per_sec())?;
        positive("transitionalSpeed", settings.transitional_speed.into_meters_per_sec())?;
        positive("spacing", settings.spacing.into_meters())?;
        positive("numberOfOrbits", settings.number_of_orbits)?;
        within("sideOverlap", settings.side_overlap, 0., 100.)?;
        within("frontOverlap", settings.front_overlap, 0., 100.)?;
        finite("angle", settings.angle)?;
        finite("startAngle", settings.start_angle)?;
        finite("gimbalPitch", settings.gimbal_pitch)?;

        let preset = Preset::of(settings.selected_drone);

        let hfov = match settings.custom_fov {
            Some(degrees) => {
                positive("customFOV", degrees)?;
                within("customFOV", degrees, 0., 180.)?;
                Angle::from_degrees(degrees)
            }
            None => preset.hfov.unwrap_or(preset::DEFAULT_HFOV),
        };

        let photo_interval = match settings.photo_interval {
            Some(secs) => {
                positive("photoInterval", secs)?;
                Duration::try_from_secs_f64(secs)
                    .map_err(|_| Error::NotPositive { field: "photoInterval", value: secs })?
            }
            None => preset.photo_interval,
        };

        Ok(Self {
            settings,
            preset,
            hfov,
            photo_interval,
            max_flight_time: preset.max_flight_time,
        })
    }
}

fn finite(field: &'static str, value: f64) -> Result<(), Error> {
    if value.is_finite() { Ok(()) } else { Err(Error::NotFinite { field, value }) }
}

fn positive(field: &'static str, value: f64) -> Result<(), Error> {
    finite(field, value)?;
    if value > 0. { Ok(()) } else { Err(Error::NotPositive { field, value }) }
}

/// Checks `min <= value < max`.
fn within(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), Error> {
    finite(field, value)?;
    if (min..max).contains(&value) {
        Ok(())
    } else {
        Err(Error::OutOfRange { field, value, min, max })
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("Setting {field} must be finite, got {value}")]
    NotFinite { field: &'static str, value: f64 },
    #[error("Setting {field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: f64 },
    #[error("Setting {field} must be in the range [{min}, {max}), got {value}")]
    OutOfRange { field: &'static str, value: f64, min: f64, max: f64 },
}
