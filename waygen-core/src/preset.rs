//! Camera and battery characteristics of supported drone models.

use std::time::Duration;

use math::Angle;
use store::DroneModel;


/// Horizontal field of view used when neither the settings nor the preset provide one.
pub const DEFAULT_HFOV: Angle = Angle::from_degrees(82.1);

/// Conservative minimum time between two photos at full resolution.
pub const DEFAULT_PHOTO_INTERVAL: Duration = Duration::from_millis(5500);

/// Fraction of the rated flight time above which a mission is flagged.
pub const FLIGHT_WARNING_THRESHOLD: f64 = 0.85;

/// Time added to every mission for take-off and landing.
pub const TAKEOFF_LANDING_OVERHEAD: Duration = Duration::ZERO;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Preset {
    pub name:            &'static str,
    /// `None` if the user must supply the field of view.
    pub hfov:            Option<Angle>,
    pub photo_interval:  Duration,
    /// Practical flight time on one battery.
    ///
    /// `None` disables flight time warnings.
    pub max_flight_time: Option<Duration>,
}

const MINI_4_PRO: Preset = Preset {
    name:            "DJI Mini 4 Pro",
    hfov:            Some(Angle::from_degrees(82.1)),
    photo_interval:  DEFAULT_PHOTO_INTERVAL,
    max_flight_time: Some(Duration::from_secs(31 * 60)),
};

const MINI_5_PRO: Preset = Preset {
    name:            "DJI Mini 5 Pro",
    hfov:            Some(Angle::from_degrees(84.)),
    photo_interval:  DEFAULT_PHOTO_INTERVAL,
    max_flight_time: Some(Duration::from_secs(40 * 60)),
};

// TODO replace the photo interval once the Mavic 4 Pro burst timing is measured.
const MAVIC_4_PRO: Preset = Preset {
    name:            "DJI Mavic 4 Pro",
    hfov:            Some(Angle::from_degrees(72.)),
    photo_interval:  DEFAULT_PHOTO_INTERVAL,
    max_flight_time: Some(Duration::from_secs(40 * 60)),
};

const CUSTOM: Preset = Preset {
    name:            "Custom",
    hfov:            None,
    photo_interval:  DEFAULT_PHOTO_INTERVAL,
    max_flight_time: None,
};

impl Preset {
    #[must_use]
    pub fn of(model: DroneModel) -> &'static Preset {
        match model {
            DroneModel::Mini4Pro => &MINI_4_PRO,
            DroneModel::Mini5Pro => &MINI_5_PRO,
            DroneModel::Mavic4Pro => &MAVIC_4_PRO,
            DroneModel::Custom => &CUSTOM,
        }
    }
}
