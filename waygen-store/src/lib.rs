//! Schema for mission and session files.

#![forbid(missing_docs)]

use serde::{Deserialize, Serialize};

mod settings;
pub use settings::*;

mod shape;
pub use shape::*;

mod waypoint;
pub use waypoint::*;

#[cfg(test)]
mod tests;

/// The recoverable editing session embedded in an exported mission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct SessionSnapshot {
    /// The settings that produced the mission.
    pub settings: MissionSettings,
    /// The input area that produced the mission, if any.
    #[serde(default)]
    pub shape:    Option<Shape>,
}

/// An ordered flight plan together with what produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct Mission {
    /// Waypoints in flight order.
    pub waypoints: Vec<Waypoint>,
    /// The settings that produced the waypoints.
    #[serde(default)]
    pub settings:  MissionSettings,
    /// The input area that produced the waypoints, if any.
    #[serde(default)]
    pub shape:     Option<Shape>,
}

impl Mission {
    /// The session snapshot to embed when persisting this mission.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot { settings: self.settings.clone(), shape: self.shape.clone() }
    }
}
