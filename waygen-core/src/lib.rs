//! Survey mission planning and DJI WPML interchange.
//!
//! Planning turns a [`store::Shape`] and [`store::MissionSettings`] into an ordered
//! list of [`store::Waypoint`]s; [`kmz`] persists them to and from KMZ archives.

pub mod actions;
pub mod camera;
pub mod kmz;
pub mod plan;
pub mod preset;
pub mod safety;
pub mod settings;

#[cfg(test)]
mod test_util;
