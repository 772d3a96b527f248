use std::fmt;
use std::io::{Seek, Write};

use jiff::Timestamp;
use math::Speed;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use store::{FinishAction, HeadingMode, MissionSettings, RcLostAction, SessionSnapshot, Waypoint};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::{
    Error, KML_NAMESPACE, SESSION_ENTRY, TEMPLATE_ENTRY, WAYLINES_ENTRY, WPML_NAMESPACE,
};
use crate::actions::{self, Action};

/// DJI Mini 4 Pro aircraft type.
const DRONE_ENUM_VALUE: u32 = 68;
const DRONE_SUB_ENUM_VALUE: u32 = 0;

/// Mission-level parameters chosen when exporting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportOptions {
    pub finish_action:      FinishAction,
    pub rc_lost_action:     RcLostAction,
    /// Speed to the first waypoint.
    pub transitional_speed: Speed,
    pub heading_mode:       HeadingMode,
    pub create_time:        Timestamp,
}

impl ExportOptions {
    #[must_use]
    pub fn from_settings(settings: &MissionSettings) -> Self {
        Self {
            finish_action:      settings.mission_end_action,
            rc_lost_action:     settings.rc_lost_action,
            transitional_speed: settings.transitional_speed,
            heading_mode:       settings.heading_mode,
            create_time:        Timestamp::now(),
        }
    }
}

/// Writes a KMZ archive containing the mission template, the wayline document
/// and, if given, the session snapshot.
///
/// Returns the inner writer after the archive is finished.
pub fn write_kmz<W: Write + Seek>(
    writer: W,
    waypoints: &[Waypoint],
    settings: &MissionSettings,
    session: Option<&SessionSnapshot>,
    options: &ExportOptions,
) -> Result<W, Error> {
    let mut zip = ZipWriter::new(writer);
    let file_options =
        SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    zip.start_file(TEMPLATE_ENTRY, file_options)?;
    zip.write_all(&template_document(options)?)?;

    zip.start_file(WAYLINES_ENTRY, file_options)?;
    zip.write_all(&waylines_document(waypoints, settings, options)?)?;

    if let Some(session) = session {
        zip.start_file(SESSION_ENTRY, file_options)?;
        serde_json::to_writer_pretty(&mut zip, session)?;
    }

    tracing::debug!("Exported {} waypoints", waypoints.len());
    Ok(zip.finish()?)
}

/// Renders the mission template document.
pub fn template_document(options: &ExportOptions) -> Result<Vec<u8>, Error> {
    let millis = options.create_time.as_millisecond();
    Document::kml(|doc| {
        doc.element("Document", |doc| {
            doc.leaf("wpml:createTime", millis)?;
            doc.leaf("wpml:updateTime", millis)?;
            mission_config(doc, options)
        })
    })
}

/// Renders the wayline document with one placemark per waypoint.
pub fn waylines_document(
    waypoints: &[Waypoint],
    settings: &MissionSettings,
    options: &ExportOptions,
) -> Result<Vec<u8>, Error> {
    let groups = actions::action_groups(waypoints, settings.waypoint_action);

    Document::kml(|doc| {
        doc.element("Document", |doc| {
            mission_config(doc, options)?;
            doc.element("Folder", |doc| {
                doc.leaf("wpml:templateId", 0)?;
                doc.leaf("wpml:executeHeightMode", "relativeToStartPoint")?;
                doc.leaf("wpml:waylineId", 0)?;
                doc.leaf("wpml:autoFlightSpeed", settings.speed.into_meters_per_sec())?;

                let mut group_id = 0;
                for (index, (waypoint, group)) in waypoints.iter().zip(&groups).enumerate() {
                    doc.element("Placemark", |doc| {
                        placemark(doc, index, waypoint, settings, options)?;
                        if !group.is_empty() {
                            action_group(doc, group_id, index, group)?;
                            group_id += 1;
                        }
                        Ok(())
                    })?;
                }
                Ok(())
            })
        })
    })
}

fn mission_config(doc: &mut Document, options: &ExportOptions) -> Result<(), Error> {
    doc.element("wpml:missionConfig", |doc| {
        doc.leaf("wpml:flyToWaylineMode", "safely")?;
        doc.leaf("wpml:finishAction", match options.finish_action {
            FinishAction::GoHome => "goHome",
            FinishAction::Hover => "noAction",
        })?;
        doc.leaf("wpml:exitOnRCLost", "executeLostAction")?;
        doc.leaf("wpml:executeRCLostAction", match options.rc_lost_action {
            RcLostAction::Hover => "hover",
            RcLostAction::GoBack => "goBack",
        })?;
        doc.leaf(
            "wpml:globalTransitionalSpeed",
            options.transitional_speed.into_meters_per_sec(),
        )?;
        doc.element("wpml:droneInfo", |doc| {
            doc.leaf("wpml:droneEnumValue", DRONE_ENUM_VALUE)?;
            doc.leaf("wpml:droneSubEnumValue", DRONE_SUB_ENUM_VALUE)
        })
    })
}

fn placemark(
    doc: &mut Document,
    index: usize,
    waypoint: &Waypoint,
    settings: &MissionSettings,
    options: &ExportOptions,
) -> Result<(), Error> {
    doc.element("Point", |doc| doc.leaf("coordinates", waypoint.position))?;
    doc.leaf("wpml:index", index)?;
    doc.leaf("wpml:executeHeight", waypoint.altitude.into_meters())?;
    doc.leaf("wpml:waypointSpeed", waypoint.speed.into_meters_per_sec())?;

    doc.element("wpml:waypointHeadingParam", |doc| {
        let (mode, enable) = match options.heading_mode {
            HeadingMode::SmoothTransition => ("smoothTransition", 1),
            HeadingMode::FollowWayline => ("followWayline", 0),
        };
        doc.leaf("wpml:waypointHeadingMode", mode)?;
        doc.leaf("wpml:waypointHeadingAngle", waypoint.heading.signed_degrees())?;
        doc.leaf("wpml:waypointHeadingAngleEnable", enable)?;
        doc.leaf("wpml:waypointHeadingPathMode", "followBadArc")
    })?;

    let straight = waypoint.straighten_legs.unwrap_or(settings.straighten_legs);
    doc.element("wpml:waypointTurnParam", |doc| {
        doc.leaf("wpml:waypointTurnMode", if straight {
            "toPointAndStopWithDiscontinuityCurvature"
        } else {
            "toPointAndPassWithContinuityCurvature"
        })?;
        doc.leaf("wpml:waypointTurnDampingDist", 0)
    })?;
    doc.leaf("wpml:useStraightLine", u8::from(straight))
}

fn action_group(
    doc: &mut Document,
    group_id: usize,
    index: usize,
    group: &[Action],
) -> Result<(), Error> {
    doc.element("wpml:actionGroup", |doc| {
        doc.leaf("wpml:actionGroupId", group_id)?;
        doc.leaf("wpml:actionGroupStartIndex", index)?;
        doc.leaf("wpml:actionGroupEndIndex", index)?;
        doc.leaf("wpml:actionGroupMode", "sequence")?;
        doc.element("wpml:actionTrigger", |doc| {
            doc.leaf("wpml:actionTriggerType", "reachPoint")
        })?;

        for (action_id, &action) in group.iter().enumerate() {
            doc.element("wpml:action", |doc| {
                doc.leaf("wpml:actionId", action_id)?;
                doc.leaf("wpml:actionActuatorFunc", action.func())?;
                doc.element("wpml:actionActuatorFuncParam", |doc| action_params(doc, action))
            })?;
        }
        Ok(())
    })
}

fn action_params(doc: &mut Document, action: Action) -> Result<(), Error> {
    match action {
        Action::GimbalRotate { pitch } => {
            doc.leaf("wpml:gimbalHeadingYawBase", "aircraft")?;
            doc.leaf("wpml:gimbalRotateMode", "absoluteAngle")?;
            doc.leaf("wpml:gimbalPitchRotateEnable", 1)?;
            doc.leaf("wpml:gimbalPitchRotateAngle", pitch)?;
            doc.leaf("wpml:gimbalRollRotateEnable", 0)?;
            doc.leaf("wpml:gimbalRollRotateAngle", 0)?;
            doc.leaf("wpml:gimbalYawRotateEnable", 0)?;
            doc.leaf("wpml:gimbalYawRotateAngle", 0)?;
            doc.leaf("wpml:gimbalRotateTimeEnable", 0)?;
            doc.leaf("wpml:gimbalRotateTime", 0)?;
        }
        Action::TakePhoto | Action::StartRecord => {
            doc.leaf("wpml:useGlobalPayloadLensIndex", 0)?;
        }
        Action::StopRecord => {}
    }
    doc.leaf("wpml:payloadPositionIndex", 0)
}

/// Streaming writer for one KML document.
struct Document {
    writer: Writer<Vec<u8>>,
}

impl Document {
    /// Renders a `<kml>` root declaring the KML and WPML namespaces.
    fn kml(content: impl FnOnce(&mut Self) -> Result<(), Error>) -> Result<Vec<u8>, Error> {
        let mut doc = Self { writer: Writer::new_with_indent(Vec::new(), b' ', 2) };
        doc.writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        doc.writer.write_event(Event::Start(
            BytesStart::new("kml")
                .with_attributes([("xmlns", KML_NAMESPACE), ("xmlns:wpml", WPML_NAMESPACE)]),
        ))?;
        content(&mut doc)?;
        doc.writer.write_event(Event::End(BytesEnd::new("kml")))?;
        Ok(doc.writer.into_inner())
    }

    fn element(
        &mut self,
        name: &str,
        content: impl FnOnce(&mut Self) -> Result<(), Error>,
    ) -> Result<(), Error> {
        self.writer.write_event(Event::Start(BytesStart::new(name)))?;
        content(self)?;
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    fn leaf(&mut self, name: &str, value: impl fmt::Display) -> Result<(), Error> {
        let value = value.to_string();
        self.writer.write_event(Event::Start(BytesStart::new(name)))?;
        self.writer.write_event(Event::Text(BytesText::new(&value)))?;
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }
}
