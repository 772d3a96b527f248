use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::{fs, io};

use anyhow::{Context, Result};
use serde::Serialize;
use store::{Mission, SessionSnapshot};
use waygen::kmz::{self, ExportOptions, ImportDefaults};
use waygen::safety::{self, Assessment, WarningLevel};
use waygen::settings::Resolved;

fn read_json<T: serde::de::DeserializeOwned>(input: &Path) -> Result<T> {
    let file = fs::File::open(input).with_context(|| format!("open {}", input.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parse {}", input.display()))
}

fn write_json(output: &Path, value: &impl Serialize) -> Result<()> {
    let file = fs::File::create(output).with_context(|| format!("create {}", output.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value).context("write json")?;
    writer.flush().context("flush output")?;
    Ok(())
}

/// Plans a mission from a session file containing settings and a shape.
///
/// With `safe_speed`, the speed is capped so that the camera can fire on every leg.
pub fn plan(input: &Path, output: &Path, safe_speed: bool) -> Result<Mission> {
    let session: SessionSnapshot = read_json(input)?;
    let shape = session.shape.context("session has no shape to plan")?;

    let waypoints = if safe_speed {
        let (waypoints, assessment) = waygen::plan::plan_with_safe_speed(&shape, &session.settings)
            .context("plan mission")?;
        log_assessment(&assessment);
        waypoints
    } else {
        waygen::plan::plan(&shape, &session.settings).context("plan mission")?
    };
    if waypoints.is_empty() {
        tracing::warn!("Shape is too small for the current settings, no waypoints generated");
    }

    let mission = Mission { waypoints, settings: session.settings, shape: Some(shape) };
    write_json(output, &mission)?;
    Ok(mission)
}

/// Packages a mission file into `{name}.kmz` under `output_dir`.
///
/// Returns the path of the written archive.
pub fn export(input: &Path, output_dir: &Path, name: &str) -> Result<PathBuf> {
    let mission: Mission = read_json(input)?;
    let path = output_dir.join(kmz::archive_file_name(name).context("invalid mission name")?);

    let file = fs::File::create(&path).with_context(|| format!("create {}", path.display()))?;
    let options = ExportOptions::from_settings(&mission.settings);
    let writer = kmz::write_kmz(
        BufWriter::new(file),
        &mission.waypoints,
        &mission.settings,
        Some(&mission.snapshot()),
        &options,
    )
    .context("write kmz")?;
    writer.into_inner().map_err(io::IntoInnerError::into_error).context("flush kmz")?;

    tracing::info!("Exported {} waypoints to {}", mission.waypoints.len(), path.display());
    Ok(path)
}

/// Reads a KMZ archive or a bare KML/WPML document into a mission file.
///
/// Settings and shape are restored from the embedded session when present.
pub fn import(input: &Path, output: &Path) -> Result<Mission> {
    let bytes = fs::read(input).with_context(|| format!("read {}", input.display()))?;
    let imported =
        kmz::read_bytes(&bytes, &ImportDefaults::default()).context("import mission")?;
    if imported.unmatched > 0 {
        tracing::warn!("{} waypoints use default values", imported.unmatched);
    }

    let (settings, shape) = match imported.session {
        Some(session) => (session.settings, session.shape),
        None => (store::MissionSettings::default(), None),
    };
    let mission = Mission { waypoints: imported.waypoints, settings, shape };
    write_json(output, &mission)?;
    Ok(mission)
}

/// Human-readable safety summary of a mission.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentReport {
    pub waypoints:      usize,
    /// Meters per second.
    pub max_speed:      f64,
    /// Meters.
    pub min_segment:    f64,
    /// Meters.
    pub total_distance: f64,
    pub estimated_secs: Option<f64>,
    pub level:          String,
}

impl AssessmentReport {
    fn new(waypoints: usize, assessment: &Assessment) -> Self {
        Self {
            waypoints,
            max_speed: assessment.limit.max_speed.into_meters_per_sec(),
            min_segment: assessment.limit.min_segment.into_meters(),
            total_distance: assessment.total_distance.into_meters(),
            estimated_secs: assessment.eta.map(|eta| eta.as_secs_f64()),
            level: assessment.level.to_string(),
        }
    }
}

/// Computes the speed limit and flight time estimate of a mission file.
pub fn assess(input: &Path) -> Result<AssessmentReport> {
    let mission: Mission = read_json(input)?;
    let resolved = Resolved::new(&mission.settings).context("resolve settings")?;
    let assessment = safety::assess(&mission.waypoints, &resolved);
    log_assessment(&assessment);
    Ok(AssessmentReport::new(mission.waypoints.len(), &assessment))
}

fn log_assessment(assessment: &Assessment) {
    match assessment.level {
        WarningLevel::Safe => {}
        level => tracing::warn!(
            "Estimated flight time {:?} is {level} for the selected drone",
            assessment.eta,
        ),
    }
}

pub fn json_schema(output: &Path, gzip: bool) -> Result<()> {
    let schema = schemars::schema_for!(SessionSnapshot);
    let mut writer: Box<dyn io::Write> =
        Box::new(BufWriter::new(fs::File::create(output).context("create output")?));
    if gzip {
        writer = Box::new(BufWriter::new(flate2::write::GzEncoder::new(
            writer,
            flate2::Compression::best(),
        )));
    }
    serde_json::to_writer(&mut writer, &schema).context("write schema")?;
    writer.flush().context("flush schema")?;
    Ok(())
}
