use geojson::{Feature, Geometry, JsonObject, JsonValue, Value, feature};
use math::{Heading, Length, LngLat, geodesy};
use serde::{Deserialize, Serialize};


/// Property key set by the drawing layer on true circles.
pub const IS_CIRCLE_KEY: &str = "isCircle";
/// Property key set by the drawing layer on rectangles.
pub const IS_RECTANGLE_KEY: &str = "isRectangle";
/// Property key holding the `[lng, lat]` center of a true circle.
pub const CENTER_KEY: &str = "center";
/// Property key holding the radius of a true circle in meters.
pub const RADIUS_KEY: &str = "radius";

/// The user-drawn input area: the outer ring of a GeoJSON polygon.
///
/// The ring is always closed and has at least 4 finite positions.
/// Serialized as a GeoJSON `Feature`; all feature properties are preserved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Feature", into = "Feature")]
pub struct Shape {
    ring:           Vec<LngLat>,
    /// Feature identifier assigned by the drawing layer.
    pub id:         Option<feature::Id>,
    /// Feature properties attached by the drawing layer.
    pub properties: JsonObject,
}

impl Shape {
    /// Creates a shape from a closed ring.
    ///
    /// # Errors
    /// Returns an error if the ring is not closed,
    /// has fewer than 4 positions or contains non-finite coordinates.
    pub fn from_ring(ring: Vec<LngLat>) -> Result<Self, ShapeError> {
        if ring.len() < 4 {
            return Err(ShapeError::TooFewPositions(ring.len()));
        }
        if let Some(index) = ring.iter().position(|point| !point.is_finite()) {
            return Err(ShapeError::NonFinite(index));
        }
        if ring.first() != ring.last() {
            return Err(ShapeError::Unclosed);
        }
        Ok(Self { ring, id: None, properties: JsonObject::new() })
    }

    /// Approximates a circle with `steps` vertices and tags it as a true circle.
    ///
    /// # Errors
    /// Returns an error if the inputs produce a degenerate or non-finite ring.
    pub fn circle(center: LngLat, radius: Length, steps: usize) -> Result<Self, ShapeError> {
        let mut ring: Vec<_> = (0..steps)
            .map(|step| {
                let bearing = Heading::from_degrees(-360. * step as f64 / steps as f64);
                geodesy::destination(center, radius, bearing)
            })
            .collect();
        if let Some(&first) = ring.first() {
            ring.push(first);
        }

        let mut shape = Self::from_ring(ring)?;
        shape.properties.insert(IS_CIRCLE_KEY.into(), JsonValue::Bool(true));
        shape.properties.insert(CENTER_KEY.into(), serde_json::json!(center.into_position()));
        shape.properties.insert(RADIUS_KEY.into(), serde_json::json!(radius.into_meters()));
        Ok(shape)
    }

    /// The closed outer ring, including the repeated closing position.
    #[must_use]
    pub fn ring(&self) -> &[LngLat] { &self.ring }

    /// The ring vertices without the closing position.
    #[must_use]
    pub fn vertices(&self) -> &[LngLat] { &self.ring[..self.ring.len() - 1] }

    /// The exact center and radius if the drawing layer marked this shape as a true circle.
    #[must_use]
    pub fn circle_params(&self) -> Option<Circle> {
        if self.properties.get(IS_CIRCLE_KEY) != Some(&JsonValue::Bool(true)) {
            return None;
        }

        let center = self.properties.get(CENTER_KEY)?.as_array()?;
        let center: Vec<f64> = center.iter().map(JsonValue::as_f64).collect::<Option<_>>()?;
        let center = LngLat::from_position(&center).filter(|center| center.is_finite())?;

        let radius = self.properties.get(RADIUS_KEY)?.as_f64()?;
        let radius = Length::from_meters(radius);
        (radius.is_finite() && radius.is_positive()).then_some(Circle { center, radius })
    }

    /// Whether the drawing layer marked this shape as a rectangle.
    #[must_use]
    pub fn is_rectangle(&self) -> bool {
        self.properties.get(IS_RECTANGLE_KEY) == Some(&JsonValue::Bool(true))
    }
}

/// Exact parameters of a circular shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    /// Center of the circle.
    pub center: LngLat,
    /// Radius of the circle.
    pub radius: Length,
}

impl TryFrom<Feature> for Shape {
    type Error = ShapeError;

    fn try_from(feature: Feature) -> Result<Self, ShapeError> {
        let geometry = feature.geometry.ok_or(ShapeError::MissingGeometry)?;
        Self::try_from(geometry).map(|shape| Self {
            id: feature.id,
            properties: feature.properties.unwrap_or_default(),
            ..shape
        })
    }
}

impl TryFrom<Geometry> for Shape {
    type Error = ShapeError;

    fn try_from(geometry: Geometry) -> Result<Self, ShapeError> {
        let rings = match geometry.value {
            Value::Polygon(rings) => rings,
            other => return Err(ShapeError::NotPolygon(geometry_type_name(&other))),
        };
        let outer = rings.into_iter().next().ok_or(ShapeError::TooFewPositions(0))?;
        let ring = outer
            .iter()
            .enumerate()
            .map(|(index, position)| {
                LngLat::from_position(position).ok_or(ShapeError::InvalidPosition(index))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_ring(ring)
    }
}

fn geometry_type_name(value: &Value) -> &'static str {
    match value {
        Value::Point(_) => "Point",
        Value::MultiPoint(_) => "MultiPoint",
        Value::LineString(_) => "LineString",
        Value::MultiLineString(_) => "MultiLineString",
        Value::Polygon(_) => "Polygon",
        Value::MultiPolygon(_) => "MultiPolygon",
        Value::GeometryCollection(_) => "GeometryCollection",
    }
}

impl From<Shape> for Feature {
    fn from(shape: Shape) -> Self {
        let ring = shape.ring.into_iter().map(LngLat::into_position).collect();
        Feature {
            bbox:            None,
            geometry:        Some(Geometry::new(Value::Polygon(vec![ring]))),
            id:              shape.id,
            properties:      Some(shape.properties),
            foreign_members: None,
        }
    }
}

#[cfg(feature = "schema")]
impl schemars::JsonSchema for Shape {
    fn schema_name() -> std::borrow::Cow<'static, str> { "Shape".into() }

    fn json_schema(_: &mut schemars::SchemaGenerator) -> schemars::Schema {
        schemars::json_schema!({
            "type": "object",
            "description": "GeoJSON Feature with a Polygon geometry",
            "required": ["type", "geometry"],
            "properties": {
                "type": { "const": "Feature" },
                "geometry": {
                    "type": "object",
                    "required": ["type", "coordinates"],
                    "properties": {
                        "type": { "const": "Polygon" },
                        "coordinates": {
                            "type": "array",
                            "items": {
                                "type": "array",
                                "minItems": 4,
                                "items": { "type": "array", "items": { "type": "number" } },
                            },
                        },
                    },
                },
                "properties": { "type": ["object", "null"] },
            },
        })
    }
}

/// A GeoJSON value is not a usable input area.
#[derive(Debug, thiserror::Error)]
pub enum ShapeError {
    /// The feature has a null geometry.
    #[error("Feature has no geometry")]
    MissingGeometry,
    /// The geometry is not a polygon. Multi-polygons are not supported.
    #[error("Expected a Polygon geometry, got {0}")]
    NotPolygon(&'static str),
    /// The outer ring is missing or too short to enclose an area.
    #[error("Polygon ring has {0} positions, at least 4 are required")]
    TooFewPositions(usize),
    /// A position in the outer ring has fewer than two components.
    #[error("Polygon ring position #{0} has fewer than 2 components")]
    InvalidPosition(usize),
    /// A position in the outer ring is NaN or infinite.
    #[error("Polygon ring position #{0} is not finite")]
    NonFinite(usize),
    /// The first and last positions of the outer ring differ.
    #[error("Polygon ring is not closed")]
    Unclosed,
}
