use foundation::color::Color;
use foundation::geo::LatLng;

use crate::pattern::PatternItem;
use crate::stamp::StampImage;

/// Stroke width applied when the host does not specify one.
pub const DEFAULT_STROKE_WIDTH: f32 = 10.0;

/// Observable rendering state of one polyline.
#[derive(Debug, Clone, PartialEq)]
pub struct PolylineState {
    pub points: Vec<LatLng>,
    pub color: Color,
    pub width: f32,
    pub z_index: i32,
    pub visible: bool,
    pub geodesic: bool,
    pub consume_tap_events: bool,
    pub pattern: Vec<PatternItem>,
    pub stamp: Option<StampImage>,
}

impl Default for PolylineState {
    fn default() -> Self {
        Self {
            points: Vec::new(),
            color: Color::BLACK,
            width: DEFAULT_STROKE_WIDTH,
            z_index: 0,
            visible: true,
            geodesic: false,
            consume_tap_events: false,
            pattern: Vec::new(),
            stamp: None,
        }
    }
}

impl PolylineState {
    pub fn with_points(points: Vec<LatLng>) -> Self {
        Self {
            points,
            ..Self::default()
        }
    }

    /// Applies a single attribute write.
    pub fn apply(&mut self, attribute: PolylineAttribute<'_>) {
        match attribute {
            PolylineAttribute::Points(points) => self.points = points.to_vec(),
            PolylineAttribute::Color(color) => self.color = color,
            PolylineAttribute::Width(width) => self.width = width,
            PolylineAttribute::ZIndex(z) => self.z_index = z,
            PolylineAttribute::Visible(visible) => self.visible = visible,
            PolylineAttribute::Geodesic(geodesic) => self.geodesic = geodesic,
            PolylineAttribute::ConsumeTapEvents(consume) => self.consume_tap_events = consume,
            PolylineAttribute::Pattern(pattern) => self.pattern = pattern.to_vec(),
            PolylineAttribute::Stamp(image) => self.stamp = Some(image.clone()),
        }
    }
}

/// One attribute write flowing from an entity to its render handle.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum PolylineAttribute<'a> {
    Points(&'a [LatLng]),
    Color(Color),
    Width(f32),
    ZIndex(i32),
    Visible(bool),
    Geodesic(bool),
    ConsumeTapEvents(bool),
    Pattern(&'a [PatternItem]),
    Stamp(&'a StampImage),
}
