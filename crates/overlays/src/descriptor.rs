use foundation::color::Color;
use foundation::geo::LatLng;
use foundation::ids::OverlayId;

use crate::pattern::PatternItem;
use crate::sink::PolylineOptionsSink;
use crate::stamp::{StampImage, StampRef};
use crate::state::PolylineState;

/// Declared state of one polyline in a reconciliation batch.
///
/// `None` fields are "not present": a change leaves those attributes alone
/// and an add falls back to [`PolylineState::default`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PolylineDescriptor {
    pub id: OverlayId,
    pub points: Option<Vec<LatLng>>,
    pub color: Option<Color>,
    pub width: Option<f32>,
    pub z_index: Option<i32>,
    pub visible: Option<bool>,
    pub geodesic: Option<bool>,
    pub consume_tap_events: Option<bool>,
    pub pattern: Option<Vec<PatternItem>>,
    pub stamp: Option<StampRef>,
}

impl PolylineDescriptor {
    pub fn new(id: impl Into<OverlayId>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn points(mut self, points: Vec<LatLng>) -> Self {
        self.points = Some(points);
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn width(mut self, width: f32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn z_index(mut self, z_index: i32) -> Self {
        self.z_index = Some(z_index);
        self
    }

    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = Some(visible);
        self
    }

    pub fn geodesic(mut self, geodesic: bool) -> Self {
        self.geodesic = Some(geodesic);
        self
    }

    pub fn consume_tap_events(mut self, consume: bool) -> Self {
        self.consume_tap_events = Some(consume);
        self
    }

    pub fn pattern(mut self, pattern: Vec<PatternItem>) -> Self {
        self.pattern = Some(pattern);
        self
    }

    pub fn stamp(mut self, stamp: StampRef) -> Self {
        self.stamp = Some(stamp);
        self
    }

    /// Initial state for a newly added polyline.
    ///
    /// `stamp` is the already-resolved image for [`Self::stamp`].
    pub fn initial_state(&self, stamp: Option<StampImage>) -> PolylineState {
        let defaults = PolylineState::default();
        PolylineState {
            points: self.points.clone().unwrap_or_default(),
            color: self.color.unwrap_or(defaults.color),
            width: self.width.unwrap_or(defaults.width),
            z_index: self.z_index.unwrap_or(defaults.z_index),
            visible: self.visible.unwrap_or(defaults.visible),
            geodesic: self.geodesic.unwrap_or(defaults.geodesic),
            consume_tap_events: self.consume_tap_events.unwrap_or(defaults.consume_tap_events),
            pattern: self.pattern.clone().unwrap_or_default(),
            stamp,
        }
    }

    /// Pushes every present attribute through `sink`.
    pub fn apply_to(&self, sink: &mut impl PolylineOptionsSink, stamp: Option<StampImage>) {
        if let Some(consume) = self.consume_tap_events {
            sink.set_consume_tap_events(consume);
        }
        if let Some(color) = self.color {
            sink.set_color(color);
        }
        if let Some(geodesic) = self.geodesic {
            sink.set_geodesic(geodesic);
        }
        if let Some(pattern) = &self.pattern {
            sink.set_pattern(pattern.clone());
        }
        if let Some(points) = &self.points {
            sink.set_points(points.clone());
        }
        if let Some(visible) = self.visible {
            sink.set_visible(visible);
        }
        if let Some(width) = self.width {
            sink.set_stroke_width(width);
        }
        if let Some(z_index) = self.z_index {
            sink.set_z_index(z_index);
        }
        if let Some(image) = stamp {
            sink.set_stamp_style(image);
        }
    }
}
