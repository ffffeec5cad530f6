use foundation::color::Color;
use foundation::geo::LatLng;

use crate::pattern::PatternItem;
use crate::stamp::StampImage;

/// Polyline options writable from the declarative layer.
///
/// Every setter takes effect on the render handle immediately and is
/// idempotent. None of them can remove the overlay or change its id.
pub trait PolylineOptionsSink {
    fn set_consume_tap_events(&mut self, consume: bool);
    fn set_visible(&mut self, visible: bool);
    fn set_color(&mut self, color: Color);
    fn set_stroke_width(&mut self, width: f32);
    /// An empty path is allowed and draws nothing.
    fn set_points(&mut self, points: Vec<LatLng>);
    fn set_stamp_style(&mut self, image: StampImage);
    fn set_z_index(&mut self, z_index: i32);
    fn set_geodesic(&mut self, geodesic: bool);
    /// An empty pattern means a solid stroke.
    fn set_pattern(&mut self, pattern: Vec<PatternItem>);
}
