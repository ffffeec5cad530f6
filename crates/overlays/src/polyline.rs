use std::cell::RefCell;
use std::rc::Rc;

use foundation::color::Color;
use foundation::geo::LatLng;
use foundation::handles::RenderHandle;
use foundation::ids::OverlayId;

use crate::pattern::PatternItem;
use crate::sink::PolylineOptionsSink;
use crate::stamp::StampImage;
use crate::state::{PolylineAttribute, PolylineState};
use crate::surface::RenderSurface;

/// One polyline and the live object presenting it.
///
/// The render handle is owned exclusively by this value: it is attached on
/// construction and detached when the polyline is dropped.
pub struct Polyline<S: RenderSurface> {
    id: OverlayId,
    state: PolylineState,
    handle: RenderHandle,
    surface: Rc<RefCell<S>>,
}

impl<S: RenderSurface> Polyline<S> {
    pub fn attach(id: OverlayId, state: PolylineState, surface: Rc<RefCell<S>>) -> Self {
        let handle = surface.borrow_mut().attach(&state);
        Self {
            id,
            state,
            handle,
            surface,
        }
    }

    pub fn id(&self) -> &OverlayId {
        &self.id
    }

    pub fn handle(&self) -> RenderHandle {
        self.handle
    }

    pub fn state(&self) -> &PolylineState {
        &self.state
    }

    pub fn points(&self) -> &[LatLng] {
        &self.state.points
    }

    pub fn color(&self) -> Color {
        self.state.color
    }

    pub fn width(&self) -> f32 {
        self.state.width
    }

    pub fn z_index(&self) -> i32 {
        self.state.z_index
    }

    pub fn visible(&self) -> bool {
        self.state.visible
    }

    pub fn geodesic(&self) -> bool {
        self.state.geodesic
    }

    pub fn consumes_tap_events(&self) -> bool {
        self.state.consume_tap_events
    }

    pub fn pattern(&self) -> &[PatternItem] {
        &self.state.pattern
    }

    pub fn stamp(&self) -> Option<&StampImage> {
        self.state.stamp.as_ref()
    }

    /// Re-presents the current state on the surface.
    pub fn redraw(&self) {
        self.surface.borrow_mut().redraw(self.handle, &self.state);
    }

    fn write(&self, attribute: PolylineAttribute<'_>) {
        self.surface.borrow_mut().write(self.handle, attribute);
    }
}

impl<S: RenderSurface> PolylineOptionsSink for Polyline<S> {
    fn set_consume_tap_events(&mut self, consume: bool) {
        self.state.consume_tap_events = consume;
        self.write(PolylineAttribute::ConsumeTapEvents(consume));
    }

    fn set_visible(&mut self, visible: bool) {
        self.state.visible = visible;
        self.write(PolylineAttribute::Visible(visible));
    }

    fn set_color(&mut self, color: Color) {
        self.state.color = color;
        self.write(PolylineAttribute::Color(color));
    }

    fn set_stroke_width(&mut self, width: f32) {
        self.state.width = width;
        self.write(PolylineAttribute::Width(width));
    }

    fn set_points(&mut self, points: Vec<LatLng>) {
        self.state.points = points;
        self.write(PolylineAttribute::Points(&self.state.points));
    }

    fn set_stamp_style(&mut self, image: StampImage) {
        self.state.stamp = Some(image);
        if let Some(image) = &self.state.stamp {
            self.write(PolylineAttribute::Stamp(image));
        }
    }

    fn set_z_index(&mut self, z_index: i32) {
        self.state.z_index = z_index;
        self.write(PolylineAttribute::ZIndex(z_index));
    }

    fn set_geodesic(&mut self, geodesic: bool) {
        self.state.geodesic = geodesic;
        self.write(PolylineAttribute::Geodesic(geodesic));
    }

    fn set_pattern(&mut self, pattern: Vec<PatternItem>) {
        self.state.pattern = pattern;
        self.write(PolylineAttribute::Pattern(&self.state.pattern));
    }
}

impl<S: RenderSurface> Drop for Polyline<S> {
    fn drop(&mut self) {
        // Same borrow discipline as the setters: a busy surface is a bug in
        // the owner, never a reason to leave the handle attached.
        self.surface.borrow_mut().detach(self.handle);
    }
}

impl<S: RenderSurface> std::fmt::Debug for Polyline<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Polyline")
            .field("id", &self.id)
            .field("handle", &self.handle)
            .field("state", &self.state)
            .finish()
    }
}
