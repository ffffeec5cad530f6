use foundation::handles::RenderHandle;
use runtime::mailbox::MailboxSender;

use crate::state::{PolylineAttribute, PolylineState};

/// The map view polylines are drawn on.
///
/// The surface is shared by every polyline but only mutated from the owning
/// controller. Taps are reported asynchronously through a
/// [`MailboxSender`] rather than by calling back into the controller.
pub trait RenderSurface {
    /// Creates a live object presenting `state` and returns its handle.
    fn attach(&mut self, state: &PolylineState) -> RenderHandle;
    /// Writes one attribute through to a live object.
    fn write(&mut self, handle: RenderHandle, attribute: PolylineAttribute<'_>);
    /// Re-presents the full state of a live object.
    fn redraw(&mut self, handle: RenderHandle, state: &PolylineState);
    /// Removes a live object. Unknown handles are ignored.
    fn detach(&mut self, handle: RenderHandle);
}

/// What a [`RecordingSurface`] currently shows for one handle.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfacePolyline {
    pub state: PolylineState,
    pub writes: u32,
    pub redraws: u32,
}

#[derive(Debug, Default)]
struct Slot {
    generation: u32,
    polyline: Option<SurfacePolyline>,
}

/// In-memory surface that mirrors what a real map view would present.
///
/// Indices of detached objects are recycled with a bumped generation.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    slots: Vec<Slot>,
    free: Vec<u32>,
    taps: Option<MailboxSender<RenderHandle>>,
    detached: u64,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Routes user taps to `sender` (normally the controller's tap mailbox).
    pub fn set_tap_sender(&mut self, sender: MailboxSender<RenderHandle>) {
        self.taps = Some(sender);
    }

    pub fn get(&self, handle: RenderHandle) -> Option<&SurfacePolyline> {
        self.slots
            .get(handle.index() as usize)
            .filter(|slot| slot.generation == handle.generation())
            .and_then(|slot| slot.polyline.as_ref())
    }

    pub fn live_count(&self) -> usize {
        self.slots.iter().filter(|s| s.polyline.is_some()).count()
    }

    pub fn detached_count(&self) -> u64 {
        self.detached
    }

    /// Live handles in ascending index order.
    pub fn handles(&self) -> Vec<RenderHandle> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.polyline.is_some())
            .map(|(idx, slot)| RenderHandle::new(idx as u32, slot.generation))
            .collect()
    }

    /// Simulates a user tap on `handle`.
    ///
    /// Only objects that consume taps report them; a tap on anything else
    /// falls through to the map. Returns `true` if a tap was posted.
    pub fn tap(&self, handle: RenderHandle) -> bool {
        let Some(polyline) = self.get(handle) else {
            return false;
        };
        if !polyline.state.consume_tap_events {
            return false;
        }
        self.taps.as_ref().is_some_and(|tx| tx.post(handle))
    }

    fn live_mut(&mut self, handle: RenderHandle) -> Option<&mut SurfacePolyline> {
        self.slots
            .get_mut(handle.index() as usize)
            .filter(|slot| slot.generation == handle.generation())
            .and_then(|slot| slot.polyline.as_mut())
    }
}

impl RenderSurface for RecordingSurface {
    fn attach(&mut self, state: &PolylineState) -> RenderHandle {
        let polyline = SurfacePolyline {
            state: state.clone(),
            writes: 0,
            redraws: 0,
        };
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.generation = slot.generation.wrapping_add(1);
            slot.polyline = Some(polyline);
            return RenderHandle::new(index, slot.generation);
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            polyline: Some(polyline),
        });
        RenderHandle::new(index, 0)
    }

    fn write(&mut self, handle: RenderHandle, attribute: PolylineAttribute<'_>) {
        match self.live_mut(handle) {
            Some(polyline) => {
                polyline.state.apply(attribute);
                polyline.writes += 1;
            }
            None => tracing::warn!("write to stale render handle {handle:?}"),
        }
    }

    fn redraw(&mut self, handle: RenderHandle, state: &PolylineState) {
        match self.live_mut(handle) {
            Some(polyline) => {
                polyline.state = state.clone();
                polyline.redraws += 1;
            }
            None => tracing::warn!("redraw of stale render handle {handle:?}"),
        }
    }

    fn detach(&mut self, handle: RenderHandle) {
        let Some(slot) = self.slots.get_mut(handle.index() as usize) else {
            return;
        };
        if slot.generation != handle.generation() || slot.polyline.take().is_none() {
            return;
        }
        self.free.push(handle.index());
        self.detached += 1;
    }
}
