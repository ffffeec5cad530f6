use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use foundation::handles::RenderHandle;
use foundation::ids::OverlayId;
use runtime::event_bus::EventSink;
use runtime::mailbox::{Mailbox, MailboxSender};
use tracing::{debug, warn};

use crate::descriptor::PolylineDescriptor;
use crate::error::OverlayError;
use crate::event::PolylineEvent;
use crate::polyline::Polyline;
use crate::stamp::{ImageResolver, StampImage};
use crate::surface::RenderSurface;

/// Identity-keyed registry of the polylines shown on one surface.
///
/// The controller is the single writer for the registry and the surface.
/// It is deliberately `!Send`: surface threads talk to it only through
/// [`Self::tap_sender`].
///
/// Batches are applied descriptor by descriptor with no rollback. When a
/// batch fails, the descriptors before the failing one stay applied.
pub struct PolylinesController<S, R, E>
where
    S: RenderSurface,
    R: ImageResolver,
    E: EventSink<PolylineEvent>,
{
    surface: Rc<RefCell<S>>,
    images: R,
    events: E,
    polylines: HashMap<OverlayId, Polyline<S>>,
    by_handle: HashMap<RenderHandle, OverlayId>,
    taps: Mailbox<RenderHandle>,
}

impl<S, R, E> PolylinesController<S, R, E>
where
    S: RenderSurface,
    R: ImageResolver,
    E: EventSink<PolylineEvent>,
{
    pub fn new(surface: Rc<RefCell<S>>, images: R, events: E) -> Self {
        Self {
            surface,
            images,
            events,
            polylines: HashMap::new(),
            by_handle: HashMap::new(),
            taps: Mailbox::new(),
        }
    }

    /// Sender the surface uses to report taps on render handles.
    pub fn tap_sender(&self) -> MailboxSender<RenderHandle> {
        self.taps.sender()
    }

    pub fn surface(&self) -> &Rc<RefCell<S>> {
        &self.surface
    }

    pub fn events(&self) -> &E {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut E {
        &mut self.events
    }

    pub fn len(&self) -> usize {
        self.polylines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.polylines.is_empty()
    }

    /// Live ids in ascending order.
    pub fn ids(&self) -> Vec<&OverlayId> {
        let mut ids: Vec<_> = self.polylines.keys().collect();
        ids.sort();
        ids
    }

    pub fn has_polyline(&self, id: &str) -> bool {
        self.polylines.contains_key(id)
    }

    pub fn polyline(&self, id: &str) -> Option<&Polyline<S>> {
        self.polylines.get(id)
    }

    /// Creates a polyline for every descriptor.
    ///
    /// Every id must be new: ids already live, or repeated within the batch,
    /// fail the batch at that descriptor and leave the existing polyline as it was.
    pub fn add_polylines(&mut self, descriptors: &[PolylineDescriptor]) -> Result<(), OverlayError> {
        debug!("adding {} polylines", descriptors.len());
        let mut added: HashSet<&OverlayId> = HashSet::with_capacity(descriptors.len());

        for descriptor in descriptors {
            let id = &descriptor.id;
            if self.polylines.contains_key(id) {
                let err = if added.contains(id) {
                    OverlayError::DuplicateInBatch(id.clone())
                } else {
                    OverlayError::AlreadyRegistered(id.clone())
                };
                warn!("rejecting add: {err}");
                return Err(err);
            }

            let stamp = resolve_stamp(&self.images, descriptor)?;
            let polyline = Polyline::attach(
                id.clone(),
                descriptor.initial_state(stamp),
                Rc::clone(&self.surface),
            );
            self.by_handle.insert(polyline.handle(), id.clone());
            self.polylines.insert(id.clone(), polyline);
            added.insert(id);
        }
        Ok(())
    }

    /// Applies the present attributes of each descriptor to its live polyline.
    pub fn change_polylines(
        &mut self,
        descriptors: &[PolylineDescriptor],
    ) -> Result<(), OverlayError> {
        debug!("changing {} polylines", descriptors.len());

        for descriptor in descriptors {
            let Some(polyline) = self.polylines.get_mut(&descriptor.id) else {
                let err = OverlayError::UnknownId(descriptor.id.clone());
                warn!("rejecting change: {err}");
                return Err(err);
            };
            let stamp = resolve_stamp(&self.images, descriptor)?;
            descriptor.apply_to(polyline, stamp);
        }
        Ok(())
    }

    /// Removes and detaches the named polylines. Unknown ids are skipped.
    ///
    /// Returns how many polylines were removed.
    pub fn remove_polyline_ids(&mut self, ids: &[OverlayId]) -> usize {
        let mut removed = 0;
        for id in ids {
            let Some(polyline) = self.polylines.remove(id) else {
                debug!("remove of unknown polyline '{id}' ignored");
                continue;
            };
            self.by_handle.remove(&polyline.handle());
            // Dropping detaches the render handle.
            drop(polyline);
            removed += 1;
        }
        debug!("removed {removed} of {} polylines", ids.len());
        removed
    }

    /// Removes every polyline.
    pub fn clear(&mut self) {
        self.by_handle.clear();
        self.polylines.clear();
    }

    /// Reports a tap on `id` to the declarative layer.
    ///
    /// Taps on polylines that do not consume them, or that were removed while
    /// the tap was in flight, are dropped. Returns `true` if an event was sent.
    pub fn on_polyline_tap(&mut self, id: &str) -> bool {
        match self.polylines.get(id) {
            Some(polyline) if polyline.consumes_tap_events() => {
                self.events.send(PolylineEvent::Tapped {
                    polyline_id: polyline.id().clone(),
                });
                true
            }
            Some(_) => {
                debug!("polyline '{id}' does not consume taps");
                false
            }
            None => {
                debug!("suppressing tap on removed polyline '{id}'");
                false
            }
        }
    }

    /// Dispatches every tap the surface has posted so far.
    ///
    /// Returns the number of events sent.
    pub fn pump_taps(&mut self) -> usize {
        let mut sent = 0;
        for handle in self.taps.drain() {
            if self.dispatch_tap(handle) {
                sent += 1;
            }
        }
        sent
    }

    /// Waits for the next tap from the surface and dispatches it.
    ///
    /// The tap mailbox holds a sender of its own, so this only returns once a
    /// tap has arrived. The result says whether it produced an event.
    pub async fn next_tap(&mut self) -> bool {
        let Some(handle) = self.taps.recv().await else {
            unreachable!("tap mailbox keeps its own sender");
        };
        self.dispatch_tap(handle)
    }

    /// Re-presents every polyline's current state.
    pub fn redraw_polylines(&self) {
        for polyline in self.polylines.values() {
            polyline.redraw();
        }
    }

    fn dispatch_tap(&mut self, handle: RenderHandle) -> bool {
        let Some(id) = self.by_handle.get(&handle).cloned() else {
            debug!("suppressing tap on stale handle {handle:?}");
            return false;
        };
        self.on_polyline_tap(id.as_str())
    }
}

fn resolve_stamp<R: ImageResolver>(
    images: &R,
    descriptor: &PolylineDescriptor,
) -> Result<Option<StampImage>, OverlayError> {
    let Some(stamp) = &descriptor.stamp else {
        return Ok(None);
    };
    match images.resolve(stamp) {
        Some(image) => Ok(Some(image)),
        None => {
            let err = OverlayError::StampUnavailable {
                id: descriptor.id.clone(),
                stamp: stamp.clone(),
            };
            warn!("{err}");
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::PolylinesController;
    use crate::descriptor::PolylineDescriptor;
    use crate::error::OverlayError;
    use crate::event::PolylineEvent;
    use crate::stamp::{StampImage, StampRef, StaticImageResolver};
    use crate::surface::RecordingSurface;
    use foundation::color::Color;
    use foundation::geo::LatLng;
    use foundation::ids::OverlayId;
    use pretty_assertions::assert_eq;
    use runtime::event_bus::EventBus;

    type Controller = PolylinesController<RecordingSurface, StaticImageResolver, EventBus<PolylineEvent>>;

    fn controller() -> Controller {
        let images = StaticImageResolver::new()
            .with_asset("arrow", StampImage::new(vec![0x89u8, 0x50]).unwrap());
        let surface = Rc::new(RefCell::new(RecordingSurface::new()));
        let controller = PolylinesController::new(surface, images, EventBus::new());
        let sender = controller.tap_sender();
        controller.surface().borrow_mut().set_tap_sender(sender);
        controller
    }

    fn path() -> Vec<LatLng> {
        vec![
            LatLng::new(52.0, 4.0),
            LatLng::new(52.1, 4.1),
            LatLng::new(52.2, 4.3),
        ]
    }

    fn tapped(id: &str) -> PolylineEvent {
        PolylineEvent::Tapped {
            polyline_id: OverlayId::new(id),
        }
    }

    #[test]
    fn add_registers_and_attaches() {
        let mut c = controller();
        c.add_polylines(&[
            PolylineDescriptor::new("a").points(path()),
            PolylineDescriptor::new("b"),
        ])
        .unwrap();

        assert!(c.has_polyline("a"));
        assert!(c.has_polyline("b"));
        assert_eq!(c.len(), 2);
        assert_eq!(c.surface().borrow().live_count(), 2);
        assert_eq!(c.polyline("a").unwrap().points(), path().as_slice());
    }

    #[test]
    fn add_of_live_id_fails_and_keeps_existing_polyline() {
        let mut c = controller();
        c.add_polylines(&[PolylineDescriptor::new("a").width(2.0)]).unwrap();
        let before = c.polyline("a").unwrap().state().clone();

        let err = c
            .add_polylines(&[PolylineDescriptor::new("a").width(9.0)])
            .unwrap_err();

        assert_eq!(err, OverlayError::AlreadyRegistered(OverlayId::new("a")));
        assert_eq!(c.polyline("a").unwrap().state(), &before);
        assert_eq!(c.surface().borrow().live_count(), 1);
    }

    #[test]
    fn duplicate_in_batch_is_reported_after_partial_application() {
        let mut c = controller();
        let err = c
            .add_polylines(&[
                PolylineDescriptor::new("a"),
                PolylineDescriptor::new("b"),
                PolylineDescriptor::new("a"),
            ])
            .unwrap_err();

        assert_eq!(err, OverlayError::DuplicateInBatch(OverlayId::new("a")));
        assert!(c.has_polyline("a"));
        assert!(c.has_polyline("b"));
    }

    #[test]
    fn change_applies_only_present_attributes() {
        let mut c = controller();
        c.add_polylines(&[PolylineDescriptor::new("a")
            .points(path())
            .color(Color(0xFFFF_0000))])
            .unwrap();

        c.change_polylines(&[PolylineDescriptor::new("a").width(5.0)])
            .unwrap();

        let line = c.polyline("a").unwrap();
        assert_eq!(line.width(), 5.0);
        assert_eq!(line.points(), path().as_slice());
        assert_eq!(line.color(), Color(0xFFFF_0000));
        let surface = c.surface().borrow();
        assert_eq!(&surface.get(line.handle()).unwrap().state, line.state());
    }

    #[test]
    fn change_of_unknown_id_fails_after_earlier_descriptors_applied() {
        let mut c = controller();
        c.add_polylines(&[PolylineDescriptor::new("a")]).unwrap();

        let err = c
            .change_polylines(&[
                PolylineDescriptor::new("a").z_index(3),
                PolylineDescriptor::new("ghost").z_index(3),
            ])
            .unwrap_err();

        assert_eq!(err, OverlayError::UnknownId(OverlayId::new("ghost")));
        assert_eq!(c.polyline("a").unwrap().z_index(), 3);
        assert!(!c.has_polyline("ghost"));
    }

    #[test]
    fn unresolvable_stamp_keeps_previous_rendering() {
        let mut c = controller();
        c.add_polylines(&[PolylineDescriptor::new("a").stamp(StampRef::Asset {
            name: "arrow".into(),
        })])
        .unwrap();
        let before = c.polyline("a").unwrap().state().clone();
        assert!(before.stamp.is_some());

        let missing = StampRef::Asset {
            name: "missing".into(),
        };
        let err = c
            .change_polylines(&[PolylineDescriptor::new("a")
                .width(1.0)
                .stamp(missing.clone())])
            .unwrap_err();

        assert_eq!(
            err,
            OverlayError::StampUnavailable {
                id: OverlayId::new("a"),
                stamp: missing,
            }
        );
        assert_eq!(c.polyline("a").unwrap().state(), &before);
    }

    #[test]
    fn add_with_unresolvable_stamp_creates_nothing() {
        let mut c = controller();
        let result = c.add_polylines(&[PolylineDescriptor::new("a").stamp(StampRef::Bytes {
            data: Vec::new(),
        })]);
        assert!(result.is_err());
        assert!(!c.has_polyline("a"));
        assert_eq!(c.surface().borrow().live_count(), 0);
    }

    #[test]
    fn remove_detaches_and_tolerates_unknown_ids() {
        let mut c = controller();
        c.add_polylines(&[PolylineDescriptor::new("a"), PolylineDescriptor::new("b")])
            .unwrap();

        let removed = c.remove_polyline_ids(&[OverlayId::new("a"), OverlayId::new("zzz")]);
        assert_eq!(removed, 1);
        assert!(!c.has_polyline("a"));
        assert_eq!(c.surface().borrow().live_count(), 1);

        assert_eq!(c.remove_polyline_ids(&[OverlayId::new("a")]), 0);
        assert_eq!(c.ids(), vec![&OverlayId::new("b")]);
        assert_eq!(c.surface().borrow().live_count(), 1);
    }

    #[test]
    fn removed_id_can_be_added_again() {
        let mut c = controller();
        c.add_polylines(&[PolylineDescriptor::new("a")]).unwrap();
        c.remove_polyline_ids(&[OverlayId::new("a")]);
        c.add_polylines(&[PolylineDescriptor::new("a").width(7.0)])
            .unwrap();
        assert_eq!(c.polyline("a").unwrap().width(), 7.0);
    }

    #[test]
    fn tap_is_reported_only_for_consuming_polylines() {
        let mut c = controller();
        c.add_polylines(&[
            PolylineDescriptor::new("tappable").consume_tap_events(true),
            PolylineDescriptor::new("passive"),
        ])
        .unwrap();

        assert!(c.on_polyline_tap("tappable"));
        assert!(!c.on_polyline_tap("passive"));
        assert!(!c.on_polyline_tap("absent"));
        assert_eq!(c.events().events(), &[tapped("tappable")]);
    }

    #[test]
    fn surface_taps_are_marshaled_through_the_mailbox() {
        let mut c = controller();
        c.add_polylines(&[PolylineDescriptor::new("a").consume_tap_events(true)])
            .unwrap();
        let handle = c.polyline("a").unwrap().handle();

        assert!(c.surface().borrow().tap(handle));
        assert!(c.events().is_empty());

        assert_eq!(c.pump_taps(), 1);
        assert_eq!(c.events_mut().drain(), vec![tapped("a")]);
    }

    #[test]
    fn in_flight_tap_for_removed_polyline_is_dropped() {
        let mut c = controller();
        c.add_polylines(&[PolylineDescriptor::new("a").consume_tap_events(true)])
            .unwrap();
        let handle = c.polyline("a").unwrap().handle();
        c.surface().borrow().tap(handle);

        c.remove_polyline_ids(&[OverlayId::new("a")]);
        c.add_polylines(&[PolylineDescriptor::new("b").consume_tap_events(true)])
            .unwrap();

        assert_eq!(c.pump_taps(), 0);
        assert!(c.events().is_empty());
    }

    #[test]
    fn redraw_touches_every_polyline() {
        let mut c = controller();
        c.add_polylines(&[PolylineDescriptor::new("a"), PolylineDescriptor::new("b")])
            .unwrap();
        c.redraw_polylines();

        let surface = c.surface().borrow();
        for handle in surface.handles() {
            assert_eq!(surface.get(handle).unwrap().redraws, 1);
        }
    }

    #[test]
    fn dropping_controller_detaches_everything() {
        let c = {
            let mut c = controller();
            c.add_polylines(&[PolylineDescriptor::new("a"), PolylineDescriptor::new("b")])
                .unwrap();
            c
        };
        let surface = c.surface().clone();
        drop(c);
        assert_eq!(surface.borrow().live_count(), 0);
        assert_eq!(surface.borrow().detached_count(), 2);
    }

    #[test]
    #[should_panic]
    fn remove_never_leaves_handle_attached_when_surface_is_busy() {
        let mut c = controller();
        c.add_polylines(&[PolylineDescriptor::new("a")]).unwrap();
        let surface = Rc::clone(c.surface());
        let _busy = surface.borrow();
        c.remove_polyline_ids(&[OverlayId::new("a")]);
    }

    #[test]
    fn remove_releases_handle_once_surface_is_free() {
        let mut c = controller();
        c.add_polylines(&[PolylineDescriptor::new("a")]).unwrap();
        let handle = c.polyline("a").unwrap().handle();
        {
            let _read = c.surface().borrow();
        }
        c.remove_polyline_ids(&[OverlayId::new("a")]);
        assert!(!c.has_polyline("a"));
        assert!(c.surface().borrow().get(handle).is_none());
        assert_eq!(c.surface().borrow().live_count(), 0);
    }

    #[test]
    fn clear_removes_everything() {
        let mut c = controller();
        c.add_polylines(&[PolylineDescriptor::new("a"), PolylineDescriptor::new("b")])
            .unwrap();
        c.clear();
        assert!(c.is_empty());
        assert_eq!(c.surface().borrow().live_count(), 0);
    }

    #[tokio::test]
    async fn next_tap_awaits_surface_delivery() {
        let mut c = controller();
        c.add_polylines(&[PolylineDescriptor::new("a").consume_tap_events(true)])
            .unwrap();
        let handle = c.polyline("a").unwrap().handle();
        let sender = c.tap_sender();
        std::thread::spawn(move || sender.post(handle))
            .join()
            .unwrap();

        assert!(c.next_tap().await);
        assert_eq!(c.events().events(), &[tapped("a")]);
    }
}
