use foundation::ids::OverlayId;
use overlays::{ImageResolver, PolylineEvent, PolylinesController, RenderSurface};
use runtime::event_bus::EventSink;
use tracing::debug;

use crate::error::ProtocolError;
use crate::wire::{HostEvent, MethodCall, PolylineUpdates};

/// Counts of what one `polylines#update` call did.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct UpdateSummary {
    pub added: usize,
    pub changed: usize,
    pub removed: usize,
}

pub fn decode_call(text: &str) -> Result<MethodCall, ProtocolError> {
    Ok(serde_json::from_str(text)?)
}

pub fn encode_event(event: &PolylineEvent) -> Result<String, ProtocolError> {
    Ok(serde_json::to_string(&HostEvent::from(event))?)
}

/// Executes a host call against the controller.
pub fn handle_call<S, R, E>(
    controller: &mut PolylinesController<S, R, E>,
    call: MethodCall,
) -> Result<UpdateSummary, ProtocolError>
where
    S: RenderSurface,
    R: ImageResolver,
    E: EventSink<PolylineEvent>,
{
    match call {
        MethodCall::PolylinesUpdate(updates) => apply_updates(controller, &updates),
    }
}

/// Applies one batch in host order: add, change, remove.
///
/// Every options map is interpreted before the controller is touched, so a
/// malformed message changes nothing. Controller failures follow the
/// controller's partial-application rules.
pub fn apply_updates<S, R, E>(
    controller: &mut PolylinesController<S, R, E>,
    updates: &PolylineUpdates,
) -> Result<UpdateSummary, ProtocolError>
where
    S: RenderSurface,
    R: ImageResolver,
    E: EventSink<PolylineEvent>,
{
    let to_add = updates
        .polylines_to_add
        .iter()
        .map(|o| o.to_descriptor())
        .collect::<Result<Vec<_>, _>>()?;
    let to_change = updates
        .polylines_to_change
        .iter()
        .map(|o| o.to_descriptor())
        .collect::<Result<Vec<_>, _>>()?;
    let to_remove: Vec<OverlayId> = updates
        .polyline_ids_to_remove
        .iter()
        .map(|id| OverlayId::new(id.as_str()))
        .collect();

    debug!(
        "polylines#update: +{} ~{} -{}",
        to_add.len(),
        to_change.len(),
        to_remove.len()
    );

    controller.add_polylines(&to_add)?;
    controller.change_polylines(&to_change)?;
    let removed = controller.remove_polyline_ids(&to_remove);

    Ok(UpdateSummary {
        added: to_add.len(),
        changed: to_change.len(),
        removed,
    })
}
