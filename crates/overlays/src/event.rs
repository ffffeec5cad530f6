use foundation::ids::OverlayId;

/// Interaction events reported back to the declarative layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolylineEvent {
    Tapped { polyline_id: OverlayId },
}
