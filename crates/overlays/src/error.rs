use foundation::ids::OverlayId;

use crate::stamp::StampRef;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayError {
    /// An add named an id that is already live.
    AlreadyRegistered(OverlayId),
    /// The same id appeared twice in one add batch.
    DuplicateInBatch(OverlayId),
    /// A change named an id that is not live.
    UnknownId(OverlayId),
    /// The stamp reference did not resolve to usable image data.
    StampUnavailable { id: OverlayId, stamp: StampRef },
}

impl std::fmt::Display for OverlayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OverlayError::AlreadyRegistered(id) => write!(f, "polyline '{id}' already exists"),
            OverlayError::DuplicateInBatch(id) => {
                write!(f, "polyline '{id}' appears more than once in the batch")
            }
            OverlayError::UnknownId(id) => write!(f, "unknown polyline '{id}'"),
            OverlayError::StampUnavailable { id, stamp } => {
                write!(f, "stamp for polyline '{id}' unavailable: {stamp}")
            }
        }
    }
}

impl std::error::Error for OverlayError {}
