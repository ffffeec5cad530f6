use foundation::color::Color;
use foundation::geo::LatLng;
use foundation::ids::OverlayId;
use overlays::{PatternItem, PolylineDescriptor, PolylineEvent, StampRef};
use serde_json::Value;

use crate::error::ProtocolError;
use crate::wire::{HostEvent, PolylineOptions};

impl PolylineOptions {
    /// Interprets the options map as a descriptor.
    pub fn to_descriptor(&self) -> Result<PolylineDescriptor, ProtocolError> {
        let pattern = self
            .patterns
            .as_deref()
            .map(pattern_from_json)
            .transpose()?;
        let stamp = self
            .stamp_style
            .as_deref()
            .map(stamp_from_json)
            .transpose()?;

        Ok(PolylineDescriptor {
            id: OverlayId::new(self.polyline_id.as_str()),
            points: self
                .points
                .as_ref()
                .map(|points| points.iter().copied().map(LatLng::from).collect()),
            color: self.color.map(Color),
            width: self.width,
            z_index: self.z_index,
            visible: self.visible,
            geodesic: self.geodesic,
            consume_tap_events: self.consume_tap_events,
            pattern,
            stamp,
        })
    }
}

impl From<&PolylineEvent> for HostEvent {
    fn from(event: &PolylineEvent) -> Self {
        match event {
            PolylineEvent::Tapped { polyline_id } => HostEvent::PolylineTap {
                polyline_id: polyline_id.to_string(),
            },
        }
    }
}

/// Parses `[["dot"], ["dash", len], ["gap", len]]`.
pub fn pattern_from_json(items: &[Vec<Value>]) -> Result<Vec<PatternItem>, ProtocolError> {
    items.iter().map(|item| pattern_item_from_json(item)).collect()
}

fn pattern_item_from_json(item: &[Value]) -> Result<PatternItem, ProtocolError> {
    let kind = item
        .first()
        .and_then(Value::as_str)
        .ok_or_else(|| ProtocolError::InvalidPattern(format!("missing kind in {item:?}")))?;
    let length = || {
        item.get(1)
            .and_then(Value::as_f64)
            .filter(|len| *len >= 0.0)
            .ok_or_else(|| ProtocolError::InvalidPattern(format!("{kind} needs a length")))
    };
    match kind {
        "dot" => Ok(PatternItem::Dot),
        "dash" => Ok(PatternItem::Dash { length: length()? }),
        "gap" => Ok(PatternItem::Gap { length: length()? }),
        other => Err(ProtocolError::InvalidPattern(format!(
            "unknown pattern kind '{other}'"
        ))),
    }
}

/// Parses `["fromAsset", name]`, `["fromAssetImage", name, ...]` or `["fromBytes", [u8...]]`.
pub fn stamp_from_json(value: &[Value]) -> Result<StampRef, ProtocolError> {
    let kind = value
        .first()
        .and_then(Value::as_str)
        .ok_or_else(|| ProtocolError::InvalidStamp("missing descriptor kind".to_string()))?;
    match kind {
        "fromAsset" | "fromAssetImage" => {
            let name = value
                .get(1)
                .and_then(Value::as_str)
                .filter(|name| !name.is_empty())
                .ok_or_else(|| ProtocolError::InvalidStamp(format!("{kind} needs an asset name")))?;
            Ok(StampRef::Asset {
                name: name.to_string(),
            })
        }
        "fromBytes" => {
            let raw = value
                .get(1)
                .and_then(Value::as_array)
                .ok_or_else(|| ProtocolError::InvalidStamp("fromBytes needs a byte list".to_string()))?;
            let data = raw
                .iter()
                .map(|b| {
                    b.as_u64()
                        .and_then(|b| u8::try_from(b).ok())
                        .ok_or_else(|| ProtocolError::InvalidStamp(format!("not a byte: {b}")))
                })
                .collect::<Result<Vec<u8>, _>>()?;
            Ok(StampRef::Bytes { data })
        }
        other => Err(ProtocolError::InvalidStamp(format!(
            "unsupported descriptor '{other}'"
        ))),
    }
}
