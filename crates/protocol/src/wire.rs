//! Wire format of the polyline event bridge.
//!
//! This module defines the JSON messages exchanged with the declarative host:
//! - Method calls carrying reconciliation batches (host → controller)
//! - Interaction events (controller → host)
//!
//! Messages use the host's method-channel shape, `{"method": ..., "arguments": ...}`,
//! with camelCase keys. The transport carrying them is not part of this crate.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Inbound call from the declarative layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", content = "arguments")]
pub enum MethodCall {
    #[serde(rename = "polylines#update")]
    PolylinesUpdate(PolylineUpdates),
}

/// One reconciliation batch, pre-classified by the host.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolylineUpdates {
    #[serde(default)]
    pub polylines_to_add: Vec<PolylineOptions>,
    #[serde(default)]
    pub polylines_to_change: Vec<PolylineOptions>,
    #[serde(default)]
    pub polyline_ids_to_remove: Vec<String>,
}

/// Options map for one polyline. Absent keys are "not present".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolylineOptions {
    pub polyline_id: String,

    /// `[[lat, lng], ...]` in degrees.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<Vec<[f64; 2]>>,

    /// ARGB packed into an integer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geodesic: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consume_tap_events: Option<bool>,

    /// `[["dot"], ["dash", 10], ["gap", 5]]`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patterns: Option<Vec<Vec<Value>>>,

    /// `["fromAsset", "name"]` or `["fromBytes", [137, 80, ...]]`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stamp_style: Option<Vec<Value>>,
}

/// Outbound event to the declarative layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", content = "arguments")]
pub enum HostEvent {
    #[serde(rename = "polyline#onTap")]
    PolylineTap {
        #[serde(rename = "polylineId")]
        polyline_id: String,
    },
}
