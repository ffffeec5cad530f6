//! Replays host scripts against an in-memory surface.
//!
//! A script is JSON lines. Each line is either a host method call
//! (`polylines#update`) or a surface action:
//! - `{"method":"surface#tap","arguments":{"polylineId":"p1"}}`
//! - `{"method":"surface#redraw"}`
//!
//! Blank lines and lines starting with `#` are ignored.

use std::cell::RefCell;
use std::path::{Component, Path, PathBuf};
use std::rc::Rc;

use overlays::{
    ImageResolver, PolylineEvent, PolylinesController, RecordingSurface, StampImage, StampRef,
};
use protocol::{MethodCall, UpdateSummary, encode_event, handle_call};
use runtime::event_bus::EventBus;
use serde_json::Value;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum ScriptStep {
    Call(MethodCall),
    Tap { polyline_id: String },
    Redraw,
}

pub fn parse_step(line: &str) -> Result<ScriptStep, String> {
    let value: Value = serde_json::from_str(line).map_err(|e| format!("json: {e}"))?;
    match value.get("method").and_then(Value::as_str) {
        Some("surface#tap") => {
            let id = value
                .pointer("/arguments/polylineId")
                .and_then(Value::as_str)
                .ok_or_else(|| "surface#tap requires arguments.polylineId".to_string())?;
            Ok(ScriptStep::Tap {
                polyline_id: id.to_string(),
            })
        }
        Some("surface#redraw") => Ok(ScriptStep::Redraw),
        _ => serde_json::from_value(value)
            .map(ScriptStep::Call)
            .map_err(|e| format!("unsupported call: {e}")),
    }
}

/// Loads `fromAsset` stamps from files under a root directory.
#[derive(Debug, Clone)]
pub struct AssetDirResolver {
    root: PathBuf,
}

impl AssetDirResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ImageResolver for AssetDirResolver {
    fn resolve(&self, stamp: &StampRef) -> Option<StampImage> {
        match stamp {
            StampRef::Asset { name } => {
                let rel = Path::new(name);
                // Asset names stay inside the root.
                if !rel.components().all(|c| matches!(c, Component::Normal(_))) {
                    warn!("refusing asset path outside root: {name}");
                    return None;
                }
                let path = self.root.join(rel);
                match std::fs::read(&path) {
                    Ok(bytes) => StampImage::new(bytes),
                    Err(err) => {
                        debug!("read {path:?}: {err}");
                        None
                    }
                }
            }
            StampRef::Bytes { data } => StampImage::new(data.as_slice()),
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct ReplayReport {
    pub steps: usize,
    pub failures: usize,
    /// Outbound events, encoded for the host, in emission order.
    pub events: Vec<String>,
}

pub struct Replayer<R: ImageResolver> {
    controller: PolylinesController<RecordingSurface, R, EventBus<PolylineEvent>>,
}

impl<R: ImageResolver> Replayer<R> {
    pub fn new(images: R) -> Self {
        let surface = Rc::new(RefCell::new(RecordingSurface::new()));
        let controller = PolylinesController::new(surface, images, EventBus::new());
        let taps = controller.tap_sender();
        controller.surface().borrow_mut().set_tap_sender(taps);
        Self { controller }
    }

    pub fn controller(&self) -> &PolylinesController<RecordingSurface, R, EventBus<PolylineEvent>> {
        &self.controller
    }

    /// Runs one step and returns the events it produced, encoded.
    pub fn step(&mut self, step: ScriptStep) -> Result<Vec<String>, String> {
        match step {
            ScriptStep::Call(call) => {
                let UpdateSummary {
                    added,
                    changed,
                    removed,
                } = handle_call(&mut self.controller, call).map_err(|e| e.to_string())?;
                debug!("applied update: +{added} ~{changed} -{removed}");
            }
            ScriptStep::Tap { polyline_id } => match self.controller.polyline(&polyline_id) {
                Some(polyline) => {
                    let handle = polyline.handle();
                    if !self.controller.surface().borrow().tap(handle) {
                        debug!("tap on '{polyline_id}' fell through to the map");
                    }
                }
                None => debug!("tap on '{polyline_id}' hit nothing"),
            },
            ScriptStep::Redraw => self.controller.redraw_polylines(),
        }

        self.controller.pump_taps();
        self.controller
            .events_mut()
            .drain()
            .iter()
            .map(|event| encode_event(event).map_err(|e| e.to_string()))
            .collect()
    }
}

/// Replays `script`, stopping at the first failing step unless `keep_going`.
pub fn replay<R: ImageResolver>(
    script: &str,
    images: R,
    keep_going: bool,
) -> Result<ReplayReport, String> {
    let mut replayer = Replayer::new(images);
    let mut report = ReplayReport::default();

    for (line_no, line) in script.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        report.steps += 1;

        let result = parse_step(line).and_then(|step| replayer.step(step));
        match result {
            Ok(events) => report.events.extend(events),
            Err(err) if keep_going => {
                warn!("line {}: {err}", line_no + 1);
                report.failures += 1;
            }
            Err(err) => return Err(format!("line {}: {err}", line_no + 1)),
        }
    }

    info!(
        "replayed {} steps ({} failed), {} polylines live",
        report.steps,
        report.failures,
        replayer.controller().len()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::{AssetDirResolver, ScriptStep, parse_step, replay};
    use overlays::{ImageResolver, StampRef, StaticImageResolver};
    use pretty_assertions::assert_eq;

    const SCRIPT: &str = r#"
# add a tappable route, widen it, tap it, remove it twice
{"method":"polylines#update","arguments":{"polylinesToAdd":[{"polylineId":"p1","points":[[0,0],[1,1],[2,0]],"consumeTapEvents":true}]}}
{"method":"polylines#update","arguments":{"polylinesToChange":[{"polylineId":"p1","width":5}]}}
{"method":"surface#tap","arguments":{"polylineId":"p1"}}
{"method":"polylines#update","arguments":{"polylineIdsToRemove":["p1"]}}
{"method":"polylines#update","arguments":{"polylineIdsToRemove":["p1"]}}
{"method":"surface#tap","arguments":{"polylineId":"p1"}}
"#;

    #[test]
    fn replays_scenario_and_reports_one_tap() {
        let report = replay(SCRIPT, StaticImageResolver::new(), false).unwrap();
        assert_eq!(report.steps, 6);
        assert_eq!(report.failures, 0);
        assert_eq!(
            report.events,
            vec![r#"{"method":"polyline#onTap","arguments":{"polylineId":"p1"}}"#.to_string()]
        );
    }

    #[test]
    fn failing_step_stops_unless_keep_going() {
        let script = r#"
{"method":"polylines#update","arguments":{"polylinesToChange":[{"polylineId":"ghost"}]}}
{"method":"surface#redraw"}
"#;
        let err = replay(script, StaticImageResolver::new(), false).unwrap_err();
        assert!(err.starts_with("line 2:"), "{err}");

        let report = replay(script, StaticImageResolver::new(), true).unwrap();
        assert_eq!(report.steps, 2);
        assert_eq!(report.failures, 1);
    }

    #[test]
    fn parses_surface_steps() {
        assert_eq!(
            parse_step(r#"{"method":"surface#redraw"}"#).unwrap(),
            ScriptStep::Redraw
        );
        assert!(parse_step(r#"{"method":"surface#tap","arguments":{}}"#).is_err());
    }

    #[test]
    fn asset_dir_resolver_reads_files_inside_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("arrow.png"), [0x89u8, 0x50, 0x4e, 0x47]).unwrap();
        let resolver = AssetDirResolver::new(dir.path());

        let image = resolver
            .resolve(&StampRef::Asset {
                name: "arrow.png".into(),
            })
            .unwrap();
        assert_eq!(image.bytes(), &[0x89, 0x50, 0x4e, 0x47]);

        assert!(resolver
            .resolve(&StampRef::Asset {
                name: "missing.png".into()
            })
            .is_none());
        assert!(resolver
            .resolve(&StampRef::Asset {
                name: "../arrow.png".into()
            })
            .is_none());
    }
}
