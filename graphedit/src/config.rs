use crate::error::{Error, Result};
use crate::geometry::limits;
use crate::model::{DEFAULT_EDGE_WIDTH, DEFAULT_NODE_RADIUS};
use serde::{Deserialize, Serialize};

/// Session-wide editor settings. Every field has a default, so partial JSON
/// objects are accepted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub node_radius: f32,
    pub edge_width: f32,
    pub grid_size: f32,
    pub snap_to_grid: bool,
    pub directed_edges: bool,
    /// Maximum number of undo snapshots kept; the oldest is evicted first.
    pub history_limit: usize,
    pub layout: LayoutConfig,
}

impl Default for EditorConfig {
    fn default() -> Self {
        EditorConfig {
            node_radius: DEFAULT_NODE_RADIUS,
            edge_width: DEFAULT_EDGE_WIDTH,
            grid_size: 20.0,
            snap_to_grid: false,
            directed_edges: false,
            history_limit: 200,
            layout: LayoutConfig::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub canvas_width: f32,
    pub canvas_height: f32,
    pub margin: f32,
    pub gap_x: f32,
    pub gap_y: f32,
    pub circle_radius: Option<f32>,
    pub min_separation: f32,
    pub angle_step_deg: f32,
    pub ring_step: f32,
    pub max_rings: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig {
            canvas_width: 800.0,
            canvas_height: 600.0,
            margin: 60.0,
            gap_x: 100.0,
            gap_y: 80.0,
            circle_radius: None,
            min_separation: 60.0,
            angle_step_deg: 30.0,
            ring_step: 40.0,
            max_rings: 50,
        }
    }
}

impl EditorConfig {
    pub fn from_json_str(s: &str) -> Result<Self> {
        let cfg: EditorConfig = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if !limits::in_radius_bounds(self.node_radius) {
            return Err(Error::OutOfBounds { what: "node_radius".into() });
        }
        if !(self.edge_width.is_finite() && self.edge_width > 0.0) {
            return Err(Error::OutOfBounds { what: "edge_width".into() });
        }
        if !(self.grid_size.is_finite() && self.grid_size >= 0.0) {
            return Err(Error::OutOfBounds { what: "grid_size".into() });
        }
        let l = &self.layout;
        for (what, v) in [
            ("layout.canvas_width", l.canvas_width),
            ("layout.canvas_height", l.canvas_height),
            ("layout.margin", l.margin),
            ("layout.gap_x", l.gap_x),
            ("layout.gap_y", l.gap_y),
            ("layout.min_separation", l.min_separation),
            ("layout.ring_step", l.ring_step),
        ] {
            if !(v.is_finite() && v >= 0.0) {
                return Err(Error::OutOfBounds { what: what.into() });
            }
        }
        if !(l.angle_step_deg.is_finite() && l.angle_step_deg > 0.0 && l.angle_step_deg <= 360.0) {
            return Err(Error::OutOfBounds { what: "layout.angle_step_deg".into() });
        }
        if let Some(r) = l.circle_radius {
            if !(r.is_finite() && r >= 0.0) {
                return Err(Error::OutOfBounds { what: "layout.circle_radius".into() });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = EditorConfig::from_json_str(r#"{ "grid_size": 10, "layout": { "margin": 5 } }"#).unwrap();
        assert_eq!(cfg.grid_size, 10.0);
        assert_eq!(cfg.layout.margin, 5.0);
        assert_eq!(cfg.layout.gap_x, LayoutConfig::default().gap_x);
        assert_eq!(cfg.history_limit, 200);
    }

    #[test]
    fn rejects_bad_values() {
        let err = EditorConfig::from_json_str(r#"{ "node_radius": -1 }"#).unwrap_err();
        assert_eq!(err.code(), "out_of_bounds");
        let err = EditorConfig::from_json_str("{ nope").unwrap_err();
        assert_eq!(err.code(), "json_parse");
    }
}
