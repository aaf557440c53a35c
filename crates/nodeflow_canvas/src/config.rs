// SPDX-License-Identifier: MIT OR Apache-2.0
//! Canvas configuration.
//!
//! Defaults applied by the canvas when a request leaves something out, plus
//! the settings of the windowing and transform collaborators. Stored as RON:
//!
//! ```ron
//! CanvasConfig(
//!     version: 1,
//!     edges: (
//!         priority: Incremental,
//!         shape: Straight((cycle_radius: 20.0)),
//!     ),
//!     transform: (min_content_scale: Some(0.25)),
//! )
//! ```

use crate::error::ConfigError;
use crate::priority::PriorityPolicy;
use crate::scheduler::SchedulerConfig;
use crate::shapes::{BezierEdgeShape, StraightEdgeShape};
use crate::transform::preprocess::{
    CombinedPreprocessor, ScaleLimitPreprocessor, ShiftLimitPreprocessor,
};
use crate::virtual_scroll::VirtualScrollConfig;
use nodeflow_graph::{standard_center_fn, CenterFn, EdgeShape, Point};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::rc::Rc;

/// Current configuration format version
pub const CONFIG_FORMAT_VERSION: u32 = 1;

/// Where a node's position sits relative to its rendered box
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeAnchor {
    /// Position is the centre of the node
    #[default]
    Center,
    /// Position is the top-left corner
    TopLeft,
}

impl NodeAnchor {
    /// Centre function for this anchor
    pub fn center_fn(self) -> CenterFn {
        match self {
            NodeAnchor::Center => standard_center_fn(),
            NodeAnchor::TopLeft => Rc::new(|_width: f64, _height: f64| Point::new(0.0, 0.0)),
        }
    }
}

/// Defaults for new nodes
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeDefaults {
    /// Priority when none is requested
    pub priority: PriorityPolicy,
    /// Anchor when no centre function is requested
    pub anchor: NodeAnchor,
}

/// Defaults for new ports
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortDefaults {
    /// Direction angle in radians
    pub direction: f64,
}

/// Which built-in shape new edges get
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EdgeShapeConfig {
    /// [`StraightEdgeShape`]
    Straight(StraightEdgeShape),
    /// [`BezierEdgeShape`]
    Bezier(BezierEdgeShape),
}

impl Default for EdgeShapeConfig {
    fn default() -> Self {
        EdgeShapeConfig::Bezier(BezierEdgeShape::default())
    }
}

impl EdgeShapeConfig {
    /// Build the shape object
    pub fn build(&self) -> Rc<dyn EdgeShape> {
        match *self {
            EdgeShapeConfig::Straight(shape) => Rc::new(shape),
            EdgeShapeConfig::Bezier(shape) => Rc::new(shape),
        }
    }
}

/// Defaults for new edges
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeDefaults {
    /// Priority when none is requested
    pub priority: PriorityPolicy,
    /// Shape when none is requested
    pub shape: EdgeShapeConfig,
}

/// Limits applied to gesture-driven transforms
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformLimits {
    /// Smallest content scale
    pub min_content_scale: Option<f64>,
    /// Largest content scale
    pub max_content_scale: Option<f64>,
    /// Smallest visible content x
    pub min_x: Option<f64>,
    /// Largest visible content x
    pub max_x: Option<f64>,
    /// Smallest visible content y
    pub min_y: Option<f64>,
    /// Largest visible content y
    pub max_y: Option<f64>,
}

impl TransformLimits {
    /// Preprocessor chain enforcing these limits (scale first, then shift)
    pub fn preprocessor(&self) -> CombinedPreprocessor {
        let mut chain = CombinedPreprocessor::new();
        if self.min_content_scale.is_some() || self.max_content_scale.is_some() {
            chain = chain.with(ScaleLimitPreprocessor {
                min_content_scale: self.min_content_scale,
                max_content_scale: self.max_content_scale,
            });
        }
        let shift = [self.min_x, self.max_x, self.min_y, self.max_y];
        if shift.iter().any(Option::is_some) {
            chain = chain.with(ShiftLimitPreprocessor {
                min_x: self.min_x,
                max_x: self.max_x,
                min_y: self.min_y,
                max_y: self.max_y,
            });
        }
        chain
    }
}

/// Full canvas configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Format version
    pub version: u32,
    /// Node defaults
    pub nodes: NodeDefaults,
    /// Port defaults
    pub ports: PortDefaults,
    /// Edge defaults
    pub edges: EdgeDefaults,
    /// Windowing settings
    pub virtual_scroll: VirtualScrollConfig,
    /// Rendering box scheduling
    pub scheduler: SchedulerConfig,
    /// Gesture limits
    pub transform: TransformLimits,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_FORMAT_VERSION,
            nodes: NodeDefaults::default(),
            ports: PortDefaults::default(),
            edges: EdgeDefaults::default(),
            virtual_scroll: VirtualScrollConfig::default(),
            scheduler: SchedulerConfig::default(),
            transform: TransformLimits::default(),
        }
    }
}

impl CanvasConfig {
    /// Parse from RON text
    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        let config: CanvasConfig = ron::from_str(text)?;
        if config.version > CONFIG_FORMAT_VERSION {
            return Err(ConfigError::UnsupportedVersion {
                found: config.version,
                supported: CONFIG_FORMAT_VERSION,
            });
        }
        Ok(config)
    }

    /// Serialize to pretty RON text
    pub fn to_ron_string(&self) -> Result<String, ConfigError> {
        let pretty = ron::ser::PrettyConfig::default()
            .struct_names(true)
            .enumerate_arrays(false);
        Ok(ron::ser::to_string_pretty(self, pretty)?)
    }

    /// Load from a RON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_ron_str(&content)?;
        tracing::debug!("Loaded canvas config from {:?}", path);
        Ok(config)
    }

    /// Save to a RON file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        std::fs::write(path, self.to_ron_string()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::ArrowStyle;
    use crate::virtual_scroll::NodeContainingRadius;

    #[test]
    fn test_missing_sections_are_default() {
        let config = CanvasConfig::from_ron_str("CanvasConfig(version: 1)").unwrap();
        assert_eq!(config, CanvasConfig::default());
    }

    #[test]
    fn test_partial_config() {
        let config = CanvasConfig::from_ron_str(
            "CanvasConfig(edges: (priority: Incremental, shape: Straight((cycle_radius: 20.0))), \
             transform: (min_content_scale: Some(0.25)))",
        )
        .unwrap();

        assert_eq!(config.edges.priority, PriorityPolicy::Incremental);
        let EdgeShapeConfig::Straight(shape) = config.edges.shape else {
            panic!("expected a straight shape");
        };
        assert_eq!(shape.cycle_radius, 20.0);
        assert_eq!(shape.arrow, ArrowStyle::default());
        assert_eq!(config.transform.min_content_scale, Some(0.25));
        assert_eq!(config.transform.preprocessor().len(), 1);
        assert_eq!(config.nodes, NodeDefaults::default());
    }

    #[test]
    fn test_round_trip() {
        let mut config = CanvasConfig::default();
        config.nodes.priority = PriorityPolicy::Constant(5.0);
        config.nodes.anchor = NodeAnchor::TopLeft;
        config.ports.direction = 1.5;
        config.virtual_scroll.node_containing_radius = NodeContainingRadius {
            horizontal: 40.0,
            vertical: 25.0,
        };
        config.scheduler.debounce_ms = 250;
        config.transform.max_x = Some(1000.0);

        let text = config.to_ron_string().unwrap();
        let loaded = CanvasConfig::from_ron_str(&text).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_newer_version_rejected() {
        let err = CanvasConfig::from_ron_str("(version: 99)").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::UnsupportedVersion { found: 99, .. }
        ));
    }

    #[test]
    fn test_file_round_trip() {
        let path = std::env::temp_dir().join(format!(
            "nodeflow_canvas_config_{}.ron",
            std::process::id()
        ));
        let config = CanvasConfig::default();
        config.save(&path).unwrap();
        let loaded = CanvasConfig::load(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_anchor_center_fn() {
        assert_eq!((NodeAnchor::Center.center_fn())(10.0, 4.0), Point::new(5.0, 2.0));
        assert_eq!((NodeAnchor::TopLeft.center_fn())(10.0, 4.0), Point::new(0.0, 0.0));
    }
}
