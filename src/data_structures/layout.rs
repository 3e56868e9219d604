//! Logical coordinate space and per-node layout rules.
//!
//! The scene is authored on a canvas [`LOGICAL_WIDTH`] units wide. On every resize
//! the viewport is turned into [`SceneMetrics`]: the uniform logical→viewport scale
//! and the height of one screen in logical units. Layout rules are pure functions of
//! those metrics, so applying them twice with the same viewport gives the same result.

use cgmath::Vector2;

/// Width of the design canvas in logical units.
pub const LOGICAL_WIDTH: f32 = 1920.0;

/// Scale and logical height derived from one viewport size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneMetrics {
    pub viewport_width: f32,
    pub viewport_height: f32,
    /// `viewport_width / LOGICAL_WIDTH`
    pub scale: f32,
    /// Height of one viewport in logical units, `viewport_height / scale`.
    pub logical_height: f32,
}

impl SceneMetrics {
    /// Returns `None` for degenerate viewports (zero, negative or non-finite sizes).
    pub fn from_viewport(width: f32, height: f32) -> Option<Self> {
        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            return None;
        }
        let scale = width / LOGICAL_WIDTH;
        Some(Self {
            viewport_width: width,
            viewport_height: height,
            scale,
            logical_height: height / scale,
        })
    }
}

/// One coordinate of a layout rule, in logical units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Coord {
    Fixed(f32),
    /// `screens * logical_height + offset`
    Screens { screens: f32, offset: f32 },
}

impl Coord {
    pub const fn screens(screens: f32, offset: f32) -> Self {
        Coord::Screens { screens, offset }
    }

    pub fn resolve(&self, metrics: &SceneMetrics) -> f32 {
        match *self {
            Coord::Fixed(value) => value,
            Coord::Screens { screens, offset } => screens * metrics.logical_height + offset,
        }
    }
}

/// Where a node goes, how big it is and when it is painted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    pub position: Vector2<f32>,
    pub scale: Vector2<f32>,
    pub z: i32,
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            position: Vector2::new(0.0, 0.0),
            scale: Vector2::new(1.0, 1.0),
            z: 0,
        }
    }
}

/// Declarative placement of one node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutRule {
    pub x: Coord,
    pub y: Coord,
    pub scale: f32,
    pub z: i32,
    /// Stretch the node vertically to this many logical units.
    ///
    /// Used by nodes that have to span a fixed number of viewport heights regardless
    /// of the viewport width: the world scale is applied on top of the node scale, so
    /// a height of `n * logical_height` renders as `n * viewport_height` pixels.
    pub fit_height: Option<Coord>,
}

impl LayoutRule {
    pub const fn at(x: Coord, y: Coord) -> Self {
        Self {
            x,
            y,
            scale: 1.0,
            z: 0,
            fit_height: None,
        }
    }

    pub const fn with_z(mut self, z: i32) -> Self {
        self.z = z;
        self
    }

    pub const fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub const fn with_fit_height(mut self, height: Coord) -> Self {
        self.fit_height = Some(height);
        self
    }

    /// Resolves the rule. `natural_height` is the node's unscaled height in logical units.
    pub fn place(&self, metrics: &SceneMetrics, natural_height: f32) -> Placement {
        let scale_y = match self.fit_height {
            Some(height) if natural_height > 0.0 => height.resolve(metrics) / natural_height,
            _ => self.scale,
        };
        Placement {
            position: Vector2::new(self.x.resolve(metrics), self.y.resolve(metrics)),
            scale: Vector2::new(self.scale, scale_y),
            z: self.z,
        }
    }
}
