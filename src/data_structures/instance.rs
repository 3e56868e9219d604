//! Per-sprite transformation data.
//!
//! An [`Instance`] is a 2D position, rotation and non-uniform scale. Nested
//! transforms are composed as matrices, parent-then-child:
//! `parent.to_matrix() * local.to_matrix()`. A rotated child under a non-uniformly
//! scaled parent picks up shear, which a plain TRS triple cannot hold. The scene root
//! carries the logical→viewport scale, so every node below it is authored in logical
//! units.

use cgmath::{Angle, Matrix3, Rad, Vector2};

/// 2D transform: position, rotation (radians, clockwise in a y-down frame) and scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Instance {
    pub position: Vector2<f32>,
    pub rotation: Rad<f32>,
    pub scale: Vector2<f32>,
}

impl Instance {
    /// Identity transform (no move, rotate, or scale).
    pub fn new() -> Self {
        Self {
            position: Vector2::new(0.0, 0.0),
            rotation: Rad(0.0),
            scale: Vector2::new(1.0, 1.0),
        }
    }

    pub fn from_scale(scale: f32) -> Self {
        Self {
            scale: Vector2::new(scale, scale),
            ..Self::new()
        }
    }

    /// Maps a point from this transform's local frame into its parent frame.
    pub fn transform_point(&self, point: Vector2<f32>) -> Vector2<f32> {
        let scaled = Vector2::new(point.x * self.scale.x, point.y * self.scale.y);
        let (sin, cos) = self.rotation.sin_cos();
        Vector2::new(
            scaled.x * cos - scaled.y * sin,
            scaled.x * sin + scaled.y * cos,
        ) + self.position
    }

    /// Homogeneous 2D matrix of this transform, `translate * rotate * scale`.
    pub fn to_matrix(&self) -> Matrix3<f32> {
        let (sin, cos) = self.rotation.sin_cos();
        Matrix3::new(
            cos * self.scale.x,
            sin * self.scale.x,
            0.0,
            -sin * self.scale.y,
            cos * self.scale.y,
            0.0,
            self.position.x,
            self.position.y,
            1.0,
        )
    }
}

impl Default for Instance {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Vector2<f32>> for Instance {
    fn from(position: Vector2<f32>) -> Self {
        Instance {
            position,
            ..Default::default()
        }
    }
}

/// Maps `point` through a homogeneous 2D matrix.
pub fn apply(matrix: &Matrix3<f32>, point: Vector2<f32>) -> Vector2<f32> {
    (*matrix * point.extend(1.0)).truncate()
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use super::*;

    fn close(a: Vector2<f32>, b: Vector2<f32>) -> bool {
        (a.x - b.x).abs() < 1e-4 && (a.y - b.y).abs() < 1e-4
    }

    #[test]
    fn identity_is_neutral() {
        let t = Instance {
            position: Vector2::new(3.0, 4.0),
            rotation: Rad(0.5),
            scale: Vector2::new(2.0, 0.5),
        };
        assert_eq!(Instance::new().to_matrix() * t.to_matrix(), t.to_matrix());
    }

    #[test]
    fn parent_scale_applies_to_child_position() {
        let root = Instance::from_scale(0.5);
        let child = Instance::from(Vector2::new(300.0, 100.0));
        let world = root.to_matrix() * child.to_matrix();
        assert!(close(apply(&world, Vector2::new(0.0, 0.0)), Vector2::new(150.0, 50.0)));
        assert!(close(apply(&world, Vector2::new(2.0, 2.0)), Vector2::new(151.0, 51.0)));
    }

    #[test]
    fn rotation_turns_points() {
        let t = Instance {
            rotation: Rad(FRAC_PI_2),
            ..Instance::new()
        };
        assert!(close(
            t.transform_point(Vector2::new(1.0, 0.0)),
            Vector2::new(0.0, 1.0)
        ));
        assert!(close(
            apply(&t.to_matrix(), Vector2::new(1.0, 0.0)),
            Vector2::new(0.0, 1.0)
        ));
    }

    #[test]
    fn composed_transform_matches_nested_application() {
        let parent = Instance {
            position: Vector2::new(10.0, -5.0),
            rotation: Rad(0.3),
            scale: Vector2::new(2.0, 2.0),
        };
        let child = Instance {
            position: Vector2::new(4.0, 7.0),
            rotation: Rad(1.1),
            scale: Vector2::new(1.5, 1.5),
        };
        let p = Vector2::new(-2.0, 3.0);
        let nested = parent.transform_point(child.transform_point(p));
        let composed = apply(&(parent.to_matrix() * child.to_matrix()), p);
        assert!(close(nested, composed));
    }

    #[test]
    fn rotated_child_under_stretched_parent_keeps_shear() {
        let parent = Instance {
            scale: Vector2::new(1.0, 2.0),
            ..Instance::new()
        };
        let child = Instance {
            rotation: Rad(FRAC_PI_2),
            ..Instance::new()
        };
        let p = Vector2::new(1.0, 0.0);
        let nested = parent.transform_point(child.transform_point(p));
        assert!(close(nested, Vector2::new(0.0, 2.0)));
        assert!(close(apply(&(parent.to_matrix() * child.to_matrix()), p), nested));
    }
}
