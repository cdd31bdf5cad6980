//! First-person camera and the viewpoint abstraction the sky recenters on.

use glam::{Mat3, Quat, Vec3};

/// Anything that can report the position the sky should follow.
pub trait Viewpoint {
    /// World-space eye position.
    fn position(&self) -> Vec3;
}

impl Viewpoint for Vec3 {
    fn position(&self) -> Vec3 {
        *self
    }
}

/// A first-person camera: position plus orientation.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// World-space eye position.
    pub position: Vec3,
    /// Rotation as a unit quaternion.
    pub rotation: Quat,
}

impl Camera {
    /// Camera at `position` with identity orientation.
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// The forward direction vector (-Z in camera space).
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    /// The up direction vector (+Y in camera space).
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// The right direction vector (+X in camera space).
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    /// Turn the camera to face `target`, keeping world +Y as up.
    ///
    /// Leaves the rotation untouched when `target` coincides with the eye or
    /// lies straight above/below it.
    pub fn look_at(&mut self, target: Vec3) {
        let forward = (target - self.position).normalize_or_zero();
        let right = forward.cross(Vec3::Y).normalize_or_zero();
        if forward == Vec3::ZERO || right == Vec3::ZERO {
            return;
        }
        let up = right.cross(forward);
        self.rotation = Quat::from_mat3(&Mat3::from_cols(right, up, -forward));
    }
}

impl Viewpoint for Camera {
    fn position(&self) -> Vec3 {
        self.position
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}
