//! Conversions between the serialized shared types and glam math types

use glam::{DQuat, DVec3};
use shared::{Face, Pose};

/// Position of a pose as a vector
pub fn position_of(pose: &Pose) -> DVec3 {
    DVec3::from_array(pose.position)
}

/// Orientation of a pose as a quaternion
pub fn rotation_of(pose: &Pose) -> DQuat {
    DQuat::from_array(pose.rotation)
}

/// Build a pose from glam types
pub fn pose_from(position: DVec3, rotation: DQuat) -> Pose {
    Pose {
        position: position.to_array(),
        rotation: rotation.to_array(),
    }
}

/// Face normal in the object's local frame
pub fn face_normal(face: Face) -> DVec3 {
    DVec3::from_array(face.normal())
}

/// Half extents of a box of the given size
pub fn half_extents(size: [f64; 3]) -> DVec3 {
    DVec3::from_array(size) * 0.5
}
