use glam::DVec3;
use shared::{Axis, Face, Pose};

use crate::helpers::{half_extents, position_of, rotation_of};

/// A ray in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: DVec3,
    pub direction: DVec3,
}

impl Ray {
    pub fn new(origin: [f64; 3], direction: [f64; 3]) -> Self {
        Self {
            origin: DVec3::from_array(origin),
            direction: DVec3::from_array(direction),
        }
    }

    /// Point at distance `t` along the ray
    pub fn at(&self, t: f64) -> DVec3 {
        self.origin + self.direction * t
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: DVec3,
    pub max: DVec3,
}

impl Aabb {
    /// Box of the given size centred on the origin
    pub fn centered(size: [f64; 3]) -> Self {
        let half = half_extents(size);
        Self {
            min: -half,
            max: half,
        }
    }
}

/// Ray-AABB intersection using the slab method.
/// Returns the distance along the ray to the nearest hit, or None.
pub fn ray_aabb(ray: &Ray, aabb: &Aabb) -> Option<f64> {
    let inv_dir = DVec3::new(
        1.0 / ray.direction.x,
        1.0 / ray.direction.y,
        1.0 / ray.direction.z,
    );

    let t1 = (aabb.min.x - ray.origin.x) * inv_dir.x;
    let t2 = (aabb.max.x - ray.origin.x) * inv_dir.x;
    let t3 = (aabb.min.y - ray.origin.y) * inv_dir.y;
    let t4 = (aabb.max.y - ray.origin.y) * inv_dir.y;
    let t5 = (aabb.min.z - ray.origin.z) * inv_dir.z;
    let t6 = (aabb.max.z - ray.origin.z) * inv_dir.z;

    let tmin = t1.min(t2).max(t3.min(t4)).max(t5.min(t6));
    let tmax = t1.max(t2).min(t3.max(t4)).min(t5.max(t6));

    if tmax < 0.0 || tmin > tmax {
        return None;
    }

    Some(if tmin < 0.0 { tmax } else { tmin })
}

/// Express a world ray in the local frame of a posed box
fn to_local(ray: &Ray, pose: &Pose) -> Ray {
    let inv = rotation_of(pose).inverse();
    Ray {
        origin: inv * (ray.origin - position_of(pose)),
        direction: inv * ray.direction,
    }
}

/// Ray against an oriented box. Distances are measured along the world ray.
pub fn ray_box(ray: &Ray, pose: &Pose, size: [f64; 3]) -> Option<f64> {
    ray_aabb(&to_local(ray, pose), &Aabb::centered(size))
}

/// Pick the nearest box hit by the ray.
pub fn pick_nearest<'a, I>(ray: &Ray, boxes: I) -> Option<String>
where
    I: IntoIterator<Item = (&'a str, &'a Pose, [f64; 3])>,
{
    let mut best: Option<(&str, f64)> = None;

    for (id, pose, size) in boxes {
        if let Some(dist) = ray_box(ray, pose, size) {
            if best.as_ref().is_none_or(|(_, d)| dist < *d) {
                best = Some((id, dist));
            }
        }
    }

    best.map(|(id, _)| id.to_string())
}

/// Which face of a posed box the ray enters through.
///
/// The face is the one whose plane the local hit point lies closest to,
/// measured relative to the half extent on each axis.
pub fn hit_face(ray: &Ray, pose: &Pose, size: [f64; 3]) -> Option<Face> {
    let local = to_local(ray, pose);
    let t = ray_aabb(&local, &Aabb::centered(size))?;
    let hit = local.at(t);
    let half = half_extents(size);

    let axes = [(Axis::X, hit.x, half.x), (Axis::Y, hit.y, half.y), (Axis::Z, hit.z, half.z)];
    let mut best: Option<(Axis, f64, f64)> = None;
    for (axis, coord, h) in axes {
        if h <= 0.0 {
            continue;
        }
        let ratio = coord.abs() / h;
        if best.as_ref().is_none_or(|(_, r, _)| ratio > *r) {
            best = Some((axis, ratio, coord));
        }
    }

    best.map(|(axis, _, coord)| Face::from_axis(axis, coord >= 0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DQuat;

    use crate::helpers::pose_from;

    fn ray(origin: [f64; 3], direction: [f64; 3]) -> Ray {
        Ray::new(origin, direction)
    }

    #[test]
    fn test_ray_aabb_hit() {
        let aabb = Aabb::centered([2.0, 2.0, 2.0]);
        let r = ray([-5.0, 0.0, 0.0], [1.0, 0.0, 0.0]);
        assert_eq!(ray_aabb(&r, &aabb), Some(4.0));
    }

    #[test]
    fn test_ray_aabb_miss() {
        let aabb = Aabb::centered([2.0, 2.0, 2.0]);
        let r = ray([-5.0, 3.0, 0.0], [1.0, 0.0, 0.0]);
        assert!(ray_aabb(&r, &aabb).is_none());
    }

    #[test]
    fn test_ray_aabb_behind_origin() {
        let aabb = Aabb::centered([2.0, 2.0, 2.0]);
        let r = ray([5.0, 0.0, 0.0], [1.0, 0.0, 0.0]);
        assert!(ray_aabb(&r, &aabb).is_none());
    }

    #[test]
    fn test_ray_box_translated() {
        let pose = Pose::at([10.0, 0.0, 0.0]);
        let r = ray([0.0, 0.0, 0.0], [1.0, 0.0, 0.0]);
        assert_eq!(ray_box(&r, &pose, [2.0, 2.0, 2.0]), Some(9.0));
    }

    #[test]
    fn test_ray_box_rotated_long_part() {
        // 10 long on X, turned 90 degrees about Y so it lies along Z
        let pose = pose_from(DVec3::ZERO, DQuat::from_rotation_y(std::f64::consts::FRAC_PI_2));
        let size = [10.0, 1.0, 1.0];
        let along_z = ray([0.0, 10.0, 4.0], [0.0, -1.0, 0.0]);
        assert!(ray_box(&along_z, &pose, size).is_some());
        let along_x = ray([4.0, 10.0, 0.0], [0.0, -1.0, 0.0]);
        assert!(ray_box(&along_x, &pose, size).is_none());
    }

    #[test]
    fn test_pick_nearest() {
        let near = Pose::at([0.0, 0.0, 5.0]);
        let far = Pose::at([0.0, 0.0, 10.0]);
        let boxes = vec![("far", &far, [1.0, 1.0, 1.0]), ("near", &near, [1.0, 1.0, 1.0])];
        let r = ray([0.0, 0.0, 0.0], [0.0, 0.0, 1.0]);
        assert_eq!(pick_nearest(&r, boxes), Some("near".to_string()));
    }

    #[test]
    fn test_hit_face_top() {
        let pose = Pose::at([0.0, 0.0, 0.0]);
        let r = ray([0.2, 10.0, -0.1], [0.0, -1.0, 0.0]);
        assert_eq!(hit_face(&r, &pose, [2.0, 2.0, 2.0]), Some(Face::Top));
    }

    #[test]
    fn test_hit_face_left() {
        let pose = Pose::at([3.0, 0.0, 0.0]);
        let r = ray([-10.0, 0.1, 0.1], [1.0, 0.0, 0.0]);
        assert_eq!(hit_face(&r, &pose, [1.0, 1.0, 1.0]), Some(Face::Left));
    }

    #[test]
    fn test_hit_face_miss() {
        let pose = Pose::new();
        let r = ray([0.0, 10.0, 0.0], [0.0, 1.0, 0.0]);
        assert!(hit_face(&r, &pose, [1.0, 1.0, 1.0]).is_none());
    }
}
