//! Grid and angle snapping

use glam::DVec3;

/// Round `value` to the nearest multiple of `step` (half away from zero).
///
/// Identity when snapping is disabled or the step is zero, negative or not finite.
pub fn snap_scalar(value: f64, step: f64, enabled: bool) -> f64 {
    if !enabled || !step.is_finite() || step <= 0.0 {
        return value;
    }
    (value / step).round() * step
}

/// Snap each component independently
pub fn snap_vector(v: DVec3, step: f64, enabled: bool) -> DVec3 {
    DVec3::new(
        snap_scalar(v.x, step, enabled),
        snap_scalar(v.y, step, enabled),
        snap_scalar(v.z, step, enabled),
    )
}

/// Snap an angle given in degrees to the rotation step (also in degrees)
pub fn snap_angle_degrees(degrees: f64, step_degrees: f64, enabled: bool) -> f64 {
    snap_scalar(degrees, step_degrees, enabled)
}
