//! Small dense linear algebra on top of glam.

use crate::{EulerRot, Mat3, Vec3};

/// Relative determinant magnitude below which a 3x3 system counts as singular.
pub const SINGULAR_EPSILON: f32 = 1e-7;

/// Solve `[a b c] * x = rhs` for `x`, where `a`, `b`, `c` are the columns.
///
/// Returns `None` when the columns are (nearly) linearly dependent, e.g. a ray
/// running parallel to a plane.
pub fn solve3(a: Vec3, b: Vec3, c: Vec3, rhs: Vec3) -> Option<Vec3> {
    let matrix = Mat3::from_cols(a, b, c);
    let det = matrix.determinant();
    let scale = a.length() * b.length() * c.length();
    if !det.is_finite() || scale == 0.0 || det.abs() <= SINGULAR_EPSILON * scale {
        return None;
    }

    // Cramer's rule
    let x = Mat3::from_cols(rhs, b, c).determinant() / det;
    let y = Mat3::from_cols(a, rhs, c).determinant() / det;
    let z = Mat3::from_cols(a, b, rhs).determinant() / det;
    let solution = Vec3::new(x, y, z);
    solution.is_finite().then_some(solution)
}

/// Rotation matrix from (roll, pitch, yaw) angles in degrees about X, Y, Z.
///
/// Roll is applied first, then pitch, then yaw. With a Z-up world and X as
/// the forward axis, positive pitch tilts the forward axis downwards.
pub fn rotation_from_degrees(degrees: Vec3) -> Mat3 {
    Mat3::from_euler(
        EulerRot::ZYX,
        degrees.z.to_radians(),
        degrees.y.to_radians(),
        degrees.x.to_radians(),
    )
}
