use nalgebra::{Rotation3, Vector3};

/// Unit vector along `v`, or the zero vector when `v` has no length.
pub fn normalized_or_zero(v: &Vector3<f64>) -> Vector3<f64> {
    v.try_normalize(0.0).unwrap_or_else(Vector3::zeros)
}

/// Rotates `v` counter-clockwise about the x axis by `degrees`.
pub fn rotate_x_deg(v: &Vector3<f64>, degrees: f64) -> Vector3<f64> {
    Rotation3::from_axis_angle(&Vector3::x_axis(), degrees.to_radians()) * v
}

/// Rotates `v` counter-clockwise about the y axis by `degrees`.
pub fn rotate_y_deg(v: &Vector3<f64>, degrees: f64) -> Vector3<f64> {
    Rotation3::from_axis_angle(&Vector3::y_axis(), degrees.to_radians()) * v
}

/// Rotates `v` counter-clockwise about the z axis by `degrees`.
pub fn rotate_z_deg(v: &Vector3<f64>, degrees: f64) -> Vector3<f64> {
    Rotation3::from_axis_angle(&Vector3::z_axis(), degrees.to_radians()) * v
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn zero_vector_normalizes_to_zero() {
        assert_eq!(normalized_or_zero(&Vector3::zeros()), Vector3::zeros());
        let unit = normalized_or_zero(&Vector3::new(3.0, 0.0, 4.0));
        assert_relative_eq!(unit, Vector3::new(0.6, 0.0, 0.8), epsilon = 1e-12);
    }

    #[test]
    fn quarter_turns_follow_right_hand_rule() {
        let x = Vector3::new(1.0, 0.0, 0.0);
        let y = Vector3::new(0.0, 1.0, 0.0);
        let z = Vector3::new(0.0, 0.0, 1.0);
        assert_relative_eq!(rotate_z_deg(&x, 90.0), y, epsilon = 1e-12);
        assert_relative_eq!(rotate_x_deg(&y, 90.0), z, epsilon = 1e-12);
        assert_relative_eq!(rotate_y_deg(&z, 90.0), x, epsilon = 1e-12);
    }

    #[test]
    fn rotation_preserves_length() {
        let v = Vector3::new(1.0, -2.0, 0.5);
        let rotated = rotate_y_deg(&rotate_x_deg(&v, 33.0), -71.0);
        assert_relative_eq!(rotated.norm(), v.norm(), epsilon = 1e-12);
        assert_relative_eq!(rotated.dot(&rotated), v.dot(&v), epsilon = 1e-12);
    }
}
