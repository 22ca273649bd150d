//! Drag-free projectile paths launched from the origin.

use crate::error::PhysicsError;
use crate::vector::rotate_z_deg;
use nalgebra::Vector3;
use serde::Serialize;

/// Standard gravity (m/s²).
pub const GRAVITY: f64 = 9.8;
/// Sampling interval of the animation (s).
pub const FRAME_INTERVAL: f64 = 0.05;
/// Largest number of samples a single path may hold.
pub const MAX_SAMPLES: usize = 1_000_000;
/// Margin applied to the largest coordinates when sizing the view.
const VIEW_MARGIN: f64 = 1.1;

/// Positions sampled every `dt` from launch until the projectile drops below ground.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectilePath {
    pub angle_deg: f64,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl ProjectilePath {
    pub fn launch(speed: f64, angle_deg: f64, gravity: f64, dt: f64) -> Result<Self, PhysicsError> {
        validate(speed, gravity, dt)?;
        if !angle_deg.is_finite() {
            return Err(PhysicsError::InvalidInput(format!(
                "launch angle must be finite, got {angle_deg}"
            )));
        }

        let velocity = rotate_z_deg(&Vector3::new(speed, 0.0, 0.0), angle_deg);
        let flight_time = (2.0 * velocity.y / gravity).max(0.0);
        let samples = (flight_time / dt).floor() + 1.0;
        if !samples.is_finite() || samples > MAX_SAMPLES as f64 {
            return Err(PhysicsError::InvalidInput(format!(
                "flight of {flight_time} s sampled every {dt} s exceeds {MAX_SAMPLES} samples"
            )));
        }

        // One extra step absorbs rounding in the landing estimate.
        let last_step = samples as usize;
        let mut path = Self {
            angle_deg,
            x: Vec::with_capacity(last_step),
            y: Vec::with_capacity(last_step),
        };
        for step in 0..=last_step {
            let t = step as f64 * dt;
            let y = velocity.y * t - 0.5 * gravity * t * t;
            if y < 0.0 {
                break;
            }
            path.x.push(velocity.x * t);
            path.y.push(y);
        }
        Ok(path)
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

fn validate(speed: f64, gravity: f64, dt: f64) -> Result<(), PhysicsError> {
    if !speed.is_finite() || speed < 0.0 {
        return Err(PhysicsError::InvalidInput(format!(
            "launch speed must be finite and non-negative, got {speed}"
        )));
    }
    if !gravity.is_finite() || gravity <= 0.0 {
        return Err(PhysicsError::InvalidInput(format!(
            "gravity must be positive and finite, got {gravity}"
        )));
    }
    if !dt.is_finite() || dt <= 0.0 {
        return Err(PhysicsError::InvalidInput(format!(
            "time step must be positive and finite, got {dt}"
        )));
    }
    Ok(())
}

/// Launch angles of the classroom demo: 0° to 85° in 5° increments.
pub fn default_angles() -> Vec<f64> {
    (0..18).map(|i| f64::from(i) * 5.0).collect()
}

/// State of one path at a given animation frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrameEntry {
    pub path: usize,
    /// Number of already drawn samples (the trail is `x[..trail], y[..trail]`).
    pub trail: usize,
    pub head: (f64, f64),
}

/// Paths sharing one launch speed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectileFan {
    pub speed: f64,
    pub paths: Vec<ProjectilePath>,
}

impl ProjectileFan {
    pub fn new(speed: f64, angles: &[f64], gravity: f64, dt: f64) -> Result<Self, PhysicsError> {
        let paths = angles
            .iter()
            .map(|&angle| ProjectilePath::launch(speed, angle, gravity, dt))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { speed, paths })
    }

    /// Frames needed until every projectile has landed.
    pub fn longest(&self) -> usize {
        self.paths.iter().map(ProjectilePath::len).max().unwrap_or(0)
    }

    /// Paths still in flight at `step`, with their trail and current position.
    pub fn frame(&self, step: usize) -> Vec<FrameEntry> {
        self.paths
            .iter()
            .enumerate()
            .filter(|(_, path)| step < path.len())
            .map(|(index, path)| FrameEntry {
                path: index,
                trail: step,
                head: (path.x[step], path.y[step]),
            })
            .collect()
    }

    /// `(x_max, y_max)` of a view that fits every path.
    pub fn view_bounds(&self) -> (f64, f64) {
        let max_of = |values: &[f64]| values.iter().copied().fold(0.0f64, f64::max);
        self.paths.iter().fold((0.0f64, 0.0f64), |(x, y), path| {
            (
                x.max(max_of(&path.x) * VIEW_MARGIN),
                y.max(max_of(&path.y) * VIEW_MARGIN),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn horizontal_launch_only_keeps_the_origin() {
        let path = ProjectilePath::launch(20.0, 0.0, GRAVITY, FRAME_INTERVAL).expect("path");
        assert_eq!(path.len(), 1);
        assert_eq!((path.x[0], path.y[0]), (0.0, 0.0));
    }

    #[test]
    fn path_matches_closed_form_and_stays_above_ground() {
        let path = ProjectilePath::launch(20.0, 45.0, GRAVITY, FRAME_INTERVAL).expect("path");
        let v = 20.0 * 45f64.to_radians().cos();
        // flight time 2 v / g ≈ 2.886 s
        assert_eq!(path.len(), 58);
        assert!(path.y.iter().all(|&y| y >= 0.0));
        assert_relative_eq!(path.x[10], v * 0.5, epsilon = 1e-9);
        assert_relative_eq!(path.y[10], v * 0.5 - 0.5 * GRAVITY * 0.25, epsilon = 1e-9);
    }

    #[test]
    fn rejects_bad_input() {
        assert!(ProjectilePath::launch(-1.0, 45.0, GRAVITY, 0.05).is_err());
        assert!(ProjectilePath::launch(10.0, f64::NAN, GRAVITY, 0.05).is_err());
        assert!(ProjectilePath::launch(10.0, 45.0, 0.0, 0.05).is_err());
        assert!(ProjectilePath::launch(10.0, 45.0, GRAVITY, 0.0).is_err());
    }

    #[test]
    fn rejects_paths_with_too_many_samples() {
        let err = ProjectilePath::launch(20.0, 80.0, GRAVITY, 1e-9).expect_err("tiny step");
        assert!(err.to_string().contains("samples"), "{err}");
        assert!(ProjectilePath::launch(1e300, 45.0, GRAVITY, FRAME_INTERVAL).is_err());
        assert!(ProjectileFan::new(20.0, &[30.0, 80.0], GRAVITY, 1e-9).is_err());

        // A straight-down launch never leaves the ground, whatever the step.
        let down = ProjectilePath::launch(20.0, -90.0, GRAVITY, 1e-9).expect("path");
        assert_eq!(down.len(), 1);
    }

    #[test]
    fn fan_frames_drop_landed_paths() {
        let fan = ProjectileFan::new(20.0, &default_angles(), GRAVITY, FRAME_INTERVAL)
            .expect("fan");
        assert_eq!(fan.paths.len(), 18);
        let longest = fan.longest();
        assert_eq!(longest, fan.paths[17].len());

        assert_eq!(fan.frame(0).len(), 18);
        assert_eq!(fan.frame(1).len(), 17);
        assert!(fan.frame(longest).is_empty());

        let last = fan.frame(longest - 1);
        assert_eq!(last.len(), 1);
        assert_eq!(last[0].path, 17);
        assert_eq!(last[0].trail, longest - 1);
    }

    #[test]
    fn view_bounds_add_a_margin() {
        let fan = ProjectileFan::new(10.0, &[45.0, 90.0], GRAVITY, 0.01).expect("fan");
        let (x_max, y_max) = fan.view_bounds();
        // Range v²/g and apex v²/2g, sampled slightly short of both.
        assert!(x_max <= 100.0 / GRAVITY * VIEW_MARGIN + 1e-9);
        assert!(x_max > 100.0 / GRAVITY * VIEW_MARGIN * 0.98);
        assert!(y_max <= 50.0 / GRAVITY * VIEW_MARGIN + 1e-9);
        assert!(y_max > 50.0 / GRAVITY * VIEW_MARGIN * 0.98);
    }
}
