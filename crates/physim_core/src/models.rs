//! Derivative functions used by the mechanics demos.

use crate::traits::{AccelerationField, RateLaw};
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Mass on a spring: `a(x) = -(k / m) x`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HarmonicOscillator {
    pub stiffness: f64,
    pub mass: f64,
}

impl Default for HarmonicOscillator {
    fn default() -> Self {
        Self {
            stiffness: 1.0,
            mass: 1.0,
        }
    }
}

impl HarmonicOscillator {
    pub fn angular_frequency(&self) -> f64 {
        (self.stiffness / self.mass).sqrt()
    }
}

impl AccelerationField<f64> for HarmonicOscillator {
    fn acceleration(&self, x: f64) -> Result<f64> {
        Ok(-(self.stiffness / self.mass) * x)
    }
}

/// Simple pendulum without the small-angle approximation: `a(θ) = -(g / l) sin θ`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pendulum {
    pub gravity: f64,
    pub length: f64,
}

impl Default for Pendulum {
    fn default() -> Self {
        Self {
            gravity: 9.8,
            length: 1.0,
        }
    }
}

impl Pendulum {
    /// Plot legend for the equation of motion.
    pub fn label(&self) -> &'static str {
        "-(g/l) * sin(x)"
    }
}

impl AccelerationField<f64> for Pendulum {
    fn acceleration(&self, x: f64) -> Result<f64> {
        Ok(-(self.gravity / self.length) * x.sin())
    }
}

/// `a(x) = sin x`
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Sine;

impl AccelerationField<f64> for Sine {
    fn acceleration(&self, x: f64) -> Result<f64> {
        Ok(x.sin())
    }
}

/// `dy/dt = t³ √(4 − y²)`, whose solution from `y(0) = 0` is `2 sin(t⁴ / 4)`.
/// Outside `|y| <= 2` the rate is NaN.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct QuarterCircleRate;

impl RateLaw<f64> for QuarterCircleRate {
    fn rate(&self, t: f64, y: f64) -> Result<f64> {
        Ok(t.powi(3) * (4.0 - y * y).sqrt())
    }
}
