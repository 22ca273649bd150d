use crate::traits::{AccelerationField, RateLaw, Scalar};
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Position and velocity of a second-order system.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseState<T> {
    pub position: T,
    pub velocity: T,
}

impl<T: Scalar> PhaseState<T> {
    pub fn new(position: T, velocity: T) -> Self {
        Self { position, velocity }
    }

    /// Starts at rest.
    pub fn at_rest(position: T) -> Self {
        Self::new(position, T::zero())
    }
}

/// Forward (explicit) Euler for first-order rate laws.
/// y_{n+1} = y_n + dt * f(t_n, y_n)
#[derive(Debug, Clone, Copy, Default)]
pub struct ForwardEuler;

impl ForwardEuler {
    /// Advances `y` by one step of size `dt` from time `t`.
    pub fn step<T, L>(&self, law: &L, t: T, y: &mut T, dt: T) -> Result<()>
    where
        T: Scalar,
        L: RateLaw<T> + ?Sized,
    {
        let rate = law.rate(t, *y)?;
        *y = *y + rate * dt;
        Ok(())
    }
}

/// Update rules for position/velocity systems driven by an acceleration field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecondOrderScheme {
    /// Velocity first, then position with the new velocity. Symplectic.
    #[default]
    SemiImplicitEuler,
    /// Position with the old velocity, then velocity. Energy grows on oscillators.
    ExplicitEuler,
}

impl SecondOrderScheme {
    pub fn step<T, A>(self, field: &A, state: &mut PhaseState<T>, dt: T) -> Result<()>
    where
        T: Scalar,
        A: AccelerationField<T> + ?Sized,
    {
        let acceleration = field.acceleration(state.position)?;
        match self {
            SecondOrderScheme::SemiImplicitEuler => {
                state.velocity = state.velocity + acceleration * dt;
                state.position = state.position + state.velocity * dt;
            }
            SecondOrderScheme::ExplicitEuler => {
                state.position = state.position + state.velocity * dt;
                state.velocity = state.velocity + acceleration * dt;
            }
        }
        Ok(())
    }

    pub fn name(self) -> &'static str {
        match self {
            SecondOrderScheme::SemiImplicitEuler => "semi-implicit euler",
            SecondOrderScheme::ExplicitEuler => "explicit euler",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::Fallible;
    use approx::assert_relative_eq;

    #[test]
    fn forward_euler_uses_rate_at_step_start() {
        let mut y = 1.0;
        ForwardEuler
            .step(&|t: f64, y: f64| t + y, 2.0, &mut y, 0.5)
            .expect("step");
        assert_relative_eq!(y, 2.5, epsilon = 1e-15);
    }

    #[test]
    fn semi_implicit_moves_with_updated_velocity() {
        let mut state = PhaseState::new(1.0, 0.0);
        SecondOrderScheme::SemiImplicitEuler
            .step(&|x: f64| -x, &mut state, 0.1)
            .expect("step");
        assert_relative_eq!(state.velocity, -0.1, epsilon = 1e-15);
        assert_relative_eq!(state.position, 0.99, epsilon = 1e-15);
    }

    #[test]
    fn explicit_moves_with_previous_velocity() {
        let mut state = PhaseState::new(1.0, 0.0);
        SecondOrderScheme::ExplicitEuler
            .step(&|x: f64| -x, &mut state, 0.1)
            .expect("step");
        assert_relative_eq!(state.velocity, -0.1, epsilon = 1e-15);
        assert_eq!(state.position, 1.0);
    }

    #[test]
    fn schemes_agree_when_acceleration_vanishes() {
        let mut a = PhaseState::new(0.0, 2.0);
        let mut b = a;
        for _ in 0..10 {
            SecondOrderScheme::SemiImplicitEuler
                .step(&|_x: f64| 0.0, &mut a, 0.25)
                .expect("step");
            SecondOrderScheme::ExplicitEuler
                .step(&|_x: f64| 0.0, &mut b, 0.25)
                .expect("step");
        }
        assert_eq!(a, b);
        assert_relative_eq!(a.position, 5.0, epsilon = 1e-12);
    }

    #[test]
    fn step_error_leaves_state_untouched() {
        let field = Fallible(|_x: f64| -> anyhow::Result<f64> { anyhow::bail!("boom") });
        let mut state = PhaseState::at_rest(3.0);
        let err = SecondOrderScheme::default()
            .step(&field, &mut state, 0.1)
            .expect_err("expected failure");
        assert_eq!(err.to_string(), "boom");
        assert_eq!(state, PhaseState::new(3.0, 0.0));
    }
}
