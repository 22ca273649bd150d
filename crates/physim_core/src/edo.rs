//! Fixed-step ODE integration.
//!
//! An [`EdoSolver`] integrates either a first-order rate law `dy/dt = f(t, y)`
//! or a second-order system `d²x/dt² = a(x)` from `t = 0` until the configured
//! span, sampling the state after every step.

use crate::error::SolverError;
use crate::solvers::{ForwardEuler, PhaseState, SecondOrderScheme};
use crate::traits::{AccelerationField, RateLaw, Scalar};
use serde::Serialize;
use tracing::{debug, debug_span, warn};

/// Span used when the caller does not provide one.
pub const DEFAULT_SPAN: f64 = 10.0;
/// Upper bound on the step size.
pub const MAX_STEP: f64 = 1e-3;
/// Smallest accepted span. Below it `t / 1000` approaches the subnormal range.
pub const MIN_SPAN: f64 = 1e-6;
/// Largest number of steps a single run may take.
pub const MAX_STEPS: usize = 50_000_000;

/// Immutable integration settings: initial value, span and step size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig<T = f64> {
    x0: T,
    span: T,
    delta: T,
}

impl<T: Scalar> SolverConfig<T> {
    /// Config with the default span of 10.
    pub fn new(x0: T) -> Result<Self, SolverError> {
        Self::with_span(x0, constant(DEFAULT_SPAN)?)
    }

    /// Config integrating over `[0, span]` with `delta = min(0.001, span / 1000)`.
    pub fn with_span(x0: T, span: T) -> Result<Self, SolverError> {
        if !x0.is_finite() {
            return Err(SolverError::invalid(format!(
                "x0 must be finite, got {x0:?}"
            )));
        }
        if !span.is_finite() {
            return Err(SolverError::invalid(format!(
                "simulation time must be finite, got {span:?}"
            )));
        }
        if span < constant(MIN_SPAN)? {
            return Err(SolverError::invalid(format!(
                "simulation time must be at least {MIN_SPAN}, got {span:?}"
            )));
        }

        let delta = constant::<T>(MAX_STEP)?.min(span / constant(1000.0)?);
        Self { x0, span, delta }.checked()
    }

    /// Replaces the derived step size with an explicit one (`0 < delta <= span`).
    pub fn with_step(self, delta: T) -> Result<Self, SolverError> {
        if !delta.is_finite() || delta <= T::zero() {
            return Err(SolverError::invalid(format!(
                "step size must be positive and finite, got {delta:?}"
            )));
        }
        if delta > self.span {
            return Err(SolverError::invalid(format!(
                "step size {delta:?} exceeds simulation time {:?}",
                self.span
            )));
        }
        Self { delta, ..self }.checked()
    }

    fn checked(self) -> Result<Self, SolverError> {
        let steps = self.step_count();
        if steps > MAX_STEPS {
            return Err(SolverError::invalid(format!(
                "{steps} steps requested, at most {MAX_STEPS} are allowed"
            )));
        }
        Ok(self)
    }

    pub fn x0(&self) -> T {
        self.x0
    }

    pub fn span(&self) -> T {
        self.span
    }

    pub fn delta(&self) -> T {
        self.delta
    }

    /// Number of steps needed to reach the span.
    pub fn step_count(&self) -> usize {
        (self.span / self.delta)
            .ceil()
            .to_usize()
            .unwrap_or(usize::MAX)
    }
}

fn constant<T: Scalar>(value: f64) -> Result<T, SolverError> {
    T::from_f64(value)
        .ok_or_else(|| SolverError::invalid(format!("{value} is not representable")))
}

/// Time samples and the matching state samples of one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trajectory<T = f64> {
    times: Vec<T>,
    values: Vec<T>,
}

impl<T: Scalar> Trajectory<T> {
    fn with_capacity(capacity: usize, x0: T) -> Self {
        let mut times = Vec::with_capacity(capacity);
        let mut values = Vec::with_capacity(capacity);
        times.push(T::zero());
        values.push(x0);
        Self { times, values }
    }

    fn push(&mut self, time: T, value: T) {
        self.times.push(time);
        self.values.push(value);
    }

    pub fn times(&self) -> &[T] {
        &self.times
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Final `(time, value)` sample.
    pub fn last(&self) -> Option<(T, T)> {
        Some((*self.times.last()?, *self.values.last()?))
    }

    pub fn iter(&self) -> impl Iterator<Item = (T, T)> + '_ {
        self.times.iter().copied().zip(self.values.iter().copied())
    }

    pub fn into_parts(self) -> (Vec<T>, Vec<T>) {
        (self.times, self.values)
    }

    fn is_finite(&self) -> bool {
        self.values.iter().all(|v| v.is_finite())
    }
}

/// Slice-taking derivative with a declared parameter count, as produced by
/// dynamically typed callers.
pub type ArgsFn<'a, T> = dyn Fn(&[T]) -> anyhow::Result<T> + 'a;

struct ArgsAdapter<'a, T>(&'a ArgsFn<'a, T>);

impl<T: Scalar> RateLaw<T> for ArgsAdapter<'_, T> {
    fn rate(&self, t: T, y: T) -> anyhow::Result<T> {
        (self.0)(&[t, y])
    }
}

impl<T: Scalar> AccelerationField<T> for ArgsAdapter<'_, T> {
    fn acceleration(&self, x: T) -> anyhow::Result<T> {
        (self.0)(&[x])
    }
}

/// The system to integrate, tagged with its order.
pub enum Derivative<'a, T: Scalar = f64> {
    /// `dy/dt = f(t, y)`, integrated with forward Euler.
    FirstOrder(Box<dyn RateLaw<T> + 'a>),
    /// `d²x/dt² = a(x)` starting with velocity `v0`, integrated with semi-implicit Euler.
    SecondOrder {
        acceleration: Box<dyn AccelerationField<T> + 'a>,
        v0: T,
    },
}

impl<'a, T: Scalar> Derivative<'a, T> {
    pub fn first_order(law: impl RateLaw<T> + 'a) -> Self {
        Derivative::FirstOrder(Box::new(law))
    }

    pub fn second_order(field: impl AccelerationField<T> + 'a, v0: T) -> Self {
        Derivative::SecondOrder {
            acceleration: Box::new(field),
            v0,
        }
    }

    /// Picks the order from the number of parameters `f` accepts: one
    /// parameter is an acceleration field, two are a rate law `(t, y)`.
    pub fn from_arity(
        arity: usize,
        f: &'a ArgsFn<'a, T>,
        v0: Option<T>,
    ) -> Result<Self, SolverError> {
        match arity {
            1 => {
                let v0 = v0.ok_or_else(|| {
                    SolverError::invalid("an initial velocity is required for second-order systems")
                })?;
                Ok(Self::second_order(ArgsAdapter(f), v0))
            }
            2 => Ok(Self::first_order(ArgsAdapter(f))),
            other => Err(SolverError::UnsupportedFunctionSignature { arity: other }),
        }
    }

    pub fn order(&self) -> usize {
        match self {
            Derivative::FirstOrder(_) => 1,
            Derivative::SecondOrder { .. } => 2,
        }
    }
}

/// Fixed-step integrator over a [`SolverConfig`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdoSolver<T = f64> {
    config: SolverConfig<T>,
}

impl<T: Scalar> EdoSolver<T> {
    pub fn new(config: SolverConfig<T>) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SolverConfig<T> {
        &self.config
    }

    /// Integrates `derivative` with the scheme matching its order.
    pub fn solve(&self, derivative: Derivative<'_, T>) -> Result<Trajectory<T>, SolverError> {
        match derivative {
            Derivative::FirstOrder(law) => self.solve_first_order(law.as_ref()),
            Derivative::SecondOrder { acceleration, v0 } => {
                self.solve_second_order(acceleration.as_ref(), v0)
            }
        }
    }

    /// Forward Euler on `dy/dt = f(t, y)` starting from `y = x0`.
    pub fn solve_first_order<L>(&self, law: &L) -> Result<Trajectory<T>, SolverError>
    where
        L: RateLaw<T> + ?Sized,
    {
        let steps = self.config.step_count();
        let _span = debug_span!("solve_first_order", steps).entered();

        let mut trajectory = Trajectory::with_capacity(steps + 1, self.config.x0);
        let mut y = self.config.x0;
        self.run(&mut trajectory, |t, dt| {
            ForwardEuler.step(law, t, &mut y, dt)?;
            Ok(y)
        })?;

        self.finish(trajectory)
    }

    /// Semi-implicit Euler on `d²x/dt² = a(x)`. Only positions are recorded.
    pub fn solve_second_order<A>(&self, field: &A, v0: T) -> Result<Trajectory<T>, SolverError>
    where
        A: AccelerationField<T> + ?Sized,
    {
        self.solve_second_order_with(SecondOrderScheme::SemiImplicitEuler, field, v0)
    }

    /// Explicit Euler on `d²x/dt² = a(x)`, kept for comparison with the
    /// semi-implicit scheme. A missing velocity starts the system at rest.
    pub fn explicit_euler<A>(&self, field: &A, v0: Option<T>) -> Result<Trajectory<T>, SolverError>
    where
        A: AccelerationField<T> + ?Sized,
    {
        self.solve_second_order_with(
            SecondOrderScheme::ExplicitEuler,
            field,
            v0.unwrap_or_else(T::zero),
        )
    }

    pub fn solve_second_order_with<A>(
        &self,
        scheme: SecondOrderScheme,
        field: &A,
        v0: T,
    ) -> Result<Trajectory<T>, SolverError>
    where
        A: AccelerationField<T> + ?Sized,
    {
        if !v0.is_finite() {
            return Err(SolverError::invalid(format!(
                "v0 must be finite, got {v0:?}"
            )));
        }
        let steps = self.config.step_count();
        let _span = debug_span!("solve_second_order", scheme = scheme.name(), steps).entered();

        let mut trajectory = Trajectory::with_capacity(steps + 1, self.config.x0);
        let mut state = PhaseState::new(self.config.x0, v0);
        self.run(&mut trajectory, |_t, dt| {
            scheme.step(field, &mut state, dt)?;
            Ok(state.position)
        })?;

        self.finish(trajectory)
    }

    /// Steps until the sampled time reaches the span. The time after step `k`
    /// is `k * delta`, so the spacing stays constant for long runs.
    fn run<S>(&self, trajectory: &mut Trajectory<T>, mut step: S) -> Result<(), SolverError>
    where
        S: FnMut(T, T) -> anyhow::Result<T>,
    {
        let delta = self.config.delta;
        let span = self.config.span;
        let mut index = 0usize;
        let mut time = T::zero();

        while time < span {
            let value = step(time, delta).map_err(|source| SolverError::PropagatedComputation {
                time: time.to_f64().unwrap_or(f64::NAN),
                source,
            })?;
            index += 1;
            time = constant::<T>(index as f64)? * delta;
            trajectory.push(time, value);
        }

        Ok(())
    }

    fn finish(&self, trajectory: Trajectory<T>) -> Result<Trajectory<T>, SolverError> {
        if !trajectory.is_finite() {
            warn!(
                samples = trajectory.len(),
                "trajectory contains non-finite values"
            );
        }
        debug!(samples = trajectory.len(), "integration finished");
        Ok(trajectory)
    }
}
