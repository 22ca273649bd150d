use anyhow::Result;
use num_traits::{Float, FromPrimitive};
use std::fmt::Debug;

/// A trait for types that can be used as scalars by the steppers.
/// Must support basic arithmetic, debug printing, and conversion from f64.
pub trait Scalar: Float + FromPrimitive + Debug + 'static {}

impl<T: Float + FromPrimitive + Debug + 'static> Scalar for T {}

/// A first-order rate law `dy/dt = f(t, y)`.
pub trait RateLaw<T: Scalar> {
    /// Evaluates the rate at time `t` and state `y`.
    fn rate(&self, t: T, y: T) -> Result<T>;
}

/// An acceleration field `d²x/dt² = a(x)` depending on position only.
pub trait AccelerationField<T: Scalar> {
    /// Evaluates the acceleration at position `x`.
    fn acceleration(&self, x: T) -> Result<T>;
}

impl<T, F> RateLaw<T> for F
where
    T: Scalar,
    F: Fn(T, T) -> T,
{
    fn rate(&self, t: T, y: T) -> Result<T> {
        Ok(self(t, y))
    }
}

impl<T, F> AccelerationField<T> for F
where
    T: Scalar,
    F: Fn(T) -> T,
{
    fn acceleration(&self, x: T) -> Result<T> {
        Ok(self(x))
    }
}

/// Wraps a closure that can fail, so it can be used as a [`RateLaw`] or an
/// [`AccelerationField`]. Infallible closures implement both traits directly.
///
/// ```
/// use physim_core::traits::{Fallible, RateLaw};
///
/// let law = Fallible(|_t: f64, y: f64| {
///     anyhow::ensure!(y.abs() <= 2.0, "state left the domain");
///     Ok((4.0 - y * y).sqrt())
/// });
/// assert!(law.rate(0.0, 3.0).is_err());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Fallible<F>(pub F);

impl<T, F> RateLaw<T> for Fallible<F>
where
    T: Scalar,
    F: Fn(T, T) -> Result<T>,
{
    fn rate(&self, t: T, y: T) -> Result<T> {
        (self.0)(t, y)
    }
}

impl<T, F> AccelerationField<T> for Fallible<F>
where
    T: Scalar,
    F: Fn(T) -> Result<T>,
{
    fn acceleration(&self, x: T) -> Result<T> {
        (self.0)(x)
    }
}
