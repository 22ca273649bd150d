pub mod config;
pub mod edo;
pub mod electrostatics;
pub mod error;
pub mod models;
pub mod projectile;
pub mod solvers;
/// The `physim_core` crate provides the numerics behind the physim teaching demos.
/// The integrators are generic over the scalar type, with `f64` as the default.
///
/// Key components:
/// - **Traits**: `Scalar` (numeric type abstraction), `RateLaw` and `AccelerationField` (derivative functions).
/// - **Edo**: `EdoSolver`, a fixed-step integrator producing position-over-time `Trajectory`s.
/// - **Solvers**: single-step update rules (forward Euler, semi-implicit and explicit Euler).
/// - **Electrostatics**: Coulomb fields of point charges sampled on a grid for quiver plots.
/// - **Projectile**: drag-free launch paths and animation frames.
pub mod traits;
pub mod vector;

pub use edo::{Derivative, EdoSolver, SolverConfig, Trajectory};
pub use error::{ConfigError, PhysicsError, SolverError};
