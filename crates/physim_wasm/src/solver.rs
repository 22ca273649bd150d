//! WASM wrapper around the fixed-step ODE integrator.

use crate::{to_js_error, to_js_value};
use anyhow::anyhow;
use physim_core::edo::{Derivative, EdoSolver, SolverConfig};
use physim_core::traits::Fallible;
use physim_core::SolverError;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub struct WasmEdoSolver {
    solver: EdoSolver<f64>,
}

pub(crate) fn build_config(
    x0: f64,
    t: Option<f64>,
    step: Option<f64>,
) -> Result<SolverConfig<f64>, SolverError> {
    let config = match t {
        Some(t) => SolverConfig::with_span(x0, t)?,
        None => SolverConfig::new(x0)?,
    };
    match step {
        Some(step) => config.with_step(step),
        None => Ok(config),
    }
}

/// Calls a JS derivative with one `(x)` or two `(t, y)` numeric arguments.
fn call_derivative(f: &js_sys::Function, args: &[f64]) -> anyhow::Result<f64> {
    let this = JsValue::NULL;
    let result = match args {
        [x] => f.call1(&this, &JsValue::from_f64(*x)),
        [t, y] => f.call2(&this, &JsValue::from_f64(*t), &JsValue::from_f64(*y)),
        _ => return Err(anyhow!("derivative called with {} arguments", args.len())),
    }
    .map_err(|err| anyhow!("derivative threw: {}", describe(&err)))?;

    result
        .as_f64()
        .ok_or_else(|| anyhow!("derivative returned a non-numeric value: {}", describe(&result)))
}

fn describe(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

#[wasm_bindgen]
impl WasmEdoSolver {
    #[wasm_bindgen(constructor)]
    pub fn new(x0: f64, t: Option<f64>, step: Option<f64>) -> Result<WasmEdoSolver, JsValue> {
        console_error_panic_hook::set_once();

        let config = build_config(x0, t, step).map_err(to_js_error)?;
        Ok(WasmEdoSolver {
            solver: EdoSolver::new(config),
        })
    }

    pub fn delta(&self) -> f64 {
        self.solver.config().delta()
    }

    pub fn span(&self) -> f64 {
        self.solver.config().span()
    }

    pub fn step_count(&self) -> usize {
        self.solver.config().step_count()
    }

    /// Integrates `f`, choosing the scheme from its declared parameter count:
    /// `(x) => a` is integrated as a second-order system starting at `v0`,
    /// `(t, y) => dy` as a first-order one.
    pub fn solve(&self, f: &js_sys::Function, v0: Option<f64>) -> Result<JsValue, JsValue> {
        let call = |args: &[f64]| call_derivative(f, args);
        let derivative =
            Derivative::from_arity(f.length() as usize, &call, v0).map_err(to_js_error)?;
        let trajectory = self.solver.solve(derivative).map_err(to_js_error)?;
        to_js_value(&trajectory)
    }

    /// Explicit Euler on an acceleration function `(x) => a`, for comparison
    /// with the default scheme.
    pub fn solve_explicit_euler(
        &self,
        f: &js_sys::Function,
        v0: Option<f64>,
    ) -> Result<JsValue, JsValue> {
        let arity = f.length() as usize;
        if arity != 1 {
            return Err(to_js_error(SolverError::UnsupportedFunctionSignature {
                arity,
            }));
        }
        let field = Fallible(|x: f64| call_derivative(f, &[x]));
        let trajectory = self
            .solver
            .explicit_euler(&field, v0)
            .map_err(to_js_error)?;
        to_js_value(&trajectory)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[cfg(target_arch = "wasm32")]
    use wasm_bindgen_test::wasm_bindgen_test;

    #[test]
    fn build_config_uses_defaults() {
        let config = build_config(-0.5, None, None).expect("config");
        assert_eq!(config.span(), 10.0);
        assert_eq!(config.delta(), 0.001);

        let stepped = build_config(-0.5, Some(10.0), Some(0.01)).expect("config");
        assert_eq!(stepped.delta(), 0.01);
        assert_eq!(stepped.step_count(), 1000);
    }

    #[test]
    fn build_config_rejects_non_positive_span() {
        let err = build_config(0.0, Some(0.0), None).expect_err("zero span");
        assert!(matches!(err, SolverError::InvalidConfiguration(_)));
        assert!(build_config(0.0, Some(1.0), Some(-0.1)).is_err());
    }

    #[test]
    fn wasm_solver_exposes_step_settings() {
        let solver = WasmEdoSolver::new(0.01, Some(5.0), None).expect("solver");
        assert!((solver.span() - 5.0).abs() < 1e-12);
        assert!((solver.delta() - 0.001).abs() < 1e-15);
        assert_eq!(solver.step_count(), 5000);
    }

    #[cfg(target_arch = "wasm32")]
    #[wasm_bindgen_test]
    fn wasm_solver_rejects_invalid_span() {
        assert!(WasmEdoSolver::new(0.0, Some(-1.0), None).is_err());
    }

    #[cfg(target_arch = "wasm32")]
    #[wasm_bindgen_test]
    fn solve_dispatches_on_function_length() {
        let solver = WasmEdoSolver::new(1.0, Some(1.0), None).expect("solver");
        let rate = js_sys::Function::new_with_args("t, y", "return -y;");
        assert!(solver.solve(&rate, None).is_ok());

        let acceleration = js_sys::Function::new_with_args("x", "return -x;");
        assert!(solver.solve(&acceleration, Some(0.0)).is_ok());
        assert!(solver.solve(&acceleration, None).is_err());

        let ternary = js_sys::Function::new_with_args("a, b, c", "return 0;");
        assert!(solver.solve(&ternary, Some(0.0)).is_err());
    }

    #[cfg(target_arch = "wasm32")]
    #[wasm_bindgen_test]
    fn thrown_errors_abort_the_run() {
        let solver = WasmEdoSolver::new(1.0, Some(1.0), None).expect("solver");
        let failing = js_sys::Function::new_with_args("x", "throw new Error('nope');");
        assert!(solver.solve_explicit_euler(&failing, None).is_err());
    }
}
