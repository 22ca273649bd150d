//! JavaScript bindings for physim.
//!
//! The browser front-end owns plotting; this crate hands it trajectories,
//! field samples and projectile paths as plain JS objects.

mod plots;
mod solver;

pub use plots::{default_field_config, projectile_fan, sample_field};
pub use solver::WasmEdoSolver;

use wasm_bindgen::JsValue;

/// Renders the error with its whole cause chain, e.g. a failure thrown by a
/// JS derivative after the solver's own message.
pub(crate) fn to_js_error(err: impl Into<anyhow::Error>) -> JsValue {
    JsValue::from_str(&error_chain(err.into()))
}

fn error_chain(err: anyhow::Error) -> String {
    format!("{err:#}")
}

pub(crate) fn to_js_value<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|err| JsValue::from_str(&format!("Failed to serialize result: {err}")))
}
