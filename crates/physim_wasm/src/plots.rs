//! Field and projectile data for the plotting front-end.

use crate::{to_js_error, to_js_value};
use physim_core::config::FieldConfig;
use physim_core::electrostatics;
use physim_core::projectile::{default_angles, ProjectileFan, FRAME_INTERVAL, GRAVITY};
use physim_core::PhysicsError;
use wasm_bindgen::prelude::*;

/// Samples the field described by a JSON configuration. Missing keys fall
/// back to the default dipole.
#[wasm_bindgen]
pub fn sample_field(config_json: &str) -> Result<JsValue, JsValue> {
    let config = FieldConfig::from_json_str(config_json).map_err(to_js_error)?;
    let sample = electrostatics::sample_field(&config).map_err(to_js_error)?;
    to_js_value(&sample)
}

#[wasm_bindgen]
pub fn default_field_config() -> Result<String, JsValue> {
    FieldConfig::default().to_json_pretty().map_err(to_js_error)
}

pub(crate) fn build_fan(
    speed: f64,
    angles: &[f64],
    gravity: Option<f64>,
    dt: Option<f64>,
) -> Result<ProjectileFan, PhysicsError> {
    let defaults;
    let angles = if angles.is_empty() {
        defaults = default_angles();
        defaults.as_slice()
    } else {
        angles
    };
    ProjectileFan::new(
        speed,
        angles,
        gravity.unwrap_or(GRAVITY),
        dt.unwrap_or(FRAME_INTERVAL),
    )
}

/// Paths for every launch angle (all demo angles when `angles` is empty).
#[wasm_bindgen]
pub fn projectile_fan(
    speed: f64,
    angles: Vec<f64>,
    gravity: Option<f64>,
    dt: Option<f64>,
) -> Result<JsValue, JsValue> {
    let fan = build_fan(speed, &angles, gravity, dt).map_err(to_js_error)?;
    to_js_value(&fan)
}
