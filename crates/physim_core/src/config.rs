//! JSON configuration for the solver and the field plots.

use crate::edo::{SolverConfig, DEFAULT_SPAN};
use crate::electrostatics::{PointCharge, MAX_GRID_POINTS};
use crate::error::{ConfigError, SolverError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Solver settings as written in a JSON file: `{"x0": -0.5, "v0": 0.2, "t": 10}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SolverSettings {
    pub x0: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub v0: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t: Option<f64>,
}

impl SolverSettings {
    pub fn from_json_str(json: &str) -> Result<Self, SolverError> {
        serde_json::from_str(json)
            .map_err(|err| SolverError::invalid(format!("malformed solver settings: {err}")))
    }

    pub fn v0(&self) -> Option<f64> {
        self.v0
    }

    pub fn solver_config(&self) -> Result<SolverConfig<f64>, SolverError> {
        let x0 = self
            .x0
            .ok_or_else(|| SolverError::invalid("missing initial value x0"))?;
        SolverConfig::with_span(x0, self.t.unwrap_or(DEFAULT_SPAN))
    }
}

/// Reads the simulation time from a command-line argument. Only whole
/// numbers are accepted; anything else falls back to [`DEFAULT_SPAN`].
pub fn parse_span_arg(arg: Option<&str>) -> f64 {
    match arg.map(|raw| raw.trim().parse::<i64>()) {
        Some(Ok(span)) => span as f64,
        Some(Err(err)) => {
            warn!(%err, default = DEFAULT_SPAN, "ignoring simulation time argument");
            DEFAULT_SPAN
        }
        None => DEFAULT_SPAN,
    }
}

/// Coordinates and charge of one entry in the `charges` table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChargeSpec {
    pub x: f64,
    pub y: f64,
    pub q: f64,
}

#[derive(Deserialize)]
struct RawChargeSpec {
    x: Option<f64>,
    y: Option<f64>,
    q: Option<f64>,
}

/// Point charges plus plot settings. Keys absent from the file keep their
/// default values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldConfig {
    pub charges: BTreeMap<String, ChargeSpec>,
    pub colormap: String,
    pub r_min: f64,
    pub grid_points: usize,
    pub extent: f64,
}

impl Default for FieldConfig {
    fn default() -> Self {
        let charges = BTreeMap::from([
            (
                "charge1".to_string(),
                ChargeSpec {
                    x: 1.2,
                    y: 0.0,
                    q: -1e-10,
                },
            ),
            (
                "charge2".to_string(),
                ChargeSpec {
                    x: -1.2,
                    y: 0.0,
                    q: 1e-10,
                },
            ),
        ]);
        Self {
            charges,
            colormap: "inferno".to_string(),
            r_min: 0.1,
            grid_points: 31,
            extent: 3.0,
        }
    }
}

#[derive(Deserialize)]
struct RawFieldConfig {
    charges: Option<BTreeMap<String, RawChargeSpec>>,
    colormap: Option<String>,
    r_min: Option<f64>,
    grid_points: Option<usize>,
    extent: Option<f64>,
}

impl FieldConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Self::parse(json, "<inline>")
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&json, &path.display().to_string())
    }

    /// Loads `path`, writing the default configuration there first if the file
    /// does not exist yet.
    pub fn load_or_init(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            let defaults = Self::default();
            fs::write(path, defaults.to_json_pretty()?).map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            info!(path = %path.display(), "wrote default field configuration");
        }
        Self::load(path)
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|source| ConfigError::Parse {
            origin: "<default>".to_string(),
            source,
        })
    }

    pub fn point_charges(&self) -> Vec<PointCharge> {
        self.charges
            .values()
            .map(|spec| PointCharge::new(spec.x, spec.y, spec.q))
            .collect()
    }

    fn parse(json: &str, origin: &str) -> Result<Self, ConfigError> {
        let raw: RawFieldConfig =
            serde_json::from_str(json).map_err(|source| ConfigError::Parse {
                origin: origin.to_string(),
                source,
            })?;

        let mut config = Self::default();
        if let Some(charges) = raw.charges {
            config.charges = charges
                .into_iter()
                .map(|(name, spec)| match (spec.x, spec.y, spec.q) {
                    (Some(x), Some(y), Some(q)) => Ok((name, ChargeSpec { x, y, q })),
                    _ => Err(ConfigError::IncompleteCharge { name }),
                })
                .collect::<Result<_, _>>()?;
        }
        if let Some(colormap) = raw.colormap {
            config.colormap = colormap;
        }
        if let Some(r_min) = raw.r_min {
            config.r_min = r_min;
        }
        if let Some(grid_points) = raw.grid_points {
            config.grid_points = grid_points;
        }
        if let Some(extent) = raw.extent {
            config.extent = extent;
        }
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !self.r_min.is_finite() || self.r_min < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "r_min must be finite and non-negative, got {}",
                self.r_min
            )));
        }
        if !(2..=MAX_GRID_POINTS).contains(&self.grid_points) {
            return Err(ConfigError::Invalid(format!(
                "grid_points must be between 2 and {MAX_GRID_POINTS}, got {}",
                self.grid_points
            )));
        }
        if let Some((name, _)) = self
            .charges
            .iter()
            .find(|(_, c)| !(c.x.is_finite() && c.y.is_finite() && c.q.is_finite()))
        {
            return Err(ConfigError::Invalid(format!(
                "charge '{name}' has non-finite values"
            )));
        }
        Ok(())
    }
}
