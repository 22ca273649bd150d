//! Electric field of point charges sampled on a square grid.
//!
//! Grids follow the `meshgrid` convention: entry `(row, col)` sits at
//! `x = xs[col]`, `y = ys[row]`.

use crate::config::FieldConfig;
use crate::error::PhysicsError;
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use tracing::debug;

/// Vacuum permittivity (F/m), rounded as in the lecture notes.
pub const EPSILON_ZERO: f64 = 8.85e-12;
/// Substitute magnitude for exact zeros before taking the logarithm.
const ZERO_MAGNITUDE_FLOOR: f64 = 1e-10;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointCharge {
    pub x: f64,
    pub y: f64,
    /// Charge in coulombs.
    pub q: f64,
}

impl PointCharge {
    pub fn new(x: f64, y: f64, q: f64) -> Self {
        Self { x, y, q }
    }

    fn distances(&self, grid: &FieldGrid) -> DMatrix<f64> {
        grid.x.zip_map(&grid.y, |x, y| (x - self.x).hypot(y - self.y))
    }
}

/// Largest accepted number of samples per grid axis.
pub const MAX_GRID_POINTS: usize = 1_000;

/// Square sampling mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldGrid {
    pub x: DMatrix<f64>,
    pub y: DMatrix<f64>,
}

impl FieldGrid {
    /// `points × points` mesh spanning `[-extent, extent]` on both axes.
    pub fn square(extent: f64, points: usize) -> Result<Self, PhysicsError> {
        if !extent.is_finite() || extent <= 0.0 {
            return Err(PhysicsError::InvalidInput(format!(
                "grid extent must be positive and finite, got {extent}"
            )));
        }
        if !(2..=MAX_GRID_POINTS).contains(&points) {
            return Err(PhysicsError::InvalidInput(format!(
                "grid needs between 2 and {MAX_GRID_POINTS} points per axis, got {points}"
            )));
        }
        let axis = linspace(-extent, extent, points);
        Ok(Self {
            x: DMatrix::from_fn(points, points, |_, col| axis[col]),
            y: DMatrix::from_fn(points, points, |row, _| axis[row]),
        })
    }

    pub fn shape(&self) -> (usize, usize) {
        self.x.shape()
    }
}

fn linspace(start: f64, end: f64, points: usize) -> Vec<f64> {
    let step = (end - start) / (points - 1) as f64;
    (0..points)
        .map(|i| {
            if i == points - 1 {
                end
            } else {
                start + step * i as f64
            }
        })
        .collect()
}

/// Field components `(Ex, Ey)` of a single charge. Points on the charge get zero.
pub fn electric_field(grid: &FieldGrid, charge: &PointCharge) -> (DMatrix<f64>, DMatrix<f64>) {
    let r = charge.distances(grid);
    let coulomb = 4.0 * PI * EPSILON_ZERO;
    let magnitude = r.map(|r| if r == 0.0 { 0.0 } else { charge.q / (coulomb * r * r) });

    let (rows, cols) = grid.shape();
    let mut ex = DMatrix::<f64>::zeros(rows, cols);
    let mut ey = DMatrix::<f64>::zeros(rows, cols);
    for row in 0..rows {
        for col in 0..cols {
            let theta = (grid.y[(row, col)] - charge.y).atan2(grid.x[(row, col)] - charge.x);
            ex[(row, col)] = magnitude[(row, col)] * theta.cos();
            ey[(row, col)] = magnitude[(row, col)] * theta.sin();
        }
    }
    (ex, ey)
}

/// Superposition of the fields of all `charges`.
pub fn net_field(grid: &FieldGrid, charges: &[PointCharge]) -> (DMatrix<f64>, DMatrix<f64>) {
    let (rows, cols) = grid.shape();
    charges.iter().fold(
        (DMatrix::zeros(rows, cols), DMatrix::zeros(rows, cols)),
        |(u, v), charge| {
            let (ex, ey) = electric_field(grid, charge);
            (u + ex, v + ey)
        },
    )
}

/// Grid points (and their field) at least `r_min` away from every charge,
/// flattened in row-major order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilteredField {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub u: Vec<f64>,
    pub v: Vec<f64>,
}

impl FilteredField {
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

pub fn filter_points(
    grid: &FieldGrid,
    u: &DMatrix<f64>,
    v: &DMatrix<f64>,
    charges: &[PointCharge],
    r_min: f64,
) -> FilteredField {
    let distances: Vec<DMatrix<f64>> = charges.iter().map(|c| c.distances(grid)).collect();
    let (rows, cols) = grid.shape();
    let mut out = FilteredField::default();
    for row in 0..rows {
        for col in 0..cols {
            if distances.iter().all(|r| r[(row, col)] >= r_min) {
                out.x.push(grid.x[(row, col)]);
                out.y.push(grid.y[(row, col)]);
                out.u.push(u[(row, col)]);
                out.v.push(v[(row, col)]);
            }
        }
    }
    out
}

/// Maps field magnitudes to `[0, 1]` on a logarithmic scale, ready for a
/// colormap lookup. Constant magnitudes all map to 0.
pub fn magnitude_scale(u: &[f64], v: &[f64]) -> Vec<f64> {
    let logs: Vec<f64> = u
        .iter()
        .zip(v)
        .map(|(u, v)| {
            let magnitude = u.hypot(*v);
            if magnitude == 0.0 {
                ZERO_MAGNITUDE_FLOOR.log10()
            } else {
                magnitude.log10()
            }
        })
        .collect();

    let min = logs.iter().copied().fold(f64::INFINITY, f64::min);
    let max = logs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    if range.is_nan() || range <= 0.0 {
        return vec![0.0; logs.len()];
    }
    logs.into_iter().map(|l| (l - min) / range).collect()
}

/// Unit-length arrows for a quiver plot; zero vectors stay zero.
pub fn unit_directions(u: &[f64], v: &[f64]) -> (Vec<f64>, Vec<f64>) {
    u.iter()
        .zip(v)
        .map(|(u, v)| {
            let magnitude = u.hypot(*v);
            let safe = if magnitude == 0.0 { 1.0 } else { magnitude };
            (u / safe, v / safe)
        })
        .unzip()
}

/// Everything a quiver plot of the configured charges needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSample {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub u: Vec<f64>,
    pub v: Vec<f64>,
    pub u_dir: Vec<f64>,
    pub v_dir: Vec<f64>,
    pub scale: Vec<f64>,
    pub colormap: String,
}

pub fn sample_field(config: &FieldConfig) -> Result<FieldSample, PhysicsError> {
    let charges = config.point_charges();
    let grid = FieldGrid::square(config.extent, config.grid_points)?;
    let (u, v) = net_field(&grid, &charges);
    let filtered = filter_points(&grid, &u, &v, &charges, config.r_min);
    debug!(
        charges = charges.len(),
        kept = filtered.len(),
        total = config.grid_points * config.grid_points,
        "sampled electric field"
    );

    let scale = magnitude_scale(&filtered.u, &filtered.v);
    let (u_dir, v_dir) = unit_directions(&filtered.u, &filtered.v);
    let FilteredField { x, y, u, v } = filtered;
    Ok(FieldSample {
        x,
        y,
        u,
        v,
        u_dir,
        v_dir,
        scale,
        colormap: config.colormap.clone(),
    })
}
