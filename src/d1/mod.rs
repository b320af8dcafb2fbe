//! 1-D linear convection-diffusion, `n_t + c n_x = k n_xx`.

use ndarray::{s, Array, Array1, Zip};

use crate::error::{check_len, check_positive};
use crate::{Axis, FdError, Result, Stepper};

/// Snapshot of a scalar field sampled at `x_i = x0 + i * dx`.
#[derive(Debug, Clone, PartialEq)]
pub struct GridField1D {
    values: Array1<f64>,
    x0: f64,
    dx: f64,
}

impl GridField1D {
    pub fn new(values: Array1<f64>, x0: f64, dx: f64) -> Result<Self> {
        check_positive("dx", dx)?;
        check_len(Axis::X, values.len())?;
        Ok(Self { values, x0, dx })
    }

    /// Samples `f` on the half-open interval `[start, end)` with step `dx`.
    pub fn from_fn<F>(start: f64, end: f64, dx: f64, f: F) -> Result<Self>
    where
        F: Fn(f64) -> f64,
    {
        check_positive("dx", dx)?;
        let x = Array1::range(start, end, dx);
        Self::new(x.mapv(f), start, dx)
    }

    pub fn values(&self) -> &Array1<f64> {
        &self.values
    }

    pub fn into_values(self) -> Array1<f64> {
        self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn x0(&self) -> f64 {
        self.x0
    }

    pub fn dx(&self) -> f64 {
        self.dx
    }

    /// Sample positions, one per value.
    pub fn coordinates(&self) -> Array1<f64> {
        Array::from_shape_fn(self.len(), |i| self.x0 + i as f64 * self.dx)
    }
}

fn upwind(n: &Array1<f64>, dx: f64) -> Array1<f64> {
    Array::from_shape_fn(n.len() - 2, |k| (n[k + 1] - n[k]) / dx)
}

fn centered(n: &Array1<f64>, dx: f64) -> Array1<f64> {
    Array::from_shape_fn(n.len() - 2, |k| {
        (n[k + 2] - 2.0 * n[k + 1] + n[k]) / (dx * dx)
    })
}

/// Backward difference `(n[i] - n[i-1]) / dx` at every interior index.
///
/// Element `k` of the result belongs to interior index `k + 1`. First-order
/// accurate; used for the advection term to avoid the oscillations of a
/// centered difference.
pub fn first_derivative_upwind(n: &Array1<f64>, dx: f64) -> Result<Array1<f64>> {
    check_len(Axis::X, n.len())?;
    Ok(upwind(n, dx))
}

/// Three-point `(n[i+1] - 2 n[i] + n[i-1]) / dx²` at every interior index.
pub fn second_derivative_centered(n: &Array1<f64>, dx: f64) -> Result<Array1<f64>> {
    check_len(Axis::X, n.len())?;
    Ok(centered(n, dx))
}

/// Zero-gradient edges: each end copies its inward neighbour.
pub fn apply_zero_gradient(n: &mut Array1<f64>) {
    let len = n.len();
    assert!(len >= 2);

    n[0] = n[1];
    n[len - 1] = n[len - 2];
}

/// Coefficients of a convection-diffusion run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConvectionDiffusionParams {
    /// Advection speed.
    pub c: f64,
    /// Diffusivity.
    pub k: f64,
    pub dt: f64,
    pub dx: f64,
}

impl Default for ConvectionDiffusionParams {
    fn default() -> Self {
        Self {
            c: -1.0,
            k: 0.0,
            dt: 0.01,
            dx: 0.1,
        }
    }
}

/// Explicit upwind stepper for 1-D convection-diffusion.
///
/// `dt` is taken as given. Nothing checks it against the CFL condition or
/// the diffusion-number bound; an unstable choice grows without limit and is
/// the caller's to avoid. [`ConvectionDiffusion::cfl_number`] and
/// [`ConvectionDiffusion::diffusion_number`] are there to inspect it.
#[derive(Debug, Clone)]
pub struct ConvectionDiffusion {
    params: ConvectionDiffusionParams,
}

impl ConvectionDiffusion {
    pub fn new(params: ConvectionDiffusionParams) -> Result<Self> {
        check_positive("dx", params.dx)?;

        tracing::debug!(
            c = params.c,
            k = params.k,
            dt = params.dt,
            dx = params.dx,
            "convection-diffusion stepper"
        );

        Ok(Self { params })
    }

    pub fn params(&self) -> &ConvectionDiffusionParams {
        &self.params
    }

    /// `|c| dt / dx`
    pub fn cfl_number(&self) -> f64 {
        self.params.c.abs() * self.params.dt / self.params.dx
    }

    /// `k dt / dx²`
    pub fn diffusion_number(&self) -> f64 {
        self.params.k * self.params.dt / (self.params.dx * self.params.dx)
    }
}

pub(crate) fn same_spacing(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-12 * a.abs().max(b.abs())
}

impl Stepper for ConvectionDiffusion {
    type Field = GridField1D;

    fn check(&self, field: &GridField1D) -> Result<()> {
        check_len(Axis::X, field.len())?;
        if !same_spacing(field.dx, self.params.dx) {
            return Err(FdError::InvalidParameter {
                name: "dx",
                value: field.dx,
                reason: "field spacing differs from stepper spacing",
            });
        }
        Ok(())
    }

    fn advance(&self, field: &GridField1D) -> GridField1D {
        let ConvectionDiffusionParams { c, k, dt, dx } = self.params;
        let n = &field.values;

        let dndx = upwind(n, dx);
        let d2ndx2 = centered(n, dx);

        let mut next = n.clone();
        Zip::from(next.slice_mut(s![1..-1]))
            .and(&dndx)
            .and(&d2ndx2)
            .for_each(|v, &a, &b| {
                *v += dt * (-c * a + k * b);
            });
        apply_zero_gradient(&mut next);

        GridField1D {
            values: next,
            x0: field.x0,
            dx: field.dx,
        }
    }
}
