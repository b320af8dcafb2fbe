//! 2-D isotropic diffusion, `u_t = d (u_xx + u_yy)`, with zero edges.
//!
//! Arrays are laid out row-major with rows along `y` and columns along `x`,
//! so `u[[j, i]]` is the value at `(x_i, y_j)`.

use ndarray::{s, Array, Array1, Array2, Zip};

use crate::d1::same_spacing;
use crate::error::{check_len, check_positive};
use crate::{Axis, FdError, Result, Stepper};

/// Snapshot of a scalar field on a rectangular grid.
#[derive(Debug, Clone, PartialEq)]
pub struct GridField2D {
    values: Array2<f64>,
    origin: (f64, f64),
    dx: f64,
    dy: f64,
}

impl GridField2D {
    pub fn new(values: Array2<f64>, origin: (f64, f64), dx: f64, dy: f64) -> Result<Self> {
        check_positive("dx", dx)?;
        check_positive("dy", dy)?;

        let (rows, cols) = values.dim();
        check_len(Axis::Y, rows)?;
        check_len(Axis::X, cols)?;

        Ok(Self {
            values,
            origin,
            dx,
            dy,
        })
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    pub fn into_values(self) -> Array2<f64> {
        self.values
    }

    /// `(rows, cols)`, i.e. `(ny, nx)`.
    pub fn dim(&self) -> (usize, usize) {
        self.values.dim()
    }

    pub fn origin(&self) -> (f64, f64) {
        self.origin
    }

    pub fn dx(&self) -> f64 {
        self.dx
    }

    pub fn dy(&self) -> f64 {
        self.dy
    }

    pub fn max(&self) -> f64 {
        self.values.iter().cloned().fold(f64::NEG_INFINITY, f64::max)
    }

    pub fn min(&self) -> f64 {
        self.values.iter().cloned().fold(f64::INFINITY, f64::min)
    }

    pub fn coordinates(&self) -> GridCoordinates {
        let (rows, cols) = self.dim();
        let (x0, y0) = self.origin;

        GridCoordinates {
            x: Array::from_shape_fn(cols, |i| x0 + i as f64 * self.dx),
            y: Array::from_shape_fn(rows, |j| y0 + j as f64 * self.dy),
            dx: self.dx,
            dy: self.dy,
        }
    }
}

/// Coordinate axes of a 2-D grid.
#[derive(Debug, Clone, PartialEq)]
pub struct GridCoordinates {
    x: Array1<f64>,
    y: Array1<f64>,
    dx: f64,
    dy: f64,
}

impl GridCoordinates {
    /// Half-open axes `[x_lim.0, x_lim.1)` and `[y_lim.0, y_lim.1)`.
    pub fn new(x_lim: (f64, f64), y_lim: (f64, f64), dx: f64, dy: f64) -> Result<Self> {
        check_positive("dx", dx)?;
        check_positive("dy", dy)?;

        Ok(Self {
            x: Array1::range(x_lim.0, x_lim.1, dx),
            y: Array1::range(y_lim.0, y_lim.1, dy),
            dx,
            dy,
        })
    }

    pub fn x(&self) -> &Array1<f64> {
        &self.x
    }

    pub fn y(&self) -> &Array1<f64> {
        &self.y
    }

    /// `(ny, nx)`
    pub fn dim(&self) -> (usize, usize) {
        (self.y.len(), self.x.len())
    }

    /// Samples `f(x, y)` at every grid point.
    pub fn field_from_fn<F>(&self, f: F) -> Result<GridField2D>
    where
        F: Fn(f64, f64) -> f64,
    {
        let values = Array::from_shape_fn(self.dim(), |(j, i)| f(self.x[i], self.y[j]));
        let origin = (
            self.x.first().copied().unwrap_or(0.0),
            self.y.first().copied().unwrap_or(0.0),
        );
        GridField2D::new(values, origin, self.dx, self.dy)
    }
}

/// `value` inside the open annulus `inner < r < outer` around the origin,
/// zero elsewhere.
pub fn ring(inner: f64, outer: f64, value: f64) -> impl Fn(f64, f64) -> f64 {
    move |x, y| {
        let r = x.hypot(y);
        if inner < r && r < outer {
            value
        } else {
            0.0
        }
    }
}

fn centered(u: &Array2<f64>, dx: f64, dy: f64) -> (Array2<f64>, Array2<f64>) {
    let (rows, cols) = u.dim();
    let interior = (rows - 2, cols - 2);

    let d2x = Array::from_shape_fn(interior, |(j, i)| {
        (u[[j + 1, i + 2]] - 2.0 * u[[j + 1, i + 1]] + u[[j + 1, i]]) / (dx * dx)
    });
    let d2y = Array::from_shape_fn(interior, |(j, i)| {
        (u[[j + 2, i + 1]] - 2.0 * u[[j + 1, i + 1]] + u[[j, i + 1]]) / (dy * dy)
    });

    (d2x, d2y)
}

/// Three-point second derivatives along `x` and `y` over the interior.
///
/// Both arrays have shape `(rows - 2, cols - 2)`; element `[[j, i]]` belongs
/// to grid cell `[[j + 1, i + 1]]`.
pub fn second_derivative_centered(
    u: &Array2<f64>,
    dx: f64,
    dy: f64,
) -> Result<(Array2<f64>, Array2<f64>)> {
    let (rows, cols) = u.dim();
    check_len(Axis::Y, rows)?;
    check_len(Axis::X, cols)?;

    Ok(centered(u, dx, dy))
}

/// Sets the outermost rows and columns to zero.
pub fn apply_dirichlet_zero(u: &mut Array2<f64>) {
    let (rows, cols) = u.dim();
    if rows == 0 || cols == 0 {
        return;
    }

    u.row_mut(0).fill(0.0);
    u.row_mut(rows - 1).fill(0.0);
    u.column_mut(0).fill(0.0);
    u.column_mut(cols - 1).fill(0.0);
}

/// Largest explicit time step for which the 5-point scheme stays stable,
/// `(dx dy)² / (2 d (dx² + dy²))`.
pub fn stable_dt(d: f64, dx: f64, dy: f64) -> f64 {
    (dx * dy).powi(2) / (2.0 * d * (dx * dx + dy * dy))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiffusionParams {
    /// Diffusivity.
    pub d: f64,
    pub dx: f64,
    pub dy: f64,
}

impl Default for DiffusionParams {
    fn default() -> Self {
        Self {
            d: 4.0,
            dx: 0.1,
            dy: 0.1,
        }
    }
}

/// Explicit stepper for 2-D diffusion. The time step is [`stable_dt`].
#[derive(Debug, Clone)]
pub struct Diffusion {
    params: DiffusionParams,
    dt: f64,
}

impl Diffusion {
    pub fn new(params: DiffusionParams) -> Result<Self> {
        check_positive("dx", params.dx)?;
        check_positive("dy", params.dy)?;
        check_positive("d", params.d)?;

        let dt = stable_dt(params.d, params.dx, params.dy);
        if !(dt.is_finite() && dt > 0.0) {
            return Err(FdError::InvalidParameter {
                name: "dt",
                value: dt,
                reason: "derived time step is not finite and positive",
            });
        }

        let stepper = Self { params, dt };
        tracing::debug!(
            d = params.d,
            dx = params.dx,
            dy = params.dy,
            dt,
            diffusion_number = stepper.diffusion_number(),
            "diffusion stepper"
        );

        Ok(stepper)
    }

    pub fn params(&self) -> &DiffusionParams {
        &self.params
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// `d dt (1/dx² + 1/dy²)`; one half by construction.
    pub fn diffusion_number(&self) -> f64 {
        let DiffusionParams { d, dx, dy } = self.params;
        d * self.dt * (1.0 / (dx * dx) + 1.0 / (dy * dy))
    }
}

impl Stepper for Diffusion {
    type Field = GridField2D;

    fn check(&self, field: &GridField2D) -> Result<()> {
        let (rows, cols) = field.dim();
        check_len(Axis::Y, rows)?;
        check_len(Axis::X, cols)?;

        for &(name, have, want) in &[
            ("dx", field.dx, self.params.dx),
            ("dy", field.dy, self.params.dy),
        ] {
            if !same_spacing(have, want) {
                return Err(FdError::InvalidParameter {
                    name,
                    value: have,
                    reason: "field spacing differs from stepper spacing",
                });
            }
        }
        Ok(())
    }

    fn advance(&self, field: &GridField2D) -> GridField2D {
        let DiffusionParams { d, dx, dy } = self.params;
        let coeff = d * self.dt;

        let (d2x, d2y) = centered(&field.values, dx, dy);

        let mut next = field.values.clone();
        Zip::from(next.slice_mut(s![1..-1, 1..-1]))
            .and(&d2x)
            .and(&d2y)
            .for_each(|v, &a, &b| {
                *v += coeff * (a + b);
            });
        apply_dirichlet_zero(&mut next);

        GridField2D {
            values: next,
            origin: field.origin,
            dx: field.dx,
            dy: field.dy,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn test_constant_field_derivatives() {
        let u = Array2::from_elem((4, 6), -2.0);
        let (d2x, d2y) = second_derivative_centered(&u, 0.1, 0.3).unwrap();

        assert_eq!(d2x.dim(), (2, 4));
        assert_eq!(d2y.dim(), (2, 4));
        for d in d2x.iter().chain(d2y.iter()) {
            assert_abs_diff_eq!(*d, 0.0);
        }
    }

    #[test]
    fn test_axes_are_independent() {
        // u = x² varies along columns only.
        let u = array![
            [0.0, 1.0, 4.0, 9.0],
            [0.0, 1.0, 4.0, 9.0],
            [0.0, 1.0, 4.0, 9.0],
        ];
        let (d2x, d2y) = second_derivative_centered(&u, 1.0, 1.0).unwrap();

        assert_eq!(d2x, array![[2.0, 2.0]]);
        assert_eq!(d2y, array![[0.0, 0.0]]);
    }

    #[test]
    fn test_short_grid() {
        let narrow = Array2::zeros((5, 2));
        assert_eq!(
            second_derivative_centered(&narrow, 0.1, 0.1),
            Err(FdError::InvalidGrid {
                axis: Axis::X,
                len: 2
            })
        );

        let flat = Array2::zeros((2, 5));
        assert_eq!(
            second_derivative_centered(&flat, 0.1, 0.1),
            Err(FdError::InvalidGrid {
                axis: Axis::Y,
                len: 2
            })
        );
        assert!(GridField2D::new(flat, (0.0, 0.0), 0.1, 0.1).is_err());
    }

    #[test]
    fn test_invalid_params() {
        for params in &[
            DiffusionParams {
                d: 0.0,
                ..Default::default()
            },
            DiffusionParams {
                d: -1.0,
                ..Default::default()
            },
            DiffusionParams {
                dx: 0.0,
                ..Default::default()
            },
            DiffusionParams {
                dy: f64::INFINITY,
                ..Default::default()
            },
        ] {
            assert!(matches!(
                Diffusion::new(*params),
                Err(FdError::InvalidParameter { .. })
            ));
        }
    }

    #[test]
    fn test_stability_bound() {
        for &d in &[0.01, 1.0, 4.0, 250.0] {
            for &dx in &[0.001, 0.1, 1.0, 7.5] {
                for &dy in &[0.002, 0.1, 3.0] {
                    let stepper = Diffusion::new(DiffusionParams { d, dx, dy }).unwrap();
                    let number = d * stepper.dt() * (1.0 / (dx * dx) + 1.0 / (dy * dy));

                    assert!(number <= 0.5 + 1e-12);
                    assert_abs_diff_eq!(stepper.diffusion_number(), 0.5, epsilon = 1e-9);
                }
            }
        }
    }

    #[test]
    fn test_default_dt() {
        let stepper = Diffusion::new(DiffusionParams::default()).unwrap();
        assert_abs_diff_eq!(stepper.dt(), 0.000625, epsilon = 1e-15);
    }

    #[test]
    fn test_dirichlet_zero() {
        let mut u = Array2::from_elem((3, 4), 1.0);
        apply_dirichlet_zero(&mut u);
        assert_eq!(
            u,
            array![[0.0, 0.0, 0.0, 0.0], [0.0, 1.0, 1.0, 0.0], [0.0, 0.0, 0.0, 0.0]]
        );
    }

    #[test]
    fn test_single_spike() {
        let stepper = Diffusion::new(DiffusionParams {
            d: 1.0,
            dx: 1.0,
            dy: 1.0,
        })
        .unwrap();
        let mut u = Array2::zeros((5, 5));
        u[[2, 2]] = 4.0;
        let field = GridField2D::new(u, (0.0, 0.0), 1.0, 1.0).unwrap();

        let next = stepper.step(&field).unwrap();
        let v = next.values();

        // dt = 1/4, so the centre hands all of its value to its neighbours.
        assert_abs_diff_eq!(v[[2, 2]], 0.0);
        assert_abs_diff_eq!(v[[1, 2]], 1.0);
        assert_abs_diff_eq!(v[[3, 2]], 1.0);
        assert_abs_diff_eq!(v[[2, 1]], 1.0);
        assert_abs_diff_eq!(v[[2, 3]], 1.0);
        assert_abs_diff_eq!(v[[1, 1]], 0.0);
        assert_eq!(field.values()[[2, 2]], 4.0);
    }

    #[test]
    fn test_boundary_is_zeroed() {
        let stepper = Diffusion::new(DiffusionParams {
            d: 0.5,
            dx: 0.2,
            dy: 0.1,
        })
        .unwrap();
        let field =
            GridField2D::new(Array2::from_elem((6, 7), 3.0), (0.0, 0.0), 0.2, 0.1).unwrap();

        let next = stepper.step(&field).unwrap();
        let v = next.values();

        for i in 0..7 {
            assert_eq!(v[[0, i]], 0.0);
            assert_eq!(v[[5, i]], 0.0);
        }
        for j in 0..6 {
            assert_eq!(v[[j, 0]], 0.0);
            assert_eq!(v[[j, 6]], 0.0);
        }
    }

    #[test]
    fn test_zero_field_is_fixed_point() {
        let stepper = Diffusion::new(DiffusionParams::default()).unwrap();
        let field = GridField2D::new(Array2::zeros((8, 9)), (-1.0, -1.0), 0.1, 0.1).unwrap();

        assert_eq!(stepper.step(&field).unwrap(), field);
    }

    #[test]
    fn test_spacing_mismatch() {
        let stepper = Diffusion::new(DiffusionParams::default()).unwrap();
        let field = GridField2D::new(Array2::zeros((4, 4)), (0.0, 0.0), 0.1, 0.5).unwrap();

        assert!(matches!(
            stepper.step(&field),
            Err(FdError::InvalidParameter { name: "dy", .. })
        ));
    }

    #[test]
    fn test_coordinates() {
        let coords = GridCoordinates::new((-1.0, 1.0), (0.0, 0.75), 0.5, 0.25).unwrap();
        assert_eq!(coords.dim(), (3, 4));

        let field = coords.field_from_fn(|x, y| x + 10.0 * y).unwrap();
        assert_eq!(field.origin(), (-1.0, 0.0));
        assert_abs_diff_eq!(field.values()[[1, 3]], 0.5 + 2.5);
        assert_eq!(field.coordinates(), coords);

        let short = GridCoordinates::new((-1.0, 1.0), (0.0, 0.5), 0.5, 0.25).unwrap();
        assert!(short.field_from_fn(|x, _| x).is_err());
    }

    #[test]
    fn test_ring() {
        let f = ring(4.0, 5.0, 1000.0);

        assert_eq!(f(4.5, 0.0), 1000.0);
        assert_eq!(f(0.0, -4.9), 1000.0);
        assert_eq!(f(3.0, 0.0), 0.0);
        assert_eq!(f(5.0, 0.0), 0.0);
        assert_eq!(f(4.0, 0.0), 0.0);
    }
}
