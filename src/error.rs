use std::fmt;

use thiserror::Error;

/// Grid axis a stencil runs along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FdError {
    /// A 3-point stencil needs at least 3 samples along the axis.
    #[error("grid has {len} samples along {axis}, at least 3 are required")]
    InvalidGrid { axis: Axis, len: usize },

    #[error("invalid parameter `{name}` = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },
}

impl FdError {
    pub(crate) fn non_positive(name: &'static str, value: f64) -> Self {
        Self::InvalidParameter {
            name,
            value,
            reason: "must be finite and positive",
        }
    }
}

pub type Result<T> = std::result::Result<T, FdError>;

pub(crate) fn check_len(axis: Axis, len: usize) -> Result<()> {
    if len < 3 {
        return Err(FdError::InvalidGrid { axis, len });
    }
    Ok(())
}

pub(crate) fn check_positive(name: &'static str, value: f64) -> Result<()> {
    if !(value.is_finite() && value > 0.0) {
        return Err(FdError::non_positive(name, value));
    }
    Ok(())
}
