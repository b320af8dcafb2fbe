//! Explicit finite-difference time stepping on regular grids.
//!
//! [`d1`] advances a 1-D linear convection-diffusion equation with an upwind
//! advection term, [`d2`] advances the 2-D isotropic diffusion equation with a
//! time step derived from its stability bound. [`Simulation`] chains steps into
//! a time-ordered sequence of snapshots.

pub mod d1;
pub mod d2;
mod error;
pub mod simulation;

pub use error::{Axis, FdError, Result};
pub use simulation::{Simulation, Snapshots, Stepper};
