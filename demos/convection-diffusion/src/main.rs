use std::f64::consts::PI;

use fdstep::d1::{ConvectionDiffusion, ConvectionDiffusionParams, GridField1D};
use fdstep::Simulation;
use image_util::save_line_plot;
use tracing::info;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    const N_STEP: usize = 200;

    let params = ConvectionDiffusionParams::default();

    info!("setting up initial condition");
    let n0 = GridField1D::from_fn(0.0, PI, params.dx, f64::sin)?;

    let sim = Simulation::new(ConvectionDiffusion::new(params)?, N_STEP);
    info!(
        cfl = sim.stepper().cfl_number(),
        diffusion_number = sim.stepper().diffusion_number(),
        "solving"
    );
    let history = sim.run(n0)?;

    info!(frames = history.len(), "rendering");
    for (t, n) in history.iter().enumerate() {
        save_line_plot("convection_diffusion", t, n)?;

        eprint!("\r {} / {}", t, N_STEP);
    }
    eprintln!();

    info!("done");

    Ok(())
}
