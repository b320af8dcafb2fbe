use fdstep::d2::{ring, Diffusion, DiffusionParams, GridCoordinates};
use fdstep::Simulation;
use image_util::save_heatmap;
use tracing::info;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    const N_STEP: usize = 100;
    const LIMIT: f64 = 10.0;

    let params = DiffusionParams::default();

    info!("setting up initial condition");
    let coords = GridCoordinates::new(
        (-LIMIT, LIMIT + params.dx),
        (-LIMIT, LIMIT + params.dy),
        params.dx,
        params.dy,
    )?;
    let u0 = coords.field_from_fn(ring(4.0, 5.0, 1000.0))?;

    let sim = Simulation::new(Diffusion::new(params)?, N_STEP);
    info!(dt = sim.stepper().dt(), "solving");

    for (t, u) in sim.snapshots(u0)?.enumerate() {
        save_heatmap("diffusion_donut", t, &u)?;

        eprint!("\r {} / {}", t, N_STEP);
    }
    eprintln!();

    info!("done");

    Ok(())
}
