use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use crate::bootstrap::{load_config, plan_run, RunPlan};
use crate::cli::RunArgs;
use crate::paths::AppPaths;

pub fn run(args: RunArgs) -> Result<()> {
    let paths = AppPaths::discover()?;
    let (config, source) = load_config(&args, &paths)?;
    match &source {
        Some(path) => tracing::debug!(config = %path.display(), "loaded configuration"),
        None => tracing::debug!(
            searched = %paths.config_file().display(),
            "no configuration file; using defaults"
        ),
    }

    match plan_run(&args, config)? {
        RunPlan::Still(request) => {
            let path = renderer::export_still(&request).context("still export failed")?;
            println!("{}", path.display());
            Ok(())
        }
        RunPlan::Window(config) => renderer::run_window(config),
    }
}

pub fn initialise_tracing() {
    let default_filter = "warn,seascape=info,renderer=info,naga=error,wgpu=error,wgpu_core=error,wgpu_hal=error,winit=error";
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
