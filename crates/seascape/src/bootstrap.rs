//! Resolves what to run: built-in defaults, then the config file, then CLI
//! flags, validated once more after the flags are applied.

use std::path::PathBuf;

use anyhow::{Context, Result};
use renderer::{GpuPowerPreference, RendererConfig, StillRequest};
use seaconfig::{OceanConfig, PowerSetting};
use seafield::SeaParams;

use crate::cli::{PowerArg, RunArgs};
use crate::paths::AppPaths;

const DEFAULT_SIZE: (u32, u32) = (1280, 720);

pub fn parse_surface_size(text: &str) -> Result<(u32, u32)> {
    let trimmed = text.trim();
    let (width, height) = trimmed
        .split_once(['x', 'X', '×'])
        .ok_or_else(|| anyhow::anyhow!("expected WxH format, e.g. 1280x720"))?;

    let width: u32 = width
        .trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("invalid width in surface size"))?;
    let height: u32 = height
        .trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("invalid height in surface size"))?;

    if width == 0 || height == 0 {
        anyhow::bail!("surface dimensions must be greater than zero");
    }

    Ok((width, height))
}

/// Loads `--config` if given, else the per-user file if it exists, else defaults.
pub fn load_config(args: &RunArgs, paths: &AppPaths) -> Result<(OceanConfig, Option<PathBuf>)> {
    if let Some(path) = &args.config {
        let config = OceanConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?;
        return Ok((config, Some(path.clone())));
    }

    let path = paths.config_file();
    if path.is_file() {
        let config = OceanConfig::load(&path)
            .with_context(|| format!("failed to load config {}", path.display()))?;
        return Ok((config, Some(path)));
    }

    Ok((OceanConfig::default(), None))
}

pub fn apply_overrides(config: &mut OceanConfig, args: &RunArgs) -> Result<()> {
    let sea = &mut config.sea;
    override_with(&mut sea.height, args.sea_height);
    override_with(&mut sea.choppy, args.sea_choppy);
    override_with(&mut sea.speed, args.sea_speed);
    override_with(&mut sea.freq, args.sea_freq);

    let march = &mut config.march;
    override_with(&mut march.steps, args.steps);
    override_with(&mut march.geometry_octaves, args.geometry_octaves);
    override_with(&mut march.fragment_octaves, args.fragment_octaves);

    override_with(&mut config.camera.speed, args.camera_speed);
    override_with(
        &mut config.camera.pointer_sensitivity,
        args.pointer_sensitivity,
    );

    if let Some(power) = args.power {
        config.window.power = match power {
            PowerArg::Low => PowerSetting::Low,
            PowerArg::High => PowerSetting::High,
        };
    }
    if let Some(size) = args.size.as_deref() {
        let (width, height) = parse_surface_size(size)?;
        config.window.width = Some(width);
        config.window.height = Some(height);
    }

    config
        .validate()
        .context("command-line overrides produced an invalid configuration")?;
    Ok(())
}

fn override_with<T: Copy>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

pub fn sea_params(config: &OceanConfig) -> SeaParams {
    SeaParams {
        step_budget: config.march.steps,
        geometry_octaves: config.march.geometry_octaves,
        fragment_octaves: config.march.fragment_octaves,
        sea_height: config.sea.height as f32,
        sea_choppy: config.sea.choppy as f32,
        sea_speed: config.sea.speed as f32,
        sea_freq: config.sea.freq as f32,
        camera_speed: config.camera.speed as f32,
        pointer_sensitivity: config.camera.pointer_sensitivity as f32,
    }
}

/// Fully resolved launch.
#[derive(Debug, Clone, PartialEq)]
pub enum RunPlan {
    Window(RendererConfig),
    Still(StillRequest),
}

pub fn plan_run(args: &RunArgs, mut config: OceanConfig) -> Result<RunPlan> {
    apply_overrides(&mut config, args)?;
    let params = sea_params(&config);
    let (width, height) = config.window_size().unwrap_or(DEFAULT_SIZE);

    if let Some(path) = &args.still_export {
        return Ok(RunPlan::Still(StillRequest {
            params,
            width,
            height,
            time: args.still_time.unwrap_or(0.0),
            path: path.clone(),
        }));
    }

    Ok(RunPlan::Window(RendererConfig {
        surface_size: (width, height),
        params,
        gpu_power: match config.window.power {
            PowerSetting::Low => GpuPowerPreference::Low,
            PowerSetting::High => GpuPowerPreference::High,
        },
        ..RendererConfig::default()
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_sizes() {
        assert_eq!(parse_surface_size("1280x720").unwrap(), (1280, 720));
        assert_eq!(parse_surface_size(" 640 X 480 ").unwrap(), (640, 480));
        assert!(parse_surface_size("0x10").is_err());
        assert!(parse_surface_size("wide").is_err());
    }

    #[test]
    fn defaults_become_a_window_plan() {
        let plan = plan_run(&RunArgs::default(), OceanConfig::default()).unwrap();
        let RunPlan::Window(config) = plan else {
            panic!("expected a window plan");
        };
        assert_eq!(config.surface_size, DEFAULT_SIZE);
        assert_eq!(config.params, SeaParams::default());
        assert_eq!(config.gpu_power, GpuPowerPreference::High);
    }

    #[test]
    fn flags_override_file_values() {
        let mut config = OceanConfig::from_toml_str(
            "version = 1\n[sea]\nheight = 0.9\nspeed = 0.5\n[window]\nwidth = 800\nheight = 600\n",
        )
        .unwrap();
        let args = RunArgs {
            sea_height: Some(0.1),
            steps: Some(8),
            power: Some(PowerArg::Low),
            ..RunArgs::default()
        };
        apply_overrides(&mut config, &args).unwrap();

        let params = sea_params(&config);
        assert_eq!(params.sea_height, 0.1);
        assert_eq!(params.sea_speed, 0.5);
        assert_eq!(params.step_budget, 8);
        assert_eq!(config.window_size(), Some((800, 600)));
        assert_eq!(config.window.power, PowerSetting::Low);
    }

    #[test]
    fn invalid_flag_is_rejected() {
        let args = RunArgs {
            fragment_octaves: Some(0),
            ..RunArgs::default()
        };
        assert!(plan_run(&args, OceanConfig::default()).is_err());
    }

    #[test]
    fn still_export_skips_the_window() {
        let args = RunArgs {
            size: Some("32x18".into()),
            still_export: Some(PathBuf::from("frame.png")),
            still_time: Some(7.5),
            ..RunArgs::default()
        };
        let plan = plan_run(&args, OceanConfig::default()).unwrap();
        let RunPlan::Still(request) = plan else {
            panic!("expected a still plan");
        };
        assert_eq!((request.width, request.height), (32, 18));
        assert_eq!(request.time, 7.5);
        assert_eq!(request.path, PathBuf::from("frame.png"));
    }
}
