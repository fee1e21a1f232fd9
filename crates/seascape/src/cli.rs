use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "seascape",
    author,
    version,
    about = "Procedural ocean rendered in real time on the GPU"
)]
pub struct Cli {
    #[command(flatten)]
    pub run: RunArgs,
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Parser, Debug, Default)]
pub struct RunArgs {
    /// Configuration file to load instead of the per-user one.
    #[arg(long, value_name = "FILE", env = "SEASCAPE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Window or still size (e.g. `1280x720`).
    #[arg(long, value_name = "WIDTHxHEIGHT")]
    pub size: Option<String>,

    /// Maximum false-position iterations per pixel.
    #[arg(long, value_name = "N")]
    pub steps: Option<u32>,

    /// Wave octaves evaluated while searching for the surface.
    #[arg(long, value_name = "N")]
    pub geometry_octaves: Option<u32>,

    /// Wave octaves evaluated for normals and colour.
    #[arg(long, value_name = "N")]
    pub fragment_octaves: Option<u32>,

    /// Amplitude of the first wave octave.
    #[arg(long, value_name = "F")]
    pub sea_height: Option<f64>,

    /// Ridge sharpness of the first wave octave.
    #[arg(long, value_name = "F")]
    pub sea_choppy: Option<f64>,

    /// Drift rate of the waves.
    #[arg(long, value_name = "F")]
    pub sea_speed: Option<f64>,

    /// Spatial frequency of the first wave octave.
    #[arg(long, value_name = "F")]
    pub sea_freq: Option<f64>,

    /// Forward speed of the camera.
    #[arg(long, value_name = "F")]
    pub camera_speed: Option<f64>,

    /// How strongly horizontal pointer motion shifts the camera path.
    #[arg(long, value_name = "F")]
    pub pointer_sensitivity: Option<f64>,

    /// GPU adapter preference.
    #[arg(long, value_enum, value_name = "MODE")]
    pub power: Option<PowerArg>,

    /// Render one frame on the CPU to the given PNG path and exit.
    #[arg(long, value_name = "PATH")]
    pub still_export: Option<PathBuf>,

    /// Timestamp in seconds for `--still-export`.
    #[arg(long, value_name = "SECONDS", requires = "still_export")]
    pub still_time: Option<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PowerArg {
    Low,
    High,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Inspect built-in defaults and configuration paths.
    Defaults(DefaultsCommand),
}

#[derive(Parser, Debug)]
pub struct DefaultsCommand {
    #[command(subcommand)]
    pub action: DefaultsAction,
}

#[derive(Subcommand, Debug)]
pub enum DefaultsAction {
    /// Print the default configuration as TOML.
    Print,
    /// Print where the configuration file is looked up.
    Where,
}

pub fn parse() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_overrides() {
        let cli = Cli::try_parse_from([
            "seascape",
            "--steps",
            "12",
            "--sea-choppy",
            "3.5",
            "--power",
            "low",
            "--still-export",
            "out.png",
            "--still-time",
            "4",
        ])
        .unwrap();
        assert_eq!(cli.run.steps, Some(12));
        assert_eq!(cli.run.sea_choppy, Some(3.5));
        assert_eq!(cli.run.power, Some(PowerArg::Low));
        assert_eq!(cli.run.still_export, Some(PathBuf::from("out.png")));
        assert_eq!(cli.run.still_time, Some(4.0));
        assert!(cli.command.is_none());
    }

    #[test]
    fn still_time_requires_export() {
        assert!(Cli::try_parse_from(["seascape", "--still-time", "2"]).is_err());
    }

    #[test]
    fn parses_defaults_subcommand() {
        let cli = Cli::try_parse_from(["seascape", "defaults", "print"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::Defaults(DefaultsCommand {
                action: DefaultsAction::Print
            }))
        ));
    }
}
