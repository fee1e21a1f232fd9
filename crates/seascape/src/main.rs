//! Entry point: parses the command line, installs logging and either opens
//! the ocean window, writes a still frame, or answers `seascape defaults`.

mod bootstrap;
mod cli;
mod paths;
mod run;

use anyhow::{Context, Result};
use cli::{Command, DefaultsAction};
use paths::AppPaths;
use seaconfig::OceanConfig;

fn main() -> Result<()> {
    let cli = cli::parse();
    run::initialise_tracing();

    match cli.command {
        Some(Command::Defaults(defaults_cmd)) => handle_defaults_command(defaults_cmd.action),
        None => run::run(cli.run),
    }
}

fn handle_defaults_command(action: DefaultsAction) -> Result<()> {
    match action {
        DefaultsAction::Print => {
            let text = OceanConfig::default()
                .to_toml_string()
                .context("failed to serialise default configuration")?;
            print!("{text}");
            Ok(())
        }
        DefaultsAction::Where => {
            let paths = AppPaths::discover()?;
            let file = paths.config_file();
            println!("Configuration:");
            println!("  directory:  {}", paths.config_dir().display());
            println!(
                "  file:       {}{}",
                file.display(),
                if file.is_file() { "" } else { " (not present)" }
            );
            Ok(())
        }
    }
}
