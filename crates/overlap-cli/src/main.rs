//! Overlap CLI - interactive box/sphere intersection editor

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{check, config, view};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "overlap")]
#[command(about = "Interactive editor for the intersection of a box and a sphere", long_about = None)]
#[command(version)]
struct Cli {
    /// Log level (error, warn, info, debug, trace). RUST_LOG refines it per module.
    #[arg(long, global = true, default_value = "info")]
    log_level: log::LevelFilter,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the editor window
    View {
        /// Path to an editor config file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Evaluate one layout without a window and print the result
    Check {
        /// Path to an editor config file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Sphere position (comma-separated x,y,z)
        #[arg(long, value_parser = parse_vec3)]
        sphere: Option<[f32; 3]>,

        /// Box position (comma-separated x,y,z)
        #[arg(long = "box", value_parser = parse_vec3)]
        box_position: Option<[f32; 3]>,

        /// Box scale (comma-separated x,y,z)
        #[arg(long, value_parser = parse_vec3)]
        box_scale: Option<[f32; 3]>,
    },

    /// Print the effective configuration as TOML
    Config {
        /// Path to an editor config file
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn parse_vec3(s: &str) -> Result<[f32; 3], String> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != 3 {
        return Err(format!("expected 3 comma-separated values, got {}", parts.len()));
    }
    let x: f32 = parts[0].trim().parse().map_err(|e| format!("invalid x: {}", e))?;
    let y: f32 = parts[1].trim().parse().map_err(|e| format!("invalid y: {}", e))?;
    let z: f32 = parts[2].trim().parse().map_err(|e| format!("invalid z: {}", e))?;
    Ok([x, y, z])
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level)
        .parse_default_env()
        .init();

    match cli.command {
        Commands::View { config } => view::run(config.as_deref()),
        Commands::Check {
            config,
            sphere,
            box_position,
            box_scale,
        } => check::run(check::CheckArgs {
            config,
            sphere,
            box_position,
            box_scale,
        }),
        Commands::Config { config } => config::run(config.as_deref()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec3_arguments_parse() {
        assert_eq!(parse_vec3("1, 2.5,-3"), Ok([1.0, 2.5, -3.0]));
        assert!(parse_vec3("1,2").is_err());
        assert!(parse_vec3("1,x,3").is_err());
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn check_accepts_positions() {
        let cli = Cli::try_parse_from([
            "overlap",
            "check",
            "--sphere",
            "0,0.5,0",
            "--box",
            "0.2,0.5,0",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(cli.log_level, log::LevelFilter::Debug);
        match cli.command {
            Commands::Check {
                sphere,
                box_position,
                ..
            } => {
                assert_eq!(sphere, Some([0.0, 0.5, 0.0]));
                assert_eq!(box_position, Some([0.2, 0.5, 0.0]));
            }
            _ => panic!("expected check"),
        }
    }
}
