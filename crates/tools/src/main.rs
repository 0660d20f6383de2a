use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use draw::{DrawConfig, ShapeKind};
use foundation::math::Vec2;
use layers::StyleOptions;
use tools::{Script, parse_coord, replay, simulate};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "sdraw", about = "Drive the map drawing engine without a map")]
struct Cli {
    /// JSON draw config; defaults to $SDRAW_CONFIG, then built-in defaults.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Draw one shape from scripted clicks and print its record.
    Simulate {
        #[arg(long)]
        kind: ShapeKind,
        /// Click position as x,y; repeat for more vertices.
        #[arg(long = "click", value_parser = parse_coord)]
        clicks: Vec<Vec2>,
        #[arg(long, value_parser = parse_coord)]
        double_click: Option<Vec2>,
        /// Finish with the vertices placed so far.
        #[arg(long)]
        finish: bool,
        #[arg(long)]
        text: Option<String>,
        #[arg(long)]
        color: Option<String>,
        #[arg(long)]
        icon: Option<String>,
    },
    /// Replay a JSON array of stored records and print the resulting surface.
    Replay { records: PathBuf },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = real_main(Cli::parse()) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main(cli: Cli) -> Result<(), String> {
    let config = match &cli.config {
        Some(path) => DrawConfig::from_path(path),
        None => DrawConfig::from_env(),
    }
    .map_err(|e| e.to_string())?;

    let out = match cli.command {
        Command::Simulate {
            kind,
            clicks,
            double_click,
            finish,
            text,
            color,
            icon,
        } => {
            let options = (text.is_some() || color.is_some() || icon.is_some()).then(|| {
                StyleOptions {
                    src: icon,
                    anchor: None,
                    text,
                    color,
                }
            });
            let script = Script {
                clicks,
                double_click,
                finish,
            };
            simulate(&config, kind, options, &script)?
        }
        Command::Replay { records } => {
            let json =
                fs::read_to_string(&records).map_err(|e| format!("read {records:?}: {e}"))?;
            replay(&config, &json)?
        }
    };

    let pretty = serde_json::to_string_pretty(&out).map_err(|e| format!("json: {e}"))?;
    println!("{pretty}");
    Ok(())
}
