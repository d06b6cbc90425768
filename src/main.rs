use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use speedup_chart::chart::{speedup_chart, DEFAULT_SIZE};
use speedup_chart::data::speedup_table;
use speedup_chart::render::render_speedup;
use speedup_chart::table::print_table;
use speedup_chart::{FileRenderer, Renderer, Table, ViewerRenderer};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "speedup-chart")]
#[command(about = "Line chart of solver speedup across uf20 instances and program versions")]
struct Cli {
    /// Load the table from a JSON file instead of the built-in measurements
    #[arg(short, long, global = true)]
    data: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the chart and wait until it is dismissed (default)
    Show {
        /// Viewer command; the chart path is appended as the last argument
        #[arg(long, env = "SPEEDUP_VIEWER")]
        viewer: Option<String>,
    },

    /// Write the chart to an SVG or PNG file
    Render {
        /// Output file; the extension picks the format
        #[arg(short, long, default_value = "./output/speedup.svg")]
        output: PathBuf,

        /// Canvas width in pixels
        #[arg(long, default_value_t = DEFAULT_SIZE.0)]
        width: u32,

        /// Canvas height in pixels
        #[arg(long, default_value_t = DEFAULT_SIZE.1)]
        height: u32,
    },

    /// Write the table as JSON, in the format --data reads
    Export {
        /// Output file
        #[arg(short, long, default_value = "./output/speedup.json")]
        output: PathBuf,
    },

    /// Print the table to the console
    Print,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let table = load_table(cli.data.as_deref())?;

    match cli.command.unwrap_or(Commands::Show { viewer: None }) {
        Commands::Show { viewer } => {
            let viewer = viewer.or_else(|| std::env::var("SPEEDUP_VIEWER").ok());
            render_speedup(&table, &mut ViewerRenderer::new(viewer))?;
        }
        Commands::Render {
            output,
            width,
            height,
        } => {
            let chart = speedup_chart(&table).with_size(width, height);
            FileRenderer::new(output).show(&chart)?;
        }
        Commands::Export { output } => {
            export_table(&table, &output)?;
        }
        Commands::Print => {
            print_table(&table);
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn load_table(path: Option<&Path>) -> Result<Table> {
    let Some(path) = path else {
        return Ok(speedup_table());
    };

    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let table: Table = serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse table from {}", path.display()))?;

    let (rows, cols) = table.shape();
    log::info!("loaded {}x{} table from {}", rows, cols, path.display());
    Ok(table)
}

fn export_table(table: &Table, output: &Path) -> Result<()> {
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).context("Failed to create output directory")?;
    }

    let json = serde_json::to_string_pretty(table)?;
    std::fs::write(output, json).context("Failed to write table")?;
    println!("Generated: {}", output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_arguments_means_show_quietly() {
        let cli = Cli::try_parse_from(["speedup-chart"]).unwrap();
        assert!(!cli.verbose);
        assert!(cli.data.is_none());
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_verbose_flag_is_global() {
        let cli = Cli::try_parse_from(["speedup-chart", "print", "-v"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Some(Commands::Print)));
    }

    #[test]
    fn test_render_defaults() {
        let cli = Cli::try_parse_from(["speedup-chart", "render"]).unwrap();
        match cli.command {
            Some(Commands::Render {
                output,
                width,
                height,
            }) => {
                assert_eq!(output, PathBuf::from("./output/speedup.svg"));
                assert_eq!((width, height), DEFAULT_SIZE);
            }
            _ => panic!("expected render subcommand"),
        }
    }
}
