//! labelmap-colors binary entrypoint wiring logging, configuration, and the command line.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use labelmap_colors::{
    ColormapService, ColorsConfig,
    config::resolve_config_path,
    output::csv::{read_colormap_csv, read_label_table},
};

#[derive(Parser)]
#[command(name = "labelmap-colors")]
#[command(about = "Distinguishable, group-aware colormaps for labeled surfaces and volumes")]
struct Cli {
    /// JSON configuration file (defaults to $LABELMAP_COLORS_CONFIG_PATH or config/colors.json)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log per-step detail
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Select maximally distinguishable colors and save them as CSV
    Distinguish {
        /// Number of colors to select
        #[arg(short, long)]
        ncolors: Option<usize>,

        /// Output directory
        #[arg(short, long)]
        out_dir: Option<PathBuf>,
    },
    /// Extract which labels touch in a .vtk surface or .nii/.nii.gz volume
    Adjacency {
        /// Labeled surface or volume
        label_file: PathBuf,

        /// Output directory
        #[arg(short, long)]
        out_dir: Option<PathBuf>,
    },
    /// Reassign a colormap so label groups share similar colors
    Group {
        /// Colormap CSV, one r,g,b row per label
        #[arg(long)]
        colormap: PathBuf,

        /// Label table CSV: ID, optional name and group columns, adjacency columns
        #[arg(long)]
        labels: PathBuf,

        /// Output directory
        #[arg(short, long)]
        out_dir: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(resolve_config_path);
    let mut config = ColorsConfig::load_from(&config_path)
        .with_context(|| format!("loading configuration from {}", config_path.display()))?;
    config.verbose |= cli.verbose;
    init_tracing(config.verbose);
    info!(path = %config_path.display(), metric = ?config.metric, "configuration resolved");

    match cli.command {
        Commands::Distinguish { ncolors, out_dir } => {
            if let Some(n) = ncolors {
                config.ncolors = n;
            }
            apply_out_dir(&mut config, out_dir);
            let colors = ColormapService::new(config)
                .distinguishable_colors()
                .context("selecting distinguishable colors")?;
            info!(count = colors.len(), "done");
        }
        Commands::Adjacency {
            label_file,
            out_dir,
        } => {
            apply_out_dir(&mut config, out_dir);
            let adjacency = ColormapService::new(config)
                .label_adjacency(&label_file)
                .with_context(|| format!("extracting adjacency from {}", label_file.display()))?;
            info!(labels = adjacency.labels.len(), "done");
        }
        Commands::Group {
            colormap,
            labels,
            out_dir,
        } => {
            apply_out_dir(&mut config, out_dir);
            let colors = read_colormap_csv(&colormap)
                .with_context(|| format!("reading colormap {}", colormap.display()))?;
            let (records, adjacency) = read_label_table(&labels)
                .with_context(|| format!("reading label table {}", labels.display()))?;
            let reordering = ColormapService::new(config)
                .group_colors(&colors, Some(&adjacency), &records)
                .context("regrouping colors")?;
            info!(groups = reordering.groups.len(), "done");
        }
    }

    Ok(())
}

fn apply_out_dir(config: &mut ColorsConfig, out_dir: Option<PathBuf>) {
    if let Some(dir) = out_dir {
        config.out_dir = dir;
    }
}

/// Configure tracing; `RUST_LOG` wins over the verbosity flag.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_level.into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
