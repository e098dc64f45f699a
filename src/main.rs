use clap::{Parser, Subcommand};
use gallerist::config::{self, GalleryMode};
use gallerist::imaging::RustBackend;
use gallerist::layout::{self, JustifiedOptions};
use gallerist::process::{self, BatchOptions, BatchReport};
use gallerist::{output, scan};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "gallerist")]
#[command(about = "Image ingestion, caching and gallery layout for static sites")]
#[command(long_about = "\
Image ingestion, caching and gallery layout for static sites

Every source image is processed once per processor config into a cache entry:

  .gallerist/
  └── 1a2b3c4d-dawn-0123456789abcdef/   # {config_hash}-{name}-{source_hash}
      ├── index.json                    # Feature: EXIF, GPS, blurhash, color, assets
      ├── dawn-640.jpg                  # One variant per configured width
      └── dawn-1280.jpg                 # Widths above the source are skipped

Later runs with the same config read index.json and decode nothing.
Changing any [processor] setting produces a fresh entry.

Run 'gallerist gen-config' to generate a documented .gallerist.toml.")]
#[command(version)]
struct Cli {
    /// Directory where config discovery starts (walks up to find .gallerist.toml)
    #[arg(long, default_value = ".", global = true)]
    config_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Process images into the cache (defaults to the configured root)
    Process {
        /// Image files or directories to scan
        paths: Vec<PathBuf>,
        /// Delete each cache entry before regenerating it
        #[arg(long)]
        clear: bool,
        /// Regenerate variants and feature records even when cached
        #[arg(long)]
        force: bool,
    },
    /// Process images and print the gallery layout for a container width
    Layout {
        /// Container width in pixels
        #[arg(long)]
        width: f64,
        /// Layout mode (defaults to [gallery] mode)
        #[arg(long, value_enum)]
        mode: Option<GalleryMode>,
        /// Image files or directories to scan
        paths: Vec<PathBuf>,
    },
    /// Print a stock .gallerist.toml with all options documented
    GenConfig,
    /// Print the effective configuration after merging over defaults
    ShowConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Process {
            paths,
            clear,
            force,
        } => {
            let loaded = config::load_config(&std::path::absolute(&cli.config_dir)?)?;
            init_thread_pool(&loaded.config.processing);
            let report = run_batch(
                &loaded.config,
                &paths,
                BatchOptions {
                    clear,
                    force_overwrite: force,
                },
            )?;
            output::print_process_report(&report, &std::env::current_dir()?);
            if report.has_failures() {
                std::process::exit(1);
            }
        }
        Command::Layout { width, mode, paths } => {
            let loaded = config::load_config(&std::path::absolute(&cli.config_dir)?)?;
            init_thread_pool(&loaded.config.processing);
            let report = run_batch(&loaded.config, &paths, BatchOptions::default())?;

            let (labels, features): (Vec<String>, Vec<_>) = report
                .outcomes
                .iter()
                .filter_map(|o| {
                    let result = o.result.as_ref().ok()?;
                    Some((file_label(&o.source), result.feature.clone()))
                })
                .unzip();
            let items = layout::items_from_features(&features);
            let gallery = &loaded.config.gallery;

            let lines = match mode.unwrap_or(gallery.mode) {
                GalleryMode::Justified => {
                    let options = JustifiedOptions {
                        container_width: width,
                        target_row_height: gallery.target_row_height,
                        gap: gallery.gap,
                        panorama_threshold: gallery.panorama_threshold,
                    };
                    let rows = layout::calculate_justified_layout(&items, &options);
                    output::format_justified_rows(&rows, &labels)
                }
                GalleryMode::Waterfall => {
                    let count = layout::calculate_column_count(width, &gallery.breakpoints()?);
                    let columns = layout::calculate_waterfall_layout(&items, count);
                    output::format_waterfall_columns(&columns, &labels)
                }
                GalleryMode::Wall => output::format_wall(&items, &labels),
            };
            output::print_lines(&lines);
            if report.has_failures() {
                eprintln!("{} image(s) failed to process", report.stats.failures);
                std::process::exit(1);
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
        Command::ShowConfig => {
            let loaded = config::load_config(&std::path::absolute(&cli.config_dir)?)?;
            println!("{}", output::format_config_source(loaded.source.as_deref()));
            print!("{}", toml::to_string_pretty(&loaded.config)?);
        }
    }

    Ok(())
}

/// Discover sources under `paths` (or the configured root) and process them.
fn run_batch(
    config: &config::Config,
    paths: &[PathBuf],
    options: BatchOptions,
) -> Result<BatchReport, Box<dyn std::error::Error>> {
    let paths = if paths.is_empty() {
        vec![config.base.root.clone()]
    } else {
        paths
            .iter()
            .map(std::path::absolute)
            .collect::<Result<Vec<_>, _>>()?
    };
    let sources = scan::discover_images(&paths, &config.base.cache)?;
    Ok(process::process_all(
        &RustBackend::new(),
        config,
        &sources,
        options,
    ))
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Diagnostics go to stderr; `RUST_LOG` overrides the default `warn` level.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores; the config can only lower it.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
