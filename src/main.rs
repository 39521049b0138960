use artwork_manifest::config::{self, ManifestConfig};
use artwork_manifest::scan::{self, Manifest, ScanError};
use artwork_manifest::{output, watch};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "artwork-manifest")]
#[command(about = "Generate the artwork gallery manifest from image file names")]
#[command(long_about = "\
Generate the artwork gallery manifest from image file names

Every image in the artwork directory becomes one manifest entry. Its
metadata comes from the file name:

  YYYY-MM-DD_collection_category_title_tag.ext

  2024-03-10_my-series_illus_sunset-glow_warm.png
    date:       2024-03-10
    collection: My-series
    category:   Illustration   (illus/anim/comic/sketch/misc, else capitalized)
    title:      Sunset Glow    (dashes → spaces)
    tag:        Warm

Trailing fields may be left off: 2024-01-01_myseries.png is dated and
collected, categorized Misc, and titled Untitled.

The manifest is sorted newest first, then by title, and replaced in full on
every run. With --watch the tool keeps running and rebuilds it whenever an
image is added to or removed from the directory.

Run 'artwork-manifest gen-config' to print a documented artwork.toml.")]
#[command(version = env!("ARTWORK_MANIFEST_VERSION"))]
struct Cli {
    /// Project root; the config file and relative paths resolve against it
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    /// Config file (default: <root>/artwork.toml, optional)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Artwork image directory (overrides `source_dir`)
    #[arg(long, global = true)]
    source: Option<PathBuf>,

    /// Manifest output file (overrides `manifest_path`)
    #[arg(long, global = true)]
    manifest: Option<PathBuf>,

    /// After the initial build, keep rebuilding when images are added or removed
    #[arg(long)]
    watch: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Show what the manifest would contain without writing it
    Check,
    /// Print a stock artwork.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    if let Some(Command::GenConfig) = cli.command {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }

    let config = load_config(&cli)?;
    let source = config.source_dir_in(&cli.root);
    let manifest_path = config.manifest_path_in(&cli.root);

    if let Some(Command::Check) = cli.command {
        println!("==> Checking {}", source.display());
        let manifest = scan::scan(&source, &config)?;
        output::print_inventory(&manifest);
        let current = Manifest::read(&manifest_path).ok();
        if current.as_ref() == Some(&manifest) {
            println!("==> {} is up to date", manifest_path.display());
        } else {
            println!("==> {} is out of date", manifest_path.display());
        }
        return Ok(());
    }

    // Subscribe before the first build so nothing changed during it is missed.
    let watcher = if cli.watch {
        Some(watch::ChangeWatcher::new(&source)?.ignoring(&manifest_path))
    } else {
        None
    };

    let manifest = scan::build(&source, &manifest_path, &config)?;
    output::print_build_summary(&manifest, &manifest_path);

    if let Some(watcher) = watcher {
        println!("==> Watching {}", source.display());
        watcher.run(|change| {
            output::print_change_event(change);
            let manifest = scan::build(&source, &manifest_path, &config)?;
            output::print_build_summary(&manifest, &manifest_path);
            Ok::<(), ScanError>(())
        })?;
    }

    Ok(())
}

/// Load the config file and apply command-line overrides.
fn load_config(cli: &Cli) -> Result<ManifestConfig, config::ConfigError> {
    let mut config = match &cli.config {
        Some(path) => config::load_config_file(path)?,
        None => config::load_config(&cli.root)?,
    };
    if let Some(source) = &cli.source {
        config.source_dir = source.clone();
    }
    if let Some(manifest) = &cli.manifest {
        config.manifest_path = manifest.clone();
    }
    Ok(config)
}
