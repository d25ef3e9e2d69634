use anyhow::{Context, Result};
use clap::Parser;
use snapsort::organizer::{default_workers, Organizer, OrganizerConfig};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "snapsort",
    version,
    about = "Organize photo and video dumps into dated, deduplicated folders"
)]
struct Cli {
    /// Directory to scan for media files
    #[arg(short, long, value_name = "DIR")]
    source: PathBuf,

    /// Directory to place organized output into
    #[arg(short, long, value_name = "DIR")]
    output: PathBuf,

    /// Number of worker threads (default: half the CPUs, minimum 1)
    #[arg(long, value_name = "N")]
    workers: Option<usize>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let workers = cli.workers.unwrap_or_else(default_workers).max(1);
    println!(
        "▶ Organizing {} → {} ({} workers)",
        cli.source.display(),
        cli.output.display(),
        workers
    );

    let organizer = Organizer::new(OrganizerConfig {
        source: cli.source,
        output: cli.output,
        workers,
    });
    let summary = organizer.run().context("Failed to organize media files")?;

    println!(
        "\n✅ Placed {} image(s) ({} duplicate(s)) and {} video(s)",
        summary.images_placed, summary.duplicates_found, summary.videos_placed
    );

    if !summary.failures.is_empty() {
        println!(
            "\n⚠️  {} file(s) could not be processed:",
            summary.failures.len()
        );
        for failure in &summary.failures {
            println!("   ▶ {}: {}", failure.path, failure.reason);
        }
    }

    Ok(())
}
