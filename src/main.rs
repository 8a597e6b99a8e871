use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use pidgin_to_gajim::classify::{classify_ownership, parse_nicknames, sender_names};
use pidgin_to_gajim::config::AppConfig;
use pidgin_to_gajim::export::ContactExport;
use pidgin_to_gajim::logging::{init_logging, OperationTimer};
use pidgin_to_gajim::validation::InputValidator;
use pidgin_to_gajim::{Destination, Importer, LogStore};
use tracing::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Root of the transcript tree (<protocol>/<account>/<contact>/<file>)
    #[arg(short, long)]
    indir: PathBuf,

    /// Gajim history database to merge into
    #[arg(short, long)]
    outfile: PathBuf,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Load configuration
    let config = AppConfig::load()?;

    // Initialize logging
    let log_file = config.logging.file_path.as_deref().map(Path::new);
    let _log_guard = init_logging(
        Some(&config.get_log_level()),
        log_file,
        config.logging.format == "json",
    )?;

    InputValidator::validate_input_dir(&cli.indir)?;
    InputValidator::validate_output_file(&cli.outfile)?;

    info!("Starting pidgin-to-gajim");

    let mut store = LogStore::new();
    let importer = Importer::new()?;

    let timer = OperationTimer::new("parse");
    let scanned = importer
        .scan_tree(&cli.indir, &mut store, print_directory)
        .with_context(|| format!("Failed to parse transcripts under {}", cli.indir.display()))?;
    timer.finish();
    info!(
        directories = scanned.directories,
        files = scanned.files,
        messages = scanned.messages,
        "Parsing complete"
    );

    let self_nicks = if config.import.self_nicknames.is_empty() {
        prompt_nicknames(&store)?
    } else {
        config.import.self_nicknames.clone()
    };
    classify_ownership(&mut store, &self_nicks);

    let timer = OperationTimer::new("export");
    let mut destination = Destination::open(&cli.outfile, config.busy_timeout())
        .with_context(|| format!("Failed to open history database {}", cli.outfile.display()))?;
    let summary = destination.export(&store, print_contact)?;
    timer.finish();

    info!(
        contacts = summary.contacts.len(),
        inserted = summary.inserted(),
        duplicates = summary.duplicates(),
        "Import complete"
    );
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_directory(dir: &Path) {
    println!("Parsing {}", dir.display());
}

#[allow(clippy::print_stdout)]
fn print_contact(contact: &ContactExport) {
    println!(
        "Inserting {} ({} new, {} already present)",
        contact.name, contact.inserted, contact.duplicates
    );
    if contact.created {
        println!("Adding {}", contact.name);
    }
}

/// List every sender seen and ask which of them are the local user
#[allow(clippy::print_stdout)]
fn prompt_nicknames(store: &LogStore) -> Result<Vec<String>> {
    for name in sender_names(store) {
        println!("{name}");
    }
    print!("Own nicks, comma separated: ");
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("Failed to read nicknames from stdin")?;

    let nicks = parse_nicknames(&answer);
    for nick in &nicks {
        InputValidator::validate_nickname(nick)?;
    }
    Ok(nicks)
}
