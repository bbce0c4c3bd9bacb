use std::process::ExitCode;

use camino::Utf8PathBuf;
use clap::Parser;
use miette::IntoDiagnostic;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use seqmerge::app::App;
use seqmerge::cancel::CancelToken;
use seqmerge::config::{ConfigLoader, PublishOptions};
use seqmerge::error::MergeError;
use seqmerge::output::JsonOutput;
use seqmerge::worker::SystemCat;

#[derive(Parser)]
#[command(name = "seqmerge")]
#[command(about = "Merges paired-end sequence files by seqID groups")]
#[command(version, author)]
struct Cli {
    /// Directory holding the sequence files; merged outputs are written
    /// into one subdirectory per group.
    path: Utf8PathBuf,

    /// The seqID file. A bare name is looked up inside the working path;
    /// omitted entirely, the unique .txt/.csv/.tsv file in the path is used.
    #[arg(short = 'f', long)]
    id_file: Option<String>,

    /// Token separator in the seqID file: space, tab, comma, or any
    /// literal string.
    #[arg(short = 'd', long, default_value = "space")]
    delimiter: String,

    /// Merge worker threads. Defaults to a small pool capped by the number
    /// of jobs.
    #[arg(long)]
    workers: Option<usize>,

    /// Publish merged outputs into a downstream processing directory.
    #[arg(long)]
    publish: bool,

    /// Destination root for publishing.
    #[arg(long)]
    destination: Option<Utf8PathBuf>,

    /// Subfolder created under the destination root.
    #[arg(long, default_value = "merged")]
    folder: String,

    /// Append one SampleSheet.csv row per group while publishing.
    #[arg(long)]
    sample_sheet: bool,

    /// Print the run summary as JSON.
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        if let Some(merge) = report.downcast_ref::<MergeError>() {
            return ExitCode::from(map_exit_code(merge));
        }
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn map_exit_code(error: &MergeError) -> u8 {
    match error {
        MergeError::InvalidDelimiter(_)
        | MergeError::MissingIdentifierFile(_)
        | MergeError::AmbiguousIdentifierFile { .. }
        | MergeError::IdentifierFileRead(_)
        | MergeError::MissingWorkingPath(_)
        | MergeError::MissingDestination
        | MergeError::DuplicateGroup(_)
        | MergeError::UnmatchedIdentifier(_)
        | MergeError::MissingMate { .. } => 2,
        MergeError::Concat { .. } => 3,
        MergeError::Interrupted => 130,
        MergeError::Filesystem(_) => 1,
    }
}

fn run() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let publish = if cli.publish || cli.sample_sheet {
        let destination = cli.destination.ok_or(MergeError::MissingDestination)?;
        Some(PublishOptions {
            destination,
            folder: cli.folder,
            sample_sheet: cli.sample_sheet,
        })
    } else {
        None
    };

    let config = ConfigLoader::resolve(
        cli.path,
        cli.id_file.as_deref(),
        &cli.delimiter,
        cli.workers,
        publish,
    )?;

    let cancel = CancelToken::new();
    let handler_token = cancel.clone();
    ctrlc::set_handler(move || {
        warn!("interrupt received, finishing in-flight cleanup");
        handler_token.cancel();
    })
    .into_diagnostic()?;

    let app = App::new(config, SystemCat, cancel);
    let result = app.run()?;

    if cli.json {
        JsonOutput::print_run(&result).into_diagnostic()?;
    } else {
        for group in &result.groups {
            println!("{}\t{}\t{}", group.name, group.forward_output, group.reverse_output);
        }
        println!("merged {} file(s), skipped {}", result.merged, result.skipped);
    }
    Ok(())
}
