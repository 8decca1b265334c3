use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use seqsub_readers::SubmissionKind;

mod render;

/// Entry point for CLI execution. Returns the desired exit code.
pub fn run() -> Result<i32> {
    let cli = Cli::parse();
    match cli.command {
        Command::Validate(args) => handle_validate(args),
        Command::Fields(args) => handle_fields(args),
    }
}

fn handle_validate(args: ValidateArgs) -> Result<i32> {
    let ValidateArgs {
        submission,
        input_dir,
        format,
        quiet,
        manifest,
    } = args;

    let kind = SubmissionKind::from(submission);
    let (result, summary) = kind.read(&input_dir, &manifest);

    let rendered = match format.unwrap_or(ReportFormatValue::Plain) {
        ReportFormatValue::Plain => render::render_plain(&result, summary.as_deref(), quiet),
        ReportFormatValue::Json => render::render_json(&result, summary.as_deref()),
    };
    if !rendered.is_empty() {
        emit(&rendered)?;
    }

    Ok(if result.is_valid() { 0 } else { 2 })
}

fn handle_fields(args: FieldsArgs) -> Result<i32> {
    let kind = SubmissionKind::from(args.submission);
    emit(&render::render_fields(kind))?;
    Ok(0)
}

fn emit(text: &str) -> Result<()> {
    let mut stdout = io::stdout().lock();
    match writeln!(stdout, "{text}") {
        Err(err) if err.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        other => Ok(other?),
    }
}

#[derive(Parser)]
#[command(
    name = "seqsub",
    about = "Validate data-submission manifests against a submission type"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Read and validate a manifest, reporting every problem found.
    Validate(ValidateArgs),
    /// List the fields a submission type accepts.
    Fields(FieldsArgs),
}

#[derive(Args)]
struct ValidateArgs {
    /// Submission type the manifest belongs to.
    #[arg(long = "type", value_enum)]
    submission: KindValue,

    /// Directory data-file values resolve against.
    #[arg(long, default_value = ".")]
    input_dir: PathBuf,

    /// Report format.
    #[arg(long, value_enum)]
    format: Option<ReportFormatValue>,

    /// Print findings only, no summary line.
    #[arg(long)]
    quiet: bool,

    /// Manifest file to read.
    manifest: PathBuf,
}

#[derive(Args)]
struct FieldsArgs {
    /// Submission type to describe.
    #[arg(long = "type", value_enum)]
    submission: KindValue,
}

#[derive(Clone, Copy, ValueEnum)]
enum KindValue {
    Genome,
    Transcriptome,
    Sequence,
    Reads,
}

impl From<KindValue> for SubmissionKind {
    fn from(value: KindValue) -> Self {
        match value {
            KindValue::Genome => SubmissionKind::Genome,
            KindValue::Transcriptome => SubmissionKind::Transcriptome,
            KindValue::Sequence => SubmissionKind::Sequence,
            KindValue::Reads => SubmissionKind::Reads,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ReportFormatValue {
    Plain,
    Json,
}
