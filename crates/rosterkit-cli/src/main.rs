//! rosterkit CLI - Roster spreadsheet normalizer
//!
//! Command-line interface for rebuilding roster workbooks, exporting the
//! substitute ledger and checking a workbook's layout.

mod diagnostics;

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use rosterkit_core::{Layout, SheetWriter};
use rosterkit_parser::{extract_ledger_from_sheet, read_workbook, validate_layout};
use rosterkit_render::{
    default_ledger_path, default_output_path, render_ledger, write_all_atomic, write_atomic,
    LedgerFormat, XlsxWriter,
};
use rosterkit_transform::{Pipeline, PipelineReport};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::diagnostics::{to_json, DiagnosticConfig, ExitCode, TerminalEmitter};

#[derive(Parser)]
#[command(name = "rosterkit")]
#[command(author, version, about = "Roster spreadsheet normalizer", long_about = None)]
struct Cli {
    /// Verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rebuild a roster workbook into a planning
    Process {
        /// Input workbook
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output workbook (default: <stem>_planning.xlsx next to the input)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Substitute ledger path (default: <stem>_ledger.csv next to the output;
        /// .json for JSON, CSV otherwise)
        #[arg(long, value_name = "PATH")]
        ledger: Option<PathBuf>,

        /// Layout file (TOML)
        #[arg(short, long, env = "ROSTERKIT_CONFIG")]
        config: Option<PathBuf>,

        /// Year of the day headers (default: inferred from the ledger)
        #[arg(long)]
        year: Option<i32>,

        /// Treat layout warnings as errors
        #[arg(long)]
        strict: bool,

        /// Print the run report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Export the substitute ledger
    Extract {
        /// Input workbook
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = LedgerFormatArg::Csv)]
        format: LedgerFormatArg,

        /// Layout file (TOML)
        #[arg(short, long, env = "ROSTERKIT_CONFIG")]
        config: Option<PathBuf>,
    },

    /// Check a workbook against the expected layout
    Check {
        /// Input workbook
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Layout file (TOML)
        #[arg(short, long, env = "ROSTERKIT_CONFIG")]
        config: Option<PathBuf>,

        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,

        /// Only print errors
        #[arg(short, long)]
        quiet: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
        format: ReportFormat,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LedgerFormatArg {
    Csv,
    Json,
}

impl From<LedgerFormatArg> for LedgerFormat {
    fn from(arg: LedgerFormatArg) -> Self {
        match arg {
            LedgerFormatArg::Csv => LedgerFormat::Csv,
            LedgerFormatArg::Json => LedgerFormat::Json,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ReportFormat {
    Text,
    Json,
}

fn main() -> Result<std::process::ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let code = match cli.command {
        Commands::Process {
            file,
            output,
            ledger,
            config,
            year,
            strict,
            json,
        } => cmd_process(&file, output, ledger, config.as_deref(), year, strict, json)?,
        Commands::Extract {
            file,
            output,
            format,
            config,
        } => cmd_extract(&file, output.as_deref(), format.into(), config.as_deref())?,
        Commands::Check {
            file,
            config,
            strict,
            quiet,
            format,
        } => cmd_check(&file, config.as_deref(), DiagnosticConfig { strict, quiet }, format)?,
    };

    Ok(code.into())
}

/// `RUST_LOG` wins; otherwise the level follows `-v`
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn load_layout(config: Option<&Path>) -> Result<Layout> {
    match config {
        Some(path) => Layout::load(path)
            .with_context(|| format!("loading layout from {}", path.display())),
        None => Ok(Layout::default()),
    }
}

fn ledger_format_for(path: &Path) -> LedgerFormat {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => LedgerFormat::Json,
        _ => LedgerFormat::Csv,
    }
}

fn cmd_process(
    file: &Path,
    output: Option<PathBuf>,
    ledger: Option<PathBuf>,
    config: Option<&Path>,
    year: Option<i32>,
    strict: bool,
    json: bool,
) -> Result<ExitCode> {
    let layout = load_layout(config)?;
    let source =
        read_workbook(file).with_context(|| format!("reading {}", file.display()))?;

    let mut emitter = TerminalEmitter::new(
        std::io::stderr(),
        DiagnosticConfig {
            strict,
            quiet: false,
        },
    );
    for diagnostic in validate_layout(&source, &layout) {
        emitter.emit(&diagnostic);
    }
    if emitter.has_errors() {
        eprintln!(
            "{} layout error(s) in strict mode; nothing written",
            emitter.error_count()
        );
        return Ok(emitter.exit_code());
    }

    let run = Pipeline::new(layout).with_year(year).run(&source);
    let planning = XlsxWriter::new()
        .write(&run.sheet)
        .context("rendering the planning workbook")?;

    let out_path = output.unwrap_or_else(|| default_output_path(file));
    let ledger_path = ledger.unwrap_or_else(|| default_ledger_path(file, &out_path));
    let ledger_bytes = render_ledger(&run.ledger, ledger_format_for(&ledger_path))
        .context("rendering the ledger")?;

    let files = [
        (out_path.as_path(), planning.as_slice()),
        (ledger_path.as_path(), ledger_bytes.as_slice()),
    ];
    write_all_atomic(&files).with_context(|| {
        format!("writing {} and {}", out_path.display(), ledger_path.display())
    })?;
    info!(path = %out_path.display(), "planning written");
    info!(path = %ledger_path.display(), records = run.ledger.len(), "ledger written");

    if json {
        println!("{}", serde_json::to_string_pretty(&run.report)?);
    } else {
        print_report(file, &out_path, &ledger_path, &run.report);
    }
    Ok(ExitCode::Success)
}

fn print_report(input: &Path, output: &Path, ledger: &Path, report: &PipelineReport) {
    println!("Processed: {} -> {}", input.display(), output.display());
    println!("  ledger:  {}", ledger.display());
    println!(
        "  rows:    {} in, {} out ({} noise, {} blank removed)",
        report.rows_in, report.rows_out, report.noise_rows_dropped, report.blank_rows_dropped
    );
    println!("  names:   {} row pair(s) inserted", report.name_pairs_inserted);
    println!(
        "  filled:  {} fixed, {} substitute row(s), {} day(s) from the ledger ({} record(s))",
        report.fixed_rows_filled,
        report.substitute_rows_filled,
        report.ledger_cells_filled,
        report.ledger_assignments
    );
    println!(
        "  merges:  {} ({} skipped)",
        report.blocks_merged, report.merges_skipped
    );
    println!(
        "  days:    {} column(s){}, year {}",
        report.day_columns,
        if report.fallback_day_range {
            " (fallback range)"
        } else {
            ""
        },
        report.year
    );
    if report.undated_columns > 0 {
        println!(
            "  undated: {} substitute day cell(s) without a readable header date",
            report.undated_columns
        );
    }
}

fn cmd_extract(
    file: &Path,
    output: Option<&Path>,
    format: LedgerFormat,
    config: Option<&Path>,
) -> Result<ExitCode> {
    let layout = load_layout(config)?;
    let sheet = read_workbook(file).with_context(|| format!("reading {}", file.display()))?;
    let scan = extract_ledger_from_sheet(&sheet, layout.label_column);
    let content = render_ledger(&scan.assignments, format).context("rendering the ledger")?;

    match output {
        Some(path) => {
            write_atomic(path, &content)
                .with_context(|| format!("writing {}", path.display()))?;
            info!(path = %path.display(), records = scan.assignments.len(), "ledger written");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&content)?;
            stdout.flush()?;
        }
    }
    Ok(ExitCode::Success)
}

fn cmd_check(
    file: &Path,
    config: Option<&Path>,
    policy: DiagnosticConfig,
    format: ReportFormat,
) -> Result<ExitCode> {
    let layout = load_layout(config)?;
    let sheet = read_workbook(file).with_context(|| format!("reading {}", file.display()))?;
    let diagnostics = validate_layout(&sheet, &layout);

    match format {
        ReportFormat::Json => {
            let (json, code) = to_json(&diagnostics, &policy)?;
            println!("{}", json);
            Ok(code)
        }
        ReportFormat::Text => {
            let mut emitter = TerminalEmitter::new(std::io::stderr(), policy);
            for diagnostic in &diagnostics {
                emitter.emit(diagnostic);
            }
            if !policy.quiet {
                println!(
                    "{}: {} error(s), {} warning(s)",
                    file.display(),
                    emitter.error_count(),
                    emitter.warning_count()
                );
            }
            Ok(emitter.exit_code())
        }
    }
}
