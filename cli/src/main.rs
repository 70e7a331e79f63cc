//! prosestrip CLI - prose filter for extracted document text
//!
//! A command-line tool that strips code, markup and other noise from text
//! files, keeping only prose-like content.

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use prosestrip::output::{self, DEFAULT_OUTPUT_SUFFIX};
use prosestrip::source::{decode_text, InputPolicy};
use prosestrip::{filter_with_report, process_file, process_text, FilterOptions};
use rayon::prelude::*;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::{filter::LevelFilter, fmt};

/// Filter extracted document text down to clean prose
#[derive(Parser)]
#[command(
    name = "prosestrip",
    version,
    about = "Strip code, markup and noise from extracted text",
    long_about = "prosestrip - heuristic prose filter for extracted document text.\n\n\
                  Removes code, markup, number tables and other boilerplate, keeping\n\
                  sentences and prose-like passages.\n\n\
                  Usage:\n  \
                  prosestrip <files...>          Write <name>_processed.txt next to each file\n  \
                  prosestrip text <file>         Filter one file (or stdin) to stdout\n  \
                  prosestrip stats <file>        Show what each stage discarded"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    run: RunArgs,

    /// JSON settings file (keys not present keep their defaults)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Built-in settings preset
    #[arg(long, global = true, value_enum)]
    preset: Option<Preset>,

    /// Append detected URLs to the output
    #[arg(long, global = true)]
    urls: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', long = "verbose", global = true, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Process files in parallel (default command)
    Run(RunArgs),

    /// Filter one file, or stdin, to stdout
    Text {
        /// Input file path (default: stdin)
        input: Option<PathBuf>,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List URLs found in a file, or stdin
    Urls {
        /// Input file path (default: stdin)
        input: Option<PathBuf>,
    },

    /// Show per-stage filter statistics for a file
    Stats {
        /// Input file path
        input: PathBuf,

        /// Print statistics as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the effective settings as JSON
    Config,
}

#[derive(Args, Default)]
struct RunArgs {
    /// Input files
    files: Vec<PathBuf>,

    /// Output file suffix
    #[arg(long, default_value = DEFAULT_OUTPUT_SUFFIX)]
    suffix: String,

    /// Append all results to this file instead of writing one file per input
    #[arg(long)]
    consolidate: Option<PathBuf>,

    /// Extra extensions read like .txt (comma-separated, e.g. ".md,.rst")
    #[arg(long, value_name = "EXTS")]
    text_ext: Option<String>,

    /// Additional extensions to include (comma-separated)
    #[arg(long, value_name = "EXTS")]
    include: Option<String>,

    /// Extensions to always skip (comma-separated, replaces the default list)
    #[arg(long, value_name = "EXTS")]
    ignore: Option<String>,

    /// Read every file that is not ignored as text
    #[arg(long)]
    all_files: bool,
}

impl RunArgs {
    fn policy(&self) -> InputPolicy {
        let mut policy = InputPolicy::new();
        if let Some(ref exts) = self.text_ext {
            policy = policy.with_custom_extensions(exts);
        }
        if let Some(ref exts) = self.include {
            policy = policy.with_include(exts);
        }
        if let Some(ref exts) = self.ignore {
            policy = policy.with_ignore(exts);
        }
        if self.all_files {
            policy = policy.all_files();
        }
        policy
    }
}

/// Settings preset
#[derive(Clone, Copy, ValueEnum)]
enum Preset {
    /// Balanced defaults
    Default,
    /// Only the lightest filters
    Minimal,
    /// Stricter thresholds, every classifier on
    Aggressive,
    /// Segmentation only
    Passthrough,
}

impl From<Preset> for FilterOptions {
    fn from(preset: Preset) -> Self {
        match preset {
            Preset::Default => FilterOptions::default(),
            Preset::Minimal => FilterOptions::minimal(),
            Preset::Aggressive => FilterOptions::aggressive(),
            Preset::Passthrough => FilterOptions::passthrough(),
        }
    }
}

/// Outcome counts for a batch run.
#[derive(Debug, Default, PartialEq)]
struct BatchSummary {
    processed: usize,
    skipped: usize,
    empty: usize,
    failed: usize,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(determine_log_level(cli.verbose));

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_tracing(level: LevelFilter) {
    let subscriber = fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        tracing::warn!("Tracing subscriber already set; skipping re-initialization.");
    }
}

fn determine_log_level(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let options = load_options(&cli)?;

    let command = match cli.command {
        Some(command) => command,
        None if cli.run.files.is_empty() => {
            use clap::CommandFactory;
            Cli::command().print_help()?;
            return Ok(());
        }
        None => Commands::Run(cli.run),
    };

    match command {
        Commands::Run(args) => {
            if args.files.is_empty() {
                return Err("no input files given".into());
            }
            let summary = run_batch(&args, &options)?;
            print_summary(&summary);
            if summary.failed > 0 {
                return Err(format!("{} of {} files failed", summary.failed, args.files.len()).into());
            }
        }

        Commands::Text { input, output } => {
            let raw = read_input(input.as_deref())?;
            let text = process_text(&raw, &options);
            write_output(output.as_ref(), &text)?;

            if let Some(path) = output {
                println!("{} Filtered text: {}", "✓".green().bold(), path.display());
            }
        }

        Commands::Urls { input } => {
            let raw = read_input(input.as_deref())?;
            let (_, urls) = prosestrip::extract_urls(&raw);
            if urls.is_empty() {
                eprintln!("{} No URLs found", "!".yellow().bold());
            }
            for url in urls {
                println!("{}", url);
            }
        }

        Commands::Stats { input, json } => {
            let pb = create_spinner("Filtering document...");
            let raw = prosestrip::load_text(&input)?;
            let report = filter_with_report(&raw, &options);
            pb.finish_and_clear();

            if json {
                println!("{}", serde_json::to_string_pretty(&report.stats)?);
            } else {
                print_stats(&input, &report);
            }
        }

        Commands::Config => {
            println!("{}", options.to_json()?);
        }
    }

    Ok(())
}

/// Resolves settings from `--config`, `--preset` and `--urls`.
///
/// A settings file takes precedence over a preset.
fn load_options(cli: &Cli) -> Result<FilterOptions, Box<dyn std::error::Error>> {
    let mut options = match (&cli.config, cli.preset) {
        (Some(path), preset) => {
            if preset.is_some() {
                tracing::warn!("--preset ignored because --config was given");
            }
            FilterOptions::from_json_file(path)?
        }
        (None, Some(preset)) => preset.into(),
        (None, None) => FilterOptions::default(),
    };

    if cli.urls {
        options.extract_urls_enabled = true;
    }

    if let Err(e) = options.compile_pattern() {
        eprintln!("{}: {}; pattern stage skipped", "Warning".yellow().bold(), e);
    }

    Ok(options)
}

/// Processes every file in `args`, writing results as they are configured.
fn run_batch(
    args: &RunArgs,
    options: &FilterOptions,
) -> Result<BatchSummary, Box<dyn std::error::Error>> {
    let policy = args.policy();
    let mut summary = BatchSummary::default();

    let mut accepted = Vec::with_capacity(args.files.len());
    for path in &args.files {
        match policy.check(path) {
            Ok(()) => accepted.push(path),
            Err(e) => {
                println!("{} Skipped {}", "-".dimmed(), e);
                summary.skipped += 1;
            }
        }
    }

    if let Some(ref target) = args.consolidate {
        output::reset_consolidated(target)?;
    }

    let pb = create_progress(accepted.len() as u64);
    let results: Vec<_> = accepted
        .par_iter()
        .map(|path| {
            let result = process_file(path, options);
            pb.inc(1);
            (*path, result)
        })
        .collect();
    pb.finish_and_clear();

    for (path, result) in results {
        let text = match result {
            Ok(text) => text,
            Err(e) => {
                eprintln!("{} {}: {}", "✗".red().bold(), path.display(), e);
                summary.failed += 1;
                continue;
            }
        };

        if text.trim().is_empty() {
            println!(
                "{} No content passed filters or URLs found for {}",
                "!".yellow().bold(),
                path.display()
            );
            summary.empty += 1;
            continue;
        }

        match args.consolidate {
            Some(ref target) => {
                output::append_consolidated(target, path, &text)?;
                println!("{} {} -> {}", "✓".green().bold(), path.display(), target.display());
            }
            None => {
                let out = output::output_path(path, &args.suffix);
                output::write_output(&out, &text)?;
                println!("{} {} -> {}", "✓".green().bold(), path.display(), out.display());
            }
        }
        summary.processed += 1;
    }

    Ok(summary)
}

fn print_summary(summary: &BatchSummary) {
    println!("\n{}", "Batch Complete".green().bold());
    println!("{}", "─".repeat(40));
    println!("{}: {}", "Processed".bold(), summary.processed);
    println!("{}: {}", "Empty".bold(), summary.empty);
    println!("{}: {}", "Skipped".bold(), summary.skipped);
    if summary.failed > 0 {
        println!("{}: {}", "Failed".red().bold(), summary.failed);
    }
}

fn print_stats(input: &Path, report: &prosestrip::FilterReport) {
    let stats = &report.stats;

    println!("{}", "Filter Statistics".cyan().bold());
    println!("{}", "─".repeat(40));
    println!(
        "{}: {}",
        "File".bold(),
        input.file_name().unwrap_or_default().to_string_lossy()
    );
    println!("{}: {}", "Paragraphs".bold(), stats.paragraphs);
    println!("{}: {}", "Rejected paragraphs".bold(), stats.rejected_paragraphs);
    if stats.used_line_fallback {
        println!("{}: {}", "Line fallback".bold(), "Yes");
    }
    println!("{}: {}", "Segments".bold(), stats.segments);

    println!("\n{}", "Discarded".cyan().bold());
    println!("{}", "─".repeat(40));
    println!("{}: {}", "Code-like".bold(), stats.discarded.code_like);
    println!("{}: {}", "Number-heavy".bold(), stats.discarded.number_heavy);
    println!("{}: {}", "Low alphanumeric".bold(), stats.discarded.low_alphanumeric);
    println!("{}: {}", "Too short".bold(), stats.discarded.too_short);
    println!("{}: {}", "Emptied by rewrite".bold(), stats.emptied_by_transform);
    println!("{}: {}", "Dropped by pattern".bold(), stats.dropped_by_pattern);

    println!("\n{}: {}", "Kept".green().bold(), stats.kept);
    if let Some(ref e) = report.pattern_error {
        println!("{}: {}", "Pattern error".yellow().bold(), e);
    }
}

fn read_input(path: Option<&Path>) -> Result<String, Box<dyn std::error::Error>> {
    match path {
        Some(p) => Ok(prosestrip::load_text(p)?),
        None => {
            let mut data = Vec::new();
            io::stdin().lock().read_to_end(&mut data)?;
            Ok(decode_text(&data))
        }
    }
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
            .template("{spinner:.blue} {msg}")
            .unwrap(),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn create_progress(len: u64) -> ProgressBar {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.blue} [{bar:30.cyan/blue}] {pos}/{len} files")
            .unwrap()
            .progress_chars("=> "),
    );
    pb
}

fn write_output(path: Option<&PathBuf>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            writeln!(handle, "{}", content)?;
        }
    }
    Ok(())
}
