//! symsub: Symbolic substitution and branch evaluation from the command line.
//!
//! Usage:
//!   symsub [options] substitute [file...]
//!   symsub [options] branches [file] --input '{"a": 1}'
//!   symsub [options] parse <file>
//!   symsub init
//!
//! Exit status is 0 on success, 1 for usage, I/O and project file errors,
//! and 2 when an input does not parse or a test cannot be evaluated.

use clap::{Parser as ClapParser, Subcommand};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::process;
use std::time::{Duration, Instant, SystemTime};
use symsub_analyzer::{
    bindings_from_json, evaluate_branches_with_options, highlight, parse_tree, substitute_with_options,
    AnalyzeError, AnalyzerOptions, DiagnosticCollection,
};
use symsub_options::{SymsubConfig, CONFIG_FILE_NAME};
use tracing_subscriber::EnvFilter;

#[derive(ClapParser, Debug)]
#[command(name = "symsub", version, about = "symsub - symbolic substitution for a JavaScript subset")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Path to symsub.json.
    #[arg(short = 'p', long = "project", global = true)]
    project: Option<PathBuf>,

    /// Re-run the command whenever an input file changes.
    #[arg(short = 'w', long, global = true)]
    watch: bool,

    /// Log analyzer activity to stderr.
    #[arg(short = 'v', long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print each file with its locals inlined into the expressions that read them.
    Substitute {
        /// Files to rewrite. Defaults to the project's files.
        #[arg(value_name = "FILE")]
        files: Vec<PathBuf>,

        /// Indentation for the rewritten code.
        #[arg(long)]
        indent: Option<String>,

        /// End each rewritten file with a newline.
        #[arg(long = "trailing-newline")]
        trailing_newline: bool,
    },

    /// Evaluate the conditional tests of a file against input values.
    Branches {
        /// File to evaluate. Defaults to the project's first file.
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Input values as a JSON object.
        #[arg(long, conflicts_with = "input_file")]
        input: Option<String>,

        /// Read input values from a JSON file.
        #[arg(long = "input-file")]
        input_file: Option<PathBuf>,

        /// Print the source with taken tests in green and untaken tests in red.
        #[arg(long)]
        highlight: bool,
    },

    /// Print the parse tree of a file as JSON.
    Parse {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Create a symsub.json in the current directory.
    Init,
}

// ANSI color codes
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

const EXIT_USAGE: i32 = 1;
const EXIT_ANALYSIS: i32 = 2;

/// Stack size for substitution workers. Inlined expressions can nest deeper
/// than anything in the parsed input.
const WORKER_STACK_SIZE: usize = 16 * 1024 * 1024;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if matches!(cli.command, Command::Init) {
        process::exit(run_init());
    }

    if cli.watch {
        run_watch(&cli);
    }

    process::exit(run_command(&cli));
}

fn init_logging(verbose: bool) {
    let default_directive = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("SYMSUB_LOG").unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

// ============================================================================
// Commands
// ============================================================================

fn run_command(cli: &Cli) -> i32 {
    let project = match load_project(cli.project.as_deref()) {
        Ok(project) => project,
        Err(code) => return code,
    };

    match &cli.command {
        Command::Substitute {
            files,
            indent,
            trailing_newline,
        } => run_substitute(project.as_ref(), files, indent.as_deref(), *trailing_newline),
        Command::Branches {
            file,
            input,
            input_file,
            highlight,
        } => run_branches(project.as_ref(), file.as_deref(), input.as_deref(), input_file.as_deref(), *highlight),
        Command::Parse { file } => run_parse(file),
        Command::Init => run_init(),
    }
}

fn run_substitute(project: Option<&Project>, files: &[PathBuf], indent: Option<&str>, trailing_newline: bool) -> i32 {
    let start = Instant::now();

    let mut options = project
        .map(|p| AnalyzerOptions::from_config(&p.config))
        .unwrap_or_default();
    // Flags override the project file.
    if let Some(indent) = indent {
        options.printer.indent_str = indent.to_string();
    }
    if trailing_newline {
        options.printer.trailing_newline = true;
    }

    let files = input_files(files, project);
    if files.is_empty() {
        print_error("No input files given.");
        return EXIT_USAGE;
    }

    let pool = match rayon::ThreadPoolBuilder::new().stack_size(WORKER_STACK_SIZE).build() {
        Ok(pool) => pool,
        Err(error) => {
            print_error(&format!("Cannot start worker threads: {}", error));
            return EXIT_USAGE;
        }
    };
    let results: Vec<(&PathBuf, Result<String, Failure>)> = pool.install(|| {
        files
            .par_iter()
            .map(|path| {
                let outcome = read_source(path).and_then(|source| {
                    let file_options = options.clone().with_file_name(path.display().to_string());
                    substitute_with_options(&source, &file_options)
                        .map_err(|error| Failure::Analysis { error, source })
                });
                (path, outcome)
            })
            .collect()
    });

    let mut exit_code = 0;
    for (path, outcome) in &results {
        match outcome {
            Ok(text) => {
                if files.len() > 1 {
                    println!("// {}", path.display());
                }
                print!("{}", text);
                if !text.is_empty() && !text.ends_with('\n') {
                    println!();
                }
            }
            Err(failure) => exit_code = exit_code.max(report_failure(failure)),
        }
    }

    tracing::debug!(
        files = files.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "substitute finished"
    );
    exit_code
}

fn run_branches(
    project: Option<&Project>,
    file: Option<&Path>,
    input: Option<&str>,
    input_file: Option<&Path>,
    highlight_source: bool,
) -> i32 {
    let path = match file {
        Some(path) => path.to_path_buf(),
        None => match input_files(&[], project).into_iter().next() {
            Some(path) => path,
            None => {
                print_error("No input file given.");
                return EXIT_USAGE;
            }
        },
    };

    let input_value = match read_input(project, input, input_file) {
        Ok(value) => value,
        Err(failure) => return report_failure(&failure),
    };
    let bindings = match bindings_from_json(&input_value) {
        Ok(bindings) => bindings,
        Err(error) => {
            print_error(&format!("Invalid input: {}", error));
            return EXIT_USAGE;
        }
    };

    let source = match read_source(&path) {
        Ok(source) => source,
        Err(failure) => return report_failure(&failure),
    };
    let options = project
        .map(|p| AnalyzerOptions::from_config(&p.config))
        .unwrap_or_default()
        .with_file_name(path.display().to_string());

    let records = match evaluate_branches_with_options(&source, &bindings, &options) {
        Ok(records) => records,
        Err(error) => return report_failure(&Failure::Analysis { error, source }),
    };

    if highlight_source {
        let open_true = format!("{}{}", BOLD, GREEN);
        let open_false = format!("{}{}", BOLD, RED);
        println!("{}", highlight(&source, &records, &open_true, &open_false, RESET));
        return 0;
    }

    match serde_json::to_string_pretty(&records) {
        Ok(json) => {
            println!("{}", json);
            0
        }
        Err(error) => {
            print_error(&format!("Failed to serialize branch records: {}", error));
            EXIT_USAGE
        }
    }
}

fn run_parse(file: &Path) -> i32 {
    let source = match read_source(file) {
        Ok(source) => source,
        Err(failure) => return report_failure(&failure),
    };
    let tree = match parse_tree(&source) {
        Ok(tree) => tree,
        Err(error) => return report_failure(&Failure::Analysis { error, source }),
    };
    match serde_json::to_string_pretty(&tree) {
        Ok(json) => {
            println!("{}", json);
            0
        }
        Err(error) => {
            print_error(&format!("Failed to serialize parse tree: {}", error));
            EXIT_USAGE
        }
    }
}

fn run_init() -> i32 {
    let config_path = Path::new(CONFIG_FILE_NAME);
    if config_path.exists() {
        print_error(&format!("A {} file already exists in the current directory.", CONFIG_FILE_NAME));
        return EXIT_USAGE;
    }

    let written = symsub_options::write_config(&SymsubConfig::default_project())
        .map_err(|e| e.to_string())
        .and_then(|text| std::fs::write(config_path, text).map_err(|e| e.to_string()));
    match written {
        Ok(()) => {
            println!("Successfully created a {} file.", CONFIG_FILE_NAME);
            0
        }
        Err(e) => {
            print_error(&format!("Failed to create {}: {}", CONFIG_FILE_NAME, e));
            EXIT_USAGE
        }
    }
}

fn run_watch(cli: &Cli) -> ! {
    eprintln!("Starting in watch mode...");
    eprintln!();

    run_command(cli);

    eprintln!();
    eprintln!("Watching for file changes...");

    let files = watched_files(cli);
    let mut last_modified = get_latest_mtime(&files);

    loop {
        std::thread::sleep(Duration::from_millis(500));
        let current_mtime = get_latest_mtime(&files);
        if current_mtime > last_modified {
            last_modified = current_mtime;
            eprintln!();
            eprintln!("File change detected. Running again...");
            eprintln!();
            run_command(cli);
        }
    }
}

// ============================================================================
// Inputs
// ============================================================================

/// A project file and the directory its relative paths resolve against.
struct Project {
    config: SymsubConfig,
    base_dir: PathBuf,
}

/// The project named by `-p`, or `symsub.json` in the working directory
/// when it exists.
fn load_project(explicit: Option<&Path>) -> Result<Option<Project>, i32> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None if Path::new(CONFIG_FILE_NAME).exists() => PathBuf::from(CONFIG_FILE_NAME),
        None => return Ok(None),
    };
    match symsub_options::parse_config_file(&path) {
        Ok(config) => {
            let base_dir = path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."));
            tracing::debug!(project = %path.display(), "loaded project file");
            Ok(Some(Project { config, base_dir }))
        }
        Err(e) => {
            print_error(&format!("Failed to read project '{}': {}", path.display(), e));
            Err(EXIT_USAGE)
        }
    }
}

fn input_files(files: &[PathBuf], project: Option<&Project>) -> Vec<PathBuf> {
    if !files.is_empty() {
        return files.to_vec();
    }
    project
        .map(|p| p.config.resolved_files(&p.base_dir))
        .unwrap_or_default()
}

/// Input values from `--input`, `--input-file` or the project, in that order.
fn read_input(
    project: Option<&Project>,
    input: Option<&str>,
    input_file: Option<&Path>,
) -> Result<serde_json::Value, Failure> {
    let text = match (input, input_file) {
        (Some(text), _) => text.to_string(),
        (None, Some(path)) => read_source(path)?,
        (None, None) => {
            let values = project.and_then(|p| p.config.input.clone()).unwrap_or_default();
            return Ok(serde_json::Value::Object(values));
        }
    };
    serde_json::from_str(&text).map_err(|e| Failure::Usage(format!("Input is not valid JSON: {}", e)))
}

fn read_source(path: &Path) -> Result<String, Failure> {
    let bytes =
        std::fs::read(path).map_err(|e| Failure::Usage(format!("Cannot read '{}': {}", path.display(), e)))?;
    match simdutf8::basic::from_utf8(&bytes) {
        Ok(text) => Ok(text.to_owned()),
        Err(_) => Err(Failure::Usage(format!("'{}' is not valid UTF-8.", path.display()))),
    }
}

fn watched_files(cli: &Cli) -> Vec<PathBuf> {
    let project = load_project(cli.project.as_deref()).ok().flatten();
    let mut files = match &cli.command {
        Command::Substitute { files, .. } => input_files(files, project.as_ref()),
        Command::Branches { file, input_file, .. } => {
            let mut files: Vec<PathBuf> = file.iter().cloned().collect();
            if files.is_empty() {
                files.extend(input_files(&[], project.as_ref()).into_iter().take(1));
            }
            files.extend(input_file.iter().cloned());
            files
        }
        Command::Parse { file } => vec![file.clone()],
        Command::Init => Vec::new(),
    };
    match &cli.project {
        Some(path) => files.push(path.clone()),
        None if project.is_some() => files.push(PathBuf::from(CONFIG_FILE_NAME)),
        None => {}
    }
    files
}

fn get_latest_mtime(files: &[PathBuf]) -> SystemTime {
    let mut latest = SystemTime::UNIX_EPOCH;
    for f in files {
        if let Ok(metadata) = std::fs::metadata(f) {
            if let Ok(mtime) = metadata.modified() {
                if mtime > latest {
                    latest = mtime;
                }
            }
        }
    }
    latest
}

// ============================================================================
// Reporting
// ============================================================================

enum Failure {
    Usage(String),
    Analysis { error: AnalyzeError, source: String },
}

/// Print a failure and return the exit code it maps to.
fn report_failure(failure: &Failure) -> i32 {
    match failure {
        Failure::Usage(message) => {
            print_error(message);
            EXIT_USAGE
        }
        Failure::Analysis {
            error: AnalyzeError::Syntax(diagnostics),
            source,
        } => {
            print_diagnostics(diagnostics, source);
            EXIT_ANALYSIS
        }
        Failure::Analysis { error, .. } => {
            print_error(&error.to_string());
            EXIT_ANALYSIS
        }
    }
}

fn print_diagnostics(diagnostics: &DiagnosticCollection, source: &str) {
    let use_color = stderr_is_terminal();
    for diag in diagnostics.diagnostics() {
        if use_color {
            print_fancy_diagnostic(diag, source);
        } else {
            eprintln!("{}", diag);
        }
    }

    let count = diagnostics.error_count();
    let plural = if count == 1 { "" } else { "s" };
    if use_color {
        eprintln!("\n{}Found {} error{}.{}", RED, count, plural, RESET);
    } else {
        eprintln!("\nFound {} error{}.", count, plural);
    }
}

/// Render a diagnostic with the offending source line underlined.
fn print_fancy_diagnostic(diag: &symsub_analyzer::Diagnostic, source: &str) {
    use miette::{LabeledSpan, MietteDiagnostic, NamedSource, Report, Severity};

    let (Some(file), Some(span)) = (&diag.file, diag.span) else {
        let color = if diag.is_error() { RED } else { YELLOW };
        eprintln!("{}{}{}{} {}SYM{}{}: {}", BOLD, color, diag.category, RESET, CYAN, diag.code, RESET, diag.message_text);
        return;
    };

    let severity = if diag.is_error() { Severity::Error } else { Severity::Warning };
    let label = LabeledSpan::at(span.start as usize..span.end() as usize, diag.message_text.clone());
    let report = Report::new(
        MietteDiagnostic::new(diag.message_text.clone())
            .with_code(format!("SYM{}", diag.code))
            .with_severity(severity)
            .with_label(label),
    )
    .with_source_code(NamedSource::new(file, source.to_string()));
    eprintln!("{:?}", report);
}

fn print_error(msg: &str) {
    if stderr_is_terminal() {
        eprintln!("{}{}error{}: {}", BOLD, RED, RESET, msg);
    } else {
        eprintln!("error: {}", msg);
    }
}

fn stderr_is_terminal() -> bool {
    #[cfg(unix)]
    {
        unsafe { libc::isatty(2) != 0 }
    }
    #[cfg(not(unix))]
    {
        false
    }
}
