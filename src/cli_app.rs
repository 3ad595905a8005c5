//! Top-level CLI definition and dispatch.

use std::fs;
use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};

use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell as CompletionShell, generate};
use colored::{ColoredString, Colorize, control};
use serde_json::{Value, json};
use thiserror::Error;

use seclab_notebook::analyzer::engine::AnalyzerEngine;
use seclab_notebook::analyzer::findings::Severity;
use seclab_notebook::core::config::Config;
use seclab_notebook::logger::jsonl::{EventLevel, EventType, JsonlConfig, JsonlWriter, LogEntry};
use seclab_notebook::store::notebook::Notebook;
use seclab_notebook::store::records::{AnalysisResult, Artifact, ArtifactDraft, FileType};

/// Seclab Notebook — session record keeper and log analyzer for lab coursework.
#[derive(Debug, Parser)]
#[command(
    name = "sln",
    author,
    version,
    about = "Seclab Notebook - Lab Artifact Analyzer",
    long_about = None,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Override config file path.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Force JSON output mode.
    #[arg(long, global = true)]
    json: bool,
    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,
    /// Increase verbosity.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,
    /// Quiet mode (severity lines only).
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
    /// Subcommand to execute.
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Ingest files as artifacts and run the heuristic analyzer.
    Analyze(AnalyzeArgs),
    /// View and validate configuration state.
    Config(ConfigArgs),
    /// Generate shell completions.
    Completions(CompletionsArgs),
}

#[derive(Debug, Clone, Args)]
struct AnalyzeArgs {
    /// Files to ingest and analyze.
    #[arg(required = true, value_name = "FILE")]
    files: Vec<PathBuf>,
    /// Force a declared file type instead of inferring it from the extension.
    #[arg(long, value_enum, value_name = "TYPE")]
    file_type: Option<FileTypeArg>,
    /// Notes attached to every ingested artifact.
    #[arg(long, value_name = "TEXT")]
    notes: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FileTypeArg {
    Log,
    Pcap,
    Screenshot,
    Other,
}

impl From<FileTypeArg> for FileType {
    fn from(value: FileTypeArg) -> Self {
        match value {
            FileTypeArg::Log => Self::Log,
            FileTypeArg::Pcap => Self::Pcap,
            FileTypeArg::Screenshot => Self::Screenshot,
            FileTypeArg::Other => Self::Other,
        }
    }
}

#[derive(Debug, Clone, Args)]
struct ConfigArgs {
    #[command(subcommand)]
    command: Option<ConfigCommand>,
}

#[derive(Debug, Clone, Subcommand)]
enum ConfigCommand {
    /// Print the effective config file path.
    Path,
    /// Print the effective configuration.
    Show,
    /// Load and validate the configuration.
    Validate,
}

#[derive(Debug, Clone, Args)]
struct CompletionsArgs {
    /// Shell to generate completion script for.
    #[arg(value_enum)]
    shell: CompletionShell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    Human,
    Json,
}

/// CLI error type with explicit exit-code mapping.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid user input at runtime.
    #[error("{0}")]
    User(String),
    /// Environment/runtime failure.
    #[error("{0}")]
    Runtime(String),
    /// Internal bug or invariant violation.
    #[error("{0}")]
    Internal(String),
    /// Operation partially succeeded.
    #[error("{0}")]
    Partial(String),
    /// JSON serialization failed.
    #[error("failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),
    /// Output write failed.
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

impl CliError {
    /// Process exit code contract for the CLI.
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::User(_) => 1,
            Self::Runtime(_) | Self::Io(_) => 2,
            Self::Internal(_) | Self::Json(_) => 3,
            Self::Partial(_) => 4,
        }
    }
}

/// Dispatch CLI commands.
pub fn run(cli: &Cli) -> Result<(), CliError> {
    if cli.no_color {
        control::set_override(false);
    }

    match &cli.command {
        Command::Analyze(args) => run_analyze(cli, args),
        Command::Config(args) => run_config(cli, args),
        Command::Completions(args) => {
            let mut command = Cli::command();
            let binary_name = command.get_name().to_string();
            generate(args.shell, &mut command, binary_name, &mut io::stdout());
            Ok(())
        }
    }
}

fn run_analyze(cli: &Cli, args: &AnalyzeArgs) -> Result<(), CliError> {
    let config = load_config(cli)?;
    let engine =
        AnalyzerEngine::new(&config.analyzer).map_err(|e| CliError::Internal(e.to_string()))?;
    let notebook = Notebook::new();
    let mut activity = JsonlWriter::open(JsonlConfig {
        path: config.paths.activity_log.clone(),
        ..JsonlConfig::default()
    });
    activity.write_entry(&LogEntry::new(EventType::SessionStart, EventLevel::Info));

    let mode = output_mode(cli);
    let mut failures: Vec<String> = Vec::new();
    let mut analyzed = 0usize;

    for path in &args.files {
        let content = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                let mut entry = LogEntry::new(EventType::Error, EventLevel::Warning);
                entry.filename = Some(path.display().to_string());
                entry.error_message = Some(e.to_string());
                activity.write_entry(&entry);
                eprintln!("sln: cannot read {}: {e}", path.display());
                failures.push(path.display().to_string());
                continue;
            }
        };

        let filename = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().to_string());
        let file_type = args
            .file_type
            .map_or_else(|| infer_file_type(path), FileType::from);

        let artifact = notebook.add_artifact(ArtifactDraft {
            filename,
            file_type,
            content,
            notes: args.notes.clone().unwrap_or_default(),
            related_service: None,
            related_attack: None,
        });
        let mut entry = LogEntry::new(EventType::ArtifactIngest, EventLevel::Info);
        entry.record_id = Some(artifact.id.clone());
        entry.filename = Some(artifact.filename.clone());
        activity.write_entry(&entry);

        let result = notebook
            .analyze(&engine, &artifact.id)
            .map_err(|e| CliError::Internal(e.to_string()))?;
        let mut entry = LogEntry::new(EventType::AnalysisComplete, analysis_level(result.severity));
        entry.record_id = Some(result.id.clone());
        entry.filename = Some(artifact.filename.clone());
        entry.severity = Some(result.severity);
        entry.summary = Some(result.summary.clone());
        activity.write_entry(&entry);

        match mode {
            OutputMode::Human => print_result_human(cli, &artifact, &result)?,
            OutputMode::Json => {
                let payload = json!({
                    "artifact": serde_json::to_value(&artifact)?,
                    "result": serde_json::to_value(&result)?,
                });
                write_json_line(&payload)?;
            }
        }
        analyzed += 1;
    }

    if !failures.is_empty() {
        let detail = format!(
            "analyzed {analyzed} of {} files; unreadable: {}",
            args.files.len(),
            failures.join(", ")
        );
        return if analyzed == 0 {
            Err(CliError::Runtime(detail))
        } else {
            Err(CliError::Partial(detail))
        };
    }
    Ok(())
}

fn print_result_human(cli: &Cli, artifact: &Artifact, result: &AnalysisResult) -> Result<(), CliError> {
    let mut stdout = io::stdout().lock();
    writeln!(
        stdout,
        "{}  [{}]  severity: {}",
        artifact.filename.bold(),
        artifact.file_type,
        severity_colored(result.severity)
    )?;
    if cli.quiet {
        return Ok(());
    }

    writeln!(stdout, "  {}", result.summary)?;
    if !result.findings.patterns.is_empty() {
        writeln!(stdout, "  patterns:")?;
        for pattern in &result.findings.patterns {
            writeln!(stdout, "    - {pattern}")?;
        }
    }
    if !result.findings.keywords.is_empty() {
        let rendered: Vec<String> = result
            .findings
            .keywords
            .iter()
            .map(|hit| format!("{}={}", hit.keyword, hit.count))
            .collect();
        writeln!(stdout, "  keywords: {}", rendered.join(", "))?;
    }
    if cli.verbose {
        writeln!(stdout, "  sha256: {}", artifact.sha256)?;
        writeln!(stdout, "  size: {} bytes", artifact.size_bytes)?;
        writeln!(
            stdout,
            "  findings: {}",
            serde_json::to_string(&result.findings)?
        )?;
    }
    Ok(())
}

fn run_config(cli: &Cli, args: &ConfigArgs) -> Result<(), CliError> {
    match args.command.as_ref().unwrap_or(&ConfigCommand::Show) {
        ConfigCommand::Path => {
            let path = cli
                .config
                .clone()
                .unwrap_or_else(Config::default_path);
            println!("{}", path.display());
            Ok(())
        }
        ConfigCommand::Show => {
            let config = load_config(cli)?;
            match output_mode(cli) {
                OutputMode::Human => {
                    let rendered = toml::to_string_pretty(&config)
                        .map_err(|e| CliError::Internal(e.to_string()))?;
                    print!("{rendered}");
                }
                OutputMode::Json => {
                    write_json_line(&serde_json::to_value(&config)?)?;
                }
            }
            Ok(())
        }
        ConfigCommand::Validate => {
            let config = load_config(cli)?;
            match output_mode(cli) {
                OutputMode::Human => {
                    println!("configuration OK: {}", config.paths.config_file.display());
                }
                OutputMode::Json => {
                    write_json_line(&json!({
                        "ok": true,
                        "config_file": config.paths.config_file,
                    }))?;
                }
            }
            Ok(())
        }
    }
}

fn load_config(cli: &Cli) -> Result<Config, CliError> {
    Config::load(cli.config.as_deref()).map_err(|e| CliError::User(e.to_string()))
}

fn analysis_level(severity: Severity) -> EventLevel {
    match severity {
        Severity::Low | Severity::Medium => EventLevel::Info,
        Severity::High => EventLevel::Warning,
        Severity::Critical => EventLevel::Critical,
    }
}

fn severity_colored(severity: Severity) -> ColoredString {
    match severity {
        Severity::Low => severity.label().green(),
        Severity::Medium => severity.label().yellow(),
        Severity::High => severity.label().red(),
        Severity::Critical => severity.label().red().bold(),
    }
}

/// Infer a declared file type from the path extension. The analyzer treats
/// unknown extensions as generic content.
fn infer_file_type(path: &Path) -> FileType {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "log" | "txt" => FileType::Log,
        "pcap" | "pcapng" | "cap" => FileType::Pcap,
        "png" | "jpg" | "jpeg" | "gif" | "bmp" => FileType::Screenshot,
        _ => FileType::Other,
    }
}

fn write_json_line(payload: &Value) -> Result<(), CliError> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer(&mut stdout, payload)?;
    writeln!(stdout)?;
    Ok(())
}

fn output_mode(cli: &Cli) -> OutputMode {
    let env_mode = std::env::var("SLN_OUTPUT_FORMAT").ok();
    resolve_output_mode(cli.json, env_mode.as_deref(), io::stdout().is_terminal())
}

fn resolve_output_mode(json_flag: bool, env_mode: Option<&str>, stdout_is_tty: bool) -> OutputMode {
    if json_flag {
        return OutputMode::Json;
    }

    let fallback = if stdout_is_tty {
        OutputMode::Human
    } else {
        OutputMode::Json
    };

    match env_mode {
        Some("json") => OutputMode::Json,
        Some("human") => OutputMode::Human,
        _ => fallback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn output_mode_resolution_honors_precedence() {
        assert_eq!(
            resolve_output_mode(true, Some("human"), true),
            OutputMode::Json
        );
        assert_eq!(
            resolve_output_mode(false, Some("json"), true),
            OutputMode::Json
        );
        assert_eq!(
            resolve_output_mode(false, Some("human"), false),
            OutputMode::Human
        );
        assert_eq!(resolve_output_mode(false, None, true), OutputMode::Human);
        assert_eq!(resolve_output_mode(false, None, false), OutputMode::Json);
        assert_eq!(
            resolve_output_mode(false, Some("auto"), false),
            OutputMode::Json
        );
    }

    #[test]
    fn file_type_inference_covers_lab_uploads() {
        assert_eq!(infer_file_type(Path::new("auth.log")), FileType::Log);
        assert_eq!(infer_file_type(Path::new("NOTES.TXT")), FileType::Log);
        assert_eq!(infer_file_type(Path::new("cap.pcapng")), FileType::Pcap);
        assert_eq!(
            infer_file_type(Path::new("shot.PNG")),
            FileType::Screenshot
        );
        assert_eq!(infer_file_type(Path::new("mystery.bin")), FileType::Other);
        assert_eq!(infer_file_type(Path::new("no_extension")), FileType::Other);
    }

    #[test]
    fn exit_codes_follow_the_contract() {
        assert_eq!(CliError::User(String::new()).exit_code(), 1);
        assert_eq!(CliError::Runtime(String::new()).exit_code(), 2);
        assert_eq!(CliError::Internal(String::new()).exit_code(), 3);
        assert_eq!(CliError::Partial(String::new()).exit_code(), 4);
    }

    #[test]
    fn analysis_levels_track_severity() {
        assert_eq!(analysis_level(Severity::Low), EventLevel::Info);
        assert_eq!(analysis_level(Severity::High), EventLevel::Warning);
        assert_eq!(analysis_level(Severity::Critical), EventLevel::Critical);
    }
}
