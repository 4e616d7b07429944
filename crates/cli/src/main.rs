// twincard CLI - compare, inspect and normalize address-book files

mod compare;
mod exit_codes;
mod records;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;
use twincard_config::{ConfigError, Settings};
use twincard_engine::phone::COUNTRY_RULES;
use twincard_engine::ContactList;
use twincard_io::{detect_format, FormatError, ImportReport};

use exit_codes::{format_exit_code, EXIT_CONFIG, EXIT_ERROR, EXIT_FORMAT, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "twincard")]
#[command(about = "Compare, inspect and normalize address-book files")]
#[command(version)]
#[command(long_version = long_version())]
struct Cli {
    /// Settings file (default: settings.json in the user config directory)
    #[arg(long, global = true, env = "TWINCARD_CONFIG", value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log decisions to stderr (TWINCARD_LOG overrides)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pair the records of two contact files
    #[command(after_help = "\
Examples:
  twincard compare phone.csv backup.csv
  twincard compare phone.csv backup.csv --level 1 --summary
  twincard compare old.csv new.csv --country-rule 0 --json
  twincard compare a.csv b.csv --fail-on-unpaired && echo 'all paired'")]
    Compare {
        /// Primary file; its order drives the scan
        primary: PathBuf,

        /// Secondary file
        secondary: PathBuf,

        /// Similarity strictness, 1 (loosest) to 5 (strictest)
        #[arg(long, short = 'l', value_parser = clap::value_parser!(u8).range(1..=5))]
        level: Option<u8>,

        /// Expand national phone numbers with this rule before comparing
        #[arg(long, value_name = "INDEX")]
        country_rule: Option<usize>,

        /// Print only the counts
        #[arg(long)]
        summary: bool,

        /// Output JSON
        #[arg(long)]
        json: bool,

        /// Exit with code 10 when any record stays unpaired
        #[arg(long)]
        fail_on_unpaired: bool,
    },

    /// Show record and field counts of a contact file
    Stats {
        file: PathBuf,

        /// Output JSON
        #[arg(long)]
        json: bool,
    },

    /// Import a contact file and report rejected rows and warnings
    #[command(after_help = "\
Exits with code 6 when the file has rejected rows or warnings.")]
    Check {
        file: PathBuf,

        /// Output JSON
        #[arg(long)]
        json: bool,
    },

    /// Clean up records and write them as a generic CSV file
    #[command(after_help = "\
Examples:
  twincard normalize phone.csv -o clean.csv --split-names --trim-names
  twincard normalize phone.csv -o clean.csv --intl-prefix --country-rule 1
  twincard normalize export.csv -o fixed.csv --drop-slashes --swap-names")]
    Normalize {
        input: PathBuf,

        /// Output file (generic CSV)
        #[arg(long, short = 'o')]
        output: PathBuf,

        /// Fill structured names from the full name where they are missing
        #[arg(long)]
        split_names: bool,

        /// Swap given and family names
        #[arg(long)]
        swap_names: bool,

        /// Remove stray backslashes from text fields
        #[arg(long)]
        drop_slashes: bool,

        /// Rewrite national phone numbers into international form
        #[arg(long)]
        intl_prefix: bool,

        /// Country rule for --intl-prefix (default: saving.defaultCountryRule)
        #[arg(long, value_name = "INDEX")]
        country_rule: Option<usize>,

        /// Drop trailing empty name slots
        #[arg(long)]
        trim_names: bool,

        /// Output JSON
        #[arg(long)]
        json: bool,
    },

    /// List the country rules used for phone canonicalization
    CountryRules {
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("GIT_COMMIT_HASH"), ")",
        "\ntarget:  ", env!("TARGET"),
    )
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = load_settings(cli.config.as_deref()).and_then(|settings| match cli.command {
        Commands::Compare {
            primary,
            secondary,
            level,
            country_rule,
            summary,
            json,
            fail_on_unpaired,
        } => compare::cmd_compare(
            &settings,
            &primary,
            &secondary,
            level,
            country_rule,
            summary,
            json,
            fail_on_unpaired,
        ),
        Commands::Stats { file, json } => records::cmd_stats(&settings, &file, json),
        Commands::Check { file, json } => records::cmd_check(&settings, &file, json),
        Commands::Normalize {
            input,
            output,
            split_names,
            swap_names,
            drop_slashes,
            intl_prefix,
            country_rule,
            trim_names,
            json,
        } => records::cmd_normalize(
            &settings,
            &input,
            &output,
            records::NormalizeSteps {
                split_names,
                swap_names,
                drop_slashes,
                intl_prefix: intl_prefix.then(|| country_rule.unwrap_or(settings.default_country_rule)),
                trim_names,
            },
            json,
        ),
        Commands::CountryRules { json } => cmd_country_rules(json),
    });

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

/// Route `log` records from the library crates to stderr.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("TWINCARD_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn new(code: u8, msg: impl Into<String>) -> Self {
        Self { code, message: msg.into(), hint: None }
    }

    pub fn args(msg: impl Into<String>) -> Self {
        Self::new(EXIT_USAGE, msg)
    }

    pub fn general(msg: impl Into<String>) -> Self {
        Self::new(EXIT_ERROR, msg)
    }

    /// Exit with `code` without printing anything.
    pub fn silent(code: u8) -> Self {
        Self::new(code, "")
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<FormatError> for CliError {
    fn from(err: FormatError) -> Self {
        let hint = match &err {
            FormatError::UnknownFormat(_) => Some("supported: CSV (Explay export, generic columns)".to_string()),
            FormatError::ReadOnly(_) => Some("write a generic CSV instead".to_string()),
            _ => None,
        };
        Self { code: format_exit_code(&err), message: err.to_string(), hint }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        Self::new(EXIT_CONFIG, err.to_string()).with_hint(format!(
            "fix or remove {}",
            Settings::config_path().display()
        ))
    }
}

fn load_settings(path: Option<&Path>) -> Result<Settings, CliError> {
    match path {
        Some(path) => Ok(Settings::load_from(path)?),
        None => Ok(Settings::load()),
    }
}

/// Detect the format of `path` and import it into a fresh list.
pub(crate) fn load_list(settings: &Settings, path: &Path) -> Result<(ContactList, ImportReport), CliError> {
    let options = settings.format_options();
    let mut format = detect_format(path, &options).ok_or_else(|| {
        CliError::new(EXIT_FORMAT, format!("unrecognized contact file: {}", path.display()))
            .with_hint("supported: CSV (Explay export, generic columns)")
    })?;
    let mut list = ContactList::new();
    let report = format.import_records(path, &mut list, false)?;
    log::debug!("{}: {} records read as {}", path.display(), report.records_read, format.name());
    Ok((list, report))
}

pub(crate) fn check_country_rule(rule: usize) -> Result<(), CliError> {
    if rule >= COUNTRY_RULES.len() {
        return Err(CliError::args(format!("unknown country rule {rule}"))
            .with_hint("see `twincard country-rules`"));
    }
    Ok(())
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::general(format!("cannot render JSON: {e}")))?;
    println!("{text}");
    Ok(())
}

pub(crate) fn print_messages(path: &Path, report: &ImportReport) {
    for error in &report.errors {
        eprintln!("rejected: {}: {}", path.display(), error);
    }
    for warning in &report.warnings {
        eprintln!("warning: {}: {}", path.display(), warning);
    }
}

// ============================================================================
// country-rules
// ============================================================================

#[derive(Serialize)]
struct CountryRuleEntry {
    index: usize,
    name: &'static str,
    country_code: &'static str,
    trunk_prefix: &'static str,
    subscriber_digits: usize,
}

fn cmd_country_rules(json: bool) -> Result<(), CliError> {
    if json {
        let entries: Vec<CountryRuleEntry> = COUNTRY_RULES
            .iter()
            .enumerate()
            .map(|(index, rule)| CountryRuleEntry {
                index,
                name: rule.name,
                country_code: rule.country_code,
                trunk_prefix: rule.trunk_prefix,
                subscriber_digits: rule.subscriber_digits,
            })
            .collect();
        return print_json(&entries);
    }

    for (index, name) in twincard_engine::phone::available_country_rules().iter().enumerate() {
        println!("{index}  {name}");
    }
    Ok(())
}
