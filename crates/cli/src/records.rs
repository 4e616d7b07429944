// stats, check and normalize commands

use std::path::Path;

use serde::Serialize;
use twincard_config::Settings;
use twincard_engine::ListStatistics;
use twincard_io::{ContactFormat, CsvFile};

use crate::exit_codes::EXIT_CHECK_WARNINGS;
use crate::{check_country_rule, load_list, print_json, print_messages, CliError};

// ============================================================================
// stats
// ============================================================================

#[derive(Serialize)]
struct StatsOutput {
    file: String,
    #[serde(flatten)]
    stats: ListStatistics,
}

pub fn cmd_stats(settings: &Settings, path: &Path, json: bool) -> Result<(), CliError> {
    let (list, report) = load_list(settings, path)?;
    print_messages(path, &report);
    let stats = list.statistics();

    if json {
        return print_json(&StatsOutput {
            file: path.display().to_string(),
            stats,
        });
    }
    println!("{}", path.display());
    print!("{stats}");
    Ok(())
}

// ============================================================================
// check
// ============================================================================

#[derive(Serialize)]
struct CheckOutput<'a> {
    file: String,
    records_read: usize,
    errors: &'a [String],
    warnings: &'a [String],
}

pub fn cmd_check(settings: &Settings, path: &Path, json: bool) -> Result<(), CliError> {
    let (_, report) = load_list(settings, path)?;

    if json {
        print_json(&CheckOutput {
            file: path.display().to_string(),
            records_read: report.records_read,
            errors: &report.errors,
            warnings: &report.warnings,
        })?;
    } else {
        println!(
            "{}: {} records read, {} problems",
            path.display(),
            report.records_read,
            report.errors.len() + report.warnings.len()
        );
        for error in &report.errors {
            println!("  rejected: {error}");
        }
        for warning in &report.warnings {
            println!("  warning:  {warning}");
        }
    }

    if report.has_messages() {
        return Err(CliError::silent(EXIT_CHECK_WARNINGS));
    }
    Ok(())
}

// ============================================================================
// normalize
// ============================================================================

/// Editing steps requested on the command line, applied in field order.
pub struct NormalizeSteps {
    pub split_names: bool,
    pub swap_names: bool,
    pub drop_slashes: bool,
    /// Country rule for international prefixes
    pub intl_prefix: Option<usize>,
    pub trim_names: bool,
}

#[derive(Debug, Default, Serialize)]
struct NormalizeOutput {
    records: usize,
    slashes_dropped: usize,
    names_split: usize,
    names_swapped: usize,
    records_prefixed: usize,
    warnings: Vec<String>,
}

pub fn cmd_normalize(
    settings: &Settings,
    input: &Path,
    output: &Path,
    steps: NormalizeSteps,
    json: bool,
) -> Result<(), CliError> {
    if let Some(rule) = steps.intl_prefix {
        check_country_rule(rule)?;
    }

    let (mut list, report) = load_list(settings, input)?;
    print_messages(input, &report);

    let mut result = NormalizeOutput {
        records: list.len(),
        ..NormalizeOutput::default()
    };
    for item in list.iter_mut() {
        if steps.drop_slashes && item.drop_slashes() {
            result.slashes_dropped += 1;
        }
        if steps.split_names && item.split_names() {
            result.names_split += 1;
        }
        if steps.swap_names && item.swap_names() {
            result.names_swapped += 1;
        }
        if steps.trim_names {
            item.drop_final_empty_names();
        }
        if let Some(rule) = steps.intl_prefix {
            if item.intl_phone_prefix(rule) {
                result.records_prefixed += 1;
            }
        }
        item.calculate_fields();
    }

    let mut writer = CsvFile::new(settings.format_options());
    let export = writer.export_records(output, &list)?;
    print_messages(output, &export);
    result.warnings = export.warnings;

    if json {
        return print_json(&result);
    }
    println!("{} records written to {}", result.records, output.display());
    if steps.drop_slashes {
        println!("  slashes dropped: {}", result.slashes_dropped);
    }
    if steps.split_names {
        println!("  names split:     {}", result.names_split);
    }
    if steps.swap_names {
        println!("  names swapped:   {}", result.names_swapped);
    }
    if steps.intl_prefix.is_some() {
        println!("  phones rewritten in {} records", result.records_prefixed);
    }
    Ok(())
}
