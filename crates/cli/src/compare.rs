// compare command

use std::path::Path;

use serde::Serialize;
use twincard_config::Settings;
use twincard_engine::{ContactList, PairState};
use twincard_recon::{compare_with, pair_entries, CompareSummary, PairEntry};

use crate::exit_codes::EXIT_COMPARE_UNPAIRED;
use crate::{check_country_rule, load_list, print_json, print_messages, CliError};

#[derive(Serialize)]
struct CompareOutput<'a> {
    primary_file: String,
    secondary_file: String,
    summary: &'a CompareSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    primary: Option<Vec<PairEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    secondary: Option<Vec<PairEntry>>,
}

#[allow(clippy::too_many_arguments)]
pub fn cmd_compare(
    settings: &Settings,
    primary_path: &Path,
    secondary_path: &Path,
    level: Option<u8>,
    country_rule: Option<usize>,
    summary_only: bool,
    json: bool,
    fail_on_unpaired: bool,
) -> Result<(), CliError> {
    let mut options = settings.compare_options();
    if let Some(level) = level {
        options.level = level;
    }
    if let Some(rule) = country_rule {
        check_country_rule(rule)?;
        options.country_rule = Some(rule);
    }
    options
        .validate()
        .map_err(|e| CliError::args(e.to_string()))?;

    let (mut primary, primary_report) = load_list(settings, primary_path)?;
    let (mut secondary, secondary_report) = load_list(settings, secondary_path)?;
    print_messages(primary_path, &primary_report);
    print_messages(secondary_path, &secondary_report);

    let summary = compare_with(&mut primary, &mut secondary, &options);

    if json {
        let output = CompareOutput {
            primary_file: primary_path.display().to_string(),
            secondary_file: secondary_path.display().to_string(),
            summary: &summary,
            primary: (!summary_only).then(|| pair_entries(&primary)),
            secondary: (!summary_only).then(|| pair_entries(&secondary)),
        };
        print_json(&output)?;
    } else {
        print_summary(primary_path, secondary_path, &summary);
        if !summary_only {
            print_pairs(&primary, &secondary, secondary_path);
        }
    }

    if fail_on_unpaired && (summary.primary_unpaired > 0 || summary.secondary_unpaired > 0) {
        return Err(CliError::silent(EXIT_COMPARE_UNPAIRED));
    }
    Ok(())
}

fn print_summary(primary_path: &Path, secondary_path: &Path, summary: &CompareSummary) {
    println!(
        "{} ({} records) vs {} ({} records), level {}",
        primary_path.display(),
        summary.primary_records,
        secondary_path.display(),
        summary.secondary_records,
        summary.level,
    );
    println!("  identical: {}", summary.identical);
    println!("  similar:   {}", summary.similar);
    println!(
        "  unpaired:  {} primary, {} secondary",
        summary.primary_unpaired, summary.secondary_unpaired
    );
}

fn print_pairs(primary: &ContactList, secondary: &ContactList, secondary_path: &Path) {
    println!();
    for (index, item) in primary.iter().enumerate() {
        match primary.pair_of(index, secondary) {
            Some(pair) => println!(
                "{index:>4}  {:<9}  {}  <->  {}",
                item.pair_state.to_string(),
                item.visible_name,
                pair.visible_name
            ),
            None => println!("{index:>4}  {:<9}  {}", PairState::NotFound.to_string(), item.visible_name),
        }
    }

    let orphans: Vec<(usize, &str)> = secondary
        .iter()
        .enumerate()
        .filter(|(_, item)| item.pair_state == PairState::NotFound)
        .map(|(index, item)| (index, item.visible_name.as_str()))
        .collect();
    if !orphans.is_empty() {
        println!();
        println!("Only in {}:", secondary_path.display());
        for (index, name) in orphans {
            println!("{index:>4}  {name}");
        }
    }
}
