//! Name command — check file names for a `.csv` suffix.

use anyhow::bail;
use clap::Args;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument};

use dsv_sniff_core::looks_like_csv_filename;

/// Arguments for the `name` subcommand.
#[derive(Args, Debug)]
pub struct NameArgs {
    /// File names to check. Only the string is inspected.
    #[arg(required = true)]
    pub names: Vec<String>,
}

#[derive(Debug, Serialize)]
struct NameCheck<'a> {
    name: &'a str,
    looks_like_csv: bool,
}

/// Report whether each name looks like a CSV file name.
#[instrument(name = "cmd_name", skip_all, fields(names = args.names.len()))]
pub fn cmd_name(args: NameArgs, global_json: bool) -> anyhow::Result<()> {
    debug!("executing name command");

    let checks: Vec<NameCheck<'_>> = args
        .names
        .iter()
        .map(|name| NameCheck {
            name,
            looks_like_csv: looks_like_csv_filename(name),
        })
        .collect();

    if global_json {
        println!("{}", serde_json::to_string_pretty(&checks)?);
    } else {
        for check in &checks {
            if check.looks_like_csv {
                println!("{} {}", "PASS:".green(), check.name);
            } else {
                println!("{} {}", "FAIL:".red(), check.name);
            }
        }
    }

    let failed = checks.iter().filter(|c| !c.looks_like_csv).count();
    if failed > 0 {
        bail!("{failed} name(s) do not end in .csv");
    }
    Ok(())
}
