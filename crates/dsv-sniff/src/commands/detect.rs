//! Detect command — confirm the delimiter of one or more files.

use anyhow::bail;
use camino::Utf8PathBuf;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use dsv_sniff_core::config::Config;
use dsv_sniff_core::{DetectOptions, DetectionReport, detect, looks_like_csv_filename};

use super::read_input_file;

/// Arguments for the `detect` subcommand.
#[derive(Args, Debug)]
pub struct DetectArgs {
    /// Files to check.
    #[arg(required = true)]
    pub files: Vec<Utf8PathBuf>,

    /// Delimiter to confirm: a single character, `\t`, or one of
    /// comma, semicolon, tab, pipe.
    #[arg(short, long, value_parser = parse_delimiter_arg)]
    pub delimiter: Option<char>,

    /// Required number of delimiters on the header line.
    #[arg(long, value_name = "N")]
    pub expected_count: Option<usize>,

    /// Reject files where another delimiter outnumbers the requested one.
    #[arg(long)]
    pub reject_competing: bool,

    /// Reject files whose name doesn't end in .csv.
    #[arg(long)]
    pub require_extension: bool,
}

impl DetectArgs {
    /// Merge command-line flags over the configured defaults.
    fn options(&self, config: &Config) -> DetectOptions {
        let mut options = config.detect_options();
        if let Some(delimiter) = self.delimiter {
            options.delimiter = delimiter;
        }
        if let Some(count) = self.expected_count {
            options.expected_delimiter_count = Some(count);
        }
        options.reject_competing |= self.reject_competing;
        options
    }
}

fn parse_delimiter_arg(s: &str) -> Result<char, String> {
    dsv_sniff_core::parse_delimiter(s).ok_or_else(|| {
        format!("expected a single character or one of comma, semicolon, tab, pipe; got {s:?}")
    })
}

/// Result for one file.
#[derive(Debug, Serialize)]
struct FileOutcome {
    file: String,
    #[serde(flatten)]
    report: DetectionReport,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    wrong_extension: bool,
    /// Set when the file could not be read.
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl FileOutcome {
    /// An outcome for a file that was never run through detection.
    fn unchecked(file: &Utf8PathBuf, delimiter: char) -> Self {
        Self {
            file: file.to_string(),
            report: DetectionReport {
                delimiter,
                detected: false,
                rejection: None,
            },
            wrong_extension: false,
            error: None,
        }
    }

    const fn passed(&self) -> bool {
        self.report.detected
    }
}

/// Confirm the requested delimiter in each file.
///
/// Every file is checked even after a failure, including files that can't be
/// read; the command fails at the end if any file was rejected.
#[instrument(name = "cmd_detect", skip_all, fields(files = args.files.len()))]
pub fn cmd_detect(
    args: DetectArgs,
    global_json: bool,
    config: &Config,
    max_input_bytes: Option<usize>,
) -> anyhow::Result<()> {
    let options = args.options(config);
    let require_extension = args.require_extension || config.require_csv_extension;
    debug!(?options, require_extension, "executing detect command");

    let progress = if global_json || args.files.len() < 2 {
        ProgressBar::hidden()
    } else {
        let bar = ProgressBar::new(args.files.len() as u64);
        bar.set_style(ProgressStyle::with_template(
            "{spinner} [{bar:30}] {pos}/{len} {msg}",
        )?);
        bar
    };

    let mut outcomes = Vec::with_capacity(args.files.len());
    for file in &args.files {
        progress.set_message(file.to_string());
        let outcome = check_file(file, &options, require_extension, max_input_bytes);
        if !global_json {
            progress.suspend(|| print_outcome(&outcome));
        }
        outcomes.push(outcome);
        progress.inc(1);
    }
    progress.finish_and_clear();

    if global_json {
        println!("{}", serde_json::to_string_pretty(&outcomes)?);
    }

    let rejected = outcomes.iter().filter(|o| !o.passed()).count();
    let unreadable = outcomes.iter().filter(|o| o.error.is_some()).count();
    info!(checked = outcomes.len(), rejected, unreadable, "detect finished");
    if unreadable > 0 {
        bail!(
            "{rejected} of {} file(s) failed ({unreadable} could not be read)",
            outcomes.len()
        );
    }
    if rejected > 0 {
        bail!(
            "{rejected} of {} file(s) not consistently delimited by {:?}",
            outcomes.len(),
            options.delimiter
        );
    }
    Ok(())
}

fn check_file(
    file: &Utf8PathBuf,
    options: &DetectOptions,
    require_extension: bool,
    max_input_bytes: Option<usize>,
) -> FileOutcome {
    if require_extension && !looks_like_csv_filename(file.as_str()) {
        debug!(%file, "skipping file without .csv extension");
        return FileOutcome {
            wrong_extension: true,
            ..FileOutcome::unchecked(file, options.delimiter)
        };
    }

    let content = match read_input_file(file, max_input_bytes) {
        Ok(content) => content,
        Err(err) => {
            warn!(%file, error = %err, "could not read input");
            return FileOutcome {
                error: Some(format!("{err:#}")),
                ..FileOutcome::unchecked(file, options.delimiter)
            };
        }
    };
    let detection = detect(&content, options);
    debug!(%file, ?detection, "file checked");

    FileOutcome {
        report: DetectionReport::new(options.delimiter, detection),
        ..FileOutcome::unchecked(file, options.delimiter)
    }
}

fn print_outcome(outcome: &FileOutcome) {
    if outcome.passed() {
        println!(
            "{} {} (delimiter {:?})",
            "PASS:".green(),
            outcome.file,
            outcome.report.delimiter
        );
    } else if let Some(err) = &outcome.error {
        println!("{} {}: {err}", "FAIL:".red(), outcome.file);
    } else if outcome.wrong_extension {
        println!("{} {}: not a .csv file", "FAIL:".red(), outcome.file);
    } else if let Some(reason) = outcome.report.rejection {
        println!("{} {}: {reason}", "FAIL:".red(), outcome.file);
    } else {
        println!("{} {}", "FAIL:".red(), outcome.file);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> DetectArgs {
        DetectArgs {
            files: vec![Utf8PathBuf::from("data.csv")],
            delimiter: None,
            expected_count: None,
            reject_competing: false,
            require_extension: false,
        }
    }

    #[test]
    fn delimiter_arg_accepts_names_and_chars() {
        assert_eq!(parse_delimiter_arg("pipe"), Ok('|'));
        assert_eq!(parse_delimiter_arg(","), Ok(','));
        assert!(parse_delimiter_arg("ab").is_err());
    }

    #[test]
    fn flags_override_config() {
        let config = Config {
            delimiter: Some(','),
            expected_delimiter_count: Some(2),
            ..Config::default()
        };
        let mut a = args();
        a.delimiter = Some('|');
        a.reject_competing = true;

        let options = a.options(&config);
        assert_eq!(options.delimiter, '|');
        assert_eq!(options.expected_delimiter_count, Some(2));
        assert!(options.reject_competing);
    }

    #[test]
    fn config_used_when_flags_absent() {
        let config = Config {
            delimiter: Some('\t'),
            reject_competing: true,
            ..Config::default()
        };
        let options = args().options(&config);
        assert_eq!(options.delimiter, '\t');
        assert!(options.reject_competing);
    }

    #[test]
    fn wrong_extension_is_rejected_without_reading() {
        let file = Utf8PathBuf::from("/does/not/exist.txt");
        let outcome = check_file(&file, &DetectOptions::default(), true, None);
        assert!(!outcome.passed());
        assert!(outcome.wrong_extension);
    }

    #[test]
    fn outcome_json_is_flat() {
        let outcome = FileOutcome {
            file: "a.csv".to_string(),
            report: DetectionReport::new(
                ';',
                detect("a;b\n1;2", &DetectOptions::default()),
            ),
            wrong_extension: false,
            error: None,
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["file"], "a.csv");
        assert_eq!(json["detected"], true);
        assert!(json.get("wrong_extension").is_none());
        assert!(json.get("error").is_none());
    }

    #[test]
    fn unreadable_file_becomes_failed_outcome() {
        let file = Utf8PathBuf::from("/does/not/exist.csv");
        let outcome = check_file(&file, &DetectOptions::default(), false, None);
        assert!(!outcome.passed());
        assert!(!outcome.wrong_extension);
        let err = outcome.error.as_deref().unwrap();
        assert!(err.contains("failed to read /does/not/exist.csv"), "{err}");
    }

    #[test]
    fn oversized_file_becomes_failed_outcome() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("big.csv");
        std::fs::write(&path, "a;b\n1;2\n").unwrap();
        let file = Utf8PathBuf::try_from(path).unwrap();

        let outcome = check_file(&file, &DetectOptions::default(), false, Some(4));
        assert!(outcome.error.as_deref().unwrap().contains("input too large"));
    }
}
