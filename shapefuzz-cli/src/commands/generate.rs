use crate::commands::{digest, read_input};
use anyhow::{Context, Result};
use colored::*;
use serde::Serialize;
use shapefuzz_core::{aggregate, Config, Generator};
use std::collections::BTreeMap;
use std::fs;
use tracing::{info, warn};

/// Shape used to exercise every generation path from the command line
#[derive(Debug, Default, Serialize)]
pub struct SampleRecord {
    pub name: String,
    pub id: u64,
    pub enabled: bool,
    pub score: f64,
    pub tags: Vec<String>,
    pub payload: Vec<u8>,
    pub attributes: BTreeMap<String, i32>,
    pub window: [u16; 2],
    pub parent: Option<Box<SampleRecord>>,
}

aggregate!(SampleRecord {
    name,
    id,
    enabled,
    score,
    tags,
    payload,
    attributes,
    window,
    parent,
});

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Generated,
    Skipped,
}

#[derive(Debug, Serialize)]
pub struct GenerateReport {
    pub digest: String,
    pub consumed: usize,
    pub outcome: Outcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<SampleRecord>,
}

/// Load a generator configuration from a JSON file
pub fn load_config(path: &str) -> Result<Config> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read config file: {}", path))?;
    let config: Config = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path))?;
    config
        .validate()
        .with_context(|| format!("Invalid config file: {}", path))?;
    Ok(config)
}

/// Populate a [`SampleRecord`] from `data`
///
/// Running out of bytes is reported as a skipped input; any other failure is
/// an error.
pub fn run(data: &[u8], config: Config) -> Result<GenerateReport> {
    let digest = digest(data);
    let mut generator = Generator::with_config(data.to_vec(), config)?;

    match generator.generate::<SampleRecord>() {
        Ok(record) => Ok(GenerateReport {
            digest,
            consumed: generator.consumed(),
            outcome: Outcome::Generated,
            reason: None,
            record: Some(record),
        }),
        Err(e) if e.is_insufficient_bytes() => Ok(GenerateReport {
            digest,
            consumed: generator.consumed(),
            outcome: Outcome::Skipped,
            reason: Some(e.to_string()),
            record: None,
        }),
        Err(e) => Err(e).context("Generation failed"),
    }
}

pub fn execute(input: &str, config: Option<&str>, output: Option<&str>) -> Result<()> {
    info!("Generating sample record from: {}", input);

    let config = match config {
        Some(path) => load_config(path)?,
        None => Config::default(),
    };
    let data = read_input(input)?;
    let report = run(&data, config)?;

    if let Outcome::Skipped = report.outcome {
        warn!(
            "Input skipped after {} bytes: {}",
            report.consumed,
            report.reason.as_deref().unwrap_or("insufficient bytes")
        );
    }

    let rendered = serde_json::to_string_pretty(&report)
        .with_context(|| "Failed to serialize generation report")?;

    if let Some(output_path) = output {
        fs::write(output_path, rendered)
            .with_context(|| format!("Failed to write output file: {}", output_path))?;
        info!("Generation report written to: {}", output_path);
    } else {
        println!("{}", rendered);
    }

    match report.outcome {
        Outcome::Generated => println!(
            "{} Generated ({} bytes consumed)",
            "✓".green(),
            report.consumed
        ),
        Outcome::Skipped => println!(
            "{} Skipped ({} bytes consumed)",
            "✗".yellow(),
            report.consumed
        ),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shapefuzz_core::UnknownStrategy;

    #[test]
    fn test_run_skips_short_input() {
        let report = run(b"\x05ab", Config::default()).unwrap();
        assert!(matches!(report.outcome, Outcome::Skipped));
        assert!(report.record.is_none());
    }

    #[test]
    fn test_run_generates_with_shallow_depth() {
        // the root sits at depth zero, so every field is cut off
        let config = Config {
            max_depth: 1,
            unknown_shapes: UnknownStrategy::Fail,
            ..Config::default()
        };
        let report = run(b"", config).unwrap();
        assert!(matches!(report.outcome, Outcome::Generated));
        assert_eq!(report.consumed, 0);
    }
}
