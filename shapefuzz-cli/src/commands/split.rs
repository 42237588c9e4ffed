use crate::commands::{digest, read_input};
use anyhow::{Context, Result};
use colored::*;
use serde::Serialize;
use shapefuzz_core::ByteCursor;
use tracing::info;

#[derive(Debug, Serialize)]
pub struct PlannedCall {
    pub index: usize,
    pub selector: u8,
    pub arguments: String,
}

#[derive(Debug, Serialize)]
pub struct SplitReport {
    pub digest: String,
    pub number_of_calls: usize,
    pub chunk_len: usize,
    pub calls: Vec<PlannedCall>,
}

/// Split `data` into per-call selectors and argument chunks
pub fn plan(data: &[u8], min_calls: usize, max_calls: usize) -> Result<SplitReport> {
    let cursor = ByteCursor::new(data.to_vec());
    let plan = cursor.split_calls(min_calls, max_calls).with_context(|| {
        format!("Input cannot be split into {}..={} calls", min_calls, max_calls)
    })?;

    let calls = plan
        .calls()
        .enumerate()
        .map(|(index, (selector, arguments))| PlannedCall {
            index,
            selector,
            arguments: hex::encode(arguments),
        })
        .collect();

    Ok(SplitReport {
        digest: digest(data),
        number_of_calls: plan.number_of_calls(),
        chunk_len: plan.chunk_len(),
        calls,
    })
}

pub fn execute(input: &str, min_calls: usize, max_calls: usize, json: bool) -> Result<()> {
    info!("Splitting input: {}", input);

    let data = read_input(input)?;
    let report = plan(&data, min_calls, max_calls)?;

    if json {
        let rendered = serde_json::to_string_pretty(&report)
            .with_context(|| "Failed to serialize call plan")?;
        println!("{}", rendered);
        return Ok(());
    }

    println!("\n=== Call Plan ===");
    println!("BLAKE3:            {}", report.digest);
    println!("Calls:             {}", report.number_of_calls.to_string().green());
    println!("Argument chunk:    {} bytes", report.chunk_len);
    println!();

    for call in &report.calls {
        println!(
            "Call {:<3} selector 0x{:02x}  args {}",
            call.index, call.selector, call.arguments
        );
    }

    Ok(())
}
