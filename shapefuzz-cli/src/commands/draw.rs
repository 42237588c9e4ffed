use crate::commands::{digest, read_input};
use crate::Primitive;
use anyhow::{bail, Context, Result};
use colored::*;
use serde::Serialize;
use shapefuzz_core::{ByteCursor, Error};
use std::fs;
use tracing::{debug, info};

/// One replayed draw
#[derive(Debug, Serialize)]
pub struct DrawRecord {
    /// Cursor position before the draw
    pub offset: usize,
    /// Primitive drawn
    pub primitive: Primitive,
    /// Rendered value
    pub value: String,
    /// Bytes consumed
    pub consumed: usize,
}

/// Outcome of replaying a plan against one input
#[derive(Debug, Serialize)]
pub struct DrawReport {
    /// BLAKE3 digest of the input
    pub digest: String,
    /// Input length in bytes
    pub input_len: usize,
    /// Successful draws in order
    pub draws: Vec<DrawRecord>,
    /// Why the replay stopped early, if it did
    pub stopped: Option<String>,
    /// Final cursor position
    pub position: usize,
}

fn render(cursor: &mut ByteCursor, primitive: Primitive) -> Result<String, Error> {
    Ok(match primitive {
        Primitive::U8 => cursor.byte()?.to_string(),
        Primitive::U16 => cursor.u16()?.to_string(),
        Primitive::U32 => cursor.u32()?.to_string(),
        Primitive::U64 => cursor.u64()?.to_string(),
        Primitive::Int => cursor.int_like()?.to_string(),
        Primitive::Bool => cursor.bool()?.to_string(),
        Primitive::F32 => cursor.f32()?.to_string(),
        Primitive::F64 => cursor.f64()?.to_string(),
        Primitive::Bytes => hex::encode(cursor.length_framed_bytes()?),
        Primitive::String => format!("{:?}", cursor.string()?),
        Primitive::Chars => format!("{:?}", cursor.chars()?),
    })
}

/// Replay `plan` against `data`
///
/// With `cycle`, the plan repeats until a draw fails.
pub fn replay(
    data: Vec<u8>,
    plan: &[Primitive],
    max_consumable: Option<usize>,
    cycle: bool,
) -> DrawReport {
    let digest = digest(&data);
    let input_len = data.len();
    let mut cursor = match max_consumable {
        Some(max) => ByteCursor::with_max_consumable(data, max),
        None => ByteCursor::new(data),
    };

    let mut draws = Vec::new();
    let mut stopped = None;

    'replay: loop {
        for &primitive in plan {
            let offset = cursor.position();
            match render(&mut cursor, primitive) {
                Ok(value) => {
                    debug!("{:?} @ {}: {}", primitive, offset, value);
                    draws.push(DrawRecord {
                        offset,
                        primitive,
                        value,
                        consumed: cursor.position() - offset,
                    });
                }
                Err(e) => {
                    stopped = Some(e.to_string());
                    break 'replay;
                }
            }
        }

        if !cycle || plan.is_empty() {
            break;
        }
    }

    DrawReport {
        digest,
        input_len,
        draws,
        stopped,
        position: cursor.position(),
    }
}

pub fn execute(
    input: &str,
    plan: &[Primitive],
    max_consumable: Option<usize>,
    cycle: bool,
    json: bool,
    output: Option<&str>,
) -> Result<()> {
    info!("Replaying draws from: {}", input);

    if plan.is_empty() {
        bail!("Draw plan is empty");
    }
    if max_consumable == Some(0) {
        bail!("max-consumable must be at least 1");
    }

    let data = read_input(input)?;
    let report = replay(data, plan, max_consumable, cycle);

    if json || output.is_some() {
        let rendered = serde_json::to_string_pretty(&report)
            .with_context(|| "Failed to serialize draw report")?;
        match output {
            Some(path) => {
                fs::write(path, rendered)
                    .with_context(|| format!("Failed to write output file: {}", path))?;
                info!("Draw report written to: {}", path);
            }
            None => println!("{}", rendered),
        }
        return Ok(());
    }

    println!("\n=== Draw Replay ===");
    println!("Input:             {} bytes", report.input_len);
    println!("BLAKE3:            {}", report.digest);
    println!();

    for record in &report.draws {
        println!(
            "@{:<6} {:<8} {} ({} bytes)",
            record.offset,
            format!("{:?}", record.primitive).to_lowercase(),
            record.value,
            record.consumed
        );
    }

    println!();
    match &report.stopped {
        Some(reason) => println!("{} Stopped: {}", "✗".yellow(), reason),
        None => println!("{} Plan completed", "✓".green()),
    }
    println!("Final position:    {}", report.position);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replay_completes_plan() {
        let data = vec![0x07u8, 0x01, 0x00, 0x00, 0x02, b'h', b'i'];
        let report = replay(
            data,
            &[Primitive::U8, Primitive::U16, Primitive::String],
            None,
            false,
        );

        let values: Vec<&str> = report.draws.iter().map(|d| d.value.as_str()).collect();
        assert_eq!(values, vec!["7", "1", "\"hi\""]);
        assert!(report.stopped.is_none());
        assert_eq!(report.position, 7);
    }

    #[test]
    fn test_replay_reports_stop_reason() {
        let report = replay(vec![0x05u8, 0x41], &[Primitive::Bytes], None, false);

        assert!(report.draws.is_empty());
        assert!(report.stopped.unwrap().contains("Insufficient bytes"));
        assert_eq!(report.position, 0);
    }

    #[test]
    fn test_replay_cycles_until_exhausted() {
        let report = replay(vec![1u8, 2, 3, 4, 5], &[Primitive::U8, Primitive::Bool], None, true);

        assert_eq!(report.draws.len(), 5);
        assert_eq!(report.draws[1].value, "true");
        assert!(report.stopped.is_some());
    }

    #[test]
    fn test_replay_honors_max_consumable() {
        let report = replay(vec![1u8; 16], &[Primitive::U8], Some(3), true);
        assert_eq!(report.draws.len(), 3);
        assert_eq!(report.position, 3);
    }
}
