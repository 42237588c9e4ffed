//! Subcommand implementations

pub mod draw;
pub mod generate;
pub mod split;

use anyhow::{Context, Result};
use std::fs;
use std::io::{self, Read};

/// Read a corpus entry from a file, or from stdin when `input` is `-`
pub fn read_input(input: &str) -> Result<Vec<u8>> {
    if input == "-" {
        let mut buf = Vec::new();
        io::stdin()
            .read_to_end(&mut buf)
            .context("Failed to read input from stdin")?;
        Ok(buf)
    } else {
        fs::read(input).with_context(|| format!("Failed to read input file: {}", input))
    }
}

/// BLAKE3 digest of an input, used to match replays to corpus entries
pub fn digest(data: &[u8]) -> String {
    blake3::hash(data).to_hex().to_string()
}
