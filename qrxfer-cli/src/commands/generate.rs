use anyhow::{bail, Context, Result};
use colored::*;
use qrxfer_core::{decoder::fragment_info, TransferConfig};
use std::fs;
use tracing::info;

use super::{check_password, read_input};
use crate::{FileTransfer, PasswordCipher, ZstdCompressor};

/// Seal a file into carrier text, one code per line
pub fn execute(
    input: &str,
    output: &str,
    password: &str,
    max_size: usize,
    level: i32,
    show_text: bool,
) -> Result<()> {
    info!("Generating codes from {} to {}", input, output);
    check_password(password)?;

    let payload = read_input(input)?;
    if payload.is_empty() {
        bail!("Input file is empty: {}", input);
    }

    let config = TransferConfig {
        carrier_capacity: max_size,
        ..TransferConfig::default()
    };
    let transfer = FileTransfer::with_config(
        PasswordCipher::new(password),
        ZstdCompressor::new(level),
        config,
    );

    let wires = transfer
        .seal(&payload)
        .with_context(|| format!("Failed to package {} ({} bytes)", input, payload.len()))?;

    let mut text = wires.join("\n");
    text.push('\n');
    fs::write(output, &text).with_context(|| format!("Failed to write output file: {}", output))?;

    if wires.len() == 1 {
        info!("Wrote a single code ({} characters)", wires[0].len());
    } else {
        info!("Wrote {} codes of at most {} characters", wires.len(), max_size);
    }

    if show_text {
        for wire in &wires {
            let label = match fragment_info(wire) {
                Ok(info) if wires.len() > 1 => info.to_string(),
                _ => "Single code".to_string(),
            };
            println!("\n{}", label.bold());
            println!("{}", wire);
        }
    }

    println!(
        "{} {} bytes packaged into {} code(s)",
        "✓".green(),
        payload.len(),
        wires.len()
    );

    Ok(())
}
