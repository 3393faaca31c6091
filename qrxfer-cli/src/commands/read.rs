use anyhow::{Context, Result};
use colored::*;
use qrxfer_core::PackError;
use std::fs;
use tracing::{info, warn};

use super::{check_password, read_text};
use crate::{FileTransfer, PasswordCipher, ZstdCompressor};

/// Reconstruct a file from carrier text in any order
pub fn execute(input: &str, output: &str, password: &str) -> Result<()> {
    info!("Reading codes from {}", input);
    check_password(password)?;

    let text = read_text(input)?;
    recover(&text, output, password).with_context(|| format!("Failed to read codes from {}", input))
}

/// Reconstruct a file from code text given on the command line
pub fn execute_text(text: &str, output: &str, password: &str) -> Result<()> {
    info!("Decrypting code text given inline");
    check_password(password)?;

    recover(text, output, password)
}

fn recover(text: &str, output: &str, password: &str) -> Result<()> {
    let transfer = FileTransfer::new(PasswordCipher::new(password), ZstdCompressor::default());

    let payload = match transfer.open_pasted(text) {
        Ok(payload) => payload,
        Err(e) => {
            match &e {
                PackError::MissingParts(parts) => {
                    warn!("{} part(s) still missing: {:?}", parts.len(), parts)
                }
                PackError::Auth(_) => warn!("Wrong password or corrupted codes"),
                _ => {}
            }
            return Err(e).context("Failed to reconstruct data");
        }
    };

    fs::write(output, &payload)
        .with_context(|| format!("Failed to write output file: {}", output))?;

    info!("Recovered {} bytes into {}", payload.len(), output);
    println!("{} Recovered {} bytes", "✓".green(), payload.len());

    Ok(())
}
