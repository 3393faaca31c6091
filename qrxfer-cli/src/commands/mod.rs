//! Subcommands of the `qrxfer` binary

pub mod generate;
pub mod inspect;
pub mod plan;
pub mod read;

use anyhow::{bail, Context, Result};
use std::fs;
use std::io::{self, Read};

/// Read a file, or stdin when `input` is `-`
pub(crate) fn read_input(input: &str) -> Result<Vec<u8>> {
    if input == "-" {
        let mut buf = Vec::new();
        io::stdin()
            .read_to_end(&mut buf)
            .context("Failed to read stdin")?;
        Ok(buf)
    } else {
        fs::read(input).with_context(|| format!("Failed to read input file: {}", input))
    }
}

/// Read carrier text, or stdin when `input` is `-`
pub(crate) fn read_text(input: &str) -> Result<String> {
    let bytes = read_input(input)?;
    String::from_utf8(bytes).with_context(|| format!("Input is not UTF-8 text: {}", input))
}

/// Use the given password, or ask for one on the terminal when absent
pub fn resolve_password(password: Option<String>) -> Result<String> {
    let password = match password {
        Some(password) => password,
        None => rpassword::prompt_password("Password: ")
            .context("Failed to read password from terminal")?,
    };
    check_password(&password)?;
    Ok(password)
}

pub(crate) fn check_password(password: &str) -> Result<()> {
    if password.is_empty() {
        bail!("Password must not be empty");
    }
    Ok(())
}
