use anyhow::{Context, Result};
use colored::*;
use qrxfer_core::{
    assembler::AssemblySession,
    constants::FRAGMENT_MARKER,
    decoder::{decode_wire, is_multipart},
    scanner::segment_pasted,
    transport,
};
use serde::Serialize;
use tracing::{info, warn};

use super::read_text;

/// One decoded part as shown to the user
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PartReport {
    /// Position of the part, 1-based
    pub index: u32,
    /// Number of parts the part claims
    pub total: u32,
    /// Framing format version
    pub version: u8,
    /// Chunk bytes carried
    pub chunk_len: usize,
    /// First bytes of the chunk, hex encoded
    pub head: String,
}

/// What a set of codes holds, without decrypting anything
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct InspectReport {
    /// Candidate codes found in the text
    pub segments: usize,
    /// Whether the text is one code in the single form
    pub single: bool,
    /// Parts accepted into the session
    pub parts: Vec<PartReport>,
    /// Segments that are not codes at all
    pub undecodable: usize,
    /// Parts that decoded but do not belong with the others
    pub rejected: Vec<String>,
    /// Number of parts in the transfer, once known
    pub total: Option<u32>,
    /// Distinct parts received
    pub received: usize,
    /// Indices still missing, ascending
    pub missing: Vec<u32>,
    /// Whether `read` has everything it needs
    pub ready: bool,
}

const HEAD_LEN: usize = 4;

/// Build a report for pasted carrier text
pub fn inspect_text(text: &str) -> InspectReport {
    let segments = segment_pasted(text);
    let mut report = InspectReport {
        segments: segments.len(),
        ..InspectReport::default()
    };

    if let [only] = segments.as_slice() {
        if !is_multipart(only) {
            match transport::decode(only) {
                Ok(blob) if !blob.starts_with(FRAGMENT_MARKER) => {
                    report.single = true;
                    report.ready = true;
                }
                Ok(_) => {
                    warn!("Code carries the fragment marker but does not decode");
                    report.undecodable = 1;
                }
                Err(e) => {
                    warn!("Skipping segment: {}", e);
                    report.undecodable = 1;
                }
            }
            return report;
        }
    }

    let mut session = AssemblySession::new();
    for segment in &segments {
        let fragment = match decode_wire(segment) {
            Ok(fragment) => fragment,
            Err(e) => {
                warn!("Skipping segment: {}", e);
                report.undecodable += 1;
                continue;
            }
        };

        let part = PartReport {
            index: fragment.index,
            total: fragment.total,
            version: fragment.version,
            chunk_len: fragment.chunk.len(),
            head: hex::encode(&fragment.chunk[..fragment.chunk.len().min(HEAD_LEN)]),
        };

        match session.add(fragment) {
            Ok(_) => report.parts.push(part),
            Err(e) => report.rejected.push(format!("Part {}/{}: {}", part.index, part.total, e)),
        }
    }

    report.total = session.total();
    report.received = session.received();
    report.missing = session.missing();
    report.ready = session.is_complete();
    report
}

/// Print the report for a file of codes, as text or JSON
pub fn execute(input: &str, json: bool) -> Result<()> {
    info!("Inspecting codes in {}", input);

    let text = read_text(input)?;
    let report = inspect_text(&text);

    if json {
        let rendered =
            serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
        println!("{}", rendered);
        return Ok(());
    }

    println!("\n=== Inspection Results ===");
    println!("Segments found:     {}", report.segments);

    if report.single {
        println!("{} Single code, ready to read", "✓".green());
        return Ok(());
    }

    for part in &report.parts {
        println!(
            "  Part {}/{}  v{}  {} bytes  {}",
            part.index, part.total, part.version, part.chunk_len, part.head
        );
    }

    if report.undecodable > 0 {
        println!("Undecodable:        {}", report.undecodable.to_string().red());
    }
    for rejected in &report.rejected {
        println!("{} {}", "✗".red(), rejected);
    }

    println!("\n=== Summary ===");
    match report.total {
        Some(total) => println!("Received:           {}/{}", report.received, total),
        None => println!("{} No parts found", "✗".red()),
    }

    if report.ready {
        println!("{} All parts present, ready to read", "✓".green());
    } else if !report.missing.is_empty() {
        let missing: Vec<String> = report.missing.iter().map(u32::to_string).collect();
        println!("{} Missing parts: {}", "!".yellow(), missing.join(", "));
    }

    Ok(())
}
