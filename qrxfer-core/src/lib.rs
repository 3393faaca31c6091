//! # qrxfer Core
//!
//! Multi-part packaging for carriers with a small byte capacity (QR codes and
//! similar printable or scannable codes).
//!
//! A payload is wrapped with an integrity digest, handed to external
//! compression and encryption collaborators, then split into self-describing
//! fragments that each fit one carrier. Fragments can be collected in any
//! order; reassembly reports exactly which parts are missing.
//!
//! ## Modules
//!
//! - `constants`: Wire format constants and limits
//! - `types`: Core types (Fragment, FragmentInfo)
//! - `transport`: Reversible text encoding for the carrier
//! - `encoder`: Fragment encoding
//! - `decoder`: Strict fragment decoding and multi-part probing
//! - `chunker`: Splitting an encrypted blob into fragments
//! - `planner`: Capacity planning (single vs multi-fragment)
//! - `package`: Integrity wrapping of the payload
//! - `assembler`: Order-independent reassembly and assembly sessions
//! - `scanner`: Segmentation of pasted text holding several fragments
//! - `transfer`: End-to-end pipeline over cipher and compressor collaborators

#![warn(missing_docs)]

pub mod assembler;
pub mod chunker;
pub mod constants;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod package;
pub mod planner;
pub mod scanner;
pub mod transfer;
pub mod transport;
pub mod types;

// Re-export commonly used types
pub use assembler::{assemble, AssemblySession, DuplicatePolicy};
pub use error::PackError;
pub use package::Package;
pub use planner::{plan, Plan};
pub use transfer::{Cipher, Compressor, Transfer, TransferConfig};
pub use types::{Fragment, FragmentInfo};

/// Result type alias for qrxfer operations
pub type Result<T> = core::result::Result<T, PackError>;
