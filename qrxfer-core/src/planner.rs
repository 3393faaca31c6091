//! Capacity planning for a carrier of fixed byte capacity

use crate::constants::FRAGMENT_HEADER_SIZE;
use crate::error::PackError;
use crate::transport;
use serde::{Deserialize, Serialize};

/// Outcome of planning a transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    /// Number of fragments the payload splits into
    pub fragment_count: usize,

    /// Maximum chunk bytes per fragment
    pub chunk_size: usize,
}

impl Plan {
    /// A one-fragment plan is carried in the degenerate single form, without envelope
    pub fn is_single(&self) -> bool {
        self.fragment_count == 1
    }
}

/// Planner with a configurable per-fragment envelope reserve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityPlanner {
    envelope_overhead: usize,
}

impl Default for CapacityPlanner {
    fn default() -> Self {
        Self {
            envelope_overhead: FRAGMENT_HEADER_SIZE,
        }
    }
}

impl CapacityPlanner {
    /// Create a planner reserving `envelope_overhead` bytes per fragment
    ///
    /// The reserve never drops below the frame header size.
    pub fn with_overhead(envelope_overhead: usize) -> Self {
        Self {
            envelope_overhead: envelope_overhead.max(FRAGMENT_HEADER_SIZE),
        }
    }

    /// Bytes reserved per fragment for the envelope
    pub fn envelope_overhead(&self) -> usize {
        self.envelope_overhead
    }

    /// Chunk bytes that fit one carrier after transport expansion and envelope
    pub fn chunk_size(&self, carrier_capacity: usize) -> Result<usize, PackError> {
        let budget = transport::max_decoded_len(carrier_capacity);
        match budget.checked_sub(self.envelope_overhead) {
            Some(size) if size > 0 => Ok(size),
            _ => Err(PackError::CapacityTooSmall {
                capacity: carrier_capacity,
            }),
        }
    }

    /// Plan how a payload of `payload_size` bytes maps onto carriers
    pub fn plan(&self, payload_size: usize, carrier_capacity: usize) -> Result<Plan, PackError> {
        let chunk_size = self.chunk_size(carrier_capacity)?;

        if payload_size == 0 {
            return Err(PackError::EmptyPayload);
        }

        Ok(Plan {
            fragment_count: payload_size.div_ceil(chunk_size),
            chunk_size,
        })
    }
}

/// Plan with the default envelope reserve
pub fn plan(payload_size: usize, carrier_capacity: usize) -> Result<Plan, PackError> {
    CapacityPlanner::default().plan(payload_size, carrier_capacity)
}

/// Whether a blob fits one carrier in the degenerate single form
pub fn single_fits(blob_len: usize, carrier_capacity: usize) -> bool {
    transport::encoded_len(blob_len) <= carrier_capacity
}
