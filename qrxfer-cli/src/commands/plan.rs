use anyhow::{Context, Result};
use qrxfer_core::{
    planner::{plan, single_fits},
    transport::encoded_len,
};

/// Print how a blob of `size` bytes maps onto carriers of `max_size` characters
pub fn execute(size: usize, max_size: usize) -> Result<()> {
    let plan = plan(size, max_size)
        .with_context(|| format!("Cannot plan {} bytes at capacity {}", size, max_size))?;

    println!("\n=== Capacity Plan ===");
    println!("Blob size:          {} bytes", size);
    println!("Carrier capacity:   {} characters", max_size);
    println!("Chunk size:         {} bytes", plan.chunk_size);
    println!("Codes:              {}", plan.fragment_count);

    if plan.is_single() {
        println!(
            "Single form:        {} characters (fits: {})",
            encoded_len(size),
            single_fits(size, max_size)
        );
    }

    Ok(())
}
