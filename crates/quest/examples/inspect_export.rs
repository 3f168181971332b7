//! Simple inspector for export payloads.
//!
//! Usage: `cargo run --example inspect_export -- <file-or-payload>`
//! Set `RUST_LOG=debug` to see decoder logs.

use std::fs;
use std::path::Path;

use quest::{decode_all_entries, CapacityAccumulator, QuestConfig};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let arg = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "Name:Alice|Age:30~Name:Bob|Site:North".to_string());

    let payload = if Path::new(&arg).is_file() {
        println!("Reading: {}", arg);
        fs::read_to_string(&arg).expect("Failed to read file")
    } else {
        arg
    };
    let payload = payload.trim_end_matches(['\r', '\n']);

    let config = QuestConfig::from_env().expect("Invalid configuration");
    let accumulator = CapacityAccumulator::from_payload(&config, payload.to_string())
        .expect("Payload exceeds the QR character limit");

    let entries = decode_all_entries(payload);
    println!("\n=== Entries ({}) ===", entries.len());
    for (i, entry) in entries.iter().enumerate() {
        println!("[{}]", i + 1);
        for field in entry.iter() {
            println!("  {} = {:?}", field.name, field.value);
        }
    }

    let estimate = accumulator.estimate();
    println!("\n=== Capacity ===");
    println!("Used: {} / {} chars", estimate.used, estimate.limit);
    println!("Remaining: {} chars", estimate.remaining);
    println!("Largest entry: {} chars", estimate.largest_entry_length);
    println!("Entries left (estimate): {}", estimate.entries_left);
}
