//! Configuration types

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Deoptscope configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Benchmark workload configuration
    pub bench: BenchConfig,
}

impl Config {
    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// Synthetic workload shape for the benchmark harness
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchConfig {
    /// Number of entries loaded into each backing store
    pub entries: usize,

    /// Number of queries issued per query family
    pub queries: usize,

    /// Lines the synthetic file spans
    pub max_lines: u32,

    /// Characters per synthetic line
    pub max_line_len: u32,

    /// Maximum line span of a generated range
    pub max_range_lines: u32,

    /// RNG seed, so runs are comparable across strategies and machines
    pub seed: u64,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            entries: 10_000,
            queries: 1_000,
            max_lines: 5_000,
            max_line_len: 120,
            max_range_lines: 8,
            seed: 0x5eed,
        }
    }
}
