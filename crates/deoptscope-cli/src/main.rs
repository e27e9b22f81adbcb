//! Deoptscope CLI
//!
//! Benchmark harness and consistency checker for the range-index backing
//! stores. All workloads are generated from a seed, so runs are comparable
//! across strategies and machines.

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use deoptscope_core::config::{BenchConfig, Config};
use deoptscope_core::{Position, Range};
use deoptscope_index::strategy::{NestedRangeMap, SortedVecMap, SparseLineMap};
use deoptscope_index::{RangeMap, RangeStore};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

#[derive(Parser)]
#[command(name = "deoptscope")]
#[command(author, version, about = "Range-index benchmark harness", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Benchmark every backing store against the same seeded workload
    Bench {
        /// Workload configuration file (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Entries loaded into each store
        #[arg(long)]
        entries: Option<usize>,

        /// Queries issued per query family
        #[arg(long)]
        queries: Option<usize>,

        /// RNG seed
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Verify all strategies produce results identical to the production map
    Check {
        /// Workload configuration file (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// RNG seed
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Bench {
            config,
            entries,
            queries,
            seed,
        } => {
            let mut bench = load_bench_config(config.as_deref())?;
            if let Some(entries) = entries {
                bench.entries = entries;
            }
            if let Some(queries) = queries {
                bench.queries = queries;
            }
            if let Some(seed) = seed {
                bench.seed = seed;
            }
            cmd_bench(&bench)
        }
        Commands::Check { config, seed } => {
            let mut bench = load_bench_config(config.as_deref())?;
            if let Some(seed) = seed {
                bench.seed = seed;
            }
            cmd_check(&bench)
        }
    }
}

fn load_bench_config(path: Option<&std::path::Path>) -> Result<BenchConfig> {
    Ok(match path {
        Some(path) => Config::load(path)?.bench,
        None => BenchConfig::default(),
    })
}

/// Seeded range generator shared by the dataset and the query mix
fn random_range(rng: &mut StdRng, config: &BenchConfig) -> Range {
    let start = Position::new(
        rng.gen_range(0..config.max_lines),
        rng.gen_range(0..config.max_line_len),
    );
    let end = Position::new(
        start.line + rng.gen_range(0..=config.max_range_lines),
        rng.gen_range(0..config.max_line_len),
    );
    Range::new(start, end.max(start))
}

fn generate_workload(config: &BenchConfig) -> (Vec<Range>, Vec<Range>) {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let dataset: Vec<Range> = (0..config.entries)
        .map(|_| random_range(&mut rng, config))
        .collect();
    // Half the queries are bare cursor positions, as the editor issues them.
    let queries: Vec<Range> = (0..config.queries)
        .map(|i| {
            if i % 2 == 0 {
                Range::collapsed(Position::new(
                    rng.gen_range(0..config.max_lines),
                    rng.gen_range(0..config.max_line_len),
                ))
            } else {
                random_range(&mut rng, config)
            }
        })
        .collect();
    (dataset, queries)
}

fn stores() -> Vec<Box<dyn RangeStore<u64>>> {
    vec![
        Box::new(RangeMap::new()),
        Box::new(NestedRangeMap::new()),
        Box::new(SparseLineMap::new()),
        Box::new(SortedVecMap::new()),
    ]
}

/// Run `op` `iters` times, print per-op timing, and return a result sum so
/// the work cannot be optimized away
fn time_op(label: &str, iters: usize, mut op: impl FnMut() -> usize) -> usize {
    let start = Instant::now();
    let mut checksum = 0usize;
    for _ in 0..iters {
        checksum = checksum.wrapping_add(op());
    }
    let elapsed = start.elapsed();
    let per_op = elapsed.as_nanos() / iters.max(1) as u128;
    println!("  {label:<22} {per_op:>10} ns/op  ({iters} iters)");
    checksum
}

fn cmd_bench(config: &BenchConfig) -> Result<()> {
    info!(
        entries = config.entries,
        queries = config.queries,
        seed = config.seed,
        "generating workload"
    );
    let (dataset, queries) = generate_workload(config);

    for mut store in stores() {
        println!("{}", store.name());

        let load_start = Instant::now();
        for (i, &range) in dataset.iter().enumerate() {
            store.insert(range, i as u64);
        }
        let loaded = load_start.elapsed();
        println!(
            "  {:<22} {:>10} ns/op  ({} entries, {} distinct)",
            "bulk load",
            loaded.as_nanos() / dataset.len().max(1) as u128,
            dataset.len(),
            store.len(),
        );

        let mut cursor = 0usize;
        let mut next_query = move |queries: &[Range]| {
            let q = queries[cursor % queries.len()];
            cursor += 1;
            q
        };

        time_op("exact get", config.queries, || {
            usize::from(store.get(next_query(&dataset)).is_some())
        });
        time_op("find_all_containing", config.queries, || {
            store.find_all_containing(next_query(&queries)).len()
        });
        time_op("find_nearest_containing", config.queries, || {
            usize::from(store.find_nearest_containing(next_query(&queries)).is_some())
        });
        time_op("find_all_contained_by", config.queries, || {
            store.find_all_contained_by(next_query(&queries)).len()
        });
        time_op("find_all_intersecting", config.queries, || {
            store.find_all_intersecting(next_query(&queries)).len()
        });
        time_op("full iteration", 10, || store.entries().len());
        println!();
    }

    Ok(())
}

fn cmd_check(config: &BenchConfig) -> Result<()> {
    let (dataset, queries) = generate_workload(config);

    let mut reference: RangeMap<u64> = RangeMap::new();
    for (i, &range) in dataset.iter().enumerate() {
        reference.insert(range, i as u64);
    }

    for mut store in stores().into_iter().skip(1) {
        for (i, &range) in dataset.iter().enumerate() {
            store.insert(range, i as u64);
        }
        if store.len() != reference.len() {
            bail!(
                "{}: {} entries, expected {}",
                store.name(),
                store.len(),
                reference.len()
            );
        }
        if store.entries() != reference.iter().collect::<Vec<_>>() {
            bail!("{}: iteration order diverges from production map", store.name());
        }
        for &q in &queries {
            if store.find_all_containing(q)
                != RangeMap::find_all_containing(&reference, q).collect::<Vec<_>>()
            {
                bail!("{}: find_all_containing({q}) diverges", store.name());
            }
            if store.find_nearest_containing(q) != reference.find_nearest_containing(q) {
                bail!("{}: find_nearest_containing({q}) diverges", store.name());
            }
            if store.find_all_contained_by(q)
                != RangeMap::find_all_contained_by(&reference, q).collect::<Vec<_>>()
            {
                bail!("{}: find_all_contained_by({q}) diverges", store.name());
            }
            if store.find_all_intersecting(q)
                != RangeMap::find_all_intersecting(&reference, q).collect::<Vec<_>>()
            {
                bail!("{}: find_all_intersecting({q}) diverges", store.name());
            }
        }
        println!(
            "{}: {} entries, {} queries, identical results",
            store.name(),
            reference.len(),
            queries.len()
        );
    }

    Ok(())
}
