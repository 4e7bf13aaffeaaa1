//! Demo, benchmark, and stress-test runners for the pipeline.

use std::time::Instant;

use crate::log_dev;
use crate::pipeline::{PipelineConfig, run_pipeline};

const CSV_HEADER: &str = "producers,consumers,quota,capacity,total_items,\
elapsed_ms,throughput_items_per_s,cpu_user_s,cpu_sys_s,max_queue_len,\
conserved,duplicates";

/// Best-effort CPU user/system time snapshot (seconds) on Unix platforms.
#[cfg(unix)]
fn cpu_times_seconds() -> Option<(f64, f64)> {
    use libc::{RUSAGE_SELF, getrusage, rusage};
    // rusage is plain old data; all-zeroes is a valid initial value.
    let mut usage: rusage = unsafe { std::mem::zeroed() };
    let rc = unsafe { getrusage(RUSAGE_SELF, &mut usage) };
    if rc != 0 {
        return None;
    }
    let user = usage.ru_utime.tv_sec as f64 + usage.ru_utime.tv_usec as f64 / 1_000_000.0;
    let sys = usage.ru_stime.tv_sec as f64 + usage.ru_stime.tv_usec as f64 / 1_000_000.0;
    Some((user, sys))
}

/// Stub on non-Unix platforms.
#[cfg(not(unix))]
fn cpu_times_seconds() -> Option<(f64, f64)> {
    None
}

/// Aggregated metrics from a single timed run.
struct BenchResult {
    config: PipelineConfig,
    total_items: usize,
    elapsed_ms: f64,
    throughput: f64,
    cpu_user_s: Option<f64>,
    cpu_sys_s: Option<f64>,
    max_queue_len: usize,
    conserved: bool,
    duplicates: bool,
    leftover: usize,
}

fn benchmark_once(config: PipelineConfig) -> BenchResult {
    debug_assert!(config.producers > 0, "producers must be > 0");
    debug_assert!(config.consumers > 0, "consumers must be > 0");
    debug_assert!(config.quota > 0, "quota must be > 0");
    debug_assert!(config.capacity > 0, "capacity must be > 0");

    let total_items = config.target();
    let cpu_start = cpu_times_seconds();
    let start = Instant::now();
    // Item reporting is suppressed so timing measures the pipeline rather
    // than stdout.
    let report = run_pipeline(config, false);
    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

    let throughput = if elapsed_ms > 0.0 {
        total_items as f64 / (elapsed_ms / 1000.0)
    } else {
        0.0
    };
    let (cpu_user_s, cpu_sys_s) = match (cpu_start, cpu_times_seconds()) {
        (Some((user_start, sys_start)), Some((user_end, sys_end))) => {
            (Some(user_end - user_start), Some(sys_end - sys_start))
        }
        _ => (None, None),
    };

    BenchResult {
        config,
        total_items,
        elapsed_ms,
        throughput,
        cpu_user_s,
        cpu_sys_s,
        max_queue_len: report.max_queue_len,
        conserved: report.produced == total_items
            && report.consumed == total_items
            && report.leftover == 0,
        duplicates: report.duplicates,
        leftover: report.leftover,
    }
}

fn print_result_row(result: &BenchResult, validate: bool) {
    let cpu_user = result
        .cpu_user_s
        .map(|v| format!("{v:.4}"))
        .unwrap_or_else(|| "NA".to_string());
    let cpu_sys = result
        .cpu_sys_s
        .map(|v| format!("{v:.4}"))
        .unwrap_or_else(|| "NA".to_string());
    println!(
        "{},{},{},{},{},{:.2},{:.2},{},{},{},{},{}",
        result.config.producers,
        result.config.consumers,
        result.config.quota,
        result.config.capacity,
        result.total_items,
        result.elapsed_ms,
        result.throughput,
        cpu_user,
        cpu_sys,
        result.max_queue_len,
        result.conserved,
        result.duplicates
    );
    if result.leftover > 0 {
        eprintln!("# warning,leftover_items,{}", result.leftover);
    }
    if validate {
        if !result.conserved {
            eprintln!("# violation,conservation");
        }
        if result.duplicates {
            eprintln!("# violation,duplicate_sequences");
        }
        if result.max_queue_len > result.config.capacity {
            eprintln!("# violation,capacity_bound");
        }
    }
}

/// Run the reference configuration and print one report line per item plus
/// a final summary.
pub fn run_demo() {
    log_dev!("[DEMO] start");
    let config = PipelineConfig::reference();
    let start = Instant::now();
    let report = run_pipeline(config, true);
    log_dev!(
        "[DEMO] finished in {}ms (dev logs suppressed in release mode)",
        start.elapsed().as_millis()
    );

    println!("PIPELINE SUMMARY");
    println!(
        "producers={} consumers={} quota={} capacity={}",
        config.producers, config.consumers, config.quota, config.capacity
    );
    println!("total_items_produced={}", report.produced);
    println!("total_items_consumed={}", report.consumed);
    println!("per_consumer_consumed={:?}", report.per_consumer);
    println!("distinct_sequence_ids={}", report.distinct);
    println!("max_queue_len_observed={}", report.max_queue_len);
    println!("duplicates={}", report.duplicates);
    println!("leftover_items={}", report.leftover);
}

/// Run a single timed benchmark with optional parameter overrides.
pub fn run_benchmark(
    producers: Option<usize>,
    consumers: Option<usize>,
    quota: Option<usize>,
    capacity: Option<usize>,
    validate: bool,
) {
    let config = PipelineConfig {
        producers: producers.unwrap_or(5),
        consumers: consumers.unwrap_or(3),
        quota: quota.unwrap_or(10_000),
        capacity: capacity.unwrap_or(2),
    };
    if config.producers == 0 {
        eprintln!("benchmark error: producers must be > 0");
        return;
    }
    // A run without consumers never terminates: producers block at
    // capacity with nobody draining.
    if config.consumers == 0 {
        eprintln!("benchmark error: consumers must be > 0");
        return;
    }
    if config.quota == 0 {
        eprintln!("benchmark error: quota must be > 0");
        return;
    }
    if config.capacity == 0 {
        eprintln!("benchmark error: capacity must be > 0");
        return;
    }

    let result = benchmark_once(config);
    println!("{CSV_HEADER}");
    print_result_row(&result, validate);
}

/// Sweep multiple pipeline configurations and print CSV output.
pub fn run_stress(
    producer_sets: Option<Vec<usize>>,
    consumer_sets: Option<Vec<usize>>,
    quota_sets: Option<Vec<usize>>,
    capacity: Option<usize>,
    validate: bool,
) {
    let default_producer_sets = [1usize, 2, 4, 8];
    let default_consumer_sets = [1usize, 2, 4];
    let default_quota_sets = [100usize, 1000];
    let capacity = capacity.unwrap_or(2);

    let producer_sets = producer_sets.unwrap_or_else(|| default_producer_sets.to_vec());
    let mut consumer_sets = consumer_sets.unwrap_or_else(|| default_consumer_sets.to_vec());
    let quota_sets = quota_sets.unwrap_or_else(|| default_quota_sets.to_vec());

    if producer_sets.iter().any(|&producers| producers == 0) {
        eprintln!("stress error: producer_sets must be > 0");
        return;
    }
    if quota_sets.iter().any(|&quota| quota == 0) {
        eprintln!("stress error: quota_sets must be > 0");
        return;
    }
    if consumer_sets.iter().any(|&consumers| consumers == 0) {
        let before = consumer_sets.len();
        consumer_sets.retain(|&consumers| consumers > 0);
        let dropped = before.saturating_sub(consumer_sets.len());
        if dropped > 0 {
            eprintln!("stress warning: ignored {dropped} consumer set(s) of 0 (cannot terminate)");
        }
        if consumer_sets.is_empty() {
            eprintln!("stress error: consumers must be > 0");
            return;
        }
    }
    if capacity == 0 {
        eprintln!("stress error: capacity must be > 0");
        return;
    }

    println!("{CSV_HEADER}");
    for producers in producer_sets {
        for consumers in consumer_sets.iter().copied() {
            for quota in quota_sets.iter().copied() {
                let result = benchmark_once(PipelineConfig {
                    producers,
                    consumers,
                    quota,
                    capacity,
                });
                print_result_row(&result, validate);
            }
        }
    }
}
