//! Worker roles and the orchestrator that wires one pipeline run together.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use crate::bounded_queue::BoundedQueue;
use crate::log_dev;
use crate::sequence::SequenceGenerator;
use crate::types::{ConsumerId, Item, ProducerId, SequenceId};

/// Worker counts and sizing for one pipeline run.
#[derive(Clone, Copy, Debug)]
pub struct PipelineConfig {
    pub producers: usize,
    pub consumers: usize,
    /// Items each producer emits before terminating.
    pub quota: usize,
    pub capacity: usize,
}

impl PipelineConfig {
    /// Reference configuration: 5 producers x 50 items, 3 consumers,
    /// queue capacity 2.
    pub fn reference() -> Self {
        Self {
            producers: 5,
            consumers: 3,
            quota: 50,
            capacity: 2,
        }
    }

    /// Total number of items the run is expected to move.
    pub fn target(&self) -> usize {
        self.producers * self.quota
    }
}

/// Shared state for one run.
///
/// Built by the orchestrator before any worker starts, handed to every
/// worker behind an `Arc`, and dropped only after all workers have joined.
/// `target` is fixed at construction, so it is fully established before any
/// consumer can make a termination decision.
pub struct RunContext {
    pub queue: BoundedQueue<Item>,
    pub sequence: SequenceGenerator,
    produced: AtomicUsize,
    target: usize,
}

impl RunContext {
    pub fn new(capacity: usize, target: usize) -> Self {
        Self {
            queue: BoundedQueue::new(capacity),
            sequence: SequenceGenerator::new(),
            produced: AtomicUsize::new(0),
            target,
        }
    }

    /// Items enqueued so far. The counter moves only after the matching
    /// push is visible in the queue, so a reader observing `produced() == n`
    /// may rely on n items having been enqueued.
    pub fn produced(&self) -> usize {
        self.produced.load(Ordering::SeqCst)
    }

    /// Total number of items the producers will emit.
    pub fn target(&self) -> usize {
        self.target
    }
}

/// Producer loop: mint `quota` items and push each into the queue.
///
/// Blocks only inside `push`. Stops early only if the queue is closed
/// underneath it, which a normal run never does.
pub fn produce_quota(ctx: &RunContext, producer: ProducerId, quota: usize) {
    for _ in 0..quota {
        let item = Item::new(producer, ctx.sequence.next());
        let sequence = item.sequence;
        log_dev!(
            "[PRODUCER] {producer} minted {} with {} vendor ids",
            item.name,
            item.vendor_ids.len()
        );
        if ctx.queue.push(item).is_err() {
            log_dev!("[PRODUCER] {producer} stopping: queue closed");
            return;
        }
        ctx.produced.fetch_add(1, Ordering::SeqCst);
        log_dev!("[PRODUCER] {producer} pushed item {sequence}");
    }
}

/// Consumer loop: drain items until the queue is closed and empty.
///
/// Each popped item is reported after the pop has released the queue lock,
/// so slow output never stalls other workers. Returns the consumed sequence
/// numbers in pop order.
pub fn consume_until_closed(
    ctx: &RunContext,
    consumer: ConsumerId,
    report: bool,
) -> Vec<SequenceId> {
    let mut consumed = Vec::new();
    while let Some(item) = ctx.queue.pop_blocking_or_closed() {
        if report {
            println!(
                "Producer {} produce data {} made by consumer {}",
                item.producer, item.sequence, consumer
            );
        }
        consumed.push(item.sequence);
    }
    log_dev!("[CONSUMER] {consumer} done after {} items", consumed.len());
    consumed
}

/// Evidence gathered from one completed run.
pub struct RunReport {
    pub produced: usize,
    pub consumed: usize,
    /// Items handled by each consumer, indexed by consumer id.
    pub per_consumer: Vec<usize>,
    pub max_queue_len: usize,
    /// Number of distinct sequence ids seen across all consumers.
    pub distinct: usize,
    pub duplicates: bool,
    /// Items found still queued after every consumer exited; always 0
    /// unless conservation is broken.
    pub leftover: usize,
}

/// Run one full pipeline: spawn every worker, join the producers, close the
/// queue, join the consumers, and collect the evidence.
///
/// Closing the queue only after every producer has joined means consumers
/// can neither exit with items still in flight nor block waiting for items
/// that will never arrive; end-of-stream travels through the queue itself.
pub fn run_pipeline(config: PipelineConfig, report: bool) -> RunReport {
    let ctx = Arc::new(RunContext::new(config.capacity, config.target()));

    let mut consumer_handles = Vec::with_capacity(config.consumers);
    for consumer_id in 0..config.consumers as ConsumerId {
        let ctx = Arc::clone(&ctx);
        let handle = thread::Builder::new()
            .name(format!("consumer-{consumer_id}"))
            .spawn(move || consume_until_closed(&ctx, consumer_id, report))
            .expect("failed to spawn consumer thread");
        consumer_handles.push(handle);
    }

    let mut producer_handles = Vec::with_capacity(config.producers);
    for producer_id in 0..config.producers as ProducerId {
        let ctx = Arc::clone(&ctx);
        let quota = config.quota;
        let handle = thread::Builder::new()
            .name(format!("producer-{producer_id}"))
            .spawn(move || produce_quota(&ctx, producer_id, quota))
            .expect("failed to spawn producer thread");
        producer_handles.push(handle);
    }

    for handle in producer_handles {
        handle.join().expect("producer thread panicked");
    }
    // Every item is enqueued at this point.
    debug_assert_eq!(ctx.produced(), ctx.target(), "producers finished short");
    log_dev!(
        "[ORCH] producers done, {} items still queued",
        ctx.queue.len()
    );
    ctx.queue.close();

    let mut per_consumer = Vec::with_capacity(config.consumers);
    let mut all_sequences = Vec::with_capacity(config.target());
    for handle in consumer_handles {
        let consumed = handle.join().expect("consumer thread panicked");
        per_consumer.push(consumed.len());
        all_sequences.extend(consumed);
    }

    // Consumers only exit on end-of-stream, so nothing should remain.
    let mut leftover = 0usize;
    while ctx.queue.try_pop().is_some() {
        leftover += 1;
    }

    let consumed = all_sequences.len();
    let mut seen = HashSet::with_capacity(consumed);
    let mut duplicates = false;
    for sequence in &all_sequences {
        if !seen.insert(*sequence) {
            duplicates = true;
        }
    }

    let max_queue_len = ctx.queue.max_len();
    debug_assert!(max_queue_len <= ctx.queue.capacity(), "capacity exceeded");

    RunReport {
        produced: ctx.produced(),
        consumed,
        per_consumer,
        max_queue_len,
        distinct: seen.len(),
        duplicates,
        leftover,
    }
}
