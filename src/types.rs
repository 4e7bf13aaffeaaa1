//! Shared identifiers and the item model carried through the pipeline.

/// Unique identifier for a producer worker.
pub type ProducerId = u64;
/// Unique identifier for a consumer worker.
pub type ConsumerId = u64;
/// Globally unique number stamped on every item at creation.
pub type SequenceId = u64;

/// Unit of work moved from producers to consumers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Item {
    /// Worker that created the item; carried for traceability only.
    pub producer: ProducerId,
    /// Unique sequence number issued by the shared generator.
    pub sequence: SequenceId,
    /// Display label derived from the sequence number.
    pub name: String,
    /// Auxiliary payload; carried through the queue, never validated.
    pub vendor_ids: Vec<u64>,
}

impl Item {
    /// Build an item for `producer` around a freshly issued sequence number.
    pub fn new(producer: ProducerId, sequence: SequenceId) -> Self {
        // Deterministic payload so runs are reproducible under test.
        let vendor_ids = (0..sequence % 4).map(|k| sequence * 10 + k).collect();
        Self {
            producer,
            sequence,
            name: format!("product-{sequence}"),
            vendor_ids,
        }
    }
}
