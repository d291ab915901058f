// Daily averages: pool every node's packets for one month, then mean per (day, field).
// Pure and synchronous; bad packets are skipped, only a non-mapping dataset is fatal.

use std::collections::BTreeMap;

use chrono::{Datelike, FixedOffset, Offset, Utc};
use serde_json::Value;
use tracing::debug;

use crate::models::{DailyAverages, FieldLookup, FieldMatch, Month, RawPacket};

/// Child key under which the document store keeps a node's packets.
pub const PACKETS_KEY: &str = "Packets";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AggregateError {
    #[error("malformed input: expected a mapping of nodes, got {found}")]
    MalformedInput { found: &'static str },
}

/// Knobs that do not change per request.
#[derive(Debug, Clone, Copy)]
pub struct AggregateOptions {
    pub field_match: FieldMatch,
    /// Offset used to turn instants into calendar dates.
    pub offset: FixedOffset,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            field_match: FieldMatch::default(),
            offset: Utc.fix(),
        }
    }
}

#[derive(Debug, Default)]
struct RunStats {
    nodes: usize,
    packets: usize,
    bad_timestamp: usize,
    other_month: usize,
    samples: usize,
}

/// Averages requested fields per day of `month` across all nodes in `dataset`.
///
/// `null` counts as an empty dataset. Samples from every node are pooled before
/// averaging. A field with no numeric sample on a day is absent, never zero.
pub fn aggregate(
    dataset: &Value,
    month: Month,
    fields: &[String],
    options: &AggregateOptions,
) -> Result<DailyAverages, AggregateError> {
    let nodes = match dataset {
        Value::Null => return Ok(DailyAverages::default()),
        Value::Object(nodes) => nodes,
        other => {
            return Err(AggregateError::MalformedInput {
                found: json_kind(other),
            });
        }
    };

    let fields = dedup_fields(fields);
    let mut stats = RunStats::default();
    let mut samples: BTreeMap<u32, BTreeMap<String, Vec<f64>>> = BTreeMap::new();

    for node in nodes.values() {
        stats.nodes += 1;
        for packet in node_packets(node) {
            stats.packets += 1;
            let Some(date) = packet.date(options.offset) else {
                stats.bad_timestamp += 1;
                continue;
            };
            if date.month() != month.number() {
                stats.other_month += 1;
                continue;
            }
            for field in &fields {
                if let FieldLookup::Number(v) = packet.lookup(field, options.field_match) {
                    samples
                        .entry(date.day())
                        .or_default()
                        .entry((*field).to_string())
                        .or_default()
                        .push(v);
                    stats.samples += 1;
                }
            }
        }
    }

    debug!(
        month = %month,
        nodes = stats.nodes,
        packets = stats.packets,
        bad_timestamp = stats.bad_timestamp,
        other_month = stats.other_month,
        samples = stats.samples,
        days = samples.len(),
        "aggregated daily samples"
    );

    let days = samples
        .into_iter()
        .map(|(day, by_field)| {
            let means = by_field
                .into_iter()
                .map(|(field, values)| (field, mean_f64(&values)))
                .collect();
            (day, means)
        })
        .collect();
    Ok(DailyAverages::new(days))
}

/// Packets of one node: the `Packets` child when present, else the node itself.
/// The store returns integer-keyed children as an array; `null` holes and
/// non-object entries yield nothing.
fn node_packets(node: &Value) -> impl Iterator<Item = RawPacket<'_>> {
    let entries: Vec<&Value> = match node {
        Value::Object(obj) => match obj.get(PACKETS_KEY) {
            Some(Value::Object(packets)) => packets.values().collect(),
            Some(Value::Array(packets)) => packets.iter().collect(),
            Some(_) => Vec::new(),
            None => obj.values().collect(),
        },
        Value::Array(packets) => packets.iter().collect(),
        _ => Vec::new(),
    };
    entries.into_iter().filter_map(RawPacket::from_value)
}

fn dedup_fields(fields: &[String]) -> Vec<&str> {
    let mut out: Vec<&str> = Vec::with_capacity(fields.len());
    for field in fields {
        if !out.contains(&field.as_str()) {
            out.push(field.as_str());
        }
    }
    out
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn mean_f64(v: &[f64]) -> f64 {
    if v.is_empty() {
        return 0.0;
    }
    v.iter().sum::<f64>() / (v.len() as f64)
}
