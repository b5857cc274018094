//! Snapshot fingerprints for provenance.
//!
//! A fingerprint identifies the exact graph state a query was answered
//! against. Two snapshots with the same nodes and relationships produce the
//! same fingerprint regardless of insertion order.
//!
//! ## Determinism
//!
//! - Node ids and edge triples are sorted before hashing
//! - Maps in the identity input are avoided entirely; only sorted vectors
//!   are serialized
//! - Hash is xxh64 over canonical JSON bytes, rendered as 16 hex chars

use serde::Serialize;
use xxhash_rust::xxh64::xxh64;

use crate::types::{NodeId, RelationshipType};

/// Identity input for a snapshot fingerprint.
///
/// Fields are serialized in declaration order; all vectors must be sorted
/// by the caller before hashing.
#[derive(Debug, Serialize)]
struct FingerprintInput<'a> {
    node_count: u64,
    edge_count: u64,
    node_ids: &'a [&'a NodeId],
    edge_triples: &'a [(&'a NodeId, &'a NodeId, RelationshipType)],
}

/// Serialize a value to canonical JSON bytes for hashing.
fn to_canonical_bytes<T: Serialize>(value: &T) -> Vec<u8> {
    serde_json::to_vec(value).expect("fingerprint serialization failed")
}

/// Compute the fingerprint of a graph snapshot from its sorted identity.
///
/// `node_ids` must be sorted; `edge_triples` must be sorted by
/// (source, target, type). [`crate::types::ContentGraph`] guarantees both by
/// construction (BTree-backed indices).
pub(crate) fn snapshot_fingerprint(
    node_ids: &[&NodeId],
    edge_triples: &[(&NodeId, &NodeId, RelationshipType)],
) -> String {
    let input = FingerprintInput {
        node_count: node_ids.len() as u64,
        edge_count: edge_triples.len() as u64,
        node_ids,
        edge_triples,
    };
    let hash = xxh64(&to_canonical_bytes(&input), 0);
    format!("{hash:016x}")
}
