//! Structural merge of nested YAML values.
//!
//! Merge semantics (`override` wins):
//! - mapping ⊕ mapping: merged key by key, recursively
//! - anything else: the override value replaces the base, including
//!   sequences and an explicit `null`
//!
//! Keys keep their base order; keys new in the override are appended in the
//! override's order.

use serde_yaml::{Mapping, Value};

/// Right-biased deep merge of two values.
pub fn merge(base: Value, over: Value) -> Value {
    match (base, over) {
        (Value::Mapping(base_map), Value::Mapping(over_map)) => {
            Value::Mapping(merge_mappings(base_map, over_map))
        }
        (_, over) => over,
    }
}

/// Right-biased deep merge of two mappings.
pub fn merge_mappings(mut base: Mapping, over: Mapping) -> Mapping {
    for (key, over_value) in over {
        match base.get_mut(&key) {
            Some(slot) => {
                let base_value = std::mem::take(slot);
                *slot = merge(base_value, over_value);
            }
            None => {
                base.insert(key, over_value);
            }
        }
    }
    base
}

/// Concatenate value-file lists: application entries first, then addon entries.
///
/// No deduplication; both orders are preserved.
pub fn concat_value_files(app: &[String], addon: &[String]) -> Vec<String> {
    app.iter().chain(addon.iter()).cloned().collect()
}
