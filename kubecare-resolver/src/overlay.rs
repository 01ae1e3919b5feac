//! Overlay application: opt-in value fragments from an addon's catalog.

use std::collections::BTreeMap;

use serde_yaml::Mapping;

use kubecare_core::values::merge_mappings;

/// Fold each requested overlay into `values`, in request order.
///
/// Later overlays override earlier ones on conflicting keys. A name with no
/// catalog entry is skipped without error.
pub fn apply_overlays<S: AsRef<str>>(
    values: Mapping,
    catalog: &BTreeMap<String, Mapping>,
    requested: &[S],
) -> Mapping {
    requested.iter().fold(values, |acc, name| {
        let name = name.as_ref();
        match catalog.get(name) {
            Some(fragment) => merge_mappings(acc, fragment.clone()),
            None => {
                tracing::debug!("overlay `{name}` not defined by addon, skipping");
                acc
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(s: &str) -> Mapping {
        serde_yaml::from_str(s).expect("yaml fixture")
    }

    fn catalog() -> BTreeMap<String, Mapping> {
        BTreeMap::from([
            ("metrics".to_string(), mapping("metrics: {enabled: true, port: 9100}")),
            ("ha".to_string(), mapping("replicas: 3\nmetrics: {port: 9200}")),
        ])
    }

    #[test]
    fn unknown_overlay_is_a_no_op() {
        let values = mapping("replicas: 1");
        let out = apply_overlays(values.clone(), &catalog(), &["does-not-exist"]);
        assert_eq!(out, values);
    }

    #[test]
    fn overlays_merge_in_request_order() {
        let values = mapping("replicas: 1\nimage: nginx");
        let out = apply_overlays(values, &catalog(), &["metrics", "ha"]);
        assert_eq!(
            out,
            mapping("replicas: 3\nimage: nginx\nmetrics: {enabled: true, port: 9200}")
        );

        let reversed = apply_overlays(mapping("replicas: 1"), &catalog(), &["ha", "metrics"]);
        assert_eq!(reversed, mapping("replicas: 3\nmetrics: {enabled: true, port: 9100}"));
    }

    #[test]
    fn unknown_names_between_known_ones_are_skipped() {
        let out = apply_overlays(Mapping::new(), &catalog(), &["nope", "metrics", "also-nope"]);
        assert_eq!(out, mapping("metrics: {enabled: true, port: 9100}"));
    }

    #[test]
    fn empty_request_leaves_values_untouched() {
        let values = mapping("a: 1");
        let none: [&str; 0] = [];
        assert_eq!(apply_overlays(values.clone(), &catalog(), &none), values);
    }
}
