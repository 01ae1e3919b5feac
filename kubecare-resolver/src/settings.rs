//! `%SETTINGS_<key>` placeholder substitution.
//!
//! Substitution runs on serialized text after all structural merging. It is a
//! plain substring replace: no escaping, and replaced values are not scanned
//! again. Keys are applied longest first, so a key that is a prefix of another
//! (`env` vs `env_name`) never clobbers the longer token.

use kubecare_core::StringMap;

/// Token prefix recognised in values and in the ingress host.
pub const SETTINGS_PREFIX: &str = "%SETTINGS_";

/// Merge settings layers; later layers override earlier ones on the same key.
pub fn merge_settings<'a>(layers: impl IntoIterator<Item = &'a StringMap>) -> StringMap {
    let mut merged = StringMap::new();
    for layer in layers {
        merged.extend(layer.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
    merged
}

/// Replace every `%SETTINGS_<key>` in `text` with the value for `key`.
///
/// Tokens without a matching key are left verbatim.
pub fn substitute(text: &str, settings: &StringMap) -> String {
    if !text.contains(SETTINGS_PREFIX) {
        return text.to_owned();
    }

    let mut keys: Vec<&String> = settings.keys().collect();
    keys.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

    // Replaced values live in their own segments; later keys only scan raw text.
    let mut segments: Vec<Segment> = vec![Segment::Raw(text.to_owned())];
    for key in keys {
        let token = format!("{SETTINGS_PREFIX}{key}");
        let value = &settings[key];
        segments = segments
            .into_iter()
            .flat_map(|segment| segment.split_on(&token, value))
            .collect();
    }
    segments.into_iter().map(Segment::into_string).collect()
}

enum Segment {
    Raw(String),
    Replaced(String),
}

impl Segment {
    fn split_on(self, token: &str, value: &str) -> Vec<Segment> {
        let raw = match self {
            Segment::Raw(raw) if raw.contains(token) => raw,
            other => return vec![other],
        };
        let mut out = Vec::new();
        let mut parts = raw.split(token).peekable();
        while let Some(part) = parts.next() {
            if !part.is_empty() {
                out.push(Segment::Raw(part.to_owned()));
            }
            if parts.peek().is_some() {
                out.push(Segment::Replaced(value.to_owned()));
            }
        }
        out
    }

    fn into_string(self) -> String {
        match self {
            Segment::Raw(s) | Segment::Replaced(s) => s,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(pairs: &[(&str, &str)]) -> StringMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn replaces_token_inside_text() {
        let out = substitute("repo: %SETTINGS_env/app", &settings(&[("env", "prod")]));
        assert_eq!(out, "repo: prod/app");
    }

    #[test]
    fn replaces_every_occurrence() {
        let out = substitute(
            "a: %SETTINGS_d\nb: x.%SETTINGS_d",
            &settings(&[("d", "example.com")]),
        );
        assert_eq!(out, "a: example.com\nb: x.example.com");
    }

    #[test]
    fn unused_key_has_no_effect() {
        let text = "host: grafana.local";
        assert_eq!(substitute(text, &settings(&[("domain", "example.com")])), text);
    }

    #[test]
    fn unknown_token_left_verbatim() {
        let text = "host: %SETTINGS_missing";
        assert_eq!(substitute(text, &settings(&[("domain", "x")])), text);
    }

    #[test]
    fn replaced_values_are_not_rescanned() {
        let out = substitute(
            "v: %SETTINGS_a",
            &settings(&[("a", "%SETTINGS_b"), ("b", "boom")]),
        );
        assert_eq!(out, "v: %SETTINGS_b");
    }

    #[test]
    fn longer_key_wins_over_prefix_key() {
        let out = substitute(
            "%SETTINGS_env_name-%SETTINGS_env",
            &settings(&[("env", "prod"), ("env_name", "production")]),
        );
        assert_eq!(out, "production-prod");
    }

    #[test]
    fn later_layers_override() {
        let addon = settings(&[("domain", "addon.io"), ("tier", "base")]);
        let cluster = settings(&[("domain", "cluster.io")]);
        let app = settings(&[("tier", "gold")]);
        let merged = merge_settings([&addon, &cluster, &app]);
        assert_eq!(merged, settings(&[("domain", "cluster.io"), ("tier", "gold")]));
    }
}
