//! Ordered fallback chains.
//!
//! Candidates are scanned left to right and the first present one wins. The
//! order encodes precedence: application > addon > cluster > environment.

use kubecare_core::ResolveError;

/// Whether a candidate counts as declared.
pub trait Presence {
    fn is_present(&self) -> bool;
}

impl Presence for str {
    fn is_present(&self) -> bool {
        !self.is_empty()
    }
}

impl Presence for String {
    fn is_present(&self) -> bool {
        !self.is_empty()
    }
}

/// First candidate that is `Some` and present.
pub fn first_present<'a, T>(candidates: impl IntoIterator<Item = Option<&'a T>>) -> Option<&'a T>
where
    T: Presence + ?Sized + 'a,
{
    candidates
        .into_iter()
        .flatten()
        .find(|candidate| candidate.is_present())
}

/// First non-empty string, or `MissingRequiredField { field }`.
pub fn resolve_string<'a>(
    field: &str,
    candidates: impl IntoIterator<Item = Option<&'a str>>,
) -> Result<String, ResolveError> {
    first_present(candidates)
        .map(str::to_owned)
        .ok_or_else(|| ResolveError::missing(field))
}

/// First non-empty string, or `default`.
pub fn resolve_string_with_default<'a>(
    default: &str,
    candidates: impl IntoIterator<Item = Option<&'a str>>,
) -> String {
    first_present(candidates).unwrap_or(default).to_owned()
}

/// First declared boolean, whatever its value, or `default`.
pub fn resolve_bool_with_default(
    default: bool,
    candidates: impl IntoIterator<Item = Option<bool>>,
) -> bool {
    candidates.into_iter().flatten().next().unwrap_or(default)
}
