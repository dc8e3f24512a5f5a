//! Normalization of vendor token-count fields into canonical usage

use serde_json::Value;

use crate::types::Usage;

/// Path to a vendor usage count, relative to the usage object
pub type FieldPath = &'static [&'static str];

/// Where a vendor reports each token count
#[derive(Debug, Clone, Copy)]
pub struct UsageMapping {
    /// Prompt/input token count
    pub prompt: FieldPath,
    /// Completion/output token count
    pub completion: FieldPath,
    /// Cache-creation token count, if the vendor reports one
    pub cache_creation: Option<FieldPath>,
    /// Cache-read token count, if the vendor reports one
    pub cache_read: Option<FieldPath>,
}

/// Normalize a vendor usage object
///
/// Missing or mistyped counts read as zero. The canonical total is always
/// recomputed from prompt and completion; any vendor total is ignored.
pub fn normalize_usage(vendor_usage: Option<&Value>, mapping: &UsageMapping) -> Usage {
    let Some(vendor_usage) = vendor_usage.filter(|v| !v.is_null()) else {
        return Usage::default();
    };

    let mut usage = Usage::new(
        read_count(vendor_usage, mapping.prompt).unwrap_or_default(),
        read_count(vendor_usage, mapping.completion).unwrap_or_default(),
    );
    usage.cache_creation_tokens = mapping.cache_creation.and_then(|path| read_count(vendor_usage, path));
    usage.cache_read_tokens = mapping.cache_read.and_then(|path| read_count(vendor_usage, path));
    usage
}

/// Read a non-negative count at `path`, logging mistyped values
fn read_count(root: &Value, path: FieldPath) -> Option<u64> {
    let value = path.iter().try_fold(root, |node, key| node.get(key))?;
    if value.is_null() {
        return None;
    }

    let count = value
        .as_u64()
        // Some vendors emit counts as floats (e.g. `12.0`)
        .or_else(|| value.as_f64().filter(|f| f.is_finite() && *f >= 0.0).map(float_to_count));
    if count.is_none() {
        tracing::debug!(field = %path.join("."), "malformed usage count, treating as zero");
    }
    count
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn float_to_count(value: f64) -> u64 {
    value.trunc() as u64
}
