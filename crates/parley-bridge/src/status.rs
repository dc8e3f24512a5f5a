//! Classification of vendor finish signals into canonical status

use crate::types::ResponseStatus;

/// Classify a vendor finish/stop reason
///
/// A response is failed only when a finish signal is present and contains
/// "error" in any case. A response with no candidates classifies as
/// completed with empty output; converters that see a separate block
/// indicator pass it as the finish signal.
pub fn classify_status(finish_signal: Option<&str>, had_any_candidate: bool) -> ResponseStatus {
    let failed = finish_signal.is_some_and(|signal| signal.to_ascii_lowercase().contains("error"));

    if failed {
        ResponseStatus::Failed
    } else {
        if !had_any_candidate {
            tracing::debug!("vendor returned no candidates, classifying as completed");
        }
        ResponseStatus::Completed
    }
}
