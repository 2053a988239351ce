//! Before/after statistics for a single normalization.

use mailprep_types::NormalizationStats;

/// Compares an original text with its preprocessed form.
///
/// Lengths are counted in characters. An empty original has a reduction
/// ratio of zero.
pub fn validate(original: &str, preprocessed: &str) -> NormalizationStats {
    let original_length = original.chars().count();
    let preprocessed_length = preprocessed.chars().count();

    let reduction_ratio = if original_length > 0 {
        (1.0 - preprocessed_length as f64 / original_length as f64) * 100.0
    } else {
        0.0
    };

    NormalizationStats {
        original_length,
        preprocessed_length,
        reduction_ratio,
        is_valid: preprocessed_length > 0,
    }
}
