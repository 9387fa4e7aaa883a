//! Text-level reductions over per-word difficulties

/// Select the element at index `n / 2` (integer division) of the ascending order.
///
/// For odd `n` this is the true median. For even `n` it is the upper of the two
/// middle elements, never their mean: `[0.1, 0.2, 0.3, 0.4]` selects `0.3`.
/// Downstream rankings were tuned against this selection, so it is kept as is.
///
/// Returns `None` for an empty slice. NaN values sort last.
pub fn upper_biased_index_select(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    Some(sorted[sorted.len() / 2])
}

/// Arithmetic mean, `None` for an empty slice
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_elements_pick_middle() {
        assert_eq!(upper_biased_index_select(&[0.2, 0.5, 0.9]), Some(0.5));
        assert_eq!(upper_biased_index_select(&[0.9, 0.2, 0.5]), Some(0.5));
    }

    #[test]
    fn test_even_length_picks_upper_middle() {
        assert_eq!(upper_biased_index_select(&[0.4, 0.1, 0.3, 0.2]), Some(0.3));
        assert_eq!(upper_biased_index_select(&[0.0, 1.0]), Some(1.0));
    }

    #[test]
    fn test_single_and_empty() {
        assert_eq!(upper_biased_index_select(&[0.7]), Some(0.7));
        assert_eq!(upper_biased_index_select(&[]), None);
    }

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[]), None);
        let m = mean(&[0.0004, 0.1, 1.0]).unwrap();
        assert!((m - 0.3668).abs() < 1e-4);
    }
}
