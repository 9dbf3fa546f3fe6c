use faer::MatRef;
use num_traits::Float;

/////////////////////
// Hard assignment //
/////////////////////

/// Hard cluster labels from a soft membership matrix
///
/// Row-wise argmax of `h`. Ties resolve to the lowest column index and NaN
/// entries never win.
///
/// ### Params
///
/// * `h` - Membership matrix (n x k)
///
/// ### Returns
///
/// Vector of length n with labels in `[0, k)`
pub fn extract_clusters<T>(h: MatRef<T>) -> Vec<usize>
where
    T: Float,
{
    (0..h.nrows())
        .map(|i| {
            let mut best = 0;
            for r in 1..h.ncols() {
                // strict comparison keeps the lowest index on ties
                if h[(i, r)] > h[(i, best)] || h[(i, best)].is_nan() {
                    best = r;
                }
            }
            best
        })
        .collect()
}

/// Number of points per cluster
///
/// ### Params
///
/// * `labels` - Cluster label per point
/// * `k` - Number of clusters
///
/// ### Returns
///
/// Vector of length `k` with the cluster sizes; labels `>= k` are ignored
pub fn cluster_sizes(labels: &[usize], k: usize) -> Vec<usize> {
    let mut sizes = vec![0; k];
    for &l in labels {
        if l < k {
            sizes[l] += 1;
        }
    }
    sizes
}

///////////
// Tests //
///////////

#[cfg(test)]
mod test_labels {
    use super::*;
    use faer::Mat;

    #[test]
    fn test_dominant_entry() {
        let h = Mat::from_fn(3, 3, |i, r| if i == r { 1.0 } else { 0.1 });
        assert_eq!(extract_clusters(h.as_ref()), vec![0, 1, 2]);
    }

    #[test]
    fn test_tie_goes_to_lowest_index() {
        let rows = [[0.2, 0.7, 0.7], [0.5, 0.5, 0.1], [0.3, 0.3, 0.3]];
        let h = Mat::from_fn(3, 3, |i, r| rows[i][r]);
        assert_eq!(extract_clusters(h.as_ref()), vec![1, 0, 0]);
    }

    #[test]
    fn test_nan_never_wins() {
        let rows = [[f64::NAN, 0.1], [0.4, f64::NAN]];
        let h = Mat::from_fn(2, 2, |i, r| rows[i][r]);
        assert_eq!(extract_clusters(h.as_ref()), vec![1, 0]);
    }

    #[test]
    fn test_single_column() {
        let h = Mat::from_fn(4, 1, |i, _| i as f64);
        assert_eq!(extract_clusters(h.as_ref()), vec![0; 4]);
    }

    #[test]
    fn test_cluster_sizes() {
        assert_eq!(cluster_sizes(&[0, 1, 1, 2, 1], 3), vec![1, 3, 1]);
        assert_eq!(cluster_sizes(&[0, 5], 2), vec![1, 0]);
    }
}
