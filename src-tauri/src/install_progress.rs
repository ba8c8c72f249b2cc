/// Folds transport notifications into cumulative progress for one job.
///
/// The transport reports `(chunk_bytes, total_bytes)` per chunk. The total is
/// captured from the first notification that carries one and never replaced,
/// so a server that changes its reported size mid-stream yields percentages
/// against the first value.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub(crate) struct ProgressTracker {
    bytes_downloaded: u64,
    total_bytes: Option<u64>,
}

impl ProgressTracker {
    pub(crate) fn record_chunk(&mut self, chunk_bytes: u64, reported_total: u64) {
        if self.total_bytes.is_none() && reported_total > 0 {
            self.total_bytes = Some(reported_total);
        }
        self.bytes_downloaded = self.bytes_downloaded.saturating_add(chunk_bytes);
    }

    pub(crate) fn bytes_downloaded(&self) -> u64 {
        self.bytes_downloaded
    }

    pub(crate) fn total_bytes(&self) -> u64 {
        self.total_bytes.unwrap_or(0)
    }

    pub(crate) fn percent(&self) -> f64 {
        match self.total_bytes {
            Some(total) => (self.bytes_downloaded as f64 * 100.0 / total as f64).clamp(0.0, 100.0),
            None => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn percents(total: u64, chunks: &[u64]) -> Vec<f64> {
        let mut tracker = ProgressTracker::default();
        chunks
            .iter()
            .map(|chunk| {
                tracker.record_chunk(*chunk, total);
                tracker.percent()
            })
            .collect()
    }

    #[test]
    fn percent_follows_accumulated_chunks() {
        assert_eq!(percents(1000, &[100, 400, 500]), vec![10.0, 50.0, 100.0]);
    }

    #[test]
    fn bytes_downloaded_is_the_sum_of_chunks() {
        let chunks = [7_u64, 0, 13, 250, 1];
        let mut tracker = ProgressTracker::default();
        let mut expected = 0;
        for chunk in chunks {
            let before = tracker.bytes_downloaded();
            tracker.record_chunk(chunk, 400);
            expected += chunk;
            assert!(tracker.bytes_downloaded() >= before);
            assert_eq!(tracker.bytes_downloaded(), expected);
            assert_eq!(tracker.percent(), expected as f64 * 100.0 / 400.0);
        }
    }

    #[test]
    fn later_totals_do_not_reset_progress() {
        let mut tracker = ProgressTracker::default();
        tracker.record_chunk(250, 1000);
        tracker.record_chunk(250, 2000);

        assert_eq!(tracker.total_bytes(), 1000);
        assert_eq!(tracker.bytes_downloaded(), 500);
        assert_eq!(tracker.percent(), 50.0);
    }

    #[test]
    fn shrinking_total_is_ignored_and_percent_is_clamped() {
        let mut tracker = ProgressTracker::default();
        tracker.record_chunk(600, 1000);
        tracker.record_chunk(600, 800);

        assert_eq!(tracker.total_bytes(), 1000);
        assert_eq!(tracker.percent(), 100.0);
    }

    #[test]
    fn percent_stays_zero_until_total_is_known() {
        let mut tracker = ProgressTracker::default();
        tracker.record_chunk(300, 0);
        assert_eq!(tracker.percent(), 0.0);
        assert_eq!(tracker.total_bytes(), 0);

        tracker.record_chunk(200, 1000);
        assert_eq!(tracker.total_bytes(), 1000);
        assert_eq!(tracker.percent(), 50.0);
    }
}
