//! Passive progress observers for long-running merge loops.

use tracing::debug;

/// Receives a notification after every merge an algorithm performs.
///
/// Observers cannot influence the algorithm; they only see how many of the
/// expected merges have completed.
///
/// # Examples
/// ```
/// use agglo_core::MergeProgress;
///
/// #[derive(Default)]
/// struct Last(Option<(usize, usize)>);
///
/// impl MergeProgress for Last {
///     fn record(&mut self, completed: usize, total: usize) {
///         self.0 = Some((completed, total));
///     }
/// }
///
/// let mut last = Last::default();
/// last.record(3, 9);
/// assert_eq!(last.0, Some((3, 9)));
/// ```
pub trait MergeProgress {
    /// Called with the number of merges completed so far and the number
    /// expected in total.
    fn record(&mut self, completed: usize, total: usize);
}

/// Emits a `debug` event whenever another tenth of the merges completes.
#[derive(Debug, Clone, Default)]
pub struct TracingProgress {
    last_decile: usize,
}

impl TracingProgress {
    /// Creates an observer that has not reported anything yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl MergeProgress for TracingProgress {
    fn record(&mut self, completed: usize, total: usize) {
        if total == 0 {
            return;
        }
        let decile = completed.saturating_mul(10) / total;
        if decile > self.last_decile {
            self.last_decile = decile;
            debug!(completed, total, "merge progress");
        }
    }
}

/// Counts merges on behalf of an optional observer.
pub(crate) struct Ticker<'a> {
    observer: Option<&'a mut dyn MergeProgress>,
    completed: usize,
    total: usize,
}

impl<'a> Ticker<'a> {
    pub(crate) fn new(observer: Option<&'a mut dyn MergeProgress>, total: usize) -> Self {
        Self {
            observer,
            completed: 0,
            total,
        }
    }

    pub(crate) fn tick(&mut self) {
        self.completed += 1;
        if let Some(observer) = self.observer.as_deref_mut() {
            observer.record(self.completed, self.total);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder(Vec<(usize, usize)>);

    impl MergeProgress for Recorder {
        fn record(&mut self, completed: usize, total: usize) {
            self.0.push((completed, total));
        }
    }

    #[test]
    fn ticker_forwards_every_merge() {
        let mut recorder = Recorder::default();
        let mut ticker = Ticker::new(Some(&mut recorder), 3);
        ticker.tick();
        ticker.tick();
        ticker.tick();
        drop(ticker);

        assert_eq!(recorder.0, vec![(1, 3), (2, 3), (3, 3)]);
    }

    #[test]
    fn ticker_without_observer_is_silent() {
        let mut ticker = Ticker::new(None, 2);
        ticker.tick();
        assert_eq!(ticker.completed, 1);
    }

    #[test]
    fn tracing_progress_reports_deciles_once() {
        let mut progress = TracingProgress::new();
        progress.record(1, 100);
        assert_eq!(progress.last_decile, 0);
        progress.record(10, 100);
        progress.record(15, 100);
        assert_eq!(progress.last_decile, 1);
        progress.record(100, 100);
        assert_eq!(progress.last_decile, 10);
    }
}
