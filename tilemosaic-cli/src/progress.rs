//! Terminal progress bar for tile downloads.

use indicatif::{ProgressBar, ProgressStyle};
use tilemosaic::coord::TileIndex;
use tilemosaic::orchestrator::ProgressReporter;

const TEMPLATE: &str = "{spinner} Fetching tiles {wide_bar} {pos}/{len} [{elapsed_precise}]";

/// Progress reporter drawing an indicatif bar on stderr.
pub struct DownloadProgress {
    bar: ProgressBar,
}

impl DownloadProgress {
    pub fn new() -> Self {
        let style = ProgressStyle::with_template(TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        Self {
            bar: ProgressBar::new(0).with_style(style),
        }
    }

    /// Hidden bar, for tests and non-interactive runs.
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    pub fn length(&self) -> Option<u64> {
        self.bar.length()
    }
}

impl Default for DownloadProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for DownloadProgress {
    fn on_planned(&self, count: u64) {
        self.bar.set_length(count);
    }

    fn on_tile_fetched(&self, _index: TileIndex, done: u64, _total: u64) {
        self.bar.set_position(done);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracks_counts() {
        let progress = DownloadProgress::hidden();
        progress.on_planned(9);
        progress.on_tile_fetched(TileIndex::new(4, 8, 8), 3, 9);

        assert_eq!(progress.length(), Some(9));
        assert_eq!(progress.position(), 3);
    }

    #[test]
    fn test_template_is_valid() {
        assert!(ProgressStyle::with_template(TEMPLATE).is_ok());
    }
}
