// file: src/pipeline/progress.rs
// description: progress tracking and statistics reporting for pipeline execution
// reference: uses indicatif for progress bars and tracks processing metrics

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Instant;

#[derive(Debug, Clone, Default)]
pub struct PipelineStats {
    pub records_seen: usize,
    pub records_filtered: usize,
    pub records_cleaned: usize,
    pub shards_uploaded: usize,
    pub bytes_uploaded: u64,
    pub duration_secs: u64,
}

impl PipelineStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records_per_second(&self) -> f64 {
        if self.duration_secs == 0 {
            return 0.0;
        }
        self.records_seen as f64 / self.duration_secs as f64
    }

    pub fn filter_rate(&self) -> f64 {
        if self.records_seen == 0 {
            return 0.0;
        }
        (self.records_filtered as f64 / self.records_seen as f64) * 100.0
    }
}

pub struct ProgressTracker {
    main_bar: ProgressBar,
    detail_bar: ProgressBar,
    records_seen: Arc<AtomicUsize>,
    records_filtered: Arc<AtomicUsize>,
    records_cleaned: Arc<AtomicUsize>,
    shards_uploaded: Arc<AtomicUsize>,
    bytes_uploaded: Arc<AtomicU64>,
    start_time: Instant,
}

impl ProgressTracker {
    pub fn new(total_records: Option<u64>) -> Self {
        Self::with_color(total_records, true)
    }

    pub fn with_color(total_records: Option<u64>, colored: bool) -> Self {
        let multi_progress = MultiProgress::new();

        let main_bar = create_progress_bar(&multi_progress, total_records, colored);
        let detail_bar = create_detail_bar(&multi_progress);

        Self {
            main_bar,
            detail_bar,
            records_seen: Arc::new(AtomicUsize::new(0)),
            records_filtered: Arc::new(AtomicUsize::new(0)),
            records_cleaned: Arc::new(AtomicUsize::new(0)),
            shards_uploaded: Arc::new(AtomicUsize::new(0)),
            bytes_uploaded: Arc::new(AtomicU64::new(0)),
            start_time: Instant::now(),
        }
    }

    /// The source may only learn its total after the first page fetch.
    pub fn set_total(&self, total: u64) {
        self.main_bar.set_length(total);
    }

    pub fn inc_cleaned(&self) {
        self.records_seen.fetch_add(1, Ordering::SeqCst);
        self.records_cleaned.fetch_add(1, Ordering::SeqCst);
        self.main_bar.inc(1);
        self.update_detail_bar();
    }

    pub fn inc_filtered(&self) {
        self.records_seen.fetch_add(1, Ordering::SeqCst);
        self.records_filtered.fetch_add(1, Ordering::SeqCst);
        self.main_bar.inc(1);
        self.update_detail_bar();
    }

    pub fn add_shard(&self, bytes: u64) {
        self.shards_uploaded.fetch_add(1, Ordering::SeqCst);
        self.bytes_uploaded.fetch_add(bytes, Ordering::SeqCst);
        self.update_detail_bar();
    }

    pub fn set_message(&self, message: String) {
        self.detail_bar.set_message(message);
    }

    pub fn finish(&self) {
        self.main_bar.finish_with_message("Stream exhausted");
        self.detail_bar.finish_and_clear();
    }

    pub fn get_stats(&self) -> PipelineStats {
        let duration = self.start_time.elapsed().as_secs();

        PipelineStats {
            records_seen: self.records_seen.load(Ordering::SeqCst),
            records_filtered: self.records_filtered.load(Ordering::SeqCst),
            records_cleaned: self.records_cleaned.load(Ordering::SeqCst),
            shards_uploaded: self.shards_uploaded.load(Ordering::SeqCst),
            bytes_uploaded: self.bytes_uploaded.load(Ordering::SeqCst),
            duration_secs: duration,
        }
    }

    fn update_detail_bar(&self) {
        let cleaned = self.records_cleaned.load(Ordering::SeqCst);
        let filtered = self.records_filtered.load(Ordering::SeqCst);
        let shards = self.shards_uploaded.load(Ordering::SeqCst);

        let message = format!(
            "Cleaned: {} | Filtered: {} | Shards: {}",
            cleaned, filtered, shards
        );

        self.detail_bar.set_message(message);
    }
}

impl Drop for ProgressTracker {
    fn drop(&mut self) {
        self.finish();
    }
}

fn create_progress_bar(
    multi_progress: &MultiProgress,
    total: Option<u64>,
    colored: bool,
) -> ProgressBar {
    let bar = match total {
        Some(total) => multi_progress.add(ProgressBar::new(total)),
        None => multi_progress.add(ProgressBar::no_length()),
    };
    if colored {
        bar.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}",
                )
                .expect("Failed to create progress bar template")
                .progress_chars("█▓▒░"),
        );
    } else {
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({eta}) {msg}")
                .expect("Failed to create progress bar template")
                .progress_chars("=>-"),
        );
    }
    bar
}

fn create_detail_bar(multi_progress: &MultiProgress) -> ProgressBar {
    let bar = multi_progress.add(ProgressBar::new(0));
    let style = ProgressStyle::default_bar()
        .template("{msg}")
        .expect("Failed to create detail bar template");
    bar.set_style(style);
    bar
}
