// file: src/pipeline/runner.rs
// description: coordinates streaming, filtering, cleaning, and shard upload
// reference: sequential ingestion workflow

use crate::cleaner::{RecordFilter, strip_xml};
use crate::config::Config;
use crate::error::Result;
use crate::hub::{DatasetHub, RecordSource};
use crate::models::CleanRecord;
use crate::pipeline::progress::{PipelineStats, ProgressTracker};
use crate::pipeline::shard::ShardWriter;
use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Stop after reading this many records from the source.
    pub limit: Option<usize>,
    pub colored: bool,
}

/// Drives the single sequential loop: read, filter, strip, shard. One record
/// at a time, each upload awaited before the next read; the only state is
/// the shard writer's buffer.
pub struct PipelineRunner {
    config: Config,
}

impl PipelineRunner {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub async fn run<S, H>(
        &self,
        source: &mut S,
        hub: &H,
        options: &RunOptions,
    ) -> Result<PipelineStats>
    where
        S: RecordSource,
        H: DatasetHub + ?Sized,
    {
        info!(
            "Cleaning {} into {}",
            self.config.source.dataset, self.config.target.dataset
        );

        hub.create_repo(&self.config.target.dataset).await?;

        let filter = RecordFilter::new(self.config.filter.clone());
        let mut writer = ShardWriter::new(
            hub,
            &self.config.target.dataset,
            self.work_dir(),
            self.config.pipeline.chunk_size,
            self.config.pipeline.keep_local,
        )?;

        let progress = ProgressTracker::with_color(source.size_hint(), options.colored);
        let mut total_known = source.size_hint().is_some();
        let mut records_read = 0usize;

        loop {
            if let Some(limit) = options.limit
                && records_read >= limit
            {
                info!("Record limit {} reached", limit);
                break;
            }

            let Some(record) = source.next_record().await? else {
                break;
            };
            records_read += 1;

            if !total_known && let Some(total) = source.size_hint() {
                progress.set_total(total);
                total_known = true;
            }

            if let Some(reason) = filter.rejection(&record) {
                debug!(
                    "Filtered record {:?}: {:?}",
                    record.url.as_deref().unwrap_or("<no url>"),
                    reason
                );
                progress.inc_filtered();
                continue;
            }

            let cleaned = CleanRecord::new(
                record.url.clone(),
                strip_xml(record.body()),
                self.config.pipeline.source_label.clone(),
            );

            if let Some(flush) = writer.append(cleaned).await? {
                progress.add_shard(flush.bytes);
                progress.set_message(format!("Uploaded {}", flush.file_name));
            }
            progress.inc_cleaned();
        }

        // remainder below the chunk size still ships
        if let Some(flush) = writer.flush().await? {
            progress.add_shard(flush.bytes);
            info!("Final shard {} ({} records)", flush.file_name, flush.records);
        }

        let stats = progress.get_stats();
        progress.finish();
        self.log_final_stats(&stats);

        Ok(stats)
    }

    fn work_dir(&self) -> PathBuf {
        self.config.pipeline.work_dir.clone().unwrap_or_else(|| {
            std::env::temp_dir().join(format!("bwb_clean_{}", std::process::id()))
        })
    }

    fn log_final_stats(&self, stats: &PipelineStats) {
        info!("=== Pipeline Execution Summary ===");
        info!("Duration: {} seconds", stats.duration_secs);
        info!("Records seen: {}", stats.records_seen);
        info!(
            "Records filtered: {} ({:.2}%)",
            stats.records_filtered,
            stats.filter_rate()
        );
        info!("Records cleaned: {}", stats.records_cleaned);
        info!("Shards uploaded: {}", stats.shards_uploaded);
        info!("Bytes uploaded: {}", stats.bytes_uploaded);
        info!(
            "Processing speed: {:.2} records/sec",
            stats.records_per_second()
        );
        info!("=================================");
    }
}
