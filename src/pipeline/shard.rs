// file: src/pipeline/shard.rs
// description: buffered shard serialization and upload at batch boundaries
// reference: internal batch writer

use crate::error::Result;
use crate::hub::DatasetHub;
use crate::models::CleanRecord;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info};

/// What one flush produced, for progress reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShardFlush {
    pub file_name: String,
    pub records: usize,
    pub bytes: u64,
}

/// Totals over a writer's lifetime.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShardTotals {
    pub records: usize,
    pub shards: usize,
    pub bytes: u64,
}

/// Accumulates cleaned records and writes them out as numbered JSONL shards,
/// uploading each shard through the injected hub as soon as it is full.
/// Records are never reordered; a record accepted by `append` is part of
/// exactly one uploaded shard once the final `flush` has run.
pub struct ShardWriter<'a, H: DatasetHub + ?Sized> {
    hub: &'a H,
    repo: String,
    work_dir: PathBuf,
    chunk_size: usize,
    keep_local: bool,
    buffer: Vec<CleanRecord>,
    shard_index: usize,
    totals: ShardTotals,
}

impl<'a, H: DatasetHub + ?Sized> ShardWriter<'a, H> {
    pub fn new(
        hub: &'a H,
        repo: impl Into<String>,
        work_dir: impl Into<PathBuf>,
        chunk_size: usize,
        keep_local: bool,
    ) -> Result<Self> {
        let work_dir = work_dir.into();
        fs::create_dir_all(&work_dir)?;

        Ok(Self {
            hub,
            repo: repo.into(),
            work_dir,
            chunk_size,
            keep_local,
            buffer: Vec::with_capacity(chunk_size),
            shard_index: 0,
            totals: ShardTotals::default(),
        })
    }

    /// Fixed-width zero-padded shard naming: `data_00000.jsonl`, ...
    pub fn shard_file_name(index: usize) -> String {
        format!("data_{:05}.jsonl", index)
    }

    /// Buffer one record; flushes when the buffer reaches the chunk size.
    pub async fn append(&mut self, record: CleanRecord) -> Result<Option<ShardFlush>> {
        self.buffer.push(record);

        if self.buffer.len() >= self.chunk_size {
            return self.flush().await;
        }

        Ok(None)
    }

    /// Serialize the buffer to the next shard file, upload it, and clear
    /// local state. A no-op on an empty buffer.
    pub async fn flush(&mut self) -> Result<Option<ShardFlush>> {
        if self.buffer.is_empty() {
            return Ok(None);
        }

        let file_name = Self::shard_file_name(self.shard_index);
        let path = self.work_dir.join(&file_name);

        let mut payload = String::new();
        for record in &self.buffer {
            payload.push_str(&record.to_jsonl_line()?);
        }
        fs::write(&path, &payload)?;

        debug!(
            "Wrote shard {} with {} records ({} bytes)",
            file_name,
            self.buffer.len(),
            payload.len()
        );

        self.hub.upload_file(&self.repo, &file_name, &path).await?;

        if !self.keep_local {
            fs::remove_file(&path)?;
        }

        let flush = ShardFlush {
            file_name,
            records: self.buffer.len(),
            bytes: payload.len() as u64,
        };

        self.totals.records += flush.records;
        self.totals.shards += 1;
        self.totals.bytes += flush.bytes;
        self.buffer.clear();
        self.shard_index += 1;

        Ok(Some(flush))
    }

    /// Flush any remainder and return lifetime totals.
    pub async fn finish(mut self) -> Result<ShardTotals> {
        if let Some(flush) = self.flush().await? {
            info!("Final shard {} ({} records)", flush.file_name, flush.records);
        }
        Ok(self.totals)
    }

    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    pub fn totals(&self) -> &ShardTotals {
        &self.totals
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::path::Path;
    use std::sync::Mutex;

    /// Captures each upload's shard name and file content at upload time.
    #[derive(Default)]
    struct RecordingHub {
        uploads: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl DatasetHub for RecordingHub {
        async fn create_repo(&self, _repo: &str) -> Result<()> {
            Ok(())
        }

        async fn upload_file(
            &self,
            _repo: &str,
            path_in_repo: &str,
            local_path: &Path,
        ) -> Result<()> {
            let content = std::fs::read_to_string(local_path)?;
            self.uploads
                .lock()
                .unwrap()
                .push((path_in_repo.to_string(), content));
            Ok(())
        }
    }

    fn record(n: usize) -> CleanRecord {
        CleanRecord::new(
            Some(format!("https://example.org/{n}")),
            format!("tekst {n}"),
            "Basiswettenbestand",
        )
    }

    #[test]
    fn test_shard_file_names() {
        assert_eq!(
            ShardWriter::<RecordingHub>::shard_file_name(0),
            "data_00000.jsonl"
        );
        assert_eq!(
            ShardWriter::<RecordingHub>::shard_file_name(2),
            "data_00002.jsonl"
        );
        assert_eq!(
            ShardWriter::<RecordingHub>::shard_file_name(12345),
            "data_12345.jsonl"
        );
    }

    #[tokio::test]
    async fn test_2500_records_make_three_shards() {
        let hub = RecordingHub::default();
        let dir = tempfile::tempdir().unwrap();
        let mut writer = ShardWriter::new(&hub, "org/clean", dir.path(), 1000, false).unwrap();

        for n in 0..2500 {
            writer.append(record(n)).await.unwrap();
        }
        let totals = writer.finish().await.unwrap();

        assert_eq!(totals.shards, 3);
        assert_eq!(totals.records, 2500);

        let uploads = hub.uploads.lock().unwrap();
        let names: Vec<&str> = uploads.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(
            names,
            vec!["data_00000.jsonl", "data_00001.jsonl", "data_00002.jsonl"]
        );

        let sizes: Vec<usize> = uploads
            .iter()
            .map(|(_, content)| content.lines().count())
            .collect();
        assert_eq!(sizes, vec![1000, 1000, 500]);
    }

    #[tokio::test]
    async fn test_order_preserved_across_shards() {
        let hub = RecordingHub::default();
        let dir = tempfile::tempdir().unwrap();
        let mut writer = ShardWriter::new(&hub, "org/clean", dir.path(), 2, false).unwrap();

        for n in 0..5 {
            writer.append(record(n)).await.unwrap();
        }
        writer.finish().await.unwrap();

        let uploads = hub.uploads.lock().unwrap();
        let all_lines: Vec<String> = uploads
            .iter()
            .flat_map(|(_, content)| content.lines().map(String::from).collect::<Vec<_>>())
            .collect();

        assert_eq!(all_lines.len(), 5);
        for (n, line) in all_lines.iter().enumerate() {
            let parsed: CleanRecord = serde_json::from_str(line).unwrap();
            assert_eq!(parsed.url.as_deref(), Some(format!("https://example.org/{n}").as_str()));
        }
    }

    #[tokio::test]
    async fn test_empty_writer_uploads_nothing() {
        let hub = RecordingHub::default();
        let dir = tempfile::tempdir().unwrap();
        let writer = ShardWriter::new(&hub, "org/clean", dir.path(), 10, false).unwrap();

        let totals = writer.finish().await.unwrap();
        assert_eq!(totals, ShardTotals::default());
        assert!(hub.uploads.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_local_files_removed_after_upload() {
        let hub = RecordingHub::default();
        let dir = tempfile::tempdir().unwrap();
        let mut writer = ShardWriter::new(&hub, "org/clean", dir.path(), 1, false).unwrap();

        writer.append(record(0)).await.unwrap();
        writer.finish().await.unwrap();

        assert!(!dir.path().join("data_00000.jsonl").exists());
    }

    #[tokio::test]
    async fn test_keep_local_retains_files() {
        let hub = RecordingHub::default();
        let dir = tempfile::tempdir().unwrap();
        let mut writer = ShardWriter::new(&hub, "org/clean", dir.path(), 1, true).unwrap();

        writer.append(record(0)).await.unwrap();
        writer.finish().await.unwrap();

        let kept = dir.path().join("data_00000.jsonl");
        assert!(kept.exists());
        let content = std::fs::read_to_string(kept).unwrap();
        assert!(content.contains("\"source\":\"Basiswettenbestand\""));
    }

    #[tokio::test]
    async fn test_append_reports_flush_at_boundary() {
        let hub = RecordingHub::default();
        let dir = tempfile::tempdir().unwrap();
        let mut writer = ShardWriter::new(&hub, "org/clean", dir.path(), 2, false).unwrap();

        assert!(writer.append(record(0)).await.unwrap().is_none());
        let flush = writer.append(record(1)).await.unwrap().unwrap();
        assert_eq!(flush.file_name, "data_00000.jsonl");
        assert_eq!(flush.records, 2);
        assert_eq!(writer.buffered(), 0);
    }

    #[tokio::test]
    async fn test_non_ascii_written_unescaped() {
        let hub = RecordingHub::default();
        let dir = tempfile::tempdir().unwrap();
        let mut writer = ShardWriter::new(&hub, "org/clean", dir.path(), 10, false).unwrap();

        writer
            .append(CleanRecord::new(
                None,
                "wĳziging één".to_string(),
                "Basiswettenbestand",
            ))
            .await
            .unwrap();
        writer.finish().await.unwrap();

        let uploads = hub.uploads.lock().unwrap();
        assert!(uploads[0].1.contains("wĳziging één"));
        assert!(!uploads[0].1.contains("\\u"));
    }
}
