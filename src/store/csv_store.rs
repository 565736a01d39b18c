use std::fs::{self, File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use csv::{ReaderBuilder, WriterBuilder};

use super::record::{HEADER, StoredRecord};
use super::{MalformedRowPolicy, NumberScan, RecordStore, StorageError};
use crate::config::StoreConfig;
use crate::core::Invoice;

/// Record store backed by a single CSV file.
///
/// The highest number seen is cached per handle once a full scan has
/// succeeded, and raised on every append through this handle. Rows written
/// by other handles or processes are only picked up after
/// [`invalidate`](Self::invalidate), or when caching is disabled.
#[derive(Debug)]
pub struct CsvRecordStore {
    path: PathBuf,
    policy: MalformedRowPolicy,
    cache_enabled: bool,
    high_water: Mutex<Option<u64>>,
}

impl CsvRecordStore {
    /// Store at `path` with the default policy and caching on.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::from_config(&StoreConfig {
            path: path.into(),
            ..StoreConfig::default()
        })
    }

    pub fn from_config(config: &StoreConfig) -> Self {
        Self {
            path: config.path.clone(),
            policy: config.malformed_rows,
            cache_enabled: config.cache_high_water,
            high_water: Mutex::new(None),
        }
    }

    pub fn with_policy(mut self, policy: MalformedRowPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_cache(mut self, enabled: bool) -> Self {
        self.cache_enabled = enabled;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Forget the cached maximum; the next lookup rescans the file.
    pub fn invalidate(&self) {
        *self.high_water() = None;
    }

    fn high_water(&self) -> MutexGuard<'_, Option<u64>> {
        self.high_water.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Full scan of the number column. `None` when the file is absent.
    fn scan(&self) -> Result<Option<u64>, StorageError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StorageError::io(&self.path, e)),
        };

        // Rows are read as bytes: only the number column is decoded, so
        // text in a legacy encoding elsewhere in the row does not matter.
        let mut reader = ReaderBuilder::new().flexible(true).from_reader(file);
        let number_column = HEADER[0].as_bytes();
        let Some(column) = reader
            .byte_headers()?
            .iter()
            .position(|h| h.trim_ascii() == number_column)
        else {
            tracing::warn!(path = %self.path.display(), "record store has no number column");
            return Ok(Some(0));
        };

        let mut scan = NumberScan::new(self.policy);
        let mut rows = 0usize;
        for record in reader.byte_records() {
            let record = record?;
            let line = record.position().map_or(0, |p| p.line());
            let value = record.get(column).map(String::from_utf8_lossy);
            scan.observe(line, value.as_deref())?;
            rows += 1;
        }
        let max = scan.finish();
        tracing::debug!(path = %self.path.display(), rows, max, "scanned record store");
        Ok(Some(max))
    }
}

impl RecordStore for CsvRecordStore {
    fn ensure_initialized(&self) -> Result<(), StorageError> {
        if self.path.exists() {
            return Ok(());
        }
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| StorageError::io(parent, e))?;
        }

        let file = match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)
        {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => return Ok(()),
            Err(e) => return Err(StorageError::io(&self.path, e)),
        };

        let mut writer = WriterBuilder::new().from_writer(file);
        writer.write_record(HEADER)?;
        writer.flush().map_err(|e| StorageError::io(&self.path, e))?;
        tracing::info!(path = %self.path.display(), "created record store");
        Ok(())
    }

    fn append(&self, invoice: &Invoice) -> Result<(), StorageError> {
        let file = match OpenOptions::new().append(true).open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StorageError::NotInitialized {
                    location: self.path.display().to_string(),
                });
            }
            Err(e) => return Err(StorageError::io(&self.path, e)),
        };

        let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
        writer.serialize(StoredRecord::from_invoice(invoice))?;
        let file = writer
            .into_inner()
            .map_err(|e| StorageError::io(&self.path, e.into_error()))?;
        file.sync_data()
            .map_err(|e| StorageError::io(&self.path, e))?;

        if let Some(max) = self.high_water().as_mut() {
            *max = (*max).max(invoice.number());
        }
        tracing::debug!(path = %self.path.display(), number = invoice.number(), "appended invoice row");
        Ok(())
    }

    fn max_number(&self) -> Result<u64, StorageError> {
        if self.cache_enabled {
            if let Some(max) = *self.high_water() {
                return Ok(max);
            }
        }

        let Some(max) = self.scan()? else {
            return Ok(0);
        };
        if self.cache_enabled {
            *self.high_water() = Some(max);
        }
        Ok(max)
    }
}
