//! Obstacle status record publishing
//!
//! Every obstacle report overwrites one fixed-capacity text record that an
//! external relay process reads from shared memory and forwards over its
//! serial link. The region has no sequence counter, lock, or handshake, so
//! the relay can observe a partially overwritten record; the wire format is
//! frozen and the race is kept for compatibility with the deployed relay.

use crate::error::{Error, Result};
use crate::sensing::Classification;
use memmap2::MmapMut;
use std::fs::OpenOptions;
use std::sync::{Arc, Mutex};

/// Destination for obstacle status records
pub trait StatusSink: Send {
    /// Overwrite the record in place
    fn publish(&mut self, record: &str) -> Result<()>;
}

/// Build one status record
///
/// `last_down_color` and `last_front_distance_mm` come from the previous
/// cycle's cached observation; the mux has not finished this cycle's reads
/// when the record is published. The size code is "6" below the front
/// distance threshold, "3" otherwise.
pub fn format_record(
    x: i32,
    y: i32,
    last_down_color: Classification,
    last_front_distance_mm: u32,
    size_threshold_mm: u32,
) -> String {
    let size_code = if last_front_distance_mm < size_threshold_mm {
        "6"
    } else {
        "3"
    };
    format!(
        "[{}, {}, False, {}, {}, False, False]",
        x, y, last_down_color, size_code
    )
}

/// Status sink backed by a memory-mapped shared file
pub struct SharedMemoryStatus {
    map: MmapMut,
    capacity: usize,
}

impl SharedMemoryStatus {
    /// Create (or reuse) the backing file and map it
    ///
    /// Failure here is fatal at startup; without the region the relay has
    /// nothing to read.
    pub fn create(path: &str, capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::InvalidParameter(
                "status capacity must be nonzero".to_string(),
            ));
        }

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .map_err(|e| Error::StatusRegion(format!("open {}: {}", path, e)))?;
        file.set_len(capacity as u64)
            .map_err(|e| Error::StatusRegion(format!("truncate {}: {}", path, e)))?;

        let map = unsafe {
            MmapMut::map_mut(&file).map_err(|e| Error::StatusRegion(format!("map {}: {}", path, e)))?
        };

        log::info!("Mapped status region: {} ({} bytes)", path, capacity);

        Ok(Self { map, capacity })
    }
}

impl StatusSink for SharedMemoryStatus {
    fn publish(&mut self, record: &str) -> Result<()> {
        // Truncate to capacity minus the NUL terminator; the writer never
        // flushes and the reader never synchronizes (see module docs).
        let bytes = record.as_bytes();
        let len = bytes.len().min(self.capacity - 1);
        self.map[..len].copy_from_slice(&bytes[..len]);
        self.map[len] = 0;
        Ok(())
    }
}

/// In-memory capture sink for tests
#[derive(Clone)]
pub struct MemoryStatus {
    records: Arc<Mutex<Vec<String>>>,
}

impl MemoryStatus {
    /// Create an empty capture sink
    pub fn new() -> Self {
        MemoryStatus {
            records: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Every record published so far
    pub fn records(&self) -> Vec<String> {
        self.records.lock().unwrap().clone()
    }
}

impl StatusSink for MemoryStatus {
    fn publish(&mut self, record: &str) -> Result<()> {
        self.records.lock().unwrap().push(record.to_string());
        Ok(())
    }
}

impl Default for MemoryStatus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_record() {
        let record = format_record(3, -2, Classification::Brown, 150, 280);
        assert_eq!(record, "[3, -2, False, Brown, 6, False, False]");
    }

    #[test]
    fn test_format_record_size_threshold() {
        // Exactly at the threshold reads as the far code.
        let record = format_record(0, 0, Classification::Unknown, 280, 280);
        assert_eq!(record, "[0, 0, False, Unknown, 3, False, False]");
    }

    #[test]
    fn test_shared_memory_round_trip() {
        let path = std::env::temp_dir().join("sweepd_status_test");
        let path = path.to_str().unwrap().to_string();
        let mut sink = SharedMemoryStatus::create(&path, 128).unwrap();

        sink.publish("[1, 2, False, Red, 3, False, False]").unwrap();

        let contents = std::fs::read(&path).unwrap();
        assert_eq!(contents.len(), 128);
        let text = &contents[..contents.iter().position(|b| *b == 0).unwrap()];
        assert_eq!(text, b"[1, 2, False, Red, 3, False, False]");

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_oversized_record_is_truncated() {
        let path = std::env::temp_dir().join("sweepd_status_trunc_test");
        let path = path.to_str().unwrap().to_string();
        let mut sink = SharedMemoryStatus::create(&path, 16).unwrap();

        sink.publish("0123456789abcdefOVERFLOW").unwrap();

        let contents = std::fs::read(&path).unwrap();
        assert_eq!(&contents[..15], b"0123456789abcde");
        assert_eq!(contents[15], 0);

        std::fs::remove_file(&path).ok();
    }
}
