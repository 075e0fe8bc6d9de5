//! Snapshot files holding every bucket record.
//!
//! A snapshot is a point-in-time copy of the whole store. Snapshots are
//! written to a temporary file and atomically renamed over the previous one.

use crate::config::SnapshotConfig;
use crate::error::{Result, SpawnError};
use spawngrid_types::bucket::BucketRecord;
use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

const SNAPSHOT_MAGIC: &[u8] = b"SPAWNGRID_SNAPSHOT";
const SNAPSHOT_VERSION: u8 = 1;

/// Upper bound on a single encoded record, to fail fast on corrupt lengths.
const MAX_RECORD_BYTES: u64 = 64 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct SnapshotFile {
    path: PathBuf,
    config: SnapshotConfig,
}

impl SnapshotFile {
    pub fn new<P: AsRef<Path>>(path: P, config: SnapshotConfig) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            config,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Read every record. A missing or empty file yields no records.
    pub fn load(&self) -> Result<Vec<BucketRecord>> {
        if !self.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path)?;
        if file.metadata()?.len() == 0 {
            return Ok(Vec::new());
        }

        let mut reader = BufReader::new(file);

        let mut magic = vec![0u8; SNAPSHOT_MAGIC.len()];
        reader
            .read_exact(&mut magic)
            .map_err(|_| SpawnError::InvalidFormat)?;
        if magic != SNAPSHOT_MAGIC {
            return Err(SpawnError::InvalidFormat);
        }

        let version = read_u8(&mut reader)?;
        if version != SNAPSHOT_VERSION {
            return Err(SpawnError::InvalidFormat);
        }

        let mut timestamp_bytes = [0u8; 12];
        reader.read_exact(&mut timestamp_bytes)?;

        let record_count = read_u64(&mut reader)?;
        let mut records = Vec::new();

        for _ in 0..record_count {
            let len = read_u64(&mut reader)?;
            if len > MAX_RECORD_BYTES {
                return Err(SpawnError::InvalidFormat);
            }
            let mut buf = vec![0u8; len as usize];
            reader.read_exact(&mut buf)?;
            records.push(bincode::deserialize(&buf)?);
        }

        Ok(records)
    }

    pub fn save(&self, records: &[BucketRecord]) -> Result<()> {
        let temp_path = self.temp_path();

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)?;

        let mut writer = BufWriter::new(file);

        writer.write_all(SNAPSHOT_MAGIC)?;
        writer.write_all(&[SNAPSHOT_VERSION])?;

        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| SpawnError::Io(std::io::Error::other(e)))?;
        writer.write_all(&timestamp.as_secs().to_le_bytes())?;
        writer.write_all(&timestamp.subsec_nanos().to_le_bytes())?;

        write_u64(&mut writer, records.len() as u64)?;
        for record in records {
            let encoded = bincode::serialize(record)?;
            write_u64(&mut writer, encoded.len() as u64)?;
            writer.write_all(&encoded)?;
        }

        writer.flush()?;
        let file = writer.into_inner().map_err(|e| e.into_error())?;
        file.sync_all()?;
        drop(file);

        std::fs::rename(&temp_path, &self.path)?;
        self.sync_parent_dir()?;

        Ok(())
    }

    /// True once `puts_since_snapshot` reaches the configured interval.
    pub fn should_snapshot(&self, puts_since_snapshot: usize) -> bool {
        match self.config.auto_snapshot_puts {
            Some(threshold) => puts_since_snapshot >= threshold,
            None => false,
        }
    }

    fn temp_path(&self) -> PathBuf {
        let mut temp = self.path.clone();
        if let Some(name) = temp.file_name() {
            let mut new_name = name.to_string_lossy().into_owned();
            new_name.push_str(".tmp");
            temp.set_file_name(new_name);
        }
        temp
    }

    fn sync_parent_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            let dir = File::open(parent)?;
            dir.sync_all()?;
        }
        Ok(())
    }
}

fn write_u64<W: Write>(writer: &mut W, value: u64) -> Result<()> {
    writer.write_all(&value.to_le_bytes())?;
    Ok(())
}

fn read_u8<R: Read>(reader: &mut R) -> Result<u8> {
    let mut buf = [0u8; 1];
    reader.read_exact(&mut buf)?;
    Ok(buf[0])
}

fn read_u64<R: Read>(reader: &mut R) -> Result<u64> {
    let mut buf = [0u8; 8];
    reader.read_exact(&mut buf)?;
    Ok(u64::from_le_bytes(buf))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use spawngrid_types::bucket::BucketCoordinate;
    use spawngrid_types::geo::GeoPoint;
    use tempfile::NamedTempFile;

    fn sample_records() -> Vec<BucketRecord> {
        let ts = Utc.with_ymd_and_hms(2024, 2, 29, 23, 59, 59).unwrap();
        vec![
            BucketRecord::new(
                BucketCoordinate::new(0, 0),
                vec![GeoPoint::new(0.001, -0.002)],
                vec![GeoPoint::new(0.003, 0.004), GeoPoint::new(-0.005, 0.006)],
                ts,
            ),
            BucketRecord::new(BucketCoordinate::new(-7, 3), vec![], vec![], ts),
        ]
    }

    #[test]
    fn test_snapshot_roundtrip() {
        let temp = NamedTempFile::new().unwrap();
        let snapshot = SnapshotFile::new(temp.path(), SnapshotConfig::default());

        let records = sample_records();
        snapshot.save(&records).unwrap();

        assert_eq!(snapshot.load().unwrap(), records);
    }

    #[test]
    fn test_empty_file_loads_nothing() {
        let temp = NamedTempFile::new().unwrap();
        let snapshot = SnapshotFile::new(temp.path(), SnapshotConfig::default());
        assert!(snapshot.load().unwrap().is_empty());
    }

    #[test]
    fn test_missing_file_loads_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = SnapshotFile::new(dir.path().join("absent.snap"), SnapshotConfig::default());
        assert!(!snapshot.exists());
        assert!(snapshot.load().unwrap().is_empty());
    }

    #[test]
    fn test_foreign_file_rejected() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"definitely not a snapshot file").unwrap();
        temp.flush().unwrap();

        let snapshot = SnapshotFile::new(temp.path(), SnapshotConfig::default());
        assert!(matches!(snapshot.load(), Err(SpawnError::InvalidFormat)));
    }

    #[test]
    fn test_should_snapshot_threshold() {
        let snapshot = SnapshotFile::new(
            "unused.snap",
            SnapshotConfig {
                auto_snapshot_puts: Some(3),
            },
        );
        assert!(!snapshot.should_snapshot(2));
        assert!(snapshot.should_snapshot(3));

        let manual = SnapshotFile::new("unused.snap", SnapshotConfig::default());
        assert!(!manual.should_snapshot(1_000));
    }
}
