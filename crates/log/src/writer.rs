//! Rotating file writer
//!
//! [`RollingFile`] backs one file tier. The active file is
//! `{tier}-{date}.log`; it is rotated out when the rendered date changes or
//! when the next record would push it past the size limit. Rotated files are
//! optionally gzipped and the family is pruned to the retention count.
//!
//! The date comes from the record's own `timestamp` field, so a record is
//! filed under the day it was logged, not the day the worker wrote it.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use flate2::Compression;
use flate2::write::GzEncoder;
use time::{OffsetDateTime, PrimitiveDateTime};

use crate::config::parse_size;
use crate::event::local_offset;
use crate::format::{DatePattern, FULL_TIMESTAMP};
use crate::sink::FileRotation;

struct ActiveFile {
    file: File,
    path: PathBuf,
    date: String,
    written: u64,
}

/// Date- and size-rotated log file for one tier
pub struct RollingFile {
    rotation: FileRotation,
    pattern: DatePattern,
    max_bytes: Option<u64>,
    active: Option<ActiveFile>,
    latest: Option<OffsetDateTime>,
}

impl std::fmt::Debug for RollingFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RollingFile")
            .field("tier", &self.rotation.tier)
            .field("pattern", &self.pattern.as_str())
            .field("max_bytes", &self.max_bytes)
            .finish_non_exhaustive()
    }
}

impl RollingFile {
    /// Create the writer; no file is opened until the first record
    ///
    /// A malformed date pattern falls back to `YYYY-MM-DD`; a malformed size
    /// disables size-based rotation. Both are reported through `tracing`.
    pub fn new(rotation: FileRotation) -> Self {
        let pattern = DatePattern::parse(&rotation.date_pattern).unwrap_or_else(|e| {
            tracing::warn!(
                tier = %rotation.tier,
                error = %e,
                "Falling back to default date pattern"
            );
            DatePattern::default()
        });
        let max_bytes = match parse_size(&rotation.max_size) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                tracing::warn!(tier = %rotation.tier, error = %e, "Size-based rotation disabled");
                None
            }
        };

        Self {
            rotation,
            pattern,
            max_bytes,
            active: None,
            latest: None,
        }
    }

    /// Size limit in bytes, if one applies
    pub fn max_bytes(&self) -> Option<u64> {
        self.max_bytes
    }

    /// Path of the file currently being written
    pub fn active_path(&self) -> Option<&Path> {
        self.active.as_ref().map(|active| active.path.as_path())
    }

    pub(crate) fn write_at(&mut self, at: OffsetDateTime, buf: &[u8]) -> io::Result<usize> {
        // never go back to an earlier file: a late record joins the newest one
        let at = match self.latest {
            Some(latest) if latest > at => latest,
            _ => at,
        };
        self.latest = Some(at);
        let date = self.pattern.render(at);

        if self.active.as_ref().is_some_and(|active| active.date != date) {
            self.rotate_by_date();
        }
        if self.active.is_none() {
            self.open(&date)?;
            if self.rotation.compress {
                self.compress_stale();
            }
            self.prune();
        }

        let incoming = buf.len() as u64;
        let over_limit = match (self.max_bytes, &self.active) {
            (Some(limit), Some(active)) => active.written > 0 && active.written + incoming > limit,
            _ => false,
        };
        if over_limit {
            self.rotate_by_size(&date)?;
        }

        let Some(active) = self.active.as_mut() else {
            return Err(io::Error::other("no active log file"));
        };
        active.file.write_all(buf)?;
        active.written += incoming;
        Ok(buf.len())
    }

    fn open(&mut self, date: &str) -> io::Result<()> {
        let path = self.rotation.path_for(date);
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let written = file.metadata().map(|meta| meta.len()).unwrap_or(0);
        self.active = Some(ActiveFile {
            file,
            path,
            date: date.to_string(),
            written,
        });
        Ok(())
    }

    fn rotate_by_date(&mut self) {
        if let Some(mut active) = self.active.take() {
            let _ = active.file.flush();
            drop(active.file);
            if self.rotation.compress {
                compress_or_warn(&active.path);
            }
        }
    }

    fn rotate_by_size(&mut self, date: &str) -> io::Result<()> {
        if let Some(mut active) = self.active.take() {
            let _ = active.file.flush();
            drop(active.file);

            let archived = self.next_archive_path(date);
            match fs::rename(&active.path, &archived) {
                Ok(()) if self.rotation.compress => compress_or_warn(&archived),
                Ok(()) => {}
                Err(e) => tracing::warn!(
                    path = %active.path.display(),
                    error = %e,
                    "Failed to rotate log file"
                ),
            }
        }
        self.open(date)?;
        self.prune();
        Ok(())
    }

    /// Next free `{tier}-{date}.{n}.log`, numbered after the highest existing split
    fn next_archive_path(&self, date: &str) -> PathBuf {
        let stem = format!("{}-{date}.", self.rotation.tier);
        let highest = fs::read_dir(self.rotation.directory())
            .into_iter()
            .flatten()
            .filter_map(Result::ok)
            .filter_map(|entry| {
                let name = entry.file_name().into_string().ok()?;
                let index = name.strip_prefix(&stem)?;
                let index = index
                    .strip_suffix(".log.gz")
                    .or_else(|| index.strip_suffix(".log"))?;
                index.parse::<usize>().ok()
            })
            .max()
            .unwrap_or(0);
        self.rotation.path_for(&format!("{date}.{}", highest + 1))
    }

    /// Gzip uncompressed files of this tier other than the active one
    ///
    /// Picks up files a previous run left open when it stopped.
    fn compress_stale(&self) {
        let Some(active) = self.active_path() else {
            return;
        };
        let prefix = format!("{}-", self.rotation.tier);
        let Ok(entries) = fs::read_dir(self.rotation.directory()) else {
            return;
        };

        let stale: Vec<PathBuf> = entries
            .filter_map(Result::ok)
            .filter_map(|entry| {
                let name = entry.file_name().into_string().ok()?;
                let path = entry.path();
                let is_stale =
                    name.starts_with(&prefix) && name.ends_with(".log") && path.as_path() != active;
                is_stale.then_some(path)
            })
            .collect();
        for path in stale {
            compress_or_warn(&path);
        }
    }

    /// Delete the oldest files of this tier beyond the retention count
    ///
    /// The active file counts towards the limit and is never removed.
    fn prune(&self) {
        let max_files = self.rotation.max_files;
        if max_files == 0 {
            return;
        }

        let prefix = format!("{}-", self.rotation.tier);
        let active = self.active_path();
        let Ok(entries) = fs::read_dir(self.rotation.directory()) else {
            return;
        };

        let mut family: Vec<(SystemTime, String, PathBuf)> = entries
            .filter_map(Result::ok)
            .filter_map(|entry| {
                let name = entry.file_name().into_string().ok()?;
                let is_member = name.starts_with(&prefix)
                    && (name.ends_with(".log") || name.ends_with(".log.gz"));
                let path = entry.path();
                if !is_member || Some(path.as_path()) == active {
                    return None;
                }
                let modified = entry.metadata().and_then(|m| m.modified()).ok()?;
                Some((modified, name, path))
            })
            .collect();

        let keep = max_files.saturating_sub(1);
        if family.len() <= keep {
            return;
        }
        family.sort();
        let excess = family.len() - keep;
        for (_, _, path) in family.into_iter().take(excess) {
            if let Err(e) = fs::remove_file(&path) {
                tracing::warn!(path = %path.display(), error = %e, "Failed to prune log file");
            }
        }
    }
}

impl Write for RollingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let at = record_time(buf).unwrap_or_else(crate::event::now);
        self.write_at(at, buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.active.as_mut() {
            Some(active) => active.file.flush(),
            None => Ok(()),
        }
    }
}

/// Timestamp at the head of a structured record
fn record_time(buf: &[u8]) -> Option<OffsetDateTime> {
    let rest = buf.strip_prefix(br#"{"timestamp":""#)?;
    let stamp = std::str::from_utf8(rest.get(..19)?).ok()?;
    PrimitiveDateTime::parse(stamp, FULL_TIMESTAMP)
        .ok()
        .map(|at| at.assume_offset(local_offset()))
}

fn gz_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".gz");
    PathBuf::from(name)
}

/// Gzip `path` into `path.gz` and remove the original
fn compress(path: &Path) -> io::Result<PathBuf> {
    let target = gz_path(path);
    let mut input = File::open(path)?;
    let mut encoder = GzEncoder::new(File::create(&target)?, Compression::default());
    io::copy(&mut input, &mut encoder)?;
    encoder.finish()?;
    fs::remove_file(path)?;
    Ok(target)
}

fn compress_or_warn(path: &Path) {
    if let Err(e) = compress(path) {
        tracing::warn!(path = %path.display(), error = %e, "Failed to compress rotated log file");
    }
}
