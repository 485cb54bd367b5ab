//! Host memory figures for heap auto-sizing.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Memory figures taken at one moment, in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemorySnapshot {
    /// Memory available for new allocations.
    pub available: u64,
    /// Memory that can still be committed without reclaiming.
    pub reservable: u64,
}

impl MemorySnapshot {
    /// The most a heap could take without pushing the host into reclaim.
    pub fn limit(&self) -> u64 {
        self.available.min(self.reservable)
    }
}

/// Source of the host's memory figures.
pub trait MemoryStatus {
    fn snapshot(&self) -> io::Result<MemorySnapshot>;
}

/// [`MemoryStatus`] backed by `/proc/meminfo`.
#[derive(Debug, Clone)]
pub struct ProcMemInfo {
    path: PathBuf,
}

impl Default for ProcMemInfo {
    fn default() -> Self {
        Self::at("/proc/meminfo")
    }
}

impl ProcMemInfo {
    pub fn at(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl MemoryStatus for ProcMemInfo {
    fn snapshot(&self) -> io::Result<MemorySnapshot> {
        let content = fs::read_to_string(&self.path)?;
        let field = |name: &str| {
            meminfo_field(&content, name).ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("{} missing from {}", name, self.path.display()),
                )
            })
        };

        let available = field("MemAvailable")?;
        let commit_limit = field("CommitLimit")?;
        let committed = field("Committed_AS")?;
        Ok(MemorySnapshot {
            available,
            reservable: commit_limit.saturating_sub(committed),
        })
    }
}

/// Value of `name` in bytes from meminfo-formatted text (`Name:  123 kB`).
fn meminfo_field(content: &str, name: &str) -> Option<u64> {
    content.lines().find_map(|line| {
        let (key, rest) = line.split_once(':')?;
        if key.trim() != name {
            return None;
        }
        let mut parts = rest.split_whitespace();
        let value: u64 = parts.next()?.parse().ok()?;
        match parts.next() {
            Some("kB") => value.checked_mul(1024),
            None => Some(value),
            Some(_) => None,
        }
    })
}
