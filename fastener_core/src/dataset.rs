//! # Dataset File Module
//!
//! Handles the reference dataset artifact with safety features:
//! - **Atomic saves**: Write to .tmp, sync, rename to prevent corruption
//! - **File locking**: Prevent concurrent edits on shared drives
//! - **Version validation**: Ensure schema compatibility
//!
//! ## File Format
//!
//! The dataset is saved as `fastener_reference.json`: a meta block
//! (schema version, generation timestamp) plus the reference tables.
//! Lock files use a `.json.lock` extension with metadata about who
//! holds the lock.
//!
//! ## Example
//!
//! ```rust,no_run
//! use fastener_core::dataset::{save_dataset, load_dataset, Dataset, FileLock};
//! use fastener_core::reference::ReferenceData;
//! use std::path::Path;
//!
//! let dataset = Dataset::new(ReferenceData::builtin().clone());
//! let path = Path::new("fastener_reference.json");
//!
//! // Acquire lock before saving
//! let lock = FileLock::acquire(path, "engineer@company.com").unwrap();
//!
//! // Save with atomic write
//! save_dataset(&dataset, path).unwrap();
//!
//! // Lock is released when dropped
//! drop(lock);
//! ```

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};

use crate::errors::{RefError, RefResult};
use crate::reference::ReferenceData;

/// Current dataset schema version
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Dataset metadata block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetMeta {
    /// Schema version for compatibility checks
    pub version: String,
    /// When this artifact was generated
    pub generated_at: DateTime<Utc>,
}

/// The on-disk dataset artifact: metadata plus the reference tables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub meta: DatasetMeta,
    #[serde(rename = "fastener_reference_data")]
    pub reference: ReferenceData,
}

impl Dataset {
    /// Wrap reference tables in a current-version dataset, stamped now
    pub fn new(reference: ReferenceData) -> Self {
        Dataset {
            meta: DatasetMeta {
                version: SCHEMA_VERSION.to_string(),
                generated_at: Utc::now(),
            },
            reference,
        }
    }
}

/// Lock file metadata stored in .json.lock files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockInfo {
    /// User identifier (email or username)
    pub user_id: String,
    /// Machine name where lock was acquired
    pub machine: String,
    /// Process ID that holds the lock
    pub pid: u32,
    /// When the lock was acquired
    pub locked_at: DateTime<Utc>,
}

impl LockInfo {
    /// Create new lock info for the current process
    pub fn new(user_id: impl Into<String>) -> Self {
        LockInfo {
            user_id: user_id.into(),
            machine: hostname().unwrap_or_else(|| "unknown".to_string()),
            pid: std::process::id(),
            locked_at: Utc::now(),
        }
    }
}

/// Get the hostname of the current machine
fn hostname() -> Option<String> {
    #[cfg(windows)]
    {
        std::env::var("COMPUTERNAME").ok()
    }
    #[cfg(not(windows))]
    {
        std::env::var("HOSTNAME")
            .ok()
            .or_else(|| std::env::var("HOST").ok())
    }
}

/// File lock guard that releases the lock when dropped.
///
/// Uses both:
/// 1. OS-level file locking (via fs2) for process safety
/// 2. .lock file with metadata for user visibility
pub struct FileLock {
    /// Path to the dataset file
    dataset_path: PathBuf,
    /// Path to the lock file
    lock_path: PathBuf,
    /// The underlying file handle (keeps OS lock)
    _lock_file: File,
    /// Lock metadata
    pub info: LockInfo,
}

impl FileLock {
    /// Acquire an exclusive lock on a dataset file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the dataset file
    /// * `user_id` - Identifier for the user acquiring the lock
    ///
    /// # Returns
    ///
    /// * `Ok(FileLock)` - Lock acquired successfully
    /// * `Err(RefError::FileLocked)` - Another process holds the lock
    pub fn acquire(path: &Path, user_id: impl Into<String>) -> RefResult<Self> {
        let lock_path = lock_path_for(path);
        let info = LockInfo::new(user_id);

        // Check if lock file exists and contains valid lock info
        if lock_path.exists() {
            if let Ok(existing) = read_lock_info(&lock_path) {
                // Check if the lock is stale (process no longer running)
                if !is_lock_stale(&existing) {
                    return Err(RefError::file_locked(
                        path.display().to_string(),
                        format!("{} ({})", existing.user_id, existing.machine),
                        existing.locked_at.to_rfc3339(),
                    ));
                }
                // Lock is stale, we can take it over
            }
        }

        // Create/open the lock file
        let mut lock_file = OpenOptions::new()
            .write(true)
            .read(true)
            .create(true)
            .truncate(true)
            .open(&lock_path)
            .map_err(|e| {
                RefError::file_error("create lock", lock_path.display().to_string(), e.to_string())
            })?;

        // Try to acquire exclusive OS-level lock (non-blocking)
        lock_file.try_lock_exclusive().map_err(|_| {
            RefError::file_locked(
                path.display().to_string(),
                "another process".to_string(),
                "unknown".to_string(),
            )
        })?;

        // Write lock info to the file using the same handle
        let lock_json =
            serde_json::to_string_pretty(&info).map_err(|e| RefError::SerializationError {
                reason: e.to_string(),
            })?;

        lock_file.write_all(lock_json.as_bytes()).map_err(|e| {
            RefError::file_error("write lock", lock_path.display().to_string(), e.to_string())
        })?;

        lock_file.sync_all().map_err(|e| {
            RefError::file_error("sync lock", lock_path.display().to_string(), e.to_string())
        })?;

        Ok(FileLock {
            dataset_path: path.to_path_buf(),
            lock_path,
            _lock_file: lock_file,
            info,
        })
    }

    /// Check if a file is locked without acquiring the lock.
    ///
    /// Returns `Some(LockInfo)` if locked, `None` if available.
    pub fn check(path: &Path) -> Option<LockInfo> {
        let lock_path = lock_path_for(path);
        if lock_path.exists() {
            if let Ok(info) = read_lock_info(&lock_path) {
                if !is_lock_stale(&info) {
                    return Some(info);
                }
            }
        }
        None
    }

    /// Get the path to the dataset file
    pub fn dataset_path(&self) -> &Path {
        &self.dataset_path
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        // Remove the lock file
        let _ = fs::remove_file(&self.lock_path);
        // OS lock is released when _lock_file is dropped
    }
}

/// Get the lock file path for a dataset file
fn lock_path_for(dataset_path: &Path) -> PathBuf {
    let mut lock_path = dataset_path.to_path_buf();
    let extension = lock_path
        .extension()
        .map(|e| format!("{}.lock", e.to_string_lossy()))
        .unwrap_or_else(|| "lock".to_string());
    lock_path.set_extension(extension);
    lock_path
}

/// Read lock info from a lock file
fn read_lock_info(lock_path: &Path) -> RefResult<LockInfo> {
    let mut file = File::open(lock_path).map_err(|e| {
        RefError::file_error("read lock", lock_path.display().to_string(), e.to_string())
    })?;

    let mut contents = String::new();
    file.read_to_string(&mut contents).map_err(|e| {
        RefError::file_error("read lock", lock_path.display().to_string(), e.to_string())
    })?;

    serde_json::from_str(&contents).map_err(|e| RefError::SerializationError {
        reason: e.to_string(),
    })
}

/// Check if a lock is stale (the process that created it is no longer running)
fn is_lock_stale(info: &LockInfo) -> bool {
    // Check if it's our machine
    if let Some(our_machine) = hostname() {
        if info.machine == our_machine {
            // Same machine - check if process is still running
            #[cfg(windows)]
            {
                use std::process::Command;
                let output = Command::new("tasklist")
                    .args(["/FI", &format!("PID eq {}", info.pid), "/NH"])
                    .output();
                if let Ok(output) = output {
                    let stdout = String::from_utf8_lossy(&output.stdout);
                    // If PID not found, lock is stale
                    if stdout.contains("No tasks") || !stdout.contains(&info.pid.to_string()) {
                        return true;
                    }
                }
            }
            #[cfg(unix)]
            {
                if fs::metadata(format!("/proc/{}", info.pid)).is_err() {
                    return true;
                }
            }
        }
    }

    // If lock is more than 24 hours old, consider it stale
    let age = Utc::now() - info.locked_at;
    if age.num_hours() > 24 {
        return true;
    }

    false
}

/// Save a dataset to a file with atomic write semantics.
///
/// The save process:
/// 1. Serialize dataset to JSON
/// 2. Write to a temporary file (.tmp)
/// 3. Sync to disk (fsync)
/// 4. Rename .tmp to the final name (atomic on most filesystems)
///
/// This prevents corruption if the process is interrupted during write.
pub fn save_dataset(dataset: &Dataset, path: &Path) -> RefResult<()> {
    // Serialize to JSON
    let json = serde_json::to_string_pretty(dataset).map_err(|e| RefError::SerializationError {
        reason: e.to_string(),
    })?;

    // Create temp file path
    let tmp_path = path.with_extension("json.tmp");

    // Write to temp file
    let mut tmp_file = File::create(&tmp_path).map_err(|e| {
        RefError::file_error(
            "create temp file",
            tmp_path.display().to_string(),
            e.to_string(),
        )
    })?;

    tmp_file.write_all(json.as_bytes()).map_err(|e| {
        RefError::file_error(
            "write temp file",
            tmp_path.display().to_string(),
            e.to_string(),
        )
    })?;

    // Sync to disk
    tmp_file.sync_all().map_err(|e| {
        RefError::file_error(
            "sync temp file",
            tmp_path.display().to_string(),
            e.to_string(),
        )
    })?;

    // Atomic rename
    fs::rename(&tmp_path, path).map_err(|e| {
        // Clean up temp file if rename fails
        let _ = fs::remove_file(&tmp_path);
        RefError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    Ok(())
}

/// Load a dataset from a file.
///
/// # Returns
///
/// * `Ok(Dataset)` - Successfully loaded dataset
/// * `Err(RefError::VersionMismatch)` - File version is incompatible
/// * `Err(RefError::SerializationError)` - Invalid JSON
/// * `Err(RefError::FileError)` - I/O error
pub fn load_dataset(path: &Path) -> RefResult<Dataset> {
    // Read file contents
    let mut file = File::open(path)
        .map_err(|e| RefError::file_error("open", path.display().to_string(), e.to_string()))?;

    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .map_err(|e| RefError::file_error("read", path.display().to_string(), e.to_string()))?;

    // Parse JSON
    let dataset: Dataset =
        serde_json::from_str(&contents).map_err(|e| RefError::SerializationError {
            reason: format!("Invalid JSON in {}: {}", path.display(), e),
        })?;

    // Validate schema version
    validate_version(&dataset.meta.version)?;

    Ok(dataset)
}

/// Load a dataset, returning whether it's read-only due to a lock.
///
/// # Returns
///
/// * `Ok((Dataset, None))` - Loaded successfully, no lock
/// * `Ok((Dataset, Some(LockInfo)))` - Loaded, but another user has the lock
/// * `Err(_)` - Failed to load
pub fn load_dataset_with_lock_check(path: &Path) -> RefResult<(Dataset, Option<LockInfo>)> {
    let dataset = load_dataset(path)?;
    let lock_info = FileLock::check(path);
    Ok((dataset, lock_info))
}

/// Validate that a file version is compatible with the current schema.
fn validate_version(file_version: &str) -> RefResult<()> {
    // Parse semver-style versions
    let file_parts: Vec<u32> = file_version
        .split('.')
        .filter_map(|p| p.parse().ok())
        .collect();
    let current_parts: Vec<u32> = SCHEMA_VERSION
        .split('.')
        .filter_map(|p| p.parse().ok())
        .collect();

    if file_parts.is_empty() || current_parts.is_empty() {
        return Err(RefError::VersionMismatch {
            file_version: file_version.to_string(),
            expected_version: SCHEMA_VERSION.to_string(),
        });
    }

    // Major version must match
    if file_parts[0] != current_parts[0] {
        return Err(RefError::VersionMismatch {
            file_version: file_version.to_string(),
            expected_version: SCHEMA_VERSION.to_string(),
        });
    }

    // For 0.x versions, minor version must also match (breaking changes allowed)
    if current_parts[0] == 0
        && file_parts.len() > 1
        && current_parts.len() > 1
        && file_parts[1] > current_parts[1]
    {
        // File is newer than we support
        return Err(RefError::VersionMismatch {
            file_version: file_version.to_string(),
            expected_version: SCHEMA_VERSION.to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env::temp_dir;

    fn temp_dataset_path(name: &str) -> PathBuf {
        temp_dir().join(format!("fastref_test_{}.json", name))
    }

    #[test]
    fn test_lock_path_generation() {
        let dataset_path = Path::new("/path/to/fastener_reference.json");
        let lock_path = lock_path_for(dataset_path);
        assert_eq!(lock_path, Path::new("/path/to/fastener_reference.json.lock"));
    }

    #[test]
    fn test_lock_info_creation() {
        let info = LockInfo::new("test@example.com");
        assert_eq!(info.user_id, "test@example.com");
        assert!(info.pid > 0);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let path = temp_dataset_path("roundtrip");

        // Create and save
        let dataset = Dataset::new(ReferenceData::builtin().clone());
        save_dataset(&dataset, &path).unwrap();

        // Load and verify
        let loaded = load_dataset(&path).unwrap();
        assert_eq!(loaded.meta.version, SCHEMA_VERSION);
        assert_eq!(loaded.reference, dataset.reference);

        // Clean up
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_atomic_save_creates_no_tmp_file() {
        let path = temp_dataset_path("atomic");
        let tmp_path = path.with_extension("json.tmp");

        let dataset = Dataset::new(ReferenceData::builtin().clone());
        save_dataset(&dataset, &path).unwrap();

        // Temp file should not exist after successful save
        assert!(!tmp_path.exists());
        assert!(path.exists());

        // Clean up
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_file_lock_acquire_and_release() {
        let path = temp_dataset_path("lock_test");

        // Create an empty file first
        File::create(&path).unwrap();

        // Acquire lock
        let lock = FileLock::acquire(&path, "test@example.com").unwrap();
        assert_eq!(lock.info.user_id, "test@example.com");

        // Lock file should exist
        let lock_path = lock_path_for(&path);
        assert!(lock_path.exists());

        // Drop lock
        drop(lock);

        // Lock file should be removed
        assert!(!lock_path.exists());

        // Clean up
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_version_validation() {
        // Same version should pass
        assert!(validate_version(SCHEMA_VERSION).is_ok());

        // Same major.minor should pass
        assert!(validate_version("0.1.0").is_ok());
        assert!(validate_version("0.1.5").is_ok());

        // Different major should fail
        assert!(validate_version("1.0.0").is_err());

        // Newer minor (in 0.x) should fail
        assert!(validate_version("0.2.0").is_err());
    }

    #[test]
    fn test_load_with_lock_check() {
        let path = temp_dataset_path("lock_check");

        // Save a dataset
        let dataset = Dataset::new(ReferenceData::builtin().clone());
        save_dataset(&dataset, &path).unwrap();

        // Load without lock - should have no lock info
        let (loaded, lock_info) = load_dataset_with_lock_check(&path).unwrap();
        assert_eq!(loaded.meta.version, SCHEMA_VERSION);
        assert!(lock_info.is_none());

        // Clean up
        let _ = fs::remove_file(&path);
    }
}
