//! Size-based rotating file appender
//!
//! The active file is reopened for every line and closed again before
//! `append` returns, so external tools can move or truncate it between
//! writes. When the next line would push the file past the size threshold
//! the backups are shifted first:
//!
//! ```text
//! app.log.(N-1)      deleted
//! app.log.i      ->  app.log.(i+1)      for i = N-2 ..= 1
//! app.log        ->  app.log.1          (app.log.1.gz when compressing)
//! ```
//!
//! Plain and `.gz` backups are shifted alike, so toggling compression at
//! runtime never strands a file outside the retention window.

use crate::core::config::{LoggerConfig, DEFAULT_FILE_MODE};
use crate::core::{Appender, LoggerError, LoggerMetrics, RenderedLine, Result};
use flate2::write::GzEncoder;
use flate2::Compression;
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

const COMPRESSION_BUFFER_SIZE: usize = 64 * 1024;

/// When to rotate and how many files to keep
///
/// # Examples
///
/// ```
/// use rust_rotating_logger::appenders::RotationPolicy;
///
/// let policy = RotationPolicy::new()
///     .with_max_size(10 * 1024 * 1024)
///     .with_max_files(5)
///     .with_compression(true);
/// assert_eq!(policy.max_num_files, 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationPolicy {
    /// Rotation threshold in bytes, 0 never rotates
    pub max_file_size: u64,
    /// Active file plus backups
    pub max_num_files: usize,
    pub compress: bool,
}

impl Default for RotationPolicy {
    fn default() -> Self {
        Self {
            max_file_size: 0,
            max_num_files: 1,
            compress: false,
        }
    }
}

impl RotationPolicy {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_size(mut self, size: u64) -> Self {
        self.max_file_size = size;
        self
    }

    /// Set the total number of files kept. Values below 1 are clamped to 1.
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_files(mut self, count: usize) -> Self {
        self.max_num_files = count.max(1);
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_compression(mut self, enabled: bool) -> Self {
        self.compress = enabled;
        self
    }

    /// Whether a file of `current_size` bytes must rotate before taking
    /// `incoming` more bytes.
    #[must_use]
    pub fn should_rotate(&self, current_size: u64, incoming: u64) -> bool {
        self.max_file_size > 0 && current_size.saturating_add(incoming) > self.max_file_size
    }
}

/// Appender persisting lines to a size-rotated file
pub struct RotatingFileAppender {
    base_path: PathBuf,
    policy: RotationPolicy,
    #[cfg_attr(not(unix), allow(dead_code))]
    file_mode: u32,
    use_colors: bool,
    metrics: Option<Arc<LoggerMetrics>>,
}

impl RotatingFileAppender {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self::with_policy(path, RotationPolicy::default())
    }

    pub fn with_policy<P: AsRef<Path>>(path: P, policy: RotationPolicy) -> Self {
        Self {
            base_path: path.as_ref().to_path_buf(),
            policy,
            file_mode: DEFAULT_FILE_MODE,
            use_colors: false,
            metrics: None,
        }
    }

    /// Build the sink described by a configuration snapshot, or `None` when
    /// no file is configured.
    pub fn from_config(config: &LoggerConfig) -> Option<Self> {
        let path = config.file.as_ref()?;
        let policy = RotationPolicy::new()
            .with_max_size(config.max_file_size)
            .with_max_files(config.max_num_files)
            .with_compression(config.compression);
        Some(
            Self::with_policy(path, policy)
                .with_file_mode(config.file_mode)
                .with_colors(config.colors_on_file),
        )
    }

    /// Permission bits for a newly created active file (Unix only, subject to umask)
    #[must_use]
    pub fn with_file_mode(mut self, mode: u32) -> Self {
        self.file_mode = mode;
        self
    }

    #[must_use]
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    #[must_use]
    pub fn with_metrics(mut self, metrics: Arc<LoggerMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.base_path
    }

    #[must_use]
    pub fn policy(&self) -> &RotationPolicy {
        &self.policy
    }

    /// Path of backup `index`, e.g. `app.log.2` or `app.log.2.gz`
    #[must_use]
    pub fn backup_path(&self, index: usize, compressed: bool) -> PathBuf {
        let mut name: OsString = self.base_path.as_os_str().to_owned();
        name.push(format!(".{}", index));
        if compressed {
            name.push(".gz");
        }
        PathBuf::from(name)
    }

    /// Shift the backups and retire the active file.
    ///
    /// Failures on individual backups are reported and skipped; only a
    /// failure to move the active file out of the way is returned.
    pub fn rotate(&self) -> Result<()> {
        let max_files = self.policy.max_num_files.max(1);

        if max_files == 1 {
            return remove_if_exists(&self.base_path).map_err(|e| {
                LoggerError::file_rotation(
                    self.base_path.display().to_string(),
                    format!("Failed to remove current log file: {}", e),
                )
            });
        }

        for compressed in [false, true] {
            let oldest = self.backup_path(max_files - 1, compressed);
            if let Err(e) = remove_if_exists(&oldest) {
                eprintln!(
                    "[LOGGER WARNING] Failed to remove oldest backup {}: {}",
                    oldest.display(),
                    e
                );
            }
        }

        for i in (1..max_files - 1).rev() {
            for compressed in [false, true] {
                let from = self.backup_path(i, compressed);
                let to = self.backup_path(i + 1, compressed);
                if let Err(e) = rename_if_exists(&from, &to) {
                    eprintln!(
                        "[LOGGER WARNING] Failed to shift backup {} to {}: {}",
                        from.display(),
                        to.display(),
                        e
                    );
                }
            }
        }

        if self.policy.compress {
            let target = self.backup_path(1, true);
            match self.compress_file(&target) {
                Ok(()) => {
                    if let Err(e) = remove_if_exists(&self.base_path) {
                        // Both copies now exist; the stale one is retired by
                        // the next rotation.
                        eprintln!(
                            "[LOGGER WARNING] Compressed {} but failed to remove it: {}",
                            self.base_path.display(),
                            e
                        );
                    }
                    return Ok(());
                }
                Err(e) => {
                    eprintln!(
                        "[LOGGER WARNING] {}. Keeping the rotated file uncompressed.",
                        e
                    );
                }
            }
        }

        rename_if_exists(&self.base_path, &self.backup_path(1, false)).map_err(|e| {
            LoggerError::file_rotation(
                self.base_path.display().to_string(),
                format!("Failed to rotate current log file: {}", e),
            )
        })
    }

    /// gzip the active file into `target` through a temporary file.
    ///
    /// The active file is left untouched; the caller removes it once this
    /// returns `Ok`.
    fn compress_file(&self, target: &Path) -> Result<()> {
        let mut temp_name: OsString = target.as_os_str().to_owned();
        temp_name.push(".tmp");
        let temp_path = PathBuf::from(temp_name);

        let result = stream_gzip(&self.base_path, &temp_path)
            .and_then(|()| fs::rename(&temp_path, target));

        result.map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            LoggerError::compression(
                self.base_path.display().to_string(),
                format!("Failed to compress into {}: {}", target.display(), e),
            )
        })
    }

    fn open_active(&self) -> io::Result<File> {
        let mut options = OpenOptions::new();
        options.create(true).append(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(self.file_mode);
        }
        options.open(&self.base_path)
    }
}

impl Appender for RotatingFileAppender {
    fn name(&self) -> &str {
        "rotating_file"
    }

    fn append(&mut self, line: &RenderedLine) -> Result<()> {
        let bytes = line.select(self.use_colors).as_bytes();

        // A missing file has nothing to rotate.
        if let Ok(metadata) = fs::metadata(&self.base_path) {
            if self.policy.should_rotate(metadata.len(), bytes.len() as u64) {
                match self.rotate() {
                    Ok(()) => {
                        if let Some(metrics) = &self.metrics {
                            metrics.record_rotation();
                        }
                    }
                    Err(e) => eprintln!(
                        "[LOGGER WARNING] Log rotation failed: {}. Continuing with current file.",
                        e
                    ),
                }
            }
        }

        let mut file = self.open_active().map_err(|e| {
            LoggerError::file_appender(
                self.base_path.display().to_string(),
                format!("Failed to open: {}", e),
            )
        })?;

        file.write_all(bytes).map_err(|e| {
            LoggerError::file_appender(
                self.base_path.display().to_string(),
                format!("Failed to write log line: {}", e),
            )
        })
    }

    fn flush(&mut self) -> Result<()> {
        // Every append closes its handle.
        Ok(())
    }
}

fn stream_gzip(source: &Path, destination: &Path) -> io::Result<()> {
    let input = File::open(source)?;
    let mut reader = BufReader::with_capacity(COMPRESSION_BUFFER_SIZE, input);

    let output = File::create(destination)?;
    let writer = BufWriter::with_capacity(COMPRESSION_BUFFER_SIZE, output);
    let mut encoder = GzEncoder::new(writer, Compression::default());

    io::copy(&mut reader, &mut encoder)?;
    let mut writer = encoder.finish()?;
    writer.flush()
}

fn remove_if_exists(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}

fn rename_if_exists(from: &Path, to: &Path) -> io::Result<()> {
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(_) => {
            // Some platforms refuse to rename over an existing file.
            remove_if_exists(to)?;
            fs::rename(from, to)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LogLevel;
    use flate2::read::GzDecoder;
    use std::io::Read;
    use tempfile::tempdir;

    /// A line of exactly `len` bytes, newline included
    fn line_of(len: usize, fill: char) -> RenderedLine {
        let mut plain: String = std::iter::repeat(fill).take(len - 1).collect();
        plain.push('\n');
        RenderedLine {
            level: LogLevel::Info,
            colored: format!("\x1b[32m{}", plain),
            plain,
        }
    }

    fn count_files(dir: &Path, prefix: &str) -> usize {
        fs::read_dir(dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with(prefix))
            .count()
    }

    #[test]
    fn test_policy_builder_clamps_file_count() {
        let policy = RotationPolicy::new().with_max_size(100).with_max_files(0);
        assert_eq!(policy.max_file_size, 100);
        assert_eq!(policy.max_num_files, 1);
    }

    #[test]
    fn test_should_rotate() {
        let policy = RotationPolicy::new().with_max_size(100);
        assert!(!policy.should_rotate(60, 40));
        assert!(policy.should_rotate(61, 40));
        assert!(!RotationPolicy::new().should_rotate(u64::MAX, 1));
    }

    #[test]
    fn test_backup_path() {
        let appender = RotatingFileAppender::new("/var/log/app.log");
        assert_eq!(appender.backup_path(1, false), PathBuf::from("/var/log/app.log.1"));
        assert_eq!(appender.backup_path(3, true), PathBuf::from("/var/log/app.log.3.gz"));
    }

    #[test]
    fn test_from_config_without_file() {
        assert!(RotatingFileAppender::from_config(&LoggerConfig::default()).is_none());
    }

    #[test]
    fn test_from_config_copies_settings() {
        let mut config = LoggerConfig::with_file("/tmp/app.log", 100, 3, LogLevel::Info);
        config.compression = true;
        let appender = RotatingFileAppender::from_config(&config).unwrap();
        assert_eq!(appender.path(), Path::new("/tmp/app.log"));
        assert_eq!(
            appender.policy(),
            &RotationPolicy {
                max_file_size: 100,
                max_num_files: 3,
                compress: true,
            }
        );
    }

    #[test]
    fn test_rotation_trigger_and_shift() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");
        let policy = RotationPolicy::new().with_max_size(100).with_max_files(3);
        let mut appender = RotatingFileAppender::with_policy(&path, policy);

        appender.append(&line_of(40, 'a')).unwrap();
        appender.append(&line_of(40, 'b')).unwrap();
        assert!(!appender.backup_path(1, false).exists());

        // 80 + 40 > 100
        appender.append(&line_of(40, 'c')).unwrap();
        let first_backup = fs::read_to_string(appender.backup_path(1, false)).unwrap();
        assert_eq!(first_backup.len(), 80);
        assert!(first_backup.starts_with('a'));
        assert_eq!(fs::read_to_string(&path).unwrap(), line_of(40, 'c').plain);

        appender.append(&line_of(40, 'd')).unwrap();
        appender.append(&line_of(40, 'e')).unwrap();
        let second_backup = fs::read_to_string(appender.backup_path(2, false)).unwrap();
        assert!(second_backup.starts_with('a'));
        let first_backup = fs::read_to_string(appender.backup_path(1, false)).unwrap();
        assert!(first_backup.starts_with('c'));
        assert_eq!(fs::read_to_string(&path).unwrap(), line_of(40, 'e').plain);
    }

    #[test]
    fn test_exact_fit_does_not_rotate() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("fit.log");
        let policy = RotationPolicy::new().with_max_size(100).with_max_files(2);
        let mut appender = RotatingFileAppender::with_policy(&path, policy);

        appender.append(&line_of(50, 'a')).unwrap();
        appender.append(&line_of(50, 'b')).unwrap();
        assert_eq!(fs::metadata(&path).unwrap().len(), 100);
        assert!(!appender.backup_path(1, false).exists());
    }

    #[test]
    fn test_retention_bound() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("keep.log");
        let policy = RotationPolicy::new().with_max_size(100).with_max_files(3);
        let mut appender = RotatingFileAppender::with_policy(&path, policy);

        for _ in 0..50 {
            appender.append(&line_of(60, 'x')).unwrap();
        }

        assert_eq!(count_files(dir.path(), "keep.log"), 3);
        assert!(appender.backup_path(2, false).exists());
        assert!(!appender.backup_path(3, false).exists());
    }

    #[test]
    fn test_single_file_truncates_by_removal() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("one.log");
        let policy = RotationPolicy::new().with_max_size(50).with_max_files(1);
        let mut appender = RotatingFileAppender::with_policy(&path, policy);

        appender.append(&line_of(40, 'a')).unwrap();
        appender.append(&line_of(40, 'b')).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), line_of(40, 'b').plain);
        assert_eq!(count_files(dir.path(), "one.log"), 1);
    }

    #[test]
    fn test_zero_size_never_rotates() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("grow.log");
        let policy = RotationPolicy::new().with_max_files(5);
        let mut appender = RotatingFileAppender::with_policy(&path, policy);

        for _ in 0..100 {
            appender.append(&line_of(64, 'g')).unwrap();
        }

        assert_eq!(fs::metadata(&path).unwrap().len(), 6400);
        assert_eq!(count_files(dir.path(), "grow.log"), 1);
    }

    #[test]
    fn test_compressed_rotation_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("zip.log");
        let policy = RotationPolicy::new()
            .with_max_size(100)
            .with_max_files(3)
            .with_compression(true);
        let mut appender = RotatingFileAppender::with_policy(&path, policy);

        appender.append(&line_of(40, 'a')).unwrap();
        appender.append(&line_of(40, 'b')).unwrap();
        let expected = fs::read(&path).unwrap();

        appender.append(&line_of(40, 'c')).unwrap();

        let gz = appender.backup_path(1, true);
        assert!(gz.exists());
        assert!(!appender.backup_path(1, false).exists());

        let mut decoded = Vec::new();
        GzDecoder::new(File::open(&gz).unwrap())
            .read_to_end(&mut decoded)
            .unwrap();
        assert_eq!(decoded, expected);

        let leftovers = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .any(|e| e.file_name().to_string_lossy().ends_with(".tmp"));
        assert!(!leftovers);
    }

    #[test]
    fn test_toggling_compression_shifts_both_variants() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mixed.log");
        let plain_policy = RotationPolicy::new().with_max_size(100).with_max_files(4);
        let mut appender = RotatingFileAppender::with_policy(&path, plain_policy.clone());

        appender.append(&line_of(60, 'a')).unwrap();
        appender.append(&line_of(60, 'b')).unwrap();
        assert!(appender.backup_path(1, false).exists());

        let mut appender =
            RotatingFileAppender::with_policy(&path, plain_policy.with_compression(true));
        appender.append(&line_of(60, 'c')).unwrap();

        assert!(appender.backup_path(1, true).exists());
        assert!(appender.backup_path(2, false).exists());
        assert_eq!(count_files(dir.path(), "mixed.log"), 3);
    }

    #[test]
    fn test_colored_lines_on_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("color.log");
        let mut appender = RotatingFileAppender::new(&path).with_colors(true);

        let line = line_of(10, 'z');
        appender.append(&line).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), line.colored);
    }

    #[test]
    fn test_rotation_is_counted() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("count.log");
        let metrics = Arc::new(LoggerMetrics::new());
        let policy = RotationPolicy::new().with_max_size(10).with_max_files(2);
        let mut appender =
            RotatingFileAppender::with_policy(&path, policy).with_metrics(Arc::clone(&metrics));

        for _ in 0..4 {
            appender.append(&line_of(8, 'r')).unwrap();
        }
        assert_eq!(metrics.rotations(), 3);
    }

    #[test]
    fn test_unopenable_path_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("app.log");
        let mut appender = RotatingFileAppender::new(&path);

        let err = appender.append(&line_of(10, 'e')).unwrap_err();
        assert!(matches!(err, LoggerError::FileAppenderError { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_file_mode_applied_on_create() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let path = dir.path().join("private.log");
        let mut appender = RotatingFileAppender::new(&path).with_file_mode(0o600);
        appender.append(&line_of(10, 'p')).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
