use anyhow::{Context, Result};
use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use std::path::Path;

const LOG_FILE_BASENAME: &str = "maniana";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 1024 * 1024;
const MAX_LOG_FILES: usize = 3;

/// Start file-based logging into the data directory. The returned handle
/// must stay alive for the duration of the process; dropping it flushes
/// and shuts the logger down.
///
/// Level defaults to `info` and can be overridden through `RUST_LOG`.
pub fn init_logging(log_dir: &Path) -> Result<LoggerHandle> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;

    let handle = Logger::try_with_env_or_str("info")
        .context("Invalid log specification")?
        .log_to_file(
            FileSpec::default()
                .directory(log_dir)
                .basename(LOG_FILE_BASENAME),
        )
        .rotate(
            Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(MAX_LOG_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .start()
        .context("Failed to start logger")?;

    Ok(handle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_creates_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log_dir = temp_dir.path().join("logs");

        let handle = init_logging(&log_dir).unwrap();
        assert!(log_dir.is_dir());
        drop(handle);

        // `init_logging` installs a process-global logger (via the `log`
        // crate) that keeps writing to `log_dir` for the rest of the test
        // binary's life. Letting `temp_dir` reap the directory here would
        // make any later `log::*` call in another test panic inside
        // flexi_logger. Leak the temp dir so the global logger's target
        // survives for the whole process.
        let _ = temp_dir.keep();
    }
}
