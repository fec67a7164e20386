//! Log writer module
//!
//! Thread-safe log writing to files or stdout/stderr, with a minimum level.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Mutex, OnceLock};

use super::Level;

/// Global log writer instance
static LOG_WRITER: OnceLock<LogWriter> = OnceLock::new();

/// Log output target
enum LogTarget {
    Stdout,
    Stderr,
    File(Mutex<File>),
}

/// Thread-safe log writer
pub struct LogWriter {
    /// Access and info log target
    access: LogTarget,
    /// Warning and error log target
    error: LogTarget,
    min_level: Level,
}

impl LogWriter {
    fn new(
        access_log_file: Option<&str>,
        error_log_file: Option<&str>,
        min_level: Level,
    ) -> io::Result<Self> {
        let access = match access_log_file {
            Some(path) => LogTarget::File(Mutex::new(open_log_file(path)?)),
            None => LogTarget::Stdout,
        };

        let error = match error_log_file {
            Some(path) => LogTarget::File(Mutex::new(open_log_file(path)?)),
            None => LogTarget::Stderr,
        };

        Ok(Self {
            access,
            error,
            min_level,
        })
    }

    pub fn enabled(&self, level: Level) -> bool {
        level >= self.min_level
    }

    /// Write a leveled server message; warn and above go to the error target
    pub fn write(&self, level: Level, message: &str) {
        if !self.enabled(level) {
            return;
        }
        if level >= Level::Warn {
            write_to_target(&self.error, message);
        } else {
            write_to_target(&self.access, message);
        }
    }

    /// Access log lines bypass the level filter
    pub fn write_access(&self, message: &str) {
        write_to_target(&self.access, message);
    }
}

/// Open or create a log file for appending
fn open_log_file(path: &str) -> io::Result<File> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    OpenOptions::new().create(true).append(true).open(path)
}

fn write_to_target(target: &LogTarget, message: &str) {
    match target {
        LogTarget::Stdout => println!("{message}"),
        LogTarget::Stderr => eprintln!("{message}"),
        LogTarget::File(file) => {
            if let Ok(mut f) = file.lock() {
                let _ = writeln!(f, "{message}");
            }
        }
    }
}

/// Initialize the global log writer
///
/// Returns error if log files cannot be opened or the writer is already set.
pub fn init(
    access_log_file: Option<&str>,
    error_log_file: Option<&str>,
    min_level: Level,
) -> io::Result<()> {
    let writer = LogWriter::new(access_log_file, error_log_file, min_level)?;
    LOG_WRITER.set(writer).map_err(|_| {
        io::Error::new(
            io::ErrorKind::AlreadyExists,
            "Log writer already initialized",
        )
    })
}

/// Get the global log writer, if initialized
pub fn get() -> Option<&'static LogWriter> {
    LOG_WRITER.get()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn test_file_targets_respect_level() {
        let dir = std::env::temp_dir().join(format!("bfhl-log-{}", std::process::id()));
        let access_path = dir.join("logs/access.log");
        let error_path = dir.join("logs/error.log");

        let writer = LogWriter::new(
            access_path.to_str(),
            error_path.to_str(),
            Level::Info,
        )
        .unwrap();
        writer.write(Level::Debug, "hidden");
        writer.write(Level::Info, "started");
        writer.write(Level::Error, "[ERROR] boom");
        writer.write_access("127.0.0.1 GET /bfhl 200");

        let mut access = String::new();
        File::open(&access_path)
            .unwrap()
            .read_to_string(&mut access)
            .unwrap();
        let errors = std::fs::read_to_string(&error_path).unwrap();

        assert!(access.contains("started"));
        assert!(access.contains("GET /bfhl 200"));
        assert!(!access.contains("hidden"));
        assert!(errors.contains("[ERROR] boom"));
        assert!(!errors.contains("started"));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
