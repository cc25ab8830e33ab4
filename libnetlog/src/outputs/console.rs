use chrono::{DateTime, Local, TimeZone};
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;

use crate::contracts::{LogOutput, Severity};
use crate::error::LogError;

const STAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S%.6f";

/// Writes timestamped, level-tagged lines to a stream or an append-mode file.
pub struct ConsoleOutput {
    writer: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleOutput {
    pub fn new<W: Write + Send + 'static>(writer: W) -> Self {
        ConsoleOutput {
            writer: Mutex::new(Box::new(writer)),
        }
    }

    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }

    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    /// Opens `path` for append, creating the file and its parent directories.
    pub fn open_file(path: &Path) -> Result<Self, LogError> {
        let io_err = |source| LogError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(io_err)?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(io_err)?;

        Ok(Self::new(file))
    }
}

/// Builds one output line: stamp, header, message and exactly one newline.
pub(crate) fn format_line<Tz: TimeZone>(now: &DateTime<Tz>, severity: Severity, message: &str) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let mut line = format!("{} {}{}", now.format(STAMP_FORMAT), severity.header(), message);
    if !line.ends_with('\n') {
        line.push('\n');
    }
    line
}

impl LogOutput for ConsoleOutput {
    fn write_log(&self, severity: Severity, message: &str) -> io::Result<()> {
        let line = format_line(&Local::now(), severity, message);

        let mut writer = match self.writer.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        writer.write_all(line.as_bytes())?;
        writer.flush()
    }
}


#[cfg(test)]
mod tests {
    use super::testing::SharedBuffer;
    use super::*;
    use crate::contracts::Logger;
    use crate::log_writer::LogWriter;
    use chrono::{NaiveDate, Utc};

    fn fixed_time() -> DateTime<Utc> {
        NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_micro_opt(7, 5, 1, 42)
            .unwrap()
            .and_utc()
    }

    fn assert_line_shape(line: &str, header: &str) {
        // "YYYY/MM/DD HH:MM:SS.uuuuuu " is 27 bytes
        let (stamp, rest) = line.split_at(27);
        let bytes = stamp.as_bytes();
        assert_eq!(bytes[4], b'/');
        assert_eq!(bytes[7], b'/');
        assert_eq!(bytes[10], b' ');
        assert_eq!(bytes[19], b'.');
        assert_eq!(bytes[26], b' ');
        assert!(rest.starts_with(header), "{:?}", line);
    }

    #[test]
    fn line_format_with_fixed_time() {
        let line = format_line(&fixed_time(), Severity::Info, "hello");
        assert_eq!(line, "2024/03/09 07:05:01.000042 info:  hello\n");
    }

    #[test]
    fn no_double_newline() {
        let line = format_line(&fixed_time(), Severity::Warning, "world\n");
        assert_eq!(line, "2024/03/09 07:05:01.000042 warn:  world\n");
    }

    #[test]
    fn empty_message_still_ends_the_line() {
        let line = format_line(&fixed_time(), Severity::Err, "");
        assert_eq!(line, "2024/03/09 07:05:01.000042 error: \n");
    }

    #[test]
    fn headers_per_severity() {
        let cases = [
            (Severity::Debug, "debug: "),
            (Severity::Info, "info:  "),
            (Severity::Warning, "warn:  "),
            (Severity::Err, "error: "),
            (Severity::Crit, "crit:  "),
        ];
        for (severity, header) in cases {
            let line = format_line(&fixed_time(), severity, "x");
            assert_line_shape(&line, header);
        }
    }

    #[test]
    fn two_info_calls_produce_two_lines() {
        let buffer = SharedBuffer::default();
        let logger = LogWriter::new(ConsoleOutput::new(buffer.clone()), false);

        logger.info(format_args!("hello"));
        logger.info(format_args!("world\n"));

        let contents = buffer.contents();
        let lines: Vec<&str> = contents.split_inclusive('\n').collect();
        assert_eq!(lines.len(), 2);
        assert_line_shape(lines[0], "info:  ");
        assert_line_shape(lines[1], "info:  ");
        assert!(lines[0].ends_with("hello\n"));
        assert!(lines[1].ends_with("world\n"));
        assert!(!contents.contains("\n\n"));
    }

    #[test]
    fn debug_output_follows_flag() {
        let buffer = SharedBuffer::default();
        let logger = LogWriter::new(ConsoleOutput::new(buffer.clone()), false);

        logger.debug(format_args!("value={}", 7));
        assert_eq!(buffer.contents(), "");

        logger.set_debug(true);
        logger.debug(format_args!("value={}", 7));
        let contents = buffer.contents();
        assert_eq!(contents.lines().count(), 1);
        assert!(contents.ends_with("debug: value=7\n"));
    }

    #[test]
    fn open_file_appends_and_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("app.log");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "existing\n").unwrap();

        let output = ConsoleOutput::open_file(&path).unwrap();
        output.write_log(Severity::Err, "appended").unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("existing\n"));
        assert!(contents.ends_with("error: appended\n"));

        let deeper = dir.path().join("a").join("b").join("c.log");
        ConsoleOutput::open_file(&deeper).unwrap();
        assert!(deeper.exists());
    }

    #[test]
    fn open_file_failure_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        // a directory cannot be opened for append
        let err = ConsoleOutput::open_file(dir.path()).err().unwrap();
        assert!(matches!(err, LogError::Io { .. }));
    }
}
