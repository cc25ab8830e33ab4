use std::borrow::Cow;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::contracts::{LogOutput, Logger, ProcessExit, Severity, Terminator, CRIT_EXIT_STATUS};

/// Generic [`Logger`] over any [`LogOutput`].
///
/// Holds the destination, the debug switch and the terminator used by
/// `crit`. Every backend in this crate is a `LogWriter` over its own output.
pub struct LogWriter<O> {
    output: O,
    debug: AtomicBool,
    terminator: Arc<dyn Terminator>,
}

impl<O: LogOutput> LogWriter<O> {
    pub fn new(output: O, debug: bool) -> Self {
        Self {
            output,
            debug: AtomicBool::new(debug),
            terminator: Arc::new(ProcessExit),
        }
    }

    /// Replaces the terminator `crit` calls after writing its line.
    pub fn with_terminator(mut self, terminator: Arc<dyn Terminator>) -> Self {
        self.terminator = terminator;
        self
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn is_debug(&self) -> bool {
        self.debug.load(Ordering::Relaxed)
    }

    fn emit(&self, severity: Severity, args: fmt::Arguments<'_>) {
        let message = match args.as_str() {
            Some(s) => Cow::Borrowed(s),
            None => Cow::Owned(args.to_string()),
        };

        if let Err(e) = self.output.write_log(severity, &message) {
            eprintln!("Failed to write log: {}", e);
        }
    }
}

impl<O: LogOutput> Logger for LogWriter<O> {
    fn debug(&self, args: fmt::Arguments<'_>) {
        if self.is_debug() {
            self.emit(Severity::Debug, args);
        }
    }

    fn info(&self, args: fmt::Arguments<'_>) {
        self.emit(Severity::Info, args);
    }

    fn warning(&self, args: fmt::Arguments<'_>) {
        self.emit(Severity::Warning, args);
    }

    fn err(&self, args: fmt::Arguments<'_>) {
        self.emit(Severity::Err, args);
    }

    fn crit(&self, args: fmt::Arguments<'_>) {
        self.emit(Severity::Crit, args);
        self.terminator.terminate(CRIT_EXIT_STATUS);
    }

    fn set_debug(&self, enabled: bool) {
        self.debug.store(enabled, Ordering::Relaxed);
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::io;
    use std::sync::Mutex;

    use super::*;

    /// Output that keeps every record in memory.
    #[derive(Default)]
    pub struct MemoryOutput {
        pub records: Mutex<Vec<(Severity, String)>>,
    }

    impl MemoryOutput {
        pub fn records(&self) -> Vec<(Severity, String)> {
            self.records.lock().unwrap().clone()
        }
    }

    impl LogOutput for MemoryOutput {
        fn write_log(&self, severity: Severity, message: &str) -> io::Result<()> {
            self.records
                .lock()
                .unwrap()
                .push((severity, message.to_string()));
            Ok(())
        }
    }

    /// Terminator that records exit codes instead of exiting.
    #[derive(Default)]
    pub struct RecordingTerminator {
        pub codes: Mutex<Vec<i32>>,
    }

    impl RecordingTerminator {
        pub fn codes(&self) -> Vec<i32> {
            self.codes.lock().unwrap().clone()
        }
    }

    impl Terminator for RecordingTerminator {
        fn terminate(&self, code: i32) {
            self.codes.lock().unwrap().push(code);
        }
    }
}
