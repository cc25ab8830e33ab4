use std::io;
use std::sync::Mutex;

use crate::contracts::{LogOutput, Severity};

/// Entry type understood by a structured event store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Information,
    Warning,
    Error,
}

impl EventKind {
    pub fn for_severity(severity: Severity) -> Self {
        match severity {
            Severity::Debug | Severity::Info => EventKind::Information,
            Severity::Warning => EventKind::Warning,
            Severity::Err | Severity::Crit => EventKind::Error,
        }
    }
}

/// A platform event store.
pub trait EventSink: Send {
    fn report(&mut self, kind: EventKind, event_id: u32, message: &str) -> io::Result<()>;
}

/// Maps severities onto event kinds and ids, then hands them to a sink.
pub struct EventLogOutput<S> {
    sink: Mutex<S>,
}

impl<S: EventSink> EventLogOutput<S> {
    pub fn new(sink: S) -> Self {
        EventLogOutput {
            sink: Mutex::new(sink),
        }
    }
}

impl<S: EventSink> LogOutput for EventLogOutput<S> {
    fn write_log(&self, severity: Severity, message: &str) -> io::Result<()> {
        let mut sink = match self.sink.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        sink.report(EventKind::for_severity(severity), severity.event_id(), message)
    }
}

#[cfg(windows)]
pub use self::windows::WindowsEventLog;

#[cfg(windows)]
mod windows {
    use std::ffi::{c_void, OsStr};
    use std::io;
    use std::os::windows::ffi::OsStrExt;
    use std::ptr;

    use super::{EventKind, EventSink};
    use crate::error::LogError;

    const EVENTLOG_ERROR_TYPE: u16 = 0x0001;
    const EVENTLOG_WARNING_TYPE: u16 = 0x0002;
    const EVENTLOG_INFORMATION_TYPE: u16 = 0x0004;

    #[link(name = "advapi32")]
    extern "system" {
        fn RegisterEventSourceW(server: *const u16, source: *const u16) -> *mut c_void;
        fn DeregisterEventSource(handle: *mut c_void) -> i32;
        fn ReportEventW(
            handle: *mut c_void,
            kind: u16,
            category: u16,
            event_id: u32,
            user_sid: *mut c_void,
            num_strings: u16,
            data_size: u32,
            strings: *const *const u16,
            raw_data: *mut c_void,
        ) -> i32;
    }

    fn wide(s: &str) -> Vec<u16> {
        OsStr::new(s).encode_wide().chain(Some(0)).collect()
    }

    /// Event source registered with the Windows event log.
    pub struct WindowsEventLog {
        handle: *mut c_void,
    }

    // The handle is only used behind the output's mutex.
    unsafe impl Send for WindowsEventLog {}

    impl WindowsEventLog {
        /// Registers `source` as an event source on the local machine.
        pub fn open(source: &str) -> Result<Self, LogError> {
            let name = wide(source);
            let handle = unsafe { RegisterEventSourceW(ptr::null(), name.as_ptr()) };
            if handle.is_null() {
                return Err(LogError::BackendUnavailable(io::Error::last_os_error()));
            }
            Ok(WindowsEventLog { handle })
        }
    }

    impl EventSink for WindowsEventLog {
        fn report(&mut self, kind: EventKind, event_id: u32, message: &str) -> io::Result<()> {
            let kind = match kind {
                EventKind::Information => EVENTLOG_INFORMATION_TYPE,
                EventKind::Warning => EVENTLOG_WARNING_TYPE,
                EventKind::Error => EVENTLOG_ERROR_TYPE,
            };
            let text = wide(message);
            let strings = [text.as_ptr()];
            let ok = unsafe {
                ReportEventW(
                    self.handle,
                    kind,
                    0,
                    event_id,
                    ptr::null_mut(),
                    1,
                    0,
                    strings.as_ptr(),
                    ptr::null_mut(),
                )
            };
            if ok == 0 {
                return Err(io::Error::last_os_error());
            }
            Ok(())
        }
    }

    impl Drop for WindowsEventLog {
        fn drop(&mut self) {
            unsafe {
                DeregisterEventSource(self.handle);
            }
        }
    }
}
