use std::fs;
use std::path::Path;
use std::process::Command;

use libnetlog::{log_crit, log_debug, log_err, log_info, log_warning, LogError};

const CHILD_ENV: &str = "NETLOG_CRIT_CHILD_LOG";

fn file_url(path: &Path) -> String {
    format!("file://{}?facility=application&tag=facade", path.display())
}

// The process-wide slot is shared by every test in this binary, so all
// assertions against it live in one test.
#[test]
fn process_wide_facade() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("first.log");
    let second = dir.path().join("second.log");

    libnetlog::set_output_url(&file_url(&first)).unwrap();
    log_info!("hello");
    log_info!("world\n");
    log_debug!("not yet");

    let err = libnetlog::set_output_url("not a url").unwrap_err();
    assert!(matches!(err, LogError::Parse(_)));
    log_warning!("after failed reconfiguration");

    let err = libnetlog::set_output_url("ftp://host").unwrap_err();
    assert!(matches!(err, LogError::UnsupportedScheme(_)));

    let first_contents = fs::read_to_string(&first).unwrap();
    let lines: Vec<&str> = first_contents.lines().collect();
    assert_eq!(lines.len(), 3, "{:?}", first_contents);
    assert!(lines[0].ends_with(" info:  hello"));
    assert!(lines[1].ends_with(" info:  world"));
    assert!(lines[2].ends_with(" warn:  after failed reconfiguration"));
    assert!(!first_contents.contains("\n\n"));

    libnetlog::set_output_url(&file_url(&second)).unwrap();
    libnetlog::set_debug(true);
    log_debug!("now {}", "visible");
    log_err!("code {}", 17);

    assert_eq!(fs::read_to_string(&first).unwrap(), first_contents);
    let second_contents = fs::read_to_string(&second).unwrap();
    assert_eq!(second_contents.lines().count(), 2);
    assert!(second_contents.contains(" debug: now visible\n"));
    assert!(second_contents.ends_with(" error: code 17\n"));

    libnetlog::set_output_url("stderr://").unwrap();
}

#[test]
fn crit_exits_with_status_two_after_writing() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("crit.log");

    let exe = std::env::current_exe().unwrap();
    let status = Command::new(exe)
        .args(["--exact", "crit_child", "--nocapture", "--test-threads=1"])
        .env(CHILD_ENV, &log)
        .status()
        .unwrap();

    assert_eq!(status.code(), Some(2));
    let contents = fs::read_to_string(&log).unwrap();
    assert_eq!(contents.lines().count(), 1);
    assert!(contents.ends_with(" crit:  giving up after 3 retries\n"));
}

/// Runs only when re-executed by `crit_exits_with_status_two_after_writing`.
#[test]
fn crit_child() {
    let Some(log) = std::env::var_os(CHILD_ENV) else {
        return;
    };

    libnetlog::set_output_url(&file_url(Path::new(&log))).unwrap();
    log_crit!("giving up after {} retries", 3);

    unreachable!("crit returned");
}
