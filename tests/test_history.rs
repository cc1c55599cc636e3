use bvr_live::data::{HistoryLog, Severity, CLEARED_MESSAGE, HISTORY_LIMIT};

#[test]
fn newest_entry_is_first() {
    let mut history = HistoryLog::new();
    history.info("Webcam enabled");
    history.error("Webcam access denied");

    let latest = history.latest().unwrap();
    assert_eq!(latest.message, "Webcam access denied");
    assert_eq!(latest.severity, Severity::Error);
    let messages: Vec<_> = history.entries().map(|e| e.message.as_str()).collect();
    assert_eq!(messages, vec!["Webcam access denied", "Webcam enabled"]);
}

#[test]
fn oldest_entries_are_evicted_past_limit() {
    let mut history = HistoryLog::new();
    for i in 0..(HISTORY_LIMIT + 7) {
        history.info(format!("event {}", i));
    }

    assert_eq!(history.len(), HISTORY_LIMIT);
    assert_eq!(history.latest().unwrap().message, format!("event {}", HISTORY_LIMIT + 6));
    let oldest = history.entries().last().unwrap();
    assert_eq!(oldest.message, "event 7");
}

#[test]
fn clear_leaves_only_the_notice() {
    let mut history = HistoryLog::new();
    for i in 0..10 {
        history.info(format!("event {}", i));
    }
    history.clear();

    assert_eq!(history.len(), 1);
    assert_eq!(history.latest().unwrap().message, CLEARED_MESSAGE);
    assert_eq!(history.latest().unwrap().severity, Severity::Info);
}

#[test]
fn time_string_is_clock_time() {
    let mut history = HistoryLog::new();
    history.info("x");
    let time = history.latest().unwrap().time_string();
    assert_eq!(time.len(), 8);
    assert_eq!(time.matches(':').count(), 2);
}

#[test]
fn severity_names() {
    assert_eq!(Severity::Info.as_str(), "info");
    assert_eq!(Severity::Error.as_str(), "error");
    assert_eq!(Severity::default(), Severity::Info);
}
