// Outcome classifier - maps a submitted command and its result to log lines
//
// The message comes from the command's leading verb, not from what the
// service actually did. Only a result starting with "Error" overrides it.

use super::terminal_log::LogEntry;

/// Marker shown before an echoed command
pub const PROMPT_MARKER: &str = "DB> ";

/// Prefix a service result must carry to be shown as a failure
pub const ERROR_PREFIX: &str = "Error";

const SUCCESS_MARK: &str = "✔";

/// Message for commands whose verb is not in [`VERB_MESSAGES`]
pub const GENERIC_SUCCESS: &str = "Query executed successfully";

/// Leading verb → success message, checked in order
pub const VERB_MESSAGES: &[(&str, &str)] = &[
    ("MAKE", "Table created successfully"),
    ("ADD", "Record inserted successfully"),
    ("ERASE", "Record deleted successfully"),
    ("CHANGE", "Record updated successfully"),
    ("SHOW", "Data fetched successfully"),
];

/// Echo line for a submitted command
pub fn echo(command: &str) -> LogEntry {
    LogEntry::query(format!("{}{}", PROMPT_MARKER, command))
}

/// Success message implied by the command's leading verb.
///
/// Case-insensitive, matched on the raw text: leading whitespace means no verb.
pub fn verb_message(command: &str) -> &'static str {
    let upper = command.to_uppercase();
    VERB_MESSAGES
        .iter()
        .find(|(verb, _)| upper.starts_with(verb))
        .map(|(_, message)| *message)
        .unwrap_or(GENERIC_SUCCESS)
}

/// Classify one completed command.
///
/// `result` is the textual form of the service's result, if it had one.
pub fn classify(command: &str, result: Option<&str>) -> LogEntry {
    match result {
        Some(text) if text.starts_with(ERROR_PREFIX) => LogEntry::error(text),
        _ => LogEntry::success(format!("{} {}", SUCCESS_MARK, verb_message(command))),
    }
}

/// Echo and outcome lines for one completed command, in display order
pub fn outcome_entries(command: &str, result: Option<&str>) -> [LogEntry; 2] {
    [echo(command), classify(command, result)]
}
