// Console meta-commands (lines starting with '/')

use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Help,
    Quit,
    Tables,
    Open(String),
    Tab(String),
    Close(String),
    Tabs,
    View,
    Refresh,
    Upload(Option<PathBuf>),
    Show(String),
}

/// How one line of operator input should be treated
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedInput {
    /// Anything not starting with '/' goes to the service as-is
    Query(String),
    Command(ConsoleCommand),
    /// Known command, missing argument; carries the usage text
    Usage(&'static str),
    Unknown(String),
}

pub fn parse_input(line: &str) -> ParsedInput {
    let trimmed = line.trim();
    if !trimmed.starts_with('/') {
        return ParsedInput::Query(line.to_string());
    }

    let (name, arg) = match trimmed.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (trimmed, ""),
    };

    let with_arg = |make: fn(String) -> ConsoleCommand, usage: &'static str| {
        if arg.is_empty() {
            ParsedInput::Usage(usage)
        } else {
            ParsedInput::Command(make(arg.to_string()))
        }
    };

    match name {
        "/help" => ParsedInput::Command(ConsoleCommand::Help),
        "/quit" | "/exit" => ParsedInput::Command(ConsoleCommand::Quit),
        "/tables" => ParsedInput::Command(ConsoleCommand::Tables),
        "/tabs" => ParsedInput::Command(ConsoleCommand::Tabs),
        "/view" => ParsedInput::Command(ConsoleCommand::View),
        "/refresh" => ParsedInput::Command(ConsoleCommand::Refresh),
        "/open" => with_arg(ConsoleCommand::Open, "/open <table>"),
        "/tab" => with_arg(ConsoleCommand::Tab, "/tab <table>"),
        "/close" => with_arg(ConsoleCommand::Close, "/close <table>"),
        "/show" => with_arg(ConsoleCommand::Show, "/show <table>"),
        "/upload" => {
            let path = (!arg.is_empty()).then(|| PathBuf::from(arg));
            ParsedInput::Command(ConsoleCommand::Upload(path))
        }
        other => ParsedInput::Unknown(other.to_string()),
    }
}

pub fn format_help() -> String {
    r#"Available commands:
  /tables          - List tables known to the server
  /open <table>    - Open a table in a tab (or switch to it)
  /tab <table>     - Switch to an open tab
  /close <table>   - Close a tab
  /tabs            - Show open tabs
  /view            - Show the active tab's rows
  /refresh         - Refetch the active tab's rows
  /upload <file>   - Bulk-load a CSV file
  /show <table>    - Prefill "SHOW <table>" at the prompt
  /help            - Show this help message
  /quit            - Exit the console

Anything else is sent to the server, e.g. MAKE, ADD, SHOW, CHANGE, ERASE."#
        .to_string()
}
