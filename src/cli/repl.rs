// Interactive console - line editor on one thread, session events on the runtime
//
// The line editor blocks, so it lives on its own thread and is asked for one
// line at a time. The console only asks while no command, upload or table
// open is outstanding; background refreshes never hold the prompt back.

use anyhow::{bail, Context, Result};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::PathBuf;
use tokio::sync::mpsc;

use crate::config::ConsoleConfig;
use crate::logging::TranscriptWriter;
use crate::session::{OpenStep, QueryDispatcher, Submission};

use super::commands::{format_help, parse_input, ConsoleCommand, ParsedInput};
use super::render::Renderer;

/// Ask the line-editor thread for one line
struct PromptRequest {
    prompt: String,
    /// Text placed in the editor before the operator types
    initial: String,
}

enum LineEvent {
    Line(String),
    Interrupted,
    Eof,
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

fn spawn_line_reader(
    history_path: Option<PathBuf>,
) -> (
    mpsc::UnboundedSender<PromptRequest>,
    mpsc::UnboundedReceiver<LineEvent>,
) {
    let (prompt_tx, mut prompt_rx) = mpsc::unbounded_channel::<PromptRequest>();
    let (line_tx, line_rx) = mpsc::unbounded_channel();

    std::thread::spawn(move || {
        let mut editor = match DefaultEditor::new() {
            Ok(editor) => editor,
            Err(e) => {
                let _ = line_tx.send(LineEvent::Failed(e.to_string()));
                return;
            }
        };
        if let Some(path) = &history_path {
            if let Err(e) = editor.load_history(path) {
                tracing::debug!("No history loaded from {}: {}", path.display(), e);
            }
        }

        while let Some(request) = prompt_rx.blocking_recv() {
            let event = match editor.readline_with_initial(&request.prompt, (&request.initial, "")) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        let _ = editor.add_history_entry(line.as_str());
                    }
                    if let Some(path) = &history_path {
                        if let Err(e) = editor.save_history(path) {
                            tracing::warn!("Failed to save history to {}: {}", path.display(), e);
                        }
                    }
                    LineEvent::Line(line)
                }
                Err(ReadlineError::Interrupted) => LineEvent::Interrupted,
                Err(ReadlineError::Eof) => LineEvent::Eof,
                Err(e) => LineEvent::Failed(e.to_string()),
            };
            if line_tx.send(event).is_err() {
                break;
            }
        }
    });

    (prompt_tx, line_rx)
}

pub struct Console {
    dispatcher: QueryDispatcher,
    renderer: Renderer,
    server_url: String,
    prompt: String,
    history_path: Option<PathBuf>,
    transcript: Option<TranscriptWriter>,
    /// Log entries already printed
    printed: usize,
    /// Table whose first fetch the operator is waiting to see
    awaiting_view: Option<String>,
}

impl Console {
    pub fn new(
        dispatcher: QueryDispatcher,
        config: &ConsoleConfig,
        server_url: impl Into<String>,
    ) -> Result<Self> {
        let transcript = config
            .transcript_path
            .as_ref()
            .map(TranscriptWriter::open)
            .transpose()
            .context("Failed to open transcript")?;

        Ok(Self {
            dispatcher,
            renderer: Renderer::new(config.color),
            server_url: server_url.into(),
            prompt: config.prompt.clone(),
            history_path: config.history_path.clone(),
            transcript,
            printed: 0,
            awaiting_view: None,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        println!("MiniDB console · {}", self.server_url);
        println!("Type /help for commands.\n");

        self.dispatcher.load_catalog();

        let (prompt_tx, mut line_rx) = spawn_line_reader(self.history_path.clone());
        let mut awaiting_line = false;
        let mut announced_busy = false;

        loop {
            if !awaiting_line {
                if self.dispatcher.is_busy() {
                    if !announced_busy {
                        println!("Running...");
                        announced_busy = true;
                    }
                } else {
                    let request = PromptRequest {
                        prompt: self.prompt.clone(),
                        initial: self.dispatcher.state().input().to_string(),
                    };
                    if prompt_tx.send(request).is_err() {
                        break;
                    }
                    awaiting_line = true;
                    announced_busy = false;
                }
            }

            tokio::select! {
                line = line_rx.recv(), if awaiting_line => {
                    awaiting_line = false;
                    match line {
                        Some(LineEvent::Line(text)) => {
                            if self.handle_line(text) == Flow::Quit {
                                break;
                            }
                        }
                        Some(LineEvent::Interrupted) => self.dispatcher.set_input(""),
                        Some(LineEvent::Failed(e)) => bail!("Line editor failed: {}", e),
                        Some(LineEvent::Eof) | None => break,
                    }
                }

                Some(event) = self.dispatcher.next_event() => {
                    tracing::debug!("Received event: {}", event.name());
                    self.dispatcher.handle_event(event);
                }
            }

            self.after_step()?;
        }

        Ok(())
    }

    fn handle_line(&mut self, line: String) -> Flow {
        match parse_input(&line) {
            ParsedInput::Query(text) => {
                if let Submission::Rejected { .. } = self.dispatcher.submit_text(text) {
                    println!("A command is already running; wait for it to finish.");
                }
                Flow::Continue
            }
            ParsedInput::Command(command) => self.run_command(command),
            ParsedInput::Usage(usage) => {
                println!("Usage: {}", usage);
                Flow::Continue
            }
            ParsedInput::Unknown(name) => {
                println!("Unknown command: {} (try /help)", name);
                Flow::Continue
            }
        }
    }

    fn run_command(&mut self, command: ConsoleCommand) -> Flow {
        match command {
            ConsoleCommand::Help => println!("{}", format_help()),
            ConsoleCommand::Quit => return Flow::Quit,
            ConsoleCommand::Tables => {
                let state = self.dispatcher.state();
                println!(
                    "{}",
                    self.renderer.catalog(state.catalog(), state.tabs().active())
                );
            }
            ConsoleCommand::Open(name) => match self.dispatcher.open_table(&name) {
                OpenStep::Selected => self.print_view(),
                OpenStep::Fetch(_) => self.awaiting_view = Some(name),
                OpenStep::AlreadyFetching => {}
            },
            ConsoleCommand::Tab(name) => {
                if self.dispatcher.select_tab(&name) {
                    self.print_view();
                } else {
                    println!("No open tab named {}", name);
                }
            }
            ConsoleCommand::Close(name) => {
                if self.dispatcher.close_tab(&name) {
                    println!("{}", self.renderer.tab_bar(self.dispatcher.state().tabs()));
                } else {
                    println!("No open tab named {}", name);
                }
            }
            ConsoleCommand::Tabs => {
                println!("{}", self.renderer.tab_bar(self.dispatcher.state().tabs()));
            }
            ConsoleCommand::View => self.print_view(),
            ConsoleCommand::Refresh => {
                if !self.dispatcher.refresh_active() {
                    println!("No table open");
                }
            }
            ConsoleCommand::Upload(path) => {
                if path.is_none() {
                    println!("No file selected");
                }
                self.dispatcher.upload(path.as_deref());
            }
            ConsoleCommand::Show(name) => {
                self.dispatcher.set_input(format!("SHOW {}", name));
            }
        }
        Flow::Continue
    }

    fn print_view(&self) {
        println!("{}", self.renderer.active_view(self.dispatcher.state().tabs()));
    }

    /// Print new log entries, then any table view the operator is waiting on.
    fn after_step(&mut self) -> Result<()> {
        let state = self.dispatcher.state();
        for entry in state.log().since(self.printed) {
            println!("{}", self.renderer.entry(entry));
            if let Some(transcript) = self.transcript.as_mut() {
                transcript.record(entry)?;
            }
        }
        self.printed = state.log().len();

        if let Some(name) = self.awaiting_view.as_deref() {
            if !state.tabs().is_opening(name) {
                if state.tabs().active() == Some(name) {
                    self.print_view();
                }
                self.awaiting_view = None;
            }
        }

        Ok(())
    }
}
