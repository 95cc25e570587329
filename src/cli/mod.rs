// Console front end: meta-commands, rendering, interactive loop, one-shot runs

pub mod commands;
pub mod oneshot;
pub mod render;
pub mod repl;

pub use commands::{format_help, parse_input, ConsoleCommand, ParsedInput};
pub use oneshot::{run_once, OneShot};
pub use render::{cell_text, format_grid, Renderer};
pub use repl::Console;
