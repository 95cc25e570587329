// One-shot actions: run a single operation through the dispatcher and exit

use anyhow::{bail, Result};
use std::path::PathBuf;

use crate::session::{LogKind, QueryDispatcher};

use super::render::{format_grid, Renderer};

/// A single non-interactive operation
#[derive(Debug, Clone)]
pub enum OneShot {
    Exec(String),
    Tables,
    Show(String),
    Upload(PathBuf),
}

/// Run `action` to completion and print its outcome.
///
/// Returns false when the operation ended in a logged error.
pub async fn run_once(
    dispatcher: &mut QueryDispatcher,
    renderer: &Renderer,
    action: OneShot,
) -> Result<bool> {
    match &action {
        OneShot::Exec(command) => {
            dispatcher.submit_text(command.clone());
        }
        OneShot::Tables => dispatcher.load_catalog(),
        OneShot::Show(name) => {
            dispatcher.open_table(name);
        }
        OneShot::Upload(path) => {
            dispatcher.upload(Some(path.as_path()));
        }
    }

    dispatcher.run_until_idle().await;

    let state = dispatcher.state();
    for entry in state.log().entries() {
        println!("{}", renderer.entry(entry));
    }

    match action {
        OneShot::Tables => {
            if !state.catalog().is_loaded() {
                bail!("Could not load the table list");
            }
            println!("{}", renderer.catalog(state.catalog(), None));
            Ok(true)
        }
        OneShot::Show(name) => match state.tabs().get(&name) {
            Some(tab) => {
                println!("{}", format_grid(tab.data()));
                Ok(true)
            }
            None => Ok(false),
        },
        OneShot::Exec(_) | OneShot::Upload(_) => {
            Ok(state.log().last().map_or(true, |e| e.kind != LogKind::Error))
        }
    }
}
