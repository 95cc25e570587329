// Rendering of log entries, tabs and row grids as terminal text

use crossterm::style::Stylize;
use serde_json::Value;

use crate::api::RowGrid;
use crate::session::{LogEntry, LogKind, SessionTabs, TableCatalog};

/// Text shown for one cell
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Render rows as an aligned table. The first row is treated as the header.
pub fn format_grid(grid: &RowGrid) -> String {
    if grid.is_empty() {
        return "(no rows)".to_string();
    }

    let cells: Vec<Vec<String>> = grid
        .iter()
        .map(|row| row.iter().map(cell_text).collect())
        .collect();

    let columns = cells.iter().map(Vec::len).max().unwrap_or(0);
    let mut widths = vec![0usize; columns];
    for row in &cells {
        for (idx, cell) in row.iter().enumerate() {
            widths[idx] = widths[idx].max(cell.chars().count());
        }
    }

    let mut lines = Vec::with_capacity(cells.len() + 1);
    for (row_idx, row) in cells.iter().enumerate() {
        let line = row
            .iter()
            .enumerate()
            .map(|(idx, cell)| format!("{:<width$}", cell, width = widths[idx]))
            .collect::<Vec<_>>()
            .join(" | ");
        lines.push(line.trim_end().to_string());

        if row_idx == 0 && cells.len() > 1 {
            let rule = widths
                .iter()
                .map(|w| "-".repeat(*w))
                .collect::<Vec<_>>()
                .join("-+-");
            lines.push(rule);
        }
    }

    lines.join("\n")
}

pub struct Renderer {
    color: bool,
}

impl Renderer {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    pub fn entry(&self, entry: &LogEntry) -> String {
        if !self.color {
            return entry.text.clone();
        }
        match entry.kind {
            LogKind::Query => entry.text.as_str().cyan().to_string(),
            LogKind::Success => entry.text.as_str().green().to_string(),
            LogKind::Error => entry.text.as_str().red().to_string(),
        }
    }

    /// Open tabs in order, active one highlighted
    pub fn tab_bar(&self, tabs: &SessionTabs) -> String {
        if tabs.is_empty() {
            return "(no open tabs)".to_string();
        }
        tabs.tabs()
            .iter()
            .map(|tab| {
                if tabs.active() == Some(tab.name()) {
                    let label = format!("[*{}]", tab.name());
                    if self.color {
                        label.bold().to_string()
                    } else {
                        label
                    }
                } else {
                    format!("[ {} ]", tab.name())
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Tab bar followed by the active tab's rows
    pub fn active_view(&self, tabs: &SessionTabs) -> String {
        match tabs.active_tab() {
            Some(tab) => format!("{}\n{}", self.tab_bar(tabs), format_grid(tab.data())),
            None => "No table open".to_string(),
        }
    }

    /// Table names, with the active tab's table marked
    pub fn catalog(&self, catalog: &TableCatalog, active: Option<&str>) -> String {
        if catalog.is_empty() {
            return "(no tables)".to_string();
        }
        catalog
            .names()
            .iter()
            .map(|name| {
                if active == Some(name.as_str()) {
                    format!("* {}", name)
                } else {
                    format!("  {}", name)
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
