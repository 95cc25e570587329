// Session tabs - open tables, their cached rows, and the active selection
//
// Every detail fetch (first open or refresh) is tagged with a generation from
// one counter. A fetched grid is only applied if its generation is still the
// latest one issued for that table, so a slow response can never overwrite
// fresher data.

use std::collections::HashMap;

use crate::api::{RowGrid, TableName};

/// Client-side cache of one open table
#[derive(Debug, Clone)]
pub struct TabSession {
    name: TableName,
    data: RowGrid,
    /// Latest fetch generation issued for this tab
    generation: u64,
}

impl TabSession {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data(&self) -> &RowGrid {
        &self.data
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// What `open` decided to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenStep {
    /// Tab already open; it is now active and nothing needs fetching
    Selected,
    /// First fetch for this table is already in flight
    AlreadyFetching,
    /// Fetch the table's rows, tagged with this generation
    Fetch(u64),
}

/// A refresh the caller must perform for the active tab
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshTicket {
    pub name: TableName,
    pub generation: u64,
}

/// Open tables in the order they were opened, plus the active one
#[derive(Debug, Default)]
pub struct SessionTabs {
    tabs: Vec<TabSession>,
    active: Option<TableName>,
    /// Tables whose first fetch is in flight, with its generation
    opening: HashMap<TableName, u64>,
    last_generation: u64,
}

impl SessionTabs {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_generation(&mut self) -> u64 {
        self.last_generation += 1;
        self.last_generation
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.tabs.iter().position(|t| t.name == name)
    }

    pub fn tabs(&self) -> &[TabSession] {
        &self.tabs
    }

    pub fn get(&self, name: &str) -> Option<&TabSession> {
        self.tabs.iter().find(|t| t.name == name)
    }

    pub fn is_open(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    pub fn is_opening(&self, name: &str) -> bool {
        self.opening.contains_key(name)
    }

    /// Whether any first fetch is still outstanding
    pub fn has_pending_opens(&self) -> bool {
        !self.opening.is_empty()
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn active_tab(&self) -> Option<&TabSession> {
        self.active.as_deref().and_then(|name| self.get(name))
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    /// Open `name`, or just activate it if it is already open.
    pub fn open(&mut self, name: &str) -> OpenStep {
        if self.is_open(name) {
            self.active = Some(name.to_string());
            return OpenStep::Selected;
        }
        if self.is_opening(name) {
            return OpenStep::AlreadyFetching;
        }

        let generation = self.next_generation();
        self.opening.insert(name.to_string(), generation);
        OpenStep::Fetch(generation)
    }

    /// Apply the first fetch for `name`. The table becomes open and active.
    ///
    /// Returns false if no matching open was in flight.
    pub fn complete_open(&mut self, name: &str, generation: u64, data: RowGrid) -> bool {
        if self.opening.get(name) != Some(&generation) {
            return false;
        }
        self.opening.remove(name);

        if !self.is_open(name) {
            self.tabs.push(TabSession {
                name: name.to_string(),
                data,
                generation,
            });
        }
        self.active = Some(name.to_string());
        true
    }

    /// Forget a failed first fetch so the table can be opened again.
    pub fn abandon_open(&mut self, name: &str, generation: u64) -> bool {
        if self.opening.get(name) != Some(&generation) {
            return false;
        }
        self.opening.remove(name);
        true
    }

    /// Make an open tab active. Unknown names are ignored.
    pub fn select(&mut self, name: &str) -> bool {
        if !self.is_open(name) {
            return false;
        }
        self.active = Some(name.to_string());
        true
    }

    /// Close the tab for `name`, wherever it sits.
    ///
    /// If it was active, the first remaining tab (if any) takes over.
    pub fn close(&mut self, name: &str) -> bool {
        let Some(idx) = self.index_of(name) else {
            return false;
        };
        self.tabs.remove(idx);

        if self.active.as_deref() == Some(name) {
            self.active = self.tabs.first().map(|t| t.name.clone());
        }
        true
    }

    /// Start a refresh of the active tab; `None` when nothing is active.
    pub fn refresh_active(&mut self) -> Option<RefreshTicket> {
        let name = self.active.clone()?;
        let generation = self.next_generation();
        let tab = self.tabs.iter_mut().find(|t| t.name == name)?;
        tab.generation = generation;
        Some(RefreshTicket { name, generation })
    }

    /// Apply refreshed rows in place.
    ///
    /// Returns false when the tab was closed or a newer fetch was issued.
    pub fn complete_refresh(&mut self, name: &str, generation: u64, data: RowGrid) -> bool {
        match self.tabs.iter_mut().find(|t| t.name == name) {
            Some(tab) if tab.generation == generation => {
                tab.data = data;
                true
            }
            _ => false,
        }
    }
}
