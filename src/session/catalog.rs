// Table catalog - cached snapshot of the service's table names

use crate::api::TableName;

/// Mirror of the server's table list, replaced wholesale on every load
#[derive(Debug, Default)]
pub struct TableCatalog {
    names: Vec<TableName>,
    /// Generation of the most recently started load
    issued: u64,
    /// Generation of the snapshot currently held
    applied: u64,
}

impl TableCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn names(&self) -> &[TableName] {
        &self.names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Whether any snapshot has been applied yet
    pub fn is_loaded(&self) -> bool {
        self.applied > 0
    }

    /// Start a load and return the generation its snapshot must carry.
    pub fn begin_load(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    /// Replace the cached names with a snapshot from load `generation`.
    ///
    /// Returns false (and keeps the current names) when a newer snapshot
    /// has already been applied.
    pub fn replace(&mut self, generation: u64, names: Vec<TableName>) -> bool {
        if generation <= self.applied {
            return false;
        }
        self.names = names;
        self.applied = generation;
        true
    }
}
