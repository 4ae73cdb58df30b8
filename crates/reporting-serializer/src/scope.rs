//! Per-call resolution scope
//!
//! The outermost deserialize call owns a [`ResolutionScope`] for its whole
//! duration and hands it by `&mut` to every nested read, including reentrant
//! calls a [`DefinitionLookup`](crate::DefinitionLookup) makes while loading
//! persisted sub-definitions. A UUID resolved anywhere in that call chain is
//! resolved once and shared. The scope is dropped when the outermost call
//! returns, whether it succeeded or not.

use crate::definition::Definition;
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

#[derive(Debug, Default)]
pub struct ResolutionScope {
    resolved: HashMap<Uuid, Definition>,
    in_progress: HashSet<Uuid>,
}

impl ResolutionScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// A definition already resolved in this scope
    pub fn get(&self, uuid: Uuid) -> Option<&Definition> {
        self.resolved.get(&uuid)
    }

    pub fn contains(&self, uuid: Uuid) -> bool {
        self.resolved.contains_key(&uuid)
    }

    /// Record a resolved definition
    pub fn insert(&mut self, uuid: Uuid, definition: Definition) {
        self.in_progress.remove(&uuid);
        self.resolved.insert(uuid, definition);
    }

    /// Mark a definition as being read; `false` if it already is
    pub fn begin(&mut self, uuid: Uuid) -> bool {
        self.in_progress.insert(uuid)
    }

    /// Whether a definition is being read further up the current call chain
    pub fn is_in_progress(&self, uuid: Uuid) -> bool {
        self.in_progress.contains(&uuid)
    }

    /// Number of resolved definitions
    pub fn len(&self) -> usize {
        self.resolved.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolved.is_empty()
    }
}
