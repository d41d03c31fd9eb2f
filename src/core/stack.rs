//! # Navigation Stack
//!
//! The ordered frames of the open path, strictly LIFO.
//!
//! ```text
//! NavigationStack
//! ├── [0] Country      "NZ"              {}
//! ├── [1] Series       "NZ.014"          {}
//! └── [2] Errors       "NZ.014.~errors"   {Errors}   ← top
//! ```
//!
//! Every push is validated against the current top, so the stack cannot hold
//! a path that breaks the prefix or ordering rules no matter who drives it.

use std::collections::BTreeSet;

use crate::catalogue::{CatalogueOption, DetailRecord};
use crate::core::code;
use crate::core::error::NavError;
use crate::core::step::{SideCategory, StepKind};

/// One open level of the hierarchy.
#[derive(Debug, Clone, PartialEq)]
pub struct StackEntry {
    pub kind: StepKind,
    pub title: String,
    /// Choices for the next step, as returned by the provider.
    pub options: Vec<CatalogueOption>,
    /// Composite code after this frame's selection.
    pub code: String,
    /// Side-categories already entered on the path up to and including this frame.
    pub consumed_side_categories: BTreeSet<SideCategory>,
    /// Only set on `StampDetail` frames.
    pub detail: Option<DetailRecord>,
}

impl StackEntry {
    pub fn has_consumed(&self, category: SideCategory) -> bool {
        self.consumed_side_categories.contains(&category)
    }

    pub fn segments(&self) -> Vec<&str> {
        code::segments(&self.code)
    }
}

#[derive(Debug, Clone, Default)]
pub struct NavigationStack {
    entries: Vec<StackEntry>,
    /// Bumped on every mutation.
    generation: u64,
}

// Equality ignores the generation counter.
impl PartialEq for NavigationStack {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl NavigationStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `entry`, which must be a valid child of the current top
    /// (or a root entry when the stack is empty).
    pub fn push(&mut self, entry: StackEntry) -> Result<(), NavError> {
        self.check_push(&entry)?;
        self.entries.push(entry);
        self.generation += 1;
        Ok(())
    }

    /// Removes and returns the most recently pushed entry.
    pub fn pop(&mut self) -> Result<StackEntry, NavError> {
        let entry = self.entries.pop().ok_or(NavError::EmptyStack)?;
        self.generation += 1;
        Ok(entry)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.generation += 1;
    }

    /// Replaces the whole stack with a single root entry.
    /// The stack is untouched if `root` is not a valid root.
    pub fn reset_to(&mut self, root: StackEntry) -> Result<(), NavError> {
        Self::check_root(&root)?;
        self.entries.clear();
        self.entries.push(root);
        self.generation += 1;
        Ok(())
    }

    /// Takes over the entries of `other`, counting as a single mutation.
    pub fn adopt(&mut self, other: NavigationStack) {
        self.entries = other.entries;
        self.generation = self.generation.max(other.generation) + 1;
    }

    pub fn top(&self) -> Option<&StackEntry> {
        self.entries.last()
    }

    pub fn depth(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[StackEntry] {
        &self.entries
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Validates `entry` as the next push without mutating anything.
    pub fn check_push(&self, entry: &StackEntry) -> Result<(), NavError> {
        let Some(top) = self.top() else {
            return Self::check_root(entry);
        };

        let invalid = NavError::InvalidTransition {
            from: Some(top.kind),
            to: Some(entry.kind),
        };
        if !top.kind.accepts_child(entry.kind) || !code::is_child_code(&top.code, &entry.code) {
            return Err(invalid);
        }
        if let StepKind::SideCategory(category) = entry.kind {
            if top.has_consumed(category) {
                return Err(NavError::DuplicateCategory(category));
            }
            if !entry.has_consumed(category) {
                return Err(invalid);
            }
        }
        // Consumed categories are carried forward, never dropped.
        if !top
            .consumed_side_categories
            .is_subset(&entry.consumed_side_categories)
        {
            return Err(invalid);
        }
        Ok(())
    }

    fn check_root(entry: &StackEntry) -> Result<(), NavError> {
        if entry.kind != StepKind::Country || !code::is_root_code(&entry.code) {
            return Err(NavError::InvalidTransition {
                from: None,
                to: Some(entry.kind),
            });
        }
        Ok(())
    }
}
