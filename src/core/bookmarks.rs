//! # Bookmark Persistence
//!
//! Save/load catalogue paths to `~/.stampnav/bookmarks.json`.
//!
//! A bookmark is just a composite code plus the breadcrumb it was saved
//! with. Opening one goes through `StackController::restore`, so the stack is
//! rebuilt from fresh provider data rather than from anything stored here.
//!
//! All writes use atomic rename (write `.tmp`, then `rename()`) for crash safety.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::core::config;
use crate::core::stack::StackEntry;

const INDEX_FILE: &str = "bookmarks.json";
const MAX_TITLE_CHARS: usize = 60;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Bookmark {
    pub id: String,
    pub title: String,
    pub code: String,
    /// Frame titles at save time, root first.
    pub breadcrumb: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Every saved bookmark, most recently saved first.
#[derive(Serialize, Deserialize, Default, Debug)]
pub struct BookmarkIndex {
    pub bookmarks: Vec<Bookmark>,
}

impl BookmarkIndex {
    pub fn find(&self, id: &str) -> Option<&Bookmark> {
        self.bookmarks.iter().find(|b| b.id == id)
    }
}

/// Returns `~/.stampnav/`, creating it if needed.
pub fn bookmarks_dir() -> io::Result<PathBuf> {
    let dir = config::app_dir()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no home directory"))?;
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Title shown in the bookmark list: the breadcrumb, truncated to 60 chars.
pub fn derive_title(breadcrumb: &[String]) -> String {
    if breadcrumb.is_empty() {
        return "Untitled".to_string();
    }
    let full = breadcrumb.join(" › ");
    if full.chars().count() > MAX_TITLE_CHARS {
        let head: String = full.chars().take(MAX_TITLE_CHARS - 3).collect();
        return format!("{head}...");
    }
    full
}

/// Atomically write `data` as JSON to `path` (via `.tmp` + rename).
fn atomic_write_json<T: Serialize>(path: &Path, data: &T) -> io::Result<()> {
    let tmp_path = path.with_extension("tmp");
    let json = serde_json::to_string_pretty(data)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    fs::write(&tmp_path, json)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

/// Load the bookmark index from `dir`. A missing file is an empty index.
pub fn load_index(dir: &Path) -> io::Result<BookmarkIndex> {
    let path = dir.join(INDEX_FILE);
    if !path.exists() {
        return Ok(BookmarkIndex::default());
    }
    let json = fs::read_to_string(path)?;
    serde_json::from_str(&json).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// Bookmark the path described by `stack`.
///
/// Saving a code that is already bookmarked refreshes that bookmark and
/// moves it to the front instead of adding a duplicate.
pub fn save_path(dir: &Path, stack: &[StackEntry]) -> io::Result<Bookmark> {
    let top = stack
        .last()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "no open path to bookmark"))?;
    let breadcrumb: Vec<String> = stack.iter().map(|e| e.title.clone()).collect();
    let now = Utc::now();

    let mut index = load_index(dir).unwrap_or_else(|e| {
        warn!("Bookmark index unreadable, starting fresh: {}", e);
        BookmarkIndex::default()
    });

    let existing = index
        .bookmarks
        .iter()
        .position(|b| b.code == top.code)
        .map(|i| index.bookmarks.remove(i));

    let bookmark = Bookmark {
        id: existing
            .as_ref()
            .map(|b| b.id.clone())
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
        title: derive_title(&breadcrumb),
        code: top.code.clone(),
        breadcrumb,
        created_at: existing.as_ref().map(|b| b.created_at).unwrap_or(now),
        updated_at: now,
    };
    index.bookmarks.insert(0, bookmark.clone());

    atomic_write_json(&dir.join(INDEX_FILE), &index)?;
    debug!("Bookmark saved: {} ({})", bookmark.code, bookmark.id);
    Ok(bookmark)
}

/// Delete a bookmark by ID, returning it. Unknown IDs are not an error and
/// leave the index file untouched.
pub fn delete_bookmark(dir: &Path, id: &str) -> io::Result<Option<Bookmark>> {
    let mut index = load_index(dir)?;
    let Some(removed) = index.find(id).cloned() else {
        debug!("No bookmark {} to delete", id);
        return Ok(None);
    };
    index.bookmarks.retain(|b| b.id != id);
    atomic_write_json(&dir.join(INDEX_FILE), &index)?;
    Ok(Some(removed))
}

/// Bookmark the current path in `~/.stampnav/`. Returns a status line.
pub fn save_current(stack: &[StackEntry]) -> String {
    match bookmarks_dir().and_then(|dir| save_path(&dir, stack)) {
        Ok(bookmark) => format!("Bookmarked {}", bookmark.code),
        Err(e) => {
            warn!("Failed to save bookmark: {}", e);
            format!("Bookmark failed: {e}")
        }
    }
}
