//! # Core Navigation Logic
//!
//! The drill-down engine for the stamp catalogue.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────────┐
//!                    │            CORE             │
//!                    │                             │
//!                    │  • step / code (naming)     │
//!                    │  • stack (path + rules)     │
//!                    │  • controller (fetch+push)  │
//!                    │  • Browser + update()       │
//!                    └──────────────┬──────────────┘
//!                                   │
//!              ┌────────────────────┼────────────────────┐
//!              ▼                    ▼                    ▼
//!       ┌────────────┐       ┌────────────┐       ┌────────────┐
//!       │    TUI     │       │  --print   │       │ Catalogue  │
//!       │  Adapter   │       │   (CLI)    │       │ Providers  │
//!       │ (ratatui)  │       │            │       │ http/json  │
//!       └────────────┘       └────────────┘       └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`step`]: `StepKind` and `SideCategory`, the ordered drill-down levels
//! - [`code`]: composite code building and parsing
//! - [`stack`]: `NavigationStack`, the open path and its push rules
//! - [`controller`]: `StackController`, fetch-then-commit navigation
//! - [`state`]: the `Browser` struct a front-end renders
//! - [`action`]: the `Action` enum and `update()` reducer
//! - [`bookmarks`] / [`config`]: on-disk state under `~/.stampnav/`

pub mod action;
pub mod bookmarks;
pub mod code;
pub mod config;
pub mod controller;
pub mod error;
pub mod stack;
pub mod state;
pub mod step;

pub use controller::{RestoreTicket, StackController};
pub use error::NavError;
pub use stack::{NavigationStack, StackEntry};
pub use step::{SideCategory, StepKind};
