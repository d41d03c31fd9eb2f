//! # TUI Components
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! - `TitleBar`: breadcrumb, composite code and loading spinner
//! - `SideBar`: side-categories and their number keys
//! - `DetailView`: the record at the end of a path
//!
//! ### Stateful Components (Event-Driven)
//!
//! - `OptionList`: the options of the top frame, with a cursor
//! - `BookmarkManager`: Ctrl+O overlay over saved paths
//!
//! ```text
//! components/
//! ├── mod.rs              (this file)
//! ├── title_bar.rs
//! ├── side_bar.rs
//! ├── detail_view.rs
//! ├── option_list.rs
//! └── bookmark_manager.rs
//! ```

pub mod bookmark_manager;
mod detail_view;
mod option_list;
pub mod side_bar;
mod title_bar;

pub use bookmark_manager::{BookmarkEvent, BookmarkManager, BookmarkManagerState};
pub use detail_view::DetailView;
pub use option_list::{OptionList, OptionListEvent, OptionListState};
pub use side_bar::SideBar;
pub use title_bar::TitleBar;
