//! Core library for folder-sizes - see what takes up the space in a folder
//!
//! # Overview
//!
//! Everything here is frontend agnostic and synchronous:
//!
//! - [`size`]: byte count of a file, recursive byte count of a folder
//! - [`listing`]: one level of a folder as [`Entry`] rows, plus the size sort
//! - [`format`]: the human readable Size column
//! - [`history`]: the back stack of visited folders
//! - [`opener`]: handing a path to the desktop's default application
//! - [`browser`]: the presenter state both frontends drive
//!
//! # Usage
//!
//! ```rust
//! use folder_sizes::{format_size, list_directory, sort_by_size_desc};
//!
//! let mut entries = list_directory("src").unwrap();
//! sort_by_size_desc(&mut entries);
//! for entry in &entries {
//!     println!("{:<40} {}", entry.name, format_size(entry.size));
//! }
//! ```

pub mod browser;
pub mod error;
pub mod format;
pub mod history;
pub mod listing;
pub mod logging;
pub mod opener;
pub mod size;

pub use browser::{clamp_selection, Activation, Browser};
pub use error::{Error, Result};
pub use format::{format_size, format_size_with, SizeUnits};
pub use history::NavigationHistory;
pub use listing::{list_directory, list_directory_with_report, sort_by_size_desc, Entry, FOLDER_MARKER};
pub use opener::{Open, Opener};
pub use size::{file_size, folder_size, folder_size_with_report, ScanReport, SkippedEntry};
