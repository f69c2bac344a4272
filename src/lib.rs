/*!
 * # obsidian2anki - Export Obsidian tables as Anki cards
 *
 * A Rust library that turns the tables of tagged notes in an Obsidian
 * vault into a CSV file Anki can import.
 *
 * ## Features
 *
 * - Recursive vault scan with skipped folders (`.obsidian` by default)
 * - Whole-token export tag detection (`#anki/export` by default)
 * - Markdown tables mapped onto the card fields by position:
 *   Text, Context, Translation, Notes, and an optional Omit column
 * - `==highlight==` spans turned into cloze deletions on the Text field
 *   and `<mark>` elements on the Translation field
 * - One CSV file per run, every row stamped with the batch id
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `tag_matcher`: Export tag detection
 * - `table_extractor`: Markdown rendering and HTML table scraping
 * - `table`: In-memory table operations
 * - `card_schema`: Card schema normalization and row filtering
 * - `transform`: Highlight to cloze/HTML rewrites
 * - `export`: Export batches and CSV output
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod card_schema;
pub mod errors;
pub mod export;
pub mod file_utils;
pub mod table;
pub mod table_extractor;
pub mod tag_matcher;
pub mod transform;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{Controller, RunSummary};
pub use card_schema::NormalizedRow;
pub use errors::{DocumentError, ExportError, ExtractError, TableError};
pub use export::ExportBatch;
pub use table::Table;
pub use tag_matcher::{matches, TagMatcher};
pub use transform::{convert_highlight, convert_to_cloze};
