//! Output generation for the dated reports and the index file.
//!
//! # Submodules
//!
//! - [`report`]: Renders a trend list to a dated Markdown report
//! - [`index`]: Loads, reconciles and saves the `index.json` catalog
//!
//! # Output Structure
//!
//! ```text
//! output_directory/
//! ├── 2025-08-19.md
//! ├── 2025-08-20.md
//! └── index.json        # newest first
//! ```

pub mod index;
pub mod report;
