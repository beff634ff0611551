//! Output generation for finished drafts.
//!
//! # Submodules
//!
//! - [`json`]: Writes one JSON file per draft
//! - [`markdown`]: Renders a draft as a Markdown document
//!
//! # Output Structure
//!
//! ```text
//! json_output_dir/
//! ├── 2025-05-06_hello-world.json
//! └── 2025-05-06_難聴と子育て.json
//! ```

pub mod json;
pub mod markdown;
