//! Digest writers.
//!
//! - [`json`]: The digest as the front end consumes it
//! - [`markdown`]: A readable rendering with "Common Headlines" and
//!   "By Source" sections
//!
//! # Output Structure
//!
//! ```text
//! json_output_dir/
//! └── 2025-05-06.json
//!
//! markdown_output_dir/
//! └── 2025-05-06.md
//! ```

pub mod json;
pub mod markdown;
