//! Output formatting module
//!
//! Provides the text and JSON renderings of run summaries.

mod formatter;

pub use formatter::{
    render_failures, render_overview, render_plan, write_failures, write_overview, write_summary_to_file,
    OutputFormat, ResultFormatter,
};
