//! Summary formatters
//!
//! Renders a [`RunSummary`] as an overview table and a failures section, or
//! as JSON.

use std::io::{self, Write};

use crate::models::{NodeKind, TestIdentifier, TestPlan};
use crate::summary::{Counts, RunSummary};

/// Width of the text inside an overview row's brackets
const ROW_WIDTH: usize = 33;

/// Overview rows in display order
const ROWS: [(&str, fn(&Counts) -> usize); 6] = [
    ("found", |c: &Counts| c.found),
    ("skipped", |c: &Counts| c.skipped),
    ("started", |c: &Counts| c.started),
    ("aborted", |c: &Counts| c.aborted),
    ("successful", |c: &Counts| c.succeeded),
    ("failed", |c: &Counts| c.failed),
];

/// Render the overview table.
///
/// The first line reports the run duration, followed by one row per counter
/// for containers and then tests, e.g. `[         4 containers found      ]`.
pub fn render_overview(summary: &RunSummary) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Test run finished after {} ms\n",
        summary.duration_millis()
    ));

    for kind in NodeKind::all() {
        let counts = summary.counts(kind);
        for (label, count) in ROWS {
            let row = format!("{:>10} {} {}", count(counts), kind.plural(), label);
            output.push_str(&format!("[{:<width$}]\n", row, width = ROW_WIDTH));
        }
    }

    output
}

/// Render the failures section. Empty when nothing failed.
pub fn render_failures(summary: &RunSummary) -> String {
    if summary.failures.is_empty() {
        return String::new();
    }

    let mut output = String::new();
    output.push_str(&format!("Failures ({}):\n", summary.failures.len()));

    for failure in &summary.failures {
        output.push_str(&format!("  {}\n", failure.identifier.display_name));
        if let Some(source) = &failure.identifier.source {
            output.push_str(&format!("    {source}\n"));
        }
        if let Some(cause) = &failure.cause {
            output.push_str(&format!("    => {cause}\n"));
        }
    }

    output
}

pub fn write_overview<W: Write>(summary: &RunSummary, out: &mut W) -> io::Result<()> {
    out.write_all(render_overview(summary).as_bytes())
}

pub fn write_failures<W: Write>(summary: &RunSummary, out: &mut W) -> io::Result<()> {
    out.write_all(render_failures(summary).as_bytes())
}

/// Render the plan as an indented tree, one identifier per line
pub fn render_plan(plan: &TestPlan) -> String {
    let mut output = String::new();
    for root in plan.roots() {
        push_plan_node(plan, root, 0, &mut output);
    }
    if !plan.contains_tests() {
        output.push_str("(no tests)\n");
    }
    output
}

fn push_plan_node(plan: &TestPlan, identifier: &TestIdentifier, depth: usize, output: &mut String) {
    output.push_str(&format!(
        "{:indent$}{} ({})\n",
        "",
        identifier.display_name,
        identifier.kind,
        indent = depth * 2
    ));
    for child in plan.children(&identifier.unique_id) {
        push_plan_node(plan, child, depth + 1, output);
    }
}

/// Output format options
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    JsonPretty,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "table" => Some(OutputFormat::Text),
            "json" => Some(OutputFormat::Json),
            "json-pretty" | "jsonpretty" => Some(OutputFormat::JsonPretty),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
            OutputFormat::JsonPretty => "json-pretty",
        }
    }
}

/// Summary formatter
pub struct ResultFormatter {
    format: OutputFormat,
    show_failures: bool,
}

impl ResultFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            show_failures: true,
        }
    }

    /// Leave the failures section out of text output
    pub fn without_failures(mut self) -> Self {
        self.show_failures = false;
        self
    }

    /// Format a run summary
    pub fn format_summary(&self, summary: &RunSummary) -> String {
        match self.format {
            OutputFormat::Text => self.format_summary_text(summary),
            OutputFormat::Json => serde_json::to_string(summary).unwrap_or_default(),
            OutputFormat::JsonPretty => serde_json::to_string_pretty(summary).unwrap_or_default(),
        }
    }

    fn format_summary_text(&self, summary: &RunSummary) -> String {
        let mut output = render_overview(summary);

        let failures = render_failures(summary);
        if self.show_failures && !failures.is_empty() {
            output.push('\n');
            output.push_str(&failures);
        }

        output
    }

    pub fn write_summary<W: Write>(&self, summary: &RunSummary, out: &mut W) -> io::Result<()> {
        out.write_all(self.format_summary(summary).as_bytes())?;
        if self.format != OutputFormat::Text {
            out.write_all(b"\n")?;
        }
        out.flush()
    }
}

impl Default for ResultFormatter {
    fn default() -> Self {
        Self::new(OutputFormat::Text)
    }
}

/// Write a formatted summary to a file
pub fn write_summary_to_file(
    path: &str,
    summary: &RunSummary,
    formatter: &ResultFormatter,
) -> anyhow::Result<()> {
    let mut file = std::fs::File::create(path)?;
    formatter.write_summary(summary, &mut file)?;

    Ok(())
}
