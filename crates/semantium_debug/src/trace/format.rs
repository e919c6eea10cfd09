//! Rendering trace records as prose lines or JSON.

use std::fmt::Write;

use super::record::{TraceEvent, TraceRecord};

/// Turns trace records into text.
pub trait TraceFormatter {
    /// Renders one record.
    fn format(&self, record: &TraceRecord) -> String;

    /// Renders several records; one per line unless overridden.
    fn format_many(&self, records: &[&TraceRecord]) -> String {
        let mut out = String::new();
        for (i, record) in records.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.push_str(&self.format(record));
        }
        out
    }
}

// =============================================================================
// Human
// =============================================================================

/// Renders `chain-2 used Start.X(10) at depth 3` style lines.
#[derive(Clone, Debug, Default)]
pub struct HumanFormatter {
    /// Prefix each line with the elapsed time.
    pub show_timestamps: bool,
    /// Prefix each line with the zero-padded record id.
    pub show_ids: bool,
}

impl HumanFormatter {
    /// No prefixes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the elapsed-time prefix.
    #[must_use]
    pub fn with_timestamps(mut self) -> Self {
        self.show_timestamps = true;
        self
    }

    /// Adds the `[000042]` id prefix.
    #[must_use]
    pub fn with_ids(mut self) -> Self {
        self.show_ids = true;
        self
    }
}

#[allow(clippy::cast_precision_loss)]
fn elapsed(ns: u64) -> String {
    match ns / 1_000 {
        us if us >= 1_000_000 => format!("{:.3}s", us as f64 / 1e6),
        us if us >= 1_000 => format!("{:.3}ms", us as f64 / 1e3),
        us => format!("{us}us"),
    }
}

fn describe(out: &mut String, record: &TraceRecord) -> std::fmt::Result {
    let chain = record.chain;
    match &record.event {
        TraceEvent::ChainCreated => write!(out, "{chain} created"),
        TraceEvent::ChainForked { parent, depth } => {
            write!(out, "{chain} forked from {parent} at depth {depth}")
        }
        TraceEvent::WordUsed {
            block,
            word,
            parameters,
            depth,
            ..
        } => {
            write!(out, "{chain} used {block}.{word}")?;
            if let Some(parameters) = parameters {
                out.push('(');
                for (i, value) in parameters.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    write!(out, "{value}")?;
                }
                out.push(')');
            }
            write!(out, " at depth {depth}")
        }
        TraceEvent::Finalized { depth } => write!(out, "{chain} finalized at depth {depth}"),
        TraceEvent::ResolutionFailed { message } => write!(out, "{chain} failed: {message}"),
    }
}

impl TraceFormatter for HumanFormatter {
    fn format(&self, record: &TraceRecord) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        if self.show_ids {
            let _ = write!(out, "[{:06}] ", record.id);
        }
        if self.show_timestamps {
            let _ = write!(out, "{:>10} ", elapsed(record.timestamp_ns));
        }
        let _ = describe(&mut out, record);
        out
    }
}

// =============================================================================
// JSON
// =============================================================================

/// Renders records as flat JSON objects tagged by `"type"`.
#[derive(Clone, Debug, Default)]
pub struct JsonFormatter {
    /// Indent the output.
    pub pretty: bool,
}

impl JsonFormatter {
    /// Compact output.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Indented output.
    #[must_use]
    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    fn render<T: serde::Serialize + ?Sized>(&self, value: &T) -> String {
        let rendered = if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        rendered.unwrap_or_else(|e| {
            serde_json::json!({ "type": "format-error", "message": e.to_string() }).to_string()
        })
    }
}

impl TraceFormatter for JsonFormatter {
    fn format(&self, record: &TraceRecord) -> String {
        self.render(record)
    }

    /// A single JSON array rather than one object per line.
    fn format_many(&self, records: &[&TraceRecord]) -> String {
        self.render(records)
    }
}

// =============================================================================
// Tests
// =============================================================================
