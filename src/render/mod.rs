mod compact;
mod detailed;
mod standard;

pub use compact::CompactTemplate;
pub use detailed::DetailedTemplate;
pub use standard::StandardTemplate;

use std::collections::HashMap;

use crate::invoice::{ConsolidatedInvoice, Invoice};

/// A named visual rendering variant over the same underlying invoice data.
/// Every implementation must render any valid record; only the default is
/// guaranteed to be registered forever.
pub trait Template: Sync {
    fn id(&self) -> &'static str;
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;
    fn render(&self, invoice: &Invoice) -> String;
    fn render_consolidated(&self, rollup: &ConsolidatedInvoice) -> String;
}

pub const DEFAULT_TEMPLATE_ID: &str = "1";

static STANDARD: StandardTemplate = StandardTemplate;
static COMPACT: CompactTemplate = CompactTemplate;
static DETAILED: DetailedTemplate = DetailedTemplate;

static REGISTRY: [&dyn Template; 3] = [&STANDARD, &COMPACT, &DETAILED];

/// All registered templates, in identifier order.
pub fn available() -> &'static [&'static dyn Template] {
    &REGISTRY
}

/// The known-good baseline renderer.
pub fn fallback() -> &'static dyn Template {
    &STANDARD
}

fn lookup(id: &str) -> Option<&'static dyn Template> {
    REGISTRY.iter().copied().find(|template| template.id() == id)
}

/// Maps a requested template identifier to a renderer. Lives for one
/// rendered view; repeated renders of the same identifier hit the cache.
#[derive(Default)]
pub struct TemplateResolver {
    cache: HashMap<String, &'static dyn Template>,
}

impl TemplateResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Always yields a usable renderer. Empty identifiers skip the lookup
    /// entirely; unknown identifiers degrade silently to the fallback.
    pub fn resolve(&mut self, requested: Option<&str>) -> &'static dyn Template {
        let Some(id) = requested.filter(|id| !id.is_empty()) else {
            return fallback();
        };
        if let Some(resolved) = self.cache.get(id) {
            return *resolved;
        }
        let resolved = lookup(id).unwrap_or_else(fallback);
        self.cache.insert(id.to_string(), resolved);
        resolved
    }
}

pub(crate) fn format_date(date: Option<chrono::NaiveDate>) -> String {
    date.map(|d| d.format("%B %d, %Y").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Format a money amount with two decimal places and thousands separators.
/// Rounding happens here and only here; totals accumulate un-rounded.
pub(crate) fn format_amount(value: f64) -> String {
    let rounded = format!("{:.2}", value);
    let (whole, frac) = match rounded.split_once('.') {
        Some(parts) => parts,
        None => (rounded.as_str(), "00"),
    };

    let negative = whole.starts_with('-');
    let digits = if negative { &whole[1..] } else { whole };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let grouped: String = grouped.chars().rev().collect();

    if negative {
        format!("-{grouped}.{frac}")
    } else {
        format!("{grouped}.{frac}")
    }
}

/// Replace the bottom border of a rounded-style table with summary rows:
/// every column but the last merges into one right-aligned label cell, the
/// last column keeps its width for the values. Falls back to the untouched
/// table when the border does not look like `Style::rounded` output.
pub(crate) fn append_total_footer(table: &str, rows: &[(&str, String)]) -> String {
    let lines: Vec<&str> = table.lines().collect();
    if lines.len() < 4 || rows.is_empty() {
        return table.to_string();
    }

    let top = lines[0];
    let Some(inner) = top.strip_prefix('╭').and_then(|s| s.strip_suffix('╮')) else {
        return table.to_string();
    };

    let widths: Vec<usize> = inner.split('┬').map(|p| p.chars().count()).collect();
    if widths.len() < 2 {
        return table.to_string();
    }

    let value_width = widths[widths.len() - 1];
    // Merged label cell: the column widths plus the separators they absorb
    let label_width = widths[..widths.len() - 1].iter().sum::<usize>() + widths.len() - 2;

    // Strip the original bottom border and start building
    let mut out = lines[..lines.len() - 1].join("\n");
    out.push('\n');

    let merged: Vec<String> = widths[..widths.len() - 1]
        .iter()
        .map(|w| "─".repeat(*w))
        .collect();
    out.push_str(&format!(
        "├{}┼{}┤\n",
        merged.join("┴"),
        "─".repeat(value_width)
    ));

    for (idx, (label, value)) in rows.iter().enumerate() {
        out.push_str(&format!(
            "│ {:>label$} │ {:>value$} │\n",
            label,
            value,
            label = label_width - 2,
            value = value_width - 2
        ));
        if idx < rows.len() - 1 {
            out.push_str(&format!(
                "├{}┼{}┤\n",
                "─".repeat(label_width),
                "─".repeat(value_width)
            ));
        }
    }

    out.push_str(&format!(
        "╰{}┴{}╯",
        "─".repeat(label_width),
        "─".repeat(value_width)
    ));

    out
}
