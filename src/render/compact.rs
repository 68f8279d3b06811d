use tabled::{settings::Style, Table, Tabled};

use super::{format_amount, format_date, Template};
use crate::invoice::{ConsolidatedInvoice, Invoice};

/// Single-table layout for quick terminal reads and narrow printouts.
pub struct CompactTemplate;

#[derive(Tabled)]
struct LineRow {
    #[tabled(rename = "DESCRIPTION")]
    description: String,
    #[tabled(rename = "AMOUNT (USD)")]
    amount: String,
}

#[derive(Tabled)]
struct MemberRow {
    #[tabled(rename = "NUMBER")]
    number: String,
    #[tabled(rename = "DATE")]
    date: String,
    #[tabled(rename = "TOTAL (USD)")]
    total: String,
}

impl Template for CompactTemplate {
    fn id(&self) -> &'static str {
        "2"
    }

    fn name(&self) -> &'static str {
        "Compact"
    }

    fn description(&self) -> &'static str {
        "Minimal single-table layout"
    }

    fn render(&self, invoice: &Invoice) -> String {
        let fees = invoice.fees();
        let mut out = String::new();

        let mut header = invoice.invoice_number.clone();
        if let Some(client) = &invoice.client_name {
            header.push_str(&format!(" | {client}"));
        }
        if let Some(date) = invoice.flight_date {
            header.push_str(&format!(" | {date}"));
        }
        if let Some(callsign) = &invoice.callsign {
            let route = invoice.route();
            if route.is_empty() {
                header.push_str(&format!(" | {callsign}"));
            } else {
                header.push_str(&format!(" | {callsign} {route}"));
            }
        }
        out.push_str(&header);
        out.push_str("\n\n");

        let mut rows: Vec<LineRow> = Vec::new();
        if let Some(base) = invoice.fee_amount {
            rows.push(LineRow {
                description: "Air Navigation Fee".to_string(),
                amount: format_amount(base),
            });
        }
        for line in fees.display_lines() {
            rows.push(LineRow {
                description: line.label,
                amount: format_amount(line.amount_usd),
            });
        }
        rows.push(LineRow {
            description: "TOTAL".to_string(),
            amount: format_amount(fees.display_subtotal),
        });

        let table = Table::new(rows).with(Style::psql()).to_string();
        out.push_str(&table);
        out.push('\n');

        out
    }

    fn render_consolidated(&self, rollup: &ConsolidatedInvoice) -> String {
        let mut out = String::new();

        let mut header = rollup.invoice_number.clone();
        if let Some(client) = &rollup.client_name {
            header.push_str(&format!(" | {client}"));
        }
        header.push_str(&format!(
            " | {} to {}",
            format_date(rollup.period_start),
            format_date(rollup.period_end)
        ));
        out.push_str(&header);
        out.push_str("\n\n");

        let mut rows: Vec<MemberRow> = rollup
            .invoices
            .iter()
            .map(|invoice| MemberRow {
                number: invoice.invoice_number.clone(),
                date: format_date(invoice.flight_date),
                total: format_amount(invoice.fees().display_subtotal),
            })
            .collect();
        rows.push(MemberRow {
            number: "TOTAL".to_string(),
            date: String::new(),
            total: format_amount(rollup.display_total_usd()),
        });

        let table = Table::new(rows).with(Style::psql()).to_string();
        out.push_str(&table);
        out.push('\n');

        out
    }
}
