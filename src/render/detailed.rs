use tabled::{settings::Style, Table, Tabled};

use super::{format_amount, format_date, Template};
use crate::invoice::{ConsolidatedInvoice, Invoice, NormalizedFees};

/// Audit-oriented layout: original-currency columns, fee descriptions, FX
/// reconciliation, and airspace usage figures.
pub struct DetailedTemplate;

#[derive(Tabled)]
struct ChargeRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "DESCRIPTION")]
    description: String,
    #[tabled(rename = "ORIGINAL")]
    original: String,
    #[tabled(rename = "CCY")]
    currency: String,
    #[tabled(rename = "AMOUNT (USD)")]
    amount: String,
    #[tabled(rename = "NOTES")]
    notes: String,
}

fn charge_rows(invoice: &Invoice, fees: &NormalizedFees) -> Vec<ChargeRow> {
    let mut rows: Vec<ChargeRow> = Vec::new();
    if let Some(base) = invoice.fee_amount {
        rows.push(ChargeRow {
            index: 1,
            description: "Air Navigation Fee".to_string(),
            original: String::new(),
            currency: String::new(),
            amount: format_amount(base),
            notes: String::new(),
        });
    }
    for line in fees.display_lines() {
        rows.push(ChargeRow {
            index: rows.len() + 1,
            description: line.label,
            original: line.original_amount.map(format_amount).unwrap_or_default(),
            currency: line.original_currency.unwrap_or_default(),
            amount: format_amount(line.amount_usd),
            notes: line.description.unwrap_or_default(),
        });
    }
    rows
}

impl Template for DetailedTemplate {
    fn id(&self) -> &'static str {
        "3"
    }

    fn name(&self) -> &'static str {
        "Detailed"
    }

    fn description(&self) -> &'static str {
        "Audit layout with original currency and FX reconciliation"
    }

    fn render(&self, invoice: &Invoice) -> String {
        let fees = invoice.fees();
        let mut out = String::new();

        out.push_str(&format!("INVOICE {} (detailed)\n\n", invoice.invoice_number));

        if let Some(client) = &invoice.client_name {
            match &invoice.client_email {
                Some(email) => out.push_str(&format!("Client:       {client} <{email}>\n")),
                None => out.push_str(&format!("Client:       {client}\n")),
            }
        }
        if let Some(fir) = &invoice.fir_name {
            out.push_str(&format!("FIR:          {fir}\n"));
        }
        if let Some(callsign) = &invoice.callsign {
            let mut flight = callsign.clone();
            if let Some(registration) = &invoice.registration {
                flight.push_str(&format!("  {registration}"));
            }
            if let Some(aircraft) = &invoice.aircraft_type {
                flight.push_str(&format!("  {aircraft}"));
            }
            out.push_str(&format!("Flight:       {flight}\n"));
        }
        let route = invoice.route();
        if !route.is_empty() {
            out.push_str(&format!("Route:        {route}\n"));
        }
        if invoice.flight_date.is_some() {
            out.push_str(&format!("Flight date:  {}\n", format_date(invoice.flight_date)));
        }
        if let Some(mtow) = invoice.mtow_kg {
            out.push_str(&format!("MTOW:         {} kg\n", format_amount(mtow)));
        }
        if let Some(distance) = invoice.distance_km {
            out.push_str(&format!("Distance:     {} km\n", format_amount(distance)));
        }
        out.push('\n');

        let rows = charge_rows(invoice, &fees);
        if rows.is_empty() {
            out.push_str("No charges recorded.\n");
        } else {
            let table = Table::new(rows).with(Style::modern()).to_string();
            out.push_str(&table);
            out.push('\n');
        }

        out.push_str(&format!(
            "\nOther fees (USD):  {}\n",
            format_amount(fees.other_fees_total_usd)
        ));
        out.push_str(&format!(
            "Subtotal (USD):    {}\n",
            format_amount(fees.display_subtotal)
        ));
        if let (Some(total), Some(currency)) = (invoice.total_original, &invoice.currency) {
            out.push_str(&format!(
                "Total ({currency}):       {}\n",
                format_amount(total)
            ));
        }
        if let (Some(rate), Some(currency)) = (invoice.fx_rate, &invoice.currency) {
            out.push_str(&format!("FX rate:           {rate} {currency}/USD\n"));
        }

        if let Some(notes) = &invoice.notes {
            out.push_str(&format!("\nNotes: {notes}\n"));
        }

        out
    }

    fn render_consolidated(&self, rollup: &ConsolidatedInvoice) -> String {
        let mut out = String::new();

        out.push_str(&format!(
            "CONSOLIDATED INVOICE {} (detailed)\n\n",
            rollup.invoice_number
        ));
        if let Some(client) = &rollup.client_name {
            out.push_str(&format!("Client:  {client}\n"));
        }
        out.push_str(&format!(
            "Period:  {} to {}\n",
            format_date(rollup.period_start),
            format_date(rollup.period_end)
        ));
        out.push_str(&format!("Flights: {}\n\n", rollup.invoices.len()));

        if rollup.invoices.is_empty() {
            out.push_str("No invoices in this billing period.\n");
            return out;
        }

        for invoice in &rollup.invoices {
            let fees = invoice.fees();
            out.push_str(&format!(
                "--- {}  {}  {}\n",
                invoice.invoice_number,
                format_date(invoice.flight_date),
                invoice.route()
            ));
            let rows = charge_rows(invoice, &fees);
            if rows.is_empty() {
                out.push_str("No charges recorded.\n");
            } else {
                let table = Table::new(rows).with(Style::modern()).to_string();
                out.push_str(&table);
                out.push('\n');
            }
            out.push_str(&format!(
                "Subtotal (USD): {}\n\n",
                format_amount(fees.display_subtotal)
            ));
        }

        if let (Some(total), Some(currency)) = (rollup.total_original, &rollup.currency) {
            out.push_str(&format!("Total ({currency}):  {}\n", format_amount(total)));
        }
        out.push_str(&format!(
            "Total (USD):  {}\n",
            format_amount(rollup.display_total_usd())
        ));

        out
    }
}
