use tabled::{settings::Style, Table, Tabled};

use super::{append_total_footer, format_amount, format_date, Template};
use crate::invoice::{ConsolidatedInvoice, Invoice};

/// Baseline print layout with rounded tables. Serves as the fallback
/// renderer, so it assumes nothing beyond the fields every invoice carries.
pub struct StandardTemplate;

#[derive(Tabled)]
struct FlightRow {
    #[tabled(rename = "DATE")]
    date: String,
    #[tabled(rename = "CALLSIGN")]
    callsign: String,
    #[tabled(rename = "REG")]
    registration: String,
    #[tabled(rename = "AIRCRAFT")]
    aircraft: String,
    #[tabled(rename = "ROUTE")]
    route: String,
}

#[derive(Tabled)]
struct ChargeRow {
    #[tabled(rename = "#")]
    index: usize,
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
    #[tabled(rename = "FLIGHT")]
    flight: String,
    #[tabled(rename = "ROUTE")]
    route: String,
    #[tabled(rename = "TOTAL (USD)")]
    total: String,
}

fn or_dash(value: &Option<String>) -> String {
    value.clone().unwrap_or_else(|| "-".to_string())
}

impl Template for StandardTemplate {
    fn id(&self) -> &'static str {
        "1"
    }

    fn name(&self) -> &'static str {
        "Standard"
    }

    fn description(&self) -> &'static str {
        "Full print layout with flight details and charges"
    }

    fn render(&self, invoice: &Invoice) -> String {
        let fees = invoice.fees();
        let mut out = String::new();

        out.push_str(&format!("INVOICE {}\n", invoice.invoice_number));
        out.push_str(&format!(
            "Issued: {}    Due: {}",
            format_date(invoice.issued_date),
            format_date(invoice.due_date)
        ));
        if let Some(status) = &invoice.status {
            out.push_str(&format!("    Status: {}", status.to_uppercase()));
        }
        out.push_str("\n\n");

        if let Some(client) = &invoice.client_name {
            match &invoice.client_email {
                Some(email) => out.push_str(&format!("Bill To: {client} <{email}>\n")),
                None => out.push_str(&format!("Bill To: {client}\n")),
            }
        }
        if let Some(fir) = &invoice.fir_name {
            out.push_str(&format!("FIR:     {fir}\n"));
        }
        out.push('\n');

        let has_flight = invoice.callsign.is_some()
            || invoice.registration.is_some()
            || invoice.aircraft_type.is_some()
            || invoice.departure.is_some()
            || invoice.destination.is_some();
        if has_flight {
            let row = FlightRow {
                date: format_date(invoice.flight_date),
                callsign: or_dash(&invoice.callsign),
                registration: or_dash(&invoice.registration),
                aircraft: or_dash(&invoice.aircraft_type),
                route: invoice.route(),
            };
            let table = Table::new([row]).with(Style::rounded()).to_string();
            out.push_str(&table);
            out.push_str("\n\n");
        }

        let mut charges: Vec<ChargeRow> = Vec::new();
        if let Some(base) = invoice.fee_amount {
            charges.push(ChargeRow {
                index: 1,
                description: "Air Navigation Fee".to_string(),
                amount: format_amount(base),
            });
        }
        for line in fees.display_lines() {
            charges.push(ChargeRow {
                index: charges.len() + 1,
                description: line.label,
                amount: format_amount(line.amount_usd),
            });
        }

        if charges.is_empty() {
            out.push_str("No charges recorded.\n");
        } else {
            let table = Table::new(charges).with(Style::rounded()).to_string();
            out.push_str(&table);
            out.push('\n');
        }

        out.push_str(&format!(
            "\nSubtotal (USD):  {}\n",
            format_amount(fees.display_subtotal)
        ));
        if let (Some(total), Some(currency)) = (invoice.total_original, &invoice.currency) {
            match invoice.fx_rate {
                Some(rate) => out.push_str(&format!(
                    "Total ({currency}):     {}  (1 USD = {rate} {currency})\n",
                    format_amount(total)
                )),
                None => out.push_str(&format!(
                    "Total ({currency}):     {}\n",
                    format_amount(total)
                )),
            }
        }

        if let Some(notes) = &invoice.notes {
            out.push_str(&format!("\nNotes: {notes}\n"));
        }

        out
    }

    fn render_consolidated(&self, rollup: &ConsolidatedInvoice) -> String {
        let mut out = String::new();

        out.push_str(&format!("CONSOLIDATED INVOICE {}\n", rollup.invoice_number));
        if let Some(client) = &rollup.client_name {
            out.push_str(&format!("Client: {client}\n"));
        }
        out.push_str(&format!(
            "Period: {} to {}\n\n",
            format_date(rollup.period_start),
            format_date(rollup.period_end)
        ));

        if rollup.invoices.is_empty() {
            out.push_str("No invoices in this billing period.\n");
            return out;
        }

        let rows: Vec<MemberRow> = rollup
            .invoices
            .iter()
            .map(|invoice| MemberRow {
                number: invoice.invoice_number.clone(),
                date: format_date(invoice.flight_date),
                flight: or_dash(&invoice.callsign),
                route: invoice.route(),
                total: format_amount(invoice.fees().display_subtotal),
            })
            .collect();

        let table = Table::new(rows).with(Style::rounded()).to_string();

        let mut footer: Vec<(&str, String)> = Vec::new();
        if let (Some(total), Some(currency)) = (rollup.total_original, &rollup.currency) {
            footer.push(("TOTAL", format!("{} {}", format_amount(total), currency)));
        }
        footer.push(("TOTAL (USD)", format_amount(rollup.display_total_usd())));

        out.push_str(&append_total_footer(&table, &footer));
        out.push('\n');

        out
    }
}
