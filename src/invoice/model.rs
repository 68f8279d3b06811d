use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::fees::{normalize_fees, NormalizedFees, OtherFees};

/// A single flight's billing record as served by the backend. The upstream
/// JSON is loosely typed; everything beyond the id and number is optional.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Invoice {
    pub id: u64,
    pub invoice_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callsign: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aircraft_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub departure: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flight_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fir_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mtow_kg: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    /// Base air navigation fee. Summed directly into the USD subtotal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee_amount: Option<f64>,
    #[serde(default, skip_serializing_if = "OtherFees::is_none")]
    pub other_fees: OtherFees,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_original: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fx_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_usd: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issued_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Invoice {
    /// Normalized fee view for display. Recomputed per render from the raw
    /// field; the stored USD total acts as the declared subtotal.
    pub fn fees(&self) -> NormalizedFees {
        normalize_fees(&self.other_fees, self.fee_amount, self.total_usd)
    }

    /// "FZAA → FAOR", with either side blank when unknown.
    pub fn route(&self) -> String {
        match (&self.departure, &self.destination) {
            (Some(dep), Some(dest)) => format!("{dep} → {dest}"),
            (Some(dep), None) => format!("{dep} →"),
            (None, Some(dest)) => format!("→ {dest}"),
            (None, None) => String::new(),
        }
    }
}

/// A billing-period rollup grouping multiple invoices for one client.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConsolidatedInvoice {
    pub id: u64,
    pub invoice_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period_start: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period_end: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fx_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_original: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_usd: Option<f64>,
    #[serde(default)]
    pub invoices: Vec<Invoice>,
}

impl ConsolidatedInvoice {
    /// Declared USD total when positive, else the sum of member subtotals.
    /// Same policy as the per-invoice display subtotal: upstream sometimes
    /// stores an exact 0 when its inputs were incomplete.
    pub fn display_total_usd(&self) -> f64 {
        match self.total_usd {
            Some(total) if total > 0.0 => total,
            _ => self
                .invoices
                .iter()
                .map(|invoice| invoice.fees().display_subtotal)
                .sum(),
        }
    }
}

/// Envelope the consolidated endpoint wraps its payload in.
#[derive(Debug, Deserialize)]
pub struct ConsolidatedEnvelope {
    pub data: ConsolidatedInvoice,
}
