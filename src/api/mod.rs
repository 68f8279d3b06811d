use std::time::Duration;

use ureq::{Agent, Body};

use crate::error::{BillingError, Result};
use crate::invoice::{ConsolidatedEnvelope, ConsolidatedInvoice, Invoice};

/// Thin client for the billing backend. One agent, one global timeout,
/// plain status codes so error bodies stay readable.
pub struct ApiClient {
    agent: Agent,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout_secs: u64) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(timeout_secs)))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn fetch_invoice(&self, id: u64) -> Result<Invoice> {
        let body = self.get_string(&format!("/api/invoices/{id}"))?;
        Ok(serde_json::from_str(&body)?)
    }

    pub fn fetch_consolidated(&self, id: u64) -> Result<ConsolidatedInvoice> {
        let body = self.get_string(&format!("/api/invoices/consolidated/{id}"))?;
        let envelope: ConsolidatedEnvelope = serde_json::from_str(&body)?;
        Ok(envelope.data)
    }

    pub fn download_invoice_pdf(&self, id: u64) -> Result<Vec<u8>> {
        self.get_bytes(&format!("/api/invoices/{id}/pdf"))
    }

    pub fn download_consolidated_pdf(&self, id: u64) -> Result<Vec<u8>> {
        self.get_bytes(&format!("/api/invoices/consolidated/{id}/pdf"))
    }

    fn get_string(&self, path: &str) -> Result<String> {
        let url = format!("{}{}", self.base_url, path);
        let mut response = self.agent.get(url.as_str()).call()?;
        let status = response.status();
        if !status.is_success() {
            return Err(error_from_body(status.as_u16(), response.body_mut()));
        }
        Ok(response.body_mut().read_to_string()?)
    }

    fn get_bytes(&self, path: &str) -> Result<Vec<u8>> {
        let url = format!("{}{}", self.base_url, path);
        let mut response = self.agent.get(url.as_str()).call()?;
        let status = response.status();
        if !status.is_success() {
            return Err(error_from_body(status.as_u16(), response.body_mut()));
        }
        Ok(response.body_mut().read_to_vec()?)
    }
}

/// Non-2xx responses carry a JSON `{ "message": ... }` body; surface that
/// text verbatim, falling back to the bare status when the body is anything
/// else.
fn error_from_body(status: u16, body: &mut Body) -> BillingError {
    let message = body
        .read_to_string()
        .ok()
        .and_then(|text| serde_json::from_str::<serde_json::Value>(&text).ok())
        .and_then(|json| json["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| format!("HTTP {status}"));

    BillingError::Api { status, message }
}
