use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// The backend's `other_fees` field arrives in one of four shapes depending
/// on the age of the record: absent, a bare number, a legacy key/value map,
/// or a list of structured fee records. The shape is classified once at
/// decode time; everything downstream dispatches on the variant.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum OtherFees {
    #[default]
    None,
    /// A single unitemized amount, already in USD.
    Amount(f64),
    /// Legacy map of fee key to amount (e.g. `{"landingFee": 50}`).
    Legacy(Vec<(String, f64)>),
    /// Structured fee records with optional currency conversion.
    Itemized(Vec<FeeRecord>),
}

/// One structured fee record as stored by the backend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeeRecord {
    pub name: String,
    pub amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount_usd: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl FeeRecord {
    /// A record is usable only with a string `name` and a numeric `amount`;
    /// anything else is dropped, never errored.
    fn from_value(value: &Value) -> Option<FeeRecord> {
        let map = value.as_object()?;
        let name = map.get("name")?.as_str()?.to_string();
        let amount = map.get("amount")?.as_f64()?;
        Some(FeeRecord {
            name,
            amount,
            currency: map.get("currency").and_then(Value::as_str).map(str::to_string),
            amount_usd: map.get("amount_usd").and_then(Value::as_f64),
            description: map
                .get("description")
                .and_then(Value::as_str)
                .map(str::to_string),
        })
    }
}

impl OtherFees {
    /// Classify a raw JSON value. Unrecognized shapes (strings, bools,
    /// nested non-numeric objects) collapse to `None` so a bad record can
    /// never fail a render.
    pub fn from_value(value: &Value) -> OtherFees {
        match value {
            Value::Null | Value::Bool(_) | Value::String(_) => OtherFees::None,
            Value::Number(n) => match n.as_f64() {
                Some(amount) if amount != 0.0 => OtherFees::Amount(amount),
                _ => OtherFees::None,
            },
            Value::Array(items) => {
                let records: Vec<FeeRecord> =
                    items.iter().filter_map(FeeRecord::from_value).collect();
                if records.is_empty() {
                    OtherFees::None
                } else {
                    OtherFees::Itemized(records)
                }
            }
            Value::Object(map) => {
                let entries: Vec<(String, f64)> = map
                    .iter()
                    .filter_map(|(key, value)| value.as_f64().map(|amount| (key.clone(), amount)))
                    .collect();
                if entries.is_empty() {
                    OtherFees::None
                } else {
                    OtherFees::Legacy(entries)
                }
            }
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, OtherFees::None)
    }
}

impl<'de> Deserialize<'de> for OtherFees {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(OtherFees::from_value(&value))
    }
}

impl Serialize for OtherFees {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            OtherFees::None => serializer.serialize_none(),
            OtherFees::Amount(amount) => serializer.serialize_f64(*amount),
            OtherFees::Legacy(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, amount) in entries {
                    map.serialize_entry(key, amount)?;
                }
                map.end()
            }
            OtherFees::Itemized(records) => {
                let mut seq = serializer.serialize_seq(Some(records.len()))?;
                for record in records {
                    seq.serialize_element(record)?;
                }
                seq.end()
            }
        }
    }
}

/// A displayable fee entry derived from whatever shape the backend sent.
/// Recomputed on every render; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeeLineItem {
    pub label: String,
    pub amount_usd: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Canonical view of an invoice's fees.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedFees {
    pub lines: Vec<FeeLineItem>,
    pub other_fees_total_usd: f64,
    pub display_subtotal: f64,
}

impl NormalizedFees {
    /// Lines for itemized display. A bare numeric fee carries no breakdown,
    /// so it surfaces as a single anonymous entry.
    pub fn display_lines(&self) -> Vec<FeeLineItem> {
        if !self.lines.is_empty() || self.other_fees_total_usd == 0.0 {
            return self.lines.clone();
        }
        vec![FeeLineItem {
            label: "Other Fees".to_string(),
            amount_usd: self.other_fees_total_usd,
            original_amount: None,
            original_currency: None,
            description: None,
        }]
    }
}

/// Convert the polymorphic fee field into canonical line items, a USD total,
/// and the subtotal to display. `declared_subtotal` wins when positive;
/// otherwise the subtotal is recomputed from the base fee plus the fee total,
/// because upstream sometimes stores an exact 0 when its own inputs were
/// incomplete. Amounts accumulate un-rounded; rounding happens at display.
pub fn normalize_fees(
    raw: &OtherFees,
    base_fee_amount: Option<f64>,
    declared_subtotal: Option<f64>,
) -> NormalizedFees {
    let (lines, other_fees_total_usd) = match raw {
        OtherFees::None => (Vec::new(), 0.0),
        OtherFees::Amount(amount) => (Vec::new(), *amount),
        OtherFees::Itemized(records) => {
            let lines: Vec<FeeLineItem> = records
                .iter()
                .map(|record| FeeLineItem {
                    label: record.name.clone(),
                    // No conversion path exists when amount_usd is absent:
                    // the raw amount is assumed to already be USD. Known
                    // data-quality gap for non-USD records without a rate.
                    amount_usd: record.amount_usd.unwrap_or(record.amount),
                    original_amount: Some(record.amount),
                    original_currency: record.currency.clone(),
                    description: record.description.clone(),
                })
                .collect();
            let total = lines.iter().map(|line| line.amount_usd).sum();
            (lines, total)
        }
        OtherFees::Legacy(entries) => {
            let lines: Vec<FeeLineItem> = entries
                .iter()
                .map(|(key, amount)| FeeLineItem {
                    label: humanize_fee_key(key),
                    amount_usd: *amount,
                    original_amount: None,
                    original_currency: None,
                    description: None,
                })
                .collect();
            let total = lines.iter().map(|line| line.amount_usd).sum();
            (lines, total)
        }
    };

    let display_subtotal = match declared_subtotal {
        Some(subtotal) if subtotal > 0.0 => subtotal,
        _ => base_fee_amount.unwrap_or(0.0) + other_fees_total_usd,
    };

    NormalizedFees {
        lines,
        other_fees_total_usd,
        display_subtotal,
    }
}

/// Derive a display label from a legacy fee key: snake_case and camelCase
/// tokens become space-separated Title Cased words ("landingFee" ->
/// "Landing Fee", "parking_fee" -> "Parking Fee").
pub fn humanize_fee_key(key: &str) -> String {
    let mut words: Vec<String> = Vec::new();
    for part in key.split(|c: char| c == '_' || c == '-' || c.is_whitespace()) {
        if part.is_empty() {
            continue;
        }
        let mut word = String::new();
        let mut prev_lower = false;
        for ch in part.chars() {
            if ch.is_uppercase() && prev_lower {
                words.push(std::mem::take(&mut word));
            }
            word.push(ch);
            prev_lower = ch.is_lowercase() || ch.is_numeric();
        }
        if !word.is_empty() {
            words.push(word);
        }
    }

    words
        .iter()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
