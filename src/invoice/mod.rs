mod fees;
mod model;

pub use fees::{humanize_fee_key, normalize_fees, FeeLineItem, FeeRecord, NormalizedFees, OtherFees};
pub use model::{ConsolidatedEnvelope, ConsolidatedInvoice, Invoice};
