use tracing::info;

use crate::applications::store::ApplicationStore;
use crate::models::ApplicationRecord;

use super::{DATE_FORMAT, HEADER};

/// Serializes the whole store as UTF-8 CSV, one row per record in id order.
pub fn encode(store: &ApplicationStore) -> Vec<u8> {
    let records = store.snapshot();
    info!("Exporting {} application record(s)", records.len());
    encode_records(&records).into_bytes()
}

/// Renders `records` under the header line. Rows are emitted in ascending id
/// order regardless of the input order, each terminated by `\n`.
pub fn encode_records(records: &[ApplicationRecord]) -> String {
    let mut sorted: Vec<&ApplicationRecord> = records.iter().collect();
    sorted.sort_by_key(|r| r.id);

    let mut out = String::with_capacity(HEADER.len() + 1 + records.len() * 64);
    out.push_str(HEADER);
    out.push('\n');

    for r in sorted {
        out.push_str(&format!(
            "{},{},{},{},{},{},{}\n",
            r.id,
            escape_field(&r.company),
            escape_field(&r.role),
            r.status,
            r.applied_on.format(DATE_FORMAT),
            escape_field(r.notes.as_deref().unwrap_or("")),
            r.last_update
                .map(|d| d.format(DATE_FORMAT).to_string())
                .unwrap_or_default(),
        ));
    }
    out
}

/// Quotes a value containing a comma, line break or double quote, doubling
/// any embedded quotes. Other values pass through untouched.
pub fn escape_field(value: &str) -> String {
    if value.contains([',', '\n', '\r', '"']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
