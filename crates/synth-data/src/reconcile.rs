//! Reconciliation of contract data that did not come from the generator
//!
//! External producers (a language model, a hand-edited fixture) do not
//! guarantee the arithmetic invariants of [`ContractData`]. Every record
//! accepted from outside passes through [`reconcile`], which re-derives the
//! totals and lets the final payment phase absorb any drift. Arithmetic on
//! untrusted amounts saturates at the `i64` bounds.

use crate::error::SynthError;
use serde_json::Value;
use shared_types::{CompanyInfo, ContractData, LineItem, PaymentPhase};
use tracing::{debug, warn};

/// Largest phase-sum drift (VND) left untouched
pub const DEFAULT_TOLERANCE: i64 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileOptions {
    /// Absolute difference between the phase sum and the item sum that is
    /// still accepted without adjusting the final phase
    pub tolerance: i64,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

/// Restore the sum invariants of `data`.
///
/// - an item with a zero total gets `qty * rate`
/// - `total_amount` becomes the sum of item totals, whatever was supplied
/// - when the phase sum differs from that total by more than the tolerance,
///   the last phase is shifted by the difference
///
/// Empty `items` or `payment_phases` are valid and simply sum to zero.
pub fn reconcile(mut data: ContractData, options: &ReconcileOptions) -> ContractData {
    for item in &mut data.items {
        if item.total == 0 {
            item.total = item.qty.saturating_mul(item.rate);
        }
    }

    let items_total = data.items_total();
    if data.total_amount != items_total {
        debug!(
            supplied = data.total_amount,
            derived = items_total,
            "replacing supplied total amount"
        );
    }
    data.total_amount = items_total;

    let phases_total = data.phases_total();
    let drift = items_total.saturating_sub(phases_total);
    if drift.saturating_abs() > options.tolerance {
        if let Some(last) = data.payment_phases.last_mut() {
            warn!(
                phases_total,
                items_total,
                phase = %last.phase_name,
                "payment phases disagree with item total, adjusting last phase"
            );
            last.amount = last.amount.saturating_add(drift);
        }
    }

    data
}

/// Decode untrusted contract JSON leniently, then [`reconcile`] it.
///
/// Missing fields default to empty. Amounts may be JSON integers, floats
/// (rounded) or strings with thousands separators (`"1.500.000"`). String
/// amounts are whole VND: a fractional part is dropped (`"1.500.000,50"`
/// reads as `1500000`).
pub fn parse_external(json: &str, options: &ReconcileOptions) -> Result<ContractData, SynthError> {
    let value: Value = serde_json::from_str(json)?;
    parse_external_value(&value, options)
}

/// [`parse_external`] for JSON that is already decoded
pub fn parse_external_value(
    value: &Value,
    options: &ReconcileOptions,
) -> Result<ContractData, SynthError> {
    let data = contract_from_value(value)?;
    Ok(reconcile(data, options))
}

fn contract_from_value(value: &Value) -> Result<ContractData, SynthError> {
    if !value.is_object() {
        return Err(SynthError::NotAnObject(kind(value)));
    }
    let field = |name: &str| &value[name];

    let items = field("items")
        .as_array()
        .map(|items| items.iter().map(item_from_value).collect())
        .unwrap_or_default();
    let payment_phases = field("paymentPhases")
        .as_array()
        .map(|phases| phases.iter().map(phase_from_value).collect())
        .unwrap_or_default();

    Ok(ContractData {
        contract_date: text(field("contractDate")),
        contract_number: text(field("contractNumber")),
        party_a: company_from_value(field("partyA")),
        party_b: company_from_value(field("partyB")),
        items,
        total_amount: amount(field("totalAmount")).unwrap_or_default(),
        vat_rate: amount(field("vatRate")).unwrap_or_default(),
        payment_phases,
    })
}

fn item_from_value(value: &Value) -> LineItem {
    let qty = amount(&value["qty"]).unwrap_or_default();
    let rate = amount(&value["rate"]).unwrap_or_default();
    LineItem {
        description: text(&value["description"]),
        qty,
        rate,
        total: amount(&value["total"]).unwrap_or_default(),
    }
}

fn phase_from_value(value: &Value) -> PaymentPhase {
    PaymentPhase {
        phase_name: text(&value["phaseName"]),
        amount: amount(&value["amount"]).unwrap_or_default(),
        due_date: text(&value["dueDate"]),
        conditions: text(&value["conditions"]),
    }
}

fn company_from_value(value: &Value) -> CompanyInfo {
    CompanyInfo {
        name: text(&value["name"]),
        tax_id: text(&value["taxId"]),
        address: text(&value["address"]),
        phone: text(&value["phone"]),
        representative: text(&value["representative"]),
        position: text(&value["position"]),
        bank_name: text(&value["bankName"]),
        bank_account: text(&value["bankAccount"]),
    }
}

fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}

fn amount(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.round() as i64)),
        Value::String(s) => amount_from_text(s),
        _ => None,
    }
}

/// Integer part of a textual amount.
///
/// `.` and `,` group thousands when exactly three digits follow them;
/// any other separator starts the fraction, which is dropped.
fn amount_from_text(s: &str) -> Option<i64> {
    let negative = s.trim_start().starts_with('-');
    let chars: Vec<char> = s.chars().collect();
    let mut parsed: Option<i64> = None;

    for (i, &ch) in chars.iter().enumerate() {
        if let Some(digit) = ch.to_digit(10) {
            let acc = parsed.unwrap_or(0);
            parsed = Some(acc.saturating_mul(10).saturating_add(i64::from(digit)));
        } else if matches!(ch, '.' | ',')
            && parsed.is_some()
            && !groups_thousands(&chars[i + 1..])
        {
            break;
        }
    }

    parsed.map(|value| if negative { -value } else { value })
}

fn groups_thousands(rest: &[char]) -> bool {
    rest.iter().take_while(|ch| ch.is_ascii_digit()).count() == 3
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn phase(amount: i64) -> PaymentPhase {
        PaymentPhase {
            phase_name: format!("P{amount}"),
            amount,
            ..Default::default()
        }
    }

    fn data(items: Vec<LineItem>, phases: Vec<i64>) -> ContractData {
        ContractData {
            items,
            total_amount: 1,
            payment_phases: phases.into_iter().map(phase).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_total_is_rederived() {
        let out = reconcile(
            data(vec![LineItem::new("a", 2, 500), LineItem::new("b", 1, 3000)], vec![]),
            &ReconcileOptions::default(),
        );
        assert_eq!(out.total_amount, 4000);
    }

    #[test]
    fn test_missing_item_total_uses_qty_times_rate() {
        let mut item = LineItem::new("a", 3, 1000);
        item.total = 0;
        let out = reconcile(data(vec![item], vec![3000]), &ReconcileOptions::default());
        assert_eq!(out.items[0].total, 3000);
        assert_eq!(out.total_amount, 3000);
    }

    #[test]
    fn test_large_drift_moves_last_phase() {
        let out = reconcile(
            data(vec![LineItem::new("a", 1, 100_000)], vec![40_000, 40_000]),
            &ReconcileOptions::default(),
        );
        assert_eq!(out.payment_phases[0].amount, 40_000);
        assert_eq!(out.payment_phases[1].amount, 60_000);
        assert_eq!(out.phases_total(), out.total_amount);
    }

    #[test]
    fn test_drift_within_tolerance_is_kept() {
        let out = reconcile(
            data(vec![LineItem::new("a", 1, 100_000)], vec![50_000, 49_000]),
            &ReconcileOptions::default(),
        );
        assert_eq!(out.payment_phases[1].amount, 49_000);
    }

    #[test]
    fn test_tolerance_is_configurable() {
        let out = reconcile(
            data(vec![LineItem::new("a", 1, 100_000)], vec![50_000, 49_000]),
            &ReconcileOptions { tolerance: 0 },
        );
        assert_eq!(out.payment_phases[1].amount, 50_000);
    }

    #[test]
    fn test_empty_collections_reconcile_to_zero() {
        let out = reconcile(ContractData::default(), &ReconcileOptions::default());
        assert_eq!(out.total_amount, 0);
        assert!(out.payment_phases.is_empty());
    }

    #[test]
    fn test_parse_external_is_lenient() {
        let json = r#"{
            "contractNumber": "2025/4/HĐDV-SOFT",
            "partyA": { "name": "CÔNG TY A", "taxId": 123 },
            "items": [
                { "description": "x", "qty": 2, "rate": 1500000.0 },
                { "description": "y", "qty": "1", "rate": "2.000.000", "total": "2.000.000" }
            ],
            "totalAmount": 999,
            "vatRate": 10,
            "paymentPhases": [ { "phaseName": "Đợt 1", "amount": 1000000 } ]
        }"#;
        let data = parse_external(json, &ReconcileOptions::default()).unwrap();
        assert_eq!(data.items[0].total, 3_000_000);
        assert_eq!(data.items[1].total, 2_000_000);
        assert_eq!(data.total_amount, 5_000_000);
        assert_eq!(data.payment_phases[0].amount, 5_000_000);
        assert_eq!(data.party_a.tax_id, "123");
        assert_eq!(data.party_b, CompanyInfo::default());
    }

    #[test]
    fn test_parse_external_without_items_or_phases() {
        let data = parse_external(r#"{"contractNumber": "X"}"#, &ReconcileOptions::default())
            .unwrap();
        assert!(data.items.is_empty());
        assert!(data.payment_phases.is_empty());
        assert_eq!(data.total_amount, 0);
    }

    #[test]
    fn test_huge_amounts_saturate() {
        let json = r#"{"items":[{"qty":9000000000000000000,"rate":10}],"paymentPhases":[{"amount":1}]}"#;
        let data = parse_external(json, &ReconcileOptions::default()).unwrap();
        assert_eq!(data.items[0].total, i64::MAX);
        assert_eq!(data.total_amount, i64::MAX);
        assert_eq!(data.payment_phases[0].amount, i64::MAX);
        assert_eq!(data.total_with_vat(), i64::MAX);
    }

    #[test]
    fn test_drift_against_negative_phases_saturates() {
        let out = reconcile(
            data(vec![LineItem::new("a", 1, i64::MAX)], vec![i64::MIN, -5]),
            &ReconcileOptions::default(),
        );
        assert_eq!(out.total_amount, i64::MAX);
        assert_eq!(out.payment_phases[1].amount, i64::MAX - 5);
    }

    #[test]
    fn test_string_amounts_drop_the_fraction() {
        assert_eq!(amount_from_text("1.500.000,50"), Some(1_500_000));
        assert_eq!(amount_from_text("1,500,000.75"), Some(1_500_000));
        assert_eq!(amount_from_text("1.5"), Some(1));
        assert_eq!(amount_from_text("2.000.000 VNĐ"), Some(2_000_000));
        assert_eq!(amount_from_text("-45.000"), Some(-45_000));
        assert_eq!(amount_from_text("không rõ"), None);
    }

    #[test]
    fn test_parse_external_rejects_non_objects() {
        assert!(matches!(
            parse_external("[1, 2]", &ReconcileOptions::default()),
            Err(SynthError::NotAnObject("an array"))
        ));
        assert!(matches!(
            parse_external("{ nope", &ReconcileOptions::default()),
            Err(SynthError::InvalidJson(_))
        ));
    }
}
