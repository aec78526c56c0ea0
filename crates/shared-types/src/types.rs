use serde::{Deserialize, Serialize};

/// Identity block for one contracting party.
///
/// Party A is the provider, party B the client. Both use the same shape.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyInfo {
    pub name: String,
    pub tax_id: String,
    pub address: String,
    pub phone: String,
    pub representative: String,
    pub position: String,
    pub bank_name: String,
    pub bank_account: String,
}

/// One priced line of the service schedule. `total == qty * rate`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LineItem {
    pub description: String,
    pub qty: i64,
    pub rate: i64, // VND per unit
    pub total: i64,
}

impl LineItem {
    pub fn new(description: impl Into<String>, qty: i64, rate: i64) -> Self {
        Self {
            description: description.into(),
            qty,
            rate,
            total: qty.saturating_mul(rate),
        }
    }
}

/// One installment of the payment schedule
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentPhase {
    pub phase_name: String,
    pub amount: i64,
    pub due_date: String,
    pub conditions: String,
}

/// Ground-truth record for one synthetic contract.
///
/// This is the `VARS_JSON` payload handed to the text generator, so the
/// field names serialize in camelCase. All amounts are whole VND.
///
/// Invariants (held by the generator and restored by reconciliation):
/// - `total_amount == items.iter().map(|i| i.total).sum()`
/// - `payment_phases.iter().map(|p| p.amount).sum() == total_amount`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractData {
    pub contract_date: String,
    pub contract_number: String,
    pub party_a: CompanyInfo,
    pub party_b: CompanyInfo,
    pub items: Vec<LineItem>,
    pub total_amount: i64,
    pub vat_rate: i64,
    pub payment_phases: Vec<PaymentPhase>,
}

impl ContractData {
    /// Sum of the line-item totals, clamped to the `i64` range
    pub fn items_total(&self) -> i64 {
        saturating_sum(self.items.iter().map(|item| item.total))
    }

    /// Sum of the payment-phase amounts, clamped to the `i64` range
    pub fn phases_total(&self) -> i64 {
        saturating_sum(self.payment_phases.iter().map(|phase| phase.amount))
    }

    /// VAT owed on the whole contract, rounded half away from zero
    pub fn vat_amount(&self) -> i64 {
        percent_of(self.total_amount, self.vat_rate)
    }

    /// Contract value including VAT
    pub fn total_with_vat(&self) -> i64 {
        self.total_amount.saturating_add(self.vat_amount())
    }
}

/// Sum that clamps at `i64::MIN` / `i64::MAX` instead of overflowing
pub fn saturating_sum(values: impl IntoIterator<Item = i64>) -> i64 {
    values.into_iter().fold(0i64, |acc, value| acc.saturating_add(value))
}

/// `round(amount * rate / 100)` on integers
pub fn percent_of(amount: i64, rate: i64) -> i64 {
    ((amount as f64) * (rate as f64) / 100.0).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> ContractData {
        ContractData {
            contract_date: "ngày 5 tháng 3 năm 2025".to_string(),
            contract_number: "2025/3/HĐDV-EON".to_string(),
            items: vec![
                LineItem::new("Dịch vụ A", 2, 1_500_000),
                LineItem::new("Dịch vụ B", 1, 4_000_000),
            ],
            total_amount: 7_000_000,
            vat_rate: 10,
            ..Default::default()
        }
    }

    #[test]
    fn test_line_item_total() {
        let item = LineItem::new("x", 3, 2_000_000);
        assert_eq!(item.total, 6_000_000);
    }

    #[test]
    fn test_vat_helpers() {
        let data = sample();
        assert_eq!(data.items_total(), 7_000_000);
        assert_eq!(data.vat_amount(), 700_000);
        assert_eq!(data.total_with_vat(), 7_700_000);
    }

    #[test]
    fn test_percent_rounds() {
        assert_eq!(percent_of(15, 10), 2);
        assert_eq!(percent_of(14, 10), 1);
    }

    #[test]
    fn test_totals_clamp_instead_of_overflowing() {
        let data = ContractData {
            items: vec![LineItem::new("a", i64::MAX, 2), LineItem::new("b", 1, 1)],
            payment_phases: vec![
                PaymentPhase {
                    amount: i64::MIN,
                    ..Default::default()
                },
                PaymentPhase {
                    amount: -1,
                    ..Default::default()
                },
            ],
            total_amount: i64::MAX,
            vat_rate: 10,
            ..Default::default()
        };
        assert_eq!(data.items[0].total, i64::MAX);
        assert_eq!(data.items_total(), i64::MAX);
        assert_eq!(data.phases_total(), i64::MIN);
        assert_eq!(data.total_with_vat(), i64::MAX);
    }

    #[test]
    fn test_camel_case_json() {
        let json = serde_json::to_value(sample()).unwrap();
        assert!(json.get("contractNumber").is_some());
        assert!(json.get("paymentPhases").is_some());
        assert_eq!(json["partyA"]["taxId"], "");
        assert_eq!(json["items"][0]["qty"], 2);
    }
}
