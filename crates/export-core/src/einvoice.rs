//! Mapping contracts to e-invoices
//!
//! Four generation modes decide how invoice lines point back at their
//! source documents:
//!
//! - `C1`: one contract, optionally one invoice per payment phase or per item
//! - `C2`: several contracts consolidated into one invoice
//! - `C3`: invoice issued against a contract addendum (`PL-<contract>`)
//! - `C4`: one invoice per agreement
//!
//! Every line carries VAT at `round(amount * rate / 100)` and the summary is
//! recomputed from the lines, so `total_payable == Σ line totals` always holds.

use crate::error::{ExportError, UnknownInvoiceMode};
use crate::words::amount_in_words;
use serde::{Deserialize, Serialize};
use shared_types::types::{percent_of, saturating_sum};
use shared_types::{CompanyInfo, ContractData, LineItem};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

pub const DEFAULT_SERIES: &str = "AA/26E";
pub const DEFAULT_TEMPLATE_CODE: &str = "01GTKT0";
const UNIT: &str = "Package";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InvoiceMode {
    #[default]
    C1,
    C2,
    C3,
    C4,
}

impl fmt::Display for InvoiceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            InvoiceMode::C1 => "C1",
            InvoiceMode::C2 => "C2",
            InvoiceMode::C3 => "C3",
            InvoiceMode::C4 => "C4",
        };
        f.write_str(code)
    }
}

impl FromStr for InvoiceMode {
    type Err = UnknownInvoiceMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "C1" => Ok(InvoiceMode::C1),
            "C2" => Ok(InvoiceMode::C2),
            "C3" => Ok(InvoiceMode::C3),
            "C4" => Ok(InvoiceMode::C4),
            _ => Err(UnknownInvoiceMode(s.to_string())),
        }
    }
}

/// Which document references are written into item names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceConfig {
    pub include_contract_no: bool,
    pub include_addendum_no: bool,
    pub custom_tokens: Vec<String>,
}

impl Default for ReferenceConfig {
    fn default() -> Self {
        Self {
            include_contract_no: true,
            include_addendum_no: false,
            custom_tokens: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvoiceConfig {
    pub series: String,
    pub template_code: String,
    pub currency: String,
    /// Overrides the contract's VAT rate when set
    pub vat_rate: Option<i64>,
    pub mode: InvoiceMode,
    pub reference: ReferenceConfig,
    /// Split the lines into invoices of at most this many items
    pub items_per_invoice: Option<usize>,
    /// C1: one invoice per payment phase
    pub per_phase: bool,
    /// C1: one invoice per line item
    pub per_item: bool,
    /// Phase indexes for `per_phase`; all phases when `None`
    pub selected_phases: Option<Vec<usize>>,
    /// C2: merge lines with the same description
    pub group_by_service_type: bool,
    pub include_audit_trail: bool,
}

impl Default for InvoiceConfig {
    fn default() -> Self {
        Self {
            series: DEFAULT_SERIES.to_string(),
            template_code: DEFAULT_TEMPLATE_CODE.to_string(),
            currency: "VND".to_string(),
            vat_rate: None,
            mode: InvoiceMode::C1,
            reference: ReferenceConfig::default(),
            items_per_invoice: None,
            per_phase: false,
            per_item: false,
            selected_phases: None,
            group_by_service_type: false,
            include_audit_trail: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceItem {
    pub name: String,
    pub unit: String,
    pub quantity: i64,
    pub unit_price: i64,
    pub amount: i64,
    pub vat_rate: i64,
    pub vat_amount: i64,
    pub total: i64,
}

impl InvoiceItem {
    pub fn new(name: String, quantity: i64, unit_price: i64, amount: i64, vat_rate: i64) -> Self {
        let vat_amount = percent_of(amount, vat_rate);
        Self {
            name,
            unit: UNIT.to_string(),
            quantity,
            unit_price,
            amount,
            vat_rate,
            vat_amount,
            total: amount.saturating_add(vat_amount),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceSummary {
    #[serde(rename = "totalBeforeVAT")]
    pub total_before_vat: i64,
    #[serde(rename = "totalVAT")]
    pub total_vat: i64,
    pub total_payable: i64,
    pub amount_in_words: String,
}

impl InvoiceSummary {
    pub fn of(items: &[InvoiceItem]) -> Self {
        let total_before_vat = saturating_sum(items.iter().map(|item| item.amount));
        let total_vat = saturating_sum(items.iter().map(|item| item.vat_amount));
        let total_payable = total_before_vat.saturating_add(total_vat);
        Self {
            total_before_vat,
            total_vat,
            total_payable,
            amount_in_words: amount_in_words(total_payable),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditTrail {
    pub contract_numbers: Vec<String>,
    pub phase_names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EInvoiceData {
    pub invoice_number: String,
    pub invoice_date: String,
    pub seller: CompanyInfo,
    pub buyer: CompanyInfo,
    pub items: Vec<InvoiceItem>,
    pub summary: InvoiceSummary,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ref_tokens: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub linked_contract_doc_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub linked_agreement_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audit_trail: Option<AuditTrail>,
}

/// 1-based, zero-padded to seven digits
pub fn invoice_number(index: usize) -> String {
    format!("{:07}", index + 1)
}

/// Document references written into item names
pub fn ref_tokens(contract: &ContractData, reference: &ReferenceConfig) -> Vec<String> {
    let mut tokens = Vec::new();
    if reference.include_contract_no && !contract.contract_number.is_empty() {
        tokens.push(contract.contract_number.clone());
    }
    if reference.include_addendum_no && !contract.contract_number.is_empty() {
        tokens.push(format!("PL-{}", contract.contract_number));
    }
    tokens.extend(
        reference
            .custom_tokens
            .iter()
            .map(|token| token.trim())
            .filter(|token| !token.is_empty())
            .map(str::to_string),
    );
    tokens
}

fn item_name(description: &str, tokens: &[String], mode: InvoiceMode, phase: Option<&str>) -> String {
    if tokens.is_empty() {
        return match phase {
            Some(phase) => format!("{phase} {description}"),
            None => description.to_string(),
        };
    }
    let refs = tokens.join(", ");
    match (mode, phase) {
        (InvoiceMode::C1, Some(phase)) => format!("{phase} {description} theo {refs}"),
        (InvoiceMode::C2 | InvoiceMode::C3, _) if tokens.len() > 1 => {
            format!("{description} ({refs})")
        }
        _ => format!("{description} theo {refs}"),
    }
}

/// Invoices for one contract, numbered from `0000001`
pub fn generate_invoices(
    contract: &ContractData,
    config: &InvoiceConfig,
) -> Result<Vec<EInvoiceData>, ExportError> {
    if contract.items.is_empty() {
        return Err(ExportError::EmptyInvoice(contract.contract_number.clone()));
    }
    let vat_rate = config.vat_rate.unwrap_or(contract.vat_rate);
    let tokens = ref_tokens(contract, &config.reference);
    let line = |item: &LineItem| {
        InvoiceItem::new(
            item_name(&item.description, &tokens, config.mode, None),
            item.qty,
            item.rate,
            item.total,
            vat_rate,
        )
    };

    let invoices = if config.mode == InvoiceMode::C1 && config.per_phase {
        phase_invoices(contract, config, &tokens, vat_rate)?
    } else if config.mode == InvoiceMode::C1 && config.per_item {
        contract
            .items
            .iter()
            .enumerate()
            .map(|(index, item)| build(contract, config, index, vec![line(item)], &tokens, Vec::new()))
            .collect()
    } else if let Some(size) = config.items_per_invoice.filter(|&size| size > 0) {
        contract
            .items
            .chunks(size)
            .enumerate()
            .map(|(index, chunk)| {
                let lines = chunk.iter().map(&line).collect();
                build(contract, config, index, lines, &tokens, Vec::new())
            })
            .collect()
    } else {
        let lines = if config.mode == InvoiceMode::C2 && config.group_by_service_type {
            group_by_description(contract.items.iter().map(&line))
        } else {
            contract.items.iter().map(&line).collect()
        };
        vec![build(contract, config, 0, lines, &tokens, Vec::new())]
    };

    debug!(
        contract = %contract.contract_number,
        mode = %config.mode,
        invoices = invoices.len(),
        "generated e-invoices"
    );
    Ok(invoices)
}

/// One invoice per selected payment phase, priced at the phase amount
fn phase_invoices(
    contract: &ContractData,
    config: &InvoiceConfig,
    tokens: &[String],
    vat_rate: i64,
) -> Result<Vec<EInvoiceData>, ExportError> {
    let selected: Vec<usize> = match &config.selected_phases {
        Some(indexes) => indexes.clone(),
        None => (0..contract.payment_phases.len()).collect(),
    };

    let invoices: Vec<EInvoiceData> = selected
        .iter()
        .filter_map(|&index| {
            let phase = contract.payment_phases.get(index)?;
            // phases beyond the item list describe the first item
            let item = contract.items.get(index).or(contract.items.first())?;
            Some((phase, item))
        })
        .enumerate()
        .map(|(number, (phase, item))| {
            let name = item_name(&item.description, tokens, config.mode, Some(&phase.phase_name));
            let line = InvoiceItem::new(name, 1, phase.amount, phase.amount, vat_rate);
            build(
                contract,
                config,
                number,
                vec![line],
                tokens,
                vec![phase.phase_name.clone()],
            )
        })
        .collect();

    if invoices.is_empty() {
        return Err(ExportError::EmptyInvoice(contract.contract_number.clone()));
    }
    Ok(invoices)
}

/// Merge lines with identical names, summing quantities and amounts
fn group_by_description(lines: impl Iterator<Item = InvoiceItem>) -> Vec<InvoiceItem> {
    let mut grouped: Vec<InvoiceItem> = Vec::new();
    for line in lines {
        match grouped.iter_mut().find(|existing| existing.name == line.name) {
            Some(existing) => {
                let quantity = existing.quantity.saturating_add(line.quantity);
                let amount = existing.amount.saturating_add(line.amount);
                let unit_price = if quantity == 0 { 0 } else { amount / quantity };
                *existing = InvoiceItem::new(line.name, quantity, unit_price, amount, line.vat_rate);
            }
            None => grouped.push(line),
        }
    }
    grouped
}

fn build(
    contract: &ContractData,
    config: &InvoiceConfig,
    index: usize,
    items: Vec<InvoiceItem>,
    tokens: &[String],
    phase_names: Vec<String>,
) -> EInvoiceData {
    let number = contract.contract_number.clone();
    let (linked_contract_doc_ids, linked_agreement_ids) = match config.mode {
        InvoiceMode::C1 => (Vec::new(), Vec::new()),
        InvoiceMode::C2 => (vec![number.clone()], Vec::new()),
        InvoiceMode::C3 | InvoiceMode::C4 => (Vec::new(), vec![number.clone()]),
    };
    let audit_trail = config.include_audit_trail.then(|| AuditTrail {
        contract_numbers: vec![number],
        phase_names,
    });

    EInvoiceData {
        invoice_number: invoice_number(index),
        invoice_date: contract.contract_date.clone(),
        seller: contract.party_a.clone(),
        buyer: contract.party_b.clone(),
        summary: InvoiceSummary::of(&items),
        items,
        ref_tokens: tokens.to_vec(),
        linked_contract_doc_ids,
        linked_agreement_ids,
        audit_trail,
    }
}

/// C2 across contracts: every contract's lines on one invoice.
///
/// Seller, buyer and date come from the first contract.
pub fn consolidate(
    contracts: &[ContractData],
    config: &InvoiceConfig,
) -> Result<EInvoiceData, ExportError> {
    let Some(first) = contracts.first() else {
        return Err(ExportError::EmptyInvoice(String::new()));
    };
    let single = InvoiceConfig {
        mode: InvoiceMode::C2,
        items_per_invoice: None,
        ..config.clone()
    };

    let mut merged = Vec::new();
    for contract in contracts {
        merged.extend(generate_invoices(contract, &single)?);
    }

    let lines = merged.iter().flat_map(|invoice| invoice.items.iter().cloned());
    let items: Vec<InvoiceItem> = if config.group_by_service_type {
        group_by_description(lines)
    } else {
        lines.collect()
    };
    let ref_tokens = merged.iter().flat_map(|invoice| invoice.ref_tokens.clone()).collect();
    let linked_contract_doc_ids = contracts
        .iter()
        .map(|contract| contract.contract_number.clone())
        .collect::<Vec<_>>();
    let audit_trail = config.include_audit_trail.then(|| AuditTrail {
        contract_numbers: linked_contract_doc_ids.clone(),
        phase_names: Vec::new(),
    });

    debug!(contracts = contracts.len(), lines = items.len(), "consolidated e-invoice");

    Ok(EInvoiceData {
        invoice_number: invoice_number(0),
        invoice_date: first.contract_date.clone(),
        seller: first.party_a.clone(),
        buyer: first.party_b.clone(),
        summary: InvoiceSummary::of(&items),
        items,
        ref_tokens,
        linked_contract_doc_ids,
        linked_agreement_ids: Vec::new(),
        audit_trail,
    })
}

/// C4: one invoice per agreement, numbered in input order
pub fn invoices_per_agreement(
    contracts: &[ContractData],
    config: &InvoiceConfig,
) -> Result<Vec<EInvoiceData>, ExportError> {
    let single = InvoiceConfig {
        mode: InvoiceMode::C4,
        items_per_invoice: None,
        per_phase: false,
        per_item: false,
        ..config.clone()
    };
    contracts
        .iter()
        .enumerate()
        .map(|(index, contract)| {
            let mut invoice = generate_invoices(contract, &single)?
                .into_iter()
                .next()
                .ok_or_else(|| ExportError::EmptyInvoice(contract.contract_number.clone()))?;
            invoice.invoice_number = invoice_number(index);
            Ok(invoice)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use shared_types::PaymentPhase;

    fn contract(number: &str) -> ContractData {
        ContractData {
            contract_date: "ngày 5 tháng 3 năm 2025".to_string(),
            contract_number: number.to_string(),
            items: vec![
                LineItem::new("Tư vấn", 2, 10_000_000),
                LineItem::new("Triển khai", 1, 25_000_000),
            ],
            total_amount: 45_000_000,
            vat_rate: 10,
            payment_phases: vec![
                PaymentPhase {
                    phase_name: "Đợt 1".to_string(),
                    amount: 20_000_000,
                    ..Default::default()
                },
                PaymentPhase {
                    phase_name: "Đợt 2".to_string(),
                    amount: 25_000_000,
                    ..Default::default()
                },
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_single_invoice_totals() {
        let invoices = generate_invoices(&contract("12/HĐ"), &InvoiceConfig::default()).unwrap();
        assert_eq!(invoices.len(), 1);
        let invoice = &invoices[0];
        assert_eq!(invoice.invoice_number, "0000001");
        assert_eq!(invoice.items[0].name, "Tư vấn theo 12/HĐ");
        assert_eq!(invoice.items[0].vat_amount, 2_000_000);
        assert_eq!(invoice.summary.total_before_vat, 45_000_000);
        assert_eq!(invoice.summary.total_vat, 4_500_000);
        assert_eq!(invoice.summary.total_payable, 49_500_000);
        assert_eq!(
            invoice.summary.amount_in_words,
            "Bốn mươi chín triệu năm trăm nghìn đồng chẵn"
        );
    }

    #[test]
    fn test_per_phase_invoices() {
        let config = InvoiceConfig {
            per_phase: true,
            include_audit_trail: true,
            ..Default::default()
        };
        let invoices = generate_invoices(&contract("12/HĐ"), &config).unwrap();
        assert_eq!(invoices.len(), 2);
        assert_eq!(invoices[1].invoice_number, "0000002");
        assert_eq!(invoices[1].items[0].name, "Đợt 2 Triển khai theo 12/HĐ");
        assert_eq!(invoices[1].items[0].amount, 25_000_000);
        assert_eq!(
            invoices[1].audit_trail.as_ref().unwrap().phase_names,
            vec!["Đợt 2"]
        );
    }

    #[test]
    fn test_selected_phase_out_of_range_is_empty() {
        let config = InvoiceConfig {
            per_phase: true,
            selected_phases: Some(vec![7]),
            ..Default::default()
        };
        assert!(matches!(
            generate_invoices(&contract("12/HĐ"), &config),
            Err(ExportError::EmptyInvoice(_))
        ));
    }

    #[test]
    fn test_items_per_invoice_split() {
        let config = InvoiceConfig {
            items_per_invoice: Some(1),
            ..Default::default()
        };
        let invoices = generate_invoices(&contract("12/HĐ"), &config).unwrap();
        assert_eq!(invoices.len(), 2);
        assert_eq!(invoices[0].summary.total_before_vat, 20_000_000);
        assert_eq!(invoices[1].summary.total_before_vat, 25_000_000);
    }

    #[test]
    fn test_addendum_reference_in_c3() {
        let config = InvoiceConfig {
            mode: InvoiceMode::C3,
            reference: ReferenceConfig {
                include_addendum_no: true,
                ..Default::default()
            },
            ..Default::default()
        };
        let invoice = &generate_invoices(&contract("12/HĐ"), &config).unwrap()[0];
        assert_eq!(invoice.items[0].name, "Tư vấn (12/HĐ, PL-12/HĐ)");
        assert_eq!(invoice.linked_agreement_ids, vec!["12/HĐ"]);
    }

    #[test]
    fn test_consolidate_contracts() {
        let config = InvoiceConfig {
            group_by_service_type: true,
            reference: ReferenceConfig {
                include_contract_no: false,
                ..Default::default()
            },
            ..Default::default()
        };
        let invoice = consolidate(&[contract("1/HĐ"), contract("2/HĐ")], &config).unwrap();
        assert_eq!(invoice.items.len(), 2);
        assert_eq!(invoice.items[0].quantity, 4);
        assert_eq!(invoice.summary.total_before_vat, 90_000_000);
        assert_eq!(invoice.linked_contract_doc_ids, vec!["1/HĐ", "2/HĐ"]);
    }

    #[test]
    fn test_one_invoice_per_agreement() {
        let invoices =
            invoices_per_agreement(&[contract("1/HĐ"), contract("2/HĐ")], &InvoiceConfig::default())
                .unwrap();
        assert_eq!(invoices.len(), 2);
        assert_eq!(invoices[1].invoice_number, "0000002");
        assert_eq!(invoices[1].linked_agreement_ids, vec!["2/HĐ"]);
    }

    #[test]
    fn test_empty_contract_is_an_error() {
        let empty = ContractData::default();
        assert!(generate_invoices(&empty, &InvoiceConfig::default()).is_err());
    }

    #[test]
    fn test_mode_parse() {
        assert_eq!("c2".parse::<InvoiceMode>().unwrap(), InvoiceMode::C2);
        assert!("C9".parse::<InvoiceMode>().is_err());
    }

    #[test]
    fn test_summary_json_names() {
        let json = serde_json::to_value(InvoiceSummary::of(&[])).unwrap();
        assert_eq!(json["totalBeforeVAT"], 0);
        assert_eq!(json["amountInWords"], "Không đồng chẵn");
    }
}
