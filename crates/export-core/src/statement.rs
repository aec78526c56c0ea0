//! Bank statement export
//!
//! The CSV opens with a UTF-8 byte order mark so spreadsheet tools pick the
//! right encoding for the Vietnamese headings.

use crate::error::ExportError;
use crate::format::{csv_field, format_money};
use synth_data::BankStatement;

const BOM: char = '\u{feff}';

const HEADER: &str = "Ngày, Mô tả, Số tham chiếu, Ghi nợ, Ghi có, Số dư";

pub fn statement_csv(statement: &BankStatement) -> String {
    let account = &statement.account;
    let currency = account.currency.as_str();
    let money = |amount: i64| format_money(amount, currency);
    // zero debit/credit cells stay empty
    let cell = |amount: i64| if amount == 0 { String::new() } else { money(amount) };

    let mut lines = vec![
        format!("Ngân hàng: {}", csv_field(&account.bank_name)),
        format!("Số tài khoản: {}", csv_field(&account.account_number)),
        format!("Tên tài khoản: {}", csv_field(&account.account_name)),
        format!("Chi nhánh: {}", csv_field(&account.branch)),
        format!(
            "Kỳ báo cáo: {} - {}",
            statement.statement_period.start_date.format("%d/%m/%Y"),
            statement.statement_period.end_date.format("%d/%m/%Y")
        ),
        String::new(),
        HEADER.to_string(),
        format!("Số dư đầu kỳ,,,,,{}", money(statement.opening_balance)),
    ];

    lines.extend(statement.transactions.iter().map(|tx| {
        [
            tx.date.format("%d/%m/%Y").to_string(),
            csv_field(&tx.description),
            csv_field(&tx.reference),
            cell(tx.debit),
            cell(tx.credit),
            money(tx.balance),
        ]
        .join(",")
    }));

    lines.push(format!("Số dư cuối kỳ,,,,,{}", money(statement.closing_balance)));

    let mut csv = String::from(BOM);
    csv.push_str(&lines.join("\n"));
    csv
}

pub fn statement_json(statement: &BankStatement) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(statement)?)
}
