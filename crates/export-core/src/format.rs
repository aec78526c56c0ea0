//! Number formatting, CSV fields and output file names

use chrono::NaiveDate;

/// vi-VN grouping: `1500000` becomes `1.500.000`
pub fn group_thousands(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if amount < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

/// VND amounts are grouped; other currencies print two decimals
pub fn format_money(amount: i64, currency: &str) -> String {
    if currency.eq_ignore_ascii_case("VND") {
        group_thousands(amount)
    } else {
        format!("{amount}.00")
    }
}

/// Quote a CSV field when it contains a delimiter, quote or line break
pub fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Replace path-hostile characters (`/ \ :`) with `_`
pub fn sanitize_file_component(value: &str) -> String {
    value.replace(['/', '\\', ':'], "_")
}

pub fn case_file_name(case_id: &str, extension: &str) -> String {
    format!("ContractSynth_{}.{extension}", sanitize_file_component(case_id))
}

pub fn invoice_file_name(invoice_number: &str) -> String {
    format!("EInvoice_{}.xml", sanitize_file_component(invoice_number))
}

pub fn statement_file_name(account_number: &str, start: NaiveDate, extension: &str) -> String {
    format!(
        "BankStatement_{}_{}.{extension}",
        sanitize_file_component(account_number),
        start.format("%Y-%m-%d")
    )
}
