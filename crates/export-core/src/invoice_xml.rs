//! E-invoice XML in the GDT `HDon` layout
//!
//! The invoice body (`DLHDon`) is written first; the authority code
//! (`MCCQT`) is the SHA-256 of that body, so the same invoice issued at the
//! same instant always serializes to the same bytes.

use crate::einvoice::{EInvoiceData, InvoiceConfig};
use chrono::{NaiveDate, NaiveDateTime};
use sha2::{Digest, Sha256};
use shared_types::{parse_vn_date, CompanyInfo};

/// Schema version written to `PBan`
const SCHEMA_VERSION: &str = "2.1.0";

const QR_PREFIX: &str = "0002010102120200040026005200530054005800590060006200996900000110";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceXml {
    pub xml: String,
    /// 32 uppercase hex characters
    pub authority_code: String,
    pub qr_payload: String,
}

pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Contract date when it parses, otherwise the issue date
fn invoice_date(invoice: &EInvoiceData, issued_at: NaiveDateTime) -> NaiveDate {
    parse_vn_date(&invoice.invoice_date).unwrap_or_else(|| issued_at.date())
}

/// `(THDon, KHMSHDon)` from a series such as `AA/26E`
fn series_parts(series: &str) -> (&str, String) {
    match series.split_once('/') {
        Some((symbol, rest)) => {
            let year: String = rest.chars().take(2).collect();
            let symbol = if symbol.is_empty() { series } else { symbol };
            (symbol, if year.is_empty() { "26".to_string() } else { year })
        }
        None => (series, "26".to_string()),
    }
}

pub fn qr_payload(invoice: &EInvoiceData, config: &InvoiceConfig, date: NaiveDate) -> String {
    format!(
        "{QR_PREFIX}{}020110306{}040170508{}0615{:0>18}",
        invoice.seller.tax_id,
        config.series,
        date.format("%Y%m%d"),
        invoice.summary.total_payable * 100
    )
}

struct Writer {
    out: String,
}

impl Writer {
    fn new() -> Self {
        Self { out: String::new() }
    }

    fn open(&mut self, tag: &str) -> &mut Self {
        self.out.push('<');
        self.out.push_str(tag);
        self.out.push('>');
        self
    }

    fn close(&mut self, tag: &str) -> &mut Self {
        self.out.push_str("</");
        self.out.push_str(tag);
        self.out.push('>');
        self
    }

    fn empty(&mut self, tag: &str) -> &mut Self {
        self.out.push('<');
        self.out.push_str(tag);
        self.out.push_str("/>");
        self
    }

    /// `<tag>escaped text</tag>`
    fn text(&mut self, tag: &str, value: &str) -> &mut Self {
        self.open(tag);
        self.out.push_str(&escape_xml(value));
        self.close(tag)
    }

    fn number(&mut self, tag: &str, value: i64) -> &mut Self {
        self.text(tag, &value.to_string())
    }

    /// One `TTin` extension field
    fn info(&mut self, field: &str, kind: &str, value: &str) -> &mut Self {
        self.open("TTin")
            .text("TTruong", field)
            .text("KDLieu", kind)
            .text("DLieu", value)
            .close("TTin")
    }

    fn zero_externals(&mut self) -> &mut Self {
        for field in ["NumberExternal1", "NumberExternal2", "NumberExternal3"] {
            self.info(field, "numeric", "0");
        }
        self
    }
}

pub fn invoice_xml(
    invoice: &EInvoiceData,
    config: &InvoiceConfig,
    issued_at: NaiveDateTime,
) -> InvoiceXml {
    let date = invoice_date(invoice, issued_at);
    let body = invoice_body(invoice, config, date, issued_at);

    let digest = hex::encode(Sha256::digest(body.as_bytes()));
    let authority_code = digest[..32].to_ascii_uppercase();
    let qr = qr_payload(invoice, config, date);

    let mut w = Writer::new();
    w.open("HDon");
    w.out.push_str(&body);
    w.out.push_str(&format!(r#"<MCCQT Id="Id-{}">"#, &digest[32..48]));
    w.out.push_str(&authority_code);
    w.close("MCCQT")
        .text("DLQRCode", &qr)
        .open("DSCKS")
        .empty("NBan")
        .empty("NMua")
        .empty("CQT")
        .close("DSCKS")
        .close("HDon");

    InvoiceXml {
        xml: w.out,
        authority_code,
        qr_payload: qr,
    }
}

fn invoice_body(
    invoice: &EInvoiceData,
    config: &InvoiceConfig,
    date: NaiveDate,
    issued_at: NaiveDateTime,
) -> String {
    let date = date.format("%Y-%m-%d").to_string();
    let (symbol, template_year) = series_parts(&config.series);
    let vat_rate = invoice
        .items
        .first()
        .map(|item| item.vat_rate)
        .or(config.vat_rate)
        .unwrap_or(0);
    let vat_label = format!("{vat_rate}%");
    let summary = &invoice.summary;

    let mut w = Writer::new();
    w.out.push_str(r#"<DLHDon Id="DLHDon">"#);

    w.open("TTChung")
        .text("PBan", SCHEMA_VERSION)
        .text("THDon", symbol)
        .text("KHMSHDon", &template_year)
        .text("KHHDon", &config.series)
        .text("SHDon", &invoice.invoice_number)
        .text("NLap", &date)
        .text("HDCTTChinh", "0")
        .text("DVTTe", &config.currency)
        .text("TGia", "1")
        .text("HTTToan", "TM/CK")
        .text("MSTTCGP", &invoice.seller.tax_id)
        .open("TTKhac")
        .info("KeySearch", "string", "")
        .info("InvoiceType", "string", "1")
        .info("TemplateCode", "string", &config.template_code)
        .info("AdjustmentType", "string", "0")
        .info("VoucherType", "string", "1")
        .close("TTKhac")
        .close("TTChung");

    w.open("NDHDon");
    seller(&mut w, &invoice.seller, &date, issued_at);
    buyer(&mut w, &invoice.buyer);

    w.open("DSHHDVu");
    for (index, item) in invoice.items.iter().enumerate() {
        let external = format!(
            "1${}${}${}${}",
            item.quantity, item.amount, item.vat_rate, item.vat_amount
        );
        w.open("HHDVu")
            .text("TChat", "1")
            .number("STT", index as i64 + 1)
            .empty("MHHDVu")
            .text("THHDVu", &item.name)
            .text("DVTinh", &item.unit)
            .number("SLuong", item.quantity)
            .number("DGia", item.unit_price)
            .text("TLCKhau", "0")
            .text("STCKhau", "0")
            .number("ThTien", item.amount)
            .text("TSuat", &vat_label)
            .open("TTKhac")
            .info("ExternalValue", "string", &external)
            .zero_externals()
            .close("TTKhac")
            .empty("TTHHDTrung")
            .close("HHDVu");
    }
    w.close("DSHHDVu");

    let tax_external = format!(
        "{vat_rate}${}${}$0$0",
        summary.total_before_vat, summary.total_vat
    );
    w.open("TToan")
        .open("THTTLTSuat")
        .open("LTSuat")
        .text("TSuat", &vat_label)
        .number("ThTien", summary.total_before_vat)
        .number("TThue", summary.total_vat)
        .close("LTSuat")
        .close("THTTLTSuat")
        .number("TgTCThue", summary.total_before_vat)
        .number("TgTThue", summary.total_vat)
        .text("TTCKTMai", "0")
        .number("TgTTTBSo", summary.total_payable)
        .text("TgTTTBChu", &summary.amount_in_words)
        .open("TTKhac")
        .info("TaxExternal", "string", &tax_external)
        .close("TTKhac")
        .close("TToan");

    w.close("NDHDon").close("DLHDon");
    w.out
}

fn seller(w: &mut Writer, seller: &CompanyInfo, date: &str, issued_at: NaiveDateTime) {
    let voucher_date = issued_at.format("%Y-%m-%dT%H:%M:%S").to_string();
    w.open("NBan")
        .text("Ten", &seller.name)
        .text("MST", &seller.tax_id)
        .text("DChi", &seller.address)
        .text("SDThoai", &seller.phone)
        .empty("DCTDTu")
        .text("STKNHang", &seller.bank_account)
        .text("TNHang", &seller.bank_name)
        .empty("Fax")
        .open("TTKhac")
        .info("UnitCode", "string", "CTY")
        .info("KindOfInvoice", "string", "1")
        .info("VoucherDate", "string", &voucher_date)
        .info("InvoiceDate", "string", date)
        .zero_externals()
        .close("TTKhac")
        .close("NBan");
}

fn buyer(w: &mut Writer, buyer: &CompanyInfo) {
    w.open("NMua")
        .text("Ten", &buyer.name)
        .text("MST", &buyer.tax_id)
        .text("DChi", &buyer.address)
        .text("MKHang", &buyer.tax_id)
        .text("SDThoai", &buyer.phone)
        .empty("CCCDan")
        .empty("DCTDTu")
        .empty("HVTNMHang")
        .text("STKNHang", &buyer.bank_account)
        .text("TNHang", &buyer.bank_name)
        .open("TTKhac")
        .info("Reference", "string", "0")
        .close("TTKhac")
        .close("NMua");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::einvoice::{generate_invoices, InvoiceConfig};
    use pretty_assertions::assert_eq;
    use shared_types::{ContractData, LineItem};

    fn issued_at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 6)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    fn invoice() -> EInvoiceData {
        let contract = ContractData {
            contract_date: "ngày 5 tháng 3 năm 2025".to_string(),
            contract_number: "12/HĐ".to_string(),
            party_a: CompanyInfo {
                name: "Công ty A & B".to_string(),
                tax_id: "0101234567".to_string(),
                ..Default::default()
            },
            items: vec![LineItem::new("Tư vấn <gói 1>", 1, 1_000_000)],
            total_amount: 1_000_000,
            vat_rate: 10,
            ..Default::default()
        };
        generate_invoices(&contract, &InvoiceConfig::default())
            .unwrap()
            .remove(0)
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml(r#"a & <b> "c" 'd'"#), "a &amp; &lt;b&gt; &quot;c&quot; &apos;d&apos;");
    }

    #[test]
    fn test_series_parts() {
        assert_eq!(series_parts("AA/26E"), ("AA", "26".to_string()));
        assert_eq!(series_parts("C25TAA"), ("C25TAA", "26".to_string()));
    }

    #[test]
    fn test_invoice_layout() {
        let out = invoice_xml(&invoice(), &InvoiceConfig::default(), issued_at());
        assert!(out.xml.starts_with(r#"<HDon><DLHDon Id="DLHDon"><TTChung><PBan>2.1.0</PBan>"#));
        assert!(out.xml.contains("<NLap>2025-03-05</NLap>"));
        assert!(out.xml.contains("<Ten>Công ty A &amp; B</Ten>"));
        assert!(out.xml.contains("<THHDVu>Tư vấn &lt;gói 1&gt; theo 12/HĐ</THHDVu>"));
        assert!(out.xml.contains("<TSuat>10%</TSuat>"));
        assert!(out.xml.contains("<TgTTTBSo>1100000</TgTTTBSo>"));
        assert!(out.xml.contains("<DLieu>1$1$1000000$10$100000</DLieu>"));
        assert!(out.xml.contains("<DLieu>2025-03-06T09:30:00</DLieu>"));
        assert!(out.xml.ends_with("<DSCKS><NBan/><NMua/><CQT/></DSCKS></HDon>"));
    }

    #[test]
    fn test_authority_code_is_deterministic() {
        let first = invoice_xml(&invoice(), &InvoiceConfig::default(), issued_at());
        let second = invoice_xml(&invoice(), &InvoiceConfig::default(), issued_at());
        assert_eq!(first, second);
        assert_eq!(first.authority_code.len(), 32);
        assert!(first
            .authority_code
            .chars()
            .all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c)));
    }

    #[test]
    fn test_qr_payload() {
        let out = invoice_xml(&invoice(), &InvoiceConfig::default(), issued_at());
        assert_eq!(
            out.qr_payload,
            format!(
                "{QR_PREFIX}0101234567020110306AA/26E0401705082025030506150000000001{}",
                "10000000"
            )
        );
    }

    #[test]
    fn test_unparsed_date_uses_issue_date() {
        let mut invoice = invoice();
        invoice.invoice_date = "sometime".to_string();
        let out = invoice_xml(&invoice, &InvoiceConfig::default(), issued_at());
        assert!(out.xml.contains("<NLap>2025-03-06</NLap>"));
    }
}
