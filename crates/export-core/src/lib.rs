//! Export adapters for ContractSynth artifacts
//!
//! Turns contracts into e-invoices (JSON model and GDT XML), bank statements
//! into CSV/JSON and parsed cases into the exported case JSON. All output is
//! produced as strings; writing files is left to the caller, using the
//! names from [`format`].

pub mod case_json;
pub mod einvoice;
pub mod error;
pub mod format;
pub mod invoice_xml;
pub mod statement;
pub mod words;

pub use case_json::case_json;
pub use einvoice::{
    consolidate, generate_invoices, invoice_number, invoices_per_agreement, ref_tokens,
    AuditTrail, EInvoiceData, InvoiceConfig, InvoiceItem, InvoiceMode, InvoiceSummary,
    ReferenceConfig,
};
pub use error::{ExportError, UnknownInvoiceMode};
pub use format::{case_file_name, invoice_file_name, statement_file_name};
pub use invoice_xml::{invoice_xml, InvoiceXml};
pub use statement::{statement_csv, statement_json};
pub use words::amount_in_words;
