//! Subcommand implementations
//!
//! Each command turns its inputs into one or more [`Artifact`]s; [`emit`]
//! either prints them or writes them under an output directory.

use crate::config::Config;
use anyhow::{bail, Context};
use case_core::{build_chat_request, build_user_prompt, parse_case_response, CaseRequest};
use chrono::{NaiveDate, NaiveDateTime};
use contract_formatter::{render_page, ContractFormatter};
use export_core::format::case_file_name;
use export_core::{
    case_json, consolidate, generate_invoices, invoice_file_name, invoice_xml,
    invoices_per_agreement, statement_csv, statement_file_name, statement_json, EInvoiceData,
    InvoiceConfig, InvoiceMode,
};
use shared_types::mutation::{group_by_category, toggle};
use shared_types::{ContractData, MutationCode};
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;
use synth_data::{generate, parse_external, simulate, SeededRandom, StatementConfig};
use tracing::{info, warn};

/// One generated output and the file name it is saved under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub file_name: String,
    pub content: String,
}

impl Artifact {
    pub fn new(file_name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            content: content.into(),
        }
    }
}

pub fn emit(artifacts: &[Artifact], dir: Option<&Path>, out: &mut dyn Write) -> anyhow::Result<()> {
    let Some(dir) = dir else {
        for artifact in artifacts {
            writeln!(out, "{}", artifact.content).context("Failed to write output")?;
        }
        return Ok(());
    };

    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;
    for artifact in artifacts {
        let path = dir.join(&artifact.file_name);
        fs::write(&path, &artifact.content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!(path = %path.display(), bytes = artifact.content.len(), "wrote artifact");
    }
    Ok(())
}

/// File contents, or stdin for `None` and `-`
pub fn read_input(path: Option<&Path>) -> anyhow::Result<String> {
    match path {
        Some(path) if path != Path::new("-") => fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file: {}", path.display())),
        _ => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read standard input")?;
            Ok(text)
        }
    }
}

/// A contract from a JSON file (reconciled) or generated from `seed`
pub fn load_contract(path: Option<&Path>, seed: i64, config: &Config) -> anyhow::Result<ContractData> {
    match path {
        Some(path) => {
            let json = read_input(Some(path))?;
            parse_external(&json, &config.generator.reconcile_options())
                .with_context(|| format!("Invalid contract JSON in {}", path.display()))
        }
        None => Ok(generate(seed)),
    }
}

/// `count` contracts from consecutive seeds
pub fn generate_contracts(seed: i64, count: usize) -> anyhow::Result<Artifact> {
    let contracts: Vec<ContractData> = (0..count as i64)
        .map(|offset| generate(seed.wrapping_add(offset)))
        .collect();
    let content = match contracts.as_slice() {
        [single] => serde_json::to_string_pretty(single)?,
        many => serde_json::to_string_pretty(many)?,
    };
    Ok(Artifact::new(format!("contracts_{seed}.json"), content))
}

pub fn reconcile_contract(json: &str, config: &Config) -> anyhow::Result<Artifact> {
    let contract = parse_external(json, &config.generator.reconcile_options())
        .context("Failed to decode contract JSON")?;
    let content = serde_json::to_string_pretty(&contract)?;
    Ok(Artifact::new(case_file_name(&contract.contract_number, "json"), content))
}

pub fn format_contract_text(
    text: &str,
    config: &Config,
    title: Option<&str>,
) -> anyhow::Result<Artifact> {
    let formatted = ContractFormatter::new(config.formatter).format(text);
    let content = match title {
        Some(title) => render_page(title, &formatted.html),
        None => formatted.html,
    };
    Ok(Artifact::new("contract.html", content))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum StatementFormat {
    Csv,
    Json,
}

pub struct StatementArgs<'a> {
    pub seed: i64,
    /// Statement around this contract; standalone when `None`
    pub contract: Option<&'a ContractData>,
    pub generated_on: NaiveDate,
    pub account_number: Option<String>,
    pub format: StatementFormat,
}

pub fn bank_statement(args: StatementArgs<'_>, config: &Config) -> anyhow::Result<Artifact> {
    let mut statement_config = StatementConfig::new(args.generated_on);
    statement_config.account_number = args.account_number;
    statement_config.currency = config.statement.currency.clone();
    statement_config.transaction_count = config.statement.transaction_count;

    let mut rng = SeededRandom::new(args.seed);
    let statement = simulate(&mut rng, &statement_config, args.contract);

    let account = &statement.account.account_number;
    let start = statement.statement_period.start_date;
    Ok(match args.format {
        StatementFormat::Csv => Artifact::new(
            statement_file_name(account, start, "csv"),
            statement_csv(&statement),
        ),
        StatementFormat::Json => Artifact::new(
            statement_file_name(account, start, "json"),
            statement_json(&statement)?,
        ),
    })
}

/// Invoices in `config.mode`; several contracts are consolidated (C2) or
/// invoiced one per agreement (C4)
pub fn build_invoices(
    contracts: &[ContractData],
    config: &InvoiceConfig,
) -> anyhow::Result<Vec<EInvoiceData>> {
    let invoices = match (contracts, config.mode) {
        ([], _) => bail!("No contract to invoice"),
        ([single], _) => generate_invoices(single, config)?,
        (many, InvoiceMode::C2) => vec![consolidate(many, config)?],
        (many, InvoiceMode::C4) => invoices_per_agreement(many, config)?,
        ([first, rest @ ..], mode) => {
            warn!(%mode, ignored = rest.len(), "mode invoices one contract; extra contracts ignored");
            generate_invoices(first, config)?
        }
    };
    Ok(invoices)
}

pub fn invoice_artifacts(
    invoices: &[EInvoiceData],
    config: &InvoiceConfig,
    xml_issued_at: Option<NaiveDateTime>,
) -> anyhow::Result<Vec<Artifact>> {
    let Some(issued_at) = xml_issued_at else {
        let content = serde_json::to_string_pretty(invoices)?;
        return Ok(vec![Artifact::new("EInvoices.json", content)]);
    };
    Ok(invoices
        .iter()
        .map(|invoice| {
            let xml = invoice_xml(invoice, config, issued_at);
            info!(
                invoice = %invoice.invoice_number,
                authority_code = %xml.authority_code,
                "issued e-invoice XML"
            );
            Artifact::new(invoice_file_name(&invoice.invoice_number), xml.xml)
        })
        .collect())
}

/// Mutations given on the command line; repeating a code switches it off
pub fn active_mutations(codes: &[MutationCode]) -> Vec<MutationCode> {
    codes
        .iter()
        .fold(Vec::new(), |active, &code| toggle(code, &active))
}

pub fn case_prompt(
    contract: &ContractData,
    mutations: Vec<MutationCode>,
    chat_model: Option<&str>,
) -> anyhow::Result<Artifact> {
    let request = CaseRequest::new(contract).with_mutations(mutations);
    let content = match chat_model {
        Some(model) => serde_json::to_string_pretty(&build_chat_request(model, &request)?)?,
        None => build_user_prompt(&request)?,
    };
    Ok(Artifact::new(
        case_file_name(&contract.contract_number, "prompt.txt"),
        content,
    ))
}

/// Case JSON plus the observed text rendered as an HTML page
pub fn parse_case(response: &str, config: &Config) -> anyhow::Result<Vec<Artifact>> {
    let case = parse_case_response(response).context("Failed to parse case response")?;

    let truth = case
        .truth_contract(&config.generator.reconcile_options())
        .context("Invalid TRUTH_INTENDED_JSON")?;
    if truth.total_amount != truth.phases_total() {
        warn!(case_id = %case.case_id, "truth payment phases do not sum to the total");
    }

    let formatted = ContractFormatter::new(config.formatter).format(&case.observed_text);
    info!(
        case_id = %case.case_id,
        anomalies = case.anomalies.len(),
        coverage = formatted.coverage.ratio,
        "parsed case"
    );

    Ok(vec![
        Artifact::new(case_file_name(&case.case_id, "json"), case_json(&case)?),
        Artifact::new(
            case_file_name(&case.case_id, "html"),
            render_page(&case.case_id, &formatted.html),
        ),
    ])
}

/// Mutation catalog, grouped by category
pub fn mutation_catalog(json: bool) -> anyhow::Result<String> {
    let groups = group_by_category();
    if json {
        return Ok(serde_json::to_string_pretty(&groups)?);
    }
    let mut out = String::new();
    for (category, defs) in &groups {
        out.push_str(&format!("{category}\n"));
        for def in defs {
            out.push_str(&format!("  {}\n", def.describe()));
        }
    }
    Ok(out)
}
