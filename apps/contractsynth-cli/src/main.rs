//! ContractSynth binary
//!
//! Generated artifacts go to stdout (or `--out`); logs go to stderr.

use anyhow::Context;
use chrono::{Local, NaiveDate, NaiveDateTime};
use clap::{Parser, Subcommand};
use contractsynth_cli::commands::{self, StatementArgs, StatementFormat};
use contractsynth_cli::Config;
use export_core::InvoiceMode;
use shared_types::MutationCode;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "contractsynth")]
#[command(version, about = "Synthetic Vietnamese contract data for document-AI testing")]
struct Cli {
    /// TOML configuration file (defaults to ./contractsynth.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Write artifacts into this directory instead of stdout
    #[arg(short, long, global = true)]
    out: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate contract data from a seed
    Generate {
        #[arg(long, default_value_t = 12345)]
        seed: i64,
        /// Number of contracts, from consecutive seeds
        #[arg(long, default_value_t = 1)]
        count: usize,
    },
    /// Decode external contract JSON and restore its sum invariants
    Reconcile {
        /// JSON file, or stdin when omitted
        input: Option<PathBuf>,
    },
    /// Render contract text to HTML
    Format {
        /// Contract text file, or stdin when omitted
        input: Option<PathBuf>,
        /// Wrap the fragment in a printable page with this title
        #[arg(long)]
        title: Option<String>,
    },
    /// Simulate a bank statement
    Statement {
        #[arg(long, default_value_t = 12345)]
        seed: i64,
        /// Contract JSON the statement revolves around
        #[arg(long, conflicts_with = "standalone")]
        contract: Option<PathBuf>,
        /// Random transactions not tied to any contract
        #[arg(long)]
        standalone: bool,
        #[arg(long)]
        account_number: Option<String>,
        /// Generation date (YYYY-MM-DD), today when omitted
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long, value_enum, default_value_t = StatementFormat::Csv)]
        format: StatementFormat,
    },
    /// Map contracts to e-invoices
    Invoice {
        /// Contract JSON files; a generated contract when none is given
        #[arg(long = "contract")]
        contracts: Vec<PathBuf>,
        #[arg(long, default_value_t = 12345)]
        seed: i64,
        #[arg(long)]
        mode: Option<InvoiceMode>,
        /// One invoice per payment phase (C1)
        #[arg(long)]
        per_phase: bool,
        /// One invoice per line item (C1)
        #[arg(long)]
        per_item: bool,
        #[arg(long)]
        items_per_invoice: Option<usize>,
        /// Emit GDT XML instead of the JSON model
        #[arg(long)]
        xml: bool,
        /// Issue timestamp for XML (YYYY-MM-DDTHH:MM:SS), now when omitted
        #[arg(long, requires = "xml")]
        issued_at: Option<NaiveDateTime>,
    },
    /// Build the generator prompt for a case
    Prompt {
        #[arg(long, default_value_t = 12345)]
        seed: i64,
        #[arg(long)]
        contract: Option<PathBuf>,
        /// Mutation code to inject; repeat a code to switch it off again
        #[arg(short, long = "mutation")]
        mutations: Vec<MutationCode>,
        /// Emit a chat-completions request body for this model
        #[arg(long)]
        chat_model: Option<String>,
    },
    /// Parse a generator response into case JSON and an HTML page
    ParseCase {
        /// Response file, or stdin when omitted
        input: Option<PathBuf>,
    },
    /// List the mutation catalog
    Mutations {
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // stdout carries the artifacts
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    let artifacts = run(cli.command, &config)?;
    commands::emit(&artifacts, cli.out.as_deref(), &mut io::stdout().lock())
}

fn run(command: Command, config: &Config) -> anyhow::Result<Vec<contractsynth_cli::Artifact>> {
    Ok(match command {
        Command::Generate { seed, count } => vec![commands::generate_contracts(seed, count)?],
        Command::Reconcile { input } => {
            let json = commands::read_input(input.as_deref())?;
            vec![commands::reconcile_contract(&json, config)?]
        }
        Command::Format { input, title } => {
            let text = commands::read_input(input.as_deref())?;
            vec![commands::format_contract_text(&text, config, title.as_deref())?]
        }
        Command::Statement {
            seed,
            contract,
            standalone,
            account_number,
            date,
            format,
        } => {
            let contract = if standalone {
                None
            } else {
                Some(commands::load_contract(contract.as_deref(), seed, config)?)
            };
            let args = StatementArgs {
                seed,
                contract: contract.as_ref(),
                generated_on: date.unwrap_or_else(|| Local::now().date_naive()),
                account_number,
                format,
            };
            vec![commands::bank_statement(args, config)?]
        }
        Command::Invoice {
            contracts,
            seed,
            mode,
            per_phase,
            per_item,
            items_per_invoice,
            xml,
            issued_at,
        } => {
            let mut invoice_config = config.invoice.clone();
            if let Some(mode) = mode {
                invoice_config.mode = mode;
            }
            invoice_config.per_phase |= per_phase;
            invoice_config.per_item |= per_item;
            invoice_config.items_per_invoice = items_per_invoice.or(invoice_config.items_per_invoice);

            let contracts = if contracts.is_empty() {
                vec![commands::load_contract(None, seed, config)?]
            } else {
                contracts
                    .iter()
                    .map(|path| commands::load_contract(Some(path.as_path()), seed, config))
                    .collect::<anyhow::Result<Vec<_>>>()?
            };
            let invoices = commands::build_invoices(&contracts, &invoice_config)?;
            let issued_at = xml.then(|| issued_at.unwrap_or_else(|| Local::now().naive_local()));
            commands::invoice_artifacts(&invoices, &invoice_config, issued_at)?
        }
        Command::Prompt {
            seed,
            contract,
            mutations,
            chat_model,
        } => {
            let contract = commands::load_contract(contract.as_deref(), seed, config)?;
            let mutations = commands::active_mutations(&mutations);
            vec![commands::case_prompt(&contract, mutations, chat_model.as_deref())?]
        }
        Command::ParseCase { input } => {
            let response = commands::read_input(input.as_deref())?;
            commands::parse_case(&response, config)?
        }
        Command::Mutations { json } => vec![contractsynth_cli::Artifact::new(
            "mutations.txt",
            commands::mutation_catalog(json)?,
        )],
    })
}
