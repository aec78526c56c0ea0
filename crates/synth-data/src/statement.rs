//! Bank statement simulator
//!
//! Builds a plausible account statement either around an existing contract
//! (party A's account receiving the VAT-inclusive payment phases from
//! party B, plus background noise) or from scratch for a configured period.
//! All randomness comes from the caller's [`SeededRandom`]; the generation
//! date is injected so the output never depends on the wall clock.

use crate::pools::{STATEMENT_BANKS, TRANSACTION_DESCRIPTIONS};
use crate::rng::SeededRandom;
use chrono::{Datelike, Days, Months, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use shared_types::types::percent_of;
use shared_types::{parse_vn_date, ContractData};
use tracing::{debug, instrument};

const ACCOUNT_TYPE: &str = "Tài khoản thanh toán";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankAccount {
    pub account_number: String,
    pub account_name: String,
    pub bank_name: String,
    pub branch: String,
    pub currency: String,
    pub account_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankTransaction {
    pub date: NaiveDate,
    pub description: String,
    pub reference: String,
    pub debit: i64,
    pub credit: i64,
    /// Running balance after this transaction
    pub balance: i64,
    pub transaction_number: String,
    #[serde(rename = "corresponsiveAccount")]
    pub counterparty_account: String,
    #[serde(rename = "corresponsiveName")]
    pub counterparty_name: String,
    pub mtid: String,
    pub virtual_account: String,
    pub transaction_time: NaiveDateTime,
    pub posting_date: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementPeriod {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl StatementPeriod {
    pub fn days(&self) -> i64 {
        (self.end_date - self.start_date).num_days()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementMetadata {
    pub statement_number: String,
    pub generated_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankStatement {
    pub account: BankAccount,
    pub statement_period: StatementPeriod,
    pub opening_balance: i64,
    pub closing_balance: i64,
    pub transactions: Vec<BankTransaction>,
    pub metadata: StatementMetadata,
}

impl BankStatement {
    pub fn total_credits(&self) -> i64 {
        self.transactions.iter().map(|tx| tx.credit).sum()
    }

    pub fn total_debits(&self) -> i64 {
        self.transactions.iter().map(|tx| tx.debit).sum()
    }
}

/// Inputs for a statement that is not derived from a contract, plus the
/// settings shared by both modes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementConfig {
    /// Account number to use; a random 12-digit number when `None`
    pub account_number: Option<String>,
    pub period: StatementPeriod,
    /// Number of transactions; derived from the period length when `None`
    pub transaction_count: Option<usize>,
    pub currency: String,
    /// Date stamped into references and metadata
    pub generated_on: NaiveDate,
}

impl StatementConfig {
    /// One-month statement ending on `generated_on`
    pub fn new(generated_on: NaiveDate) -> Self {
        Self {
            account_number: None,
            period: StatementPeriod {
                start_date: generated_on
                    .checked_sub_months(Months::new(1))
                    .unwrap_or(generated_on),
                end_date: generated_on,
            },
            transaction_count: None,
            currency: "VND".to_string(),
            generated_on,
        }
    }
}

/// Simulate a statement, around `contract` when one is given
#[instrument(skip_all, fields(with_contract = contract.is_some()))]
pub fn simulate(
    rng: &mut SeededRandom,
    config: &StatementConfig,
    contract: Option<&ContractData>,
) -> BankStatement {
    let mut sim = Simulation {
        rng,
        config,
        transactions: Vec::new(),
    };

    let (account, period, opening_balance) = match contract {
        Some(contract) => sim.contract_statement(contract),
        None => sim.standalone_statement(),
    };

    let Simulation {
        rng, transactions, ..
    } = sim;
    let statement_number = format!(
        "STMT-{}-{:04}",
        config.generated_on.year(),
        rng.below(10_000)
    );
    let (transactions, closing_balance) = settle(opening_balance, transactions);

    debug!(
        account = %account.account_number,
        transactions = transactions.len(),
        opening_balance,
        closing_balance,
        "simulated bank statement"
    );

    BankStatement {
        account,
        statement_period: period,
        opening_balance,
        closing_balance,
        transactions,
        metadata: StatementMetadata {
            statement_number,
            generated_date: config.generated_on,
        },
    }
}

/// Sort by date (stable) and recompute running balances in final order
fn settle(opening: i64, mut transactions: Vec<BankTransaction>) -> (Vec<BankTransaction>, i64) {
    transactions.sort_by_key(|tx| (tx.date, tx.transaction_time));
    let mut balance = opening;
    for tx in &mut transactions {
        balance += tx.credit - tx.debit;
        tx.balance = balance;
    }
    (transactions, balance)
}

struct Simulation<'a> {
    rng: &'a mut SeededRandom,
    config: &'a StatementConfig,
    transactions: Vec<BankTransaction>,
}

/// Direction and counterparty of one transaction before it is stamped
struct Entry {
    date: NaiveDate,
    description: String,
    debit: i64,
    credit: i64,
    counterparty_account: String,
    counterparty_name: String,
    virtual_account: String,
    time: NaiveTime,
}

impl Simulation<'_> {
    fn contract_statement(
        &mut self,
        contract: &ContractData,
    ) -> (BankAccount, StatementPeriod, i64) {
        let party_a = &contract.party_a;
        let account_number = if party_a.bank_account.is_empty() {
            self.account_number()
        } else {
            party_a.bank_account.clone()
        };
        let account = BankAccount {
            account_number,
            account_name: party_a.name.clone(),
            bank_name: party_a.bank_name.clone(),
            branch: branch_from_address(&party_a.address),
            currency: self.config.currency.clone(),
            account_type: ACCOUNT_TYPE.to_string(),
        };

        let contract_date =
            parse_vn_date(&contract.contract_date).unwrap_or(self.config.generated_on);
        let last_due = contract
            .payment_phases
            .iter()
            .filter_map(|phase| parse_vn_date(&phase.due_date))
            .max()
            .unwrap_or(contract_date);
        let first_due = contract
            .payment_phases
            .iter()
            .filter_map(|phase| parse_vn_date(&phase.due_date))
            .min()
            .unwrap_or(contract_date);
        let month_before = contract_date
            .checked_sub_months(Months::new(1))
            .unwrap_or(contract_date);
        let period = StatementPeriod {
            start_date: month_before.min(first_due),
            end_date: add_days(last_due.max(contract_date), 7),
        };

        let opening_balance = self.rng.below(50_000_000) + contract.total_amount;
        let party_b = &contract.party_b;

        if contract.payment_phases.is_empty() {
            let date = add_days(contract_date, 7);
            self.push(Entry {
                date,
                description: format!("Thanh toán theo Hợp đồng số {}", contract.contract_number),
                debit: 0,
                credit: contract.total_with_vat(),
                counterparty_account: party_b.bank_account.clone(),
                counterparty_name: party_b.name.clone(),
                virtual_account: String::new(),
                time: NaiveTime::MIN,
            });
        }
        for phase in &contract.payment_phases {
            let date = parse_vn_date(&phase.due_date).unwrap_or(contract_date);
            let credit = phase.amount + percent_of(phase.amount, contract.vat_rate);
            let time = self.time_between(9, 8);
            self.push(Entry {
                date,
                description: format!(
                    "Thanh toán {} theo Hợp đồng số {}",
                    phase.phase_name, contract.contract_number
                ),
                debit: 0,
                credit,
                counterparty_account: party_b.bank_account.clone(),
                counterparty_name: party_b.name.clone(),
                virtual_account: String::new(),
                time,
            });
        }

        let days = period.days().max(1);
        let noise = (days / 5).clamp(3, 10);
        for _ in 0..noise {
            let date = add_days(period.start_date, self.rng.below(days));
            let is_credit = self.rng.next_f64() > 0.3;
            let amount = self.rng.below(20_000_000) + 50_000;
            let description = self.rng.pick_str(TRANSACTION_DESCRIPTIONS).to_string();
            let (counterparty_account, counterparty_name) = if is_credit {
                (party_b.bank_account.clone(), party_b.name.clone())
            } else {
                (self.account_number(), String::new())
            };
            let time = self.time_between(0, 24);
            self.push(Entry {
                date,
                description,
                debit: if is_credit { 0 } else { amount },
                credit: if is_credit { amount } else { 0 },
                counterparty_account,
                counterparty_name,
                virtual_account: String::new(),
                time,
            });
        }

        (account, period, opening_balance)
    }

    fn standalone_statement(&mut self) -> (BankAccount, StatementPeriod, i64) {
        let config = self.config;
        let account_number = match &config.account_number {
            Some(number) => number.clone(),
            None => self.account_number(),
        };
        let bank = self.rng.pick_str(STATEMENT_BANKS);
        let account = BankAccount {
            account_number,
            account_name: self.holder_name(),
            bank_name: format!("Ngân hàng TMCP {bank}"),
            branch: format!("Chi nhanh {}", self.rng.below(10) + 1),
            currency: config.currency.clone(),
            account_type: ACCOUNT_TYPE.to_string(),
        };

        let period = config.period;
        let days = period.days().max(1);
        let count = config
            .transaction_count
            .unwrap_or_else(|| days.clamp(10, 50) as usize);
        let opening_balance = self.rng.below(100_000_000) + 10_000_000;

        for _ in 0..count {
            let date = add_days(period.start_date, self.rng.below(days));
            let is_credit = self.rng.next_f64() > 0.4;
            let amount = self.rng.below(50_000_000) + 100_000;
            let description = self.rng.pick_str(TRANSACTION_DESCRIPTIONS).to_string();
            let (counterparty_account, counterparty_name) = if self.rng.next_f64() > 0.5 {
                (self.account_number(), self.holder_name())
            } else {
                (String::new(), String::new())
            };
            let virtual_account = if self.rng.next_f64() > 0.7 {
                self.account_number()
            } else {
                String::new()
            };
            let time = self.time_between(0, 24);
            self.push(Entry {
                date,
                description,
                debit: if is_credit { 0 } else { amount },
                credit: if is_credit { amount } else { 0 },
                counterparty_account,
                counterparty_name,
                virtual_account,
                time,
            });
        }

        (account, period, opening_balance)
    }

    fn push(&mut self, entry: Entry) {
        let seq = self.transactions.len() + 1;
        let mtid = format!("MTID{:06}", self.rng.below(1_000_000));
        self.transactions.push(BankTransaction {
            date: entry.date,
            description: entry.description,
            reference: format!("FT{}{seq:06}", self.config.generated_on.format("%Y%m%d")),
            debit: entry.debit,
            credit: entry.credit,
            balance: 0,
            transaction_number: seq.to_string(),
            counterparty_account: entry.counterparty_account,
            counterparty_name: entry.counterparty_name,
            mtid,
            virtual_account: entry.virtual_account,
            transaction_time: entry.date.and_time(entry.time),
            posting_date: entry.date,
        });
    }

    /// Random time of day with the hour in `first_hour..first_hour + hours`
    fn time_between(&mut self, first_hour: i64, hours: i64) -> NaiveTime {
        let hour = first_hour + self.rng.below(hours);
        let minute = self.rng.below(60);
        let second = self.rng.below(60);
        NaiveTime::from_hms_opt(hour as u32, minute as u32, second as u32).unwrap_or(NaiveTime::MIN)
    }

    fn account_number(&mut self) -> String {
        (0..12)
            .map(|_| char::from(b'0' + self.rng.below(10) as u8))
            .collect()
    }

    fn holder_name(&mut self) -> String {
        let letter = char::from(b'A' + self.rng.below(26) as u8);
        format!("NGUYEN VAN {letter}")
    }
}

/// Second-to-last comma-separated part of an address (the district)
fn branch_from_address(address: &str) -> String {
    let parts: Vec<&str> = address.split(',').collect();
    parts
        .len()
        .checked_sub(2)
        .and_then(|i| parts.get(i))
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .unwrap_or("Chi nhánh 1")
        .to_string()
}

fn add_days(date: NaiveDate, days: i64) -> NaiveDate {
    date.checked_add_days(Days::new(days.max(0) as u64))
        .unwrap_or(date)
}
