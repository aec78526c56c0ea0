//! Seeded contract generator
//!
//! Produces one self-consistent [`ContractData`] per seed. The order of
//! draws from the generator is part of the output contract: changing it
//! changes every contract generated from an existing seed.

use crate::pools::{self, PartyPool, CLIENT_POOL, PROVIDER_POOL};
use crate::rng::SeededRandom;
use shared_types::{CompanyInfo, ContractData, LineItem, PaymentPhase};
use tracing::{debug, instrument};

/// Year printed in contract and phase dates
pub const CONTRACT_YEAR: i64 = 2025;

/// Generate the contract for `seed`
pub fn generate(seed: i64) -> ContractData {
    let mut rng = SeededRandom::new(seed);
    generate_with(&mut rng)
}

/// Generate a contract from an existing generator, advancing it
#[instrument(skip(rng), fields(state = rng.state()))]
pub fn generate_with(rng: &mut SeededRandom) -> ContractData {
    let contract_number = format!("{}/{}/HĐDV-EON", rng.range(2024, 2025), rng.range(1, 12));

    let item_count = rng.range(2, 4);
    let mut items = Vec::with_capacity(item_count as usize);
    let mut total_amount = 0;
    for _ in 0..item_count {
        let qty = rng.range(1, 10);
        let rate = rng.range(1_000_000, 50_000_000);
        let item = LineItem::new(rng.pick_str(pools::SERVICES), qty, rate);
        total_amount += item.total;
        items.push(item);
    }

    let month = rng.range(1, 12);
    let day = rng.range(1, 28);
    let contract_date = format!("ngày {day} tháng {month} năm {CONTRACT_YEAR}");
    let vat_rate = *rng.pick(&[8, 10]).unwrap_or(&10);
    let payment_phases = generate_payment_phases(rng, total_amount);

    let party_a = generate_company(rng, &PROVIDER_POOL);
    let party_b = generate_company(rng, &CLIENT_POOL);

    debug!(
        contract_number = %contract_number,
        items = items.len(),
        phases = payment_phases.len(),
        total_amount,
        "generated contract data"
    );

    ContractData {
        contract_date,
        contract_number,
        party_a,
        party_b,
        items,
        total_amount,
        vat_rate,
        payment_phases,
    }
}

/// Split `total` into 2-4 phases.
///
/// Every phase but the last takes 20-40% of the total, floored and capped
/// at what is still unassigned; the last phase takes the remainder, so the
/// amounts always sum to `total` and none is negative.
fn generate_payment_phases(rng: &mut SeededRandom, total: i64) -> Vec<PaymentPhase> {
    let count = rng.range(2, 4);
    let mut phases = Vec::with_capacity(count as usize);
    let mut remaining = total;

    for i in 1..count {
        let percent = rng.range(20, 40);
        let amount = ((total as f64) * (percent as f64 / 100.0)).floor() as i64;
        let amount = amount.min(remaining);
        remaining -= amount;

        phases.push(PaymentPhase {
            phase_name: format!("Đợt {i}"),
            amount,
            due_date: format!(
                "ngày {} tháng {} năm {CONTRACT_YEAR}",
                rng.range(1, 28),
                1 + i
            ),
            conditions: format!("Thanh toán sau khi hoàn thành mốc công việc giai đoạn {i}"),
        });
    }

    phases.push(PaymentPhase {
        phase_name: format!("Đợt {count} (Nghiệm thu)"),
        amount: remaining,
        due_date: format!(
            "ngày {} tháng {} năm {CONTRACT_YEAR}",
            rng.range(1, 28),
            1 + count
        ),
        conditions: "Thanh toán ngay sau khi ký biên bản nghiệm thu và thanh lý hợp đồng"
            .to_string(),
    });

    phases
}

fn generate_company(rng: &mut SeededRandom, pool: &PartyPool) -> CompanyInfo {
    let name = format!(
        "CÔNG TY {} {} {}",
        rng.pick_str(pools::COMPANY_TYPES),
        rng.pick_str(pool.company_names),
        rng.range(100, 999)
    );
    let tax_id = format!("0{}", rng.range(pool.tax_id_range.0, pool.tax_id_range.1));
    let address = format!(
        "Số {}, Đường {}, {}, {}",
        rng.range(1, 200),
        rng.pick_str(pool.streets),
        rng.pick_str(pool.districts),
        pool.city
    );
    let representative = format!(
        "{} {} {}",
        rng.pick_str(pools::LAST_NAMES),
        rng.pick_str(pools::MIDDLE_NAMES),
        rng.pick_str(pools::FIRST_NAMES)
    );

    CompanyInfo {
        name: name.to_uppercase(),
        tax_id,
        address,
        phone: format!("+84 {} {}", rng.range(900, 999), rng.range(100_000, 999_999)),
        representative: representative.to_uppercase(),
        position: rng.pick_str(pools::POSITIONS).to_string(),
        bank_name: format!("Ngân hàng TMCP {}", rng.pick_str(pools::BANKS)),
        bank_account: rng
            .range(pool.account_range.0, pool.account_range.1)
            .to_string(),
    }
}
