//! Value pools for synthetic Vietnamese companies and services
//!
//! Provider (party A) and client (party B) identities are drawn from
//! disjoint pools: different company names, cities, tax-id ranges and
//! account-number ranges. Two generated parties can therefore never share
//! a name, tax id, address or bank account.

pub const LAST_NAMES: &[&str] = &[
    "Nguyễn", "Trần", "Lê", "Phạm", "Hoàng", "Huỳnh", "Phan", "Vũ", "Võ", "Đặng",
];

pub const MIDDLE_NAMES: &[&str] = &["Văn", "Thị", "Đức", "Thành", "Ngọc", "Minh", "Quang"];

pub const FIRST_NAMES: &[&str] = &[
    "Huy", "Khang", "Bảo", "Minh", "Tùng", "Anh", "Dũng", "Nam", "Hương", "Lan", "Ngọc", "Thúy",
];

pub const COMPANY_TYPES: &[&str] = &["TNHH", "Cổ phần (CP)", "TNHH MTV"];

pub const POSITIONS: &[&str] = &["Giám đốc", "Tổng giám đốc", "Chủ tịch HĐQT"];

pub const BANKS: &[&str] = &["Vietcombank", "Techcombank", "MB Bank", "ACB", "VPBank", "BIDV"];

pub const SERVICES: &[&str] = &[
    "Dịch vụ đăng ký và cấu hình tên miền",
    "Dịch vụ bảo trì hệ thống máy chủ",
    "Tư vấn giải pháp chuyển đổi số",
    "Thiết kế và phát triển website doanh nghiệp",
    "Dịch vụ quảng cáo trực tuyến (Ads)",
    "Cho thuê hạ tầng đám mây (Cloud Server)",
];

/// Everything needed to mint one party identity
#[derive(Debug, Clone, Copy)]
pub struct PartyPool {
    pub city: &'static str,
    pub districts: &'static [&'static str],
    pub streets: &'static [&'static str],
    pub company_names: &'static [&'static str],
    /// Inclusive range for the nine digits after the leading `0`
    pub tax_id_range: (i64, i64),
    /// Inclusive range for the ten-digit account number
    pub account_range: (i64, i64),
}

/// Service providers, based in Ho Chi Minh City
pub const PROVIDER_POOL: PartyPool = PartyPool {
    city: "TP. Hồ Chí Minh",
    districts: &["Quận 1", "Quận 3", "Quận 7", "TP. Thủ Đức", "Quận Bình Thạnh"],
    streets: &[
        "Nguyễn Huệ",
        "Lê Lợi",
        "Hàm Nghi",
        "Pasteur",
        "Nam Kỳ Khởi Nghĩa",
        "Hai Bà Trưng",
        "Điện Biên Phủ",
    ],
    company_names: &["Công nghệ EON", "Giải pháp Số", "Viễn thông A", "Phần mềm Sao Việt"],
    tax_id_range: (100_000_000, 549_999_999),
    account_range: (1_000_000_000, 5_499_999_999),
};

/// Clients, based in Hanoi
pub const CLIENT_POOL: PartyPool = PartyPool {
    city: "Hà Nội",
    districts: &["Quận Hoàn Kiếm", "Quận Ba Đình", "Quận Cầu Giấy", "Quận Đống Đa"],
    streets: &[
        "Tràng Tiền",
        "Kim Mã",
        "Xuân Thủy",
        "Láng Hạ",
        "Bà Triệu",
        "Phố Huế",
        "Trần Duy Hưng",
    ],
    company_names: &[
        "Thương mại Dịch vụ An Bình",
        "Bất động sản Văn Phú",
        "Xây dựng Hòa Bình",
        "Vận tải Biển Đông",
    ],
    tax_id_range: (550_000_000, 999_999_999),
    account_range: (5_500_000_000, 9_999_999_999),
};

/// Free-text descriptions for statement noise transactions
pub const TRANSACTION_DESCRIPTIONS: &[&str] = &[
    "CHUYEN KHOAN DEN",
    "THANH TOAN HOA DON",
    "PHI DICH VU",
    "LAI TIET KIEM",
    "RUT TIEN ATM",
    "NAP TIEN DIEN THOAI",
    "THANH TOAN THE",
    "CHUYEN KHOAN TU",
    "PHI QUAN LY",
    "HOAN TIEN",
    "THU NO",
    "THANH TOAN LUONG",
    "CHI TRA HOP DONG",
    "PHI GIAO DICH",
    "THANH TOAN VAT",
];

pub const STATEMENT_BANKS: &[&str] = &[
    "Vietcombank",
    "Techcombank",
    "MB Bank",
    "ACB",
    "VPBank",
    "BIDV",
    "Agribank",
    "Sacombank",
];
