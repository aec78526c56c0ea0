//! Mutation vocabulary
//!
//! A mutation is a named defect the text generator injects into the
//! observed contract text while the ground-truth record stays clean.
//! The codes, names and descriptions are shared with fixtures and prompts
//! and must not be reworded.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MutationCode {
    E01,
    E02,
    E03,
    E04,
    E05,
    E06,
    E10,
    E15,
    E20,
    E21,
}

impl MutationCode {
    pub const ALL: [MutationCode; 10] = [
        MutationCode::E01,
        MutationCode::E02,
        MutationCode::E03,
        MutationCode::E04,
        MutationCode::E05,
        MutationCode::E06,
        MutationCode::E10,
        MutationCode::E15,
        MutationCode::E20,
        MutationCode::E21,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MutationCode::E01 => "E01",
            MutationCode::E02 => "E02",
            MutationCode::E03 => "E03",
            MutationCode::E04 => "E04",
            MutationCode::E05 => "E05",
            MutationCode::E06 => "E06",
            MutationCode::E10 => "E10",
            MutationCode::E15 => "E15",
            MutationCode::E20 => "E20",
            MutationCode::E21 => "E21",
        }
    }

    /// Catalog entry for this code
    pub fn def(&self) -> &'static MutationDef {
        // MUTATIONS lists every code exactly once, in `ALL` order
        &MUTATIONS[Self::ALL.iter().position(|c| c == self).unwrap_or_default()]
    }
}

impl fmt::Display for MutationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown mutation code: {0}")]
pub struct UnknownMutationCode(pub String);

impl FromStr for MutationCode {
    type Err = UnknownMutationCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase();
        Self::ALL
            .iter()
            .copied()
            .find(|code| code.as_str() == wanted)
            .ok_or_else(|| UnknownMutationCode(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MutationCategory {
    Formatting,
    Logic,
    Content,
}

impl MutationCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            MutationCategory::Formatting => "Formatting",
            MutationCategory::Logic => "Logic",
            MutationCategory::Content => "Content",
        }
    }
}

impl fmt::Display for MutationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MutationDef {
    pub code: MutationCode,
    pub name: &'static str,
    pub description: &'static str,
    pub category: MutationCategory,
}

impl MutationDef {
    /// Prompt line: `- E01: name (description)`
    pub fn describe(&self) -> String {
        format!("- {}: {} ({})", self.code, self.name, self.description)
    }
}

pub const MUTATIONS: &[MutationDef] = &[
    MutationDef {
        code: MutationCode::E01,
        name: "Mơ hồ ngày tháng (Ambiguous Date)",
        description: "Định dạng ngày thành 01/02/2025 (Gây nhầm lẫn ngày/tháng)",
        category: MutationCategory::Formatting,
    },
    MutationDef {
        code: MutationCode::E02,
        name: "Sai lệch VAT (VAT Mismatch)",
        description: "Văn bản ghi 'VAT 10%' nhưng tính toán số học lại là 8%",
        category: MutationCategory::Logic,
    },
    MutationDef {
        code: MutationCode::E03,
        name: "Sai đơn vị tiền tệ (Currency Mix)",
        description: "Ký hiệu là '₫' nhưng văn bản ghi 'Đô la Mỹ'",
        category: MutationCategory::Content,
    },
    MutationDef {
        code: MutationCode::E04,
        name: "Nhiễu OCR (OCR Noise)",
        description: "Chèn lỗi ký tự: l -> 1, O -> 0, S -> 5 vào các con số",
        category: MutationCategory::Formatting,
    },
    MutationDef {
        code: MutationCode::E05,
        name: "Thiếu dòng Tổng (Missing Total)",
        description: "Xóa hoàn toàn dòng 'Tổng cộng' trong bảng giá",
        category: MutationCategory::Formatting,
    },
    MutationDef {
        code: MutationCode::E06,
        name: "Sai số học (Bad Arithmetic)",
        description: "Thành tiền = Số lượng x Đơn giá (Nhưng tính sai kết quả)",
        category: MutationCategory::Logic,
    },
    MutationDef {
        code: MutationCode::E10,
        name: "Mâu thuẫn điều khoản (Conflicting Terms)",
        description: "Đầu trang ghi 'Thanh toán ngay', cuối trang ghi 'Net 30'",
        category: MutationCategory::Content,
    },
    MutationDef {
        code: MutationCode::E15,
        name: "Vỡ bảng (Table Degradation)",
        description: "Biến các hàng trong bảng thành văn bản dạng liệt kê",
        category: MutationCategory::Formatting,
    },
    MutationDef {
        code: MutationCode::E20,
        name: "Bố cục lộn xộn (Layout Chaos)",
        description: "Chèn ngắt trang ngẫu nhiên vào giữa bảng giá trị",
        category: MutationCategory::Formatting,
    },
    MutationDef {
        code: MutationCode::E21,
        name: "Thanh toán nhiều giai đoạn (Multi-phase Payment)",
        description: "Chia nhỏ thanh toán thành 2-6 đợt (P1..Pn) với điều kiện cụ thể",
        category: MutationCategory::Content,
    },
];

/// Catalog grouped by category, preserving catalog order within each group
pub fn group_by_category() -> BTreeMap<MutationCategory, Vec<&'static MutationDef>> {
    let mut groups: BTreeMap<MutationCategory, Vec<&'static MutationDef>> = BTreeMap::new();
    for def in MUTATIONS {
        groups.entry(def.category).or_default().push(def);
    }
    groups
}

/// Flip `code` in the active set: remove it when present, append it otherwise
pub fn toggle(code: MutationCode, active: &[MutationCode]) -> Vec<MutationCode> {
    if active.contains(&code) {
        active.iter().copied().filter(|c| *c != code).collect()
    } else {
        let mut next = active.to_vec();
        next.push(code);
        next
    }
}
