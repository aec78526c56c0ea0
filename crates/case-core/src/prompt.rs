//! Prompts for the text generator
//!
//! The generator receives a fixed system instruction describing the output
//! protocol and one user message carrying the contract variables and the
//! requested mutations. Sending the request is left to the caller.

use crate::error::CaseError;
use serde::Serialize;
use shared_types::{ContractData, MutationCode};

pub const CONTRACT_TYPES: [&str; 3] = ["Hợp đồng dịch vụ", "Thỏa thuận hợp tác", "Đơn đặt hàng"];

pub const DEFAULT_LOCALE: &str = "vi_VN";

/// Sampling temperature sent with every chat request
pub const DEFAULT_TEMPERATURE: f32 = 0.2;

pub const SYSTEM_INSTRUCTION: &str = r#"Bạn là ContractSynth QA, một công cụ chuyên biệt để tạo DỮ LIỆU TỔNG HỢP (Synthetic Data) nhằm kiểm thử các hệ thống AI đọc hiểu tài liệu (OCR/Parser).
Nhiệm vụ của bạn là tạo ra các Hợp đồng dịch vụ tiếng Việt, mô phỏng theo cấu trúc thực tế nhưng có chứa các "Mutations" (Lỗi/Nhiễu) cụ thể theo yêu cầu.

### 1. AN TOÀN & TUÂN THỦ
- **PII:** CHỈ sử dụng thông tin từ `VARS_JSON` được cung cấp. KHÔNG bịa đặt thông tin cá nhân thật.
- **WATERMARK:** Bắt buộc bắt đầu văn bản `OBSERVED_TEXT` bằng: "*** DỮ LIỆU THỬ NGHIỆM TỔNG HỢP – KHÔNG CÓ GIÁ TRỊ PHÁP LÝ ***".
- **TỪ CHỐI:** Từ chối tạo văn bản giả mạo lừa đảo.

### 2. TÍNH XÁC ĐỊNH & KIỂM SOÁT
- **VARS_JSON:** Bạn sẽ nhận được JSON chứa biến đầu vào. Phải sử dụng CHÍNH XÁC các giá trị này (Tên công ty, MST, Số tiền).
- **TRUTH_INTENDED:** JSON này phản ánh logic ĐÚNG ĐẮN của hợp đồng (Toán học đúng, ngày tháng đúng).
- **OBSERVED_TEXT:** Văn bản này phản ánh các MUTATIONS (Lỗi) được yêu cầu. Ví dụ: Nếu Mutation là "Sai số học", văn bản phải hiển thị số sai, trong khi TRUTH vẫn chứa số đúng.

### 3. CẤU TRÚC HỢP ĐỒNG (MÔ PHỎNG PDF MẪU)
Hãy tạo văn bản Markdown mô phỏng cấu trúc sau:
1.  **Tiêu đề:** CỘNG HÒA XÃ HỘI CHỦ NGHĨA VIỆT NAM... HỢP ĐỒNG DỊCH VỤ Số: [Số HĐ].
2.  **Các bên:**
    *   BÊN A (Bên cung cấp): Tên, MST, Địa chỉ, Đại diện, Chức vụ, Tài khoản ngân hàng.
    *   BÊN B (Bên sử dụng): (Tương tự).
3.  **Xét rằng:** Mô tả ngắn gọn nhu cầu.
4.  **Điều 1: Phạm vi và thực hiện dịch vụ:** Mô tả chi tiết dịch vụ (lấy từ Items).
5.  **Điều 2: Phí dịch vụ, Đặt cọc, Thanh toán:**
    *   **Bảng giá:** STT | Nội dung | Đơn giá | Thành tiền.
    *   **BẮT BUỘC VAT:** Phải hiển thị rõ VAT trong bảng giá và phần tổng kết. Sử dụng VAT rate từ VARS_JSON (vatRate). Ví dụ: "VAT 10%", "Thuế GTGT: 8%", hoặc "VAT: 10%". Tính và hiển thị: Tổng cộng trước VAT, VAT (theo vatRate), và Tổng sau VAT.
    *   **LƯU Ý E21:** Nếu có mutation E21, phải tạo mục "Tiến độ thanh toán" chia thành nhiều đợt (P1, P2...) dựa trên paymentPhases trong VARS_JSON.
6.  **Điều 3:** Phạt vi phạm, bồi thường thiệt hại.
7.  **Điều 4:** Thời hạn và chấm dứt.
8.  **Điều 5:** Bảo mật thông tin.
9.  **Điều 6:** Điều khoản chung.
10. **Ký tên:** Đại diện Bên A và Bên B.

### 4. QUY TRÌNH
1. Đọc `VARS_JSON` và danh sách `MUTATIONS`.
2. Soạn thảo `OBSERVED_TEXT` (Tiếng Việt) và chèn lỗi E01-E21 nếu có.
   - Nếu E21 (Multi-phase) được kích hoạt: Văn bản phải thể hiện bảng/danh sách các đợt thanh toán thay vì chỉ 1 dòng tổng. Tổng các đợt phải khớp tổng hợp đồng (trừ khi có lỗi E02/E06 khác can thiệp).
3. Tạo `TRUTH_INTENDED_JSON` (Dữ liệu sạch).
4. Tạo `TEXT_OBSERVED_ANOMALIES_JSON` (Danh sách lỗi đã chèn).

### 5. ĐỊNH DẠNG ĐẦU RA (NGHIÊM NGẶT)
Trả về các khối dữ liệu theo đúng định dạng sau:

---CASE_START---
case_id: {{CONTRACT_NUMBER}}
---VARS_JSON---
{...}
---END VARS_JSON---
---TRUTH_INTENDED_JSON---
{...}
---END TRUTH_INTENDED_JSON---
---TEXT_OBSERVED_ANOMALIES_JSON---
{ "anomalies": [ { "code": "E01", "description": "..." } ] }
---END TEXT_OBSERVED_ANOMALIES_JSON---
---OBSERVED_TEXT_MD---
*** DỮ LIỆU THỬ NGHIỆM TỔNG HỢP – KHÔNG CÓ GIÁ TRỊ PHÁP LÝ ***
CỘNG HÒA XÃ HỘI CHỦ NGHĨA VIỆT NAM
...
---END OBSERVED_TEXT_MD---
---PASS_CRITERIA---
- Kiểm tra số tiền tổng khớp với bảng chi tiết
...
---END PASS_CRITERIA---
---END OF CASE---
"#;

/// Everything the user prompt is built from
#[derive(Debug, Clone)]
pub struct CaseRequest<'a> {
    pub contract_type: String,
    pub locale: String,
    pub data: &'a ContractData,
    pub mutations: Vec<MutationCode>,
}

impl<'a> CaseRequest<'a> {
    /// Service contract in the default locale with no mutations
    pub fn new(data: &'a ContractData) -> Self {
        Self {
            contract_type: CONTRACT_TYPES[0].to_string(),
            locale: DEFAULT_LOCALE.to_string(),
            data,
            mutations: Vec::new(),
        }
    }

    pub fn with_mutations(mut self, mutations: Vec<MutationCode>) -> Self {
        self.mutations = mutations;
        self
    }
}

/// One `- CODE: name (description)` line per mutation, or the clean-case
/// marker when none is requested
pub fn mutation_details(mutations: &[MutationCode]) -> String {
    if mutations.is_empty() {
        return "Không có (Clean Case)".to_string();
    }
    mutations
        .iter()
        .map(|code| code.def().describe())
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn build_user_prompt(request: &CaseRequest<'_>) -> Result<String, CaseError> {
    let vars = serde_json::to_string_pretty(request.data)?;
    Ok(format!(
        "TẠO CASE MỚI:\n\
         Loại hợp đồng: {}\n\
         Khu vực: {} (Việt Nam)\n\
         Số hợp đồng: {}\n\
         \n\
         DỮ LIỆU ĐẦU VÀO (VARS_JSON - Nguồn sự thật):\n\
         {}\n\
         \n\
         YÊU CẦU MUTATIONS (Áp dụng các lỗi sau vào văn bản OBSERVED_TEXT):\n\
         {}\n\
         \n\
         Thực hiện ngay.\n",
        request.contract_type,
        request.locale,
        request.data.contract_number,
        vars,
        mutation_details(&request.mutations)
    ))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: String,
}

/// Body of a chat-completions request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
}

pub fn build_chat_request(model: &str, request: &CaseRequest<'_>) -> Result<ChatRequest, CaseError> {
    Ok(ChatRequest {
        model: model.to_string(),
        messages: vec![
            ChatMessage {
                role: "system",
                content: SYSTEM_INSTRUCTION.to_string(),
            },
            ChatMessage {
                role: "user",
                content: build_user_prompt(request)?,
            },
        ],
        temperature: DEFAULT_TEMPERATURE,
    })
}
