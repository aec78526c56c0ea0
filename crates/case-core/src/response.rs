//! Parsing of the delimited case response
//!
//! A response carries one case as tagged blocks:
//!
//! ```text
//! ---CASE_START---
//! case_id: 2025/3/HĐDV-EON
//! ---VARS_JSON---
//! {...}
//! ---END VARS_JSON---
//! ...
//! ---END OF CASE---
//! ```
//!
//! Blocks may be missing; JSON blocks then default to empty values. A
//! block that is present but not valid JSON is an error.

use crate::error::CaseError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared_types::ContractData;
use synth_data::{parse_external_value, ReconcileOptions};
use tracing::{debug, warn};

const CASE_START: &str = "---CASE_START---";

/// `(name, start tag, end tag)` of every delimited block
const VARS: (&str, &str, &str) = ("VARS_JSON", "---VARS_JSON---", "---END VARS_JSON---");
const TRUTH: (&str, &str, &str) = (
    "TRUTH_INTENDED_JSON",
    "---TRUTH_INTENDED_JSON---",
    "---END TRUTH_INTENDED_JSON---",
);
const ANOMALIES: (&str, &str, &str) = (
    "TEXT_OBSERVED_ANOMALIES_JSON",
    "---TEXT_OBSERVED_ANOMALIES_JSON---",
    "---END TEXT_OBSERVED_ANOMALIES_JSON---",
);
const OBSERVED: (&str, &str, &str) = (
    "OBSERVED_TEXT_MD",
    "---OBSERVED_TEXT_MD---",
    "---END OBSERVED_TEXT_MD---",
);
const PASS_CRITERIA: (&str, &str, &str) = (
    "PASS_CRITERIA",
    "---PASS_CRITERIA---",
    "---END PASS_CRITERIA---",
);

/// One defect the generator reports having injected
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Anomaly {
    pub code: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedCase {
    pub case_id: String,
    pub vars_json: Value,
    pub truth_intended_json: Value,
    pub anomalies: Vec<Anomaly>,
    pub observed_text: String,
    pub pass_criteria: Vec<String>,
}

impl ParsedCase {
    /// The ground-truth record, decoded leniently and reconciled
    pub fn truth_contract(&self, options: &ReconcileOptions) -> Result<ContractData, CaseError> {
        Ok(parse_external_value(&self.truth_intended_json, options)?)
    }

    /// The variables the case was generated from, decoded leniently and reconciled
    pub fn vars_contract(&self, options: &ReconcileOptions) -> Result<ContractData, CaseError> {
        Ok(parse_external_value(&self.vars_json, options)?)
    }
}

pub fn parse_case_response(text: &str) -> Result<ParsedCase, CaseError> {
    let vars_json = json_block(text, VARS)?.unwrap_or_else(empty_object);
    let truth_intended_json = json_block(text, TRUTH)?.unwrap_or_else(empty_object);
    let anomalies = match json_block(text, ANOMALIES)? {
        Some(value) => anomalies_from(value)?,
        None => Vec::new(),
    };
    let observed_text = extract_block(text, OBSERVED.1, OBSERVED.2)
        .unwrap_or_default()
        .to_string();
    if observed_text.is_empty() {
        warn!("case response has no observed text block");
    }
    let pass_criteria = extract_block(text, PASS_CRITERIA.1, PASS_CRITERIA.2)
        .map(criteria_lines)
        .unwrap_or_default();

    let case_id = declared_case_id(text)
        .unwrap_or_else(|| fallback_case_id(&vars_json, &truth_intended_json));

    debug!(
        case_id = %case_id,
        anomalies = anomalies.len(),
        pass_criteria = pass_criteria.len(),
        "parsed case response"
    );

    Ok(ParsedCase {
        case_id,
        vars_json,
        truth_intended_json,
        anomalies,
        observed_text,
        pass_criteria,
    })
}

/// Trimmed text between `start` and the next `end` after it
fn extract_block<'a>(text: &'a str, start: &str, end: &str) -> Option<&'a str> {
    let from = text.find(start)? + start.len();
    let len = text[from..].find(end)?;
    Some(text[from..from + len].trim())
}

fn json_block(text: &str, (name, start, end): (&'static str, &str, &str)) -> Result<Option<Value>, CaseError> {
    let Some(body) = extract_block(text, start, end) else {
        return Ok(None);
    };
    let body = strip_code_fence(body);
    if body.is_empty() {
        return Ok(None);
    }
    serde_json::from_str(body)
        .map(Some)
        .map_err(|source| CaseError::InvalidJson { block: name, source })
}

/// Generators sometimes wrap a block in a Markdown code fence
fn strip_code_fence(body: &str) -> &str {
    let Some(rest) = body.strip_prefix("```") else {
        return body;
    };
    // drop the info string (`json`) on the opening fence line
    let rest = rest.split_once('\n').map_or("", |(_, rest)| rest);
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

/// `{"anomalies": [...]}` or a bare array
fn anomalies_from(value: Value) -> Result<Vec<Anomaly>, CaseError> {
    let list = match value {
        list @ Value::Array(_) => list,
        Value::Object(mut object) => match object.remove("anomalies") {
            Some(list @ Value::Array(_)) => list,
            _ => Value::Array(Vec::new()),
        },
        _ => Value::Array(Vec::new()),
    };
    serde_json::from_value(list).map_err(|source| CaseError::InvalidJson {
        block: ANOMALIES.0,
        source,
    })
}

fn criteria_lines(block: &str) -> Vec<String> {
    block
        .lines()
        .map(str::trim)
        .filter_map(|line| line.strip_prefix('-'))
        .map(|line| line.trim().to_string())
        .collect()
}

/// First non-empty line after the start tag, without its `case_id:` label
fn declared_case_id(text: &str) -> Option<String> {
    let from = text.find(CASE_START)? + CASE_START.len();
    let line = text[from..].lines().map(str::trim).find(|line| !line.is_empty())?;
    if line.starts_with("---") {
        return None;
    }
    let id = line.strip_prefix("case_id:").unwrap_or(line).trim();
    (!id.is_empty()).then(|| id.to_string())
}

fn fallback_case_id(vars: &Value, truth: &Value) -> String {
    [vars, truth]
        .iter()
        .find_map(|value| value["contractNumber"].as_str().filter(|n| !n.is_empty()))
        .map_or_else(|| "CASE-UNKNOWN".to_string(), |number| format!("CASE-{number}"))
}

fn empty_object() -> Value {
    Value::Object(Default::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    const RESPONSE: &str = r#"Đây là case:
---CASE_START---
case_id: 2025/3/HĐDV-EON
---VARS_JSON---
{"contractNumber": "2025/3/HĐDV-EON", "totalAmount": 45000000}
---END VARS_JSON---
---TRUTH_INTENDED_JSON---
```json
{"contractNumber": "2025/3/HĐDV-EON", "items": [{"description": "x", "qty": 3, "rate": 15000000}]}
```
---END TRUTH_INTENDED_JSON---
---TEXT_OBSERVED_ANOMALIES_JSON---
{ "anomalies": [ { "code": "E01", "description": "Ngày 01/02/2025" } ] }
---END TEXT_OBSERVED_ANOMALIES_JSON---
---OBSERVED_TEXT_MD---
*** DỮ LIỆU THỬ NGHIỆM TỔNG HỢP – KHÔNG CÓ GIÁ TRỊ PHÁP LÝ ***
CỘNG HÒA XÃ HỘI CHỦ NGHĨA VIỆT NAM
---END OBSERVED_TEXT_MD---
---PASS_CRITERIA---
- Kiểm tra số tiền tổng khớp với bảng chi tiết
ghi chú không phải tiêu chí
  - Ngày ký là 01/02/2025
---END PASS_CRITERIA---
---END OF CASE---
"#;

    #[test]
    fn test_full_response() {
        let case = parse_case_response(RESPONSE).unwrap();
        assert_eq!(case.case_id, "2025/3/HĐDV-EON");
        assert_eq!(case.vars_json["totalAmount"], json!(45000000));
        assert_eq!(case.truth_intended_json["items"][0]["qty"], json!(3));
        assert_eq!(
            case.anomalies,
            vec![Anomaly {
                code: "E01".to_string(),
                description: "Ngày 01/02/2025".to_string()
            }]
        );
        assert!(case.observed_text.starts_with("*** DỮ LIỆU"));
        assert!(case.observed_text.ends_with("VIỆT NAM"));
        assert_eq!(
            case.pass_criteria,
            vec![
                "Kiểm tra số tiền tổng khớp với bảng chi tiết",
                "Ngày ký là 01/02/2025"
            ]
        );
    }

    #[test]
    fn test_truth_contract_is_reconciled() {
        let case = parse_case_response(RESPONSE).unwrap();
        let truth = case.truth_contract(&ReconcileOptions::default()).unwrap();
        assert_eq!(truth.items[0].total, 45_000_000);
        assert_eq!(truth.total_amount, 45_000_000);
    }

    #[test]
    fn test_missing_blocks_default() {
        let case = parse_case_response("---OBSERVED_TEXT_MD---\nText\n---END OBSERVED_TEXT_MD---").unwrap();
        assert_eq!(case.vars_json, json!({}));
        assert_eq!(case.truth_intended_json, json!({}));
        assert!(case.anomalies.is_empty());
        assert!(case.pass_criteria.is_empty());
        assert_eq!(case.observed_text, "Text");
        assert_eq!(case.case_id, "CASE-UNKNOWN");
    }

    #[test]
    fn test_case_id_falls_back_to_contract_number() {
        let text = "---CASE_START---\n---VARS_JSON---\n{\"contractNumber\": \"12/HĐ\"}\n---END VARS_JSON---";
        assert_eq!(parse_case_response(text).unwrap().case_id, "CASE-12/HĐ");
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        let text = "---VARS_JSON---\n{ not json\n---END VARS_JSON---";
        match parse_case_response(text) {
            Err(CaseError::InvalidJson { block, .. }) => assert_eq!(block, "VARS_JSON"),
            other => panic!("expected invalid json, got {other:?}"),
        }
    }

    #[test]
    fn test_bare_anomaly_array() {
        let text = "---TEXT_OBSERVED_ANOMALIES_JSON---\n[{\"code\": \"E05\"}]\n---END TEXT_OBSERVED_ANOMALIES_JSON---";
        let case = parse_case_response(text).unwrap();
        assert_eq!(case.anomalies[0].code, "E05");
        assert_eq!(case.anomalies[0].description, "");
    }

    #[test]
    fn test_unterminated_block_is_missing() {
        let case = parse_case_response("---VARS_JSON---\n{\"a\": 1}").unwrap();
        assert_eq!(case.vars_json, json!({}));
    }

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("{\"a\":1}"), "{\"a\":1}");
    }
}
