//! Case export for downstream test harnesses

use crate::error::ExportError;
use case_core::{Anomaly, ParsedCase};
use serde::Serialize;
use serde_json::Value;

/// The exported subset of a case; the observed text ships separately
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CaseExport<'a> {
    case_id: &'a str,
    vars_json: &'a Value,
    truth_intended_json: &'a Value,
    anomalies: &'a [Anomaly],
    pass_criteria: &'a [String],
}

pub fn case_json(case: &ParsedCase) -> Result<String, ExportError> {
    let export = CaseExport {
        case_id: &case.case_id,
        vars_json: &case.vars_json,
        truth_intended_json: &case.truth_intended_json,
        anomalies: &case.anomalies,
        pass_criteria: &case.pass_criteria,
    };
    Ok(serde_json::to_string_pretty(&export)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_case_json_fields() {
        let case = ParsedCase {
            case_id: "CASE-1".to_string(),
            vars_json: json!({"contractNumber": "1/HĐ"}),
            truth_intended_json: json!({}),
            anomalies: vec![Anomaly {
                code: "E01".to_string(),
                description: "Ngày".to_string(),
            }],
            observed_text: "Nội dung".to_string(),
            pass_criteria: vec!["Tổng khớp".to_string()],
        };
        let value: Value = serde_json::from_str(&case_json(&case).unwrap()).unwrap();
        assert_eq!(
            value,
            json!({
                "caseId": "CASE-1",
                "varsJson": {"contractNumber": "1/HĐ"},
                "truthIntendedJson": {},
                "anomalies": [{"code": "E01", "description": "Ngày"}],
                "passCriteria": ["Tổng khớp"]
            })
        );
    }
}
