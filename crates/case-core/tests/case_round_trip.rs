//! A generated contract survives the prompt / response protocol

use case_core::{build_user_prompt, parse_case_response, CaseRequest};
use pretty_assertions::assert_eq;
use shared_types::MutationCode;
use synth_data::{generate, ReconcileOptions};

fn response_for(vars: &str, truth: &str, observed: &str) -> String {
    format!(
        "---CASE_START---\ncase_id: TEST-1\n\
         ---VARS_JSON---\n{vars}\n---END VARS_JSON---\n\
         ---TRUTH_INTENDED_JSON---\n{truth}\n---END TRUTH_INTENDED_JSON---\n\
         ---TEXT_OBSERVED_ANOMALIES_JSON---\n{{\"anomalies\": []}}\n---END TEXT_OBSERVED_ANOMALIES_JSON---\n\
         ---OBSERVED_TEXT_MD---\n{observed}\n---END OBSERVED_TEXT_MD---\n\
         ---PASS_CRITERIA---\n- Tổng khớp\n---END PASS_CRITERIA---\n---END OF CASE---\n"
    )
}

#[test]
fn generated_contract_round_trips_through_response() {
    let data = generate(12345);
    let json = serde_json::to_string_pretty(&data).unwrap();

    let prompt = build_user_prompt(
        &CaseRequest::new(&data).with_mutations(vec![MutationCode::E21]),
    )
    .unwrap();
    assert!(prompt.contains(&data.contract_number));
    assert!(prompt.contains(&json));

    let case = parse_case_response(&response_for(&json, &json, "Nội dung")).unwrap();
    assert_eq!(case.case_id, "TEST-1");
    assert_eq!(case.pass_criteria, vec!["Tổng khớp"]);

    let options = ReconcileOptions::default();
    assert_eq!(case.vars_contract(&options).unwrap(), data);
    assert_eq!(case.truth_contract(&options).unwrap(), data);
}

#[test]
fn drifting_truth_is_reconciled() {
    let data = generate(99);
    let mut truth = serde_json::to_value(&data).unwrap();
    truth["totalAmount"] = serde_json::json!(1);
    truth["paymentPhases"][0]["amount"] = serde_json::json!(0);

    let case = parse_case_response(&response_for("{}", &truth.to_string(), "x")).unwrap();
    let fixed = case.truth_contract(&ReconcileOptions::default()).unwrap();
    assert_eq!(fixed.total_amount, data.total_amount);
    assert_eq!(fixed.phases_total(), data.total_amount);
}
