//! End-to-end scenarios through the public API: JSON catalog and weight configuration in,
//! evaluation and access decisions out.

mod common {
    use std::sync::{Arc, Mutex};

    use tier_engine::{QuestionCatalog, StoreError, WeightTable, WeightTableStore};

    pub(super) const CATALOG: &str = r#"[
        {"id": "economic.income", "category": "economic", "applies_to": "male",
         "required": true, "kind": "ranged", "min": 0, "max": 300},
        {"id": "economic.assets", "category": "economic", "applies_to": "male",
         "kind": "select", "options": [
            {"value": "none", "score": 0.0},
            {"value": "modest", "score": 0.5},
            {"value": "substantial", "score": 1.0}]},
        {"id": "physical.fitness", "category": "physical", "applies_to": "both",
         "required": true, "kind": "select", "options": [
            {"value": "rarely", "score": 0.0},
            {"value": "weekly", "score": 0.5},
            {"value": "daily", "score": 1.0}]},
        {"id": "personality.warmth", "category": "personality", "applies_to": "both",
         "required": true, "kind": "ranged", "min": 1, "max": 10},
        {"id": "values.family", "category": "values", "applies_to": "female",
         "required": true, "kind": "ranged", "min": 1, "max": 10}
    ]"#;

    pub(super) fn weights(version: &str) -> String {
        format!(
            r#"{{
                "version": "{version}",
                "male": {{
                    "categories": {{
                        "economic": {{"economic.income": 70, "economic.assets": 30}},
                        "physical": {{"physical.fitness": 100}},
                        "personality": {{"personality.warmth": 100}}
                    }},
                    "combination": {{"economic": 0.4, "physical": 0.3, "personality": 0.3}}
                }},
                "female": {{
                    "categories": {{
                        "physical": {{"physical.fitness": 100}},
                        "personality": {{"personality.warmth": 100}},
                        "values": {{"values.family": 100}}
                    }}
                }}
            }}"#
        )
    }

    pub(super) fn catalog() -> Arc<QuestionCatalog> {
        Arc::new(QuestionCatalog::from_json(CATALOG).expect("catalog parses"))
    }

    #[derive(Default)]
    pub(super) struct SwapStore {
        active: Mutex<Option<Arc<WeightTable>>>,
    }

    impl WeightTableStore for SwapStore {
        fn active(&self) -> Result<Option<Arc<WeightTable>>, StoreError> {
            Ok(self.active.lock().expect("store mutex poisoned").clone())
        }

        fn activate(&self, table: WeightTable) -> Result<Option<String>, StoreError> {
            let previous = self
                .active
                .lock()
                .expect("store mutex poisoned")
                .replace(Arc::new(table));
            Ok(previous.map(|table| table.version().to_string()))
        }
    }
}

use std::sync::Arc;

use common::*;
use tier_engine::access::{
    can_access_tier, check_daily_limit, decide_view, PlanCatalog, ViewAllowance, ViewRequest,
};
use tier_engine::{
    Answer, EvaluationError, EvaluationService, Gender, PercentileModel, Tier, ValidationError,
    WeightDocument,
};

fn service() -> EvaluationService<tier_engine::QuestionCatalog, SwapStore> {
    let service = EvaluationService::new(
        catalog(),
        Arc::new(SwapStore::default()),
        PercentileModel::default(),
    );
    service
        .activate_weights(WeightDocument::from_json(&weights("2026-10")).expect("weights parse"))
        .expect("weights activate");
    service
}

#[test]
fn female_evaluation_uses_equal_combination_by_default() {
    let service = service();
    let answers = vec![
        Answer::choice("physical.fitness", "weekly"),
        Answer::number("personality.warmth", 5.5),
        Answer::number("values.family", 5.5),
    ];

    let evaluation = service
        .evaluate(Gender::Female, &answers)
        .expect("evaluation succeeds");

    assert!((evaluation.breakdown.aggregate - 50.0).abs() < 1e-9);
    assert_eq!(evaluation.percentile.value, 50.0);
    assert_eq!(evaluation.tier(), Tier::Gold);
    assert_eq!(evaluation.breakdown.weight_version, "2026-10");
}

#[test]
fn male_evaluation_honours_configured_combination() {
    let service = service();
    let answers = vec![
        Answer::number("economic.income", 300.0),
        Answer::choice("economic.assets", "substantial"),
        Answer::choice("physical.fitness", "rarely"),
        Answer::number("personality.warmth", 1.0),
    ];

    let evaluation = service
        .evaluate(Gender::Male, &answers)
        .expect("evaluation succeeds");

    // Economic 100 at 0.4, the rest zero.
    assert!((evaluation.breakdown.aggregate - 40.0).abs() < 1e-9);
    assert!(evaluation.percentile.value > 50.0);
    assert!(evaluation.tier() < Tier::Gold);
}

#[test]
fn invalid_choice_surfaces_validation_error() {
    let service = service();
    let answers = vec![
        Answer::number("economic.income", 120.0),
        Answer::choice("physical.fitness", "hourly"),
        Answer::number("personality.warmth", 6.0),
    ];

    match service.evaluate(Gender::Male, &answers) {
        Err(EvaluationError::Validation(ValidationError::UnknownOption { value, .. })) => {
            assert_eq!(value, "hourly");
        }
        other => panic!("expected unknown option, got {other:?}"),
    }
}

#[test]
fn evaluation_json_carries_tier_metadata() {
    let service = service();
    let answers = vec![
        Answer::choice("physical.fitness", "daily"),
        Answer::number("personality.warmth", 10.0),
        Answer::number("values.family", 10.0),
    ];

    let evaluation = service
        .evaluate(Gender::Female, &answers)
        .expect("evaluation succeeds");
    let json = serde_json::to_value(&evaluation).expect("serializes");

    assert_eq!(json["grade"]["label"], evaluation.grade.label);
    assert_eq!(json["breakdown"]["categories"]["values"], 100.0);
    assert!(json["breakdown"]["categories"].get("economic").is_none());
}

#[test]
fn viewer_tier_from_evaluation_gates_profile_views() {
    let service = service();
    let answers = vec![
        Answer::choice("physical.fitness", "weekly"),
        Answer::number("personality.warmth", 5.5),
        Answer::number("values.family", 5.5),
    ];
    let viewer = service
        .evaluate(Gender::Female, &answers)
        .expect("evaluation succeeds")
        .tier();
    let plans = PlanCatalog::standard();
    let free = plans.get("free").expect("free plan");
    let premium = plans.get("premium").expect("premium plan");

    assert!(!can_access_tier(viewer.label(), "Diamond", free).is_granted());
    assert!(can_access_tier(viewer.label(), "Diamond", premium).is_granted());
    assert!(can_access_tier(viewer.label(), "Silver", free).is_granted());

    let exhausted = check_daily_limit(30, free);
    assert!(!exhausted.allowed);
    assert_eq!(exhausted.remaining, ViewAllowance::Limited(0));

    let request = ViewRequest {
        viewer_tier: viewer.label().to_string(),
        target_tier: "Bronze".to_string(),
        plan_id: "free".to_string(),
        views_today: 3,
    };
    let decision = decide_view(&request, &plans);
    assert!(decision.allowed);
    assert_eq!(decision.remaining, Some(ViewAllowance::Limited(27)));
}
