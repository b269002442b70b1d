use super::common::*;
use crate::domain::{Answer, Category, Gender, QuestionId};
use crate::error::{ConfigurationError, EvaluationError, ValidationError};
use crate::scoring::{CategoryTotals, ScoreCalculator};
use crate::weights::WeightDocument;
use crate::WeightTable;

#[test]
fn midpoint_answers_score_fifty_in_every_category() {
    let questions = male_questions();
    let breakdown = ScoreCalculator::new(&questions)
        .calculate(&midpoint_male_answers(), &weight_table("v1"))
        .expect("answers score");

    match breakdown.categories {
        CategoryTotals::Male(totals) => {
            assert_eq!(totals.economic, 50.0);
            assert_eq!(totals.physical, 50.0);
            assert_eq!(totals.personality, 50.0);
        }
        other => panic!("expected male totals, got {other:?}"),
    }
    assert!((breakdown.aggregate - 50.0).abs() < 1e-9);
    assert_eq!(breakdown.weight_version, "v1");
}

#[test]
fn female_answers_produce_female_shape() {
    let questions = catalog().for_gender(Gender::Female);
    let breakdown = ScoreCalculator::new(&questions)
        .calculate(&female_answers(), &weight_table("v1"))
        .expect("answers score");

    assert_eq!(breakdown.gender, Gender::Female);
    assert_eq!(breakdown.categories.get(Category::Values), Some(100.0));
    assert_eq!(breakdown.categories.get(Category::Economic), None);
    assert!((breakdown.aggregate - 100.0).abs() < 1e-9);
}

#[test]
fn repeated_calculation_is_bit_identical() {
    let questions = male_questions();
    let table = weight_table("v1");
    let calculator = ScoreCalculator::new(&questions);

    let first = calculator
        .calculate(&strong_male_answers(), &table)
        .expect("answers score");
    for _ in 0..16 {
        let again = calculator
            .calculate(&strong_male_answers(), &table)
            .expect("answers score");
        assert_eq!(again.aggregate.to_bits(), first.aggregate.to_bits());
        assert_eq!(again, first);
    }
}

#[test]
fn duplicate_answers_keep_the_last_value() {
    let questions = male_questions();
    let mut answers = midpoint_male_answers();
    answers.push(Answer::number("personality.humor", 10.0));

    let breakdown = ScoreCalculator::new(&questions)
        .calculate(&answers, &weight_table("v1"))
        .expect("answers score");

    assert_eq!(breakdown.categories.get(Category::Personality), Some(100.0));
}

#[test]
fn missing_required_answer_is_a_validation_error() {
    let questions = male_questions();
    let answers: Vec<Answer> = midpoint_male_answers()
        .into_iter()
        .filter(|answer| answer.question_id.as_str() != "physical.height")
        .collect();

    let err = ScoreCalculator::new(&questions)
        .calculate(&answers, &weight_table("v1"))
        .expect_err("height is required");

    assert_eq!(
        err,
        EvaluationError::Validation(ValidationError::MissingRequired {
            question_id: QuestionId::from("physical.height"),
        })
    );
}

#[test]
fn optional_questions_may_be_skipped() {
    let questions = male_questions();
    let answers: Vec<Answer> = midpoint_male_answers()
        .into_iter()
        .filter(|answer| answer.question_id.as_str() != "economic.education")
        .collect();

    let breakdown = ScoreCalculator::new(&questions)
        .calculate(&answers, &weight_table("v1"))
        .expect("education is optional");

    assert_eq!(breakdown.categories.get(Category::Economic), Some(30.0));
}

#[test]
fn out_of_bounds_answer_is_rejected() {
    let questions = male_questions();
    let mut answers = midpoint_male_answers();
    answers.push(Answer::number("physical.height", 230.0));

    let err = ScoreCalculator::new(&questions)
        .calculate(&answers, &weight_table("v1"))
        .expect_err("230cm is outside the declared bounds");

    assert!(matches!(
        err,
        EvaluationError::Validation(ValidationError::OutOfRange { value, .. }) if value == 230.0
    ));
}

#[test]
fn answers_to_other_gender_questions_are_rejected() {
    let questions = male_questions();
    let mut answers = midpoint_male_answers();
    answers.push(Answer::number("values.family", 4.0));

    let err = ScoreCalculator::new(&questions)
        .calculate(&answers, &weight_table("v1"))
        .expect_err("values questions are female-only");

    assert_eq!(
        err,
        EvaluationError::Validation(ValidationError::UnknownQuestion {
            question_id: QuestionId::from("values.family"),
            gender: Gender::Male,
        })
    );
}

#[test]
fn unweighted_catalog_question_is_a_configuration_error() {
    let mut document: WeightDocument = weight_document("v2");
    if let Some(male) = document.male.as_mut() {
        male.categories.insert(
            "physical".to_string(),
            [("physical.height".to_string(), 100.0)].into_iter().collect(),
        );
    }
    let table = WeightTable::try_from(document).expect("table still balanced");

    let questions = male_questions();
    let err = ScoreCalculator::new(&questions)
        .calculate(&midpoint_male_answers(), &table)
        .expect_err("fitness has no weight");

    assert_eq!(
        err,
        EvaluationError::Configuration(ConfigurationError::UnweightedQuestion {
            gender: Gender::Male,
            question_id: QuestionId::from("physical.fitness"),
        })
    );
}

#[test]
fn configured_combination_changes_the_aggregate() {
    let mut document = weight_document("weighted");
    if let Some(male) = document.male.as_mut() {
        male.combination = Some(
            [
                ("economic".to_string(), 0.5),
                ("physical".to_string(), 0.25),
                ("personality".to_string(), 0.25),
            ]
            .into_iter()
            .collect(),
        );
    }
    let table = WeightTable::try_from(document).expect("table validates");

    let mut answers = midpoint_male_answers();
    answers.push(Answer::number("economic.income", 200.0));
    answers.push(Answer::choice("economic.education", "graduate"));

    let questions = male_questions();
    let breakdown = ScoreCalculator::new(&questions)
        .calculate(&answers, &table)
        .expect("answers score");

    // 100 * 0.5 + 50 * 0.25 + 50 * 0.25
    assert!((breakdown.aggregate - 75.0).abs() < 1e-9);
}
