use std::path::PathBuf;
use std::sync::Arc;

use tier_engine::access::{decide_view, ViewDecision, ViewRequest};
use tier_engine::grade::BANDS;
use tier_engine::{Answer, Evaluation};

use crate::batch;
use crate::cli::{AccessArgs, BatchArgs, EvaluateArgs};
use crate::config::{AppConfig, ScoringConfig};
use crate::error::AppError;
use crate::infra::{build_service, load_plans, TierService};

fn service_with(weights: Option<PathBuf>) -> Result<Arc<TierService>, AppError> {
    let config = AppConfig::load()?;
    let scoring = ScoringConfig {
        weights_path: weights.or(config.scoring.weights_path),
        ..config.scoring
    };
    build_service(&scoring)
}

pub(crate) fn run_evaluate(args: EvaluateArgs) -> Result<(), AppError> {
    let EvaluateArgs {
        gender,
        answers,
        weights,
    } = args;

    let service = service_with(weights)?;
    let raw = std::fs::read_to_string(answers)?;
    let answers: Vec<Answer> = serde_json::from_str(&raw)?;
    let evaluation = service.evaluate(gender, &answers)?;

    for line in evaluation_lines(&evaluation) {
        println!("{line}");
    }
    Ok(())
}

pub(crate) fn run_batch(args: BatchArgs) -> Result<(), AppError> {
    let service = service_with(args.weights)?;
    let submissions = batch::read_path(&args.csv)?;

    println!("Batch evaluation of {} users", submissions.len());
    let mut failed = 0usize;
    for submission in &submissions {
        match service.evaluate(submission.gender, &submission.answers) {
            Ok(evaluation) => println!(
                "- {} ({}): {} {} at percentile {:.1}",
                submission.user_id,
                submission.gender,
                evaluation.grade.label,
                evaluation.grade.code,
                evaluation.percentile.value
            ),
            Err(err) => {
                failed += 1;
                println!("- {} ({}): rejected, {}", submission.user_id, submission.gender, err);
            }
        }
    }
    println!(
        "\n{} evaluated, {} rejected",
        submissions.len() - failed,
        failed
    );
    Ok(())
}

pub(crate) fn run_tiers() {
    println!("Percentile bands (top share of the population)");
    for line in band_lines() {
        println!("{line}");
    }
}

pub(crate) fn run_access(args: AccessArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let plans = load_plans(config.scoring.plans_path.as_deref())?;
    let decision = decide_view(
        &ViewRequest {
            viewer_tier: args.viewer_tier,
            target_tier: args.target_tier,
            plan_id: args.plan,
            views_today: args.views,
        },
        &plans,
    );

    println!("{}", decision_line(&decision));
    Ok(())
}

fn evaluation_lines(evaluation: &Evaluation) -> Vec<String> {
    let breakdown = &evaluation.breakdown;
    let mut lines = vec![
        format!(
            "Evaluation ({} questionnaire, weights {})",
            breakdown.gender, breakdown.weight_version
        ),
        String::new(),
        "Category totals".to_string(),
    ];
    lines.extend(
        breakdown
            .categories
            .entries()
            .iter()
            .map(|(category, total)| format!("- {category}: {total:.1}/100")),
    );
    lines.push(format!(
        "\nAggregate {:.1}/100 (normalized {:.2})",
        breakdown.aggregate,
        breakdown.normalized()
    ));
    lines.push(format!(
        "Percentile {:.1}: {} ({}), {}",
        evaluation.percentile.value,
        evaluation.grade.label,
        evaluation.grade.code,
        evaluation.grade.description
    ));
    lines
}

fn band_lines() -> Vec<String> {
    BANDS
        .iter()
        .map(|band| {
            let profile = band.tier.profile();
            let bound = match band.upper_bound {
                Some(bound) => format!("<= {bound}%"),
                None => "remainder".to_string(),
            };
            format!("- {:<9} {:<4} {}", profile.label, profile.code, bound)
        })
        .collect()
}

fn decision_line(decision: &ViewDecision) -> String {
    let verdict = match &decision.reason {
        Some(reason) => reason.summary(),
        None => "view granted".to_string(),
    };
    match decision.remaining {
        Some(remaining) => format!("{verdict} (remaining today: {remaining})"),
        None => verdict,
    }
}
