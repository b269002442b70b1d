use crate::catalog::{AnswerKind, Question};
use crate::domain::AnswerValue;
use crate::error::ValidationError;

/// Points a single answer earns out of `weight`.
pub(crate) fn points(
    question: &Question,
    value: &AnswerValue,
    weight: f64,
) -> Result<f64, ValidationError> {
    match (&question.kind, value) {
        (AnswerKind::Ranged { min, max }, AnswerValue::Number(raw)) => {
            if !raw.is_finite() || raw < min || raw > max {
                return Err(ValidationError::OutOfRange {
                    question_id: question.id.clone(),
                    value: *raw,
                    min: *min,
                    max: *max,
                });
            }
            Ok((raw - min) / (max - min) * weight)
        }
        (AnswerKind::Select { options }, AnswerValue::Choice(choice)) => options
            .iter()
            .find(|option| option.value == *choice)
            .map(|option| option.score * weight)
            .ok_or_else(|| ValidationError::UnknownOption {
                question_id: question.id.clone(),
                value: choice.clone(),
            }),
        (kind, _) => Err(ValidationError::KindMismatch {
            question_id: question.id.clone(),
            expected: kind.expected(),
        }),
    }
}
