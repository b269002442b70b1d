use std::collections::HashMap;
use std::fmt;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tier_engine::{Answer, AnswerValue, Gender, QuestionId, UserId};

/// One user's answers gathered from a CSV export.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Submission {
    pub(crate) user_id: UserId,
    pub(crate) gender: Gender,
    pub(crate) answers: Vec<Answer>,
}

#[derive(Debug)]
pub enum ImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    EmptyField { row: usize, field: &'static str },
    InvalidGender { row: usize, value: String },
    MixedGender { row: usize, user_id: String },
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportError::Io(err) => write!(f, "failed to read answer export: {}", err),
            ImportError::Csv(err) => write!(f, "invalid answer CSV data: {}", err),
            ImportError::EmptyField { row, field } => {
                write!(f, "row {row}: column '{field}' is empty")
            }
            ImportError::InvalidGender { row, value } => {
                write!(f, "row {row}: '{value}' is not a recognised gender")
            }
            ImportError::MixedGender { row, user_id } => write!(
                f,
                "row {row}: user '{user_id}' was already imported with a different gender"
            ),
        }
    }
}

impl std::error::Error for ImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ImportError::Io(err) => Some(err),
            ImportError::Csv(err) => Some(err),
            ImportError::EmptyField { .. }
            | ImportError::InvalidGender { .. }
            | ImportError::MixedGender { .. } => None,
        }
    }
}

impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

#[derive(Debug, Deserialize)]
struct AnswerRow {
    user_id: String,
    gender: String,
    question_id: String,
    value: String,
}

pub(crate) fn read_path<P: AsRef<Path>>(path: P) -> Result<Vec<Submission>, ImportError> {
    let file = std::fs::File::open(path)?;
    read_submissions(file)
}

/// Group `user_id,gender,question_id,value` rows by user, keeping first-seen order.
/// Rows are numbered from 1, excluding the header.
pub(crate) fn read_submissions<R: Read>(reader: R) -> Result<Vec<Submission>, ImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut submissions: Vec<Submission> = Vec::new();
    let mut positions: HashMap<UserId, usize> = HashMap::new();

    for (index, record) in csv_reader.deserialize::<AnswerRow>().enumerate() {
        let row_number = index + 1;
        let row = record?;

        if row.user_id.is_empty() {
            return Err(ImportError::EmptyField {
                row: row_number,
                field: "user_id",
            });
        }
        if row.question_id.is_empty() {
            return Err(ImportError::EmptyField {
                row: row_number,
                field: "question_id",
            });
        }
        let gender: Gender = row.gender.parse().map_err(|_| ImportError::InvalidGender {
            row: row_number,
            value: row.gender.clone(),
        })?;

        let user_id = UserId(row.user_id);
        let answer = Answer {
            question_id: QuestionId(row.question_id),
            value: answer_value(row.value),
        };

        match positions.get(&user_id) {
            Some(&position) => {
                let submission = &mut submissions[position];
                if submission.gender != gender {
                    return Err(ImportError::MixedGender {
                        row: row_number,
                        user_id: user_id.0,
                    });
                }
                submission.answers.push(answer);
            }
            None => {
                positions.insert(user_id.clone(), submissions.len());
                submissions.push(Submission {
                    user_id,
                    gender,
                    answers: vec![answer],
                });
            }
        }
    }

    Ok(submissions)
}

fn answer_value(raw: String) -> AnswerValue {
    match raw.parse::<f64>() {
        Ok(number) if number.is_finite() => AnswerValue::Number(number),
        _ => AnswerValue::Choice(raw),
    }
}
