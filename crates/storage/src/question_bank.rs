use std::fs;
use std::path::Path;

use quiz_core::model::QuestionBank;

use crate::record::QuestionRecord;
use crate::repository::StorageError;

/// One-time load of the question bank file.
///
/// Unlike the stats and practice blobs there is no default fallback here: a
/// missing, malformed, or empty bank is fatal, since no session can start
/// without questions.
///
/// # Errors
///
/// Returns `StorageError::Io` when the file cannot be read,
/// `StorageError::Serialization` when it is not valid JSON, and
/// `StorageError::InvalidQuestionFile` when it is empty or contains a
/// malformed question.
pub fn load_question_bank(path: impl AsRef<Path>) -> Result<QuestionBank, StorageError> {
    let raw = fs::read_to_string(path)?;
    let records: Vec<QuestionRecord> =
        serde_json::from_str(&raw).map_err(|e| StorageError::Serialization(e.to_string()))?;

    let mut questions = Vec::with_capacity(records.len());
    for (index, record) in records.into_iter().enumerate() {
        let question = record.into_question().map_err(|err| {
            StorageError::InvalidQuestionFile(format!("question {index}: {err}"))
        })?;
        questions.push(question);
    }

    if questions.is_empty() {
        return Err(StorageError::InvalidQuestionFile(
            "bank contains no questions".into(),
        ));
    }

    Ok(QuestionBank::new(questions))
}
