//! Extractive question answering over a caller-supplied context.

use super::types::{DigestError, QA_INPUT_MESSAGE, QaResult};
use crate::models::QuestionAnsweringModel;

/// Answer `question` from `context` with a single model call.
///
/// Both inputs must be non-empty. The context is passed through untouched, so
/// a context beyond the model's window surfaces as a model error.
pub async fn answer_question(
    model: &dyn QuestionAnsweringModel,
    context: &str,
    question: &str,
) -> Result<QaResult, DigestError> {
    if context.is_empty() || question.is_empty() {
        return Err(DigestError::InvalidArgument(QA_INPUT_MESSAGE.into()));
    }

    let answer = model.answer(context, question).await?;
    Ok(QaResult {
        answer: answer.text,
        score: answer.score,
        start: answer.start,
        end: answer.end,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ModelError;
    use crate::pipeline::test_support::StubAnswerer;

    #[tokio::test]
    async fn answers_with_span_from_context() {
        let result = answer_question(
            &StubAnswerer,
            "The sky is blue because of Rayleigh scattering.",
            "Why is the sky blue?",
        )
        .await
        .expect("answer");

        assert!(result.answer.contains("Rayleigh scattering"));
    }

    #[tokio::test]
    async fn rejects_missing_context_or_question() {
        for (context, question) in [("", "Why?"), ("Some context.", ""), ("", "")] {
            let error = answer_question(&StubAnswerer, context, question)
                .await
                .expect_err("invalid input");
            assert!(matches!(
                error,
                DigestError::InvalidArgument(ref message) if message == QA_INPUT_MESSAGE
            ));
        }
    }

    #[tokio::test]
    async fn whitespace_inputs_are_passed_to_the_model() {
        let result = answer_question(&StubAnswerer, "   ", " ")
            .await
            .expect("whitespace is still input");

        assert_eq!(result.answer, "   ");
    }

    #[tokio::test]
    async fn model_failure_is_surfaced() {
        let error = answer_question(&StubAnswerer, "FAIL context", "question")
            .await
            .expect_err("model failure");
        assert!(matches!(
            error,
            DigestError::ModelInference(ModelError::GenerationFailed(_))
        ));
    }
}
