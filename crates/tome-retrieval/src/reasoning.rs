//! Shared plumbing for reasoning-model calls: bounded retry and JSON
//! extraction from free-form completions.

use serde::de::DeserializeOwned;
use tracing::warn;

use tome_core::errors::{ReasoningError, TomeResult};
use tome_core::traits::{CompletionRequest, ICompletionModel};

/// Call the model, retrying exactly once on failure. There are no unbounded
/// retry loops anywhere in the pipeline.
pub fn complete_with_retry(
    model: &dyn ICompletionModel,
    request: &CompletionRequest,
) -> TomeResult<String> {
    match model.complete(request) {
        Ok(response) => Ok(response),
        Err(first) => {
            warn!(model = model.name(), error = %first, "reasoning call failed, retrying once");
            model.complete(request)
        }
    }
}

/// Parse a typed value out of a model completion. Tolerates markdown code
/// fences and prose around the JSON object.
pub fn parse_json_response<T: DeserializeOwned>(response: &str) -> TomeResult<T> {
    let start = response.find('{');
    let end = response.rfind('}');
    let body = match (start, end) {
        (Some(s), Some(e)) if s < e => &response[s..=e],
        _ => {
            return Err(ReasoningError::MalformedResponse {
                reason: "no JSON object in response".to_string(),
            }
            .into())
        }
    };
    serde_json::from_str(body).map_err(|e| {
        ReasoningError::MalformedResponse {
            reason: e.to_string(),
        }
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Probe {
        value: u32,
    }

    #[test]
    fn parses_fenced_json() {
        let raw = "Here you go:\n```json\n{\"value\": 3}\n```\n";
        let p: Probe = parse_json_response(raw).unwrap();
        assert_eq!(p.value, 3);
    }

    #[test]
    fn plain_json_parses() {
        let p: Probe = parse_json_response("{\"value\": 9}").unwrap();
        assert_eq!(p.value, 9);
    }

    #[test]
    fn prose_without_json_is_malformed() {
        assert!(parse_json_response::<Probe>("I cannot answer that.").is_err());
    }
}
