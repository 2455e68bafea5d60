// Uniform outcome shape for anything that crosses the store boundary.
//
// Services return `Result<T, StoreError>`; the edges (Discord replies, logs)
// turn that into an `Envelope` so every outcome has one of three statuses.

use super::store_ports::StoreError;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Envelope<T> {
    Ok { payload: T },
    NotFound { message: String },
    Error { message: String },
}

impl<T> Envelope<T> {
    pub fn status(&self) -> &'static str {
        match self {
            Envelope::Ok { .. } => "ok",
            Envelope::NotFound { .. } => "not_found",
            Envelope::Error { .. } => "error",
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Envelope::Ok { .. })
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Envelope<U> {
        match self {
            Envelope::Ok { payload } => Envelope::Ok {
                payload: f(payload),
            },
            Envelope::NotFound { message } => Envelope::NotFound { message },
            Envelope::Error { message } => Envelope::Error { message },
        }
    }
}

impl<T> From<Result<T, StoreError>> for Envelope<T> {
    fn from(result: Result<T, StoreError>) -> Self {
        match result {
            Ok(payload) => Envelope::Ok { payload },
            Err(err @ StoreError::NotFound { .. }) => Envelope::NotFound {
                message: err.to_string(),
            },
            Err(err) => Envelope::Error {
                message: err.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ok_serializes_with_payload() {
        let envelope: Envelope<i64> = Ok(42).into();
        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({ "status": "ok", "payload": 42 })
        );
    }

    #[test]
    fn test_not_found_is_its_own_status() {
        let envelope: Envelope<()> = Err(StoreError::not_found("user", 7)).into();
        assert_eq!(envelope.status(), "not_found");
        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({ "status": "not_found", "message": "No user found with ID 7" })
        );
    }

    #[test]
    fn test_other_errors_collapse_to_error() {
        let envelope: Envelope<()> =
            Err(StoreError::Connectivity("connection refused".to_string())).into();
        assert_eq!(envelope.status(), "error");
        assert!(!envelope.is_ok());

        let envelope: Envelope<()> = Err(StoreError::Query("syntax error".to_string())).into();
        assert_eq!(envelope.status(), "error");
    }

    #[test]
    fn test_map_keeps_status() {
        let envelope: Envelope<i64> = Ok(2).into();
        assert_eq!(envelope.map(|n| n * 10), Envelope::Ok { payload: 20 });

        let envelope: Envelope<i64> = Err(StoreError::not_found("setting", 1)).into();
        assert_eq!(envelope.map(|n| n * 10).status(), "not_found");
    }
}
