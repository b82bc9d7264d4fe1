//! The `{ message, data }` response envelope.

use serde::Deserialize;

use crate::error::RestError;

/// Envelope some endpoints wrap their payload in.
///
/// Others return bare values (a number, an array); those deserialize
/// directly into their target type instead.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    /// Human-oriented status message from the backend.
    #[serde(default)]
    pub message: String,

    /// The payload, absent on some failure responses.
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Unwraps the payload, turning an empty envelope into an error that
    /// carries the backend's message.
    pub fn into_data(self) -> Result<T, RestError> {
        self.data.ok_or(RestError::MissingData {
            message: self.message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enveloped_payload() {
        let response: ApiResponse<Vec<i64>> =
            serde_json::from_str(r#"{"message":"ok","data":[1,2,3]}"#).unwrap();
        assert_eq!(response.into_data().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_missing_data_keeps_backend_message() {
        let response: ApiResponse<Vec<i64>> =
            serde_json::from_str(r#"{"message":"nothing here"}"#).unwrap();

        match response.into_data() {
            Err(RestError::MissingData { message }) => assert_eq!(message, "nothing here"),
            other => panic!("expected MissingData, got {other:?}"),
        }
    }

    #[test]
    fn test_message_defaults_to_empty() {
        let response: ApiResponse<i64> = serde_json::from_str(r#"{"data":7}"#).unwrap();
        assert_eq!(response.message, "");
        assert_eq!(response.into_data().unwrap(), 7);
    }
}
