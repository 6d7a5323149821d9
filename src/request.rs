use regex::Regex;
use std::sync::OnceLock;

use crate::error::CallError;

/// A call request as accepted at enqueue time.
///
/// Immutable once queued. Queue numbers are one uppercase letter followed
/// by four digits (e.g. `A1001`); window numbers are a single decimal
/// digit. Both are validated by `validate()` before the request is allowed
/// into the queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallRequest {
    /// Call a waiting customer to a service window
    Normal {
        queue_number: String,
        window_number: String,
        chime: bool,
    },

    /// Call the lobby manager to a service window
    Manager {
        window_number: String,
        chime: bool,
    },
}

fn queue_number_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Z]\d{4}$").unwrap())
}

fn window_number_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d$").unwrap())
}

impl CallRequest {
    /// Build a normal call. Window numbers may be passed as numbers or
    /// strings; both are validated in string form.
    pub fn normal(
        queue_number: impl Into<String>,
        window_number: impl ToString,
        chime: bool,
    ) -> Self {
        Self::Normal {
            queue_number: queue_number.into(),
            window_number: window_number.to_string(),
            chime,
        }
    }

    /// Build a lobby-manager call
    pub fn manager(window_number: impl ToString, chime: bool) -> Self {
        Self::Manager {
            window_number: window_number.to_string(),
            chime,
        }
    }

    /// Check the structural invariants of this request
    pub fn validate(&self) -> Result<(), CallError> {
        match self {
            Self::Normal {
                queue_number,
                window_number,
                ..
            } => {
                if !queue_number_pattern().is_match(queue_number) {
                    return Err(CallError::InvalidQueueNumber(queue_number.clone()));
                }
                if !window_number_pattern().is_match(window_number) {
                    return Err(CallError::InvalidWindowNumber(window_number.clone()));
                }
                Ok(())
            }
            Self::Manager { window_number, .. } => {
                if !window_number_pattern().is_match(window_number) {
                    return Err(CallError::InvalidWindowNumber(window_number.clone()));
                }
                Ok(())
            }
        }
    }

    /// Get a human-readable description of the request
    pub fn description(&self) -> String {
        match self {
            Self::Normal {
                queue_number,
                window_number,
                ..
            } => {
                format!("{} to window {}", queue_number, window_number)
            }
            Self::Manager { window_number, .. } => {
                format!("lobby manager to window {}", window_number)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_normal_call() {
        assert!(CallRequest::normal("A1001", 3, true).validate().is_ok());
        assert!(CallRequest::normal("Z9999", "0", false).validate().is_ok());
    }

    #[test]
    fn test_valid_manager_call() {
        assert!(CallRequest::manager(7, true).validate().is_ok());
        assert!(CallRequest::manager("0", false).validate().is_ok());
    }

    #[test]
    fn test_rejects_lowercase_and_short_queue_numbers() {
        let err = CallRequest::normal("a100", 3, true).validate().unwrap_err();
        assert_eq!(err, CallError::InvalidQueueNumber("a100".to_string()));

        assert!(CallRequest::normal("A100", 3, true).validate().is_err());
        assert!(CallRequest::normal("A10011", 3, true).validate().is_err());
        assert!(CallRequest::normal("11001", 3, true).validate().is_err());
        assert!(CallRequest::normal("", 3, true).validate().is_err());
    }

    #[test]
    fn test_rejects_bad_window_numbers() {
        let err = CallRequest::normal("A1001", 12, true).validate().unwrap_err();
        assert_eq!(err, CallError::InvalidWindowNumber("12".to_string()));

        assert!(CallRequest::manager("x", true).validate().is_err());
        assert!(CallRequest::manager("", true).validate().is_err());
        assert!(CallRequest::manager(42, true).validate().is_err());
    }

    #[test]
    fn test_description() {
        let req = CallRequest::normal("B2002", 5, false);
        assert_eq!(req.description(), "B2002 to window 5");

        let req = CallRequest::manager(7, true);
        assert_eq!(req.description(), "lobby manager to window 7");
    }
}
