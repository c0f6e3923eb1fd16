//! Contact-form submission outcomes
//!
//! The form posts to a hosted form endpoint and shows a status line under
//! the form. This module maps the endpoint's answer to that status line.

use serde::{Deserialize, Serialize};

/// Shown while the request is in flight
pub const SENDING_MESSAGE: &str = "Sending…";
/// Shown after a successful submission
pub const SUCCESS_MESSAGE: &str = "Thanks! We’ll reach out within 1 business day.";
/// Shown when the endpoint rejects the form without usable details
pub const GENERIC_ERROR_MESSAGE: &str = "Oops! There was a problem submitting your form.";
/// Shown when the endpoint cannot be reached
pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please try again.";

/// Base class of the status element
pub const STATUS_CLASS: &str = "form-status";

/// State of the status line under the form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "message", rename_all = "lowercase")]
pub enum FormStatus {
    Sending,
    Success,
    Error(String),
}

impl FormStatus {
    /// Status for a request that never got an answer
    pub fn network_error() -> Self {
        FormStatus::Error(NETWORK_ERROR_MESSAGE.to_string())
    }

    /// Text shown to the visitor
    pub fn message(&self) -> &str {
        match self {
            FormStatus::Sending => SENDING_MESSAGE,
            FormStatus::Success => SUCCESS_MESSAGE,
            FormStatus::Error(message) => message,
        }
    }

    /// Full class attribute of the status element
    pub fn css_class(&self) -> String {
        match self {
            FormStatus::Sending => STATUS_CLASS.to_string(),
            FormStatus::Success => format!("{} success", STATUS_CLASS),
            FormStatus::Error(_) => format!("{} error", STATUS_CLASS),
        }
    }

    /// Whether the form should be cleared
    pub fn is_success(&self) -> bool {
        matches!(self, FormStatus::Success)
    }
}

impl std::fmt::Display for FormStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    errors: Vec<ErrorEntry>,
}

#[derive(Debug, Deserialize)]
struct ErrorEntry {
    #[serde(default)]
    message: Option<String>,
}

/// Classify the endpoint's HTTP answer
///
/// Any 2xx is a success. Otherwise the body's `errors[].message` values are
/// joined with `", "`; a missing or unparsable body gives the generic message.
pub fn classify_response(status: u16, body: &str) -> FormStatus {
    if (200..300).contains(&status) {
        return FormStatus::Success;
    }

    let messages: Vec<String> = serde_json::from_str::<ErrorBody>(body)
        .map(|parsed| {
            parsed
                .errors
                .into_iter()
                .filter_map(|e| e.message)
                .collect()
        })
        .unwrap_or_default();

    if messages.is_empty() {
        FormStatus::Error(GENERIC_ERROR_MESSAGE.to_string())
    } else {
        FormStatus::Error(messages.join(", "))
    }
}

/// Final status of a submission
///
/// `None` means the request never got an answer; otherwise the HTTP status
/// and body are classified.
pub fn settle(response: Option<(u16, &str)>) -> FormStatus {
    match response {
        Some((status, body)) => classify_response(status, body),
        None => FormStatus::network_error(),
    }
}

/// Post the form fields to `endpoint` and classify the outcome
///
/// Transport failures become the network error status. Only an endpoint that
/// is not an http(s) URL is reported as an error. No retry is attempted.
#[cfg(not(target_arch = "wasm32"))]
pub fn submit(endpoint: &str, fields: &[(String, String)]) -> crate::Result<FormStatus> {
    if !(endpoint.starts_with("https://") || endpoint.starts_with("http://")) {
        return Err(crate::Error::Http(format!(
            "Form endpoint must be an http(s) URL, got '{}'",
            endpoint
        )));
    }

    let pairs: Vec<(&str, &str)> = fields
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();
    tracing::info!(endpoint, fields = pairs.len(), "Submitting contact form");

    let status = match ureq::post(endpoint)
        .set("Accept", "application/json")
        .send_form(&pairs)
    {
        Ok(response) => {
            let code = response.status();
            let body = response.into_string().unwrap_or_default();
            settle(Some((code, &body)))
        }
        Err(ureq::Error::Status(code, response)) => {
            let body = response.into_string().unwrap_or_default();
            tracing::warn!(code, "Form endpoint rejected submission");
            settle(Some((code, &body)))
        }
        Err(ureq::Error::Transport(err)) => {
            tracing::warn!(error = %err, "Form endpoint unreachable");
            settle(None)
        }
    };

    Ok(status)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_range() {
        assert_eq!(classify_response(200, ""), FormStatus::Success);
        assert_eq!(classify_response(204, "not json"), FormStatus::Success);
        assert_ne!(classify_response(302, ""), FormStatus::Success);
    }

    #[test]
    fn test_error_messages_joined() {
        let body = r#"{"errors":[{"field":"email","message":"should be an email"},{"message":"is required"}]}"#;
        assert_eq!(
            classify_response(422, body),
            FormStatus::Error("should be an email, is required".to_string())
        );
    }

    #[test]
    fn test_generic_error_fallbacks() {
        for body in ["", "<html>", r#"{"errors":[]}"#, r#"{"error":"x"}"#] {
            assert_eq!(
                classify_response(400, body).message(),
                GENERIC_ERROR_MESSAGE,
                "body {:?}",
                body
            );
        }
    }

    #[test]
    fn test_settle() {
        assert_eq!(settle(None), FormStatus::network_error());
        assert_eq!(settle(Some((201, ""))), FormStatus::Success);
        assert_eq!(
            settle(Some((422, r#"{"errors":[{"message":"email is invalid"}]}"#))),
            FormStatus::Error("email is invalid".to_string())
        );
    }

    #[test]
    fn test_sending_then_outcome_classes() {
        // The status line starts plain and gains the outcome class
        let sending = FormStatus::Sending;
        assert_eq!(sending.css_class(), STATUS_CLASS);
        assert!(!sending.is_success());
        assert!(settle(Some((200, ""))).css_class().ends_with(" success"));
        assert!(settle(None).css_class().ends_with(" error"));
    }

    #[test]
    fn test_css_classes() {
        assert_eq!(FormStatus::Sending.css_class(), "form-status");
        assert_eq!(FormStatus::Success.css_class(), "form-status success");
        assert_eq!(FormStatus::network_error().css_class(), "form-status error");
    }

    #[test]
    fn test_messages() {
        assert_eq!(FormStatus::Sending.message(), "Sending…");
        assert_eq!(
            FormStatus::Success.to_string(),
            "Thanks! We’ll reach out within 1 business day."
        );
        assert_eq!(
            FormStatus::network_error().message(),
            "Network error. Please try again."
        );
        assert!(FormStatus::Success.is_success());
    }

    #[test]
    fn test_submit_rejects_non_http_endpoint() {
        let err = submit("ftp://example.com", &[]).unwrap_err();
        assert!(err.to_string().contains("http"));
    }

    #[test]
    fn test_submit_unreachable_endpoint_is_network_error() {
        // Port 9 on localhost refuses connections
        let status = submit("http://127.0.0.1:9/f/test", &[("email".into(), "a@b.c".into())]).unwrap();
        assert_eq!(status, FormStatus::network_error());
    }
}
