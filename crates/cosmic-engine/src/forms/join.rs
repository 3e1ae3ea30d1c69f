//! Join-the-club submission: validate an email locally, then hand it to
//! the subscribe collaborator. Invalid input never reaches the network.

use futures::future::{FutureExt, LocalBoxFuture};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ServiceError};

pub const INVALID_EMAIL_MESSAGE: &str = "Please enter a valid email address.";
pub const WELCOME_MESSAGE: &str = "Welcome to the club! We'll be in touch with cosmic updates.";
pub const FAILURE_MESSAGE: &str = "Something went wrong. Please try again later.";

// local@domain.tld, with a 2+ letter TLD. Leading dots and ".." are
// rejected separately (no look-around in `regex`).
const EMAIL_PATTERN: &str = r"(?i)^[a-z0-9_'+\-.]*[a-z0-9_+\-]@([a-z0-9][a-z0-9\-]*\.)+[a-z]{2,}$";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinRequest {
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinOutcome {
    pub message: String,
    pub error: bool,
}

impl JoinOutcome {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error: true,
        }
    }

    pub fn welcome() -> Self {
        Self {
            message: WELCOME_MESSAGE.to_string(),
            error: false,
        }
    }
}

/// The subscribe collaborator.
pub trait JoinService {
    fn subscribe(&self, request: JoinRequest) -> LocalBoxFuture<'static, std::result::Result<JoinOutcome, ServiceError>>;
}

pub struct EmailValidator {
    pattern: Regex,
}

impl EmailValidator {
    pub fn new() -> Result<Self> {
        Ok(Self {
            pattern: Regex::new(EMAIL_PATTERN)?,
        })
    }

    pub fn is_valid(&self, email: &str) -> bool {
        let email = email.trim();
        !email.starts_with('.') && !email.contains("..") && self.pattern.is_match(email)
    }
}

/// Validate and submit. Resolves to the message the form shows; a
/// malformed address resolves immediately without calling `service`.
pub fn submit_join(
    email: &str,
    validator: &EmailValidator,
    service: &dyn JoinService,
) -> LocalBoxFuture<'static, JoinOutcome> {
    if !validator.is_valid(email) {
        log::debug!("join: rejected malformed address");
        return futures::future::ready(JoinOutcome::failure(INVALID_EMAIL_MESSAGE)).boxed_local();
    }
    let request = JoinRequest {
        email: email.trim().to_string(),
    };
    service
        .subscribe(request)
        .map(|result| match result {
            Ok(outcome) => outcome,
            Err(err) => {
                log::warn!("join: subscribe failed: {}", err);
                JoinOutcome::failure(FAILURE_MESSAGE)
            }
        })
        .boxed_local()
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingService {
        calls: RefCell<Vec<JoinRequest>>,
        fail: bool,
    }

    impl JoinService for RecordingService {
        fn subscribe(&self, request: JoinRequest) -> LocalBoxFuture<'static, std::result::Result<JoinOutcome, ServiceError>> {
            self.calls.borrow_mut().push(request);
            let result = if self.fail {
                Err(ServiceError::Transport("offline".into()))
            } else {
                Ok(JoinOutcome::welcome())
            };
            futures::future::ready(result).boxed_local()
        }
    }

    #[test]
    fn invalid_email_makes_no_call() {
        let validator = EmailValidator::new().unwrap();
        let service = RecordingService::default();
        let outcome = block_on(submit_join("not-an-email", &validator, &service));
        assert!(outcome.error);
        assert_eq!(outcome.message, INVALID_EMAIL_MESSAGE);
        assert!(service.calls.borrow().is_empty());
    }

    #[test]
    fn valid_email_makes_exactly_one_call() {
        let validator = EmailValidator::new().unwrap();
        let service = RecordingService::default();
        let outcome = block_on(submit_join("a@b.com", &validator, &service));
        assert!(!outcome.error);
        assert_eq!(outcome.message, WELCOME_MESSAGE);
        assert_eq!(service.calls.borrow().as_slice(), &[JoinRequest { email: "a@b.com".into() }]);
    }

    #[test]
    fn service_failure_is_reported_not_raised() {
        let validator = EmailValidator::new().unwrap();
        let service = RecordingService {
            fail: true,
            ..Default::default()
        };
        let outcome = block_on(submit_join("you@starfleet.com", &validator, &service));
        assert!(outcome.error);
        assert_eq!(service.calls.borrow().len(), 1);
    }

    #[test]
    fn address_syntax() {
        let v = EmailValidator::new().unwrap();
        for ok in ["a@b.com", "first.last+tag@sub.example.org", "X_Y@domain.io", " padded@mail.net "] {
            assert!(v.is_valid(ok), "{} should be valid", ok);
        }
        for bad in ["", "a@b", "@b.com", "a@.com", ".a@b.com", "a..b@c.com", "a.@b.com", "a@b.c", "a b@c.com"] {
            assert!(!v.is_valid(bad), "{} should be invalid", bad);
        }
    }

    #[test]
    fn outcome_json_shape() {
        let json = serde_json::to_string(&JoinOutcome::welcome()).unwrap();
        assert_eq!(
            json,
            r#"{"message":"Welcome to the club! We'll be in touch with cosmic updates.","error":false}"#
        );
    }
}
