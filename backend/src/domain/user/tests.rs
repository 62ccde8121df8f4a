//! Tests for the user model and the shared validator.

use super::*;
use chrono::TimeZone;
use rstest::rstest;
use serde_json::json;

fn long(len: usize) -> String {
    "a".repeat(len)
}

#[rstest]
#[case("Ada", "Ada")]
#[case("  Grace Hopper\t", "Grace Hopper")]
fn names_are_trimmed(#[case] raw: &str, #[case] expected: &str) {
    let name = UserName::new(raw).expect("valid name");
    assert_eq!(name.as_ref(), expected);
}

#[rstest]
#[case("", UserValidationError::NameMissing)]
#[case("   ", UserValidationError::NameMissing)]
fn blank_names_are_rejected(#[case] raw: &str, #[case] expected: UserValidationError) {
    assert_eq!(UserName::new(raw), Err(expected));
}

#[rstest]
fn name_length_is_measured_after_trimming() {
    let padded = format!("  {}  ", long(FIELD_MAX));
    assert!(UserName::new(padded).is_ok());
    assert_eq!(
        UserName::new(long(FIELD_MAX + 1)),
        Err(UserValidationError::NameTooLong)
    );
}

#[rstest]
#[case("  A@B.COM ", "a@b.com")]
#[case("Ada@Example.com", "ada@example.com")]
fn emails_are_trimmed_and_lowercased(#[case] raw: &str, #[case] expected: &str) {
    let email = EmailAddress::new(raw).expect("valid email");
    assert_eq!(email.as_ref(), expected);
}

#[rstest]
fn differently_formatted_emails_collide() {
    let first = EmailAddress::new("  A@B.COM ").expect("valid email");
    let second = EmailAddress::new("a@b.com").expect("valid email");
    assert_eq!(first, second);
}

#[rstest]
#[case("", UserValidationError::EmailMissing)]
#[case("  ", UserValidationError::EmailMissing)]
#[case("ada", UserValidationError::EmailInvalid)]
#[case("ada@example", UserValidationError::EmailInvalid)]
#[case("a da@example.com", UserValidationError::EmailInvalid)]
#[case("ada@@example.com", UserValidationError::EmailInvalid)]
fn malformed_emails_are_rejected(#[case] raw: &str, #[case] expected: UserValidationError) {
    assert_eq!(EmailAddress::new(raw), Err(expected));
}

#[rstest]
fn overlong_emails_are_rejected() {
    let raw = format!("{}@example.com", long(FIELD_MAX));
    assert_eq!(EmailAddress::new(raw), Err(UserValidationError::EmailTooLong));
}

#[rstest]
fn email_length_is_measured_after_lowercasing() {
    // Each dotted capital I lowercases to two characters.
    let raw = format!("{}@example.com", "\u{130}".repeat(125));
    assert!(raw.chars().count() <= FIELD_MAX);
    assert_eq!(EmailAddress::new(raw), Err(UserValidationError::EmailTooLong));
}

#[rstest]
fn validator_reports_every_violation() {
    let violations =
        validate_registration(Some(""), Some("not-an-email")).expect_err("both fields invalid");
    assert_eq!(
        violations,
        vec![
            UserValidationError::NameMissing,
            UserValidationError::EmailInvalid
        ]
    );
    let messages: Vec<String> = violations.iter().map(ToString::to_string).collect();
    assert_eq!(
        messages,
        vec![
            "Name is required and must be a non-empty string",
            "Email must be a valid email address"
        ]
    );
}

#[rstest]
fn validator_treats_absent_fields_as_missing() {
    let violations = validate_registration(None, None).expect_err("fields absent");
    assert_eq!(
        violations,
        vec![
            UserValidationError::NameMissing,
            UserValidationError::EmailMissing
        ]
    );
}

#[rstest]
fn validator_normalises_valid_input() {
    let registrant =
        validate_registration(Some(" Ada "), Some("ADA@Example.com")).expect("valid input");
    assert_eq!(registrant.name.as_ref(), "Ada");
    assert_eq!(registrant.email.as_ref(), "ada@example.com");
}

#[rstest]
fn user_derives_email_sent_from_timestamp() {
    let created = Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).single().expect("valid date");
    let pending = User::new(
        UserId::new(1),
        UserName::new("Ada").expect("valid name"),
        EmailAddress::new("ada@example.com").expect("valid email"),
        created,
        None,
    );
    assert!(!pending.email_sent());

    let delivered = User::new(
        UserId::new(1),
        UserName::new("Ada").expect("valid name"),
        EmailAddress::new("ada@example.com").expect("valid email"),
        created,
        Some(created),
    );
    assert!(delivered.email_sent());
    assert_eq!(delivered.email_sent_at(), Some(created));
}

#[rstest]
fn user_serializes_in_camel_case() {
    let created = Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).single().expect("valid date");
    let user = User::new(
        UserId::new(7),
        UserName::new("Ada").expect("valid name"),
        EmailAddress::new("ada@example.com").expect("valid email"),
        created,
        None,
    );

    let value = serde_json::to_value(&user).expect("serialize user");
    assert_eq!(
        value,
        json!({
            "id": 7,
            "name": "Ada",
            "email": "ada@example.com",
            "createdAt": "2025-01-01T12:00:00Z",
            "emailSent": false,
            "emailSentAt": null,
        })
    );
}
