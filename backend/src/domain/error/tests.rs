//! Tests for domain error construction and serialisation.

use super::*;
use rstest::rstest;
use serde_json::json;

#[rstest]
#[case::invalid_request(Error::invalid_request("bad"), ErrorCode::InvalidRequest)]
#[case::not_found(Error::not_found("missing"), ErrorCode::NotFound)]
#[case::conflict(Error::conflict("taken"), ErrorCode::Conflict)]
#[case::unavailable(Error::service_unavailable("down"), ErrorCode::ServiceUnavailable)]
#[case::internal(Error::internal("boom"), ErrorCode::InternalError)]
fn convenience_constructors_set_code(#[case] error: Error, #[case] expected: ErrorCode) {
    assert_eq!(error.code(), expected);
}

#[rstest]
fn try_new_rejects_empty_messages() {
    let result = Error::try_new(ErrorCode::InvalidRequest, "   ");
    assert!(matches!(result, Err(ErrorValidationError::EmptyMessage)));
}

#[rstest]
#[case::empty(ErrorCode::InternalError, "", "internal error")]
#[case::whitespace(ErrorCode::NotFound, "  ", "resource not found")]
fn blank_messages_fall_back_to_code_text(
    #[case] code: ErrorCode,
    #[case] message: &str,
    #[case] expected: &str,
) {
    assert_eq!(Error::new(code, message).message(), expected);
}

#[rstest]
fn display_uses_message() {
    let error = Error::conflict("pos name 'Cafe Botanik' already exists");
    assert_eq!(error.to_string(), "pos name 'Cafe Botanik' already exists");
}

#[rstest]
fn serialises_with_snake_case_code_and_omits_empty_details() {
    let error = Error::not_found("pos 7 not found");
    insta::assert_json_snapshot!(error, @r#"
    {
      "code": "not_found",
      "message": "pos 7 not found"
    }
    "#);
}

#[rstest]
fn deserialisation_round_trips_details() {
    let error = Error::conflict("duplicate").with_details(json!({"name": "Mensa"}));
    let encoded = serde_json::to_string(&error).expect("serialise error");
    let decoded: Error = serde_json::from_str(&encoded).expect("deserialise error");
    assert_eq!(decoded, error);
}

#[rstest]
fn deserialisation_rejects_blank_messages() {
    let result = serde_json::from_value::<Error>(json!({
        "code": "internal_error",
        "message": "  ",
    }));
    assert!(result.is_err());
}
