//! Domain request and response types, one pair per operation.
//!
//! These are the values endpoints consume and produce. They double as the
//! JSON body schema of the HTTP transport: requests are `{"s": ...}`, string
//! responses are `{"v": ..., "err": ...}` with `err` omitted when absent, and
//! the count response is `{"v": <integer>}`.

use serde::{Deserialize, Deserializer, Serialize};

/// Treats both an absent field and an empty string as "no error".
fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Request for the title-case operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleCaseRequest {
    pub s: String,
}

/// Request for the remove-whitespace operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveWhitespaceRequest {
    pub s: String,
}

/// Request for the count operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountRequest {
    pub s: String,
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// Response for the title-case operation.
///
/// `err` carries a domain error message; it is never a transport failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleCaseResponse {
    pub v: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "empty_as_none"
    )]
    pub err: Option<String>,
}

/// Response for the remove-whitespace operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveWhitespaceResponse {
    pub v: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "empty_as_none"
    )]
    pub err: Option<String>,
}

/// Response for the count operation. Count never reports a domain error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountResponse {
    pub v: usize,
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use serde_json::json;

    use super::*;

    #[test]
    fn request_body_uses_s_field() {
        let req: TitleCaseRequest = serde_json::from_str(r#"{"s":"hello world"}"#).unwrap();
        assert_eq!(req.s, "hello world");
        assert_eq!(serde_json::to_value(&req).unwrap(), json!({"s": "hello world"}));
    }

    #[test]
    fn request_without_s_is_rejected() {
        assert!(serde_json::from_str::<CountRequest>("{}").is_err());
        assert!(serde_json::from_str::<CountRequest>(r#"{"s": 5}"#).is_err());
    }

    #[test]
    fn string_response_omits_absent_error() {
        let resp = TitleCaseResponse { v: "Hello".into(), err: None };
        assert_eq!(serde_json::to_value(&resp).unwrap(), json!({"v": "Hello"}));
    }

    #[test]
    fn string_response_carries_domain_error() {
        let resp = RemoveWhitespaceResponse {
            v: String::new(),
            err: Some("empty string".into()),
        };
        assert_eq!(
            serde_json::to_string(&resp).unwrap(),
            r#"{"v":"","err":"empty string"}"#
        );
    }

    #[test]
    fn empty_error_string_decodes_as_none() {
        let resp: TitleCaseResponse = serde_json::from_str(r#"{"v":"X","err":""}"#).unwrap();
        assert_eq!(resp.err, None);
        let resp: TitleCaseResponse = serde_json::from_str(r#"{"v":"X"}"#).unwrap();
        assert_eq!(resp.err, None);
    }

    #[test]
    fn count_response_is_an_integer() {
        let resp = CountResponse { v: 5 };
        assert_eq!(serde_json::to_string(&resp).unwrap(), r#"{"v":5}"#);
        let decoded: CountResponse = serde_json::from_str(r#"{"v":5}"#).unwrap();
        assert_eq!(decoded, resp);
    }

    fn json_roundtrip<T>(value: &T) -> T
    where
        T: Serialize + for<'de> Deserialize<'de>,
    {
        serde_json::from_slice(&serde_json::to_vec(value).unwrap()).unwrap()
    }

    proptest! {
        #[test]
        fn requests_survive_json(s in "\\PC*") {
            let tc = TitleCaseRequest { s: s.clone() };
            prop_assert_eq!(json_roundtrip(&tc), tc);
            let rw = RemoveWhitespaceRequest { s: s.clone() };
            prop_assert_eq!(json_roundtrip(&rw), rw);
            let c = CountRequest { s };
            prop_assert_eq!(json_roundtrip(&c), c);
        }

        #[test]
        fn string_responses_survive_json(v in "\\PC*", err in proptest::option::of("\\PC*")) {
            let expected = err.clone().filter(|e| !e.is_empty());

            let tc = json_roundtrip(&TitleCaseResponse { v: v.clone(), err: err.clone() });
            prop_assert_eq!(tc, TitleCaseResponse { v: v.clone(), err: expected.clone() });

            let rw = json_roundtrip(&RemoveWhitespaceResponse { v: v.clone(), err });
            prop_assert_eq!(rw, RemoveWhitespaceResponse { v, err: expected });
        }

        #[test]
        fn count_response_survives_json(v in 0usize..1 << 40) {
            prop_assert_eq!(json_roundtrip(&CountResponse { v }), CountResponse { v });
        }
    }
}
