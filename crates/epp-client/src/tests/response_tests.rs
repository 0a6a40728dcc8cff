//! Tests for the result envelope: codes, messages, reasons and trID

use super::fixtures::{decode, response_doc};
use crate::decoder::DecodeError;
use crate::error::Error;
use crate::response::{ResData, Response, interpret};
use crate::result::{Outcome, ResultCode};

#[test]
fn test_completed_result() {
    let r = decode(&response_doc(1000, "Command completed successfully", ""));
    assert_eq!(r.code(), ResultCode::COMPLETED);
    assert_eq!(r.result.message, "Command completed successfully");
    assert_eq!(r.tr_id.client.as_deref(), Some("ABC-12345"));
    assert_eq!(r.tr_id.server, "54322-XYZ");
    assert_eq!(r.data, ResData::None);
    assert!(r.msg_queue.is_none());
}

#[test]
fn test_result_classification() {
    let cases = [
        (1000, Outcome::Completed),
        (1001, Outcome::Pending),
        (1300, Outcome::NoMessages),
        (1301, Outcome::AckToDequeue),
        (1500, Outcome::EndingSession),
        (2303, Outcome::Failure),
        (2400, Outcome::Failure),
    ];
    for (code, outcome) in cases {
        let r = decode(&response_doc(code, "x", ""));
        assert_eq!(r.code().outcome(), outcome, "code {code}");
    }
}

#[test]
fn test_pending_is_success() {
    let r = interpret(response_doc(1001, "Command completed successfully; action pending", "").as_bytes())
        .unwrap();
    assert_eq!(r.code(), ResultCode::PENDING);
}

#[test]
fn test_failure_becomes_epp_error() {
    let doc = response_doc(2303, "Object does not exist", "");
    match interpret(doc.as_bytes()) {
        Err(Error::Epp { code, message, .. }) => {
            assert_eq!(code, ResultCode::OBJECT_DOES_NOT_EXIST);
            assert_eq!(message, "Object does not exist");
        }
        other => panic!("expected Epp error, got {other:?}"),
    }
}

#[test]
fn test_ext_value_reasons() {
    let doc = r#"<epp xmlns="urn:ietf:params:xml:ns:epp-1.0">
  <response>
    <result code="2004">
      <msg>Parameter value range error</msg>
      <extValue>
        <value xmlns:domain="urn:ietf:params:xml:ns:domain-1.0">
          <domain:period unit="y">100</domain:period>
        </value>
        <reason>Period must be 1-10 years</reason>
      </extValue>
      <extValue>
        <value><domain:name xmlns:domain="urn:ietf:params:xml:ns:domain-1.0">bad.example</domain:name></value>
        <reason>Name is reserved</reason>
      </extValue>
    </result>
    <trID><svTRID>54322-XYZ</svTRID></trID>
  </response>
</epp>"#;
    let r = decode(doc);
    assert_eq!(r.result.reasons.len(), 2);
    assert_eq!(r.result.reasons[0].reason, "Period must be 1-10 years");
    assert_eq!(r.result.reasons[1].value, "bad.example");
    assert_eq!(r.result.reasons[1].reason, "Name is reserved");
    assert!(r.tr_id.client.is_none());

    match Error::from(r.result) {
        Error::Epp { code, reasons, .. } => {
            assert_eq!(code, ResultCode(2004));
            assert_eq!(reasons.len(), 2);
        }
        other => panic!("expected Epp error, got {other:?}"),
    }
}

#[test]
fn test_multiple_results_keep_first_as_primary() {
    let doc = r#"<epp xmlns="urn:ietf:params:xml:ns:epp-1.0">
  <response>
    <result code="2306"><msg>Parameter value policy error</msg></result>
    <result code="2005"><msg>Parameter value syntax error</msg></result>
    <trID><svTRID>1</svTRID></trID>
  </response>
</epp>"#;
    let r = decode(doc);
    assert_eq!(r.code(), ResultCode(2306));
    assert_eq!(r.result.message, "Parameter value policy error");
    assert_eq!(r.extra_results.len(), 1);
    assert_eq!(r.extra_results[0].code, ResultCode(2005));
}

#[test]
fn test_unknown_extensions_are_ignored() {
    let body = r#"<extension>
      <acme:info xmlns:acme="urn:example:acme-1.0"><acme:flag>on</acme:flag></acme:info>
    </extension>"#;
    let r = decode(&response_doc(1000, "ok", body));
    assert_eq!(r.code(), ResultCode::COMPLETED);
    assert_eq!(r.data, ResData::None);
}

#[test]
fn test_non_numeric_code_is_a_field_error() {
    let doc = r#"<epp xmlns="urn:ietf:params:xml:ns:epp-1.0"><response>
      <result code="abc"><msg>?</msg></result></response></epp>"#;
    assert!(matches!(
        Response::decode(doc.as_bytes()),
        Err(DecodeError::Field { .. })
    ));
}

#[test]
fn test_malformed_response_is_decode_error() {
    let doc = r#"<epp xmlns="urn:ietf:params:xml:ns:epp-1.0"><response><result code="1000">"#;
    assert!(matches!(interpret(doc.as_bytes()), Err(Error::Decode(_))));
}

#[test]
fn test_response_serializes_to_json() {
    let r = decode(&response_doc(1000, "ok", ""));
    let json = serde_json::to_value(&r).unwrap();
    assert_eq!(json["result"]["code"], 1000);
    assert_eq!(json["tr_id"]["server"], "54322-XYZ");
    assert_eq!(json["data"]["kind"], "none");
}
