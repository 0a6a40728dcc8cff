//! Test fixtures and helpers

use crate::response::Response;

/// Wrap `body` in a response envelope with one result.
pub fn response_doc(code: u16, msg: &str, body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="no"?>
<epp xmlns="urn:ietf:params:xml:ns:epp-1.0">
  <response>
    <result code="{code}">
      <msg>{msg}</msg>
    </result>
    {body}
    <trID>
      <clTRID>ABC-12345</clTRID>
      <svTRID>54322-XYZ</svTRID>
    </trID>
  </response>
</epp>"#
    )
}

/// Wrap object data in `<resData>` under a 1000 result.
pub fn res_data_doc(res_data: &str, extension: &str) -> String {
    let ext = if extension.is_empty() {
        String::new()
    } else {
        format!("<extension>{extension}</extension>")
    };
    response_doc(
        1000,
        "Command completed successfully",
        &format!("<resData>{res_data}</resData>{ext}"),
    )
}

/// Decode a document that must be well formed.
pub fn decode(doc: &str) -> Response {
    Response::decode(doc.as_bytes()).unwrap()
}

pub const DOMAIN_INFO: &str = r#"
<domain:infData xmlns:domain="urn:ietf:params:xml:ns:domain-1.0">
  <domain:name>example.com</domain:name>
  <domain:roid>EXAMPLE1-REP</domain:roid>
  <domain:status s="ok"/>
  <domain:status s="clientTransferProhibited">Locked by owner</domain:status>
  <domain:registrant>jd1234</domain:registrant>
  <domain:contact type="admin">sh8013</domain:contact>
  <domain:contact type="tech">sh8014</domain:contact>
  <domain:ns>
    <domain:hostObj>ns1.example.com</domain:hostObj>
    <domain:hostObj>ns1.example.net</domain:hostObj>
  </domain:ns>
  <domain:host>ns1.example.com</domain:host>
  <domain:host>ns2.example.com</domain:host>
  <domain:clID>ClientX</domain:clID>
  <domain:crID>ClientY</domain:crID>
  <domain:crDate>1999-04-03T22:00:00.0Z</domain:crDate>
  <domain:upID>ClientX</domain:upID>
  <domain:upDate>1999-12-03T09:00:00.0Z</domain:upDate>
  <domain:exDate>2005-04-03T22:00:00.0Z</domain:exDate>
  <domain:trDate>2000-04-08T09:00:00.0Z</domain:trDate>
  <domain:authInfo>
    <domain:pw>2fooBAR</domain:pw>
  </domain:authInfo>
</domain:infData>"#;
