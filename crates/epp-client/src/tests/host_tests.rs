//! Tests for host resData decoding

use std::net::IpAddr;

use super::fixtures::{decode, res_data_doc};
use crate::decoder::DecodeError;
use crate::response::Response;

#[test]
fn test_host_info() {
    let doc = res_data_doc(
        r#"<host:infData xmlns:host="urn:ietf:params:xml:ns:host-1.0">
  <host:name>ns1.example.com</host:name>
  <host:roid>NS1_EXAMPLE1-REP</host:roid>
  <host:status s="linked"/>
  <host:status s="clientUpdateProhibited"/>
  <host:addr ip="v4">192.0.2.2</host:addr>
  <host:addr ip="v4">192.0.2.29</host:addr>
  <host:addr ip="v6">1080:0:0:0:8:800:200C:417A</host:addr>
  <host:clID>ClientY</host:clID>
  <host:crID>ClientX</host:crID>
  <host:crDate>1999-04-03T22:00:00.0Z</host:crDate>
  <host:upDate>1999-12-03T09:00:00.0Z</host:upDate>
</host:infData>"#,
        "",
    );
    let info = decode(&doc).into_host_info().unwrap();
    assert_eq!(info.name, "ns1.example.com");
    assert_eq!(info.roid, "NS1_EXAMPLE1-REP");
    assert_eq!(info.statuses, vec!["linked", "clientUpdateProhibited"]);
    let expected: Vec<IpAddr> = vec![
        "192.0.2.2".parse().unwrap(),
        "192.0.2.29".parse().unwrap(),
        "1080::8:800:200c:417a".parse().unwrap(),
    ];
    assert_eq!(info.addresses, expected);
    assert_eq!(info.client_id, "ClientY");
    assert_eq!(info.creator_id, "ClientX");
}

#[test]
fn test_host_info_bad_address() {
    let doc = res_data_doc(
        r#"<host:infData xmlns:host="urn:ietf:params:xml:ns:host-1.0">
  <host:name>ns1.example.com</host:name>
  <host:addr ip="v4">192.0.2.300</host:addr>
</host:infData>"#,
        "",
    );
    let mut r = Response::default();
    let err = r.decode_into(doc.as_bytes()).unwrap_err();
    assert!(matches!(err, DecodeError::Field { ref value, .. } if value == "192.0.2.300"));
    assert_eq!(r.into_host_info().unwrap().name, "ns1.example.com");
}

#[test]
fn test_host_check_and_create() {
    let check = decode(&res_data_doc(
        r#"<host:chkData xmlns:host="urn:ietf:params:xml:ns:host-1.0">
  <host:cd><host:name avail="1">ns1.example.com</host:name></host:cd>
  <host:cd><host:name avail="0">ns2.example2.com</host:name><host:reason>In use</host:reason></host:cd>
</host:chkData>"#,
        "",
    ))
    .into_check()
    .unwrap();
    assert_eq!(check.items.len(), 2);
    assert!(!check.item("ns2.example2.com").unwrap().available);

    let created = decode(&res_data_doc(
        r#"<host:creData xmlns:host="urn:ietf:params:xml:ns:host-1.0">
  <host:name>ns1.example.com</host:name>
  <host:crDate>1999-04-03T22:00:00.0Z</host:crDate>
</host:creData>"#,
        "",
    ))
    .into_host_created()
    .unwrap();
    assert_eq!(created.name, "ns1.example.com");
}
