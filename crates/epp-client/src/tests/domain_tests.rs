//! Tests for domain resData decoding: check, info, create, renew, transfer

use chrono::{TimeZone, Utc};
use epp_types::ContactType;

use super::fixtures::{DOMAIN_INFO, decode, res_data_doc};
use crate::response::ResData;

#[test]
fn test_domain_check() {
    let doc = res_data_doc(
        r#"<domain:chkData xmlns:domain="urn:ietf:params:xml:ns:domain-1.0">
  <domain:cd><domain:name avail="1">example.com</domain:name></domain:cd>
  <domain:cd><domain:name avail="0">example.net</domain:name><domain:reason>In use</domain:reason></domain:cd>
  <domain:cd><domain:name avail="true">example.org</domain:name></domain:cd>
</domain:chkData>"#,
        "",
    );
    let check = decode(&doc).into_check().unwrap();
    assert_eq!(check.items.len(), 3);

    let com = check.item("example.com").unwrap();
    assert!(com.available);
    assert!(com.reason.is_none());

    let net = check.item("EXAMPLE.NET").unwrap();
    assert!(!net.available);
    assert_eq!(net.reason.as_deref(), Some("In use"));

    assert!(check.item("example.org").unwrap().available);
    assert!(check.charges.is_empty());
}

#[test]
fn test_domain_info() {
    let r = decode(&res_data_doc(DOMAIN_INFO, ""));
    let info = r.into_domain_info().unwrap();

    assert_eq!(info.name, "example.com");
    assert_eq!(info.roid, "EXAMPLE1-REP");
    assert_eq!(info.client_id, "ClientX");
    assert_eq!(info.creator_id, "ClientY");
    assert_eq!(info.updater_id, "ClientX");
    assert_eq!(info.statuses, vec!["ok", "clientTransferProhibited"]);
    assert_eq!(info.registrant, "jd1234");
    assert_eq!(info.contacts.len(), 2);
    assert_eq!(info.contacts[0].kind, ContactType::Admin);
    assert_eq!(info.contacts[0].id, "sh8013");
    assert_eq!(info.contacts[1].kind, ContactType::Tech);
    assert_eq!(info.nameservers, vec!["ns1.example.com", "ns1.example.net"]);
    assert_eq!(info.hosts, vec!["ns1.example.com", "ns2.example.com"]);
    assert_eq!(info.auth_info.as_deref(), Some("2fooBAR"));
    assert_eq!(
        info.created,
        Some(Utc.with_ymd_and_hms(1999, 4, 3, 22, 0, 0).unwrap())
    );
    assert_eq!(
        info.expires,
        Some(Utc.with_ymd_and_hms(2005, 4, 3, 22, 0, 0).unwrap())
    );
    assert!(info.transferred.is_some());
    assert!(info.rgp_statuses.is_empty());
}

#[test]
fn test_domain_info_host_attr_nameservers() {
    let doc = res_data_doc(
        r#"<domain:infData xmlns:domain="urn:ietf:params:xml:ns:domain-1.0">
  <domain:name>example.com</domain:name>
  <domain:ns>
    <domain:hostAttr><domain:hostName>ns1.example.net</domain:hostName><domain:hostAddr ip="v4">192.0.2.1</domain:hostAddr></domain:hostAttr>
  </domain:ns>
</domain:infData>"#,
        "",
    );
    let info = decode(&doc).into_domain_info().unwrap();
    assert_eq!(info.nameservers, vec!["ns1.example.net"]);
}

#[test]
fn test_domain_info_with_rgp_and_dnssec() {
    let ext = r#"<rgp:infData xmlns:rgp="urn:ietf:params:xml:ns:rgp-1.0">
  <rgp:rgpStatus s="redemptionPeriod"/>
</rgp:infData>
<secDNS:infData xmlns:secDNS="urn:ietf:params:xml:ns:secDNS-1.1">
  <secDNS:dsData>
    <secDNS:keyTag>12345</secDNS:keyTag>
    <secDNS:alg>13</secDNS:alg>
    <secDNS:digestType>2</secDNS:digestType>
    <secDNS:digest>49FD46E6C4B45C55D4AC</secDNS:digest>
  </secDNS:dsData>
</secDNS:infData>"#;
    let info = decode(&res_data_doc(DOMAIN_INFO, ext))
        .into_domain_info()
        .unwrap();
    assert_eq!(info.rgp_statuses, vec!["redemptionPeriod"]);
    assert_eq!(info.ds_records.len(), 1);
    assert_eq!(info.ds_records[0].key_tag, 12345);
    assert_eq!(info.ds_records[0].algorithm, 13);
    assert_eq!(info.ds_records[0].digest_type, 2);
    assert_eq!(info.ds_records[0].digest, "49FD46E6C4B45C55D4AC");
}

#[test]
fn test_unknown_contact_type_is_field_error_but_keeps_data() {
    let doc = res_data_doc(
        r#"<domain:infData xmlns:domain="urn:ietf:params:xml:ns:domain-1.0">
  <domain:name>example.com</domain:name>
  <domain:contact type="owner">sh8013</domain:contact>
  <domain:clID>ClientX</domain:clID>
</domain:infData>"#,
        "",
    );
    let mut r = crate::response::Response::default();
    assert!(r.decode_into(doc.as_bytes()).is_err());
    match &r.data {
        ResData::DomainInfo(info) => {
            assert_eq!(info.name, "example.com");
            assert_eq!(info.client_id, "ClientX");
        }
        other => panic!("expected domain info, got {other:?}"),
    }
}

#[test]
fn test_bad_check_entry_leaves_previous_entry_alone() {
    let doc = res_data_doc(
        r#"<domain:chkData xmlns:domain="urn:ietf:params:xml:ns:domain-1.0">
  <domain:cd><domain:name avail="1">a.com</domain:name></domain:cd>
  <domain:cd><domain:name avail="maybe">b.com</domain:name><domain:reason>Odd</domain:reason></domain:cd>
</domain:chkData>"#,
        "",
    );
    let mut r = crate::response::Response::default();
    assert!(r.decode_into(doc.as_bytes()).is_err());
    match &r.data {
        ResData::Check(check) => {
            assert_eq!(check.items.len(), 1);
            assert_eq!(check.items[0].name, "a.com");
            assert!(check.items[0].available);
            assert!(check.items[0].reason.is_none());
        }
        other => panic!("expected check results, got {other:?}"),
    }
}

#[test]
fn test_bad_contact_leaves_previous_contact_alone() {
    let doc = res_data_doc(
        r#"<domain:infData xmlns:domain="urn:ietf:params:xml:ns:domain-1.0">
  <domain:name>example.com</domain:name>
  <domain:contact type="admin">ADMIN-1</domain:contact>
  <domain:contact type="reseller">RESELLER-9</domain:contact>
</domain:infData>"#,
        "",
    );
    let mut r = crate::response::Response::default();
    assert!(r.decode_into(doc.as_bytes()).is_err());
    match &r.data {
        ResData::DomainInfo(info) => {
            assert_eq!(info.contacts.len(), 1);
            assert_eq!(info.contacts[0].kind, ContactType::Admin);
            assert_eq!(info.contacts[0].id, "ADMIN-1");
        }
        other => panic!("expected domain info, got {other:?}"),
    }
}

#[test]
fn test_domain_create() {
    let doc = res_data_doc(
        r#"<domain:creData xmlns:domain="urn:ietf:params:xml:ns:domain-1.0">
  <domain:name>example.com</domain:name>
  <domain:crDate>1999-04-03T22:00:00.0Z</domain:crDate>
  <domain:exDate>2001-04-03T22:00:00.0Z</domain:exDate>
</domain:creData>"#,
        "",
    );
    let created = decode(&doc).into_domain_created().unwrap();
    assert_eq!(created.name, "example.com");
    assert_eq!(
        created.expires,
        Some(Utc.with_ymd_and_hms(2001, 4, 3, 22, 0, 0).unwrap())
    );
}

#[test]
fn test_domain_renew() {
    let doc = res_data_doc(
        r#"<domain:renData xmlns:domain="urn:ietf:params:xml:ns:domain-1.0">
  <domain:name>example.com</domain:name>
  <domain:exDate>2005-04-03T22:00:00.0Z</domain:exDate>
</domain:renData>"#,
        "",
    );
    let renewed = decode(&doc).into_domain_renewed().unwrap();
    assert_eq!(renewed.name, "example.com");
    assert!(renewed.expires.is_some());
}

#[test]
fn test_domain_transfer() {
    let doc = res_data_doc(
        r#"<domain:trnData xmlns:domain="urn:ietf:params:xml:ns:domain-1.0">
  <domain:name>example.com</domain:name>
  <domain:trStatus>pending</domain:trStatus>
  <domain:reID>ClientX</domain:reID>
  <domain:reDate>2000-06-08T22:00:00.0Z</domain:reDate>
  <domain:acID>ClientY</domain:acID>
  <domain:acDate>2000-06-13T22:00:00.0Z</domain:acDate>
  <domain:exDate>2002-09-08T22:00:00.0Z</domain:exDate>
</domain:trnData>"#,
        "",
    );
    let transfer = decode(&doc).into_domain_transfer().unwrap();
    assert_eq!(transfer.name, "example.com");
    assert_eq!(transfer.status, "pending");
    assert_eq!(transfer.requested_by, "ClientX");
    assert_eq!(transfer.acted_by, "ClientY");
    assert_eq!(
        transfer.acted_at,
        Some(Utc.with_ymd_and_hms(2000, 6, 13, 22, 0, 0).unwrap())
    );
}

#[test]
fn test_bad_date_is_field_error() {
    let doc = res_data_doc(
        r#"<domain:creData xmlns:domain="urn:ietf:params:xml:ns:domain-1.0">
  <domain:name>example.com</domain:name>
  <domain:crDate>yesterday</domain:crDate>
</domain:creData>"#,
        "",
    );
    let err = crate::response::Response::decode(doc.as_bytes()).unwrap_err();
    assert!(err.to_string().contains("yesterday"));
}
