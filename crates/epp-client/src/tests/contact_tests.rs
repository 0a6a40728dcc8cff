//! Tests for contact resData decoding

use super::fixtures::{decode, res_data_doc};

const CONTACT_INFO: &str = r#"
<contact:infData xmlns:contact="urn:ietf:params:xml:ns:contact-1.0">
  <contact:id>sh8013</contact:id>
  <contact:roid>SH8013-REP</contact:roid>
  <contact:status s="linked"/>
  <contact:status s="clientDeleteProhibited"/>
  <contact:postalInfo type="int">
    <contact:name>John Doe</contact:name>
    <contact:org>Example Inc.</contact:org>
    <contact:addr>
      <contact:street>123 Example Dr.</contact:street>
      <contact:street>Suite 100</contact:street>
      <contact:city>Dulles</contact:city>
      <contact:sp>VA</contact:sp>
      <contact:pc>20166-6503</contact:pc>
      <contact:cc>US</contact:cc>
    </contact:addr>
  </contact:postalInfo>
  <contact:voice x="1234">+1.7035555555</contact:voice>
  <contact:fax>+1.7035555556</contact:fax>
  <contact:email>jdoe@example.com</contact:email>
  <contact:clID>ClientY</contact:clID>
  <contact:crID>ClientX</contact:crID>
  <contact:crDate>1999-04-03T22:00:00.0Z</contact:crDate>
  <contact:upDate>1999-12-03T09:00:00.0Z</contact:upDate>
</contact:infData>"#;

#[test]
fn test_contact_info() {
    let info = decode(&res_data_doc(CONTACT_INFO, ""))
        .into_contact_info()
        .unwrap();
    assert_eq!(info.id, "sh8013");
    assert_eq!(info.roid, "SH8013-REP");
    assert_eq!(info.statuses, vec!["linked", "clientDeleteProhibited"]);
    assert_eq!(info.name, "John Doe");
    assert_eq!(info.org.as_deref(), Some("Example Inc."));
    assert_eq!(info.street, vec!["123 Example Dr.", "Suite 100"]);
    assert_eq!(info.city, "Dulles");
    assert_eq!(info.sp.as_deref(), Some("VA"));
    assert_eq!(info.pc.as_deref(), Some("20166-6503"));
    assert_eq!(info.cc, "US");
    assert_eq!(info.voice.as_deref(), Some("+1.7035555555"));
    assert_eq!(info.fax.as_deref(), Some("+1.7035555556"));
    assert_eq!(info.email, "jdoe@example.com");
    assert_eq!(info.client_id, "ClientY");
    assert_eq!(info.creator_id, "ClientX");
    assert!(info.created.is_some());
    assert!(info.updated.is_some());
}

#[test]
fn test_contact_info_second_postal_info_replaces_street() {
    let doc = res_data_doc(
        r#"<contact:infData xmlns:contact="urn:ietf:params:xml:ns:contact-1.0">
  <contact:id>sh8013</contact:id>
  <contact:postalInfo type="loc">
    <contact:name>Jöhn Döe</contact:name>
    <contact:addr><contact:street>Ünter 1</contact:street><contact:city>Köln</contact:city><contact:cc>DE</contact:cc></contact:addr>
  </contact:postalInfo>
  <contact:postalInfo type="int">
    <contact:name>John Doe</contact:name>
    <contact:addr><contact:street>Unter 1</contact:street><contact:city>Koeln</contact:city><contact:cc>DE</contact:cc></contact:addr>
  </contact:postalInfo>
</contact:infData>"#,
        "",
    );
    let info = decode(&doc).into_contact_info().unwrap();
    assert_eq!(info.name, "John Doe");
    assert_eq!(info.street, vec!["Unter 1"]);
    assert_eq!(info.city, "Koeln");
}

#[test]
fn test_contact_check() {
    let doc = res_data_doc(
        r#"<contact:chkData xmlns:contact="urn:ietf:params:xml:ns:contact-1.0">
  <contact:cd><contact:id avail="1">sh8013</contact:id></contact:cd>
  <contact:cd><contact:id avail="0">sah8013</contact:id><contact:reason>In use</contact:reason></contact:cd>
</contact:chkData>"#,
        "",
    );
    let check = decode(&doc).into_check().unwrap();
    assert!(check.item("sh8013").unwrap().available);
    let taken = check.item("sah8013").unwrap();
    assert!(!taken.available);
    assert_eq!(taken.reason.as_deref(), Some("In use"));
}

#[test]
fn test_contact_create() {
    let doc = res_data_doc(
        r#"<contact:creData xmlns:contact="urn:ietf:params:xml:ns:contact-1.0">
  <contact:id>sh8013</contact:id>
  <contact:crDate>1999-04-03T22:00:00.0Z</contact:crDate>
</contact:creData>"#,
        "",
    );
    let created = decode(&doc).into_contact_created().unwrap();
    assert_eq!(created.id, "sh8013");
    assert!(created.created.is_some());
}
