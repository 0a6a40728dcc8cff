//! Tests for pricing in domain check responses (fee 1.0, 0.6, 0.5, charge)

use super::fixtures::{decode, res_data_doc};
use crate::response::ResData;

const CHECK: &str = r#"<domain:chkData xmlns:domain="urn:ietf:params:xml:ns:domain-1.0">
  <domain:cd><domain:name avail="1">premium.example</domain:name></domain:cd>
  <domain:cd><domain:name avail="1">plain.example</domain:name></domain:cd>
</domain:chkData>"#;

#[test]
fn test_fee_10_check() {
    let ext = r#"<fee:chkData xmlns:fee="urn:ietf:params:xml:ns:epp:fee-1.0">
  <fee:currency>USD</fee:currency>
  <fee:cd avail="1">
    <fee:objID>premium.example</fee:objID>
    <fee:class>premium</fee:class>
    <fee:command name="create">
      <fee:period unit="y">1</fee:period>
      <fee:fee description="Registration Fee" refundable="1" grace-period="P5D">500.00</fee:fee>
    </fee:command>
    <fee:command name="renew" standard="1">
      <fee:period unit="y">1</fee:period>
      <fee:fee description="Renewal Fee" refundable="1">10.00</fee:fee>
    </fee:command>
  </fee:cd>
  <fee:cd avail="1">
    <fee:objID>plain.example</fee:objID>
    <fee:command name="create" standard="1">
      <fee:fee>10.00</fee:fee>
    </fee:command>
  </fee:cd>
</fee:chkData>"#;
    let check = decode(&res_data_doc(CHECK, ext)).into_check().unwrap();
    assert_eq!(check.items.len(), 2);
    assert_eq!(check.charges.len(), 2);

    let premium = &check.charges[0];
    assert_eq!(premium.name, "premium.example");
    assert_eq!(premium.category.as_deref(), Some("premium"));
    assert_eq!(premium.currency.as_deref(), Some("USD"));
    assert_eq!(premium.fees.len(), 2);
    assert_eq!(premium.fees[0].name, "create");
    assert_eq!(premium.fees[0].amount, "500.00");
    assert!(!premium.fees[0].standard);
    assert!(premium.fees[0].refundable);
    assert_eq!(premium.fees[0].grace_period.as_deref(), Some("P5D"));
    assert_eq!(premium.fees[0].description.as_deref(), Some("Registration Fee"));
    assert_eq!(premium.fees[1].name, "renew");
    assert!(premium.fees[1].standard);

    let plain = &check.charges[1];
    assert_eq!(plain.name, "plain.example");
    assert!(plain.category.is_none());
    assert_eq!(plain.fees[0].amount, "10.00");
    assert!(plain.fees[0].standard);
}

#[test]
fn test_bad_fee_leaves_previous_amount_alone() {
    let ext = r#"<fee:chkData xmlns:fee="urn:ietf:params:xml:ns:epp:fee-1.0">
  <fee:cd avail="1">
    <fee:objID>premium.example</fee:objID>
    <fee:command name="create"><fee:fee refundable="1">500.00</fee:fee></fee:command>
    <fee:command name="renew"><fee:fee refundable="maybe">10.00</fee:fee></fee:command>
  </fee:cd>
</fee:chkData>"#;
    let doc = res_data_doc(CHECK, ext);
    let mut r = crate::response::Response::default();
    assert!(r.decode_into(doc.as_bytes()).is_err());
    match &r.data {
        ResData::Check(check) => {
            let fees = &check.charges[0].fees;
            assert_eq!(fees.len(), 1);
            assert_eq!(fees[0].name, "create");
            assert_eq!(fees[0].amount, "500.00");
        }
        other => panic!("expected check results, got {other:?}"),
    }
}

#[test]
fn test_fee_06_check() {
    let ext = r#"<fee:chkData xmlns:fee="urn:ietf:params:xml:ns:fee-0.6">
  <fee:cd>
    <fee:name>premium.example</fee:name>
    <fee:currency>EUR</fee:currency>
    <fee:command>create</fee:command>
    <fee:period unit="y">1</fee:period>
    <fee:fee description="Application Fee" refundable="0">5.00</fee:fee>
    <fee:fee description="Registration Fee" refundable="1">100.00</fee:fee>
    <fee:class>premium-tier-1</fee:class>
  </fee:cd>
</fee:chkData>"#;
    let check = decode(&res_data_doc(CHECK, ext)).into_check().unwrap();
    assert_eq!(check.charges.len(), 1);
    let c = &check.charges[0];
    assert_eq!(c.name, "premium.example");
    assert_eq!(c.currency.as_deref(), Some("EUR"));
    assert_eq!(c.category.as_deref(), Some("premium-tier-1"));
    assert_eq!(c.fees.len(), 2);
    assert!(c.fees.iter().all(|f| f.name == "create"));
    assert_eq!(c.fees[0].amount, "5.00");
    assert!(!c.fees[0].refundable);
    assert_eq!(c.fees[1].amount, "100.00");
}

#[test]
fn test_fee_05_check_with_object_id() {
    let ext = r#"<fee:chkData xmlns:fee="urn:ietf:params:xml:ns:fee-0.5">
  <fee:cd>
    <fee:object><fee:objID>plain.example</fee:objID></fee:object>
    <fee:currency>USD</fee:currency>
    <fee:command>create</fee:command>
    <fee:fee>8.50</fee:fee>
  </fee:cd>
</fee:chkData>"#;
    let check = decode(&res_data_doc(CHECK, ext)).into_check().unwrap();
    let c = &check.charges[0];
    assert_eq!(c.name, "plain.example");
    assert_eq!(c.fees[0].name, "create");
    assert_eq!(c.fees[0].amount, "8.50");
}

#[test]
fn test_charge_check() {
    let ext = r#"<charge:chkData xmlns:charge="http://www.unitedtld.com/epp/charge-1.0">
  <charge:cd>
    <charge:name>premium.example</charge:name>
    <charge:set>
      <charge:category name="BBB+">premium</charge:category>
      <charge:type>price</charge:type>
      <charge:amount command="create">100.00</charge:amount>
      <charge:amount command="renew">100.00</charge:amount>
      <charge:amount command="transfer">100.00</charge:amount>
      <charge:amount command="update" name="restore">50.00</charge:amount>
    </charge:set>
  </charge:cd>
</charge:chkData>"#;
    let check = decode(&res_data_doc(CHECK, ext)).into_check().unwrap();
    let c = &check.charges[0];
    assert_eq!(c.name, "premium.example");
    assert_eq!(c.category.as_deref(), Some("premium"));
    let names: Vec<_> = c.fees.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["create", "renew", "transfer", "restore"]);
    assert_eq!(c.fees[3].amount, "50.00");
}
