use epp_types::{CheckItem, ContactType, DomainContact, DsRecord};

use super::{Response, open_entry, parse_time, parse_value, push_entry};
use crate::decoder::{FieldError, ScannerBuilder};

const CHK: &str = "epp > response > resData > domain:chkData > domain:cd";
const CRE: &str = "epp > response > resData > domain:creData";
const INF: &str = "epp > response > resData > domain:infData";
const REN: &str = "epp > response > resData > domain:renData";
const TRN: &str = "epp > response > resData > domain:trnData";
const RGP: &str = "epp > response > extension > rgp:infData > rgp:rgpStatus";
const DS: &str = "epp > response > extension > secDNS:infData > secDNS:dsData";

fn ds_record(r: &mut Response) -> Result<&mut DsRecord, FieldError> {
    r.data
        .domain_info()
        .ds_records
        .last_mut()
        .ok_or_else(|| FieldError::invalid("", "DS field outside dsData"))
}

pub(super) fn register(b: &mut ScannerBuilder<Response>) {
    // <domain:chkData>
    b.on_start(&format!("{CHK} > domain:name"), |r, a| {
        push_entry(r, |r| {
            let available = a.get_bool("avail")?.unwrap_or(false);
            r.data.check().items.push(CheckItem {
                available,
                ..CheckItem::default()
            });
            Ok(())
        })
    })
    .on_text(&format!("{CHK} > domain:name"), |r, s| {
        if let Some(item) = open_entry(r, |d| &mut d.check().items) {
            s.clone_into(&mut item.name);
        }
        Ok(())
    })
    .on_text(&format!("{CHK} > domain:reason"), |r, s| {
        if let Some(item) = open_entry(r, |d| &mut d.check().items) {
            item.reason = Some(s.to_string());
        }
        Ok(())
    });

    // <domain:creData>
    b.on_text(&format!("{CRE} > domain:name"), |r, s| {
        s.clone_into(&mut r.data.domain_created().name);
        Ok(())
    })
    .on_text(&format!("{CRE} > domain:crDate"), |r, s| {
        r.data.domain_created().created = Some(parse_time(s)?);
        Ok(())
    })
    .on_text(&format!("{CRE} > domain:exDate"), |r, s| {
        r.data.domain_created().expires = Some(parse_time(s)?);
        Ok(())
    });

    // <domain:infData>
    b.on_text(&format!("{INF} > domain:name"), |r, s| {
        s.clone_into(&mut r.data.domain_info().name);
        Ok(())
    })
    .on_text(&format!("{INF} > domain:roid"), |r, s| {
        s.clone_into(&mut r.data.domain_info().roid);
        Ok(())
    })
    .on_start(&format!("{INF} > domain:status"), |r, a| {
        if let Some(s) = a.get("s") {
            r.data.domain_info().statuses.push(s.to_string());
        }
        Ok(())
    })
    .on_text(&format!("{INF} > domain:registrant"), |r, s| {
        s.clone_into(&mut r.data.domain_info().registrant);
        Ok(())
    })
    .on_start(&format!("{INF} > domain:contact"), |r, a| {
        push_entry(r, |r| {
            let kind = a.get("type").unwrap_or_default();
            let kind: ContactType = kind.parse().map_err(|e: epp_types::ParseKeywordError| {
                FieldError::invalid(kind, e.to_string())
            })?;
            r.data
                .domain_info()
                .contacts
                .push(DomainContact::new(kind, String::new()));
            Ok(())
        })
    })
    .on_text(&format!("{INF} > domain:contact"), |r, s| {
        if let Some(c) = open_entry(r, |d| &mut d.domain_info().contacts) {
            s.clone_into(&mut c.id);
        }
        Ok(())
    })
    .on_text(&format!("{INF} > domain:ns > domain:hostObj"), |r, s| {
        r.data.domain_info().nameservers.push(s.to_string());
        Ok(())
    })
    .on_text(&format!("{INF} > domain:ns > domain:hostAttr > domain:hostName"), |r, s| {
        r.data.domain_info().nameservers.push(s.to_string());
        Ok(())
    })
    .on_text(&format!("{INF} > domain:host"), |r, s| {
        r.data.domain_info().hosts.push(s.to_string());
        Ok(())
    })
    .on_text(&format!("{INF} > domain:clID"), |r, s| {
        s.clone_into(&mut r.data.domain_info().client_id);
        Ok(())
    })
    .on_text(&format!("{INF} > domain:crID"), |r, s| {
        s.clone_into(&mut r.data.domain_info().creator_id);
        Ok(())
    })
    .on_text(&format!("{INF} > domain:crDate"), |r, s| {
        r.data.domain_info().created = Some(parse_time(s)?);
        Ok(())
    })
    .on_text(&format!("{INF} > domain:upID"), |r, s| {
        s.clone_into(&mut r.data.domain_info().updater_id);
        Ok(())
    })
    .on_text(&format!("{INF} > domain:upDate"), |r, s| {
        r.data.domain_info().updated = Some(parse_time(s)?);
        Ok(())
    })
    .on_text(&format!("{INF} > domain:exDate"), |r, s| {
        r.data.domain_info().expires = Some(parse_time(s)?);
        Ok(())
    })
    .on_text(&format!("{INF} > domain:trDate"), |r, s| {
        r.data.domain_info().transferred = Some(parse_time(s)?);
        Ok(())
    })
    .on_text(&format!("{INF} > domain:authInfo > domain:pw"), |r, s| {
        r.data.domain_info().auth_info = Some(s.to_string());
        Ok(())
    });

    // RGP and secDNS info extensions
    b.on_start(RGP, |r, a| {
        if let Some(s) = a.get("s") {
            r.data.domain_info().rgp_statuses.push(s.to_string());
        }
        Ok(())
    })
    .on_start(DS, |r, _| {
        r.data.domain_info().ds_records.push(DsRecord::default());
        Ok(())
    })
    .on_text(&format!("{DS} > secDNS:keyTag"), |r, s| {
        ds_record(r)?.key_tag = parse_value(s)?;
        Ok(())
    })
    .on_text(&format!("{DS} > secDNS:alg"), |r, s| {
        ds_record(r)?.algorithm = parse_value(s)?;
        Ok(())
    })
    .on_text(&format!("{DS} > secDNS:digestType"), |r, s| {
        ds_record(r)?.digest_type = parse_value(s)?;
        Ok(())
    })
    .on_text(&format!("{DS} > secDNS:digest"), |r, s| {
        s.clone_into(&mut ds_record(r)?.digest);
        Ok(())
    });

    // <domain:renData>
    b.on_text(&format!("{REN} > domain:name"), |r, s| {
        s.clone_into(&mut r.data.domain_renewed().name);
        Ok(())
    })
    .on_text(&format!("{REN} > domain:exDate"), |r, s| {
        r.data.domain_renewed().expires = Some(parse_time(s)?);
        Ok(())
    });

    // <domain:trnData>
    b.on_text(&format!("{TRN} > domain:name"), |r, s| {
        s.clone_into(&mut r.data.domain_transfer().name);
        Ok(())
    })
    .on_text(&format!("{TRN} > domain:trStatus"), |r, s| {
        s.clone_into(&mut r.data.domain_transfer().status);
        Ok(())
    })
    .on_text(&format!("{TRN} > domain:reID"), |r, s| {
        s.clone_into(&mut r.data.domain_transfer().requested_by);
        Ok(())
    })
    .on_text(&format!("{TRN} > domain:reDate"), |r, s| {
        r.data.domain_transfer().requested_at = Some(parse_time(s)?);
        Ok(())
    })
    .on_text(&format!("{TRN} > domain:acID"), |r, s| {
        s.clone_into(&mut r.data.domain_transfer().acted_by);
        Ok(())
    })
    .on_text(&format!("{TRN} > domain:acDate"), |r, s| {
        r.data.domain_transfer().acted_at = Some(parse_time(s)?);
        Ok(())
    })
    .on_text(&format!("{TRN} > domain:exDate"), |r, s| {
        r.data.domain_transfer().expires = Some(parse_time(s)?);
        Ok(())
    });
}
