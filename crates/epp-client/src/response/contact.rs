use epp_types::CheckItem;

use super::{Response, open_entry, parse_time, push_entry};
use crate::decoder::ScannerBuilder;

const CHK: &str = "epp > response > resData > contact:chkData > contact:cd";
const CRE: &str = "epp > response > resData > contact:creData";
const INF: &str = "epp > response > resData > contact:infData";
const POSTAL: &str = "epp > response > resData > contact:infData > contact:postalInfo";

pub(super) fn register(b: &mut ScannerBuilder<Response>) {
    b.on_start(&format!("{CHK} > contact:id"), |r, a| {
        push_entry(r, |r| {
            let available = a.get_bool("avail")?.unwrap_or(false);
            r.data.check().items.push(CheckItem {
                available,
                ..CheckItem::default()
            });
            Ok(())
        })
    })
    .on_text(&format!("{CHK} > contact:id"), |r, s| {
        if let Some(item) = open_entry(r, |d| &mut d.check().items) {
            s.clone_into(&mut item.name);
        }
        Ok(())
    })
    .on_text(&format!("{CHK} > contact:reason"), |r, s| {
        if let Some(item) = open_entry(r, |d| &mut d.check().items) {
            item.reason = Some(s.to_string());
        }
        Ok(())
    });

    b.on_text(&format!("{CRE} > contact:id"), |r, s| {
        s.clone_into(&mut r.data.contact_created().id);
        Ok(())
    })
    .on_text(&format!("{CRE} > contact:crDate"), |r, s| {
        r.data.contact_created().created = Some(parse_time(s)?);
        Ok(())
    });

    b.on_text(&format!("{INF} > contact:id"), |r, s| {
        s.clone_into(&mut r.data.contact_info().id);
        Ok(())
    })
    .on_text(&format!("{INF} > contact:roid"), |r, s| {
        s.clone_into(&mut r.data.contact_info().roid);
        Ok(())
    })
    .on_start(&format!("{INF} > contact:status"), |r, a| {
        if let Some(s) = a.get("s") {
            r.data.contact_info().statuses.push(s.to_string());
        }
        Ok(())
    })
    .on_text(&format!("{INF} > contact:voice"), |r, s| {
        r.data.contact_info().voice = Some(s.to_string());
        Ok(())
    })
    .on_text(&format!("{INF} > contact:fax"), |r, s| {
        r.data.contact_info().fax = Some(s.to_string());
        Ok(())
    })
    .on_text(&format!("{INF} > contact:email"), |r, s| {
        s.clone_into(&mut r.data.contact_info().email);
        Ok(())
    })
    .on_text(&format!("{INF} > contact:clID"), |r, s| {
        s.clone_into(&mut r.data.contact_info().client_id);
        Ok(())
    })
    .on_text(&format!("{INF} > contact:crID"), |r, s| {
        s.clone_into(&mut r.data.contact_info().creator_id);
        Ok(())
    })
    .on_text(&format!("{INF} > contact:crDate"), |r, s| {
        r.data.contact_info().created = Some(parse_time(s)?);
        Ok(())
    })
    .on_text(&format!("{INF} > contact:upDate"), |r, s| {
        r.data.contact_info().updated = Some(parse_time(s)?);
        Ok(())
    });

    // A contact may carry both "int" and "loc" postal info; the last one wins.
    b.on_text(&format!("{POSTAL} > contact:name"), |r, s| {
        s.clone_into(&mut r.data.contact_info().name);
        Ok(())
    })
    .on_text(&format!("{POSTAL} > contact:org"), |r, s| {
        r.data.contact_info().org = Some(s.to_string());
        Ok(())
    })
    .on_start(&format!("{POSTAL} > contact:addr"), |r, _| {
        r.data.contact_info().street.clear();
        Ok(())
    })
    .on_text(&format!("{POSTAL} > contact:addr > contact:street"), |r, s| {
        r.data.contact_info().street.push(s.to_string());
        Ok(())
    })
    .on_text(&format!("{POSTAL} > contact:addr > contact:city"), |r, s| {
        s.clone_into(&mut r.data.contact_info().city);
        Ok(())
    })
    .on_text(&format!("{POSTAL} > contact:addr > contact:sp"), |r, s| {
        r.data.contact_info().sp = Some(s.to_string());
        Ok(())
    })
    .on_text(&format!("{POSTAL} > contact:addr > contact:pc"), |r, s| {
        r.data.contact_info().pc = Some(s.to_string());
        Ok(())
    })
    .on_text(&format!("{POSTAL} > contact:addr > contact:cc"), |r, s| {
        s.clone_into(&mut r.data.contact_info().cc);
        Ok(())
    });
}
