use std::net::IpAddr;

use epp_types::CheckItem;

use super::{Response, open_entry, parse_time, parse_value, push_entry};
use crate::decoder::ScannerBuilder;

const CHK: &str = "epp > response > resData > host:chkData > host:cd";
const CRE: &str = "epp > response > resData > host:creData";
const INF: &str = "epp > response > resData > host:infData";

pub(super) fn register(b: &mut ScannerBuilder<Response>) {
    b.on_start(&format!("{CHK} > host:name"), |r, a| {
        push_entry(r, |r| {
            let available = a.get_bool("avail")?.unwrap_or(false);
            r.data.check().items.push(CheckItem {
                available,
                ..CheckItem::default()
            });
            Ok(())
        })
    })
    .on_text(&format!("{CHK} > host:name"), |r, s| {
        if let Some(item) = open_entry(r, |d| &mut d.check().items) {
            s.clone_into(&mut item.name);
        }
        Ok(())
    })
    .on_text(&format!("{CHK} > host:reason"), |r, s| {
        if let Some(item) = open_entry(r, |d| &mut d.check().items) {
            item.reason = Some(s.to_string());
        }
        Ok(())
    });

    b.on_text(&format!("{CRE} > host:name"), |r, s| {
        s.clone_into(&mut r.data.host_created().name);
        Ok(())
    })
    .on_text(&format!("{CRE} > host:crDate"), |r, s| {
        r.data.host_created().created = Some(parse_time(s)?);
        Ok(())
    });

    b.on_text(&format!("{INF} > host:name"), |r, s| {
        s.clone_into(&mut r.data.host_info().name);
        Ok(())
    })
    .on_text(&format!("{INF} > host:roid"), |r, s| {
        s.clone_into(&mut r.data.host_info().roid);
        Ok(())
    })
    .on_start(&format!("{INF} > host:status"), |r, a| {
        if let Some(s) = a.get("s") {
            r.data.host_info().statuses.push(s.to_string());
        }
        Ok(())
    })
    .on_text(&format!("{INF} > host:addr"), |r, s| {
        let addr: IpAddr = parse_value(s)?;
        r.data.host_info().addresses.push(addr);
        Ok(())
    })
    .on_text(&format!("{INF} > host:clID"), |r, s| {
        s.clone_into(&mut r.data.host_info().client_id);
        Ok(())
    })
    .on_text(&format!("{INF} > host:crID"), |r, s| {
        s.clone_into(&mut r.data.host_info().creator_id);
        Ok(())
    })
    .on_text(&format!("{INF} > host:crDate"), |r, s| {
        r.data.host_info().created = Some(parse_time(s)?);
        Ok(())
    })
    .on_text(&format!("{INF} > host:upDate"), |r, s| {
        r.data.host_info().updated = Some(parse_time(s)?);
        Ok(())
    });
}
