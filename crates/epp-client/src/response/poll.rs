use epp_types::MessageQueue;

use super::{Response, parse_time};
use crate::decoder::ScannerBuilder;

const MSGQ: &str = "epp > response > msgQ";

fn queue(r: &mut Response) -> &mut MessageQueue {
    r.msg_queue.get_or_insert_with(MessageQueue::default)
}

pub(super) fn register(b: &mut ScannerBuilder<Response>) {
    b.on_start(MSGQ, |r, a| {
        let count = a.get_parsed("count")?.unwrap_or_default();
        let id = a.get("id").unwrap_or_default().to_string();
        let q = queue(r);
        q.count = count;
        q.id = id;
        Ok(())
    })
    .on_text(&format!("{MSGQ} > qDate"), |r, s| {
        queue(r).queued_at = Some(parse_time(s)?);
        Ok(())
    })
    .on_text(&format!("{MSGQ} > msg"), |r, s| {
        queue(r).message = Some(s.to_string());
        Ok(())
    });
}
