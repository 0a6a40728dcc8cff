use super::xml::XmlWriter;
use super::{EncodeContext, require};
use crate::error::Result;

/// `<poll op="req"/>`: fetch the oldest queued message.
#[must_use]
pub fn encode_poll_request(ctx: &EncodeContext<'_>) -> Vec<u8> {
    let mut w = XmlWriter::command();
    w.empty_attr("poll", "op", "req");
    w.finish_command(ctx.cl_trid)
}

/// `<poll op="ack" msgID="..."/>`: dequeue a message.
///
/// # Errors
///
/// Returns `Error::InvalidParams` if `msg_id` is empty.
pub fn encode_poll_ack(ctx: &EncodeContext<'_>, msg_id: &str) -> Result<Vec<u8>> {
    require(msg_id, "message ID")?;

    let mut w = XmlWriter::command();
    w.raw("<poll op=\"ack\"")
        .raw(" msgID=\"")
        .text(msg_id)
        .raw("\"/>");
    Ok(w.finish_command(ctx.cl_trid))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::test_support::wrap;
    use epp_types::Greeting;

    #[test]
    fn test_encode_poll_request() {
        let greeting = Greeting::default();
        let x = encode_poll_request(&EncodeContext::new(&greeting));
        assert_eq!(String::from_utf8(x).unwrap(), wrap(r#"<poll op="req"/>"#));
    }

    #[test]
    fn test_encode_poll_ack() {
        let greeting = Greeting::default();
        let x = encode_poll_ack(&EncodeContext::new(&greeting), "12345").unwrap();
        assert_eq!(
            String::from_utf8(x).unwrap(),
            wrap(r#"<poll op="ack" msgID="12345"/>"#)
        );
    }

    #[test]
    fn test_encode_poll_ack_requires_id() {
        let greeting = Greeting::default();
        assert!(encode_poll_ack(&EncodeContext::new(&greeting), "").is_err());
    }
}
