use std::net::IpAddr;

use epp_types::{HostAttr, HostChange, HostUpdate, UpdateOp};

use super::domain::write_status;
use super::xml::XmlWriter;
use super::{EncodeContext, require, require_any};
use crate::error::Result;
use crate::namespace;

fn open_host(w: &mut XmlWriter, verb: &str) {
    w.open(verb)
        .open_ns(&format!("host:{verb}"), "host", namespace::OBJ_HOST);
}

fn close_host(w: &mut XmlWriter, verb: &str) {
    w.close(&format!("host:{verb}")).close(verb);
}

fn write_addr(w: &mut XmlWriter, addr: &IpAddr) {
    let family = if addr.is_ipv4() { "v4" } else { "v6" };
    w.element_attr("host:addr", "ip", family, &addr.to_string());
}

/// # Errors
///
/// Returns `Error::InvalidParams` if `names` is empty.
pub fn encode_host_check<S: AsRef<str>>(ctx: &EncodeContext<'_>, names: &[S]) -> Result<Vec<u8>> {
    require_any(names, "host name")?;

    let mut w = XmlWriter::command();
    open_host(&mut w, "check");
    for name in names {
        w.element("host:name", name.as_ref());
    }
    close_host(&mut w, "check");
    Ok(w.finish_command(ctx.cl_trid))
}

/// # Errors
///
/// Returns `Error::InvalidParams` if `name` is empty.
pub fn encode_host_info(ctx: &EncodeContext<'_>, name: &str) -> Result<Vec<u8>> {
    require(name, "host name")?;

    let mut w = XmlWriter::command();
    open_host(&mut w, "info");
    w.element("host:name", name);
    close_host(&mut w, "info");
    Ok(w.finish_command(ctx.cl_trid))
}

/// # Errors
///
/// Returns `Error::InvalidParams` if `name` is empty.
pub fn encode_host_create(
    ctx: &EncodeContext<'_>,
    name: &str,
    addresses: &[IpAddr],
) -> Result<Vec<u8>> {
    require(name, "host name")?;

    let mut w = XmlWriter::command();
    open_host(&mut w, "create");
    w.element("host:name", name);
    for addr in addresses {
        write_addr(&mut w, addr);
    }
    close_host(&mut w, "create");
    Ok(w.finish_command(ctx.cl_trid))
}

/// # Errors
///
/// Returns `Error::InvalidParams` if `name` is empty.
pub fn encode_host_delete(ctx: &EncodeContext<'_>, name: &str) -> Result<Vec<u8>> {
    require(name, "host name")?;

    let mut w = XmlWriter::command();
    open_host(&mut w, "delete");
    w.element("host:name", name);
    close_host(&mut w, "delete");
    Ok(w.finish_command(ctx.cl_trid))
}

fn write_add_rem(w: &mut XmlWriter, tag: &str, attrs: &[&HostAttr]) {
    if attrs.is_empty() {
        return;
    }
    w.open(tag);
    for attr in attrs {
        if let HostAttr::Address(addr) = attr {
            write_addr(w, addr);
        }
    }
    for attr in attrs {
        if let HostAttr::Status(s) = attr {
            write_status(w, "host:status", s);
        }
    }
    w.close(tag);
}

/// # Errors
///
/// Returns `Error::InvalidParams` if `name` is empty.
pub fn encode_host_update(ctx: &EncodeContext<'_>, name: &str, ops: &[HostUpdate]) -> Result<Vec<u8>> {
    require(name, "host name")?;

    let mut add = Vec::new();
    let mut rem = Vec::new();
    let mut new_name = None;
    for op in ops {
        match op {
            UpdateOp::Add(a) => add.push(a),
            UpdateOp::Remove(a) => rem.push(a),
            UpdateOp::Change(HostChange::Name(n)) => new_name = Some(n.as_str()),
        }
    }

    let mut w = XmlWriter::command();
    open_host(&mut w, "update");
    w.element("host:name", name);
    write_add_rem(&mut w, "host:add", &add);
    write_add_rem(&mut w, "host:rem", &rem);
    if let Some(n) = new_name {
        w.open("host:chg").element("host:name", n).close("host:chg");
    }
    close_host(&mut w, "update");
    Ok(w.finish_command(ctx.cl_trid))
}
