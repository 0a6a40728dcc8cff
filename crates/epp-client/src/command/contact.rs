use epp_types::{ContactAttr, ContactChange, ContactCreate, ContactUpdate, PostalInfo, UpdateOp};

use super::domain::write_status;
use super::xml::XmlWriter;
use super::{EncodeContext, require, require_any};
use crate::error::{Error, Result};
use crate::namespace;

fn open_contact(w: &mut XmlWriter, verb: &str) {
    w.open(verb)
        .open_ns(&format!("contact:{verb}"), "contact", namespace::OBJ_CONTACT);
}

fn close_contact(w: &mut XmlWriter, verb: &str) {
    w.close(&format!("contact:{verb}")).close(verb);
}

fn write_auth_info(w: &mut XmlWriter, auth_info: Option<&str>) {
    if let Some(pw) = auth_info.filter(|pw| !pw.is_empty()) {
        w.open("contact:authInfo")
            .element("contact:pw", pw)
            .close("contact:authInfo");
    }
}

fn check_postal(pi: &PostalInfo) -> Result<()> {
    if pi.street.len() > PostalInfo::MAX_STREET_LINES {
        return Err(Error::invalid(format!(
            "at most {} street lines are allowed, got {}",
            PostalInfo::MAX_STREET_LINES,
            pi.street.len()
        )));
    }
    Ok(())
}

/// Internationalized (`type="int"`) postal info.
fn write_postal(w: &mut XmlWriter, pi: &PostalInfo) {
    w.open_attr("contact:postalInfo", "type", "int")
        .element("contact:name", &pi.name)
        .optional("contact:org", pi.org.as_deref())
        .open("contact:addr");
    for line in pi.street.iter().filter(|l| !l.is_empty()) {
        w.element("contact:street", line);
    }
    w.element("contact:city", &pi.city)
        .optional("contact:sp", pi.sp.as_deref())
        .optional("contact:pc", pi.pc.as_deref())
        .element("contact:cc", &pi.cc)
        .close("contact:addr")
        .close("contact:postalInfo");
}

/// # Errors
///
/// Returns `Error::InvalidParams` if `ids` is empty.
pub fn encode_contact_check<S: AsRef<str>>(ctx: &EncodeContext<'_>, ids: &[S]) -> Result<Vec<u8>> {
    require_any(ids, "contact ID")?;

    let mut w = XmlWriter::command();
    open_contact(&mut w, "check");
    for id in ids {
        w.element("contact:id", id.as_ref());
    }
    close_contact(&mut w, "check");
    Ok(w.finish_command(ctx.cl_trid))
}

/// # Errors
///
/// Returns `Error::InvalidParams` if `id` is empty.
pub fn encode_contact_info(
    ctx: &EncodeContext<'_>,
    id: &str,
    auth_info: Option<&str>,
) -> Result<Vec<u8>> {
    require(id, "contact ID")?;

    let mut w = XmlWriter::command();
    open_contact(&mut w, "info");
    w.element("contact:id", id);
    write_auth_info(&mut w, auth_info);
    close_contact(&mut w, "info");
    Ok(w.finish_command(ctx.cl_trid))
}

/// # Errors
///
/// Returns `Error::InvalidParams` for an empty ID or more than three street
/// lines.
pub fn encode_contact_create(ctx: &EncodeContext<'_>, params: &ContactCreate) -> Result<Vec<u8>> {
    require(&params.id, "contact ID")?;
    check_postal(&params.postal)?;

    let mut w = XmlWriter::command();
    open_contact(&mut w, "create");
    w.element("contact:id", &params.id);
    write_postal(&mut w, &params.postal);
    w.optional("contact:voice", params.voice.as_deref())
        .optional("contact:fax", params.fax.as_deref())
        .element("contact:email", &params.email);
    write_auth_info(&mut w, params.auth_info.as_deref());
    close_contact(&mut w, "create");
    Ok(w.finish_command(ctx.cl_trid))
}

/// # Errors
///
/// Returns `Error::InvalidParams` if `id` is empty.
pub fn encode_contact_delete(ctx: &EncodeContext<'_>, id: &str) -> Result<Vec<u8>> {
    require(id, "contact ID")?;

    let mut w = XmlWriter::command();
    open_contact(&mut w, "delete");
    w.element("contact:id", id);
    close_contact(&mut w, "delete");
    Ok(w.finish_command(ctx.cl_trid))
}

#[derive(Default)]
struct ContactChanges<'a> {
    postal: Option<&'a PostalInfo>,
    voice: Option<&'a str>,
    fax: Option<&'a str>,
    email: Option<&'a str>,
    auth_info: Option<&'a str>,
}

impl ContactChanges<'_> {
    fn is_empty(&self) -> bool {
        self.postal.is_none()
            && self.voice.is_none()
            && self.fax.is_none()
            && self.email.is_none()
            && self.auth_info.is_none()
    }
}

fn write_statuses(w: &mut XmlWriter, tag: &str, attrs: &[&ContactAttr]) {
    if attrs.is_empty() {
        return;
    }
    w.open(tag);
    for ContactAttr::Status(s) in attrs.iter().copied() {
        write_status(w, "contact:status", s);
    }
    w.close(tag);
}

/// # Errors
///
/// Returns `Error::InvalidParams` for an empty ID or a postal change with
/// more than three street lines.
pub fn encode_contact_update(
    ctx: &EncodeContext<'_>,
    id: &str,
    ops: &[ContactUpdate],
) -> Result<Vec<u8>> {
    require(id, "contact ID")?;

    let mut add = Vec::new();
    let mut rem = Vec::new();
    let mut chg = ContactChanges::default();
    for op in ops {
        match op {
            UpdateOp::Add(a) => add.push(a),
            UpdateOp::Remove(a) => rem.push(a),
            UpdateOp::Change(ContactChange::Postal(pi)) => {
                check_postal(pi)?;
                chg.postal = Some(pi);
            }
            UpdateOp::Change(ContactChange::Voice(v)) => chg.voice = Some(v.as_str()),
            UpdateOp::Change(ContactChange::Fax(f)) => chg.fax = Some(f.as_str()),
            UpdateOp::Change(ContactChange::Email(e)) => chg.email = Some(e.as_str()),
            UpdateOp::Change(ContactChange::AuthInfo(pw)) => chg.auth_info = Some(pw.as_str()),
        }
    }

    let mut w = XmlWriter::command();
    open_contact(&mut w, "update");
    w.element("contact:id", id);
    write_statuses(&mut w, "contact:add", &add);
    write_statuses(&mut w, "contact:rem", &rem);
    if !chg.is_empty() {
        w.open("contact:chg");
        if let Some(pi) = chg.postal {
            write_postal(&mut w, pi);
        }
        w.optional("contact:voice", chg.voice)
            .optional("contact:fax", chg.fax)
            .optional("contact:email", chg.email);
        write_auth_info(&mut w, chg.auth_info);
        w.close("contact:chg");
    }
    close_contact(&mut w, "update");
    Ok(w.finish_command(ctx.cl_trid))
}
