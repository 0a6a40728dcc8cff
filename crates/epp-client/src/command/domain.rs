use chrono::NaiveDate;
use epp_types::{
    DomainAttr, DomainChange, DomainContact, DomainCreate, DomainUpdate, Extension, FeeQuery,
    HostsFilter, Period, Status, TransferOp, UpdateOp, format_exp_date,
};

use super::extension::{ExtensionBlock, Verb, write_domain_extensions};
use super::xml::XmlWriter;
use super::{EncodeContext, check_period, require, require_any};
use crate::error::Result;
use crate::greeting::fee_revision;
use crate::namespace;

fn write_period(w: &mut XmlWriter, period: Option<&Period>) {
    if let Some(p) = period {
        w.element_attr("domain:period", "unit", p.unit.as_str(), &p.value.to_string());
    }
}

fn write_auth_info(w: &mut XmlWriter, auth_info: Option<&str>) {
    if let Some(pw) = auth_info.filter(|pw| !pw.is_empty()) {
        w.open("domain:authInfo")
            .element("domain:pw", pw)
            .close("domain:authInfo");
    }
}

fn write_nameservers<S: AsRef<str>>(w: &mut XmlWriter, hosts: &[S]) {
    let mut hosts = hosts.iter().map(AsRef::as_ref).filter(|h| !h.is_empty()).peekable();
    if hosts.peek().is_none() {
        return;
    }
    w.open("domain:ns");
    for host in hosts {
        w.element("domain:hostObj", host);
    }
    w.close("domain:ns");
}

/// Contacts in the schema's admin, tech, billing order.
fn write_contacts<'a>(w: &mut XmlWriter, contacts: impl IntoIterator<Item = &'a DomainContact>) {
    let mut sorted: Vec<&DomainContact> = contacts.into_iter().filter(|c| !c.id.is_empty()).collect();
    sorted.sort_by_key(|c| c.kind);
    for c in sorted {
        w.element_attr("domain:contact", "type", c.kind.as_str(), &c.id);
    }
}

pub(super) fn write_status(w: &mut XmlWriter, tag: &str, status: &Status) {
    match status.reason.as_deref() {
        Some(reason) if !reason.is_empty() => {
            w.element_attr(tag, "s", &status.status, reason);
        }
        _ => {
            w.empty_attr(tag, "s", &status.status);
        }
    }
}

/// Open `<verb><domain:verb xmlns:domain="...">`.
fn open_domain(w: &mut XmlWriter, verb: &str) {
    w.open(verb)
        .open_ns(&format!("domain:{verb}"), "domain", namespace::OBJ_DOMAIN);
}

fn close_domain(w: &mut XmlWriter, verb: &str) {
    w.close(&format!("domain:{verb}")).close(verb);
}

/// `<check>` for one or more domain names, optionally asking for prices.
///
/// # Errors
///
/// Returns `Error::InvalidParams` if `names` is empty or the pricing period
/// is out of range.
pub fn encode_domain_check<S: AsRef<str>>(
    ctx: &EncodeContext<'_>,
    names: &[S],
    pricing: Option<&FeeQuery>,
    extensions: &[Extension],
) -> Result<Vec<u8>> {
    require_any(names, "domain name")?;
    check_period(pricing.and_then(|q| q.period.as_ref()))?;

    let mut w = XmlWriter::command();
    open_domain(&mut w, "check");
    for name in names {
        w.element("domain:name", name.as_ref());
    }
    close_domain(&mut w, "check");

    let mut block = ExtensionBlock::new(&mut w);
    if let Some(query) = pricing
        && let Some(uri) = fee_revision(ctx.greeting)
    {
        write_fee_check(block.writer(), uri, names, query);
    }
    block.domain(ctx.greeting, Verb::Check, extensions);
    block.finish();

    Ok(w.finish_command(ctx.cl_trid))
}

fn write_fee_check<S: AsRef<str>>(w: &mut XmlWriter, uri: &str, names: &[S], query: &FeeQuery) {
    let period = |w: &mut XmlWriter| {
        if let Some(p) = &query.period {
            w.element_attr("fee:period", "unit", p.unit.as_str(), &p.value.to_string());
        }
    };

    w.open_ns("fee:check", "fee", uri);
    if uri == namespace::EXT_FEE_10 {
        w.optional("fee:currency", query.currency.as_deref())
            .open_attr("fee:command", "name", &query.command);
        period(w);
        w.close("fee:command");
    } else {
        // Draft revisions ask per name.
        for name in names {
            w.open("fee:domain")
                .element("fee:name", name.as_ref())
                .optional("fee:currency", query.currency.as_deref())
                .element("fee:command", &query.command);
            period(w);
            w.close("fee:domain");
        }
    }
    w.close("fee:check");
}

/// `<info>` for a domain.
///
/// # Errors
///
/// Returns `Error::InvalidParams` if `name` is empty.
pub fn encode_domain_info(
    ctx: &EncodeContext<'_>,
    name: &str,
    hosts: HostsFilter,
    auth_info: Option<&str>,
    extensions: &[Extension],
) -> Result<Vec<u8>> {
    require(name, "domain name")?;

    let mut w = XmlWriter::command();
    open_domain(&mut w, "info");
    w.element_attr("domain:name", "hosts", hosts.as_str(), name);
    write_auth_info(&mut w, auth_info);
    close_domain(&mut w, "info");
    write_domain_extensions(&mut w, ctx.greeting, Verb::Info, extensions);
    Ok(w.finish_command(ctx.cl_trid))
}

/// `<create>` for a domain.
///
/// # Errors
///
/// Returns `Error::InvalidParams` for an empty name or an out-of-range period.
pub fn encode_domain_create(
    ctx: &EncodeContext<'_>,
    params: &DomainCreate,
    extensions: &[Extension],
) -> Result<Vec<u8>> {
    require(&params.name, "domain name")?;
    check_period(params.period.as_ref())?;

    let mut w = XmlWriter::command();
    open_domain(&mut w, "create");
    w.element("domain:name", &params.name);
    write_period(&mut w, params.period.as_ref());
    write_nameservers(&mut w, &params.nameservers);
    w.optional("domain:registrant", params.registrant.as_deref());
    write_contacts(&mut w, &params.contacts);
    write_auth_info(&mut w, params.auth_info.as_deref());
    close_domain(&mut w, "create");
    write_domain_extensions(&mut w, ctx.greeting, Verb::Create, extensions);
    Ok(w.finish_command(ctx.cl_trid))
}

/// `<delete>` for a domain.
///
/// # Errors
///
/// Returns `Error::InvalidParams` if `name` is empty.
pub fn encode_domain_delete(
    ctx: &EncodeContext<'_>,
    name: &str,
    extensions: &[Extension],
) -> Result<Vec<u8>> {
    require(name, "domain name")?;

    let mut w = XmlWriter::command();
    open_domain(&mut w, "delete");
    w.element("domain:name", name);
    close_domain(&mut w, "delete");
    write_domain_extensions(&mut w, ctx.greeting, Verb::Delete, extensions);
    Ok(w.finish_command(ctx.cl_trid))
}

/// `<renew>` for a domain whose current expiry is `current_expiry`.
///
/// # Errors
///
/// Returns `Error::InvalidParams` for an empty name or an out-of-range period.
pub fn encode_domain_renew(
    ctx: &EncodeContext<'_>,
    name: &str,
    current_expiry: NaiveDate,
    period: Option<Period>,
    extensions: &[Extension],
) -> Result<Vec<u8>> {
    require(name, "domain name")?;
    check_period(period.as_ref())?;

    let mut w = XmlWriter::command();
    open_domain(&mut w, "renew");
    w.element("domain:name", name)
        .element("domain:curExpDate", &format_exp_date(current_expiry));
    write_period(&mut w, period.as_ref());
    close_domain(&mut w, "renew");
    write_domain_extensions(&mut w, ctx.greeting, Verb::Renew, extensions);
    Ok(w.finish_command(ctx.cl_trid))
}

/// `<transfer op="...">` for a domain.
///
/// # Errors
///
/// Returns `Error::InvalidParams` for an empty name or an out-of-range period.
pub fn encode_domain_transfer(
    ctx: &EncodeContext<'_>,
    op: TransferOp,
    name: &str,
    period: Option<Period>,
    auth_info: Option<&str>,
    extensions: &[Extension],
) -> Result<Vec<u8>> {
    require(name, "domain name")?;
    check_period(period.as_ref())?;

    let mut w = XmlWriter::command();
    w.open_attr("transfer", "op", op.as_str())
        .open_ns("domain:transfer", "domain", namespace::OBJ_DOMAIN)
        .element("domain:name", name);
    write_period(&mut w, period.as_ref());
    write_auth_info(&mut w, auth_info);
    w.close("domain:transfer").close("transfer");
    write_domain_extensions(&mut w, ctx.greeting, Verb::Transfer, extensions);
    Ok(w.finish_command(ctx.cl_trid))
}

fn write_add_rem<'a>(w: &mut XmlWriter, tag: &str, attrs: &[&'a DomainAttr]) {
    if attrs.is_empty() {
        return;
    }
    w.open(tag);
    let hosts: Vec<&str> = attrs
        .iter()
        .filter_map(|a| match a {
            DomainAttr::Nameserver(h) => Some(h.as_str()),
            _ => None,
        })
        .collect();
    write_nameservers(w, &hosts);
    write_contacts(
        w,
        attrs.iter().filter_map(|a| match a {
            DomainAttr::Contact(c) => Some(c),
            _ => None,
        }),
    );
    for attr in attrs {
        if let DomainAttr::Status(s) = attr {
            write_status(w, "domain:status", s);
        }
    }
    w.close(tag);
}

fn is_blank(attr: &DomainAttr) -> bool {
    match attr {
        DomainAttr::Nameserver(host) => host.is_empty(),
        DomainAttr::Contact(c) => c.id.is_empty(),
        DomainAttr::Status(s) => s.status.is_empty(),
    }
}

/// `<update>` for a domain. Operations are grouped into `add`, `rem` and
/// `chg` in schema order; a later change of the same field wins.
///
/// # Errors
///
/// Returns `Error::InvalidParams` if `name` is empty.
pub fn encode_domain_update(
    ctx: &EncodeContext<'_>,
    name: &str,
    ops: &[DomainUpdate],
    extensions: &[Extension],
) -> Result<Vec<u8>> {
    require(name, "domain name")?;

    let mut add = Vec::new();
    let mut rem = Vec::new();
    let mut registrant = None;
    let mut auth_info = None;
    for op in ops {
        match op {
            UpdateOp::Add(a) if !is_blank(a) => add.push(a),
            UpdateOp::Remove(a) if !is_blank(a) => rem.push(a),
            UpdateOp::Add(_) | UpdateOp::Remove(_) => {}
            UpdateOp::Change(DomainChange::Registrant(r)) => registrant = Some(r.as_str()),
            UpdateOp::Change(DomainChange::AuthInfo(pw)) => auth_info = Some(pw.as_str()),
        }
    }
    let registrant = registrant.filter(|r| !r.is_empty());
    let auth_info = auth_info.filter(|pw| !pw.is_empty());

    let mut w = XmlWriter::command();
    open_domain(&mut w, "update");
    w.element("domain:name", name);
    write_add_rem(&mut w, "domain:add", &add);
    write_add_rem(&mut w, "domain:rem", &rem);
    if registrant.is_some() || auth_info.is_some() {
        w.open("domain:chg").optional("domain:registrant", registrant);
        write_auth_info(&mut w, auth_info);
        w.close("domain:chg");
    }
    close_domain(&mut w, "update");
    write_domain_extensions(&mut w, ctx.greeting, Verb::Update, extensions);
    Ok(w.finish_command(ctx.cl_trid))
}

/// RGP restore request: an empty `<domain:chg/>` update carrying
/// `<rgp:restore op="request"/>`.
///
/// # Errors
///
/// Returns `Error::InvalidParams` if `name` is empty.
pub fn encode_domain_restore(
    ctx: &EncodeContext<'_>,
    name: &str,
    extensions: &[Extension],
) -> Result<Vec<u8>> {
    require(name, "domain name")?;

    let mut w = XmlWriter::command();
    open_domain(&mut w, "update");
    w.element("domain:name", name).raw("<domain:chg/>");
    close_domain(&mut w, "update");

    let mut block = ExtensionBlock::new(&mut w);
    block
        .writer()
        .open_ns("rgp:update", "rgp", namespace::EXT_RGP)
        .empty_attr("rgp:restore", "op", "request")
        .close("rgp:update");
    block.domain(ctx.greeting, Verb::Update, extensions);
    block.finish();

    Ok(w.finish_command(ctx.cl_trid))
}
