//! Pricing from domain check responses.
//!
//! Three fee revisions and the charge extension report prices in different
//! shapes; all of them land in `CheckResults::charges`.

use epp_types::{DomainCharges, FeeLine};

use super::{Response, push_entry};
use crate::decoder::{Attributes, FieldError, ScannerBuilder};

const FEE10: &str = "epp > response > extension > fee:chkData";
const FEE06: &str = "epp > response > extension > fee06:chkData > fee06:cd";
const FEE05: &str = "epp > response > extension > fee05:chkData > fee05:cd";
const CHARGE: &str = "epp > response > extension > charge:chkData > charge:cd";

type HandlerResult = Result<(), FieldError>;

fn charges(r: &mut Response) -> Option<&mut DomainCharges> {
    r.data.check().charges.last_mut()
}

fn line(r: &mut Response) -> Option<&mut FeeLine> {
    charges(r).and_then(|c| c.fees.last_mut())
}

fn start_charges(r: &mut Response, _: &Attributes) -> HandlerResult {
    let currency = r.scratch.fee_currency.clone();
    r.data.check().charges.push(DomainCharges {
        currency,
        ..DomainCharges::default()
    });
    Ok(())
}

fn set_name(r: &mut Response, s: &str) -> HandlerResult {
    if let Some(c) = charges(r) {
        s.clone_into(&mut c.name);
    }
    Ok(())
}

fn set_category(r: &mut Response, s: &str) -> HandlerResult {
    if let Some(c) = charges(r) {
        c.category = Some(s.to_string());
    }
    Ok(())
}

fn set_currency(r: &mut Response, s: &str) -> HandlerResult {
    if let Some(c) = charges(r) {
        c.currency = Some(s.to_string());
    }
    Ok(())
}

/// `<fee:fee>` opens a new line for the current command.
fn start_fee(r: &mut Response, a: &Attributes) -> HandlerResult {
    push_entry(r, |r| {
        let fee = FeeLine {
            name: r.scratch.fee_command.clone(),
            standard: r.scratch.fee_standard,
            refundable: a.get_bool("refundable")?.unwrap_or(false),
            grace_period: a.get("grace-period").map(str::to_string),
            description: a.get("description").map(str::to_string),
            ..FeeLine::default()
        };
        push_line(r, fee);
        Ok(())
    })
}

fn push_line(r: &mut Response, fee: FeeLine) {
    if let Some(c) = charges(r) {
        c.fees.push(fee);
    }
}

fn set_amount(r: &mut Response, s: &str) -> HandlerResult {
    if !r.scratch.entry_open {
        return Ok(());
    }
    if let Some(l) = line(r) {
        s.clone_into(&mut l.amount);
    }
    Ok(())
}

/// In fee 0.5 and 0.6 the command is text that precedes its fees.
fn set_command_text(r: &mut Response, s: &str) -> HandlerResult {
    s.clone_into(&mut r.scratch.fee_command);
    r.scratch.fee_standard = false;
    Ok(())
}

fn register_draft(b: &mut ScannerBuilder<Response>, cd: &str, prefix: &str) {
    b.on_start(cd, |r, a| {
        r.scratch.fee_currency = None;
        r.scratch.fee_command.clear();
        start_charges(r, a)
    })
    .on_text(&format!("{cd} > {prefix}:name"), set_name)
    .on_text(&format!("{cd} > {prefix}:object > {prefix}:objID"), set_name)
    .on_text(&format!("{cd} > {prefix}:currency"), set_currency)
    .on_text(&format!("{cd} > {prefix}:command"), set_command_text)
    .on_start(&format!("{cd} > {prefix}:fee"), start_fee)
    .on_text(&format!("{cd} > {prefix}:fee"), set_amount)
    .on_text(&format!("{cd} > {prefix}:class"), set_category);
}

pub(super) fn register(b: &mut ScannerBuilder<Response>) {
    // fee-1.0: currency once for the whole response, commands carry a name
    // attribute and wrap their fees.
    b.on_start(FEE10, |r, _| {
        r.scratch.fee_currency = None;
        Ok(())
    })
    .on_text(&format!("{FEE10} > fee:currency"), |r, s| {
        r.scratch.fee_currency = Some(s.to_string());
        for c in &mut r.data.check().charges {
            c.currency = Some(s.to_string());
        }
        Ok(())
    })
    .on_start(&format!("{FEE10} > fee:cd"), start_charges)
    .on_text(&format!("{FEE10} > fee:cd > fee:objID"), set_name)
    .on_text(&format!("{FEE10} > fee:cd > fee:class"), set_category)
    .on_start(&format!("{FEE10} > fee:cd > fee:command"), |r, a| {
        a.get("name")
            .unwrap_or_default()
            .clone_into(&mut r.scratch.fee_command);
        r.scratch.fee_standard = a.get_bool("standard")?.unwrap_or(false);
        Ok(())
    })
    .on_start(&format!("{FEE10} > fee:cd > fee:command > fee:fee"), start_fee)
    .on_text(&format!("{FEE10} > fee:cd > fee:command > fee:fee"), set_amount);

    register_draft(b, FEE06, "fee06");
    register_draft(b, FEE05, "fee05");

    // charge-1.0: amounts are tagged with the command they price.
    b.on_start(CHARGE, |r, a| {
        r.scratch.fee_currency = None;
        start_charges(r, a)
    })
    .on_text(&format!("{CHARGE} > charge:name"), set_name)
    .on_text(&format!("{CHARGE} > charge:set > charge:category"), set_category)
    .on_start(&format!("{CHARGE} > charge:set > charge:amount"), |r, a| {
        push_entry(r, |r| {
            let name = a.get("name").or_else(|| a.get("command")).unwrap_or_default();
            let fee = FeeLine {
                name: name.to_string(),
                ..FeeLine::default()
            };
            push_line(r, fee);
            Ok(())
        })
    })
    .on_text(&format!("{CHARGE} > charge:set > charge:amount"), set_amount);
}
