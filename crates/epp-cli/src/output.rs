//! Human and JSON rendering of command results.

use std::fmt::Write as _;

use anyhow::Result;
use chrono::{DateTime, Utc};
use epp_client::Response;
use epp_types::{
    CheckResults, ContactCreated, ContactInfo, DomainCreated, DomainInfo, DomainRenewed,
    DomainTransfer, Greeting, HostCreated, HostInfo,
};
use serde::Serialize;

/// A result that can be printed for a person or as JSON
pub trait Render: Serialize {
    fn human(&self, out: &mut String);
}

/// Print `value` to stdout in the requested format.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn emit<T: Render>(value: &T, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        let mut out = String::new();
        value.human(&mut out);
        print!("{out}");
    }
    Ok(())
}

fn date(value: Option<&DateTime<Utc>>) -> String {
    value.map_or_else(|| "-".to_string(), DateTime::to_rfc3339)
}

fn line(out: &mut String, label: &str, value: &str) {
    if !value.is_empty() {
        let _ = writeln!(out, "{label:<12} {value}");
    }
}

fn list(out: &mut String, label: &str, values: &[String]) {
    if !values.is_empty() {
        line(out, label, &values.join(", "));
    }
}

impl Render for Greeting {
    fn human(&self, out: &mut String) {
        line(out, "Server:", &self.server_name);
        line(out, "Date:", &date(self.server_date.as_ref()));
        list(out, "Versions:", &self.versions);
        list(out, "Languages:", &self.languages);
        for uri in &self.objects {
            line(out, "Object:", uri);
        }
        for uri in &self.extensions {
            line(out, "Extension:", uri);
        }
    }
}

impl Render for CheckResults {
    fn human(&self, out: &mut String) {
        for item in &self.items {
            let state = if item.available { "available" } else { "unavailable" };
            let _ = write!(out, "{:<30} {state}", item.name);
            if let Some(reason) = &item.reason {
                let _ = write!(out, " ({reason})");
            }
            out.push('\n');

            for charges in self.charges.iter().filter(|c| c.name.eq_ignore_ascii_case(&item.name)) {
                if let Some(category) = &charges.category {
                    let _ = writeln!(out, "    category: {category}");
                }
                let currency = charges.currency.as_deref().unwrap_or("");
                for fee in &charges.fees {
                    let _ = write!(out, "    {:<10} {} {currency}", fee.name, fee.amount);
                    if let Some(description) = &fee.description {
                        let _ = write!(out, " ({description})");
                    }
                    out.push('\n');
                }
            }
        }
    }
}

impl Render for DomainInfo {
    fn human(&self, out: &mut String) {
        line(out, "Domain:", &self.name);
        line(out, "ROID:", &self.roid);
        list(out, "Status:", &self.statuses);
        list(out, "RGP status:", &self.rgp_statuses);
        line(out, "Registrant:", &self.registrant);
        for contact in &self.contacts {
            line(out, &format!("{}:", contact.kind.as_str()), &contact.id);
        }
        list(out, "Nameservers:", &self.nameservers);
        list(out, "Hosts:", &self.hosts);
        line(out, "Sponsor:", &self.client_id);
        line(out, "Created:", &date(self.created.as_ref()));
        line(out, "Updated:", &date(self.updated.as_ref()));
        line(out, "Expires:", &date(self.expires.as_ref()));
        for ds in &self.ds_records {
            let _ = writeln!(
                out,
                "{:<12} {} {} {} {}",
                "DS:", ds.key_tag, ds.algorithm, ds.digest_type, ds.digest
            );
        }
    }
}

impl Render for ContactInfo {
    fn human(&self, out: &mut String) {
        line(out, "Contact:", &self.id);
        line(out, "ROID:", &self.roid);
        list(out, "Status:", &self.statuses);
        line(out, "Name:", &self.name);
        line(out, "Org:", self.org.as_deref().unwrap_or_default());
        for street in &self.street {
            line(out, "Street:", street);
        }
        line(out, "City:", &self.city);
        line(out, "Country:", &self.cc);
        line(out, "Email:", &self.email);
        line(out, "Voice:", self.voice.as_deref().unwrap_or_default());
        line(out, "Created:", &date(self.created.as_ref()));
    }
}

impl Render for HostInfo {
    fn human(&self, out: &mut String) {
        line(out, "Host:", &self.name);
        line(out, "ROID:", &self.roid);
        list(out, "Status:", &self.statuses);
        for addr in &self.addresses {
            line(out, "Address:", &addr.to_string());
        }
        line(out, "Sponsor:", &self.client_id);
        line(out, "Created:", &date(self.created.as_ref()));
    }
}

impl Render for DomainCreated {
    fn human(&self, out: &mut String) {
        let _ = writeln!(out, "Domain {} created", self.name);
        line(out, "Created:", &date(self.created.as_ref()));
        line(out, "Expires:", &date(self.expires.as_ref()));
    }
}

impl Render for ContactCreated {
    fn human(&self, out: &mut String) {
        let _ = writeln!(out, "Contact {} created", self.id);
        line(out, "Created:", &date(self.created.as_ref()));
    }
}

impl Render for HostCreated {
    fn human(&self, out: &mut String) {
        let _ = writeln!(out, "Host {} created", self.name);
        line(out, "Created:", &date(self.created.as_ref()));
    }
}

impl Render for DomainRenewed {
    fn human(&self, out: &mut String) {
        let _ = writeln!(out, "Domain {} renewed", self.name);
        line(out, "Expires:", &date(self.expires.as_ref()));
    }
}

impl Render for DomainTransfer {
    fn human(&self, out: &mut String) {
        line(out, "Domain:", &self.name);
        line(out, "Status:", &self.status);
        if !self.requested_by.is_empty() {
            let _ = writeln!(
                out,
                "{:<12} {} by {}",
                "Requested:",
                date(self.requested_at.as_ref()),
                self.requested_by
            );
        }
        if !self.acted_by.is_empty() {
            let _ = writeln!(
                out,
                "{:<12} {} by {}",
                "Acted:",
                date(self.acted_at.as_ref()),
                self.acted_by
            );
        }
        if self.expires.is_some() {
            line(out, "Expires:", &date(self.expires.as_ref()));
        }
    }
}

impl Render for Response {
    fn human(&self, out: &mut String) {
        let _ = writeln!(out, "{}", self.result);
        if let Some(queue) = &self.msg_queue {
            line(out, "Message ID:", &queue.id);
            line(out, "Remaining:", &queue.count.to_string());
            line(out, "Queued:", &date(queue.queued_at.as_ref()));
            line(out, "Message:", queue.message.as_deref().unwrap_or_default());
        }
        if let epp_client::ResData::DomainTransfer(transfer) = &self.data {
            transfer.human(out);
        }
    }
}
