//! The response aggregate and its decoder tables.
//!
//! Every object family registers the leaf paths it understands into one
//! process-wide [`Scanner`]. A round trip decodes into a fresh [`Response`]
//! and hands it to the caller by value.

mod contact;
mod domain;
mod fee;
mod host;
mod poll;

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use epp_types::{
    CheckResults, ContactCreated, ContactInfo, DomainCreated, DomainInfo, DomainRenewed,
    DomainTransfer, HostCreated, HostInfo, MessageQueue,
};
use serde::Serialize;

use crate::decoder::{Attributes, DecodeError, FieldError, Scanner, ScannerBuilder};
use crate::error::{Error, Result};
use crate::result::{EppResult, ExtValue, ResultCode};

/// Client and server transaction identifiers (`trID`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TransactionId {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,
    pub server: String,
}

/// Typed payload of a response. At most one kind is populated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum ResData {
    #[default]
    None,
    DomainCreated(DomainCreated),
    ContactCreated(ContactCreated),
    HostCreated(HostCreated),
    DomainInfo(DomainInfo),
    ContactInfo(ContactInfo),
    HostInfo(HostInfo),
    DomainRenewed(DomainRenewed),
    DomainTransfer(DomainTransfer),
    Check(CheckResults),
}

/// State carried between handlers of one document
#[derive(Debug, Clone, Default)]
struct Scratch {
    results_seen: usize,
    fee_currency: Option<String>,
    fee_command: String,
    fee_standard: bool,
    /// Whether the last list entry start was accepted. Text of a rejected
    /// entry is dropped instead of landing in the entry before it.
    entry_open: bool,
}

/// Decoded EPP response
#[derive(Debug, Clone, Default, Serialize)]
pub struct Response {
    /// Primary result, the canonical outcome
    pub result: EppResult,
    /// Additional `<result>` elements, kept for diagnostics
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extra_results: Vec<EppResult>,
    pub tr_id: TransactionId,
    pub data: ResData,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msg_queue: Option<MessageQueue>,
    #[serde(skip)]
    scratch: Scratch,
}

macro_rules! res_data_access {
    ($($variant:ident: $ty:ty => $get:ident, $take:ident;)*) => {
        impl ResData {
            $(
                /// Switch to this kind (if needed) and borrow it for population.
                pub(crate) fn $get(&mut self) -> &mut $ty {
                    if !matches!(self, ResData::$variant(_)) {
                        *self = ResData::$variant(<$ty>::default());
                    }
                    match self {
                        ResData::$variant(v) => v,
                        _ => unreachable!(),
                    }
                }
            )*
        }

        impl Response {
            $(
                /// Take the typed payload, if the response carried this kind.
                #[must_use]
                pub fn $take(self) -> Option<$ty> {
                    match self.data {
                        ResData::$variant(v) => Some(v),
                        _ => None,
                    }
                }
            )*
        }
    };
}

res_data_access! {
    DomainCreated: DomainCreated => domain_created, into_domain_created;
    ContactCreated: ContactCreated => contact_created, into_contact_created;
    HostCreated: HostCreated => host_created, into_host_created;
    DomainInfo: DomainInfo => domain_info, into_domain_info;
    ContactInfo: ContactInfo => contact_info, into_contact_info;
    HostInfo: HostInfo => host_info, into_host_info;
    DomainRenewed: DomainRenewed => domain_renewed, into_domain_renewed;
    DomainTransfer: DomainTransfer => domain_transfer, into_domain_transfer;
    Check: CheckResults => check, into_check;
}

static SCANNER: LazyLock<Scanner<Response>> = LazyLock::new(|| {
    let mut b: ScannerBuilder<Response> = Scanner::builder();
    register(&mut b);
    domain::register(&mut b);
    contact::register(&mut b);
    host::register(&mut b);
    poll::register(&mut b);
    fee::register(&mut b);
    b.build()
        .expect("response handler paths use known namespace prefixes")
});

impl Response {
    /// Decode a response document.
    ///
    /// # Errors
    ///
    /// Returns a `DecodeError` for malformed XML, a rejected field value, or a
    /// document without a `<result>`.
    pub fn decode(input: &[u8]) -> std::result::Result<Self, DecodeError> {
        let mut response = Response::default();
        response.decode_into(input)?;
        Ok(response)
    }

    /// Decode into `self`, keeping whatever populated before an error.
    ///
    /// # Errors
    ///
    /// See [`Response::decode`].
    pub fn decode_into(&mut self, input: &[u8]) -> std::result::Result<(), DecodeError> {
        SCANNER.scan(input, self)?;
        if self.scratch.results_seen == 0 {
            return Err(DecodeError::Missing("result"));
        }
        Ok(())
    }

    #[must_use]
    pub fn code(&self) -> ResultCode {
        self.result.code
    }

    /// Turn a failure code into `Error::Epp`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Epp` when the primary result code is 2000 or above.
    pub fn check(self) -> Result<Self> {
        if self.result.is_success() {
            Ok(self)
        } else {
            Err(self.result.into())
        }
    }

    /// Error for a document that failed to decode. A failure code read before
    /// the decode error takes precedence; sub-result fields mean nothing then.
    pub(crate) fn decode_failure(self, error: DecodeError) -> Error {
        if self.scratch.results_seen > 0 && !self.result.is_success() {
            self.result.into()
        } else {
            error.into()
        }
    }

    /// Result that the `msg`/`extValue` handlers currently write to.
    fn current_result(&mut self) -> &mut EppResult {
        match self.extra_results.last_mut() {
            Some(r) => r,
            None => &mut self.result,
        }
    }
}

/// Run a start handler that pushes one list entry. Its text handlers go
/// through [`open_entry`] and see nothing if the push was rejected.
pub(crate) fn push_entry(
    r: &mut Response,
    push: impl FnOnce(&mut Response) -> std::result::Result<(), FieldError>,
) -> std::result::Result<(), FieldError> {
    r.scratch.entry_open = false;
    push(r)?;
    r.scratch.entry_open = true;
    Ok(())
}

/// The last entry of a list, if its start handler accepted it.
pub(crate) fn open_entry<'a, E>(
    r: &'a mut Response,
    list: impl FnOnce(&'a mut ResData) -> &'a mut Vec<E>,
) -> Option<&'a mut E> {
    if r.scratch.entry_open {
        list(&mut r.data).last_mut()
    } else {
        None
    }
}

/// Parse an RFC 3339 timestamp as used in every EPP date element.
pub(crate) fn parse_time(value: &str) -> std::result::Result<DateTime<Utc>, FieldError> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| FieldError::invalid(value, e.to_string()))
}

pub(crate) fn parse_value<N>(value: &str) -> std::result::Result<N, FieldError>
where
    N: std::str::FromStr,
    N::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|e: N::Err| FieldError::invalid(value, e.to_string()))
}

fn on_result(r: &mut Response, attrs: &Attributes) -> std::result::Result<(), FieldError> {
    let code = match attrs.get("code") {
        Some(c) => ResultCode(parse_value(c.trim())?),
        None => return Err(FieldError::invalid("", "result without code")),
    };
    let result = EppResult {
        code,
        ..EppResult::default()
    };
    if r.scratch.results_seen == 0 {
        r.result = result;
    } else {
        r.extra_results.push(result);
    }
    r.scratch.results_seen += 1;
    Ok(())
}

fn set_ext_value(r: &mut Response, value: &str) -> std::result::Result<(), FieldError> {
    if let Some(ext) = r.current_result().reasons.last_mut() {
        value.clone_into(&mut ext.value);
    }
    Ok(())
}

fn register(b: &mut ScannerBuilder<Response>) {
    let result = "epp > response > result";
    b.on_start(result, on_result)
        .on_text(&format!("{result} > msg"), |r, s| {
            s.clone_into(&mut r.current_result().message);
            Ok(())
        })
        .on_start(&format!("{result} > extValue"), |r, _| {
            r.current_result().reasons.push(ExtValue::default());
            Ok(())
        })
        .on_text(&format!("{result} > extValue > value"), set_ext_value)
        .on_text(&format!("{result} > extValue > value > domain:name"), set_ext_value)
        .on_text(&format!("{result} > extValue > value > contact:id"), set_ext_value)
        .on_text(&format!("{result} > extValue > value > host:name"), set_ext_value)
        .on_text(&format!("{result} > extValue > reason"), |r, s| {
            if let Some(ext) = r.current_result().reasons.last_mut() {
                s.clone_into(&mut ext.reason);
            }
            Ok(())
        })
        .on_text("epp > response > trID > clTRID", |r, s| {
            r.tr_id.client = Some(s.to_string());
            Ok(())
        })
        .on_text("epp > response > trID > svTRID", |r, s| {
            s.clone_into(&mut r.tr_id.server);
            Ok(())
        });
}

/// Decode and fail on protocol errors in one step.
///
/// # Errors
///
/// Returns `Error::Decode` or `Error::Epp`.
pub fn interpret(input: &[u8]) -> Result<Response> {
    let mut response = Response::default();
    if let Err(e) = response.decode_into(input) {
        return Err(response.decode_failure(e));
    }
    response.check()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_builds() {
        LazyLock::force(&SCANNER);
    }

    #[test]
    fn test_missing_result_is_an_error() {
        let xml = r#"<epp xmlns="urn:ietf:params:xml:ns:epp-1.0"><response/></epp>"#;
        assert!(matches!(
            Response::decode(xml.as_bytes()),
            Err(DecodeError::Missing("result"))
        ));
    }

    #[test]
    fn test_failure_code_outranks_field_error() {
        let xml = r#"<epp xmlns="urn:ietf:params:xml:ns:epp-1.0"><response>
            <result code="2303"><msg>Object does not exist</msg></result>
            <msgQ count="many" id="1"/>
            <trID><svTRID>SV-1</svTRID></trID></response></epp>"#;
        match interpret(xml.as_bytes()) {
            Err(Error::Epp { code, .. }) => assert_eq!(code, ResultCode(2303)),
            other => panic!("expected Epp error, got {other:?}"),
        }
    }

    #[test]
    fn test_res_data_switches_kind() {
        let mut data = ResData::default();
        data.domain_info().name = "a.example".to_string();
        data.check().items.clear();
        assert!(matches!(data, ResData::Check(_)));
    }
}
