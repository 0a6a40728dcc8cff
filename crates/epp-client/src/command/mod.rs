//! Command encoders.
//!
//! Each encoder is a pure function of its parameters and an
//! [`EncodeContext`], returning the complete document to frame and send.
//! The greeting in the context decides which extensions are safe to emit.

mod contact;
mod domain;
mod extension;
mod host;
mod poll;
mod session;
mod xml;

pub use contact::{
    encode_contact_check, encode_contact_create, encode_contact_delete, encode_contact_info,
    encode_contact_update,
};
pub use domain::{
    encode_domain_check, encode_domain_create, encode_domain_delete, encode_domain_info,
    encode_domain_renew, encode_domain_restore, encode_domain_transfer, encode_domain_update,
};
pub use host::{
    encode_host_check, encode_host_create, encode_host_delete, encode_host_info,
    encode_host_update,
};
pub use poll::{encode_poll_ack, encode_poll_request};
pub use session::{encode_hello, encode_login, encode_logout};

use epp_types::{Greeting, Period};

use crate::error::{Error, Result};

/// What an encoder may know about the session
#[derive(Debug, Clone, Copy)]
pub struct EncodeContext<'a> {
    pub greeting: &'a Greeting,
    /// Client transaction ID to place in `<clTRID>`
    pub cl_trid: Option<&'a str>,
}

impl<'a> EncodeContext<'a> {
    #[must_use]
    pub fn new(greeting: &'a Greeting) -> Self {
        Self {
            greeting,
            cl_trid: None,
        }
    }

    #[must_use]
    pub fn with_cl_trid(mut self, cl_trid: Option<&'a str>) -> Self {
        self.cl_trid = cl_trid;
        self
    }
}

fn check_period(period: Option<&Period>) -> Result<()> {
    match period {
        Some(p) if !p.is_valid() => Err(Error::invalid(format!(
            "period must be between 1 and {}, got {}",
            Period::MAX_VALUE,
            p.value
        ))),
        _ => Ok(()),
    }
}

fn require(value: &str, what: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::invalid(format!("{what} must not be empty")));
    }
    Ok(())
}

fn require_any<T>(values: &[T], what: &str) -> Result<()> {
    if values.is_empty() {
        return Err(Error::invalid(format!("at least one {what} is required")));
    }
    Ok(())
}
