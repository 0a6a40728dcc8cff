//! Shared types for EPP client components.
//!
//! This crate provides the command parameters, typed update operations,
//! extension requests and decoded results used by epp-client and epp-cli.
//! All result types are serializable so the CLI can emit them as JSON.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

/// Error returned when parsing one of the keyword enums from text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseKeywordError {
    pub kind: &'static str,
    pub value: String,
}

impl fmt::Display for ParseKeywordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: {:?}", self.kind, self.value)
    }
}

impl std::error::Error for ParseKeywordError {}

// ============================================================================
// Command parameters
// ============================================================================

/// Unit of a registration period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PeriodUnit {
    #[default]
    #[serde(rename = "y")]
    Year,
    #[serde(rename = "m")]
    Month,
}

impl PeriodUnit {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            PeriodUnit::Year => "y",
            PeriodUnit::Month => "m",
        }
    }
}

/// Registration or renewal period (`<domain:period unit="y">1</domain:period>`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub value: u16,
    pub unit: PeriodUnit,
}

impl Period {
    /// Largest period value accepted by the domain mapping.
    pub const MAX_VALUE: u16 = 99;

    #[must_use]
    pub fn years(value: u16) -> Self {
        Self {
            value,
            unit: PeriodUnit::Year,
        }
    }

    #[must_use]
    pub fn months(value: u16) -> Self {
        Self {
            value,
            unit: PeriodUnit::Month,
        }
    }

    /// Whether the value lies in the 1..=99 range the protocol allows.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        (1..=Self::MAX_VALUE).contains(&self.value)
    }
}

/// Role of a contact linked to a domain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactType {
    Admin,
    Tech,
    Billing,
}

impl ContactType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ContactType::Admin => "admin",
            ContactType::Tech => "tech",
            ContactType::Billing => "billing",
        }
    }
}

impl FromStr for ContactType {
    type Err = ParseKeywordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(ContactType::Admin),
            "tech" => Ok(ContactType::Tech),
            "billing" => Ok(ContactType::Billing),
            other => Err(ParseKeywordError {
                kind: "contact type",
                value: other.to_string(),
            }),
        }
    }
}

/// Contact linked to a domain, by role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainContact {
    #[serde(rename = "type")]
    pub kind: ContactType,
    pub id: String,
}

impl DomainContact {
    #[must_use]
    pub fn new(kind: ContactType, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
        }
    }
}

/// Object status value with an optional free-text reason
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl Status {
    #[must_use]
    pub fn new(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            reason: None,
        }
    }

    #[must_use]
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

/// Postal address of a contact. Input only; contact info results carry
/// their own fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostalInfo {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org: Option<String>,
    /// Up to three street lines
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub street: Vec<String>,
    pub city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pc: Option<String>,
    pub cc: String,
}

impl PostalInfo {
    /// Maximum number of street lines in an address.
    pub const MAX_STREET_LINES: usize = 3;
}

/// Transfer operation (`<transfer op="...">`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferOp {
    #[default]
    Query,
    Request,
    Approve,
    Reject,
    Cancel,
}

impl TransferOp {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TransferOp::Query => "query",
            TransferOp::Request => "request",
            TransferOp::Approve => "approve",
            TransferOp::Reject => "reject",
            TransferOp::Cancel => "cancel",
        }
    }
}

impl FromStr for TransferOp {
    type Err = ParseKeywordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "query" => Ok(TransferOp::Query),
            "request" => Ok(TransferOp::Request),
            "approve" => Ok(TransferOp::Approve),
            "reject" => Ok(TransferOp::Reject),
            "cancel" => Ok(TransferOp::Cancel),
            other => Err(ParseKeywordError {
                kind: "transfer operation",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for TransferOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which hosts a domain info response should list (`hosts` attribute)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostsFilter {
    #[default]
    All,
    Del,
    Sub,
    None,
}

impl HostsFilter {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            HostsFilter::All => "all",
            HostsFilter::Del => "del",
            HostsFilter::Sub => "sub",
            HostsFilter::None => "none",
        }
    }
}

impl FromStr for HostsFilter {
    type Err = ParseKeywordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(HostsFilter::All),
            "del" => Ok(HostsFilter::Del),
            "sub" => Ok(HostsFilter::Sub),
            "none" => Ok(HostsFilter::None),
            other => Err(ParseKeywordError {
                kind: "hosts filter",
                value: other.to_string(),
            }),
        }
    }
}

/// Parameters of a domain create
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainCreate {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<Period>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nameservers: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registrant: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub contacts: Vec<DomainContact>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_info: Option<String>,
}

/// Parameters of a contact create
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactCreate {
    pub id: String,
    pub postal: PostalInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fax: Option<String>,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_info: Option<String>,
}

/// Price request attached to a domain check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeQuery {
    /// Command to price (`create`, `renew`, `transfer`, `restore`)
    pub command: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<Period>,
}

impl Default for FeeQuery {
    fn default() -> Self {
        Self {
            command: "create".to_string(),
            currency: None,
            period: None,
        }
    }
}

// ============================================================================
// Update operations
// ============================================================================

/// One add, remove or change operation of an update command.
///
/// `A` is the attribute kind that can be added or removed, `C` the kind of
/// value that can be changed in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", content = "value", rename_all = "snake_case")]
pub enum UpdateOp<A, C> {
    Add(A),
    Remove(A),
    Change(C),
}

/// Attribute of a domain that can be added or removed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DomainAttr {
    Nameserver(String),
    Contact(DomainContact),
    Status(Status),
}

/// Domain value that can be replaced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DomainChange {
    Registrant(String),
    AuthInfo(String),
}

/// Attribute of a contact that can be added or removed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactAttr {
    Status(Status),
}

/// Contact value that can be replaced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactChange {
    Postal(PostalInfo),
    Voice(String),
    Fax(String),
    Email(String),
    AuthInfo(String),
}

/// Attribute of a host that can be added or removed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HostAttr {
    Address(IpAddr),
    Status(Status),
}

/// Host value that can be replaced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HostChange {
    Name(String),
}

pub type DomainUpdate = UpdateOp<DomainAttr, DomainChange>;
pub type ContactUpdate = UpdateOp<ContactAttr, ContactChange>;
pub type HostUpdate = UpdateOp<HostAttr, HostChange>;

// ============================================================================
// Extension requests
// ============================================================================

/// Registry extension attached to a command.
///
/// Each encoder emits only the kinds that apply to its verb and ignores the
/// rest; namestore is additionally gated on the server greeting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Extension {
    /// Acknowledge a price (`fee:<verb>` with `fee:currency` and `fee:fee`)
    Fee {
        amount: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        currency: Option<String>,
    },
    /// Launch phase for a create during a sunrise/landrush period
    LaunchPhase { phase: String },
    /// Verisign namestore sub-product (e.g. `COM`, `NET`)
    Namestore { sub_product: String },
}

impl Extension {
    #[must_use]
    pub fn fee(amount: impl Into<String>, currency: Option<String>) -> Self {
        Extension::Fee {
            amount: amount.into(),
            currency,
        }
    }
}

// ============================================================================
// Greeting
// ============================================================================

/// Server capability advertisement received at connect and on hello
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Greeting {
    pub server_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub versions: Vec<String>,
    #[serde(default)]
    pub languages: Vec<String>,
    /// Object namespace URIs (`svcMenu > objURI`)
    #[serde(default)]
    pub objects: Vec<String>,
    /// Extension namespace URIs (`svcMenu > svcExtension > extURI`)
    #[serde(default)]
    pub extensions: Vec<String>,
}

impl Greeting {
    #[must_use]
    pub fn supports_object(&self, uri: &str) -> bool {
        self.objects.iter().any(|o| o == uri)
    }

    #[must_use]
    pub fn supports_extension(&self, uri: &str) -> bool {
        self.extensions.iter().any(|e| e == uri)
    }
}

// ============================================================================
// Results
// ============================================================================

/// Result of a domain create
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainCreated {
    pub name: String,
    pub created: Option<DateTime<Utc>>,
    pub expires: Option<DateTime<Utc>>,
}

/// Result of a contact create
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactCreated {
    pub id: String,
    pub created: Option<DateTime<Utc>>,
}

/// Result of a host create
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostCreated {
    pub name: String,
    pub created: Option<DateTime<Utc>>,
}

/// Result of a domain renew
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainRenewed {
    pub name: String,
    pub expires: Option<DateTime<Utc>>,
}

/// Transfer state of a domain (`domain:trnData`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainTransfer {
    pub name: String,
    pub status: String,
    pub requested_by: String,
    pub requested_at: Option<DateTime<Utc>>,
    pub acted_by: String,
    pub acted_at: Option<DateTime<Utc>>,
    pub expires: Option<DateTime<Utc>>,
}

/// Availability of one object in a check response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckItem {
    pub name: String,
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// One priced line from a fee or charge extension
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeLine {
    /// Command or charge type the amount applies to (create, renew, ...)
    pub name: String,
    pub amount: String,
    pub standard: bool,
    pub refundable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grace_period: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Pricing for one domain name from a check response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainCharges {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    pub fees: Vec<FeeLine>,
}

/// Result of a domain, contact or host check
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResults {
    pub items: Vec<CheckItem>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub charges: Vec<DomainCharges>,
}

impl CheckResults {
    /// Look up the availability entry for a name.
    #[must_use]
    pub fn item(&self, name: &str) -> Option<&CheckItem> {
        self.items.iter().find(|i| i.name.eq_ignore_ascii_case(name))
    }
}

/// secDNS delegation signer record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DsRecord {
    pub key_tag: u16,
    pub algorithm: u8,
    pub digest_type: u8,
    pub digest: String,
}

/// Result of a domain info
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainInfo {
    pub name: String,
    pub roid: String,
    pub statuses: Vec<String>,
    pub registrant: String,
    pub contacts: Vec<DomainContact>,
    pub nameservers: Vec<String>,
    pub hosts: Vec<String>,
    pub client_id: String,
    pub creator_id: String,
    pub created: Option<DateTime<Utc>>,
    pub updater_id: String,
    pub updated: Option<DateTime<Utc>>,
    pub expires: Option<DateTime<Utc>>,
    pub transferred: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_info: Option<String>,
    /// Redemption grace period statuses (`rgp:rgpStatus`)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rgp_statuses: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ds_records: Vec<DsRecord>,
}

/// Result of a contact info
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub id: String,
    pub roid: String,
    pub statuses: Vec<String>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub org: Option<String>,
    pub street: Vec<String>,
    pub city: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pc: Option<String>,
    pub cc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fax: Option<String>,
    pub email: String,
    pub client_id: String,
    pub creator_id: String,
    pub created: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
}

/// Result of a host info
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostInfo {
    pub name: String,
    pub roid: String,
    pub statuses: Vec<String>,
    pub addresses: Vec<IpAddr>,
    pub client_id: String,
    pub creator_id: String,
    pub created: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
}

/// Message queue state from a poll response (`msgQ`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageQueue {
    pub count: u32,
    pub id: String,
    pub queued_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Current expiry of a domain, as sent in `domain:curExpDate`
#[must_use]
pub fn format_exp_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
