//! Test module for epp-client
//!
//! Decoding of realistic server documents for:
//! - Result classification, transaction IDs and extValue reasons
//! - Domain, contact and host check/info/create/renew/transfer data
//! - Message queue responses
//! - Fee and charge pricing in check responses

mod contact_tests;
mod domain_tests;
mod fee_tests;
mod fixtures;
mod host_tests;
mod response_tests;
