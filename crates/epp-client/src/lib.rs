//! Client side of the Extensible Provisioning Protocol (RFC 5730) over a
//! length-framed byte stream (RFC 5734).
//!
//! # Architecture
//!
//! - [`transport`]: Four-byte length-prefixed frame codec
//! - [`decoder`]: Path-addressed streaming XML scanner
//! - [`greeting`]: Greeting decoding and login service negotiation
//! - [`response`]: Result, transaction ID, message queue and typed `resData`
//! - [`command`]: Pure encoders for every supported command
//! - [`session`]: Serialized request/response exchange over one stream
//! - [`result`], [`error`]: Result codes and the error taxonomy
//!
//! # Example
//!
//! ```no_run
//! use epp_client::{Session, SessionOptions};
//! use epp_types::FeeQuery;
//! use std::time::Duration;
//!
//! # async fn example() -> epp_client::Result<()> {
//! let stream = tokio::net::TcpStream::connect("epp.example.net:700").await?;
//! let options = SessionOptions::default().with_timeout(Duration::from_secs(30));
//! let session = Session::connect(stream, options).await?;
//!
//! session.login("ClientX", "foo-BAR2", None).await?;
//! let results = session
//!     .check_domains(&["example.com"], Some(&FeeQuery::default()), &[])
//!     .await?;
//! for item in &results.items {
//!     println!("{} available={}", item.name, item.available);
//! }
//! session.close().await;
//! # Ok(())
//! # }
//! ```

pub mod command;
pub mod decoder;
pub mod error;
pub mod greeting;
pub mod namespace;
pub mod response;
pub mod result;
pub mod session;
pub mod transport;

#[cfg(test)]
mod tests;

pub use command::EncodeContext;
pub use decoder::{DecodeError, Scanner};
pub use error::{Error, Result};
pub use greeting::{decode_greeting, fee_revision, negotiate_services};
pub use response::{ResData, Response, TransactionId, interpret};
pub use result::{EppResult, ExtValue, Outcome, ResultCode};
pub use session::{Direction, Session, SessionOptions, Transport, WireObserver};
pub use transport::{FrameCodec, FrameError};
