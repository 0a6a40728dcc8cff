//! An EPP session over one ordered byte stream.
//!
//! The session owns the stream and the last greeting. Every exchange, typed or
//! raw, goes through one round-trip primitive that holds an exclusive lock
//! while it writes a frame and reads the next one, so concurrent callers never
//! interleave frames. A transport failure or timeout leaves the stream at an
//! unknown position; the session drops it and every later call fails with
//! [`Error::Closed`].

use std::fmt;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use chrono::NaiveDate;
use epp_types::{
    CheckResults, ContactCreate, ContactCreated, ContactInfo, ContactUpdate, DomainCreate,
    DomainCreated, DomainInfo, DomainRenewed, DomainTransfer, DomainUpdate, Extension, FeeQuery,
    Greeting, HostCreated, HostInfo, HostUpdate, HostsFilter, Period, TransferOp,
};
use futures_util::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;
use tokio_util::codec::Framed;
use uuid::Uuid;

use crate::command::{self, EncodeContext};
use crate::decoder::DecodeError;
use crate::error::{Error, Result};
use crate::greeting::decode_greeting;
use crate::response::Response;
use crate::transport::{DEFAULT_MAX_FRAME_SIZE, FrameCodec, FrameError};

/// Any ordered, reliable, bidirectional byte stream (TCP, TLS, in-memory)
pub trait Transport: AsyncRead + AsyncWrite + Unpin + Send {}

impl<T: AsyncRead + AsyncWrite + Unpin + Send> Transport for T {}

/// Direction of a frame seen by a [`WireObserver`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Sent,
    Received,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Sent => f.write_str("sent"),
            Direction::Received => f.write_str("received"),
        }
    }
}

/// Receives a copy of every frame payload the session sends or receives.
pub trait WireObserver: Send + Sync {
    fn frame(&self, direction: Direction, payload: &[u8]);
}

/// Session configuration
#[derive(Clone)]
pub struct SessionOptions {
    /// Deadline for each round trip; `None` waits indefinitely
    pub timeout: Option<Duration>,
    /// Largest payload accepted from the server
    pub max_frame_size: usize,
    pub observer: Option<Arc<dyn WireObserver>>,
    /// When set, commands carry a `<clTRID>` of `<prefix>-<uuid>`
    pub transaction_prefix: Option<String>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            timeout: None,
            max_frame_size: DEFAULT_MAX_FRAME_SIZE,
            observer: None,
            transaction_prefix: None,
        }
    }
}

impl fmt::Debug for SessionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionOptions")
            .field("timeout", &self.timeout)
            .field("max_frame_size", &self.max_frame_size)
            .field("observer", &self.observer.is_some())
            .field("transaction_prefix", &self.transaction_prefix)
            .finish()
    }
}

impl SessionOptions {
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn WireObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    #[must_use]
    pub fn with_transaction_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.transaction_prefix = Some(prefix.into());
        self
    }

    #[must_use]
    pub fn with_max_frame_size(mut self, max_frame_size: usize) -> Self {
        self.max_frame_size = max_frame_size;
        self
    }
}

struct Inner<T> {
    framed: Option<Framed<T, FrameCodec>>,
    greeting: Greeting,
    logged_in: bool,
}

/// A live EPP session
pub struct Session<T> {
    inner: Mutex<Inner<T>>,
    options: SessionOptions,
}

impl<T> fmt::Debug for Session<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl<T: Transport> Session<T> {
    /// Take ownership of an established stream and read the server greeting.
    ///
    /// # Errors
    ///
    /// Returns `Error::Transport` or `Error::Timeout` if no greeting frame
    /// arrives, or `Error::Decode` if the first frame is not a greeting.
    pub async fn connect(stream: T, options: SessionOptions) -> Result<Self> {
        let mut framed = Framed::new(stream, FrameCodec::with_max_frame_size(options.max_frame_size));

        let frame = with_deadline(options.timeout, read_next(&mut framed)).await?;
        observe(&options, Direction::Received, &frame);

        let greeting = decode_greeting(&frame)?;
        tracing::info!(
            "Connected to {} ({} objects, {} extensions)",
            greeting.server_name,
            greeting.objects.len(),
            greeting.extensions.len()
        );

        Ok(Self {
            inner: Mutex::new(Inner {
                framed: Some(framed),
                greeting,
                logged_in: false,
            }),
            options,
        })
    }

    /// The most recent server greeting.
    pub async fn greeting(&self) -> Greeting {
        self.inner.lock().await.greeting.clone()
    }

    /// Whether the transport is still usable.
    pub async fn is_open(&self) -> bool {
        self.inner.lock().await.framed.is_some()
    }

    pub async fn is_logged_in(&self) -> bool {
        self.inner.lock().await.logged_in
    }

    /// Send `<hello/>` and replace the cached greeting with the answer.
    ///
    /// # Errors
    ///
    /// Returns `Error::Decode` if the answer is not a greeting, or a transport
    /// error.
    pub async fn hello(&self) -> Result<Greeting> {
        let mut inner = self.inner.lock().await;
        let frame = self.round_trip(&mut inner, command::encode_hello()).await?;
        let greeting = decode_greeting(&frame)?;
        inner.greeting = greeting.clone();
        Ok(greeting)
    }

    /// Authenticate, optionally changing the password.
    ///
    /// # Errors
    ///
    /// Returns `Error::Epp` if the server rejects the login.
    pub async fn login(&self, user: &str, password: &str, new_password: Option<&str>) -> Result<Response> {
        let mut inner = self.inner.lock().await;
        let response = self
            .execute_locked(&mut inner, |ctx| Ok(command::encode_login(ctx, user, password, new_password)))
            .await?;
        inner.logged_in = true;
        tracing::info!("Logged in as {user}");
        Ok(response)
    }

    /// End the session with `<logout/>` and release the transport.
    ///
    /// # Errors
    ///
    /// Returns the logout failure; the transport is released either way.
    pub async fn logout(&self) -> Result<Response> {
        let mut inner = self.inner.lock().await;
        let result = self
            .execute_locked(&mut inner, |ctx| Ok(command::encode_logout(ctx)))
            .await;
        inner.logged_in = false;
        release(&mut inner).await;
        result
    }

    /// Log out if logged in (ignoring failures), then release the transport.
    pub async fn close(&self) {
        let mut inner = self.inner.lock().await;
        if inner.logged_in && inner.framed.is_some() {
            if let Err(e) = self
                .execute_locked(&mut inner, |ctx| Ok(command::encode_logout(ctx)))
                .await
            {
                tracing::warn!("Logout failed while closing: {e}");
            }
            inner.logged_in = false;
        }
        release(&mut inner).await;
    }

    /// Send a document unmodified and return the next frame undecoded.
    ///
    /// # Errors
    ///
    /// Returns transport, timeout or closed-session errors.
    pub async fn raw(&self, payload: &[u8]) -> Result<Bytes> {
        let mut inner = self.inner.lock().await;
        self.round_trip(&mut inner, payload.to_vec()).await
    }

    /// Encode, send and decode one command, failing on error result codes.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidParams` from the encoder, `Error::Decode`,
    /// `Error::Epp` for result codes of 2000 and above, or a transport error.
    pub async fn execute<F>(&self, encode: F) -> Result<Response>
    where
        F: FnOnce(&EncodeContext<'_>) -> Result<Vec<u8>>,
    {
        let mut inner = self.inner.lock().await;
        self.execute_locked(&mut inner, encode).await
    }

    async fn execute_locked<F>(&self, inner: &mut Inner<T>, encode: F) -> Result<Response>
    where
        F: FnOnce(&EncodeContext<'_>) -> Result<Vec<u8>>,
    {
        if inner.framed.is_none() {
            return Err(Error::Closed);
        }

        let cl_trid = self.next_cl_trid();
        let ctx = EncodeContext::new(&inner.greeting).with_cl_trid(cl_trid.as_deref());
        let payload = encode(&ctx)?;

        let frame = self.round_trip(inner, payload).await?;
        let mut response = Response::default();
        if let Err(e) = response.decode_into(&frame) {
            return Err(response.decode_failure(e));
        }

        if let Some(sent) = &cl_trid
            && response.tr_id.client.as_deref() != Some(sent.as_str())
        {
            tracing::warn!(
                "Transaction ID mismatch: sent {sent}, got {:?}",
                response.tr_id.client
            );
        }
        tracing::debug!(
            "Result {} ({}), svTRID {}",
            response.result.code,
            response.result.message,
            response.tr_id.server
        );

        response.check()
    }

    /// Write one frame and read the next, under the session deadline.
    async fn round_trip(&self, inner: &mut Inner<T>, payload: Vec<u8>) -> Result<Bytes> {
        let Some(framed) = inner.framed.as_mut() else {
            return Err(Error::Closed);
        };

        observe(&self.options, Direction::Sent, &payload);
        tracing::debug!("Sending frame ({} bytes)", payload.len());
        tracing::trace!("Sent: {}", String::from_utf8_lossy(&payload));

        let result = with_deadline(self.options.timeout, exchange(framed, payload)).await;

        match result {
            Ok(frame) => {
                observe(&self.options, Direction::Received, &frame);
                tracing::debug!("Received frame ({} bytes)", frame.len());
                tracing::trace!("Received: {}", String::from_utf8_lossy(&frame));
                Ok(frame)
            }
            Err(e) => {
                tracing::warn!("Dropping transport after failed round trip: {e}");
                inner.framed = None;
                inner.logged_in = false;
                Err(e)
            }
        }
    }

    fn next_cl_trid(&self) -> Option<String> {
        self.options
            .transaction_prefix
            .as_ref()
            .map(|prefix| format!("{prefix}-{}", Uuid::new_v4().simple()))
    }

    // ------------------------------------------------------------------------
    // Domain commands
    // ------------------------------------------------------------------------

    /// # Errors
    ///
    /// See [`Session::execute`].
    pub async fn check_domains<S: AsRef<str>>(
        &self,
        names: &[S],
        pricing: Option<&FeeQuery>,
        extensions: &[Extension],
    ) -> Result<CheckResults> {
        let response = self
            .execute(|ctx| command::encode_domain_check(ctx, names, pricing, extensions))
            .await?;
        Ok(response.into_check().unwrap_or_default())
    }

    /// # Errors
    ///
    /// See [`Session::execute`]; `Error::Decode` if the response has no
    /// `domain:infData`.
    pub async fn domain_info(
        &self,
        name: &str,
        hosts: HostsFilter,
        auth_info: Option<&str>,
        extensions: &[Extension],
    ) -> Result<DomainInfo> {
        let response = self
            .execute(|ctx| command::encode_domain_info(ctx, name, hosts, auth_info, extensions))
            .await?;
        required(response.into_domain_info(), "domain:infData")
    }

    /// # Errors
    ///
    /// See [`Session::execute`].
    pub async fn create_domain(&self, params: &DomainCreate, extensions: &[Extension]) -> Result<DomainCreated> {
        let response = self
            .execute(|ctx| command::encode_domain_create(ctx, params, extensions))
            .await?;
        required(response.into_domain_created(), "domain:creData")
    }

    /// # Errors
    ///
    /// See [`Session::execute`].
    pub async fn delete_domain(&self, name: &str, extensions: &[Extension]) -> Result<Response> {
        self.execute(|ctx| command::encode_domain_delete(ctx, name, extensions))
            .await
    }

    /// # Errors
    ///
    /// See [`Session::execute`].
    pub async fn renew_domain(
        &self,
        name: &str,
        current_expiry: NaiveDate,
        period: Option<Period>,
        extensions: &[Extension],
    ) -> Result<DomainRenewed> {
        let response = self
            .execute(|ctx| command::encode_domain_renew(ctx, name, current_expiry, period, extensions))
            .await?;
        required(response.into_domain_renewed(), "domain:renData")
    }

    /// Transfer query or action. Approve, reject and cancel may complete
    /// without transfer data.
    ///
    /// # Errors
    ///
    /// See [`Session::execute`].
    pub async fn transfer_domain(
        &self,
        op: TransferOp,
        name: &str,
        period: Option<Period>,
        auth_info: Option<&str>,
        extensions: &[Extension],
    ) -> Result<Option<DomainTransfer>> {
        let response = self
            .execute(|ctx| command::encode_domain_transfer(ctx, op, name, period, auth_info, extensions))
            .await?;
        Ok(response.into_domain_transfer())
    }

    /// # Errors
    ///
    /// See [`Session::execute`].
    pub async fn update_domain(
        &self,
        name: &str,
        ops: &[DomainUpdate],
        extensions: &[Extension],
    ) -> Result<Response> {
        self.execute(|ctx| command::encode_domain_update(ctx, name, ops, extensions))
            .await
    }

    /// Request restoration of a domain in its redemption period.
    ///
    /// # Errors
    ///
    /// See [`Session::execute`].
    pub async fn restore_domain(&self, name: &str, extensions: &[Extension]) -> Result<Response> {
        self.execute(|ctx| command::encode_domain_restore(ctx, name, extensions))
            .await
    }

    // ------------------------------------------------------------------------
    // Contact commands
    // ------------------------------------------------------------------------

    /// # Errors
    ///
    /// See [`Session::execute`].
    pub async fn check_contacts<S: AsRef<str>>(&self, ids: &[S]) -> Result<CheckResults> {
        let response = self
            .execute(|ctx| command::encode_contact_check(ctx, ids))
            .await?;
        Ok(response.into_check().unwrap_or_default())
    }

    /// # Errors
    ///
    /// See [`Session::execute`].
    pub async fn contact_info(&self, id: &str, auth_info: Option<&str>) -> Result<ContactInfo> {
        let response = self
            .execute(|ctx| command::encode_contact_info(ctx, id, auth_info))
            .await?;
        required(response.into_contact_info(), "contact:infData")
    }

    /// # Errors
    ///
    /// See [`Session::execute`].
    pub async fn create_contact(&self, params: &ContactCreate) -> Result<ContactCreated> {
        let response = self
            .execute(|ctx| command::encode_contact_create(ctx, params))
            .await?;
        required(response.into_contact_created(), "contact:creData")
    }

    /// # Errors
    ///
    /// See [`Session::execute`].
    pub async fn delete_contact(&self, id: &str) -> Result<Response> {
        self.execute(|ctx| command::encode_contact_delete(ctx, id))
            .await
    }

    /// # Errors
    ///
    /// See [`Session::execute`].
    pub async fn update_contact(&self, id: &str, ops: &[ContactUpdate]) -> Result<Response> {
        self.execute(|ctx| command::encode_contact_update(ctx, id, ops))
            .await
    }

    // ------------------------------------------------------------------------
    // Host commands
    // ------------------------------------------------------------------------

    /// # Errors
    ///
    /// See [`Session::execute`].
    pub async fn check_hosts<S: AsRef<str>>(&self, names: &[S]) -> Result<CheckResults> {
        let response = self
            .execute(|ctx| command::encode_host_check(ctx, names))
            .await?;
        Ok(response.into_check().unwrap_or_default())
    }

    /// # Errors
    ///
    /// See [`Session::execute`].
    pub async fn host_info(&self, name: &str) -> Result<HostInfo> {
        let response = self
            .execute(|ctx| command::encode_host_info(ctx, name))
            .await?;
        required(response.into_host_info(), "host:infData")
    }

    /// # Errors
    ///
    /// See [`Session::execute`].
    pub async fn create_host(&self, name: &str, addresses: &[IpAddr]) -> Result<HostCreated> {
        let response = self
            .execute(|ctx| command::encode_host_create(ctx, name, addresses))
            .await?;
        required(response.into_host_created(), "host:creData")
    }

    /// # Errors
    ///
    /// See [`Session::execute`].
    pub async fn delete_host(&self, name: &str) -> Result<Response> {
        self.execute(|ctx| command::encode_host_delete(ctx, name))
            .await
    }

    /// # Errors
    ///
    /// See [`Session::execute`].
    pub async fn update_host(&self, name: &str, ops: &[HostUpdate]) -> Result<Response> {
        self.execute(|ctx| command::encode_host_update(ctx, name, ops))
            .await
    }

    // ------------------------------------------------------------------------
    // Message queue
    // ------------------------------------------------------------------------

    /// Fetch the oldest queued message. Code 1300 means the queue is empty;
    /// 1301 carries `msg_queue` and possibly typed data.
    ///
    /// # Errors
    ///
    /// See [`Session::execute`].
    pub async fn poll_request(&self) -> Result<Response> {
        self.execute(|ctx| Ok(command::encode_poll_request(ctx)))
            .await
    }

    /// # Errors
    ///
    /// See [`Session::execute`].
    pub async fn poll_ack(&self, msg_id: &str) -> Result<Response> {
        self.execute(|ctx| command::encode_poll_ack(ctx, msg_id))
            .await
    }
}

async fn with_deadline<F>(timeout: Option<Duration>, fut: F) -> Result<Bytes>
where
    F: Future<Output = Result<Bytes>>,
{
    match timeout {
        Some(limit) => tokio::time::timeout(limit, fut)
            .await
            .map_err(|_| Error::Timeout)?,
        None => fut.await,
    }
}

async fn read_next<T: Transport>(framed: &mut Framed<T, FrameCodec>) -> Result<Bytes> {
    match framed.next().await {
        Some(frame) => Ok(frame?),
        None => Err(Error::Transport(FrameError::Io(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            "server closed the connection",
        )))),
    }
}

async fn exchange<T: Transport>(framed: &mut Framed<T, FrameCodec>, payload: Vec<u8>) -> Result<Bytes> {
    framed.send(Bytes::from(payload)).await?;
    read_next(framed).await
}

fn observe(options: &SessionOptions, direction: Direction, payload: &[u8]) {
    if let Some(observer) = &options.observer {
        observer.frame(direction, payload);
    }
}

async fn release<T: Transport>(inner: &mut Inner<T>) {
    if let Some(framed) = inner.framed.take() {
        let mut stream = framed.into_inner();
        if let Err(e) = stream.shutdown().await {
            tracing::debug!("Transport shutdown failed: {e}");
        }
        tracing::info!("Session closed");
    }
}

fn required<V>(value: Option<V>, element: &'static str) -> Result<V> {
    value.ok_or(Error::Decode(DecodeError::Missing(element)))
}
