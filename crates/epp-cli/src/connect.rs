//! TCP and TLS connection establishment for a profile.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use epp_client::{Session, SessionOptions};
use rustls::pki_types::pem::PemObject;
use rustls::pki_types::{CertificateDer, PrivateKeyDer, ServerName};
use rustls::{ClientConfig, RootCertStore};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio::time::error::Elapsed;
use tokio_rustls::TlsConnector;

use crate::config::Profile;

/// Byte stream to the server, plain or TLS
pub trait Stream: AsyncRead + AsyncWrite + Unpin + Send {}

impl<T: AsyncRead + AsyncWrite + Unpin + Send> Stream for T {}

pub type BoxedStream = Box<dyn Stream>;

/// Open the stream described by `profile` and read the greeting.
///
/// # Errors
///
/// Returns an error if the TCP connection, TLS handshake, or greeting fails.
pub async fn open(
    profile: &Profile,
    options: SessionOptions,
    connect_timeout: Option<Duration>,
) -> Result<Session<BoxedStream>> {
    tracing::debug!("Connecting to {}", profile.addr);
    let tcp = bounded(connect_timeout, TcpStream::connect(&profile.addr))
        .await
        .with_context(|| format!("Timed out connecting to {}", profile.addr))?
        .with_context(|| format!("Could not connect to {}", profile.addr))?;
    tcp.set_nodelay(true)?;

    let stream: BoxedStream = if profile.tls {
        let connector = TlsConnector::from(Arc::new(tls_config(profile)?));
        let server_name = server_name(&profile.addr)?;
        let tls = bounded(connect_timeout, connector.connect(server_name, tcp))
            .await
            .context("Timed out during TLS handshake")?
            .context("TLS handshake failed")?;
        Box::new(tls)
    } else {
        Box::new(tcp)
    };

    Session::connect(stream, options)
        .await
        .context("Did not receive a greeting")
}

/// Await `fut`, giving up after `limit` when one is set.
async fn bounded<F: Future>(limit: Option<Duration>, fut: F) -> Result<F::Output, Elapsed> {
    match limit {
        Some(limit) => tokio::time::timeout(limit, fut).await,
        None => Ok(fut.await),
    }
}

fn server_name(addr: &str) -> Result<ServerName<'static>> {
    let host = match addr.rsplit_once(':') {
        Some((host, _port)) => host.trim_start_matches('[').trim_end_matches(']'),
        None => addr,
    };
    ServerName::try_from(host.to_string()).with_context(|| format!("Invalid server name {host:?}"))
}

fn tls_config(profile: &Profile) -> Result<ClientConfig> {
    let mut roots = RootCertStore::empty();
    roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

    if let Some(ca) = &profile.ca {
        for cert in load_certs(ca)? {
            roots
                .add(cert)
                .with_context(|| format!("Invalid CA certificate in {}", ca.display()))?;
        }
    }

    let provider = Arc::new(rustls::crypto::ring::default_provider());
    let builder = ClientConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()
        .context("TLS provider does not support default protocol versions")?
        .with_root_certificates(roots);

    let config = match (&profile.cert, &profile.key) {
        (Some(cert), key) => {
            let chain = load_certs(cert)?;
            let key_path = key.as_deref().unwrap_or(cert);
            let key = PrivateKeyDer::from_pem_file(key_path)
                .with_context(|| format!("Could not read private key from {}", key_path.display()))?;
            builder
                .with_client_auth_cert(chain, key)
                .context("Client certificate and key do not match")?
        }
        (None, _) => builder.with_no_client_auth(),
    };
    Ok(config)
}

fn load_certs(path: &Path) -> Result<Vec<CertificateDer<'static>>> {
    let certs = CertificateDer::pem_file_iter(path)
        .with_context(|| format!("Could not read {}", path.display()))?
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("Invalid PEM in {}", path.display()))?;
    if certs.is_empty() {
        bail!("No certificates found in {}", path.display());
    }
    Ok(certs)
}
