//! Connection profiles (`credentials.json`).

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

/// Environment variable overriding the credentials file location
pub const CONFIG_ENV: &str = "EPP_CONFIG";

const TEMPLATE: &str = r#"{
  "profiles": {
    "default": {
      "addr": "epp.example.com:700",
      "user": "",
      "password": "",
      "tls": true,
      "cert": null,
      "key": null,
      "ca": null
    },
    "ote": {
      "addr": "epp.ote.registry.example:700",
      "user": "",
      "password": "",
      "tls": true
    }
  }
}
"#;

/// One named server profile
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// `host:port` of the EPP server
    #[serde(default)]
    pub addr: String,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub password: String,
    #[serde(default = "default_tls")]
    pub tls: bool,
    /// PEM client certificate chain
    #[serde(default)]
    pub cert: Option<PathBuf>,
    /// PEM private key for `cert`
    #[serde(default)]
    pub key: Option<PathBuf>,
    /// PEM CA bundle trusted in addition to the built-in roots
    #[serde(default)]
    pub ca: Option<PathBuf>,
}

fn default_tls() -> bool {
    true
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CredentialsFile {
    #[serde(default)]
    profiles: BTreeMap<String, Profile>,
}

/// Outcome of loading a profile
#[derive(Debug)]
pub enum Loaded {
    Profile(Profile),
    /// No credentials file existed; a template was written here
    Created(PathBuf),
}

/// Default credentials path (`<config dir>/epp/credentials.json`).
#[must_use]
pub fn default_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "epp").map(|p| p.config_dir().join("credentials.json"))
}

/// Resolve the credentials path from the flag, then `EPP_CONFIG`, then the
/// platform config directory.
///
/// # Errors
///
/// Returns an error if no home directory can be determined.
pub fn resolve_path(flag: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = flag {
        return Ok(path.to_path_buf());
    }
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        return Ok(PathBuf::from(path));
    }
    default_path().context("Could not determine the configuration directory")
}

/// Load `name` from the credentials file at `path`, creating a template if
/// the file does not exist.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, the profile is
/// missing, or the profile has no `user` or `addr`.
pub fn load(path: &Path, name: &str) -> Result<Loaded> {
    if !path.exists() {
        write_template(path)?;
        return Ok(Loaded::Created(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Could not read credentials file {}", path.display()))?;
    let file: CredentialsFile = serde_json::from_str(&content)
        .with_context(|| format!("Invalid credentials file {}", path.display()))?;

    let Some(profile) = file.profiles.get(name) else {
        bail!("Profile {name:?} not found in {}", path.display());
    };
    if profile.user.is_empty() {
        bail!("user not set in profile {name:?}");
    }
    if profile.addr.is_empty() {
        bail!("addr not set in profile {name:?}");
    }
    if profile.key.is_some() && profile.cert.is_none() {
        bail!("key given without cert in profile {name:?}");
    }

    tracing::debug!("Loaded profile {name} from {}", path.display());
    Ok(Loaded::Profile(profile.clone()))
}

fn write_template(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Could not create configuration directory {}", dir.display()))?;
    }
    std::fs::write(path, TEMPLATE)
        .with_context(|| format!("Could not create credentials file {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
            .with_context(|| format!("Could not restrict permissions on {}", path.display()))?;
    }
    Ok(())
}
