// Client certificate loading for the database connection.
//
// The key pair comes either from two files on disk or from two Google
// Secret Manager secrets. Which one is decided once by configuration.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{error, info};

pub mod secret_manager;

pub use secret_manager::SecretManagerClient;

#[derive(Debug, Error)]
pub enum SecretError {
    #[error("X509 certificate file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("secret manager request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("secret {name} could not be decoded: {reason}")]
    Payload { name: String, reason: String },

    #[error("{0} is not PEM encoded")]
    NotPem(&'static str),
}

/// Where the client certificate pair lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CertificateSource {
    Files { private: PathBuf, public: PathBuf },
    SecretManager { private: String, public: String },
}

/// PEM-encoded public certificate and private key.
#[derive(Clone)]
pub struct ClientIdentity {
    pub public_pem: String,
    pub private_pem: String,
}

impl std::fmt::Debug for ClientIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientIdentity")
            .field("public_pem", &self.public_pem)
            .field("private_pem", &"<redacted>")
            .finish()
    }
}

impl CertificateSource {
    /// Fetch both halves of the key pair.
    pub async fn load(&self) -> Result<ClientIdentity, SecretError> {
        self.load_with(&SecretManagerClient::from_env()).await
    }

    pub async fn load_with(
        &self,
        client: &SecretManagerClient,
    ) -> Result<ClientIdentity, SecretError> {
        let identity = match self {
            CertificateSource::SecretManager { private, public } => {
                info!("Loading certificates from Secret Manager");
                let private_pem = client.access(private).await.inspect_err(|e| {
                    error!(error = %e, "Failed to access private cert secret");
                })?;
                let public_pem = client.access(public).await.inspect_err(|e| {
                    error!(error = %e, "Failed to access public cert secret");
                })?;
                ClientIdentity {
                    public_pem,
                    private_pem,
                }
            }
            CertificateSource::Files { private, public } => {
                info!("Loading certificates from file paths");
                ClientIdentity {
                    private_pem: read_pem_file(private).await?,
                    public_pem: read_pem_file(public).await?,
                }
            }
        };

        if !identity.public_pem.contains("-----BEGIN") {
            return Err(SecretError::NotPem("public certificate"));
        }
        if !identity.private_pem.contains("-----BEGIN") {
            return Err(SecretError::NotPem("private key"));
        }

        info!("Successfully loaded certificates");
        Ok(identity)
    }
}

async fn read_pem_file(path: &Path) -> Result<String, SecretError> {
    match tokio::fs::read_to_string(path).await {
        Ok(contents) => Ok(contents),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            error!(path = %path.display(), "X509 certificate file not found");
            Err(SecretError::FileNotFound(path.to_path_buf()))
        }
        Err(source) => Err(SecretError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}
