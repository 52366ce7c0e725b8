use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use thiserror::Error;

use crate::database::ConnectSettings;
use crate::secrets::CertificateSource;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("no certificate source specified: set X509_PRIVATE_CERT_SECRET and X509_PUBLIC_CERT_SECRET, or X509_PRIVATE_CERT_PATH and X509_PUBLIC_CERT_PATH")]
    NoCertificateSource,
}

/// Server configuration. Every flag can also be given through its
/// environment variable, which is how deployments set it.
#[derive(Debug, Clone, Parser)]
#[command(name = "fretter-api", version, about = "Fretter tablature API server")]
pub struct AppConfig {
    /// Listen port
    #[arg(long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// Postgres URL of the document store
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "postgres://fretter@localhost:5432/fretter"
    )]
    pub database_url: String,

    #[arg(long, env = "X509_PRIVATE_CERT_PATH")]
    pub x509_private_cert_path: Option<PathBuf>,

    #[arg(long, env = "X509_PUBLIC_CERT_PATH")]
    pub x509_public_cert_path: Option<PathBuf>,

    /// Secret Manager resource name of the private key
    #[arg(long, env = "X509_PRIVATE_CERT_SECRET")]
    pub x509_private_cert_secret: Option<String>,

    /// Secret Manager resource name of the public certificate
    #[arg(long, env = "X509_PUBLIC_CERT_SECRET")]
    pub x509_public_cert_secret: Option<String>,

    /// Deadline for each document store call, in seconds
    #[arg(long, env = "STORE_TIMEOUT_SECS", default_value_t = 5)]
    pub store_timeout_secs: u64,

    #[arg(long, env = "CONNECT_TIMEOUT_SECS", default_value_t = 30)]
    pub connect_timeout_secs: u64,

    #[arg(long, env = "DATABASE_MAX_CONNECTIONS", default_value_t = 10)]
    pub max_connections: u32,
}

impl AppConfig {
    /// Secret Manager wins when both pairs are complete.
    pub fn certificate_source(&self) -> Result<CertificateSource, ConfigError> {
        if let (Some(private), Some(public)) = (
            non_empty(&self.x509_private_cert_secret),
            non_empty(&self.x509_public_cert_secret),
        ) {
            return Ok(CertificateSource::SecretManager {
                private: private.to_string(),
                public: public.to_string(),
            });
        }

        match (&self.x509_private_cert_path, &self.x509_public_cert_path) {
            (Some(private), Some(public))
                if !private.as_os_str().is_empty() && !public.as_os_str().is_empty() =>
            {
                Ok(CertificateSource::Files {
                    private: private.clone(),
                    public: public.clone(),
                })
            }
            _ => Err(ConfigError::NoCertificateSource),
        }
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_secs(self.store_timeout_secs)
    }

    pub fn connect_settings(&self) -> ConnectSettings {
        ConnectSettings {
            database_url: self.database_url.clone(),
            max_connections: self.max_connections,
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            probe_timeout: Duration::from_secs(10),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}
