use crate::services::object_store::{DEFAULT_S3_DOMAIN, S3Settings};
use anyhow::{Context, Result};
use clap::Parser;
use std::{env, fmt};

const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Centralized application configuration.
/// Combines environment variables and CLI arguments.
#[derive(Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub aws_access_key: String,
    pub aws_secret_key: String,
    pub aws_region: String,
    pub bucket: String,
    pub s3_domain: String,
    pub s3_endpoint: Option<String>,
    pub max_upload_bytes: usize,
}

/// Command-line + environment configuration.
#[derive(Parser, Debug, Default)]
#[command(author, version, about = "Food catalog API")]
pub struct Args {
    /// Host to bind to (overrides FOODIES_HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to (overrides FOODIES_PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// Database URL (overrides FOODIES_DATABASE_URL)
    #[arg(long)]
    pub database_url: Option<String>,

    /// AWS region of the image bucket (overrides AWS_REGION)
    #[arg(long)]
    pub region: Option<String>,

    /// Bucket that receives food images (overrides AWS_S3_BUCKET_NAME)
    #[arg(long)]
    pub bucket: Option<String>,

    /// Public domain used to build image URLs (overrides AWS_S3_DOMAIN)
    #[arg(long)]
    pub s3_domain: Option<String>,

    /// Custom S3 endpoint, e.g. a local MinIO (overrides AWS_S3_ENDPOINT)
    #[arg(long)]
    pub s3_endpoint: Option<String>,

    /// Maximum upload request size in bytes (overrides FOODIES_MAX_UPLOAD_BYTES)
    #[arg(long)]
    pub max_upload_bytes: Option<usize>,

    /// Run migrations and exit
    #[arg(long)]
    pub migrate: bool,
}

impl AppConfig {
    /// Parse environment variables + CLI args into AppConfig and migrate flag.
    pub fn from_env_and_args() -> Result<(Self, bool)> {
        let args = Args::parse();
        let migrate = args.migrate;
        let cfg = Self::merge(args, |name| env::var(name))?;
        Ok((cfg, migrate))
    }

    /// Merge CLI args over values looked up by `lookup` (CLI wins).
    fn merge<F>(args: Args, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Result<String, env::VarError>,
    {
        let optional = |name: &str| -> Result<Option<String>> {
            match lookup(name) {
                Ok(value) if value.trim().is_empty() => Ok(None),
                Ok(value) => Ok(Some(value)),
                Err(env::VarError::NotPresent) => Ok(None),
                Err(err) => Err(err).with_context(|| format!("reading {}", name)),
            }
        };
        let required = |cli: Option<String>, name: &str| -> Result<String> {
            match cli.filter(|v| !v.trim().is_empty()) {
                Some(value) => Ok(value),
                None => optional(name)?
                    .with_context(|| format!("{} must be set to a non-empty value", name)),
            }
        };

        let env_port = match optional("FOODIES_PORT")? {
            Some(value) => value
                .parse::<u16>()
                .with_context(|| format!("parsing FOODIES_PORT value `{}`", value))?,
            None => 8080,
        };
        let env_max_upload = match optional("FOODIES_MAX_UPLOAD_BYTES")? {
            Some(value) => value
                .parse::<usize>()
                .with_context(|| format!("parsing FOODIES_MAX_UPLOAD_BYTES value `{}`", value))?,
            None => DEFAULT_MAX_UPLOAD_BYTES,
        };

        let host = match args.host {
            Some(host) => host,
            None => optional("FOODIES_HOST")?.unwrap_or_else(|| "0.0.0.0".into()),
        };
        let database_url = match args.database_url {
            Some(url) => url,
            None => optional("FOODIES_DATABASE_URL")?
                .unwrap_or_else(|| "sqlite://./data/foodies.db".into()),
        };
        let s3_domain = match args.s3_domain {
            Some(domain) => domain,
            None => optional("AWS_S3_DOMAIN")?.unwrap_or_else(|| DEFAULT_S3_DOMAIN.into()),
        };
        let s3_endpoint = match args.s3_endpoint {
            Some(endpoint) => Some(endpoint),
            None => optional("AWS_S3_ENDPOINT")?,
        };

        Ok(Self {
            host,
            port: args.port.unwrap_or(env_port),
            database_url,
            aws_access_key: required(None, "AWS_ACCESS_KEY")?,
            aws_secret_key: required(None, "AWS_SECRET_KEY")?,
            aws_region: required(args.region, "AWS_REGION")?,
            bucket: required(args.bucket, "AWS_S3_BUCKET_NAME")?,
            s3_domain,
            s3_endpoint,
            max_upload_bytes: args.max_upload_bytes.unwrap_or(env_max_upload),
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn s3_settings(&self) -> S3Settings {
        S3Settings {
            access_key: self.aws_access_key.clone(),
            secret_key: self.aws_secret_key.clone(),
            region: self.aws_region.clone(),
            endpoint: self.s3_endpoint.clone(),
        }
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database_url", &self.database_url)
            .field("aws_access_key", &"<redacted>")
            .field("aws_secret_key", &"<redacted>")
            .field("aws_region", &self.aws_region)
            .field("bucket", &self.bucket)
            .field("s3_domain", &self.s3_domain)
            .field("s3_endpoint", &self.s3_endpoint)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .finish()
    }
}
