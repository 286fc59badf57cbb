//! Object store capability used for food images.
//!
//! The catalog only ever writes: it uploads bytes under a client-chosen key
//! and derives the public URL from the bucket/key naming scheme, so no
//! read-back is needed.

use async_trait::async_trait;
use aws_sdk_s3::{
    Client,
    config::{Builder as S3ConfigBuilder, Credentials, Region},
    error::DisplayErrorContext,
    primitives::ByteStream,
    types::ObjectCannedAcl,
};
use bytes::Bytes;
use thiserror::Error;
use tracing::debug;

/// Default public domain of AWS S3 virtual-hosted buckets.
pub const DEFAULT_S3_DOMAIN: &str = "s3.amazonaws.com";

/// Who may read an uploaded object. Catalog images are always public.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Visibility {
    PublicRead,
}

#[derive(Debug, Error)]
pub enum ObjectStoreError {
    /// The store answered with a non-success status.
    #[error("object store rejected upload (status {status:?}): {message}")]
    Rejected {
        status: Option<u16>,
        message: String,
    },
    /// No response was received (connection, timeout, signing...).
    #[error("object store transport failure: {0}")]
    Transport(String),
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `body` under `bucket/key`.
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        content_type: Option<&str>,
        visibility: Visibility,
    ) -> Result<(), ObjectStoreError>;
}

/// Externally resolvable URL for an object: `https://{bucket}.{domain}/{key}`.
pub fn public_url(bucket: &str, domain: &str, key: &str) -> String {
    format!("https://{}.{}/{}", bucket, domain, key)
}

/// Settings needed to build an S3 client from static credentials.
#[derive(Clone)]
pub struct S3Settings {
    pub access_key: String,
    pub secret_key: String,
    pub region: String,
    /// Override for S3-compatible stores (MinIO, localstack...).
    pub endpoint: Option<String>,
}

/// `ObjectStore` backed by `aws-sdk-s3`.
#[derive(Clone)]
pub struct S3ObjectStore {
    client: Client,
}

impl S3ObjectStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client from static credentials and a region.
    ///
    /// An explicit endpoint switches to path-style addressing, which is what
    /// most S3-compatible servers expect.
    pub async fn from_settings(settings: S3Settings) -> Self {
        let credentials = Credentials::new(
            settings.access_key,
            settings.secret_key,
            None,
            None,
            "foodies-config",
        );
        let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(settings.region))
            .credentials_provider(credentials)
            .load()
            .await;

        let mut builder = S3ConfigBuilder::from(&sdk_config);
        if let Some(endpoint) = settings.endpoint {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        Self::new(Client::from_conf(builder.build()))
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        content_type: Option<&str>,
        visibility: Visibility,
    ) -> Result<(), ObjectStoreError> {
        let acl = match visibility {
            Visibility::PublicRead => ObjectCannedAcl::PublicRead,
        };
        let size = body.len();

        let mut request = self
            .client
            .put_object()
            .bucket(bucket)
            .key(key)
            .acl(acl)
            .body(ByteStream::from(body));
        if let Some(content_type) = content_type {
            request = request.content_type(content_type);
        }

        match request.send().await {
            Ok(_) => {
                debug!(bucket, key, size, "uploaded object to S3");
                Ok(())
            }
            Err(err) => {
                let message = DisplayErrorContext(&err).to_string();
                match err.raw_response() {
                    Some(raw) => Err(ObjectStoreError::Rejected {
                        status: Some(raw.status().as_u16()),
                        message,
                    }),
                    None => Err(ObjectStoreError::Transport(message)),
                }
            }
        }
    }
}
