//! MinIO/S3-compatible store for hazard media
//!
//! Media is written under a public-read prefix so uploaded images and videos
//! are served directly by the object store at a fixed URL prefix.
//!
//! Uses rust-s3 for object operations; the anonymous-read bucket policy is
//! installed at startup with a hand-signed AWS Signature v4 request.

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use reqwest::{Client, Url};
use s3::creds::Credentials;
use s3::{Bucket, BucketConfiguration, Region};
use serde_json::json;
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use crate::core::config::StorageConfig;
use crate::core::error::{AppError, Result};
use crate::modules::storage::object_store::ObjectStore;

type HmacSha256 = Hmac<Sha256>;

/// MinIO-backed media store
pub struct MinioMediaStore {
    bucket: Box<Bucket>,
    region: Region,
    credentials: Credentials,
    endpoint: String,
    public_endpoint: String,
    public_prefix: String,
    access_key: String,
    secret_key: String,
    region_name: String,
    http_client: Client,
}

impl MinioMediaStore {
    /// Create the store, the bucket if missing, and the public-read policy
    /// for the media prefix.
    pub async fn new(config: StorageConfig) -> Result<Self> {
        let credentials = Credentials::new(
            Some(&config.access_key),
            Some(&config.secret_key),
            None,
            None,
            None,
        )
        .map_err(|e| AppError::Storage(format!("Failed to create MinIO credentials: {}", e)))?;

        let region = Region::Custom {
            region: config.region.clone(),
            endpoint: config.endpoint.clone(),
        };

        let mut bucket = Bucket::new(&config.bucket, region.clone(), credentials.clone())
            .map_err(|e| AppError::Storage(format!("Failed to create MinIO bucket: {}", e)))?;

        // Path-style URLs for MinIO (http://endpoint/bucket, not http://bucket.endpoint)
        bucket.set_path_style();

        let http_client = Client::builder()
            .build()
            .map_err(|e| AppError::Storage(format!("Failed to create HTTP client: {}", e)))?;

        let store = Self {
            bucket,
            region,
            credentials,
            endpoint: config.endpoint,
            public_endpoint: config.public_endpoint,
            public_prefix: config.public_prefix,
            access_key: config.access_key,
            secret_key: config.secret_key,
            region_name: config.region,
            http_client,
        };

        store.ensure_bucket_exists().await?;
        store.set_public_read_policy().await;

        info!(
            "Media store initialized: endpoint={}, bucket={}, prefix={}",
            store.endpoint,
            store.bucket.name(),
            store.public_prefix
        );

        Ok(store)
    }

    /// Ensure the bucket exists, create if not
    async fn ensure_bucket_exists(&self) -> Result<()> {
        let result = Bucket::create_with_path_style(
            &self.bucket.name(),
            self.region.clone(),
            self.credentials.clone(),
            BucketConfiguration::default(),
        )
        .await;

        match result {
            Ok(_) => {
                info!("Bucket '{}' created", self.bucket.name());
                Ok(())
            }
            Err(e) => {
                let message = e.to_string();
                if message.contains("BucketAlreadyOwnedByYou")
                    || message.contains("BucketAlreadyExists")
                    || message.contains("already own it")
                {
                    debug!("Bucket '{}' already exists", self.bucket.name());
                    Ok(())
                } else {
                    warn!(
                        "Could not create bucket '{}': {}. Assuming it exists.",
                        self.bucket.name(),
                        e
                    );
                    Ok(())
                }
            }
        }
    }

    /// Install an anonymous-read bucket policy for the media prefix.
    /// Failure is non-fatal; the policy can be set manually
    /// (`mc anonymous set download minio/<bucket>/<prefix>`).
    async fn set_public_read_policy(&self) {
        let bucket_name = self.bucket.name();
        let policy = json!({
            "Version": "2012-10-17",
            "Statement": [{
                "Effect": "Allow",
                "Principal": {"AWS": "*"},
                "Action": ["s3:GetObject"],
                "Resource": [format!("arn:aws:s3:::{}/{}/*", bucket_name, self.public_prefix)]
            }]
        })
        .to_string();

        match self.put_bucket_policy(&bucket_name, &policy).await {
            Ok(()) => info!(
                "Public read policy set for {}/{}/*",
                bucket_name, self.public_prefix
            ),
            Err(e) => warn!(
                "Failed to set bucket policy for '{}': {}. Media URLs may 403 until \
                 the policy is set manually.",
                bucket_name, e
            ),
        }
    }

    /// `PutBucketPolicy` signed with AWS Signature v4
    async fn put_bucket_policy(&self, bucket_name: &str, policy: &str) -> Result<()> {
        let now = chrono::Utc::now();
        let date_stamp = now.format("%Y%m%d").to_string();
        let amz_date = now.format("%Y%m%dT%H%M%SZ").to_string();

        let endpoint_url = Url::parse(&self.endpoint)
            .map_err(|e| AppError::Storage(format!("Invalid endpoint URL: {}", e)))?;
        let host = endpoint_url
            .host_str()
            .ok_or_else(|| AppError::Storage("Endpoint URL has no host".to_string()))?;
        let host_header = match endpoint_url.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        };

        let payload_hash = hex::encode(Sha256::digest(policy.as_bytes()));
        let canonical_request = format!(
            "PUT\n/{bucket}\npolicy=\nhost:{host}\nx-amz-content-sha256:{hash}\nx-amz-date:{date}\n\nhost;x-amz-content-sha256;x-amz-date\n{hash}",
            bucket = bucket_name,
            host = host_header,
            hash = payload_hash,
            date = amz_date,
        );

        let credential_scope = format!("{}/{}/s3/aws4_request", date_stamp, self.region_name);
        let string_to_sign = format!(
            "AWS4-HMAC-SHA256\n{}\n{}\n{}",
            amz_date,
            credential_scope,
            hex::encode(Sha256::digest(canonical_request.as_bytes()))
        );

        let signature = self.sign(&date_stamp, &string_to_sign)?;
        let authorization = format!(
            "AWS4-HMAC-SHA256 Credential={}/{}, SignedHeaders=host;x-amz-content-sha256;x-amz-date, Signature={}",
            self.access_key, credential_scope, signature
        );

        let response = self
            .http_client
            .put(format!("{}/{}?policy", self.endpoint, bucket_name))
            .header("Host", &host_header)
            .header("x-amz-date", &amz_date)
            .header("x-amz-content-sha256", &payload_hash)
            .header("Authorization", &authorization)
            .header("Content-Type", "application/json")
            .body(policy.to_string())
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("Failed to send policy request: {}", e)))?;

        if response.status().is_success() {
            Ok(())
        } else {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            Err(AppError::Storage(format!(
                "Failed to set bucket policy: {} - {}",
                status, body
            )))
        }
    }

    /// Derive the AWS Signature v4 signature for a string-to-sign
    fn sign(&self, date_stamp: &str, string_to_sign: &str) -> Result<String> {
        let k_date = hmac_sha256(
            format!("AWS4{}", self.secret_key).as_bytes(),
            date_stamp.as_bytes(),
        )?;
        let k_region = hmac_sha256(&k_date, self.region_name.as_bytes())?;
        let k_service = hmac_sha256(&k_region, b"s3")?;
        let k_signing = hmac_sha256(&k_service, b"aws4_request")?;
        Ok(hex::encode(hmac_sha256(
            &k_signing,
            string_to_sign.as_bytes(),
        )?))
    }

    fn object_key(&self, key: &str) -> String {
        format!("{}/{}", self.public_prefix, key)
    }

    fn public_url(&self, object_key: &str) -> String {
        format!(
            "{}/{}/{}",
            self.public_endpoint,
            self.bucket.name(),
            object_key
        )
    }
}

#[async_trait]
impl ObjectStore for MinioMediaStore {
    async fn store(&self, key: &str, data: Vec<u8>, content_type: &str) -> Result<String> {
        let object_key = self.object_key(key);
        self.bucket
            .put_object_with_content_type(&object_key, &data, content_type)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to upload '{}': {}", object_key, e)))?;

        debug!(
            "Uploaded '{}' to bucket '{}'",
            object_key,
            self.bucket.name()
        );
        Ok(self.public_url(&object_key))
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let object_key = self.object_key(key);
        self.bucket
            .delete_object(&object_key)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to delete '{}': {}", object_key, e)))?;

        debug!(
            "Deleted '{}' from bucket '{}'",
            object_key,
            self.bucket.name()
        );
        Ok(())
    }

    fn key_for_url(&self, url: &str) -> Option<String> {
        // Media URLs may carry either the public or the internal endpoint
        for endpoint in [&self.public_endpoint, &self.endpoint] {
            let prefix = format!(
                "{}/{}/{}/",
                endpoint,
                self.bucket.name(),
                self.public_prefix
            );
            if let Some(key) = url.strip_prefix(&prefix) {
                return Some(key.to_string());
            }
        }
        None
    }
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Result<Vec<u8>> {
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|e| AppError::Storage(format!("HMAC key error: {}", e)))?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}
