//! S3 client implementation
//!
//! Wraps aws-sdk-s3 and implements the ObjectStore trait from cw-core.

use async_trait::async_trait;
use aws_sdk_s3::error::{ProvideErrorMetadata, SdkError};
use aws_sdk_s3::types::{Object, RestoreRequest};

use cw_core::{
    Error, ListPage, ObjectEntry, ObjectStore, Result, S3Config, StorageClass, normalize_endpoint,
};

/// Keys requested per ListObjectsV2 call
pub const PAGE_SIZE: i32 = 32;

/// S3 client wrapper bound to one bucket and prefix
pub struct S3Client {
    inner: aws_sdk_s3::Client,
    bucket: String,
    prefix: String,
    restore_days: i32,
}

impl S3Client {
    /// Create a new S3 client from the S3 section of the configuration
    pub async fn new(config: &S3Config) -> Result<Self> {
        config.validate()?;
        let endpoint = normalize_endpoint(&config.endpoint)?;

        let credentials = aws_credential_types::Credentials::new(
            config.access_key.clone(),
            config.secret_key.clone(),
            None, // session token
            None, // expiry
            "cold2warm-static-credentials",
        );

        let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .credentials_provider(credentials)
            .region(aws_config::Region::new(config.region.clone()))
            .endpoint_url(&endpoint)
            .load()
            .await;

        // Path-style addressing: the endpoint never contains the bucket name
        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(true)
            .build();

        tracing::debug!(endpoint = %endpoint, bucket = %config.bucket_name, "Created S3 client");

        Ok(Self {
            inner: aws_sdk_s3::Client::from_conf(s3_config),
            bucket: config.bucket_name.clone(),
            prefix: config.prefix.clone(),
            restore_days: config.days,
        })
    }

    /// Format AWS SDK error into a detailed error message
    ///
    /// The remote error code is always included so callers can match on it.
    fn format_sdk_error<E>(error: &SdkError<E>) -> String
    where
        E: ProvideErrorMetadata + std::fmt::Display,
    {
        match error {
            SdkError::ServiceError(service_err) => {
                let err = service_err.err();
                let mut msg = format!("Service error: {}", err);
                if let Some(message) = err.message() {
                    msg.push_str(&format!(": {}", message));
                }
                if let Some(code) = err.code() {
                    msg.push_str(&format!(" (code: {})", code));
                }
                msg
            }
            SdkError::ConstructionFailure(err) => {
                format!("Request construction failed: {:?}", err)
            }
            SdkError::TimeoutError(_) => "Request timeout".to_string(),
            SdkError::DispatchFailure(err) => {
                format!("Network dispatch error: {:?}", err)
            }
            SdkError::ResponseError(err) => {
                format!("Response error: {:?}", err)
            }
            _ => error.to_string(),
        }
    }

    fn map_sdk_error<E>(error: SdkError<E>) -> Error
    where
        E: ProvideErrorMetadata + std::fmt::Display,
    {
        let message = Self::format_sdk_error(&error);
        match &error {
            SdkError::ServiceError(service_err) => error_for_code(service_err.err().code(), message),
            SdkError::TimeoutError(_) => Error::Timeout(message),
            _ => Error::Network(message),
        }
    }
}

/// Map a remote error code to the matching error kind
fn error_for_code(code: Option<&str>, message: String) -> Error {
    match code {
        Some("AccessDenied" | "InvalidAccessKeyId" | "SignatureDoesNotMatch") => {
            Error::Auth(message)
        }
        Some("NoSuchBucket" | "NoSuchKey" | "NotFound") => Error::NotFound(message),
        _ => Error::Network(message),
    }
}

fn entry_from_object(object: &Object) -> ObjectEntry {
    ObjectEntry {
        key: object.key().unwrap_or_default().to_string(),
        size: object.size().unwrap_or(0),
        storage_class: object
            .storage_class()
            .map(|sc| StorageClass::from(sc.as_str())),
    }
}

#[async_trait]
impl ObjectStore for S3Client {
    async fn list_page(&self, continuation_token: Option<String>) -> Result<ListPage> {
        let mut request = self
            .inner
            .list_objects_v2()
            .bucket(&self.bucket)
            .max_keys(PAGE_SIZE)
            .set_continuation_token(continuation_token);

        if !self.prefix.is_empty() {
            request = request.prefix(&self.prefix);
        }

        let response = request.send().await.map_err(Self::map_sdk_error)?;

        let entries = response.contents().iter().map(entry_from_object).collect();
        let next_token = if response.is_truncated().unwrap_or(false) {
            response.next_continuation_token().map(|s| s.to_string())
        } else {
            None
        };

        Ok(ListPage {
            entries,
            next_token,
        })
    }

    async fn restore_object(&self, key: &str) -> Result<()> {
        let restore_request = RestoreRequest::builder().days(self.restore_days).build();

        self.inner
            .restore_object()
            .bucket(&self.bucket)
            .key(key)
            .restore_request(restore_request)
            .send()
            .await
            .map_err(Self::map_sdk_error)?;

        Ok(())
    }
}
