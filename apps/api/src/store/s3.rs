use async_trait::async_trait;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use tracing::info;

use crate::config::S3Config;
use crate::store::{BucketError, FileBucket, StoredObject};

/// CV bucket on S3 or an S3-compatible server (MinIO locally).
pub struct S3Bucket {
    client: aws_sdk_s3::Client,
    bucket: String,
    public_base: String,
}

impl S3Bucket {
    pub async fn connect(config: &S3Config, bucket: &str) -> Self {
        let credentials = Credentials::new(
            &config.access_key_id,
            &config.secret_access_key,
            None,
            None,
            "job-aggregator-static",
        );

        let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .credentials_provider(credentials)
            .endpoint_url(&config.endpoint)
            .load()
            .await;

        // MinIO and most S3-compatible servers only speak path-style addressing.
        let client_config = aws_sdk_s3::config::Builder::from(&s3_config)
            .force_path_style(true)
            .build();

        Self {
            client: aws_sdk_s3::Client::from_conf(client_config),
            bucket: bucket.to_string(),
            public_base: config
                .public_url
                .clone()
                .unwrap_or_else(|| config.endpoint.clone()),
        }
    }
}

#[async_trait]
impl FileBucket for S3Bucket {
    async fn upload(
        &self,
        key: &str,
        data: Bytes,
        content_type: &str,
    ) -> Result<StoredObject, BucketError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(data))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| BucketError::Upload(format!("S3 upload failed: {e}")))?;

        info!("Uploaded CV to s3://{}/{}", self.bucket, key);

        Ok(StoredObject {
            key: key.to_string(),
            public_url: Some(object_url(&self.public_base, &self.bucket, key)),
        })
    }
}

fn object_url(base: &str, bucket: &str, key: &str) -> String {
    format!("{}/{}/{}", base.trim_end_matches('/'), bucket, key)
}
