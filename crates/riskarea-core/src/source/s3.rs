// crates/riskarea-core/src/source/s3.rs

//! S3 object source using the AWS SDK, driven through the blocking bridge.

use super::ObjectSource;
use crate::error::{IngestError, Result};
use crate::event::ObjectRef;
use crate::runtime;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::Client;
use std::path::Path;

pub struct S3Source {
    client: Client,
}

impl S3Source {
    /// Resolves credentials from the default provider chain.
    pub fn from_env(region: &str) -> Result<Self> {
        let region = Region::new(region.to_string());
        let config = runtime::block_on(
            aws_config::defaults(BehaviorVersion::latest())
                .region(region)
                .load(),
        )?;
        Ok(Self::with_client(Client::new(&config)))
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    async fn download(&self, object: &ObjectRef, dest: &Path) -> Result<()> {
        let output = self
            .client
            .get_object()
            .bucket(&object.bucket)
            .key(&object.key)
            .send()
            .await
            .map_err(|e| IngestError::download(&object.key, DisplayErrorContext(&e)))?;

        let bytes = output
            .body
            .collect()
            .await
            .map_err(|e| IngestError::download(&object.key, e))?
            .into_bytes();

        std::fs::write(dest, &bytes).map_err(|e| IngestError::download(&object.key, e))?;
        tracing::debug!(bucket = %object.bucket, key = %object.key, bytes = bytes.len(), "object downloaded");
        Ok(())
    }
}

impl ObjectSource for S3Source {
    fn fetch(&self, object: &ObjectRef, dest: &Path) -> Result<()> {
        runtime::block_on(self.download(object, dest))?
    }
}
