use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::primitives::ByteStream;

use super::{ContentStore, StorageError, StoredObject};

const KEY_PREFIX: &str = "uploads";

#[derive(Clone)]
pub struct S3Service {
    client: Client,
    bucket_name: String,
}

impl S3Service {
    pub fn new(client: Client, bucket_name: String) -> Self {
        Self {
            client,
            bucket_name,
        }
    }

    pub fn object_key(stored_filename: &str) -> String {
        format!("{}/{}", KEY_PREFIX, stored_filename)
    }

    pub fn object_url(bucket_name: &str, key: &str) -> String {
        format!("https://{}.s3.amazonaws.com/{}", bucket_name, key)
    }

    pub fn content_type_for(stored_filename: &str) -> &'static str {
        let extension = stored_filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "jpg" | "jpeg" => "image/jpeg",
            "png" => "image/png",
            "webp" => "image/webp",
            "gif" => "image/gif",
            "bmp" => "image/bmp",
            "tif" | "tiff" => "image/tiff",
            _ => "application/octet-stream",
        }
    }
}

#[async_trait]
impl ContentStore for S3Service {
    async fn put(&self, stored_filename: &str, data: &[u8]) -> Result<StoredObject, StorageError> {
        let key = S3Service::object_key(stored_filename);
        let body = ByteStream::from(data.to_vec());

        self.client
            .put_object()
            .bucket(&self.bucket_name)
            .key(&key)
            .body(body)
            .content_type(S3Service::content_type_for(stored_filename))
            .if_none_match("*")
            .send()
            .await
            .map_err(|e| StorageError::S3(e.to_string()))?;

        log::debug!("Uploaded {} to s3://{}/{}", stored_filename, self.bucket_name, key);
        Ok(StoredObject {
            stored_filename: stored_filename.to_string(),
            url: S3Service::object_url(&self.bucket_name, &key),
        })
    }
}
