//! Binary payloads uploaded as resource content

use crate::error::RepoResult;
use crate::transport::RepoRequest;
use bytes::Bytes;
use reqwest::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use std::path::Path;

const DEFAULT_MIME: &str = "application/octet-stream";

/// Binary content together with its optional file name and MIME type
#[derive(Debug, Clone)]
pub struct BinaryPayload {
    pub data: Bytes,
    pub filename: Option<String>,
    pub mime: Option<String>,
}

impl BinaryPayload {
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self {
            data: data.into(),
            filename: None,
            mime: None,
        }
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
        self.mime = Some(mime.into());
        self
    }

    /// Read a file; its name becomes the payload's file name
    pub async fn from_file(path: impl AsRef<Path>) -> RepoResult<Self> {
        let path = path.as_ref();
        let data = tokio::fs::read(path).await?;
        let mut payload = Self::new(data);
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            payload.filename = Some(name.to_string());
        }
        Ok(payload)
    }

    /// Put the payload into a request body with matching headers
    pub(crate) fn attach(self, request: RepoRequest) -> RepoRequest {
        let mime = self.mime.as_deref().unwrap_or(DEFAULT_MIME).to_string();
        let mut request = request.header(CONTENT_TYPE.as_str(), mime);
        if let Some(filename) = &self.filename {
            let escaped = filename.replace('\\', "\\\\").replace('"', "\\\"");
            request = request.header(
                CONTENT_DISPOSITION.as_str(),
                format!("attachment; filename=\"{}\"", escaped),
            );
        }
        request.body(self.data)
    }
}

/// File name from a `Content-Disposition` header value
pub(crate) fn disposition_filename(value: &str) -> Option<String> {
    value.split(';').map(str::trim).find_map(|part| {
        let name = part.strip_prefix("filename=")?;
        let name = name
            .strip_prefix('"')
            .and_then(|n| n.strip_suffix('"'))
            .unwrap_or(name);
        Some(name.replace("\\\"", "\"").replace("\\\\", "\\"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::Method;

    #[test]
    fn test_attach_sets_headers() {
        let request = BinaryPayload::new(&b"%PDF-1.7"[..])
            .with_filename("report \"final\".pdf")
            .with_mime("application/pdf")
            .attach(RepoRequest::new(Method::PUT, "https://repo.example.org/api/1"));

        assert_eq!(request.header_value("content-type"), Some("application/pdf"));
        let disposition = request.header_value("content-disposition").unwrap();
        assert_eq!(disposition_filename(disposition).as_deref(), Some("report \"final\".pdf"));
        assert_eq!(&request.body[..], b"%PDF-1.7");
    }

    #[test]
    fn test_default_mime() {
        let request = BinaryPayload::new(vec![1u8, 2, 3])
            .attach(RepoRequest::new(Method::POST, "https://repo.example.org/api/"));
        assert_eq!(request.header_value("content-type"), Some(DEFAULT_MIME));
        assert_eq!(request.header_value("content-disposition"), None);
    }

    #[tokio::test]
    async fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.tif");
        std::fs::write(&path, b"II*\0").unwrap();

        let payload = BinaryPayload::from_file(&path).await.unwrap();
        assert_eq!(payload.filename.as_deref(), Some("scan.tif"));
        assert_eq!(payload.data.len(), 4);
    }
}
