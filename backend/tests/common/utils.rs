use axum::response::Response;
use http_body_util::BodyExt;
use rand::RngCore;

pub const BOUNDARY: &str = "----doclink-test-boundary";

/// One part of a multipart/form-data body
pub struct MultipartPart<'a> {
    pub name: &'a str,
    pub filename: Option<&'a str>,
    pub content_type: Option<&'a str>,
    pub data: &'a [u8],
}

impl<'a> MultipartPart<'a> {
    pub fn file(name: &'a str, filename: &'a str, content_type: &'a str, data: &'a [u8]) -> Self {
        Self {
            name,
            filename: Some(filename),
            content_type: Some(content_type),
            data,
        }
    }

    pub fn text(name: &'a str, value: &'a str) -> Self {
        Self {
            name,
            filename: None,
            content_type: None,
            data: value.as_bytes(),
        }
    }
}

/// Encode parts as a multipart/form-data body delimited by [`BOUNDARY`]
pub fn multipart_body(parts: &[MultipartPart<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        let mut disposition = format!("Content-Disposition: form-data; name=\"{}\"", part.name);
        if let Some(filename) = part.filename {
            disposition.push_str(&format!("; filename=\"{filename}\""));
        }
        body.extend_from_slice(disposition.as_bytes());
        body.extend_from_slice(b"\r\n");
        if let Some(content_type) = part.content_type {
            body.extend_from_slice(format!("Content-Type: {content_type}\r\n").as_bytes());
        }
        body.extend_from_slice(b"\r\n");
        body.extend_from_slice(part.data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

/// Parse response body to JSON
pub async fn parse_response_body(response: Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

/// Read response body as text
pub async fn response_text(response: Response) -> String {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(body.to_vec()).unwrap()
}

/// Generate a PDF-looking document of exactly `size` bytes
pub fn generate_test_document(size: usize) -> Vec<u8> {
    let mut buf = vec![0u8; size];
    rand::rngs::OsRng.fill_bytes(&mut buf);
    let header = b"%PDF-1.7\n";
    let len = header.len().min(size);
    buf[..len].copy_from_slice(&header[..len]);
    buf
}

/// Splits a returned object URL into `(timestamp, filename)` after checking the prefix
pub fn split_object_url<'a>(url: &'a str, base: &str, bucket: &str) -> Option<(&'a str, &'a str)> {
    let key = url.strip_prefix(&format!("{base}/{bucket}/"))?;
    let (timestamp, filename) = key.split_once('-')?;
    timestamp
        .chars()
        .all(|c| c.is_ascii_digit())
        .then_some((timestamp, filename))
}
