use crate::transport::model::FilePart;
use rand::distributions::Alphanumeric;
use rand::Rng;

const CRLF: &[u8] = b"\r\n";
const BOUNDARY_LEN: usize = 32;

/// Builds `multipart/form-data` request bodies.
#[derive(Debug, Clone)]
pub struct MultipartEncoder {
    boundary: String,
}

impl Default for MultipartEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl MultipartEncoder {
    /// Encoder with a fresh random boundary.
    pub fn new() -> Self {
        let token: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(BOUNDARY_LEN)
            .map(char::from)
            .collect();
        Self::with_boundary(format!("----------{token}"))
    }

    pub fn with_boundary(boundary: impl Into<String>) -> Self {
        Self {
            boundary: boundary.into(),
        }
    }

    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    /// Returns the content-type header value and the body.
    pub fn encode<'a, I>(&self, fields: I, files: &[FilePart]) -> (String, Vec<u8>)
    where
        I: IntoIterator<Item = (&'a String, &'a String)>,
    {
        let mut body = Vec::new();

        for (name, value) in fields {
            self.open_part(&mut body);
            body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{}\"",
                    escape_quoted(name)
                )
                .as_bytes(),
            );
            body.extend_from_slice(CRLF);
            body.extend_from_slice(CRLF);
            body.extend_from_slice(value.as_bytes());
            body.extend_from_slice(CRLF);
        }

        for file in files {
            let mime = mime_guess::from_path(&file.filename).first_or_octet_stream();
            self.open_part(&mut body);
            body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"",
                    escape_quoted(&file.field),
                    escape_quoted(&file.filename)
                )
                .as_bytes(),
            );
            body.extend_from_slice(CRLF);
            body.extend_from_slice(format!("Content-Type: {mime}").as_bytes());
            body.extend_from_slice(CRLF);
            body.extend_from_slice(CRLF);
            body.extend_from_slice(&file.bytes);
            body.extend_from_slice(CRLF);
        }

        body.extend_from_slice(format!("--{}--", self.boundary).as_bytes());
        body.extend_from_slice(CRLF);

        (self.content_type(), body)
    }

    fn open_part(&self, body: &mut Vec<u8>) {
        body.extend_from_slice(format!("--{}", self.boundary).as_bytes());
        body.extend_from_slice(CRLF);
    }
}

// Quotes and line breaks would terminate the header value early.
fn escape_quoted(value: &str) -> String {
    value
        .replace('"', "%22")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
