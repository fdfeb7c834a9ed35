use crate::config::UploadConfig;
use crate::constants::{AUTH_TOKEN_PARAM, PHOTO_FIELD};
use crate::session::interface::AccessToken;
use crate::transport::model::{FilePart, Params};
use std::fmt;
use std::ops::AddAssign;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ImageKind {
    Jpg,
    Gif,
    Png,
}

impl ImageKind {
    /// Classifies a file by the text after its last dot, ignoring case.
    pub fn from_file_name(name: &str) -> Option<Self> {
        let (_, ext) = name.rsplit_once('.')?;
        match ext.to_lowercase().as_str() {
            "jpg" => Some(ImageKind::Jpg),
            "gif" => Some(ImageKind::Gif),
            "png" => Some(ImageKind::Png),
            _ => None,
        }
    }
}

/// An image found by the scanner. Lives for one scan cycle only.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct CandidateFile {
    pub path: String,
    pub kind: ImageKind,
}

impl CandidateFile {
    pub fn new(path: impl Into<String>, kind: ImageKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    pub fn file_name(&self) -> &str {
        Path::new(&self.path)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(&self.path)
    }
}

/// One photo upload: metadata fields plus the image bytes.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub token: String,
    pub title: String,
    pub description: String,
    pub tags: String,
    pub is_public: bool,
    pub is_friend: bool,
    pub is_family: bool,
    pub filename: String,
    pub bytes: Vec<u8>,
}

fn flag(value: bool) -> String {
    (if value { "1" } else { "0" }).to_string()
}

impl UploadRequest {
    pub fn new(
        token: &AccessToken,
        settings: &UploadConfig,
        filename: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            token: token.token.clone(),
            title: settings.title.clone(),
            description: settings.description.clone(),
            tags: settings.tags.clone(),
            is_public: settings.is_public,
            is_friend: settings.is_friend,
            is_family: settings.is_family,
            filename: filename.into(),
            bytes,
        }
    }

    /// Splits the request into the text fields that get signed and the photo part.
    pub fn into_parts(self) -> (Params, FilePart) {
        let mut params = Params::new();
        params.insert(AUTH_TOKEN_PARAM.to_string(), self.token);
        params.insert("title".to_string(), self.title);
        params.insert("description".to_string(), self.description);
        params.insert("tags".to_string(), self.tags);
        params.insert("is_public".to_string(), flag(self.is_public));
        params.insert("is_friend".to_string(), flag(self.is_friend));
        params.insert("is_family".to_string(), flag(self.is_family));

        (params, FilePart::new(PHOTO_FIELD, self.filename, self.bytes))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UploadBatchResult {
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl UploadBatchResult {
    pub fn total(&self) -> usize {
        self.succeeded + self.failed + self.skipped
    }
}

impl AddAssign for UploadBatchResult {
    fn add_assign(&mut self, other: Self) {
        self.succeeded += other.succeeded;
        self.failed += other.failed;
        self.skipped += other.skipped;
    }
}

impl fmt::Display for UploadBatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{\"succeeded\":{},\"failed\":{},\"skipped\":{}}}",
            self.succeeded, self.failed, self.skipped
        )
    }
}
