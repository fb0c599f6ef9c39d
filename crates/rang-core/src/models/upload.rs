/// A user-selected file awaiting validation and submission.
///
/// Holds the raw bytes together with the declared filename and media type.
/// A candidate is consumed by the workflow on submission or discarded on
/// rejection; it is never persisted.
#[derive(Debug, Clone)]
pub struct UploadCandidate {
    pub data: Vec<u8>,
    pub filename: String,
    pub content_type: String,
}

impl UploadCandidate {
    pub fn new(data: Vec<u8>, filename: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self {
            data,
            filename: filename.into(),
            content_type: content_type.into(),
        }
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Lowercased extension of the declared filename, empty if none.
    pub fn extension(&self) -> String {
        match self.filename.rsplit_once('.') {
            Some((_, ext)) => ext.to_lowercase(),
            None => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_is_lowercased() {
        let candidate = UploadCandidate::new(vec![0u8; 4], "Wedding.JPG", "image/jpeg");
        assert_eq!(candidate.extension(), "jpg");
        assert_eq!(candidate.size(), 4);
    }

    #[test]
    fn missing_extension_is_empty() {
        let candidate = UploadCandidate::new(vec![], "photo", "image/png");
        assert_eq!(candidate.extension(), "");
    }
}
