/// Accepted upload formats, recognised by declared type and file signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Image {
    Jpeg,
    Png,
    Webp,
}

impl Image {
    /// Parses a `Content-Type` value, ignoring parameters.
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime.split(';').next().map(str::trim) {
            Some(m) if m.eq_ignore_ascii_case("image/jpeg") => Some(Self::Jpeg),
            Some(m) if m.eq_ignore_ascii_case("image/png") => Some(Self::Png),
            Some(m) if m.eq_ignore_ascii_case("image/webp") => Some(Self::Webp),
            _ => None,
        }
    }
    pub fn mime(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Webp => "image/webp",
        }
    }
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::Webp => "webp",
        }
    }
    /// True when the bytes open with this format's magic number.
    pub fn sniff(&self, bytes: &[u8]) -> bool {
        match self {
            Self::Jpeg => bytes.starts_with(&[0xFF, 0xD8, 0xFF]),
            Self::Png => bytes.starts_with(b"\x89PNG\r\n\x1a\n"),
            Self::Webp => bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WEBP",
        }
    }
    /// Extension for the stored object: the uploader's own if it is short
    /// and alphanumeric, otherwise the canonical one for the format.
    pub fn name(&self, filename: Option<&str>) -> String {
        let ext = filename
            .and_then(|f| f.rsplit_once('.'))
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .filter(|ext| !ext.is_empty() && ext.len() <= 5)
            .filter(|ext| ext.chars().all(|c| c.is_ascii_alphanumeric()))
            .unwrap_or_else(|| self.extension().to_string());
        format!("{}.{}", uuid::Uuid::now_v7(), ext)
    }
}
