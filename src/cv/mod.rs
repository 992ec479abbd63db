// src/cv/mod.rs
//! CV text extraction and regex-based field parsing

pub mod extraction_client;
pub mod parser;

pub use extraction_client::CvExtractionClient;
pub use parser::{CvParser, ParsedCv};

/// Parser plus the optional extraction service for binary formats
pub struct CvServices {
    pub parser: CvParser,
    pub extractor: Option<CvExtractionClient>,
}

impl CvServices {
    pub fn new(cv_service_url: Option<&str>) -> anyhow::Result<Self> {
        let extractor = cv_service_url
            .filter(|url| !url.trim().is_empty())
            .map(CvExtractionClient::new)
            .transpose()?;
        Ok(Self {
            parser: CvParser::new()?,
            extractor,
        })
    }
}

pub const MAX_CV_BYTES: u64 = 10 * 1024 * 1024;
pub const SUPPORTED_EXTENSIONS: &[&str] = &["txt", "pdf", "docx"];

/// Plain-text uploads are parsed locally; other formats need the extraction service
pub fn needs_extraction_service(extension: &str) -> bool {
    extension != "txt"
}

/// Decode a plain-text CV, replacing invalid UTF-8 sequences
pub fn decode_text(content: &[u8]) -> String {
    String::from_utf8_lossy(content)
        .trim_start_matches('\u{feff}')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_needs_extraction_service() {
        assert!(!needs_extraction_service("txt"));
        assert!(needs_extraction_service("pdf"));
        assert!(needs_extraction_service("docx"));
    }

    #[test]
    fn test_services_without_extractor() {
        assert!(CvServices::new(None).unwrap().extractor.is_none());
        assert!(CvServices::new(Some("  ")).unwrap().extractor.is_none());
        assert!(CvServices::new(Some("http://localhost:9000"))
            .unwrap()
            .extractor
            .is_some());
    }

    #[test]
    fn test_decode_text_strips_bom() {
        assert_eq!(decode_text("\u{feff}Jane Doe".as_bytes()), "Jane Doe");
    }
}
