//! Content-sniffing extractor used by the service and the CLI.

use dossier_core::error::DossierError;

use crate::plain_text::PlainTextExtractor;
use crate::types::RawDocument;
use crate::DocumentExtractor;

const PDF_MAGIC: &[u8] = b"%PDF";

/// Dispatches on the leading bytes: `%PDF` goes to the PDF backend, anything
/// else is treated as plain text.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoExtractor {
    text: PlainTextExtractor,
    #[cfg(feature = "pdf")]
    pdf: crate::pdf::PdfExtractor,
}

impl AutoExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pdf(bytes: &[u8]) -> bool {
        bytes.starts_with(PDF_MAGIC)
    }
}

impl DocumentExtractor for AutoExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<RawDocument, DossierError> {
        if Self::is_pdf(bytes) {
            #[cfg(feature = "pdf")]
            return self.pdf.extract(bytes);

            #[cfg(not(feature = "pdf"))]
            return Err(DossierError::Extraction(
                "PDF support not compiled in (enable the `pdf` feature)".to_string(),
            ));
        }
        self.text.extract(bytes)
    }

    fn name(&self) -> &'static str {
        "auto"
    }
}
