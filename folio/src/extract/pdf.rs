use std::panic;

use super::ExtractError;

/// Text of every page, in document order.
///
/// The parser can panic on malformed input, so the call is isolated and a
/// panic is reported like any other parse failure.
pub(super) fn extract_pages(bytes: &[u8]) -> Result<Vec<String>, ExtractError> {
    match panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(bytes)) {
        Ok(Ok(pages)) => Ok(pages),
        Ok(Err(e)) => Err(ExtractError::Pdf(e.to_string())),
        Err(_) => Err(ExtractError::Pdf("parser panicked on malformed input".to_string())),
    }
}
