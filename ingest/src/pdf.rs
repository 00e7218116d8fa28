/// Best-effort text extraction from PDF bytes.
///
/// Extraction failures are swallowed: a broken or image-only document
/// contributes no text, never an error.
pub fn pdf_bytes_to_text(bytes: &[u8]) -> String {
    match pdf_extract::extract_text_from_mem(bytes) {
        Ok(text) => text,
        Err(err) => {
            tracing::warn!(%err, "pdf extraction failed");
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_bytes_degrade_to_empty_text() {
        assert_eq!(pdf_bytes_to_text(b"definitely not a pdf"), "");
    }
}
