//! PDF loading: one [`Document`] per page.

use crate::types::{Document, Metadata};
use lopdf::{Dictionary, Object};
use pdfrag_core::{AppError, AppResult};
use std::path::Path;

/// Document info dictionary entries copied into page metadata.
const INFO_FIELDS: [(&[u8], &str); 5] = [
    (b"Producer", "producer"),
    (b"Creator", "creator"),
    (b"CreationDate", "creationdate"),
    (b"Title", "title"),
    (b"Author", "author"),
];

/// Load a PDF and return its pages in order.
///
/// Each page's metadata holds `source`, the 0-based `page`, `total_pages`
/// and the document info fields (empty strings when the PDF lacks them).
pub fn load_pdf(path: &Path) -> AppResult<Vec<Document>> {
    if !path.is_file() {
        return Err(AppError::Document(format!("PDF not found: {:?}", path)));
    }

    let pdf = lopdf::Document::load(path)
        .map_err(|e| AppError::Document(format!("Failed to read PDF {:?}: {}", path, e)))?;

    let pages = pdf.get_pages();
    let total_pages = pages.len();
    let info = document_info(&pdf);

    tracing::debug!("Loaded {:?}: {} pages", path, total_pages);

    let documents = pages
        .keys()
        .enumerate()
        .map(|(index, &page_number)| {
            let text = pdf.extract_text(&[page_number]).unwrap_or_else(|e| {
                tracing::warn!("No text extracted from page {}: {}", page_number, e);
                String::new()
            });

            let mut metadata = info.clone();
            metadata.insert("source".to_string(), path.to_string_lossy().into());
            metadata.insert("page".to_string(), index.into());
            metadata.insert("total_pages".to_string(), total_pages.into());

            Document {
                page_content: text,
                metadata,
            }
        })
        .collect();

    Ok(documents)
}

/// Read the trailer's `/Info` dictionary into metadata entries.
fn document_info(pdf: &lopdf::Document) -> Metadata {
    let dict: Option<&Dictionary> = match pdf.trailer.get(b"Info") {
        Ok(Object::Reference(id)) => pdf.get_dictionary(*id).ok(),
        Ok(Object::Dictionary(dict)) => Some(dict),
        _ => None,
    };

    INFO_FIELDS
        .iter()
        .map(|(key, name)| {
            let value = dict
                .and_then(|d| d.get(key).ok())
                .and_then(|obj| obj.as_str().ok())
                .map(decode_pdf_string)
                .unwrap_or_default();
            (name.to_string(), serde_json::Value::String(value))
        })
        .collect()
}

/// Decode a PDF text string: UTF-16BE with BOM, otherwise single-byte.
fn decode_pdf_string(bytes: &[u8]) -> String {
    match bytes.strip_prefix(b"\xFE\xFF") {
        Some(utf16) => {
            let units: Vec<u16> = utf16
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                .collect();
            String::from_utf16_lossy(&units)
        }
        None => bytes.iter().map(|&b| b as char).collect(),
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_pdf_one_document_per_page() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("lamina.pdf");
        test_pdf::write_pdf(&path, &["Primeira pagina", "Segunda pagina"], None);

        let docs = load_pdf(&path).unwrap();
        assert_eq!(docs.len(), 2);
        assert!(docs[0].page_content.contains("Primeira pagina"));
        assert!(docs[1].page_content.contains("Segunda pagina"));
        assert_eq!(docs[0].metadata["page"], 0);
        assert_eq!(docs[1].metadata["page"], 1);
        assert_eq!(docs[1].metadata["total_pages"], 2);
        assert_eq!(
            docs[0].metadata["source"],
            path.to_string_lossy().to_string()
        );
    }

    #[test]
    fn test_load_pdf_reads_info_dictionary() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("lamina.pdf");
        test_pdf::write_pdf(&path, &["texto"], Some("Lamina de informacoes"));

        let docs = load_pdf(&path).unwrap();
        assert_eq!(docs[0].metadata["producer"], "pdfrag tests");
        assert_eq!(docs[0].metadata["title"], "Lamina de informacoes");
        // Absent info fields are present but empty
        assert_eq!(docs[0].metadata["author"], "");
    }

    #[test]
    fn test_missing_pdf_is_document_error() {
        let temp = TempDir::new().unwrap();
        let err = load_pdf(&temp.path().join("missing.pdf")).unwrap_err();
        assert!(matches!(err, AppError::Document(_)));
    }

    #[test]
    fn test_garbage_file_is_document_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("fake.pdf");
        std::fs::write(&path, b"definitely not a pdf").unwrap();
        assert!(matches!(load_pdf(&path), Err(AppError::Document(_))));
    }

    #[test]
    fn test_decode_utf16_string() {
        let bytes = [0xFE, 0xFF, 0x00, 0x4C, 0x00, 0xE2];
        assert_eq!(decode_pdf_string(&bytes), "Lâ");
        assert_eq!(decode_pdf_string(b"plain"), "plain");
    }
}
