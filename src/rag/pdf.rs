//! PDF text extraction.

use crate::types::{AppError, Result};
use lopdf::Document;
use tracing::warn;

/// Extract the text of every page of a PDF, in page order.
///
/// Pages whose content streams cannot be decoded are skipped with a
/// warning rather than failing the whole document.
///
/// # Errors
///
/// Returns [`AppError::Pdf`] if the bytes are not a loadable PDF.
pub fn extract_text(bytes: &[u8]) -> Result<String> {
    let doc = Document::load_mem(bytes)
        .map_err(|e| AppError::Pdf(format!("Failed to load PDF: {}", e)))?;

    let mut pages_text = Vec::new();
    for (&page_number, _) in doc.get_pages().iter() {
        match doc.extract_text(&[page_number]) {
            Ok(text) => pages_text.push(text),
            Err(e) => {
                warn!(page = page_number, "Failed to extract text from page: {}", e);
            }
        }
    }

    Ok(pages_text.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_pdf_bytes() {
        let result = extract_text(b"this is not a pdf");
        assert!(matches!(result, Err(AppError::Pdf(_))));
    }

    #[test]
    fn test_extracts_text_from_minimal_pdf() {
        // A minimal single-page PDF with "Hello" drawn via a Tj operator
        let pdf = build_minimal_pdf("Hello");
        let text = extract_text(&pdf).unwrap();
        assert!(text.contains("Hello"));
    }

    fn build_minimal_pdf(text: &str) -> Vec<u8> {
        use lopdf::content::{Content, Operation};
        use lopdf::{dictionary, Object, Stream};

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![100.into(), 700.into()]),
                Operation::new("Tj", vec![Object::string_literal(text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().unwrap(),
        ));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        });

        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }
}
