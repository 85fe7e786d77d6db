//! PDF text extraction built on `lopdf`.
use lopdf::Document;
use tracing::debug;

use crate::error::LoaderError;

/// Extracts the text of every page in page order.
///
/// Pages are concatenated without separators; a newline is inserted only when
/// a page's text does not already end in whitespace.
pub(crate) fn extract_text(content: &[u8]) -> Result<String, LoaderError> {
    let doc = Document::load_mem(content)
        .map_err(|e| LoaderError::Pdf(format!("failed to load document: {e}")))?;

    // BTreeMap keys are page numbers, so iteration is already in page order.
    let pages = doc.get_pages();
    let mut text = String::new();
    for &page_number in pages.keys() {
        let page_text = doc
            .extract_text(&[page_number])
            .map_err(|e| LoaderError::Pdf(format!("page {page_number}: {e}")))?;

        if !text.is_empty() && !text.ends_with(char::is_whitespace) {
            text.push('\n');
        }
        text.push_str(&page_text);
    }

    debug!(pages = pages.len(), extracted_len = text.len(), "pdf_pages_extracted");
    Ok(text)
}

#[cfg(test)]
pub(crate) mod test_support {
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};

    /// Builds an uncompressed PDF with one Courier text line per page.
    pub(crate) fn pdf_with_pages(pages: &[&str]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids = Vec::new();
        for text in pages {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 12.into()]),
                    Operation::new("Td", vec![72.into(), 720.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let encoded = content.encode().expect("content encodes");
            let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).expect("pdf serializes");
        bytes
    }
}
