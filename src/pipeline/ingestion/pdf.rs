use tracing::debug;

use super::{IngestionError, ReportIngestor};

/// Text-layer PDF ingestion using the pdf-extract crate.
///
/// Pages without extractable text contribute nothing; the rest are joined
/// with newlines.
pub struct PdfIngestor;

impl PdfIngestor {
    /// Per-page text, empty pages dropped.
    pub fn page_texts(&self, pdf_bytes: &[u8]) -> Result<Vec<String>, IngestionError> {
        let pages = pdf_extract::extract_text_from_mem_by_pages(pdf_bytes)
            .map_err(|e| IngestionError::PdfParsing(e.to_string()))?;

        let total = pages.len();
        let kept: Vec<String> = pages
            .into_iter()
            .filter(|text| !text.trim().is_empty())
            .collect();
        debug!(pages = total, with_text = kept.len(), "PDF text extracted");
        Ok(kept)
    }
}

impl ReportIngestor for PdfIngestor {
    fn ingest(&self, bytes: &[u8]) -> Result<String, IngestionError> {
        let pages = self.page_texts(bytes)?;
        if pages.is_empty() {
            return Err(IngestionError::NoText);
        }
        Ok(pages.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a PDF with one page per entry; `None` pages have no content stream text.
    fn make_test_pdf(pages: &[Option<&str>]) -> Vec<u8> {
        use lopdf::dictionary;
        use lopdf::{Document, Object, Stream};

        let mut doc = Document::with_version("1.4");
        let pages_id = doc.new_object_id();

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        });

        let mut kids: Vec<Object> = Vec::new();
        for page in pages {
            let content = match page {
                Some(text) => format!("BT /F1 12 Tf 100 700 Td ({text}) Tj ET"),
                None => String::new(),
            };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
                "Contents" => content_id,
                "Resources" => resources_id,
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

        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        buf
    }

    #[test]
    fn extracts_text_from_digital_pdf() {
        let pdf = make_test_pdf(&[Some("Glucose level of 150 mg/dl")]);
        let text = PdfIngestor.ingest(&pdf).unwrap();
        assert!(
            text.contains("Glucose") || text.contains("150"),
            "unexpected text: {text}"
        );
    }

    #[test]
    fn empty_pages_contribute_nothing() {
        let pdf = make_test_pdf(&[Some("BMI 31.0"), None, Some("Age 40")]);
        let pages = PdfIngestor.page_texts(&pdf).unwrap();
        assert_eq!(pages.len(), 2);
    }

    #[test]
    fn pdf_without_text_is_no_text() {
        let pdf = make_test_pdf(&[None]);
        assert!(matches!(
            PdfIngestor.ingest(&pdf),
            Err(IngestionError::NoText)
        ));
    }

    #[test]
    fn invalid_pdf_returns_error() {
        assert!(matches!(
            PdfIngestor.ingest(b"not a pdf"),
            Err(IngestionError::PdfParsing(_))
        ));
    }
}
