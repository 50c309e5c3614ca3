use lopdf::Document as LopdfDocument;

/// Number of pages in a generated PDF.
pub fn page_count(pdf_bytes: &[u8]) -> usize {
    let doc = LopdfDocument::load_mem(pdf_bytes).expect("generated bytes are a valid PDF");
    doc.get_pages().len()
}

/// All text content across the document's pages.
pub fn extract_text(pdf_bytes: &[u8]) -> String {
    let doc = LopdfDocument::load_mem(pdf_bytes).expect("generated bytes are a valid PDF");
    let mut text = String::new();
    let pages = doc.get_pages();
    for page_num in 1..=pages.len() {
        if let Ok(page_text) = doc.extract_text(&[page_num as u32]) {
            text.push_str(&page_text);
            text.push('\n');
        }
    }
    text
}

/// True if any object in the PDF is an image XObject.
pub fn has_image_xobject(pdf_bytes: &[u8]) -> bool {
    let doc = LopdfDocument::load_mem(pdf_bytes).expect("generated bytes are a valid PDF");
    doc.objects.values().any(|object| {
        object
            .as_stream()
            .ok()
            .and_then(|stream| stream.dict.get(b"Subtype").ok())
            .and_then(|subtype| subtype.as_name().ok())
            .is_some_and(|name| name == b"Image".as_slice())
    })
}
