use crate::annotate::{EntityAnnotation, TextAnnotation};

pub fn format_text(annotation: &TextAnnotation) -> String {
    annotation.text.clone()
}

/// Rebuilds the text from the symbol hierarchy: words separated by one space, blocks by a newline.
pub fn walk_document_text(annotation: &TextAnnotation) -> String {
    let mut blocks: Vec<String> = Vec::new();

    for page in &annotation.pages {
        for block in &page.blocks {
            let words: Vec<String> = block.paragraphs.iter()
                .flat_map(|paragraph| paragraph.words.iter())
                .map(|word| word.symbols.iter().map(|symbol| symbol.text.as_str()).collect::<String>())
                .collect();
            blocks.push(words.join(" "));
        }
    }

    blocks.join("\n")
}

/// Returns the API's own full text. The walked hierarchy only goes to the debug log.
pub fn format_document_text(annotation: &TextAnnotation) -> String {
    if log::log_enabled!(log::Level::Debug) {
        for (index, block) in walk_document_text(annotation).lines().enumerate() {
            log::debug!("Block {}: {}", index, block);
        }
    }
    annotation.text.clone()
}

pub fn format_landmark(landmark: &EntityAnnotation) -> String {
    let locations = landmark.locations.iter()
        .filter_map(|location| location.lat_lng)
        .map(|lat_lng| format!("({}, {})", lat_lng.latitude, lat_lng.longitude))
        .collect::<Vec<String>>()
        .join(", ");

    format!(
        "{{description: {:?}, mid: {:?}, score: {}, locations: [{}]}}",
        landmark.description, landmark.mid, landmark.score, locations
    )
}

pub fn format_landmarks(landmarks: &[EntityAnnotation]) -> String {
    let entries = landmarks.iter()
        .map(format_landmark)
        .collect::<Vec<String>>()
        .join(", ");
    format!("[{}]", entries)
}

pub fn format_pdf_pages(pages: &[TextAnnotation]) -> Vec<String> {
    pages.iter().map(format_text).collect()
}
