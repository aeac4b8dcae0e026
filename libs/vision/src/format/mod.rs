mod utils;

pub use utils::format_text;
pub use utils::format_document_text;
pub use utils::walk_document_text;
pub use utils::format_landmark;
pub use utils::format_landmarks;
pub use utils::format_pdf_pages;
