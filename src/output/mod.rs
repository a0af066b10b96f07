pub mod render;
pub mod transcript_file;

pub use render::{render_curator_summary, render_document, render_json, render_key_summary, DocumentHeader};
pub use transcript_file::{default_file_name, write_transcript};
