//! Response classification.
//!
//! A raw agent reply is inspected exactly once, here, and tagged as text,
//! table, or image. Rendering and dispatch consume the tag; they never
//! re-sniff the raw value.

use std::path::{Path, PathBuf};

use tabchat_agent::AgentReply;
use tabchat_core::TableHandle;

/// File extensions the agent may use for generated chart images.
const IMAGE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "gif", "bmp", "webp"];

/// A classified agent reply.
#[derive(Debug, Clone, PartialEq)]
pub enum Classified {
    Text(String),
    Table(TableHandle),
    /// A path to an image file that existed at classification time.
    Image(PathBuf),
}

/// Classify a raw agent reply.
///
/// A text reply is an image only if its lowercase suffix is a known image
/// extension AND a file exists at that path right now; a path-looking string
/// with nothing behind it is plain text, not an error. Pure apart from the
/// mandatory existence probe; mutates no session state.
pub fn classify(reply: &AgentReply) -> Classified {
    match reply {
        AgentReply::Text(text) => {
            let trimmed = text.trim();
            if has_image_extension(trimmed) && Path::new(trimmed).is_file() {
                Classified::Image(PathBuf::from(trimmed))
            } else {
                Classified::Text(text.clone())
            }
        }
        AgentReply::Table(table) => Classified::Table(table.clone()),
    }
}

fn has_image_extension(text: &str) -> bool {
    let lower = text.to_lowercase();
    IMAGE_EXTENSIONS
        .iter()
        .any(|ext| lower.ends_with(&format!(".{}", ext)))
}

#[cfg(test)]
mod tests {
    use super::*;

    // ---- Image detection ----

    #[test]
    fn test_existing_image_path_is_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.png");
        std::fs::write(&path, b"png").unwrap();

        let reply = AgentReply::Text(path.to_string_lossy().to_string());
        assert_eq!(classify(&reply), Classified::Image(path));
    }

    #[test]
    fn test_missing_image_path_is_text() {
        // Looks like a filename, resolves to nothing: plain text.
        let reply = AgentReply::Text("/no/such/chart.png".to_string());
        assert_eq!(
            classify(&reply),
            Classified::Text("/no/such/chart.png".to_string())
        );
    }

    #[test]
    fn test_extension_check_is_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("CHART.PNG");
        std::fs::write(&path, b"png").unwrap();

        let reply = AgentReply::Text(path.to_string_lossy().to_string());
        assert!(matches!(classify(&reply), Classified::Image(_)));
    }

    #[test]
    fn test_surrounding_whitespace_tolerated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.png");
        std::fs::write(&path, b"png").unwrap();

        let reply = AgentReply::Text(format!("  {}\n", path.display()));
        assert!(matches!(classify(&reply), Classified::Image(_)));
    }

    #[test]
    fn test_non_image_extension_never_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");
        std::fs::write(&path, b"a,b").unwrap();

        // The file exists, but .csv is not in the image extension set.
        let reply = AgentReply::Text(path.to_string_lossy().to_string());
        assert!(matches!(classify(&reply), Classified::Text(_)));
    }

    #[test]
    fn test_directory_with_image_name_is_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weird.png");
        std::fs::create_dir(&path).unwrap();

        let reply = AgentReply::Text(path.to_string_lossy().to_string());
        assert!(matches!(classify(&reply), Classified::Text(_)));
    }

    #[test]
    fn test_all_known_extensions() {
        let dir = tempfile::tempdir().unwrap();
        for ext in IMAGE_EXTENSIONS {
            let path = dir.path().join(format!("chart.{}", ext));
            std::fs::write(&path, b"img").unwrap();
            let reply = AgentReply::Text(path.to_string_lossy().to_string());
            assert!(
                matches!(classify(&reply), Classified::Image(_)),
                "extension {} should classify as image",
                ext
            );
        }
    }

    // ---- Text and tables ----

    #[test]
    fn test_plain_answer_is_text() {
        let reply = AgentReply::Text("The average age is 27.5".to_string());
        assert_eq!(
            classify(&reply),
            Classified::Text("The average age is 27.5".to_string())
        );
    }

    #[test]
    fn test_sentence_mentioning_png_is_text() {
        let reply = AgentReply::Text("I saved the chart".to_string());
        assert!(matches!(classify(&reply), Classified::Text(_)));
    }

    #[test]
    fn test_table_reply_is_table() {
        let table = TableHandle::from_csv("t", "a,b\n1,2\n").unwrap();
        let reply = AgentReply::Table(table.clone());
        assert_eq!(classify(&reply), Classified::Table(table));
    }

    #[test]
    fn test_empty_text_is_text() {
        let reply = AgentReply::Text(String::new());
        assert_eq!(classify(&reply), Classified::Text(String::new()));
    }

    #[test]
    fn test_classification_is_pure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.png");
        std::fs::write(&path, b"png").unwrap();

        let reply = AgentReply::Text(path.to_string_lossy().to_string());
        let first = classify(&reply);
        let second = classify(&reply);
        assert_eq!(first, second);
        // The file is untouched by classification.
        assert!(path.exists());
    }
}
