//! MIME types for embedded images, keyed by file extension

pub const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

const MIME_TYPES: &[(&str, &[&str])] = &[
    ("image/png", &["png"]),
    ("image/jpeg", &["jpg", "jpeg"]),
    ("text/plain", &["glsl", "vert", "vs", "frag", "fs", "txt"]),
    ("image/vnd-ms.dds", &["dds"]),
];

/// MIME type for a file name or URI, by its (case-insensitive) extension
pub fn mime_type_for(filename: &str) -> &'static str {
    let extension = filename.rsplit('.').next().unwrap_or_default();
    MIME_TYPES
        .iter()
        .find(|(_, extensions)| extensions.iter().any(|e| e.eq_ignore_ascii_case(extension)))
        .map(|(mime, _)| *mime)
        .unwrap_or(FALLBACK_MIME_TYPE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_extensions() {
        assert_eq!(mime_type_for("tex.PNG"), "image/png");
        assert_eq!(mime_type_for("textures/albedo.jpeg"), "image/jpeg");
        assert_eq!(mime_type_for("photo.JPG"), "image/jpeg");
        assert_eq!(mime_type_for("shader.frag"), "text/plain");
        assert_eq!(mime_type_for("normal.dds"), "image/vnd-ms.dds");
    }

    #[test]
    fn test_unknown_extension_falls_back() {
        assert_eq!(mime_type_for("unknown.xyz"), FALLBACK_MIME_TYPE);
        assert_eq!(mime_type_for("archive.tar.gz"), FALLBACK_MIME_TYPE);
    }
}
