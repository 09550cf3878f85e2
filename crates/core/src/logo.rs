//! Client logo upload rules.

use sha2::{Digest, Sha256};

use crate::error::CoreError;

/// Accepted logo file extensions (lowercase).
pub const SUPPORTED_LOGO_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "svg"];

/// Extract and validate the lowercase extension of an uploaded file name.
pub fn logo_extension(filename: &str) -> Result<String, CoreError> {
    let ext = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    if SUPPORTED_LOGO_EXTENSIONS.contains(&ext.as_str()) {
        Ok(ext)
    } else {
        Err(CoreError::Validation(format!(
            "Unsupported logo format '{filename}'. Supported: {}",
            SUPPORTED_LOGO_EXTENSIONS.join(", ")
        )))
    }
}

/// Content-addressed storage name: `<sha256>.<ext>`.
///
/// Uploading the same bytes twice yields the same name, so re-uploads do not
/// pile up duplicate files.
pub fn logo_storage_name(data: &[u8], ext: &str) -> String {
    format!("{:x}.{ext}", Sha256::digest(data))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn extension_is_lowercased() {
        assert_eq!(logo_extension("Brand.PNG").unwrap(), "png");
        assert_eq!(logo_extension("logo.final.svg").unwrap(), "svg");
    }

    #[test]
    fn unsupported_or_missing_extension_rejected() {
        assert_matches!(logo_extension("logo.gif"), Err(CoreError::Validation(_)));
        assert_matches!(logo_extension("logo"), Err(CoreError::Validation(_)));
        assert_matches!(logo_extension(""), Err(CoreError::Validation(_)));
    }

    #[test]
    fn storage_name_is_content_addressed() {
        let a = logo_storage_name(b"same", "png");
        let b = logo_storage_name(b"same", "png");
        assert_eq!(a, b);
        assert!(a.ends_with(".png"));
        assert_eq!(a.len(), 64 + 4);
        assert_ne!(a, logo_storage_name(b"other", "png"));
    }

    #[test]
    fn empty_file_digest_is_stable() {
        assert_eq!(
            logo_storage_name(b"", "svg"),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855.svg"
        );
    }
}
