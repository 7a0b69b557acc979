//! MIME resolution for inbound image payloads.
//!
//! Resolution order: the sender's declared MIME type, then the filename
//! extension, then magic-byte sniffing of the payload, then the default.
//! Whatever the chain resolves to must be an `image/*` type; anything else
//! is a validation error, never retried.

use crate::error::CaptchaError;

/// MIME type assumed when nothing else identifies the payload.
pub const DEFAULT_MIME: &str = "image/png";

/// Resolves the MIME type of a payload, rejecting non-image types.
pub fn resolve_mime(
    declared: Option<&str>,
    filename: Option<&str>,
    payload: &[u8],
) -> Result<String, CaptchaError> {
    let mime = declared
        .map(str::to_ascii_lowercase)
        .or_else(|| {
            filename
                .and_then(mime_from_extension)
                .map(str::to_string)
        })
        .or_else(|| sniff_image_mime(payload).map(str::to_string))
        .unwrap_or_else(|| DEFAULT_MIME.to_string());

    if mime.starts_with("image/") {
        Ok(mime)
    } else {
        Err(CaptchaError::UnsupportedMime(mime))
    }
}

/// Guesses a MIME type from a filename extension.
fn mime_from_extension(filename: &str) -> Option<&'static str> {
    let ext = filename.rsplit_once('.')?.1.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        "svg" => "image/svg+xml",
        // Known non-image extensions must be rejected, not defaulted.
        "txt" => "text/plain",
        "html" | "htm" => "text/html",
        "json" => "application/json",
        "pdf" => "application/pdf",
        _ => return None,
    };
    Some(mime)
}

/// Identifies an image format from its leading magic bytes.
fn sniff_image_mime(payload: &[u8]) -> Option<&'static str> {
    if payload.starts_with(b"\x89PNG\r\n\x1a\n") {
        Some("image/png")
    } else if payload.starts_with(b"\xff\xd8\xff") {
        Some("image/jpeg")
    } else if payload.starts_with(b"GIF87a") || payload.starts_with(b"GIF89a") {
        Some("image/gif")
    } else if payload.len() >= 12 && &payload[0..4] == b"RIFF" && &payload[8..12] == b"WEBP" {
        Some("image/webp")
    } else if payload.starts_with(b"BM") {
        Some("image/bmp")
    } else if payload.starts_with(b"II*\x00") || payload.starts_with(b"MM\x00*") {
        Some("image/tiff")
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declared_image_mime_wins() {
        let mime = resolve_mime(Some("image/GIF"), Some("shot.png"), b"").unwrap();
        assert_eq!(mime, "image/gif");
    }

    #[test]
    fn declared_non_image_mime_is_rejected() {
        let err = resolve_mime(Some("text/plain"), None, b"\x89PNG\r\n\x1a\n...").unwrap_err();
        assert!(matches!(err, CaptchaError::UnsupportedMime(_)));
    }

    #[test]
    fn extension_fallback() {
        assert_eq!(
            resolve_mime(None, Some("captcha.JPG"), b"").unwrap(),
            "image/jpeg"
        );
    }

    #[test]
    fn non_image_extension_is_rejected() {
        let err = resolve_mime(None, Some("notes.txt"), b"").unwrap_err();
        assert!(matches!(err, CaptchaError::UnsupportedMime(_)));
    }

    #[test]
    fn sniffing_fallback() {
        assert_eq!(
            resolve_mime(None, None, b"\xff\xd8\xff\xe0rest").unwrap(),
            "image/jpeg"
        );
        assert_eq!(resolve_mime(None, None, b"GIF89a...").unwrap(), "image/gif");
        assert_eq!(
            resolve_mime(None, None, b"RIFF\x00\x00\x00\x00WEBPVP8 ").unwrap(),
            "image/webp"
        );
    }

    #[test]
    fn unknown_content_defaults_to_png() {
        assert_eq!(resolve_mime(None, None, b"garbage").unwrap(), DEFAULT_MIME);
    }

    #[test]
    fn unknown_extension_falls_through_to_sniffing() {
        assert_eq!(
            resolve_mime(None, Some("weird.captcha"), b"\x89PNG\r\n\x1a\nrest").unwrap(),
            "image/png"
        );
    }
}
