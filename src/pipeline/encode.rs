//! Image encoding: selected file → standard base64 string.
//!
//! Classification endpoints take the image inline in the request body, so the
//! raw bytes are base64-encoded as-is. No re-encoding or resizing happens
//! here; whatever the user picked is what the endpoint sees.

use crate::error::ClassifyError;
use crate::intake::{ImageFile, ImageSource};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::debug;

/// Read `file` (if on disk) and return its base64 encoding.
///
/// Fails with [`ClassifyError::Encoding`] when the file cannot be read.
pub async fn encode_image(file: &ImageFile) -> Result<String, ClassifyError> {
    let b64 = match &file.source {
        ImageSource::Bytes(bytes) => STANDARD.encode(bytes),
        ImageSource::Path(path) => {
            let bytes = tokio::fs::read(path)
                .await
                .map_err(|e| ClassifyError::Encoding {
                    name: file.name.clone(),
                    detail: e.to_string(),
                })?;
            STANDARD.encode(&bytes)
        }
    };

    debug!("Encoded '{}' → {} bytes base64", file.name, b64.len());
    Ok(b64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn encodes_in_memory_bytes() {
        let file = ImageFile::from_bytes("dot.png", "image/png", vec![1u8, 2, 3]);
        let b64 = tokio_test::block_on(encode_image(&file)).expect("encode should succeed");
        assert_eq!(b64, "AQID");
    }

    #[tokio::test]
    async fn encodes_file_on_disk() {
        let mut tmp = tempfile::Builder::new().suffix(".jpg").tempfile().unwrap();
        tmp.write_all(b"\xFF\xD8\xFF\xE0jpeg").unwrap();
        let file = ImageFile::from_path(tmp.path());

        let b64 = encode_image(&file).await.unwrap();
        let decoded = STANDARD.decode(&b64).expect("valid base64");
        assert_eq!(decoded, b"\xFF\xD8\xFF\xE0jpeg");
    }

    #[tokio::test]
    async fn missing_file_is_encoding_error() {
        let file = ImageFile::from_path("/definitely/not/here/wall.jpg");
        let err = encode_image(&file).await.unwrap_err();
        assert!(
            matches!(err, ClassifyError::Encoding { ref name, .. } if name == "wall.jpg"),
            "got: {err:?}"
        );
    }
}
