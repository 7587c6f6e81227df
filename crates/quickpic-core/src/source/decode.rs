//! Decoding of user-supplied files into a `SourceImage`.
//!
//! Re-encoding to JPEG drops all metadata, so EXIF orientation has to be
//! baked into the pixels here or the output would come out rotated.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::{DynamicImage, ImageReader};

use super::{Orientation, SourceError, SourceImage};

/// Decode JPEG or PNG bytes, applying EXIF orientation.
///
/// Alpha is kept when the file carries it, so the encoder can flatten it
/// the same way a browser canvas does.
///
/// # Errors
///
/// Returns `SourceError::InvalidFormat` if the format cannot be detected and
/// `SourceError::CorruptedFile` if decoding fails.
pub fn decode_image(bytes: &[u8]) -> Result<SourceImage, SourceError> {
    let orientation = read_orientation(bytes);

    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| SourceError::CorruptedFile(e.to_string()))?;

    if reader.format().is_none() {
        return Err(SourceError::InvalidFormat);
    }

    let img = reader
        .decode()
        .map_err(|e| SourceError::CorruptedFile(e.to_string()))?;

    SourceImage::from_dynamic(apply_orientation(img, orientation))
}

/// Read the EXIF orientation tag; anything unreadable counts as `Normal`.
pub fn read_orientation(bytes: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(bytes);
    let Ok(exif) = Reader::new().read_from_container(&mut cursor) else {
        return Orientation::Normal;
    };

    exif.get_field(Tag::Orientation, In::PRIMARY)
        .and_then(|field| field.value.get_uint(0))
        .map(Orientation::from)
        .unwrap_or_default()
}

fn apply_orientation(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90CW => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270CW => img.rotate270(),
    }
}
