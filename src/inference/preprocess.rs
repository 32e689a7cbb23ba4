use image::imageops::FilterType;
use tch::{Kind, Tensor};

use crate::inference::model::InferenceError;

/// Input resolution the classifier was trained at.
pub const IMG_SIZE: u32 = 224;

/// Decode an uploaded image and turn it into the model input: forced to RGB,
/// resized to `IMG_SIZE` square, pixels scaled to [0,1], shaped NCHW with a
/// batch dimension of one.
pub fn preprocess(image_bytes: &[u8]) -> Result<Tensor, InferenceError> {
    let img = image::load_from_memory(image_bytes)?.to_rgb8();
    let resized = image::imageops::resize(&img, IMG_SIZE, IMG_SIZE, FilterType::Triangle);
    let raw = resized.into_raw();

    let tensor = Tensor::from_slice(&raw)
        .view([IMG_SIZE as i64, IMG_SIZE as i64, 3])
        .permute([2, 0, 1])
        .to_kind(Kind::Float)
        / 255.0;

    Ok(tensor.unsqueeze(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, ImageFormat, Rgb};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img: ImageBuffer<Rgb<u8>, Vec<u8>> =
            ImageBuffer::from_pixel(width, height, Rgb([30, 180, 60]));
        let mut bytes = Cursor::new(Vec::new());
        img.write_to(&mut bytes, ImageFormat::Png).unwrap();
        bytes.into_inner()
    }

    #[test]
    fn produces_batched_nchw_tensor() {
        let tensor = preprocess(&png_bytes(64, 48)).unwrap();
        assert_eq!(tensor.size(), vec![1, 3, IMG_SIZE as i64, IMG_SIZE as i64]);
        assert_eq!(tensor.kind(), Kind::Float);
    }

    #[test]
    fn pixel_values_are_scaled_to_unit_range() {
        let tensor = preprocess(&png_bytes(32, 32)).unwrap();
        let min = tensor.min().double_value(&[]);
        let max = tensor.max().double_value(&[]);
        assert!(min >= 0.0);
        assert!(max <= 1.0);
    }

    #[test]
    fn corrupt_payload_is_a_decode_error() {
        let result = preprocess(b"definitely not an image");
        assert!(matches!(result, Err(InferenceError::Decode(_))));
    }
}
