//! Base64 and image container decoding.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use vision_ai_common::{ChannelOrder, DecodedFrame};

/// Failure to turn a payload into pixels. Retrying never helps.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("cannot identify image: {0}")]
    Image(#[from] image::ImageError),

    #[error("image has no pixels")]
    Empty,
}

/// Decode a base64 image payload into a 3-channel frame in `order`.
///
/// ASCII whitespace anywhere in the payload is ignored, so line-wrapped
/// base64 decodes. Any container the `image` crate can sniff is accepted.
/// Alpha is dropped and grayscale is expanded, then channels are swapped
/// into `order`.
pub fn decode_frame(payload: &str, order: ChannelOrder) -> Result<DecodedFrame, DecodeError> {
    let compact: Vec<u8> = payload
        .bytes()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    let bytes = STANDARD.decode(compact)?;
    let rgb = image::load_from_memory(&bytes)?.into_rgb8();

    let (width, height) = rgb.dimensions();
    let frame = DecodedFrame::new(width, height, ChannelOrder::Rgb, rgb.into_raw())
        .filter(|_| width > 0 && height > 0)
        .ok_or(DecodeError::Empty)?;

    Ok(frame.into_order(order))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{png_base64, solid_png};

    #[test]
    fn test_decode_png_to_bgr() {
        let payload = png_base64(&solid_png(4, 3, [200, 100, 50]));
        let frame = decode_frame(&payload, ChannelOrder::Bgr).unwrap();

        assert_eq!((frame.width(), frame.height()), (4, 3));
        assert_eq!(frame.order(), ChannelOrder::Bgr);
        assert_eq!(frame.pixel(3, 2), Some([50, 100, 200]));
    }

    #[test]
    fn test_decode_png_keeps_rgb_when_requested() {
        let payload = png_base64(&solid_png(2, 2, [200, 100, 50]));
        let frame = decode_frame(&payload, ChannelOrder::Rgb).unwrap();
        assert_eq!(frame.pixel(0, 0), Some([200, 100, 50]));
    }

    #[test]
    fn test_decode_drops_alpha() {
        let rgba = image::RgbaImage::from_pixel(2, 1, image::Rgba([1, 2, 3, 4]));
        let mut png = std::io::Cursor::new(Vec::new());
        rgba.write_to(&mut png, image::ImageFormat::Png).unwrap();

        let frame = decode_frame(&png_base64(png.get_ref()), ChannelOrder::Bgr).unwrap();
        assert_eq!(frame.as_bytes().len(), 2 * 3);
        assert_eq!(frame.pixel(1, 0), Some([3, 2, 1]));
    }

    #[test]
    fn test_decode_expands_grayscale() {
        let gray = image::GrayImage::from_pixel(1, 1, image::Luma([77]));
        let mut png = std::io::Cursor::new(Vec::new());
        gray.write_to(&mut png, image::ImageFormat::Png).unwrap();

        let frame = decode_frame(&png_base64(png.get_ref()), ChannelOrder::Bgr).unwrap();
        assert_eq!(frame.pixel(0, 0), Some([77, 77, 77]));
    }

    #[test]
    fn test_decode_tolerates_surrounding_whitespace() {
        let payload = format!("\n{}  ", png_base64(&solid_png(1, 1, [9, 9, 9])));
        assert!(decode_frame(&payload, ChannelOrder::Bgr).is_ok());
    }

    #[test]
    fn test_decode_line_wrapped_base64() {
        let encoded = png_base64(&solid_png(8, 8, [10, 20, 30]));
        let wrapped = encoded
            .as_bytes()
            .chunks(20)
            .map(|line| std::str::from_utf8(line).unwrap())
            .collect::<Vec<_>>()
            .join("\n");
        assert!(wrapped.contains('\n'));

        let frame = decode_frame(&wrapped, ChannelOrder::Bgr).unwrap();
        assert_eq!((frame.width(), frame.height()), (8, 8));
        assert_eq!(frame.pixel(7, 7), Some([30, 20, 10]));
    }

    #[test]
    fn test_decode_crlf_wrapped_base64() {
        let encoded = png_base64(&solid_png(2, 2, [1, 2, 3]));
        let (head, tail) = encoded.split_at(encoded.len() / 2);
        let wrapped = format!("{}\r\n{}\r\n", head, tail);
        assert!(decode_frame(&wrapped, ChannelOrder::Bgr).is_ok());
    }

    #[test]
    fn test_invalid_base64() {
        let err = decode_frame("not-base64!!", ChannelOrder::Bgr).unwrap_err();
        assert!(matches!(err, DecodeError::Base64(_)));
    }

    #[test]
    fn test_non_image_bytes() {
        let err = decode_frame("aGVsbG8gd29ybGQ=", ChannelOrder::Bgr).unwrap_err();
        assert!(matches!(err, DecodeError::Image(_)));
    }

    #[test]
    fn test_empty_payload() {
        assert!(decode_frame("", ChannelOrder::Bgr).is_err());
    }
}
