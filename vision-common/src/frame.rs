//! Decoded pixel buffers handed to emotion classifiers.

use serde::{Deserialize, Serialize};

/// Byte order of the three color channels in a packed pixel.
///
/// Generic image decoders produce RGB. OpenCV-based classifiers expect BGR
/// and do not reject the wrong order; they silently misclassify.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelOrder {
    Rgb,
    Bgr,
}

impl std::fmt::Display for ChannelOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChannelOrder::Rgb => write!(f, "rgb"),
            ChannelOrder::Bgr => write!(f, "bgr"),
        }
    }
}

/// A dense 3-channel, 8-bit pixel buffer.
///
/// Pixels are stored row-major with no padding, three bytes each, in the
/// order given by [`DecodedFrame::order`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedFrame {
    width: u32,
    height: u32,
    order: ChannelOrder,
    data: Vec<u8>,
}

impl DecodedFrame {
    /// Number of bytes per pixel.
    pub const CHANNELS: usize = 3;

    /// Wrap a packed pixel buffer.
    ///
    /// Returns `None` when `data` does not hold exactly `width * height`
    /// three-byte pixels.
    pub fn new(width: u32, height: u32, order: ChannelOrder, data: Vec<u8>) -> Option<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)?
            .checked_mul(Self::CHANNELS)?;
        if data.len() != expected {
            return None;
        }
        Some(Self {
            width,
            height,
            order,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn order(&self) -> ChannelOrder {
        self.order
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// The pixel at `(x, y)` in the frame's own channel order.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y as usize * self.width as usize + x as usize) * Self::CHANNELS;
        let px = &self.data[offset..offset + Self::CHANNELS];
        Some([px[0], px[1], px[2]])
    }

    /// Re-lay the buffer in `order`, swapping the first and third byte of
    /// every pixel when it differs from the current order.
    pub fn into_order(mut self, order: ChannelOrder) -> Self {
        if self.order != order {
            for px in self.data.chunks_exact_mut(Self::CHANNELS) {
                px.swap(0, 2);
            }
            self.order = order;
        }
        self
    }
}
