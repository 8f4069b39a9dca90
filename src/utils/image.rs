//! Image utility functions

use std::path::Path;

use image::DynamicImage;
use ndarray::Array3;

use crate::error::Result;

/// Channel order of a tensor produced by [`image_to_tensor`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelOrder {
    Rgb,
    Bgr,
}

/// Decode image from bytes (JPEG, PNG, etc.)
pub fn decode_image(data: &[u8]) -> Result<DynamicImage> {
    let img = image::load_from_memory(data)?;
    Ok(img)
}

/// Open and decode an image file
pub fn open_image(path: &Path) -> Result<DynamicImage> {
    let img = image::open(path)?;
    Ok(img)
}

/// Resize to `size x size` and convert to an `(H, W, 3)` tensor in `[0, 1]`.
pub fn image_to_tensor(image: &DynamicImage, size: u32, order: ChannelOrder) -> Array3<f32> {
    let resized = image.resize_exact(size, size, image::imageops::FilterType::Triangle);
    let rgb = resized.to_rgb8();
    let (width, height) = rgb.dimensions();

    Array3::from_shape_fn((height as usize, width as usize, 3), |(y, x, c)| {
        let pixel = rgb.get_pixel(x as u32, y as u32);
        let channel = match order {
            ChannelOrder::Rgb => c,
            ChannelOrder::Bgr => 2 - c,
        };
        pixel[channel] as f32 / 255.0
    })
}
