//! ImageNet-style preprocessing for the image classifier.
//!
//! Resize so the shorter side is 256, center-crop 224x224, scale to [0, 1]
//! and normalize per channel. The output tensor is NCHW `[1, 3, 224, 224]`.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::imageops::{self, FilterType};
use image::RgbImage;

pub const RESIZE_SHORTER_SIDE: u32 = 256;
pub const CROP_SIZE: u32 = 224;
pub const IMAGENET_MEAN: [f32; 3] = [0.485, 0.456, 0.406];
pub const IMAGENET_STD: [f32; 3] = [0.229, 0.224, 0.225];

/// Dense f32 tensor with its shape.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageTensor {
    pub shape: [usize; 4],
    pub data: Vec<f32>,
}

impl ImageTensor {
    /// Base64 of the data as little-endian f32, the transport format of the
    /// classify endpoint.
    pub fn to_le_base64(&self) -> String {
        let mut bytes = Vec::with_capacity(self.data.len() * 4);
        for value in &self.data {
            bytes.extend_from_slice(&value.to_le_bytes());
        }
        STANDARD.encode(bytes)
    }
}

/// Resize keeping aspect ratio so the shorter side equals `target`.
pub fn resize_shorter_side(img: &RgbImage, target: u32) -> RgbImage {
    let (w, h) = img.dimensions();
    if w == 0 || h == 0 {
        return img.clone();
    }
    let (new_w, new_h) = if w <= h {
        (target, ((target as u64 * h as u64) / w as u64) as u32)
    } else {
        (((target as u64 * w as u64) / h as u64) as u32, target)
    };
    if (new_w, new_h) == (w, h) {
        return img.clone();
    }
    imageops::resize(img, new_w.max(1), new_h.max(1), FilterType::Triangle)
}

/// Crop a `size` x `size` square from the center.
///
/// Images smaller than the crop are resized up first.
pub fn center_crop(img: &RgbImage, size: u32) -> RgbImage {
    let (w, h) = img.dimensions();
    if w < size || h < size {
        let upscaled = resize_shorter_side(img, size);
        return center_crop(&upscaled, size);
    }
    let left = ((w - size) as f32 / 2.0).round() as u32;
    let top = ((h - size) as f32 / 2.0).round() as u32;
    imageops::crop_imm(img, left, top, size, size).to_image()
}

/// Full classifier preprocessing.
pub fn imagenet_tensor(img: &RgbImage) -> ImageTensor {
    let resized = resize_shorter_side(img, RESIZE_SHORTER_SIDE);
    let cropped = center_crop(&resized, CROP_SIZE);
    to_normalized_tensor(&cropped)
}

fn to_normalized_tensor(img: &RgbImage) -> ImageTensor {
    let (w, h) = img.dimensions();
    let plane = (w * h) as usize;
    let mut data = vec![0.0f32; plane * 3];

    for (x, y, pixel) in img.enumerate_pixels() {
        let offset = (y * w + x) as usize;
        for c in 0..3 {
            let value = pixel.0[c] as f32 / 255.0;
            data[c * plane + offset] = (value - IMAGENET_MEAN[c]) / IMAGENET_STD[c];
        }
    }

    ImageTensor {
        shape: [1, 3, h as usize, w as usize],
        data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_resize_shorter_side() {
        let img = RgbImage::new(300, 600);
        let resized = resize_shorter_side(&img, 256);
        assert_eq!(resized.dimensions(), (256, 512));

        let img = RgbImage::new(640, 480);
        let resized = resize_shorter_side(&img, 256);
        assert_eq!(resized.dimensions(), (341, 256));
    }

    #[test]
    fn test_center_crop_small_image() {
        let img = RgbImage::new(50, 80);
        let cropped = center_crop(&img, 224);
        assert_eq!(cropped.dimensions(), (224, 224));
    }

    #[test]
    fn test_center_crop_takes_middle() {
        let mut img = RgbImage::from_pixel(5, 5, Rgb([0, 0, 0]));
        img.put_pixel(2, 2, Rgb([255, 255, 255]));
        let cropped = center_crop(&img, 1);
        assert_eq!(cropped.get_pixel(0, 0).0, [255, 255, 255]);
    }

    #[test]
    fn test_tensor_shape_and_normalization() {
        let img = RgbImage::from_pixel(400, 300, Rgb([255, 0, 0]));
        let tensor = imagenet_tensor(&img);
        assert_eq!(tensor.shape, [1, 3, 224, 224]);
        assert_eq!(tensor.data.len(), 3 * 224 * 224);

        let plane = 224 * 224;
        let red = (1.0 - IMAGENET_MEAN[0]) / IMAGENET_STD[0];
        let green = (0.0 - IMAGENET_MEAN[1]) / IMAGENET_STD[1];
        assert!((tensor.data[0] - red).abs() < 1e-4);
        assert!((tensor.data[plane] - green).abs() < 1e-4);
    }

    #[test]
    fn test_le_base64_length() {
        let tensor = ImageTensor { shape: [1, 1, 1, 2], data: vec![1.0, -2.5] };
        let decoded = STANDARD.decode(tensor.to_le_base64()).unwrap();
        assert_eq!(decoded.len(), 8);
        assert_eq!(f32::from_le_bytes(decoded[4..8].try_into().unwrap()), -2.5);
    }
}
