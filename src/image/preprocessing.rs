use image::{imageops::FilterType, DynamicImage};
use ndarray::Array4;

pub struct ImagePreprocessor;

impl ImagePreprocessor {
    /// 归一化为模型输入张量：RGB三通道，直接拉伸到目标分辨率，
    /// 像素从[0,255]缩放到[0,1]，前面加一个batch维度。
    /// 布局为NHWC (1, H, W, 3)，与训练时的数据生成器一致。
    pub fn to_input_tensor(image: &DynamicImage, target: (u32, u32)) -> Array4<f32> {
        let (width, height) = target;

        // 非保持宽高比的拉伸，alpha和灰度统一折叠成RGB
        let resized = image
            .resize_exact(width, height, FilterType::Triangle)
            .to_rgb8();

        let mut tensor = Array4::<f32>::zeros((1, height as usize, width as usize, 3));

        for (x, y, pixel) in resized.enumerate_pixels() {
            for c in 0..3 {
                tensor[[0, y as usize, x as usize, c]] = pixel[c] as f32 / 255.0;
            }
        }

        tensor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, Rgb, RgbImage, Rgba, RgbaImage};

    fn assert_normalized(tensor: &Array4<f32>, target: (usize, usize)) {
        assert_eq!(tensor.shape(), &[1, target.1, target.0, 3]);
        for &value in tensor.iter() {
            assert!((0.0..=1.0).contains(&value), "value {} out of range", value);
        }
    }

    #[test]
    fn rgb_image_is_stretched_to_target() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(640, 480, Rgb([255, 128, 0])));
        let tensor = ImagePreprocessor::to_input_tensor(&img, (224, 224));
        assert_normalized(&tensor, (224, 224));
        // 常量图像在缩放后仍是常量
        assert!((tensor[[0, 0, 0, 0]] - 1.0).abs() < 1e-6);
        assert!((tensor[[0, 100, 100, 2]] - 0.0).abs() < 1e-6);
    }

    #[test]
    fn alpha_channel_is_collapsed() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(32, 48, Rgba([10, 20, 30, 128])));
        let tensor = ImagePreprocessor::to_input_tensor(&img, (150, 150));
        assert_normalized(&tensor, (150, 150));
    }

    #[test]
    fn grayscale_is_expanded_to_three_channels() {
        let img = DynamicImage::ImageLuma8(GrayImage::from_pixel(300, 100, Luma([200])));
        let tensor = ImagePreprocessor::to_input_tensor(&img, (64, 64));
        assert_normalized(&tensor, (64, 64));
        // 三个通道得到相同的灰度值
        let r = tensor[[0, 10, 10, 0]];
        let g = tensor[[0, 10, 10, 1]];
        let b = tensor[[0, 10, 10, 2]];
        assert!((r - g).abs() < 1e-6);
        assert!((g - b).abs() < 1e-6);
    }

    #[test]
    fn tiny_image_is_upscaled() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(1, 1, Rgb([0, 0, 255])));
        let tensor = ImagePreprocessor::to_input_tensor(&img, (224, 224));
        assert_normalized(&tensor, (224, 224));
        assert!((tensor[[0, 50, 50, 2]] - 1.0).abs() < 1e-6);
    }
}
