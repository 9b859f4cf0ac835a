use image::imageops::FilterType;
use image::{DynamicImage, RgbImage};
use ndarray::Array4;

pub const INPUT_SIZE: u32 = 224;
pub const INPUT_SHAPE: [usize; 4] = [1, INPUT_SIZE as usize, INPUT_SIZE as usize, 3];

/// Crops to fill a 224x224 square (centred, aspect preserved) and maps each
/// channel byte to `byte / 127.5 - 1`. The result is a single-item NHWC batch.
pub fn preprocess(image: &RgbImage) -> Array4<f32> {
    let fitted = if image.dimensions() == (INPUT_SIZE, INPUT_SIZE) {
        image.clone()
    } else {
        DynamicImage::ImageRgb8(image.clone())
            .resize_to_fill(INPUT_SIZE, INPUT_SIZE, FilterType::Lanczos3)
            .into_rgb8()
    };

    Array4::from_shape_fn(INPUT_SHAPE, |(_, y, x, c)| {
        let value = fitted.get_pixel(x as u32, y as u32)[c];
        value as f32 / 127.5 - 1.0
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn gradient(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
        })
    }

    #[test]
    fn output_shape_is_fixed_for_any_resolution() {
        for (w, h) in [(1, 1), (224, 224), (640, 480), (100, 900), (3000, 17)] {
            let tensor = preprocess(&gradient(w, h));
            assert_eq!(tensor.shape(), &INPUT_SHAPE[..], "input {}x{}", w, h);
            assert!(
                tensor.iter().all(|v| (-1.0..=1.0).contains(v)),
                "input {}x{} produced out-of-range values",
                w,
                h
            );
        }
    }

    #[test]
    fn black_image_maps_to_minus_one() {
        let tensor = preprocess(&RgbImage::new(224, 224));
        assert!(tensor.iter().all(|&v| v == -1.0));
    }

    #[test]
    fn scaling_matches_formula() {
        let image = RgbImage::from_pixel(224, 224, Rgb([0, 51, 255]));
        let tensor = preprocess(&image);
        assert_eq!(tensor[[0, 10, 20, 0]], -1.0);
        assert!((tensor[[0, 10, 20, 1]] - (51.0 / 127.5 - 1.0)).abs() < 1e-6);
        assert_eq!(tensor[[0, 10, 20, 2]], 1.0);
    }

    #[test]
    fn layout_is_height_then_width() {
        let mut image = RgbImage::new(224, 224);
        image.put_pixel(5, 0, Rgb([255, 255, 255]));
        let tensor = preprocess(&image);
        assert_eq!(tensor[[0, 0, 5, 0]], 1.0);
        assert_eq!(tensor[[0, 5, 0, 0]], -1.0);
    }

    #[test]
    fn wide_images_are_cropped_not_letterboxed() {
        // A white band in the middle third of a 3:1 image fills the whole
        // square after a centre crop; letterboxing would leave black edges.
        let image = RgbImage::from_fn(672, 224, |x, _| {
            if (224..448).contains(&x) {
                Rgb([255, 255, 255])
            } else {
                Rgb([0, 0, 0])
            }
        });
        let tensor = preprocess(&image);
        assert!(tensor[[0, 112, 112, 0]] > 0.9);
        assert!(tensor[[0, 0, 112, 1]] > 0.9);
    }
}
