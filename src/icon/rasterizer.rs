//! # 图标光栅化模块
//!
//! ## 设计思路
//!
//! 纯函数：给定源图、目标边长 N 与背景配置，输出恰好 N×N 的 RGBA 画布。
//! 只有几何摆放与“是否填充”是契约，缩放滤镜的逐像素结果不要求一致。
//!
//! ## 实现思路
//!
//! 1. `contain_fit` 计算等比缩放后的尺寸与居中偏移（四舍五入）
//! 2. 不透明背景先整幅填充；透明背景跳过填充
//! 3. 优先使用 `fast_image_resize` 卷积缩放，失败时回退 `image::imageops::resize`
//! 4. 把缩放结果贴到偏移处：不透明背景按 alpha 合成，透明背景直接拷贝

use fast_image_resize as fr;
use image::imageops::{self, FilterType};
use image::{ImageBuffer, Rgba, RgbaImage};

use super::sizes::MAX_CUSTOM_SIZE;
use super::{BackgroundConfig, IconError, SourceImage};

/// 光栅化结果：N×N RGBA 像素缓冲，仅存活到编码为 PNG 为止。
pub type RenderedIcon = RgbaImage;

/// contain 适配后的几何参数。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FitGeometry {
    pub width: u32,
    pub height: u32,
    pub offset_x: u32,
    pub offset_y: u32,
}

/// 计算 contain 适配（居中）几何参数。
///
/// ratio = min(N / w, N / h)；缩放尺寸与偏移均四舍五入，奇数余量不要求对称。
///
/// # 示例
/// ```rust
/// use pwa_icongen::icon::contain_fit;
///
/// let fit = contain_fit(200, 100, 64);
/// assert_eq!((fit.width, fit.height), (64, 32));
/// assert_eq!((fit.offset_x, fit.offset_y), (0, 16));
/// ```
pub fn contain_fit(source_width: u32, source_height: u32, size: u32) -> FitGeometry {
    let n = size as f64;
    let ratio = (n / source_width as f64).min(n / source_height as f64);

    let width = ((source_width as f64 * ratio).round() as u32).min(size);
    let height = ((source_height as f64 * ratio).round() as u32).min(size);

    FitGeometry {
        width,
        height,
        offset_x: ((size - width) as f64 / 2.0).round() as u32,
        offset_y: ((size - height) as f64 / 2.0).round() as u32,
    }
}

/// 把源图绘制为 N×N 图标。
///
/// 零尺寸源图返回 `InvalidImage`；`size` 不在 `1..=MAX_CUSTOM_SIZE` 内时返回 `InvalidSizeList`，
/// 不会尝试分配画布。
/// 缩放后某一边四舍五入为 0 时不绘制内容，画布保持背景。
pub fn rasterize(
    source: &SourceImage,
    size: u32,
    background: BackgroundConfig,
    filter: FilterType,
) -> Result<RenderedIcon, IconError> {
    if size == 0 || size > MAX_CUSTOM_SIZE {
        return Err(IconError::InvalidSizeList(format!(
            "图标尺寸必须位于 1~{} 之间：{}",
            MAX_CUSTOM_SIZE, size
        )));
    }

    let (source_width, source_height) = (source.width(), source.height());
    if source_width == 0 || source_height == 0 {
        return Err(IconError::InvalidImage(format!(
            "源图尺寸为零：{}x{}",
            source_width, source_height
        )));
    }

    let mut canvas = match background.fill() {
        Some(color) => RgbaImage::from_pixel(size, size, color),
        None => RgbaImage::new(size, size),
    };

    let fit = contain_fit(source_width, source_height, size);
    if fit.width == 0 || fit.height == 0 {
        return Ok(canvas);
    }

    let scaled = resize_rgba(source.pixels(), fit.width, fit.height, filter);

    if background.is_transparent() {
        imageops::replace(&mut canvas, &scaled, fit.offset_x as i64, fit.offset_y as i64);
    } else {
        imageops::overlay(&mut canvas, &scaled, fit.offset_x as i64, fit.offset_y as i64);
    }

    Ok(canvas)
}

fn resize_rgba(src: &RgbaImage, target_width: u32, target_height: u32, filter: FilterType) -> RgbaImage {
    if src.dimensions() == (target_width, target_height) {
        return src.clone();
    }

    match resize_with_fast_image_resize(src, target_width, target_height, filter) {
        Ok(resized) => resized,
        Err(err) => {
            log::warn!("⚠️ fast_image_resize 缩放失败，回退 image::imageops::resize：{}", err);
            imageops::resize(src, target_width, target_height, filter)
        }
    }
}

fn resize_with_fast_image_resize(
    src: &RgbaImage,
    target_width: u32,
    target_height: u32,
    filter: FilterType,
) -> Result<RgbaImage, IconError> {
    let (src_width, src_height) = src.dimensions();

    let src_image = fr::images::ImageRef::new(src_width, src_height, src.as_raw(), fr::PixelType::U8x4)
        .map_err(|e| IconError::EncodingFailure(format!("构建源图像缓冲失败：{}", e)))?;

    let mut dst_image = fr::images::Image::new(target_width, target_height, fr::PixelType::U8x4);

    let mut resizer = fr::Resizer::new();
    let options = fr::ResizeOptions::new().resize_alg(fr::ResizeAlg::Convolution(to_fast_filter(filter)));

    resizer
        .resize(&src_image, &mut dst_image, Some(&options))
        .map_err(|e| IconError::EncodingFailure(format!("fast_image_resize 执行失败：{}", e)))?;

    ImageBuffer::<Rgba<u8>, Vec<u8>>::from_raw(target_width, target_height, dst_image.into_vec())
        .ok_or_else(|| IconError::EncodingFailure("fast_image_resize 输出缓冲长度异常".to_string()))
}

fn to_fast_filter(filter: FilterType) -> fr::FilterType {
    match filter {
        FilterType::Nearest => fr::FilterType::Box,
        FilterType::Triangle => fr::FilterType::Bilinear,
        FilterType::CatmullRom => fr::FilterType::CatmullRom,
        FilterType::Gaussian => fr::FilterType::Mitchell,
        FilterType::Lanczos3 => fr::FilterType::Lanczos3,
    }
}
