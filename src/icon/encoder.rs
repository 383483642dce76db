//! PNG 编码。PNG 为无损格式，压缩级别由性能档位决定。

use image::codecs::png::{CompressionType, FilterType as PngFilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder, RgbaImage};

use super::IconError;

/// 将 RGBA 画布编码为 PNG 字节。
pub fn encode_png(icon: &RgbaImage, compression: CompressionType) -> Result<Vec<u8>, IconError> {
    let (width, height) = icon.dimensions();
    let mut buffer = Vec::new();

    PngEncoder::new_with_quality(&mut buffer, compression, PngFilterType::Adaptive)
        .write_image(icon.as_raw(), width, height, ExtendedColorType::Rgba8)
        .map_err(|e| IconError::EncodingFailure(format!("PNG 编码失败（{}x{}）：{}", width, height, e)))?;

    Ok(buffer)
}
