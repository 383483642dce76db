//! # 解码流水线模块
//!
//! ## 设计思路
//!
//! 将“字节 → 源图”的过程集中管理，并在关键节点增加资源上限控制。
//! 优先做尺寸检查，再进行完整解码，降低恶意输入触发高内存开销的风险。
//!
//! ## 实现思路
//!
//! 1. 读取 header 尺寸
//! 2. 按像素 / 内存上限快速拒绝，零尺寸直接判为无效图片
//! 3. 完整解码
//! 4. 转为 RGBA8 的只读 `SourceImage`

use std::io::Cursor;

use image::GenericImageView;

use super::source::RawImageData;
use super::{IconConfig, IconError, IconHandler, SourceImage};

impl IconHandler {
    /// 将原始字节解码为源图。
    pub(super) fn decode_source(
        &self,
        raw: RawImageData,
        config: &IconConfig,
    ) -> Result<SourceImage, IconError> {
        let (header_width, header_height) = Self::inspect_dimensions_from_memory(&raw.bytes)?;
        Self::validate_dimensions(config, header_width, header_height)?;

        let decoded = image::load_from_memory(&raw.bytes)
            .map_err(|e| IconError::InvalidImage(format!("图片解码失败：{}", e)))?;

        let (width, height) = decoded.dimensions();
        Self::validate_dimensions(config, width, height)?;

        log::info!(
            "✅ 图片解码成功 - 来源: {} 名称: {} 尺寸: {}x{}",
            raw.source_hint,
            raw.file_name.as_deref().unwrap_or("<未命名>"),
            width,
            height
        );

        SourceImage::try_new(decoded, raw.file_name)
    }

    /// 仅通过内存中的图片头信息读取宽高。
    fn inspect_dimensions_from_memory(bytes: &[u8]) -> Result<(u32, u32), IconError> {
        let reader = image::ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| IconError::InvalidImage(format!("无法识别图片格式：{}", e)))?;

        reader
            .into_dimensions()
            .map_err(|e| IconError::InvalidImage(format!("无法读取图片尺寸：{}", e)))
    }

    fn validate_dimensions(config: &IconConfig, width: u32, height: u32) -> Result<(), IconError> {
        if width == 0 || height == 0 {
            return Err(IconError::InvalidImage(format!("源图尺寸为零：{}x{}", width, height)));
        }

        let pixels = (width as u64)
            .checked_mul(height as u64)
            .ok_or_else(|| IconError::ResourceLimit("图片像素数溢出".to_string()))?;

        if pixels > config.max_decoded_pixels {
            return Err(IconError::ResourceLimit(format!(
                "图片像素过大：{} 像素（限制：{} 像素）",
                pixels, config.max_decoded_pixels
            )));
        }

        let estimated = pixels
            .checked_mul(4)
            .ok_or_else(|| IconError::ResourceLimit("图片解码内存估算溢出".to_string()))?;

        if estimated > config.max_decoded_bytes {
            return Err(IconError::ResourceLimit(format!(
                "图片解码预计内存过大：{:.2} MB（限制：{:.2} MB）",
                estimated as f64 / 1024.0 / 1024.0,
                config.max_decoded_bytes as f64 / 1024.0 / 1024.0
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageBuffer, ImageFormat, Rgba};

    fn create_png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = ImageBuffer::from_fn(width, height, |x, y| {
            Rgba([(x % 255) as u8, (y % 255) as u8, ((x + y) % 255) as u8, 255])
        });

        let mut cursor = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(img)
            .write_to(&mut cursor, ImageFormat::Png)
            .expect("failed to encode test image");
        cursor.into_inner()
    }

    fn raw(bytes: Vec<u8>) -> RawImageData {
        RawImageData {
            bytes,
            source_hint: "test",
            file_name: Some("test.png".into()),
        }
    }

    #[test]
    fn decodes_png_into_source_image() {
        let handler = IconHandler::new(IconConfig::default());
        let source = handler
            .decode_source(raw(create_png_bytes(300, 120)), &IconConfig::default())
            .expect("decode");
        assert_eq!((source.width(), source.height()), (300, 120));
        assert_eq!(source.base_name().as_deref(), Some("test"));
    }

    #[test]
    fn rejects_too_many_pixels() {
        let mut config = IconConfig::default();
        config.max_decoded_pixels = 10_000;
        let handler = IconHandler::new(config.clone());

        let result = handler.decode_source(raw(create_png_bytes(200, 200)), &config);
        assert!(matches!(result, Err(IconError::ResourceLimit(_))));
    }

    #[test]
    fn rejects_truncated_image() {
        let handler = IconHandler::new(IconConfig::default());
        let mut bytes = create_png_bytes(64, 64);
        bytes.truncate(40);

        let result = handler.decode_source(raw(bytes), &IconConfig::default());
        assert!(matches!(result, Err(IconError::InvalidImage(_))));
    }
}
