//! 预览：以 64/192/512 渲染并输出 PNG Data URL，供界面或命令行展示。

use base64::{Engine as _, engine::general_purpose};
use serde::Serialize;

use super::sizes::PREVIEW_SIZES;
use super::{BackgroundConfig, IconError, IconHandler, SourceImage, encode_png, rasterize};

/// 单张预览。
#[derive(Debug, Clone, Serialize)]
pub struct PreviewIcon {
    pub size: u32,
    /// `data:image/png;base64,...`
    pub data_url: String,
}

impl IconHandler {
    pub fn render_previews(
        &self,
        source: &SourceImage,
        background: BackgroundConfig,
    ) -> Result<Vec<PreviewIcon>, IconError> {
        let config = self.config_snapshot()?;

        PREVIEW_SIZES
            .iter()
            .map(|&size| {
                let icon = rasterize(source, size, background, config.resize_filter)?;
                let png = encode_png(&icon, config.png_compression)?;
                Ok(PreviewIcon {
                    size,
                    data_url: format!("data:image/png;base64,{}", general_purpose::STANDARD.encode(png)),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::icon::{IconConfig, ImageSource};
    use image::{DynamicImage, Rgba, RgbaImage};

    #[test]
    fn previews_are_decodable_data_urls() {
        let handler = IconHandler::new(IconConfig::default());
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(30, 60, Rgba([200, 100, 50, 255])));
        let source = SourceImage::try_new(img, None).expect("source");

        let previews = handler
            .render_previews(&source, BackgroundConfig::WHITE)
            .expect("previews");
        assert_eq!(previews.iter().map(|p| p.size).collect::<Vec<_>>(), vec![64, 192, 512]);

        // Data URL 可以作为 Base64 来源重新加载
        let reloaded = handler
            .load_source(ImageSource::Base64(previews[0].data_url.clone()))
            .expect("reload preview");
        assert_eq!((reloaded.width(), reloaded.height()), (64, 64));
    }
}
