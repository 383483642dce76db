//! # favicon 打包
//!
//! 把 16/32/48 三个 PNG 合成为一个多分辨率 `favicon.ico`。
//! 每一帧保持 PNG 编码直接嵌入 ICO。

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::ExtendedColorType;
use image::codecs::ico::{IcoEncoder, IcoFrame};

use super::IconError;

/// 输出文件名。
pub const FAVICON_NAME: &str = "favicon.ico";
/// ICO 中包含的帧尺寸。
pub const FAVICON_FRAME_SIZES: [u32; 3] = [16, 32, 48];
/// 目录模式下读取的三个输入文件。
pub const FAVICON_SOURCES: [&str; 3] = ["logo16.png", "logo32.png", "logo48.png"];

const MAX_ICO_FRAME_SIZE: u32 = 256;

/// 将若干 PNG 帧打包为 ICO 字节。每帧须为 1~256 像素的正方形。
pub fn pack_favicon(frames: &[Vec<u8>]) -> Result<Vec<u8>, IconError> {
    if frames.is_empty() {
        return Err(IconError::EncodingFailure("favicon 至少需要一帧".to_string()));
    }

    let ico_frames = frames
        .iter()
        .map(|png| {
            let (width, height) = image::ImageReader::new(Cursor::new(png))
                .with_guessed_format()
                .map_err(|e| IconError::InvalidImage(format!("favicon 帧无法识别：{}", e)))?
                .into_dimensions()
                .map_err(|e| IconError::InvalidImage(format!("favicon 帧无法读取尺寸：{}", e)))?;

            if width != height || width == 0 || width > MAX_ICO_FRAME_SIZE {
                return Err(IconError::InvalidImage(format!(
                    "favicon 帧必须是 1~{} 像素的正方形，实际 {}x{}",
                    MAX_ICO_FRAME_SIZE, width, height
                )));
            }

            IcoFrame::with_encoded(png.as_slice(), width, height, ExtendedColorType::Rgba8)
                .map_err(|e| IconError::EncodingFailure(format!("构建 ICO 帧失败：{}", e)))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut buffer = Vec::new();
    IcoEncoder::new(&mut buffer)
        .encode_images(&ico_frames)
        .map_err(|e| IconError::EncodingFailure(format!("ICO 编码失败：{}", e)))?;

    Ok(buffer)
}

/// 读取目录中的 `logo16.png`、`logo32.png`、`logo48.png`，写出 `favicon.ico`。
pub fn pack_favicon_dir(dir: &Path) -> Result<PathBuf, IconError> {
    let frames = FAVICON_SOURCES
        .iter()
        .map(|name| {
            let path = dir.join(name);
            fs::read(&path).map_err(|e| IconError::FileSystem(format!("读取 {} 失败：{}", path.display(), e)))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let ico = pack_favicon(&frames)?;
    let out = dir.join(FAVICON_NAME);
    fs::write(&out, &ico).map_err(|e| IconError::FileSystem(format!("写入 {} 失败：{}", out.display(), e)))?;

    log::info!("✅ favicon.ico 已生成：{}（{} bytes）", out.display(), ico.len());
    Ok(out)
}
