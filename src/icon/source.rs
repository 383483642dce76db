//! # 数据源与中间模型
//!
//! ## 设计思路
//!
//! 将“外部输入类型”和“流水线中间结果”解耦：
//! - `ImageSource` 表示外部来源语义（文件选择 / 拖放 / 粘贴）
//! - `RawImageData` 表示已加载但未解码的字节
//! - `SourceImage` 表示已解码、只读的源图

use std::path::Path;
use std::sync::Arc;

use image::{DynamicImage, GenericImageView, RgbaImage};

/// 图片输入来源。
#[derive(Debug, Clone)]
pub enum ImageSource {
    /// 本地文件路径来源。
    FilePath(String),
    /// Base64（支持 Data URL 与纯 Base64 字符串），通常来自粘贴。
    Base64(String),
    /// 已在内存中的字节（拖放等场景），附带原始文件名。
    Bytes { name: Option<String>, bytes: Vec<u8> },
}

impl ImageSource {
    /// 来源携带的文件名（若有）。
    pub fn file_name(&self) -> Option<String> {
        match self {
            Self::FilePath(path) => Path::new(path)
                .file_name()
                .map(|name| name.to_string_lossy().to_string()),
            Self::Base64(_) => None,
            Self::Bytes { name, .. } => name.clone(),
        }
    }
}

/// 加载阶段输出：原始字节与来源标识。
pub(crate) struct RawImageData {
    pub(crate) bytes: Vec<u8>,
    /// 来源提示（用于日志与诊断）。
    pub(crate) source_hint: &'static str,
    pub(crate) file_name: Option<String>,
}

/// 解码后的源图。
///
/// 解码时统一转换为 RGBA8，之后不可变；像素通过 `Arc` 共享给并发的渲染任务。
#[derive(Debug, Clone)]
pub struct SourceImage {
    pixels: Arc<RgbaImage>,
    file_name: Option<String>,
}

impl SourceImage {
    /// 从已解码图像构建源图。调用方负责保证宽高非零，见 [`Self::try_new`]。
    pub(crate) fn from_decoded(image: DynamicImage, file_name: Option<String>) -> Self {
        Self {
            pixels: Arc::new(image.into_rgba8()),
            file_name,
        }
    }

    /// 从已解码图像构建源图，拒绝零尺寸。
    pub fn try_new(
        image: DynamicImage,
        file_name: Option<String>,
    ) -> Result<Self, super::IconError> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(super::IconError::InvalidImage(format!(
                "源图尺寸为零：{}x{}",
                width, height
            )));
        }
        Ok(Self::from_decoded(image, file_name))
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    /// 去掉扩展名的文件名，用作批量模式下的归档命名空间。
    pub fn base_name(&self) -> Option<String> {
        let name = self.file_name.as_deref()?;
        let stem = Path::new(name).file_stem()?.to_string_lossy().to_string();
        if stem.is_empty() { None } else { Some(stem) }
    }
}
