//! # 错误模型模块
//!
//! ## 设计思路
//!
//! 使用单一错误枚举承载图标生成链路中的所有错误来源，避免字符串拼接式错误处理。
//! 通过 `thiserror` 保持人类可读错误，同时让调用侧可按分支匹配。
//!
//! 任何一种错误都会中止整次生成，不产生部分归档。

/// 图标生成统一错误类型。
///
/// 该类型会在上层被上转为 `AppError`。
#[derive(Debug, thiserror::Error)]
pub enum IconError {
    /// 源图零尺寸或无法解码。
    #[error("无效图片：{0}")]
    InvalidImage(String),

    /// 尺寸不在允许范围内。
    ///
    /// `resolve_size_list` 会吞掉该错误并回退到默认尺寸表；
    /// 直接传入越界尺寸的生成或光栅化调用会返回它并中止整次生成。
    #[error("无效尺寸列表：{0}")]
    InvalidSizeList(String),

    #[error("编码失败：{0}")]
    EncodingFailure(String),

    #[error("归档失败：{0}")]
    ArchiveFailure(String),

    #[error("格式错误：{0}")]
    InvalidFormat(String),

    #[error("文件错误：{0}")]
    FileSystem(String),

    #[error("资源限制：{0}")]
    ResourceLimit(String),
}

impl IconError {
    /// 稳定的机器可读错误码，供 `--json` 输出使用。
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidImage(_) => "invalid_image",
            Self::InvalidSizeList(_) => "invalid_size_list",
            Self::EncodingFailure(_) => "encoding_failure",
            Self::ArchiveFailure(_) => "archive_failure",
            Self::InvalidFormat(_) => "invalid_format",
            Self::FileSystem(_) => "file_system",
            Self::ResourceLimit(_) => "resource_limit",
        }
    }

    /// 出错所在阶段。
    pub fn stage(&self) -> &'static str {
        match self {
            Self::FileSystem(_) | Self::InvalidFormat(_) => "load",
            Self::InvalidImage(_) | Self::ResourceLimit(_) => "decode",
            Self::InvalidSizeList(_) => "config",
            Self::EncodingFailure(_) => "render",
            Self::ArchiveFailure(_) => "finalize",
        }
    }
}

impl From<IconError> for String {
    fn from(error: IconError) -> Self {
        error.to_string()
    }
}
