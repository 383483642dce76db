//! # 配置模块
//!
//! ## 设计思路
//!
//! 将所有“可调策略”集中到 `IconConfig`，保证运行时行为可观测、可调整、可测试。
//! 其中性能档位（quality / balanced / speed）作为高层语义，映射到缩放滤镜与 PNG 压缩级别。
//!
//! ## 实现思路
//!
//! - `Default` 提供高质量的生产配置（图标通常体积小，优先保真）。
//! - `IconPerformanceProfile` 负责档位字符串解析与反向输出。
//! - `apply_performance_profile` 将档位转换为具体参数。
//! - `infer_performance_profile` 用于从当前配置反推档位。

use image::codecs::png::CompressionType;
use image::imageops::FilterType;

use super::IconError;

/// 图标生成配置。
#[derive(Debug, Clone)]
pub struct IconConfig {
    /// 读取源文件时允许的最大体积（字节）。
    pub max_file_size: u64,
    /// 解码后的像素上限（`width * height`）。
    pub max_decoded_pixels: u64,
    /// 解码阶段允许的预计内存上限（按 RGBA 估算，字节）。
    pub max_decoded_bytes: u64,
    /// 缩放滤镜。
    pub resize_filter: FilterType,
    /// PNG 压缩级别。PNG 无损，级别只影响体积与耗时。
    pub png_compression: CompressionType,
}

impl Default for IconConfig {
    fn default() -> Self {
        Self {
            max_file_size: 50 * 1024 * 1024,
            max_decoded_pixels: 40_000_000,
            max_decoded_bytes: 160 * 1024 * 1024,
            resize_filter: FilterType::Lanczos3,
            png_compression: CompressionType::Best,
        }
    }
}

/// 图标生成性能档位。
///
/// - `Quality`：Lanczos3 + 最高压缩
/// - `Balanced`：CatmullRom + 默认压缩
/// - `Speed`：Triangle + 快速压缩
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconPerformanceProfile {
    Quality,
    Balanced,
    Speed,
}

impl IconPerformanceProfile {
    /// 从外部字符串解析档位。
    ///
    /// # 示例
    /// ```rust
    /// use pwa_icongen::icon::IconPerformanceProfile;
    ///
    /// let p = IconPerformanceProfile::parse(" Balanced ")?;
    /// assert_eq!(p.as_str(), "balanced");
    /// # Ok::<(), pwa_icongen::icon::IconError>(())
    /// ```
    pub fn parse(profile: &str) -> Result<Self, IconError> {
        match profile.trim().to_lowercase().as_str() {
            "quality" => Ok(Self::Quality),
            "balanced" => Ok(Self::Balanced),
            "speed" => Ok(Self::Speed),
            other => Err(IconError::InvalidFormat(format!(
                "未知性能档位：{}（可选：quality / balanced / speed）",
                other
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Quality => "quality",
            Self::Balanced => "balanced",
            Self::Speed => "speed",
        }
    }
}

impl IconConfig {
    /// 基于当前参数反推性能档位。
    pub fn infer_performance_profile(&self) -> IconPerformanceProfile {
        match (self.resize_filter, self.png_compression) {
            (FilterType::Lanczos3, CompressionType::Best) => IconPerformanceProfile::Quality,
            (FilterType::Nearest | FilterType::Triangle, _) | (_, CompressionType::Fast) => {
                IconPerformanceProfile::Speed
            }
            _ => IconPerformanceProfile::Balanced,
        }
    }

    /// 应用指定性能档位到实际参数。
    pub fn apply_performance_profile(&mut self, profile: IconPerformanceProfile) {
        match profile {
            IconPerformanceProfile::Quality => {
                self.resize_filter = FilterType::Lanczos3;
                self.png_compression = CompressionType::Best;
            }
            IconPerformanceProfile::Balanced => {
                self.resize_filter = FilterType::CatmullRom;
                self.png_compression = CompressionType::Default;
            }
            IconPerformanceProfile::Speed => {
                self.resize_filter = FilterType::Triangle;
                self.png_compression = CompressionType::Fast;
            }
        }
    }
}
