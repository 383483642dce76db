//! # 尺寸表
//!
//! 标准尺寸与 iOS 变体都是常量表；用户自定义尺寸串经过过滤、去重后使用，
//! 全部无效时回退到默认的十个尺寸。

use std::borrow::Cow;
use std::collections::BTreeSet;

use super::IconError;

/// 默认输出尺寸。
pub const DEFAULT_SIZES: [u32; 10] = [16, 32, 48, 64, 96, 128, 192, 256, 384, 512];

/// 自定义尺寸允许的最小值（含）。
pub const MIN_CUSTOM_SIZE: u32 = 8;
/// 自定义尺寸允许的最大值（含）。
pub const MAX_CUSTOM_SIZE: u32 = 2048;

/// 预览尺寸。
pub const PREVIEW_SIZES: [u32; 3] = [64, 192, 512];

/// 单个输出图标：边长与文件名。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconSpec {
    pub size: u32,
    pub name: Cow<'static, str>,
    /// 是否为 iOS 变体（受“iOS 仅白底”模式影响）。
    pub ios: bool,
}

impl IconSpec {
    /// 标准尺寸图标，文件名为 `logo{size}.png`。
    pub fn standard(size: u32) -> Self {
        Self {
            size,
            name: Cow::Owned(format!("logo{}.png", size)),
            ios: false,
        }
    }
}

/// iOS 变体：180 为 apple-touch-icon，192 重新渲染为 3d 版本（供 167/152 引用）。
pub const IOS_VARIANTS: [IconSpec; 2] = [
    IconSpec {
        size: 180,
        name: Cow::Borrowed("apple-touch-icon.png"),
        ios: true,
    },
    IconSpec {
        size: 192,
        name: Cow::Borrowed("apple-touch-icon-3d.png"),
        ios: true,
    },
];

/// 按尺寸列表展开完整的图标清单（标准尺寸在前，iOS 变体在后）。
pub fn icon_specs(sizes: &[u32]) -> Vec<IconSpec> {
    sizes
        .iter()
        .copied()
        .map(IconSpec::standard)
        .chain(IOS_VARIANTS.iter().cloned())
        .collect()
}

/// 严格解析自定义尺寸串。
///
/// 以逗号分隔；空白、非数字、越界（[8, 2048] 之外）的片段被丢弃，重复值合并，
/// 结果升序。过滤后为空时返回 `InvalidSizeList`。
pub fn parse_size_list(input: &str) -> Result<Vec<u32>, IconError> {
    let sizes: BTreeSet<u32> = input
        .split(',')
        .filter_map(|token| token.trim().parse::<u32>().ok())
        .filter(|size| (MIN_CUSTOM_SIZE..=MAX_CUSTOM_SIZE).contains(size))
        .collect();

    if sizes.is_empty() {
        return Err(IconError::InvalidSizeList(format!(
            "没有位于 {}~{} 之间的有效尺寸：{:?}",
            MIN_CUSTOM_SIZE, MAX_CUSTOM_SIZE, input
        )));
    }

    Ok(sizes.into_iter().collect())
}

/// 解析自定义尺寸串，失败时静默回退到 [`DEFAULT_SIZES`]。
///
/// # 示例
/// ```rust
/// use pwa_icongen::icon::{resolve_size_list, DEFAULT_SIZES};
///
/// assert_eq!(resolve_size_list("16, 32,, abc, 64"), vec![16, 32, 64]);
/// assert_eq!(resolve_size_list(""), DEFAULT_SIZES.to_vec());
/// ```
pub fn resolve_size_list(input: &str) -> Vec<u32> {
    if input.trim().is_empty() {
        return DEFAULT_SIZES.to_vec();
    }

    match parse_size_list(input) {
        Ok(sizes) => sizes,
        Err(err) => {
            log::warn!("⚠️ 自定义尺寸无效，回退默认尺寸：{}", err);
            DEFAULT_SIZES.to_vec()
        }
    }
}
