//! # 图标生成模块（icon）
//!
//! ## 设计思路
//!
//! 该模块将“来源加载 → 解码 → 光栅化 → PNG 编码 → 打包”按职责拆分为多个子模块。
//!
//! - `handler`：编排整条处理流水线，持有可切换的配置
//! - `loader`：文件 / Base64 / 内存字节加载与签名校验
//! - `pipeline`：解码与资源上限
//! - `rasterizer`：contain 适配、背景填充、缩放绘制（纯函数）
//! - `packager`：渲染计划、并发执行、归档组装
//! - `archive` / `encoder` / `favicon` / `preview`：输出相关
//! - `config/error/source/background/sizes/snippets`：配置、错误、数据模型与常量表
//!
//! ## 调用链
//!
//! ```text
//! main.rs（CLI 参数 + 持久化设置）
//!    ↓
//! handler.rs（配置快照 + 阶段耗时日志）
//!    ├─ loader.rs（来源加载 + 体积 / 签名校验）
//!    ├─ pipeline.rs（解码 + 像素限制）
//!    └─ packager.rs（渲染计划 → JoinSet 并发渲染 → 按计划顺序写入归档）
//!         ├─ rasterizer.rs + encoder.rs
//!         ├─ favicon.rs（可选）
//!         └─ archive.rs（zip 收尾）
//! ```

mod archive;
mod background;
mod config;
mod encoder;
mod error;
mod favicon;
mod handler;
mod loader;
mod packager;
mod pipeline;
mod preview;
mod rasterizer;
mod sizes;
mod snippets;
mod source;

pub use archive::{BATCH_ARCHIVE_NAME, GeneratedArchive, OutputArchive, SINGLE_ARCHIVE_NAME};
pub use background::BackgroundConfig;
pub use config::{IconConfig, IconPerformanceProfile};
pub use encoder::encode_png;
pub use error::IconError;
pub use favicon::{FAVICON_NAME, FAVICON_SOURCES, pack_favicon, pack_favicon_dir};
pub use handler::IconHandler;
pub use packager::{FALLBACK_NAMESPACE, PackageOptions, archive_name, namespace_for};
pub use preview::PreviewIcon;
pub use rasterizer::{FitGeometry, RenderedIcon, contain_fit, rasterize};
pub use sizes::{
    DEFAULT_SIZES, IOS_VARIANTS, IconSpec, MAX_CUSTOM_SIZE, MIN_CUSTOM_SIZE, PREVIEW_SIZES,
    icon_specs, parse_size_list, resolve_size_list,
};
pub use snippets::{HEAD_SNIPPET, HEAD_SNIPPET_NAME, MANIFEST_SNIPPET, MANIFEST_SNIPPET_NAME};
pub use source::{ImageSource, SourceImage};
