//! # 批量打包模块
//!
//! ## 设计思路
//!
//! 先根据源图列表与选项生成“渲染计划”（每条记录：输出路径 + 尺寸 + 背景），
//! 再执行计划：异步版本把每个渲染任务丢进 `JoinSet`（`spawn_blocking`），
//! 同步版本顺序执行。两者都按计划顺序写入归档，
//! 因此同名源图的命名空间冲突总是“按输入顺序后写覆盖”。
//!
//! ## 实现思路
//!
//! - 单图：输出写在归档根目录；多图：写在 `{去扩展名的文件名}/` 下，缺名时用 `image`
//! - iOS 变体在“iOS 仅白底”模式下强制白底，其余图标使用通用背景
//! - 两段模板每次生成只写一次，位于归档根目录
//! - 任一渲染失败立即中止整次生成

use std::path::Path;
use std::time::Instant;

use image::codecs::png::CompressionType;
use image::imageops::FilterType;
use tokio::task::JoinSet;

use super::archive::{BATCH_ARCHIVE_NAME, GeneratedArchive, OutputArchive, SINGLE_ARCHIVE_NAME};
use super::favicon::{FAVICON_FRAME_SIZES, FAVICON_NAME, pack_favicon};
use super::sizes::{DEFAULT_SIZES, MAX_CUSTOM_SIZE, MIN_CUSTOM_SIZE, icon_specs};
use super::snippets::SNIPPETS;
use super::{BackgroundConfig, IconConfig, IconError, IconHandler, SourceImage, encode_png, rasterize};

/// 批量模式下源图缺少文件名时使用的命名空间。
pub const FALLBACK_NAMESPACE: &str = "image";

/// 一次生成的选项。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageOptions {
    /// 通用背景。
    pub background: BackgroundConfig,
    /// 开启后 iOS 变体（180 / 192-3d）强制使用纯白背景。
    pub ios_white_only: bool,
    /// 标准尺寸列表；为空时使用默认十个尺寸。
    /// 每个尺寸都必须位于 [8, 2048]，否则整次生成以 `InvalidSizeList` 中止。
    pub sizes: Vec<u32>,
    /// 是否写入 manifest / head 模板。
    pub include_snippets: bool,
    /// 是否额外写入由 16/32/48 组成的 `favicon.ico`。
    pub include_favicon: bool,
}

impl Default for PackageOptions {
    fn default() -> Self {
        Self {
            background: BackgroundConfig::Transparent,
            ios_white_only: false,
            sizes: DEFAULT_SIZES.to_vec(),
            include_snippets: true,
            include_favicon: false,
        }
    }
}

impl PackageOptions {
    /// iOS 变体实际使用的背景。
    pub fn ios_background(&self) -> BackgroundConfig {
        if self.ios_white_only {
            BackgroundConfig::WHITE
        } else {
            self.background
        }
    }

    fn effective_sizes(&self) -> &[u32] {
        if self.sizes.is_empty() { &DEFAULT_SIZES[..] } else { &self.sizes[..] }
    }

    fn validate_sizes(&self) -> Result<(), IconError> {
        let out_of_range: Vec<u32> = self
            .effective_sizes()
            .iter()
            .copied()
            .filter(|size| !(MIN_CUSTOM_SIZE..=MAX_CUSTOM_SIZE).contains(size))
            .collect();

        if out_of_range.is_empty() {
            Ok(())
        } else {
            Err(IconError::InvalidSizeList(format!(
                "尺寸必须位于 {}~{} 之间：{:?}",
                MIN_CUSTOM_SIZE, MAX_CUSTOM_SIZE, out_of_range
            )))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum JobKind {
    /// 直接写入归档的图标。
    Entry,
    /// favicon.ico 的一帧，不单独写入归档。
    FaviconFrame,
}

#[derive(Debug, Clone)]
pub(crate) struct RenderJob {
    pub(crate) path: String,
    pub(crate) image_index: usize,
    pub(crate) size: u32,
    pub(crate) background: BackgroundConfig,
    pub(crate) kind: JobKind,
}

/// 源图在归档中的命名空间；单图模式返回 `None`（写在根目录）。
pub fn namespace_for(image: &SourceImage, image_count: usize) -> Option<String> {
    if image_count <= 1 {
        return None;
    }
    Some(image.base_name().unwrap_or_else(|| FALLBACK_NAMESPACE.to_string()))
}

/// 根据源图数量决定归档文件名。
pub fn archive_name(image_count: usize) -> &'static str {
    if image_count > 1 { BATCH_ARCHIVE_NAME } else { SINGLE_ARCHIVE_NAME }
}

fn join_path(namespace: Option<&str>, name: &str) -> String {
    match namespace {
        Some(ns) => format!("{}/{}", ns, name),
        None => name.to_string(),
    }
}

pub(crate) fn plan_render_jobs(
    images: &[SourceImage],
    options: &PackageOptions,
) -> Result<Vec<RenderJob>, IconError> {
    if images.is_empty() {
        return Err(IconError::InvalidImage("没有可处理的源图".to_string()));
    }
    options.validate_sizes()?;

    let specs = icon_specs(options.effective_sizes());
    let mut jobs = Vec::new();

    for (image_index, image) in images.iter().enumerate() {
        let namespace = namespace_for(image, images.len());

        for spec in &specs {
            let background = if spec.ios {
                options.ios_background()
            } else {
                options.background
            };
            jobs.push(RenderJob {
                path: join_path(namespace.as_deref(), &spec.name),
                image_index,
                size: spec.size,
                background,
                kind: JobKind::Entry,
            });
        }

        if options.include_favicon {
            for size in FAVICON_FRAME_SIZES {
                jobs.push(RenderJob {
                    path: join_path(namespace.as_deref(), FAVICON_NAME),
                    image_index,
                    size,
                    background: options.background,
                    kind: JobKind::FaviconFrame,
                });
            }
        }
    }

    Ok(jobs)
}

fn render_png(
    image: &SourceImage,
    size: u32,
    background: BackgroundConfig,
    filter: FilterType,
    compression: CompressionType,
) -> Result<Vec<u8>, IconError> {
    let icon = rasterize(image, size, background, filter)?;
    encode_png(&icon, compression)
}

/// 按计划顺序把渲染结果写入归档。
fn assemble_archive(
    jobs: Vec<RenderJob>,
    outputs: Vec<Vec<u8>>,
    options: &PackageOptions,
) -> Result<OutputArchive, IconError> {
    let mut archive = OutputArchive::new();
    let mut favicon_groups: Vec<((usize, String), Vec<Vec<u8>>)> = Vec::new();

    for (job, bytes) in jobs.into_iter().zip(outputs) {
        log::debug!("🖼️ {} ({}px, {}) -> {} bytes", job.path, job.size, job.background, bytes.len());
        match job.kind {
            JobKind::Entry => {
                archive.insert(job.path, bytes);
            }
            JobKind::FaviconFrame => {
                let key = (job.image_index, job.path);
                match favicon_groups.last_mut() {
                    Some((last_key, frames)) if *last_key == key => frames.push(bytes),
                    _ => favicon_groups.push((key, vec![bytes])),
                }
            }
        }
    }

    for ((_, path), frames) in favicon_groups {
        archive.insert(path, pack_favicon(&frames)?);
    }

    if options.include_snippets {
        for (name, content) in SNIPPETS {
            archive.insert(name, content.as_bytes().to_vec());
        }
    }

    Ok(archive)
}

fn finalize_archive(archive: OutputArchive, image_count: usize) -> Result<GeneratedArchive, IconError> {
    let finalize_start = Instant::now();
    let entry_count = archive.len();
    let bytes = archive.finalize()?;

    log::info!(
        "📦 归档完成 - {} entries={} size={}KB finalize={}ms",
        archive_name(image_count),
        entry_count,
        bytes.len() / 1024,
        finalize_start.elapsed().as_millis()
    );

    Ok(GeneratedArchive {
        file_name: archive_name(image_count),
        bytes,
        entry_count,
    })
}

impl IconHandler {
    /// 并发渲染并打包。
    ///
    /// # 示例
    /// ```rust
    /// use image::{DynamicImage, Rgba, RgbaImage};
    /// use pwa_icongen::icon::{IconConfig, IconHandler, PackageOptions, SourceImage};
    ///
    /// # #[tokio::main(flavor = "current_thread")]
    /// # async fn main() -> Result<(), pwa_icongen::icon::IconError> {
    /// let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(64, 32, Rgba([255, 0, 0, 255])));
    /// let source = SourceImage::try_new(img, Some("logo.png".into()))?;
    ///
    /// let handler = IconHandler::new(IconConfig::default());
    /// let archive = handler.generate(&[source], &PackageOptions::default()).await?;
    /// assert_eq!(archive.entry_count, 14);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn generate(
        &self,
        images: &[SourceImage],
        options: &PackageOptions,
    ) -> Result<GeneratedArchive, IconError> {
        let config = self.config_snapshot()?;
        self.generate_with(images, options, &config).await
    }

    pub(super) async fn generate_with(
        &self,
        images: &[SourceImage],
        options: &PackageOptions,
        config: &IconConfig,
    ) -> Result<GeneratedArchive, IconError> {
        let jobs = plan_render_jobs(images, options)?;
        let render_start = Instant::now();

        let mut tasks = JoinSet::new();
        for (index, job) in jobs.iter().enumerate() {
            let image = images[job.image_index].clone();
            let (size, background) = (job.size, job.background);
            let (filter, compression) = (config.resize_filter, config.png_compression);
            tasks.spawn_blocking(move || (index, render_png(&image, size, background, filter, compression)));
        }

        let mut outputs: Vec<Option<Vec<u8>>> = vec![None; jobs.len()];
        while let Some(joined) = tasks.join_next().await {
            let (index, result) =
                joined.map_err(|e| IconError::EncodingFailure(format!("渲染任务异常：{}", e)))?;
            match result {
                Ok(bytes) => outputs[index] = Some(bytes),
                Err(err) => {
                    tasks.abort_all();
                    log::error!("❌ 渲染失败，中止本次生成：{}", err);
                    return Err(err);
                }
            }
        }

        let outputs = outputs
            .into_iter()
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| IconError::EncodingFailure("渲染结果缺失".to_string()))?;

        log::info!(
            "🎨 渲染完成 - jobs={} render={}ms",
            jobs.len(),
            render_start.elapsed().as_millis()
        );

        let archive = assemble_archive(jobs, outputs, options)?;
        finalize_archive(archive, images.len())
    }

    /// 顺序渲染并打包（无异步运行时的调用方使用）。
    pub fn generate_blocking(
        &self,
        images: &[SourceImage],
        options: &PackageOptions,
    ) -> Result<GeneratedArchive, IconError> {
        let config = self.config_snapshot()?;
        let archive = Self::build_archive_blocking(images, options, &config)?;
        finalize_archive(archive, images.len())
    }

    fn build_archive_blocking(
        images: &[SourceImage],
        options: &PackageOptions,
        config: &IconConfig,
    ) -> Result<OutputArchive, IconError> {
        let jobs = plan_render_jobs(images, options)?;
        let outputs = jobs
            .iter()
            .map(|job| {
                render_png(
                    &images[job.image_index],
                    job.size,
                    job.background,
                    config.resize_filter,
                    config.png_compression,
                )
            })
            .collect::<Result<Vec<_>, _>>()?;
        assemble_archive(jobs, outputs, options)
    }

    /// 把标准尺寸与 iOS 变体直接写入目录，不含模板。
    ///
    /// 未指定背景时使用不透明白色。返回写入的文件数。
    pub fn export_to_dir(
        &self,
        image: &SourceImage,
        out_dir: &Path,
        background: Option<BackgroundConfig>,
    ) -> Result<usize, IconError> {
        let config = self.config_snapshot()?;
        let options = PackageOptions {
            background: background.unwrap_or(BackgroundConfig::WHITE),
            include_snippets: false,
            ..PackageOptions::default()
        };

        let archive = Self::build_archive_blocking(std::slice::from_ref(image), &options, &config)?;
        let written = archive.write_to_dir(out_dir)?;
        log::info!("📁 图标已写入 {}（{} 个文件）", out_dir.display(), written);
        Ok(written)
    }
}
