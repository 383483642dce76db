//! # 核心编排模块
//!
//! ## 设计思路
//!
//! `IconHandler` 只负责流程编排与配置管理，处理链路固定为：
//! 1. 读取配置快照
//! 2. 按来源加载原始字节
//! 3. 解码为源图
//! 4. 批量渲染、打包（见 `packager.rs`）
//!
//! ## 实现思路
//!
//! - 配置通过 `Arc<RwLock<IconConfig>>` 支持运行时切换档位。
//! - 单次生成使用“同一配置快照”，避免处理中途配置漂移。
//! - 记录 `load/decode/render/total` 阶段耗时，便于性能诊断。

use std::sync::{Arc, RwLock};
use std::time::Instant;

use super::{
    GeneratedArchive, IconConfig, IconError, IconPerformanceProfile, ImageSource, PackageOptions,
    SourceImage,
};

/// 图标生成器。
#[derive(Debug, Clone)]
pub struct IconHandler {
    pub(super) config: Arc<RwLock<IconConfig>>,
}

impl IconHandler {
    /// 根据初始配置创建生成器。
    ///
    /// # 示例
    /// ```rust
    /// use pwa_icongen::icon::{IconConfig, IconHandler};
    ///
    /// let handler = IconHandler::new(IconConfig::default());
    /// assert_eq!(handler.get_performance_profile()?.as_str(), "quality");
    /// # Ok::<(), pwa_icongen::icon::IconError>(())
    /// ```
    pub fn new(config: IconConfig) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
        }
    }

    /// 获取配置快照，保证单次生成链路使用一致参数。
    pub(super) fn config_snapshot(&self) -> Result<IconConfig, IconError> {
        self.config
            .read()
            .map(|cfg| cfg.clone())
            .map_err(|_| IconError::ResourceLimit("配置读取锁已中毒".to_string()))
    }

    pub fn set_performance_profile(&self, profile: IconPerformanceProfile) -> Result<(), IconError> {
        let mut config = self
            .config
            .write()
            .map_err(|_| IconError::ResourceLimit("配置写入锁已中毒".to_string()))?;
        config.apply_performance_profile(profile);

        log::info!(
            "⚙️ 已切换图标性能档位：{:?}（filter={:?}, png={:?}）",
            profile,
            config.resize_filter,
            config.png_compression
        );

        Ok(())
    }

    pub fn get_performance_profile(&self) -> Result<IconPerformanceProfile, IconError> {
        let config = self
            .config
            .read()
            .map_err(|_| IconError::ResourceLimit("配置读取锁已中毒".to_string()))?;
        Ok(config.infer_performance_profile())
    }

    /// 加载并解码单个来源。
    pub fn load_source(&self, source: ImageSource) -> Result<SourceImage, IconError> {
        let config = self.config_snapshot()?;
        self.load_source_with(source, &config)
    }

    fn load_source_with(&self, source: ImageSource, config: &IconConfig) -> Result<SourceImage, IconError> {
        let raw = match source {
            ImageSource::FilePath(path) => self.load_from_file(&path, config)?,
            ImageSource::Base64(data) => self.load_from_base64(&data, config)?,
            ImageSource::Bytes { name, bytes } => self.load_from_bytes(name, bytes, config)?,
        };
        self.decode_source(raw, config)
    }

    /// 处理主入口：加载全部来源并生成归档。
    ///
    /// 任一来源加载失败即中止，不产生部分归档。
    ///
    /// # 示例
    /// ```rust,no_run
    /// use pwa_icongen::icon::{IconConfig, IconHandler, ImageSource, PackageOptions};
    ///
    /// # async fn demo() -> Result<(), pwa_icongen::icon::IconError> {
    /// let handler = IconHandler::new(IconConfig::default());
    /// let archive = handler
    ///     .process_sources(vec![ImageSource::FilePath("logo.png".into())], &PackageOptions::default())
    ///     .await?;
    /// assert_eq!(archive.file_name, "icons-pwa.zip");
    /// # Ok(())
    /// # }
    /// ```
    pub async fn process_sources(
        &self,
        sources: Vec<ImageSource>,
        options: &PackageOptions,
    ) -> Result<GeneratedArchive, IconError> {
        let config = self.config_snapshot()?;
        let total_start = Instant::now();

        let load_start = Instant::now();
        let images = sources
            .into_iter()
            .map(|source| self.load_source_with(source, &config))
            .collect::<Result<Vec<_>, _>>()?;
        let load_elapsed = load_start.elapsed();

        let render_start = Instant::now();
        let archive = self.generate_with(&images, options, &config).await?;
        let render_elapsed = render_start.elapsed();

        log::info!(
            "✅ 图标生成完成 - images={} entries={} load+decode={}ms render+pack={}ms total={}ms",
            images.len(),
            archive.entry_count,
            load_elapsed.as_millis(),
            render_elapsed.as_millis(),
            total_start.elapsed().as_millis()
        );

        Ok(archive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn switching_profile_updates_config() {
        let handler = IconHandler::new(IconConfig::default());
        handler
            .set_performance_profile(IconPerformanceProfile::Speed)
            .expect("set profile");
        assert_eq!(
            handler.get_performance_profile().expect("get profile"),
            IconPerformanceProfile::Speed
        );
    }

    #[test]
    fn clones_share_config() {
        let handler = IconHandler::new(IconConfig::default());
        let clone = handler.clone();
        clone
            .set_performance_profile(IconPerformanceProfile::Balanced)
            .expect("set profile");
        assert_eq!(
            handler.get_performance_profile().expect("get profile"),
            IconPerformanceProfile::Balanced
        );
    }
}
