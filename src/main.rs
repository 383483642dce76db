//! # PWA 图标生成工具 — 命令行入口
//!
//! 本文件仅负责参数解析、持久化设置合并与结果落盘。
//! 业务逻辑分布在库的各子模块中，详见 `lib.rs` 架构文档。

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use pwa_icongen::error::AppError;
use pwa_icongen::icon::{
    self, BackgroundConfig, IconConfig, IconHandler, IconPerformanceProfile, ImageSource, PackageOptions,
};
use pwa_icongen::settings::{PersistedSettings, SettingsStore};

#[derive(Debug, Parser)]
#[command(name = "pwa-icongen", about = "Generate PWA / iOS / Android icon sets from a source image")]
struct Cli {
    /// Settings file (defaults to the platform config directory).
    #[arg(long, global = true, value_name = "FILE")]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Render every icon size and pack them with the manifest/head snippets into a zip.
    Generate(GenerateArgs),
    /// Write the icon set straight into a directory (opaque white background by default).
    Icons(IconsArgs),
    /// Pack logo16/32/48.png from a directory into favicon.ico.
    Favicon {
        #[arg(value_name = "DIR", default_value = "public")]
        dir: PathBuf,
    },
    /// Print 64/192/512 previews as PNG data URLs (JSON).
    Preview {
        #[arg(value_name = "IMAGE")]
        image: PathBuf,
        #[arg(long, value_name = "COLOR")]
        bg: Option<String>,
    },
    /// Show or reset the persisted settings.
    Settings {
        #[arg(long)]
        reset: bool,
    },
}

#[derive(Debug, Args)]
struct GenerateArgs {
    /// Source images. More than one produces a batch archive with one folder per image.
    #[arg(value_name = "IMAGES", required = true, num_args = 1..)]
    images: Vec<PathBuf>,

    /// Directory the archive is written to.
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    out_dir: PathBuf,

    /// Opaque background color (#rgb or #rrggbb).
    #[arg(long, value_name = "COLOR", conflicts_with = "transparent")]
    bg: Option<String>,

    /// Keep the background transparent.
    #[arg(long)]
    transparent: bool,

    /// Custom sizes, e.g. "16,32,64". Values outside 8..=2048 are dropped.
    #[arg(long, value_name = "LIST")]
    sizes: Option<String>,

    /// Force a white background on the iOS icons only.
    #[arg(long, conflicts_with = "no_ios_white_only")]
    ios_white_only: bool,

    /// Let the iOS icons use the general background again (overrides a remembered setting).
    #[arg(long)]
    no_ios_white_only: bool,

    /// Also add favicon.ico (16/32/48) to the archive.
    #[arg(long)]
    with_favicon: bool,

    /// quality | balanced | speed
    #[arg(long, value_name = "PROFILE")]
    profile: Option<String>,

    /// Persist the effective settings for the next run.
    #[arg(long)]
    remember: bool,

    /// Print a JSON report instead of log lines.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Args)]
struct IconsArgs {
    #[arg(long, value_name = "FILE")]
    src: PathBuf,
    #[arg(long = "out", value_name = "DIR", default_value = "public")]
    out_dir: PathBuf,
    #[arg(long, value_name = "COLOR")]
    bg: Option<String>,
}

#[derive(Debug, Serialize)]
struct GenerationReport {
    archive: String,
    images: usize,
    entries: usize,
    bytes: usize,
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let json = matches!(&cli.command, Command::Generate(args) if args.json);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if json {
                println!("{}", serde_json::json!({ "error": err, "code": err.code() }));
            } else {
                log::error!("❌ 执行失败: {err}");
            }
            ExitCode::FAILURE
        }
    }
}

fn open_store(path: Option<PathBuf>) -> Result<SettingsStore, AppError> {
    match path {
        Some(path) => Ok(SettingsStore::new(path)),
        None => SettingsStore::open_default(),
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let store = open_store(cli.settings)?;

    match cli.command {
        Command::Generate(args) => generate(&store, args).await,
        Command::Icons(args) => {
            let handler = IconHandler::new(IconConfig::default());
            let background = args.bg.as_deref().map(BackgroundConfig::parse).transpose()?;
            let source = handler.load_source(path_source(&args.src))?;
            handler.export_to_dir(&source, &args.out_dir, background)?;
            Ok(())
        }
        Command::Favicon { dir } => {
            icon::pack_favicon_dir(&dir)?;
            Ok(())
        }
        Command::Preview { image, bg } => {
            let background = match bg {
                Some(bg) => BackgroundConfig::parse(&bg)?,
                None => store.load().background_config(),
            };
            let handler = IconHandler::new(IconConfig::default());
            let source = handler.load_source(path_source(&image))?;
            let previews = handler.render_previews(&source, background)?;
            print_json(&previews)
        }
        Command::Settings { reset } => {
            if reset {
                store.reset()?;
                log::info!("🧹 已重置设置：{}", store.path().display());
            }
            print_json(&store.load())
        }
    }
}

async fn generate(store: &SettingsStore, args: GenerateArgs) -> Result<(), AppError> {
    let settings = merge_settings(store.load(), &args)?;
    if args.remember {
        store.save(&settings)?;
        log::info!("💾 已保存设置：{}", store.path().display());
    }

    let mut config = IconConfig::default();
    if let Some(profile) = args.profile.as_deref() {
        config.apply_performance_profile(IconPerformanceProfile::parse(profile)?);
    }
    let handler = IconHandler::new(config);

    let options = PackageOptions {
        background: settings.background_config(),
        ios_white_only: settings.ios_white_only,
        sizes: settings.sizes(),
        include_favicon: args.with_favicon,
        ..PackageOptions::default()
    };

    let sources = args.images.iter().map(|path| path_source(path)).collect();
    let archive = handler.process_sources(sources, &options).await?;

    fs::create_dir_all(&args.out_dir)?;
    let target = args.out_dir.join(archive.file_name);
    fs::write(&target, &archive.bytes)?;

    let report = GenerationReport {
        archive: target.to_string_lossy().to_string(),
        images: args.images.len(),
        entries: archive.entry_count,
        bytes: archive.bytes.len(),
    };

    if args.json {
        print_json(&report)
    } else {
        log::info!("✅ 已写出 {}（{} 个条目）", report.archive, report.entries);
        Ok(())
    }
}

/// 命令行参数覆盖已保存的设置；显式给出的无效颜色直接报错。
fn merge_settings(mut settings: PersistedSettings, args: &GenerateArgs) -> Result<PersistedSettings, AppError> {
    if let Some(bg) = args.bg.as_deref() {
        BackgroundConfig::parse(bg)?;
        settings.background = bg.to_string();
        settings.transparent = false;
    }
    if args.transparent {
        settings.transparent = true;
    }
    if let Some(sizes) = args.sizes.as_deref() {
        settings.custom_sizes = sizes.to_string();
    }
    if args.ios_white_only {
        settings.ios_white_only = true;
    }
    if args.no_ios_white_only {
        settings.ios_white_only = false;
    }
    Ok(settings)
}

fn path_source(path: &Path) -> ImageSource {
    ImageSource::FilePath(path.to_string_lossy().to_string())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    let text = serde_json::to_string_pretty(value).map_err(std::io::Error::from)?;
    println!("{}", text);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generate_args(extra: &[&str]) -> GenerateArgs {
        let argv = ["pwa-icongen", "generate", "logo.png"].into_iter().chain(extra.iter().copied());
        match Cli::try_parse_from(argv).expect("parse").command {
            Command::Generate(args) => args,
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn remembered_ios_white_only_can_be_turned_off() {
        let saved = PersistedSettings {
            ios_white_only: true,
            custom_sizes: "16, 32".to_string(),
            ..PersistedSettings::default()
        };

        let merged = merge_settings(saved.clone(), &generate_args(&["--no-ios-white-only"])).expect("merge");
        assert!(!merged.ios_white_only);
        assert_eq!(merged.custom_sizes, "16, 32");

        let kept = merge_settings(saved, &generate_args(&[])).expect("merge");
        assert!(kept.ios_white_only);
    }

    #[test]
    fn ios_white_only_flags_conflict() {
        let argv = ["pwa-icongen", "generate", "logo.png", "--ios-white-only", "--no-ios-white-only"];
        assert!(Cli::try_parse_from(argv).is_err());
    }

    #[test]
    fn invalid_cli_background_is_an_error() {
        let result = merge_settings(PersistedSettings::default(), &generate_args(&["--bg", "#zz"]));
        assert!(result.is_err());
    }
}
