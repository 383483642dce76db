// End-to-end archive layout tests for the batch packager.
use std::io::{Cursor, Read};

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use pwa_icongen::icon::{
    BackgroundConfig, IconConfig, IconError, IconHandler, ImageSource, PackageOptions, SourceImage,
};
use zip::ZipArchive;

fn png_bytes(width: u32, height: u32, color: [u8; 4]) -> Vec<u8> {
    let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba(color)));
    let mut cursor = Cursor::new(Vec::new());
    img.write_to(&mut cursor, ImageFormat::Png)
        .expect("failed to encode test image");
    cursor.into_inner()
}

fn source(name: &str, width: u32, height: u32, color: [u8; 4]) -> SourceImage {
    let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba(color)));
    SourceImage::try_new(img, Some(name.to_string())).expect("source")
}

fn open(bytes: Vec<u8>) -> ZipArchive<Cursor<Vec<u8>>> {
    ZipArchive::new(Cursor::new(bytes)).expect("open zip")
}

fn names(zip: &ZipArchive<Cursor<Vec<u8>>>) -> Vec<String> {
    let mut names: Vec<String> = zip.file_names().map(str::to_string).collect();
    names.sort();
    names
}

fn entry_image(zip: &mut ZipArchive<Cursor<Vec<u8>>>, name: &str) -> RgbaImage {
    let mut bytes = Vec::new();
    zip.by_name(name)
        .expect("entry exists")
        .read_to_end(&mut bytes)
        .expect("read entry");
    image::load_from_memory(&bytes).expect("decode entry").to_rgba8()
}

#[tokio::test]
async fn single_image_archive_has_fourteen_root_entries() {
    let handler = IconHandler::new(IconConfig::default());
    let archive = handler
        .process_sources(
            vec![ImageSource::Bytes {
                name: Some("brand.png".into()),
                bytes: png_bytes(120, 80, [255, 0, 0, 255]),
            }],
            &PackageOptions::default(),
        )
        .await
        .expect("generate");

    assert_eq!(archive.file_name, "icons-pwa.zip");
    assert_eq!(archive.entry_count, 14);

    let zip = open(archive.bytes);
    let mut expected: Vec<String> = [16, 32, 48, 64, 96, 128, 192, 256, 384, 512]
        .iter()
        .map(|size| format!("logo{size}.png"))
        .chain(
            [
                "apple-touch-icon.png",
                "apple-touch-icon-3d.png",
                "SNIPPET_manifest.json",
                "SNIPPET_head.html",
            ]
            .map(str::to_string),
        )
        .collect();
    expected.sort();
    assert_eq!(names(&zip), expected);
}

#[tokio::test]
async fn every_icon_is_square_at_its_size() {
    let handler = IconHandler::new(IconConfig::default());
    let archive = handler
        .generate(&[source("tall.png", 30, 90, [0, 0, 0, 255])], &PackageOptions::default())
        .await
        .expect("generate");

    let mut zip = open(archive.bytes);
    for size in [16u32, 48, 192, 512] {
        let icon = entry_image(&mut zip, &format!("logo{size}.png"));
        assert_eq!(icon.dimensions(), (size, size));
    }
    assert_eq!(entry_image(&mut zip, "apple-touch-icon.png").dimensions(), (180, 180));
    assert_eq!(entry_image(&mut zip, "apple-touch-icon-3d.png").dimensions(), (192, 192));
}

#[tokio::test]
async fn batch_archive_nests_each_image_under_its_base_name() {
    let handler = IconHandler::new(IconConfig::default());
    let archive = handler
        .process_sources(
            vec![
                ImageSource::Bytes {
                    name: Some("a.png".into()),
                    bytes: png_bytes(64, 64, [255, 0, 0, 255]),
                },
                ImageSource::Bytes {
                    name: Some("b.png".into()),
                    bytes: png_bytes(64, 32, [0, 255, 0, 255]),
                },
            ],
            &PackageOptions::default(),
        )
        .await
        .expect("generate");

    assert_eq!(archive.file_name, "icons-pwa-batch.zip");

    let zip = open(archive.bytes);
    let names = names(&zip);
    let under_a = names.iter().filter(|n| n.starts_with("a/")).count();
    let under_b = names.iter().filter(|n| n.starts_with("b/")).count();
    assert_eq!(under_a, 12);
    assert_eq!(under_b, 12);
    assert!(names.contains(&"a/logo16.png".to_string()));
    assert!(names.contains(&"b/apple-touch-icon-3d.png".to_string()));

    // 模板每次生成只写一次，位于根目录
    assert!(names.contains(&"SNIPPET_manifest.json".to_string()));
    assert!(names.contains(&"SNIPPET_head.html".to_string()));
    assert_eq!(names.len(), 26);
}

#[tokio::test]
async fn colliding_base_names_resolve_last_write_wins() {
    let handler = IconHandler::new(IconConfig::default());
    let images = [
        source("logo.png", 32, 32, [255, 0, 0, 255]),
        source("logo.jpg", 32, 32, [0, 0, 255, 255]),
    ];
    let archive = handler
        .generate(&images, &PackageOptions::default())
        .await
        .expect("generate");

    assert_eq!(archive.entry_count, 14);
    let mut zip = open(archive.bytes);
    let icon = entry_image(&mut zip, "logo/logo64.png");
    let center = icon.get_pixel(32, 32);
    assert!(center[2] > 200 && center[0] < 50, "expected later (blue) image, got {:?}", center);
}

#[tokio::test]
async fn ios_white_only_forces_white_on_ios_variants() {
    let handler = IconHandler::new(IconConfig::default());
    let options = PackageOptions {
        background: BackgroundConfig::Opaque([0, 0, 255]),
        ios_white_only: true,
        ..PackageOptions::default()
    };
    let archive = handler
        .generate(&[source("wide.png", 200, 100, [255, 0, 0, 255])], &options)
        .await
        .expect("generate");

    let mut zip = open(archive.bytes);
    for name in ["apple-touch-icon.png", "apple-touch-icon-3d.png"] {
        let icon = entry_image(&mut zip, name);
        assert_eq!(*icon.get_pixel(0, 0), Rgba([255, 255, 255, 255]), "{name}");
    }
    for name in ["logo16.png", "logo192.png", "logo512.png"] {
        let icon = entry_image(&mut zip, name);
        assert_eq!(*icon.get_pixel(0, 0), Rgba([0, 0, 255, 255]), "{name}");
    }
}

#[tokio::test]
async fn transparent_mode_leaves_padding_fully_transparent() {
    let handler = IconHandler::new(IconConfig::default());
    let archive = handler
        .generate(&[source("wide.png", 200, 100, [255, 0, 0, 255])], &PackageOptions::default())
        .await
        .expect("generate");

    let mut zip = open(archive.bytes);
    let icon = entry_image(&mut zip, "logo128.png");
    assert_eq!(icon.get_pixel(0, 0)[3], 0);
    assert_eq!(icon.get_pixel(127, 127)[3], 0);
    assert_eq!(icon.get_pixel(64, 64)[3], 255);
}

#[tokio::test]
async fn custom_sizes_replace_the_standard_list() {
    let handler = IconHandler::new(IconConfig::default());
    let options = PackageOptions {
        sizes: pwa_icongen::icon::resolve_size_list("16, 32,, abc, 64"),
        ..PackageOptions::default()
    };
    let archive = handler
        .generate(&[source("a.png", 10, 10, [1, 2, 3, 255])], &options)
        .await
        .expect("generate");

    assert_eq!(archive.entry_count, 3 + 2 + 2);
}

#[tokio::test]
async fn render_failure_aborts_whole_run() {
    let handler = IconHandler::new(IconConfig::default());
    let options = PackageOptions {
        sizes: vec![16, 0],
        ..PackageOptions::default()
    };
    let result = handler
        .generate(&[source("a.png", 10, 10, [1, 2, 3, 255])], &options)
        .await;
    assert!(matches!(result, Err(IconError::InvalidSizeList(_))));
}

#[tokio::test]
async fn oversized_size_is_rejected_by_async_generation() {
    let handler = IconHandler::new(IconConfig::default());
    let options = PackageOptions {
        sizes: vec![u32::MAX],
        ..PackageOptions::default()
    };
    let result = handler
        .generate(&[source("a.png", 10, 10, [1, 2, 3, 255])], &options)
        .await;
    assert!(matches!(result, Err(IconError::InvalidSizeList(_))));
}

#[test]
fn oversized_size_is_rejected_by_blocking_generation() {
    let handler = IconHandler::new(IconConfig::default());
    let options = PackageOptions {
        sizes: vec![u32::MAX],
        ..PackageOptions::default()
    };
    let result = handler.generate_blocking(&[source("a.png", 10, 10, [1, 2, 3, 255])], &options);
    assert!(matches!(result, Err(IconError::InvalidSizeList(_))));
}

#[test]
fn sizes_below_minimum_are_not_rendered() {
    let handler = IconHandler::new(IconConfig::default());
    let options = PackageOptions {
        sizes: vec![1, 4],
        ..PackageOptions::default()
    };
    let result = handler.generate_blocking(&[source("a.png", 10, 10, [1, 2, 3, 255])], &options);
    assert!(matches!(result, Err(IconError::InvalidSizeList(_))));
}

#[tokio::test]
async fn undecodable_source_fails_before_rendering() {
    let handler = IconHandler::new(IconConfig::default());
    let result = handler
        .process_sources(
            vec![ImageSource::Bytes {
                name: Some("notes.txt".into()),
                bytes: b"hello world".to_vec(),
            }],
            &PackageOptions::default(),
        )
        .await;
    assert!(matches!(result, Err(IconError::InvalidFormat(_))));
}

#[test]
fn blocking_generation_matches_async_layout() {
    let handler = IconHandler::new(IconConfig::default());
    let archive = handler
        .generate_blocking(
            &[source("a.png", 48, 48, [9, 9, 9, 255])],
            &PackageOptions::default(),
        )
        .expect("generate");
    assert_eq!(archive.entry_count, 14);
    assert_eq!(open(archive.bytes).len(), 14);
}

#[test]
fn export_to_dir_writes_icons_without_snippets() {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("clock error")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("pwa-icongen-export-test-{nanos}"));

    let handler = IconHandler::new(IconConfig::default());
    let written = handler
        .export_to_dir(&source("a.png", 40, 20, [0, 0, 0, 255]), &dir, None)
        .expect("export");

    assert_eq!(written, 12);
    assert!(dir.join("logo512.png").exists());
    assert!(dir.join("apple-touch-icon-3d.png").exists());
    assert!(!dir.join("SNIPPET_head.html").exists());

    // 未指定背景时为不透明白色
    let icon = image::open(dir.join("logo64.png")).expect("open icon").to_rgba8();
    assert_eq!(*icon.get_pixel(0, 0), Rgba([255, 255, 255, 255]));

    pwa_icongen::icon::pack_favicon_dir(&dir).expect("favicon from exported icons");
    assert!(dir.join("favicon.ico").exists());

    let _ = std::fs::remove_dir_all(dir);
}
