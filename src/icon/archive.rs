//! # 输出归档
//!
//! 内存中的“路径 → 字节”映射，逐条写入，最终一次性打包为 zip。
//! 同一路径重复写入时后写覆盖先写（批量模式下同名源图即如此）。

use std::collections::BTreeMap;
use std::fs;
use std::io::{Cursor, Write};
use std::path::Path;

use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use super::IconError;

/// 单图生成时的归档文件名。
pub const SINGLE_ARCHIVE_NAME: &str = "icons-pwa.zip";
/// 批量生成时的归档文件名。
pub const BATCH_ARCHIVE_NAME: &str = "icons-pwa-batch.zip";

/// 构建中的输出归档。
#[derive(Debug, Default)]
pub struct OutputArchive {
    entries: BTreeMap<String, Vec<u8>>,
}

impl OutputArchive {
    pub fn new() -> Self {
        Self::default()
    }

    /// 写入一条记录。返回 `true` 表示覆盖了已有同名记录。
    pub fn insert(&mut self, path: impl Into<String>, bytes: Vec<u8>) -> bool {
        let path = path.into();
        let replaced = self.entries.insert(path.clone(), bytes).is_some();
        if replaced {
            log::debug!("♻️ 归档路径重复，后写覆盖：{}", path);
        }
        replaced
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, path: &str) -> Option<&[u8]> {
        self.entries.get(path).map(Vec::as_slice)
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// 打包为 zip 字节。
    pub fn finalize(self) -> Result<Vec<u8>, IconError> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        for (path, bytes) in &self.entries {
            zip.start_file(path.as_str(), options)
                .map_err(|e| IconError::ArchiveFailure(format!("写入归档条目 {} 失败：{}", path, e)))?;
            zip.write_all(bytes)
                .map_err(|e| IconError::ArchiveFailure(format!("写入归档条目 {} 失败：{}", path, e)))?;
        }

        let cursor = zip
            .finish()
            .map_err(|e| IconError::ArchiveFailure(format!("归档收尾失败：{}", e)))?;

        Ok(cursor.into_inner())
    }

    /// 将所有记录按相对路径写入目录（目录不存在时自动创建）。
    pub fn write_to_dir(&self, dir: &Path) -> Result<usize, IconError> {
        for (path, bytes) in &self.entries {
            let target = dir.join(path);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(|e| {
                    IconError::FileSystem(format!("创建目录 {} 失败：{}", parent.display(), e))
                })?;
            }
            fs::write(&target, bytes)
                .map_err(|e| IconError::FileSystem(format!("写入 {} 失败：{}", target.display(), e)))?;
        }
        Ok(self.entries.len())
    }
}

/// 打包完成、可交给调用方下载的归档。
#[derive(Debug, Clone)]
pub struct GeneratedArchive {
    /// `icons-pwa.zip` 或 `icons-pwa-batch.zip`。
    pub file_name: &'static str,
    pub bytes: Vec<u8>,
    pub entry_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn later_insert_overwrites_earlier() {
        let mut archive = OutputArchive::new();
        assert!(!archive.insert("a/logo16.png", vec![1]));
        assert!(archive.insert("a/logo16.png", vec![2]));
        assert_eq!(archive.len(), 1);
        assert_eq!(archive.get("a/logo16.png"), Some(&[2u8][..]));
    }

    #[test]
    fn finalize_produces_readable_zip() {
        let mut archive = OutputArchive::new();
        archive.insert("SNIPPET_head.html", b"<meta />".to_vec());
        archive.insert("x/logo32.png", vec![0, 1, 2, 3]);

        let bytes = archive.finalize().expect("finalize");
        let mut zip = zip::ZipArchive::new(Cursor::new(bytes)).expect("open zip");
        assert_eq!(zip.len(), 2);

        let mut content = String::new();
        zip.by_name("SNIPPET_head.html")
            .expect("entry")
            .read_to_string(&mut content)
            .expect("read");
        assert_eq!(content, "<meta />");
    }
}
