use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::core::constants::sdk;

/// 在解压目录中定位真正的 SDK 根目录
///
/// 压缩包经常在内容外包一到两层目录，这里逐层检查：
/// 先是解压目录本身，再是所有一级子目录，最后是所有二级子目录。
/// 同一层内按目录名排序，返回第一个包含标记文件的目录。
pub struct SdkRootFinder<'a> {
    marker: &'a str,
    max_depth: usize,
}

impl<'a> SdkRootFinder<'a> {
    pub fn new(marker: &'a str) -> Self {
        Self {
            marker,
            max_depth: sdk::MAX_ROOT_DEPTH,
        }
    }

    pub fn find(&self, extracted: &Path) -> Option<PathBuf> {
        for depth in 0..=self.max_depth {
            tracing::debug!(depth, dir = %extracted.display(), "searching for SDK root");
            let found = WalkDir::new(extracted)
                .min_depth(depth)
                .max_depth(depth)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|entry| match entry {
                    Ok(entry) => Some(entry),
                    Err(e) => {
                        tracing::debug!(error = %e, "skipping unreadable entry");
                        None
                    }
                })
                .filter(|entry| entry.file_type().is_dir())
                .map(|entry| entry.into_path())
                .find(|dir| dir.join(self.marker).is_file());

            if found.is_some() {
                return found;
            }
        }
        None
    }
}
