use glob::{MatchOptions, Pattern};
use std::path::{Path, PathBuf};

use crate::core::platform::{PlatformSpec, PlatformTable};
use crate::error::{AppError, AppResult};
use crate::infrastructure::extractor::ArchiveFormat;

/// 平台到压缩包的分配，每个平台至多一个，先到者优先
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchiveAssignment {
    entries: Vec<(String, PathBuf)>,
}

impl ArchiveAssignment {
    pub fn new() -> Self {
        Self::default()
    }

    /// 为平台分配压缩包；已有分配时保持不变并返回 false
    pub fn assign(&mut self, platform: &str, archive: PathBuf) -> bool {
        if self.contains(platform) {
            tracing::debug!(platform, archive = %archive.display(), "already assigned, ignoring");
            return false;
        }
        self.entries.push((platform.to_string(), archive));
        true
    }

    pub fn get(&self, platform: &str) -> Option<&Path> {
        self.entries
            .iter()
            .find(|(name, _)| name == platform)
            .map(|(_, path)| path.as_path())
    }

    pub fn contains(&self, platform: &str) -> bool {
        self.get(platform).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 平台表中的每个平台是否都已分配
    pub fn is_complete(&self, table: &PlatformTable) -> bool {
        table.iter().all(|spec| self.contains(&spec.name))
    }

    /// 按平台表顺序列出已分配的平台
    pub fn ordered<'a>(&'a self, table: &'a PlatformTable) -> Vec<(&'a PlatformSpec, &'a Path)> {
        table
            .iter()
            .filter_map(|spec| self.get(&spec.name).map(|path| (spec, path)))
            .collect()
    }
}

/// 文件名匹配不区分大小写，与 `ArchiveFormat::from_path` 一致
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: false,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// 压缩包定位器
pub struct ArchiveLocator;

impl ArchiveLocator {
    /// 在单个目录中为一个平台寻找压缩包
    ///
    /// 规则按优先级尝试，每条规则内 .7z 优先于 .zip；
    /// 命中后取字典序最大的文件名，不再尝试后续规则。
    pub fn find_in_dir(dir: &Path, spec: &PlatformSpec) -> AppResult<Option<PathBuf>> {
        if !dir.is_dir() {
            return Ok(None);
        }

        let escaped_dir = Pattern::escape(&dir.to_string_lossy());
        for pattern in &spec.archive_patterns {
            for format in ArchiveFormat::PREFERENCE {
                let full = format!("{}/{}{}", escaped_dir, pattern, format.extension());
                tracing::debug!(platform = %spec.name, pattern = %full, "globbing");

                let paths = glob::glob_with(&full, MATCH_OPTIONS).map_err(|e| {
                    AppError::config(format!(
                        "平台 {} 的匹配规则无效 '{}': {}",
                        spec.name, pattern, e
                    ))
                })?;

                let mut matches: Vec<PathBuf> = paths
                    .filter_map(Result::ok)
                    .filter(|p| p.is_file())
                    .collect();
                matches.sort();

                if let Some(best) = matches.pop() {
                    tracing::info!(platform = %spec.name, archive = %best.display(), "archive matched");
                    return Ok(Some(best));
                }
            }
        }
        Ok(None)
    }

    /// 在单个目录中为所有平台寻找压缩包
    pub fn find_archives(dir: &Path, table: &PlatformTable) -> AppResult<Vec<(String, PathBuf)>> {
        let mut found = Vec::new();
        for spec in table.iter() {
            if let Some(path) = Self::find_in_dir(dir, spec)? {
                found.push((spec.name.clone(), path));
            }
        }
        Ok(found)
    }

    /// 按顺序搜索目录，补全尚未分配的平台
    ///
    /// 对某个平台而言，第一个有匹配的目录胜出。
    pub fn locate(
        search_dirs: &[PathBuf],
        table: &PlatformTable,
        assignment: &mut ArchiveAssignment,
    ) -> AppResult<()> {
        for dir in search_dirs {
            if assignment.is_complete(table) {
                break;
            }
            tracing::debug!(dir = %dir.display(), "scanning for archives");
            for (platform, path) in Self::find_archives(dir, table)? {
                assignment.assign(&platform, path);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, name).unwrap();
        path
    }

    #[test]
    fn test_lexicographically_last_wins() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "ultralight-sdk-1.3.0-linux-x64.7z");
        let newest = touch(temp.path(), "ultralight-sdk-1.4.0-linux-x64.7z");

        let table = PlatformTable::builtin();
        let spec = table.get("linux-x64").unwrap();
        assert_eq!(
            ArchiveLocator::find_in_dir(temp.path(), spec).unwrap(),
            Some(newest)
        );
    }

    #[test]
    fn test_7z_preferred_over_zip() {
        let temp = TempDir::new().unwrap();
        let sevenz = touch(temp.path(), "ultralight-sdk-1.3.0-win-x64.7z");
        touch(temp.path(), "ultralight-sdk-1.4.0-win-x64.zip");

        let table = PlatformTable::builtin();
        let spec = table.get("win-x64").unwrap();
        assert_eq!(
            ArchiveLocator::find_in_dir(temp.path(), spec).unwrap(),
            Some(sevenz)
        );
    }

    #[test]
    fn test_earlier_pattern_wins() {
        let temp = TempDir::new().unwrap();
        // 第一条规则 *win*x64* 命中，即使第三条规则能匹配字典序更大的文件
        let first = touch(temp.path(), "a-win-x64.zip");
        touch(temp.path(), "z-windows.7z");

        let table = PlatformTable::builtin();
        let spec = table.get("win-x64").unwrap();
        assert_eq!(
            ArchiveLocator::find_in_dir(temp.path(), spec).unwrap(),
            Some(first)
        );
    }

    #[test]
    fn test_uppercase_extension_is_found() {
        let temp = TempDir::new().unwrap();
        let upper = touch(temp.path(), "Ultralight-SDK-1.4.0-Linux-x64.ZIP");

        let table = PlatformTable::builtin();
        let spec = table.get("linux-x64").unwrap();
        assert_eq!(
            ArchiveLocator::find_in_dir(temp.path(), spec).unwrap(),
            Some(upper)
        );
    }

    #[test]
    fn test_ignores_other_extensions_and_dirs() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "ultralight-sdk-linux-x64.tar.gz");
        fs::create_dir(temp.path().join("ultralight-sdk-linux-x64.7z")).unwrap();

        let table = PlatformTable::builtin();
        let spec = table.get("linux-x64").unwrap();
        assert_eq!(ArchiveLocator::find_in_dir(temp.path(), spec).unwrap(), None);
    }

    #[test]
    fn test_missing_dir_is_not_an_error() {
        let temp = TempDir::new().unwrap();
        let table = PlatformTable::builtin();
        let found = ArchiveLocator::find_archives(&temp.path().join("missing"), &table).unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn test_dir_with_glob_metacharacters() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("downloads [old]");
        fs::create_dir(&dir).unwrap();
        let archive = touch(&dir, "ultralight-sdk-mac-arm64.7z");

        let table = PlatformTable::builtin();
        let spec = table.get("mac-arm64").unwrap();
        assert_eq!(ArchiveLocator::find_in_dir(&dir, spec).unwrap(), Some(archive));
    }

    #[test]
    fn test_first_directory_wins_per_platform() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        let linux_first = touch(first.path(), "ultralight-sdk-1.3.0-linux-x64.7z");
        touch(second.path(), "ultralight-sdk-1.4.0-linux-x64.7z");
        let mac_second = touch(second.path(), "ultralight-sdk-1.4.0-mac-x64.7z");

        let table = PlatformTable::builtin();
        let mut assignment = ArchiveAssignment::new();
        ArchiveLocator::locate(
            &[first.path().to_path_buf(), second.path().to_path_buf()],
            &table,
            &mut assignment,
        )
        .unwrap();

        assert_eq!(assignment.get("linux-x64"), Some(linux_first.as_path()));
        assert_eq!(assignment.get("mac-x64"), Some(mac_second.as_path()));
        assert!(!assignment.contains("win-x64"));
        assert_eq!(assignment.len(), 2);
    }

    #[test]
    fn test_manual_assignment_not_overwritten() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "ultralight-sdk-1.4.0-win-x64.7z");
        let manual = PathBuf::from("/elsewhere/my-windows-build.zip");

        let table = PlatformTable::builtin();
        let mut assignment = ArchiveAssignment::new();
        assert!(assignment.assign("win-x64", manual.clone()));
        ArchiveLocator::locate(&[temp.path().to_path_buf()], &table, &mut assignment).unwrap();

        assert_eq!(assignment.get("win-x64"), Some(manual.as_path()));
    }

    #[test]
    fn test_ordered_follows_platform_table() {
        let table = PlatformTable::builtin();
        let mut assignment = ArchiveAssignment::new();
        assignment.assign("mac-arm64", PathBuf::from("c.7z"));
        assignment.assign("win-x64", PathBuf::from("a.7z"));

        let names: Vec<&str> = assignment
            .ordered(&table)
            .into_iter()
            .map(|(spec, _)| spec.name.as_str())
            .collect();
        assert_eq!(names, vec!["win-x64", "mac-arm64"]);
    }
}
