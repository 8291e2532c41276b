use std::fs;
use std::io;
use std::path::Path;
use walkdir::WalkDir;

/// 目录移动采用的方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveStrategy {
    /// 同一卷上的原子重命名
    Rename,
    /// 跨卷时退化为复制后删除
    CopyThenDelete,
}

/// 文件系统工具
pub struct FileSystemUtils;

impl FileSystemUtils {
    /// 安全地创建目录
    pub fn create_dir_all(path: &Path) -> Result<(), io::Error> {
        if !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    /// 安全地删除目录及其内容；路径是文件或符号链接时直接删除
    pub fn remove_dir_all(path: &Path) -> Result<(), io::Error> {
        match fs::symlink_metadata(path) {
            Ok(meta) if meta.is_dir() => fs::remove_dir_all(path),
            Ok(_) => fs::remove_file(path),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// 将目录移动到目标位置，目标必须不存在
    ///
    /// 优先 rename；rename 失败时（通常是跨卷）复制整棵目录树再删除源目录。
    pub fn move_dir(src: &Path, dst: &Path) -> Result<MoveStrategy, io::Error> {
        if dst.exists() {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("目标已存在: {}", dst.display()),
            ));
        }

        if let Some(parent) = dst.parent() {
            Self::create_dir_all(parent)?;
        }

        match fs::rename(src, dst) {
            Ok(()) => Ok(MoveStrategy::Rename),
            Err(e) => {
                tracing::debug!(error = %e, "rename failed, falling back to copy");
                if let Err(copy_err) = Self::copy_dir_recursive(src, dst) {
                    let _ = fs::remove_dir_all(dst);
                    return Err(copy_err);
                }
                fs::remove_dir_all(src)?;
                Ok(MoveStrategy::CopyThenDelete)
            }
        }
    }

    /// 递归复制目录
    pub fn copy_dir_recursive(src: &Path, dst: &Path) -> Result<(), io::Error> {
        for entry in WalkDir::new(src).follow_links(false) {
            let entry = entry.map_err(io::Error::from)?;
            let relative = entry
                .path()
                .strip_prefix(src)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
            let target = dst.join(relative);
            let file_type = entry.file_type();

            if file_type.is_dir() {
                fs::create_dir_all(&target)?;
            } else if file_type.is_symlink() {
                Self::copy_symlink(entry.path(), &target)?;
            } else {
                fs::copy(entry.path(), &target)?;
            }
        }
        Ok(())
    }

    #[cfg(unix)]
    fn copy_symlink(src: &Path, dst: &Path) -> Result<(), io::Error> {
        let link = fs::read_link(src)?;
        std::os::unix::fs::symlink(link, dst)
    }

    #[cfg(not(unix))]
    fn copy_symlink(src: &Path, dst: &Path) -> Result<(), io::Error> {
        fs::copy(src, dst).map(|_| ())
    }
}
