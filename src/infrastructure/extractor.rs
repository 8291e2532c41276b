use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

use crate::error::{safe_path_to_str, AppError, AppResult};
use crate::utils::{FileSystemUtils, PathUtils};

/// 支持的压缩包格式，按扩展名识别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    SevenZip,
    Zip,
}

impl ArchiveFormat {
    /// 搜索压缩包时的扩展名优先级
    pub const PREFERENCE: [ArchiveFormat; 2] = [ArchiveFormat::SevenZip, ArchiveFormat::Zip];

    /// 根据文件扩展名判定格式（不区分大小写）
    pub fn from_path(path: &Path) -> AppResult<Self> {
        let name = PathUtils::file_name(path).to_lowercase();
        if name.ends_with(".7z") {
            Ok(ArchiveFormat::SevenZip)
        } else if name.ends_with(".zip") {
            Ok(ArchiveFormat::Zip)
        } else {
            Err(AppError::unsupported_format(path))
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ArchiveFormat::SevenZip => ".7z",
            ArchiveFormat::Zip => ".zip",
        }
    }
}

/// 解压能力
pub trait Extractor {
    /// 在修改任何安装目录前检查压缩包能否被解压
    fn preflight(&self, archive: &Path) -> AppResult<ArchiveFormat> {
        check_archive(archive)
    }

    /// 将压缩包全部内容解压到 dest，dest 不存在时自动创建
    fn extract(&self, archive: &Path, dest: &Path) -> AppResult<()>;
}

/// 扩展名可识别且文件存在
pub fn check_archive(archive: &Path) -> AppResult<ArchiveFormat> {
    let format = ArchiveFormat::from_path(archive)?;
    if !archive.is_file() {
        return Err(AppError::Path {
            path: archive.display().to_string(),
            reason: "压缩包不存在".to_string(),
        });
    }
    Ok(format)
}

/// 默认实现：7z 交给外部命令，zip 在进程内解压
pub struct SystemExtractor {
    sevenzip_commands: Vec<String>,
}

impl SystemExtractor {
    pub fn new(sevenzip_commands: Vec<String>) -> Self {
        Self { sevenzip_commands }
    }

    /// 在 PATH 中查找第一个可用的 7z 可执行文件
    pub fn find_sevenzip(&self) -> AppResult<PathBuf> {
        for name in &self.sevenzip_commands {
            if let Ok(path) = which::which(name) {
                tracing::debug!(command = %name, path = %path.display(), "found 7z executable");
                return Ok(path);
            }
        }
        Err(AppError::ToolMissing {
            tried: self.sevenzip_commands.join(", "),
        })
    }

    fn extract_7z(&self, archive: &Path, dest: &Path) -> AppResult<()> {
        let tool = self.find_sevenzip()?;
        let out_arg = format!("-o{}", safe_path_to_str(dest)?);

        tracing::info!(tool = %tool.display(), archive = %archive.display(), "running 7z");

        let spinner = ProgressBar::new_spinner();
        spinner.set_message(format!("解压 {}", PathUtils::file_name(archive)));
        spinner.enable_steady_tick(Duration::from_millis(120));

        let output = Command::new(&tool)
            .arg("x")
            .arg("-y")
            .arg(&out_arg)
            .arg(archive)
            .output();
        spinner.finish_and_clear();

        let output = output.map_err(|e| AppError::ToolFailed {
            tool: tool.display().to_string(),
            code: "-".to_string(),
            stderr: e.to_string(),
        })?;

        if !output.status.success() {
            return Err(AppError::ToolFailed {
                tool: tool.display().to_string(),
                code: output
                    .status
                    .code()
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "signal".to_string()),
                stderr: tool_diagnostic(&output.stdout, &output.stderr),
            });
        }
        Ok(())
    }
}

/// 7z 的错误信息有时只写到 stdout，stderr 为空时退回 stdout
fn tool_diagnostic(stdout: &[u8], stderr: &[u8]) -> String {
    let stderr = String::from_utf8_lossy(stderr).trim().to_string();
    if stderr.is_empty() {
        String::from_utf8_lossy(stdout).trim().to_string()
    } else {
        stderr
    }
}

impl Extractor for SystemExtractor {
    fn preflight(&self, archive: &Path) -> AppResult<ArchiveFormat> {
        let format = check_archive(archive)?;
        if format == ArchiveFormat::SevenZip {
            self.find_sevenzip()?;
        }
        Ok(format)
    }

    fn extract(&self, archive: &Path, dest: &Path) -> AppResult<()> {
        let format = ArchiveFormat::from_path(archive)?;
        FileSystemUtils::create_dir_all(dest)?;
        match format {
            ArchiveFormat::SevenZip => self.extract_7z(archive, dest),
            ArchiveFormat::Zip => extract_zip(archive, dest),
        }
    }
}

/// 进程内解压 zip，拒绝逃逸出目标目录的条目
pub fn extract_zip(zip_path: &Path, dest_dir: &Path) -> AppResult<()> {
    let file = fs::File::open(zip_path)
        .map_err(|e| AppError::extraction(format!("打开 ZIP 文件失败: {}", e)))?;
    let mut archive = zip::ZipArchive::new(file)
        .map_err(|e| AppError::extraction(format!("读取 ZIP 文件失败: {}", e)))?;

    let pb = ProgressBar::new(archive.len() as u64);
    if let Ok(style) = ProgressStyle::with_template("{spinner:.green} [{wide_bar:.cyan/blue}] {pos}/{len} {msg}") {
        pb.set_style(style.progress_chars("#>-"));
    }

    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .map_err(|e| AppError::extraction(format!("读取 ZIP 文件项失败: {}", e)))?;
        let relative = entry.enclosed_name().map(Path::to_path_buf).ok_or_else(|| {
            AppError::extraction(format!("ZIP 条目路径不安全: {}", entry.name()))
        })?;
        let outpath = dest_dir.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&outpath)
                .map_err(|e| AppError::extraction(format!("创建目录失败: {}", e)))?;
        } else {
            if let Some(p) = outpath.parent() {
                fs::create_dir_all(p)
                    .map_err(|e| AppError::extraction(format!("创建父目录失败: {}", e)))?;
            }
            let mut outfile = fs::File::create(&outpath)
                .map_err(|e| AppError::extraction(format!("创建文件失败: {}", e)))?;
            std::io::copy(&mut entry, &mut outfile)
                .map_err(|e| AppError::extraction(format!("写入文件失败: {}", e)))?;
        }

        restore_permissions(&outpath, entry.unix_mode());

        pb.inc(1);
    }
    pb.finish_and_clear();

    tracing::debug!(entries = archive.len(), dest = %dest_dir.display(), "zip extracted");
    Ok(())
}

#[cfg(unix)]
fn restore_permissions(path: &Path, mode: Option<u32>) {
    use std::os::unix::fs::PermissionsExt;
    if let Some(mode) = mode {
        let _ = fs::set_permissions(path, fs::Permissions::from_mode(mode));
    }
}

#[cfg(not(unix))]
fn restore_permissions(_path: &Path, _mode: Option<u32>) {}
