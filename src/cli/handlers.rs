use crate::cli::commands::{Cli, RunRequest};
use crate::cli::output::{OutputFormat, StatusPhase, FORMATTER};
use crate::core::constants::version;
use crate::error::{with_context, AppError, AppResult, ContextualError};
use crate::infrastructure::config::SetupConfig;
use crate::infrastructure::extractor::{Extractor, SystemExtractor};
use crate::infrastructure::prompt::{AssumeYes, Confirm, LineConfirm};
use crate::sdk::installer::{InstallOutcome, PlatformInstaller};
use crate::sdk::locator::{ArchiveAssignment, ArchiveLocator};
use crate::sdk::status::StatusReporter;

/// 一次运行的最终结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Success,
    Failure,
}

impl RunOutcome {
    pub fn exit_code(self) -> i32 {
        match self {
            RunOutcome::Success => 0,
            RunOutcome::Failure => 1,
        }
    }
}

/// 命令处理器
pub struct CommandHandler {
    config: SetupConfig,
    extractor: Box<dyn Extractor>,
    confirm: Box<dyn Confirm>,
}

impl CommandHandler {
    pub fn new(config: SetupConfig, extractor: Box<dyn Extractor>, confirm: Box<dyn Confirm>) -> Self {
        Self {
            config,
            extractor,
            confirm,
        }
    }

    /// 根据命令行创建处理器，使用系统解压工具和标准输入确认
    pub fn from_cli(cli: &Cli) -> Result<Self, ContextualError> {
        let config = with_context(SetupConfig::resolve(&cli.config_overrides()), "加载配置")?;
        tracing::debug!(?config, "configuration resolved");

        let extractor = Box::new(SystemExtractor::new(config.sevenzip_commands.clone()));
        let confirm: Box<dyn Confirm> = if config.assume_yes {
            Box::new(AssumeYes)
        } else {
            Box::new(LineConfirm::stdio())
        };
        Ok(Self::new(config, extractor, confirm))
    }

    /// 执行：状态 → 定位 → 逐平台安装 → 汇总
    pub fn run(&mut self, request: &RunRequest) -> Result<RunOutcome, ContextualError> {
        if request.format == OutputFormat::Text {
            print!(
                "{}",
                FORMATTER.banner(&format!("Ultralight SDK 安装 ({} v{})", version::APP_NAME, version::VERSION))
            );
        }
        self.print_status(StatusPhase::Current, request.format)?;

        if request.list_only {
            return Ok(RunOutcome::Success);
        }

        let assignment = with_context(self.collect_archives(request), "查找 SDK 压缩包")?;
        if assignment.is_empty() {
            print!("{}", FORMATTER.format_no_archives(&self.config.search_dirs));
            return Ok(RunOutcome::Failure);
        }

        tracing::info!(count = assignment.len(), "archives assigned");
        let ordered = assignment.ordered(&self.config.platforms);
        print!("{}", FORMATTER.format_assignment(&ordered));

        let mut failed = Vec::new();
        for (spec, archive) in ordered {
            print!("{}", FORMATTER.section(&spec.name));

            let mut installer =
                PlatformInstaller::new(&self.config, self.extractor.as_ref(), self.confirm.as_mut());
            match installer.install(spec, archive) {
                Ok(InstallOutcome::Installed { target, .. }) => {
                    println!("  ✓ 已安装到: {}", target.display());
                }
                Ok(InstallOutcome::Skipped { .. }) => {}
                Err(e) if e.is_fatal() => {
                    tracing::error!(platform = %spec.name, error = %e, "fatal filesystem error");
                    return Err(e.with_context(&format!("安装 {}", spec.name)));
                }
                Err(e) => {
                    tracing::warn!(platform = %spec.name, error = %e, "platform install failed");
                    print!("{}", FORMATTER.format_error(&spec.name, &e));
                    failed.push(spec.name.clone());
                }
            }
        }

        print!("\n{}", FORMATTER.banner("安装完成"));
        self.print_status(StatusPhase::Final, OutputFormat::Text)?;
        print!("{}", FORMATTER.next_steps());

        if failed.is_empty() {
            Ok(RunOutcome::Success)
        } else {
            println!("\n失败的平台: {}", failed.join(", "));
            Ok(RunOutcome::Failure)
        }
    }

    /// 命令行指定的压缩包优先，其余平台按目录顺序搜索
    fn collect_archives(&self, request: &RunRequest) -> AppResult<ArchiveAssignment> {
        let mut assignment = ArchiveAssignment::new();

        for (platform, path) in &request.manual_archives {
            if !self.config.platforms.contains(platform) {
                return Err(AppError::config(format!(
                    "平台 {} 不在平台表中 (可用: {})",
                    platform,
                    self.config.platforms.names().join(", ")
                )));
            }
            assignment.assign(platform, path.clone());
        }

        if !assignment.is_complete(&self.config.platforms) {
            ArchiveLocator::locate(&self.config.search_dirs, &self.config.platforms, &mut assignment)?;
        }

        Ok(assignment)
    }

    fn print_status(&self, phase: StatusPhase, format: OutputFormat) -> Result<(), ContextualError> {
        let statuses = StatusReporter::new(&self.config).inspect();
        let output = with_context(FORMATTER.format_status(&statuses, phase, format), "输出 SDK 状态")?;
        print!("{}", output);
        Ok(())
    }
}
