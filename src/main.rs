// ==========================================
// 课表排课系统 - 课表导入命令行入口
// ==========================================
// 用法:
//   class-schedule-import [--db <path>] [--no-db] <file>...
//
// 输出: ImportReport（pretty JSON，stdout）
// 退出码: 0 成功 / 2 输入格式错误 / 1 其他错误
// ==========================================

use anyhow::{bail, Context};
use class_schedule::api::{ApiError, ScheduleApi};
use class_schedule::config::{ImportConfig, ImportConfigReader};
use class_schedule::db::get_default_db_path;
use class_schedule::logging;
use class_schedule::repository::{InMemorySnapshotRepository, ScheduleSnapshotRepository};
use std::path::PathBuf;
use std::process::ExitCode;

struct CliArgs {
    db_path: Option<String>,
    no_db: bool,
    files: Vec<PathBuf>,
}

fn parse_args() -> anyhow::Result<CliArgs> {
    let mut args = std::env::args().skip(1);
    let mut cli = CliArgs {
        db_path: None,
        no_db: false,
        files: Vec::new(),
    };

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--db" => {
                let path = args.next().context("--db 需要数据库路径")?;
                cli.db_path = Some(path);
            }
            "--no-db" => cli.no_db = true,
            "-h" | "--help" => {
                bail!("用法: class-schedule-import [--db <path>] [--no-db] <file>...");
            }
            _ => cli.files.push(PathBuf::from(arg)),
        }
    }

    if cli.files.is_empty() {
        bail!("未提供课表文件\n用法: class-schedule-import [--db <path>] [--no-db] <file>...");
    }
    Ok(cli)
}

async fn run<R, C>(api: ScheduleApi<R, C>, files: &[PathBuf]) -> Result<String, ApiError>
where
    R: ScheduleSnapshotRepository + Send + Sync,
    C: ImportConfigReader + Send + Sync,
{
    let report = api.read_table(files).await?;
    serde_json::to_string_pretty(&report).map_err(|e| ApiError::InternalError(e.to_string()))
}

#[tokio::main]
async fn main() -> ExitCode {
    logging::init();

    let cli = match parse_args() {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("{:#}", e);
            return ExitCode::from(1);
        }
    };

    let result = if cli.no_db {
        tracing::info!("不读取数据库，使用空快照与默认配置");
        let api = ScheduleApi::new(InMemorySnapshotRepository::default(), ImportConfig::default());
        run(api, &cli.files).await
    } else {
        let db_path = cli.db_path.unwrap_or_else(get_default_db_path);
        tracing::info!("使用数据库: {}", db_path);
        match ScheduleApi::open(&db_path) {
            Ok(api) => run(api, &cli.files).await,
            Err(e) => Err(e),
        }
    };

    match result {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "课表导入失败");
            eprintln!("{}", e);
            if e.is_malformed_input() {
                ExitCode::from(2)
            } else {
                ExitCode::from(1)
            }
        }
    }
}
