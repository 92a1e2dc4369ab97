//! calsdt - 五行号码筛选工具
//!
//! 命令行入口：读取号码文件和配置文件，调用核心引擎，写出结果文件。
//! 所有计算都在核心库中完成，这里只负责IO和展示。

use anyhow::{bail, Context, Result};
use calsdt::core::engine::Engine;
use calsdt::core::models::QuickCheckResult;
use calsdt::storage::config::ConfigManager;
use calsdt::storage::export;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "calsdt")]
#[command(about = "Phân tích số điện thoại theo Ngũ Hành")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Phân tích toàn bộ danh sách số trong file
    Analyze {
        /// File danh sách số, mỗi dòng một số
        input: PathBuf,
        /// File cấu hình JSON
        #[arg(long)]
        config: Option<PathBuf>,
        /// File kết quả (mặc định ket_qua_<thời gian>.txt)
        #[arg(long)]
        output: Option<PathBuf>,
        /// Chỉ ghi N kết quả đầu tiên
        #[arg(long)]
        top: Option<usize>,
    },
    /// Kiểm tra nhanh một số
    Check {
        number: String,
        /// File cấu hình JSON
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Tạo file cấu hình mặc định
    InitConfig {
        /// Đường dẫn file cấu hình
        #[arg(long)]
        config: Option<PathBuf>,
        /// Ghi đè nếu file đã tồn tại
        #[arg(long)]
        force: bool,
    },
}

fn config_manager(path: Option<PathBuf>) -> ConfigManager {
    ConfigManager::new(path.unwrap_or_else(ConfigManager::default_path))
}

fn run_analyze(
    input: PathBuf,
    config: Option<PathBuf>,
    output: Option<PathBuf>,
    top: Option<usize>,
) -> Result<()> {
    let start_time = Instant::now();

    let config = config_manager(config).load()?;
    let content = std::fs::read_to_string(&input)
        .with_context(|| format!("Không thể đọc file '{}'", input.display()))?;

    let mut results = Engine::default().analyze(&content, &config)?;
    println!(
        "Đã tìm thấy {} số hợp lệ sau khi lọc. Đang ghi ra file...",
        results.len()
    );

    if let Some(n) = top {
        results.truncate(n);
    }

    let output = output.unwrap_or_else(|| {
        PathBuf::from(export::export_file_name(&chrono::Local::now()))
    });
    export::write_results(&output, &results)?;

    println!("Hoàn thành! Đã ghi kết quả vào {}", output.display());
    println!("Thời gian chạy: {:.2?}", start_time.elapsed());
    Ok(())
}

fn run_check(number: String, config: Option<PathBuf>) -> Result<()> {
    if number.trim().is_empty() {
        bail!("Vui lòng nhập một số.");
    }

    let config = config_manager(config).load()?;
    match Engine::default().quick_check(&number, &config)? {
        QuickCheckResult::Valid { score } => println!("✅ Hợp lệ. Điểm: {:.2}", score),
        QuickCheckResult::Invalid { reason } => println!("❌ Không hợp lệ: {}", reason),
    }
    Ok(())
}

fn run_init_config(config: Option<PathBuf>, force: bool) -> Result<()> {
    let manager = config_manager(config);
    if manager.path().exists() && !force {
        bail!(
            "File cấu hình '{}' đã tồn tại, dùng --force để ghi đè",
            manager.path().display()
        );
    }

    manager.reset()?;
    println!("Đã tạo file cấu hình: {}", manager.path().display());
    Ok(())
}

fn main() -> Result<()> {
    // 初始化日志
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            input,
            config,
            output,
            top,
        } => run_analyze(input, config, output, top),
        Commands::Check { number, config } => run_check(number, config),
        Commands::InitConfig { config, force } => run_init_config(config, force),
    }
}
