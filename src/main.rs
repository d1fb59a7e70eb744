//! 鉛筆生產規劃命令列工具

mod logging;
mod report;

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use plan_core::{Dataset, PlannerConfig, ProductionPlan};
use plan_optimizer::Planner;

#[derive(Parser)]
#[command(name = "pencil-plan", version, about = "鉛筆生產規劃：線性規劃求解與負荷評估")]
struct Cli {
    /// 資料集 JSON 檔案
    #[arg(long, short, global = true, env = "PENCIL_PLAN_DATA", default_value = "data.json")]
    data: PathBuf,

    /// 規劃器配置 JSON 檔案
    #[arg(long, short, global = true, env = "PENCIL_PLAN_CONFIG")]
    config: Option<PathBuf>,

    /// 以 JSON 輸出結果
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// 求解最大利潤的建議計劃
    Optimize,

    /// 評估指定的生產數量（what-if）
    Evaluate {
        /// 經濟款數量
        #[arg(long, default_value_t = 1000)]
        economy: u64,

        /// 豪華款數量
        #[arg(long, default_value_t = 1000)]
        deluxe: u64,
    },
}

fn main() -> anyhow::Result<()> {
    logging::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => PlannerConfig::default(),
    };
    let dataset = load_dataset(&cli.data)?;
    let planner = Planner::new(config);

    match cli.command {
        Command::Optimize => {
            let recommendation = planner
                .recommend(&dataset)
                .context("生產計劃求解失敗")?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&recommendation)?);
            } else {
                print!("{}", report::render_recommendation(&recommendation));
            }
        }
        Command::Evaluate { economy, deluxe } => {
            let plan = ProductionPlan::from_units(economy, deluxe);
            let evaluation = planner
                .evaluate(&dataset, &plan)
                .context("生產計劃評估失敗")?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&evaluation)?);
            } else {
                println!("=== 計劃評估: economy {} 支, deluxe {} 支 ===", economy, deluxe);
                print!("{}", report::render_evaluation(&evaluation));
            }
        }
    }

    Ok(())
}

fn load_dataset(path: &Path) -> anyhow::Result<Dataset> {
    let file = File::open(path).with_context(|| format!("無法開啟資料集 {}", path.display()))?;
    let dataset = Dataset::from_reader(BufReader::new(file))
        .with_context(|| format!("無法解析資料集 {}", path.display()))?;
    tracing::info!("已載入資料集: {}", path.display());
    Ok(dataset)
}

fn load_config(path: &Path) -> anyhow::Result<PlannerConfig> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("無法讀取配置 {}", path.display()))?;
    let config = PlannerConfig::from_json_str(&json)
        .with_context(|| format!("無法解析配置 {}", path.display()))?;
    Ok(config)
}
