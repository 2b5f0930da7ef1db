mod commands;

use clap::{Parser, Subcommand};
use colored::Colorize;
use stackflow_cloud::{DEFAULT_OUT_DIR, TemplateFormat};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "stackflow")]
#[command(about = "踏み台・ALB・固定サイズのASGを、KDLから一枚のテンプレートに。", long_about = None)]
struct Cli {
    #[command(flatten)]
    location: commands::Location,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// CloudFormationテンプレートを生成
    Synth {
        /// 出力形式 (yaml, json)
        #[arg(short, long, default_value = "yaml")]
        format: TemplateFormat,
        /// クラウドアセンブリの出力先（値を省略すると stack.out、指定しなければ標準出力）
        #[arg(short, long, num_args = 0..=1, default_missing_value = DEFAULT_OUT_DIR)]
        output: Option<PathBuf>,
    },
    /// 宣言されたリソースグラフをJSONで表示
    Graph,
    /// 設定を検証
    Validate,
    /// スタック定義の雛形を作成
    Init {
        /// グローバル設定 (~/.config/stackflow) に作成
        #[arg(long)]
        global: bool,
        /// 既存ファイルを上書き
        #[arg(long)]
        force: bool,
    },
    /// バージョン情報を表示
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // stdout はテンプレート出力に使うため、ログは stderr へ
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    match cli.command {
        Commands::Version => {
            println!("stackflow {}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Init { global, force } => {
            commands::init::handle(&cli.location, global, force)?;
        }
        Commands::Validate => {
            commands::validate::handle(&cli.location)?;
        }
        Commands::Graph => {
            let project = commands::load(&cli.location)?;
            commands::graph::handle(&project)?;
        }
        Commands::Synth { format, output } => {
            let project = commands::load(&cli.location)?;
            if let Err(e) = commands::synth::handle(&project, format, output.as_deref()).await {
                eprintln!("{}", "✗ テンプレート生成に失敗しました".red().bold());
                return Err(e);
            }
        }
    }

    Ok(())
}
