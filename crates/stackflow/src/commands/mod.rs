pub mod graph;
pub mod init;
pub mod synth;
pub mod validate;

use clap::Args;
use colored::Colorize;
use stackflow_core::{LoadedProject, StackError};
use std::path::PathBuf;

/// プロジェクトの指定方法（全サブコマンド共通）
#[derive(Args, Debug, Clone, Default)]
pub struct Location {
    /// スタック定義ファイルを直接指定
    #[arg(long, global = true, env = "STACK_CONFIG_PATH")]
    pub file: Option<PathBuf>,

    /// プロジェクトルート（stack.kdl のあるディレクトリ）
    #[arg(long, global = true, env = "STACKFLOW_PROJECT_ROOT")]
    pub project: Option<PathBuf>,
}

/// ロード対象
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectSource {
    Root(PathBuf),
    File(PathBuf),
}

/// ロード対象を決定
///
/// 優先順位: --file / STACK_CONFIG_PATH → --project / STACKFLOW_PROJECT_ROOT →
/// カレントディレクトリから上位へ探索 → stackflow-config の検索（グローバル設定）
pub fn resolve_source(location: &Location) -> Result<ProjectSource, StackError> {
    if let Some(file) = &location.file {
        return Ok(ProjectSource::File(file.clone()));
    }
    if let Some(root) = &location.project {
        return Ok(ProjectSource::Root(root.clone()));
    }

    match stackflow_core::find_project_root() {
        Ok(root) => Ok(ProjectSource::Root(root)),
        Err(StackError::ProjectRootNotFound(dir)) => {
            let file = stackflow_config::find_stack_file()
                .map_err(|_| StackError::ProjectRootNotFound(dir))?;
            tracing::debug!(path = %file.display(), "Using stack file from config search");
            Ok(ProjectSource::File(file))
        }
        Err(e) => Err(e),
    }
}

/// プロジェクトをロード（失敗時はエラーを表示）
pub fn load(location: &Location) -> anyhow::Result<LoadedProject> {
    let source = match resolve_source(location) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("{}", "✗ プロジェクトルートが見つかりません".red().bold());
            eprintln!("  {}", e);
            eprintln!();
            eprintln!("stack.kdl が存在するディレクトリで実行してください");
            return Err(e.into());
        }
    };

    let loaded = match &source {
        ProjectSource::Root(root) => stackflow_core::load_project_from_root(root),
        ProjectSource::File(file) => stackflow_core::load_project_from_file(file),
    };
    loaded.map_err(|e| {
        eprintln!("{}", "✗ 設定エラー".red().bold());
        eprintln!("  {}", e);
        e.into()
    })
}

/// init の書き込み先（--project、無ければカレントディレクトリ）
pub fn target_root(location: &Location) -> std::io::Result<PathBuf> {
    match &location.project {
        Some(root) => Ok(root.clone()),
        None => std::env::current_dir(),
    }
}
