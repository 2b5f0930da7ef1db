//! 統合ローダー
//!
//! ファイル発見、パース、ブートスクリプト読み込みを統合

use crate::discovery::{
    DiscoveredFiles, discover_files, discover_files_for, project_root_of,
};
use crate::error::{Result, StackError};
use crate::model::{NetworkContext, StackConfig, TopologyOptions};
use crate::parser::parse_kdl_string;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// ロード済みのプロジェクト
#[derive(Debug, Clone)]
pub struct LoadedProject {
    pub root: PathBuf,
    pub config: StackConfig,
    pub options: TopologyOptions,
}

impl LoadedProject {
    /// network 定義（未定義ならエラー）
    pub fn network(&self) -> Result<&NetworkContext> {
        self.config.network.as_ref().ok_or(StackError::MissingNetwork)
    }
}

/// 指定されたルートディレクトリからプロジェクトをロード
///
/// 読み込み順序: stack.kdl → stack.local.kdl
#[instrument(skip(project_root), fields(project_root = %project_root.display()))]
pub fn load_project_from_root(project_root: &Path) -> Result<LoadedProject> {
    debug!("Step 1: Discovering files");
    let discovered = discover_files(project_root);
    load_discovered(project_root, discovered)
}

/// 指定されたスタック定義ファイルからプロジェクトをロード
///
/// そのファイル自体をルートファイルとして読み、ブートスクリプトは
/// ファイルの置かれたプロジェクトルートからの相対パスで解決する。
#[instrument(skip(stack_file), fields(stack_file = %stack_file.display()))]
pub fn load_project_from_file(stack_file: &Path) -> Result<LoadedProject> {
    let project_root = project_root_of(stack_file);
    let project_root = project_root.canonicalize().unwrap_or(project_root);
    debug!(project_root = %project_root.display(), "Step 1: Resolving files");
    let discovered = discover_files_for(stack_file);
    load_discovered(&project_root, discovered)
}

fn load_discovered(project_root: &Path, discovered: DiscoveredFiles) -> Result<LoadedProject> {
    // ローカルファイルしか無い場合はそれをルートとして扱う
    let (root_file, local_override) = match (discovered.root, discovered.local_override) {
        (Some(root), local) => (root, local),
        (None, Some(local)) => (local, None),
        (None, None) => return Err(StackError::ProjectRootNotFound(project_root.to_path_buf())),
    };

    debug!(file = %root_file.display(), "Step 2: Parsing KDL");
    let default_name = project_root
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unnamed")
        .to_string();
    let mut config = parse_kdl_string(&read_file(&root_file)?, default_name)?;

    if let Some(local_file) = &local_override {
        debug!(file = %local_file.display(), "Applying local override");
        let local = parse_kdl_string(&read_file(local_file)?, config.name.clone())?;
        merge_config(&mut config, local);
    }

    debug!("Step 3: Reading user data");
    let user_data_path = resolve_path(project_root, &config.topology.user_data_path());
    let user_data = read_file(&user_data_path)?;

    if config.network.is_none() {
        return Err(StackError::MissingNetwork);
    }

    let options = TopologyOptions::from_section(&config.name, &config.topology, user_data);
    info!(
        stack = %config.name,
        user_data_bytes = options.user_data.len(),
        "Project loaded successfully"
    );

    Ok(LoadedProject {
        root: project_root.to_path_buf(),
        config,
        options,
    })
}

/// ローカルオーバーライドをマージ（network は置き換え、topology は値単位で上書き）
fn merge_config(base: &mut StackConfig, local: StackConfig) {
    base.name = local.name;
    if local.network.is_some() {
        base.network = local.network;
    }
    base.topology.merge(local.topology);
}

fn resolve_path(project_root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        project_root.join(path)
    }
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| StackError::IoError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
