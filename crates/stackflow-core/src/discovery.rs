//! プロジェクトルートとスタック定義ファイルの発見

use crate::error::{Result, StackError};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub const STACK_FILE: &str = "stack.kdl";
pub const LOCAL_STACK_FILE: &str = "stack.local.kdl";
pub const STACK_DIR: &str = ".stackflow";

/// ルートファイルの候補（優先順）
pub const STACK_FILES: [&str; 2] = [STACK_FILE, ".stack.kdl"];

/// ローカルオーバーライドの候補（優先順）
pub const LOCAL_STACK_FILES: [&str; 2] = [LOCAL_STACK_FILE, ".stack.local.kdl"];

/// 発見されたファイル群
#[derive(Debug, Clone, Default)]
pub struct DiscoveredFiles {
    /// ルートファイル (stack.kdl)
    pub root: Option<PathBuf>,
    /// ローカルオーバーライドファイル (stack.local.kdl)
    pub local_override: Option<PathBuf>,
}

fn first_existing(dir: &Path, names: &[&str]) -> Option<PathBuf> {
    names.iter().map(|name| dir.join(name)).find(|path| path.exists())
}

fn has_stack_file(dir: &Path) -> bool {
    [dir.to_path_buf(), dir.join(STACK_DIR)].iter().any(|d| {
        first_existing(d, &STACK_FILES).is_some()
            || first_existing(d, &LOCAL_STACK_FILES).is_some()
    })
}

/// ローカルオーバーライドのファイル名かどうか
pub fn is_local_override(file: &Path) -> bool {
    file.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| LOCAL_STACK_FILES.contains(&n))
}

/// スタック定義ファイルの位置からプロジェクトルートを求める
///
/// `.stackflow/` 内のファイルはその親ディレクトリがルートになる。
pub fn project_root_of(stack_file: &Path) -> PathBuf {
    let dir = match stack_file.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    if dir.file_name().is_some_and(|name| name == STACK_DIR)
        && let Some(parent) = dir.parent()
    {
        return parent.to_path_buf();
    }
    dir.to_path_buf()
}

/// プロジェクトルートを検出
///
/// 以下の優先順位で検索:
/// 1. 環境変数 STACKFLOW_PROJECT_ROOT
/// 2. カレントディレクトリから上に向かって以下を探す:
///    - stack.kdl, .stack.kdl, stack.local.kdl, .stack.local.kdl
///    - .stackflow/ 内の同名ファイル
#[tracing::instrument]
pub fn find_project_root() -> Result<PathBuf> {
    if let Ok(root) = std::env::var("STACKFLOW_PROJECT_ROOT") {
        let path = PathBuf::from(&root);
        debug!(env_root = %root, "Checking STACKFLOW_PROJECT_ROOT");
        if has_stack_file(&path) {
            info!(project_root = %path.display(), "Found project root from environment variable");
            return Ok(path);
        }
    }

    let start_dir = std::env::current_dir()?;
    find_project_root_from(&start_dir)
}

/// 指定ディレクトリから上に向かってプロジェクトルートを探す
pub fn find_project_root_from(start_dir: &Path) -> Result<PathBuf> {
    let mut current = start_dir.to_path_buf();
    debug!(start_dir = %start_dir.display(), "Searching for project root");

    loop {
        if has_stack_file(&current) {
            info!(project_root = %current.display(), "Found project root");
            return Ok(current);
        }

        if !current.pop() {
            break;
        }
    }

    warn!(start_dir = %start_dir.display(), "Project root not found");
    Err(StackError::ProjectRootNotFound(start_dir.to_path_buf()))
}

/// プロジェクトルートからファイルを発見
pub fn discover_files(project_root: &Path) -> DiscoveredFiles {
    let mut discovered = DiscoveredFiles::default();

    let candidates = [project_root.to_path_buf(), project_root.join(STACK_DIR)];
    for dir in &candidates {
        if discovered.root.is_none()
            && let Some(root_file) = first_existing(dir, &STACK_FILES)
        {
            debug!(file = %root_file.display(), "Found root file");
            discovered.root = Some(root_file);
        }

        if discovered.local_override.is_none()
            && let Some(local_file) = first_existing(dir, &LOCAL_STACK_FILES)
        {
            debug!(file = %local_file.display(), "Found local override file");
            discovered.local_override = Some(local_file);
        }
    }

    discovered
}

/// 指定されたスタック定義ファイルを起点にファイルを決める
///
/// ローカルオーバーライドを直接指定した場合は、同じプロジェクトの
/// ルートファイルに重ねる。それ以外は同じディレクトリのオーバーライドだけを重ねる。
pub fn discover_files_for(stack_file: &Path) -> DiscoveredFiles {
    if is_local_override(stack_file) {
        let root = discover_files(&project_root_of(stack_file)).root;
        return DiscoveredFiles {
            root,
            local_override: Some(stack_file.to_path_buf()),
        };
    }

    let local_override = stack_file
        .parent()
        .and_then(|dir| first_existing(dir, &LOCAL_STACK_FILES));
    DiscoveredFiles {
        root: Some(stack_file.to_path_buf()),
        local_override,
    }
}
