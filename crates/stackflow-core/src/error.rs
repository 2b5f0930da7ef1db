use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StackError {
    #[error("KDLパースエラー: {0}")]
    KdlParse(#[from] kdl::KdlError),

    #[error("ファイル読み込みエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("IO エラー: {path}\n理由: {message}")]
    IoError { path: PathBuf, message: String },

    #[error("無効な設定: {0}")]
    InvalidConfig(String),

    #[error("不明なサブネット階層: {0} (public, private, isolated のいずれかを指定してください)")]
    InvalidTier(String),

    #[error("network ノードが定義されていません\nヒント: stack.kdl に network \"vpc-xxxx\" {{ ... }} を追加してください")]
    MissingNetwork,

    #[error(
        "プロジェクトルートが見つかりません\n探索開始位置: {0}\nヒント: stack.kdl ファイルを含むディレクトリで実行してください"
    )]
    ProjectRootNotFound(PathBuf),
}

pub type Result<T> = std::result::Result<T, StackError>;
