//! KDLパーサー
//!
//! StackFlowのKDL設定ファイルをパースします。
//! 各ノードタイプのパース処理はモジュールに分離されています。

mod network;
mod topology;

pub use network::parse_network;
pub use topology::parse_topology;

use crate::error::{Result, StackError};
use crate::model::StackConfig;
use kdl::{KdlDocument, KdlNode};
use std::fs;
use std::path::Path;

/// KDLファイルをパースしてStackConfigを生成
pub fn parse_kdl_file<P: AsRef<Path>>(path: P) -> Result<StackConfig> {
    let content = fs::read_to_string(path.as_ref())?;
    let name = path
        .as_ref()
        .parent()
        .and_then(|p| p.file_name())
        .and_then(|n| n.to_str())
        .unwrap_or("unnamed")
        .to_string();
    parse_kdl_string(&content, name)
}

/// KDL文字列をパース
pub fn parse_kdl_string(content: &str, default_name: String) -> Result<StackConfig> {
    let doc: KdlDocument = content.parse()?;

    let mut config = StackConfig {
        name: default_name,
        ..Default::default()
    };

    for node in doc.nodes() {
        match node.name().value() {
            "project" | "stack" => {
                if let Some(name) = first_string(node) {
                    config.name = name;
                }
            }
            "network" | "vpc" => {
                if config.network.is_some() {
                    return Err(StackError::InvalidConfig(
                        "network は1つだけ定義できます".to_string(),
                    ));
                }
                config.network = Some(parse_network(node)?);
            }
            "topology" => {
                // 複数回書かれた場合は後勝ちでマージ
                let section = parse_topology(node)?;
                config.topology.merge(section);
            }
            other => {
                tracing::debug!(node = other, "Skipping unknown node");
            }
        }
    }

    Ok(config)
}

/// 最初の位置引数を文字列として取得
pub(crate) fn first_string(node: &KdlNode) -> Option<String> {
    node.entries()
        .iter()
        .find(|e| e.name().is_none())
        .and_then(|e| e.value().as_string())
        .map(|s| s.to_string())
}

/// 名前付きプロパティ（key="value"）を文字列として取得
pub(crate) fn property_string(node: &KdlNode, keys: &[&str]) -> Option<String> {
    node.entries()
        .iter()
        .find(|e| e.name().is_some_and(|n| keys.contains(&n.value())))
        .and_then(|e| e.value().as_string())
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests;
