//! スタック出力

use super::ResourceId;
use serde::{Deserialize, Serialize};

/// 参照可能な属性
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    /// ロードバランサーのパブリックDNS名
    DnsName,
}

/// リソース属性への参照（値はプロビジョニング後に解決される）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeRef {
    pub resource: ResourceId,
    pub attribute: Attribute,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputBinding {
    pub name: String,
    pub value: AttributeRef,

    /// クロススタック参照用のエクスポート名
    pub export_name: Option<String>,
}
