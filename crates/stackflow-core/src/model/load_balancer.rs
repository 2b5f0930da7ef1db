//! ロードバランサー、リスナー、ターゲットグループ

use super::ResourceId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// アプリケーション層のプロトコル
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ApplicationProtocol {
    Http,
    Https,
}

impl fmt::Display for ApplicationProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApplicationProtocol::Http => write!(f, "HTTP"),
            ApplicationProtocol::Https => write!(f, "HTTPS"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadBalancer {
    pub id: ResourceId,

    /// ロードバランサー名
    pub name: String,

    /// インターネット向けかどうか
    pub internet_facing: bool,

    pub listeners: Vec<Listener>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listener {
    pub id: ResourceId,
    pub port: u16,
    pub protocol: ApplicationProtocol,

    /// true の場合、全アドレスからの接続を許可する
    pub open: bool,

    pub target_group: TargetGroup,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetGroup {
    pub id: ResourceId,
    pub port: u16,
    pub protocol: ApplicationProtocol,

    /// 転送先のリソース（インスタンスプールなど）
    pub targets: Vec<ResourceId>,
}
