//! ネットワークコンテキスト
//!
//! 外部（VPC構築側）から渡される仮想ネットワークの記述。
//! このクレートでは生成せず、参照のみ行う。

use crate::error::StackError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// サブネット階層
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubnetTier {
    /// インターネットから到達可能
    Public,
    /// NAT経由でのみ外部に出られる
    Private,
    /// 外部との経路なし
    Isolated,
}

impl fmt::Display for SubnetTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubnetTier::Public => write!(f, "public"),
            SubnetTier::Private => write!(f, "private"),
            SubnetTier::Isolated => write!(f, "isolated"),
        }
    }
}

impl FromStr for SubnetTier {
    type Err = StackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "public" => Ok(SubnetTier::Public),
            "private" | "private-with-nat" | "private_with_nat" => Ok(SubnetTier::Private),
            "isolated" | "private-isolated" | "private_isolated" => Ok(SubnetTier::Isolated),
            other => Err(StackError::InvalidTier(other.to_string())),
        }
    }
}

/// サブネット
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subnet {
    /// サブネットID（subnet-xxxx）
    pub id: String,

    /// アベイラビリティゾーン（ap-northeast-1a など）
    pub availability_zone: Option<String>,

    /// 階層
    pub tier: SubnetTier,
}

/// 仮想ネットワーク（VPC）の記述
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkContext {
    /// VPC ID
    pub vpc_id: String,

    /// 宣言順のサブネット一覧
    pub subnets: Vec<Subnet>,
}

impl NetworkContext {
    pub fn new(vpc_id: impl Into<String>) -> Self {
        Self {
            vpc_id: vpc_id.into(),
            subnets: Vec::new(),
        }
    }

    pub fn with_subnet(
        mut self,
        id: impl Into<String>,
        tier: SubnetTier,
        availability_zone: Option<&str>,
    ) -> Self {
        self.subnets.push(Subnet {
            id: id.into(),
            availability_zone: availability_zone.map(str::to_string),
            tier,
        });
        self
    }

    /// 指定階層のサブネットを宣言順で返す
    pub fn subnets_in(&self, tier: SubnetTier) -> Vec<&Subnet> {
        self.subnets.iter().filter(|s| s.tier == tier).collect()
    }

    pub fn has_tier(&self, tier: SubnetTier) -> bool {
        self.subnets.iter().any(|s| s.tier == tier)
    }
}
