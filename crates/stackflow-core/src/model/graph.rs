//! リソースグラフ
//!
//! プロビジョニングエンジンに渡す宣言の集合。全て順序付きコレクションで保持するため、
//! 同じ入力からは常に同じシリアライズ結果が得られる。

use super::{
    AccessHost, InstancePool, LoadBalancer, NetworkContext, OutputBinding, Peer, ReachabilityRule,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// グラフ内で一意なリソース識別子
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(String);

impl ResourceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResourceId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// 宣言されたリソース
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Resource {
    AccessHost(AccessHost),
    LoadBalancer(LoadBalancer),
    InstancePool(InstancePool),
}

impl Resource {
    pub fn id(&self) -> &ResourceId {
        match self {
            Resource::AccessHost(r) => &r.id,
            Resource::LoadBalancer(r) => &r.id,
            Resource::InstancePool(r) => &r.id,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Resource::AccessHost(_) => "access_host",
            Resource::LoadBalancer(_) => "load_balancer",
            Resource::InstancePool(_) => "instance_pool",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceGraph {
    pub stack_name: String,

    pub description: Option<String>,

    pub network: NetworkContext,

    /// 全リソースに付与するタグ（キー順）
    #[serde(default)]
    pub tags: BTreeMap<String, String>,

    resources: Vec<Resource>,

    rules: Vec<ReachabilityRule>,

    outputs: Vec<OutputBinding>,
}

impl ResourceGraph {
    pub fn new(stack_name: impl Into<String>, network: NetworkContext) -> Self {
        Self {
            stack_name: stack_name.into(),
            description: None,
            network,
            tags: BTreeMap::new(),
            resources: Vec::new(),
            rules: Vec::new(),
            outputs: Vec::new(),
        }
    }

    /// リソースを追加し、その ID を返す
    pub fn declare(&mut self, resource: Resource) -> ResourceId {
        let id = resource.id().clone();
        tracing::debug!(kind = resource.kind(), id = %id, "Declared resource");
        self.resources.push(resource);
        id
    }

    pub fn allow(&mut self, rule: ReachabilityRule) {
        tracing::debug!(
            source = %rule.source,
            destination = %rule.destination,
            port = %rule.port,
            "Declared reachability rule"
        );
        self.rules.push(rule);
    }

    pub fn output(&mut self, binding: OutputBinding) {
        self.outputs.push(binding);
    }

    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    pub fn rules(&self) -> &[ReachabilityRule] {
        &self.rules
    }

    pub fn outputs(&self) -> &[OutputBinding] {
        &self.outputs
    }

    pub fn get(&self, id: &ResourceId) -> Option<&Resource> {
        self.resources.iter().find(|r| r.id() == id)
    }

    pub fn access_hosts(&self) -> impl Iterator<Item = &AccessHost> {
        self.resources.iter().filter_map(|r| match r {
            Resource::AccessHost(h) => Some(h),
            _ => None,
        })
    }

    pub fn load_balancers(&self) -> impl Iterator<Item = &LoadBalancer> {
        self.resources.iter().filter_map(|r| match r {
            Resource::LoadBalancer(lb) => Some(lb),
            _ => None,
        })
    }

    pub fn instance_pools(&self) -> impl Iterator<Item = &InstancePool> {
        self.resources.iter().filter_map(|r| match r {
            Resource::InstancePool(p) => Some(p),
            _ => None,
        })
    }

    pub fn access_host(&self) -> Option<&AccessHost> {
        self.access_hosts().next()
    }

    pub fn load_balancer(&self) -> Option<&LoadBalancer> {
        self.load_balancers().next()
    }

    pub fn instance_pool(&self) -> Option<&InstancePool> {
        self.instance_pools().next()
    }

    /// destination への許可ルール
    pub fn rules_into(&self, destination: &ResourceId) -> Vec<&ReachabilityRule> {
        self.rules
            .iter()
            .filter(|r| &r.destination == destination)
            .collect()
    }

    /// source から出ていく許可ルール（リソース間のみ）
    pub fn rules_from(&self, source: &ResourceId) -> Vec<&ReachabilityRule> {
        self.rules
            .iter()
            .filter(|r| matches!(&r.source, Peer::Resource(id) if id == source))
            .collect()
    }
}
