//! 到達性ルール（セキュリティグループのインバウンド許可）

use super::ResourceId;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IpProtocol {
    Tcp,
    Udp,
}

impl fmt::Display for IpProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IpProtocol::Tcp => write!(f, "tcp"),
            IpProtocol::Udp => write!(f, "udp"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Port {
    pub protocol: IpProtocol,
    pub number: u16,
}

impl Port {
    pub fn tcp(number: u16) -> Self {
        Self {
            protocol: IpProtocol::Tcp,
            number,
        }
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.protocol, self.number)
    }
}

/// 通信元
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "resource", rename_all = "snake_case")]
pub enum Peer {
    /// 0.0.0.0/0
    AnyIpv4,
    Resource(ResourceId),
}

impl fmt::Display for Peer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Peer::AnyIpv4 => write!(f, "0.0.0.0/0"),
            Peer::Resource(id) => write!(f, "{}", id),
        }
    }
}

/// source から destination への一方向の許可
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReachabilityRule {
    pub source: Peer,
    pub destination: ResourceId,
    pub port: Port,
    pub description: String,
}

impl ReachabilityRule {
    pub fn from_any_ipv4(
        destination: &ResourceId,
        port: Port,
        description: impl Into<String>,
    ) -> Self {
        Self {
            source: Peer::AnyIpv4,
            destination: destination.clone(),
            port,
            description: description.into(),
        }
    }

    pub fn between(
        source: &ResourceId,
        destination: &ResourceId,
        port: Port,
        description: impl Into<String>,
    ) -> Self {
        Self {
            source: Peer::Resource(source.clone()),
            destination: destination.clone(),
            port,
            description: description.into(),
        }
    }
}
