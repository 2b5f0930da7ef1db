//! network ノードのパース

use super::{first_string, property_string};
use crate::error::{Result, StackError};
use crate::model::{NetworkContext, Subnet, SubnetTier};
use kdl::KdlNode;

/// network ノードをパース
///
/// ```kdl
/// network "vpc-0123" {
///     subnet "subnet-a" tier="public" az="ap-northeast-1a"
///     subnet "subnet-b" tier="private" az="ap-northeast-1a"
/// }
/// ```
pub fn parse_network(node: &KdlNode) -> Result<NetworkContext> {
    let vpc_id = first_string(node)
        .or_else(|| property_string(node, &["id", "vpc-id", "vpc_id"]))
        .ok_or_else(|| StackError::InvalidConfig("network requires a VPC id".to_string()))?;

    let mut network = NetworkContext::new(vpc_id);

    if let Some(children) = node.children() {
        for child in children.nodes() {
            match child.name().value() {
                "subnet" => {
                    network.subnets.push(parse_subnet(child, None)?);
                }
                // public "subnet-a" az="..." の省略形
                tier @ ("public" | "private" | "isolated") => {
                    let tier: SubnetTier = tier.parse()?;
                    network.subnets.push(parse_subnet(child, Some(tier))?);
                }
                other => {
                    tracing::warn!(node = other, "Unknown node in network block, skipped");
                }
            }
        }
    }

    Ok(network)
}

fn parse_subnet(node: &KdlNode, tier: Option<SubnetTier>) -> Result<Subnet> {
    let id = first_string(node)
        .ok_or_else(|| StackError::InvalidConfig("subnet requires an id".to_string()))?;

    let tier = match tier {
        Some(tier) => tier,
        None => property_string(node, &["tier", "type"])
            .ok_or_else(|| {
                StackError::InvalidConfig(format!("subnet '{}' requires tier=\"...\"", id))
            })?
            .parse()?,
    };

    Ok(Subnet {
        id,
        availability_zone: property_string(
            node,
            &["az", "availability-zone", "availability_zone"],
        ),
        tier,
    })
}
