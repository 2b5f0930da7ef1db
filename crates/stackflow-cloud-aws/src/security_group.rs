//! Security groups and reachability rules

use crate::context::{SecurityGroupRef, SynthContext};
use crate::intrinsic::tags;
use crate::logical_id::logical_id;
use serde_json::{Value, json};
use stackflow_cloud::{Result, TemplateResource};
use stackflow_core::{Peer, Port, ReachabilityRule, ResourceId};

pub const SECURITY_GROUP_TYPE: &str = "AWS::EC2::SecurityGroup";
pub const INGRESS_TYPE: &str = "AWS::EC2::SecurityGroupIngress";
pub const EGRESS_TYPE: &str = "AWS::EC2::SecurityGroupEgress";

const ANY_IPV4: &str = "0.0.0.0/0";

/// Egress to everywhere
fn allow_all_egress() -> Value {
    json!({
        "CidrIp": ANY_IPV4,
        "Description": "Allow all outbound traffic by default",
        "IpProtocol": "-1"
    })
}

/// Placeholder that matches no traffic, so the group starts with closed egress
fn disallow_all_egress() -> Value {
    json!({
        "CidrIp": "255.255.255.255/32",
        "Description": "Disallow all traffic",
        "FromPort": 252,
        "IpProtocol": "icmp",
        "ToPort": 86
    })
}

/// Declare a security group for `owner` and register it in the context
pub fn declare_security_group(
    ctx: &mut SynthContext<'_>,
    owner: &ResourceId,
    suffix: &str,
    description: String,
    allow_all_outbound: bool,
) -> Result<String> {
    let id = logical_id(&[owner.as_str(), suffix])?;
    let egress = if allow_all_outbound {
        allow_all_egress()
    } else {
        disallow_all_egress()
    };

    let name = format!("{}/{}", ctx.path(owner), suffix);
    let resource = TemplateResource::new(SECURITY_GROUP_TYPE)
        .with_property("GroupDescription", json!(description))
        .with_property("SecurityGroupEgress", json!([egress]))
        .with_property("SecurityGroupIngress", json!([]))
        .with_property("Tags", tags(&ctx.graph.tags, &[("Name", name.as_str())]))
        .with_property("VpcId", ctx.vpc_id());
    ctx.template.add_resource(&id, resource);
    ctx.register_security_group(
        owner,
        SecurityGroupRef {
            logical_id: id.clone(),
            allow_all_outbound,
        },
    );
    Ok(id)
}

fn port_range(port: &Port) -> (String, u16, u16) {
    (port.protocol.to_string(), port.number, port.number)
}

fn same_ingress(a: &Value, b: &Value) -> bool {
    ["CidrIp", "IpProtocol", "FromPort", "ToPort"]
        .iter()
        .all(|key| a.get(key) == b.get(key))
}

/// Append an inline ingress entry; an entry for the same peer and port is kept as is
fn push_inline_ingress(ctx: &mut SynthContext<'_>, group: &str, entry: Value) {
    if let Some(resource) = ctx.template.resource_mut(group)
        && let Some(Value::Array(ingress)) = resource.properties.get_mut("SecurityGroupIngress")
    {
        if ingress.iter().any(|existing| same_ingress(existing, &entry)) {
            tracing::debug!(group = %group, "Skipped duplicate ingress");
            return;
        }
        ingress.push(entry);
    }
}

/// Inline ingress from anywhere on the destination's group
pub fn allow_from_anyone(
    ctx: &mut SynthContext<'_>,
    destination: &ResourceId,
    port: &Port,
    description: &str,
) -> Result<()> {
    let group = ctx.security_group_of(destination)?.logical_id.clone();
    let (protocol, from, to) = port_range(port);
    push_inline_ingress(
        ctx,
        &group,
        json!({
            "CidrIp": ANY_IPV4,
            "Description": description,
            "FromPort": from,
            "IpProtocol": protocol,
            "ToPort": to
        }),
    );
    Ok(())
}

/// Render one reachability rule
///
/// Group-to-group rules become standalone ingress (and egress, when the
/// source group does not already allow all outbound traffic) resources.
pub fn render_rule(ctx: &mut SynthContext<'_>, rule: &ReachabilityRule) -> Result<()> {
    let source = match &rule.source {
        Peer::AnyIpv4 => {
            return allow_from_anyone(ctx, &rule.destination, &rule.port, &rule.description);
        }
        Peer::Resource(id) => ctx.security_group_of(id)?.clone(),
    };
    let destination = ctx.security_group_of(&rule.destination)?.clone();
    let (protocol, from, to) = port_range(&rule.port);
    let port = rule.port.number.to_string();

    let ingress_id = logical_id(&[
        destination.logical_id.as_str(),
        "from",
        source.logical_id.as_str(),
        port.as_str(),
    ])?;
    let ingress = TemplateResource::new(INGRESS_TYPE)
        .with_property("Description", json!(rule.description))
        .with_property("FromPort", json!(from))
        .with_property("GroupId", destination.group_id())
        .with_property("IpProtocol", json!(protocol))
        .with_property("SourceSecurityGroupId", source.group_id())
        .with_property("ToPort", json!(to));
    ctx.template.add_resource(ingress_id, ingress);

    if !source.allow_all_outbound {
        let egress_id = logical_id(&[
            source.logical_id.as_str(),
            "to",
            destination.logical_id.as_str(),
            port.as_str(),
        ])?;
        let egress = TemplateResource::new(EGRESS_TYPE)
            .with_property("Description", json!(rule.description))
            .with_property("DestinationSecurityGroupId", destination.group_id())
            .with_property("FromPort", json!(from))
            .with_property("GroupId", source.group_id())
            .with_property("IpProtocol", json!(protocol))
            .with_property("ToPort", json!(to));
        ctx.template.add_resource(egress_id, egress);
    }

    tracing::debug!(
        source = %rule.source,
        destination = %rule.destination,
        port = %rule.port,
        "Rendered reachability rule"
    );
    Ok(())
}
