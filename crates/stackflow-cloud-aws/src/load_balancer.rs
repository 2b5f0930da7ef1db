//! Application load balancers, listeners and target groups

use crate::context::SynthContext;
use crate::intrinsic::{get_att, ref_, tags};
use crate::logical_id::logical_id;
use crate::security_group::{allow_from_anyone, declare_security_group};
use serde_json::json;
use stackflow_cloud::{Result, TemplateResource};
use stackflow_core::{LoadBalancer, Port, SubnetTier};

pub const LOAD_BALANCER_TYPE: &str = "AWS::ElasticLoadBalancingV2::LoadBalancer";
pub const LISTENER_TYPE: &str = "AWS::ElasticLoadBalancingV2::Listener";
pub const TARGET_GROUP_TYPE: &str = "AWS::ElasticLoadBalancingV2::TargetGroup";

pub fn render_load_balancer(ctx: &mut SynthContext<'_>, lb: &LoadBalancer) -> Result<()> {
    let lb_id = logical_id(&[lb.id.as_str()])?;
    let (tier, scheme) = if lb.internet_facing {
        (SubnetTier::Public, "internet-facing")
    } else {
        (SubnetTier::Private, "internal")
    };
    let subnet_ids: Vec<&str> = ctx
        .subnets(tier, &lb.id)?
        .into_iter()
        .map(|s| s.id.as_str())
        .collect();

    let description = format!(
        "Automatically created Security Group for ELB {}{}",
        ctx.graph.stack_name, lb.id
    );
    let group_id = declare_security_group(ctx, &lb.id, "SecurityGroup", description, false)?;

    let mut balancer = TemplateResource::new(LOAD_BALANCER_TYPE)
        .with_property(
            "LoadBalancerAttributes",
            json!([{ "Key": "deletion_protection.enabled", "Value": "false" }]),
        )
        .with_property("Name", json!(lb.name))
        .with_property("Scheme", json!(scheme))
        .with_property("SecurityGroups", json!([get_att(&group_id, "GroupId")]))
        .with_property("Subnets", json!(subnet_ids))
        .with_property("Type", json!("application"));
    if !ctx.graph.tags.is_empty() {
        balancer = balancer.with_property("Tags", tags(&ctx.graph.tags, &[]));
    }
    ctx.template.add_resource(&lb_id, balancer);
    ctx.register(&lb.id, &lb_id);

    for listener in &lb.listeners {
        let listener_id = logical_id(&[lb.id.as_str(), listener.id.as_str()])?;
        let target_group = &listener.target_group;
        let target_group_id = logical_id(&[
            lb.id.as_str(),
            listener.id.as_str(),
            target_group.id.as_str(),
            "Group",
        ])?;

        let mut group = TemplateResource::new(TARGET_GROUP_TYPE)
            .with_property("Port", json!(target_group.port))
            .with_property("Protocol", json!(target_group.protocol.to_string()))
            .with_property("TargetType", json!("instance"))
            .with_property("VpcId", ctx.vpc_id());
        if !ctx.graph.tags.is_empty() {
            group = group.with_property("Tags", tags(&ctx.graph.tags, &[]));
        }
        ctx.template.add_resource(&target_group_id, group);
        for target in &target_group.targets {
            ctx.register_target(target, &target_group_id);
        }

        ctx.template.add_resource(
            &listener_id,
            TemplateResource::new(LISTENER_TYPE)
                .with_property(
                    "DefaultActions",
                    json!([{ "TargetGroupArn": ref_(&target_group_id), "Type": "forward" }]),
                )
                .with_property("LoadBalancerArn", ref_(&lb_id))
                .with_property("Port", json!(listener.port))
                .with_property("Protocol", json!(listener.protocol.to_string())),
        );

        tracing::debug!(
            lb = %lb.id,
            listener = %listener.id,
            port = listener.port,
            targets = target_group.targets.len(),
            "Rendered listener"
        );
    }
    Ok(())
}

/// Ingress for listeners declared `open`
///
/// Runs after the explicit rules so an identical explicit rule wins.
pub fn open_listeners(ctx: &mut SynthContext<'_>, lb: &LoadBalancer) -> Result<()> {
    for listener in lb.listeners.iter().filter(|l| l.open) {
        let description = format!("Allow from anyone on port {}", listener.port);
        allow_from_anyone(ctx, &lb.id, &Port::tcp(listener.port), &description)?;
    }
    Ok(())
}
