//! Access hosts and instance pools

use crate::context::SynthContext;
use crate::intrinsic::{base64, ec2_assume_role_policy, get_att, propagated_tags, ref_, tags};
use crate::logical_id::logical_id;
use crate::security_group::declare_security_group;
use serde_json::{Value, json};
use stackflow_cloud::{Result, TemplateResource};
use stackflow_core::{AccessHost, InstancePool, ResourceId, VolumeAttachment};

pub const INSTANCE_TYPE: &str = "AWS::EC2::Instance";
pub const ROLE_TYPE: &str = "AWS::IAM::Role";
pub const POLICY_TYPE: &str = "AWS::IAM::Policy";
pub const INSTANCE_PROFILE_TYPE: &str = "AWS::IAM::InstanceProfile";
pub const LAUNCH_CONFIGURATION_TYPE: &str = "AWS::AutoScaling::LaunchConfiguration";
pub const AUTO_SCALING_GROUP_TYPE: &str = "AWS::AutoScaling::AutoScalingGroup";

/// Boot script of an access host
const ACCESS_HOST_USER_DATA: &str = "#!/bin/bash";

/// Actions needed to open SSM sessions on the access host
const SESSION_ACTIONS: [&str; 3] = [
    "ssmmessages:*",
    "ssm:UpdateInstanceInformation",
    "ec2messages:*",
];

/// Role plus instance profile; returns (role, profile) logical IDs
fn declare_instance_role(
    ctx: &mut SynthContext<'_>,
    owner: &ResourceId,
    prefix: &str,
) -> Result<(String, String)> {
    let role_id = logical_id(&[owner.as_str(), prefix, "Role"])?;
    let profile_id = logical_id(&[owner.as_str(), prefix, "Profile"])?;
    let name = ctx.path(owner);

    ctx.template.add_resource(
        &role_id,
        TemplateResource::new(ROLE_TYPE)
            .with_property("AssumeRolePolicyDocument", ec2_assume_role_policy())
            .with_property("Tags", tags(&ctx.graph.tags, &[("Name", name.as_str())])),
    );
    ctx.template.add_resource(
        &profile_id,
        TemplateResource::new(INSTANCE_PROFILE_TYPE)
            .with_property("Roles", json!([ref_(&role_id)])),
    );
    Ok((role_id, profile_id))
}

pub fn render_access_host(ctx: &mut SynthContext<'_>, host: &AccessHost) -> Result<()> {
    let instance_id = logical_id(&[host.id.as_str()])?;
    let subnet = ctx.subnets(host.subnet_tier, &host.id)?[0];
    let description = format!("{}/{}/InstanceSecurityGroup", ctx.graph.stack_name, host.id);

    let group_id =
        declare_security_group(ctx, &host.id, "InstanceSecurityGroup", description, true)?;
    let (role_id, profile_id) = declare_instance_role(ctx, &host.id, "Instance")?;

    let policy_id = logical_id(&[role_id.as_str(), "DefaultPolicy"])?;
    ctx.template.add_resource(
        &policy_id,
        TemplateResource::new(POLICY_TYPE)
            .with_property(
                "PolicyDocument",
                json!({
                    "Statement": [{
                        "Action": SESSION_ACTIONS,
                        "Effect": "Allow",
                        "Resource": "*"
                    }],
                    "Version": "2012-10-17"
                }),
            )
            .with_property("PolicyName", json!(policy_id))
            .with_property("Roles", json!([ref_(&role_id)])),
    );

    let image_id = ctx.image_id(&host.machine_image)?;
    let mut instance = TemplateResource::new(INSTANCE_TYPE)
        .with_property("IamInstanceProfile", ref_(&profile_id))
        .with_property("ImageId", image_id)
        .with_property("InstanceType", json!(host.instance_type))
        .with_property("KeyName", json!(host.key_name))
        .with_property("SecurityGroupIds", json!([get_att(&group_id, "GroupId")]))
        .with_property("SubnetId", json!(subnet.id))
        .with_property(
            "Tags",
            tags(&ctx.graph.tags, &[("Name", host.instance_name.as_str())]),
        )
        .with_property("UserData", base64(ACCESS_HOST_USER_DATA))
        .depends_on(&policy_id)
        .depends_on(&role_id);
    if let Some(az) = &subnet.availability_zone {
        instance = instance.with_property("AvailabilityZone", json!(az));
    }
    ctx.template.add_resource(&instance_id, instance);
    ctx.register(&host.id, &instance_id);

    tracing::debug!(id = %host.id, subnet = %subnet.id, "Rendered access host");
    Ok(())
}

fn block_device_mapping(attachment: &VolumeAttachment) -> Value {
    let mut ebs = serde_json::Map::new();
    if let Some(delete) = attachment.volume.delete_on_termination {
        ebs.insert("DeleteOnTermination".to_string(), json!(delete));
    }
    ebs.insert("VolumeSize".to_string(), json!(attachment.volume.size_gib));
    if let Some(volume_type) = attachment.volume.volume_type {
        ebs.insert("VolumeType".to_string(), json!(volume_type.as_str()));
    }
    json!({
        "DeviceName": attachment.device_name,
        "Ebs": ebs
    })
}

pub fn render_instance_pool(ctx: &mut SynthContext<'_>, pool: &InstancePool) -> Result<()> {
    let subnets = ctx.subnets(pool.subnet_tier, &pool.id)?;
    let subnet_ids: Vec<&str> = subnets.into_iter().map(|s| s.id.as_str()).collect();
    let description = format!("{}/{}/InstanceSecurityGroup", ctx.graph.stack_name, pool.id);

    let group_id =
        declare_security_group(ctx, &pool.id, "InstanceSecurityGroup", description, true)?;
    let (role_id, profile_id) = declare_instance_role(ctx, &pool.id, "Instance")?;

    let launch_config_id = logical_id(&[pool.id.as_str(), "LaunchConfig"])?;
    let image_id = ctx.image_id(&pool.machine_image)?;
    let block_devices: Vec<Value> = pool.block_devices.iter().map(block_device_mapping).collect();
    ctx.template.add_resource(
        &launch_config_id,
        TemplateResource::new(LAUNCH_CONFIGURATION_TYPE)
            .with_property("BlockDeviceMappings", json!(block_devices))
            .with_property("IamInstanceProfile", ref_(&profile_id))
            .with_property("ImageId", image_id)
            .with_property("InstanceType", json!(pool.instance_type))
            .with_property("KeyName", json!(pool.key_name))
            .with_property("SecurityGroups", json!([get_att(&group_id, "GroupId")]))
            .with_property("UserData", base64(pool.user_data.as_str()))
            .depends_on(&role_id),
    );

    let group_logical_id = logical_id(&[pool.id.as_str(), "ASG"])?;
    let name = ctx.path(&pool.id);
    let target_groups: Vec<Value> = ctx
        .target_groups_of(&pool.id)
        .iter()
        .map(|tg| ref_(tg))
        .collect();

    let mut group = TemplateResource::new(AUTO_SCALING_GROUP_TYPE)
        .with_property("DesiredCapacity", json!(pool.capacity.desired.to_string()))
        .with_property("LaunchConfigurationName", ref_(&launch_config_id))
        .with_property("MaxSize", json!(pool.capacity.max.to_string()))
        .with_property("MinSize", json!(pool.capacity.min.to_string()))
        .with_property("Tags", propagated_tags(&ctx.graph.tags, &[("Name", name.as_str())]))
        .with_property("VPCZoneIdentifier", json!(subnet_ids))
        .with_update_policy(json!({
            "AutoScalingScheduledAction": {
                "IgnoreUnmodifiedGroupSizeProperties": true
            }
        }));
    if !target_groups.is_empty() {
        group = group.with_property("TargetGroupARNs", json!(target_groups));
    }
    ctx.template.add_resource(&group_logical_id, group);
    ctx.register(&pool.id, &group_logical_id);

    tracing::debug!(
        id = %pool.id,
        capacity = pool.capacity.desired,
        subnets = subnet_ids.len(),
        "Rendered instance pool"
    );
    Ok(())
}
