//! CloudFormation intrinsic functions and shared property shapes

use serde_json::{Value, json};
use std::collections::BTreeMap;

pub fn ref_(logical_id: &str) -> Value {
    json!({ "Ref": logical_id })
}

pub fn get_att(logical_id: &str, attribute: &str) -> Value {
    json!({ "Fn::GetAtt": [logical_id, attribute] })
}

pub fn base64(value: impl Into<Value>) -> Value {
    json!({ "Fn::Base64": value.into() })
}

/// Tag list sorted by key; `extra` wins over `common` on conflicts
pub fn tags(common: &BTreeMap<String, String>, extra: &[(&str, &str)]) -> Value {
    let mut merged = common.clone();
    for (key, value) in extra {
        merged.insert((*key).to_string(), (*value).to_string());
    }
    Value::Array(
        merged
            .into_iter()
            .map(|(key, value)| json!({ "Key": key, "Value": value }))
            .collect(),
    )
}

/// Same as [`tags`] with `PropagateAtLaunch` set (AutoScalingGroup)
pub fn propagated_tags(common: &BTreeMap<String, String>, extra: &[(&str, &str)]) -> Value {
    match tags(common, extra) {
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|mut tag| {
                    tag["PropagateAtLaunch"] = json!(true);
                    tag
                })
                .collect(),
        ),
        other => other,
    }
}

/// Trust policy letting EC2 assume a role
pub fn ec2_assume_role_policy() -> Value {
    json!({
        "Statement": [{
            "Action": "sts:AssumeRole",
            "Effect": "Allow",
            "Principal": { "Service": "ec2.amazonaws.com" }
        }],
        "Version": "2012-10-17"
    })
}
