//! Synthesis context shared by the per-resource renderers

use crate::intrinsic::get_att;
use crate::logical_id::logical_id;
use serde_json::{Value, json};
use stackflow_cloud::{CloudError, Result, Template, TemplateParameter};
use stackflow_core::{MachineImage, ResourceGraph, ResourceId, Subnet, SubnetTier};
use std::collections::BTreeMap;

const IMAGE_PARAMETER_TYPE: &str = "AWS::SSM::Parameter::Value<AWS::EC2::Image::Id>";

/// Security group rendered for a graph resource
#[derive(Debug, Clone)]
pub struct SecurityGroupRef {
    pub logical_id: String,

    /// false when egress must be opened rule by rule
    pub allow_all_outbound: bool,
}

impl SecurityGroupRef {
    pub fn group_id(&self) -> Value {
        get_att(&self.logical_id, "GroupId")
    }
}

pub struct SynthContext<'a> {
    pub graph: &'a ResourceGraph,
    pub template: Template,
    security_groups: BTreeMap<ResourceId, SecurityGroupRef>,
    logical_ids: BTreeMap<ResourceId, String>,

    /// Target group logical IDs keyed by the resource they forward to
    target_groups: BTreeMap<ResourceId, Vec<String>>,
}

impl<'a> SynthContext<'a> {
    pub fn new(graph: &'a ResourceGraph) -> Self {
        let mut template = Template::new();
        template.description = graph.description.clone();
        Self {
            graph,
            template,
            security_groups: BTreeMap::new(),
            logical_ids: BTreeMap::new(),
            target_groups: BTreeMap::new(),
        }
    }

    /// Path-style name used in descriptions and Name tags (`stack/id`)
    pub fn path(&self, id: &ResourceId) -> String {
        format!("{}/{}", self.graph.stack_name, id)
    }

    pub fn register(&mut self, id: &ResourceId, logical_id: &str) {
        self.logical_ids.insert(id.clone(), logical_id.to_string());
    }

    pub fn register_security_group(&mut self, id: &ResourceId, group: SecurityGroupRef) {
        self.security_groups.insert(id.clone(), group);
    }

    pub fn register_target(&mut self, target: &ResourceId, target_group: &str) {
        self.target_groups
            .entry(target.clone())
            .or_default()
            .push(target_group.to_string());
    }

    pub fn target_groups_of(&self, target: &ResourceId) -> &[String] {
        self.target_groups
            .get(target)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn logical_id_of(&self, id: &ResourceId) -> Result<&str> {
        self.logical_ids
            .get(id)
            .map(String::as_str)
            .ok_or_else(|| CloudError::UnresolvedReference(id.to_string()))
    }

    pub fn security_group_of(&self, id: &ResourceId) -> Result<&SecurityGroupRef> {
        self.security_groups
            .get(id)
            .ok_or_else(|| CloudError::UnresolvedReference(format!("security group of {}", id)))
    }

    pub fn vpc_id(&self) -> Value {
        json!(self.graph.network.vpc_id)
    }

    /// Subnets of a tier; a missing tier is an engine-side configuration error
    pub fn subnets(&self, tier: SubnetTier, consumer: &ResourceId) -> Result<Vec<&'a Subnet>> {
        let subnets = self.graph.network.subnets_in(tier);
        if subnets.is_empty() {
            return Err(CloudError::InvalidConfig(format!(
                "There are no '{}' subnets in VPC {} (required by {})",
                tier, self.graph.network.vpc_id, consumer
            )));
        }
        Ok(subnets)
    }

    /// Register an SSM parameter for the image and return a `Ref` to it
    pub fn image_id(&mut self, image: &MachineImage) -> Result<Value> {
        let path = image.ssm_parameter();
        let parameter_id = logical_id(&["SsmParameterValue", path.as_str(), "Parameter"])?;
        self.template
            .parameters
            .entry(parameter_id.clone())
            .or_insert_with(|| TemplateParameter {
                parameter_type: IMAGE_PARAMETER_TYPE.to_string(),
                default: Some(path),
                description: None,
            });
        Ok(json!({ "Ref": parameter_id }))
    }

    pub fn finish(self) -> Template {
        self.template
    }
}
