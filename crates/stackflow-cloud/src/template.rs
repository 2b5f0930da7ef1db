//! Template document handed to the provisioning engine
//!
//! Laid out the way CloudFormation expects (`Parameters`, `Resources`,
//! `Outputs`). All maps are ordered so that rendering is deterministic.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

pub const FORMAT_VERSION: &str = "2010-09-09";

/// A single resource entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateResource {
    /// Engine resource type (e.g., "AWS::EC2::Instance")
    #[serde(rename = "Type")]
    pub resource_type: String,

    #[serde(rename = "Properties", default, skip_serializing_if = "Map::is_empty")]
    pub properties: Map<String, Value>,

    #[serde(rename = "DependsOn", default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,

    #[serde(rename = "UpdatePolicy", default, skip_serializing_if = "Option::is_none")]
    pub update_policy: Option<Value>,
}

impl TemplateResource {
    pub fn new(resource_type: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            properties: Map::new(),
            depends_on: Vec::new(),
            update_policy: None,
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: Value) -> Self {
        self.properties.insert(key.into(), value);
        self
    }

    pub fn depends_on(mut self, logical_id: impl Into<String>) -> Self {
        self.depends_on.push(logical_id.into());
        self
    }

    pub fn with_update_policy(mut self, policy: Value) -> Self {
        self.update_policy = Some(policy);
        self
    }

    /// Get a property as a specific type
    pub fn get_property<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.properties
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }
}

/// Template parameter (e.g., an SSM-resolved image id)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateParameter {
    #[serde(rename = "Type")]
    pub parameter_type: String,

    #[serde(rename = "Default", default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,

    #[serde(rename = "Description", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Stack output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateOutput {
    #[serde(rename = "Value")]
    pub value: Value,

    #[serde(rename = "Description", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(rename = "Export", default, skip_serializing_if = "Option::is_none")]
    pub export: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    #[serde(rename = "AWSTemplateFormatVersion")]
    pub format_version: String,

    #[serde(rename = "Description", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(rename = "Parameters", default, skip_serializing_if = "BTreeMap::is_empty")]
    pub parameters: BTreeMap<String, TemplateParameter>,

    #[serde(rename = "Resources")]
    pub resources: BTreeMap<String, TemplateResource>,

    #[serde(rename = "Outputs", default, skip_serializing_if = "BTreeMap::is_empty")]
    pub outputs: BTreeMap<String, TemplateOutput>,
}

impl Default for Template {
    fn default() -> Self {
        Self::new()
    }
}

impl Template {
    pub fn new() -> Self {
        Self {
            format_version: FORMAT_VERSION.to_string(),
            description: None,
            parameters: BTreeMap::new(),
            resources: BTreeMap::new(),
            outputs: BTreeMap::new(),
        }
    }

    /// Add a resource, replacing any existing one with the same logical ID
    pub fn add_resource(&mut self, logical_id: impl Into<String>, resource: TemplateResource) {
        let logical_id = logical_id.into();
        if self.resources.insert(logical_id.clone(), resource).is_some() {
            tracing::warn!(logical_id = %logical_id, "Replaced duplicate logical ID");
        }
    }

    pub fn resource(&self, logical_id: &str) -> Option<&TemplateResource> {
        self.resources.get(logical_id)
    }

    pub fn resource_mut(&mut self, logical_id: &str) -> Option<&mut TemplateResource> {
        self.resources.get_mut(logical_id)
    }

    /// Resources of the given type, in logical ID order
    pub fn resources_of_type(&self, resource_type: &str) -> Vec<(&String, &TemplateResource)> {
        self.resources
            .iter()
            .filter(|(_, r)| r.resource_type == resource_type)
            .collect()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Summary of the template
    pub fn summary(&self) -> TemplateSummary {
        let mut by_type: BTreeMap<String, usize> = BTreeMap::new();
        for resource in self.resources.values() {
            *by_type.entry(resource.resource_type.clone()).or_default() += 1;
        }
        TemplateSummary {
            resources: self.resources.len(),
            parameters: self.parameters.len(),
            outputs: self.outputs.len(),
            by_type,
        }
    }
}

/// Summary of a synthesized template
#[derive(Debug, Clone)]
pub struct TemplateSummary {
    pub resources: usize,
    pub parameters: usize,
    pub outputs: usize,
    pub by_type: BTreeMap<String, usize>,
}

impl std::fmt::Display for TemplateSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} resources, {} parameters, {} outputs",
            self.resources, self.parameters, self.outputs
        )
    }
}

/// Output format for rendered templates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TemplateFormat {
    #[default]
    Yaml,
    Json,
}

impl TemplateFormat {
    pub fn render(&self, template: &Template) -> Result<String> {
        match self {
            TemplateFormat::Yaml => template.to_yaml(),
            TemplateFormat::Json => template.to_json(),
        }
    }
}

impl std::str::FromStr for TemplateFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "yaml" | "yml" => Ok(TemplateFormat::Yaml),
            "json" => Ok(TemplateFormat::Json),
            other => Err(format!("unknown template format: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Template {
        let mut template = Template::new();
        template.add_resource(
            "WebSecurityGroup",
            TemplateResource::new("AWS::EC2::SecurityGroup")
                .with_property("GroupDescription", json!("web")),
        );
        template.add_resource(
            "WebInstance",
            TemplateResource::new("AWS::EC2::Instance")
                .with_property("InstanceType", json!("t3.micro"))
                .depends_on("WebSecurityGroup"),
        );
        template
    }

    #[test]
    fn test_json_layout() {
        let value: Value = serde_json::from_str(&sample().to_json().unwrap()).unwrap();

        assert_eq!(value["AWSTemplateFormatVersion"], "2010-09-09");
        assert_eq!(value["Resources"]["WebInstance"]["Type"], "AWS::EC2::Instance");
        assert_eq!(
            value["Resources"]["WebInstance"]["DependsOn"],
            json!(["WebSecurityGroup"])
        );
        // 空のセクションは出力しない
        assert!(value.get("Parameters").is_none());
        assert!(value.get("Outputs").is_none());
        assert!(value["Resources"]["WebSecurityGroup"].get("DependsOn").is_none());
    }

    #[test]
    fn test_yaml_render() {
        let yaml = sample().to_yaml().unwrap();
        assert!(yaml.contains("AWSTemplateFormatVersion:"));
        assert!(yaml.contains("2010-09-09"));
        assert!(yaml.contains("AWS::EC2::Instance"));

        let parsed: Template = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.resources.len(), 2);
    }

    #[test]
    fn test_from_json() {
        let template = sample();
        let parsed = Template::from_json(&template.to_json().unwrap()).unwrap();
        assert_eq!(parsed, template);
    }

    #[test]
    fn test_resources_of_type_and_summary() {
        let template = sample();
        let instances = template.resources_of_type("AWS::EC2::Instance");
        assert_eq!(instances.len(), 1);
        assert_eq!(instances[0].0, "WebInstance");
        assert_eq!(
            template
                .resource("WebInstance")
                .unwrap()
                .get_property::<String>("InstanceType"),
            Some("t3.micro".to_string())
        );

        let summary = template.summary();
        assert_eq!(summary.resources, 2);
        assert_eq!(summary.by_type.get("AWS::EC2::SecurityGroup"), Some(&1));
        assert_eq!(
            summary.to_string(),
            "2 resources, 0 parameters, 0 outputs"
        );
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("yaml".parse::<TemplateFormat>(), Ok(TemplateFormat::Yaml));
        assert_eq!("JSON".parse::<TemplateFormat>(), Ok(TemplateFormat::Json));
        assert!("toml".parse::<TemplateFormat>().is_err());
    }
}
