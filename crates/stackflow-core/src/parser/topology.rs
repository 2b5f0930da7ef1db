//! topology ノードのパース

use super::first_string;
use crate::error::Result;
use crate::model::{DEFAULT_CAPACITY, TopologySection};
use kdl::KdlNode;
use std::path::PathBuf;

/// topology ノードをパース
pub fn parse_topology(node: &KdlNode) -> Result<TopologySection> {
    let mut section = TopologySection::default();

    let Some(children) = node.children() else {
        return Ok(section);
    };

    for child in children.nodes() {
        match child.name().value() {
            "instance_type" | "instance-type" => {
                section.instance_type = first_string(child);
            }
            "bastion_instance_type" | "bastion-instance-type" => {
                section.bastion_instance_type = first_string(child);
            }
            "key_name" | "key-name" => {
                section.key_name = first_string(child);
            }
            "capacity" | "size" => {
                tracing::warn!(
                    node = child.name().value(),
                    capacity = DEFAULT_CAPACITY,
                    "Instance pool size is fixed, node ignored"
                );
            }
            "user_data" | "user-data" => {
                section.user_data = first_string(child).map(PathBuf::from);
            }
            "description" => {
                section.description = first_string(child);
            }
            "export_name" | "export-name" => {
                section.export_name = first_string(child);
            }
            "tags" => {
                // tags { Owner "platform" Env "dev" }
                if let Some(tags) = child.children() {
                    for tag in tags.nodes() {
                        if let Some(value) = first_string(tag) {
                            section
                                .tags
                                .insert(tag.name().value().to_string(), value);
                        }
                    }
                }
            }
            other => {
                tracing::warn!(node = other, "Unknown node in topology block, skipped");
            }
        }
    }

    Ok(section)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_topology() {
        let kdl = r#"
            topology {
                instance-type "m5.xlarge"
                bastion-instance-type "t3.micro"
                key-name "id_rsa"
                user-data "./user_data/user_data.sh"
            }
        "#;
        let doc: kdl::KdlDocument = kdl.parse().unwrap();
        let node = doc.nodes().first().unwrap();

        let section = parse_topology(node).unwrap();
        assert_eq!(section.instance_type, Some("m5.xlarge".to_string()));
        assert_eq!(section.bastion_instance_type, Some("t3.micro".to_string()));
        assert_eq!(section.key_name, Some("id_rsa".to_string()));
        assert_eq!(
            section.user_data,
            Some(PathBuf::from("./user_data/user_data.sh"))
        );
    }

    #[test]
    fn test_parse_topology_snake_case_and_tags() {
        let kdl = r#"
            topology {
                key_name "deploy"
                export_name "ALB_DNS_NAME"
                tags {
                    Owner "platform"
                    Env "dev"
                }
            }
        "#;
        let doc: kdl::KdlDocument = kdl.parse().unwrap();
        let node = doc.nodes().first().unwrap();

        let section = parse_topology(node).unwrap();
        assert_eq!(section.key_name, Some("deploy".to_string()));
        assert_eq!(section.export_name, Some("ALB_DNS_NAME".to_string()));
        assert_eq!(section.tags.get("Owner"), Some(&"platform".to_string()));
        assert_eq!(section.tags.len(), 2);
    }

    #[test]
    fn test_parse_topology_empty() {
        let doc: kdl::KdlDocument = "topology".parse().unwrap();
        let node = doc.nodes().first().unwrap();

        let section = parse_topology(node).unwrap();
        assert_eq!(section, TopologySection::default());
    }

    #[test]
    fn test_parse_topology_ignores_capacity() {
        let doc: kdl::KdlDocument = "topology { capacity 3; size 0; key-name \"deploy\" }"
            .parse()
            .unwrap();
        let node = doc.nodes().first().unwrap();

        let section = parse_topology(node).unwrap();
        assert_eq!(
            section,
            TopologySection {
                key_name: Some("deploy".to_string()),
                ..Default::default()
            }
        );
    }
}
