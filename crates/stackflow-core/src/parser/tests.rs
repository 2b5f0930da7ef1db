use super::*;
use crate::model::SubnetTier;

#[test]
fn test_parse_full_stack() {
    let kdl = r#"
        project "cdk-ec2"

        network "vpc-0123" {
            subnet "subnet-pub-a" tier="public" az="ap-northeast-1a"
            subnet "subnet-pub-c" tier="public" az="ap-northeast-1c"
            subnet "subnet-prv-a" tier="private" az="ap-northeast-1a"
            subnet "subnet-prv-c" tier="private" az="ap-northeast-1c"
        }

        topology {
            instance-type "m5.xlarge"
            key-name "id_rsa"
        }
    "#;

    let config = parse_kdl_string(kdl, "default".to_string()).unwrap();
    assert_eq!(config.name, "cdk-ec2");

    let network = config.network.unwrap();
    assert_eq!(network.vpc_id, "vpc-0123");
    assert_eq!(network.subnets_in(SubnetTier::Public).len(), 2);
    assert_eq!(network.subnets_in(SubnetTier::Private).len(), 2);
}

#[test]
fn test_default_name_without_project_node() {
    let kdl = r#"
        network "vpc-1" {
            subnet "subnet-a" tier="public"
        }
    "#;

    let config = parse_kdl_string(kdl, "my-dir".to_string()).unwrap();
    assert_eq!(config.name, "my-dir");
    assert_eq!(config.topology, Default::default());
}

#[test]
fn test_unknown_nodes_are_skipped() {
    let kdl = r#"
        project "web"
        database "rds" {
            engine "mysql"
        }
    "#;

    let config = parse_kdl_string(kdl, "default".to_string()).unwrap();
    assert_eq!(config.name, "web");
    assert!(config.network.is_none());
}

#[test]
fn test_duplicate_network_is_rejected() {
    let kdl = r#"
        network "vpc-1"
        network "vpc-2"
    "#;

    let result = parse_kdl_string(kdl, "default".to_string());
    assert!(matches!(result, Err(StackError::InvalidConfig(_))));
}

#[test]
fn test_multiple_topology_nodes_merge() {
    let kdl = r#"
        topology {
            instance-type "m5.large"
            key-name "id_rsa"
        }
        topology {
            key-name "override"
        }
    "#;

    let config = parse_kdl_string(kdl, "default".to_string()).unwrap();
    assert_eq!(config.topology.instance_type, Some("m5.large".to_string()));
    assert_eq!(config.topology.key_name, Some("override".to_string()));
}

#[test]
fn test_invalid_kdl() {
    let result = parse_kdl_string("network \"vpc-1\" {", "default".to_string());
    assert!(matches!(result, Err(StackError::KdlParse(_))));
}

#[test]
fn test_parse_kdl_file_uses_parent_dir_as_name() {
    let temp_dir = tempfile::tempdir().unwrap();
    let project = temp_dir.path().join("web-stack");
    std::fs::create_dir(&project).unwrap();
    let file = project.join("stack.kdl");
    std::fs::write(&file, "network \"vpc-1\"").unwrap();

    let config = parse_kdl_file(&file).unwrap();
    assert_eq!(config.name, "web-stack");
    assert_eq!(config.network.unwrap().vpc_id, "vpc-1");
}
