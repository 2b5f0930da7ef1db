//! トポロジービルダー
//!
//! 踏み台ホスト、ALB、固定サイズの ASG を宣言し、到達性ルールと出力を結線する。
//! 宣言のみを行い、検証はプロビジョニングエンジン側に委ねる。

use crate::model::{
    AccessHost, ApplicationProtocol, Attribute, AttributeRef, Capacity, DEFAULT_CAPACITY,
    EbsVolume, InstancePool,
    Listener, LoadBalancer, MachineImage, NetworkContext, OutputBinding, Port, ReachabilityRule,
    Resource, ResourceGraph, ResourceId, SubnetTier, TargetGroup, TopologyOptions,
    VolumeAttachment, VolumeType,
};
use serde::Serialize;

pub const BASTION_ID: &str = "myBastion";
pub const BASTION_INSTANCE_NAME: &str = "myBastionHostLinux";
pub const LOAD_BALANCER_ID: &str = "myALB";
pub const LISTENER_ID: &str = "my80";
pub const TARGET_GROUP_ID: &str = "addTargetGroup";
pub const INSTANCE_POOL_ID: &str = "myASG";
pub const OUTPUT_NAME: &str = "Output";

pub const SSH_PORT: u16 = 22;
pub const HTTP_PORT: u16 = 80;

pub const ROOT_DEVICE: &str = "/dev/xvda";
pub const ROOT_VOLUME_GIB: u32 = 12;
pub const DATA_DEVICE: &str = "/dev/sdb";
pub const DATA_VOLUME_GIB: u32 = 20;

/// ビルド結果
///
/// 呼び出し側が再利用できるのはインスタンスプールの参照のみ。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Topology {
    pub graph: ResourceGraph,
    pub pool: ResourceId,
}

pub struct TopologyBuilder {
    options: TopologyOptions,
}

impl TopologyBuilder {
    pub fn new(options: TopologyOptions) -> Self {
        Self { options }
    }

    /// リソースグラフを組み立てる
    ///
    /// network にサブネット階層が揃っているかは確認しない。
    #[tracing::instrument(skip_all, fields(stack = %self.options.stack_name, vpc = %network.vpc_id))]
    pub fn build(&self, network: &NetworkContext) -> Topology {
        let options = &self.options;
        let mut graph = ResourceGraph::new(&options.stack_name, network.clone());
        graph.description = options.description.clone();
        graph.tags = options.tags.clone();

        // a. 踏み台ホスト
        let bastion = graph.declare(Resource::AccessHost(AccessHost {
            id: ResourceId::new(BASTION_ID),
            instance_name: BASTION_INSTANCE_NAME.to_string(),
            instance_type: options.bastion_instance_type.clone(),
            subnet_tier: SubnetTier::Public,
            key_name: options.key_name.clone(),
            machine_image: MachineImage::amazon_linux2(),
        }));
        graph.allow(ReachabilityRule::from_any_ipv4(
            &bastion,
            Port::tcp(SSH_PORT),
            "Internet access SSH",
        ));

        // b, d. ALB とリスナー（ターゲットはプール）
        let pool = ResourceId::new(INSTANCE_POOL_ID);
        let alb = graph.declare(Resource::LoadBalancer(LoadBalancer {
            id: ResourceId::new(LOAD_BALANCER_ID),
            name: LOAD_BALANCER_ID.to_string(),
            internet_facing: true,
            listeners: vec![Listener {
                id: ResourceId::new(LISTENER_ID),
                port: HTTP_PORT,
                protocol: ApplicationProtocol::Http,
                open: true,
                target_group: TargetGroup {
                    id: ResourceId::new(TARGET_GROUP_ID),
                    port: HTTP_PORT,
                    protocol: ApplicationProtocol::Http,
                    targets: vec![pool.clone()],
                },
            }],
        }));
        graph.allow(ReachabilityRule::from_any_ipv4(
            &alb,
            Port::tcp(HTTP_PORT),
            "Internet access ALB 80",
        ));

        // c. 固定サイズのインスタンスプール
        graph.declare(Resource::InstancePool(InstancePool {
            id: pool.clone(),
            subnet_tier: SubnetTier::Private,
            instance_type: options.instance_type.clone(),
            machine_image: MachineImage::amazon_linux(),
            key_name: options.key_name.clone(),
            user_data: options.user_data.clone(),
            capacity: Capacity::fixed(DEFAULT_CAPACITY),
            block_devices: vec![
                VolumeAttachment::new(
                    ROOT_DEVICE,
                    EbsVolume {
                        size_gib: ROOT_VOLUME_GIB,
                        volume_type: Some(VolumeType::Gp2),
                        delete_on_termination: Some(true),
                    },
                ),
                VolumeAttachment::new(DATA_DEVICE, EbsVolume::of_size(DATA_VOLUME_GIB)),
            ],
        }));
        graph.allow(ReachabilityRule::between(
            &alb,
            &pool,
            Port::tcp(HTTP_PORT),
            "ALB access 80 port of EC2 in Autoscaling Group",
        ));

        // e. ALB の DNS 名を出力
        graph.output(OutputBinding {
            name: OUTPUT_NAME.to_string(),
            value: AttributeRef {
                resource: alb,
                attribute: Attribute::DnsName,
            },
            export_name: options.output_export_name.clone(),
        });

        tracing::info!(
            resources = graph.resources().len(),
            rules = graph.rules().len(),
            "Topology declared"
        );

        Topology { graph, pool }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Peer, VolumeType};

    fn network() -> NetworkContext {
        NetworkContext::new("vpc-0123")
            .with_subnet("subnet-pub-a", SubnetTier::Public, Some("ap-northeast-1a"))
            .with_subnet("subnet-prv-a", SubnetTier::Private, Some("ap-northeast-1a"))
    }

    fn build() -> Topology {
        let options = TopologyOptions::default().with_user_data("#!/bin/bash\nyum -y install httpd\n");
        TopologyBuilder::new(options).build(&network())
    }

    #[test]
    fn test_access_host_in_public_tier_with_single_ssh_rule() {
        let topology = build();
        let graph = &topology.graph;

        let host = graph.access_host().unwrap();
        assert_eq!(host.subnet_tier, SubnetTier::Public);
        assert_eq!(host.instance_type, "t3.micro");
        assert_eq!(host.key_name, "id_rsa");
        assert_eq!(host.instance_name, "myBastionHostLinux");

        let rules = graph.rules_into(&host.id);
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].source, Peer::AnyIpv4);
        assert_eq!(rules[0].port, Port::tcp(22));
    }

    #[test]
    fn test_load_balancer_has_single_open_listener_targeting_pool() {
        let topology = build();
        let lb = topology.graph.load_balancer().unwrap();

        assert!(lb.internet_facing);
        assert_eq!(lb.listeners.len(), 1);

        let listener = &lb.listeners[0];
        assert_eq!(listener.port, 80);
        assert!(listener.open);
        assert_eq!(listener.target_group.targets, vec![topology.pool.clone()]);
    }

    #[test]
    fn test_load_balancer_open_to_internet_on_80() {
        let topology = build();
        let lb = topology.graph.load_balancer().unwrap();

        let rules = topology.graph.rules_into(&lb.id);
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].source, Peer::AnyIpv4);
        assert_eq!(rules[0].port.number, 80);
    }

    #[test]
    fn test_instance_pool_is_fixed_size_in_private_tier() {
        let topology = build();
        let pool = topology.graph.instance_pool().unwrap();

        assert_eq!(pool.id, topology.pool);
        assert_eq!(pool.subnet_tier, SubnetTier::Private);
        assert_eq!(pool.instance_type, "m5.xlarge");
        assert_eq!(pool.capacity, Capacity::fixed(2));
        assert_eq!(pool.user_data, "#!/bin/bash\nyum -y install httpd\n");

        let sizes: Vec<u32> = pool.block_devices.iter().map(|b| b.volume.size_gib).collect();
        assert_eq!(sizes, vec![12, 20]);

        let root = &pool.block_devices[0];
        assert_eq!(root.device_name, "/dev/xvda");
        assert_eq!(root.volume.volume_type, Some(VolumeType::Gp2));
        assert_eq!(root.volume.delete_on_termination, Some(true));

        let data = &pool.block_devices[1];
        assert_eq!(data.device_name, "/dev/sdb");
        assert!(data.volume.volume_type.is_none());
        assert!(data.volume.delete_on_termination.is_none());
    }

    #[test]
    fn test_single_rule_from_load_balancer_to_pool() {
        let topology = build();
        let lb = topology.graph.load_balancer().unwrap();

        let into_pool = topology.graph.rules_into(&topology.pool);
        assert_eq!(into_pool.len(), 1);
        assert_eq!(into_pool[0].source, Peer::Resource(lb.id.clone()));
        assert_eq!(into_pool[0].port, Port::tcp(80));

        assert_eq!(topology.graph.rules_from(&lb.id).len(), 1);
        assert_eq!(topology.graph.rules().len(), 3);
    }

    #[test]
    fn test_single_output_bound_to_dns_name() {
        let topology = build();
        let outputs = topology.graph.outputs();

        assert_eq!(outputs.len(), 1);
        assert_eq!(outputs[0].name, "Output");
        assert_eq!(outputs[0].value.resource, ResourceId::new(LOAD_BALANCER_ID));
        assert_eq!(outputs[0].value.attribute, Attribute::DnsName);
        assert!(outputs[0].export_name.is_none());
    }

    #[test]
    fn test_build_is_idempotent() {
        let first = build();
        let second = build();
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first.graph).unwrap(),
            serde_json::to_string(&second.graph).unwrap()
        );
    }

    #[test]
    fn test_build_does_not_validate_network() {
        // サブネットが無くてもビルド自体は成功する
        let topology = TopologyBuilder::new(TopologyOptions::default())
            .build(&NetworkContext::new("vpc-empty"));
        assert_eq!(topology.graph.resources().len(), 3);
        assert!(topology.graph.network.subnets.is_empty());
    }

    #[test]
    fn test_options_flow_into_graph() {
        let mut options = TopologyOptions {
            stack_name: "web".to_string(),
            key_name: "deploy".to_string(),
            output_export_name: Some("ALB_DNS_NAME".to_string()),
            description: Some("web tier".to_string()),
            ..Default::default()
        };
        options.tags.insert("Owner".to_string(), "platform".to_string());

        let topology = TopologyBuilder::new(options).build(&network());
        let graph = &topology.graph;
        assert_eq!(graph.stack_name, "web");
        assert_eq!(graph.description.as_deref(), Some("web tier"));
        assert_eq!(graph.tags.get("Owner"), Some(&"platform".to_string()));
        assert_eq!(graph.access_host().unwrap().key_name, "deploy");
        assert_eq!(graph.instance_pool().unwrap().key_name, "deploy");
        assert_eq!(
            graph.outputs()[0].export_name.as_deref(),
            Some("ALB_DNS_NAME")
        );
    }
}
