//! トポロジー設定
//!
//! stack.kdl の topology ノードと、ビルダーに渡すオプション。

use super::NetworkContext;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

pub const DEFAULT_STACK_NAME: &str = "cdk-ec2";
pub const DEFAULT_INSTANCE_TYPE: &str = "m5.xlarge";
pub const DEFAULT_BASTION_INSTANCE_TYPE: &str = "t3.micro";
pub const DEFAULT_KEY_NAME: &str = "id_rsa";
/// インスタンスプールの台数（min = max = desired、設定では変更不可）
pub const DEFAULT_CAPACITY: u32 = 2;
pub const DEFAULT_USER_DATA_PATH: &str = "./user_data/user_data.sh";

/// stack.kdl の topology ノード（未指定はNone）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologySection {
    pub instance_type: Option<String>,
    pub bastion_instance_type: Option<String>,
    pub key_name: Option<String>,

    /// ブートスクリプトのパス（プロジェクトルートからの相対）
    pub user_data: Option<PathBuf>,

    pub description: Option<String>,
    pub export_name: Option<String>,
    pub tags: BTreeMap<String, String>,
}

impl TopologySection {
    /// other で指定された値を優先してマージ
    pub fn merge(&mut self, other: TopologySection) {
        if other.instance_type.is_some() {
            self.instance_type = other.instance_type;
        }
        if other.bastion_instance_type.is_some() {
            self.bastion_instance_type = other.bastion_instance_type;
        }
        if other.key_name.is_some() {
            self.key_name = other.key_name;
        }
        if other.user_data.is_some() {
            self.user_data = other.user_data;
        }
        if other.description.is_some() {
            self.description = other.description;
        }
        if other.export_name.is_some() {
            self.export_name = other.export_name;
        }
        self.tags.extend(other.tags);
    }

    pub fn user_data_path(&self) -> PathBuf {
        self.user_data
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_USER_DATA_PATH))
    }
}

/// パース済みの stack.kdl
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackConfig {
    /// スタック名（project ノード、未指定時はディレクトリ名）
    pub name: String,
    pub network: Option<NetworkContext>,
    pub topology: TopologySection,
}

/// ビルダーへの入力
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologyOptions {
    pub stack_name: String,
    pub instance_type: String,
    pub bastion_instance_type: String,
    pub key_name: String,

    /// ブートスクリプトの内容
    pub user_data: String,

    pub description: Option<String>,
    pub output_export_name: Option<String>,
    pub tags: BTreeMap<String, String>,
}

impl Default for TopologyOptions {
    fn default() -> Self {
        Self {
            stack_name: DEFAULT_STACK_NAME.to_string(),
            instance_type: DEFAULT_INSTANCE_TYPE.to_string(),
            bastion_instance_type: DEFAULT_BASTION_INSTANCE_TYPE.to_string(),
            key_name: DEFAULT_KEY_NAME.to_string(),
            user_data: String::new(),
            description: None,
            output_export_name: None,
            tags: BTreeMap::new(),
        }
    }
}

impl TopologyOptions {
    pub fn with_user_data(mut self, user_data: impl Into<String>) -> Self {
        self.user_data = user_data.into();
        self
    }

    /// 設定ファイルの値で上書きしたオプションを作る
    pub fn from_section(
        stack_name: impl Into<String>,
        section: &TopologySection,
        user_data: String,
    ) -> Self {
        let defaults = Self::default();
        Self {
            stack_name: stack_name.into(),
            instance_type: section
                .instance_type
                .clone()
                .unwrap_or(defaults.instance_type),
            bastion_instance_type: section
                .bastion_instance_type
                .clone()
                .unwrap_or(defaults.bastion_instance_type),
            key_name: section.key_name.clone().unwrap_or(defaults.key_name),
            user_data,
            description: section.description.clone(),
            output_export_name: section.export_name.clone(),
            tags: section.tags.clone(),
        }
    }
}
