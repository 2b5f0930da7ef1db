//! コンピュートリソース（踏み台ホスト、インスタンスプール）

use super::{MachineImage, ResourceId, SubnetTier};
use serde::{Deserialize, Serialize};

/// 管理用の踏み台ホスト（単一インスタンス）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessHost {
    pub id: ResourceId,

    /// Name タグに付与するインスタンス名
    pub instance_name: String,

    /// インスタンスタイプ（t3.micro など）
    pub instance_type: String,

    /// 配置先のサブネット階層
    pub subnet_tier: SubnetTier,

    /// SSHキーペア名
    pub key_name: String,

    pub machine_image: MachineImage,
}

/// 固定サイズのオートスケーリンググループ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstancePool {
    pub id: ResourceId,

    pub subnet_tier: SubnetTier,

    pub instance_type: String,

    pub machine_image: MachineImage,

    pub key_name: String,

    /// 初回起動時に実行されるスクリプト（無加工で渡す）
    pub user_data: String,

    pub capacity: Capacity,

    /// 宣言順のブロックデバイス
    pub block_devices: Vec<VolumeAttachment>,
}

/// プールのサイズ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capacity {
    pub min: u32,
    pub max: u32,
    pub desired: u32,
}

impl Capacity {
    /// min = max = desired の固定サイズ
    pub fn fixed(size: u32) -> Self {
        Self {
            min: size,
            max: size,
            desired: size,
        }
    }

    pub fn is_fixed(&self) -> bool {
        self.min == self.max && self.max == self.desired
    }
}

/// EBS ボリュームタイプ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VolumeType {
    Standard,
    Gp2,
    Gp3,
    Io1,
    St1,
    Sc1,
}

impl VolumeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VolumeType::Standard => "standard",
            VolumeType::Gp2 => "gp2",
            VolumeType::Gp3 => "gp3",
            VolumeType::Io1 => "io1",
            VolumeType::St1 => "st1",
            VolumeType::Sc1 => "sc1",
        }
    }
}

/// EBS ボリューム設定
///
/// None のフィールドはプロバイダー側のデフォルトに従う。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EbsVolume {
    pub size_gib: u32,
    pub volume_type: Option<VolumeType>,
    pub delete_on_termination: Option<bool>,
}

impl EbsVolume {
    pub fn of_size(size_gib: u32) -> Self {
        Self {
            size_gib,
            volume_type: None,
            delete_on_termination: None,
        }
    }
}

/// デバイスパスとボリュームの組
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeAttachment {
    /// /dev/xvda など
    pub device_name: String,
    pub volume: EbsVolume,
}

impl VolumeAttachment {
    pub fn new(device_name: impl Into<String>, volume: EbsVolume) -> Self {
        Self {
            device_name: device_name.into(),
            volume,
        }
    }
}
