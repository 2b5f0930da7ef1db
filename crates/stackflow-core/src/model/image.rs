//! マシンイメージ
//!
//! AMI ID は直接持たず、SSM パブリックパラメータ経由で最新版を解決する。

use serde::{Deserialize, Serialize};

const SSM_AMAZON_LINUX_PREFIX: &str = "/aws/service/ami-amazon-linux-latest";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmazonLinuxGeneration {
    AmazonLinux,
    AmazonLinux2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmazonLinuxEdition {
    Standard,
    Minimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmazonLinuxVirt {
    Hvm,
    Pv,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmazonLinuxStorage {
    Ebs,
    GeneralPurpose,
}

/// マシンイメージの参照
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MachineImage {
    AmazonLinux {
        generation: AmazonLinuxGeneration,
        edition: AmazonLinuxEdition,
        virtualization: AmazonLinuxVirt,
        storage: AmazonLinuxStorage,
    },
}

impl MachineImage {
    /// Amazon Linux (1), standard, HVM, gp2
    pub fn amazon_linux() -> Self {
        MachineImage::AmazonLinux {
            generation: AmazonLinuxGeneration::AmazonLinux,
            edition: AmazonLinuxEdition::Standard,
            virtualization: AmazonLinuxVirt::Hvm,
            storage: AmazonLinuxStorage::GeneralPurpose,
        }
    }

    /// Amazon Linux 2, standard, HVM, gp2
    pub fn amazon_linux2() -> Self {
        MachineImage::AmazonLinux {
            generation: AmazonLinuxGeneration::AmazonLinux2,
            edition: AmazonLinuxEdition::Standard,
            virtualization: AmazonLinuxVirt::Hvm,
            storage: AmazonLinuxStorage::GeneralPurpose,
        }
    }

    /// 最新イメージIDを保持する SSM パラメータのパス
    ///
    /// 例: `/aws/service/ami-amazon-linux-latest/amzn-ami-hvm-x86_64-gp2`
    pub fn ssm_parameter(&self) -> String {
        match self {
            MachineImage::AmazonLinux {
                generation,
                edition,
                virtualization,
                storage,
            } => {
                let mut parts = vec![match generation {
                    AmazonLinuxGeneration::AmazonLinux => "amzn",
                    AmazonLinuxGeneration::AmazonLinux2 => "amzn2",
                }];
                parts.push("ami");
                if *edition == AmazonLinuxEdition::Minimal {
                    parts.push("minimal");
                }
                parts.push(match virtualization {
                    AmazonLinuxVirt::Hvm => "hvm",
                    AmazonLinuxVirt::Pv => "pv",
                });
                parts.push("x86_64");
                parts.push(match storage {
                    AmazonLinuxStorage::Ebs => "ebs",
                    AmazonLinuxStorage::GeneralPurpose => "gp2",
                });
                format!("{}/{}", SSM_AMAZON_LINUX_PREFIX, parts.join("-"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ssm_parameter_paths() {
        assert_eq!(
            MachineImage::amazon_linux().ssm_parameter(),
            "/aws/service/ami-amazon-linux-latest/amzn-ami-hvm-x86_64-gp2"
        );
        assert_eq!(
            MachineImage::amazon_linux2().ssm_parameter(),
            "/aws/service/ami-amazon-linux-latest/amzn2-ami-hvm-x86_64-gp2"
        );
    }

    #[test]
    fn test_ssm_parameter_minimal_ebs() {
        let image = MachineImage::AmazonLinux {
            generation: AmazonLinuxGeneration::AmazonLinux2,
            edition: AmazonLinuxEdition::Minimal,
            virtualization: AmazonLinuxVirt::Hvm,
            storage: AmazonLinuxStorage::Ebs,
        };
        assert_eq!(
            image.ssm_parameter(),
            "/aws/service/ami-amazon-linux-latest/amzn2-ami-minimal-hvm-x86_64-ebs"
        );
    }
}
