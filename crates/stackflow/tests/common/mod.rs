use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const STACK_KDL: &str = r#"
project "web"

network "vpc-0123" {
    subnet "subnet-pub-a" tier="public" az="ap-northeast-1a"
    subnet "subnet-pub-c" tier="public" az="ap-northeast-1c"
    subnet "subnet-prv-a" tier="private" az="ap-northeast-1a"
    subnet "subnet-prv-c" tier="private" az="ap-northeast-1c"
}

topology {
    key-name "deploy"
    export-name "ALB_DNS_NAME"
}
"#;

pub const USER_DATA: &str = "#!/bin/bash\nyum -y install httpd\n";

pub struct TestProject {
    pub root: TempDir,
}

impl TestProject {
    pub fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        Self { root }
    }

    /// stack.kdl とブートスクリプトを揃えたプロジェクト
    pub fn with_defaults() -> Self {
        let project = Self::new();
        project.write_stack_kdl(STACK_KDL);
        project.write_user_data(USER_DATA);
        project
    }

    pub fn write_stack_kdl(&self, content: &str) {
        fs::write(self.path().join("stack.kdl"), content).unwrap();
    }

    pub fn write_user_data(&self, content: &str) {
        let dir = self.path().join("user_data");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("user_data.sh"), content).unwrap();
    }

    pub fn path(&self) -> PathBuf {
        self.root.path().to_path_buf()
    }
}

/// 環境の設定ファイルに影響されないコマンド
#[allow(deprecated)]
pub fn stackflow(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("stackflow").unwrap();
    cmd.env_remove("STACKFLOW_PROJECT_ROOT")
        .env_remove("STACK_CONFIG_PATH")
        .env_remove("RUST_LOG")
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"));
    cmd
}
