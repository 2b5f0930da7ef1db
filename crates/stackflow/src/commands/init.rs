use anyhow::Context;
use colored::Colorize;
use stackflow_core::discovery::STACK_FILE;
use stackflow_core::DEFAULT_USER_DATA_PATH;
use std::fs;
use std::path::Path;

const STACK_TEMPLATE: &str = r#"project "cdk-ec2"

// VPC は別スタックで作成済みのものを参照する
network "vpc-xxxxxxxx" {
    public "subnet-public-a" az="ap-northeast-1a"
    public "subnet-public-c" az="ap-northeast-1c"
    private "subnet-private-a" az="ap-northeast-1a"
    private "subnet-private-c" az="ap-northeast-1c"
}

topology {
    instance-type "m5.xlarge"
    bastion-instance-type "t3.micro"
    key-name "id_rsa"
    user-data "./user_data/user_data.sh"
}
"#;

const USER_DATA_TEMPLATE: &str = r#"#!/bin/bash
yum update -y
yum install -y httpd
systemctl enable --now httpd
echo "<h1>$(hostname -f)</h1>" > /var/www/html/index.html
"#;

/// スタック定義の雛形を作成
pub fn handle(location: &super::Location, global: bool, force: bool) -> anyhow::Result<()> {
    let root = if global {
        stackflow_config::get_config_dir()?
    } else {
        super::target_root(location)?
    };

    let stack_file = root.join(STACK_FILE);
    let user_data = root.join(DEFAULT_USER_DATA_PATH.trim_start_matches("./"));

    write_file(&stack_file, STACK_TEMPLATE, force)?;
    write_file(&user_data, USER_DATA_TEMPLATE, force)?;

    println!();
    println!("{}", "✓ 雛形を作成しました".green().bold());
    println!("  network の VPC ID とサブネットIDを実際の値に置き換えてください");
    println!("  {} で内容を確認できます", "stackflow validate".cyan());
    Ok(())
}

fn write_file(path: &Path, content: &str, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        println!(
            "{} {} (既に存在します。上書きするには --force)",
            "-".yellow(),
            path.display()
        );
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("ディレクトリを作成できません: {}", parent.display()))?;
    }
    fs::write(path, content)
        .with_context(|| format!("ファイルを書き込めません: {}", path.display()))?;
    println!("{} {}", "+".green(), path.display());
    Ok(())
}
