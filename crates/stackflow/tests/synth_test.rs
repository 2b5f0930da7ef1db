use serde_json::Value;
use std::fs;

mod common;
use common::{TestProject, USER_DATA, stackflow};

fn synth_json(project: &TestProject) -> Value {
    let output = stackflow(&project.path())
        .arg("--project")
        .arg(project.path())
        .args(["synth", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn test_synth_json_to_stdout() {
    let project = TestProject::with_defaults();
    let template = synth_json(&project);

    assert_eq!(template["AWSTemplateFormatVersion"], "2010-09-09");

    let resources = &template["Resources"];
    assert_eq!(resources["myBastion"]["Type"], "AWS::EC2::Instance");
    assert_eq!(resources["myBastion"]["Properties"]["KeyName"], "deploy");
    assert_eq!(
        resources["myALB"]["Type"],
        "AWS::ElasticLoadBalancingV2::LoadBalancer"
    );
    assert_eq!(resources["myASGASG"]["Properties"]["DesiredCapacity"], "2");
    assert_eq!(
        resources["myASGLaunchConfig"]["Properties"]["UserData"]["Fn::Base64"],
        USER_DATA
    );

    let output = &template["Outputs"]["Output"];
    assert_eq!(output["Value"]["Fn::GetAtt"][0], "myALB");
    assert_eq!(output["Value"]["Fn::GetAtt"][1], "DNSName");
    assert_eq!(output["Export"]["Name"], "ALB_DNS_NAME");
}

#[test]
fn test_synth_yaml_by_default() {
    let project = TestProject::with_defaults();
    stackflow(&project.path())
        .current_dir(project.path())
        .arg("synth")
        .assert()
        .success()
        .stdout(predicates::str::contains("AWSTemplateFormatVersion"))
        .stdout(predicates::str::contains("AWS::AutoScaling::AutoScalingGroup"));
}

#[test]
fn test_local_override_keeps_pool_size_fixed() {
    let project = TestProject::with_defaults();
    fs::write(
        project.path().join("stack.local.kdl"),
        "topology {\n    capacity 3\n    key-name \"local-key\"\n}\n",
    )
    .unwrap();

    let template = synth_json(&project);
    let props = &template["Resources"]["myASGASG"]["Properties"];
    assert_eq!(props["MinSize"], "2");
    assert_eq!(props["MaxSize"], "2");
    assert_eq!(props["DesiredCapacity"], "2");
    // capacity 以外の上書きは反映される
    assert_eq!(
        template["Resources"]["myASGLaunchConfig"]["Properties"]["KeyName"],
        "local-key"
    );
    // local に無い値は stack.kdl のまま
    assert_eq!(template["Outputs"]["Output"]["Export"]["Name"], "ALB_DNS_NAME");
}

#[test]
fn test_synth_writes_assembly() {
    let project = TestProject::with_defaults();
    stackflow(&project.path())
        .arg("--project")
        .arg(project.path())
        .args(["synth", "--output", "stack.out"])
        .assert()
        .success();

    let out_dir = project.path().join("stack.out");
    let template: Value =
        serde_json::from_str(&fs::read_to_string(out_dir.join("web.template.json")).unwrap())
            .unwrap();
    assert!(template["Resources"]["myALB"].is_object());

    let manifest: Value =
        serde_json::from_str(&fs::read_to_string(out_dir.join("manifest.json")).unwrap())
            .unwrap();
    assert_eq!(
        manifest["stacks"]["web"]["template_file"],
        "web.template.json"
    );
    assert_eq!(manifest["stacks"]["web"]["synthesizer"], "aws-cloudformation");

    // 2回目は前回のテンプレートをバックアップする
    stackflow(&project.path())
        .arg("--project")
        .arg(project.path())
        .args(["synth", "--output", "stack.out"])
        .assert()
        .success();
    assert!(out_dir.join("web.template.json.backup").exists());
}

#[test]
fn test_synth_output_without_value_uses_default_dir() {
    let project = TestProject::with_defaults();
    stackflow(&project.path())
        .arg("--project")
        .arg(project.path())
        .args(["synth", "--format", "json", "--output"])
        .assert()
        .success();

    assert!(project.path().join("stack.out").join("web.template.json").exists());
    assert!(project.path().join("stack.out").join("manifest.json").exists());
}

#[test]
fn test_graph_prints_declared_resources() {
    let project = TestProject::with_defaults();
    let output = stackflow(&project.path())
        .current_dir(project.path())
        .arg("graph")
        .output()
        .unwrap();
    assert!(output.status.success());

    let graph: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(graph["stack_name"], "web");
    assert_eq!(graph["resources"].as_array().unwrap().len(), 3);
    assert_eq!(graph["rules"].as_array().unwrap().len(), 3);
    assert_eq!(graph["outputs"][0]["name"], "Output");
}

#[test]
fn test_graph_uses_stack_config_path() {
    let project = TestProject::with_defaults();
    fs::write(
        project.path().join("custom.kdl"),
        common::STACK_KDL.replace("project \"web\"", "project \"custom\""),
    )
    .unwrap();

    let output = stackflow(&project.path())
        .current_dir(project.path())
        .env("STACK_CONFIG_PATH", project.path().join("custom.kdl"))
        .arg("graph")
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let graph: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(graph["stack_name"], "custom");
}

#[test]
fn test_graph_with_file_flag() {
    let project = TestProject::with_defaults();
    let elsewhere = tempfile::tempdir().unwrap();
    fs::write(
        project.path().join("custom.kdl"),
        common::STACK_KDL.replace("project \"web\"", "project \"custom\""),
    )
    .unwrap();

    let output = stackflow(&project.path())
        .current_dir(elsewhere.path())
        .arg("--file")
        .arg(project.path().join("custom.kdl"))
        .arg("graph")
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let graph: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(graph["stack_name"], "custom");
}

#[test]
fn test_graph_with_hidden_stack_file() {
    let project = TestProject::new();
    fs::write(project.path().join(".stack.kdl"), common::STACK_KDL).unwrap();
    project.write_user_data(USER_DATA);

    let output = stackflow(&project.path())
        .current_dir(project.path())
        .arg("graph")
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let graph: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(graph["stack_name"], "web");
}

#[test]
fn test_init_creates_starter_project() {
    let dir = tempfile::tempdir().unwrap();
    stackflow(dir.path())
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    assert!(dir.path().join("stack.kdl").exists());
    assert!(dir.path().join("user_data/user_data.sh").exists());

    // 雛形はそのまま検証を通る
    stackflow(dir.path())
        .current_dir(dir.path())
        .arg("validate")
        .assert()
        .success();
}
