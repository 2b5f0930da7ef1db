use stackflow_core::{LoadedProject, TopologyBuilder};

/// 宣言されたリソースグラフを JSON で表示
pub fn handle(project: &LoadedProject) -> anyhow::Result<()> {
    let network = project.network()?;
    let topology = TopologyBuilder::new(project.options.clone()).build(network);
    println!("{}", serde_json::to_string_pretty(&topology.graph)?);
    Ok(())
}
