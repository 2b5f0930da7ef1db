use colored::Colorize;
use stackflow_cloud::{AssemblyWriter, Synthesizer, TemplateFormat};
use stackflow_cloud_aws::CloudFormationSynthesizer;
use stackflow_core::{LoadedProject, TopologyBuilder};
use std::path::Path;

/// テンプレートを生成し、標準出力またはクラウドアセンブリへ書き出す
///
/// アセンブリは常に JSON で書き出す（format は標準出力時のみ有効）。
pub async fn handle(
    project: &LoadedProject,
    format: TemplateFormat,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let network = project.network()?;
    let topology = TopologyBuilder::new(project.options.clone()).build(network);

    let synthesizer = CloudFormationSynthesizer::new();
    let template = synthesizer.synthesize(&topology.graph)?;

    let Some(out_dir) = output else {
        let rendered = format.render(&template)?;
        print!("{}", rendered);
        if !rendered.ends_with('\n') {
            println!();
        }
        return Ok(());
    };

    let out_dir = if out_dir.is_absolute() {
        out_dir.to_path_buf()
    } else {
        project.root.join(out_dir)
    };
    let writer = AssemblyWriter::new(&out_dir);
    let path = writer
        .write(
            &topology.graph.stack_name,
            synthesizer.name(),
            &template,
        )
        .await?;

    eprintln!(
        "{} {} ({})",
        "✓".green().bold(),
        path.display().to_string().cyan(),
        template.summary()
    );
    eprintln!(
        "  {}: {}",
        "デプロイ".bold(),
        format!(
            "aws cloudformation deploy --template-file {} --stack-name {} --capabilities CAPABILITY_IAM",
            path.display(),
            topology.graph.stack_name
        )
        .dimmed()
    );
    Ok(())
}
