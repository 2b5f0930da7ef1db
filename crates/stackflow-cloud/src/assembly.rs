//! Cloud assembly output
//!
//! Writes synthesized templates into an output directory (`cdk.out` style)
//! together with a `manifest.json` listing every stack written there.

use crate::error::{CloudError, Result};
use crate::template::Template;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;

const MANIFEST_VERSION: u32 = 1;
const MANIFEST_FILE: &str = "manifest.json";
pub const DEFAULT_OUT_DIR: &str = "stack.out";

/// Manifest describing the contents of an assembly directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssemblyManifest {
    /// Manifest file version
    pub version: u32,

    /// Stacks indexed by stack name
    pub stacks: BTreeMap<String, StackArtifact>,
}

impl Default for AssemblyManifest {
    fn default() -> Self {
        Self {
            version: MANIFEST_VERSION,
            stacks: BTreeMap::new(),
        }
    }
}

/// A single synthesized stack
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StackArtifact {
    /// Template file name, relative to the assembly directory
    pub template_file: String,

    /// Name of the synthesizer that produced the template
    pub synthesizer: String,

    /// Number of resources in the template
    pub resource_count: usize,

    /// When the template was written
    pub generated_at: DateTime<Utc>,
}

/// Writer for assembly directories
pub struct AssemblyWriter {
    out_dir: PathBuf,
}

impl AssemblyWriter {
    pub fn new(out_dir: impl AsRef<Path>) -> Self {
        Self {
            out_dir: out_dir.as_ref().to_path_buf(),
        }
    }

    /// Get the template path for a stack
    pub fn template_path(&self, stack_name: &str) -> PathBuf {
        self.out_dir.join(template_file_name(stack_name))
    }

    fn backup_path(&self, stack_name: &str) -> PathBuf {
        self.out_dir
            .join(format!("{}.backup", template_file_name(stack_name)))
    }

    fn manifest_path(&self) -> PathBuf {
        self.out_dir.join(MANIFEST_FILE)
    }

    async fn ensure_out_dir(&self) -> Result<()> {
        if !self.out_dir.exists() {
            fs::create_dir_all(&self.out_dir).await?;
            tracing::debug!("Created assembly directory: {}", self.out_dir.display());
        }
        Ok(())
    }

    /// Load the manifest, or an empty one if the directory has none yet
    pub async fn load_manifest(&self) -> Result<AssemblyManifest> {
        let path = self.manifest_path();
        if !path.exists() {
            tracing::debug!("Manifest not found, returning empty manifest");
            return Ok(AssemblyManifest::default());
        }

        let content = fs::read_to_string(&path).await?;
        let manifest: AssemblyManifest = serde_json::from_str(&content)?;

        if manifest.version > MANIFEST_VERSION {
            return Err(CloudError::ManifestError(format!(
                "Manifest version {} is newer than supported version {}",
                manifest.version, MANIFEST_VERSION
            )));
        }

        Ok(manifest)
    }

    /// Load a previously written template
    pub async fn load_template(&self, stack_name: &str) -> Result<Template> {
        let content = fs::read_to_string(self.template_path(stack_name)).await?;
        Template::from_json(&content)
    }

    /// Write a template and register it in the manifest
    pub async fn write(
        &self,
        stack_name: &str,
        synthesizer: &str,
        template: &Template,
    ) -> Result<PathBuf> {
        self.ensure_out_dir().await?;
        let mut manifest = self.load_manifest().await?;

        let path = self.template_path(stack_name);
        let backup = self.backup_path(stack_name);

        // Keep the previous template next to the new one
        if path.exists() {
            if backup.exists() {
                fs::remove_file(&backup).await?;
            }
            fs::rename(&path, &backup).await?;
            tracing::debug!("Created template backup");
        }

        fs::write(&path, template.to_json()?).await?;

        manifest.stacks.insert(
            stack_name.to_string(),
            StackArtifact {
                template_file: template_file_name(stack_name),
                synthesizer: synthesizer.to_string(),
                resource_count: template.resources.len(),
                generated_at: Utc::now(),
            },
        );
        let content = serde_json::to_string_pretty(&manifest)?;
        fs::write(self.manifest_path(), content).await?;

        tracing::info!(
            stack = stack_name,
            path = %path.display(),
            resources = template.resources.len(),
            "Wrote template"
        );
        Ok(path)
    }
}

fn template_file_name(stack_name: &str) -> String {
    format!("{}.template.json", stack_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::TemplateResource;
    use tempfile::tempdir;

    fn template(resources: usize) -> Template {
        let mut template = Template::new();
        for i in 0..resources {
            template.add_resource(
                format!("Queue{}", i),
                TemplateResource::new("AWS::SQS::Queue"),
            );
        }
        template
    }

    #[tokio::test]
    async fn test_write_and_load() {
        let temp_dir = tempdir().unwrap();
        let writer = AssemblyWriter::new(temp_dir.path().join("stack.out"));

        let path = writer.write("web", "test", &template(2)).await.unwrap();
        assert!(path.ends_with("web.template.json"));

        let loaded = writer.load_template("web").await.unwrap();
        assert_eq!(loaded.resources.len(), 2);

        let manifest = writer.load_manifest().await.unwrap();
        assert_eq!(manifest.version, 1);
        let artifact = manifest.stacks.get("web").unwrap();
        assert_eq!(artifact.template_file, "web.template.json");
        assert_eq!(artifact.synthesizer, "test");
        assert_eq!(artifact.resource_count, 2);
    }

    #[tokio::test]
    async fn test_rewrite_keeps_backup() {
        let temp_dir = tempdir().unwrap();
        let writer = AssemblyWriter::new(temp_dir.path());

        writer.write("web", "test", &template(1)).await.unwrap();
        writer.write("web", "test", &template(3)).await.unwrap();

        let backup = temp_dir.path().join("web.template.json.backup");
        let previous = Template::from_json(&std::fs::read_to_string(backup).unwrap()).unwrap();
        assert_eq!(previous.resources.len(), 1);
        assert_eq!(writer.load_template("web").await.unwrap().resources.len(), 3);
    }

    #[tokio::test]
    async fn test_manifest_tracks_multiple_stacks() {
        let temp_dir = tempdir().unwrap();
        let writer = AssemblyWriter::new(temp_dir.path());

        writer.write("network", "test", &template(1)).await.unwrap();
        writer.write("compute", "test", &template(1)).await.unwrap();

        let manifest = writer.load_manifest().await.unwrap();
        let names: Vec<&String> = manifest.stacks.keys().collect();
        assert_eq!(names, vec!["compute", "network"]);
    }

    #[tokio::test]
    async fn test_empty_manifest() {
        let temp_dir = tempdir().unwrap();
        let writer = AssemblyWriter::new(temp_dir.path());

        let manifest = writer.load_manifest().await.unwrap();
        assert!(manifest.stacks.is_empty());
    }

    #[tokio::test]
    async fn test_newer_manifest_version_is_rejected() {
        let temp_dir = tempdir().unwrap();
        std::fs::write(
            temp_dir.path().join("manifest.json"),
            r#"{"version": 99, "stacks": {}}"#,
        )
        .unwrap();

        let writer = AssemblyWriter::new(temp_dir.path());
        assert!(matches!(
            writer.load_manifest().await,
            Err(CloudError::ManifestError(_))
        ));
    }
}
