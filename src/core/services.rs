use crate::core::assembler::ConfigAssembler;
use crate::core::interfaces::FileSystemService;
use crate::core::models::{BuildConfiguration, BuildMode, ProjectLayout};
use crate::utils::{Logger, Result, Timer};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// What `emit` wrote and where.
#[derive(Debug, Clone)]
pub struct EmitReport {
    pub path: PathBuf,
    pub bytes: usize,
}

/// Main assembly service implementation
///
/// Wraps the pure assembler with serialization and file output. All disk
/// access goes through the injected file system service so tests can run
/// against a temp directory.
pub struct AssembleService {
    fs_service: Arc<dyn FileSystemService>,
}

impl AssembleService {
    pub fn new(fs_service: Arc<dyn FileSystemService>) -> Self {
        Self { fs_service }
    }

    /// Default artifact path for a project root.
    pub fn default_artifact_path(root: &Path) -> PathBuf {
        root.join("kumi.assembled.json")
    }

    pub fn assemble_record(&self, mode: BuildMode, layout: &ProjectLayout) -> BuildConfiguration {
        let _timer = Timer::start("record assembly");

        let record = ConfigAssembler::new(mode, layout.clone()).assemble();
        Logger::assembled(
            record.entry.len(),
            record.module.rules.len(),
            record.plugins.len(),
        );
        record
    }

    /// Serializes a record. Pretty output is the default so emitted files
    /// diff cleanly; compact is for piping.
    pub fn render(&self, record: &BuildConfiguration, compact: bool) -> Result<String> {
        let json = if compact {
            serde_json::to_string(record)?
        } else {
            serde_json::to_string_pretty(record)?
        };
        Ok(json)
    }

    /// Writes the rendered record to disk, creating parent directories as
    /// needed. The payload always ends in a newline.
    pub async fn emit(&self, record: &BuildConfiguration, out_file: &Path) -> Result<EmitReport> {
        let _timer = Timer::start("record emission");

        let payload = format!("{}\n", self.render(record, false)?);

        if let Some(parent) = out_file.parent() {
            if !parent.as_os_str().is_empty() && !self.fs_service.file_exists(parent) {
                self.fs_service.create_directory(parent).await?;
            }
        }
        self.fs_service.write_file(out_file, &payload).await?;

        let report = EmitReport {
            path: out_file.to_path_buf(),
            bytes: payload.len(),
        };
        Logger::emitted(&report.path.to_string_lossy(), report.bytes);
        Ok(report)
    }
}
