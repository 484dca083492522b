use crate::core::{assembler::*, interfaces::*, models::*, services::*};
use crate::infrastructure::TokioFileSystemService;
use crate::utils::{ConfigLoader, Logger, Result, CONFIG_FILE_NAME};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "kumi")]
#[command(about = "Kumi - Declarative build configuration assembler", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Mode as spelled on the command line.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ModeArg {
    Development,
    Production,
}

impl From<ModeArg> for BuildMode {
    fn from(value: ModeArg) -> Self {
        match value {
            ModeArg::Development => BuildMode::Development,
            ModeArg::Production => BuildMode::Production,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the assembled record as JSON on stdout
    Show {
        /// Root directory
        #[arg(short, long, default_value = ".")]
        root: String,
        /// Build mode (overrides NODE_ENV and the config file)
        #[arg(short, long, value_enum)]
        mode: Option<ModeArg>,
        /// Output directory override
        #[arg(short, long)]
        outdir: Option<String>,
        /// Dev server port override
        #[arg(short, long)]
        port: Option<u16>,
        /// Single-line JSON instead of pretty-printed
        #[arg(long)]
        compact: bool,
    },
    /// Assemble and write the record to disk
    Emit {
        /// Root directory
        #[arg(short, long, default_value = ".")]
        root: String,
        /// Build mode (overrides NODE_ENV and the config file)
        #[arg(short, long, value_enum)]
        mode: Option<ModeArg>,
        /// Output directory override
        #[arg(short, long)]
        outdir: Option<String>,
        /// Dev server port override
        #[arg(short, long)]
        port: Option<u16>,
        /// Artifact path (default: <root>/kumi.assembled.json)
        #[arg(short = 'f', long)]
        out_file: Option<String>,
    },
    /// Show which module rules apply to a file
    Explain {
        /// Module path to check against the rule matrix
        file: String,
        /// Root directory
        #[arg(short, long, default_value = ".")]
        root: String,
        /// Build mode (overrides NODE_ENV and the config file)
        #[arg(short, long, value_enum)]
        mode: Option<ModeArg>,
    },
    /// Write a starter kumi.config.json
    Init {
        /// Root directory
        #[arg(short, long, default_value = ".")]
        root: String,
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
    /// Show assembler information
    Info,
}

pub struct CliHandler;

impl CliHandler {
    pub fn new() -> Self {
        Self
    }

    pub async fn run(&self) -> Result<()> {
        // Initialize logging
        Logger::init();

        let cli = Cli::parse();

        match cli.command {
            Commands::Show {
                root,
                mode,
                outdir,
                port,
                compact,
            } => {
                self.handle_show_command(&root, mode, outdir.as_deref(), port, compact)
                    .await
            }
            Commands::Emit {
                root,
                mode,
                outdir,
                port,
                out_file,
            } => {
                self.handle_emit_command(&root, mode, outdir.as_deref(), port, out_file.as_deref())
                    .await
            }
            Commands::Explain { file, root, mode } => {
                self.handle_explain_command(&file, &root, mode).await
            }
            Commands::Init { root, force } => self.handle_init_command(&root, force).await,
            Commands::Info => self.handle_info_command().await,
        }
    }

    /// Resolve mode and layout from flags, NODE_ENV, and the config file.
    /// Precedence: flags, then a recognized NODE_ENV, then the file, then
    /// the development defaults.
    fn resolve_inputs(
        &self,
        root: &str,
        mode_flag: Option<ModeArg>,
        outdir: Option<&str>,
        port: Option<u16>,
    ) -> Result<(BuildMode, ProjectLayout)> {
        let root = PathBuf::from(root);
        let file_config = ConfigLoader::load_from_file(&root)?;

        let mode_hint = match mode_flag {
            Some(flag) => {
                let mode = BuildMode::from(flag);
                Logger::mode_resolved(mode, "--mode flag");
                Some(mode)
            }
            None => Self::mode_from_env(),
        };

        Ok(ConfigLoader::merge_with_cli(
            file_config,
            root,
            mode_hint,
            outdir,
            port,
        ))
    }

    /// One place reads NODE_ENV.
    fn mode_from_env() -> Option<BuildMode> {
        let raw = std::env::var("NODE_ENV").ok();
        Self::mode_from_env_value(raw.as_deref())
    }

    /// Maps a raw NODE_ENV value to a mode hint. A set but unrecognized
    /// value is ignored with a warning, which lands on development unless
    /// the config file says otherwise.
    fn mode_from_env_value(raw: Option<&str>) -> Option<BuildMode> {
        let raw = raw?;
        match BuildMode::recognize(raw) {
            Some(mode) => {
                Logger::mode_resolved(mode, "NODE_ENV");
                Some(mode)
            }
            None => {
                Logger::warn(&format!("Unrecognized NODE_ENV {:?}, ignoring", raw));
                None
            }
        }
    }

    fn assemble_service(&self) -> AssembleService {
        let fs_service: Arc<dyn FileSystemService> = Arc::new(TokioFileSystemService::new());
        AssembleService::new(fs_service)
    }

    async fn handle_show_command(
        &self,
        root: &str,
        mode_flag: Option<ModeArg>,
        outdir: Option<&str>,
        port: Option<u16>,
        compact: bool,
    ) -> Result<()> {
        let (mode, layout) = self.resolve_inputs(root, mode_flag, outdir, port)?;

        let service = self.assemble_service();
        let record = service.assemble_record(mode, &layout);
        println!("{}", service.render(&record, compact)?);

        Ok(())
    }

    async fn handle_emit_command(
        &self,
        root: &str,
        mode_flag: Option<ModeArg>,
        outdir: Option<&str>,
        port: Option<u16>,
        out_file: Option<&str>,
    ) -> Result<()> {
        let (mode, layout) = self.resolve_inputs(root, mode_flag, outdir, port)?;
        Logger::assemble_start(mode, &layout.root.display().to_string());

        let service = self.assemble_service();
        let record = service.assemble_record(mode, &layout);

        let out_path = out_file
            .map(PathBuf::from)
            .unwrap_or_else(|| AssembleService::default_artifact_path(&layout.root));
        let report = service.emit(&record, &out_path).await?;

        println!();
        println!("  {} record emitted", "✅".green());
        println!("  {} {}", "Path:".bold(), report.path.display());
        println!("  {} {} bytes", "Size:".bold(), report.bytes);
        println!("  {} {}", "Mode:".bold(), mode.to_string().bright_cyan());

        Ok(())
    }

    async fn handle_explain_command(
        &self,
        file: &str,
        root: &str,
        mode_flag: Option<ModeArg>,
    ) -> Result<()> {
        let (mode, layout) = self.resolve_inputs(root, mode_flag, None, None)?;

        let assembler = ConfigAssembler::new(mode, layout);
        let rules = assembler.module_rules();
        let hits = matching_rules(&rules, file);

        println!("  {} {}", "File:".bold(), file);
        println!("  {} {}", "Mode:".bold(), mode);
        if hits.is_empty() {
            println!("  {}", "No module rules match this file".yellow());
        } else {
            for rule in hits {
                println!(
                    "  {} {} {}",
                    "✔".green(),
                    rule.test.bright_cyan(),
                    rule.loader_names().join(", ")
                );
                println!(
                    "      {} {}",
                    "applies right-to-left:".bright_black(),
                    rule.application_order().join(", ")
                );
            }
        }

        Ok(())
    }

    async fn handle_init_command(&self, root: &str, force: bool) -> Result<()> {
        let path = ConfigLoader::write_starter(Path::new(root), force)?;
        println!("  {} wrote {}", "✅".green(), path.display().to_string().bold());
        Ok(())
    }

    async fn handle_info_command(&self) -> Result<()> {
        println!();
        println!(
            "  {} {}",
            "KUMI".bright_cyan().bold(),
            env!("CARGO_PKG_VERSION").bright_white()
        );
        println!("  Declarative build configuration assembler");
        println!();
        println!("  {}", "Commands:".bold());
        println!("    show     print the assembled record as JSON");
        println!("    emit     write the record to kumi.assembled.json");
        println!("    explain  show which module rules apply to a file");
        println!("    init     write a starter {}", CONFIG_FILE_NAME);
        println!();
        println!("  {}", "Mode resolution:".bold());
        println!("    --mode flag, then NODE_ENV, then {}, then development", CONFIG_FILE_NAME);
        println!();
        println!("  {}", "Record contents:".bold());
        println!("    entries, output naming, resolve aliases, optimization,");
        println!("    dev server, devtool, plugin roster, module rule matrix");
        println!();

        Ok(())
    }
}

impl Default for CliHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::KumiConfig;

    #[test]
    fn test_mode_hint_from_env_value() {
        assert_eq!(
            CliHandler::mode_from_env_value(Some("production")),
            Some(BuildMode::Production)
        );
        assert_eq!(
            CliHandler::mode_from_env_value(Some("development")),
            Some(BuildMode::Development)
        );
        assert_eq!(CliHandler::mode_from_env_value(Some("staging")), None);
        assert_eq!(CliHandler::mode_from_env_value(Some("")), None);
        assert_eq!(CliHandler::mode_from_env_value(None), None);
    }

    #[test]
    fn test_recognized_env_hint_beats_file_mode() {
        let file_config = KumiConfig {
            mode: Some("development".to_string()),
            ..Default::default()
        };

        let hint = CliHandler::mode_from_env_value(Some("production"));
        let (mode, _) = ConfigLoader::merge_with_cli(
            Some(file_config),
            PathBuf::from("."),
            hint,
            None,
            None,
        );
        assert_eq!(mode, BuildMode::Production);
    }

    #[test]
    fn test_unrecognized_env_falls_through_to_file_mode() {
        let file_config = KumiConfig {
            mode: Some("production".to_string()),
            ..Default::default()
        };

        let hint = CliHandler::mode_from_env_value(Some("staging"));
        assert!(hint.is_none());

        let (mode, _) = ConfigLoader::merge_with_cli(
            Some(file_config),
            PathBuf::from("."),
            hint,
            None,
            None,
        );
        assert_eq!(mode, BuildMode::Production);
    }
}
