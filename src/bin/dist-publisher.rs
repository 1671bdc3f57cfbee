//! Dist Publisher CLI
//!
//! Publish built distribution artifacts to one or more targets, with
//! dry-run snapshots that can be resumed later.

use clap::{Parser, Subcommand};
use dist_publisher::{
    BuildOptions, CommandArtifactBuilder, ConfigLoader, PublishError, PublishOptions,
    PublishOrchestrator, TargetResolver, TargetSpec, current_platform,
};
use secrecy::SecretString;
use std::collections::HashMap;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

/// Artifact publish orchestrator with resumable dry runs
#[derive(Parser)]
#[command(name = "dist-publisher")]
#[command(version = "0.1.0")]
#[command(about = "Publish built distribution artifacts to configured targets", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Publish artifacts to the configured targets
    Publish {
        /// Project path (defaults to current directory)
        #[arg(value_name = "PROJECT_PATH")]
        project_path: Option<PathBuf>,

        /// Publish target (repeatable; defaults to the configured list)
        #[arg(short, long = "target")]
        targets: Vec<String>,

        /// Release tag (defaults to the package version)
        #[arg(long)]
        tag: Option<String>,

        /// Save build results as a dry-run snapshot instead of publishing
        #[arg(long)]
        dry_run: bool,

        /// Resume a previously saved dry run
        #[arg(long)]
        dry_run_resume: bool,

        /// Output directory override
        #[arg(long)]
        out_dir: Option<PathBuf>,

        /// Non-interactive mode (CI/CD)
        #[arg(long)]
        non_interactive: bool,

        /// Authentication token forwarded to publishers
        #[arg(long, env = "DIST_PUBLISHER_TOKEN", hide_env_values = true)]
        auth_token: Option<String>,

        /// Target platform override
        #[arg(long)]
        platform: Option<String>,

        /// Target architecture override
        #[arg(long)]
        arch: Option<String>,
    },

    /// Check the project configuration and target resolvability
    Check {
        /// Project path (defaults to current directory)
        #[arg(value_name = "PROJECT_PATH")]
        project_path: Option<PathBuf>,

        /// Platform whose target list is checked (defaults to the host)
        #[arg(long)]
        platform: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Publish {
            project_path,
            targets,
            tag,
            dry_run,
            dry_run_resume,
            out_dir,
            non_interactive,
            auth_token,
            platform,
            arch,
        } => {
            run_publish(PublishOptions {
                dir: project_path.unwrap_or_else(|| PathBuf::from(".")),
                interactive: !non_interactive,
                auth_token: auth_token.map(SecretString::from),
                tag,
                targets: if targets.is_empty() {
                    None
                } else {
                    Some(TargetSpec::List(targets))
                },
                build_options: BuildOptions {
                    platform,
                    arch,
                    extra: HashMap::new(),
                },
                out_dir,
                dry_run,
                dry_run_resume,
                build_results: None,
            })
            .await
        }
        Commands::Check {
            project_path,
            platform,
        } => run_check(project_path.unwrap_or_else(|| PathBuf::from(".")), platform).await,
    };

    if let Err(error) = result {
        eprintln!("\n❌ {}", error);
        let actions = error.suggested_actions();
        if !actions.is_empty() {
            eprintln!("\n💡 対処方法:");
            for action in actions {
                eprintln!("  - {}", action);
            }
        }
        process::exit(1);
    }
}

async fn run_publish(options: PublishOptions) -> Result<(), PublishError> {
    let orchestrator = PublishOrchestrator::new(Arc::new(CommandArtifactBuilder::new()));
    let report = orchestrator.publish(&options).await?;

    for warning in &report.warnings {
        eprintln!("⚠️  {}", warning);
    }

    if let Some(dir) = &report.dry_run_dir {
        println!("💾 Dry run saved: {}", dir.display());
        println!("   Resume with --dry-run-resume");
    } else {
        println!(
            "✅ Published to {} target(s) in {}ms",
            report.published_targets.len(),
            report.duration
        );
        for target in &report.published_targets {
            println!("  - {}", target);
        }
    }

    Ok(())
}

async fn run_check(dir: PathBuf, platform: Option<String>) -> Result<(), PublishError> {
    let root = ConfigLoader::resolve_project_root(&dir).await?;
    let config = ConfigLoader::load(&root).await?;
    let platform = platform.unwrap_or_else(|| current_platform().to_string());

    println!("📦 {} {}", config.package.name, config.package.version);
    println!("   Project root: {}", root.display());

    let targets = config
        .targets_for_platform(&platform)
        .cloned()
        .unwrap_or_default();
    if targets.is_empty() {
        println!("⚠️  No publish targets configured for platform {}", platform);
        return Ok(());
    }

    let resolver = TargetResolver::new();
    println!("   Targets for {}:", platform);
    for target in &targets {
        match resolver.resolve(target, &root).await {
            Ok(_) => println!("  ✅ {}", target),
            Err(_) => println!("  ❌ {} (not resolvable)", target),
        }
    }

    Ok(())
}
