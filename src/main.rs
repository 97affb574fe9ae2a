//! Tether CLI - deployment tracking for AI assistant artifacts
//!
//! Usage: tether <COMMAND>
//!
//! Commands:
//!   deploy    Copy collection artifacts into a project
//!   undeploy  Remove a deployed artifact and its records
//!   list      Show deployment records of a project
//!   status    Check deployed copies for local drift
//!   graph     Show an artifact's version graph across projects
//!   projects  List (or prune) registered projects

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use is_terminal::IsTerminal;

use tether::application::{DeployOptions, DeployReport, ProfileSelection};
use tether::config::Config;
use tether::domain::entities::{VersionGraph, VersionGraphNode};
use tether::domain::ports::{
    AlwaysConfirm, ConfirmOverwrite, DeployEventSink, NeverConfirm, NoopEventSink,
};
use tether::infrastructure::{InteractiveConfirm, JsonEventSink};
use tether::presentation::factory;
use tether::ArtifactId;

/// Tether - deployment tracking and version lineage for AI assistant artifacts
#[derive(Parser, Debug)]
#[command(name = "tether")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Machine-readable output
    #[arg(long, global = true)]
    json: bool,

    /// Verbose logging (same as TETHER_LOG=tether=debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to ~/.tether/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Copy collection artifacts into a project
    Deploy {
        /// Artifacts as type:name (e.g. skill:pdf); omit with --all
        #[arg(required_unless_present = "all")]
        artifacts: Vec<ArtifactId>,

        /// Deploy every artifact of the collection
        #[arg(long, conflicts_with = "artifacts")]
        all: bool,

        /// Project root
        #[arg(short, long, default_value = ".")]
        project: PathBuf,

        /// Collection to deploy from
        #[arg(short, long)]
        collection: Option<String>,

        /// Deploy under this profile only
        #[arg(long, conflicts_with = "all_profiles")]
        profile: Option<String>,

        /// Deploy under every configured profile
        #[arg(long)]
        all_profiles: bool,

        /// Replace existing content without asking
        #[arg(short, long)]
        overwrite: bool,

        /// Answer yes to every overwrite prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Remove a deployed artifact and its records
    Undeploy {
        artifact: ArtifactId,

        #[arg(short, long, default_value = ".")]
        project: PathBuf,

        /// Only remove the copy under this profile
        #[arg(long)]
        profile: Option<String>,
    },

    /// Show deployment records of a project
    List {
        #[arg(short, long, default_value = ".")]
        project: PathBuf,

        #[arg(long)]
        profile: Option<String>,
    },

    /// Check deployed copies for local drift
    Status {
        /// Check a single artifact instead of the whole project
        artifact: Option<ArtifactId>,

        #[arg(short, long, default_value = ".")]
        project: PathBuf,

        #[arg(long)]
        profile: Option<String>,

        /// Write the results back onto the records
        #[arg(long)]
        refresh: bool,
    },

    /// Show an artifact's version graph across registered projects
    Graph {
        artifact: ArtifactId,

        /// Restrict to one collection
        #[arg(short, long)]
        collection: Option<String>,
    },

    /// List registered projects
    Projects {
        /// Drop projects whose directory no longer exists
        #[arg(long)]
        prune: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let (config, warnings) = Config::discover(cli.config.as_deref())?;
    tether::logging::init_logging(&config.logging, cli.verbose)?;
    for warning in &warnings {
        tracing::warn!("{}", warning);
    }

    match cli.command {
        Commands::Deploy {
            artifacts,
            all,
            project,
            collection,
            profile,
            all_profiles,
            overwrite,
            yes,
        } => {
            let options = DeployOptions::new(project)
                .with_profiles(ProfileSelection::from_args(profile.as_deref(), all_profiles))
                .with_overwrite(overwrite);
            let options = match collection.or_else(|| config.default_collection.clone()) {
                Some(name) => options.with_collection(name),
                None => options,
            };
            cmd_deploy(&config, &artifacts, all, &options, yes, cli.json)
        }
        Commands::Undeploy {
            artifact,
            project,
            profile,
        } => cmd_undeploy(&config, &artifact, &project, profile.as_deref(), cli.json),
        Commands::List { project, profile } => {
            cmd_list(&config, &project, profile.as_deref(), cli.json)
        }
        Commands::Status {
            artifact,
            project,
            profile,
            refresh,
        } => cmd_status(
            &config,
            artifact.as_ref(),
            &project,
            profile.as_deref(),
            refresh,
            cli.json,
        ),
        Commands::Graph {
            artifact,
            collection,
        } => cmd_graph(&config, &artifact, collection.as_deref(), cli.json),
        Commands::Projects { prune } => cmd_projects(&config, prune, cli.json),
    }
}

fn confirm_for(yes: bool, json: bool) -> Arc<dyn ConfirmOverwrite> {
    if yes {
        Arc::new(AlwaysConfirm)
    } else if json || !std::io::stdin().is_terminal() {
        Arc::new(NeverConfirm)
    } else {
        Arc::new(InteractiveConfirm::new())
    }
}

fn events_for(json: bool) -> Arc<dyn DeployEventSink> {
    if json {
        Arc::new(JsonEventSink::stdout())
    } else {
        Arc::new(NoopEventSink)
    }
}

fn cmd_deploy(
    config: &Config,
    artifacts: &[ArtifactId],
    all: bool,
    options: &DeployOptions,
    yes: bool,
    json: bool,
) -> Result<()> {
    let manager =
        factory::create_deployment_manager(config, events_for(json), confirm_for(yes, json));

    let report = if all {
        manager.deploy_all(options)?
    } else {
        manager.deploy_artifacts(artifacts, options)?
    };

    if json {
        let output = serde_json::json!({
            "event": "deploy_complete",
            "status": if report.is_success() { "success" } else { "partial" },
            "report": &report,
        });
        println!("{}", serde_json::to_string(&output)?);
    } else {
        print_deploy_report(&report);
    }

    if !report.is_success() {
        anyhow::bail!("{} deployment(s) failed", report.failed.len());
    }
    Ok(())
}

fn print_deploy_report(report: &DeployReport) {
    for item in &report.deployed {
        println!(
            "✓ {} [{}] → {}",
            item.artifact,
            item.profile_id,
            item.destination.display()
        );
    }
    for item in &report.skipped {
        println!("⚠ {} [{}] skipped: {}", item.artifact, item.profile_id, item.reason);
    }
    for item in &report.failed {
        println!("✗ {} [{}] failed: {}", item.artifact, item.profile_id, item.reason);
    }
    println!(
        "\nDeployed {}, skipped {}, failed {}",
        report.deployed.len(),
        report.skipped.len(),
        report.failed.len()
    );
}

fn cmd_undeploy(
    config: &Config,
    artifact: &ArtifactId,
    project: &Path,
    profile: Option<&str>,
    json: bool,
) -> Result<()> {
    let manager =
        factory::create_deployment_manager(config, events_for(json), Arc::new(NeverConfirm));
    let report = manager.undeploy(artifact, project, profile)?;

    if json {
        println!("{}", serde_json::to_string(&report)?);
    } else {
        for path in &report.removed_paths {
            println!("✓ removed {}", path.display());
        }
        println!(
            "Removed {} record(s) for {}",
            report.removed_records, report.artifact
        );
    }
    Ok(())
}

fn cmd_list(config: &Config, project: &Path, profile: Option<&str>, json: bool) -> Result<()> {
    let manager =
        factory::create_deployment_manager(config, Arc::new(NoopEventSink), Arc::new(NeverConfirm));
    let records = manager.list_deployments(project, profile)?;

    if json {
        let items: Vec<_> = records
            .iter()
            .map(|r| {
                serde_json::json!({
                    "artifact": format!("{}:{}", r.artifact_type, r.artifact_name),
                    "profile_id": r.profile_id(),
                    "collection": r.source_collection_name,
                    "path": r.absolute_path(project).display().to_string(),
                    "content_hash": r.content_hash.to_string(),
                    "deployed_at": r.deployed_at,
                    "local_modifications": r.local_modifications,
                })
            })
            .collect();
        println!("{}", serde_json::to_string(&items)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("No deployments in {}", project.display());
        return Ok(());
    }
    for r in &records {
        println!(
            "{}:{} [{}] from {} at {}",
            r.artifact_type,
            r.artifact_name,
            r.profile_id(),
            r.source_collection_name,
            r.relative_path
        );
    }
    Ok(())
}

fn cmd_status(
    config: &Config,
    artifact: Option<&ArtifactId>,
    project: &Path,
    profile: Option<&str>,
    refresh: bool,
    json: bool,
) -> Result<()> {
    let manager =
        factory::create_deployment_manager(config, Arc::new(NoopEventSink), Arc::new(NeverConfirm));

    if let Some(artifact) = artifact {
        let status = manager.check_deployment_status(artifact, project, profile)?;
        if json {
            let output = serde_json::json!({ "artifact": artifact.to_string(), "status": status });
            println!("{}", serde_json::to_string(&output)?);
        } else {
            println!("{}: {}", artifact, status);
        }
        return Ok(());
    }

    let report = manager.compute_deployment_statuses_batch(project, None, profile)?;
    if refresh {
        let updated = manager
            .refresh_modification_flags(project, &report)
            .context("failed to write status back to records")?;
        tracing::info!(updated, "refreshed modification flags");
    }

    if json {
        println!("{}", serde_json::to_string(&report)?);
        return Ok(());
    }

    for (key, status) in &report.statuses {
        let marker = if status.is_modified() { "✗" } else { "✓" };
        println!("{} {} {}", marker, key, status);
    }
    for failure in &report.failures {
        println!("? {} {}: {}", failure.key, failure.path.display(), failure.error);
    }
    Ok(())
}

fn cmd_graph(
    config: &Config,
    artifact: &ArtifactId,
    collection: Option<&str>,
    json: bool,
) -> Result<()> {
    let builder = factory::create_graph_builder(config);
    let graph = builder.build_graph(artifact, collection)?;

    if json {
        println!("{}", serde_json::to_string(graph.as_ref())?);
    } else {
        print_graph(&graph);
    }
    Ok(())
}

fn print_graph(graph: &VersionGraph) {
    match &graph.root {
        Some(root) => print_node(root, 0),
        None => println!("{} (not in any collection)", graph.artifact),
    }
    if !graph.orphaned_nodes.is_empty() {
        println!("orphaned:");
        for node in &graph.orphaned_nodes {
            print_node(node, 1);
        }
    }
    let stats = &graph.statistics;
    println!(
        "\n{} deployment(s): {} unmodified, {} modified, {} orphaned",
        stats.total_deployments, stats.unmodified_count, stats.modified_count, stats.orphan_count
    );
}

fn print_node(node: &VersionGraphNode, depth: usize) {
    let version = &node.version;
    let marker = if version.is_modified() { " (modified)" } else { "" };
    println!(
        "{}{} {}{}",
        "  ".repeat(depth),
        version.location,
        version.content_sha.short(),
        marker
    );
    for child in &node.children {
        print_node(child, depth + 1);
    }
}

fn cmd_projects(config: &Config, prune: bool, json: bool) -> Result<()> {
    use tether::domain::ports::RegistryRepository;

    let registry = factory::create_registry(config);
    let pruned = if prune { registry.prune()? } else { Vec::new() };
    let loaded = registry.load()?;
    let projects = loaded.recent_first();

    if json {
        let items: Vec<_> = projects
            .iter()
            .map(|p| {
                serde_json::json!({
                    "path": p.path.display().to_string(),
                    "last_deployed": p.last_deployed,
                    "deployment_count": p.deployment_count,
                })
            })
            .collect();
        let pruned: Vec<_> = pruned.iter().map(|p| p.display().to_string()).collect();
        let output = serde_json::json!({ "projects": items, "pruned": pruned });
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }

    for path in &pruned {
        println!("- pruned {}", path.display());
    }
    println!("Registry: {}", registry.path().display());
    for p in projects {
        println!(
            "  {} ({} deployment(s), last {})",
            p.path.display(),
            p.deployment_count,
            p.last_deployed.format("%Y-%m-%d %H:%M")
        );
    }
    Ok(())
}
