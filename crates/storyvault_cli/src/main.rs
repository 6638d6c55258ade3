//! StoryVault command-line entry point.
//!
//! Commands:
//! - `export`: project JSON file to zip archive
//! - `export-stored`: project from a SQLite store to zip archive
//! - `import`: zip archive to project JSON, optionally stored
//! - `inspect`: list the fields an archive would import
//! - `list`: list projects in a SQLite store

use clap::{Parser, Subcommand};
use log::info;
use std::error::Error;
use std::path::{Path, PathBuf};
use storyvault_core::archive::read_groups;
use storyvault_core::db::open_db;
use storyvault_core::{
    default_log_level, export_project, import_project, init_logging, ArchiveConfig,
    ArchiveService, Project, ProjectId, ProjectRepository, RandomIdGenerator,
    SqliteProjectRepository,
};

#[derive(Parser)]
#[command(
    name = "storyvault",
    about = "Export and import writing projects as browsable zip archives",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Archive config JSON (chunk size, labels, import defaults)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level: trace|debug|info|warn|error
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Absolute directory for rolling log files; logging is off when omitted
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Export a project JSON file as a zip archive
    Export {
        /// Project JSON file
        project: PathBuf,
        /// Output path (defaults to `<title>_archive.zip`)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Export a project held in a SQLite project store
    ExportStored {
        /// Project store file
        #[arg(long)]
        db: PathBuf,
        /// Project id
        #[arg(long)]
        id: String,
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Import a zip archive as a new project
    Import {
        /// Archive file
        archive: PathBuf,
        /// Write the project JSON here instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Also insert the project into this SQLite project store
        #[arg(long)]
        db: Option<PathBuf>,
    },

    /// Show the field groups an archive contains
    Inspect {
        /// Archive file
        archive: PathBuf,
    },

    /// List projects in a SQLite project store
    List {
        /// Project store file
        #[arg(long)]
        db: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, &log_dir.to_string_lossy())?;
    }

    let config = match cli.config.as_deref() {
        Some(path) => ArchiveConfig::load(path)?,
        None => ArchiveConfig::default(),
    };

    match cli.command {
        Commands::Export { project, out } => {
            let raw = std::fs::read_to_string(&project)?;
            let project: Project = serde_json::from_str(&raw)?;
            let archive = export_project(&project, &config)?;
            write_archive_file(out, &archive.file_name, &archive.bytes)?;
        }
        Commands::ExportStored { db, id, out } => {
            let id = ProjectId::parse_str(id.trim())?;
            let mut conn = open_db(&db)?;
            let service = ArchiveService::new(
                SqliteProjectRepository::new(&mut conn),
                RandomIdGenerator,
                config,
            )?;
            let archive = service.export(id)?;
            write_archive_file(out, &archive.file_name, &archive.bytes)?;
        }
        Commands::Import { archive, out, db } => {
            let bytes = std::fs::read(&archive)?;
            let project = match db {
                Some(db) => {
                    let mut conn = open_db(&db)?;
                    let mut service = ArchiveService::new(
                        SqliteProjectRepository::new(&mut conn),
                        RandomIdGenerator,
                        config,
                    )?;
                    service.import(&bytes)?
                }
                None => import_project(&bytes, &config, &mut RandomIdGenerator)?,
            };
            let json = serde_json::to_string_pretty(&project)?;
            match out {
                Some(path) => std::fs::write(path, json)?,
                None => println!("{json}"),
            }
            info!("event=cli_import module=cli status=ok project_id={}", project.id);
        }
        Commands::Inspect { archive } => {
            let bytes = std::fs::read(&archive)?;
            let scan = read_groups(&bytes, &config)?;
            println!(
                "root={}",
                scan.root_folder.as_deref().unwrap_or("<none>")
            );
            for group in &scan.groups {
                println!(
                    "{}\t{}\tchunks={}",
                    group.section.label(),
                    group.base_key,
                    group.chunks.len()
                );
            }
            println!(
                "groups={} skipped_entries={}",
                scan.groups.len(),
                scan.skipped_entries
            );
        }
        Commands::List { db } => {
            let mut conn = open_db(&db)?;
            let repo = SqliteProjectRepository::new(&mut conn);
            for project in repo.list_projects()? {
                println!(
                    "{}\t{}\t{}\t{}\tchapters={}\tnotes={}",
                    project.id,
                    project.title,
                    project.author,
                    project.status.as_str(),
                    project.chapter_count,
                    project.note_count
                );
            }
        }
    }

    Ok(())
}

fn write_archive_file(
    out: Option<PathBuf>,
    suggested_name: &str,
    bytes: &[u8],
) -> std::io::Result<()> {
    let path = out.unwrap_or_else(|| Path::new(suggested_name).to_path_buf());
    std::fs::write(&path, bytes)?;
    println!("wrote {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}
