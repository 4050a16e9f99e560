//! impress-resources CLI
//!
//! Manage resource collections in a SQLite database. Results are printed
//! as JSON on stdout; logs go to stderr.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;

use impress_resources::telemetry::init_tracing;
use impress_resources::{CollectionId, Manager, ProviderRegistry, ResourcesConfig};

#[derive(Parser)]
#[command(name = "impress-resources", version, about = "Manage resource collections")]
struct Cli {
    /// TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// SQLite database, overrides `database.path` from the config
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create an empty collection
    Create { name: String },
    /// Show a collection and its resources
    Show { id: CollectionId },
    /// Add a resource to a collection
    Add {
        id: CollectionId,
        resource_type: String,
        resource_id: String,
    },
    /// Remove a resource from a collection
    Remove {
        id: CollectionId,
        resource_type: String,
        resource_id: String,
    },
    /// Rename a collection
    Rename { id: CollectionId, name: String },
    /// Delete a collection
    Delete { id: CollectionId },
    /// List collections containing a resource
    Find {
        resource_type: String,
        resource_id: String,
    },
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ResourcesConfig::load(path)?,
        None => ResourcesConfig::default(),
    };
    if let Some(db) = cli.db {
        config.database.path = Some(db);
    }
    init_tracing(&config.log.filter);

    if config.database.path.is_none() {
        tracing::warn!("No database configured; changes will not be persisted");
    }

    let manager = Manager::open(&config, ProviderRegistry::new())?;

    match cli.command {
        Command::Create { name } => print_json(&manager.new_collection(&name)?)?,
        Command::Show { id } => print_json(&manager.get_collection(id)?)?,
        Command::Add {
            id,
            resource_type,
            resource_id,
        } => {
            let mut collection = manager.get_collection(id)?;
            let resource = manager.get_resource(&resource_type, &resource_id);
            manager.add_resource(&mut collection, resource)?;
            print_json(&collection)?;
        }
        Command::Remove {
            id,
            resource_type,
            resource_id,
        } => {
            let mut collection = manager.get_collection(id)?;
            let resource = manager.get_resource(&resource_type, &resource_id);
            if !manager.remove_resource(&mut collection, &resource)? {
                tracing::warn!("{} was not in collection {}", resource, id);
            }
            print_json(&collection)?;
        }
        Command::Rename { id, name } => {
            let mut collection = manager.get_collection(id)?;
            manager.rename_collection(&mut collection, &name)?;
            print_json(&collection)?;
        }
        Command::Delete { id } => {
            let collection = manager.get_collection(id)?;
            manager.delete_collection(collection)?;
            print_json(&serde_json::json!({ "deleted": id }))?;
        }
        Command::Find {
            resource_type,
            resource_id,
        } => {
            let resource = manager.get_resource(&resource_type, &resource_id);
            print_json(&manager.collections_for_resource(&resource)?)?;
        }
    }

    Ok(())
}
