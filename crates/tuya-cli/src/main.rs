//! Command line tool for Tuya local device profiles
//!
//! Builds the entities of a device type against a JSON snapshot of data point
//! values and prints what the host would show, or runs a command and prints
//! the data points it would write.

mod snapshot;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use tuya_config::DeviceConfigRegistry;
use tuya_core::Value;
use tuya_platform::{setup_device, DeviceEntities, DiscoveryInfo, EntityState};

use crate::snapshot::SnapshotDevice;

/// Inspect Tuya local device profiles.
#[derive(Parser, Debug)]
#[command(name = "tuya-local")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Directory holding the device profiles.
    #[arg(short, long, global = true, default_value = "devices")]
    devices: PathBuf,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the known device types.
    List {
        /// Only types whose profile lists this product id.
        #[arg(long)]
        product: Option<String>,
    },
    /// Print the state of every entity for a device snapshot.
    Show(DeviceArgs),
    /// Turn an entity on or off and print the data points written.
    Power {
        #[command(flatten)]
        device: DeviceArgs,
        /// Config id of the entity, e.g. `switch_anti_frost`.
        #[arg(short, long)]
        entity: String,
        state: PowerState,
    },
}

#[derive(clap::Args, Debug)]
struct DeviceArgs {
    /// Device type, the profile's file stem.
    #[arg(short = 't', long = "type")]
    device_type: String,
    /// JSON file mapping data point ids to values.
    #[arg(long)]
    dps: PathBuf,
    /// Also set up the secondary entities.
    #[arg(long)]
    secondary: bool,
    /// Device name, the base of every entity name.
    #[arg(long, default_value = "Tuya device")]
    name: String,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum PowerState {
    On,
    Off,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let registry = DeviceConfigRegistry::from_dir(&args.devices)
        .with_context(|| format!("loading device profiles from {}", args.devices.display()))?;

    match args.command {
        Command::List { product } => list(&registry, product.as_deref()),
        Command::Show(device) => show(&registry, &device),
        Command::Power { device, entity, state } => power(&registry, &device, &entity, state).await,
    }
}

fn list(registry: &DeviceConfigRegistry, product: Option<&str>) -> Result<()> {
    let types = match product {
        Some(product) => registry.types_for_product(product),
        None => registry.device_types(),
    };
    for device_type in types {
        if let Some(config) = registry.get_config(&device_type) {
            println!("{:<32} {}", device_type, config.name);
        }
    }
    Ok(())
}

fn show(registry: &DeviceConfigRegistry, args: &DeviceArgs) -> Result<()> {
    let (_, store) = build(registry, args)?;
    let states: Vec<EntityState> = store
        .config_ids()
        .iter()
        .filter_map(|id| store.get(id))
        .map(|entity| entity.snapshot())
        .collect();
    println!("{}", serde_json::to_string_pretty(&states)?);
    Ok(())
}

async fn power(registry: &DeviceConfigRegistry, args: &DeviceArgs, config_id: &str, state: PowerState) -> Result<()> {
    let (device, store) = build(registry, args)?;
    let entity = store
        .get(config_id)
        .with_context(|| format!("no entity {} (have {:?})", config_id, store.config_ids()))?;
    let switchable = entity
        .switchable()
        .with_context(|| format!("{} cannot be turned on or off", config_id))?;

    match state {
        PowerState::On => switchable.async_turn_on().await?,
        PowerState::Off => switchable.async_turn_off().await?,
    }

    println!("{}", serde_json::to_string_pretty(&device.writes().await)?);
    println!("{}", serde_json::to_string_pretty(&entity.snapshot())?);
    Ok(())
}

/// Set up every enabled entity of a device type against a snapshot
fn build(registry: &DeviceConfigRegistry, args: &DeviceArgs) -> Result<(Arc<SnapshotDevice>, DeviceEntities)> {
    let config = registry.require(&args.device_type)?;
    let payload = read_snapshot(&args.dps)?;
    debug!("Snapshot has {} data points", payload.len());

    let device = Arc::new(SnapshotDevice::new(args.name.clone(), payload));
    let discovery = DiscoveryInfo::with_defaults(args.device_type.clone(), &config, args.secondary);
    let store = DeviceEntities::new();
    let entities = setup_device(registry, device.clone(), &discovery, &store)?;
    info!("Set up {} entities for {}", entities.len(), config.name);
    Ok((device, store))
}

fn read_snapshot(path: &Path) -> Result<serde_json::Map<String, Value>> {
    let content = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("{} is not a JSON object of data points", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_snapshot() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"1": true, "2": "manual"}}"#).unwrap();
        let payload = read_snapshot(file.path()).unwrap();
        assert_eq!(payload.get("2"), Some(&Value::from("manual")));
    }

    #[test]
    fn test_read_snapshot_rejects_arrays() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[1, 2]").unwrap();
        assert!(read_snapshot(file.path()).is_err());
    }

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from([
            "tuya-local",
            "power",
            "--type",
            "generic_smartplug",
            "--dps",
            "plug.json",
            "--entity",
            "switch",
            "off",
        ])
        .unwrap();
        assert!(matches!(
            args.command,
            Command::Power {
                state: PowerState::Off,
                ..
            }
        ));
        assert_eq!(args.devices, PathBuf::from("devices"));
    }
}
