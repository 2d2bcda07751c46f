use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use comps_scout::clock::SystemClock;
use comps_scout::config::StoreConfig;
use comps_scout::criteria::{CriteriaSelector, DEFAULT_RADIUS_INDEX, RADIUS_OPTIONS};
use comps_scout::models::PropertyType;
use comps_scout::notify::{Toaster, Variant};
use comps_scout::results::{render, LoadState, ResultsScreen};
use comps_scout::store::{probe, FirestoreClient, ProbeResult, PropertyStore};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "comps-scout")]
#[command(version, about = "Comparable sales search over a hosted property database")]
struct Cli {
    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Pick search criteria and show matching sales
    Search {
        /// Multi Family, Retail, Industrial or Land
        #[arg(short = 't', long)]
        property_type: PropertyType,

        /// Address or ZIP code
        #[arg(short, long)]
        location: String,

        /// Position in the radius list (see `radii`)
        #[arg(short, long, default_value_t = DEFAULT_RADIUS_INDEX)]
        radius_index: usize,

        #[command(flatten)]
        view: ViewArgs,
    },
    /// Open a results target such as `/search-results?propertyType=Retail&location=10001&radius=1`
    Open {
        target: String,

        #[command(flatten)]
        view: ViewArgs,
    },
    /// Check that the properties collection can be read
    Probe,
    /// List the allowed search radii
    Radii,
}

#[derive(Args)]
struct ViewArgs {
    /// Tick a row by property id (repeatable)
    #[arg(short, long = "select", value_name = "ID")]
    select: Vec<String>,

    /// Run the report on the ticked rows, writing JSON to this file
    #[arg(long, value_name = "FILE")]
    report: Option<PathBuf>,

    /// Print rows as JSON instead of a table
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Radii => {
            for (index, radius) in RADIUS_OPTIONS.iter().enumerate() {
                let marker = if index == DEFAULT_RADIUS_INDEX { " (default)" } else { "" };
                println!("{:>2}: {} miles{}", index, radius, marker);
            }
            Ok(())
        }
        Command::Probe => {
            let store = connect()?;
            match probe(store.as_ref()).await {
                ProbeResult::Connected | ProbeResult::ConnectedEmpty => Ok(()),
                ProbeResult::Failed(err) => Err(anyhow!(err)).context("Connection check failed"),
            }
        }
        Command::Search {
            property_type,
            location,
            radius_index,
            view,
        } => {
            let mut selector = CriteriaSelector::new();
            selector.select_property_type(property_type);
            selector.set_location(location);
            selector.set_radius_index(radius_index);

            let Some(target) = selector.submit() else {
                bail!("Enter an address or ZIP code to search");
            };
            info!("🏠 {} within {} miles of {}", selector.submit_label(), selector.radius(), selector.location().trim());

            let store = connect()?;
            show_results(store, &target.to_string(), &view).await
        }
        Command::Open { target, view } => {
            let store = connect()?;
            show_results(store, &target, &view).await
        }
    }
}

/// Build the one store client shared by every screen
fn connect() -> Result<Arc<dyn PropertyStore>> {
    let config = StoreConfig::from_env().context("Store configuration is incomplete")?;
    info!("Using project {} ({})", config.project_id, config.auth_domain);
    Ok(Arc::new(FirestoreClient::new(config)?))
}

async fn show_results(store: Arc<dyn PropertyStore>, target: &str, view: &ViewArgs) -> Result<()> {
    let toaster = Toaster::new();
    let mut screen = ResultsScreen::mount(store, target, Arc::new(SystemClock), toaster.clone());
    screen.settled().await;

    if let Some(toast) = toaster.current() {
        match toast.variant {
            Variant::Success => info!("✅ {}", toast.message),
            Variant::Info => info!("ℹ️  {}", toast.message),
            Variant::Error => warn!("❌ {}", toast.message),
        }
        toaster.dismiss();
    }

    for id in &view.select {
        screen.toggle(id);
    }

    let state = screen.state();
    if view.json {
        println!("{}", serde_json::to_string_pretty(state.records())?);
    } else {
        print!("{}", render(&state, screen.selection()));
    }

    if let Some(path) = &view.report {
        match screen.selection().report_action() {
            Some(action) => {
                action.run(state.records(), path).await?;
            }
            None => warn!("No properties selected, report skipped"),
        }
    }

    screen.unmount();

    match state {
        LoadState::Error(message) => Err(anyhow!(message)),
        _ => Ok(()),
    }
}
