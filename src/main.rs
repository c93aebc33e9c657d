//! Cluster Profiles CLI
//!
//! Entry point for the `cluster-profiles` command-line tool.

use clap::{Parser, Subcommand, ValueEnum};
use cluster_profiles::logging::init_logging;
use cluster_profiles::request::load_overrides;
use cluster_profiles::{
    resolve_all, CatalogKind, CatalogSet, ResolutionReport, ResolveRequest,
};
use std::borrow::Cow;
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "cluster-profiles")]
#[command(about = "Resolve cluster and node pool profiles into configuration", version)]
struct Cli {
    /// Enable debug logging (overridden by CLUSTER_PROFILES_LOG)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a profile selection into configuration
    Resolve {
        /// Request file (TOML) with features, nodepools and overrides
        #[arg(long, short = 'r')]
        request: Option<PathBuf>,

        /// Cluster feature profile, applied after those in the request file
        #[arg(long = "feature", short = 'f', value_delimiter = ',')]
        features: Vec<String>,

        /// Node pool name, appended after those in the request file
        #[arg(long = "nodepool", short = 'n', value_delimiter = ',')]
        nodepools: Vec<String>,

        /// Overrides file (TOML), layered over the request file's overrides
        #[arg(long)]
        overrides: Option<PathBuf>,

        /// Catalog file (default: built-in catalog)
        #[arg(long, short = 'c', env = "CLUSTER_PROFILES_CATALOG")]
        catalog: Option<PathBuf>,

        /// Output in human-readable format instead of JSON
        #[arg(long)]
        human: bool,

        /// Write the JSON report to this file instead of stdout
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Catalog inspection commands
    Catalog {
        #[command(subcommand)]
        action: CatalogCommands,
    },
}

#[derive(Subcommand)]
enum CatalogCommands {
    /// List profile names
    List {
        /// Catalog file (default: built-in catalog)
        #[arg(long, short = 'c', env = "CLUSTER_PROFILES_CATALOG")]
        catalog: Option<PathBuf>,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Print one profile's fragment as JSON
    Show {
        /// Which catalog to look in
        kind: KindArg,

        /// Profile name
        name: String,

        /// Catalog file (default: built-in catalog)
        #[arg(long, short = 'c', env = "CLUSTER_PROFILES_CATALOG")]
        catalog: Option<PathBuf>,
    },

    /// Check that every profile layers cleanly over its defaults
    Verify {
        /// Catalog file (default: built-in catalog)
        #[arg(long, short = 'c', env = "CLUSTER_PROFILES_CATALOG")]
        catalog: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    Cluster,
    Nodepool,
}

impl From<KindArg> for CatalogKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Cluster => CatalogKind::ClusterFeature,
            KindArg::Nodepool => CatalogKind::Nodepool,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.verbose) {
        eprintln!("Error initializing logging: {}", e);
        process::exit(1);
    }

    match cli.command {
        Commands::Resolve {
            request,
            features,
            nodepools,
            overrides,
            catalog,
            human,
            output,
        } => {
            run_resolve(request, features, nodepools, overrides, catalog, human, output);
        }
        Commands::Catalog { action } => match action {
            CatalogCommands::List { catalog, json } => run_catalog_list(catalog, json),
            CatalogCommands::Show {
                kind,
                name,
                catalog,
            } => run_catalog_show(kind.into(), &name, catalog),
            CatalogCommands::Verify { catalog } => run_catalog_verify(catalog),
        },
    }
}

fn load_catalogs(path: Option<PathBuf>) -> Cow<'static, CatalogSet> {
    match path {
        Some(path) => match CatalogSet::load(&path) {
            Ok(set) => Cow::Owned(set),
            Err(e) => {
                eprintln!("Error loading catalog {}: {}", path.display(), e);
                process::exit(1);
            }
        },
        None => Cow::Borrowed(CatalogSet::builtin()),
    }
}

fn run_resolve(
    request_path: Option<PathBuf>,
    features: Vec<String>,
    nodepools: Vec<String>,
    overrides_path: Option<PathBuf>,
    catalog_path: Option<PathBuf>,
    human: bool,
    output: Option<PathBuf>,
) {
    let catalogs = load_catalogs(catalog_path);

    let mut request = match request_path {
        Some(path) => match ResolveRequest::load(&path) {
            Ok(r) => r,
            Err(e) => {
                eprintln!("Error loading request {}: {}", path.display(), e);
                process::exit(1);
            }
        },
        None => ResolveRequest::default(),
    };
    request = request.with_features(features).with_nodepools(nodepools);

    if let Some(path) = overrides_path {
        match load_overrides(&path) {
            Ok(extra) => request.layer_overrides(extra),
            Err(e) => {
                eprintln!("Error loading overrides {}: {}", path.display(), e);
                process::exit(1);
            }
        }
    }

    let resolved = match resolve_all(&request, &catalogs) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Resolution failed: {}", e);
            process::exit(1);
        }
    };

    let report = match ResolutionReport::new(&request, resolved) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error building report: {}", e);
            process::exit(1);
        }
    };

    if let Some(path) = output {
        if let Err(e) = report.write_to_file(&path) {
            eprintln!("Error writing {}: {}", path.display(), e);
            process::exit(1);
        }
        eprintln!("Wrote resolution to: {}", path.display());
        if !human {
            return;
        }
    }

    if human {
        print!("{}", report.to_human());
    } else {
        match report.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing output: {}", e);
                process::exit(1);
            }
        }
    }
}

fn run_catalog_list(catalog_path: Option<PathBuf>, json_output: bool) {
    let catalogs = load_catalogs(catalog_path);

    if json_output {
        let output = serde_json::json!({
            "cluster_features": catalogs.cluster_features.names().collect::<Vec<_>>(),
            "nodepools": catalogs.nodepools.names().collect::<Vec<_>>(),
        });
        match serde_json::to_string_pretty(&output) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing output: {}", e);
                process::exit(1);
            }
        }
        return;
    }

    for kind in [CatalogKind::ClusterFeature, CatalogKind::Nodepool] {
        let catalog = catalogs.catalog(kind);
        println!("{} profiles ({} total):", kind, catalog.len());
        for name in catalog.names() {
            println!("  {}", name);
        }
        println!();
    }
}

fn run_catalog_show(kind: CatalogKind, name: &str, catalog_path: Option<PathBuf>) {
    let catalogs = load_catalogs(catalog_path);
    let catalog = catalogs.catalog(kind);

    let fragment = match catalog.get(name) {
        Some(f) => f,
        None => {
            eprintln!("No {} profile named '{}'.", kind, name);
            eprintln!(
                "Available: {}",
                catalog.names().collect::<Vec<_>>().join(", ")
            );
            process::exit(1);
        }
    };

    match fragment.to_json() {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing output: {}", e);
            process::exit(1);
        }
    }
}

fn run_catalog_verify(catalog_path: Option<PathBuf>) {
    let catalogs = load_catalogs(catalog_path);

    match catalogs.verify() {
        Ok(()) => {
            println!(
                "Catalog valid: {} cluster features, {} node pool profiles",
                catalogs.cluster_features.len(),
                catalogs.nodepools.len()
            );
        }
        Err(e) => {
            eprintln!("Catalog error: {}", e);
            process::exit(1);
        }
    }
}
