//! mcpreg - MCP installer and component registry CLI

use clap::{Parser, Subcommand};
use mcpreg::{
    add, install, remove, AddCommand, Client, HttpFetcher, ManifestStore, Paths, Project, RemoveOptions, Warning,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mcpreg")]
#[command(about = "Install MCP configuration for AI clients and track registry components")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    /// Project directory holding the manifest (default: current directory)
    #[arg(long, global = true)]
    project: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Install MCP configuration for a specific client
    Install {
        /// The client to install for (see `mcpreg clients`)
        client: String,

        /// API key for FlyonUI services
        #[arg(long)]
        api_key: Option<String>,
    },

    /// Add a component and track it in the manifest
    Add {
        /// Component name or registry item URL
        identifier: String,

        /// Ask the component CLI not to install package dependencies
        #[arg(long)]
        no_install: bool,
    },

    /// Remove a tracked component and delete files no other component uses
    Remove {
        /// Component name as recorded in the manifest
        name: String,

        /// Show what would be deleted without touching anything
        #[arg(long)]
        dry_run: bool,

        /// Directory component files live under
        #[arg(long, default_value = ".")]
        working_dir: String,
    },

    /// List tracked components
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show supported clients and their config paths
    Clients,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    match cli.command {
        Commands::Install { client, api_key } => {
            let client: Client = match client.parse() {
                Ok(c) => c,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            };
            let paths = Paths::resolve();
            let name = client.display_name();
            match install(&paths, client, api_key.as_deref()) {
                Ok(installed) => {
                    println!("Successfully installed configuration for {}", name);
                    println!("Config: {}", installed.config_path.display());
                    if installed.used_placeholder_key {
                        println!("No API key provided. Using default 'YOUR_API_KEY' placeholder.");
                    }
                    println!("You may need to restart {} to see the FlyonUI MCP server.", name);
                }
                Err(e) => {
                    eprintln!("Failed to install configuration for {}", name);
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Commands::Add { identifier, no_install } => {
            let project = resolve_project(cli.project.as_deref());
            let fetcher = http_fetcher();
            match add(&project, &identifier, no_install, &fetcher, &AddCommand::from_env()) {
                Ok(report) => {
                    print_warnings(&report.warnings);
                    if report.appended {
                        println!(
                            "Tracked {} ({})",
                            report.entry.name,
                            report.entry.source_type.as_str()
                        );
                    } else {
                        println!("{} is already tracked", report.entry.name);
                    }
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(e.exit_code());
                }
            }
        }
        Commands::Remove {
            name,
            dry_run,
            working_dir,
        } => {
            let project = resolve_project(cli.project.as_deref());
            let fetcher = http_fetcher();
            let options = RemoveOptions { working_dir, dry_run };
            match remove(&project, &name, &options, &fetcher) {
                Ok(report) => {
                    print_warnings(&report.warnings);
                    print_removal(&report);
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Commands::List { json } => {
            let project = resolve_project(cli.project.as_deref());
            let loaded = ManifestStore::new(project.manifest_path()).load();
            print_warnings(&loaded.warnings);
            let entries = loaded.value;

            if json {
                match serde_json::to_string_pretty(&entries) {
                    Ok(output) => println!("{output}"),
                    Err(e) => {
                        eprintln!("Error: {}", e);
                        std::process::exit(1);
                    }
                }
                return;
            }
            if entries.is_empty() {
                println!("No components tracked.");
                return;
            }
            const INDENT: &str = "        ";
            for e in &entries {
                println!("{}", e.name);
                println!("{}Source:  {}", INDENT, e.source_type.as_str());
                if let Some(url) = &e.source_url {
                    println!("{}URL:     {}", INDENT, url);
                }
                if let Some(item) = &e.registry_item {
                    println!("{}Files:   {}", INDENT, item.files.len());
                    if !item.registry_dependencies.is_empty() {
                        println!("{}Depends: {}", INDENT, item.registry_dependencies.join(", "));
                    }
                }
                if let Some(err) = &e.fetch_error {
                    println!("{}Error:   {}", INDENT, err);
                }
                println!();
            }
        }
        Commands::Clients => {
            let paths = Paths::resolve();
            println!("{:<16} {}", "CLIENT", "CONFIG");
            println!("{}", "-".repeat(80));
            for client in Client::ALL {
                println!("{:<16} {}", client.id(), client.config_path(&paths).display());
            }
        }
    }
}

fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("mcpreg=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn resolve_project(explicit: Option<&str>) -> Project {
    match Project::resolve(explicit) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error: cannot determine project directory: {}", e);
            std::process::exit(1);
        }
    }
}

fn http_fetcher() -> HttpFetcher {
    match HttpFetcher::new() {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

// Warnings were already logged; repeat them on stderr only when logging is quiet.
fn print_warnings(warnings: &[Warning]) {
    if tracing::enabled!(tracing::Level::WARN) {
        return;
    }
    for w in warnings {
        eprintln!("Warning: {}", w);
    }
}

fn print_removal(report: &mcpreg::RemoveReport) {
    let verb = if report.dry_run { "Would delete" } else { "Deleted" };
    let files: Vec<String> = if report.dry_run {
        report.plan.to_delete.clone()
    } else {
        report.deleted.iter().map(|p| p.display().to_string()).collect()
    };

    if files.is_empty() {
        println!("No files to delete for {}", report.entry.name);
    } else {
        println!("{} {} file(s):", verb, files.len());
        for f in &files {
            println!("  {}", f);
        }
    }

    let kept: Vec<&String> = report
        .plan
        .orphaned
        .iter()
        .filter(|f| !report.plan.to_delete.contains(f))
        .collect();
    if !kept.is_empty() {
        println!("Unreferenced dependency files left in place (remove their components explicitly):");
        for f in kept {
            println!("  {}", f);
        }
    }

    if report.dry_run {
        println!("Dry run: manifest left unchanged");
    } else {
        println!("Removed {} from manifest", report.entry.name);
    }
}
