//! route-compiler command line.
//!
//! ```text
//! route-compiler --config routes.toml routes
//! route-compiler --config routes.toml dispatch GET /posts/sk?sort=new
//! route-compiler --config routes.toml link users.show id=42
//! route-compiler --config routes.toml serve --watch
//! ```
//!
//! `serve` answers every matched route with a JSON echo of its invocation,
//! which makes it useful for checking a route file against live traffic.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::json;
use tokio::net::TcpListener;

use route_compiler::config::{build_router, load_config, ConfigWatcher};
use route_compiler::http::{DispatchRequest, DispatchSummary, HttpServer};
use route_compiler::observability;
use route_compiler::routing::{ActionRegistry, Dispatch, Params};

#[derive(Parser)]
#[command(name = "route-compiler")]
#[command(about = "Compile, inspect and serve declarative route tables", long_about = None)]
struct Cli {
    /// Route file (TOML)
    #[arg(short, long, default_value = "routes.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List routes in match order
    Routes,
    /// Dispatch one request and print the match
    Dispatch {
        /// HTTP method
        method: String,
        /// Path, optionally with a query string
        uri: String,
        /// Request body
        #[arg(short, long)]
        body: Option<String>,
        /// Content type of the body
        #[arg(long, default_value = "application/x-www-form-urlencoded")]
        content_type: String,
    },
    /// Resolve a route name or id to a link
    Link {
        /// Route name or id
        route: String,
        /// Parameters as key=value
        params: Vec<String>,
    },
    /// Serve the route table over HTTP
    Serve {
        /// Reload the route table when the file changes
        #[arg(short, long)]
        watch: bool,
        /// Override the configured bind address
        #[arg(short, long)]
        bind: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    let level = match cli.command {
        Commands::Serve { .. } => config.observability.log_level.as_str(),
        _ => "warn",
    };
    observability::init(level)?;

    let router = build_router(&config)?;

    match cli.command {
        Commands::Routes => {
            for (i, route) in router.routes().enumerate() {
                let methods: Vec<_> = route.methods().iter().map(|m| m.as_str()).collect();
                println!(
                    "{:>3}  {:<20} {:<40} {:<24} {}",
                    i,
                    methods.join("|"),
                    route.template(),
                    route.name().unwrap_or("-"),
                    route.action().describe()
                );
            }
        }
        Commands::Dispatch {
            method,
            uri,
            body,
            content_type,
        } => {
            let method = route_compiler::http::request::parse_method(&method)
                .ok_or_else(|| format!("invalid method '{method}'"))?;
            let request = DispatchRequest::from_parts(
                method,
                &uri,
                body.is_some().then_some(content_type.as_str()),
                body.unwrap_or_default().into(),
                &config.server.method_override_field,
            );
            match router.dispatch(&request)? {
                Dispatch::Matched(m) => {
                    println!("{}", serde_json::to_string_pretty(&DispatchSummary::from(&m))?);
                }
                Dispatch::NotFound => {
                    eprintln!("No route matched {} {}", request.method, request.path);
                    std::process::exit(1);
                }
            }
        }
        Commands::Link { route, params } => {
            let params = params
                .iter()
                .map(|pair| {
                    pair.split_once('=')
                        .ok_or_else(|| format!("expected key=value, got '{pair}'"))
                })
                .collect::<Result<Params, _>>()?;
            println!("{}", router.url(&route, &params)?);
        }
        Commands::Serve { watch, bind } => {
            let bind_address = bind.unwrap_or_else(|| config.server.bind_address.clone());
            let listener = TcpListener::bind(&bind_address).await?;

            let (_watcher, updates) = if watch {
                let (watcher, updates) = ConfigWatcher::new(&cli.config);
                (Some(watcher.run()?), Some(updates))
            } else {
                (None, None)
            };

            let server = HttpServer::new(router, echo_actions(), &config.server);
            server.run(listener, updates).await?;
            tracing::info!("Shutdown complete");
        }
    }

    Ok(())
}

/// Registry answering every route with a description of its invocation.
fn echo_actions() -> ActionRegistry {
    ActionRegistry::new().fallback(|inv| {
        json!({
            "route": inv.route.label(),
            "action": inv.route.action().describe(),
            "args": inv.args,
            "payload": inv.payload,
        })
    })
}
