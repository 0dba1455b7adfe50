use axum::http::Uri;
use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::Value;

use portfolio_edge::config::loader::apply_env;
use portfolio_edge::routing::classifier::{HostClass, HostClassifier};
use portfolio_edge::routing::rewriter::rewrite_uri;
use portfolio_edge::PortfolioConfig;

#[derive(Parser)]
#[command(name = "portfolio-cli")]
#[command(about = "Inspect host routing and public profiles", long_about = None)]
struct Cli {
    /// Base domain. Defaults to PORTFOLIO_DOMAIN or the host of SITE_URL.
    #[arg(short, long)]
    domain: Option<String>,

    /// Accept *.localhost tenants.
    #[arg(long)]
    local: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a Host header value
    Classify { host: String },
    /// Show the path a request is routed to
    Rewrite { host: String, path: String },
    /// Fetch a public profile from a running server
    Profile {
        username: String,
        #[arg(short, long, default_value = "http://localhost:3000")]
        url: String,
        /// Session token, to see an owner preview
        #[arg(short, long)]
        token: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Classify { host } => {
            let classifier = build_classifier(&cli)?;
            match classifier.classify(host) {
                HostClass::MainDomain => println!("main"),
                HostClass::TenantDomain { username } => println!("tenant {username}"),
            }
        }
        Commands::Rewrite { host, path } => {
            let classifier = build_classifier(&cli)?;
            let uri: Uri = path.parse()?;
            let routed = match classifier.classify(host) {
                HostClass::TenantDomain { username } => rewrite_uri(&uri, &username).unwrap_or(uri),
                HostClass::MainDomain => uri,
            };
            println!("{routed}");
        }
        Commands::Profile { username, url, token } => {
            let mut headers = HeaderMap::new();
            if let Some(token) = token {
                headers.insert(
                    AUTHORIZATION,
                    HeaderValue::from_str(&format!("Bearer {token}"))?,
                );
            }
            let res = reqwest::Client::new()
                .get(format!("{}/{}", url.trim_end_matches('/'), username))
                .headers(headers)
                .send()
                .await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

fn build_classifier(cli: &Cli) -> Result<HostClassifier, Box<dyn std::error::Error>> {
    let mut config = PortfolioConfig::default();
    apply_env(&mut config, |name| std::env::var(name).ok());
    if let Some(domain) = &cli.domain {
        config.domain.base_domain = Some(domain.clone());
    }
    if cli.local {
        config.domain.local_development = true;
    }
    Ok(HostClassifier::from_config(&config.domain)?)
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: server returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
