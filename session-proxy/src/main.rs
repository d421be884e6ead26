// Copyright 2026 BadCompany
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

// Command line front end over the in-memory repository.
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use session_proxy::capability::CapabilityResolver;
use session_proxy::config::{Config, LogFormat};
use session_proxy::memory::{MemoryRepository, MemorySession};
use session_proxy::{Credentials, Repository, Session, SessionHandle, SessionProxyFactory, Value};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to an in-memory repository definition (YAML)
    #[arg(long, global = true)]
    repository: Option<PathBuf>,

    /// Capability name prefix to hide from proxies (repeatable)
    #[arg(long = "exclude", global = true)]
    exclude: Vec<String>,

    #[arg(long, global = true)]
    log_level: Option<String>,

    #[arg(long, value_enum, global = true)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the capabilities a proxy over an in-memory session advertises
    Capabilities {
        #[arg(long)]
        json: bool,
    },
    /// Log in and impersonate along a chain of users
    Impersonate {
        #[arg(short, long, default_value = "admin")]
        user: String,

        #[arg(short, long, default_value = "admin")]
        password: String,

        /// Next user in the chain; "guest" for anonymous (repeatable)
        #[arg(long = "as", required = true)]
        chain: Vec<String>,

        #[arg(long)]
        json: bool,
    },
}

#[derive(Serialize)]
struct Hop {
    user_id: String,
    workspace: String,
    namespace_prefixes: Vec<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::from_env().unwrap_or_else(|e| {
        eprintln!(
            "Warning: Failed to load config from env, using defaults: {}",
            e
        );
        Config::default()
    });

    // CLI flags take precedence over the environment
    if let Some(path) = &cli.repository {
        config.repository_yaml_path = Some(path.clone());
    }
    if !cli.exclude.is_empty() {
        config.excluded_prefixes = cli.exclude.clone();
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }

    init_tracing(&config);

    let repository = match &config.repository_yaml_path {
        Some(path) => MemoryRepository::from_yaml_file(path)?,
        None => MemoryRepository::default(),
    };
    let repository = Arc::new(repository);
    let resolver = Arc::new(CapabilityResolver::new(config.exclusion_rule()));
    let repository_handle: Arc<dyn Repository> = repository.clone();
    let factory = SessionProxyFactory::with_resolver(repository_handle, resolver);

    match cli.command {
        Command::Capabilities { json } => {
            let capabilities = factory
                .resolver()
                .resolve(&MemorySession::memory_session_type());
            if json {
                let report: Vec<_> = capabilities
                    .iter()
                    .map(|c| {
                        serde_json::json!({
                            "name": c.name(),
                            "operations": c.operations(),
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                for cap in capabilities.iter() {
                    println!("{}", cap.name());
                    for op in cap.operations() {
                        println!("  {}", op);
                    }
                }
            }
        }
        Command::Impersonate {
            user,
            password,
            chain,
            json,
        } => {
            let session = repository
                .login(&Credentials::simple(user, password))
                .context("login failed")?;
            let mut current: SessionHandle = factory.wrap(session);
            let mut hops = vec![describe(&current)?];

            for next in chain {
                let credentials = if next == "guest" {
                    Credentials::Guest
                } else {
                    Credentials::simple(next.clone(), "")
                };
                current = current
                    .impersonate(&credentials)
                    .with_context(|| format!("impersonating '{}' failed", next))?;
                hops.push(describe(&current)?);
            }
            info!(hops = hops.len(), "Impersonation chain complete");

            if json {
                println!("{}", serde_json::to_string_pretty(&hops)?);
            } else {
                for hop in &hops {
                    println!(
                        "{}@{} [{}]",
                        hop.user_id,
                        hop.workspace,
                        hop.namespace_prefixes.join(", ")
                    );
                }
            }
        }
    }

    Ok(())
}

fn describe(session: &SessionHandle) -> Result<Hop> {
    let user_id = session.invoke("getUserID", &[])?;
    let workspace = session.invoke("getWorkspaceName", &[])?;
    let prefixes = session.invoke("getNamespacePrefixes", &[])?;
    Ok(Hop {
        user_id: user_id.as_str().unwrap_or_default().to_string(),
        workspace: workspace.as_str().unwrap_or_default().to_string(),
        namespace_prefixes: match prefixes {
            Value::Strings(p) => p.into_iter().filter(|p| !p.is_empty()).collect(),
            _ => Vec::new(),
        },
    })
}

fn init_tracing(config: &Config) {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("session_proxy=debug,info"));

    let subscriber = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr);

    match config.log_format {
        LogFormat::Json => subscriber.json().init(),
        LogFormat::Text => subscriber.init(),
    }
}
