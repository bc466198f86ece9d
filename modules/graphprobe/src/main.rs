use std::io;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use graphprobe::runner;
use graphprobe_common::config::{
    Config, DEFAULT_DATABASE, DEFAULT_NEO4J_PASSWORD, DEFAULT_NEO4J_URI, DEFAULT_NEO4J_USER,
    NEO4J_DATABASE_ENV, NEO4J_PASSWORD_ENV, NEO4J_URI_ENV, NEO4J_USER_ENV,
};
use graphprobe_graph::GraphClient;

#[derive(Parser)]
#[command(
    name = "graphprobe",
    about = "Check a Neo4j server is reachable and report what the target database holds"
)]
struct Cli {
    /// Bolt URI of the server
    #[arg(long, env = NEO4J_URI_ENV, default_value = DEFAULT_NEO4J_URI)]
    uri: String,

    #[arg(long, env = NEO4J_USER_ENV, default_value = DEFAULT_NEO4J_USER)]
    user: String,

    #[arg(
        long,
        env = NEO4J_PASSWORD_ENV,
        default_value = DEFAULT_NEO4J_PASSWORD,
        hide_env_values = true,
        hide_default_value = true
    )]
    password: String,

    /// Database queried for labels and nodes
    #[arg(long, env = NEO4J_DATABASE_ENV, default_value = DEFAULT_DATABASE)]
    db_name: String,

    /// Also print age, location and occupation for Person nodes
    #[arg(long)]
    person_details: bool,
}

impl Cli {
    fn config(&self) -> Config {
        Config {
            neo4j_uri: self.uri.clone(),
            neo4j_user: self.user.clone(),
            neo4j_password: self.password.clone(),
            db_name: self.db_name.clone(),
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("graphprobe=info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config();
    config.validate()?;
    config.log_redacted();

    let connect = GraphClient::connect(
        &config.neo4j_uri,
        &config.neo4j_user,
        &config.neo4j_password,
    );
    let outcome =
        runner::connect_and_run(connect, &config.db_name, cli.person_details, io::stdout())
            .await?;
    info!(?outcome, "Inspection finished");

    Ok(outcome.exit_code())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "graphprobe",
            "--uri",
            "bolt://db.example:7687",
            "--db-name",
            "people",
            "--person-details",
        ])
        .unwrap();
        let config = cli.config();
        assert_eq!(config.neo4j_uri, "bolt://db.example:7687");
        assert_eq!(config.db_name, "people");
        assert!(cli.person_details);
    }

    #[test]
    fn person_details_default_off() {
        let cli = Cli::try_parse_from(["graphprobe"]).unwrap();
        assert!(!cli.person_details);
    }
}
