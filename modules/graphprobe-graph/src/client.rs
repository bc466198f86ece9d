use neo4rs::{query, ConfigBuilder, Graph};
use tracing::debug;

use graphprobe_common::ProbeError;

/// Thin wrapper around neo4rs::Graph providing connection setup and teardown.
///
/// Not `Clone`. Sessions borrow the handle and `close` consumes it.
pub struct GraphClient {
    pub(crate) graph: Graph,
}

impl GraphClient {
    /// Build a connection handle. The server is not contacted until the first
    /// query, so bad credentials surface in `verify_connectivity`.
    pub async fn connect(uri: &str, user: &str, password: &str) -> Result<Self, ProbeError> {
        let config = ConfigBuilder::default()
            .uri(uri)
            .user(user)
            .password(password)
            .fetch_size(500)
            .max_connections(1)
            .build()
            .map_err(connectivity_error)?;
        let graph = Graph::connect(config).await.map_err(connectivity_error)?;
        debug!(uri, "Created Neo4j connection pool");
        Ok(Self { graph })
    }

    /// Round-trip a trivial query to prove the server is reachable and the
    /// credentials are accepted.
    pub async fn verify_connectivity(&self) -> Result<(), ProbeError> {
        let mut stream = self
            .graph
            .execute(query("RETURN 1 AS ping"))
            .await
            .map_err(connectivity_error)?;
        let row = stream
            .next()
            .await
            .map_err(connectivity_error)?
            .ok_or_else(|| ProbeError::Connectivity("server returned no ping row".to_string()))?;
        let ping: i64 = row
            .get("ping")
            .map_err(|e| ProbeError::Connectivity(e.to_string()))?;
        if ping != 1 {
            return Err(ProbeError::Connectivity(format!(
                "unexpected ping response: {ping}"
            )));
        }
        Ok(())
    }

    /// Get a reference to the underlying neo4rs Graph.
    pub fn inner(&self) -> &Graph {
        &self.graph
    }

    /// Release the connection pool.
    pub fn close(self) {
        debug!("Closing Neo4j connection pool");
        drop(self.graph);
    }
}

fn connectivity_error(e: neo4rs::Error) -> ProbeError {
    ProbeError::Connectivity(e.to_string())
}
