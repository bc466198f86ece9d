use async_trait::async_trait;
use neo4rs::{query, Query, Row};
use tracing::debug;

use graphprobe_common::{
    DataRow, DatabaseEntry, PersonRow, ProbeError, DATA_LABEL, PERSON_LABEL, SYSTEM_DATABASE,
};

use crate::render::row_text;
use crate::GraphClient;

/// Receives each row as soon as it is read off the stream.
pub type RowSink<'a, T> = dyn FnMut(T) -> Result<(), ProbeError> + Send + 'a;

/// The read-only operations an inspection run performs against a graph store.
///
/// Each query method is one scoped session: it binds to the named database,
/// hands rows to the sink one at a time as they arrive, and releases the
/// session before returning. Streaming methods return the number of rows
/// delivered. An error from the sink stops the stream and is returned as-is.
#[async_trait]
pub trait InspectionStore: Send + Sync {
    async fn verify_connectivity(&self) -> Result<(), ProbeError>;

    /// Every database in the server catalog with its current status.
    async fn list_databases(
        &self,
        sink: &mut RowSink<'_, DatabaseEntry>,
    ) -> Result<usize, ProbeError>;

    /// Distinct node labels in `db`, in server order.
    async fn list_labels(&self, db: &str) -> Result<Vec<String>, ProbeError>;

    /// `Person` nodes in `db`, ascending by name.
    async fn person_nodes(
        &self,
        db: &str,
        sink: &mut RowSink<'_, PersonRow>,
    ) -> Result<usize, ProbeError>;

    /// At most `limit` `data` nodes in `db`, unordered.
    async fn data_nodes(
        &self,
        db: &str,
        limit: usize,
        sink: &mut RowSink<'_, DataRow>,
    ) -> Result<usize, ProbeError>;

    /// Release the underlying connection.
    fn close(self);
}

impl GraphClient {
    /// Run `q` against `db` and feed each decoded row to `sink`.
    ///
    /// Goes through `Graph::execute_on`, which retries transient server
    /// errors with the driver's default backoff.
    async fn stream_rows<T>(
        &self,
        db: &str,
        q: Query,
        decode: fn(&Row) -> Result<T, ProbeError>,
        sink: &mut RowSink<'_, T>,
    ) -> Result<usize, ProbeError> {
        let mut stream = self.graph.execute_on(db, q).await.map_err(query_error)?;
        let mut count = 0;
        while let Some(row) = stream.next().await.map_err(query_error)? {
            sink(decode(&row)?)?;
            count += 1;
        }
        debug!(db, rows = count, "Session drained");
        Ok(count)
    }
}

#[async_trait]
impl InspectionStore for GraphClient {
    async fn verify_connectivity(&self) -> Result<(), ProbeError> {
        GraphClient::verify_connectivity(self).await
    }

    async fn list_databases(
        &self,
        sink: &mut RowSink<'_, DatabaseEntry>,
    ) -> Result<usize, ProbeError> {
        let decode = |row: &Row| -> Result<DatabaseEntry, ProbeError> {
            Ok(DatabaseEntry {
                name: string_field(row, "name")?,
                current_status: string_field(row, "currentStatus")?,
            })
        };
        self.stream_rows(SYSTEM_DATABASE, query("SHOW DATABASES"), decode, sink)
            .await
    }

    async fn list_labels(&self, db: &str) -> Result<Vec<String>, ProbeError> {
        let mut labels = Vec::new();
        self.stream_rows(
            db,
            query("CALL db.labels() YIELD label RETURN label"),
            |row| string_field(row, "label"),
            &mut |label| {
                labels.push(label);
                Ok(())
            },
        )
        .await?;
        Ok(labels)
    }

    async fn person_nodes(
        &self,
        db: &str,
        sink: &mut RowSink<'_, PersonRow>,
    ) -> Result<usize, ProbeError> {
        let cypher = format!(
            "MATCH (p:{PERSON_LABEL})
             RETURN p.name AS name, p.birthday AS birthday, p.info AS info,
                    p.age AS age, p.location AS location, p.occupation AS occupation
             ORDER BY p.name"
        );
        let decode = |row: &Row| -> Result<PersonRow, ProbeError> {
            Ok(PersonRow {
                name: row_text(row, "name"),
                birthday: row_text(row, "birthday"),
                info: row_text(row, "info"),
                age: row_text(row, "age"),
                location: row_text(row, "location"),
                occupation: row_text(row, "occupation"),
            })
        };
        self.stream_rows(db, query(&cypher), decode, sink).await
    }

    async fn data_nodes(
        &self,
        db: &str,
        limit: usize,
        sink: &mut RowSink<'_, DataRow>,
    ) -> Result<usize, ProbeError> {
        let cypher = format!("MATCH (n:{DATA_LABEL}) RETURN n.data AS data LIMIT $limit");
        let q = query(&cypher).param("limit", limit as i64);
        let decode = |row: &Row| -> Result<DataRow, ProbeError> {
            Ok(DataRow {
                data: row_text(row, "data"),
            })
        };
        self.stream_rows(db, q, decode, sink).await
    }

    fn close(self) {
        GraphClient::close(self)
    }
}

fn string_field(row: &Row, key: &str) -> Result<String, ProbeError> {
    row.get::<String>(key)
        .map_err(|e| ProbeError::Query(format!("reading {key}: {e}")))
}

fn query_error(e: neo4rs::Error) -> ProbeError {
    ProbeError::Query(e.to_string())
}
