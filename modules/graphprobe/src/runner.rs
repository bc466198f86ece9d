use std::fmt::Display;
use std::future::Future;
use std::io::Write;
use std::process::ExitCode;

use anyhow::Result;
use tracing::{error, info, warn};

use graphprobe_common::{has_label, ProbeError, DATA_LABEL, DATA_NODE_LIMIT, PERSON_LABEL};
use graphprobe_graph::InspectionStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Completed,
    ConnectivityFailed,
}

impl RunOutcome {
    pub fn exit_code(self) -> ExitCode {
        match self {
            RunOutcome::Completed => ExitCode::SUCCESS,
            RunOutcome::ConnectivityFailed => ExitCode::FAILURE,
        }
    }
}

/// Print the connectivity failure banner.
pub fn report_connection_failed(out: &mut impl Write, cause: &impl Display) -> Result<()> {
    writeln!(out, "❌ Connection failed: {cause}")?;
    Ok(())
}

/// Await the connection handle, then run the inspection over it.
///
/// A handle that cannot be built counts as a connectivity failure: the banner
/// is printed and no query runs.
pub async fn connect_and_run<S, W, F>(
    connect: F,
    db_name: &str,
    person_details: bool,
    mut out: W,
) -> Result<RunOutcome>
where
    S: InspectionStore,
    W: Write + Send,
    F: Future<Output = Result<S, ProbeError>>,
{
    let store = match connect.await {
        Ok(store) => store,
        Err(e) => {
            error!(error = %e, "Could not create connection");
            report_connection_failed(&mut out, &e)?;
            return Ok(RunOutcome::ConnectivityFailed);
        }
    };
    Runner::new(store, db_name, out)
        .with_person_details(person_details)
        .run()
        .await
}

/// Runs one inspection pass: connectivity check, catalog listing, label
/// discovery, then the two label-gated node queries.
///
/// Section headers are written before their query runs and rows are written
/// as the store delivers them. Only a failed connectivity check is handled
/// here. Any later query error is returned to the caller as-is; the store is
/// released when `self` drops.
pub struct Runner<S, W> {
    store: S,
    db_name: String,
    out: W,
    person_details: bool,
}

impl<S: InspectionStore, W: Write + Send> Runner<S, W> {
    pub fn new(store: S, db_name: impl Into<String>, out: W) -> Self {
        Self {
            store,
            db_name: db_name.into(),
            out,
            person_details: false,
        }
    }

    /// Append age, location and occupation to each Person line when present.
    pub fn with_person_details(mut self, enabled: bool) -> Self {
        self.person_details = enabled;
        self
    }

    pub async fn run(mut self) -> Result<RunOutcome> {
        if let Err(e) = self.store.verify_connectivity().await {
            error!(error = %e, "Connectivity check failed");
            report_connection_failed(&mut self.out, &e)?;
            self.store.close();
            return Ok(RunOutcome::ConnectivityFailed);
        }
        writeln!(self.out, "✅ Connected to Neo4j!")?;
        info!("Connectivity verified");

        self.print_databases().await?;
        let labels = self.print_labels().await?;

        if has_label(&labels, PERSON_LABEL) {
            self.print_person_nodes().await?;
        } else {
            warn!(db = self.db_name.as_str(), label = PERSON_LABEL, "Label not found");
            writeln!(self.out, "\nNo '{PERSON_LABEL}' label in this database.")?;
        }

        if has_label(&labels, DATA_LABEL) {
            self.print_data_nodes().await?;
        } else {
            warn!(db = self.db_name.as_str(), label = DATA_LABEL, "Label not found");
            writeln!(self.out, "\nNo '{DATA_LABEL}' label in this database.")?;
        }

        self.out.flush()?;
        self.store.close();
        Ok(RunOutcome::Completed)
    }

    async fn print_databases(&mut self) -> Result<()> {
        writeln!(self.out, "\nDatabases:")?;
        let out = &mut self.out;
        let count = self
            .store
            .list_databases(&mut |db| {
                writeln!(out, " • {db}")?;
                Ok(())
            })
            .await?;
        info!(count, "Listed databases");
        Ok(())
    }

    async fn print_labels(&mut self) -> Result<Vec<String>> {
        let labels = self.store.list_labels(&self.db_name).await?;
        info!(db = self.db_name.as_str(), count = labels.len(), "Listed labels");

        writeln!(self.out, "\nLabels in '{}': {:?}", self.db_name, labels)?;
        Ok(labels)
    }

    async fn print_person_nodes(&mut self) -> Result<()> {
        writeln!(self.out, "\n-- Person Nodes --")?;
        let Self {
            store,
            db_name,
            out,
            person_details,
        } = self;
        let show_details = *person_details;
        let count = store
            .person_nodes(db_name, &mut |person| {
                match person.details().filter(|_| show_details) {
                    Some(details) => writeln!(out, " • {person} ({details})")?,
                    None => writeln!(out, " • {person}")?,
                }
                Ok(())
            })
            .await?;
        info!(count, "Streamed Person nodes");
        Ok(())
    }

    async fn print_data_nodes(&mut self) -> Result<()> {
        writeln!(self.out, "\n-- Data Nodes --")?;
        let out = &mut self.out;
        let mut printed = 0;
        let count = self
            .store
            .data_nodes(&self.db_name, DATA_NODE_LIMIT, &mut |row| {
                if printed < DATA_NODE_LIMIT {
                    writeln!(out, " • {row}")?;
                    printed += 1;
                }
                Ok(())
            })
            .await?;
        info!(count, "Streamed data nodes");
        Ok(())
    }
}
