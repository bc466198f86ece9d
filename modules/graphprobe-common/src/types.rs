use std::fmt;

pub const PERSON_LABEL: &str = "Person";
pub const DATA_LABEL: &str = "data";

/// Upper bound on rows returned by the data-node query.
pub const DATA_NODE_LIMIT: usize = 25;

/// Administrative catalog database that answers `SHOW DATABASES`.
pub const SYSTEM_DATABASE: &str = "system";

/// Text printed for a property the node does not carry.
pub const MISSING_VALUE: &str = "None";

/// One row of the database catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseEntry {
    pub name: String,
    pub current_status: String,
}

/// A `Person` node. The report line prints name, birthday and info; the
/// remaining fields show up only in the detailed listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonRow {
    pub name: Option<String>,
    pub birthday: Option<String>,
    pub info: Option<String>,
    pub age: Option<String>,
    pub location: Option<String>,
    pub occupation: Option<String>,
}

impl PersonRow {
    /// `age 34, Berlin, engineer` from whichever extra fields are set.
    pub fn details(&self) -> Option<String> {
        let parts: Vec<String> = [
            self.age.as_ref().map(|a| format!("age {a}")),
            self.location.clone(),
            self.occupation.clone(),
        ]
        .into_iter()
        .flatten()
        .collect();
        (!parts.is_empty()).then(|| parts.join(", "))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataRow {
    pub data: Option<String>,
}

/// Case-sensitive exact membership test over the discovered labels.
pub fn has_label(labels: &[String], label: &str) -> bool {
    labels.iter().any(|l| l == label)
}

struct OrMissing<'a>(&'a Option<String>);

impl fmt::Display for OrMissing<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_deref().unwrap_or(MISSING_VALUE))
    }
}

impl fmt::Display for DatabaseEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (status: {})", self.name, self.current_status)
    }
}

impl fmt::Display for PersonRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} – born {} – {}",
            OrMissing(&self.name),
            OrMissing(&self.birthday),
            OrMissing(&self.info)
        )
    }
}

impl fmt::Display for DataRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", OrMissing(&self.data))
    }
}
