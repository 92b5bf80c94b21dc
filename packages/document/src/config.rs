use crate::document::DocumentKind;
use crate::error::{DocumentError, DocumentResult};
use crate::migration::MigrationTable;
use crate::schema::SchemaDescriptor;
use seisflow_common::Version;
use std::path::{Path, PathBuf};

/// Configuration handed to document creation and loading: where schema
/// descriptors live and which migration table applies.
///
/// The migration table is an immutable value owned by the config; there is
/// no module-level mutable state.
#[derive(Debug)]
pub struct DocumentConfig {
    schema_dir: PathBuf,
    migrations: MigrationTable,
}

impl DocumentConfig {
    /// Config with the standard migration table and descriptors looked up in
    /// `schema_dir`.
    pub fn new(schema_dir: impl Into<PathBuf>) -> Self {
        Self {
            schema_dir: schema_dir.into(),
            migrations: MigrationTable::standard(),
        }
    }

    /// Config pointing at the schema descriptors shipped with this package.
    pub fn bundled() -> Self {
        Self::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("schemas"))
    }

    pub fn with_migrations(mut self, migrations: MigrationTable) -> Self {
        self.migrations = migrations;
        self
    }

    pub fn schema_dir(&self) -> &Path {
        &self.schema_dir
    }

    pub fn migrations(&self) -> &MigrationTable {
        &self.migrations
    }

    /// Locate and parse the descriptor for a (kind, version) pair.
    ///
    /// A missing or unreadable descriptor is `CantAccessDtd`, distinct from
    /// the `InvalidDocument` a later structural check may produce.
    pub(crate) fn load_schema(
        &self,
        kind: DocumentKind,
        version: Version,
    ) -> DocumentResult<SchemaDescriptor> {
        let path = self
            .schema_dir
            .join(format!("{}-{}.json", kind.root_tag(), version));
        let data = std::fs::read_to_string(&path)
            .map_err(|_| DocumentError::CantAccessDtd(path.clone()))?;
        serde_json::from_str(&data).map_err(|_| DocumentError::CantAccessDtd(path))
    }
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self::bundled()
    }
}
