//! Schema definitions assembled by drivers.
//!
//! A [`SchemaDef`] is a named group of tables in creation order, parents
//! before children. The [`SchemaCollection`] holds every schema a run knows
//! about and is keyed by schema name.

use sea_orm::sea_query::{Alias, DeleteStatement, Query, TableCreateStatement};
use sea_orm::{DbBackend, EntityTrait, Schema, Statement};

/// A single table: its name and its create-if-missing statement.
#[derive(Debug, Clone)]
pub struct TableDef {
    name: String,
    create: TableCreateStatement,
}

impl TableDef {
    /// Describes the table behind a sea-orm entity for `backend`.
    pub fn from_entity<E: EntityTrait>(backend: DbBackend, entity: E) -> Self {
        let mut create = Schema::new(backend).create_table_from_entity(entity);
        create.if_not_exists();
        Self {
            name: entity.table_name().to_owned(),
            create,
        }
    }

    /// Wraps a hand-built create statement.
    pub fn new(name: impl Into<String>, mut create: TableCreateStatement) -> Self {
        create.if_not_exists();
        Self {
            name: name.into(),
            create,
        }
    }

    /// Table name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// `CREATE TABLE IF NOT EXISTS` for this table.
    pub fn create_statement(&self) -> &TableCreateStatement {
        &self.create
    }

    /// Unfiltered `DELETE FROM` for this table.
    pub fn delete_statement(&self) -> DeleteStatement {
        Query::delete()
            .from_table(Alias::new(self.name.as_str()))
            .to_owned()
    }

    /// Builds the create statement for `backend`.
    pub fn build_create(&self, backend: DbBackend) -> Statement {
        backend.build(&self.create)
    }

    /// Builds the delete statement for `backend`.
    pub fn build_delete(&self, backend: DbBackend) -> Statement {
        backend.build(&self.delete_statement())
    }
}

/// A named group of tables in creation order.
#[derive(Debug, Clone)]
pub struct SchemaDef {
    name: String,
    tables: Vec<TableDef>,
}

impl SchemaDef {
    /// Creates an empty schema.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tables: Vec::new(),
        }
    }

    /// Appends a table; it is created after every table added before it.
    #[must_use]
    pub fn table(mut self, table: TableDef) -> Self {
        self.tables.push(table);
        self
    }

    /// Schema name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Tables in creation order.
    pub fn tables(&self) -> &[TableDef] {
        &self.tables
    }

    /// Tables in deletion order: children before parents.
    pub fn tables_for_delete(&self) -> impl Iterator<Item = &TableDef> {
        self.tables.iter().rev()
    }
}

/// The set of schemas known to one bootstrap run.
#[derive(Debug, Clone)]
pub struct SchemaCollection {
    backend: DbBackend,
    schemas: Vec<SchemaDef>,
}

impl SchemaCollection {
    /// Creates an empty collection for `backend`.
    pub fn new(backend: DbBackend) -> Self {
        Self {
            backend,
            schemas: Vec::new(),
        }
    }

    /// Backend the table statements are built for.
    pub fn backend(&self) -> DbBackend {
        self.backend
    }

    /// Describes an entity's table for this collection's backend.
    pub fn entity<E: EntityTrait>(&self, entity: E) -> TableDef {
        TableDef::from_entity(self.backend, entity)
    }

    /// Adds a schema unless one with the same name is already present.
    ///
    /// Returns `true` if the schema was added.
    pub fn insert(&mut self, schema: SchemaDef) -> bool {
        if self.contains(schema.name()) {
            return false;
        }
        self.schemas.push(schema);
        true
    }

    /// Whether a schema called `name` is present.
    pub fn contains(&self, name: &str) -> bool {
        self.schemas.iter().any(|s| s.name == name)
    }

    /// Schemas in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &SchemaDef> {
        self.schemas.iter()
    }

    /// Number of schemas.
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Whether no schema has been added.
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Number of tables across all schemas.
    pub fn table_count(&self) -> usize {
        self.schemas.iter().map(|s| s.tables.len()).sum()
    }
}

impl<'a> IntoIterator for &'a SchemaCollection {
    type Item = &'a SchemaDef;
    type IntoIter = std::slice::Iter<'a, SchemaDef>;

    fn into_iter(self) -> Self::IntoIter {
        self.schemas.iter()
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::sea_query::{ColumnDef, Table};

    use super::*;

    fn table(name: &str) -> TableDef {
        TableDef::new(
            name,
            Table::create()
                .table(Alias::new(name))
                .col(ColumnDef::new(Alias::new("id")).integer().not_null().primary_key())
                .to_owned(),
        )
    }

    #[test]
    fn test_table_statements() {
        let users = table("users");

        assert_eq!(
            users.build_delete(DbBackend::Postgres).to_string(),
            r#"DELETE FROM "users""#
        );
        assert!(
            users
                .build_create(DbBackend::Postgres)
                .to_string()
                .starts_with(r#"CREATE TABLE IF NOT EXISTS "users""#)
        );
    }

    #[test]
    fn test_tables_for_delete_is_reverse_creation_order() {
        let schema = SchemaDef::new("accounts")
            .table(table("users"))
            .table(table("organizations"))
            .table(table("sessions"));

        let order: Vec<_> = schema.tables_for_delete().map(TableDef::name).collect();

        assert_eq!(order, ["sessions", "organizations", "users"]);
    }

    #[test]
    fn test_collection_keeps_first_schema_per_name() {
        let mut schemas = SchemaCollection::new(DbBackend::Postgres);

        assert!(schemas.insert(SchemaDef::new("accounts").table(table("users"))));
        assert!(!schemas.insert(SchemaDef::new("accounts").table(table("other"))));
        assert!(schemas.insert(SchemaDef::new("billing")));

        assert_eq!(schemas.len(), 2);
        assert_eq!(schemas.table_count(), 1);
        assert!(schemas.contains("billing"));
        assert_eq!(schemas.iter().next().unwrap().tables()[0].name(), "users");
    }

    #[test]
    fn test_new_collection_is_empty() {
        let schemas = SchemaCollection::new(DbBackend::Sqlite);

        assert!(schemas.is_empty());
        assert_eq!(schemas.backend(), DbBackend::Sqlite);
        assert_eq!((&schemas).into_iter().count(), 0);
    }
}
