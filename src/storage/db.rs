use log::info;
use sea_orm::{
    sea_query::TableCreateStatement, ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, Schema,
};

use crate::config::DatabaseConfig;
use crate::entities::{area, general_task, project, subtask, user};

/// Local storage manager owning the database connection.
pub struct LocalStorage {
    pub conn: DatabaseConnection,
}

impl LocalStorage {
    /// Open the database described by `config` and make sure the schema exists.
    pub async fn new(config: &DatabaseConfig) -> Result<Self, DbErr> {
        let mut options = ConnectOptions::new(config.url.clone());
        options
            .max_connections(config.max_connections)
            .min_connections(1)
            .sqlx_logging(false);

        let conn = Database::connect(options).await?;
        let storage = LocalStorage { conn };
        storage.init_schema().await?;

        info!("📦 Opened database at {}", config.url);
        Ok(storage)
    }

    /// Open a private in-memory database. Used by tests and dry runs.
    pub async fn in_memory() -> Result<Self, DbErr> {
        // A single connection keeps every query on the same memory database.
        let mut options = ConnectOptions::new("sqlite::memory:".to_string());
        options.max_connections(1).min_connections(1).sqlx_logging(false);

        let conn = Database::connect(options).await?;
        let storage = LocalStorage { conn };
        storage.init_schema().await?;
        Ok(storage)
    }

    /// Create tables for every entity, parents before children.
    async fn init_schema(&self) -> Result<(), DbErr> {
        let backend = self.conn.get_database_backend();
        let schema = Schema::new(backend);

        let statements: Vec<TableCreateStatement> = vec![
            schema.create_table_from_entity(area::Entity).if_not_exists().to_owned(),
            schema.create_table_from_entity(user::Entity).if_not_exists().to_owned(),
            schema.create_table_from_entity(project::Entity).if_not_exists().to_owned(),
            schema.create_table_from_entity(general_task::Entity).if_not_exists().to_owned(),
            schema.create_table_from_entity(subtask::Entity).if_not_exists().to_owned(),
        ];

        for statement in statements {
            self.conn.execute(backend.build(&statement)).await?;
        }

        Ok(())
    }

    /// Check if the database has any projects
    pub async fn has_data(&self) -> Result<bool, DbErr> {
        Ok(project::Entity::find().count(&self.conn).await? > 0)
    }
}
