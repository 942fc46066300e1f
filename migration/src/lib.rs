pub use sea_orm_migration::prelude::*;

mod m20251019_000001_create_catalog_tables;
mod m20251019_000002_create_activity_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20251019_000001_create_catalog_tables::Migration),
            Box::new(m20251019_000002_create_activity_tables::Migration),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm_migration::sea_orm::{
        ConnectOptions, ConnectionTrait, Database, DatabaseBackend, Statement,
    };

    async fn table_names(db: &sea_orm_migration::sea_orm::DatabaseConnection) -> Vec<String> {
        let rows = db
            .query_all(Statement::from_string(
                DatabaseBackend::Sqlite,
                "SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name",
            ))
            .await
            .unwrap();
        rows.iter()
            .map(|row| row.try_get::<String>("", "name").unwrap())
            .collect()
    }

    #[tokio::test]
    async fn up_creates_every_table_and_down_removes_them() {
        let mut options = ConnectOptions::new("sqlite::memory:");
        options.max_connections(1).min_connections(1);
        let db = Database::connect(options).await.unwrap();

        Migrator::up(&db, None).await.unwrap();
        let tables = table_names(&db).await;
        for expected in [
            "videogame",
            "platform",
            "company",
            "genres",
            "gameplatform",
            "gamedeveloper",
            "gamepublisher",
            "gamegenre",
            "users",
            "collection",
            "collectiongame",
            "plays",
            "purchases",
            "follows",
            "userplatform",
        ] {
            assert!(tables.iter().any(|t| t == expected), "missing {expected}");
        }

        Migrator::down(&db, None).await.unwrap();
        let tables = table_names(&db).await;
        assert!(!tables.iter().any(|t| t == "users"));
        assert!(!tables.iter().any(|t| t == "videogame"));
    }
}
