use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let create_table_sql = "CREATE TABLE IF NOT EXISTS todos (
            id BIGSERIAL PRIMARY KEY,
            title TEXT NOT NULL,
            description TEXT,
            category TEXT,
            priority INTEGER NOT NULL DEFAULT 0,
            due_at TIMESTAMPTZ,
            completed BOOLEAN NOT NULL DEFAULT FALSE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )";

        manager
            .get_connection()
            .execute_unprepared(create_table_sql)
            .await?;

        // Index backing the newest-first listing on GET /api/todos
        let create_index_sql = "CREATE INDEX IF NOT EXISTS todos_created_at_idx
            ON todos(created_at DESC)";

        manager
            .get_connection()
            .execute_unprepared(create_index_sql)
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP TABLE IF EXISTS todos")
            .await?;

        Ok(())
    }
}
