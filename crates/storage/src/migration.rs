use sea_orm::sea_query::{ColumnDef, Expr, Table, TableCreateStatement};
use sea_orm::{ConnectionTrait, DatabaseBackend, DatabaseConnection};

use crate::entity::{backends, config_history, routes};
use gateway_admin_domain::storage::StorageResult;

pub async fn run_migrations(db: &DatabaseConnection) -> StorageResult<()> {
    let backend = db.get_database_backend();

    let backends_table = Table::create()
        .if_not_exists()
        .table(backends::Entity)
        .col(
            ColumnDef::new(backends::Column::Id)
                .integer()
                .not_null()
                .auto_increment()
                .primary_key(),
        )
        .col(
            ColumnDef::new(backends::Column::Name)
                .string_len(64)
                .not_null()
                .unique_key(),
        )
        .col(
            ColumnDef::new(backends::Column::Addr)
                .string_len(255)
                .not_null(),
        )
        .col(
            ColumnDef::new(backends::Column::Description)
                .string_len(255)
                .null(),
        )
        .col(
            ColumnDef::new(backends::Column::Enabled)
                .boolean()
                .not_null()
                .default(true),
        )
        .col(
            ColumnDef::new(backends::Column::CreatedAt)
                .date_time()
                .not_null()
                .default(Expr::current_timestamp()),
        )
        .col(
            ColumnDef::new(backends::Column::UpdatedAt)
                .date_time()
                .not_null()
                .default(Expr::current_timestamp()),
        )
        .to_owned();
    create_table(db, backend, backends_table).await?;

    let routes_table = Table::create()
        .if_not_exists()
        .table(routes::Entity)
        .col(
            ColumnDef::new(routes::Column::Id)
                .integer()
                .not_null()
                .auto_increment()
                .primary_key(),
        )
        .col(
            ColumnDef::new(routes::Column::HttpMethod)
                .string_len(16)
                .not_null(),
        )
        .col(
            ColumnDef::new(routes::Column::HttpPattern)
                .string_len(255)
                .not_null(),
        )
        .col(
            ColumnDef::new(routes::Column::BackendName)
                .string_len(64)
                .not_null(),
        )
        .col(
            ColumnDef::new(routes::Column::BackendService)
                .string_len(128)
                .not_null(),
        )
        .col(
            ColumnDef::new(routes::Column::BackendMethod)
                .string_len(64)
                .not_null(),
        )
        .col(
            ColumnDef::new(routes::Column::TimeoutMs)
                .integer()
                .not_null()
                .default(5000),
        )
        .col(
            ColumnDef::new(routes::Column::Description)
                .string_len(255)
                .null(),
        )
        .col(
            ColumnDef::new(routes::Column::Enabled)
                .boolean()
                .not_null()
                .default(true),
        )
        .col(
            ColumnDef::new(routes::Column::CreatedAt)
                .date_time()
                .not_null()
                .default(Expr::current_timestamp()),
        )
        .col(
            ColumnDef::new(routes::Column::UpdatedAt)
                .date_time()
                .not_null()
                .default(Expr::current_timestamp()),
        )
        .to_owned();
    create_table(db, backend, routes_table).await?;

    let history_table = Table::create()
        .if_not_exists()
        .table(config_history::Entity)
        .col(
            ColumnDef::new(config_history::Column::Id)
                .big_integer()
                .not_null()
                .auto_increment()
                .primary_key(),
        )
        .col(
            ColumnDef::new(config_history::Column::ConfigType)
                .string_len(16)
                .not_null(),
        )
        .col(
            ColumnDef::new(config_history::Column::ConfigId)
                .integer()
                .null(),
        )
        .col(
            ColumnDef::new(config_history::Column::Operation)
                .string_len(16)
                .not_null(),
        )
        .col(
            ColumnDef::new(config_history::Column::OldValue)
                .text()
                .null(),
        )
        .col(
            ColumnDef::new(config_history::Column::NewValue)
                .text()
                .null(),
        )
        .col(
            ColumnDef::new(config_history::Column::Operator)
                .string_len(64)
                .null(),
        )
        .col(
            ColumnDef::new(config_history::Column::CreatedAt)
                .date_time()
                .not_null()
                .default(Expr::current_timestamp()),
        )
        .to_owned();
    create_table(db, backend, history_table).await?;

    Ok(())
}

async fn create_table(
    db: &DatabaseConnection,
    backend: DatabaseBackend,
    mut statement: TableCreateStatement,
) -> StorageResult<()> {
    statement.if_not_exists();
    db.execute(backend.build(&statement))
        .await
        .map_err(crate::errors::StorageError::from_source)?;
    Ok(())
}
