use sqlx::{PgPool, migrate::MigrateError, migrate::Migrator};
use tracing::info;

/// Migration files under `./migrations`, embedded at compile time.
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Applies pending migrations in version order. Already-applied versions are
/// skipped, so running this against an up-to-date schema does nothing.
pub async fn apply_migrations(pool: &PgPool) -> Result<(), MigrateError> {
    let known = MIGRATOR.iter().count();
    MIGRATOR.run(pool).await?;
    info!("Database schema up to date ({} migrations known)", known);
    Ok(())
}
