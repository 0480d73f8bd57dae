//! Schema setup for the participants table

use sqlx::PgPool;

/// Create the participants table and its indexes if they don't exist.
pub async fn run(pool: &PgPool) -> Result<(), sqlx::Error> {
    tracing::info!("Running participant migrations...");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS participantes (
            id BIGSERIAL PRIMARY KEY,
            nombre TEXT NOT NULL CHECK (nombre <> ''),
            apellidos TEXT NOT NULL CHECK (apellidos <> ''),
            email TEXT NOT NULL UNIQUE,
            twitter TEXT NOT NULL CHECK (twitter <> ''),
            ocupacion TEXT NOT NULL CHECK (ocupacion <> ''),
            avatar TEXT NOT NULL CHECK (avatar <> ''),
            acepto_terminos BOOLEAN NOT NULL CHECK (acepto_terminos),
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_participantes_orden ON participantes (apellidos, nombre)",
    )
    .execute(pool)
    .await?;

    tracing::info!("Participant migrations complete");
    Ok(())
}
