mod app;
mod error;
mod extract;
mod routes;
mod telemetry;
#[cfg(test)]
mod test_util;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // load .env first so LOG_LEVEL reaches the EnvFilter
    dotenv::dotenv().ok();
    telemetry::init_tracing();
    let path = dotenv::var("DB_PATH").expect("DB_PATH must be set");
    let pool = db::establish_connection(&path).await?;
    db::run_migrations(&pool).await?;

    app::run_server(pool).await
}
