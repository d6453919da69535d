use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import question bank from CSV files
    Import { path: PathBuf },
    /// Export question bank to CSV files
    Export { path: PathBuf },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    match cli.command {
        Commands::Export { path } => export_data(path).await.expect("Cannot export"),
        Commands::Import { path } => import_data(path).await.expect("Cannot import"),
    }
}

async fn connect() -> anyhow::Result<sqlx::SqlitePool> {
    dotenv::dotenv().ok();
    let path = dotenv::var("DB_PATH")?;
    Ok(db::establish_connection(&path).await?)
}

fn write_to(path: PathBuf, data: Vec<impl Serialize>) -> anyhow::Result<()> {
    let file = std::fs::File::create(path)?;
    let mut wtr = csv::Writer::from_writer(file);
    for line in data {
        wtr.serialize(line)?;
    }
    wtr.flush()?;
    Ok(())
}

fn read_from<T: DeserializeOwned>(path: PathBuf) -> anyhow::Result<Vec<T>> {
    let file = std::fs::File::open(path)?;
    let mut rdr = csv::Reader::from_reader(file);
    let mut out = Vec::new();
    for record in rdr.deserialize() {
        let record: T = record?;
        out.push(record);
    }
    Ok(out)
}

async fn export_data(path: PathBuf) -> anyhow::Result<()> {
    let pool = connect().await?;
    let categories = db::categories::get_categories(&pool).await?;
    let questions = db::questions::get_questions(&pool).await?;
    if !path.exists() {
        std::fs::create_dir_all(&path)?
    }
    write_to(path.join("categories.csv"), categories)?;
    write_to(path.join("questions.csv"), questions)?;
    Ok(())
}

async fn import_data(path: PathBuf) -> anyhow::Result<()> {
    let pool = connect().await?;

    let categories: Vec<db::Category> = read_from(path.join("categories.csv"))?;
    let questions: Vec<db::Question> = read_from(path.join("questions.csv"))?;
    // categories first, questions reference them
    db::categories::import_categories(&pool, categories).await?;
    db::questions::import_questions(&pool, questions).await?;
    Ok(())
}
