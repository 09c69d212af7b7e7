use clap::Parser;

use catalog_model::config::AppConfig;
use catalog_model::{client_from_config, find_by_name, TypeName};

/// Resolve an entity in the catalog by its type and exact name
#[derive(Debug, Parser)]
#[command(name = "catalog-model")]
#[command(about = "Look up a catalog entity by type and name")]
struct Args {
    /// Entity type, e.g. Table or AtlasGlossary
    #[arg(value_parser = parse_type_name)]
    type_name: TypeName,

    /// Exact name of the entity
    name: String,

    /// Extra attributes to fetch with the entity
    attributes: Vec<String>,
}

fn parse_type_name(value: &str) -> Result<TypeName, String> {
    value.parse::<TypeName>().map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    // Initialize logging with explicit filter to keep the HTTP stack quiet
    use env_logger::Builder;
    use log::LevelFilter;

    Builder::new()
        .filter_level(LevelFilter::Info)
        .filter_module("reqwest", LevelFilter::Warn)
        .filter_module("hyper", LevelFilter::Warn)
        .parse_default_env()
        .init();

    let args = Args::parse();
    let attributes: Vec<&str> = args.attributes.iter().map(String::as_str).collect();

    let config = AppConfig::load()?;
    let client = client_from_config(&config)?;
    log::info!(
        "Resolving {} '{}' against {}",
        args.type_name,
        args.name,
        client.base_url()
    );

    let asset = find_by_name(&client, args.type_name, &args.name, &attributes).await?;
    println!("{}", serde_json::to_string_pretty(&asset)?);

    Ok(())
}
