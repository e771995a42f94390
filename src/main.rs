use std::path::PathBuf;

use serde::Serialize;

use news_portal::error::{AppError, Result};
use news_portal::{Config, DbInitializer, InitOutcome, Repository};

// Page sizes used by the portal's landing and category pages
const DEFAULT_LATEST_LIMIT: usize = 12;
const DEFAULT_FEATURED_LIMIT: usize = 6;
const DEFAULT_CATEGORY_LIMIT: usize = 30;

const USAGE: &str = "usage: news-portal [--config PATH] <init | categories | latest [N] | featured [N] | category SLUG [N] | show ID | delete ID>";

#[derive(Debug, PartialEq)]
enum Command {
    Init,
    Categories,
    Latest(usize),
    Featured(usize),
    Category(String, usize),
    Show(i64),
    Delete(i64),
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging (only show warnings and errors by default)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (config_path, rest) = split_config_flag(&args)?;

    let config = match config_path {
        Some(path) => Config::load_from(&path)?,
        None => Config::load()?,
    };
    let command = parse_command(&rest)?;

    // The store must be ready before anything reads from it.
    let db_path = config.db_path();
    let outcome = DbInitializer::new(&db_path).initialize().await?;
    tracing::debug!("Store {} initialized: {:?}", db_path.display(), outcome);

    let repository = Repository::new(db_path);

    match command {
        Command::Init => match outcome {
            InitOutcome::Seeded { categories, news } => {
                println!("Seeded {} categories and {} news items", categories, news)
            }
            InitOutcome::AlreadySeeded => println!("Store already initialized"),
        },
        Command::Categories => print_json(&repository.list_categories().await?)?,
        Command::Latest(limit) => print_json(&repository.list_latest(limit).await?)?,
        Command::Featured(limit) => print_json(&repository.list_featured(limit).await?)?,
        Command::Category(slug, limit) => {
            if repository.get_category_by_slug(&slug).await?.is_none() {
                return Err(anyhow::anyhow!("Category '{}' not found", slug).into());
            }
            print_json(&repository.list_by_category_slug(&slug, limit).await?)?
        }
        Command::Show(id) => match repository.get_by_id(id).await? {
            Some(item) => print_json(&item)?,
            None => return Err(anyhow::anyhow!("News item {} not found", id).into()),
        },
        Command::Delete(id) => {
            if repository.delete(id).await? {
                println!("Deleted news item {}", id);
            } else {
                println!("News item {} does not exist", id);
            }
        }
    }

    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn split_config_flag(args: &[String]) -> Result<(Option<PathBuf>, Vec<String>)> {
    let mut config_path = None;
    let mut rest = Vec::new();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        if arg == "--config" {
            let path = iter
                .next()
                .ok_or_else(|| AppError::InvalidInput("--config needs a path".to_string()))?;
            config_path = Some(PathBuf::from(path));
        } else {
            rest.push(arg.clone());
        }
    }

    Ok((config_path, rest))
}

fn parse_command(args: &[String]) -> Result<Command> {
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    let command = match args.as_slice() {
        ["init"] => Command::Init,
        ["categories"] => Command::Categories,
        ["latest"] => Command::Latest(DEFAULT_LATEST_LIMIT),
        ["latest", n] => Command::Latest(parse_number(n)?),
        ["featured"] => Command::Featured(DEFAULT_FEATURED_LIMIT),
        ["featured", n] => Command::Featured(parse_number(n)?),
        ["category", slug] => Command::Category(slug.to_string(), DEFAULT_CATEGORY_LIMIT),
        ["category", slug, n] => Command::Category(slug.to_string(), parse_number(n)?),
        ["show", id] => Command::Show(parse_number(id)?),
        ["delete", id] => Command::Delete(parse_number(id)?),
        _ => return Err(AppError::InvalidInput(USAGE.to_string())),
    };
    Ok(command)
}

fn parse_number<T: std::str::FromStr>(value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| AppError::InvalidInput(format!("'{}' is not a valid number", value)))
}
