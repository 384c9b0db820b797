pub mod catalog;
pub mod cli;
pub mod columns;
pub mod config;
pub mod error;
pub mod identity;
pub mod import;
pub mod io_utils;
pub mod merge;
pub mod record;
pub mod report;
pub mod store;
pub mod table;
pub mod validate;

use std::{env, path::Path, sync::OnceLock};

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, debug, info};

use crate::{
    catalog::CatalogQuery,
    cli::{Cli, Commands, OutputFormat},
    config::{ImportConfig, ImportOptions},
    import::CsvSource,
    store::{JsonFileStore, MemoryStore},
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("podcast_import", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Import(args) => handle_import(&args),
        Commands::Headers(args) => handle_headers(&args),
        Commands::List(args) => handle_list(&args),
    }
}

fn load_options(config: Option<&Path>) -> Result<ImportOptions> {
    match config {
        Some(path) => Ok(ImportConfig::load(path)?.into_options()),
        None => Ok(ImportOptions::default()),
    }
}

fn csv_source(input: &Path, delimiter: Option<u8>, encoding: Option<&str>) -> Result<CsvSource> {
    Ok(CsvSource {
        delimiter: io_utils::resolve_input_delimiter(input, delimiter),
        encoding: io_utils::resolve_encoding(encoding)?,
    })
}

fn handle_import(args: &cli::ImportArgs) -> Result<()> {
    let mut options = load_options(args.config.as_deref())?;
    if args.overwrite {
        options.overwrite = true;
    } else if args.no_overwrite {
        options.overwrite = false;
    }
    if let Some(max) = args.max_errors {
        options.max_error_messages = max;
    }
    let source = csv_source(&args.input, args.delimiter, args.input_encoding.as_deref())?;
    info!(
        "Importing '{}' into {:?} (overwrite: {})",
        args.input.display(),
        args.store,
        options.overwrite
    );

    let mut store = JsonFileStore::open(&args.store)
        .with_context(|| format!("Opening catalog {:?}", args.store))?;
    let input = io_utils::open_input(&args.input)?;

    let outcome = if args.dry_run {
        let mut scratch = MemoryStore::with_podcasts(store.podcasts().to_vec());
        import::import_csv_with(input, source, &mut scratch, &options)
    } else {
        import::import_csv_with(input, source, &mut store, &options)
    };
    let report = outcome.with_context(|| format!("Importing {:?}", args.input))?;

    if args.dry_run {
        info!("Dry run: catalog {:?} left unchanged", args.store);
    } else {
        store
            .save()
            .with_context(|| format!("Writing catalog {:?}", args.store))?;
    }

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Table => print!("{}", report.render_summary()),
    }
    Ok(())
}

fn handle_headers(args: &cli::HeadersArgs) -> Result<()> {
    let options = load_options(args.config.as_deref())?;
    let source = csv_source(&args.input, args.delimiter, args.input_encoding.as_deref())?;
    let input = io_utils::open_input(&args.input)?;
    let mut reader = io_utils::open_csv_reader(input, source.delimiter);
    let raw = reader
        .byte_headers()
        .with_context(|| format!("Reading headers of {:?}", args.input))?;
    let headers = io_utils::decode_record(raw, source.encoding)
        .with_context(|| format!("Decoding headers as {}", source.encoding.name()))?;
    debug!("Headers: {:?}", headers);

    let rows = columns::map_headers(&headers, &options.aliases)
        .into_iter()
        .enumerate()
        .map(|(idx, (header, field))| {
            vec![
                (idx + 1).to_string(),
                header,
                field.map_or_else(|| "(ignored)".to_string(), |f| f.to_string()),
            ]
        })
        .collect::<Vec<_>>();
    let table_headers = vec!["#".to_string(), "header".to_string(), "field".to_string()];
    table::print_table(&table_headers, &rows);
    Ok(())
}

fn handle_list(args: &cli::ListArgs) -> Result<()> {
    let store = JsonFileStore::open(&args.store)
        .with_context(|| format!("Opening catalog {:?}", args.store))?;
    let query = CatalogQuery {
        search: args.search.clone(),
        country: args.country.clone(),
        language: args.language.clone(),
        status: args.status.clone(),
        category: args.category.clone(),
        limit: args.limit,
    };
    let found = query.apply(store.podcasts());
    debug!("{} of {} podcast(s) match", found.len(), store.podcasts().len());

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&found)?),
        OutputFormat::Table => {
            let headers = ["title", "host", "country", "language", "year", "categories"]
                .map(str::to_string)
                .to_vec();
            let rows = found
                .iter()
                .map(|podcast| {
                    let record = &podcast.record;
                    vec![
                        record.title.clone(),
                        record.host.clone(),
                        record.country.clone(),
                        record.language.clone(),
                        record.year.to_string(),
                        record.categories.join(", "),
                    ]
                })
                .collect::<Vec<_>>();
            table::print_table(&headers, &rows);
        }
    }
    Ok(())
}
