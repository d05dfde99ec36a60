use clap::{Parser, Subcommand, ValueEnum};
use listingdb::{KeyStrategy, NewRecord, RecordPatch, SearchCriteria, Store, StoreConfig};
use std::process;

mod seed;

/// listingdb CLI — manage a listing store file from the command line
#[derive(Parser)]
#[command(name = "listingdb", version, about)]
struct Cli {
    /// Path to the backing file (default: $LISTINGDB_PATH or realEstateDB.json)
    #[arg(long)]
    db: Option<String>,

    /// Key generation strategy for new records (ulid, uuid, nanoid)
    #[arg(long, value_parser = parse_key_strategy)]
    key_strategy: Option<KeyStrategy>,

    /// Output format
    #[arg(long, default_value = "yaml")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    Yaml,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// List every record
    List,

    /// Get a single record by key
    Get {
        /// Record key
        key: String,
    },

    /// Create a new record
    Create {
        /// Field values (e.g. --field title="Garden flat" --field address.city=Haifa)
        #[arg(long = "field", value_parser = parse_key_value)]
        fields: Vec<(String, String)>,
        /// Use this key instead of generating one
        #[arg(long)]
        key: Option<String>,
    },

    /// Update fields of an existing record
    Update {
        /// Record key
        key: String,
        /// Field values to update (e.g. --field price=2400000)
        #[arg(long = "field", value_parser = parse_key_value)]
        fields: Vec<(String, String)>,
    },

    /// Delete a record
    Delete {
        /// Record key
        key: String,
    },

    /// Find records whose fields equal the given values
    Search {
        /// Field filters (e.g. --filter type=apartment)
        #[arg(long = "filter", value_parser = parse_key_value)]
        filters: Vec<(String, String)>,
    },

    /// Replace the store's contents with sample listings
    Seed,

    /// Show the backing file, record count, and counts per type
    Status,
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    let pos = s
        .find('=')
        .ok_or_else(|| format!("Invalid key=value pair: no '=' found in '{s}'"))?;
    Ok((s[..pos].to_string(), s[pos + 1..].to_string()))
}

fn parse_key_strategy(s: &str) -> Result<KeyStrategy, String> {
    s.parse().map_err(|e: listingdb::ListingDbError| e.to_string())
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("ERROR:{e}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = StoreConfig::from_env()?;
    if let Some(db) = cli.db {
        config.path = db.into();
    }
    if let Some(strategy) = cli.key_strategy {
        config.key_strategy = strategy;
    }

    log::debug!("Opening store at: {}", config.path.display());
    let mut store = Store::open(config)?;

    match cli.command {
        Command::List => {
            let records = serde_json::to_value(store.get_all())?;
            print_output(&records, &cli.format)?;
        }

        Command::Get { key } => {
            let record = store
                .get_by_key(&key)
                .ok_or_else(|| format!("Record not found: {key}"))?;
            print_output(&serde_json::to_value(record)?, &cli.format)?;
        }

        Command::Create { fields, key } => {
            let new: NewRecord = serde_json::from_value(fields_to_value(&fields))?;
            let record = match key {
                Some(key) => store.create_with_key(key, new)?,
                None => store.create(new)?,
            };
            print_output(&serde_json::to_value(&record)?, &cli.format)?;
        }

        Command::Update { key, fields } => {
            let patch: RecordPatch = serde_json::from_value(fields_to_value(&fields))?;
            let record = store
                .update(&key, &patch)?
                .ok_or_else(|| format!("Record not found: {key}"))?;
            print_output(&serde_json::to_value(&record)?, &cli.format)?;
        }

        Command::Delete { key } => {
            let deleted = store.delete(&key)?;
            print_output(
                &serde_json::json!({ "deleted": deleted, "key": key }),
                &cli.format,
            )?;
        }

        Command::Search { filters } => {
            let criteria: SearchCriteria = serde_json::from_value(fields_to_value(&filters))?;
            let records = serde_json::to_value(store.search(&criteria))?;
            print_output(&records, &cli.format)?;
        }

        Command::Seed => {
            let created = seed::seed(&mut store)?;
            print_output(
                &serde_json::json!({ "ok": true, "seeded": created.len(), "total": store.len() }),
                &cli.format,
            )?;
        }

        Command::Status => {
            print_output(&store.status(), &cli.format)?;
        }
    }

    Ok(())
}

fn print_output(
    value: &serde_json::Value,
    format: &OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(value)?),
    }
    Ok(())
}

/// Fields whose values are always text, even when they look like numbers.
const STRING_FIELDS: &[&str] = &[
    "key",
    "title",
    "description",
    "location",
    "type",
    "saleDate",
    "address.city",
    "address.city.text",
    "address.neighborhood",
    "address.neighborhood.text",
    "address.street",
    "address.street.text",
];

/// Build a JSON object from `key=value` pairs. Values are parsed as JSON where
/// possible (numbers, booleans, objects), otherwise kept as strings. Dotted keys
/// address nested objects.
fn fields_to_value(fields: &[(String, String)]) -> serde_json::Value {
    let mut root = serde_json::Map::new();
    for (key, val) in fields {
        let json_val = if STRING_FIELDS.contains(&key.as_str()) {
            serde_json::Value::String(val.clone())
        } else {
            serde_json::from_str(val).unwrap_or_else(|_| serde_json::Value::String(val.clone()))
        };
        let parts: Vec<&str> = key.split('.').collect();
        insert_path(&mut root, &parts, json_val);
    }
    serde_json::Value::Object(root)
}

fn insert_path(
    map: &mut serde_json::Map<String, serde_json::Value>,
    parts: &[&str],
    value: serde_json::Value,
) {
    match parts {
        [] => {}
        [leaf] => {
            map.insert(leaf.to_string(), value);
        }
        [head, rest @ ..] => {
            let entry = map
                .entry(head.to_string())
                .or_insert_with(|| serde_json::Value::Object(serde_json::Map::new()));
            // A scalar set earlier under the same name is replaced by the nested object
            if !entry.is_object() {
                *entry = serde_json::Value::Object(serde_json::Map::new());
            }
            if let serde_json::Value::Object(inner) = entry {
                insert_path(inner, rest, value);
            }
        }
    }
}
