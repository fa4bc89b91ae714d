//! ember — serve a PHP project folder and poke its SQLite database.
//!
//! All user-facing rendering lives here; the library crates only emit
//! `tracing` diagnostics.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use base64::Engine as _;
use clap::{Parser, Subcommand};
use crossbeam_channel::RecvTimeoutError;
use rusqlite::types::Value;
use tracing_subscriber::EnvFilter;

use ember_core::prefs::PrefsStore;
use ember_db::{DatabaseManager, QueryOutput};
use ember_server::{php_version, PhpServer};

#[derive(Parser)]
#[command(
    name = "ember",
    version,
    about = "Local PHP dev server with a SQLite query console"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute one SQL statement against a database file.
    Query {
        /// Path to the SQLite database file.
        #[arg(long)]
        db: PathBuf,
        /// The SQL text to execute.
        sql: String,
        /// Positional bind parameters, applied in order.
        #[arg(long = "param")]
        params: Vec<String>,
        /// Reject write statements.
        #[arg(long)]
        read_only: bool,
        /// Emit JSON instead of a text table.
        #[arg(long)]
        json: bool,
    },
    /// List the user tables of a database file.
    Tables {
        #[arg(long)]
        db: PathBuf,
    },
    /// Show column metadata for one table.
    Schema {
        #[arg(long)]
        db: PathBuf,
        table: String,
    },
    /// Serve a project folder with the PHP built-in server.
    Serve {
        /// Project folder to serve (defaults to the last one used).
        #[arg(long)]
        root: Option<PathBuf>,
        /// Port to listen on (defaults to the last one used).
        #[arg(long)]
        port: Option<u16>,
    },
    /// Report whether PHP is available on PATH.
    PhpCheck,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> Result<(), String> {
    match command {
        Commands::Query {
            db,
            sql,
            params,
            read_only,
            json,
        } => {
            let mut manager = DatabaseManager::with_database(db);
            manager.set_read_only(read_only);
            let params: Vec<Value> = params.iter().map(|p| parse_param(p)).collect();
            let output = manager.execute(&sql, &params).map_err(|e| e.to_string())?;
            if json {
                println!("{}", render_json(&output));
            } else {
                print_output(&output);
            }
            Ok(())
        }
        Commands::Tables { db } => {
            let manager = DatabaseManager::with_database(db);
            for table in manager.list_tables().map_err(|e| e.to_string())? {
                println!("{table}");
            }
            Ok(())
        }
        Commands::Schema { db, table } => {
            let manager = DatabaseManager::with_database(db);
            let columns = manager
                .table_info_checked(&table)
                .map_err(|e| e.to_string())?;
            for column in &columns {
                let null = if column.nullable { "NULL" } else { "NOT NULL" };
                let pk = if column.is_primary_key { " PRIMARY KEY" } else { "" };
                println!("{} {} {null}{pk}", column.name, column.declared_type);
            }
            Ok(())
        }
        Commands::Serve { root, port } => serve(root, port),
        Commands::PhpCheck => match php_version() {
            Some(version) => {
                println!("{version}");
                Ok(())
            }
            None => Err("php not found on PATH".to_string()),
        },
    }
}

fn serve(root: Option<PathBuf>, port: Option<u16>) -> Result<(), String> {
    let mut prefs = PrefsStore::open(None);
    let root = root
        .or_else(|| {
            let last = &prefs.data.last_project;
            (!last.is_empty()).then(|| PathBuf::from(last))
        })
        .ok_or("no project folder given and none remembered; pass --root")?;
    let port = port.unwrap_or(prefs.data.port);

    if php_version().is_none() {
        return Err("php not found on PATH".to_string());
    }

    let mut server = PhpServer::new();
    server.start(&root, port).map_err(|e| e.to_string())?;

    prefs.data.last_project = root.display().to_string();
    prefs.data.port = server.port();
    if let Err(e) = prefs.save() {
        eprintln!("warning: could not save preferences: {e}");
    }

    println!("serving {} at {}", root.display(), server.url());
    println!("press Ctrl-C to stop");

    let logs = server.logs();
    loop {
        match logs.recv_timeout(Duration::from_millis(250)) {
            Ok(line) => println!("{line}"),
            Err(RecvTimeoutError::Timeout) => {
                if !server.is_running() {
                    return Err("php server exited unexpectedly".to_string());
                }
            }
            Err(RecvTimeoutError::Disconnected) => return Ok(()),
        }
    }
}

/// Parse a CLI parameter: integers and reals bind numerically, the bare
/// word `null` binds NULL, everything else binds as text.
fn parse_param(raw: &str) -> Value {
    if raw.eq_ignore_ascii_case("null") {
        Value::Null
    } else if let Ok(i) = raw.parse::<i64>() {
        Value::Integer(i)
    } else if let Ok(f) = raw.parse::<f64>() {
        Value::Real(f)
    } else {
        Value::Text(raw.to_string())
    }
}

fn print_output(output: &QueryOutput) {
    match output {
        QueryOutput::Affected { affected } => println!("{affected} row(s) affected"),
        QueryOutput::Rows {
            columns,
            rows,
            count,
        } => {
            if !columns.is_empty() {
                println!("{}", columns.join(" | "));
            }
            for row in rows {
                let cells: Vec<String> = row.iter().map(render_cell).collect();
                println!("{}", cells.join(" | "));
            }
            println!("{count} row(s)");
        }
    }
}

fn render_cell(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Integer(i) => i.to_string(),
        Value::Real(f) => f.to_string(),
        Value::Text(s) => s.clone(),
        Value::Blob(b) => format!("<{} bytes>", b.len()),
    }
}

fn render_json(output: &QueryOutput) -> String {
    let body = match output {
        QueryOutput::Rows {
            columns,
            rows,
            count,
        } => serde_json::json!({
            "columns": columns,
            "rows": rows
                .iter()
                .map(|row| row.iter().map(json_cell).collect::<Vec<_>>())
                .collect::<Vec<_>>(),
            "count": count,
        }),
        QueryOutput::Affected { affected } => serde_json::json!({ "affected": affected }),
    };
    body.to_string()
}

fn json_cell(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Integer(i) => serde_json::json!(i),
        Value::Real(f) => serde_json::json!(f),
        Value::Text(s) => serde_json::json!(s),
        Value::Blob(b) => {
            serde_json::json!(base64::engine::general_purpose::STANDARD.encode(b))
        }
    }
}
