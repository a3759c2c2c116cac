use clap::{Parser as ClapParser, Subcommand};
use hypeql::cli::{self, CheckOptions, CheckResult, CliError};
use hypeql::output;
use std::fmt::Display;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(ClapParser)]
#[command(name = "hypeql")]
#[command(about = "hypeql - ask a data graph only for the fields you need")]
#[command(version)]
struct Cli {
    /// JSON file with parser and executor depth limits
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Maximum nesting depth for both parsing and execution (0 = unlimited)
    #[arg(long, global = true)]
    max_depth: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a query and run it against the demo film catalog
    Check {
        /// The query (reads from stdin if omitted)
        query: Option<String>,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,

        /// Only validate syntax, don't execute
        #[arg(long)]
        syntax_only: bool,

        /// Seed for the demo catalog's generated names and years
        #[arg(long, default_value_t = 0)]
        seed: i64,

        /// Print failures as {"errors": [...]} on stdout
        #[arg(long)]
        legacy_errors: bool,
    },

    /// Print the interchange (list-shaped JSON) form of a query
    Parse {
        /// The query (reads from stdin if omitted)
        query: Option<String>,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,
    },

    /// List documentation categories
    Docs,

    /// Show documentation for a specific category
    Doc {
        /// Category name (use 'hypeql docs' to list categories)
        category: String,
    },
}

fn main() {
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&env_filter).unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check {
            query,
            pretty,
            syntax_only,
            seed,
            legacy_errors,
        } => run_check(
            cli.config.as_deref(),
            cli.max_depth,
            query,
            pretty,
            syntax_only,
            seed,
            legacy_errors,
        ),
        Commands::Parse { query, pretty } => {
            run_parse(cli.config.as_deref(), cli.max_depth, query, pretty)
        }
        Commands::Docs => {
            print!("{}", cli::get_docs_overview());
            Ok(())
        }
        Commands::Doc { category } => match cli::get_doc_category(&category) {
            Ok(content) => {
                print!("{}", content);
                Ok(())
            }
            Err(e) => Err(e),
        },
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn read_query(query: Option<String>) -> Result<String, CliError> {
    match query {
        Some(q) if q != "-" => Ok(q),
        _ if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
        _ => Err(CliError::NoQuery),
    }
}

fn run_check(
    config: Option<&Path>,
    max_depth: Option<u64>,
    query: Option<String>,
    pretty: bool,
    syntax_only: bool,
    seed: i64,
    legacy_errors: bool,
) -> Result<(), CliError> {
    let options = CheckOptions {
        query: read_query(query)?,
        seed,
        syntax_only,
        config: cli::load_config(config, max_depth)?,
    };

    let outcome = match cli::execute_check(&options) {
        Err(CliError::Parse(e)) if legacy_errors => exit_with_errors(&e),
        Err(CliError::Execution(e)) if legacy_errors => exit_with_errors(&e),
        outcome => outcome?,
    };

    match outcome {
        CheckResult::SyntaxValid => println!("Syntax is valid"),
        CheckResult::Success(value) => {
            let json = if pretty {
                output::to_json_pretty(&value)
            } else {
                output::to_json(&value)
            }?;
            println!("{}", json);
        }
    }
    Ok(())
}

fn exit_with_errors(error: &dyn Display) -> ! {
    println!("{}", output::errors_to_json(&[error]));
    std::process::exit(1);
}

fn run_parse(
    config: Option<&Path>,
    max_depth: Option<u64>,
    query: Option<String>,
    pretty: bool,
) -> Result<(), CliError> {
    let config = cli::load_config(config, max_depth)?;
    let encoded = cli::query_to_interchange(&read_query(query)?, config.parser)?;
    let json = if pretty {
        serde_json::to_string_pretty(&encoded)
    } else {
        serde_json::to_string(&encoded)
    }?;
    println!("{}", json);
    Ok(())
}
