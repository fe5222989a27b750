use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use jsonsteps::config::{Config, EvaluationMode};
use jsonsteps::file::loader::{read_stdin, read_text_file};
use jsonsteps::steps::{JsonSteps, NodeTable};

/// JSONSteps - JSON response assertions
#[derive(Parser)]
#[command(name = "jsonsteps")]
#[command(version)]
#[command(about = "Runs one JSON assertion step against a response body", long_about = None)]
struct Cli {
    /// Response body to check (omit to read from stdin)
    #[arg(short, long, global = true)]
    body: Option<PathBuf>,

    /// Node expression strategy (overrides the config file)
    #[arg(short, long, global = true)]
    mode: Option<EvaluationMode>,

    /// Config file (default: ~/.config/jsonsteps/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    step: Step,
}

#[derive(Subcommand)]
enum Step {
    /// The response should be in JSON
    IsJson,
    /// The response should not be in JSON
    NotJson,
    /// The node should be equal to the given text
    Equal { node: String, value: String },
    /// Every listed node should be equal to its text
    EqualNodes {
        #[arg(long = "row", num_args = 2, value_names = ["NODE", "VALUE"], required = true)]
        rows: Vec<String>,
    },
    /// The node should contain the given text
    Contain { node: String, text: String },
    /// Every listed node should contain its text
    ContainNodes {
        #[arg(long = "row", num_args = 2, value_names = ["NODE", "TEXT"], required = true)]
        rows: Vec<String>,
    },
    /// The node should not contain the given text
    NotContain { node: String, text: String },
    /// No listed node should contain its text
    NotContainNodes {
        #[arg(long = "row", num_args = 2, value_names = ["NODE", "TEXT"], required = true)]
        rows: Vec<String>,
    },
    /// The node should have the given number of elements
    Count { node: String, count: String },
    /// The node should exist; prints its value
    Exists { node: String },
    /// The node should not exist
    NotExists { node: String },
    /// The JSON should be valid according to a schema
    Schema {
        /// Schema file, or schema text with --inline
        schema: String,
        /// Treat SCHEMA as the schema itself rather than a path
        #[arg(long)]
        inline: bool,
        /// Expect the JSON to be invalid instead
        #[arg(long)]
        invalid: bool,
    },
    /// The JSON should be equal to the expected document
    EqualJson {
        /// Expected JSON text, or a file with --file
        expected: String,
        #[arg(long)]
        file: bool,
    },
    /// Print the last JSON response
    Print,
}

fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();

    let (steps, body) = match prepare(&cli) {
        Ok(prepared) => prepared,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return ExitCode::from(2);
        }
    };

    match run(&steps, &body, &cli.step) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::from(1)
        }
    }
}

/// Loads the configuration and the body before any step runs, so a usage
/// problem is never reported as a failed assertion.
fn prepare(cli: &Cli) -> Result<(JsonSteps, String)> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load(),
    };
    if let Some(mode) = cli.mode {
        config.evaluation_mode = mode;
    }
    log::debug!("running in {} mode", config.evaluation_mode);

    let body = match &cli.body {
        Some(path) => read_text_file(path)?,
        None => read_stdin().context("Failed to load body")?,
    };

    Ok((JsonSteps::from_config(&config), body))
}

fn run(steps: &JsonSteps, body: &str, step: &Step) -> Result<()> {
    match step {
        Step::IsJson => steps.the_response_should_be_in_json(body)?,
        Step::NotJson => steps.the_response_should_not_be_in_json(body)?,
        Step::Equal { node, value } => steps.the_json_node_should_be_equal_to(body, node, value)?,
        Step::EqualNodes { rows } => steps.the_json_nodes_should_be_equal_to(body, &table(rows)?)?,
        Step::Contain { node, text } => steps.the_json_node_should_contain(body, node, text)?,
        Step::ContainNodes { rows } => steps.the_json_nodes_should_contain(body, &table(rows)?)?,
        Step::NotContain { node, text } => {
            steps.the_json_node_should_not_contain(body, node, text)?
        }
        Step::NotContainNodes { rows } => {
            steps.the_json_nodes_should_not_contain(body, &table(rows)?)?
        }
        Step::Count { node, count } => steps.the_json_node_should_have_elements(body, node, count)?,
        Step::Exists { node } => {
            let value = steps.the_json_node_should_exist(body, node)?;
            println!("{}", value);
        }
        Step::NotExists { node } => steps.the_json_node_should_not_exist(body, node)?,
        Step::Schema {
            schema,
            inline,
            invalid,
        } => match (*inline, *invalid) {
            (true, false) => steps.the_json_should_be_valid_according_to_this_schema(body, schema)?,
            (true, true) => {
                steps.the_json_should_be_invalid_according_to_this_schema(body, schema)?
            }
            (false, false) => steps.the_json_should_be_valid_according_to_the_schema(body, schema)?,
            (false, true) => {
                steps.the_json_should_be_invalid_according_to_the_schema(body, schema)?
            }
        },
        Step::EqualJson { expected, file } => {
            let expected = if *file {
                read_text_file(expected)?
            } else {
                expected.clone()
            };
            steps.the_json_should_be_equal_to(body, &expected)?
        }
        Step::Print => steps.print_last_json_response(body, &mut io::stdout().lock())?,
    }
    Ok(())
}

/// Pairs up `--row NODE VALUE` arguments. Later rows for the same node win.
fn table(rows: &[String]) -> Result<NodeTable> {
    if rows.len() % 2 != 0 {
        bail!("every --row needs a node and a value");
    }
    Ok(rows
        .chunks_exact(2)
        .map(|row| (row[0].clone(), row[1].clone()))
        .collect())
}
