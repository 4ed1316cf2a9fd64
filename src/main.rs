use clap::{Parser, Subcommand};
use mermaid_links::manifest;
use mermaid_links::schema::Catalog;
use mermaid_links::sql::{parse_catalog, Dialect};
use mermaid_links::{render_field_view, render_rows, ContainerStyle, LinkView, ViewConfiguration};
use serde_json::Value;
use std::collections::BTreeMap;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser)]
#[command(name = "mermaid-links")]
#[command(about = "Render link tables as Mermaid flowcharts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct SchemaArgs {
    /// SQL DDL describing the links and nodes tables
    #[arg(long)]
    schema: Option<PathBuf>,
    /// Name of the links table in the schema
    #[arg(long, requires = "schema")]
    links_table: Option<String>,
    /// SQL dialect: auto, generic, postgres, mysql
    #[arg(long, default_value = "auto", value_parser = parse_dialect)]
    dialect: Dialect,
    /// Filter as field=value; repeatable
    #[arg(long = "state", value_parser = parse_state_pair)]
    state: Vec<(String, String)>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render rows to an HTML fragment
    Render {
        /// View configuration (.toml or .json)
        #[arg(short, long)]
        config: PathBuf,
        #[command(flatten)]
        schema: SchemaArgs,
        /// Pre-joined rows (JSON array with sid/src/did/dst; with --schema the label is lbl)
        #[arg(long, conflicts_with_all = ["links", "nodes"])]
        rows: Option<PathBuf>,
        /// Links table rows (JSON array)
        #[arg(long, requires = "nodes")]
        links: Option<PathBuf>,
        /// Nodes table rows (JSON array)
        #[arg(long, requires = "links")]
        nodes: Option<PathBuf>,
        /// Table name for the empty-result message when no schema is given
        #[arg(long)]
        table: Option<String>,
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the SQL that fetches the joined rows
    Query {
        #[arg(short, long)]
        config: PathBuf,
        #[command(flatten)]
        schema: SchemaArgs,
    },
    /// Wrap a stored Mermaid diagram for display
    FieldView {
        input: PathBuf,
        #[arg(long)]
        parent_style: Option<String>,
        #[arg(long)]
        mermaid_style: Option<String>,
    },
    /// Print the script tags a host page needs
    Headers,
}

fn parse_dialect(s: &str) -> Result<Dialect, String> {
    Dialect::from_str(s).ok_or_else(|| format!("unknown dialect: {}", s))
}

fn parse_state_pair(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.to_string()))
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| format!("expected field=value, got {:?}", s))
}

fn read_rows(path: &Path) -> Result<Vec<Value>, Box<dyn Error>> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    Ok(serde_json::from_str(&content)?)
}

impl SchemaArgs {
    fn state(&self) -> BTreeMap<String, String> {
        self.state.iter().cloned().collect()
    }

    /// Load the schema and build the validated view, if a schema was given.
    fn view(&self, config: &ViewConfiguration) -> Result<Option<LinkView>, Box<dyn Error>> {
        let Some(path) = &self.schema else {
            return Ok(None);
        };
        let ddl = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        let catalog: Catalog = parse_catalog(&ddl, self.dialect)?;
        let links_name = self
            .links_table
            .as_deref()
            .ok_or("--links-table is required with --schema")?;
        let links = catalog
            .table(links_name)
            .ok_or_else(|| format!("Table {} not found in schema", links_name))?;
        Ok(Some(LinkView::new(config, links, &catalog)?))
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    match cli.command {
        Commands::Render {
            config,
            schema,
            rows,
            links,
            nodes,
            table,
            output,
        } => {
            let config = ViewConfiguration::from_file(&config)?;
            let html = match (schema.view(&config)?, rows, links.zip(nodes)) {
                (Some(view), Some(rows), _) => view.run_joined(&read_rows(&rows)?)?,
                (Some(view), None, Some((links, nodes))) => {
                    view.run(&read_rows(&links)?, &read_rows(&nodes)?, &schema.state())?
                }
                (None, Some(rows), _) => {
                    let render = config.render_config(table.as_deref())?;
                    render_rows(&read_rows(&rows)?, &render)?
                }
                (None, None, Some(_)) => return Err("--links/--nodes need --schema".into()),
                (_, None, None) => return Err("either --rows or --links/--nodes is required".into()),
            };
            match output {
                Some(path) => fs::write(&path, &html)
                    .map_err(|e| format!("Failed to write {}: {}", path.display(), e))?,
                None => println!("{}", html),
            }
        }
        Commands::Query { config, schema } => {
            let config = ViewConfiguration::from_file(&config)?;
            let view = schema.view(&config)?.ok_or("query needs --schema")?;
            let query = view.query(&schema.state(), schema.dialect)?;
            println!("{};", query.text);
            println!("-- params: {}", serde_json::to_string(&query.params)?);
        }
        Commands::FieldView {
            input,
            parent_style,
            mermaid_style,
        } => {
            let value = fs::read_to_string(&input)
                .map_err(|e| format!("Failed to read {}: {}", input.display(), e))?;
            let style = ContainerStyle {
                parent_style,
                mermaid_style,
            };
            println!("{}", render_field_view(&value, &style));
        }
        Commands::Headers => {
            for header in manifest::default_headers() {
                println!("{}", header.to_html());
            }
        }
    }
    Ok(())
}

fn main() {
    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
