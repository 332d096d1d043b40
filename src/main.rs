//! Command-line interface for xmlschema-infer

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};

#[cfg(feature = "cli")]
use std::fs;
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
use tracing_subscriber::EnvFilter;
#[cfg(feature = "cli")]
use xmlschema_infer::documents::ParserKind;
#[cfg(feature = "cli")]
use xmlschema_infer::inference::{RecordMap, SchemaGenerator, SchemaOptions};
#[cfg(feature = "cli")]
use xmlschema_infer::loaders::{Loader, Location};
#[cfg(feature = "cli")]
use xmlschema_infer::Limits;

#[cfg(feature = "cli")]
#[derive(Parser, Debug)]
#[command(name = "xmlschema-infer")]
#[command(author, version, about = "Infer an XML Schema from an XML document", long_about = None)]
struct Cli {
    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate an XSD schema from an XML document
    Infer {
        /// Path to the XML file ("-" reads standard input)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Parser: quick-xml or roxmltree
        #[arg(short, long, default_value = "quick-xml")]
        parser: String,

        /// Namespace URI bound to targetNamespace and the tns prefix
        #[arg(long)]
        target_namespace: Option<String>,

        /// Spaces per indentation level
        #[arg(long, default_value_t = 2)]
        indent: usize,

        /// Use strict input limits
        #[arg(long)]
        strict: bool,
    },

    /// Show the structure recorded for each element tag
    Analyze {
        /// Path to the XML file ("-" reads standard input)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Parser: quick-xml or roxmltree
        #[arg(short, long, default_value = "quick-xml")]
        parser: String,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },
}

#[cfg(feature = "cli")]
fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Infer {
            file,
            output,
            parser,
            target_namespace,
            indent,
            strict,
        } => cmd_infer(file, output, parser, target_namespace, indent, strict),
        Commands::Analyze { file, parser, json } => cmd_analyze(file, parser, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(feature = "cli")]
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(feature = "cli")]
fn build_generator(
    parser: &str,
    limits: Limits,
) -> Result<SchemaGenerator, Box<dyn std::error::Error>> {
    let kind: ParserKind = parser.parse()?;
    Ok(SchemaGenerator::new().with_limits(limits).with_parser_kind(kind))
}

#[cfg(feature = "cli")]
fn cmd_infer(
    file: PathBuf,
    output: Option<PathBuf>,
    parser: String,
    target_namespace: Option<String>,
    indent: usize,
    strict: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let limits = if strict { Limits::strict() } else { Limits::default() };

    let mut options = SchemaOptions::new().with_indent(indent);
    if let Some(namespace) = target_namespace {
        options = options.with_target_namespace(namespace);
    }

    let generator = build_generator(&parser, limits)?.with_options(options);
    let schema = generator.generate_from(&Location::from_arg(&file))?;

    if let Some(output_path) = output {
        fs::write(output_path, &schema)?;
    } else {
        print!("{}", schema);
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn cmd_analyze(
    file: PathBuf,
    parser: String,
    json_output: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let limits = Limits::default();
    let xml = Loader::new()
        .with_limits(limits.clone())
        .load(&Location::from_arg(&file))?;
    let records = build_generator(&parser, limits)?.analyze(&xml)?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else {
        print_records(&records);
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn print_records(records: &RecordMap) {
    println!("xmlschema-infer v{}", xmlschema_infer::VERSION);
    println!();
    println!("Element tags: {}", records.len());

    for (tag, record) in records {
        println!();
        println!("{}", tag);
        println!("  Text: {}", record.has_text);

        let attributes: Vec<&str> = record.attribute_names.iter().map(String::as_str).collect();
        if !attributes.is_empty() {
            println!("  Attributes: {}", attributes.join(", "));
        }

        let children: Vec<&str> = record.ordered_children().collect();
        if !children.is_empty() {
            println!("  Children: {}", children.join(", "));
        }
    }
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Rebuild with --features cli");
    std::process::exit(1);
}
