use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use wsdl_sampler::*;

#[derive(Parser)]
#[command(name = "wsdl-sampler")]
#[command(about = "Generate sample requests and Postman collections from WSDL/XSD files")]
#[command(version)]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a WSDL into a Postman v2.0.0 collection
    Convert {
        /// Path to the WSDL file
        #[arg(short, long)]
        input: PathBuf,
        /// Output collection file
        #[arg(short, long)]
        output: PathBuf,
        /// JSON config file
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Fail on unresolved references and duplicate definitions
        #[arg(long)]
        strict: bool,
        /// Fail on recursive types instead of truncating them
        #[arg(long)]
        fail_on_cycle: bool,
        /// Wrap request bodies in a SOAP envelope
        #[arg(long, value_enum)]
        envelope: Option<Envelope>,
    },
    /// Print the rendered sample of every (or one) element
    Samples {
        /// Path to the WSDL or XSD file
        #[arg(short, long)]
        input: PathBuf,
        /// Only this element
        #[arg(short, long)]
        element: Option<String>,
        /// JSON config file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Show what a WSDL or XSD declares
    Inspect {
        /// Path to the WSDL or XSD file
        #[arg(short, long)]
        input: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Envelope {
    Soap11,
    Soap12,
}

impl From<Envelope> for SoapVersion {
    fn from(envelope: Envelope) -> Self {
        match envelope {
            Envelope::Soap11 => SoapVersion::Soap11,
            Envelope::Soap12 => SoapVersion::Soap12,
        }
    }
}

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Convert {
            input,
            output,
            config,
            strict,
            fail_on_cycle,
            envelope,
        } => {
            let mut config = load_config(config.as_deref())?;
            if strict {
                config = config
                    .with_strict_references(true)
                    .with_collision_policy(CollisionPolicy::Reject);
            }
            if fail_on_cycle {
                config = config.with_cycle_policy(CyclePolicy::Fail);
            }
            if let Some(envelope) = envelope {
                config.render.soap_envelope = Some(envelope.into());
            }
            convert(&input, &output, config).await?;
        }
        Commands::Samples {
            input,
            element,
            config,
        } => {
            let config = load_config(config.as_deref())?;
            print_samples(&input, element.as_deref(), config).await?;
        }
        Commands::Inspect { input } => {
            inspect(&input).await?;
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<SamplerConfig> {
    match path {
        Some(path) => SamplerConfig::from_file(path),
        None => Ok(SamplerConfig::default()),
    }
}

async fn convert(input: &Path, output: &Path, config: SamplerConfig) -> Result<()> {
    println!("Converting {}", input.display());

    let conversion = WsdlConverter::with_config(config).convert_file(input).await?;
    tokio::fs::write(output, conversion.collection.to_json_pretty()?).await?;

    println!(
        "Wrote {} requests to {}",
        conversion.collection.request_count(),
        output.display()
    );
    for warning in &conversion.samples.stats.warnings {
        println!("  warning: {warning}");
    }
    Ok(())
}

async fn print_samples(input: &Path, element: Option<&str>, config: SamplerConfig) -> Result<()> {
    let xml = tokio::fs::read_to_string(input).await?;
    let location = input.to_string_lossy();
    let renderer = XmlRenderer::with_options(config.render.clone());
    let (_, samples) = WsdlConverter::with_config(config)
        .samples(&xml, Some(&*location))
        .await?;

    for (name, node) in &samples.samples {
        if element.is_some_and(|wanted| wanted != name.as_str()) {
            continue;
        }
        println!("{}\n", renderer.render(name, node)?);
    }

    if let Some(wanted) = element {
        if samples.get(wanted).is_none() {
            eprintln!("No top-level element named `{wanted}`");
        }
    }
    Ok(())
}

async fn inspect(input: &Path) -> Result<()> {
    let xml = tokio::fs::read_to_string(input).await?;
    let location = input.to_string_lossy();
    let definitions = WsdlDefinitions::parse(&xml, Some(&*location))?;

    println!("Document: {}", input.display());
    if let Some(service) = &definitions.service_name {
        println!("Service: {service}");
    }
    if let Some(address) = &definitions.address {
        println!("Address: {address}");
    }
    if let Some(namespace) = &definitions.target_namespace {
        match definitions.prefix_for(namespace) {
            Some(prefix) => println!("Target namespace: {namespace} ({prefix})"),
            None => println!("Target namespace: {namespace}"),
        }
    }
    for (prefix, uri) in &definitions.namespaces {
        println!("  xmlns:{prefix} = {uri}");
    }

    for (index, schema) in definitions.schemas.iter().enumerate() {
        println!(
            "Schema {}: {} elements, {} complex types, {} simple types, {} imports",
            index + 1,
            schema.elements.len(),
            schema.complex_types.len(),
            schema.simple_types.len(),
            schema.imports.len()
        );
        for location in schema.import_locations() {
            println!("  import {location}");
        }
    }

    println!(
        "Bindings: {}, operations: {}",
        definitions.bindings.len(),
        definitions.operation_count()
    );
    for binding in &definitions.bindings {
        println!("Binding {} ({})", binding.name, binding.verb);
        for operation in &binding.operations {
            match &operation.soap_action {
                Some(action) => println!("  {} [{}]", operation.name, action),
                None => println!("  {}", operation.name),
            }
        }
    }
    Ok(())
}
