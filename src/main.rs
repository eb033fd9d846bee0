#![forbid(unsafe_code)]

use anyhow::{Context, Result, anyhow, bail};
use clap::{Args, Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use tracing::{Level as TraceLevel, info, warn};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, reload};

use design_props::config::Settings;
use design_props::constants::env as env_vars;
use design_props::persistence;
use design_props::validation::{self, DESIGN_PROPERTY_RULE};
use design_props::{DesignProperty, DocumentTemplate, DocumentType, PropertiesStore, PropertyId};

/// Edit a design-properties document from the command line
#[derive(Parser, Debug)]
#[command(name = "design-props")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print elements and their properties in order
    Show,

    /// Print or write the export document
    Export {
        /// Write to this file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Replace the working document with a JSON file
    Import { file: PathBuf },

    /// Start over from an empty Web or Native document
    New(NewArgs),

    /// Append an empty element
    AddElement { name: String },

    /// Rename an element (an existing target is overwritten)
    RenameElement { old: String, new: String },

    DeleteElement { name: String },

    /// Add a toggle property to an element
    AddToggle {
        element: String,
        name: String,
        description: String,
        #[arg(short, long, default_value = "")]
        class: String,
    },

    /// Add a dropdown property to an element
    AddDropdown {
        element: String,
        name: String,
        description: String,
        /// Option as NAME=CLASS, repeatable
        #[arg(short, long = "option")]
        options: Vec<String>,
    },

    DeleteProperty { id: String },

    /// Move the element rendered at FROM to TO
    MoveElement { from: usize, to: usize },

    /// Move a property within one element
    MoveProperty { element: String, from: usize, to: usize },

    /// List every class with its element and property
    Classes,

    /// Switch the document between Web and Native
    SetType(NewArgs),

    /// Check a name against the element/property naming rule
    ValidateName { name: String },

    /// Toggle the dark theme preference
    DarkMode,
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct NewArgs {
    #[arg(long)]
    web: bool,
    #[arg(long)]
    native: bool,
}

impl NewArgs {
    fn document_type(&self) -> DocumentType {
        if self.web { DocumentType::Web } else { DocumentType::Native }
    }
}

fn parse_log_level(level: &str) -> TraceLevel {
    match level.to_lowercase().as_str() {
        "trace" => TraceLevel::TRACE,
        "debug" => TraceLevel::DEBUG,
        "warn" => TraceLevel::WARN,
        "error" => TraceLevel::ERROR,
        _ => TraceLevel::INFO,
    }
}

fn parse_option(raw: &str) -> Result<(String, String)> {
    let (name, class) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("option '{raw}' must be written as NAME=CLASS"))?;
    Ok((name.trim().to_string(), class.trim().to_string()))
}

fn check_name(name: &str) -> Result<()> {
    DESIGN_PROPERTY_RULE.check(name).map_err(|msg| anyhow!("'{name}': {msg}"))
}

fn check_class(store: &PropertiesStore, class: &str) -> Result<()> {
    validation::check_class_name(store, class).map_err(|msg| anyhow!("'{class}': {msg}"))
}

fn require_element(store: &PropertiesStore, element: &str) -> Result<()> {
    if store.properties_of(element).is_none() {
        bail!("element '{element}' does not exist");
    }
    Ok(())
}

fn show(store: &PropertiesStore) {
    match store.document_type() {
        Some(document_type) => println!("Document type: {document_type}"),
        None => println!("Document type: (unset)"),
    }
    for element in store.element_list() {
        println!("{} (position {})", element.name, element.position);
        for prop in element.properties {
            let ignored = if prop.is_ignored() { " [ignored]" } else { "" };
            println!("  {} {} - {}{}  id={}", prop.property_type(), prop.name, prop.description, ignored, prop.id());
            if let Some(class) = prop.class_name() {
                println!("      class: {class}");
            }
            for opt in prop.options() {
                println!("      option: {} => {}", opt.name, opt.class_name);
            }
        }
    }
}

fn run(command: Command, store: &mut PropertiesStore, settings: &mut Settings) -> Result<()> {
    match command {
        Command::Show => show(store),
        Command::Export { out } => {
            let text = store
                .export_string(settings.pretty_indent)
                .context("Failed to serialize export document")?;
            match out {
                Some(path) => {
                    fs::write(&path, text).with_context(|| format!("Failed to write {}", path.display()))?;
                    info!(path = %path.display(), "Exported design properties");
                }
                None => println!("{text}"),
            }
        }
        Command::Import { file } => {
            let contents =
                fs::read_to_string(&file).with_context(|| format!("Failed to read {}", file.display()))?;
            let report = store
                .populate_from_json(&contents)
                .with_context(|| format!("Failed to import {}", file.display()))?;
            for warning in &report.warnings {
                warn!("{warning}");
            }
            println!(
                "Imported {} element(s), {} propert(ies), {} skipped record(s)",
                report.element_count,
                report.property_count,
                report.warnings.len()
            );
        }
        Command::New(args) => {
            let template = match args.document_type() {
                DocumentType::Web => DocumentTemplate::EmptyWeb,
                DocumentType::Native => DocumentTemplate::EmptyNative,
            };
            store.populate_from_json(&template.to_json())?;
            println!(
                "Started empty {} document ({})",
                args.document_type(),
                DocumentType::export_file_name(store.document_type())
            );
        }
        Command::AddElement { name } => {
            check_name(&name)?;
            if !validation::is_unique_element_name(store, &name) {
                bail!("element '{name}' already exists");
            }
            store.add_element(&name);
        }
        Command::RenameElement { old, new } => {
            check_name(&new)?;
            require_element(store, &old)?;
            if old != new && !validation::is_unique_element_name(store, &new) {
                warn!(element = %new, "Rename target exists and will be overwritten");
            }
            store.rename_element(&old, &new);
        }
        Command::DeleteElement { name } => {
            if !store.delete_element(&name) {
                bail!("element '{name}' does not exist");
            }
        }
        Command::AddToggle { element, name, description, class } => {
            require_element(store, &element)?;
            if !validation::is_unique_property_name(store, &element, &name) {
                bail!("property '{name}' already exists in '{element}'");
            }
            if !class.is_empty() {
                check_class(store, &class)?;
            }
            let prop = DesignProperty::toggle(name, description, class);
            println!("{}", prop.id());
            store.add_property_to_element(&element, prop);
        }
        Command::AddDropdown { element, name, description, options } => {
            require_element(store, &element)?;
            if !validation::is_unique_property_name(store, &element, &name) {
                bail!("property '{name}' already exists in '{element}'");
            }
            let options = options.iter().map(|raw| parse_option(raw)).collect::<Result<Vec<_>>>()?;
            for (_, class) in &options {
                check_class(store, class)?;
            }
            let prop = DesignProperty::dropdown(name, description, options);
            println!("{}", prop.id());
            store.add_property_to_element(&element, prop);
        }
        Command::DeleteProperty { id } => {
            let id: PropertyId = id.parse().with_context(|| format!("'{id}' is not a property id"))?;
            if !store.delete_property(id) {
                bail!("no property with id {id}");
            }
        }
        Command::MoveElement { from, to } => {
            if !store.reorder_elements(from, to) {
                warn!(from, to, "Move ignored, no element at that index");
            }
        }
        Command::MoveProperty { element, from, to } => {
            require_element(store, &element)?;
            if !store.move_within_element(&element, from, to) {
                warn!(element = %element, from, to, "Move ignored, index out of range");
            }
        }
        Command::Classes => {
            for row in store.class_rows() {
                println!("{}\t{}\t{}", row.class_name, row.property, row.element);
            }
        }
        Command::SetType(args) => {
            store.set_document_type(args.document_type());
        }
        Command::ValidateName { name } => match DESIGN_PROPERTY_RULE.check(&name) {
            Ok(()) => println!("'{name}' is valid"),
            Err(msg) => println!("'{name}' is invalid: {msg}"),
        },
        Command::DarkMode => {
            let dark_mode = settings.toggle_dark_mode();
            settings.save()?;
            println!("Dark mode {}", if dark_mode { "on" } else { "off" });
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Settings loading logs too, so start from the env level and settle once it is read
    let env_level = std::env::var(env_vars::LOG_LEVEL).unwrap_or_default();
    let (filter, log_filter) = reload::Layer::new(LevelFilter::from_level(parse_log_level(&env_level)));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init()?;

    let mut settings = Settings::load()?;
    log_filter.reload(LevelFilter::from_level(parse_log_level(&settings.log_level)))?;

    let sink = settings.storage_sink();
    info!(path = %sink.path().display(), "Using document storage");

    let mut store = PropertiesStore::new();
    persistence::attach(&mut store, sink)
        .context("Failed to read persisted design properties, leaving them untouched")?;

    run(cli.command, &mut store, &mut settings)
}
