//! # Cardsmith CLI
//!
//! Command-line front end for designing and printing ID cards.
//!
//! ## Usage
//!
//! ```bash
//! # Create a template with the stock layout
//! cardsmith new-template "Staff 2025" --company "Acme Corp"
//!
//! # List stored templates
//! cardsmith templates
//!
//! # Render both sides for an employee into PNG files
//! cardsmith render <TEMPLATE_ID> --employee "Jesus B. Illustrisimo" --out-dir out/
//!
//! # Render and append to saved_cards.json
//! cardsmith export <TEMPLATE_ID> --employee "Jesus B. Illustrisimo"
//! ```
//!
//! Logging follows `RUST_LOG` (default `info`).

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use cardsmith::{
    CardError, CardRenderer, EmployeeResource, Template,
    render::FontBook,
    resource::ImageResolver,
    store::{self, JsonFileStore, StoreConfig, TemplateStore},
};

/// Cardsmith - ID card layout and compositing
#[derive(Parser, Debug)]
#[command(name = "cardsmith")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory holding templates.json, records.json and images/
    #[arg(long, global = true, default_value = "data")]
    data_dir: PathBuf,

    /// Root for relative and /images/ references (defaults to the data dir)
    #[arg(long, global = true)]
    images_root: Option<PathBuf>,

    /// Use only the built-in bitmap font
    #[arg(long, global = true)]
    builtin_font: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a template with the default front/back layout and store it
    NewTemplate {
        name: String,

        /// Company name written onto the front
        #[arg(long, default_value = "")]
        company: String,
    },

    /// List stored templates
    Templates,

    /// Render a template's front and back to PNG files
    Render {
        /// Template id, or a path to a template JSON file
        template: String,

        /// Employee record to fill in (name, case-insensitive)
        #[arg(long)]
        employee: Option<String>,

        /// Output directory
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },

    /// Render a card for an employee and append it to the saved cards
    Export {
        /// Template id, or a path to a template JSON file
        template: String,

        /// Employee record to export (name, case-insensitive)
        #[arg(long)]
        employee: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CardError> {
    let Cli {
        data_dir,
        images_root,
        builtin_font,
        command,
    } = Cli::parse();
    let store = JsonFileStore::new(StoreConfig::new(&data_dir));
    let images_root = images_root.unwrap_or_else(|| data_dir.clone());

    match command {
        Commands::NewTemplate { name, company } => {
            let template = Template::new(&name, &company);
            store::save_template(&store, &template).await?;
            println!("{}", template.id);
        }

        Commands::Templates => {
            let templates = store.load_templates().await?;
            if templates.is_empty() {
                println!("No templates in {}", data_dir.display());
            }
            for t in templates {
                println!("{}  {:<24} {}", t.id, t.name, t.created_at.format("%Y-%m-%d"));
            }
        }

        Commands::Render {
            template,
            employee,
            out_dir,
        } => {
            let renderer = build_renderer(&images_root, builtin_font)?;
            let mut template = load_template(&store, &template).await?;
            let employee = match employee {
                Some(name) => Some(find_employee(&store, &name).await?),
                None => None,
            };
            if let Some(employee) = &employee {
                template.autofill(employee);
            }

            let (front, back) = renderer.render_template(&template, employee.as_ref()).await?;
            std::fs::create_dir_all(&out_dir)?;
            for (side, bitmap) in [("front", front), ("back", back)] {
                let path = out_dir.join(format!("{}-{}.png", file_stem(&template), side));
                bitmap
                    .save(&path)
                    .map_err(|e| CardError::Image(format!("Failed to save PNG: {}", e)))?;
                println!("Saved to {}", path.display());
            }
        }

        Commands::Export { template, employee } => {
            let renderer = build_renderer(&images_root, builtin_font)?;
            let mut template = load_template(&store, &template).await?;
            let employee = find_employee(&store, &employee).await?;
            template.autofill(&employee);

            let card = store::export_card(&renderer, &template, Some(&employee), &store).await?;
            println!("Exported card for {} at {}", card.employee_name, card.saved_at);
        }
    }

    Ok(())
}

fn build_renderer(images_root: &Path, builtin_font: bool) -> Result<CardRenderer, CardError> {
    let fonts = if builtin_font {
        FontBook::builtin()
    } else {
        FontBook::system()
    };
    Ok(CardRenderer::new(
        Arc::new(ImageResolver::new(images_root)?),
        Arc::new(fonts),
    ))
}

/// A stored template id, or failing that a template JSON file.
async fn load_template(store: &JsonFileStore, reference: &str) -> Result<Template, CardError> {
    if let Some(template) = store.find_template(reference).await? {
        return Ok(template);
    }
    let path = Path::new(reference);
    if path.is_file() {
        return Template::from_json(&std::fs::read_to_string(path)?);
    }
    Err(CardError::Validation(format!("No template '{}'", reference)))
}

async fn find_employee(store: &JsonFileStore, name: &str) -> Result<EmployeeResource, CardError> {
    store
        .find_employee(name)
        .await?
        .ok_or_else(|| CardError::Validation(format!("No employee record named '{}'", name)))
}

fn file_stem(template: &Template) -> String {
    let stem: String = template
        .name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
        .collect();
    let stem = stem.trim_matches('-');
    if stem.is_empty() {
        template.id.clone()
    } else {
        stem.to_string()
    }
}
