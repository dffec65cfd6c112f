// ============================================================
// CLI
// ============================================================
// Thin orchestration surface: decode a file, normalize, print

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::application::use_cases::lead_importer::LeadImporter;
use crate::domain::error::Result;
use crate::domain::lead::{Lead, MessageTemplate};
use crate::infrastructure::parsers;
use crate::shared::formatters::{display_phone, instagram_link, whatsapp_link};

#[derive(Debug, Parser)]
#[command(
    name = "leadbridge",
    version,
    about = "Normalize messy lead exports into contactable lead records"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Import a lead export and print the normalized records
    Import {
        /// Path to a .xlsx, .xls, .csv or .json export
        file: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Message template for wa.me links; {nome} becomes the lead name
        #[arg(long)]
        template: Option<String>,

        /// Print wa.me and instagram links under each lead
        #[arg(long)]
        links: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Import {
            file,
            format,
            template,
            links,
        } => import(file, format, template, links).await,
    }
}

async fn import(
    file: PathBuf,
    format: OutputFormat,
    template: Option<String>,
    links: bool,
) -> Result<()> {
    let rows = parsers::decode_file(&file).await?;

    let mut importer = LeadImporter::default();
    importer.import_rows(&rows);

    let template = template.map(MessageTemplate::new).unwrap_or_default();
    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "leads": importer.leads(),
                "stats": importer.stats(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Table => {
            print_table(importer.leads(), &template, links);
            let stats = importer.stats();
            println!(
                "\n{} leads, {} with phone, {} missing phone",
                stats.total, stats.valid_phones, stats.missing_phones
            );
        }
    }

    Ok(())
}

fn print_table(leads: &[Lead], template: &MessageTemplate, links: bool) {
    println!(
        "{:<32} {:<22} {:<24} {:<10}",
        "NAME", "PHONE", "USERNAME", "STATUS"
    );
    for lead in leads {
        println!(
            "{:<32} {:<22} {:<24} {:<10}",
            truncate(&lead.name, 30),
            display_phone(lead.phone.as_deref()),
            truncate(&lead.username, 22),
            lead.status
        );

        if links {
            if let Some(phone) = &lead.phone {
                println!("    whatsapp:  {}", whatsapp_link(phone, &template.text, &lead.name));
            }
            let profile = instagram_link(&lead.username);
            if !profile.is_empty() {
                println!("    instagram: {}", profile);
            }
        }
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max_chars.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}
