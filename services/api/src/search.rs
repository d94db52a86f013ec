use crate::infra::lead_service;
use chrono::Local;
use clap::Args;
use leadgen::config::AppConfig;
use leadgen::error::AppError;
use leadgen::leads::{
    export_leads, ExportContext, ExportFormat, ExportSelection, Industry, LeadSearchRequest,
    ScoredLead,
};
use leadgen::telemetry;
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug)]
pub(crate) struct SearchArgs {
    /// City, region, or postal code to search around
    #[arg(long)]
    pub(crate) location: String,
    /// Industry key to search (repeatable). Omit to search every industry
    #[arg(long = "industry", value_parser = parse_industry)]
    pub(crate) industries: Vec<String>,
    /// Skip the industry catalog and run only the custom query
    #[arg(long, conflicts_with = "industries", requires = "custom")]
    pub(crate) custom_only: bool,
    /// Free-text phrase searched in addition to the industry templates
    #[arg(long)]
    pub(crate) custom: Option<String>,
    /// Write the ranked leads to a file in this format (csv, pdf, xlsx)
    #[arg(long, value_parser = parse_format)]
    pub(crate) export: Option<ExportFormat>,
    /// Export destination (defaults to leads.<format> in the working directory)
    #[arg(long, requires = "export")]
    pub(crate) output: Option<PathBuf>,
}

impl SearchArgs {
    fn request(&self) -> LeadSearchRequest {
        let industries = if self.custom_only {
            Some(Vec::new())
        } else if self.industries.is_empty() {
            None
        } else {
            Some(self.industries.clone())
        };

        LeadSearchRequest {
            location: self.location.clone(),
            industries,
            custom_query: self.custom.clone(),
        }
    }

    fn industry_label(&self) -> String {
        if self.custom_only {
            "custom".to_string()
        } else if self.industries.is_empty() {
            "all".to_string()
        } else {
            self.industries.join(", ")
        }
    }
}

pub(crate) async fn run_search(args: SearchArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init_for_cli(&config.telemetry)?;

    let service = lead_service(&config.places)?;
    let leads = service.search(args.request()).await?;

    print!("{}", render_leads(&args.location, &leads));

    let Some(format) = args.export else {
        return Ok(());
    };
    if leads.is_empty() {
        println!("\nNothing to export.");
        return Ok(());
    }

    let context = ExportContext {
        location: Some(args.location.clone()),
        industry: Some(args.industry_label()),
        generated_on: Local::now().date_naive(),
    };
    let file = export_leads(&leads, &ExportSelection::all(), format, &context)?;
    let path = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(file.file_name));
    std::fs::write(&path, &file.bytes)?;

    info!(path = %path.display(), bytes = file.bytes.len(), "export written");
    println!("\nExported {} leads to {}", leads.len(), path.display());
    Ok(())
}

fn parse_industry(raw: &str) -> Result<String, String> {
    match Industry::from_key(raw) {
        Some(industry) => Ok(industry.key().to_string()),
        None => {
            let known: Vec<&str> = Industry::ALL.iter().map(Industry::key).collect();
            Err(format!(
                "unknown industry '{raw}' (expected one of: {})",
                known.join(", ")
            ))
        }
    }
}

fn parse_format(raw: &str) -> Result<ExportFormat, String> {
    ExportFormat::parse(raw).ok_or_else(|| format!("unknown export format '{raw}'"))
}

fn render_leads(location: &str, leads: &[ScoredLead]) -> String {
    let mut out = format!("Leads near {location}: {} found\n", leads.len());
    if leads.is_empty() {
        return out;
    }

    out.push_str(&format!(
        "{:>3}  {:<5} {:<4} {:<32} {:<18} {:<9} Website\n",
        "#", "Score", "", "Name", "Phone", "Rating"
    ));
    for (index, lead) in leads.iter().enumerate() {
        let rating = match (lead.rating, lead.user_ratings_total) {
            (Some(rating), Some(count)) => format!("{rating:.1} ({count})"),
            (Some(rating), None) => format!("{rating:.1}"),
            _ => "-".to_string(),
        };
        out.push_str(&format!(
            "{:>3}  {:<5} {:<4} {:<32} {:<18} {:<9} {}\n",
            index + 1,
            lead.lead_score,
            lead.lead_label.label(),
            truncate(&lead.name, 32),
            or_dash(&lead.phone),
            rating,
            or_dash(&lead.website),
        ));
    }
    out
}

fn or_dash(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    let mut shortened: String = value.chars().take(width.saturating_sub(3)).collect();
    shortened.push_str("...");
    shortened
}
