use clap::Args;
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use tracing::info;

use mudda_core::report::RenderContext;

use crate::settings::AppConfig;

/// Arguments for laying out a case report
#[derive(Args)]
pub struct ReportArgs {
    /// Case number, in either numeral system
    pub case_number: String,

    /// Write the report here: PDF for a `.pdf` path, layout JSON otherwise
    #[arg(long)]
    pub out: Option<String>,
}

pub fn run_report(args: ReportArgs, config: &AppConfig) -> Result<Value, Box<dyn std::error::Error>> {
    let book = super::open_store(config).load()?;
    let key = super::case::resolve_key(&book, &args.case_number)?;
    let record = book.case(&key)?;

    let report = &config.report;
    let context = if report.check_fonts {
        RenderContext::new(report.fonts.clone(), report.header.clone(), report.layout.clone())?
    } else {
        RenderContext::unchecked(report.fonts.clone(), report.header.clone(), report.layout.clone())
    };
    let document = context.render_case(record, book.petitioner_of(record));

    let Some(path) = args.out else {
        return Ok(serde_json::to_value(&document)?);
    };

    let is_pdf = Path::new(&path)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
    let bytes = if is_pdf {
        context.to_pdf(&document)?
    } else {
        serde_json::to_vec_pretty(&document)?
    };
    fs::write(&path, &bytes).map_err(|e| format!("Failed to write '{}': {}", path, e))?;
    info!(path = %path, pages = document.pages.len(), pdf = is_pdf, "wrote report");

    Ok(json!({
        "result": {
            "title": document.title,
            "file_name": document.file_name,
            "format": if is_pdf { "pdf" } else { "json" },
            "pages": document.pages.len(),
            "bytes": bytes.len(),
            "written_to": path,
        }
    }))
}
