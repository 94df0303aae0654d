//! Render command - produce an invoice from instructions or JSON.

use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::Args;
use console::style;
use tracing::{debug, info};

use invmail_core::models::InvoiceDisplayModel;
use invmail_core::{InstructionParser, InvoiceInput, InvoiceNormalizer, InvoiceRenderer};
use invmail_delivery::{ChromiumRenderer, DocumentRenderer};

use super::{load_config, read_input};

/// Arguments for the render command.
#[derive(Args)]
pub struct RenderArgs {
    /// Input file, or `-` for stdin
    #[arg(required = true)]
    input: PathBuf,

    /// How to read the input
    #[arg(long, value_enum, default_value = "text")]
    input_format: InputFormat,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "html")]
    format: OutputFormat,

    /// Chromium executable for PDF output (overrides config)
    #[arg(long)]
    chromium: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum InputFormat {
    /// Line-oriented instruction text
    Text,
    /// Invoice JSON
    Json,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// Normalized invoice as JSON
    Json,
    /// Standalone HTML page
    Html,
    /// PDF document via headless Chromium
    Pdf,
    /// Plain text summary
    Text,
}

pub async fn run(args: RenderArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let mut config = load_config(config_path)?;
    if let Some(chromium) = &args.chromium {
        config.pdf.chromium_path = chromium.clone();
    }

    let raw = read_input(&args.input)?;
    let input = match args.input_format {
        InputFormat::Text => {
            let result = InstructionParser::new().parse(&raw);
            for line in &result.ignored {
                debug!("Ignored line {}: {} ({})", line.line_number, line.text, line.reason);
            }
            InvoiceInput::from(result.record)
        }
        InputFormat::Json => InvoiceInput::from_json(&raw).context("Invalid invoice JSON")?,
    };

    let normalizer = InvoiceNormalizer::new().with_defaults(config.invoice.clone());
    let model = normalizer.normalize(&input)?;
    info!("Normalized invoice {} with total {}", model.invoice_number, model.total);

    let output: Vec<u8> = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&model)?.into_bytes(),
        OutputFormat::Html => InvoiceRenderer::new()?.render_html(&model)?.into_bytes(),
        OutputFormat::Text => format_summary(&model).into_bytes(),
        OutputFormat::Pdf => {
            let html = InvoiceRenderer::new()?.render_html(&model)?;
            ChromiumRenderer::from_config(&config.pdf)
                .render_pdf(&html)
                .await
                .context("PDF rendering failed")?
        }
    };

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(&output)?;
        if !output.ends_with(b"\n") && !matches!(args.format, OutputFormat::Pdf) {
            stdout.write_all(b"\n")?;
        }
    }

    debug!("Total processing time: {:?}", start.elapsed());
    Ok(())
}

fn format_summary(model: &InvoiceDisplayModel) -> String {
    let mut out = String::new();
    out.push_str(&format!("Invoice {}\n", model.invoice_number));
    out.push_str(&format!("From:     {} <{}>\n", model.company_name, model.company_email));
    out.push_str(&format!("Bill to:  {} <{}>\n", model.client_name, model.client_email));
    out.push_str(&format!("Issued:   {}\n", model.issue_date));
    out.push_str(&format!("Due:      {}\n", model.due_date));
    out.push('\n');

    for item in &model.items {
        out.push_str(&format!(
            "  {:<30} {:>8} x {:>12} = {:>12}\n",
            item.description, item.quantity, item.unit_price, item.line_total
        ));
    }

    out.push('\n');
    out.push_str(&format!("Subtotal: {}\n", model.subtotal));
    out.push_str(&format!("Tax:      {}\n", model.tax));
    out.push_str(&format!("Total:    {}\n", model.total));
    if !model.notes.is_empty() {
        out.push_str(&format!("\n{}\n", model.notes));
    }
    out
}
