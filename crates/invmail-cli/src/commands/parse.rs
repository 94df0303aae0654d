//! Parse command - extract fields from instruction text.

use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use invmail_core::InstructionParser;

use super::read_input;

/// Arguments for the parse command.
#[derive(Args)]
pub struct ParseArgs {
    /// Instruction file, or `-` for stdin
    #[arg(required = true)]
    input: PathBuf,

    /// List lines that were not recognized (on stderr)
    #[arg(long)]
    show_ignored: bool,
}

pub fn run(args: ParseArgs) -> anyhow::Result<()> {
    let text = read_input(&args.input)?;
    let result = InstructionParser::new().parse(&text);

    info!(
        "Extracted {} item(s), ignored {} line(s)",
        result.record.items.len(),
        result.ignored.len()
    );

    println!("{}", serde_json::to_string_pretty(&result.record)?);

    if args.show_ignored && !result.ignored.is_empty() {
        eprintln!("{}", style("Ignored lines:").yellow());
        for line in &result.ignored {
            eprintln!("  {:>3}: {} ({})", line.line_number, line.text, line.reason);
        }
    }

    Ok(())
}
