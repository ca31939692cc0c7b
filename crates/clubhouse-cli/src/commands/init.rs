//! Init command implementation.

use crate::cli::InitArgs;
use crate::config::Settings;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use std::path::Path;

/// Write the default settings to `path`.
pub fn execute_init(args: InitArgs, path: &Path, formatter: &Formatter) -> Result<()> {
    if path.exists() && !args.force {
        return Err(CliError::InvalidInput(format!(
            "{} already exists; pass --force to overwrite",
            path.display()
        )));
    }

    Settings::default().save(path)?;
    println!("{}", formatter.success(&format!("Wrote {}", path.display())));
    println!(
        "{}",
        formatter.info("Set PINECONE_API_KEY, PINECONE_HOST and GROQ_API_KEY before ingesting")
    );
    Ok(())
}
