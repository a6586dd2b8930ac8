//! List command - show what can be rendered.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use docgen_core::{HtmlBackend, Pipeline};
use docgen_data::NumericMode;

use super::{data_file_label, file_name, Cli};

#[derive(Args)]
pub struct ListArgs {
    /// List the records of this data file instead of the directories
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// How CSV/XLSX cells are typed
    #[arg(long, env = "DOCGEN_NUMERIC_MODE")]
    numeric_mode: Option<NumericMode>,
}

pub fn execute(cli: &Cli, args: &ListArgs) -> Result<()> {
    let mut config = cli.load_config()?;
    if let Some(mode) = args.numeric_mode {
        config.numeric_mode = mode;
    }
    let pipeline = Pipeline::new(config, std::sync::Arc::new(HtmlBackend::new()));

    match &args.data {
        Some(path) => {
            let records = pipeline
                .load_records(path)
                .with_context(|| format!("Failed to load {}", path.display()))?;
            println!("{} ({} record(s))", file_name(path), records.len());
            match pipeline.id_key(&records) {
                Some(key) => println!("Identifier field: {key}"),
                None => println!("Identifier field: none"),
            }
            for (i, label) in pipeline.record_labels(&records).iter().enumerate() {
                println!("  {}. {}", i + 1, label);
            }
        }
        None => {
            let config = pipeline.config();
            println!("Data files in {}:", config.data_dir.display());
            let data_files = pipeline.data_files();
            if data_files.is_empty() {
                println!("  (none)");
            }
            for path in &data_files {
                println!("  {}", data_file_label(path));
            }

            println!("Templates in {}:", config.templates_dir.display());
            let templates = pipeline.template_files()?;
            if templates.is_empty() {
                println!("  (none)");
            }
            for path in &templates {
                println!("  {}", file_name(path));
            }
        }
    }
    Ok(())
}
