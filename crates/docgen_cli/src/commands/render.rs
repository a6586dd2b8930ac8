//! Render command - substitute a record into a template without a backend.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use docgen_core::{HtmlBackend, Pipeline, RecordSelector};
use docgen_data::NumericMode;

use super::Cli;

#[derive(Args)]
pub struct RenderArgs {
    /// Data file
    #[arg(short, long)]
    data: PathBuf,

    /// Template file
    #[arg(short, long)]
    template: PathBuf,

    /// Record identifier or 1-based position (defaults to the first record)
    #[arg(short, long)]
    record: Option<String>,

    /// Write the markup here instead of stdout
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// How CSV/XLSX cells are typed
    #[arg(long, env = "DOCGEN_NUMERIC_MODE")]
    numeric_mode: Option<NumericMode>,
}

pub fn execute(cli: &Cli, args: &RenderArgs) -> Result<()> {
    let mut config = cli.load_config()?;
    if let Some(mode) = args.numeric_mode {
        config.numeric_mode = mode;
    }
    let pipeline = Pipeline::new(config, Arc::new(HtmlBackend::new()));

    let markup = render_markup(&pipeline, args)?;
    match &args.out {
        Some(path) => {
            std::fs::write(path, &markup)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote {} bytes to {:?}", markup.len(), path);
        }
        None => print!("{markup}"),
    }
    Ok(())
}

fn render_markup(pipeline: &Pipeline, args: &RenderArgs) -> Result<String> {
    let records = pipeline
        .load_records(&args.data)
        .with_context(|| format!("Failed to load {}", args.data.display()))?;
    let selector = match &args.record {
        Some(raw) => RecordSelector::parse(raw),
        None => RecordSelector::Index(0),
    };
    let index = pipeline.select(&records, &selector)?;
    let template = pipeline
        .load_template(&args.template)
        .with_context(|| format!("Failed to read template {}", args.template.display()))?;

    let record = records
        .get(index)
        .context("selected record disappeared")?;
    Ok(pipeline.render_markup(record, &template)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use docgen_core::{CoreError, DocgenConfig};
    use std::fs;
    use tempfile::tempdir;

    fn args(data: PathBuf, template: PathBuf, record: Option<&str>) -> RenderArgs {
        RenderArgs {
            data,
            template,
            record: record.map(String::from),
            out: None,
            numeric_mode: None,
        }
    }

    #[test]
    fn test_render_selected_record() {
        let temp = tempdir().unwrap();
        let data = temp.path().join("invoices.csv");
        let template = temp.path().join("invoice.html");
        fs::write(&data, "id,customer,total\n1,Anna,10.5\n2,Boris,20\n").unwrap();
        fs::write(&template, "<p>{customer}: {total}</p>{items_html}").unwrap();

        let pipeline = Pipeline::new(DocgenConfig::default(), Arc::new(HtmlBackend::new()));
        let markup = render_markup(&pipeline, &args(data, template, Some("2"))).unwrap();
        assert_eq!(
            markup,
            "<p>Boris: 20.00</p><tr><td colspan='4'>No data</td></tr>"
        );
    }

    #[test]
    fn test_render_unknown_record() {
        let temp = tempdir().unwrap();
        let data = temp.path().join("invoices.json");
        let template = temp.path().join("invoice.html");
        fs::write(&data, r#"[{"id": "A"}]"#).unwrap();
        fs::write(&template, "{id}").unwrap();

        let pipeline = Pipeline::new(DocgenConfig::default(), Arc::new(HtmlBackend::new()));
        let err = render_markup(&pipeline, &args(data, template, Some("B"))).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CoreError>(),
            Some(CoreError::RecordNotFound(_))
        ));
    }
}
