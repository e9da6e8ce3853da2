use crate::config::BatchConfig;
use crate::core::Storage;
use crate::domain::model::SemPlan;
use crate::utils::error::Result;
use std::io::Write;
use zip::write::{FileOptions, ZipWriter};

pub const PLAN_JSON: &str = "output_keywords.json";
pub const AD_GROUPS_CSV: &str = "search_ad_groups.csv";
pub const SHOPPING_CPC_CSV: &str = "shopping_cpc.csv";

/// Writes a plan in the configured formats, optionally bundled as one zip.
pub struct PlanExporter<S: Storage> {
    storage: S,
    config: BatchConfig,
}

impl<S: Storage> PlanExporter<S> {
    pub fn new(storage: S, config: BatchConfig) -> Self {
        Self { storage, config }
    }

    /// Returns the file names written, relative to the storage root.
    pub async fn export(&self, plan: &SemPlan) -> Result<Vec<String>> {
        let files = render_files(plan, &self.config.output_formats())?;

        if let Some(archive_name) = self.config.archive_name() {
            tracing::debug!("Creating ZIP file with {} files", files.len());
            let zip_data = build_archive(&files)?;

            tracing::debug!("Writing ZIP file ({} bytes) to storage", zip_data.len());
            self.storage.write_file(archive_name, &zip_data).await?;
            return Ok(vec![archive_name.to_string()]);
        }

        let mut written = Vec::with_capacity(files.len());
        for (name, data) in files {
            self.storage.write_file(name, &data).await?;
            written.push(name.to_string());
        }
        Ok(written)
    }
}

fn render_files(plan: &SemPlan, formats: &[String]) -> Result<Vec<(&'static str, Vec<u8>)>> {
    let mut files = Vec::new();

    for format in formats {
        match format.as_str() {
            "json" => {
                let json_data = serde_json::to_string_pretty(plan)?;
                files.push((PLAN_JSON, json_data.into_bytes()));
            }
            "csv" => {
                files.push((AD_GROUPS_CSV, ad_groups_csv(plan)?));
                files.push((SHOPPING_CPC_CSV, shopping_cpc_csv(plan)?));
            }
            other => tracing::warn!("Skipping unsupported output format: {}", other),
        }
    }

    Ok(files)
}

fn build_archive(files: &[(&'static str, Vec<u8>)]) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));

    for (name, data) in files {
        zip.start_file::<_, ()>(*name, FileOptions::default())?;
        zip.write_all(data)?;
    }

    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

fn ad_groups_csv(plan: &SemPlan) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "ad_group",
        "keyword",
        "search_volume",
        "competition",
        "cpc_range",
        "match_types",
    ])?;

    for (group, keywords) in &plan.search_ad_groups {
        let match_types = group
            .match_types()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("|");

        for kw in keywords {
            let volume = kw.search_volume.map(|v| v.to_string()).unwrap_or_default();
            writer.write_record([
                group.name(),
                kw.keyword.as_str(),
                volume.as_str(),
                kw.competition.as_deref().unwrap_or_default(),
                kw.cpc_range.as_deref().unwrap_or_default(),
                match_types.as_str(),
            ])?;
        }
    }

    into_bytes(writer)
}

fn shopping_cpc_csv(plan: &SemPlan) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["keyword", "search_volume", "competition", "suggested_cpc"])?;

    for bid in &plan.shopping_cpc {
        let volume = bid.search_volume.map(|v| v.to_string()).unwrap_or_default();
        let cpc = format!("{:.2}", bid.suggested_cpc);
        writer.write_record([
            bid.keyword.as_str(),
            volume.as_str(),
            bid.competition.as_deref().unwrap_or_default(),
            cpc.as_str(),
        ])?;
    }

    into_bytes(writer)
}

fn into_bytes(writer: csv::Writer<Vec<u8>>) -> Result<Vec<u8>> {
    writer.into_inner().map_err(|e| e.into_error().into())
}
