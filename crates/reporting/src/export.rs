//! Writes every deliverable table to the output directory.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use sem_core::config::{CampaignConfig, OutputSettings};
use sem_core::error::{CampaignError, CampaignResult};
use sem_core::types::{KeywordRecord, ScoredKeyword};
use sem_planner::CampaignPlan;
use tracing::{info, warn};

use crate::summary::{render_summary, SUMMARY_FILE_NAME};
use crate::table::Table;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
    Xlsx,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Xlsx => "xlsx",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "json" => Some(Self::Json),
            "xlsx" | "excel" => Some(Self::Xlsx),
            _ => None,
        }
    }
}

/// Resolve configured format names. Unsupported names fall back to CSV;
/// duplicates are written once.
pub fn resolve_formats(names: &[String]) -> Vec<ExportFormat> {
    let mut formats = Vec::new();
    for name in names {
        let format = ExportFormat::parse(name).unwrap_or_else(|| {
            warn!(format = %name, "Unsupported export format, writing CSV instead");
            ExportFormat::Csv
        });
        if !formats.contains(&format) {
            formats.push(format);
        }
    }
    formats
}

/// Everything a run produces.
pub struct Deliverables<'a> {
    pub raw_keywords: &'a [KeywordRecord],
    pub scored_keywords: &'a [ScoredKeyword],
    pub plan: &'a CampaignPlan,
}

pub struct ExportManager {
    output_dir: PathBuf,
    formats: Vec<ExportFormat>,
}

impl ExportManager {
    pub fn new(settings: &OutputSettings) -> Self {
        Self {
            output_dir: PathBuf::from(&settings.directory),
            formats: resolve_formats(&settings.file_formats),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn formats(&self) -> &[ExportFormat] {
        &self.formats
    }

    fn ensure_output_dir(&self) -> CampaignResult<()> {
        fs::create_dir_all(&self.output_dir).map_err(|e| {
            CampaignError::Export(format!(
                "cannot create output directory {}: {e}",
                self.output_dir.display()
            ))
        })
    }

    fn write_file(&self, file_name: &str, contents: &str) -> CampaignResult<PathBuf> {
        let path = self.output_dir.join(file_name);
        fs::write(&path, contents)
            .map_err(|e| CampaignError::Export(format!("cannot write {}: {e}", path.display())))?;
        Ok(path)
    }

    /// Write one table in every configured format.
    pub fn export_table(&self, table: &Table) -> CampaignResult<Vec<PathBuf>> {
        self.ensure_output_dir()?;
        let mut paths = Vec::with_capacity(self.formats.len());
        for format in &self.formats {
            let file_name = format!("{}.{}", table.name, format.extension());
            let path = match format {
                ExportFormat::Csv => self.write_file(&file_name, &table.to_csv())?,
                ExportFormat::Json => self.write_file(&file_name, &table.to_json()?)?,
                ExportFormat::Xlsx => {
                    let path = self.output_dir.join(&file_name);
                    table.write_xlsx(&path)?;
                    path
                }
            };
            info!(path = %path.display(), rows = table.row_count(), "Exported table");
            paths.push(path);
        }
        Ok(paths)
    }

    /// Write all five tables plus the summary report; returns written paths.
    pub fn export_all(
        &self,
        config: &CampaignConfig,
        deliverables: &Deliverables<'_>,
    ) -> CampaignResult<Vec<PathBuf>> {
        let tables = [
            Table::raw_keywords(deliverables.raw_keywords),
            Table::master_keywords(deliverables.scored_keywords),
            Table::search_ad_groups(&deliverables.plan.search),
            Table::pmax_themes(&deliverables.plan.pmax),
            Table::shopping_bids(&deliverables.plan.shopping),
        ];

        let mut paths = Vec::new();
        for table in &tables {
            paths.extend(self.export_table(table)?);
        }

        let report = render_summary(config, deliverables.scored_keywords, deliverables.plan, Local::now());
        let summary_path = self.write_file(SUMMARY_FILE_NAME, &report)?;
        info!(path = %summary_path.display(), "Exported summary report");
        paths.push(summary_path);

        Ok(paths)
    }
}
