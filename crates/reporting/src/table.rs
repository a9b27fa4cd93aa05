//! Row tables for each deliverable, rendered as CSV or JSON.

use std::path::Path;

use rust_xlsxwriter::{Color, Format, Workbook, XlsxError};
use serde::Serialize;
use serde_json::{json, Map, Value};

use sem_core::error::{CampaignError, CampaignResult};
use sem_core::money::round_to;
use sem_core::types::{KeywordRecord, PmaxTheme, ScoredKeyword, SearchAdGroupEntry, ShoppingCategory};

/// An ordered set of columns and the rows beneath them.
#[derive(Debug, Clone, Serialize)]
pub struct Table {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

fn columns(names: &[&str]) -> Vec<String> {
    names.iter().map(|c| c.to_string()).collect()
}

fn money(value: f64) -> Value {
    json!(round_to(value, 2))
}

impl Table {
    pub fn new(name: impl Into<String>, columns: Vec<String>) -> Self {
        Self { name: name.into(), columns, rows: Vec::new() }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn raw_keywords(records: &[KeywordRecord]) -> Self {
        let mut table = Self::new(
            "keywords_raw",
            columns(&[
                "keyword",
                "source",
                "estimated_volume",
                "estimated_competition",
                "estimated_cpc_low",
                "estimated_cpc_high",
            ]),
        );
        table.rows = records
            .iter()
            .map(|r| {
                vec![
                    json!(r.keyword),
                    json!(r.source.as_str()),
                    json!(r.estimated_volume),
                    json!(r.estimated_competition.as_str()),
                    json!(r.estimated_cpc_low),
                    json!(r.estimated_cpc_high),
                ]
            })
            .collect();
        table
    }

    pub fn master_keywords(scored: &[ScoredKeyword]) -> Self {
        let mut table = Self::new(
            "master_keyword_list",
            columns(&[
                "keyword",
                "theme",
                "search_intent",
                "priority",
                "estimated_volume",
                "estimated_competition",
                "estimated_cpc_low",
                "estimated_cpc_high",
                "composite_score",
                "performance_rank",
                "source",
            ]),
        );
        table.rows = scored
            .iter()
            .map(|kw| {
                vec![
                    json!(kw.record.keyword),
                    json!(kw.theme.as_str()),
                    json!(kw.search_intent.as_str()),
                    json!(kw.priority.as_str()),
                    json!(kw.record.estimated_volume),
                    json!(kw.record.estimated_competition.as_str()),
                    json!(kw.record.estimated_cpc_low),
                    json!(kw.record.estimated_cpc_high),
                    json!(kw.composite_score),
                    json!(kw.performance_rank),
                    json!(kw.record.source.as_str()),
                ]
            })
            .collect();
        table
    }

    pub fn search_ad_groups(entries: &[SearchAdGroupEntry]) -> Self {
        let mut table = Self::new(
            "Keyword_AdGroups",
            columns(&[
                "ad_group",
                "keyword",
                "match_types",
                "suggested_cpc_low",
                "suggested_cpc_high",
                "estimated_volume",
                "competition",
                "search_intent",
                "composite_score",
                "priority",
                "expected_monthly_clicks",
                "expected_monthly_conversions",
                "theme_monthly_budget",
                "source",
            ]),
        );
        table.rows = entries
            .iter()
            .map(|e| {
                vec![
                    json!(e.ad_group.as_str()),
                    json!(e.keyword),
                    json!(e.match_types),
                    money(e.suggested_cpc_low),
                    money(e.suggested_cpc_high),
                    json!(e.estimated_volume),
                    json!(e.competition.as_str()),
                    json!(e.search_intent.as_str()),
                    money(e.composite_score),
                    json!(e.priority.as_str()),
                    json!(e.expected_monthly_clicks),
                    money(e.expected_monthly_conversions),
                    money(e.theme_monthly_budget),
                    json!(e.source.as_str()),
                ]
            })
            .collect();
        table
    }

    pub fn pmax_themes(themes: &[PmaxTheme]) -> Self {
        let mut table = Self::new(
            "PMax_Themes",
            columns(&[
                "theme_type",
                "theme_name",
                "description",
                "target_keywords",
                "primary_intent",
                "audience_signals",
                "monthly_budget",
                "expected_impressions",
                "expected_clicks",
                "expected_conversions",
                "target_roas",
                "asset_requirements",
            ]),
        );
        table.rows = themes
            .iter()
            .map(|t| {
                vec![
                    json!(t.theme_type),
                    json!(t.theme_name),
                    json!(t.description),
                    json!(t.target_keywords.join(", ")),
                    json!(t.primary_intent),
                    json!(t.audience_signals),
                    money(t.monthly_budget),
                    money(t.expected_impressions),
                    money(t.expected_clicks),
                    money(t.expected_conversions),
                    money(t.target_roas),
                    json!(t.asset_requirements),
                ]
            })
            .collect();
        table
    }

    pub fn shopping_bids(categories: &[ShoppingCategory]) -> Self {
        let mut table = Self::new(
            "Shopping_CPC_Bids",
            columns(&[
                "product_category",
                "category_description",
                "priority_level",
                "avg_monthly_volume",
                "competition_level",
                "top_of_page_bid_low",
                "top_of_page_bid_high",
                "target_cpc_formula",
                "suggested_cpc",
                "margin_factor",
                "monthly_budget",
                "expected_monthly_clicks",
                "expected_monthly_conversions",
                "bidding_strategy",
            ]),
        );
        table.rows = categories
            .iter()
            .map(|c| {
                vec![
                    json!(c.product_category),
                    json!(c.category_description),
                    json!(c.priority_level.as_str()),
                    money(c.avg_monthly_volume),
                    json!(c.competition_level.as_str()),
                    money(c.top_of_page_bid_low),
                    money(c.top_of_page_bid_high),
                    money(c.target_cpc_formula),
                    money(c.suggested_cpc),
                    json!(c.margin_factor),
                    money(c.monthly_budget),
                    money(c.expected_monthly_clicks),
                    money(c.expected_monthly_conversions),
                    json!(c.bidding_strategy),
                ]
            })
            .collect();
        table
    }

    /// Header row then one line per row; strings are quoted with inner
    /// quotes doubled, nulls are empty cells.
    pub fn to_csv(&self) -> String {
        let mut csv = self.columns.join(",");
        csv.push('\n');
        for row in &self.rows {
            let cells: Vec<String> = row
                .iter()
                .map(|v| match v {
                    Value::String(s) => format!("\"{}\"", s.replace('"', "\"\"")),
                    Value::Null => String::new(),
                    other => other.to_string(),
                })
                .collect();
            csv.push_str(&cells.join(","));
            csv.push('\n');
        }
        csv
    }

    /// Pretty-printed array of objects keyed by column name.
    pub fn to_json(&self) -> CampaignResult<String> {
        let records: Vec<Value> = self
            .rows
            .iter()
            .map(|row| {
                let record: Map<String, Value> = self
                    .columns
                    .iter()
                    .cloned()
                    .zip(row.iter().cloned())
                    .collect();
                Value::Object(record)
            })
            .collect();
        Ok(serde_json::to_string_pretty(&records)?)
    }

    /// Single-sheet workbook named after the table: a bold header row, then
    /// numbers as numeric cells and strings as text. Nulls stay blank.
    pub fn write_xlsx(&self, path: &Path) -> CampaignResult<()> {
        self.build_workbook(path).map_err(|e| {
            CampaignError::Export(format!("cannot write workbook {}: {e}", path.display()))
        })
    }

    fn build_workbook(&self, path: &Path) -> Result<(), XlsxError> {
        let mut workbook = Workbook::new();
        let header = Format::new().set_bold().set_background_color(Color::RGB(0xCCCCCC));

        let sheet = workbook.add_worksheet();
        sheet.set_name(&self.name)?;
        for (col, name) in (0u16..).zip(&self.columns) {
            sheet.write_string_with_format(0, col, name, &header)?;
        }
        for (row, cells) in (1u32..).zip(&self.rows) {
            for (col, cell) in (0u16..).zip(cells) {
                match cell {
                    Value::Null => {}
                    Value::String(s) => {
                        sheet.write_string(row, col, s)?;
                    }
                    Value::Bool(b) => {
                        sheet.write_boolean(row, col, *b)?;
                    }
                    Value::Number(n) => match n.as_f64() {
                        Some(v) => {
                            sheet.write_number(row, col, v)?;
                        }
                        None => {
                            sheet.write_string(row, col, n.to_string())?;
                        }
                    },
                    other => {
                        sheet.write_string(row, col, other.to_string())?;
                    }
                }
            }
        }

        workbook.save(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sem_core::types::{Competition, KeywordSource};

    fn record(keyword: &str) -> KeywordRecord {
        KeywordRecord {
            keyword: keyword.to_string(),
            source: KeywordSource::BrandVariant,
            estimated_volume: 1200,
            estimated_competition: Competition::Low,
            estimated_cpc_low: 0.45,
            estimated_cpc_high: 1.1,
        }
    }

    #[test]
    fn test_csv_quoting() {
        let table = Table::raw_keywords(&[record("nutrimax \"official\" store")]);
        let csv = table.to_csv();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("keyword,source,estimated_volume,estimated_competition,estimated_cpc_low,estimated_cpc_high")
        );
        assert_eq!(
            lines.next(),
            Some("\"nutrimax \"\"official\"\" store\",\"brand_variant\",1200,\"Low\",0.45,1.1")
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_null_cells_are_empty() {
        let mut table = Table::new("t", columns(&["a", "b"]));
        table.rows.push(vec![Value::Null, json!(3)]);
        assert_eq!(table.to_csv(), "a,b\n,3\n");
    }

    #[test]
    fn test_json_records() {
        let table = Table::raw_keywords(&[record("whey protein")]);
        let json = table.to_json().unwrap();
        let parsed: Vec<Value> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0]["estimated_volume"], json!(1200));
        assert_eq!(parsed[0]["source"], json!("brand_variant"));
    }

    #[test]
    fn test_pmax_keywords_are_joined() {
        let theme = PmaxTheme {
            theme_type: "Seasonal".into(),
            theme_name: "Fitness Resolution Goals".into(),
            description: "d".into(),
            target_keywords: vec!["fitness goals".into(), "health resolutions".into()],
            primary_intent: "Goal-achievement".into(),
            audience_signals: "a".into(),
            budget_allocation: 0.15,
            monthly_budget: 300.0,
            expected_impressions: 15000.0,
            expected_clicks: 300.0,
            expected_conversions: 6.0,
            target_roas: 50.0,
            asset_requirements: "x".into(),
        };
        let table = Table::pmax_themes(&[theme]);
        assert_eq!(table.columns.len(), 12);
        assert_eq!(table.rows[0][3], json!("fitness goals, health resolutions"));
    }
}
