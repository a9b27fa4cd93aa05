//! Plain-text campaign summary report.

use std::collections::BTreeMap;
use std::fmt::Write;

use chrono::{DateTime, Local};
use sem_core::config::CampaignConfig;
use sem_core::money::{format_currency, group_thousands};
use sem_core::types::ScoredKeyword;
use sem_planner::CampaignPlan;

pub const SUMMARY_FILE_NAME: &str = "Campaign_Summary_Report.txt";

/// Label counts, most frequent first; equal counts in label order.
fn value_counts<'a>(labels: impl IntoIterator<Item = &'a str>) -> Vec<(&'a str, usize)> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for label in labels {
        *counts.entry(label).or_default() += 1;
    }
    let mut counts: Vec<_> = counts.into_iter().collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

fn title_case(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn render_summary(
    config: &CampaignConfig,
    scored: &[ScoredKeyword],
    plan: &CampaignPlan,
    generated_at: DateTime<Local>,
) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = write_summary(&mut out, config, scored, plan, generated_at);
    out
}

fn write_summary(
    out: &mut String,
    config: &CampaignConfig,
    scored: &[ScoredKeyword],
    plan: &CampaignPlan,
    generated_at: DateTime<Local>,
) -> std::fmt::Result {
    writeln!(out, "# SEM Campaign Summary Report")?;
    writeln!(out, "Generated on: {}", generated_at.format("%Y-%m-%d %H:%M:%S"))?;
    writeln!(out, "Project: {}", config.project.name)?;
    writeln!(out, "Author: {}", config.project.author)?;
    writeln!(out)?;

    writeln!(out, "## Campaign Configuration")?;
    writeln!(out, "Brand: {}", config.brand.name)?;
    writeln!(out, "Competitor: {}", config.competitor.name)?;
    writeln!(out, "Service Locations: {}", config.service_locations.join(", "))?;
    writeln!(out)?;

    let budgets = &config.budgets;
    writeln!(out, "## Budget Allocation")?;
    writeln!(out, "Search Campaigns: {}", format_currency(budgets.search_ads))?;
    writeln!(out, "Shopping Campaigns: {}", format_currency(budgets.shopping_ads))?;
    writeln!(out, "Performance Max: {}", format_currency(budgets.pmax_ads))?;
    writeln!(out, "Total Monthly Budget: {}", format_currency(budgets.total_monthly))?;
    writeln!(out)?;

    writeln!(out, "## Keywords Summary")?;
    writeln!(out, "Total Processed Keywords: {}", group_thousands(scored.len() as u64))?;
    writeln!(out, "\nKeywords by Theme:")?;
    for (theme, count) in value_counts(scored.iter().map(|kw| kw.theme.as_str())) {
        writeln!(out, "  • {theme}: {}", group_thousands(count as u64))?;
    }
    writeln!(out, "\nKeywords by Intent:")?;
    for (intent, count) in value_counts(scored.iter().map(|kw| kw.search_intent.as_str())) {
        writeln!(out, "  • {}: {}", title_case(intent), group_thousands(count as u64))?;
    }
    writeln!(out)?;

    let ad_groups = value_counts(plan.search.iter().map(|e| e.ad_group.as_str()));
    writeln!(out, "## Search Campaign Structure")?;
    writeln!(out, "Total Ad Groups: {}", ad_groups.len())?;
    writeln!(out, "Total Keywords: {}", group_thousands(plan.search.len() as u64))?;
    for (ad_group, count) in ad_groups {
        writeln!(out, "  • {ad_group}: {} keywords", group_thousands(count as u64))?;
    }
    writeln!(out)?;

    writeln!(out, "## Performance Max Themes")?;
    writeln!(out, "Total Themes: {}", plan.pmax.len())?;
    for theme in &plan.pmax {
        writeln!(out, "  • {}: {} budget", theme.theme_name, format_currency(theme.monthly_budget))?;
    }
    writeln!(out)?;

    writeln!(out, "## Shopping Campaign Structure")?;
    writeln!(out, "Product Categories: {}", plan.shopping.len())?;
    for category in &plan.shopping {
        writeln!(
            out,
            "  • {}: ${:.2} CPC, {} budget",
            category.product_category,
            category.suggested_cpc,
            format_currency(category.monthly_budget)
        )?;
    }
    writeln!(out)?;

    let channels = [
        ("Search Campaigns", plan.search_clicks(), plan.search_conversions()),
        ("Performance Max", plan.pmax_clicks(), plan.pmax_conversions()),
        ("Shopping Campaigns", plan.shopping_clicks(), plan.shopping_conversions()),
    ];
    writeln!(out, "## Expected Performance")?;
    for (channel, clicks, conversions) in channels {
        writeln!(
            out,
            "{channel}: {} clicks, {conversions:.1} conversions",
            group_thousands(clicks.round() as u64)
        )?;
    }
    let total_clicks: f64 = channels.iter().map(|c| c.1).sum();
    let total_conversions: f64 = channels.iter().map(|c| c.2).sum();
    write!(
        out,
        "\nTotal Projected: {} clicks, {total_conversions:.1} conversions",
        group_thousands(total_clicks.round() as u64)
    )
}
