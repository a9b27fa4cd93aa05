use tracing::debug;

use sem_core::config::CampaignConstraints;
use sem_core::types::KeywordRecord;

use crate::rules::KeywordClassifier;

/// Volume, CPC and relevance filters, applied in that order.
#[derive(Debug, Clone, Copy)]
pub struct KeywordFilter {
    pub min_search_volume: u64,
    pub max_cpc: f64,
}

impl KeywordFilter {
    pub fn from_constraints(constraints: &CampaignConstraints) -> Self {
        Self {
            min_search_volume: constraints.min_search_volume,
            max_cpc: constraints.max_cpc,
        }
    }

    pub fn apply(&self, records: &[KeywordRecord], classifier: &KeywordClassifier) -> Vec<KeywordRecord> {
        let initial = records.len();

        let by_volume: Vec<&KeywordRecord> = records
            .iter()
            .filter(|r| r.estimated_volume >= self.min_search_volume)
            .collect();
        debug!(before = initial, after = by_volume.len(), "Volume filter");

        let by_cpc: Vec<&KeywordRecord> = by_volume
            .into_iter()
            .filter(|r| r.estimated_cpc_high <= self.max_cpc)
            .collect();
        debug!(max_cpc = self.max_cpc, after = by_cpc.len(), "CPC filter");

        let relevant: Vec<KeywordRecord> = by_cpc
            .into_iter()
            .filter(|r| match classifier.irrelevance_class(&r.keyword) {
                Some(class) => {
                    debug!(keyword = %r.keyword, class, "Dropped irrelevant keyword");
                    false
                }
                None => true,
            })
            .cloned()
            .collect();
        debug!(after = relevant.len(), "Relevance filter");

        relevant
    }
}
