use std::collections::HashMap;

use serde::Serialize;

use crate::types::ScoreRecord;

/// A score record standing in for one or more underlying precinct records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedRecord {
    #[serde(flatten)]
    pub record: ScoreRecord,
    /// Number of leaf records folded into `record`.
    pub count: usize,
}

/// Mean over the present, finite values. Values are summed in sorted order
/// so the result does not depend on input order.
fn mean<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let mut present: Vec<f64> = values.into_iter().flatten().filter(|v| v.is_finite()).collect();
    if present.is_empty() { return None }
    present.sort_by(f64::total_cmp);
    Some(present.iter().sum::<f64>() / present.len() as f64)
}

fn sum<I>(values: I) -> Option<u64>
where
    I: IntoIterator<Item = Option<u64>>,
{
    values.into_iter().flatten().reduce(u64::saturating_add)
}

/// Most frequent value; ties go to whichever value appeared first.
fn mode<'a, I>(values: I) -> Option<String>
where
    I: IntoIterator<Item = Option<&'a String>>,
{
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new(); // value -> (count, first seen)
    for (pos, value) in values.into_iter().flatten().enumerate() {
        counts.entry(value.as_str()).or_insert((0, pos)).0 += 1;
    }
    counts.into_iter()
        .max_by(|(_, (ca, pa)), (_, (cb, pb))| ca.cmp(cb).then(pb.cmp(pa)))
        .map(|(value, _)| value.to_string())
}

fn first<'a, I>(values: I) -> Option<String>
where
    I: IntoIterator<Item = Option<&'a String>>,
{
    values.into_iter().flatten().next().cloned()
}

/// Fold the records belonging to one boundary into a single representative record.
///
/// Continuous metrics are averaged, counts are summed, the targeting strategy takes
/// the modal value, and free-text fields keep the first value present. A single
/// record passes through unchanged. Returns `None` for an empty slice.
pub fn aggregate(records: &[&ScoreRecord]) -> Option<AggregatedRecord> {
    match records {
        [] => return None,
        [only] => return Some(AggregatedRecord { record: (*only).clone(), count: 1 }),
        _ => {}
    }

    let means = |f: fn(&ScoreRecord) -> Option<f64>| mean(records.iter().map(|r| f(r)));
    let sums = |f: fn(&ScoreRecord) -> Option<u64>| sum(records.iter().map(|r| f(r)));

    let record = ScoreRecord {
        partisan_lean: means(|r| r.partisan_lean),
        swing_potential: means(|r| r.swing_potential),
        turnout: means(|r| r.turnout),
        gotv_priority: means(|r| r.gotv_priority),
        persuasion_opportunity: means(|r| r.persuasion_opportunity),
        combined_score: means(|r| r.combined_score),
        confidence: means(|r| r.confidence),
        median_income: means(|r| r.median_income),
        college_pct: means(|r| r.college_pct),
        homeowner_pct: means(|r| r.homeowner_pct),
        minority_pct: means(|r| r.minority_pct),

        registered_voters: sums(|r| r.registered_voters),
        active_voters: sums(|r| r.active_voters),
        total_population: sums(|r| r.total_population),

        targeting_strategy: mode(records.iter().map(|r| r.targeting_strategy.as_ref())),

        lean_label: first(records.iter().map(|r| r.lean_label.as_ref())),
        turnout_label: first(records.iter().map(|r| r.turnout_label.as_ref())),
        recommendation: first(records.iter().map(|r| r.recommendation.as_ref())),
    };

    Some(AggregatedRecord { record, count: records.len() })
}
