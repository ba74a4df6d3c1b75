use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use super::{
    MatchStatus, MissingSeason, ReconciliationEntry, ReportedBy, SeasonExtremum, SeasonRange,
};
use crate::provider::Season;

pub type ExtremaBySeason = BTreeMap<Season, SeasonExtremum>;

/// Classifies every date either provider reported as a season high.
///
/// Only seasons both sides have data for are compared. Output is ordered by
/// season, then date.
pub fn reconcile(
    primary: &ExtremaBySeason,
    secondary: &ExtremaBySeason,
    range: SeasonRange,
) -> Vec<ReconciliationEntry> {
    let mut entries = Vec::new();

    for (&season, a) in primary.iter().filter(|(s, _)| range.contains(**s)) {
        let Some(b) = secondary.get(&season) else {
            continue;
        };
        let (Some(value_a), Some(value_b)) = (a.value, b.value) else {
            continue;
        };

        let dates_a: BTreeSet<NaiveDate> = a.dates().collect();
        let dates_b: BTreeSet<NaiveDate> = b.dates().collect();

        for &date in dates_a.union(&dates_b) {
            let (status, value, reported_by) =
                match (dates_a.contains(&date), dates_b.contains(&date)) {
                    (true, true) => (MatchStatus::Match, value_a, ReportedBy::Both),
                    (true, false) => (MatchStatus::Mismatch, value_a, ReportedBy::PrimaryOnly),
                    _ => (MatchStatus::Mismatch, value_b, ReportedBy::SecondaryOnly),
                };
            entries.push(ReconciliationEntry {
                season,
                date,
                status,
                value,
                reported_by,
            });
        }

        if value_a != value_b {
            debug!(season, value_a, value_b, "Providers disagree on season high");
        }
    }

    entries
}

/// Seasons inside `range` that only one side has data for
pub fn missing_seasons(
    primary: &ExtremaBySeason,
    secondary: &ExtremaBySeason,
    range: SeasonRange,
) -> Vec<MissingSeason> {
    let has_data = |map: &ExtremaBySeason, season: Season| {
        map.get(&season).map_or(false, |e| !e.is_empty())
    };

    let seasons: BTreeSet<Season> = primary
        .keys()
        .chain(secondary.keys())
        .copied()
        .filter(|s| range.contains(*s))
        .collect();

    seasons
        .into_iter()
        .filter_map(|season| {
            match (has_data(primary, season), has_data(secondary, season)) {
                (true, false) => Some(ReportedBy::PrimaryOnly),
                (false, true) => Some(ReportedBy::SecondaryOnly),
                _ => None,
            }
            .map(|reported_by| MissingSeason {
                season,
                reported_by,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::EventRef;
    use crate::stats::GameStatObservation;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 12, d).unwrap()
    }

    fn extremum(value: u32, days: &[u32]) -> SeasonExtremum {
        SeasonExtremum {
            value: Some(value),
            observations: days
                .iter()
                .map(|&d| GameStatObservation {
                    date: day(d),
                    event_ref: EventRef::from(format!("g{}", d).as_str()),
                    value,
                })
                .collect(),
        }
    }

    #[test]
    fn shared_dates_match_and_the_rest_mismatch() {
        let primary = BTreeMap::from([(2023, extremum(9, &[2]))]);
        let secondary = BTreeMap::from([(2023, extremum(9, &[2, 4]))]);

        let entries = reconcile(&primary, &secondary, SeasonRange::default());
        assert_eq!(
            entries,
            vec![
                ReconciliationEntry {
                    season: 2023,
                    date: day(2),
                    status: MatchStatus::Match,
                    value: 9,
                    reported_by: ReportedBy::Both,
                },
                ReconciliationEntry {
                    season: 2023,
                    date: day(4),
                    status: MatchStatus::Mismatch,
                    value: 9,
                    reported_by: ReportedBy::SecondaryOnly,
                },
            ]
        );
    }

    #[test]
    fn mismatches_carry_the_reporting_sides_value() {
        let primary = BTreeMap::from([(2023, extremum(11, &[7]))]);
        let secondary = BTreeMap::from([(2023, extremum(10, &[3]))]);

        let entries = reconcile(&primary, &secondary, SeasonRange::default());
        let summary: Vec<_> = entries
            .iter()
            .map(|e| (e.date, e.status, e.value, e.reported_by))
            .collect();
        assert_eq!(
            summary,
            vec![
                (day(3), MatchStatus::Mismatch, 10, ReportedBy::SecondaryOnly),
                (day(7), MatchStatus::Mismatch, 11, ReportedBy::PrimaryOnly),
            ]
        );
    }

    #[test]
    fn one_sided_seasons_produce_no_entries() {
        let primary = BTreeMap::from([(2021, extremum(5, &[1])), (2022, extremum(6, &[1]))]);
        let secondary = BTreeMap::from([(2022, extremum(6, &[1])), (2023, extremum(7, &[1]))]);

        let entries = reconcile(&primary, &secondary, SeasonRange::default());
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].season, 2022);

        let missing = missing_seasons(&primary, &secondary, SeasonRange::default());
        assert_eq!(
            missing,
            vec![
                MissingSeason {
                    season: 2021,
                    reported_by: ReportedBy::PrimaryOnly
                },
                MissingSeason {
                    season: 2023,
                    reported_by: ReportedBy::SecondaryOnly
                },
            ]
        );
    }

    #[test]
    fn range_filter_limits_compared_seasons() {
        let primary = BTreeMap::from([(2020, extremum(5, &[1])), (2021, extremum(6, &[1]))]);
        let secondary = primary.clone();

        let entries = reconcile(&primary, &secondary, SeasonRange::new(Some(2021), None));
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].season, 2021);
        assert!(missing_seasons(&primary, &secondary, SeasonRange::default()).is_empty());
    }

    #[test]
    fn empty_extremum_is_treated_as_missing() {
        let primary = BTreeMap::from([(2020, SeasonExtremum::default())]);
        let secondary = BTreeMap::from([(2020, extremum(5, &[1]))]);

        assert!(reconcile(&primary, &secondary, SeasonRange::default()).is_empty());
        assert_eq!(
            missing_seasons(&primary, &secondary, SeasonRange::default()),
            vec![MissingSeason {
                season: 2020,
                reported_by: ReportedBy::SecondaryOnly
            }]
        );
    }
}
