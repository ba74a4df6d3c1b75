use tracing::debug;

use super::{
    ExtractorRegistry, GameStatObservation, ScanWarning, SeasonExtremum, StatKind, StatsError,
};
use crate::provider::GameLogEntry;

/// Maximum value and every observation tied at it, in input order.
///
/// Single left-to-right pass: a strictly greater value restarts the tie list,
/// an equal value joins it.
pub fn find_extremum<I>(observations: I) -> SeasonExtremum
where
    I: IntoIterator<Item = GameStatObservation>,
{
    let mut max_value: Option<u32> = None;
    let mut tied: Vec<GameStatObservation> = Vec::new();

    for observation in observations {
        match max_value {
            Some(max) if observation.value < max => {}
            Some(max) if observation.value == max => tied.push(observation),
            _ => {
                max_value = Some(observation.value);
                tied.clear();
                tied.push(observation);
            }
        }
    }

    SeasonExtremum {
        value: max_value,
        observations: tied,
    }
}

/// Every game at or above `minimum`, in input order
pub fn games_at_or_above<'a, I>(observations: I, minimum: u32) -> Vec<GameStatObservation>
where
    I: IntoIterator<Item = &'a GameStatObservation>,
{
    observations
        .into_iter()
        .filter(|o| o.value >= minimum)
        .cloned()
        .collect()
}

/// Turns a season's game log into observations for one stat kind
pub struct ExtremumFinder<'a> {
    registry: &'a ExtractorRegistry,
    kind: StatKind,
}

impl<'a> ExtremumFinder<'a> {
    pub fn new(registry: &'a ExtractorRegistry, kind: StatKind) -> Self {
        Self { registry, kind }
    }

    /// Valid observations plus a warning for each game without one
    pub fn observations(
        &self,
        games: &[GameLogEntry],
    ) -> Result<(Vec<GameStatObservation>, Vec<ScanWarning>), StatsError> {
        let mut observations = Vec::with_capacity(games.len());
        let mut warnings = Vec::new();

        for game in games {
            match self.registry.observation(game, self.kind)? {
                Some(observation) => observations.push(observation),
                None => {
                    debug!(
                        event_ref = %game.event_ref,
                        stat = %self.kind,
                        "No valid value for this game"
                    );
                    warnings.push(ScanWarning::NoValidValue {
                        event_ref: game.event_ref.clone(),
                    });
                }
            }
        }

        Ok((observations, warnings))
    }

    pub fn find(
        &self,
        games: &[GameLogEntry],
    ) -> Result<(SeasonExtremum, Vec<ScanWarning>), StatsError> {
        let (observations, warnings) = self.observations(games)?;
        Ok((find_extremum(observations), warnings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::EventRef;
    use chrono::NaiveDate;
    use rstest::rstest;
    use serde_json::json;
    use std::collections::HashSet;

    fn obs(day: u32, value: u32) -> GameStatObservation {
        GameStatObservation {
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            event_ref: EventRef::from(format!("e{}", day).as_str()),
            value,
        }
    }

    #[test]
    fn keeps_every_game_tied_at_the_maximum() {
        let extremum = find_extremum(vec![obs(1, 10), obs(2, 22), obs(3, 19), obs(4, 22)]);
        assert_eq!(extremum.value, Some(22));
        assert_eq!(extremum.observations, vec![obs(2, 22), obs(4, 22)]);
        assert!(extremum.is_tie());
    }

    #[test]
    fn empty_input_has_no_value() {
        let extremum = find_extremum(Vec::new());
        assert_eq!(extremum.value, None);
        assert!(extremum.is_empty());
    }

    #[test]
    fn zero_is_a_real_maximum() {
        let extremum = find_extremum(vec![obs(1, 0), obs(2, 0)]);
        assert_eq!(extremum.value, Some(0));
        assert_eq!(extremum.observations.len(), 2);
    }

    #[rstest]
    #[case(vec![0, 1, 2, 3, 4])]
    #[case(vec![3, 0, 4, 2, 1])]
    #[case(vec![4, 3, 2, 1, 0])]
    fn permutations_yield_same_set(#[case] order: Vec<usize>) {
        let games = [obs(1, 5), obs(2, 3), obs(3, 9), obs(4, 9), obs(5, 1)];
        let permuted = order.iter().map(|&i| games[i].clone());

        let extremum = find_extremum(permuted);
        let actual: HashSet<_> = extremum.observations.into_iter().collect();
        let expected: HashSet<_> = [obs(3, 9), obs(4, 9)].into_iter().collect();
        assert_eq!(extremum.value, Some(9));
        assert_eq!(actual, expected);
    }

    #[test]
    fn threshold_listing_is_inclusive_and_ordered() {
        let games = vec![obs(1, 30), obs(2, 12), obs(3, 31), obs(4, 29)];
        let listed = games_at_or_above(&games, 30);
        assert_eq!(listed, vec![obs(1, 30), obs(3, 31)]);
    }

    #[test]
    fn finder_skips_games_without_value() {
        let registry = ExtractorRegistry::standard();
        let finder = ExtremumFinder::new(&registry, StatKind::Points);
        let games = vec![
            GameLogEntry {
                event_ref: EventRef::from("1"),
                date: NaiveDate::from_ymd_opt(2024, 1, 1),
                player_stats: json!({ "points": 18 }),
            },
            GameLogEntry {
                event_ref: EventRef::from("2"),
                date: NaiveDate::from_ymd_opt(2024, 1, 2),
                player_stats: serde_json::Value::Null,
            },
        ];

        let (extremum, warnings) = finder.find(&games).unwrap();
        assert_eq!(extremum.value, Some(18));
        assert_eq!(
            warnings,
            vec![ScanWarning::NoValidValue {
                event_ref: EventRef::from("2")
            }]
        );
    }
}
