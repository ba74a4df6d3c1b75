use super::{EventPeriodPoints, PeriodExtremum, PeriodHigh};
use crate::provider::{EventRef, PlayRecord};

/// Periods counted; overtime is left out
pub const REGULATION_PERIODS: u8 = 4;

/// Points the player scored in each regulation period of one game
pub fn period_points(
    event_ref: &EventRef,
    plays: &[PlayRecord],
    player_id: &str,
) -> EventPeriodPoints {
    let mut periods = [0u32; REGULATION_PERIODS as usize];

    for play in plays.iter().filter(|p| p.acting_player_id == player_id) {
        let (Some(period), Some(points)) = (play.period_number, play.stat_value) else {
            continue;
        };
        if (1..=REGULATION_PERIODS).contains(&period) {
            periods[usize::from(period - 1)] += points;
        }
    }

    EventPeriodPoints {
        event_ref: event_ref.clone(),
        periods,
    }
}

/// Best single period across games, with every (game, period) tied at it.
/// Scoreless periods never count, so a season without points has no best.
pub fn highest_period(events: &[EventPeriodPoints]) -> PeriodExtremum {
    let mut best = PeriodExtremum::default();

    for event in events {
        for (index, &points) in event.periods.iter().enumerate() {
            if points == 0 {
                continue;
            }
            let high = PeriodHigh {
                event_ref: event.event_ref.clone(),
                period: index as u8 + 1,
            };
            match best.value {
                Some(max) if points < max => {}
                Some(max) if points == max => best.tied.push(high),
                _ => {
                    best.value = Some(points);
                    best.tied = vec![high];
                }
            }
        }
    }

    best
}
