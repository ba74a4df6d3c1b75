use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use super::{
    EventCatalog, EventRef, GameLogEntry, PlayEventType, PlayPage, PlayRecord, PlayStream,
    ProviderConfig, ProviderError, Season,
};

/// HTTP adapter for the stats.com-style JSON API
#[derive(Debug, Clone)]
pub struct StatsApiProvider {
    client: Client,
    config: ProviderConfig,
}

impl StatsApiProvider {
    pub fn new(config: ProviderConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent("Mozilla/5.0")
            .build()?;
        Ok(Self { client, config })
    }

    fn seasons_url(&self, player_id: &str) -> String {
        format!(
            "{}/stats/basketball/{}/stats/players/{}?eventTypeId=1&careerOnly=false&accept=json",
            self.config.base_url,
            self.config.league.path(),
            player_id
        )
    }

    fn game_log_url(&self, player_id: &str, season: Season) -> String {
        format!(
            "{}/stats/basketball/{}/stats/players/{}/events/?eventTypeId=1&season={}&accept=json",
            self.config.base_url,
            self.config.league.path(),
            player_id,
            season
        )
    }

    fn pbp_url(&self, event_ref: &EventRef) -> String {
        format!(
            "{}/stats/basketball/{}/events/{}?pbp=true&accept=json",
            self.config.base_url,
            self.config.league.event_path(),
            event_ref
        )
    }

    /// GET a JSON body. `Ok(None)` on 404 so callers can decide what "missing" means.
    async fn get_json(&self, url: &str) -> Result<Option<Value>, ProviderError> {
        debug!(url = %url, "Requesting stats API");
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(ProviderError::unavailable(format!(
                "{} returned status {}",
                url, status
            )));
        }

        let body = response.json::<Value>().await?;
        Ok(Some(body))
    }
}

#[async_trait]
impl EventCatalog for StatsApiProvider {
    #[instrument(skip(self))]
    async fn list_seasons(&self, player_id: &str) -> Result<Vec<Season>, ProviderError> {
        let body = self.get_json(&self.seasons_url(player_id)).await?;
        Ok(body.as_ref().map(parse_seasons).unwrap_or_default())
    }

    #[instrument(skip(self))]
    async fn game_log(
        &self,
        player_id: &str,
        season: Season,
    ) -> Result<Vec<GameLogEntry>, ProviderError> {
        let no_such_season = || ProviderError::NoSuchSeason {
            player_id: player_id.to_string(),
            season,
        };

        let body = self
            .get_json(&self.game_log_url(player_id, season))
            .await?
            .ok_or_else(no_such_season)?;

        let entries = parse_game_log(&body, season);
        if entries.is_empty() {
            return Err(no_such_season());
        }
        Ok(entries)
    }

    fn provider_name(&self) -> &'static str {
        "StatsApiProvider"
    }
}

#[async_trait]
impl PlayStream for StatsApiProvider {
    #[instrument(skip(self), fields(event_ref = %event_ref))]
    async fn get_plays(&self, event_ref: &EventRef) -> Result<PlayPage, ProviderError> {
        let body = self
            .get_json(&self.pbp_url(event_ref))
            .await?
            .ok_or_else(|| ProviderError::unavailable(format!("event {} not found", event_ref)))?;

        let page = parse_play_page(&body, event_ref)?;
        if page.malformed > 0 {
            warn!(
                event_ref = %event_ref,
                skipped = page.malformed,
                "Skipped plays missing players or playEvent"
            );
        }
        Ok(page)
    }
}

fn array<'a>(value: &'a Value, key: &str) -> &'a [Value] {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Provider ids arrive as numbers or strings depending on endpoint
fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

fn as_u32(value: &Value) -> Option<u32> {
    value.as_u64().and_then(|v| u32::try_from(v).ok())
}

fn season_of(value: &Value) -> Option<Season> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|v| Season::try_from(v).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn player_seasons(body: &Value) -> impl Iterator<Item = &Value> {
    array(body, "apiResults")
        .iter()
        .flat_map(|result| result.get("league").map(|l| array(l, "players")).unwrap_or(&[]))
        .flat_map(|player| array(player, "seasons"))
}

pub(crate) fn parse_seasons(body: &Value) -> Vec<Season> {
    let mut seasons: Vec<Season> = player_seasons(body)
        .filter_map(|s| s.get("season").and_then(season_of))
        .collect();
    seasons.sort_unstable();
    seasons.dedup();
    seasons
}

/// The game date in US Eastern time, which is what box score sites print
fn eastern_date(game: &Value) -> Option<NaiveDate> {
    array(game, "startDate")
        .iter()
        .find(|d| d.get("dateType").and_then(Value::as_str) == Some("Eastern"))
        .and_then(|d| d.get("full").and_then(Value::as_str))
        .and_then(|full| full.split('T').next())
        .and_then(|day| NaiveDate::parse_from_str(day, "%Y-%m-%d").ok())
}

pub(crate) fn parse_game_log(body: &Value, season: Season) -> Vec<GameLogEntry> {
    player_seasons(body)
        .filter(|s| s.get("season").and_then(season_of) == Some(season))
        .flat_map(|s| array(s, "eventType"))
        .flat_map(|event_type| array(event_type, "splits"))
        .flat_map(|split| array(split, "events"))
        .filter_map(|game| {
            let event_ref = game.get("eventId").and_then(id_string)?;
            Some(GameLogEntry {
                event_ref: EventRef(event_ref),
                date: eastern_date(game),
                player_stats: game.get("playerStats").cloned().unwrap_or(Value::Null),
            })
        })
        .collect()
}

fn parse_play(play: &Value, event_ref: &EventRef) -> Option<PlayRecord> {
    let acting_player_id = array(play, "players").first()?.get("playerId").and_then(id_string)?;
    let play_event_id = play.get("playEvent")?.get("playEventId").and_then(as_u32)?;
    let sequence_id = play.get("playId").and_then(Value::as_u64)?;

    Some(PlayRecord {
        event_ref: event_ref.clone(),
        sequence_id,
        acting_player_id,
        play_event_type: PlayEventType::from_id(play_event_id),
        period_number: play
            .get("period")
            .and_then(Value::as_u64)
            .and_then(|p| u8::try_from(p).ok()),
        stat_value: play.get("pointsScored").and_then(as_u32),
    })
}

pub(crate) fn parse_play_page(
    body: &Value,
    event_ref: &EventRef,
) -> Result<PlayPage, ProviderError> {
    let pbp = array(body, "apiResults")
        .first()
        .and_then(|r| r.get("league"))
        .and_then(|l| l.get("season"))
        .and_then(|s| array(s, "eventType").first())
        .and_then(|t| array(t, "events").first())
        .and_then(|e| e.get("pbp"))
        .and_then(Value::as_array)
        .ok_or_else(|| {
            ProviderError::malformed(format!("event {} payload has no pbp list", event_ref))
        })?;

    let mut page = PlayPage::default();
    for play in pbp {
        match parse_play(play, event_ref) {
            Some(record) => page.plays.push(record),
            None => page.malformed += 1,
        }
    }
    Ok(page)
}
