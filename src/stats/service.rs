use futures::stream::{self, StreamExt};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::timeout;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::provider::{EventCatalog, EventRef, GameLogEntry, PlayStream, ProviderError, Season};

use super::{
    extremum::games_at_or_above,
    periods::{highest_period, period_points},
    reconcile::{missing_seasons, reconcile},
    AnalysisConfig, ExtractorRegistry, ExtremaReport, ExtremumFinder, FetchedPage, MatchStatus,
    PlayFeed, ReconciliationReport, ScanWarning, SeasonExtremumReport, SeasonPeriodScoring,
    SeasonRange, SeasonStreaks, SeasonThresholdReport, StatKind, StatsError, StreakRules,
    StreakScan,
};

/// Entry point for every analysis. Owns the provider seams and the tuning
/// shared by all runs.
pub struct StatsService {
    catalog: Arc<dyn EventCatalog>,
    plays: Arc<dyn PlayStream>,
    registry: Arc<ExtractorRegistry>,
    config: AnalysisConfig,
}

impl StatsService {
    pub fn builder(
        catalog: Arc<dyn EventCatalog>,
        plays: Arc<dyn PlayStream>,
    ) -> StatsServiceBuilder {
        StatsServiceBuilder::new(catalog, plays)
    }

    pub fn provider_name(&self) -> &'static str {
        self.catalog.provider_name()
    }

    /// Seasons the provider knows for the player, ascending, within `range`
    pub async fn seasons_in_range(
        &self,
        player_id: &str,
        range: SeasonRange,
    ) -> Result<Vec<Season>, StatsError> {
        let listed = bounded(
            self.config.fetch_timeout,
            "season list",
            self.catalog.list_seasons(player_id),
        )
        .await?;
        let mut seasons: Vec<Season> = listed
            .into_iter()
            .filter(|season| range.contains(*season))
            .collect();
        seasons.sort_unstable();
        seasons.dedup();
        Ok(seasons)
    }

    #[instrument(skip(self))]
    pub async fn season_extremum(
        &self,
        player_id: &str,
        season: Season,
        kind: StatKind,
    ) -> Result<SeasonExtremumReport, StatsError> {
        let games = self.season_games(player_id, season).await?;
        let (extremum, warnings) = ExtremumFinder::new(&self.registry, kind).find(&games)?;

        debug!(
            games = games.len(),
            value = ?extremum.value,
            tied = extremum.observations.len(),
            "Season extremum found"
        );

        Ok(SeasonExtremumReport {
            season,
            extremum,
            warnings,
        })
    }

    /// Extremum for every season in `range`. Season game logs are fetched
    /// concurrently; a season that fails to load becomes a warning.
    #[instrument(skip(self), fields(run_id = %Uuid::new_v4()))]
    pub async fn extremum_by_season(
        &self,
        player_id: &str,
        range: SeasonRange,
        kind: StatKind,
    ) -> Result<ExtremaReport, StatsError> {
        let seasons = self.seasons_in_range(player_id, range).await?;
        let catalog = &self.catalog;
        let limit = self.config.fetch_timeout;

        let mut logs: Vec<(Season, Result<Vec<GameLogEntry>, ProviderError>)> =
            stream::iter(seasons)
                .map(|season| async move {
                    let log = bounded(limit, "game log", catalog.game_log(player_id, season));
                    (season, log.await)
                })
                .buffer_unordered(self.config.fetch_concurrency.max(1))
                .collect()
                .await;
        logs.sort_by_key(|(season, _)| *season);

        let finder = ExtremumFinder::new(&self.registry, kind);
        let mut report = ExtremaReport::default();

        for (season, log) in logs {
            match log {
                Ok(games) => {
                    let (extremum, warnings) = finder.find(&games)?;
                    report.warnings.extend(warnings);
                    if !extremum.is_empty() {
                        report.extrema.insert(season, extremum);
                    }
                }
                Err(ProviderError::NoSuchSeason { .. }) => {
                    debug!(season, "No games this season, skipping");
                }
                Err(error) => {
                    warn!(season, error = %error, "Season game log unavailable");
                    report.warnings.push(ScanWarning::SeasonUnavailable {
                        season,
                        error: error.to_string(),
                    });
                }
            }
        }

        info!(
            seasons = report.extrema.len(),
            warnings = report.warnings.len(),
            "Extremum by season complete"
        );
        Ok(report)
    }

    #[instrument(skip(self))]
    pub async fn threshold_games(
        &self,
        player_id: &str,
        season: Season,
        kind: StatKind,
        minimum: u32,
    ) -> Result<SeasonThresholdReport, StatsError> {
        let games = self.season_games(player_id, season).await?;
        let (observations, warnings) =
            ExtremumFinder::new(&self.registry, kind).observations(&games)?;

        Ok(SeasonThresholdReport {
            season,
            minimum,
            games: games_at_or_above(&observations, minimum),
            warnings,
        })
    }

    /// Every streak in the season, scanning games in chronological order.
    ///
    /// Flipping `cancel` to true aborts the run with [`StatsError::Cancelled`].
    #[instrument(
        skip(self, rules, cancel),
        fields(
            player_id = %rules.player_id,
            play_type = ?rules.play_type,
            break_type = ?rules.break_type,
            threshold = rules.threshold,
            run_id = %Uuid::new_v4(),
        )
    )]
    pub async fn season_streaks(
        &self,
        season: Season,
        rules: &StreakRules,
        cancel: Option<watch::Receiver<bool>>,
    ) -> Result<SeasonStreaks, StatsError> {
        let events = self.season_events(&rules.player_id, season).await?;
        if events.is_empty() {
            return Ok(SeasonStreaks::empty(season));
        }

        info!(events = events.len(), "Scanning season for streaks");

        let feed = PlayFeed::spawn(Arc::clone(&self.plays), events, &self.config);
        let scan = StreakScan::new(rules, self.config.gap_policy, season);
        let result = feed.drive(scan, cancel).await?;

        info!(
            streaks = result.streaks.len(),
            longest = result.longest().map(|s| s.length).unwrap_or_default(),
            warnings = result.warnings.len(),
            "Streak scan complete"
        );
        Ok(result)
    }

    #[instrument(skip(self), fields(run_id = %Uuid::new_v4()))]
    pub async fn period_scoring(
        &self,
        player_id: &str,
        season: Season,
    ) -> Result<SeasonPeriodScoring, StatsError> {
        let events = self.season_events(player_id, season).await?;
        let mut feed = PlayFeed::spawn(Arc::clone(&self.plays), events, &self.config);

        let mut scored = Vec::new();
        let mut warnings = Vec::new();

        while let Some(FetchedPage { event_ref, result }) = feed.next().await {
            match result {
                Ok(page) => {
                    if page.malformed > 0 {
                        warnings.push(ScanWarning::MalformedPlays {
                            event_ref: event_ref.clone(),
                            skipped: page.malformed,
                        });
                    }
                    scored.push(period_points(&event_ref, &page.plays, player_id));
                }
                Err(error) => {
                    warn!(
                        event_ref = %event_ref,
                        error = %error,
                        "Skipping game for period scoring"
                    );
                    warnings.push(ScanWarning::FetchFailed {
                        event_ref,
                        transient: error.is_transient(),
                        error: error.to_string(),
                    });
                }
            }
        }

        let best = highest_period(&scored);
        Ok(SeasonPeriodScoring {
            season,
            events: scored,
            best,
            warnings,
        })
    }

    /// Compares season highs from this service's provider (primary) with
    /// those from `secondary`, for the same player under each provider's id.
    #[instrument(skip(self, secondary), fields(secondary_provider = secondary.provider_name()))]
    pub async fn reconcile_with(
        &self,
        secondary: &StatsService,
        primary_id: &str,
        secondary_id: &str,
        range: SeasonRange,
        kind: StatKind,
    ) -> Result<ReconciliationReport, StatsError> {
        let (primary, other) = tokio::join!(
            self.extremum_by_season(primary_id, range, kind),
            secondary.extremum_by_season(secondary_id, range, kind),
        );
        let (primary, other) = (primary?, other?);

        let entries = reconcile(&primary.extrema, &other.extrema, range);
        let missing = missing_seasons(&primary.extrema, &other.extrema, range);

        let mismatches = entries
            .iter()
            .filter(|e| e.status == MatchStatus::Mismatch)
            .count();
        info!(
            entries = entries.len(),
            mismatches,
            missing_seasons = missing.len(),
            "Reconciliation complete"
        );

        let mut warnings = primary.warnings;
        warnings.extend(other.warnings);

        Ok(ReconciliationReport {
            entries,
            missing_seasons: missing,
            warnings,
        })
    }

    async fn season_games(
        &self,
        player_id: &str,
        season: Season,
    ) -> Result<Vec<GameLogEntry>, StatsError> {
        let log = self.catalog.game_log(player_id, season);
        match bounded(self.config.fetch_timeout, "game log", log).await {
            Ok(games) => Ok(games),
            Err(ProviderError::NoSuchSeason { .. }) => {
                debug!(player_id, season, "No games this season");
                Ok(Vec::new())
            }
            Err(error) => Err(error.into()),
        }
    }

    async fn season_events(
        &self,
        player_id: &str,
        season: Season,
    ) -> Result<Vec<EventRef>, StatsError> {
        let events = self.catalog.list_events(player_id, season);
        match bounded(self.config.fetch_timeout, "event list", events).await {
            Ok(events) => Ok(events),
            Err(ProviderError::NoSuchSeason { .. }) => {
                debug!(player_id, season, "No events this season");
                Ok(Vec::new())
            }
            Err(error) => Err(error.into()),
        }
    }
}

/// Runs a catalog call under `limit`. An elapsed call is a transient
/// provider failure, like a play fetch that times out.
async fn bounded<T, F>(limit: Duration, what: &str, call: F) -> Result<T, ProviderError>
where
    F: Future<Output = Result<T, ProviderError>>,
{
    match timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => {
            warn!(timeout_ms = limit.as_millis() as u64, "Catalog {} timed out", what);
            Err(ProviderError::unavailable(format!(
                "{} timed out after {}ms",
                what,
                limit.as_millis()
            )))
        }
    }
}

pub struct StatsServiceBuilder {
    catalog: Arc<dyn EventCatalog>,
    plays: Arc<dyn PlayStream>,
    registry: ExtractorRegistry,
    config: AnalysisConfig,
}

impl StatsServiceBuilder {
    fn new(catalog: Arc<dyn EventCatalog>, plays: Arc<dyn PlayStream>) -> Self {
        Self {
            catalog,
            plays,
            registry: ExtractorRegistry::standard(),
            config: AnalysisConfig::default(),
        }
    }

    pub fn with_registry(mut self, registry: ExtractorRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_config(mut self, config: AnalysisConfig) -> Self {
        self.config = config;
        self
    }

    /// Fails if the registry is missing an extractor for any stat kind
    pub fn build(self) -> Result<StatsService, StatsError> {
        self.registry.validate()?;
        Ok(StatsService {
            catalog: self.catalog,
            plays: self.plays,
            registry: Arc::new(self.registry),
            config: self.config,
        })
    }
}
