use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, info};

use super::{AnalysisConfig, SeasonStreaks, StatsError, StreakScan};
use crate::provider::{EventRef, PlayPage, PlayStream, ProviderError};

/// One event's play data, or why it could not be had
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedPage {
    pub event_ref: EventRef,
    pub result: Result<PlayPage, ProviderError>,
}

/// Receiving half of a season's page feed, plus the producer task feeding it.
///
/// Pages arrive in the same order as the events passed to [`PlayFeed::spawn`];
/// fetches overlap but results are never reordered. Dropping the feed stops
/// the producer.
pub struct PlayFeed {
    receiver: mpsc::Receiver<FetchedPage>,
    producer: JoinHandle<()>,
}

impl PlayFeed {
    pub fn spawn(
        plays: Arc<dyn PlayStream>,
        events: Vec<EventRef>,
        config: &AnalysisConfig,
    ) -> Self {
        let (sender, receiver) = mpsc::channel(config.channel_capacity.max(1));
        let concurrency = config.fetch_concurrency.max(1);
        let fetch_timeout = config.fetch_timeout;
        let event_count = events.len();

        let producer = tokio::spawn(async move {
            let mut pages = stream::iter(events)
                .map(|event_ref| {
                    let plays = Arc::clone(&plays);
                    async move {
                        let fetch = timeout(fetch_timeout, plays.get_plays(&event_ref));
                        let result = match fetch.await {
                            Ok(result) => result,
                            Err(_elapsed) => Err(ProviderError::Timeout {
                                event_ref: event_ref.clone(),
                            }),
                        };
                        FetchedPage { event_ref, result }
                    }
                })
                .buffered(concurrency);

            while let Some(page) = pages.next().await {
                if sender.send(page).await.is_err() {
                    debug!("Page consumer went away, stopping fetches");
                    return;
                }
            }

            debug!(event_count, "All event pages fetched");
        });

        Self { receiver, producer }
    }

    pub async fn next(&mut self) -> Option<FetchedPage> {
        self.receiver.recv().await
    }

    /// Drains the feed into `scan`, stopping early if `cancel` flips to true.
    ///
    /// On cancellation the scan is dropped unfinished so no partial run is
    /// ever reported.
    pub async fn drive(
        mut self,
        mut scan: StreakScan<'_>,
        cancel: Option<watch::Receiver<bool>>,
    ) -> Result<SeasonStreaks, StatsError> {
        let mut cancel = cancel;

        if cancel.as_ref().map(|c| *c.borrow()).unwrap_or(false) {
            return Err(self.abort());
        }

        loop {
            let step = match cancel.as_mut() {
                Some(signal) => tokio::select! {
                    biased;
                    changed = signal.changed() => Step::Signal(changed.is_ok()),
                    page = self.receiver.recv() => Step::Page(page),
                },
                None => Step::Page(self.receiver.recv().await),
            };

            match step {
                Step::Signal(true) => {
                    if cancel.as_ref().map(|c| *c.borrow()).unwrap_or(false) {
                        return Err(self.abort());
                    }
                }
                // Sender gone: nobody can cancel any more
                Step::Signal(false) => cancel = None,
                Step::Page(Some(page)) => scan.apply(page),
                Step::Page(None) => break,
            }
        }

        Ok(scan.finish())
    }

    fn abort(self) -> StatsError {
        info!("Season scan cancelled, discarding partial state");
        self.producer.abort();
        StatsError::Cancelled
    }
}

impl Drop for PlayFeed {
    fn drop(&mut self) {
        self.producer.abort();
    }
}

enum Step {
    Signal(bool),
    Page(Option<FetchedPage>),
}
