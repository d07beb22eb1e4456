//! Background poller publishing timetable snapshots on a watch channel.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::model::Activity;
use crate::service::TimetableService;

/// Interval between timetable refreshes.
pub const DEFAULT_POLL_PERIOD: Duration = Duration::from_secs(300);

/// Periodically refreshes the timetable and publishes each successful
/// snapshot.
///
/// The first refresh happens immediately on start. Failed refreshes are
/// logged and leave the last published snapshot in place, so subscribers
/// always see the most recent good data. Later snapshots simply overwrite
/// earlier ones on the channel.
pub struct SchedulePoller {
    task: JoinHandle<()>,
    updates: watch::Receiver<Arc<[Activity]>>,
}

impl SchedulePoller {
    /// Spawn the polling task with the given refresh period.
    ///
    /// Subscribers obtain snapshots through [`Self::updates`]; the channel
    /// starts out holding an empty list until the first refresh lands.
    #[must_use]
    pub fn start(service: Arc<TimetableService>, period: Duration) -> Self {
        let (sender, updates) = watch::channel::<Arc<[Activity]>>(Vec::new().into());

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                match service.refresh().await {
                    Ok(activities) => {
                        if sender.send(activities.into()).is_err() {
                            // All receivers are gone, nothing left to do.
                            break;
                        }
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, "timetable refresh failed, keeping previous snapshot");
                    }
                }
            }
        });

        Self { task, updates }
    }

    /// Subscribe to published timetable snapshots.
    #[must_use]
    pub fn updates(&self) -> watch::Receiver<Arc<[Activity]>> {
        self.updates.clone()
    }

    /// Stop polling. No snapshot is published after this returns.
    pub fn stop(self) {
        self.task.abort();
    }
}

impl Drop for SchedulePoller {
    fn drop(&mut self) {
        self.task.abort();
    }
}
