use anyhow::{Context, Result};
use chrono::{DateTime, TimeZone};
use cron::Schedule;
use log::{info, warn};
use std::future::Future;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerState {
    Idle,
    Due,
    Running,
}

/// Calendar trigger for the digest run. Time is passed in on every transition,
/// so the machine never reads the clock itself.
pub struct DigestTrigger<Tz: TimeZone> {
    schedule: Schedule,
    state: TriggerState,
    next_run: Option<DateTime<Tz>>,
}

impl<Tz: TimeZone> DigestTrigger<Tz> {
    pub fn new(expression: &str, now: &DateTime<Tz>) -> Result<Self> {
        let schedule = Schedule::from_str(expression)
            .with_context(|| format!("Invalid digest schedule '{expression}'"))?;
        let next_run = schedule.after(now).next();

        Ok(Self {
            schedule,
            state: TriggerState::Idle,
            next_run,
        })
    }

    pub fn state(&self) -> TriggerState {
        self.state
    }

    pub fn next_run(&self) -> Option<&DateTime<Tz>> {
        self.next_run.as_ref()
    }

    /// Idle becomes Due once the next scheduled time has passed.
    pub fn poll(&mut self, now: &DateTime<Tz>) -> TriggerState {
        if self.state == TriggerState::Idle {
            if let Some(next_run) = &self.next_run {
                if next_run <= now {
                    self.state = TriggerState::Due;
                }
            }
        }
        self.state
    }

    /// Due becomes Running. Returns false in any other state.
    pub fn start(&mut self) -> bool {
        if self.state != TriggerState::Due {
            return false;
        }
        self.state = TriggerState::Running;
        true
    }

    /// Running goes back to Idle, armed for the first slot after `now`.
    pub fn finish(&mut self, now: &DateTime<Tz>) {
        if self.state != TriggerState::Running {
            return;
        }
        self.next_run = self.schedule.after(now).next();
        self.state = TriggerState::Idle;
    }
}

/// Poll the trigger every `poll_interval` until `shutdown` resolves. A run that has
/// started always completes; shutdown is only observed between polls.
pub async fn run_scheduler<Tz, C, J, Fut, S>(
    mut trigger: DigestTrigger<Tz>,
    poll_interval: Duration,
    clock: C,
    mut job: J,
    shutdown: S,
) where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
    C: Fn() -> DateTime<Tz>,
    J: FnMut() -> Fut,
    Fut: Future<Output = ()>,
    S: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    match trigger.next_run() {
        Some(next_run) => info!("Scheduler started - next digest run at {next_run}"),
        None => warn!("Scheduler started but the schedule has no upcoming runs"),
    }

    loop {
        if trigger.poll(&clock()) == TriggerState::Due && trigger.start() {
            info!("Scheduled digest run is due");
            job().await;
            trigger.finish(&clock());
            if let Some(next_run) = trigger.next_run() {
                info!("Next digest run at {next_run}");
            }
        }

        tokio::select! {
            _ = &mut shutdown => break,
            _ = tokio::time::sleep(poll_interval) => {}
        }
    }

    info!("Scheduler stopped");
}
