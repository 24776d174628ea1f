#![allow(dead_code)]

use anyhow::{bail, Result};
use chrono::{DateTime, Local, TimeZone};
use parking_lot::Mutex;
use pomodoro_grande::db::store::Store;
use pomodoro_grande::libs::blocker::RuleSet;
use pomodoro_grande::libs::engine::Engine;
use pomodoro_grande::libs::host::{Audio, Badge, Host, Notification, Notifier, RuleSink};
use pomodoro_grande::libs::scheduler::{TickId, Ticker};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;
use test_context::TestContext;

/// Ticker driven by hand. Clones share state, so a test keeps one clone
/// while the engine owns another.
#[derive(Clone, Default)]
pub struct ManualTicker {
    inner: Arc<Mutex<TickerLog>>,
}

#[derive(Default)]
struct TickerLog {
    next_id: u64,
    active: BTreeSet<TickId>,
    scheduled: Vec<(TickId, Duration)>,
    cancelled: Vec<TickId>,
}

impl ManualTicker {
    pub fn active(&self) -> Vec<TickId> {
        self.inner.lock().active.iter().copied().collect()
    }

    pub fn scheduled(&self) -> Vec<(TickId, Duration)> {
        self.inner.lock().scheduled.clone()
    }

    pub fn cancelled(&self) -> Vec<TickId> {
        self.inner.lock().cancelled.clone()
    }
}

impl Ticker for ManualTicker {
    fn schedule_every(&mut self, period: Duration) -> TickId {
        let mut log = self.inner.lock();
        log.next_id += 1;
        let id = TickId(log.next_id);
        log.active.insert(id);
        log.scheduled.push((id, period));
        id
    }

    fn cancel(&mut self, id: TickId) {
        let mut log = self.inner.lock();
        if log.active.remove(&id) {
            log.cancelled.push(id);
        }
    }
}

/// Delivers one tick from every active tick source, `seconds` times.
pub fn advance(engine: &mut Engine, ticker: &ManualTicker, seconds: u64) {
    for _ in 0..seconds {
        for id in ticker.active() {
            engine.tick(id);
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Sound(String, f64),
    Music(String, f64, bool),
    StopMusic,
    Notification(&'static str, &'static str),
    BadgeText(String),
    BadgeColor(String),
    SetRules(RuleSet),
    ClearRules,
}

/// Records every collaborator call. With `failing` set every call also
/// returns an error after being recorded.
#[derive(Clone, Default)]
pub struct Recorder {
    events: Arc<Mutex<Vec<Event>>>,
    failing: bool,
}

impl Recorder {
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Default::default()
        }
    }

    pub fn host(&self) -> Host {
        Host {
            audio: Box::new(self.clone()),
            notifier: Box::new(self.clone()),
            badge: Box::new(self.clone()),
            rules: Box::new(self.clone()),
        }
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().clone()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }

    pub fn notifications(&self) -> Vec<&'static str> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Event::Notification(title, _) => Some(title),
                _ => None,
            })
            .collect()
    }

    pub fn last_badge_text(&self) -> Option<String> {
        self.events().into_iter().rev().find_map(|event| match event {
            Event::BadgeText(text) => Some(text),
            _ => None,
        })
    }

    pub fn last_badge_color(&self) -> Option<String> {
        self.events().into_iter().rev().find_map(|event| match event {
            Event::BadgeColor(color) => Some(color),
            _ => None,
        })
    }

    /// The rules installed after the last rule call, `None` when cleared.
    pub fn installed_rules(&self) -> Option<RuleSet> {
        self.events().into_iter().rev().find_map(|event| match event {
            Event::SetRules(rules) => Some(Some(rules)),
            Event::ClearRules => Some(None),
            _ => None,
        })?
    }

    pub fn count(&self, wanted: &Event) -> usize {
        self.events().iter().filter(|event| *event == wanted).count()
    }

    fn push(&self, event: Event) -> Result<()> {
        self.events.lock().push(event);
        if self.failing {
            bail!("collaborator unavailable");
        }
        Ok(())
    }
}

impl Audio for Recorder {
    fn play_sound(&mut self, sound: &str, volume: f64) -> Result<()> {
        self.push(Event::Sound(sound.to_string(), volume))
    }

    fn play_music(&mut self, music: &str, volume: f64, looped: bool) -> Result<()> {
        self.push(Event::Music(music.to_string(), volume, looped))
    }

    fn stop_music(&mut self) -> Result<()> {
        self.push(Event::StopMusic)
    }
}

impl Notifier for Recorder {
    fn show(&mut self, notification: &Notification) -> Result<()> {
        self.push(Event::Notification(notification.title, notification.message))
    }
}

impl Badge for Recorder {
    fn set_text(&mut self, text: &str) -> Result<()> {
        self.push(Event::BadgeText(text.to_string()))
    }

    fn set_color(&mut self, color: &str) -> Result<()> {
        self.push(Event::BadgeColor(color.to_string()))
    }
}

impl RuleSink for Recorder {
    fn set_rules(&mut self, rules: &RuleSet) -> Result<()> {
        self.push(Event::SetRules(rules.clone()))
    }

    fn clear_rules(&mut self) -> Result<()> {
        self.push(Event::ClearRules)
    }
}

/// Fixed clock for history records: 2025-03-10 09:30 local time.
pub fn fixed_clock() -> DateTime<Local> {
    Local.with_ymd_and_hms(2025, 3, 10, 9, 30, 0).unwrap()
}

/// An engine on a fresh in-memory store with a manual ticker and recording
/// collaborators.
pub struct Harness {
    pub store: Store,
    pub ticker: ManualTicker,
    pub recorder: Recorder,
    pub engine: Engine,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_store(Store::in_memory().unwrap())
    }

    pub fn with_store(store: Store) -> Self {
        Self::with_parts(store, Recorder::default())
    }

    pub fn with_parts(store: Store, recorder: Recorder) -> Self {
        let ticker = ManualTicker::default();
        let engine = Engine::with_clock(store.clone(), Box::new(ticker.clone()), recorder.host(), fixed_clock);
        Self {
            store,
            ticker,
            recorder,
            engine,
        }
    }

    pub fn advance(&mut self, seconds: u64) {
        advance(&mut self.engine, &self.ticker, seconds);
    }
}

impl TestContext for Harness {
    fn setup() -> Self {
        Harness::new()
    }
}
