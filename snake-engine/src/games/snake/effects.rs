use std::time::Duration;

use super::types::{Consumable, PickupKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

pub const DEFAULT_HEAD_COLOR: Rgb = Rgb::new(0x77, 0x77, 0x77);
pub const DEFAULT_BODY_COLOR: Rgb = Rgb::new(0x33, 0x33, 0x33);

pub const COLOR_CYCLE_PALETTE: [Rgb; 6] = [
    Rgb::new(0xff, 0x3b, 0x30),
    Rgb::new(0xff, 0x95, 0x00),
    Rgb::new(0xff, 0xcc, 0x00),
    Rgb::new(0x34, 0xc7, 0x59),
    Rgb::new(0x00, 0x7a, 0xff),
    Rgb::new(0xaf, 0x52, 0xde),
];
pub const COLOR_CYCLE_STEP: Duration = Duration::from_millis(120);

/// Head/body flash colors for the most recent thing eaten.
fn flash_colors(consumable: Consumable) -> (Rgb, Rgb) {
    match consumable {
        Consumable::Food => (Rgb::new(0xb8, 0xf5, 0x8a), Rgb::new(0x5e, 0x9c, 0x3a)),
        Consumable::Pickup(PickupKind::Bottle) => (Rgb::new(0xff, 0xc1, 0x4d), Rgb::new(0xb0, 0x6a, 0x00)),
        Consumable::Pickup(PickupKind::Pill) => (Rgb::new(0xf0, 0x8c, 0xff), Rgb::new(0x9c, 0x27, 0xb0)),
        Consumable::Pickup(PickupKind::Joint) => (Rgb::new(0x7d, 0xff, 0x9a), Rgb::new(0x2e, 0x7d, 0x32)),
    }
}

/// Palette color of `segment_index` at `elapsed` into the color cycle. The
/// palette rotates one step per `COLOR_CYCLE_STEP`.
pub fn color_cycle(segment_index: usize, elapsed: Duration) -> Rgb {
    let step = (elapsed.as_millis() / COLOR_CYCLE_STEP.as_millis()) as usize;
    COLOR_CYCLE_PALETTE[(segment_index + step) % COLOR_CYCLE_PALETTE.len()]
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SnakeVisuals {
    pub head: Rgb,
    /// One color per non-head segment.
    pub body: Vec<Rgb>,
    pub glow: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Stamped<T> {
    value: T,
    at: Duration,
}

/// Transient feedback after eating: latest-event flash, "+N" popup and the
/// Pill color cycle. Everything is stamped with the game clock and derived
/// from elapsed time on read.
#[derive(Clone, Debug, Default)]
pub struct FeedbackEffects {
    latest_event: Option<Stamped<Consumable>>,
    score_popup: Option<Stamped<u32>>,
    color_cycle_since: Option<Duration>,
}

impl FeedbackEffects {
    pub fn record(&mut self, consumable: Consumable, at: Duration) {
        self.latest_event = Some(Stamped { value: consumable, at });
        self.score_popup = Some(Stamped {
            value: consumable.points(),
            at,
        });
        if consumable == Consumable::Pickup(PickupKind::Pill) {
            self.color_cycle_since = Some(at);
        }
    }

    pub fn latest_event(&self, now: Duration, flash: Duration) -> Option<Consumable> {
        self.latest_event
            .filter(|e| now < e.at + flash)
            .map(|e| e.value)
    }

    pub fn score_popup(&self, now: Duration, flash: Duration) -> Option<u32> {
        self.score_popup
            .filter(|p| now < p.at + flash)
            .map(|p| p.value)
    }

    pub fn visuals(&self, now: Duration, segments: usize, flash: Duration, cycle: Duration) -> SnakeVisuals {
        let body_len = segments.saturating_sub(1);

        if let Some(since) = self.color_cycle_since
            && now < since + cycle
        {
            let elapsed = now.saturating_sub(since);
            return SnakeVisuals {
                head: color_cycle(0, elapsed),
                body: (1..segments).map(|i| color_cycle(i, elapsed)).collect(),
                glow: self.latest_event(now, flash) == Some(Consumable::Pickup(PickupKind::Joint)),
            };
        }

        match self.latest_event(now, flash) {
            Some(event) => {
                let (head, body) = flash_colors(event);
                SnakeVisuals {
                    head,
                    body: vec![body; body_len],
                    glow: event == Consumable::Pickup(PickupKind::Joint),
                }
            }
            None => SnakeVisuals {
                head: DEFAULT_HEAD_COLOR,
                body: vec![DEFAULT_BODY_COLOR; body_len],
                glow: false,
            },
        }
    }

    /// Next palette step while the color cycle runs, so the host can repaint.
    pub fn next_color_step(&self, now: Duration, cycle: Duration) -> Option<Duration> {
        let since = self.color_cycle_since.filter(|since| now < *since + cycle)?;
        let step = COLOR_CYCLE_STEP.as_millis() as u64;
        let elapsed = now.saturating_sub(since).as_millis() as u64;
        Some(since + Duration::from_millis((elapsed / step + 1) * step))
    }

    /// Drops effects whose time is up.
    pub fn expire(&mut self, now: Duration, flash: Duration, cycle: Duration) {
        if self.latest_event.is_some_and(|e| now >= e.at + flash) {
            self.latest_event = None;
        }
        if self.score_popup.is_some_and(|p| now >= p.at + flash) {
            self.score_popup = None;
        }
        if self.color_cycle_since.is_some_and(|since| now >= since + cycle) {
            self.color_cycle_since = None;
        }
    }

    pub fn next_expiry(&self, flash: Duration, cycle: Duration) -> Option<Duration> {
        [
            self.latest_event.map(|e| e.at + flash),
            self.score_popup.map(|p| p.at + flash),
            self.color_cycle_since.map(|since| since + cycle),
        ]
        .into_iter()
        .flatten()
        .min()
    }

    pub fn shift(&mut self, by: Duration) {
        if let Some(e) = self.latest_event.as_mut() {
            e.at += by;
        }
        if let Some(p) = self.score_popup.as_mut() {
            p.at += by;
        }
        if let Some(since) = self.color_cycle_since.as_mut() {
            *since += by;
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        self.latest_event.is_none() && self.score_popup.is_none() && self.color_cycle_since.is_none()
    }
}
