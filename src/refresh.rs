//! Reference model of the browser refresh runtime.
//!
//! The loop owns the binding table (node → timer) and is the only thing that
//! mutates it. Timers come from the host through [`Timers`]; when one fires the
//! host calls [`RefreshLoop::tick`] with the current wall-clock time.
//! `static/dynamic_date_difference_token.js` implements the same state machine
//! for the browser; keep both in sync.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::config;
use crate::token::{FormatMode, difference};

pub const ATTR_TOKEN_TYPE: &str = "data-token-type-id";
pub const ATTR_TARGET: &str = "data-target-datetime";
pub const ATTR_FORMAT_MODE: &str = "data-format-mode";
pub const ATTR_SPEED: &str = "data-speed-ms";

pub type NodeId = u64;

/// A text-bearing markup element as the loop sees it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenNode {
    pub id: NodeId,
    pub attributes: BTreeMap<String, String>,
    pub text: String,
}

impl TokenNode {
    pub fn new(id: NodeId) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    pub fn with_attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.attributes.insert(name.to_string(), value.into());
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    fn is_eligible(&self) -> bool {
        self.attr(ATTR_TOKEN_TYPE) == Some(config::TOKEN_TYPE_ID)
    }
}

/// Repeating timers provided by the host environment.
pub trait Timers {
    type Handle;

    fn set_interval(&mut self, node: NodeId, every: Duration) -> Self::Handle;

    fn clear_interval(&mut self, handle: Self::Handle);
}

enum TimerState<H> {
    Active(H),
    Paused,
}

struct Binding<H> {
    target: String,
    mode: FormatMode,
    every: Duration,
    timer: TimerState<H>,
}

pub struct RefreshLoop<T: Timers> {
    timers: T,
    bindings: HashMap<NodeId, Binding<T::Handle>>,
    hidden: bool,
}

impl<T: Timers> RefreshLoop<T> {
    pub fn new(timers: T) -> Self {
        Self {
            timers,
            bindings: HashMap::new(),
            hidden: false,
        }
    }

    /// Bind every eligible node that is not bound yet, render it immediately
    /// and start its timer. Returns how many nodes were newly bound.
    pub fn attach(&mut self, nodes: &mut [TokenNode], now: DateTime<Utc>) -> usize {
        let mut bound = 0;
        for node in nodes.iter_mut() {
            if !node.is_eligible() || self.bindings.contains_key(&node.id) {
                continue;
            }
            let target = node.attr(ATTR_TARGET).unwrap_or_default().to_string();
            let mode: FormatMode = node
                .attr(ATTR_FORMAT_MODE)
                .and_then(|m| m.parse().ok())
                .unwrap_or_default();
            let every = parse_speed(node.attr(ATTR_SPEED));

            node.text = difference::render(&target, now, mode);

            let timer = if self.hidden {
                TimerState::Paused
            } else {
                TimerState::Active(self.timers.set_interval(node.id, every))
            };
            self.bindings.insert(
                node.id,
                Binding {
                    target,
                    mode,
                    every,
                    timer,
                },
            );
            bound += 1;
        }
        bound
    }

    /// Recompute one bound node against `now`. Unbound nodes are left alone.
    pub fn tick(&self, node: &mut TokenNode, now: DateTime<Utc>) -> bool {
        let Some(binding) = self.bindings.get(&node.id) else {
            return false;
        };
        node.text = difference::render(&binding.target, now, binding.mode);
        true
    }

    /// Page visibility changed. Hidden pauses every timer, visible restarts
    /// them at their original interval. Repeats of the current state do nothing.
    pub fn set_hidden(&mut self, hidden: bool) {
        if self.hidden == hidden {
            return;
        }
        self.hidden = hidden;
        for (&id, binding) in self.bindings.iter_mut() {
            let timer = std::mem::replace(&mut binding.timer, TimerState::Paused);
            binding.timer = match (timer, hidden) {
                (TimerState::Active(handle), true) => {
                    self.timers.clear_interval(handle);
                    TimerState::Paused
                }
                (TimerState::Paused, false) => {
                    TimerState::Active(self.timers.set_interval(id, binding.every))
                }
                (timer, _) => timer,
            };
        }
    }

    /// Cancel timers for the given nodes and forget them. Returns how many
    /// bindings were released.
    pub fn detach(&mut self, nodes: &[TokenNode]) -> usize {
        let mut released = 0;
        for node in nodes {
            let Some(binding) = self.bindings.remove(&node.id) else {
                continue;
            };
            if let TimerState::Active(handle) = binding.timer {
                self.timers.clear_interval(handle);
            }
            released += 1;
        }
        released
    }

    pub fn is_bound(&self, id: NodeId) -> bool {
        self.bindings.contains_key(&id)
    }

    pub fn active_timers(&self) -> usize {
        self.bindings
            .values()
            .filter(|b| matches!(b.timer, TimerState::Active(_)))
            .count()
    }

    pub fn timers(&self) -> &T {
        &self.timers
    }
}

/// Refresh interval from the speed attribute. Anything but an integer in
/// `1..=MAX_REFRESH_MS` gives the default.
pub fn parse_speed(raw: Option<&str>) -> Duration {
    let ms = raw
        .and_then(|s| s.trim().parse::<u32>().ok())
        .filter(|ms| (1..=config::MAX_REFRESH_MS).contains(ms))
        .unwrap_or(config::DEFAULT_REFRESH_MS);
    Duration::from_millis(ms.into())
}
