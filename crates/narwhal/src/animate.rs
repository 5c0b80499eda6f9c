//! Frame-driven interpolation between two position sets.
//!
//! The host calls [`Animator::tick`] once per display refresh. Each tick writes interpolated
//! positions into the host's live map. One animation runs per animator; starting another
//! cancels the current one without firing its completion callback.

use crate::geometry::lerp;
use crate::graph::{Id, Point, PositionMap};
use futures::channel::oneshot;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Easing {
    Linear,
    EaseInQuad,
    EaseOutQuad,
    #[default]
    EaseInOutQuad,
    EaseInCubic,
    EaseOutCubic,
    EaseInOutCubic,
    EaseInElastic,
    EaseOutElastic,
}

impl Easing {
    /// Maps linear progress in `[0, 1]` to eased progress. Both ends are exact.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        if t == 0.0 || t == 1.0 {
            return t;
        }
        const C4: f64 = std::f64::consts::TAU / 3.0;
        match self {
            Easing::Linear => t,
            Easing::EaseInQuad => t * t,
            Easing::EaseOutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::EaseInOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Easing::EaseInCubic => t * t * t,
            Easing::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            Easing::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Easing::EaseInElastic => {
                -(2f64.powf(10.0 * t - 10.0)) * ((10.0 * t - 10.75) * C4).sin()
            }
            Easing::EaseOutElastic => 2f64.powf(-10.0 * t) * ((10.0 * t - 0.75) * C4).sin() + 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transition {
    pub id: Id,
    pub from_x: f64,
    pub from_y: f64,
    pub to_x: f64,
    pub to_y: f64,
}

impl Transition {
    pub fn new(id: impl Into<Id>, from: Point, to: Point) -> Self {
        Self {
            id: id.into(),
            from_x: from.x,
            from_y: from.y,
            to_x: to.x,
            to_y: to.y,
        }
    }

    /// One transition per node in `to`. Nodes missing from `from` start at their target.
    pub fn between(from: &PositionMap, to: &PositionMap) -> Vec<Transition> {
        to.iter()
            .map(|(id, &target)| {
                let origin = from.get(id).copied().unwrap_or(target);
                Transition::new(id.clone(), origin, target)
            })
            .collect()
    }

    pub fn at(&self, eased: f64) -> Point {
        if eased == 1.0 {
            return Point::new(self.to_x, self.to_y);
        }
        Point::new(
            lerp(self.from_x, self.to_x, eased),
            lerp(self.from_y, self.to_y, eased),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnimationOptions {
    pub duration: Duration,
    pub easing: Easing,
}

impl Default for AnimationOptions {
    fn default() -> Self {
        Self {
            duration: Duration::from_millis(500),
            easing: Easing::EaseInOutQuad,
        }
    }
}

pub type FrameCallback = Box<dyn FnMut(f64, &PositionMap)>;
pub type CompleteCallback = Box<dyn FnOnce()>;

#[derive(Default)]
pub struct AnimationCallbacks {
    /// Called after every frame with the linear progress.
    pub on_frame: Option<FrameCallback>,
    pub on_complete: Option<CompleteCallback>,
}

impl fmt::Debug for AnimationCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationCallbacks")
            .field("on_frame", &self.on_frame.is_some())
            .field("on_complete", &self.on_complete.is_some())
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationOutcome {
    Completed,
    Cancelled,
}

/// Resolves when the animation it was returned for completes or is cancelled.
#[derive(Debug)]
pub struct AnimationDone {
    rx: oneshot::Receiver<()>,
}

impl Future for AnimationDone {
    type Output = AnimationOutcome;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.rx).poll(cx) {
            Poll::Ready(Ok(())) => Poll::Ready(AnimationOutcome::Completed),
            Poll::Ready(Err(oneshot::Canceled)) => Poll::Ready(AnimationOutcome::Cancelled),
            Poll::Pending => Poll::Pending,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameStatus {
    /// No animation is active.
    Idle,
    Running { progress: f64, eased: f64 },
    /// This tick wrote the final frame.
    Finished,
}

#[derive(Debug)]
struct ActiveAnimation {
    transitions: Vec<Transition>,
    options: AnimationOptions,
    started: Instant,
    callbacks: AnimationCallbacks,
    done: oneshot::Sender<()>,
}

#[derive(Debug, Default)]
pub struct Animator {
    active: Option<ActiveAnimation>,
}

impl Animator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts animating from `now`, cancelling any animation in flight.
    pub fn start(
        &mut self,
        transitions: Vec<Transition>,
        options: AnimationOptions,
        now: Instant,
        callbacks: AnimationCallbacks,
    ) -> AnimationDone {
        if self.cancel() {
            tracing::trace!("animation replaced before completion");
        }
        let (done, rx) = oneshot::channel();
        self.active = Some(ActiveAnimation {
            transitions,
            options,
            started: now,
            callbacks,
            done,
        });
        AnimationDone { rx }
    }

    /// Stops scheduling frames. Returns whether an animation was active.
    pub fn cancel(&mut self) -> bool {
        // Dropping the sender resolves the pending `AnimationDone` as cancelled.
        self.active.take().is_some()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Advances the active animation to `now` and writes its positions into `positions`.
    pub fn tick(&mut self, now: Instant, positions: &mut PositionMap) -> FrameStatus {
        let Some(active) = self.active.as_mut() else {
            return FrameStatus::Idle;
        };

        let duration = active.options.duration;
        let progress = if duration.is_zero() {
            1.0
        } else {
            let elapsed = now.saturating_duration_since(active.started);
            (elapsed.as_secs_f64() / duration.as_secs_f64()).min(1.0)
        };
        let eased = active.options.easing.apply(progress);

        for t in &active.transitions {
            positions.insert(t.id.clone(), t.at(eased));
        }
        if let Some(on_frame) = active.callbacks.on_frame.as_mut() {
            on_frame(progress, positions);
        }

        if progress < 1.0 {
            return FrameStatus::Running { progress, eased };
        }

        if let Some(finished) = self.active.take() {
            if let Some(on_complete) = finished.callbacks.on_complete {
                on_complete();
            }
            // The caller may have dropped the `AnimationDone`; nothing to notify then.
            let _ = finished.done.send(());
        }
        FrameStatus::Finished
    }
}
