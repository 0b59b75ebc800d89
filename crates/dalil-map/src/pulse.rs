//! Proximity pulse around the viewer.
//!
//! Three concentric rings share one three-step phase. The ring whose index
//! equals the phase is drawn at high opacity, the ring that just had it at
//! medium and the remaining ring at low, so the bright band travels outward
//! with O(1) state.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use dalil_core::{GeoPoint, UserLocation};
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::error::MapError;

const CYCLE: u8 = 3;

/// Number of rings and of steps in the cycle.
pub const RING_COUNT: usize = CYCLE as usize;

/// Ring radius as a multiple of the selected search radius.
pub const RING_SCALES: [f64; RING_COUNT] = [1.0, 1.15, 1.30];
const RING_WEIGHTS: [f64; RING_COUNT] = [2.0, 1.5, 1.0];
const RING_STROKE_OPACITY: [f64; RING_COUNT] = [0.6, 0.5, 0.4];

const RING_COLOR_LIGHT: &str = "#3b82f6";
const RING_COLOR_DARK: &str = "#60a5fa";

/// Current step of the pulse cycle, always in `0..3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PulsePhase(u8);

impl PulsePhase {
    #[must_use]
    pub fn new(step: u8) -> Self {
        Self(step % CYCLE)
    }

    #[must_use]
    pub fn get(self) -> u8 {
        self.0
    }

    #[must_use]
    pub fn next(self) -> Self {
        Self::new(self.0 + 1)
    }

    /// Opacity level of ring `ring` at this phase, from
    /// `(phase - ring) mod 3`.
    #[must_use]
    pub fn level_for(self, ring: usize) -> RingLevel {
        let lag = (usize::from(self.0) + RING_COUNT - ring % RING_COUNT) % RING_COUNT;
        match lag {
            0 => RingLevel::High,
            1 => RingLevel::Medium,
            _ => RingLevel::Low,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RingLevel {
    High,
    Medium,
    Low,
}

impl RingLevel {
    #[must_use]
    pub fn fill_opacity(self) -> f64 {
        match self {
            RingLevel::High => 0.25,
            RingLevel::Medium => 0.15,
            RingLevel::Low => 0.08,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Ring {
    pub index: usize,
    pub radius_m: f64,
    pub level: RingLevel,
    pub fill_opacity: f64,
    pub stroke_opacity: f64,
    pub weight: f64,
}

/// Everything the surface needs to draw the viewer's position and rings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProximityOverlay {
    pub center: GeoPoint,
    pub accuracy_m: f64,
    pub color: &'static str,
    pub phase: PulsePhase,
    pub rings: [Ring; RING_COUNT],
}

/// Ring geometry and opacities for one phase.
#[must_use]
pub fn proximity_overlay(
    user: &UserLocation,
    radius_km: f64,
    phase: PulsePhase,
    dark_mode: bool,
) -> ProximityOverlay {
    let base_m = radius_km * 1000.0;
    let rings = std::array::from_fn(|index| {
        let level = phase.level_for(index);
        Ring {
            index,
            radius_m: base_m * RING_SCALES[index],
            level,
            fill_opacity: level.fill_opacity(),
            stroke_opacity: RING_STROKE_OPACITY[index],
            weight: RING_WEIGHTS[index],
        }
    });

    ProximityOverlay {
        center: user.position(),
        accuracy_m: user.accuracy_meters,
        color: if dark_mode {
            RING_COLOR_DARK
        } else {
            RING_COLOR_LIGHT
        },
        phase,
        rings,
    }
}

/// Running timer task. Dropping it cancels the timer.
#[derive(Debug)]
struct PulseTask(JoinHandle<()>);

impl Drop for PulseTask {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Timer-driven phase source.
///
/// Idle until [`start`](Self::start); while running, advances the phase every
/// `interval` and publishes it on a `watch` channel. [`stop`](Self::stop) and
/// drop cancel the timer; both are safe to repeat.
///
/// Every run is tagged with a generation. Aborting a task does not wait for
/// a tick already in flight, so a tick only publishes while its generation is
/// still current, checked under the channel's write lock.
#[derive(Debug)]
pub struct PulseAnimator {
    interval: Duration,
    phase: Arc<watch::Sender<PulsePhase>>,
    generation: Arc<AtomicU64>,
    task: Option<PulseTask>,
}

impl PulseAnimator {
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        let (tx, _rx) = watch::channel(PulsePhase::default());
        Self {
            interval,
            phase: Arc::new(tx),
            generation: Arc::new(AtomicU64::new(0)),
            task: None,
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.task.is_some()
    }

    #[must_use]
    pub fn phase(&self) -> PulsePhase {
        *self.phase.borrow()
    }

    /// Receive every phase change. Receivers outlive stop/start cycles.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<PulsePhase> {
        self.phase.subscribe()
    }

    /// Transition idle → running, resetting the phase to 0. No-op when
    /// already running.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::RuntimeUnavailable`] when called outside a tokio
    /// runtime.
    pub fn start(&mut self) -> Result<(), MapError> {
        if self.task.is_some() {
            return Ok(());
        }
        let runtime =
            tokio::runtime::Handle::try_current().map_err(|_| MapError::RuntimeUnavailable)?;

        let mut run = 0;
        self.phase.send_modify(|phase| {
            run = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
            *phase = PulsePhase::default();
        });
        let handle = runtime.spawn(run_pulse(
            self.interval,
            Arc::clone(&self.phase),
            Arc::clone(&self.generation),
            run,
        ));
        self.task = Some(PulseTask(handle));
        tracing::debug!(interval_ms = self.interval.as_millis(), "pulse started");
        Ok(())
    }

    /// Transition to idle, cancelling the timer. No-op when already idle.
    pub fn stop(&mut self) {
        if self.task.take().is_some() {
            self.phase.send_if_modified(|_| {
                self.generation.fetch_add(1, Ordering::AcqRel);
                false
            });
            tracing::debug!("pulse stopped");
        }
    }

    /// Run while a user location is present, idle otherwise.
    ///
    /// # Errors
    ///
    /// See [`start`](Self::start).
    pub fn sync(&mut self, user_present: bool) -> Result<(), MapError> {
        if user_present {
            self.start()
        } else {
            self.stop();
            Ok(())
        }
    }
}

impl Drop for PulseAnimator {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn run_pulse(
    interval: Duration,
    phase: Arc<watch::Sender<PulsePhase>>,
    generation: Arc<AtomicU64>,
    run: u64,
) {
    let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;
        let mut retired = false;
        phase.send_if_modified(|p| {
            if generation.load(Ordering::Acquire) != run {
                retired = true;
                return false;
            }
            *p = p.next();
            true
        });
        if retired {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use super::RingLevel::{High, Low, Medium};

    fn levels(phase: u8) -> [RingLevel; RING_COUNT] {
        let phase = PulsePhase::new(phase);
        std::array::from_fn(|ring| phase.level_for(ring))
    }

    #[test]
    fn phase_wraps_after_three_steps() {
        let p = PulsePhase::default();
        assert_eq!(p.get(), 0);
        assert_eq!(p.next().get(), 1);
        assert_eq!(p.next().next().get(), 2);
        assert_eq!(p.next().next().next(), p);
        assert_eq!(PulsePhase::new(7).get(), 1);
    }

    #[test]
    fn bright_band_travels_outward() {
        assert_eq!(levels(0), [High, Low, Medium]);
        assert_eq!(levels(1), [Medium, High, Low]);
        assert_eq!(levels(2), [Low, Medium, High]);
        assert_eq!(levels(3), levels(0));
    }

    #[test]
    fn every_phase_uses_each_level_once() {
        for phase in 0..3 {
            let mut l = levels(phase).to_vec();
            l.sort_by_key(|level| level.fill_opacity().to_bits());
            assert_eq!(l, vec![Low, Medium, High]);
        }
    }

    #[test]
    fn overlay_scales_rings_from_radius() {
        let user = UserLocation::new(30.0, 31.0, 12.0);
        let overlay = proximity_overlay(&user, 5.0, PulsePhase::new(1), false);
        let radii: Vec<f64> = overlay.rings.iter().map(|r| r.radius_m).collect();
        assert!((radii[0] - 5000.0).abs() < 1e-6);
        assert!((radii[1] - 5750.0).abs() < 1e-6);
        assert!((radii[2] - 6500.0).abs() < 1e-6);
        assert_eq!(overlay.rings[1].level, High);
        assert!((overlay.rings[1].fill_opacity - 0.25).abs() < f64::EPSILON);
        assert_eq!(overlay.center, GeoPoint { lat: 30.0, lon: 31.0 });
        assert_eq!(overlay.color, "#3b82f6");
    }

    #[test]
    fn overlay_color_follows_dark_mode() {
        let user = UserLocation::new(0.0, 0.0, 0.0);
        let overlay = proximity_overlay(&user, 1.0, PulsePhase::default(), true);
        assert_eq!(overlay.color, "#60a5fa");
    }

    #[test]
    fn start_without_runtime_fails() {
        let mut animator = PulseAnimator::new(Duration::from_millis(800));
        assert!(matches!(
            animator.start(),
            Err(MapError::RuntimeUnavailable)
        ));
        assert!(!animator.is_running());
    }

    #[test]
    fn stop_on_idle_animator_is_noop() {
        let mut animator = PulseAnimator::new(Duration::from_millis(800));
        animator.stop();
        animator.stop();
        assert!(!animator.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn advances_one_step_per_interval() {
        let mut animator = PulseAnimator::new(Duration::from_millis(800));
        animator.start().unwrap();
        assert!(animator.is_running());
        let mut rx = animator.subscribe();

        for expected in [1, 2, 0, 1] {
            rx.changed().await.unwrap();
            assert_eq!(rx.borrow_and_update().get(), expected);
        }
        animator.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn no_tick_before_first_interval() {
        let mut animator = PulseAnimator::new(Duration::from_millis(800));
        animator.start().unwrap();
        tokio::time::sleep(Duration::from_millis(799)).await;
        assert_eq!(animator.phase().get(), 0);
        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(animator.phase().get(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_freezes_the_phase() {
        let mut animator = PulseAnimator::new(Duration::from_millis(800));
        animator.start().unwrap();
        tokio::time::sleep(Duration::from_millis(1700)).await;
        assert_eq!(animator.phase().get(), 2);

        animator.stop();
        animator.stop();
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(animator.phase().get(), 2);
        assert!(!animator.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn restart_resets_phase_and_double_start_keeps_one_timer() {
        let mut animator = PulseAnimator::new(Duration::from_millis(800));
        animator.start().unwrap();
        tokio::time::sleep(Duration::from_millis(900)).await;
        assert_eq!(animator.phase().get(), 1);

        // A second start while running must not spawn another timer.
        animator.start().unwrap();
        tokio::time::sleep(Duration::from_millis(800)).await;
        assert_eq!(animator.phase().get(), 2);

        animator.sync(false).unwrap();
        animator.sync(true).unwrap();
        assert_eq!(animator.phase().get(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn retired_run_never_publishes() {
        let (tx, rx) = watch::channel(PulsePhase::new(2));
        let phase = Arc::new(tx);
        let generation = Arc::new(AtomicU64::new(5));

        // A tick from run 4 that outlived its stop/restart.
        let stale = tokio::spawn(run_pulse(
            Duration::from_millis(800),
            Arc::clone(&phase),
            Arc::clone(&generation),
            4,
        ));
        tokio::time::sleep(Duration::from_secs(2)).await;

        assert!(stale.is_finished());
        assert_eq!(rx.borrow().get(), 2);
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn stop_retires_the_current_run() {
        let mut animator = PulseAnimator::new(Duration::from_millis(800));
        animator.start().unwrap();
        let started = animator.generation.load(Ordering::Acquire);
        animator.stop();
        assert_ne!(animator.generation.load(Ordering::Acquire), started);

        animator.start().unwrap();
        assert_eq!(animator.phase().get(), 0);
        tokio::time::sleep(Duration::from_millis(801)).await;
        assert_eq!(animator.phase().get(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_animator_cancels_the_timer() {
        let mut animator = PulseAnimator::new(Duration::from_millis(800));
        animator.start().unwrap();
        let rx = animator.subscribe();
        drop(animator);
        tokio::time::sleep(Duration::from_secs(5)).await;
        // The task held the last sender clone; once aborted the channel closes.
        assert!(rx.has_changed().is_err());
    }
}
