use crate::config::Config;
use crate::gc::{GcEvent, GcListener};
use crate::metrics::{FrameClock, GateTransition, PauseDetector, StabilizationGate};
use crate::overlay::{FrameTimings, GcView, OverlaySnapshot, SceneView, StressView};
use crate::runtime::jcmd::GcTrigger;
use crate::runtime::JdkToolsError;
use crate::scene::Scene;
use crate::stress::StressGenerator;
use crate::theme::Theme;
use crate::tui::event::Event;
use std::time::{Duration, Instant};

const BASE_STEP: i32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Normal,
    Help,
    ConfirmGc,
}

/// Work the event handler cannot finish synchronously.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    ForceGc,
}

/// Everything one run of the instrument owns. The render loop is the only
/// writer; the GC listener shares its store through an `Arc`.
pub struct App {
    pub should_quit: bool,
    pub mode: AppMode,
    pub theme: Theme,
    config: Config,
    clock: FrameClock,
    gate: StabilizationGate,
    pauses: PauseDetector,
    stress: StressGenerator,
    scene: Scene,
    listener: GcListener,
    trigger: Result<GcTrigger, String>,
    notice: Option<String>,
    memory_baseline_mb: Option<f64>,
    timings: FrameTimings,
}

impl App {
    pub fn new(config: Config) -> Self {
        Self::starting_at(config, Instant::now())
    }

    pub fn starting_at(config: Config, start: Instant) -> Self {
        Self {
            should_quit: false,
            mode: AppMode::Normal,
            theme: Theme,
            clock: FrameClock::starting_at(start, config.frame_history, config.frame_window()),
            gate: StabilizationGate::starting_at(start, config.stabilization_period()),
            pauses: PauseDetector::new(config.pause_threshold_s()),
            stress: StressGenerator::new(config.stress.clone()),
            scene: Scene::new(config.features.object_scaling),
            listener: GcListener::new(config.gc.clone()),
            trigger: Err(JdkToolsError::NoTargetPid.to_string()),
            notice: None,
            memory_baseline_mb: None,
            timings: FrameTimings::default(),
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn listener(&self) -> &GcListener {
        &self.listener
    }

    pub fn listener_mut(&mut self) -> &mut GcListener {
        &mut self.listener
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn stress(&self) -> &StressGenerator {
        &self.stress
    }

    pub fn pauses(&self) -> &PauseDetector {
        &self.pauses
    }

    pub fn gate(&self) -> &StabilizationGate {
        &self.gate
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn memory_baseline_mb(&self) -> Option<f64> {
        self.memory_baseline_mb
    }

    pub fn set_gc_trigger(&mut self, trigger: Result<GcTrigger, JdkToolsError>) {
        self.trigger = match trigger {
            Ok(trigger) => {
                tracing::info!(pid = trigger.pid(), "explicit GC available");
                Ok(trigger)
            }
            Err(e) => {
                tracing::info!(reason = %e, "explicit GC unavailable");
                Err(e.to_string())
            }
        };
    }

    pub fn gc_trigger(&self) -> Option<&GcTrigger> {
        self.trigger.as_ref().ok()
    }

    pub fn tick(&mut self) -> f64 {
        self.tick_at(Instant::now())
    }

    /// One frame: clock, gate, pause check, scene update, stress tick, in
    /// that order. Returns the frame delta in seconds.
    pub fn tick_at(&mut self, now: Instant) -> f64 {
        let delta = self.clock.tick_at(now);

        if let Some(GateTransition::Activated) = self.gate.poll(now) {
            self.memory_baseline_mb = resident_memory_mb();
            tracing::info!(
                baseline_mb = ?self.memory_baseline_mb,
                "stabilization finished, monitoring active"
            );
        }

        self.pauses.evaluate(delta, self.gate.is_active());

        let started = Instant::now();
        self.scene.update(delta);
        self.timings.update = started.elapsed();

        if self.config.features.stress {
            self.stress.tick();
            self.timings.stress = self.stress.last_tick_duration();
        }

        delta
    }

    pub fn record_render_time(&mut self, elapsed: Duration) {
        self.timings.render = elapsed;
    }

    /// Applies a key event. Anything that needs the async runtime is handed
    /// back to the caller as a [`Command`].
    pub fn handle_event(&mut self, event: Event) -> Option<Command> {
        match self.mode {
            AppMode::Help => {
                if matches!(event, Event::Help | Event::Back | Event::Quit) {
                    self.mode = AppMode::Normal;
                }
                None
            }
            AppMode::ConfirmGc => match event {
                Event::Confirm => {
                    self.mode = AppMode::Normal;
                    Some(Command::ForceGc)
                }
                Event::Cancel | Event::Back => {
                    self.mode = AppMode::Normal;
                    None
                }
                _ => None,
            },
            AppMode::Normal => {
                self.handle_normal(event);
                None
            }
        }
    }

    fn handle_normal(&mut self, event: Event) {
        let stress = self.config.features.stress;
        match event {
            Event::Quit | Event::Back => self.should_quit = true,
            Event::Help => self.mode = AppMode::Help,
            Event::ToggleStress if stress => {
                let enabled = self.stress.toggle();
                tracing::debug!(enabled, "memory stress toggled");
            }
            Event::StressLevel(level) if stress => {
                if let Err(e) = self.stress.set_level(level) {
                    self.notice = Some(e.to_string());
                }
            }
            Event::ForceGc => match &self.trigger {
                Ok(_) => self.mode = AppMode::ConfirmGc,
                Err(reason) => {
                    self.notice = Some(format!("Explicit GC unavailable: {}", reason));
                }
            },
            Event::Reset => self.reset_all(Instant::now()),
            Event::ToggleMode => self.scene.toggle_mode(),
            Event::CycleShape => self.scene.cycle_shape(),
            Event::BaseUp => self.scene.adjust_base(BASE_STEP),
            Event::BaseDown => self.scene.adjust_base(-BASE_STEP),
            Event::PowerUp => self.scene.adjust_power(1),
            Event::PowerDown => self.scene.adjust_power(-1),
            _ => {}
        }
    }

    pub async fn force_gc(&mut self) {
        let Ok(trigger) = &self.trigger else {
            return;
        };

        match trigger.run().await {
            Ok(output) => {
                tracing::info!(pid = trigger.pid(), output = %output, "GC.run completed");
                self.notice = Some(format!("GC.run sent to pid {}", trigger.pid()));
            }
            Err(e) => {
                tracing::warn!(error = %e, "explicit GC failed");
                self.notice = Some(format!("Explicit GC failed: {}", e));
            }
        }
    }

    /// Clears GC statistics, pause statistics, the frame-time window and the
    /// stress generator, and starts a new stabilization period.
    pub fn reset_all(&mut self, now: Instant) {
        self.listener.reset();
        self.pauses.reset();
        self.gate.reset(now);
        self.clock.reset_window(now);
        self.stress.reset();
        self.memory_baseline_mb = None;
        self.notice = Some("Statistics reset".to_string());
        tracing::info!("all statistics reset");
    }

    pub fn recent_gc_events(&self, count: usize) -> Vec<GcEvent> {
        self.listener.store().recent_events(count)
    }

    pub fn snapshot(&self, now: Instant) -> OverlaySnapshot {
        let features = self.config.features;

        let gc = features.gc_stats.then(|| {
            let store = self.listener.store();
            GcView {
                aggregate: store.read(),
                events_detected: store.event_count(),
                last_heap: store.recent_events(8).iter().rev().find_map(|e| e.heap),
                status: self.listener.status(),
            }
        });

        let stress = features.stress.then(|| StressView {
            config: self.stress.config(),
            objects_created: self.stress.objects_created(),
            retained: self.stress.retained_count(),
        });

        OverlaySnapshot {
            fps: self.clock.fps(),
            memory_mb: resident_memory_mb(),
            baseline_mb: self.memory_baseline_mb,
            window_max_s: self.clock.window_max(),
            median_frame_s: self.clock.median_frame_time().ok(),
            monitoring_active: self.gate.is_active(),
            stabilization_remaining: self.gate.remaining(now),
            pauses: self.pauses.stats(),
            pause_threshold_s: self.pauses.threshold_s(),
            gc,
            stress,
            timings: self.timings,
            scene: SceneView {
                mode: self.scene.mode(),
                shape: self.scene.shape(),
                scaling: self.scene.scaling(),
                base_count: self.scene.base_count(),
                power: self.scene.power(),
                object_count: self.scene.object_count(),
                triangles: self.scene.triangle_count(),
                vertices: self.scene.vertex_count(),
            },
            notice: self.notice.clone(),
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

/// Resident set size of this process in MiB.
pub fn resident_memory_mb() -> Option<f64> {
    memory_stats::memory_stats().map(|usage| usage.physical_mem as f64 / (1024.0 * 1024.0))
}
