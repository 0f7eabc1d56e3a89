//! Overlay text. Everything the host draws on top of the scene is produced
//! here as plain strings with a tone, so it can be tested without a terminal.

use crate::gc::types::{GcAggregate, HeapTransition};
use crate::gc::ListenerStatus;
use crate::metrics::pause::PauseStats;
use crate::scene::{RenderMode, ShapeKind};
use crate::stress::StressConfig;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Normal,
    Dim,
    Good,
    Warn,
    Alert,
    Accent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayLine {
    pub text: String,
    pub tone: Tone,
}

impl OverlayLine {
    fn new(text: impl Into<String>, tone: Tone) -> Self {
        Self {
            text: text.into(),
            tone,
        }
    }

    fn blank() -> Self {
        Self::new("", Tone::Normal)
    }
}

#[derive(Debug, Clone)]
pub struct GcView {
    pub aggregate: GcAggregate,
    pub events_detected: usize,
    pub last_heap: Option<HeapTransition>,
    pub status: ListenerStatus,
}

#[derive(Debug, Clone, Copy)]
pub struct StressView {
    pub config: StressConfig,
    pub objects_created: u64,
    pub retained: usize,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FrameTimings {
    pub update: Duration,
    pub render: Duration,
    pub stress: Duration,
}

#[derive(Debug, Clone, Copy)]
pub struct SceneView {
    pub mode: RenderMode,
    pub shape: ShapeKind,
    pub scaling: bool,
    pub base_count: u32,
    pub power: u32,
    pub object_count: u64,
    pub triangles: u64,
    pub vertices: u64,
}

#[derive(Debug, Clone)]
pub struct OverlaySnapshot {
    pub fps: f64,
    pub memory_mb: Option<f64>,
    pub baseline_mb: Option<f64>,
    pub window_max_s: f64,
    pub median_frame_s: Option<f64>,
    pub monitoring_active: bool,
    pub stabilization_remaining: Duration,
    pub pauses: PauseStats,
    pub pause_threshold_s: f64,
    pub gc: Option<GcView>,
    pub stress: Option<StressView>,
    pub timings: FrameTimings,
    pub scene: SceneView,
    pub notice: Option<String>,
}

pub fn build(snapshot: &OverlaySnapshot) -> Vec<OverlayLine> {
    let mut lines = Vec::new();

    frame_lines(snapshot, &mut lines);
    lines.push(OverlayLine::blank());
    monitoring_lines(snapshot, &mut lines);

    if let Some(gc) = &snapshot.gc {
        lines.push(OverlayLine::blank());
        gc_lines(gc, &mut lines);
    }

    if let Some(stress) = &snapshot.stress {
        lines.push(OverlayLine::blank());
        stress_lines(stress, &mut lines);
    }

    lines.push(OverlayLine::blank());
    scene_lines(&snapshot.scene, &mut lines);

    lines.push(OverlayLine::blank());
    let t = &snapshot.timings;
    lines.push(OverlayLine::new(
        format!("Update Time: {:.2} ms", millis(t.update)),
        Tone::Dim,
    ));
    lines.push(OverlayLine::new(
        format!("Render Time: {:.2} ms", millis(t.render)),
        Tone::Dim,
    ));
    if snapshot.stress.is_some() {
        lines.push(OverlayLine::new(
            format!("Stress Test Time: {:.2} ms", millis(t.stress)),
            Tone::Dim,
        ));
    }

    if let Some(notice) = &snapshot.notice {
        lines.push(OverlayLine::blank());
        lines.push(OverlayLine::new(notice.clone(), Tone::Accent));
    }

    lines
}

fn frame_lines(snapshot: &OverlaySnapshot, lines: &mut Vec<OverlayLine>) {
    lines.push(OverlayLine::new(
        format!("FPS: {:.0}", snapshot.fps),
        Tone::Normal,
    ));

    let memory = match (snapshot.memory_mb, snapshot.baseline_mb) {
        (Some(current), Some(baseline)) => format!(
            "Memory Usage: {:.2} MB ({:+.2} MB vs baseline)",
            current,
            current - baseline
        ),
        (Some(current), None) => format!("Memory Usage: {:.2} MB", current),
        (None, _) => "Memory Usage: n/a".to_string(),
    };
    lines.push(OverlayLine::new(memory, Tone::Normal));

    let max_tone = if snapshot.window_max_s > snapshot.pause_threshold_s {
        Tone::Warn
    } else {
        Tone::Normal
    };
    lines.push(OverlayLine::new(
        format!("Max Frame Time: {:.2} ms", snapshot.window_max_s * 1000.0),
        max_tone,
    ));

    if let Some(median) = snapshot.median_frame_s {
        lines.push(OverlayLine::new(
            format!("Median Frame Time: {:.2} ms", median * 1000.0),
            Tone::Normal,
        ));
    }
}

fn monitoring_lines(snapshot: &OverlaySnapshot, lines: &mut Vec<OverlayLine>) {
    if snapshot.monitoring_active {
        lines.push(OverlayLine::new("Monitoring: Active", Tone::Good));
    } else {
        lines.push(OverlayLine::new(
            format!(
                "Monitoring: Stabilizing ({:.1} s left)",
                snapshot.stabilization_remaining.as_secs_f64()
            ),
            Tone::Warn,
        ));
    }

    let pauses = snapshot.pauses;
    let tone = if pauses.pause_count > 0 {
        Tone::Alert
    } else {
        Tone::Normal
    };
    lines.push(OverlayLine::new(
        format!(
            "Suspected Pauses (>{:.0} ms): {}",
            snapshot.pause_threshold_s * 1000.0,
            pauses.pause_count
        ),
        tone,
    ));
    lines.push(OverlayLine::new(
        format!("Longest Pause: {:.2} ms", pauses.longest_pause_s * 1000.0),
        tone,
    ));
}

fn gc_lines(gc: &GcView, lines: &mut Vec<OverlayLine>) {
    let status_tone = match gc.status {
        ListenerStatus::Listening(_) => Tone::Good,
        ListenerStatus::Unavailable(_) => Tone::Alert,
        ListenerStatus::Idle | ListenerStatus::Ended => Tone::Dim,
    };
    lines.push(OverlayLine::new(format!("GC Listener: {}", gc.status), status_tone));

    let a = &gc.aggregate;
    let untimed = gc.events_detected.saturating_sub(a.collections as usize);
    lines.push(OverlayLine::new(
        format!("GC Collections: {} ({} untimed events)", a.collections, untimed),
        Tone::Normal,
    ));
    lines.push(OverlayLine::new(
        format!("GC Total Time: {:.2} ms", a.total_time_ms),
        Tone::Normal,
    ));
    lines.push(OverlayLine::new(
        format!("GC Max Pause: {:.2} ms", a.max_time_ms),
        if a.max_time_ms > 0.0 { Tone::Warn } else { Tone::Normal },
    ));
    lines.push(OverlayLine::new(
        format!(
            "GC Last Pause: {:.2} ms (avg {:.2} ms)",
            a.last_time_ms,
            a.avg_time_ms()
        ),
        Tone::Normal,
    ));

    if let Some(heap) = gc.last_heap {
        lines.push(OverlayLine::new(
            format!(
                "Heap After GC: {} MB / {} MB (freed {} MB)",
                heap.after_bytes / 1024 / 1024,
                heap.capacity_bytes / 1024 / 1024,
                heap.reclaimed_bytes() / 1024 / 1024
            ),
            Tone::Dim,
        ));
    }
}

fn stress_lines(stress: &StressView, lines: &mut Vec<OverlayLine>) {
    let (text, tone) = if stress.config.enabled {
        (format!("ON (Level {})", stress.config.level), Tone::Alert)
    } else {
        ("OFF".to_string(), Tone::Good)
    };
    lines.push(OverlayLine::new(format!("Memory Stress: {}", text), tone));
    lines.push(OverlayLine::new(
        format!("Objects Created: {}", stress.objects_created),
        Tone::Normal,
    ));
    lines.push(OverlayLine::new(
        format!("Objects Retained: {}", stress.retained),
        Tone::Normal,
    ));
}

fn scene_lines(scene: &SceneView, lines: &mut Vec<OverlayLine>) {
    lines.push(OverlayLine::new(format!("Mode: {}", scene.mode), Tone::Accent));
    if !scene.scaling {
        return;
    }

    lines.push(OverlayLine::new(
        format!("Shape Type: {}", scene.shape),
        Tone::Accent,
    ));
    lines.push(OverlayLine::new(
        format!(
            "Objects: {} x 10^{} = {}",
            scene.base_count,
            scene.power - 1,
            scene.object_count
        ),
        Tone::Accent,
    ));

    if scene.mode == RenderMode::Mode3D {
        lines.push(OverlayLine::new(
            format!(
                "Triangles: {} / Vertices: {}",
                scene.triangles, scene.vertices
            ),
            Tone::Accent,
        ));
    }
}

fn millis(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stress::StressLevel;
    use pretty_assertions::assert_eq;

    fn snapshot() -> OverlaySnapshot {
        OverlaySnapshot {
            fps: 59.6,
            memory_mb: Some(42.5),
            baseline_mb: None,
            window_max_s: 0.0185,
            median_frame_s: Some(0.0167),
            monitoring_active: false,
            stabilization_remaining: Duration::from_millis(1_300),
            pauses: PauseStats::default(),
            pause_threshold_s: 0.020,
            gc: None,
            stress: None,
            timings: FrameTimings::default(),
            scene: SceneView {
                mode: RenderMode::Mode2D,
                shape: ShapeKind::Circle,
                scaling: false,
                base_count: 100,
                power: 1,
                object_count: 20,
                triangles: 0,
                vertices: 0,
            },
            notice: None,
        }
    }

    fn texts(lines: &[OverlayLine]) -> Vec<&str> {
        lines.iter().map(|l| l.text.as_str()).collect()
    }

    #[test]
    fn test_minimal_overlay() {
        let lines = build(&snapshot());
        assert_eq!(
            texts(&lines),
            vec![
                "FPS: 60",
                "Memory Usage: 42.50 MB",
                "Max Frame Time: 18.50 ms",
                "Median Frame Time: 16.70 ms",
                "",
                "Monitoring: Stabilizing (1.3 s left)",
                "Suspected Pauses (>20 ms): 0",
                "Longest Pause: 0.00 ms",
                "",
                "Mode: 2d",
                "",
                "Update Time: 0.00 ms",
                "Render Time: 0.00 ms",
            ]
        );
    }

    #[test]
    fn test_gc_and_stress_sections() {
        let mut snap = snapshot();
        snap.monitoring_active = true;
        snap.baseline_mb = Some(40.0);
        snap.pauses = PauseStats {
            pause_count: 3,
            longest_pause_s: 0.0452,
        };
        snap.gc = Some(GcView {
            aggregate: GcAggregate {
                collections: 2,
                total_time_ms: 12.0,
                max_time_ms: 9.0,
                last_time_ms: 3.0,
            },
            events_detected: 5,
            last_heap: Some(HeapTransition {
                before_bytes: 24 * 1024 * 1024,
                after_bytes: 3 * 1024 * 1024,
                capacity_bytes: 256 * 1024 * 1024,
            }),
            status: ListenerStatus::Listening("java -Xlog:gc:stdout Main".into()),
        });
        snap.stress = Some(StressView {
            config: StressConfig {
                enabled: true,
                level: StressLevel::Medium,
            },
            objects_created: 5_000,
            retained: 1_000,
        });

        let lines = build(&snap);
        let text = texts(&lines);

        assert!(text.contains(&"Memory Usage: 42.50 MB (+2.50 MB vs baseline)"));
        assert!(text.contains(&"Monitoring: Active"));
        assert!(text.contains(&"Suspected Pauses (>20 ms): 3"));
        assert!(text.contains(&"Longest Pause: 45.20 ms"));
        assert!(text.contains(&"GC Listener: listening to java -Xlog:gc:stdout Main"));
        assert!(text.contains(&"GC Collections: 2 (3 untimed events)"));
        assert!(text.contains(&"GC Last Pause: 3.00 ms (avg 6.00 ms)"));
        assert!(text.contains(&"Heap After GC: 3 MB / 256 MB (freed 21 MB)"));
        assert!(text.contains(&"Memory Stress: ON (Level 2)"));
        assert!(text.contains(&"Objects Retained: 1000"));
        assert!(text.contains(&"Stress Test Time: 0.00 ms"));

        let stress = lines
            .iter()
            .find(|l| l.text.starts_with("Memory Stress"))
            .unwrap();
        assert_eq!(stress.tone, Tone::Alert);
    }

    #[test]
    fn test_unavailable_listener_shows_zeroes() {
        let mut snap = snapshot();
        snap.gc = Some(GcView {
            aggregate: GcAggregate::default(),
            events_detected: 0,
            last_heap: None,
            status: ListenerStatus::Unavailable("permission denied".into()),
        });

        let lines = build(&snap);
        let listener = lines
            .iter()
            .find(|l| l.text.starts_with("GC Listener"))
            .unwrap();
        assert_eq!(listener.text, "GC Listener: unavailable: permission denied");
        assert_eq!(listener.tone, Tone::Alert);
        assert!(texts(&lines).contains(&"GC Total Time: 0.00 ms"));
    }

    #[test]
    fn test_scaling_scene_in_3d() {
        let mut snap = snapshot();
        snap.scene = SceneView {
            mode: RenderMode::Mode3D,
            shape: ShapeKind::Mixed,
            scaling: true,
            base_count: 50,
            power: 3,
            object_count: 5_000,
            triangles: 60_000,
            vertices: 180_000,
        };
        snap.notice = Some("GC.run sent to pid 4242".into());

        let text = build(&snap)
            .into_iter()
            .map(|l| l.text)
            .collect::<Vec<_>>();
        assert!(text.contains(&"Mode: 3d".to_string()));
        assert!(text.contains(&"Shape Type: mixed".to_string()));
        assert!(text.contains(&"Objects: 50 x 10^2 = 5000".to_string()));
        assert!(text.contains(&"Triangles: 60000 / Vertices: 180000".to_string()));
        assert_eq!(text.last().unwrap(), "GC.run sent to pid 4242");
    }
}
