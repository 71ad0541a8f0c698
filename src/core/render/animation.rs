//! Fade/zoom timeline attached to a window or popup.
//!
//! The timeline samples the clock only when [`Animation::update`] is called,
//! once per rendered frame. If nothing renders, progress stalls.

use crate::core::WindowId;

/// Global animation settings, read on every update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationSettings {
    pub enabled: bool,
    pub duration_ms: i64,
    /// Fraction of the duration that is actually played. The rest is treated
    /// as already elapsed so windows appear sooner.
    pub play_percentage: f64,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            duration_ms: 200,
            play_percentage: 0.25,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationKind {
    FadeIn,
    FadeOut,
}

/// Deferred work to run once an animation finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishAction {
    /// Ask the client to close the window.
    CloseWindow(WindowId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationOptions {
    pub kind: AnimationKind,
    pub ignore_play_percentage: bool,
    pub on_finish: Option<FinishAction>,
}

impl AnimationOptions {
    pub fn fade_in() -> Self {
        Self {
            kind: AnimationKind::FadeIn,
            ignore_play_percentage: false,
            on_finish: None,
        }
    }

    pub fn fade_out() -> Self {
        Self {
            kind: AnimationKind::FadeOut,
            ignore_play_percentage: false,
            on_finish: None,
        }
    }

    pub fn ignoring_play_percentage(mut self) -> Self {
        self.ignore_play_percentage = true;
        self
    }

    pub fn then(mut self, action: FinishAction) -> Self {
        self.on_finish = Some(action);
        self
    }
}

/// Reported exactly once when an animation reaches its end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationCompleted {
    pub kind: AnimationKind,
    pub action: Option<FinishAction>,
}

#[derive(Debug, Clone)]
pub struct Animation {
    options: AnimationOptions,
    start_ms: i64,
    factor: f64,
    animating: bool,
}

impl Default for Animation {
    fn default() -> Self {
        Self::new()
    }
}

impl Animation {
    pub fn new() -> Self {
        Self {
            options: AnimationOptions::fade_in(),
            start_ms: 0,
            factor: 1.0,
            animating: false,
        }
    }

    /// Portion of the timeline skipped at the start of a fade in, which is
    /// also the floor at which a fade out ends.
    fn skipped(options: &AnimationOptions, settings: &AnimationSettings) -> f64 {
        if options.ignore_play_percentage {
            0.0
        } else {
            1.0 - settings.play_percentage.clamp(0.0, 1.0)
        }
    }

    /// Arm (or re-arm) the animation. Returns false when animations are
    /// disabled, in which case nothing changes.
    pub fn start(&mut self, options: AnimationOptions, settings: &AnimationSettings, now_ms: i64) -> bool {
        if !settings.enabled {
            return false;
        }

        self.factor = match options.kind {
            AnimationKind::FadeIn => Self::skipped(&options, settings),
            AnimationKind::FadeOut => 1.0,
        };
        self.options = options;
        self.start_ms = now_ms;
        self.animating = true;
        true
    }

    /// Advance the timeline to `now_ms`.
    pub fn update(&mut self, settings: &AnimationSettings, now_ms: i64) -> Option<AnimationCompleted> {
        if !self.animating {
            return None;
        }

        let duration = settings.duration_ms as f64;
        let skipped = Self::skipped(&self.options, settings);
        let elapsed = (now_ms - self.start_ms) as f64;

        let finished = match self.options.kind {
            AnimationKind::FadeIn => {
                self.factor = if duration > 0.0 {
                    ((elapsed + duration * skipped) / duration).max(0.0)
                } else {
                    1.0
                };
                self.factor >= 1.0
            }
            AnimationKind::FadeOut => {
                self.factor = if duration > 0.0 {
                    (1.0 - elapsed / duration).min(1.0)
                } else {
                    0.0
                };
                self.factor <= skipped
            }
        };

        if !finished {
            return None;
        }

        self.factor = match self.options.kind {
            AnimationKind::FadeIn => 1.0,
            AnimationKind::FadeOut => 0.0,
        };
        self.animating = false;
        Some(AnimationCompleted {
            kind: self.options.kind,
            action: self.options.on_finish.take(),
        })
    }

    pub fn factor(&self) -> f64 {
        self.factor
    }

    pub fn is_animating(&self) -> bool {
        self.animating
    }

    pub fn kind(&self) -> AnimationKind {
        self.options.kind
    }

    /// Factor to draw with, or `None` when idle.
    pub fn active_factor(&self) -> Option<f64> {
        self.animating.then_some(self.factor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> AnimationSettings {
        AnimationSettings::default()
    }

    #[test]
    fn fade_in_starts_partway_and_rises_to_one() {
        let settings = settings();
        let mut anim = Animation::new();
        assert!(anim.start(AnimationOptions::fade_in(), &settings, 1000));
        assert!((anim.factor() - 0.75).abs() < 1e-9);

        let mut last = anim.factor();
        let mut completions = 0;
        for t in (1000..=1100).step_by(5) {
            if anim.update(&settings, t).is_some() {
                completions += 1;
            }
            assert!(anim.factor() >= last, "factor dropped at t={}", t);
            assert!(anim.factor() <= 1.0);
            last = anim.factor();
        }

        assert_eq!(completions, 1);
        assert_eq!(anim.factor(), 1.0);
        assert!(!anim.is_animating());
        // 0.75 skipped of 200ms: finishes 50ms in
        assert_eq!(anim.update(&settings, 2000), None);
    }

    #[test]
    fn fade_in_ignoring_play_percentage_starts_from_zero() {
        let settings = settings();
        let mut anim = Animation::new();
        anim.start(AnimationOptions::fade_in().ignoring_play_percentage(), &settings, 0);
        assert_eq!(anim.factor(), 0.0);

        assert_eq!(anim.update(&settings, 100), None);
        assert!((anim.factor() - 0.5).abs() < 1e-9);

        let done = anim.update(&settings, 200).expect("finished");
        assert_eq!(done.kind, AnimationKind::FadeIn);
        assert_eq!(done.action, None);
    }

    #[test]
    fn fade_out_falls_to_floor_then_zero() {
        let settings = settings();
        let mut anim = Animation::new();
        anim.start(
            AnimationOptions::fade_out().then(FinishAction::CloseWindow(4)),
            &settings,
            0,
        );
        assert_eq!(anim.factor(), 1.0);

        assert_eq!(anim.update(&settings, 20), None);
        assert!((anim.factor() - 0.9).abs() < 1e-9);

        let mut last = anim.factor();
        let mut action = None;
        for t in (20..=100).step_by(10) {
            if let Some(done) = anim.update(&settings, t) {
                assert!(action.is_none(), "completion reported twice");
                action = done.action;
            }
            assert!(anim.factor() <= last);
            last = anim.factor();
        }

        assert_eq!(action, Some(FinishAction::CloseWindow(4)));
        assert_eq!(anim.factor(), 0.0);
    }

    #[test]
    fn disabled_animations_do_not_start() {
        let settings = AnimationSettings { enabled: false, ..settings() };
        let mut anim = Animation::new();
        assert!(!anim.start(AnimationOptions::fade_out(), &settings, 0));
        assert!(!anim.is_animating());
        assert_eq!(anim.factor(), 1.0);
        assert_eq!(anim.update(&settings, 500), None);
    }

    #[test]
    fn zero_duration_finishes_on_next_update() {
        let settings = AnimationSettings { duration_ms: 0, ..settings() };
        let mut anim = Animation::new();
        anim.start(AnimationOptions::fade_in(), &settings, 0);
        assert!(anim.update(&settings, 0).is_some());
        assert_eq!(anim.factor(), 1.0);
    }

    #[test]
    fn restart_rearms_completion() {
        let settings = settings();
        let mut anim = Animation::new();
        anim.start(AnimationOptions::fade_in(), &settings, 0);
        assert!(anim.update(&settings, 1000).is_some());

        anim.start(AnimationOptions::fade_out().then(FinishAction::CloseWindow(1)), &settings, 1000);
        assert_eq!(anim.active_factor(), Some(1.0));
        let done = anim.update(&settings, 5000).expect("finished");
        assert_eq!(done.action, Some(FinishAction::CloseWindow(1)));
    }
}
