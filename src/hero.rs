use crate::math::ease_out_cubic;

/// Fade-in length once revealed
pub const REVEAL_DURATION_MS: f64 = 800.0;
/// Downward shift while hidden, in logical pixels
pub const HIDDEN_OFFSET: f32 = 30.0;

/// Visual state of the hero block at one instant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeroStyle {
    pub opacity: f32,
    pub offset_y: f32,
}

impl HeroStyle {
    pub const HIDDEN: HeroStyle = HeroStyle {
        opacity: 0.0,
        offset_y: HIDDEN_OFFSET,
    };
    pub const SHOWN: HeroStyle = HeroStyle {
        opacity: 1.0,
        offset_y: 0.0,
    };
}

/// Headline block shown over the scene once the intro settles
#[derive(Debug, Clone)]
pub struct HeroContent {
    pub title: String,
    pub subtitle: String,
    revealed_at: Option<f64>,
}

impl HeroContent {
    pub fn new(title: impl Into<String>, subtitle: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: subtitle.into(),
            revealed_at: None,
        }
    }

    /// Start the fade-in. Later calls keep the first reveal time.
    pub fn reveal(&mut self, now_ms: f64) {
        if self.revealed_at.is_none() {
            log::info!("Revealing hero content");
            self.revealed_at = Some(now_ms);
        }
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed_at.is_some()
    }

    pub fn style_at(&self, now_ms: f64) -> HeroStyle {
        let Some(start) = self.revealed_at else {
            return HeroStyle::HIDDEN;
        };
        let t = ((now_ms - start) / REVEAL_DURATION_MS).clamp(0.0, 1.0) as f32;
        let eased = ease_out_cubic(t);
        HeroStyle {
            opacity: eased,
            offset_y: HIDDEN_OFFSET * (1.0 - eased),
        }
    }
}
