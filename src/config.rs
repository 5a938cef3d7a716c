use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::cli::Cli;
use crate::math::{hex_to_rgb, parse_hex_color};

/// Mountain count beyond which `0.8 - 0.1 * index` goes negative
pub const MAX_VISIBLE_MOUNTAINS: usize = 8;

/// Animation parameters. Every field has a default, so a JSON file only needs
/// the keys it overrides.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub mountain_count: usize,
    pub duration_ms: f64,
    pub segments: u32,
    pub half_width: f32,
    /// Per-index delay, as a fraction of the intro
    pub stagger: f32,
    pub palette: Vec<String>,
    pub backdrop_top: String,
    pub backdrop_bottom: String,
    pub seed: Option<u64>,
    pub hero_title: String,
    pub hero_subtitle: String,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            mountain_count: 5,
            duration_ms: 2000.0,
            segments: 50,
            half_width: 10.0,
            stagger: 0.1,
            palette: ["#2d3748", "#4a5568", "#2c5282", "#553c9a", "#744210"]
                .iter()
                .map(|c| c.to_string())
                .collect(),
            backdrop_top: "#667eea".to_string(),
            backdrop_bottom: "#764ba2".to_string(),
            seed: None,
            hero_title: "Hello, I'm a developer".to_string(),
            hero_subtitle: "Building things for the web and beyond".to_string(),
        }
    }
}

impl AnimationConfig {
    /// Load overrides from a JSON file on top of the defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Defaults, then the optional config file, then command-line flags
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let mut config = match &cli.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_cli(cli);
        config.validate()?;
        Ok(config)
    }

    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(seed) = cli.seed {
            self.seed = Some(seed);
        }
        if let Some(count) = cli.mountains {
            self.mountain_count = count;
        }
        if let Some(duration) = cli.duration_ms {
            self.duration_ms = duration;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.mountain_count == 0 {
            bail!("mountain_count must be at least 1");
        }
        if !(self.duration_ms > 0.0) {
            bail!("duration_ms must be positive, got {}", self.duration_ms);
        }
        if self.segments == 0 {
            bail!("segments must be at least 1");
        }
        if !(self.half_width > 0.0) {
            bail!("half_width must be positive, got {}", self.half_width);
        }
        if self.stagger < 0.0 {
            bail!("stagger must not be negative, got {}", self.stagger);
        }
        if self.palette.is_empty() {
            bail!("palette must contain at least one colour");
        }
        for entry in self
            .palette
            .iter()
            .chain([&self.backdrop_top, &self.backdrop_bottom])
        {
            if parse_hex_color(entry).is_none() {
                bail!("invalid colour {:?}, expected #rrggbb", entry);
            }
        }
        Ok(())
    }

    /// Palette as normalised RGB. Entries that fail to parse are skipped;
    /// `validate` rejects them up front.
    pub fn palette_rgb(&self) -> Vec<[f32; 3]> {
        self.palette
            .iter()
            .filter_map(|c| parse_hex_color(c))
            .map(hex_to_rgb)
            .collect()
    }

    pub fn backdrop_colors(&self) -> (u32, u32) {
        (
            parse_hex_color(&self.backdrop_top).unwrap_or(0x667eea),
            parse_hex_color(&self.backdrop_bottom).unwrap_or(0x764ba2),
        )
    }
}
