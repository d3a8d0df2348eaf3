//! Star colors and palette presets.
//!
//! Colors are stored as hue/saturation/lightness without alpha; the renderer
//! combines them with each star's per-frame opacity.

use log::warn;

/// Hue (degrees), saturation and lightness (percent).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hsl {
	pub hue: f64,
	pub saturation: f64,
	pub lightness: f64,
}

impl Hsl {
	pub const fn new(hue: f64, saturation: f64, lightness: f64) -> Self {
		Self {
			hue,
			saturation,
			lightness,
		}
	}

	/// CSS `hsla(...)` string with the given alpha.
	pub fn to_css_alpha(self, alpha: f64) -> String {
		format!(
			"hsla({}, {}%, {}%, {})",
			self.hue, self.saturation, self.lightness, alpha
		)
	}
}

/// Warm gold, the dominant star color.
pub const GOLD: Hsl = Hsl::new(40.0, 60.0, 65.0);
/// Pale blue.
pub const PALE_BLUE: Hsl = Hsl::new(220.0, 80.0, 85.0);
/// Pure white.
pub const WHITE: Hsl = Hsl::new(0.0, 0.0, 100.0);

/// One weighted entry of a palette.
#[derive(Clone, Debug)]
pub struct ColorTier {
	pub color: Hsl,
	/// Probability of a star drawing this color.
	pub weight: f64,
}

/// Weighted star colors, picked with a single uniform roll.
#[derive(Clone, Debug)]
pub struct StarPalette {
	pub tiers: Vec<ColorTier>,
}

impl StarPalette {
	/// Gold 60%, pale blue 25%, white 15%.
	pub fn classic() -> Self {
		Self {
			tiers: vec![
				ColorTier {
					color: GOLD,
					weight: 0.6,
				},
				ColorTier {
					color: PALE_BLUE,
					weight: 0.25,
				},
				ColorTier {
					color: WHITE,
					weight: 0.15,
				},
			],
		}
	}

	/// Violet and rose with a white remainder.
	pub fn nebula() -> Self {
		Self {
			tiers: vec![
				ColorTier {
					color: Hsl::new(270.0, 60.0, 75.0), // Lavender
					weight: 0.45,
				},
				ColorTier {
					color: Hsl::new(330.0, 70.0, 80.0), // Rose
					weight: 0.3,
				},
				ColorTier {
					color: WHITE,
					weight: 0.25,
				},
			],
		}
	}

	/// Map a roll in `[0, 1)` onto the cumulative tier weights.
	///
	/// Rolls past the summed weight land on the last tier, so weights that
	/// fall short of 1.0 give their remainder to it.
	pub fn pick(&self, roll: f64) -> Hsl {
		let mut cumulative = 0.0;
		for tier in &self.tiers {
			cumulative += tier.weight;
			if roll < cumulative {
				return tier.color;
			}
		}
		self.tiers.last().map(|t| t.color).unwrap_or(WHITE)
	}
}

/// Complete visual theme.
#[derive(Clone, Debug)]
pub struct Theme {
	pub name: &'static str,
	pub palette: StarPalette,
}

impl Theme {
	/// Gold-dominant field with blue and white accents (default)
	pub fn default_theme() -> Self {
		Self {
			name: "default",
			palette: StarPalette::classic(),
		}
	}

	/// Soft violet field
	pub fn nebula() -> Self {
		Self {
			name: "nebula",
			palette: StarPalette::nebula(),
		}
	}

	/// Resolve a preset by name, falling back to the default theme.
	pub fn by_name(name: &str) -> Self {
		match name {
			"default" => Self::default_theme(),
			"nebula" => Self::nebula(),
			other => {
				warn!("starfield: unknown theme {:?}, using default", other);
				Self::default_theme()
			}
		}
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::default_theme()
	}
}
