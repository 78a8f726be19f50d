//! RGBA colors for the particle palette and effect strokes.

use serde::Deserialize;

use crate::error::ConfigError;

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(try_from = "String")]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// Parses a CSS hex color (`#RRGGBB` or `#RGB`).
	pub fn parse_hex(s: &str) -> Result<Self, ConfigError> {
		let invalid = || ConfigError::Color(s.to_string());
		let hex = s
			.trim()
			.strip_prefix('#')
			.filter(|h| h.is_ascii())
			.ok_or_else(invalid)?;
		let channel = |h: &str| u8::from_str_radix(h, 16).map_err(|_| invalid());

		match hex.len() {
			6 => Ok(Self::rgb(
				channel(&hex[0..2])?,
				channel(&hex[2..4])?,
				channel(&hex[4..6])?,
			)),
			3 => {
				let expand = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 17);
				Ok(Self::rgb(expand(0)?, expand(1)?, expand(2)?))
			}
			_ => Err(invalid()),
		}
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

impl TryFrom<String> for Color {
	type Error = ConfigError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		Self::parse_hex(&value)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_parse_long_hex() {
		assert_eq!(Color::parse_hex("#00d9ff").unwrap(), Color::rgb(0, 217, 255));
		assert_eq!(Color::parse_hex("#A855F7").unwrap(), Color::rgb(168, 85, 247));
	}

	#[test]
	fn test_parse_short_hex() {
		assert_eq!(Color::parse_hex("#f0a").unwrap(), Color::rgb(255, 0, 170));
	}

	#[test]
	fn test_parse_rejects_garbage() {
		assert!(Color::parse_hex("00d9ff").is_err());
		assert!(Color::parse_hex("#12345").is_err());
		assert!(Color::parse_hex("#gggggg").is_err());
	}

	#[test]
	fn test_to_css() {
		assert_eq!(Color::rgb(0, 217, 255).to_css(), "#00d9ff");
		assert_eq!(
			Color::rgb(168, 85, 247).with_alpha(0.25).to_css(),
			"rgba(168, 85, 247, 0.25)"
		);
	}

	#[test]
	fn test_deserialize_from_string() {
		let colors: Vec<Color> = serde_json::from_str(r##"["#10b981", "#22d3ee"]"##).unwrap();
		assert_eq!(colors, vec![Color::rgb(16, 185, 129), Color::rgb(34, 211, 238)]);
		assert!(serde_json::from_str::<Color>(r#""teal""#).is_err());
	}
}
