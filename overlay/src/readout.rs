use std::fmt;

use kurbo::Rect;
use serde::{Deserialize, Serialize};

use crate::Scene;

/// One of the three equal zones between the two anchors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Lane {
	One,
	Two,
	Three,
}

impl Lane {
	pub const ALL: [Lane; 3] = [Lane::One, Lane::Two, Lane::Three];

	/// Which lane `x` falls in, counting from the right edge of `left` to the left edge of `right`.
	///
	/// Boundaries belong to the upper lane.
	pub fn locate(x: f64, left: Rect, right: Rect) -> Self {
		let width = (right.x0 - left.x1) / 3.0;

		if x < left.x1 + width {
			Lane::One
		} else if x < left.x1 + 2.0 * width {
			Lane::Two
		} else {
			Lane::Three
		}
	}

	pub fn number(self) -> u8 {
		match self {
			Lane::One => 1,
			Lane::Two => 2,
			Lane::Three => 3,
		}
	}

	/// The state of the three lane indicators; exactly one is lit.
	pub fn indicators(self) -> [bool; 3] {
		Lane::ALL.map(|lane| lane == self)
	}
}

impl fmt::Display for Lane {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.number())
	}
}

impl TryFrom<u8> for Lane {
	type Error = u8;

	fn try_from(number: u8) -> Result<Self, Self::Error> {
		match number {
			1 => Ok(Lane::One),
			2 => Ok(Lane::Two),
			3 => Ok(Lane::Three),
			other => Err(other),
		}
	}
}

impl Serialize for Lane {
	fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_u8(self.number())
	}
}

impl<'de> Deserialize<'de> for Lane {
	fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let number = u8::deserialize(deserializer)?;
		Lane::try_from(number).map_err(|n| serde::de::Error::custom(format!("invalid lane: {n}")))
	}
}

/// Color coding for the distance readout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
	Far,
	Near,
	Passed,
}

impl Tier {
	pub fn classify(distance: f64, far_threshold: f64) -> Self {
		if distance > far_threshold {
			Tier::Far
		} else if distance > 0.0 {
			Tier::Near
		} else {
			Tier::Passed
		}
	}

	/// The CSS color used for the distance text.
	pub fn color(self) -> &'static str {
		match self {
			Tier::Far => "orange",
			Tier::Near => "red",
			Tier::Passed => "green",
		}
	}
}

/// The lane and distance derived from the overlay's position.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Readout {
	pub lane: Lane,

	/// Scaled distance in meters; zero or negative once the reference has been passed.
	pub distance: f64,

	pub tier: Tier,
}

impl Readout {
	/// Measure the overlay's current box against the anchors and the reference block.
	pub fn measure(scene: &Scene) -> Self {
		let config = scene.config();
		let overlay = scene.overlay().rect;
		let (left, right) = scene.anchors();

		let lane = Lane::locate(overlay.x0, left, right);
		let distance = (overlay.y0 - scene.reference().y0) * config.distance_scale;

		Self {
			lane,
			distance,
			tier: Tier::classify(distance, config.far_threshold),
		}
	}

	pub fn passed(&self) -> bool {
		self.distance <= 0.0
	}

	/// Rounded meters, or "Passed".
	pub fn label(&self) -> String {
		match self.passed() {
			true => "Passed".to_string(),
			false => format!("{}m", self.distance.round()),
		}
	}

	/// The distance rounded to whole meters, as published to the backend.
	pub fn meters(&self) -> i64 {
		self.distance.round() as i64
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::scene::tests::stock;

	#[test]
	fn lanes() {
		// 300px gap from 200 to 500, so lanes are 100px wide.
		let left = Rect::new(100.0, 0.0, 200.0, 800.0);
		let right = Rect::new(500.0, 0.0, 600.0, 800.0);

		assert_eq!(Lane::locate(150.0, left, right), Lane::One);
		assert_eq!(Lane::locate(299.9, left, right), Lane::One);
		assert_eq!(Lane::locate(300.0, left, right), Lane::Two);
		assert_eq!(Lane::locate(350.0, left, right), Lane::Two);
		assert_eq!(Lane::locate(400.0, left, right), Lane::Three);
		assert_eq!(Lane::locate(900.0, left, right), Lane::Three);
	}

	#[test]
	fn indicators() {
		assert_eq!(Lane::One.indicators(), [true, false, false]);
		assert_eq!(Lane::Two.indicators(), [false, true, false]);
		assert_eq!(Lane::Three.indicators(), [false, false, true]);
		assert_eq!(Lane::Two.to_string(), "2");
	}

	#[test]
	fn lane_serde() {
		assert_eq!(serde_json::to_string(&Lane::Three).unwrap(), "3");
		assert_eq!(serde_json::from_str::<Lane>("1").unwrap(), Lane::One);
		assert!(serde_json::from_str::<Lane>("4").is_err());
	}

	#[test]
	fn tiers() {
		assert_eq!(Tier::classify(150.0, 100.0), Tier::Far);
		assert_eq!(Tier::classify(100.0, 100.0), Tier::Near);
		assert_eq!(Tier::classify(0.5, 100.0), Tier::Near);
		assert_eq!(Tier::classify(0.0, 100.0), Tier::Passed);
		assert_eq!(Tier::classify(-20.0, 100.0), Tier::Passed);
		assert_eq!(Tier::Far.color(), "orange");
	}

	#[test]
	fn measure() {
		let mut scene = stock();

		// The reference (block4) top is at 100; the overlay sits 250px below it.
		scene.set_rect(&"overlay".into(), Rect::new(320.0, 350.0, 380.0, 450.0)).unwrap();

		let readout = Readout::measure(&scene);
		assert_eq!(readout.lane, Lane::Two);
		assert_eq!(readout.distance, 125.0);
		assert_eq!(readout.tier, Tier::Far);
		assert_eq!(readout.label(), "125m");
		assert_eq!(readout.meters(), 125);

		scene.set_rect(&"overlay".into(), Rect::new(210.0, 100.0, 270.0, 200.0)).unwrap();

		let readout = Readout::measure(&scene);
		assert_eq!(readout.lane, Lane::One);
		assert!(readout.passed());
		assert_eq!(readout.tier, Tier::Passed);
		assert_eq!(readout.label(), "Passed");
	}

	#[test]
	fn distance_is_monotonic() {
		let mut scene = stock();
		let mut last = f64::NEG_INFINITY;
		let mut last_meters = i64::MIN;

		for step in -40..400 {
			let top = step as f64 * 1.7;
			scene
				.set_rect(&"overlay".into(), Rect::new(300.0, top, 360.0, top + 100.0))
				.unwrap();

			let readout = Readout::measure(&scene);
			assert!(readout.distance >= last, "distance went backwards at step {step}");
			assert!(readout.meters() >= last_meters, "label went backwards at step {step}");

			last = readout.distance;
			last_meters = readout.meters();
		}
	}
}
