// self
use crate::_prelude::*;

/// A project or component paired with its translated percentage for one language.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Coverage {
	/// Item exactly as listed by the server.
	pub item: Value,
	/// Translated percentage, `0.0` when statistics were unavailable.
	pub translated_percent: f64,
}
impl Coverage {
	/// Pairs `item` with the `translated_percent` read from `stats`.
	pub fn from_stats(item: Value, stats: Option<&Value>) -> Self {
		let translated_percent = stats.and_then(translated_percent).unwrap_or_default();

		Self { item, translated_percent }
	}

	/// `slug` of the item, or an empty string.
	pub fn slug(&self) -> &str {
		item_slug(&self.item)
	}

	/// `name` of the item, falling back to its slug.
	pub fn name(&self) -> &str {
		self.item.get("name").and_then(Value::as_str).unwrap_or_else(|| self.slug())
	}
}

pub(crate) fn item_slug(item: &Value) -> &str {
	item.get("slug").and_then(Value::as_str).unwrap_or_default()
}

fn translated_percent(stats: &Value) -> Option<f64> {
	stats.get("translated_percent").and_then(Value::as_f64)
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;

	#[test]
	fn missing_statistics_degrade_to_zero() {
		let item = json!({ "slug": "anaconda", "name": "Anaconda" });
		let stats = json!({ "translated_percent": 91 });
		let present = Coverage::from_stats(item.clone(), Some(&stats));
		let absent = Coverage::from_stats(item.clone(), None);
		let malformed = Coverage::from_stats(item, Some(&json!({ "translated_percent": "n/a" })));

		assert_eq!(present.translated_percent, 91.);
		assert_eq!(absent.translated_percent, 0.);
		assert_eq!(malformed.translated_percent, 0.);
		assert_eq!(present.slug(), "anaconda");
		assert_eq!(present.name(), "Anaconda");
	}

	#[test]
	fn name_falls_back_to_slug() {
		let coverage = Coverage::from_stats(json!({ "slug": "dnf" }), None);

		assert_eq!(coverage.name(), "dnf");
		assert_eq!(Coverage::from_stats(json!([]), None).slug(), "");
	}
}
