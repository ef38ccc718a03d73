use std::collections::BTreeSet;

use serde::Deserialize;
use serde_json::Value;

/// Feature-tag gate applied to every schema item before linking.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TagFilter {
	/// Tags that make a tagged item visible.
	pub enabled: BTreeSet<String>,
	/// Tags that hide an item regardless of `enabled`.
	pub disabled: BTreeSet<String>,
}

impl TagFilter {
	/// Build a filter from enabled and disabled tag lists.
	pub fn new<E, D>(enabled: E, disabled: D) -> Self
	where
		E: IntoIterator,
		E::Item: Into<String>,
		D: IntoIterator,
		D::Item: Into<String>,
	{
		Self {
			enabled: enabled.into_iter().map(Into::into).collect(),
			disabled: disabled.into_iter().map(Into::into).collect(),
		}
	}

	/// Native implementation headers and utilities.
	pub fn native() -> Self {
		Self::new(["dawn", "native", "deprecated"], Vec::<String>::new())
	}

	/// Upstream `webgpu.h` headers.
	pub fn upstream() -> Self {
		Self::new(["upstream", "native"], ["dawn"])
	}

	/// Emscripten bindings.
	pub fn emscripten() -> Self {
		Self::new(["emscripten"], Vec::<String>::new())
	}

	/// Wire client/server and fuzzers.
	pub fn wire() -> Self {
		Self::new(["dawn", "deprecated"], ["native"])
	}

	/// Whether an item declaring `tags` is included.
	///
	/// Untagged items are always included unless a disabled tag matches, which
	/// an untagged item cannot.
	pub fn includes(&self, tags: Option<&[String]>) -> bool {
		let Some(tags) = tags else {
			return true;
		};
		if tags.iter().any(|tag| self.disabled.contains(tag)) {
			return false;
		}
		tags.iter().any(|tag| self.enabled.contains(tag))
	}

	/// Same as [`TagFilter::includes`] for an unparsed JSON record.
	///
	/// A `tags` field that is not a list of strings is a decode error.
	pub fn includes_value(&self, item: &Value) -> serde_json::Result<bool> {
		let tags = match item.get("tags") {
			Some(value) => Option::<Vec<String>>::deserialize(value)?,
			None => None,
		};
		Ok(self.includes(tags.as_deref()))
	}
}

/// Schema records that may carry a `tags` list.
pub(crate) trait Tagged {
	fn tags(&self) -> Option<&[String]>;
}

/// Keep only items included by `filter`.
pub(crate) fn retain_enabled<T: Tagged>(filter: &TagFilter, items: Vec<T>) -> Vec<T> {
	items.into_iter().filter(|item| filter.includes(item.tags())).collect()
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::TagFilter;

	fn tags(items: &[&str]) -> Vec<String> {
		items.iter().map(|item| (*item).to_owned()).collect()
	}

	#[test]
	fn untagged_items_are_always_included() {
		assert!(TagFilter::default().includes(None));
		assert!(TagFilter::wire().includes(None));
	}

	#[test]
	fn tagged_item_needs_an_enabled_tag() {
		let filter = TagFilter::new(["dawn"], Vec::<String>::new());
		assert!(filter.includes(Some(&tags(&["dawn", "emscripten"]))));
		assert!(!filter.includes(Some(&tags(&["emscripten"]))));
		assert!(!filter.includes(Some(&[])));
	}

	#[test]
	fn disabled_tag_wins_over_enabled_tag() {
		let filter = TagFilter::wire();
		assert!(filter.includes(Some(&tags(&["dawn"]))));
		assert!(!filter.includes(Some(&tags(&["dawn", "native"]))));
		assert!(!filter.includes(Some(&tags(&["native"]))));
	}

	#[test]
	fn widening_enabled_tags_never_drops_items() {
		let narrow = TagFilter::new(["dawn"], ["native"]);
		let wide = TagFilter::new(["dawn", "upstream", "emscripten"], ["native"]);
		let cases = [tags(&["dawn"]), tags(&["upstream"]), tags(&["emscripten", "dawn"]), tags(&["native", "dawn"]), tags(&[])];
		for case in &cases {
			if narrow.includes(Some(case)) {
				assert!(wide.includes(Some(case)), "monotonicity for {case:?}");
			}
		}
	}

	#[test]
	fn json_record_tags_are_read() {
		let filter = TagFilter::upstream();
		assert!(filter.includes_value(&json!({"category": "native"})).expect("untagged"));
		assert!(filter.includes_value(&json!({"category": "native", "tags": ["upstream"]})).expect("tag list"));
		assert!(!filter.includes_value(&json!({"category": "native", "tags": ["dawn", "upstream"]})).expect("tag list"));
	}

	#[test]
	fn json_record_tags_must_be_a_string_list() {
		let filter = TagFilter::upstream();
		assert!(filter.includes_value(&json!({"category": "native", "tags": "dawn"})).is_err());
		assert!(filter.includes_value(&json!({"category": "native", "tags": ["dawn", 3]})).is_err());
	}
}
