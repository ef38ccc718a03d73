use std::fmt;

/// Multi-word identifier with derived case views.
///
/// Non-native names are split on single spaces into chunks; native names keep
/// their original token as a single chunk.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Name {
	raw: Box<str>,
	native: bool,
	chunks: Vec<Box<str>>,
}

impl Name {
	/// Split a space-separated identifier into chunks.
	pub fn new(name: &str) -> Self {
		Self {
			raw: name.into(),
			native: false,
			chunks: name.split(' ').map(Box::from).collect(),
		}
	}

	/// Wrap a native token verbatim.
	pub fn native(name: &str) -> Self {
		Self {
			raw: name.into(),
			native: true,
			chunks: vec![name.into()],
		}
	}

	/// Join several names into one by their canonical forms.
	pub fn concat(names: &[&Name]) -> Self {
		let joined = names.iter().map(|name| name.canonical_case()).collect::<Vec<_>>().join(" ");
		Self::new(&joined)
	}

	/// Original declared string.
	pub fn get(&self) -> &str {
		&self.raw
	}

	/// Whether this name is an opaque native token.
	pub fn is_native(&self) -> bool {
		self.native
	}

	/// Chunk sequence in declaration order.
	pub fn chunks(&self) -> impl Iterator<Item = &str> {
		self.chunks.iter().map(AsRef::as_ref)
	}

	/// Lowercase space-joined form used as the sort and comparison key.
	pub fn canonical_case(&self) -> String {
		self.chunks.join(" ").to_lowercase()
	}

	/// Chunks concatenated without separators.
	pub fn concat_case(&self) -> String {
		self.chunks.concat()
	}

	/// `lowPower`
	pub fn camel_case(&self) -> String {
		let mut out = String::new();
		for (idx, chunk) in self.chunks.iter().enumerate() {
			if idx == 0 {
				out.push_str(chunk);
			} else {
				push_capitalized(&mut out, chunk);
			}
		}
		out
	}

	/// `LowPower`
	pub fn pascal_case(&self) -> String {
		let mut out = String::new();
		for chunk in &self.chunks {
			push_capitalized(&mut out, chunk);
		}
		out
	}

	/// `LOW_POWER`
	pub fn screaming_snake_case(&self) -> String {
		self.chunks.iter().map(|chunk| chunk.to_uppercase()).collect::<Vec<_>>().join("_")
	}

	/// `low_power`
	pub fn snake_case(&self) -> String {
		self.chunks.join("_")
	}

	/// `low::power`
	pub fn namespace_case(&self) -> String {
		self.chunks.join("::")
	}

	/// `low/power`
	pub fn dirs(&self) -> String {
		self.chunks.join("/")
	}

	/// Lowercase hyphenated form; a chunk following a trailing digit is glued on.
	pub fn kebab_case(&self) -> String {
		let mut out = String::new();
		for (idx, chunk) in self.chunks.iter().enumerate() {
			if idx > 0 && !out.ends_with(|c: char| c.is_ascii_digit()) {
				out.push('-');
			}
			out.push_str(&chunk.to_lowercase());
		}
		out
	}
}

impl fmt::Display for Name {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.raw)
	}
}

fn push_capitalized(out: &mut String, chunk: &str) {
	let mut chars = chunk.chars();
	if let Some(first) = chars.next() {
		out.extend(first.to_uppercase());
		out.push_str(chars.as_str());
	}
}
