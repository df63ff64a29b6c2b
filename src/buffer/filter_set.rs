use std::{fmt, ops::Range};

use regex::Regex;
use serde::Deserialize;

use crate::error::{Error, Result};

/// How the patterns of a [`FilterSet`] combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Combine {
	#[default]
	And,
	Or,
}

impl Combine {
	pub fn toggled(self) -> Self {
		match self {
			Self::And => Self::Or,
			Self::Or => Self::And,
		}
	}
}

impl fmt::Display for Combine {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::And => f.write_str("&"),
			Self::Or => f.write_str("|"),
		}
	}
}

#[derive(Debug, Clone)]
pub struct Pattern {
	source: String,
	regex:  Regex,
}

impl Pattern {
	pub fn new(source: &str) -> Result<Self> {
		let regex =
			Regex::new(source).map_err(|source_err| Error::InvalidPattern { pattern: source.to_string(), source: source_err })?;
		Ok(Self { source: source.to_string(), regex })
	}

	pub fn source(&self) -> &str { &self.source }

	pub fn find(&self, line: &str) -> Option<Range<usize>> { self.regex.find(line).map(|found| found.range()) }
}

impl PartialEq for Pattern {
	fn eq(&self, other: &Self) -> bool { self.source == other.source }
}

/// Ordered patterns plus their combine mode. The last entry is "dynamic"
/// while it is still being edited in the filter prompt.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSet {
	patterns: Vec<Pattern>,
	combine:  Combine,
	dynamic:  bool,
}

impl FilterSet {
	pub fn new(combine: Combine) -> Self { Self { patterns: Vec::new(), combine, dynamic: false } }

	pub fn len(&self) -> usize { self.patterns.len() }

	pub fn is_empty(&self) -> bool { self.patterns.is_empty() }

	pub fn patterns(&self) -> &[Pattern] { &self.patterns }

	pub fn last(&self) -> Option<&Pattern> { self.patterns.last() }

	pub fn combine(&self) -> Combine { self.combine }

	pub fn set_combine(&mut self, combine: Combine) { self.combine = combine; }

	pub fn is_dynamic(&self) -> bool { self.dynamic }

	pub fn set_dynamic(&mut self, dynamic: bool) { self.dynamic = dynamic; }

	pub fn push(&mut self, pattern: Pattern) { self.patterns.push(pattern); }

	pub fn replace_last(&mut self, pattern: Pattern) {
		match self.patterns.last_mut() {
			Some(last) => *last = pattern,
			None => self.patterns.push(pattern),
		}
	}

	pub fn pop(&mut self) -> Option<Pattern> { self.patterns.pop() }

	pub fn clear(&mut self) {
		self.patterns.clear();
		self.dynamic = false;
	}

	/// Span of the first pattern's match when the line is selected. AND
	/// stops at the first pattern that misses, OR at the first that hits.
	pub fn matches(&self, line: &str) -> Option<Range<usize>> {
		match self.combine {
			Combine::And => {
				let mut first = None;
				for pattern in &self.patterns {
					let span = pattern.find(line)?;
					first.get_or_insert(span);
				}
				first
			}
			Combine::Or => self.patterns.iter().find_map(|pattern| pattern.find(line)),
		}
	}
}

impl fmt::Display for FilterSet {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for (idx, pattern) in self.patterns.iter().enumerate() {
			if idx > 0 {
				write!(f, " {} ", self.combine)?;
			}
			f.write_str(pattern.source())?;
		}
		Ok(())
	}
}
