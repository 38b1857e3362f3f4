//! Ordered scope lists.
//!
//! Unlike a normalized set, a [`ScopeList`] keeps the caller's insertion order because
//! the joined value must be echoed byte-for-byte on the token request.

// std
use std::slice::Iter;
// self
use crate::_prelude::*;

/// Errors emitted when validating scopes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum ScopeValidationError {
	/// Empty scope entries are not allowed.
	#[error("Scope entries cannot be empty.")]
	Empty,
	/// Scopes cannot contain embedded whitespace characters.
	#[error("Scope contains whitespace: {scope}.")]
	ContainsWhitespace {
		/// The offending scope string.
		scope: String,
	},
	/// Scopes cannot contain the separator used to join them on the wire.
	#[error("Scope {scope} contains the separator {separator:?}.")]
	ContainsSeparator {
		/// The offending scope string.
		scope: String,
		/// The configured separator.
		separator: String,
	},
}

/// Ordered list of OAuth scopes as requested from the provider.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ScopeList(Vec<String>);
impl ScopeList {
	/// Builds a list from any iterator, validating each entry.
	pub fn new<I, S>(scopes: I) -> Result<Self, ScopeValidationError>
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let mut list = Vec::new();

		for scope in scopes {
			let owned = scope.into();

			validate(&owned)?;
			list.push(owned);
		}

		Ok(Self(list))
	}

	/// Rejects entries that would split apart when joined with `separator`.
	pub fn ensure_separable(&self, separator: &str) -> Result<(), ScopeValidationError> {
		if separator.is_empty() {
			return Ok(());
		}

		match self.0.iter().find(|scope| scope.contains(separator)) {
			Some(scope) => Err(ScopeValidationError::ContainsSeparator {
				scope: scope.clone(),
				separator: separator.to_owned(),
			}),
			None => Ok(()),
		}
	}

	/// Appends `scope` unless it is already present.
	///
	/// Returns `true` if the scope was appended.
	pub fn ensure(&mut self, scope: &str) -> bool {
		if self.contains(scope) {
			return false;
		}

		self.0.push(scope.to_owned());

		true
	}

	/// Returns true if the list contains the provided scope.
	pub fn contains(&self, scope: &str) -> bool {
		self.0.iter().any(|candidate| candidate == scope)
	}

	/// Number of entries.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns true if no scopes are defined.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Iterator over the scopes in request order.
	pub fn iter(&self) -> impl Iterator<Item = &str> {
		self.0.iter().map(String::as_str)
	}

	/// Joins the scopes with the provider's separator for the wire.
	pub fn join(&self, separator: &str) -> String {
		self.0.join(separator)
	}

	/// Returns the underlying slice of scope strings.
	pub fn as_slice(&self) -> &[String] {
		&self.0
	}
}
impl<'a> IntoIterator for &'a ScopeList {
	type IntoIter = ScopeIter<'a>;
	type Item = &'a str;

	fn into_iter(self) -> Self::IntoIter {
		ScopeIter { inner: self.0.iter() }
	}
}
/// Iterator over scope strings.
pub struct ScopeIter<'a> {
	inner: Iter<'a, String>,
}
impl<'a> Iterator for ScopeIter<'a> {
	type Item = &'a str;

	fn next(&mut self) -> Option<Self::Item> {
		self.inner.next().map(String::as_str)
	}
}

fn validate(scope: &str) -> Result<(), ScopeValidationError> {
	if scope.is_empty() {
		return Err(ScopeValidationError::Empty);
	}
	if scope.chars().any(char::is_whitespace) {
		return Err(ScopeValidationError::ContainsWhitespace { scope: scope.to_owned() });
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn ensure_appends_only_missing_scopes() {
		let mut scopes = ScopeList::new(["genome", "basic"]).expect("Scope list should be valid.");

		assert!(!scopes.ensure("basic"));
		assert!(scopes.ensure("email"));
		assert_eq!(scopes.iter().collect::<Vec<_>>(), vec!["genome", "basic", "email"]);
	}

	#[test]
	fn join_preserves_order_and_separator() {
		let scopes = ScopeList::new(["email", "basic"]).expect("Scope list should be valid.");

		assert_eq!(scopes.join(" "), "email basic");
		assert_eq!(scopes.join(","), "email,basic");
	}

	#[test]
	fn invalid_entries_are_rejected() {
		assert_eq!(ScopeList::new([""]), Err(ScopeValidationError::Empty));
		assert!(matches!(
			ScopeList::new(["two words"]),
			Err(ScopeValidationError::ContainsWhitespace { .. })
		));
	}

	#[test]
	fn entries_containing_the_separator_are_rejected() {
		let scopes = ScopeList::new(["basic", "genome,email"]).expect("Scope list should be valid.");

		assert_eq!(scopes.ensure_separable(" "), Ok(()));
		assert_eq!(
			scopes.ensure_separable(","),
			Err(ScopeValidationError::ContainsSeparator {
				scope: "genome,email".into(),
				separator: ",".into(),
			})
		);
		assert_eq!(scopes.ensure_separable(""), Ok(()));
	}
}
