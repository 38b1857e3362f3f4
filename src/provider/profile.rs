//! Normalized user profile built from the provider's user-info response.

// crates.io
use serde_json::{Map, Value};
// self
use crate::{_prelude::*, error::ProfileError};

/// Profile handed to the verify continuation.
///
/// `id` and `email` are copied verbatim from the user-info JSON. Missing or `null`
/// fields stay `None`; their JSON type is not checked.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
	/// Constant provider label (e.g. `Wegene`).
	pub provider: String,
	/// Provider-assigned user identifier.
	pub id: Option<Value>,
	/// User email address.
	pub email: Option<Value>,
}
impl Profile {
	/// Decodes a user-info response body into a profile tagged with `provider`.
	///
	/// Only malformed JSON is an error. Any well-formed document is accepted; fields
	/// are read by name, so non-object bodies yield a profile without `id` or `email`.
	pub fn from_json(provider: impl Into<String>, body: &[u8]) -> Result<Self, ProfileError> {
		let mut de = serde_json::Deserializer::from_slice(body);
		let document: Value = serde_path_to_error::deserialize(&mut de)
			.map_err(|e| ProfileError::Parse { path: e.path().to_string(), source: e.into_inner() })?;

		de.end().map_err(|source| ProfileError::Parse { path: ".".into(), source })?;

		let (id, email) = match document {
			Value::Object(mut fields) =>
				(take_field(&mut fields, "id"), take_field(&mut fields, "email")),
			_ => (None, None),
		};

		Ok(Self { provider: provider.into(), id, email })
	}

	/// Returns the identifier when the provider sent it as a JSON string.
	pub fn id_str(&self) -> Option<&str> {
		self.id.as_ref().and_then(Value::as_str)
	}

	/// Returns the email when the provider sent it as a JSON string.
	pub fn email_str(&self) -> Option<&str> {
		self.email.as_ref().and_then(Value::as_str)
	}
}

fn take_field(fields: &mut Map<String, Value>, name: &str) -> Option<Value> {
	fields.remove(name).filter(|value| !value.is_null())
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;

	#[test]
	fn fields_are_copied_verbatim() {
		let profile = Profile::from_json(
			"Wegene",
			br#"{"id":"u123","email":"a@example.com","nickname":"ignored"}"#,
		)
		.expect("Profile should decode.");

		assert_eq!(
			profile,
			Profile {
				provider: "Wegene".into(),
				id: Some(json!("u123")),
				email: Some(json!("a@example.com")),
			}
		);
		assert_eq!(profile.id_str(), Some("u123"));
	}

	#[test]
	fn missing_and_untyped_fields_pass_through() {
		let profile = Profile::from_json("Wegene", br#"{"id":42}"#)
			.expect("Missing email must not be an error.");

		assert_eq!(profile.id, Some(json!(42)));
		assert_eq!(profile.id_str(), None);
		assert!(profile.email.is_none());
	}

	#[test]
	fn null_fields_are_absent() {
		let profile = Profile::from_json("Wegene", br#"{"id":"u1","email":null}"#)
			.expect("Null email must not be an error.");

		assert_eq!(profile.id_str(), Some("u1"));
		assert_eq!(profile.email, None);
	}

	#[test]
	fn non_object_documents_carry_no_fields() {
		let bodies: [&[u8]; 5] =
			[br#"["u-positional","e-positional"]"#, b"[]", br#""x""#, b"42", b"null"];

		for body in bodies {
			let profile =
				Profile::from_json("Wegene", body).expect("Well-formed JSON must not be an error.");

			assert_eq!(
				profile,
				Profile { provider: "Wegene".into(), id: None, email: None },
				"body: {}",
				String::from_utf8_lossy(body)
			);
		}
	}

	#[test]
	fn malformed_bodies_are_parse_errors() {
		let err = Profile::from_json("Wegene", b"<html>oops</html>")
			.expect_err("Non-JSON bodies must fail.");

		assert!(matches!(err, ProfileError::Parse { .. }));

		let err = Profile::from_json("Wegene", br#"{"id":"u1"} trailing"#)
			.expect_err("Trailing characters must fail.");

		assert!(matches!(err, ProfileError::Parse { .. }));
	}
}
