//! Redacted API token wrapper.

// self
use crate::_prelude::*;

/// API token that keeps sensitive material out of logs.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiToken(String);
impl ApiToken {
	/// Wraps a token after trimming surrounding whitespace; blank input yields `None`.
	pub fn new(value: impl AsRef<str>) -> Option<Self> {
		let trimmed = value.as_ref().trim();

		if trimmed.is_empty() { None } else { Some(Self(trimmed.to_owned())) }
	}

	/// Returns the inner token value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Formats the `Authorization` header value for the provided scheme.
	pub fn header_value(&self, scheme: &str) -> String {
		format!("{scheme} {}", self.0)
	}
}
impl AsRef<str> for ApiToken {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for ApiToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("ApiToken").field(&"<redacted>").finish()
	}
}
impl Display for ApiToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn token_formatters_redact() {
		let token = ApiToken::new("wlu_super_secret").expect("Fixture token should be accepted.");

		assert_eq!(format!("{token:?}"), "ApiToken(\"<redacted>\")");
		assert_eq!(format!("{token}"), "<redacted>");
		assert_eq!(token.header_value("Token"), "Token wlu_super_secret");
	}

	#[test]
	fn blank_tokens_are_rejected_and_padding_trimmed() {
		assert!(ApiToken::new("").is_none());
		assert!(ApiToken::new(" \n\t").is_none());
		assert_eq!(ApiToken::new("  abc\n").map(|t| t.expose().to_owned()).as_deref(), Some("abc"));
	}
}
