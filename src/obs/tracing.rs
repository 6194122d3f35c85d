// crates.io
use tracing::{Span, instrument::Instrumented};
// self
use crate::_prelude::*;

/// Span wrapper applied to every fetch.
#[derive(Clone, Debug)]
pub struct FetchSpan {
	span: Span,
}
impl FetchSpan {
	/// Creates a `fedora_l10n.fetch` span for `operation` against `url`.
	pub fn new(operation: &'static str, url: &Url) -> Self {
		let span = tracing::info_span!("fedora_l10n.fetch", operation, url = %url);

		Self { span }
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> Instrumented<Fut>
	where
		Fut: Future,
	{
		// Must stay local: a module-level import shadows this method for by-value receivers.
		use tracing::Instrument;

		fut.instrument(self.span.clone())
	}

	/// Underlying span, for recording extra fields.
	pub fn span(&self) -> &Span {
		&self.span
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[tokio::test]
	async fn instrument_passes_the_output_through() {
		let url = Url::parse("https://translate.example.org/api/projects/")
			.expect("Fixture URL should parse.");
		let span = FetchSpan::new("list_projects", &url);

		assert_eq!(span.instrument(async { 42 }).await, 42);
	}
}
