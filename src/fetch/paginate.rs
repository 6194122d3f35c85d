//! Paginated list traversal.

// std
use std::collections::HashSet;
// crates.io
use tracing::{debug, info, warn};
// self
use crate::{_prelude::*, error::DecodeError, fetch::Fetcher, http::HttpTransport};

/// One decoded page of a list endpoint.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Page {
	/// Items on this page.
	pub results: Vec<Value>,
	/// Absolute URL of the following page.
	pub next: Option<Url>,
	/// Total item count across all pages, as reported by the server.
	pub count: u64,
}
impl Page {
	/// Decodes a list response fetched from `url`.
	///
	/// Missing `results` reads as an empty page, missing `count` as zero, and a relative
	/// `next` is resolved against `url`.
	pub fn from_value(url: &Url, value: Value) -> Result<Self, DecodeError> {
		let raw: RawPage = serde_path_to_error::deserialize(value)
			.map_err(|source| DecodeError::Page { url: url.to_string(), source })?;
		let next = match raw.next.as_deref().map(str::trim).filter(|next| !next.is_empty()) {
			Some(next) => Some(url.join(next).map_err(|source| DecodeError::NextLink {
				url: url.to_string(),
				next: next.to_owned(),
				source,
			})?),
			None => None,
		};

		Ok(Self { results: raw.results, next, count: raw.count })
	}

	/// Number of pages implied by `count` at `page_size` items per page.
	pub fn total_pages(&self, page_size: u32) -> usize {
		self.count.div_ceil(u64::from(page_size.max(1))) as usize
	}
}

#[derive(Deserialize)]
struct RawPage {
	#[serde(default)]
	results: Vec<Value>,
	#[serde(default)]
	next: Option<String>,
	#[serde(default)]
	count: u64,
}

/// Lazy cursor over the pages of one list endpoint.
///
/// Pages are fetched one at a time on [`next_page`](Self::next_page); traversal stops when a
/// page has no `next` link, a `next` link points at a page already visited, or a fetch yields
/// no result. [`restart`](Self::restart) rewinds to the first page.
#[derive(Debug)]
pub struct PageCursor<'a, T>
where
	T: HttpTransport,
{
	fetcher: &'a Fetcher<T>,
	start: Url,
	next: Option<Url>,
	visited: HashSet<Url>,
	pages: usize,
}
impl<'a, T> PageCursor<'a, T>
where
	T: HttpTransport,
{
	pub(crate) fn new(fetcher: &'a Fetcher<T>, start: Url) -> Self {
		Self { fetcher, next: Some(start.clone()), start, visited: HashSet::new(), pages: 0 }
	}

	/// Fetches the next page, or `None` once traversal has ended.
	pub async fn next_page(&mut self) -> Result<Option<Page>> {
		let Some(url) = self.next.take() else {
			return Ok(None);
		};
		let Some(value) = self.fetcher.fetch(&url, true).await? else {
			debug!(%url, "Page fetch yielded no result; ending traversal.");

			return Ok(None);
		};
		let page = Page::from_value(&url, value)?;

		self.visited.insert(url);
		self.next = page.next.clone().filter(|next| {
			let fresh = !self.visited.contains(next);

			if !fresh {
				warn!(%next, "Next link points at a page already visited; ending traversal.");
			}

			fresh
		});
		self.pages += 1;

		Ok(Some(page))
	}

	/// Pages fetched since creation or the last restart.
	pub fn pages_fetched(&self) -> usize {
		self.pages
	}

	/// Returns `true` while another page may follow.
	pub fn has_next(&self) -> bool {
		self.next.is_some()
	}

	/// Rewinds to the first page.
	pub fn restart(&mut self) {
		self.next = Some(self.start.clone());
		self.visited.clear();
		self.pages = 0;
	}

	/// Drains the remaining pages, concatenating their `results`.
	///
	/// `progress` receives `(pages_fetched, total_pages)` after every page, where
	/// `total_pages` is derived from the latest page's `count` and `page_size`, and never
	/// drops below the pages already fetched.
	pub async fn collect<P>(mut self, page_size: u32, mut progress: P) -> Result<Vec<Value>>
	where
		P: FnMut(usize, usize),
	{
		let mut items = Vec::new();

		while let Some(page) = self.next_page().await? {
			let total = page.total_pages(page_size).max(self.pages);

			info!(url = %self.start, page = self.pages, total, "Fetched page.");

			items.extend(page.results);
			progress(self.pages, total);
		}

		Ok(items)
	}
}

/// Progress callback that ignores every update.
pub fn ignore_progress(_: usize, _: usize) {}
