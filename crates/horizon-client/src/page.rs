//! Paged collections and cursor chaining.
//!
//! Horizon returns collections one page at a time. Each page carries a
//! `next` link whose href embeds the cursor of the following page; the
//! absence of that link is the only end-of-collection signal.
//!
//! ```rust,ignore
//! let first: Page<LedgerRecord> = client.get_page(endpoint.build()).await?;
//! if let Some(second) = client.next_page(&first).await? {
//!     // ...
//! }
//!
//! // Or walk the whole chain lazily:
//! let mut pager = client.pages::<LedgerRecord>(endpoint.build());
//! while let Some(page) = pager.next().await? {
//!     for ledger in page {
//!         // ...
//!     }
//! }
//! ```

use std::marker::PhantomData;

use futures::stream::{self, Stream};
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer};
use tracing::{debug, instrument};
use url::Url;

use crate::client::HorizonHttpClient;
use crate::error::{Error, ErrorKind, Result};
use crate::response::{RateLimitInfo, ResponseShape};

/// One page of a collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    records: Vec<T>,
    links: Links,
    source_url: Option<Url>,
    rate_limit: RateLimitInfo,
}

impl<T> Page<T> {
    /// Records on this page, in server order.
    pub fn records(&self) -> &[T] {
        &self.records
    }

    /// Take the records.
    pub fn into_records(self) -> Vec<T> {
        self.records
    }

    /// Navigation links.
    pub fn links(&self) -> &Links {
        &self.links
    }

    /// URL this page was fetched from, when it came over the network.
    pub fn source_url(&self) -> Option<&Url> {
        self.source_url.as_ref()
    }

    /// Rate limit counters of the response that carried this page.
    pub fn rate_limit(&self) -> RateLimitInfo {
        self.rate_limit
    }

    /// Number of records on this page.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when the page holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// True when the server advertised a following page.
    pub fn has_next(&self) -> bool {
        self.links.next.is_some()
    }

    /// Absolute URL of the next page, or `None` at the end of the collection.
    ///
    /// Relative hrefs are resolved against [`source_url`](Page::source_url).
    pub fn next_url(&self) -> Result<Option<Url>> {
        let Some(next) = &self.links.next else {
            return Ok(None);
        };

        match Url::parse(&next.href) {
            Ok(url) => Ok(Some(url)),
            Err(url::ParseError::RelativeUrlWithoutBase) => match &self.source_url {
                Some(base) => Ok(Some(base.join(&next.href)?)),
                None => Err(Error::new(ErrorKind::InvalidEndpoint(format!(
                    "relative next link '{}' on a page with no source URL",
                    next.href
                )))),
            },
            Err(e) => Err(e.into()),
        }
    }
}

impl<T> IntoIterator for Page<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<T: DeserializeOwned> ResponseShape for Page<T> {
    fn attach_rate_limit(&mut self, rate_limit: RateLimitInfo) {
        self.rate_limit = rate_limit;
    }
}

/// Accepts both `{"records", "links"}` and Horizon's HAL form
/// `{"_embedded": {"records"}, "_links"}`.
#[derive(Deserialize)]
struct PageRepr<T> {
    records: Option<Vec<T>>,
    #[serde(rename = "_embedded")]
    embedded: Option<Embedded<T>>,
    #[serde(default, alias = "_links")]
    links: Links,
}

#[derive(Deserialize)]
struct Embedded<T> {
    records: Vec<T>,
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Page<T> {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let repr = PageRepr::<T>::deserialize(deserializer)?;
        let records = match (repr.records, repr.embedded) {
            (Some(records), _) => records,
            (None, Some(embedded)) => embedded.records,
            (None, None) => return Err(D::Error::missing_field("records")),
        };

        Ok(Page {
            records,
            links: repr.links,
            source_url: None,
            rate_limit: RateLimitInfo::default(),
        })
    }
}

/// Navigation links of a page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Links {
    #[serde(default, deserialize_with = "deserialize_link")]
    pub next: Option<Link>,
    #[serde(default, deserialize_with = "deserialize_link")]
    pub prev: Option<Link>,
    #[serde(rename = "self", default, deserialize_with = "deserialize_link")]
    pub self_link: Option<Link>,
}

/// A hypermedia link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub href: String,
    pub templated: bool,
}

// A link object with a null or empty href is the same as no link.
fn deserialize_link<'de, D>(deserializer: D) -> std::result::Result<Option<Link>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct LinkRepr {
        href: Option<String>,
        #[serde(default)]
        templated: bool,
    }

    let repr = Option::<LinkRepr>::deserialize(deserializer)?;
    Ok(repr.and_then(|link| {
        link.href
            .filter(|href| !href.is_empty())
            .map(|href| Link {
                href,
                templated: link.templated,
            })
    }))
}

impl HorizonHttpClient {
    /// Fetch one page of a collection.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn get_page<T: DeserializeOwned>(&self, url: Url) -> Result<Page<T>> {
        let response = self.execute(self.get(url).accept_json()).await?;
        let source = response.url().clone();

        let mut page: Page<T> = response.json()?;
        page.source_url = Some(source);
        Ok(page)
    }

    /// Fetch the page after `page`.
    ///
    /// Returns `Ok(None)` without touching the network when `page` has no
    /// `next` link. Calling this twice on the same page fetches the same URL
    /// twice.
    pub async fn next_page<T: DeserializeOwned>(&self, page: &Page<T>) -> Result<Option<Page<T>>> {
        match page.next_url()? {
            Some(url) => self.get_page(url).await.map(Some),
            None => Ok(None),
        }
    }

    /// Walk a collection lazily, starting at `first`.
    pub fn pages<T: DeserializeOwned>(&self, first: Url) -> Pager<T> {
        Pager::new(self.clone(), first)
    }
}

#[derive(Debug, Clone)]
enum Cursor {
    Pending(Url),
    BadLink(String),
    Done,
}

/// Forward-only, single-pass walk over a paged collection.
///
/// Nothing is fetched until [`next`](Pager::next) is called. When a fetch
/// fails the pager keeps the URL it was trying, so calling `next` again
/// retries that same page; pages already returned stay valid.
#[derive(Debug, Clone)]
pub struct Pager<T> {
    client: HorizonHttpClient,
    cursor: Cursor,
    pages_fetched: usize,
    _records: PhantomData<fn() -> T>,
}

impl<T: DeserializeOwned> Pager<T> {
    /// Start a walk at `first`.
    pub fn new(client: HorizonHttpClient, first: Url) -> Self {
        Self {
            client,
            cursor: Cursor::Pending(first),
            pages_fetched: 0,
            _records: PhantomData,
        }
    }

    /// URL the next call to [`next`](Pager::next) will fetch.
    pub fn pending_url(&self) -> Option<&Url> {
        match &self.cursor {
            Cursor::Pending(url) => Some(url),
            _ => None,
        }
    }

    /// True once the last page has been returned.
    pub fn is_done(&self) -> bool {
        matches!(self.cursor, Cursor::Done)
    }

    /// Number of pages returned so far.
    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    /// Fetch the next page, or `None` once the collection is exhausted.
    pub async fn next(&mut self) -> Result<Option<Page<T>>> {
        let url = match &self.cursor {
            Cursor::Pending(url) => url.clone(),
            Cursor::BadLink(href) => {
                let message = format!("unusable next link '{href}'");
                self.cursor = Cursor::Done;
                return Err(Error::new(ErrorKind::InvalidEndpoint(message)));
            }
            Cursor::Done => return Ok(None),
        };

        let page = self.client.get_page::<T>(url).await?;
        self.pages_fetched += 1;

        self.cursor = match page.next_url() {
            Ok(Some(next)) => Cursor::Pending(next),
            Ok(None) => Cursor::Done,
            Err(_) => Cursor::BadLink(
                page.links
                    .next
                    .as_ref()
                    .map(|link| link.href.clone())
                    .unwrap_or_default(),
            ),
        };

        debug!(
            pages_fetched = self.pages_fetched,
            records = page.len(),
            has_next = page.has_next(),
            "Page fetched"
        );
        Ok(Some(page))
    }

    /// Turn the walk into a stream of pages.
    pub fn into_stream(self) -> impl Stream<Item = Result<Page<T>>> {
        stream::try_unfold(self, |mut pager| async move {
            Ok::<_, Error>(pager.next().await?.map(|page| (page, pager)))
        })
    }

    /// Drain records from the remaining pages, stopping after `max_pages`
    /// pages when given.
    pub async fn collect_records(mut self, max_pages: Option<usize>) -> Result<Vec<T>> {
        let mut records = Vec::new();
        let mut fetched = 0;

        while max_pages.is_none_or(|max| fetched < max) {
            match self.next().await? {
                Some(page) => records.extend(page),
                None => break,
            }
            fetched += 1;
        }

        Ok(records)
    }
}
