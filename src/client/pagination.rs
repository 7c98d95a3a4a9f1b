//! Pagination over directory collection responses
//!
//! The directory returns collections one page at a time, with a
//! server-issued continuation link on every page except the last. The
//! walker below turns that convention into a lazy, finite stream of items:
//! consumed until exhaustion, link strictly advancing, never re-fetching a
//! page.

use std::collections::VecDeque;
use std::future::Future;

use futures::stream::{self, Stream, TryStreamExt};
use serde::Deserialize;

use crate::error::Result;

/// One page of a directory collection response.
#[derive(Debug, Deserialize)]
pub struct ODataPage<T> {
    /// Items on this page
    #[serde(default = "Vec::new")]
    pub value: Vec<T>,

    /// Continuation link; absent on the final page
    #[serde(rename = "@odata.nextLink")]
    pub next_link: Option<String>,
}

impl<T> ODataPage<T> {
    /// A single page with no continuation.
    #[allow(dead_code)]
    pub fn single(value: Vec<T>) -> Self {
        Self {
            value,
            next_link: None,
        }
    }
}

/// Walk a paginated collection as a stream of items.
///
/// Yields the initial page's items, then follows the continuation link via
/// `fetch_next` until a page reports none, in page-then-within-page order.
/// Pages may be empty while still carrying a link; the walk continues. A
/// fetch failure ends the stream with that error.
pub fn items<T, F, Fut>(first: ODataPage<T>, fetch_next: F) -> impl Stream<Item = Result<T>>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<ODataPage<T>>>,
{
    struct Walk<T, F> {
        queue: VecDeque<T>,
        next_link: Option<String>,
        fetch_next: F,
    }

    let walk = Walk {
        queue: first.value.into(),
        next_link: first.next_link,
        fetch_next,
    };

    stream::try_unfold(walk, |mut walk| async move {
        loop {
            if let Some(item) = walk.queue.pop_front() {
                return Ok(Some((item, walk)));
            }

            // Taking the link before the fetch guarantees strict advance.
            let Some(link) = walk.next_link.take() else {
                return Ok(None);
            };

            let page = (walk.fetch_next)(link).await?;
            walk.queue = page.value.into();
            walk.next_link = page.next_link;
        }
    })
}

/// Fully drain a paginated collection into a `Vec`.
pub async fn drain<T, F, Fut>(first: ODataPage<T>, fetch_next: F) -> Result<Vec<T>>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<ODataPage<T>>>,
{
    items(first, fetch_next).try_collect().await
}
