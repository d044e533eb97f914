use std::future::Future;

/// One page of a list endpoint. `resume` is the opaque token for the next
/// page; `None` (or an empty string) means this was the last page.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub resume: Option<String>,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, resume: Option<String>) -> Self {
        Self { items, resume }
    }

    pub fn last(items: Vec<T>) -> Self {
        Self {
            items,
            resume: None,
        }
    }
}

/// Fetches every page, following resume tokens until none is returned.
///
/// Fails closed: the first error is returned and items gathered so far are
/// dropped.
pub async fn collect_pages<T, E, F, Fut>(mut fetch: F) -> Result<Vec<T>, E>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Page<T>, E>>,
{
    let mut all_results = Vec::new();
    let mut resume: Option<String> = None;
    let mut pages = 0u32;

    loop {
        let page = fetch(resume.take()).await?;
        pages += 1;

        tracing::debug!(page = pages, count = page.items.len(), "fetched page");
        all_results.extend(page.items);

        match page.resume.filter(|token| !token.is_empty()) {
            Some(token) => resume = Some(token),
            None => break,
        }
    }

    tracing::debug!(pages, total = all_results.len(), "pagination complete");
    Ok(all_results)
}
