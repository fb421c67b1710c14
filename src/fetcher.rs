use std::sync::Arc;
use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{Error, Result};
use crate::settings::Settings;

/// Outcome of loading one page. Failed pages keep their error so the caller
/// can report and skip them.
#[derive(Debug)]
pub struct FetchedPage {
    pub url: String,
    pub html: Option<String>,
    pub status: Option<u16>,
    pub error: Option<String>,
    pub latency_ms: u64,
}

pub struct FetchStats {
    pub total: usize,
    pub ok: usize,
    pub errors: usize,
}

/// Accept bare hosts the way people type them: `example.com/news` becomes
/// `https://example.com/news`.
pub fn normalize_url(input: &str) -> Result<String> {
    let trimmed = input.trim();
    let candidate = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    match Url::parse(&candidate) {
        Ok(url) if url.host_str().is_some() => Ok(url.to_string()),
        _ => Err(Error::InvalidUrl {
            url: input.to_string(),
        }),
    }
}

pub fn build_client(settings: &Settings) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(settings.timeout_secs))
        .user_agent(settings.user_agent.clone())
        .redirect(reqwest::redirect::Policy::limited(5))
        .build()?;
    Ok(client)
}

/// Fetch `urls` concurrently (bounded by `settings.concurrency`). Results come
/// back in the order of `urls`, whatever order the requests finish in.
pub async fn fetch_pages(urls: Vec<String>, settings: &Settings) -> Result<(Vec<FetchedPage>, FetchStats)> {
    let client = build_client(settings)?;
    let semaphore = Arc::new(Semaphore::new(settings.concurrency));
    let total = urls.len();

    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} fetched ({per_sec}, eta {eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );

    let (tx, mut rx) = tokio::sync::mpsc::channel::<(usize, FetchedPage)>(settings.concurrency * 2);

    for (index, url) in urls.into_iter().enumerate() {
        let client = client.clone();
        let sem = Arc::clone(&semaphore);
        let tx = tx.clone();
        let max_retries = settings.max_retries;
        let backoff_ms = settings.backoff_ms;

        tokio::spawn(async move {
            let Ok(_permit) = sem.acquire().await else {
                return;
            };
            let start = Instant::now();
            let result = fetch_with_retry(&client, &url, max_retries, backoff_ms).await;
            let latency_ms = start.elapsed().as_millis() as u64;

            let page = match result {
                Ok((html, status)) => FetchedPage {
                    url,
                    html: Some(html),
                    status: Some(status),
                    error: None,
                    latency_ms,
                },
                Err(e) => {
                    warn!("Fetch failed for {}: {}", url, e);
                    let status = match &e {
                        Error::Status { status, .. } => Some(*status),
                        _ => None,
                    };
                    FetchedPage {
                        url,
                        html: None,
                        status,
                        error: Some(e.to_string()),
                        latency_ms,
                    }
                }
            };
            let _ = tx.send((index, page)).await;
        });
    }

    // rx closes once every task has dropped its sender
    drop(tx);

    let mut pages = Vec::with_capacity(total);
    let mut ok = 0usize;
    let mut errors = 0usize;

    while let Some((index, page)) = rx.recv().await {
        if page.error.is_some() {
            errors += 1;
        } else {
            ok += 1;
        }
        debug!(url = %page.url, latency_ms = page.latency_ms, "fetched");
        pages.push((index, page));
        pb.inc(1);
    }

    pb.finish_and_clear();
    info!("Fetched {} pages ({} ok, {} errors)", total, ok, errors);

    pages.sort_by_key(|(index, _)| *index);
    let pages = pages.into_iter().map(|(_, page)| page).collect();
    Ok((pages, FetchStats { total, ok, errors }))
}

async fn fetch_with_retry(
    client: &reqwest::Client,
    url: &str,
    max_retries: u32,
    backoff_ms: u64,
) -> Result<(String, u16)> {
    let mut attempt = 0u32;
    loop {
        match fetch_one(client, url).await {
            Err(e) if e.is_retryable() && attempt < max_retries => {
                let backoff = Duration::from_millis(backoff_ms.saturating_mul(2u64.pow(attempt)));
                warn!(
                    "{} on {} (attempt {}/{}), backing off {:.1}s",
                    e,
                    url,
                    attempt + 1,
                    max_retries,
                    backoff.as_secs_f64()
                );
                tokio::time::sleep(backoff).await;
                attempt += 1;
            }
            result => return result,
        }
    }
}

async fn fetch_one(client: &reqwest::Client, url: &str) -> Result<(String, u16)> {
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(Error::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    let body = response.text().await?;
    Ok((body, status.as_u16()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_bare_hosts() {
        assert_eq!(normalize_url("example.com/news").unwrap(), "https://example.com/news");
        assert_eq!(normalize_url("  http://example.com ").unwrap(), "http://example.com/");
        assert_eq!(normalize_url("https://example.com/a?page=2").unwrap(), "https://example.com/a?page=2");
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(normalize_url(""), Err(Error::InvalidUrl { .. })));
        assert!(matches!(normalize_url("https://"), Err(Error::InvalidUrl { .. })));
    }
}
