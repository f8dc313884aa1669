//! Crawl tests against an in-memory site.

use pretty_assertions::assert_eq;

use super::*;
use crate::config::ScraperConfig;
use crate::record::{TenderRecord, NOT_AVAILABLE};
use crate::testing::{fixtures, StaticTransport};

const SEARCH: &str = "https://tenders.test/extsearch";

fn config() -> ScraperConfig {
    ScraperConfig::new()
        .with_base_url("https://tenders.test")
        .without_delays()
}

fn page(n: u32) -> String {
    if n == 1 {
        SEARCH.to_string()
    } else {
        format!("{SEARCH}?page={n}")
    }
}

fn detail(id: u32) -> String {
    format!("https://tenders.test/tender/{id}")
}

#[tokio::test]
async fn test_links_stop_at_target_across_pages() {
    let transport = StaticTransport::new()
        .with_page(page(1), fixtures::search_page(&[1, 2, 3]))
        .with_page(page(2), fixtures::search_page(&[4, 5, 6]))
        .with_page(page(3), fixtures::search_page(&[7, 8, 9]));
    let scraper = TenderScraper::new(&config(), transport).unwrap();

    let harvest = scraper.collect_links(5).await;

    let links: Vec<String> = harvest.links.iter().map(ToString::to_string).collect();
    assert_eq!(links, (1..=5).map(detail).collect::<Vec<_>>());
    assert_eq!(harvest.pages_fetched, 2);
    assert_eq!(harvest.stop, StopReason::TargetReached);
    assert_eq!(scraper.transport().call_count(&page(3)), 0);
}

#[tokio::test]
async fn test_links_are_unique_across_pages() {
    let transport = StaticTransport::new()
        .with_page(page(1), fixtures::search_page(&[1, 2, 3]))
        .with_page(page(2), fixtures::search_page(&[3, 4, 1]))
        .with_page(page(3), fixtures::EMPTY_SEARCH_PAGE);
    let scraper = TenderScraper::new(&config(), transport).unwrap();

    let harvest = scraper.collect_links(10).await;

    let links: Vec<String> = harvest.links.iter().map(ToString::to_string).collect();
    assert_eq!(links, [1, 2, 3, 4].map(detail).to_vec());
    assert_eq!(harvest.stop, StopReason::Exhausted { page: 3 });
}

#[tokio::test]
async fn test_page_without_new_links_ends_traversal() {
    let transport = StaticTransport::new()
        .with_page(page(1), fixtures::search_page(&[1, 2]))
        .with_page(page(2), fixtures::search_page(&[1, 2]));
    let scraper = TenderScraper::new(&config(), transport).unwrap();

    let harvest = scraper.collect_links(100).await;

    assert_eq!(harvest.links.len(), 2);
    assert_eq!(harvest.stop, StopReason::NoNewLinks { page: 2 });
    assert_eq!(scraper.transport().call_count(&page(3)), 0);
}

#[tokio::test]
async fn test_unreachable_page_keeps_partial_harvest() {
    let transport = StaticTransport::new()
        .with_page(page(1), fixtures::search_page(&[1, 2]))
        .failing(page(2));
    let scraper = TenderScraper::new(&config().with_max_attempts(3), transport).unwrap();

    let harvest = scraper.collect_links(10).await;

    assert_eq!(harvest.links.len(), 2);
    assert_eq!(harvest.pages_fetched, 1);
    assert_eq!(harvest.stop, StopReason::FetchFailed { page: 2 });
    assert_eq!(scraper.transport().call_count(&page(2)), 3);
}

#[tokio::test]
async fn test_first_page_retried_before_success() {
    let transport = StaticTransport::new()
        .with_page(page(1), fixtures::search_page(&[1]))
        .with_failures(page(1), 2);
    let scraper = TenderScraper::new(&config(), transport).unwrap();

    let harvest = scraper.collect_links(1).await;

    assert_eq!(harvest.links.len(), 1);
    assert_eq!(scraper.transport().call_count(&page(1)), 3);
}

#[tokio::test]
async fn test_zero_target_fetches_nothing() {
    let scraper = TenderScraper::new(&config(), StaticTransport::new()).unwrap();

    let report = scraper.scrape(0).await;

    assert!(report.records.is_empty());
    assert!(scraper.transport().calls().is_empty());
}

#[tokio::test]
async fn test_scrape_end_to_end() {
    let transport = StaticTransport::new()
        .with_page(page(1), fixtures::SEARCH_PAGE)
        .with_page(detail(123), fixtures::DETAIL_PAGE)
        .with_page(detail(456), fixtures::detail_page(456));
    let scraper = TenderScraper::new(&config(), transport).unwrap();

    let report = scraper.scrape(2).await;

    assert_eq!(report.records.len(), 2);
    assert_eq!(report.records[0].url, detail(123));
    assert_eq!(report.records[0].number, "T-999 01.04.2024");
    assert_eq!(report.records[0].end_date, "10.04.2024 15:00 (МСК)");

    let second = &report.records[1];
    assert_eq!(second.number, "T-456");
    assert_eq!(second.subject, "Тендер 456");
    assert_eq!(second.customer, NOT_AVAILABLE);
    assert!(report.skipped.is_empty());
}

#[tokio::test]
async fn test_scrape_skips_unreachable_details() {
    let transport = StaticTransport::new()
        .with_page(page(1), fixtures::search_page(&[1, 2, 3]))
        .with_page(detail(1), fixtures::detail_page(1))
        .failing(detail(2))
        .with_page(detail(3), fixtures::detail_page(3));
    let scraper = TenderScraper::new(&config().with_max_attempts(2), transport).unwrap();

    let report = scraper.scrape(3).await;

    let urls: Vec<&str> = report.records.iter().map(|r| r.url.as_str()).collect();
    assert_eq!(urls, vec![detail(1), detail(3)]);
    assert_eq!(report.skipped, vec![detail(2)]);
    assert_eq!(scraper.transport().call_count(&detail(2)), 2);
}

#[tokio::test]
async fn test_scrape_garbage_detail_yields_sentinels() {
    let transport = StaticTransport::new()
        .with_page(page(1), fixtures::search_page(&[5]))
        .with_page(detail(5), "<<garbage>>");
    let scraper = TenderScraper::new(&config(), transport).unwrap();

    let report = scraper.scrape(1).await;

    assert_eq!(report.records, vec![TenderRecord::unresolved(detail(5))]);
}

#[tokio::test]
async fn test_anchorless_blocks_end_traversal() {
    let transport = StaticTransport::new()
        .with_page(page(1), fixtures::search_page(&[1, 2]))
        .with_page(
            page(2),
            r#"<div class="tender-info"><span>Тендер снят</span></div>
               <aside><a href="/tender/900">Похожий тендер</a></aside>"#,
        )
        .with_page(page(3), fixtures::search_page(&[3]));
    let scraper = TenderScraper::new(&config(), transport).unwrap();

    let harvest = scraper.collect_links(10).await;

    assert_eq!(harvest.links.len(), 2);
    assert_eq!(harvest.stop, StopReason::Exhausted { page: 2 });
    assert_eq!(scraper.transport().call_count(&page(3)), 0);
}

#[tokio::test(start_paused = true)]
async fn test_pause_between_results_pages() {
    let transport = StaticTransport::new()
        .with_page(page(1), fixtures::search_page(&[1, 2]))
        .with_page(page(2), fixtures::search_page(&[3, 4]))
        .with_page(page(3), fixtures::EMPTY_SEARCH_PAGE);
    let config = ScraperConfig::new().with_base_url("https://tenders.test");
    let scraper = TenderScraper::new(&config, transport).unwrap();

    let start = tokio::time::Instant::now();
    let harvest = scraper.collect_links(10).await;

    assert_eq!(harvest.pages_fetched, 3);
    assert_eq!(harvest.stop, StopReason::Exhausted { page: 3 });
    assert_eq!(start.elapsed(), config.page_delay() * 2);
}

#[tokio::test(start_paused = true)]
async fn test_pause_after_every_detail_page() {
    let transport = StaticTransport::new()
        .with_page(page(1), fixtures::search_page(&[1, 2]))
        .with_page(page(2), fixtures::search_page(&[3, 4]))
        .with_page(detail(1), fixtures::detail_page(1))
        .with_page(detail(2), fixtures::detail_page(2))
        .with_page(detail(3), fixtures::detail_page(3));
    let config = ScraperConfig::new().with_base_url("https://tenders.test");
    let scraper = TenderScraper::new(&config, transport).unwrap();

    let start = tokio::time::Instant::now();
    let report = scraper.scrape(3).await;

    assert_eq!(report.records.len(), 3);
    assert_eq!(report.pages_fetched, 2);
    assert_eq!(
        start.elapsed(),
        config.page_delay() + config.detail_delay() * 3
    );
}

#[test]
fn test_invalid_config_rejected() {
    let config = ScraperConfig::new().with_base_url("::not a url::");
    assert!(TenderScraper::new(&config, StaticTransport::new()).is_err());
}
