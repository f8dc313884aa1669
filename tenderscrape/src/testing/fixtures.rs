//! HTML fixtures shaped like the live site.

use std::fmt::Write;

/// A results page with two summary blocks and a pagination footer.
pub const SEARCH_PAGE: &str = r#"
<html>
<body>
    <div class="tender-info">
        <h2><a href="/tender/123">Тендер 1</a></h2>
    </div>
    <div class="tender-info">
        <a href="/tender/456">Тендер 2</a>
    </div>
    <div class="pagination">
        <a href="?page=2">Следующая</a>
    </div>
</body>
</html>
"#;

/// A results page without summary blocks, only bare detail anchors.
pub const FALLBACK_SEARCH_PAGE: &str = r#"
<html>
<body>
    <ul class="list">
        <li><a href="/tender/71">Поставка угля</a></li>
        <li><a href="/region/moskva">Москва</a></li>
        <li><a href="/tender/72">Вывоз снега</a></li>
        <li><a href="/tender/71">Поставка угля (повтор)</a></li>
    </ul>
</body>
</html>
"#;

/// A results page with nothing on it.
pub const EMPTY_SEARCH_PAGE: &str = r#"
<html>
<body>
    <p class="empty">Ничего не найдено</p>
</body>
</html>
"#;

/// A complete detail page.
///
/// Labels sit next to their values; the deadline label shares a block with
/// its date and time.
pub const DETAIL_PAGE: &str = r#"
<html>
<body>
    <div class="tender-info-header-number">T-999</div>
    <div class="tender-info-header-start_date">01.04.2024</div>

    <div>Покупатель</div>
    <div class="customer-name">Госзакупки РФ</div>

    <h1 data-id="name">Поставка бумаги</h1>

    <span>Начальная цена</span>
    <span class="tender-body__field">50 000 руб.</span>

    <div class="tender-body__block">
        <span>Окончание (МСК)</span>
        <span class="tender-body__field">
            <span class="black">10.04.2024</span>
            <span class="tender__countdown-container">15:00 (МСК)</span>
        </span>
    </div>

    <div data-id="place">Москва</div>

    <div>ОКПД2</div>
    <div>18.20.10</div>
</body>
</html>
"#;

/// A results page with one summary block per id.
#[must_use]
pub fn search_page(ids: &[u32]) -> String {
    let mut html = String::from("<html><body>");
    for id in ids {
        let _ = write!(
            html,
            r#"<div class="tender-info"><h2><a href="/tender/{id}">Тендер {id}</a></h2></div>"#
        );
    }
    html.push_str("</body></html>");
    html
}

/// A minimal detail page carrying only a number and a subject.
#[must_use]
pub fn detail_page(id: u32) -> String {
    format!(
        r#"<html><body>
        <div class="tender-info-header-number">T-{id}</div>
        <h1 data-id="name">Тендер {id}</h1>
        </body></html>"#
    )
}
