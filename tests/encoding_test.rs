use rs_cart_extraction::{extract_bytes, ExtractionResult, Options};

const PAGE: &str = "https://boutique.example/panier";

fn options() -> Options {
    Options {
        duty_cycle: 1.0,
        ..Options::default()
    }
}

async fn run(bytes: &[u8]) -> ExtractionResult {
    extract_bytes(bytes, PAGE, &options())
        .await
        .expect("valid page URL")
        .into_result()
        .expect("page should be ready")
}

/// UTF-8 titles pass through untouched.
#[tokio::test]
async fn utf8_title_preserved() {
    let html = "\
        <html><head><meta charset=\"utf-8\"></head><body>\
          <div class=\"items\">\
            <div style=\"width:900px;height:120px\">\
              <img src=\"/img/1.jpg\" height=80>\
              <a href=\"/p/1\">Théière en fonte, 中文</a>\
              <span>$45.00</span>\
              <button>Remove</button>\
            </div>\
          </div>\
        </body></html>";

    let result = run(html.as_bytes()).await;
    assert_eq!(result.products.len(), 1);
    assert_eq!(result.products[0].title, "Théière en fonte, 中文");
}

/// ISO-8859-1 bytes are decoded before parsing.
#[tokio::test]
async fn latin1_title_decoded() {
    // é = 0xE9, è = 0xE8 in ISO-8859-1
    let html = b"<html><head><meta charset=\"ISO-8859-1\"></head><body>\
          <div class=\"items\">\
            <div style=\"width:900px;height:120px\">\
              <img src=\"/img/1.jpg\" height=80>\
              <a href=\"/p/1\">Th\xE9i\xE8re en fonte</a>\
              <span>$45.00</span>\
              <button>Remove</button>\
            </div>\
          </div>\
        </body></html>";

    let result = run(html).await;
    assert_eq!(result.products.len(), 1);
    assert_eq!(result.products[0].title, "Théière en fonte");
    assert_eq!(result.products[0].price, "$45.00");
}

/// Invalid bytes never fail the page.
#[tokio::test]
async fn malformed_utf8_is_tolerated() {
    let html = b"<html><body><p>Panier \xFF\xFE vide</p></body></html>";
    let result = run(html).await;
    assert!(result.products.is_empty());
}

#[tokio::test]
async fn relative_page_url_is_rejected() {
    let err = extract_bytes(b"<p></p>", "/panier", &options()).await;
    assert!(err.is_err());
}
