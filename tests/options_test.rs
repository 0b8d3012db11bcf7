use std::time::Duration;

use rs_cart_extraction::{extract_html, Error, ExtractionResult, Options, SiteOverride};

const ROW: &str = r#"
    <div class="items">
      <div data-sku="SKU-7731" style="width:900px;height:120px">
        <img src="/img/kettle.jpg" height=80>
        <a href="/product/kettle-ab12">Enamel Tea Kettle</a>
        <span>$34.00</span>
        <button>Remove</button>
      </div>
    </div>
"#;

async fn run(page_url: &str, options: &Options) -> ExtractionResult {
    extract_html(ROW, page_url, options)
        .await
        .expect("valid page URL")
        .into_result()
        .expect("page should be ready")
}

#[test]
fn host_knobs_override_defaults() {
    let options = Options::from_host_json(
        r#"{"kTimeoutMs": 1000, "kSleeperMinTaskTimeMs": 20, "kSleeperDutyCycle": 1, "isImprovementEnabled": true}"#,
    )
    .unwrap();
    assert_eq!(options.timeout, Duration::from_secs(1));
    assert_eq!(options.min_task_time, Duration::from_millis(20));
    assert_eq!(options.duty_cycle, 1.0);
    assert!(options.improvement_enabled);
}

#[test]
fn unknown_knobs_are_ignored() {
    let options = Options::from_host_json(r#"{"kSomethingElse": 3}"#).unwrap();
    assert_eq!(options.timeout, Duration::from_millis(250));
}

#[test]
fn bad_id_pattern_is_a_configuration_error() {
    let err = Options::from_host_json(r#"{"couponIdExtractionMap": {"shop.example": "[a-"}}"#).unwrap_err();
    assert!(matches!(err, Error::InvalidPattern { ref host, .. } if host == "shop.example"));
}

#[tokio::test]
async fn id_map_from_url() {
    let options = Options::from_host_json(
        r#"{"kSleeperDutyCycle": 1, "idExtractionMap": {"shop.example": "/product/[a-z-]+-(\\w+)$"}}"#,
    )
    .unwrap();
    let result = run("https://www.shop.example/cart", &options).await;
    assert_eq!(result.products[0].product_id.as_deref(), Some("ab12"));
}

#[tokio::test]
async fn id_map_from_markup_with_index() {
    let options = Options::from_host_json(
        r#"{"kSleeperDutyCycle": 1, "idExtractionMap": {"shop.example": {"regex": "data-sku=\"(SKU)-(\\d+)\"", "index": 2}}}"#,
    )
    .unwrap();
    let result = run("https://shop.example/cart", &options).await;
    assert_eq!(result.products[0].product_id.as_deref(), Some("7731"));
}

#[tokio::test]
async fn id_map_for_other_host_is_not_used() {
    let options = Options::from_host_json(
        r#"{"kSleeperDutyCycle": 1, "idExtractionMap": {"other.example": "(\\w+)"}}"#,
    )
    .unwrap();
    let result = run("https://shop.example/cart", &options).await;
    assert_eq!(result.products.len(), 1);
    assert_eq!(result.products[0].product_id, None);
}

#[tokio::test]
async fn site_overrides_from_json() {
    let mut options = Options {
        duty_cycle: 1.0,
        ..Options::default()
    };
    assert_eq!(run("https://shop.example/cart", &options).await.products.len(), 1);

    options
        .sites
        .merge_json(r#"{"shop.example": {"urlExcluded": true}}"#)
        .unwrap();
    assert!(run("https://shop.example/cart", &options).await.products.is_empty());
}

#[tokio::test]
async fn builtin_url_exclusion_applies_by_host() {
    let options = Options {
        duty_cycle: 1.0,
        ..Options::default()
    };
    assert!(run("https://www.instacart.com/store/cart", &options).await.products.is_empty());
}

#[tokio::test]
async fn narrow_selector_override() {
    let mut options = Options {
        duty_cycle: 1.0,
        ..Options::default()
    };
    options.sites.insert(
        "shop.example",
        SiteOverride {
            item_selector: Some("[data-sku]".to_string()),
            ..SiteOverride::default()
        },
    );
    let result = run("https://shop.example/cart", &options).await;
    assert_eq!(result.products.len(), 1);
    assert_eq!(result.products[0].title, "Enamel Tea Kettle");
}
