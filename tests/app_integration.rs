use metalotrack::core::{FetchState, Phase};
use std::fs;
use tracing::info;

mod test_utils {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub const PRICES: [(&str, f64); 4] = [
        ("XAU", 2331.25),
        ("XAG", 29.48),
        ("XPT", 981.4),
        ("XPD", 952.1),
    ];

    pub fn price_body(price: f64) -> String {
        format!(
            r#"{{"price": {price}, "prev_close_price": {}, "prev_open_price": {}, "ch": 1.5}}"#,
            price - 1.0,
            price - 2.0
        )
    }

    /// Mounts a price response for every tracked metal in `currency`, with
    /// prices scaled by `rate`.
    pub async fn mount_prices(mock_server: &MockServer, currency: &str, rate: f64) {
        for (symbol, price) in PRICES {
            Mock::given(method("GET"))
                .and(path(format!("/{symbol}/{currency}")))
                .respond_with(ResponseTemplate::new(200).set_body_string(price_body(price * rate)))
                .mount(mock_server)
                .await;
        }
    }

    pub async fn mount_status(mock_server: &MockServer, symbol: &str, currency: &str, status: u16) {
        Mock::given(method("GET"))
            .and(path(format!("/{symbol}/{currency}")))
            .respond_with(ResponseTemplate::new(status))
            .with_priority(1)
            .mount(mock_server)
            .await;
    }

    pub fn write_config(dir: &tempfile::TempDir, base_url: &str, currency: &str) -> String {
        let config_path = dir.path().join("config.yaml");
        let config_content = format!(
            r#"
currency: "{currency}"
providers:
  goldapi:
    base_url: "{base_url}"
    access_token: "goldapi-integration"
board:
  stagger_interval_ms: 20
  request_timeout_secs: 5
"#
        );
        std::fs::write(&config_path, config_content).expect("Failed to write config file");
        config_path.to_string_lossy().into_owned()
    }
}

#[test_log::test(tokio::test)]
async fn test_full_app_flow_with_mock() {
    let mock_server = wiremock::MockServer::start().await;
    test_utils::mount_prices(&mock_server, "INR", 83.0).await;

    let dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let config_path = test_utils::write_config(&dir, &mock_server.uri(), "INR");

    let result =
        metalotrack::run_command(metalotrack::AppCommand::Prices, Some(&config_path), None).await;
    assert!(
        result.is_ok(),
        "Prices command failed with: {:?}",
        result.err()
    );

    let requests = mock_server.received_requests().await.unwrap();
    let mut paths: Vec<_> = requests.iter().map(|r| r.url.path().to_string()).collect();
    info!(?paths, "Requests received");
    paths.sort();
    assert_eq!(paths, vec!["/XAG/INR", "/XAU/INR", "/XPD/INR", "/XPT/INR"]);
}

#[test_log::test(tokio::test)]
async fn test_silver_rate_limited_leaves_others_ready() {
    let mock_server = wiremock::MockServer::start().await;
    test_utils::mount_status(&mock_server, "XAG", "INR", 429).await;
    test_utils::mount_prices(&mock_server, "INR", 83.0).await;

    let dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let config_path = test_utils::write_config(&dir, &mock_server.uri(), "INR");
    let config = metalotrack::load_config(Some(&config_path), None).unwrap();
    let board = metalotrack::build_board(&config).unwrap();

    board.start_cycle().settled().await;
    let snapshot = board.snapshot();

    for (index, (metal, state)) in snapshot.iter().enumerate() {
        if metal.symbol == "XAG" {
            assert_eq!(state.phase(), Phase::Failed);
            assert_eq!(state.error_message().as_deref(), Some("rate limit exceeded"));
        } else {
            let expected = test_utils::PRICES[index].1 * 83.0;
            assert_eq!(state.phase(), Phase::Ready, "{} should be ready", metal.name);
            assert_eq!(state.price(), Some(expected));
            assert_eq!(state.previous_close(), Some(expected - 1.0));
            assert_eq!(state.previous_open(), Some(expected - 2.0));
        }
    }

    assert!(board.select_entity(1).is_none());
    let gold = board.select_entity(0).expect("gold has a price");
    assert_eq!(gold.currency, "INR");
}

#[test_log::test(tokio::test)]
async fn test_currency_change_refetches_every_metal() {
    let mock_server = wiremock::MockServer::start().await;
    test_utils::mount_prices(&mock_server, "INR", 83.0).await;
    test_utils::mount_prices(&mock_server, "USD", 1.0).await;

    let dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let config_path = test_utils::write_config(&dir, &mock_server.uri(), "INR");
    let config = metalotrack::load_config(Some(&config_path), None).unwrap();
    let board = metalotrack::build_board(&config).unwrap();

    board.start_cycle().settled().await;
    assert!(board.snapshot().is_settled());

    let handle = board.set_currency("USD");
    let snapshot = board.snapshot();
    assert_eq!(snapshot.currency, "USD");
    assert!(
        snapshot
            .iter()
            .all(|(_, state)| *state == FetchState::Loading)
    );
    handle.settled().await;

    let snapshot = board.snapshot();
    for (index, (_, state)) in snapshot.iter().enumerate() {
        assert_eq!(state.price(), Some(test_utils::PRICES[index].1));
    }

    let requests = mock_server.received_requests().await.unwrap();
    let usd_requests = requests
        .iter()
        .filter(|r| r.url.path().ends_with("/USD"))
        .count();
    assert_eq!(usd_requests, 4);
}

#[test_log::test(tokio::test)]
async fn test_detail_command() {
    let mock_server = wiremock::MockServer::start().await;
    test_utils::mount_prices(&mock_server, "EUR", 0.92).await;

    let dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let config_path = test_utils::write_config(&dir, &mock_server.uri(), "INR");

    let result = metalotrack::run_command(
        metalotrack::AppCommand::Detail {
            metal: "platinum".to_string(),
        },
        Some(&config_path),
        Some("eur"),
    )
    .await;
    assert!(result.is_ok(), "Detail command failed with: {:?}", result.err());

    let result = metalotrack::run_command(
        metalotrack::AppCommand::Detail {
            metal: "copper".to_string(),
        },
        Some(&config_path),
        Some("EUR"),
    )
    .await;
    assert_eq!(result.unwrap_err().to_string(), "Unknown metal: copper");
}

#[test_log::test(tokio::test)]
async fn test_unsupported_currency_override() {
    let dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let config_path = test_utils::write_config(&dir, "http://127.0.0.1:9", "INR");

    let result = metalotrack::run_command(
        metalotrack::AppCommand::Prices,
        Some(&config_path),
        Some("XYZ"),
    )
    .await;
    assert_eq!(result.unwrap_err().to_string(), "Unsupported currency: XYZ");
}

#[test_log::test(tokio::test)]
async fn test_currencies_without_config() {
    let dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let missing = dir.path().join("missing.yaml");
    assert!(!missing.exists());

    let result = metalotrack::run_command(
        metalotrack::AppCommand::Currencies {
            search: Some("euro".to_string()),
        },
        missing.to_str(),
        None,
    )
    .await;
    assert!(result.is_ok());
    assert!(fs::metadata(&missing).is_err());
}
