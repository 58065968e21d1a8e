use std::fs;
use tracing::info;

mod test_utils {
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub const API_KEY: &str = "integration-key";

    pub async fn create_mock_server(endpoint: &str, mock_response: &str) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(endpoint))
            .and(query_param("access_key", API_KEY))
            .respond_with(ResponseTemplate::new(200).set_body_string(mock_response))
            .mount(&mock_server)
            .await;

        mock_server
    }

    /// Writes a config pointing at the mock server and returns the temp file.
    pub fn write_config(base_url: &str, api_key: Option<&str>) -> tempfile::NamedTempFile {
        let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
        let key_line = api_key
            .map(|key| format!("api_key: \"{key}\"\n"))
            .unwrap_or_default();
        let config_content = format!("{key_line}fixer:\n  base_url: \"{base_url}\"\n  timeout: 5\n");
        super::fs::write(config_file.path(), config_content).expect("Failed to write config file");
        config_file
    }
}

fn options_for(config: &tempfile::NamedTempFile) -> fxbook::RunOptions {
    fxbook::RunOptions {
        config_path: Some(config.path().to_str().unwrap().to_string()),
        ..Default::default()
    }
}

#[test_log::test(tokio::test)]
async fn test_full_flow_get_rates() {
    let mock_response = r#"{
        "success": true,
        "timestamp": 1705312800,
        "base": "EUR",
        "date": "2024-01-15",
        "rates": {
            "USD": 1.0956, "GBP": 0.8601, "JPY": 160.12, "AUD": 1.6423,
            "CAD": 1.4712, "CHF": 0.9351, "CNY": 7.8712, "SEK": 11.2301,
            "NZD": 1.7654, "MXN": 18.8123, "SGD": 1.4654, "HKD": 8.5612
        }
    }"#;
    let mock_server = test_utils::create_mock_server("/latest", mock_response).await;
    let config = test_utils::write_config(&mock_server.uri(), Some(test_utils::API_KEY));

    let output = fxbook::run_command(fxbook::AppCommand::Rates, &options_for(&config))
        .await
        .expect("run_command failed");
    info!(%output, "Rates output");

    assert_eq!(
        output,
        "Exchange rates for EUR on 2024-01-15: AUD: 1.6423, CAD: 1.4712, CHF: 0.9351, \
         CNY: 7.8712, GBP: 0.8601, HKD: 8.5612, JPY: 160.12, MXN: 18.8123, NZD: 1.7654, \
         SEK: 11.2301 (and 2 more currencies available)"
    );
}

#[test_log::test(tokio::test)]
async fn test_full_flow_convert_with_cli_api_key() {
    let mock_response = r#"{
        "success": true,
        "base": "EUR",
        "date": "2024-01-15",
        "rates": {"USD": 1.0, "EUR": 0.85}
    }"#;
    let mock_server = test_utils::create_mock_server("/latest", mock_response).await;
    let config = test_utils::write_config(&mock_server.uri(), None);

    let options = fxbook::RunOptions {
        api_key: Some(test_utils::API_KEY.to_string()),
        ..options_for(&config)
    };
    let command = fxbook::AppCommand::Convert {
        amount: "100".to_string(),
        source: "usd".to_string(),
        target: "eur".to_string(),
    };

    let output = fxbook::run_command(command, &options).await.unwrap();
    assert_eq!(
        output,
        "Converted 100 USD to 85.0000 EUR (rate: 0.850000) on 2024-01-15"
    );
}

#[test_log::test(tokio::test)]
async fn test_full_flow_supported_currencies() {
    let mock_response = r#"{
        "success": true,
        "symbols": {
            "USD": "United States Dollar",
            "EUR": "Euro",
            "AED": "United Arab Emirates Dirham"
        }
    }"#;
    let mock_server = test_utils::create_mock_server("/symbols", mock_response).await;
    let config = test_utils::write_config(&mock_server.uri(), Some(test_utils::API_KEY));

    let output = fxbook::run_command(fxbook::AppCommand::Currencies, &options_for(&config))
        .await
        .unwrap();
    assert_eq!(
        output,
        "Supported currencies (first 20 of 3 total): AED: United Arab Emirates Dirham, \
         EUR: Euro, USD: United States Dollar"
    );
}

#[test_log::test(tokio::test)]
async fn test_upstream_failure_is_rendered_as_text() {
    let mock_response = r#"{
        "success": false,
        "error": {"code": 101, "type": "invalid_access_key", "info": "Invalid access key."}
    }"#;
    let mock_server = test_utils::create_mock_server("/latest", mock_response).await;
    let config = test_utils::write_config(&mock_server.uri(), Some(test_utils::API_KEY));

    let command = fxbook::AppCommand::SpecificRates {
        currencies: "usd,gbp".to_string(),
    };
    let output = fxbook::run_command(command, &options_for(&config))
        .await
        .unwrap();
    assert_eq!(output, "Error: Invalid access key.");
}

#[test_log::test(tokio::test)]
async fn test_unreachable_api_is_rendered_as_text() {
    let config = test_utils::write_config("http://127.0.0.1:1", Some(test_utils::API_KEY));

    let output = fxbook::run_command(fxbook::AppCommand::Rates, &options_for(&config))
        .await
        .unwrap();
    assert!(output.starts_with("Error: "), "unexpected output: {output}");
    assert!(!output.contains(test_utils::API_KEY));
}

#[test_log::test(tokio::test)]
async fn test_hello_needs_no_api_key() {
    let config = test_utils::write_config("http://127.0.0.1:1", None);

    let output = fxbook::run_command(fxbook::AppCommand::Hello, &options_for(&config))
        .await
        .unwrap();
    assert_eq!(output, fxbook::book::GREETING);
}

#[test_log::test(tokio::test)]
async fn test_missing_api_key_is_an_error() {
    let config = test_utils::write_config("http://127.0.0.1:1", None);

    let result = fxbook::run_command(fxbook::AppCommand::Rates, &options_for(&config)).await;
    let err = result.expect_err("expected missing key error");
    assert!(err.to_string().contains("No Fixer.io API key configured"));
}

#[test_log::test(tokio::test)]
async fn test_invalid_timeout_override_is_an_error() {
    let config = test_utils::write_config("http://127.0.0.1:1", Some(test_utils::API_KEY));

    let options = fxbook::RunOptions {
        timeout: Some(0.0),
        ..options_for(&config)
    };
    let result = fxbook::run_command(fxbook::AppCommand::Rates, &options).await;
    assert!(result.is_err());
}

#[test_log::test(tokio::test)]
async fn test_missing_config_file_is_an_error() {
    let options = fxbook::RunOptions {
        config_path: Some("/nonexistent/fxbook/config.yaml".to_string()),
        ..Default::default()
    };
    let result = fxbook::run_command(fxbook::AppCommand::Hello, &options).await;
    assert!(result.is_err());
}

#[test_log::test(tokio::test)]
async fn test_full_flow_specific_rates_keep_integer_rates() {
    let mock_response = r#"{
        "success": true,
        "base": "EUR",
        "date": "2024-01-15",
        "rates": {"EUR": 1, "USD": 1.0956}
    }"#;
    let mock_server = test_utils::create_mock_server("/latest", mock_response).await;
    let config = test_utils::write_config(&mock_server.uri(), Some(test_utils::API_KEY));

    let command = fxbook::AppCommand::SpecificRates {
        currencies: "eur,usd".to_string(),
    };
    let output = fxbook::run_command(command, &options_for(&config))
        .await
        .unwrap();
    assert_eq!(
        output,
        "Exchange rates for EUR on 2024-01-15: EUR: 1, USD: 1.0956"
    );
}
