use async_trait::async_trait;
use btcmx::core::kernel::RestClient;
use btcmx::exchanges::btcmarkets::{BtcMarketsBuilder, BtcMarketsConnector, BtcMarketsSigner};
use btcmx::{
    AccountInfo, ApiOutcome, ExchangeError, MarketDataSource, Order, OrderPlacer, OrderSide,
    OrderType,
};
use futures::future::join_all;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

// base64("btcmx-test-secret-key")
const SECRET: &str = "YnRjbXgtdGVzdC1zZWNyZXQta2V5";
const API_KEY: &str = "test-api-key";

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

#[derive(Debug, Clone)]
struct RecordedRequest {
    method: &'static str,
    endpoint: String,
    query: Vec<(String, String)>,
    headers: HashMap<String, String>,
    body: Vec<u8>,
}

impl RecordedRequest {
    fn body_str(&self) -> &str {
        std::str::from_utf8(&self.body).unwrap()
    }

    fn body_json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }
}

type Responder = dyn Fn(&RecordedRequest) -> Result<Value, ExchangeError> + Send + Sync;

/// In-memory transport that records every request and answers from a closure
#[derive(Clone)]
struct MockRest {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    responder: Arc<Responder>,
}

impl MockRest {
    fn new<F>(responder: F) -> Self
    where
        F: Fn(&RecordedRequest) -> Result<Value, ExchangeError> + Send + Sync + 'static,
    {
        Self {
            requests: Arc::new(Mutex::new(Vec::new())),
            responder: Arc::new(responder),
        }
    }

    fn replying(value: Value) -> Self {
        Self::new(move |_| Ok(value.clone()))
    }

    fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn record(&self, request: RecordedRequest) -> Result<Value, ExchangeError> {
        let response = (self.responder)(&request);
        self.requests.lock().unwrap().push(request);
        response
    }
}

#[async_trait]
impl RestClient for MockRest {
    async fn get(
        &self,
        endpoint: &str,
        query_params: &[(&str, &str)],
        headers: &HashMap<String, String>,
    ) -> Result<Value, ExchangeError> {
        self.record(RecordedRequest {
            method: "GET",
            endpoint: endpoint.to_string(),
            query: query_params
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
            headers: headers.clone(),
            body: Vec::new(),
        })
    }

    async fn post(
        &self,
        endpoint: &str,
        headers: &HashMap<String, String>,
        body: &[u8],
    ) -> Result<Value, ExchangeError> {
        self.record(RecordedRequest {
            method: "POST",
            endpoint: endpoint.to_string(),
            query: Vec::new(),
            headers: headers.clone(),
            body: body.to_vec(),
        })
    }
}

fn signed_connector(mock: &MockRest) -> BtcMarketsConnector<MockRest> {
    BtcMarketsBuilder::new()
        .with_credentials(API_KEY.to_string(), SECRET.to_string())
        .build_with_client(mock.clone())
        .unwrap()
}

fn read_only_connector(mock: &MockRest) -> BtcMarketsConnector<MockRest> {
    BtcMarketsBuilder::new()
        .build_with_client(mock.clone())
        .unwrap()
}

mod trading {
    use super::*;

    #[tokio::test]
    async fn test_volume_below_minimum_sends_nothing() {
        init_tracing();
        let mock = MockRest::replying(json!({"success": true, "id": 1}));
        let connector = signed_connector(&mock);

        let result = connector
            .buy("BTC", "AUD", 100.0, 0.0009, "Limit", "req-1")
            .await;

        assert!(matches!(result, Err(ExchangeError::InvalidParameters(_))));
        assert!(mock.requests().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_order_type_sends_nothing() {
        let mock = MockRest::replying(json!({"success": true, "id": 1}));
        let connector = signed_connector(&mock);

        let result = connector
            .sell("BTC", "AUD", 100.0, 1.0, "Stop", "req-1")
            .await;

        assert!(matches!(result, Err(ExchangeError::InvalidParameters(_))));
        assert!(mock.requests().is_empty());
    }

    #[tokio::test]
    async fn test_amount_too_large_for_wire_sends_nothing() {
        let mock = MockRest::replying(json!({"success": true, "id": 1}));
        let connector = signed_connector(&mock);

        let result = connector
            .buy("BTC", "AUD", 1.0e12, 1.0, "Limit", "req-big-price")
            .await;
        assert!(matches!(result, Err(ExchangeError::InvalidParameters(_))));

        let order = Order::new("BTC", "AUD", 100.0, 1.0e12, OrderSide::Ask);
        let result = connector
            .place_order(&order, OrderType::Limit, "req-big-volume")
            .await;
        assert!(matches!(result, Err(ExchangeError::InvalidParameters(_))));

        assert!(mock.requests().is_empty());
    }

    #[tokio::test]
    async fn test_buy_sends_signed_scaled_body() {
        init_tracing();
        let mock = MockRest::replying(json!({
            "success": true,
            "errorCode": null,
            "errorMessage": null,
            "id": 4_242,
            "clientRequestId": "req-buy"
        }));
        let connector = signed_connector(&mock);

        let outcome = connector
            .buy("BTC", "AUD", 44_000.29, 0.5, "Limit", "req-buy")
            .await
            .unwrap();

        let placed = outcome.success().unwrap();
        assert_eq!(placed.id, 4_242);
        assert_eq!(placed.order.side, OrderSide::Bid);
        assert!((placed.order.price - 44_000.29).abs() < f64::EPSILON);

        let requests = mock.requests();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.method, "POST");
        assert_eq!(request.endpoint, "/order/create");

        let body = request.body_json();
        assert_eq!(body["price"], json!(4_400_029_000_000_i64));
        assert_eq!(body["volume"], json!(50_000_000));
        assert_eq!(body["orderSide"], json!("Bid"));
        assert_eq!(body["ordertype"], json!("Limit"));
        assert_eq!(body["currency"], json!("AUD"));
        assert_eq!(body["instrument"], json!("BTC"));
        assert_eq!(body["clientRequestId"], json!("req-buy"));

        // Compact JSON: what was signed is what was sent
        assert!(!request.body_str().contains(' '));
        assert!(!request.body_str().contains('\n'));

        let timestamp: u64 = request.headers["timestamp"].parse().unwrap();
        let verifier = BtcMarketsSigner::new(API_KEY.to_string(), SECRET).unwrap();
        let expected = verifier
            .sign("/order/create", Some(request.body_str()), timestamp)
            .unwrap();
        assert_eq!(request.headers["signature"], expected["signature"]);
        assert_eq!(request.headers["apikey"], API_KEY);
        assert_eq!(request.headers["content-type"], "application/json");
        assert_eq!(request.headers["accept"], "application/json");
        assert_eq!(request.headers["accept-charset"], "utf-8");
    }

    #[tokio::test]
    async fn test_sell_returns_its_own_order_id() {
        let mock = MockRest::new(|request| {
            let body = request.body_json();
            let id = if body["orderSide"] == json!("Bid") { 111 } else { 222 };
            Ok(json!({"success": true, "id": id}))
        });
        let connector = signed_connector(&mock);

        let bought = connector
            .buy("ETH", "AUD", 3_000.0, 1.0, "Limit", "req-a")
            .await
            .unwrap()
            .success()
            .unwrap();
        let sold = connector
            .sell("ETH", "AUD", 3_100.0, 1.0, "Market", "req-b")
            .await
            .unwrap()
            .success()
            .unwrap();

        assert_eq!(bought.id, 111);
        assert_eq!(sold.id, 222);
        assert_eq!(sold.order.side, OrderSide::Ask);

        let requests = mock.requests();
        assert_eq!(requests[1].body_json()["orderSide"], json!("Ask"));
        assert_eq!(requests[1].body_json()["ordertype"], json!("Market"));
    }

    #[tokio::test]
    async fn test_order_rejected_by_exchange() {
        let mock = MockRest::replying(json!({
            "success": false,
            "errorCode": 3,
            "errorMessage": "Invalid argument."
        }));
        let connector = signed_connector(&mock);

        let order = Order::new("BTC", "AUD", 100.0, 1.0, OrderSide::Bid);
        let outcome = connector
            .place_order(&order, OrderType::Limit, "req-x")
            .await
            .unwrap();

        let rejection = outcome.rejection().unwrap();
        assert_eq!(rejection.error_code, Some(3));
        assert_eq!(rejection.message, "Invalid argument.");
    }

    #[tokio::test]
    async fn test_cancel_empty_list_is_invalid() {
        let mock = MockRest::replying(json!({"success": true, "responses": []}));
        let connector = signed_connector(&mock);

        let result = connector.cancel_orders(&[]).await;
        assert!(matches!(result, Err(ExchangeError::InvalidParameters(_))));
        assert!(mock.requests().is_empty());
    }

    #[tokio::test]
    async fn test_cancel_batch_rejection_marks_all_failed() {
        let mock = MockRest::replying(json!({
            "success": false,
            "errorCode": 3,
            "errorMessage": "Invalid argument."
        }));
        let connector = signed_connector(&mock);

        let results = connector.cancel_orders(&[1, 2, 3]).await.unwrap();
        assert_eq!(results, vec![false, false, false]);

        let requests = mock.requests();
        assert_eq!(requests[0].endpoint, "/order/cancel");
        assert_eq!(requests[0].body_str(), r#"{"orderIds":[1,2,3]}"#);
    }

    #[tokio::test]
    async fn test_cancel_reports_each_order() {
        let mock = MockRest::replying(json!({
            "success": true,
            "responses": [
                {"success": true, "id": 7},
                {"success": false, "id": 8, "errorCode": 3, "errorMessage": "order not found"}
            ]
        }));
        let connector = signed_connector(&mock);

        let results = connector.cancel_orders(&[7, 8, 9]).await.unwrap();
        assert_eq!(results, vec![true, false, false]);
    }

    #[tokio::test]
    async fn test_concurrent_orders_get_distinct_ids_and_timestamps() {
        let mock = MockRest::new(|request| {
            let body = request.body_json();
            let id: u64 = body["clientRequestId"].as_str().unwrap().parse().unwrap();
            Ok(json!({"success": true, "id": id * 10}))
        });
        let connector = signed_connector(&mock);

        let ids: Vec<String> = (1..=8).map(|i| i.to_string()).collect();
        let futures = ids.iter().map(|id| {
            connector.buy("BTC", "AUD", 100.0, 0.01, "Limit", id.as_str())
        });
        let results = join_all(futures).await;

        for (i, result) in results.into_iter().enumerate() {
            let placed = result.unwrap().success().unwrap();
            assert_eq!(placed.id, (i as u64 + 1) * 10);
        }

        let mut timestamps: Vec<u64> = mock
            .requests()
            .iter()
            .map(|r| r.headers["timestamp"].parse().unwrap())
            .collect();
        let sent = timestamps.clone();
        timestamps.sort_unstable();
        assert_eq!(sent, timestamps, "timestamps never go backwards");
    }
}

mod market_data {
    use super::*;

    #[tokio::test]
    async fn test_order_book_preserves_level_order() {
        let mock = MockRest::replying(json!({
            "currency": "AUD",
            "instrument": "BTC",
            "timestamp": 1_700_000_000,
            "bids": [[44_000.0, 0.5], [43_990.5, 1.25]],
            "asks": [[44_010.0, 0.75]]
        }));
        let connector = read_only_connector(&mock);

        let book = connector
            .get_order_book("BTC", "AUD")
            .await
            .unwrap()
            .success()
            .unwrap();

        assert_eq!(book.bids.len(), 2);
        assert_eq!(book.asks.len(), 1);
        assert!((book.bids[0].price - 44_000.0).abs() < f64::EPSILON);
        assert!((book.bids[1].volume - 1.25).abs() < f64::EPSILON);
        assert_eq!(book.bids[0].side, OrderSide::Bid);
        assert_eq!(book.asks[0].side, OrderSide::Ask);
        assert_eq!(book.asks[0].instrument, "BTC");

        let requests = mock.requests();
        assert_eq!(requests[0].endpoint, "/market/BTC/AUD/orderbook");
        assert!(requests[0].headers.is_empty(), "public calls are unsigned");
    }

    #[tokio::test]
    async fn test_price_from_tick() {
        let mock = MockRest::replying(json!({
            "bestBid": 44_000.5,
            "bestAsk": 44_010.0,
            "lastPrice": 44_005.25,
            "currency": "AUD",
            "instrument": "BTC",
            "timestamp": 1_700_000_000,
            "volume24h": 123.45
        }));
        let connector = read_only_connector(&mock);

        let price = connector
            .get_price("BTC", "AUD")
            .await
            .unwrap()
            .success()
            .unwrap();

        assert!((price.best_bid - 44_000.5).abs() < f64::EPSILON);
        assert!((price.volume_24h - 123.45).abs() < f64::EPSILON);
        assert_eq!(mock.requests()[0].endpoint, "/market/BTC/AUD/tick");
    }

    #[tokio::test]
    async fn test_price_unavailable_on_empty_body() {
        let mock = MockRest::replying(Value::Null);
        let connector = read_only_connector(&mock);

        let outcome = connector.get_price("BTC", "AUD").await.unwrap();
        assert!(!outcome.is_success());
    }

    #[tokio::test]
    async fn test_price_with_wrong_shape_is_schema_error() {
        let mock = MockRest::replying(json!({"bestBid": "not a number"}));
        let connector = read_only_connector(&mock);

        let result = connector.get_price("BTC", "AUD").await;
        assert!(matches!(result, Err(ExchangeError::SchemaError(_))));
    }

    #[tokio::test]
    async fn test_trades_since_query() {
        let mock = MockRest::replying(json!([
            {"tid": 4_432_702_312_i64, "amount": 0.01, "price": 44_000.0, "date": 1_700_000_000},
            {"tid": 4_432_702_313_i64, "amount": 0.02, "price": 44_001.0, "date": 1_700_000_060}
        ]));
        let connector = read_only_connector(&mock);

        let trades = connector
            .get_trades("BTC", "AUD", Some(4_432_702_300))
            .await
            .unwrap()
            .success()
            .unwrap();

        assert_eq!(trades.len(), 2);
        assert_eq!(trades[0].id, 4_432_702_312);
        assert_eq!(trades[1].timestamp.timestamp(), 1_700_000_060);

        let requests = mock.requests();
        assert_eq!(requests[0].endpoint, "/market/BTC/AUD/trades");
        assert_eq!(
            requests[0].query,
            vec![("since".to_string(), "4432702300".to_string())]
        );
    }

    #[tokio::test]
    async fn test_trades_without_since_has_no_query() {
        let mock = MockRest::replying(json!([]));
        let connector = read_only_connector(&mock);

        let trades = connector.get_trades("ETH", "AUD", None).await.unwrap();
        assert!(trades.success().unwrap().is_empty());
        assert!(mock.requests()[0].query.is_empty());
    }

    #[tokio::test]
    async fn test_http_error_is_rejection() {
        let mock = MockRest::new(|_| {
            Err(ExchangeError::ApiError {
                code: 404,
                message: r#"{"success":false,"errorCode":4,"errorMessage":"Not found"}"#
                    .to_string(),
            })
        });
        let connector = read_only_connector(&mock);

        let outcome = connector.get_order_book("XYZ", "AUD").await.unwrap();
        let rejection = outcome.rejection().unwrap();
        assert_eq!(rejection.status, Some(404));
        assert_eq!(rejection.error_code, Some(4));
    }

    #[tokio::test]
    async fn test_network_failure_is_hard_error() {
        let mock =
            MockRest::new(|_| Err(ExchangeError::NetworkError("connection reset".to_string())));
        let connector = read_only_connector(&mock);

        let result = connector.get_order_book("BTC", "AUD").await;
        assert!(matches!(result, Err(ExchangeError::NetworkError(_))));
    }
}

mod account {
    use super::*;

    #[tokio::test]
    async fn test_balances_are_descaled() {
        let mock = MockRest::replying(json!([
            {"currency": "BTC", "balance": 250_000_000, "pendingFunds": 10_000_000},
            {"currency": "AUD", "balance": 0, "pendingFunds": 0}
        ]));
        let connector = signed_connector(&mock);

        let account = connector
            .get_account_balances()
            .await
            .unwrap()
            .success()
            .unwrap();

        let btc = account.balance("BTC").unwrap();
        assert!((btc.balance - 2.5).abs() < f64::EPSILON);
        assert!((btc.pending_funds - 0.1).abs() < f64::EPSILON);
        assert!(account.balance("AUD").unwrap().balance.abs() < f64::EPSILON);

        let requests = mock.requests();
        let request = &requests[0];
        assert_eq!(request.method, "GET");
        assert_eq!(request.endpoint, "/account/balance");

        let timestamp: u64 = request.headers["timestamp"].parse().unwrap();
        let verifier = BtcMarketsSigner::new(API_KEY.to_string(), SECRET).unwrap();
        let expected = verifier.sign("/account/balance", None, timestamp).unwrap();
        assert_eq!(request.headers["signature"], expected["signature"]);
    }

    #[tokio::test]
    async fn test_trading_fee_default_pair() {
        let mock = MockRest::replying(json!({
            "success": true,
            "errorCode": null,
            "errorMessage": null,
            "tradingFeeRate": 850_000,
            "volume30Day": 0
        }));
        let connector = signed_connector(&mock);

        let fee = connector
            .get_trading_fee()
            .await
            .unwrap()
            .success()
            .unwrap();

        assert!((fee - 0.0085).abs() < 1e-12);
        assert_eq!(mock.requests()[0].endpoint, "/account/AUD/AUD/tradingfee");
    }

    #[tokio::test]
    async fn test_trading_fee_for_pair() {
        let mock = MockRest::replying(json!({"tradingFeeRate": 220_000}));
        let connector = BtcMarketsBuilder::new()
            .with_credentials(API_KEY.to_string(), SECRET.to_string())
            .with_fee_pair("BTC".to_string(), "AUD".to_string())
            .build_with_client(mock.clone())
            .unwrap();

        connector.get_trading_fee().await.unwrap();
        connector.get_trading_fee_for("ETH", "BTC").await.unwrap();

        let requests = mock.requests();
        assert_eq!(requests[0].endpoint, "/account/BTC/AUD/tradingfee");
        assert_eq!(requests[1].endpoint, "/account/ETH/BTC/tradingfee");
    }

    #[tokio::test]
    async fn test_signed_call_without_credentials() {
        let mock = MockRest::replying(json!([]));
        let connector = read_only_connector(&mock);

        let result = connector.get_account_balances().await;
        assert!(matches!(result, Err(ExchangeError::AuthError(_))));
        assert!(mock.requests().is_empty());
    }

    #[tokio::test]
    async fn test_balance_rejection_keeps_error_fields() {
        let mock = MockRest::replying(json!({
            "success": false,
            "errorCode": 1,
            "errorMessage": "Authentication failed."
        }));
        let connector = signed_connector(&mock);

        match connector.get_account_balances().await.unwrap() {
            ApiOutcome::Rejected(rejection) => {
                assert_eq!(rejection.error_code, Some(1));
                assert_eq!(rejection.message, "Authentication failed.");
            }
            ApiOutcome::Success(_) => panic!("expected a rejection"),
        }
    }
}
