use {
    crate::traits::{OrderbookApi, OrderbookError},
    anyhow::{Context, Result},
    model::order::{OrderCreation, OrderUid},
    url::Url,
};

const ORDERS_ENDPOINT: &str = "api/v1/orders";

/// HTTP client of the order book API.
pub struct Orderbook {
    client: reqwest::Client,
    orders_url: Url,
}

impl Orderbook {
    pub fn new(client: reqwest::Client, mut base_url: Url) -> Result<Self> {
        // Without the trailing slash `join` would replace the last path segment,
        // e.g. the network name in `https://api.cow.fi/xdai`.
        if !base_url.path().ends_with('/') {
            base_url.set_path(&format!("{}/", base_url.path()));
        }
        let orders_url = base_url
            .join(ORDERS_ENDPOINT)
            .context("invalid order book url")?;
        Ok(Self { client, orders_url })
    }
}

#[async_trait::async_trait]
impl OrderbookApi for Orderbook {
    async fn create_order(&self, order: &OrderCreation) -> Result<OrderUid, OrderbookError> {
        let response = self
            .client
            .post(self.orders_url.clone())
            .json(order)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(OrderbookError::Rejected {
                status: status.as_u16(),
                body,
            });
        }
        serde_json::from_str(&body).map_err(|source| OrderbookError::Malformed { body, source })
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        alloy::primitives::{Address, B256, Bytes, U256},
        axum::{Json, Router, http::StatusCode, routing::post},
        model::{
            order::{BuyTokenDestination, OrderKind, SellTokenSource},
            signature::SigningScheme,
        },
    };

    fn order() -> OrderCreation {
        OrderCreation {
            from: Address::repeat_byte(1),
            sell_token: Address::repeat_byte(2),
            buy_token: Address::repeat_byte(3),
            receiver: Address::repeat_byte(1),
            sell_amount: U256::from(10_000_000_000_000_u64),
            buy_amount: U256::from(2_000),
            valid_to: 1_700_001_200,
            app_data: B256::ZERO,
            fee_amount: U256::ZERO,
            kind: OrderKind::Sell,
            partially_fillable: false,
            sell_token_balance: SellTokenSource::Erc20,
            buy_token_balance: BuyTokenDestination::Erc20,
            signing_scheme: SigningScheme::Eip1271,
            signature: Bytes::from(vec![0xc0, 0xff, 0xee]),
        }
    }

    /// Serves `router` on an ephemeral port and returns its base url.
    async fn serve(router: Router) -> Url {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });
        format!("http://{addr}/xdai").parse().unwrap()
    }

    #[test]
    fn keeps_network_path_segment() {
        let orderbook = Orderbook::new(
            reqwest::Client::new(),
            "https://api.cow.fi/xdai".parse().unwrap(),
        )
        .unwrap();
        assert_eq!(
            orderbook.orders_url.as_str(),
            "https://api.cow.fi/xdai/api/v1/orders"
        );

        let orderbook = Orderbook::new(
            reqwest::Client::new(),
            "https://api.cow.fi/xdai/".parse().unwrap(),
        )
        .unwrap();
        assert_eq!(
            orderbook.orders_url.as_str(),
            "https://api.cow.fi/xdai/api/v1/orders"
        );
    }

    #[tokio::test]
    async fn returns_uid_of_created_order() {
        let router = Router::new().route(
            "/xdai/api/v1/orders",
            post(|Json(body): Json<serde_json::Value>| async move {
                assert_eq!(body["kind"], "sell");
                assert_eq!(body["sellAmount"], "10000000000000");
                assert_eq!(body["signingScheme"], "eip1271");
                (StatusCode::CREATED, Json("0xabc"))
            }),
        );
        let orderbook = Orderbook::new(reqwest::Client::new(), serve(router).await).unwrap();

        let uid = orderbook.create_order(&order()).await.unwrap();
        assert_eq!(uid, OrderUid("0xabc".to_string()));
    }

    #[tokio::test]
    async fn rejection_carries_status_and_body() {
        let router = Router::new().route(
            "/xdai/api/v1/orders",
            post(|| async {
                (
                    StatusCode::BAD_REQUEST,
                    r#"{"errorType":"InvalidSignature"}"#,
                )
            }),
        );
        let orderbook = Orderbook::new(reqwest::Client::new(), serve(router).await).unwrap();

        let err = orderbook.create_order(&order()).await.unwrap_err();
        assert!(matches!(
            err,
            OrderbookError::Rejected { status: 400, ref body } if body.contains("InvalidSignature")
        ));
    }

    #[tokio::test]
    async fn malformed_uid() {
        let router = Router::new().route(
            "/xdai/api/v1/orders",
            post(|| async { (StatusCode::CREATED, "not json") }),
        );
        let orderbook = Orderbook::new(reqwest::Client::new(), serve(router).await).unwrap();

        let err = orderbook.create_order(&order()).await.unwrap_err();
        assert!(matches!(err, OrderbookError::Malformed { .. }));
    }
}
