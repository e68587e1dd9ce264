use crate::config::Config;
use booking::coordinator::Coordinator;
use booking::ledger::OrderLedger;
use booking::paypal::PaymentOrchestrator;
use booking::slots::SlotRegistry;
use booking::store::KvStore;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct AppState {
    pub coordinator: Arc<Coordinator>,
    pub admin_email: String,
    pub jwt_secret: String,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn KvStore>) -> Result<Self, anyhow::Error> {
        // A hung processor call must surface as "unknown outcome"
        // instead of a stuck handler.
        let http_client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        let coordinator = Coordinator::new(
            SlotRegistry::new(store.clone()),
            OrderLedger::new(store),
            PaymentOrchestrator::new(http_client, config.paypal),
        );

        Ok(Self {
            coordinator: Arc::new(coordinator),
            admin_email: config.admin_email,
            jwt_secret: config.jwt_secret,
        })
    }
}
