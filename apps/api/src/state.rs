//! Shared application state.

use std::sync::Arc;

use styler_core::{PlaintextCredentials, ResetTokenRegistry};
use styler_db::Database;

use crate::config::ApiConfig;
use crate::services::{AccountService, CartService, OrderService};

/// Handle passed to every handler. Cloning is cheap.
#[derive(Debug, Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

#[derive(Debug)]
struct AppStateInner {
    db: Database,
    config: ApiConfig,
    accounts: AccountService,
    carts: CartService,
    orders: OrderService,
}

impl AppState {
    /// Wires the services around one database handle.
    ///
    /// The reset-token registry is created here and lives as long as the
    /// process; tokens do not survive a restart.
    pub fn new(db: Database, config: ApiConfig) -> Self {
        let tokens = Arc::new(ResetTokenRegistry::new(config.reset_token_ttl()));
        let accounts = AccountService::new(db.clone(), tokens, Arc::new(PlaintextCredentials));

        AppState {
            inner: Arc::new(AppStateInner {
                carts: CartService::new(db.clone()),
                orders: OrderService::new(db.clone()),
                accounts,
                db,
                config,
            }),
        }
    }

    pub fn db(&self) -> &Database {
        &self.inner.db
    }

    pub fn config(&self) -> &ApiConfig {
        &self.inner.config
    }

    pub fn accounts(&self) -> &AccountService {
        &self.inner.accounts
    }

    pub fn carts(&self) -> &CartService {
        &self.inner.carts
    }

    pub fn orders(&self) -> &OrderService {
        &self.inner.orders
    }
}
