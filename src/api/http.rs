use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info};

use super::{ApiError, BudgetBackend, Snapshot};
use crate::config::Config;
use crate::models::{Budget, BudgetForm, BudgetId, Category, TransactionList};

const BUDGETS_PATH: &str = "budgets";
const CATEGORIES_PATH: &str = "transactions/categories/expense";
const TRANSACTIONS_PATH: &str = "transactions";

/// REST/JSON client. Owns a current-thread runtime so the blocking UI loop
/// can drive async requests.
pub(crate) struct HttpBackend {
    client: Client,
    base_url: String,
    token: Option<String>,
    runtime: tokio::runtime::Runtime,
}

impl HttpBackend {
    pub(crate) fn new(config: &Config) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(ApiError::Runtime)?;
        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
            runtime,
        })
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub(super) fn budget_path(id: &BudgetId) -> String {
        format!("{BUDGETS_PATH}/{}", urlencoding::encode(id.as_str()))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let req = self.client.request(method, self.url(path));
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&BudgetForm>,
    ) -> Result<Response, ApiError> {
        let label = method.as_str().to_string();
        let url = self.url(path);
        debug!(method = %label, %url, "sending request");

        let mut req = self.request(method, path);
        if let Some(form) = body {
            req = req.json(form);
        }
        let resp = req.send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                method: label,
                url,
                status: status.as_u16(),
            });
        }
        Ok(resp)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let resp = self.send(Method::GET, path, None).await?;
        Ok(resp.json::<T>().await?)
    }
}

impl BudgetBackend for HttpBackend {
    fn fetch_all(&self) -> Result<Snapshot, ApiError> {
        let (budgets, categories, list) = self.runtime.block_on(async {
            tokio::try_join!(
                self.get_json::<Vec<Budget>>(BUDGETS_PATH),
                self.get_json::<Vec<Category>>(CATEGORIES_PATH),
                self.get_json::<TransactionList>(TRANSACTIONS_PATH),
            )
        })?;
        info!(
            budgets = budgets.len(),
            categories = categories.len(),
            transactions = list.transactions.len(),
            "fetched budget data"
        );
        Ok(Snapshot {
            budgets,
            categories,
            transactions: list.transactions,
        })
    }

    fn create_budget(&self, form: &BudgetForm) -> Result<Budget, ApiError> {
        let budget = self.runtime.block_on(async {
            let resp = self.send(Method::POST, BUDGETS_PATH, Some(form)).await?;
            Ok::<_, ApiError>(resp.json::<Budget>().await?)
        })?;
        info!(id = %budget.id, category = %budget.category, "created budget");
        Ok(budget)
    }

    fn update_budget(&self, id: &BudgetId, form: &BudgetForm) -> Result<Budget, ApiError> {
        let path = Self::budget_path(id);
        let budget = self.runtime.block_on(async {
            let resp = self.send(Method::PUT, &path, Some(form)).await?;
            Ok::<_, ApiError>(resp.json::<Budget>().await?)
        })?;
        info!(id = %budget.id, category = %budget.category, "updated budget");
        Ok(budget)
    }

    fn delete_budget(&self, id: &BudgetId) -> Result<(), ApiError> {
        let path = Self::budget_path(id);
        self.runtime.block_on(self.send(Method::DELETE, &path, None))?;
        info!(%id, "deleted budget");
        Ok(())
    }
}
