//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::PagerConfig;
use crate::error::Result;
use crate::http::HttpClient;
use crate::pagination::{drive_queries_with, LoadOutcome, PaginationController, Snapshot};
use crate::types::Product;
use futures::Stream;
use serde_json::{json, Value};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::List { pages, refresh } => self.browse(None, *pages, *refresh).await,
            Commands::Search {
                query,
                pages,
                refresh,
            } => self.browse(Some(query), *pages, *refresh).await,
            Commands::Watch { debounce_ms } => self.watch(*debounce_ms).await,
        }
    }

    /// Load config from file (or defaults) and apply command-line overrides
    fn load_config(&self) -> Result<PagerConfig> {
        let mut config = match &self.cli.config {
            Some(path) => PagerConfig::from_file(path)?,
            None => PagerConfig::default(),
        };

        if let Some(base_url) = &self.cli.base_url {
            config.base_url.clone_from(base_url);
        }
        if let Some(limit) = self.cli.limit {
            config.page_size = limit;
        }

        config.validate()?;
        Ok(config)
    }

    fn build_controller(
        &self,
        config: &PagerConfig,
        query: Option<&str>,
    ) -> Result<PaginationController<Product>> {
        let client = HttpClient::with_config(config.http_client_config())?;
        Ok(PaginationController::from_source(
            client,
            config.controller_config(query),
        ))
    }

    /// Load `pages` pages, optionally refresh, then print the final state
    async fn browse(&self, query: Option<&str>, pages: usize, refresh: bool) -> Result<()> {
        let config = self.load_config()?;
        let controller = self.build_controller(&config, query)?;

        for _ in 0..pages {
            let outcome = controller.load_more().await;
            self.report("load_more", &outcome, &controller.snapshot());
            if !outcome.is_completed() {
                break;
            }
        }

        if refresh {
            let outcome = controller.refresh().await;
            self.report("refresh", &outcome, &controller.snapshot());
        }

        self.output_state(&controller.snapshot());
        controller.dispose();
        Ok(())
    }

    /// Treat each stdin line as the current contents of a search box
    async fn watch(&self, debounce_ms: Option<u64>) -> Result<()> {
        let config = self.load_config()?;
        let delay = debounce_ms.map_or_else(|| config.debounce(), Duration::from_millis);
        let controller = self.build_controller(&config, None)?;

        // Initial mount
        let outcome = controller.load_more().await;
        self.report("load_more", &outcome, &controller.snapshot());

        let lines = BufReader::new(tokio::io::stdin()).lines();
        let input = futures::stream::unfold(lines, |mut lines| async move {
            match lines.next_line().await {
                Ok(Some(line)) => Some((line, lines)),
                Ok(None) => None,
                Err(e) => {
                    warn!("Failed to read stdin: {}", e);
                    None
                }
            }
        });
        self.follow_queries(&controller, input, delay).await?;

        self.output_state(&controller.snapshot());
        controller.dispose();
        Ok(())
    }

    /// Apply settled search terms, reporting each load as it finishes
    async fn follow_queries<S>(
        &self,
        controller: &PaginationController<Product>,
        queries: S,
        delay: Duration,
    ) -> Result<Vec<LoadOutcome>>
    where
        S: Stream<Item = String>,
    {
        drive_queries_with(controller, queries, delay, |outcome, snapshot| {
            self.report("load_more", outcome, snapshot);
        })
        .await
    }

    /// Output the result of one operation
    fn report(&self, operation: &str, outcome: &LoadOutcome, snapshot: &Snapshot<Product>) {
        self.output_message(&outcome_message(operation, outcome, snapshot));
    }

    fn output_state(&self, snapshot: &Snapshot<Product>) {
        self.output_message(&state_message(snapshot));
    }

    /// Output a message
    fn output_message(&self, msg: &Value) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(msg).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
            }
        }
    }
}

/// Build the message for one operation outcome
fn outcome_message(operation: &str, outcome: &LoadOutcome, snapshot: &Snapshot<Product>) -> Value {
    match outcome {
        LoadOutcome::Completed { items } => {
            let start = snapshot.items.len().saturating_sub(*items);
            let page = match operation {
                "refresh" => &snapshot.items[..],
                _ => &snapshot.items[start..],
            };
            json!({
                "type": "PAGE",
                "page": {
                    "operation": operation,
                    "query": snapshot.query,
                    "count": items,
                    "nextOffset": snapshot.next_offset,
                    "exhausted": snapshot.exhausted,
                    "items": page,
                }
            })
        }
        LoadOutcome::Failed(message) => json!({
            "type": "ERROR",
            "error": {
                "operation": operation,
                "message": message,
            }
        }),
        other => json!({
            "type": "LOG",
            "log": {
                "level": "INFO",
                "message": format!("{operation}: {other:?}"),
            }
        }),
    }
}

/// Build the message describing the controller state
fn state_message(snapshot: &Snapshot<Product>) -> Value {
    json!({
        "type": "STATE",
        "state": {
            "query": snapshot.query,
            "count": snapshot.len(),
            "nextOffset": snapshot.next_offset,
            "exhausted": snapshot.exhausted,
            "status": format!("{:?}", snapshot.status),
            "lastError": snapshot.last_error,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::{ControllerStatus, SkipReason};
    use clap::Parser;
    use futures::{stream, StreamExt};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn snapshot(ids: std::ops::Range<u64>) -> Snapshot<Product> {
        Snapshot {
            items: ids
                .map(|id| Product {
                    id,
                    title: format!("Product {id}"),
                    price: 10.0,
                    thumbnail: String::new(),
                })
                .collect(),
            query: Some("phone".to_string()),
            next_offset: 0,
            exhausted: false,
            is_loading_more: false,
            is_refreshing: false,
            last_error: None,
            status: ControllerStatus::Idle,
            load_more_outcome: None,
            refresh_outcome: None,
        }
    }

    #[test]
    fn test_page_message_contains_only_new_items() {
        let mut snap = snapshot(0..15);
        snap.next_offset = 15;
        let msg = outcome_message("load_more", &LoadOutcome::Completed { items: 5 }, &snap);

        assert_eq!(msg["type"], "PAGE");
        assert_eq!(msg["page"]["count"], 5);
        assert_eq!(msg["page"]["nextOffset"], 15);
        let items = msg["page"]["items"].as_array().unwrap();
        assert_eq!(items.len(), 5);
        assert_eq!(items[0]["id"], 10);
    }

    #[test]
    fn test_refresh_message_contains_all_items() {
        let snap = snapshot(0..3);
        let msg = outcome_message("refresh", &LoadOutcome::Completed { items: 3 }, &snap);
        assert_eq!(msg["page"]["items"].as_array().unwrap().len(), 3);
        assert_eq!(msg["page"]["query"], "phone");
    }

    #[test]
    fn test_error_and_log_messages() {
        let snap = snapshot(0..0);
        let msg = outcome_message(
            "load_more",
            &LoadOutcome::Failed("Network error.".to_string()),
            &snap,
        );
        assert_eq!(msg["type"], "ERROR");
        assert_eq!(msg["error"]["message"], "Network error.");

        let msg = outcome_message(
            "load_more",
            &LoadOutcome::Skipped(SkipReason::Exhausted),
            &snap,
        );
        assert_eq!(msg["type"], "LOG");
        assert!(msg["log"]["message"]
            .as_str()
            .unwrap()
            .contains("Exhausted"));
    }

    #[test]
    fn test_state_message() {
        let mut snap = snapshot(0..2);
        snap.last_error = Some("Request timed out. Please try again.".to_string());
        snap.status = ControllerStatus::Exhausted;
        let msg = state_message(&snap);
        assert_eq!(msg["state"]["count"], 2);
        assert_eq!(msg["state"]["status"], "Exhausted");
        assert_eq!(
            msg["state"]["lastError"],
            "Request timed out. Please try again."
        );
    }

    fn search_body(ids: std::ops::Range<u64>) -> Value {
        let products: Vec<_> = ids
            .clone()
            .map(|id| json!({"id": id, "title": format!("Product {id}"), "price": 1.0}))
            .collect();
        json!({"products": products, "total": ids.count(), "skip": 0, "limit": 10})
    }

    #[tokio::test]
    async fn test_watch_newer_query_replaces_slow_search() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products/search"))
            .and(query_param("q", "lamp"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(search_body(1..4))
                    .set_delay(Duration::from_secs(10)),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/products/search"))
            .and(query_param("q", "desk"))
            .respond_with(ResponseTemplate::new(200).set_body_json(search_body(20..26)))
            .mount(&server)
            .await;

        let uri = server.uri();
        let runner = Runner::new(Cli::parse_from([
            "listing-pager",
            "--base-url",
            uri.as_str(),
            "watch",
        ]));
        let config = runner.load_config().unwrap();
        let controller = runner.build_controller(&config, None).unwrap();

        // "desk" settles while the "lamp" search is still waiting on the server
        let typed = stream::iter([("lamp", 0), ("desk", 300)]).then(|(query, wait_ms)| async move {
            tokio::time::sleep(Duration::from_millis(wait_ms)).await;
            query.to_string()
        });
        let outcomes = tokio::time::timeout(
            Duration::from_secs(5),
            runner.follow_queries(&controller, typed, Duration::from_millis(50)),
        )
        .await
        .expect("slow search should be superseded")
        .unwrap();

        assert_eq!(outcomes.len(), 2);
        assert!(outcomes.contains(&LoadOutcome::Cancelled));
        assert!(outcomes.contains(&LoadOutcome::Completed { items: 6 }));

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.query.as_deref(), Some("desk"));
        assert_eq!(snapshot.ids(), (20..26).collect::<Vec<u64>>());
    }
}
