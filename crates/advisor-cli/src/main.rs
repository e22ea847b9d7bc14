//! Command-line interface for advisor-rs

use advisor_agent::{ControllerConfig, ReasoningController};
use advisor_core::{AgentQuery, AgentResult, AgentStatus, CancelToken};
use advisor_llm::{AnthropicProvider, TextGenerator, TokenObserver};
use advisor_market::api::{FinancialsFetcher, MarketDataFetcher, NewsFetcher, SearchTickerClient};
use advisor_market::{
    FinancialStatementsTool, MarketConfig, RecentNewsTool, StockPriceTool, TickerLookupTool,
    TickerResolver, TickerStore,
};
use advisor_prompt::PromptAssembler;
use advisor_tools::{Tool, ToolRegistry};
use anyhow::Context;
use clap::Parser;
use comfy_table::Table;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "advisor-cli")]
#[command(about = "Investment research assistant", long_about = None)]
struct Args {
    /// Question to answer, e.g. "Is it a good time to invest in Amazon?"
    question: String,

    /// Path of the ticker lookup database
    #[arg(long, default_value = "stock_ticker_database.db")]
    db: PathBuf,

    /// Model to use
    #[arg(long, default_value = "claude-sonnet-4-5")]
    model: String,

    /// Maximum reasoning iterations
    #[arg(long, default_value_t = 7)]
    max_iterations: usize,

    /// Stream model output to stdout as it arrives
    #[arg(long)]
    stream: bool,

    /// Print the reasoning trace after the answer
    #[arg(long)]
    show_trace: bool,
}

struct StdoutObserver;

impl TokenObserver for StdoutObserver {
    fn on_token(&self, chunk: &str) {
        print!("{chunk}");
        let _ = std::io::stdout().flush();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    advisor_utils::init_tracing();

    let args = Args::parse();
    info!(model = %args.model, "Starting advisor-cli");

    let market_config = MarketConfig::builder()
        .ticker_db_path(&args.db)
        .build()
        .context("invalid market configuration")?
        .with_env_api_key();

    // The ticker table is optional; without it resolution falls back to the
    // external search API (when configured)
    let store = match TickerStore::open(&market_config.ticker_db_path).await {
        Ok(store) => Some(Arc::new(store)),
        Err(e) => {
            warn!(path = %market_config.ticker_db_path.display(), error = %e,
                  "Ticker database unavailable");
            None
        }
    };

    let search_api = market_config.search_ticker_api_key.as_ref().map(|key| {
        Arc::new(SearchTickerClient::new(
            market_config.search_ticker_base_url.clone(),
            key.clone(),
            market_config.search_ticker_rate_limit,
        ))
    });

    let generator: Arc<dyn TextGenerator> = Arc::new(
        AnthropicProvider::from_env(args.model.clone()).context("failed to create provider")?,
    );
    let assembler = Arc::new(PromptAssembler::new().context("failed to load prompt templates")?);

    let resolver = Arc::new(TickerResolver::new(
        generator.clone(),
        assembler.clone(),
        store,
        search_api,
    ));

    let today = chrono::Local::now().date_naive();
    let tools: Vec<Arc<dyn Tool>> = vec![
        Arc::new(TickerLookupTool::new(resolver)),
        Arc::new(StockPriceTool::new(
            MarketDataFetcher::new(market_config.price_window_days),
            today,
        )),
        Arc::new(RecentNewsTool::new(NewsFetcher::new(
            market_config.request_timeout,
            market_config.news_max_headlines,
        )?)),
        Arc::new(FinancialStatementsTool::new(FinancialsFetcher::new(
            market_config.request_timeout,
        )?)),
    ];
    let registry = Arc::new(ToolRegistry::new(tools).context("failed to build tool registry")?);

    let config = ControllerConfig {
        max_iterations: args.max_iterations,
        ..ControllerConfig::default()
    };
    let mut controller = ReasoningController::new(generator, assembler, registry, config);
    if args.stream {
        controller = controller.with_token_observer(Arc::new(StdoutObserver));
    }

    let query = AgentQuery::new(args.question.as_str(), today);
    let result = controller.run(&query, &CancelToken::new()).await;

    if args.stream {
        println!();
    }

    match &result.status {
        AgentStatus::Completed => println!("{}", result.output),
        AgentStatus::IterationLimitReached => {
            warn!("Iteration limit reached before a final answer");
            println!("{}", result.output);
        }
        AgentStatus::Failed { cause } => {
            anyhow::bail!("session failed: {cause}");
        }
    }

    if args.show_trace {
        print_trace(&result);
    }

    Ok(())
}

fn print_trace(result: &AgentResult) {
    let mut table = Table::new();
    table.set_header(vec!["#", "Thought", "Action", "Action Input", "Observation"]);
    for (index, step) in result.trace.iter().enumerate() {
        table.add_row(vec![
            index.to_string(),
            step.thought.clone(),
            step.action.clone(),
            step.action_input.clone(),
            truncate(&step.observation, 300),
        ]);
    }
    println!("{table}");
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let head: String = text.chars().take(max_chars).collect();
        format!("{head}...")
    }
}
