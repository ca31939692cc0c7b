//! Query command implementation.

use crate::cli::QueryArgs;
use crate::commands::setup::Engine;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use clubhouse_domain::{Filter, FilterOp, FilterValue, Predicate, QueryResponse};
use clubhouse_rag::{QueryError, QueryOptions};
use tokio_util::sync::CancellationToken;

/// Execute the query command.
///
/// `--max-dues` and `--club` replace the filter inferred from the question.
/// Ctrl-C cancels the pending query.
pub async fn execute_query(args: QueryArgs, engine: &Engine, formatter: &Formatter) -> Result<QueryResponse> {
    if args.question.trim().is_empty() {
        return Err(CliError::InvalidInput("Question must not be empty".to_string()));
    }

    let cancel = cancel_on_ctrl_c();
    let response = match explicit_filter(&args)? {
        Some(filter) => {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => Err(QueryError::Cancelled),
                result = engine.query_with_filter(&args.question, filter, args.top_k) => result,
            }
        }
        None => {
            let options = QueryOptions {
                top_k: args.top_k,
                apply_filters: !args.no_filters,
            };
            engine
                .query_with_cancellation(&args.question, options, cancel.clone())
                .await
        }
    };
    cancel.cancel();

    let response = response?;
    println!("{}", formatter.format_response(&response)?);
    Ok(response)
}

/// Token cancelled on the first Ctrl-C.
pub fn cancel_on_ctrl_c() -> CancellationToken {
    let token = CancellationToken::new();
    let child = token.clone();
    tokio::spawn(async move {
        tokio::select! {
            _ = child.cancelled() => {}
            result = tokio::signal::ctrl_c() => {
                if result.is_ok() {
                    child.cancel();
                }
            }
        }
    });
    token
}

/// Filter built from `--max-dues` and `--club`, if either is set.
fn explicit_filter(args: &QueryArgs) -> Result<Option<Filter>> {
    let mut filter = Filter::new();

    if let Some(max_dues) = args.max_dues {
        if !max_dues.is_finite() || max_dues < 0.0 {
            return Err(CliError::InvalidInput(
                "--max-dues must be a non-negative amount".to_string(),
            ));
        }
        filter.push(Predicate::new("dues", FilterOp::Lte, FilterValue::Number(max_dues)));
    }

    if let Some(club) = args.club.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
        filter.push(Predicate::new("club_name", FilterOp::Eq, FilterValue::Text(club.to_string())));
    }

    Ok((!filter.is_empty()).then_some(filter))
}
