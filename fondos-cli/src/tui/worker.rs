use fondos_api::FondosClient;
use fondos_core::{Effect, Event};
use tokio::sync::mpsc;
use tracing::debug;

/// Run one HTTP effect and turn its outcome into the completion event.
/// Session effects are not the worker's job and yield `None`.
pub async fn execute(client: &FondosClient, effect: Effect) -> Option<Event> {
    let event = match effect {
        Effect::FetchFunds { request } => match client.list_funds().await {
            Ok(funds) => Event::FundsLoaded { request, funds },
            Err(e) => Event::RequestFailed {
                request,
                message: e.to_string(),
            },
        },
        Effect::FetchTransactions { request, user } => {
            match client.list_transactions(&user).await {
                Ok(transactions) => Event::TransactionsLoaded {
                    request,
                    transactions,
                },
                Err(e) => Event::RequestFailed {
                    request,
                    message: e.to_string(),
                },
            }
        }
        Effect::Subscribe { request, payload } => match client.subscribe(&payload).await {
            Ok(_) => Event::SubscribeSucceeded {
                request,
                cedula: payload.cedula,
            },
            Err(e) => Event::RequestFailed {
                request,
                message: e.to_string(),
            },
        },
        Effect::CreateTransaction { request, payload } => {
            match client.create_transaction(&payload).await {
                Ok(_) => Event::TransactionSucceeded { request },
                Err(e) => Event::RequestFailed {
                    request,
                    message: e.to_string(),
                },
            }
        }
        Effect::PersistSession(_) | Effect::ClearSession => return None,
    };
    Some(event)
}

/// Each effect runs on its own task; ordering and staleness are settled by
/// the controller's request ids, so nothing is cancelled here.
pub async fn run_worker(
    client: FondosClient,
    mut rx: mpsc::UnboundedReceiver<Effect>,
    tx: std::sync::mpsc::Sender<Event>,
) {
    while let Some(effect) = rx.recv().await {
        let client = client.clone();
        let tx2 = tx.clone();
        tokio::spawn(async move {
            debug!(?effect, "running effect");
            if let Some(event) = execute(&client, effect).await {
                let _ = tx2.send(event);
            }
        });
    }
}
