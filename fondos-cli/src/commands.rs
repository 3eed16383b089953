//! One-shot subcommands: each runs a single flow against the service and
//! prints the result.

use anyhow::{Context, Result, bail};
use fondos_api::FondosClient;
use fondos_core::{
    Session, SessionStore, SubscribeForm, TransactionForm, TransactionKind, aggregate, find_fund,
};
use tracing::info;

use crate::render;

pub async fn list_funds(client: &FondosClient) -> Result<()> {
    let funds = client.list_funds().await.context("fetching funds")?;
    print!("{}", render::funds_table(&funds));
    Ok(())
}

pub async fn subscribe<S: SessionStore>(
    client: &FondosClient,
    session: &mut Session<S>,
    fund_name: &str,
    form: SubscribeForm,
) -> Result<()> {
    let funds = client.list_funds().await.context("fetching funds")?;
    let Some(fund) = find_fund(&funds, fund_name) else {
        bail!("fund not found: {fund_name} (run `fondos funds` to list them)");
    };

    let payload = form.validate(fund)?;
    if !fund.accepts_opening(payload.saldo) {
        // The service decides; this is only a heads-up.
        eprintln!(
            "note: opening balance {} is below the fund minimum {}",
            render::money(payload.saldo),
            render::money(fund.monto_minimo)
        );
    }

    let confirmation = client.subscribe(&payload).await?;
    session.set(&payload.cedula)?;
    info!(user = %payload.cedula, fund = %fund.nombre, "subscribed");

    println!("Subscribed {} to {}.", payload.cedula, fund.nombre);
    if let Some(msg) = confirmation.message {
        println!("{msg}");
    }
    Ok(())
}

fn resolve_user<S: SessionStore>(session: &Session<S>, user: Option<String>) -> Result<String> {
    match user.or_else(|| session.current().map(str::to_string)) {
        Some(u) => Ok(u),
        None => bail!("no active session: subscribe to a fund first or pass --user"),
    }
}

pub async fn history<S: SessionStore>(
    client: &FondosClient,
    session: &Session<S>,
    user: Option<String>,
) -> Result<()> {
    let user = resolve_user(session, user)?;
    let transactions = client
        .list_transactions(&user)
        .await
        .with_context(|| format!("fetching transactions for {user}"))?;
    let summary = aggregate(&transactions);

    println!("# Investment summary ({user})\n");
    print!("{}", render::balance_summary(&summary));
    println!("\n# Transaction history\n");
    print!("{}", render::transactions_table(&transactions));
    Ok(())
}

pub async fn transact<S: SessionStore>(
    client: &FondosClient,
    session: &Session<S>,
    fund: &str,
    amount: &str,
    kind: TransactionKind,
) -> Result<()> {
    let user = resolve_user(session, None)?;
    let payload = TransactionForm {
        monto: amount.to_string(),
    }
    .validate(&user, fund, kind)?;

    let confirmation = client.create_transaction(&payload).await?;
    info!(user = %user, fund, kind = %payload.operacion, "transaction created");
    println!(
        "{} of {} on {} completed.",
        payload.operacion.label(),
        render::money(payload.monto),
        payload.fondo
    );
    if let Some(msg) = confirmation.message {
        println!("{msg}");
    }

    let transactions = client
        .list_transactions(&user)
        .await
        .context("refreshing transactions")?;
    let summary = aggregate(&transactions);
    if let Some(net) = summary.get(fund) {
        println!("Balance in {fund}: {}", render::money(net));
    }
    Ok(())
}

pub fn whoami<S: SessionStore>(session: &Session<S>) {
    match session.current() {
        Some(user) => println!("{user}"),
        None => println!("Not logged in."),
    }
}

pub fn logout<S: SessionStore>(session: &mut Session<S>) -> Result<()> {
    if !session.is_active() {
        println!("Not logged in.");
        return Ok(());
    }
    session.clear()?;
    println!("You have logged out.");
    Ok(())
}
