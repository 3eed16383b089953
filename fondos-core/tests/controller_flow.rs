use fondos_core::controller::{LOGGED_OUT_MESSAGE, SUBSCRIBED_MESSAGE, TRANSACTION_MESSAGE};
use fondos_core::{
    AppState, Effect, Event, Fund, MemorySessionStore, Modal, RequestId, Session, SessionStore,
    SubscribeForm, Transaction, TransactionForm, TransactionKind,
};
use rust_decimal::Decimal;

fn fund_x() -> Fund {
    Fund::new("X", "Y", Decimal::from(50))
}

fn request_of(effects: &[Effect]) -> RequestId {
    effects
        .iter()
        .find_map(Effect::request_id)
        .expect("an HTTP effect")
}

/// Drive effects that touch the session against a store, the way the CLI does.
fn run_local(effects: &[Effect], session: &mut Session<MemorySessionStore>) {
    for e in effects {
        match e {
            Effect::PersistSession(id) => session.set(id).unwrap(),
            Effect::ClearSession => session.clear().unwrap(),
            _ => {}
        }
    }
}

fn history() -> Vec<Transaction> {
    vec![
        Transaction::new("1", "A", TransactionKind::from("deposito"), Decimal::from(100)),
        Transaction::new("2", "A", TransactionKind::from("cancelacion"), Decimal::from(30)),
        Transaction::new("3", "B", TransactionKind::from("deposito"), Decimal::from(50)),
    ]
}

#[test]
fn subscribe_flow_switches_to_dashboard() {
    let mut session = Session::open(MemorySessionStore::new()).unwrap();
    let mut state = AppState::new(session.current().map(str::to_string));

    let start = state.apply(Event::Started);
    state.apply(Event::FundsLoaded {
        request: request_of(&start),
        funds: vec![fund_x()],
    });

    state.apply(Event::OpenSubscribe(fund_x()));
    let form = SubscribeForm {
        cedula: "123".into(),
        correo: "a@b.com".into(),
        telefono: "555".into(),
        saldo: "100".into(),
    };
    let payload = form.validate(&fund_x()).unwrap();
    let submit = state.apply(Event::SubmitSubscribe(payload.clone()));
    assert_eq!(
        submit,
        vec![Effect::Subscribe {
            request: request_of(&submit),
            payload
        }]
    );
    assert!(state.status().loading);

    let after = state.apply(Event::SubscribeSucceeded {
        request: request_of(&submit),
        cedula: "123".into(),
    });
    run_local(&after, &mut session);

    assert_eq!(session.current(), Some("123"));
    assert_eq!(state.session(), Some("123"));
    assert_eq!(state.modal(), &Modal::None);
    assert!(!state.is_catalog_visible());
    assert!(state.is_dashboard_visible());
    assert_eq!(state.status().success.as_deref(), Some(SUBSCRIBED_MESSAGE));
    assert!(matches!(
        after.last(),
        Some(Effect::FetchTransactions { user, .. }) if user == "123"
    ));

    state.apply(Event::TransactionsLoaded {
        request: request_of(&after),
        transactions: history(),
    });
    assert_eq!(state.balances().get("A"), Some(Decimal::from(70)));
    assert_eq!(state.balances().get("B"), Some(Decimal::from(50)));
    // success survives the follow-up refetch
    assert_eq!(state.status().success.as_deref(), Some(SUBSCRIBED_MESSAGE));
    assert!(!state.status().loading);
}

#[test]
fn api_error_keeps_modal_open() {
    let mut state = AppState::new(Some("123".into()));
    let start = state.apply(Event::Started);
    state.apply(Event::TransactionsLoaded {
        request: request_of(&start),
        transactions: history(),
    });

    state.apply(Event::OpenTransaction {
        fund: "A".into(),
        kind: TransactionKind::Cancellation,
    });
    let payload = TransactionForm { monto: "500".into() }
        .validate("123", "A", TransactionKind::Cancellation)
        .unwrap();
    let submit = state.apply(Event::SubmitTransaction(payload));

    state.apply(Event::RequestFailed {
        request: request_of(&submit),
        message: "saldo insuficiente".into(),
    });

    assert_eq!(state.status().error.as_deref(), Some("saldo insuficiente"));
    assert!(!state.status().loading);
    assert_eq!(
        state.modal(),
        &Modal::Transaction {
            fund: "A".into(),
            kind: TransactionKind::Cancellation
        }
    );
}

#[test]
fn subscribe_error_keeps_form_and_catalog() {
    let mut session = Session::open(MemorySessionStore::new()).unwrap();
    let mut state = AppState::new(None);
    let start = state.apply(Event::Started);
    state.apply(Event::FundsLoaded {
        request: request_of(&start),
        funds: vec![fund_x()],
    });

    state.apply(Event::OpenSubscribe(fund_x()));
    let payload = SubscribeForm {
        cedula: "123".into(),
        correo: "a@b.com".into(),
        telefono: "555".into(),
        saldo: "10".into(),
    }
    .validate(&fund_x())
    .unwrap();
    let submit = state.apply(Event::SubmitSubscribe(payload));

    let after = state.apply(Event::RequestFailed {
        request: request_of(&submit),
        message: "monto minimo no alcanzado".into(),
    });
    run_local(&after, &mut session);

    assert!(after.is_empty());
    assert!(!after.iter().any(|e| matches!(e, Effect::PersistSession(_))));
    assert_eq!(state.modal(), &Modal::Subscribe(fund_x()));
    assert_eq!(state.session(), None);
    assert_eq!(session.current(), None);
    assert!(state.is_catalog_visible());
    assert!(!state.is_dashboard_visible());
    assert_eq!(
        state.status().error.as_deref(),
        Some("monto minimo no alcanzado")
    );
    assert_eq!(state.status().success, None);
    assert!(!state.status().loading);
}

#[test]
fn transaction_success_refetches_dashboard() {
    let mut state = AppState::new(Some("123".into()));
    state.apply(Event::Started);
    state.apply(Event::OpenTransaction {
        fund: "A".into(),
        kind: TransactionKind::Deposit,
    });
    let payload = TransactionForm { monto: "10".into() }
        .validate("123", "A", TransactionKind::Deposit)
        .unwrap();
    let submit = state.apply(Event::SubmitTransaction(payload));

    let after = state.apply(Event::TransactionSucceeded {
        request: request_of(&submit),
    });
    assert_eq!(state.modal(), &Modal::None);
    assert_eq!(state.status().success.as_deref(), Some(TRANSACTION_MESSAGE));
    assert!(matches!(after.as_slice(), [Effect::FetchTransactions { .. }]));
}

#[test]
fn second_submit_while_pending_is_ignored() {
    let mut state = AppState::new(None);
    state.apply(Event::OpenSubscribe(fund_x()));
    let payload = SubscribeForm {
        cedula: "1".into(),
        correo: "a@b.c".into(),
        telefono: "2".into(),
        saldo: "60".into(),
    }
    .validate(&fund_x())
    .unwrap();

    assert_eq!(state.apply(Event::SubmitSubscribe(payload.clone())).len(), 1);
    assert!(state.is_submitting());
    assert!(state.apply(Event::SubmitSubscribe(payload)).is_empty());
}

#[test]
fn logout_clears_session_and_dashboard() {
    let store = MemorySessionStore::with_user("123");
    let mut session = Session::open(store.clone()).unwrap();
    let mut state = AppState::new(session.current().map(str::to_string));

    let start = state.apply(Event::Started);
    state.apply(Event::TransactionsLoaded {
        request: request_of(&start),
        transactions: history(),
    });
    assert!(!state.transactions().is_empty());

    let effects = state.apply(Event::Logout);
    run_local(&effects, &mut session);

    assert_eq!(store.load().unwrap(), None);
    assert_eq!(state.session(), None);
    assert!(state.is_catalog_visible());
    assert!(!state.is_dashboard_visible());
    assert!(state.transactions().is_empty());
    assert!(state.balances().is_empty());
    assert_eq!(state.status().success.as_deref(), Some(LOGGED_OUT_MESSAGE));
    assert!(matches!(
        effects.as_slice(),
        [Effect::ClearSession, Effect::FetchFunds { .. }]
    ));
}

#[test]
fn transactions_arriving_after_logout_are_dropped() {
    let mut state = AppState::new(Some("123".into()));
    let start = state.apply(Event::Started);
    state.apply(Event::Logout);

    state.apply(Event::TransactionsLoaded {
        request: request_of(&start),
        transactions: history(),
    });
    assert!(state.transactions().is_empty());
    assert!(state.balances().is_empty());
}
