mod common;

use std::time::Duration;

use common::setup_state;
use food_order_api::{
    entity::orders,
    error::AppError,
    models::{NewOrder, OrderStatus},
    repository::{CustomerRepository, OrderRepository},
    transactor::{Session, Transactor},
};
use sea_orm::{ConnectionTrait, EntityTrait, PaginatorTrait};
use uuid::Uuid;

fn customers_of(state: &food_order_api::state::AppState) -> (Transactor, CustomerRepository) {
    let transactor = Transactor::new(state.orm.clone());
    let customers = CustomerRepository::new(transactor.clone());
    (transactor, customers)
}

#[tokio::test]
async fn committed_work_is_visible_afterwards() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let (transactor, customers) = customers_of(&state);
    let repo = &customers;

    let created = transactor
        .run_in_transaction(&Session::pooled(), move |session| async move {
            assert!(session.in_transaction());
            repo.create(&session, "+15551000001", None).await
        })
        .await?;

    let found = customers
        .get_by_phone(&Session::pooled(), "+15551000001")
        .await?
        .expect("committed customer");
    assert_eq!(found.id, created.id);
    Ok(())
}

#[tokio::test]
async fn failed_work_rolls_back_and_keeps_its_error() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let (transactor, customers) = customers_of(&state);
    let repo = &customers;

    let result: Result<(), AppError> = transactor
        .run_in_transaction(&Session::pooled(), move |session| async move {
            repo.create(&session, "+15551000002", None).await?;
            Err(AppError::BadRequest("stop".into()))
        })
        .await;
    assert!(matches!(result, Err(AppError::BadRequest(msg)) if msg == "stop"));

    assert!(
        customers
            .get_by_phone(&Session::pooled(), "+15551000002")
            .await?
            .is_none()
    );
    Ok(())
}

#[tokio::test]
async fn nested_transaction_fails_the_outer_one() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let (transactor, customers) = customers_of(&state);
    let repo = &customers;
    let tx = &transactor;

    let result = transactor
        .run_in_transaction(&Session::pooled(), move |session| async move {
            repo.create(&session, "+15551000003", None).await?;
            tx.run_in_transaction(&session, |_inner| async { Ok(()) }).await
        })
        .await;
    assert!(matches!(result, Err(AppError::Consistency(_))));

    assert!(
        customers
            .get_by_phone(&Session::pooled(), "+15551000003")
            .await?
            .is_none()
    );
    Ok(())
}

// A unit of work that smuggles its session out must not commit.
#[tokio::test]
async fn leaked_session_is_refused_and_rolled_back() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let (transactor, customers) = customers_of(&state);
    let repo = &customers;

    let result = transactor
        .run_in_transaction(&Session::pooled(), move |session| async move {
            repo.create(&session, "+15551000006", None).await?;
            Ok(session)
        })
        .await;
    assert!(matches!(result, Err(AppError::Consistency(_))));

    assert!(
        customers
            .get_by_phone(&Session::pooled(), "+15551000006")
            .await?
            .is_none()
    );
    Ok(())
}

// Foreign keys checked at commit time make the commit itself fail.
#[tokio::test]
async fn failed_commit_is_surfaced() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let transactor = Transactor::new(state.orm.clone());
    let orders_repo = OrderRepository::new(transactor.clone());
    let (tx, repo) = (&transactor, &orders_repo);

    let draft = NewOrder {
        user_id: Uuid::new_v4(),
        restaurant_id: Uuid::new_v4(),
        status: OrderStatus::AwaitingPayment,
        total_amount: 0,
        items: Vec::new(),
        pick_up: false,
    };

    let result = transactor
        .run_in_transaction(&Session::pooled(), move |session| async move {
            tx.conn(&session)?
                .execute_unprepared("PRAGMA defer_foreign_keys = ON")
                .await?;
            repo.create(&session, &draft).await
        })
        .await;
    assert!(matches!(result, Err(AppError::OrmError(_))));

    assert_eq!(orders::Entity::find().count(&state.orm).await?, 0);
    Ok(())
}

#[tokio::test]
async fn transactional_session_reads_its_own_writes() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let (transactor, customers) = customers_of(&state);
    let repo = &customers;

    transactor
        .run_in_transaction(&Session::pooled(), move |session| async move {
            repo.create(&session, "+15551000004", None).await?;
            let seen = repo.get_by_phone(&session, "+15551000004").await?;
            assert!(seen.is_some());
            Ok(())
        })
        .await?;
    Ok(())
}

#[tokio::test]
async fn abandoned_transaction_is_rolled_back() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let (transactor, customers) = customers_of(&state);
    let repo = &customers;

    let outcome = tokio::time::timeout(
        Duration::from_millis(50),
        transactor.run_in_transaction(&Session::pooled(), move |session| async move {
            repo.create(&session, "+15551000005", None).await?;
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        }),
    )
    .await;
    assert!(outcome.is_err(), "deadline must fire first");

    assert!(
        customers
            .get_by_phone(&Session::pooled(), "+15551000005")
            .await?
            .is_none()
    );
    Ok(())
}
