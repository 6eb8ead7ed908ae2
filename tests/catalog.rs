mod common;

use common::{create_category, create_menu_item, setup_state};
use food_order_api::{error::AppError, models::MenuItem};
use uuid::Uuid;

#[tokio::test]
async fn menu_is_grouped_by_category() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let mains = create_category(&state, "Mains").await?;
    let drinks = create_category(&state, "Drinks").await?;
    create_menu_item(&state, mains.id, "Pizza", 9.50).await?;
    create_menu_item(&state, mains.id, "Burger", 8.00).await?;
    create_menu_item(&state, drinks.id, "Soda", 2.00).await?;

    let (category, items) = state.menu.get_menu_by_category(mains.id).await?;
    assert_eq!(category, mains);
    let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["Burger", "Pizza"]);

    let err = state
        .menu
        .get_menu_by_category(Uuid::new_v4())
        .await
        .expect_err("unknown category");
    assert!(matches!(err, AppError::NotFound));
    Ok(())
}

#[tokio::test]
async fn menu_item_can_be_updated() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let mains = create_category(&state, "Mains").await?;
    let pizza = create_menu_item(&state, mains.id, "Pizza", 9.50).await?;

    let updated = state
        .menu
        .update_menu_item(MenuItem {
            price: 10.25,
            active: false,
            ..pizza.clone()
        })
        .await?;
    assert_eq!(updated.id, pizza.id);
    assert_eq!(updated.price, 10.25);
    assert!(!updated.active);

    let stored = state.menu.get_menu_item(pizza.id).await?.expect("item stored");
    assert_eq!(stored, updated);

    let err = state
        .menu
        .update_menu_item(MenuItem {
            id: Uuid::new_v4(),
            ..pizza
        })
        .await
        .expect_err("unknown item");
    assert!(matches!(err, AppError::NotFound));
    Ok(())
}

#[tokio::test]
async fn registering_the_same_phone_twice_returns_one_customer() -> anyhow::Result<()> {
    let state = setup_state().await?;

    let first = state
        .users
        .register_user("+15552000001", Some("Ada".into()))
        .await?;
    let second = state
        .users
        .register_user("+15552000001", Some("Someone Else".into()))
        .await?;

    assert_eq!(first.id, second.id);
    assert_eq!(second.name.as_deref(), Some("Ada"));

    let other = state.users.register_user("+15552000002", None).await?;
    assert_ne!(other.id, first.id);
    Ok(())
}

#[tokio::test]
async fn concurrent_registrations_of_one_phone_agree() -> anyhow::Result<()> {
    let state = setup_state().await?;

    let (first, second) = tokio::join!(
        state.users.register_user("+15552000003", None),
        state.users.register_user("+15552000003", None),
    );
    let (first, second) = (first?, second?);
    assert_eq!(first.id, second.id);
    Ok(())
}
