use chrono::Utc;
use food_order_api::{
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
};
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    // Ensure migrations are applied.
    let orm = create_orm_conn(&config.database_url, 1).await?;
    run_migrations(&orm).await?;
    orm.close().await?;

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await?;

    let customer_id = ensure_customer(&pool, "+10000000000", "Demo Customer").await?;
    let category_id = ensure_category(&pool, "Mains", 1).await?;
    seed_menu_items(&pool, category_id).await?;

    println!("Seed completed. Customer ID: {customer_id}, Category ID: {category_id}");
    Ok(())
}

async fn ensure_customer(pool: &sqlx::PgPool, phone: &str, name: &str) -> anyhow::Result<Uuid> {
    let row: (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO customers (id, phone, name, created_at)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (phone) DO UPDATE SET name = EXCLUDED.name
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(phone)
    .bind(name)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    println!("Ensured customer {phone}");
    Ok(row.0)
}

async fn ensure_category(pool: &sqlx::PgPool, name: &str, sort_order: i32) -> anyhow::Result<Uuid> {
    let existing: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM menu_categories WHERE name = $1")
        .bind(name)
        .fetch_optional(pool)
        .await?;
    if let Some((id,)) = existing {
        return Ok(id);
    }

    let id = Uuid::new_v4();
    sqlx::query("INSERT INTO menu_categories (id, name, sort_order) VALUES ($1, $2, $3)")
        .bind(id)
        .bind(name)
        .bind(sort_order)
        .execute(pool)
        .await?;
    println!("Created category {name}");
    Ok(id)
}

async fn seed_menu_items(pool: &sqlx::PgPool, category_id: Uuid) -> anyhow::Result<()> {
    let items = vec![
        ("Margherita", "Tomato, mozzarella, basil", 9.50),
        ("Pad Thai", "Rice noodles, peanuts, lime", 11.25),
        ("Caesar Salad", "Romaine, parmesan, croutons", 7.00),
        ("Lemonade", "Freshly squeezed", 3.50),
    ];

    for (name, description, price) in items {
        sqlx::query(
            r#"
            INSERT INTO menu_items (id, category_id, name, description, price, active)
            SELECT $1, $2, $3, $4, $5, TRUE
            WHERE NOT EXISTS (
                SELECT 1 FROM menu_items WHERE category_id = $2 AND name = $3
            )
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(category_id)
        .bind(name)
        .bind(description)
        .bind(price)
        .execute(pool)
        .await?;
    }

    println!("Seeded menu items");
    Ok(())
}
