use storefront_inventory_api::{
    colors::Color,
    config::AppConfig,
    db::{create_pool, run_migrations},
};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    // Ensure migrations are applied.
    run_migrations(&pool).await?;

    seed_products(&pool).await?;

    println!("Seed completed");
    Ok(())
}

async fn seed_products(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    // (code, name, price IDR, warehouse, tiktok, shopee, toko, color)
    let products = vec![
        ("GD-1-00", "Gamis Aurora", 185000, 70, 30, 0, 0, Color::BurgundiMaron),
        ("GD-2-13", "Khimar Basic", 95000, 120, 20, 20, 10, Color::Sage),
        ("GD-3-10", "Tunik Harian", 150000, 0, 5, 5, 5, Color::Hitam),
        ("GD-4-06", "Pashmina Premium", 65000, 200, 0, 0, 0, Color::RoseGold),
    ];

    for (code, name, price, total, tiktok, shopee, toko, color) in products {
        sqlx::query(
            r#"
            INSERT INTO products
                (id, product_code, name, price, total_stock,
                 tiktok_stock, shopee_stock, toko_stock, color)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (product_code) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(code)
        .bind(name)
        .bind(price as i64)
        .bind(total)
        .bind(tiktok)
        .bind(shopee)
        .bind(toko)
        .bind(color.key())
        .execute(pool)
        .await?;
    }

    println!("Seeded products");
    Ok(())
}
