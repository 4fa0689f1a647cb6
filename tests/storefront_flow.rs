use storefront_inventory_api::{
    colors::Color,
    db::{create_orm_conn, create_pool, run_migrations},
    dto::{
        cart::AddToCartRequest,
        inventory::{AddStockRequest, DistributeStockRequest},
        products::CreateProductRequest,
    },
    error::AppError,
    middleware::auth::AuthUser,
    models::{Channel, Role},
    routes::params::LogListQuery,
    services::{cart_service, inventory_service, log_service, product_service},
    state::AppState,
};
use uuid::Uuid;

// Integration flow: manager creates and distributes stock, a channel seller
// builds a cart and checks out, the activity log records each mutation. Both
// scenarios share one test body so they never truncate each other's data.
#[tokio::test]
async fn distribute_cart_and_checkout_flow() -> anyhow::Result<()> {
    // Allow skipping when no DB is configured in the environment.
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
            );
            return Ok(());
        }
    };

    let state = setup_state(&database_url).await?;

    let manager = AuthUser {
        user_id: Uuid::new_v4(),
        role: Role::Manager,
    };
    let tiktok_seller = AuthUser {
        user_id: Uuid::new_v4(),
        role: Role::Seller(Channel::Tiktok),
    };

    // Create: all channel allocations start empty, code derives from the
    // creator's channel prefix, the sequence, and the color's palette index.
    let created = product_service::create_product(
        &state,
        &manager,
        CreateProductRequest {
            name: "Gamis Aurora".into(),
            price: 1000,
            total_stock: 100,
            color: Color::Sage,
        },
    )
    .await?;
    let product = created.data.unwrap();
    assert_eq!(product.product_code, "GD-1-13");
    assert_eq!(product.total_stock, 100);
    assert_eq!(product.tiktok_stock, 0);
    assert_eq!(product.shopee_stock, 0);
    assert_eq!(product.toko_stock, 0);

    // Distribute 30 to tiktok.
    let distributed = inventory_service::distribute_stock(
        &state,
        &manager,
        product.id,
        DistributeStockRequest {
            tiktok: Some(30),
            ..Default::default()
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(distributed.total_stock, 70);
    assert_eq!(distributed.tiktok_stock, 30);

    // Over-distribution must leave the product completely unchanged.
    let err = inventory_service::distribute_stock(
        &state,
        &manager,
        product.id,
        DistributeStockRequest {
            tiktok: Some(50),
            shopee: Some(40),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::InsufficientStock(_)));
    let unchanged = product_service::fetch_product(&state, product.id).await?;
    assert_eq!(unchanged.total_stock, 70);
    assert_eq!(unchanged.tiktok_stock, 30);

    // All-zero distribution is a rejected no-op.
    let err = inventory_service::distribute_stock(
        &state,
        &manager,
        product.id,
        DistributeStockRequest::default(),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    // Add stock 20 on 70 -> 90; the log names both numbers.
    let restocked = inventory_service::add_stock(
        &state,
        &manager,
        product.id,
        AddStockRequest { amount: 20 },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(restocked.total_stock, 90);

    let logs = log_service::list_logs(
        &state,
        &manager,
        LogListQuery {
            page: Some(1),
            per_page: Some(20),
            action: Some("Penambahan stok".into()),
        },
    )
    .await?
    .data
    .unwrap();
    let latest = &logs.items[0];
    assert!(latest.description.contains("20"));
    assert!(latest.description.contains("90"));

    // Cart: 10 of 30 is fine, 31 exceeds the live channel stock.
    cart_service::add_to_cart(
        &state,
        &tiktok_seller,
        AddToCartRequest {
            product_id: product.id,
            quantity: 10,
            confirm_duplicate: false,
        },
    )
    .await?;
    let err = cart_service::add_to_cart(
        &state,
        &tiktok_seller,
        AddToCartRequest {
            product_id: product.id,
            quantity: 31,
            confirm_duplicate: true,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::InsufficientStock(_)));
    let cart = cart_service::view_cart(&state, &tiktok_seller)
        .await?
        .data
        .unwrap();
    assert_eq!(cart.lines.len(), 1);

    // Price drift after the line was added must not change the checkout
    // total: the line's price is frozen.
    sqlx::query("UPDATE products SET price = 9999 WHERE id = $1")
        .bind(product.id)
        .execute(&state.pool)
        .await?;

    let checkout = cart_service::checkout(&state, &tiktok_seller)
        .await?
        .data
        .unwrap();
    assert_eq!(checkout.total, 10 * 1000);
    assert_eq!(checkout.lines.len(), 1);
    assert_eq!(checkout.lines[0].stock_before, 30);
    assert_eq!(checkout.lines[0].stock_after, 20);

    let after = product_service::fetch_product(&state, product.id).await?;
    assert_eq!(after.tiktok_stock, 20);
    assert_eq!(after.total_stock, 90);

    // Exactly one purchase log per decremented line, with the values
    // actually read and written.
    let purchases = log_service::list_logs(
        &state,
        &manager,
        LogListQuery {
            page: Some(1),
            per_page: Some(20),
            action: Some("Pembelian di tiktok".into()),
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(purchases.items.len(), 1);
    assert!(purchases.items[0].description.contains("30 -> 20"));

    // Checkout cleared the cart.
    let cart = cart_service::view_cart(&state, &tiktok_seller)
        .await?
        .data
        .unwrap();
    assert!(cart.lines.is_empty());

    partial_checkout_failure(&state, &manager).await?;

    Ok(())
}

// One cart line is fine, another exceeds its channel stock at checkout
// time: the good line's decrement is applied and stays applied, the
// checkout as a whole fails, and nothing is rolled back.
async fn partial_checkout_failure(state: &AppState, manager: &AuthUser) -> anyhow::Result<()> {
    let shopee_seller = AuthUser {
        user_id: Uuid::new_v4(),
        role: Role::Seller(Channel::Shopee),
    };

    let product_a = create_distributed(state, manager, "Khimar A", Channel::Shopee, 5).await?;
    let product_b = create_distributed(state, manager, "Khimar B", Channel::Shopee, 2).await?;

    cart_service::add_to_cart(
        state,
        &shopee_seller,
        AddToCartRequest {
            product_id: product_a,
            quantity: 5,
            confirm_duplicate: false,
        },
    )
    .await?;
    cart_service::add_to_cart(
        state,
        &shopee_seller,
        AddToCartRequest {
            product_id: product_b,
            quantity: 2,
            confirm_duplicate: false,
        },
    )
    .await?;

    // Someone else sells a unit of B between add-to-cart and checkout.
    sqlx::query("UPDATE products SET shopee_stock = shopee_stock - 1 WHERE id = $1")
        .bind(product_b)
        .execute(&state.pool)
        .await?;

    let err = cart_service::checkout(state, &shopee_seller)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InsufficientStock(_)));

    let a = product_service::fetch_product(state, product_a).await?;
    let b = product_service::fetch_product(state, product_b).await?;
    assert_eq!(a.shopee_stock, 0, "good line's decrement stays applied");
    assert_eq!(b.shopee_stock, 1, "failed line's stock is untouched");

    // The cart is kept so the seller can inspect and retry.
    let cart = cart_service::view_cart(state, &shopee_seller)
        .await?
        .data
        .unwrap();
    assert_eq!(cart.lines.len(), 2);

    Ok(())
}

async fn setup_state(database_url: &str) -> anyhow::Result<AppState> {
    let pool = create_pool(database_url).await?;
    let orm = create_orm_conn(database_url).await?;
    run_migrations(&pool).await?;

    // Clean tables between runs.
    sqlx::query("TRUNCATE TABLE activity_logs, products RESTART IDENTITY CASCADE")
        .execute(&pool)
        .await?;

    Ok(AppState::new(pool, orm))
}

async fn create_distributed(
    state: &AppState,
    manager: &AuthUser,
    name: &str,
    channel: Channel,
    amount: i32,
) -> anyhow::Result<Uuid> {
    let product = product_service::create_product(
        state,
        manager,
        CreateProductRequest {
            name: name.into(),
            price: 500,
            total_stock: amount,
            color: Color::Hitam,
        },
    )
    .await?
    .data
    .unwrap();

    let request = match channel {
        Channel::Tiktok => DistributeStockRequest {
            tiktok: Some(amount),
            ..Default::default()
        },
        Channel::Shopee => DistributeStockRequest {
            shopee: Some(amount),
            ..Default::default()
        },
        Channel::Toko => DistributeStockRequest {
            toko: Some(amount),
            ..Default::default()
        },
    };
    inventory_service::distribute_stock(state, manager, product.id, request).await?;

    Ok(product.id)
}
