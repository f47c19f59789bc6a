use restaurant_orders::app_system::{setup_tracing, AppConfig, RestaurantSystem};
use restaurant_orders::domain::{
    Audience, CategoryCreate, DeliveryZoneCreate, OrderStatus, ProductCreate, ReviewSubmission,
};
use restaurant_orders::storefront::{Cart, CheckoutForm};
use restaurant_orders::surfaces::{AdminOrderBoard, NotificationCenter, OrderTracker};
use tracing::{error, info, Instrument};

#[tokio::main]
async fn main() -> Result<(), String> {
    let config = AppConfig::load().map_err(|e| e.to_string())?;

    // Setup tracing once for the entire application
    setup_tracing(&config.log_filter);

    info!("Starting restaurant system");

    let system = RestaurantSystem::new(&config);
    system.apply_settings_seed(&config).await.map_err(|e| e.to_string())?;

    // Menu and delivery zones
    let span = tracing::info_span!("catalog_setup");
    let (pizza, zone) = async {
        let mains = system
            .menu_client
            .create_category(CategoryCreate { name: "Mains".into(), sort_order: 1 })
            .await
            .map_err(|e| e.to_string())?;
        let pizza = system
            .menu_client
            .create_product(ProductCreate {
                name: "Margherita".into(),
                description: "Tomato, mozzarella, basil".into(),
                price: 9.5,
                category_id: Some(mains.id),
                image_url: None,
                available: true,
            })
            .await
            .map_err(|e| e.to_string())?;
        let zone = system
            .zone_client
            .create_zone(DeliveryZoneCreate {
                name: "Centre".into(),
                fee: 2.5,
                estimated_time: "30-45 min".into(),
                active: true,
            })
            .await
            .map_err(|e| e.to_string())?;
        Ok::<_, String>((pizza, zone))
    }
    .instrument(span)
    .await?;

    info!(product_id = %pizza.id, zone_id = %zone.id, "Catalog ready");

    // Surfaces mount before the order exists
    let board = AdminOrderBoard::mount(&system.order_client).await.map_err(|e| e.to_string())?;
    let customer_inbox = NotificationCenter::mount(&system.notification_client, Audience::User("user_1".into()))
        .await
        .map_err(|e| e.to_string())?;

    // Checkout
    let mut cart = Cart::new();
    cart.add(&pizza, 2, vec!["extra basil".into()]).map_err(|e| e.to_string())?;
    let form = CheckoutForm {
        customer_name: "Alice".into(),
        email: "alice@example.com".into(),
        phone: "+34 600 000 000".into(),
        address: "Calle Mayor 1".into(),
        zone_id: zone.id.clone(),
        payment_method_id: "cash".into(),
        notes: "Ring twice".into(),
    };

    let span = tracing::info_span!("order_processing");
    let order_result = async {
        info!("Placing order through order system");
        system.order_client.place_order(Some("user_1".into()), &cart, &form).await
    }
    .instrument(span)
    .await;

    let order = match order_result {
        Ok(order) => {
            info!(order_id = %order.id, total = order.total, "Order placed successfully");
            order
        }
        Err(e) => {
            error!(error = %e, "Order placement failed");
            return Err(e.to_string());
        }
    };

    let tracker = OrderTracker::mount(&system.order_client, order.id.clone())
        .await
        .map_err(|e| e.to_string())?;

    // Kitchen works through the order
    for status in [OrderStatus::Confirmed, OrderStatus::Preparing, OrderStatus::Delivering, OrderStatus::Completed] {
        system
            .order_client
            .update_status(order.id.clone(), status, Some("admin".into()))
            .await
            .map_err(|e| e.to_string())?;
        let seen = tracker.wait_for_status(status).await.map_err(|e| e.to_string())?;
        info!(label = seen.status.label(), "Tracker updated");
    }
    system.order_client.mark_paid(order.id.clone()).await.map_err(|e| e.to_string())?;

    info!(
        new_orders = board.new_orders(),
        completed = board.by_status(OrderStatus::Completed).len(),
        "Admin board"
    );

    customer_inbox.wait_for_unread(3).await.map_err(|e| e.to_string())?;
    let cleared = customer_inbox.mark_all_read().await.map_err(|e| e.to_string())?;
    info!(cleared, "Customer notifications read");

    let review = system
        .review_client
        .submit(ReviewSubmission {
            product_id: pizza.id.clone(),
            rating: 5,
            comment: "Perfect crust".into(),
            author_name: "Alice".into(),
            user_id: Some("user_1".into()),
            order_id: Some(order.id.clone()),
        })
        .await
        .map_err(|e| e.to_string())?;
    info!(verified = review.verified_purchase, "Review stored");

    match serde_json::to_string_pretty(&tracker.current()) {
        Ok(json) => println!("{}", json),
        Err(e) => error!(error = %e, "Failed to render order"),
    }

    drop(tracker);
    drop(board);
    drop(customer_inbox);

    // Shutdown system gracefully
    system.shutdown().await?;

    info!("Application completed successfully");
    Ok(())
}
