use std::sync::Arc;

use retailpos_core::{
    categories::{CategoryService, CategoryServiceTrait},
    events::DomainEventSink,
    farewell::{FarewellService, FarewellServiceTrait},
    feedback::{FeedbackService, FeedbackServiceTrait},
    inventory::{InventoryService, InventoryServiceTrait},
    notifications::{NotificationService, NotificationServiceTrait},
    products::{ProductService, ProductServiceTrait},
    reports::{ReportService, ReportServiceTrait},
    settings::{SettingsService, SettingsServiceTrait},
    transactions::{TransactionService, TransactionServiceTrait},
    users::{NewUser, Role, UserService, UserServiceTrait},
};
use retailpos_storage_sqlite::{
    db, CategoryRepository, DbPool, FarewellRepository, FeedbackRepository, InventoryRepository,
    NotificationRepository, ProductRepository, ReportRepository, SettingsRepository,
    TransactionRepository, UserRepository,
};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::{
    auth::{hash_password, AuthManager},
    config::Config,
    domain_events::WebDomainEventSink,
    events::EventBus,
};

pub struct AppState {
    pub pool: Arc<DbPool>,
    pub db_path: String,
    pub user_service: Arc<dyn UserServiceTrait>,
    pub category_service: Arc<dyn CategoryServiceTrait>,
    pub product_service: Arc<dyn ProductServiceTrait>,
    pub inventory_service: Arc<dyn InventoryServiceTrait>,
    pub transaction_service: Arc<dyn TransactionServiceTrait>,
    pub feedback_service: Arc<dyn FeedbackServiceTrait>,
    pub farewell_service: Arc<dyn FarewellServiceTrait>,
    pub notification_service: Arc<dyn NotificationServiceTrait>,
    pub report_service: Arc<dyn ReportServiceTrait>,
    pub settings_service: Arc<dyn SettingsServiceTrait>,
    pub event_bus: EventBus,
    pub auth: Arc<AuthManager>,
}

pub fn init_tracing() {
    let log_format = std::env::var("POS_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = db::spawn_writer((*pool).clone());

    // Domain event sink - two-phase initialization, the worker starts once
    // the notification service exists.
    let domain_event_sink = Arc::new(WebDomainEventSink::new());
    let event_sink: Arc<dyn DomainEventSink> = domain_event_sink.clone();

    let user_repo = Arc::new(UserRepository::new(pool.clone(), writer.clone()));
    let category_repo = Arc::new(CategoryRepository::new(pool.clone(), writer.clone()));
    let product_repo = Arc::new(ProductRepository::new(pool.clone(), writer.clone()));
    let inventory_repo = Arc::new(InventoryRepository::new(pool.clone(), writer.clone()));
    let transaction_repo = Arc::new(TransactionRepository::new(pool.clone(), writer.clone()));
    let feedback_repo = Arc::new(FeedbackRepository::new(pool.clone(), writer.clone()));
    let farewell_repo = Arc::new(FarewellRepository::new(pool.clone(), writer.clone()));
    let notification_repo = Arc::new(NotificationRepository::new(pool.clone(), writer.clone()));
    let settings_repo = Arc::new(SettingsRepository::new(pool.clone(), writer.clone()));
    let report_repo = Arc::new(ReportRepository::new(pool.clone()));

    let settings_service: Arc<dyn SettingsServiceTrait> =
        Arc::new(SettingsService::new(settings_repo));
    let farewell_service: Arc<dyn FarewellServiceTrait> =
        Arc::new(FarewellService::new(farewell_repo));
    let user_service: Arc<dyn UserServiceTrait> = Arc::new(UserService::new(user_repo));
    let category_service: Arc<dyn CategoryServiceTrait> =
        Arc::new(CategoryService::new(category_repo.clone()));
    let product_service: Arc<dyn ProductServiceTrait> =
        Arc::new(ProductService::new(product_repo, category_repo));
    let inventory_service: Arc<dyn InventoryServiceTrait> = Arc::new(InventoryService::new(
        inventory_repo.clone(),
        event_sink.clone(),
    ));
    let transaction_service: Arc<dyn TransactionServiceTrait> =
        Arc::new(TransactionService::new(
            transaction_repo.clone(),
            farewell_service.clone(),
            settings_service.clone(),
            event_sink.clone(),
        ));
    let feedback_service: Arc<dyn FeedbackServiceTrait> =
        Arc::new(FeedbackService::new(feedback_repo, transaction_repo));
    let notification_service: Arc<dyn NotificationServiceTrait> =
        Arc::new(NotificationService::new(notification_repo.clone()));
    let report_service: Arc<dyn ReportServiceTrait> = Arc::new(ReportService::new(
        report_repo,
        inventory_repo,
        notification_repo,
    ));

    let event_bus = EventBus::new(256);

    // Domain event sink - Phase 2
    domain_event_sink.start_worker(notification_service.clone(), event_bus.clone());

    if let Some(admin) = bootstrap_admin(config)? {
        user_service.ensure_bootstrap_admin(admin).await?;
    } else if user_service.get_users()?.is_empty() {
        tracing::warn!(
            "No users exist and POS_ADMIN_EMAIL/POS_ADMIN_PASSWORD are not set; nobody can log in"
        );
    }

    let auth = Arc::new(AuthManager::from_config(
        config.jwt_secret.as_deref(),
        config.token_ttl,
    )?);

    Ok(Arc::new(AppState {
        pool,
        db_path,
        user_service,
        category_service,
        product_service,
        inventory_service,
        transaction_service,
        feedback_service,
        farewell_service,
        notification_service,
        report_service,
        settings_service,
        event_bus,
        auth,
    }))
}

fn bootstrap_admin(config: &Config) -> anyhow::Result<Option<NewUser>> {
    let (Some(email), Some(password)) = (&config.admin_email, &config.admin_password) else {
        return Ok(None);
    };
    Ok(Some(NewUser {
        name: config.admin_name.clone(),
        email: email.clone(),
        role: Role::Admin,
        password_hash: hash_password(password)?,
        is_active: true,
    }))
}
