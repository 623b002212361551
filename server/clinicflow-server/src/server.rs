use anyhow::Result;
use booking_workflow::{BookingService, InMemoryBookingRepository};
use booking_workflow::repository::postgres::PostgresBookingRepository;
use identity_access::{IdentityDirectory, InMemoryDirectory, Role, UserAccount};
use ledger_service::repository::postgres::PostgresLedgerRepository;
use ledger_service::{InMemoryLedgerRepository, LedgerRepository, LedgerService};
use rust_decimal::Decimal;
use schedule_allocator::repository::postgres::PostgresSlotRepository;
use schedule_allocator::{InMemorySlotRepository, ScheduleAllocator, SlotRepository};
use service_catalog::{CatalogItem, InMemoryCatalog, ServiceCatalog};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server name
    pub name: String,
    /// Seed demo users and items into the in-memory collaborators
    pub seed_demo_data: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: "ClinicFlow Engine".to_string(),
            seed_demo_data: false,
        }
    }
}

/// Main ClinicFlow server state
#[derive(Clone)]
pub struct ClinicServer {
    /// Server configuration
    pub config: ServerConfig,
    /// Identity collaborator
    pub directory: Arc<dyn IdentityDirectory>,
    /// Catalog collaborator
    pub catalog: Arc<dyn ServiceCatalog>,
    /// Slot allocation
    pub allocator: Arc<ScheduleAllocator>,
    /// Booking lifecycle
    pub bookings: Arc<BookingService>,
    /// Balances and payments
    pub ledger: Arc<LedgerService>,
}

impl ClinicServer {
    /// Wire the engine from the environment: PostgreSQL stores when
    /// `DATABASE_URL` is set, in-memory stores otherwise. The identity and
    /// catalog collaborators are external services; the in-memory stand-ins
    /// are used for both modes here.
    pub async fn from_env(config: ServerConfig) -> Result<Self> {
        match std::env::var("DATABASE_URL") {
            Ok(url) => {
                info!("using PostgreSQL stores");
                let pool = PgPool::connect(&url).await?;
                Ok(Self::assemble(
                    config,
                    Arc::new(PostgresSlotRepository::new(pool.clone())),
                    Arc::new(PostgresBookingRepository::new(pool.clone())),
                    Arc::new(PostgresLedgerRepository::new(pool)),
                ))
            }
            Err(_) => {
                info!("DATABASE_URL not set, using in-memory stores");
                Ok(Self::in_memory(config))
            }
        }
    }

    /// Fully in-memory wiring for development and testing.
    pub fn in_memory(config: ServerConfig) -> Self {
        Self::assemble(
            config,
            Arc::new(InMemorySlotRepository::new()),
            Arc::new(InMemoryBookingRepository::new()),
            Arc::new(InMemoryLedgerRepository::new()),
        )
    }

    fn assemble(
        config: ServerConfig,
        slots: Arc<dyn SlotRepository>,
        booking_store: Arc<dyn booking_workflow::BookingRepository>,
        ledger_store: Arc<dyn LedgerRepository>,
    ) -> Self {
        let directory = Arc::new(InMemoryDirectory::new());
        let catalog = Arc::new(InMemoryCatalog::new());
        if config.seed_demo_data {
            seed_demo_data(&directory, &catalog);
        }

        let allocator = Arc::new(ScheduleAllocator::new(slots, directory.clone()));
        let bookings = Arc::new(BookingService::new(
            booking_store,
            allocator.clone(),
            catalog.clone(),
            ledger_store.clone(),
            directory.clone(),
        ));
        let ledger = Arc::new(LedgerService::new(
            ledger_store,
            bookings.clone(),
            directory.clone(),
        ));

        Self {
            config,
            directory,
            catalog,
            allocator,
            bookings,
            ledger,
        }
    }
}

/// Register a handful of accounts and items so the server is usable out of
/// the box. Ids are logged for use in `x-user-id` headers.
fn seed_demo_data(directory: &InMemoryDirectory, catalog: &InMemoryCatalog) {
    let admin = Uuid::new_v4();
    let doctor = directory.register(UserAccount::new("Dr. Vera Lind", Role::Doctor, admin));
    let patient = directory.register(UserAccount::new("Paul Osei", Role::Patient, admin));
    let director = directory.register(UserAccount::new("Ada Krol", Role::Director, admin));
    let cleaning = catalog.add_item(CatalogItem::new(
        "Dental cleaning",
        Decimal::from(100),
        3,
        admin,
    ));
    let fitting = catalog.add_item(CatalogItem::new(
        "Orthodontic fitting",
        Decimal::from(250),
        10,
        admin,
    ));

    info!(%doctor, %patient, %director, "demo accounts seeded");
    info!(%cleaning, %fitting, "demo catalog items seeded");
}
