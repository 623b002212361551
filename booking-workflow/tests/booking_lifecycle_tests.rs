//! Booking lifecycle tests
//!
//! Wires the real allocator, catalog, ledger, and booking workflow together
//! and walks the lifecycle: creation with slot reservation and implicit
//! card opening, guarded updates, closure, and payment through the ledger.

use booking_workflow::{
    BookingError, BookingPatch, BookingService, BookingStatus, InMemoryBookingRepository,
};
use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};
use identity_access::{Actor, InMemoryDirectory, Role, UserAccount};
use ledger_service::{
    InMemoryLedgerRepository, LedgerError, LedgerRepository, LedgerService, PaymentStatus,
};
use rust_decimal::Decimal;
use schedule_allocator::{
    InMemorySlotRepository, NewSlot, ScheduleAllocator, ScheduleError,
};
use service_catalog::{CatalogItem, InMemoryCatalog};
use std::sync::Arc;
use uuid::Uuid;

struct TestStack {
    directory: Arc<InMemoryDirectory>,
    catalog: Arc<InMemoryCatalog>,
    allocator: Arc<ScheduleAllocator>,
    bookings: Arc<BookingService>,
    ledger: Arc<LedgerService>,
    ledger_repo: Arc<InMemoryLedgerRepository>,
    admin: Uuid,
    doctor: Uuid,
    patient: Uuid,
    director: Uuid,
    item: Uuid,
}

fn create_test_stack() -> TestStack {
    let admin = Uuid::new_v4();
    let directory = Arc::new(InMemoryDirectory::new());
    let doctor = directory.register(UserAccount::new("Dr. Vera Lind", Role::Doctor, admin));
    let patient = directory.register(UserAccount::new("Paul Osei", Role::Patient, admin));
    let director = directory.register(UserAccount::new("Ada Krol", Role::Director, admin));

    let catalog = Arc::new(InMemoryCatalog::new());
    let item = catalog.add_item(CatalogItem::new(
        "Dental cleaning",
        Decimal::from(100),
        3,
        admin,
    ));

    let allocator = Arc::new(ScheduleAllocator::new(
        Arc::new(InMemorySlotRepository::new()),
        directory.clone(),
    ));
    let ledger_repo = Arc::new(InMemoryLedgerRepository::new());

    let bookings = Arc::new(BookingService::new(
        Arc::new(InMemoryBookingRepository::new()),
        allocator.clone(),
        catalog.clone(),
        ledger_repo.clone(),
        directory.clone(),
    ));
    let ledger = Arc::new(LedgerService::new(
        ledger_repo.clone(),
        bookings.clone(),
        directory.clone(),
    ));

    TestStack {
        directory,
        catalog,
        allocator,
        bookings,
        ledger,
        ledger_repo,
        admin,
        doctor,
        patient,
        director,
        item,
    }
}

fn morning_of(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, day, 9, 0, 0).unwrap()
}

async fn open_day(stack: &TestStack, day: u32) {
    stack
        .allocator
        .create_slot(
            NewSlot {
                doctor_id: stack.doctor,
                date: morning_of(day).date_naive(),
                start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
                finish_time: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
                break_start: NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
                break_end: NaiveTime::from_hms_opt(13, 0, 0).unwrap(),
            },
            stack.admin,
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn create_reserves_slot_and_opens_card() {
    let stack = create_test_stack();
    open_day(&stack, 10).await;

    let booking = stack
        .bookings
        .create(stack.patient, stack.item, stack.doctor, morning_of(10), stack.patient)
        .await
        .unwrap();

    assert_eq!(booking.status, BookingStatus::InProcess);
    assert!(booking.to_date.is_none());
    assert_eq!(
        booking.expected_completion,
        morning_of(10) + Duration::days(3)
    );

    // The slot for that day is now occupied.
    let err = stack
        .allocator
        .find_free_slot(stack.doctor, morning_of(10).date_naive())
        .await
        .unwrap_err();
    assert!(matches!(err, ScheduleError::SlotUnavailable));

    // First booking implicitly opened a numbered card with a zero balance.
    let card = stack
        .ledger_repo
        .find_card_for_patient(stack.patient)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(card.id, booking.card_id);
    assert_eq!(card.card_number.len(), 16);
    assert_eq!(card.funded_balance, Decimal::ZERO);
}

#[tokio::test]
async fn concurrent_creates_for_one_day_yield_one_booking() {
    let stack = create_test_stack();
    open_day(&stack, 10).await;
    let other_patient = stack
        .directory
        .register(UserAccount::new("Mina Vogel", Role::Patient, stack.admin));

    let attempts = [stack.patient, other_patient].map(|patient| {
        let bookings = stack.bookings.clone();
        let item = stack.item;
        let doctor = stack.doctor;
        tokio::spawn(async move {
            bookings
                .create(patient, item, doctor, morning_of(10), patient)
                .await
        })
    });

    let mut created = 0;
    let mut turned_away = 0;
    for attempt in attempts {
        match attempt.await.unwrap() {
            Ok(_) => created += 1,
            Err(BookingError::Schedule(ScheduleError::SlotUnavailable)) => turned_away += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
    assert_eq!(created, 1);
    assert_eq!(turned_away, 1);
}

#[tokio::test]
async fn unknown_item_fails_without_touching_the_slot() {
    let stack = create_test_stack();
    open_day(&stack, 10).await;

    let err = stack
        .bookings
        .create(stack.patient, Uuid::new_v4(), stack.doctor, morning_of(10), stack.patient)
        .await
        .unwrap_err();
    assert!(matches!(err, BookingError::Catalog(_)));

    // The day is still bookable.
    stack
        .bookings
        .create(stack.patient, stack.item, stack.doctor, morning_of(10), stack.patient)
        .await
        .unwrap();
}

#[tokio::test]
async fn only_the_assigned_doctor_or_a_director_may_update() {
    let stack = create_test_stack();
    open_day(&stack, 10).await;
    let booking = stack
        .bookings
        .create(stack.patient, stack.item, stack.doctor, morning_of(10), stack.patient)
        .await
        .unwrap();

    let restamp = BookingPatch {
        from_date: Some(morning_of(11)),
        ..Default::default()
    };

    // The patient may not edit their own booking.
    let err = stack
        .bookings
        .update(
            booking.id,
            Actor::new(stack.patient, Role::Patient),
            restamp.clone(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, BookingError::Identity(_)));

    // Neither may an unrelated doctor.
    let other_doctor = stack
        .directory
        .register(UserAccount::new("Dr. Omar Reyes", Role::Doctor, stack.admin));
    let err = stack
        .bookings
        .update(
            booking.id,
            Actor::new(other_doctor, Role::Doctor),
            restamp.clone(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, BookingError::Identity(_)));

    // The assigned doctor may.
    let updated = stack
        .bookings
        .update(booking.id, Actor::new(stack.doctor, Role::Doctor), restamp)
        .await
        .unwrap();
    assert_eq!(updated.from_date, morning_of(11));

    // So may a director.
    stack
        .bookings
        .update(
            booking.id,
            Actor::new(stack.director, Role::Director),
            BookingPatch {
                from_date: Some(morning_of(12)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn closing_validates_the_date_range_and_frees_the_slot() {
    let stack = create_test_stack();
    open_day(&stack, 10).await;
    let booking = stack
        .bookings
        .create(stack.patient, stack.item, stack.doctor, morning_of(10), stack.patient)
        .await
        .unwrap();
    let doctor = Actor::new(stack.doctor, Role::Doctor);

    // Completion must not precede the start.
    let err = stack
        .bookings
        .update(
            booking.id,
            doctor,
            BookingPatch {
                to_date: Some(morning_of(10) - Duration::days(1)),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, BookingError::InvalidDateRange));

    // Completion on the start date itself is allowed and closes the booking.
    let closed = stack
        .bookings
        .update(
            booking.id,
            doctor,
            BookingPatch {
                to_date: Some(morning_of(10)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(closed.status, BookingStatus::Done);
    assert_eq!(closed.to_date, Some(morning_of(10)));

    // The doctor's day is bookable again.
    stack
        .allocator
        .find_free_slot(stack.doctor, morning_of(10).date_naive())
        .await
        .unwrap();

    // Done is terminal.
    let err = stack
        .bookings
        .update(
            booking.id,
            doctor,
            BookingPatch {
                from_date: Some(morning_of(11)),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, BookingError::BookingClosed));
}

#[tokio::test]
async fn rebinding_the_item_recomputes_expected_completion() {
    let stack = create_test_stack();
    open_day(&stack, 10).await;
    let booking = stack
        .bookings
        .create(stack.patient, stack.item, stack.doctor, morning_of(10), stack.patient)
        .await
        .unwrap();

    let longer_item = stack.catalog.add_item(CatalogItem::new(
        "Orthodontic fitting",
        Decimal::from(250),
        10,
        stack.admin,
    ));

    let updated = stack
        .bookings
        .update(
            booking.id,
            Actor::new(stack.doctor, Role::Doctor),
            BookingPatch {
                item_id: Some(longer_item),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.item_id, longer_item);
    assert_eq!(
        updated.expected_completion,
        morning_of(10) + Duration::days(10)
    );
}

#[tokio::test]
async fn get_is_idempotent() {
    let stack = create_test_stack();
    open_day(&stack, 10).await;
    let booking = stack
        .bookings
        .create(stack.patient, stack.item, stack.doctor, morning_of(10), stack.patient)
        .await
        .unwrap();

    let first = stack.bookings.get(booking.id).await.unwrap();
    let second = stack.bookings.get(booking.id).await.unwrap();
    assert_eq!(first.id, second.id);
    assert_eq!(first.status, second.status);
    assert_eq!(first.meta.updated_at, second.meta.updated_at);

    let err = stack.bookings.get(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, BookingError::BookingNotFound));
}

#[tokio::test]
async fn booking_pays_off_in_parts_through_the_ledger() {
    let stack = create_test_stack();
    open_day(&stack, 10).await;
    let booking = stack
        .bookings
        .create(stack.patient, stack.item, stack.doctor, morning_of(10), stack.patient)
        .await
        .unwrap();

    stack
        .ledger
        .top_up(stack.patient, Decimal::from(150), stack.patient)
        .await
        .unwrap();

    let payment = stack
        .ledger
        .charge_for_booking(booking.id, Decimal::from(60), "cash", stack.patient)
        .await
        .unwrap();
    assert_eq!(payment.status, PaymentStatus::NotPaid);

    let payment = stack
        .ledger
        .charge_for_booking(booking.id, Decimal::from(40), "cash", stack.patient)
        .await
        .unwrap();
    assert_eq!(payment.status, PaymentStatus::Paid);
    assert_eq!(payment.amount_paid, Decimal::from(100));

    let err = stack
        .ledger
        .charge_for_booking(booking.id, Decimal::from(5), "cash", stack.patient)
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::AlreadyFullyPaid));

    let card = stack
        .ledger_repo
        .find_card_for_patient(stack.patient)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(card.funded_balance, Decimal::from(50));
}

#[tokio::test]
async fn overview_joins_items_doctors_and_payments() {
    let stack = create_test_stack();
    open_day(&stack, 10).await;
    let booking = stack
        .bookings
        .create(stack.patient, stack.item, stack.doctor, morning_of(10), stack.patient)
        .await
        .unwrap();

    stack
        .ledger
        .top_up(stack.patient, Decimal::from(150), stack.patient)
        .await
        .unwrap();
    stack
        .ledger
        .charge_for_booking(booking.id, Decimal::from(60), "cash", stack.patient)
        .await
        .unwrap();

    let overview = stack.bookings.patient_overview(stack.patient).await.unwrap();
    assert_eq!(overview.card_number.len(), 16);
    assert_eq!(overview.funded_balance, Decimal::from(90));
    assert_eq!(overview.bookings.len(), 1);

    let line = &overview.bookings[0];
    assert_eq!(line.booking_id, booking.id);
    assert_eq!(line.item_name, "Dental cleaning");
    assert_eq!(line.doctor_name, "Dr. Vera Lind");
    assert_eq!(line.amount_paid, Decimal::from(60));
    assert_eq!(line.status, BookingStatus::InProcess);
}

#[tokio::test]
async fn overview_requires_a_card() {
    let stack = create_test_stack();
    let err = stack
        .bookings
        .patient_overview(stack.patient)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        BookingError::Ledger(LedgerError::CardNotFound)
    ));
}

#[tokio::test]
async fn trashed_bookings_disappear_from_lookups_and_overview() {
    let stack = create_test_stack();
    open_day(&stack, 10).await;
    let booking = stack
        .bookings
        .create(stack.patient, stack.item, stack.doctor, morning_of(10), stack.patient)
        .await
        .unwrap();

    stack.bookings.trash(booking.id, stack.admin).await.unwrap();

    let err = stack.bookings.get(booking.id).await.unwrap_err();
    assert!(matches!(err, BookingError::BookingNotFound));

    let overview = stack.bookings.patient_overview(stack.patient).await.unwrap();
    assert!(overview.bookings.is_empty());
}
