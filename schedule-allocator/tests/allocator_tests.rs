//! Schedule allocator tests
//!
//! Covers slot setup uniqueness, the doctor-role gate, and the
//! compare-and-set reservation under concurrent booking attempts.

use chrono::{NaiveDate, NaiveTime};
use identity_access::{InMemoryDirectory, Role, UserAccount};
use schedule_allocator::{
    InMemorySlotRepository, NewSlot, Occupancy, ScheduleAllocator, ScheduleError,
};
use std::sync::Arc;
use uuid::Uuid;

struct TestClinic {
    allocator: Arc<ScheduleAllocator>,
    doctor: Uuid,
    patient: Uuid,
    admin: Uuid,
}

fn create_test_clinic() -> TestClinic {
    let admin = Uuid::new_v4();
    let directory = Arc::new(InMemoryDirectory::new());
    let doctor = directory.register(UserAccount::new("Dr. Vera Lind", Role::Doctor, admin));
    let patient = directory.register(UserAccount::new("Paul Osei", Role::Patient, admin));

    let slots = Arc::new(InMemorySlotRepository::new());
    TestClinic {
        allocator: Arc::new(ScheduleAllocator::new(slots, directory)),
        doctor,
        patient,
        admin,
    }
}

fn day(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, day).unwrap()
}

fn working_day(doctor_id: Uuid, date: NaiveDate) -> NewSlot {
    NewSlot {
        doctor_id,
        date,
        start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        finish_time: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
        break_start: NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
        break_end: NaiveTime::from_hms_opt(13, 0, 0).unwrap(),
    }
}

#[tokio::test]
async fn duplicate_slot_for_same_day_is_rejected() {
    let clinic = create_test_clinic();

    clinic
        .allocator
        .create_slot(working_day(clinic.doctor, day(10)), clinic.admin)
        .await
        .unwrap();

    let err = clinic
        .allocator
        .create_slot(working_day(clinic.doctor, day(10)), clinic.admin)
        .await
        .unwrap_err();
    assert!(matches!(err, ScheduleError::SlotAlreadyExists));

    // A different day is still fine.
    clinic
        .allocator
        .create_slot(working_day(clinic.doctor, day(11)), clinic.admin)
        .await
        .unwrap();
}

#[tokio::test]
async fn slot_requires_doctor_role() {
    let clinic = create_test_clinic();

    let err = clinic
        .allocator
        .create_slot(working_day(clinic.patient, day(10)), clinic.admin)
        .await
        .unwrap_err();
    assert!(matches!(err, ScheduleError::Identity(_)));

    // Unknown identities are rejected as well.
    let err = clinic
        .allocator
        .find_free_slot(Uuid::new_v4(), day(10))
        .await
        .unwrap_err();
    assert!(matches!(err, ScheduleError::Identity(_)));
}

#[tokio::test]
async fn break_window_must_fit_working_window() {
    let clinic = create_test_clinic();

    let mut bad_day = working_day(clinic.doctor, day(10));
    bad_day.break_end = NaiveTime::from_hms_opt(18, 0, 0).unwrap();

    let err = clinic
        .allocator
        .create_slot(bad_day, clinic.admin)
        .await
        .unwrap_err();
    assert!(matches!(err, ScheduleError::InvalidTimeWindow));
}

#[tokio::test]
async fn reserved_slot_is_not_available_again() {
    let clinic = create_test_clinic();
    clinic
        .allocator
        .create_slot(working_day(clinic.doctor, day(10)), clinic.admin)
        .await
        .unwrap();

    let reserved = clinic
        .allocator
        .reserve(clinic.doctor, day(10), clinic.patient)
        .await
        .unwrap();
    assert_eq!(reserved.occupancy, Occupancy::Occupied);

    let err = clinic
        .allocator
        .find_free_slot(clinic.doctor, day(10))
        .await
        .unwrap_err();
    assert!(matches!(err, ScheduleError::SlotUnavailable));
}

#[tokio::test]
async fn concurrent_reservations_yield_exactly_one_winner() {
    let clinic = create_test_clinic();
    clinic
        .allocator
        .create_slot(working_day(clinic.doctor, day(10)), clinic.admin)
        .await
        .unwrap();

    let attempts = (0..8).map(|_| {
        let allocator = clinic.allocator.clone();
        let doctor = clinic.doctor;
        let patient = clinic.patient;
        tokio::spawn(async move { allocator.reserve(doctor, day(10), patient).await })
    });

    let mut wins = 0;
    let mut losses = 0;
    for attempt in attempts {
        match attempt.await.unwrap() {
            Ok(_) => wins += 1,
            Err(ScheduleError::SlotUnavailable) => losses += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
    assert_eq!(wins, 1);
    assert_eq!(losses, 7);
}

#[tokio::test]
async fn set_occupancy_is_idempotent() {
    let clinic = create_test_clinic();
    let slot = clinic
        .allocator
        .create_slot(working_day(clinic.doctor, day(10)), clinic.admin)
        .await
        .unwrap();

    let once = clinic
        .allocator
        .set_occupancy(slot.id, Occupancy::Occupied, clinic.admin)
        .await
        .unwrap();
    let twice = clinic
        .allocator
        .set_occupancy(slot.id, Occupancy::Occupied, clinic.admin)
        .await
        .unwrap();
    assert_eq!(once.occupancy, Occupancy::Occupied);
    assert_eq!(twice.occupancy, Occupancy::Occupied);

    let freed = clinic
        .allocator
        .set_occupancy(slot.id, Occupancy::Free, clinic.admin)
        .await
        .unwrap();
    assert_eq!(freed.occupancy, Occupancy::Free);
}

#[tokio::test]
async fn released_slot_can_be_reserved_again() {
    let clinic = create_test_clinic();
    clinic
        .allocator
        .create_slot(working_day(clinic.doctor, day(10)), clinic.admin)
        .await
        .unwrap();

    clinic
        .allocator
        .reserve(clinic.doctor, day(10), clinic.patient)
        .await
        .unwrap();
    clinic
        .allocator
        .release(clinic.doctor, day(10), clinic.admin)
        .await
        .unwrap();

    clinic
        .allocator
        .reserve(clinic.doctor, day(10), clinic.patient)
        .await
        .unwrap();
}

#[tokio::test]
async fn occupied_slot_cannot_be_trashed() {
    let clinic = create_test_clinic();
    let slot = clinic
        .allocator
        .create_slot(working_day(clinic.doctor, day(10)), clinic.admin)
        .await
        .unwrap();

    clinic
        .allocator
        .reserve(clinic.doctor, day(10), clinic.patient)
        .await
        .unwrap();

    let err = clinic
        .allocator
        .trash_slot(slot.id, clinic.admin)
        .await
        .unwrap_err();
    assert!(matches!(err, ScheduleError::SlotOccupied));

    // Once released, the slot can be trashed and becomes invisible.
    clinic
        .allocator
        .release(clinic.doctor, day(10), clinic.admin)
        .await
        .unwrap();
    clinic
        .allocator
        .trash_slot(slot.id, clinic.admin)
        .await
        .unwrap();

    let err = clinic
        .allocator
        .find_free_slot(clinic.doctor, day(10))
        .await
        .unwrap_err();
    assert!(matches!(err, ScheduleError::SlotUnavailable));
}
