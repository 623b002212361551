//! Card provisioning
//!
//! A card is opened exactly once per patient, always with a generated
//! number, whether the first touch is a top-up or a booking. `ensure_card`
//! is idempotent and safe under concurrent first use: the storage layer
//! rejects a second card for the same patient, and the loser of that race
//! adopts the winner's card.

use crate::{error::*, models::*, repository::LedgerRepository};
use rand::Rng;
use storage_core::StorageError;
use tracing::{debug, info};
use uuid::Uuid;

/// Card numbers span the full 16-digit range.
pub const CARD_NUMBER_MIN: u64 = 1_000_000_000_000_000;
pub const CARD_NUMBER_MAX: u64 = 10_000_000_000_000_000;

const PROVISION_ATTEMPTS: usize = 8;

/// Draw a random 16-digit card number.
pub fn generate_card_number() -> String {
    rand::thread_rng()
        .gen_range(CARD_NUMBER_MIN..CARD_NUMBER_MAX)
        .to_string()
}

/// Resolve the patient's card, opening one with a zero balance and a fresh
/// number if none exists yet.
pub async fn ensure_card(
    repo: &dyn LedgerRepository,
    patient_id: Uuid,
    actor: Uuid,
) -> LedgerResult<Card> {
    if let Some(card) = repo.find_card_for_patient(patient_id).await? {
        return Ok(card);
    }

    for _ in 0..PROVISION_ATTEMPTS {
        let number = generate_card_number();
        if repo.card_number_taken(&number).await? {
            debug!("card number collision, drawing again");
            continue;
        }

        match repo.insert_card(&Card::new(patient_id, number, actor)).await {
            Ok(card) => {
                info!(patient_id = %patient_id, card_id = %card.id, "card opened");
                return Ok(card);
            }
            Err(LedgerError::CardAlreadyExists) => {
                // Lost a provisioning race. If the patient now has a card it
                // is ours; otherwise the conflict was on the number, so draw
                // a new one.
                if let Some(card) = repo.find_card_for_patient(patient_id).await? {
                    return Ok(card);
                }
            }
            Err(e) => return Err(e),
        }
    }

    Err(LedgerError::Storage(StorageError::Unavailable(
        "could not allocate a unique card number".to_string(),
    )))
}
