//! Settlement decision
//!
//! The charging rules of the ledger live in one pure function so that every
//! repository implementation applies exactly the same semantics under its
//! own locking scheme. The order of checks is observable through error
//! precedence: funds first, then payment state, then the price bound.

use crate::{error::*, models::*};
use storage_core::RecordMeta;
use uuid::Uuid;

/// The state to persist after a successful settlement.
#[derive(Debug, Clone)]
pub struct SettlementOutcome {
    pub card: Card,
    pub payment: PaymentRecord,
    /// False when the payment record already existed and was accumulated.
    pub payment_created: bool,
}

/// Apply one charge to a card and its booking's payment record.
///
/// The funds check is against the card's full funded balance, not the
/// remaining amount owed.
pub fn decide(
    card: &Card,
    existing: Option<&PaymentRecord>,
    settlement: &Settlement,
) -> LedgerResult<SettlementOutcome> {
    if card.status == CardStatus::Inactive {
        return Err(LedgerError::CardInactive);
    }
    if card.funded_balance < settlement.amount {
        return Err(LedgerError::InsufficientFunds);
    }

    let (payment, payment_created) = match existing {
        None => {
            if settlement.amount > settlement.price {
                return Err(LedgerError::OverpaymentRejected);
            }
            let payment = PaymentRecord {
                id: Uuid::new_v4(),
                booking_id: settlement.booking_id,
                card_id: card.id,
                amount_paid: settlement.amount,
                method: settlement.method.clone(),
                status: paid_status(settlement.amount, settlement.price),
                meta: RecordMeta::new(settlement.actor),
            };
            (payment, true)
        }
        Some(existing) => {
            if existing.status == PaymentStatus::Paid {
                return Err(LedgerError::AlreadyFullyPaid);
            }
            if settlement.amount > settlement.price - existing.amount_paid {
                return Err(LedgerError::OverpaymentRejected);
            }
            let mut payment = existing.clone();
            payment.amount_paid += settlement.amount;
            payment.method = settlement.method.clone();
            payment.status = paid_status(payment.amount_paid, settlement.price);
            payment.meta.touch(settlement.actor);
            (payment, false)
        }
    };

    let mut card = card.clone();
    card.funded_balance -= settlement.amount;
    card.meta.touch(settlement.actor);

    Ok(SettlementOutcome {
        card,
        payment,
        payment_created,
    })
}

fn paid_status(amount_paid: rust_decimal::Decimal, price: rust_decimal::Decimal) -> PaymentStatus {
    if amount_paid == price {
        PaymentStatus::Paid
    } else {
        PaymentStatus::NotPaid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn card_with_balance(balance: i64) -> Card {
        let mut card = Card::new(Uuid::new_v4(), "1000000000000001".to_string(), Uuid::new_v4());
        card.funded_balance = Decimal::from(balance);
        card
    }

    fn settlement(card: &Card, amount: i64, price: i64) -> Settlement {
        Settlement {
            card_id: card.id,
            booking_id: Uuid::new_v4(),
            amount: Decimal::from(amount),
            method: "cash".to_string(),
            price: Decimal::from(price),
            actor: Uuid::new_v4(),
        }
    }

    #[test]
    fn partial_payments_accumulate_to_paid() {
        let card = card_with_balance(200);
        let first = settlement(&card, 60, 100);

        let outcome = decide(&card, None, &first).unwrap();
        assert_eq!(outcome.payment.status, PaymentStatus::NotPaid);
        assert_eq!(outcome.payment.amount_paid, Decimal::from(60));
        assert_eq!(outcome.card.funded_balance, Decimal::from(140));
        assert!(outcome.payment_created);

        let second = Settlement {
            booking_id: outcome.payment.booking_id,
            amount: Decimal::from(40),
            ..first
        };
        let outcome = decide(&outcome.card, Some(&outcome.payment), &second).unwrap();
        assert_eq!(outcome.payment.status, PaymentStatus::Paid);
        assert_eq!(outcome.payment.amount_paid, Decimal::from(100));
        assert_eq!(outcome.card.funded_balance, Decimal::from(100));
        assert!(!outcome.payment_created);
    }

    #[test]
    fn funds_check_precedes_payment_rules() {
        let card = card_with_balance(10);
        let charge = settlement(&card, 60, 100);
        assert!(matches!(
            decide(&card, None, &charge),
            Err(LedgerError::InsufficientFunds)
        ));
    }

    #[test]
    fn overpayment_is_rejected_on_first_and_later_charges() {
        let card = card_with_balance(500);
        let too_much = settlement(&card, 150, 100);
        assert!(matches!(
            decide(&card, None, &too_much),
            Err(LedgerError::OverpaymentRejected)
        ));

        let first = settlement(&card, 80, 100);
        let outcome = decide(&card, None, &first).unwrap();

        let over_remainder = Settlement {
            amount: Decimal::from(30),
            ..first
        };
        assert!(matches!(
            decide(&outcome.card, Some(&outcome.payment), &over_remainder),
            Err(LedgerError::OverpaymentRejected)
        ));
    }

    #[test]
    fn fully_paid_rejects_further_charges() {
        let card = card_with_balance(500);
        let full = settlement(&card, 100, 100);
        let outcome = decide(&card, None, &full).unwrap();
        assert_eq!(outcome.payment.status, PaymentStatus::Paid);

        let extra = Settlement {
            amount: Decimal::from(1),
            ..full
        };
        assert!(matches!(
            decide(&outcome.card, Some(&outcome.payment), &extra),
            Err(LedgerError::AlreadyFullyPaid)
        ));
    }

    #[test]
    fn inactive_card_rejects_charges() {
        let mut card = card_with_balance(500);
        card.status = CardStatus::Inactive;
        let charge = settlement(&card, 10, 100);
        assert!(matches!(
            decide(&card, None, &charge),
            Err(LedgerError::CardInactive)
        ));
    }
}
