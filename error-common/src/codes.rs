// Stable error codes for ClinicFlow Engine.
// Codes are wire-visible; never renumber an existing one.

pub mod identity {
    pub const USER_NOT_FOUND: &str = "IDENTITY_1001";
    pub const ACCESS_DENIED: &str = "IDENTITY_1002";
}

pub mod catalog {
    pub const ITEM_NOT_FOUND: &str = "CATALOG_2001";
}

pub mod schedule {
    pub const SLOT_UNAVAILABLE: &str = "SCHEDULE_3001";
    pub const SLOT_ALREADY_EXISTS: &str = "SCHEDULE_3002";
    pub const SLOT_NOT_FOUND: &str = "SCHEDULE_3003";
    pub const SLOT_OCCUPIED: &str = "SCHEDULE_3004";
    pub const INVALID_TIME_WINDOW: &str = "SCHEDULE_3005";
}

pub mod booking {
    pub const BOOKING_NOT_FOUND: &str = "BOOKING_4001";
    pub const INVALID_DATE_RANGE: &str = "BOOKING_4002";
    pub const BOOKING_CLOSED: &str = "BOOKING_4003";
}

pub mod ledger {
    pub const CARD_NOT_FOUND: &str = "LEDGER_5001";
    pub const CARD_ALREADY_EXISTS: &str = "LEDGER_5002";
    pub const CARD_INACTIVE: &str = "LEDGER_5003";
    pub const INSUFFICIENT_FUNDS: &str = "LEDGER_5004";
    pub const OVERPAYMENT_REJECTED: &str = "LEDGER_5005";
    pub const ALREADY_FULLY_PAID: &str = "LEDGER_5006";
    pub const INVALID_AMOUNT: &str = "LEDGER_5007";
}

pub mod storage {
    pub const UNAVAILABLE: &str = "STORAGE_6001";
}
