use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Sales tax applied to every completed transaction.
pub const TAX_RATE: Decimal = dec!(0.10);

/// Decimal places kept for money amounts.
pub const MONEY_DECIMAL_PLACES: u32 = 2;

/// Prefix of generated invoice numbers (`INV-YYYYMMDD-NNNN`).
pub const INVOICE_PREFIX: &str = "INV";

/// Maximum number of lines accepted on a single sale.
pub const MAX_TRANSACTION_LINES: usize = 100;

/// Largest price, cost or payment accepted.
pub const MAX_MONEY_AMOUNT: Decimal = dec!(1000000000);

/// Largest quantity on one sale line or one stock adjustment.
pub const MAX_LINE_QUANTITY: i64 = 1_000_000;

pub const MAX_SKU_LENGTH: usize = 64;
pub const MAX_CUSTOMER_NAME_LENGTH: usize = 120;
pub const MAX_FAREWELL_MESSAGE_LENGTH: usize = 255;

/// Default low stock threshold for products created without one.
pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 5;

/// Default reorder point for products created without one.
pub const DEFAULT_REORDER_POINT: i64 = 10;

pub const DEFAULT_PAGE_SIZE: i64 = 25;
pub const MAX_PAGE_SIZE: i64 = 200;

pub const DEFAULT_CURRENCY: &str = "USD";
pub const DEFAULT_STORE_NAME: &str = "RetailPOS Store";
