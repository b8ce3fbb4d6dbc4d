/*!
 * Type Definitions for the Dutch Auction Contract
 *
 * Configuration, lifecycle state, error codes and event symbols shared by the
 * contract entry points and the pricing helpers.
 */

use soroban_sdk::{contracterror, contracttype, symbol_short, Address, Symbol};

// ================================================================================================
// CORE DATA STRUCTURES
// ================================================================================================

/// Immutable terms of the auction, written once by `initialize`.
///
/// # Pricing
/// - Price starts at `starting_price` when the auction is started
/// - Every ledger (tick) after the start removes `decay_rate_per_tick`
/// - After `duration` ticks the auction is expired and can no longer be bought
///
/// All amounts are in the smallest unit of `payment_token`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AuctionConfig {
    /// Owner of the asset; receives the proceeds and may start or cancel
    pub seller: Address,

    /// Token contract used for payment, credit and refund
    pub payment_token: Address,

    /// Registry contract holding custody of the asset
    pub asset_registry: Address,

    /// Identifier of the asset inside `asset_registry`
    pub asset_id: u64,

    /// Price at the start tick
    pub starting_price: i128,

    /// Price reduction per elapsed tick
    pub decay_rate_per_tick: i128,

    /// Number of ticks after the start before the auction expires
    pub duration: u32,
}

/// Record of the settlement that closed the auction.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Sale {
    pub buyer: Address,
    /// Amount credited to the seller
    pub price: i128,
    /// Overpayment returned to the buyer
    pub refund: i128,
    /// Ledger sequence the sale settled at
    pub tick: u32,
}

// ================================================================================================
// ENUMERATIONS
// ================================================================================================

/// Lifecycle of the auction.
///
/// # State Transition Rules
/// - Pending → Active (seller calls `start`)
/// - Active → Sold (first valid `buy`)
/// - Active → Cancelled (seller calls `cancel`)
///
/// Sold and Cancelled are final. Expiry is not a phase: it is derived from the
/// current ledger sequence every time it matters.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Phase {
    Pending,
    Active,
    Sold,
    Cancelled,
}

// ================================================================================================
// ERROR DEFINITIONS
// ================================================================================================

/// Error codes returned by the auction.
///
/// # Error Code Ranges
/// - 1-5: lifecycle and settlement failures
/// - 6-10: collaborator, input and setup failures
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    /// Caller is not the seller, or the seller tried to buy their own asset
    NotAuthorized = 1,

    /// Operation is not allowed in the current phase
    InvalidState = 2,

    /// `buy` on an auction that is pending, sold, cancelled or expired
    AuctionEnded = 3,

    /// Payment is below the current price
    InsufficientPayment = 4,

    /// Registry refused the custody transfer, or the seller no longer owns the asset
    TransferDenied = 5,

    /// Payment token transfer failed (pull, seller credit or refund)
    PaymentFailed = 6,

    /// Negative price, decay rate or payment
    InvalidAmount = 7,

    /// Duration is zero or cannot be derived from price and decay rate
    InvalidConfig = 8,

    AlreadyInitialized = 9,

    NotInitialized = 10,
}

// ================================================================================================
// EVENT CONSTANTS
// ================================================================================================

/// Topics: (AUCTION_STARTED,) Data: start_tick
pub const AUCTION_STARTED: Symbol = symbol_short!("started");

/// Topics: (AUCTION_SOLD, buyer) Data: final_price
pub const AUCTION_SOLD: Symbol = symbol_short!("sold");

/// Topics: (AUCTION_CANCELLED, seller) Data: ()
pub const AUCTION_CANCELLED: Symbol = symbol_short!("cancelled");
