/*!
 * Dutch Auction Smart Contract
 *
 * Sells a single asset held in an external registry at a price that decays
 * linearly with the ledger sequence number.
 * Key features:
 * - Seller-controlled start and cancellation
 * - First buyer paying at least the current price wins the asset
 * - Overpayment is refunded in the same call, no fee is retained
 * - Hard expiry after a fixed number of ledgers
 *
 * Business Logic:
 * 1. Seller initializes the auction terms and approves this contract in the registry
 * 2. Seller starts the auction, fixing the start ledger
 * 3. A buyer pays; the contract moves the asset, credits the seller, refunds the rest
 * 4. Until a sale, the seller may cancel
 */

#![no_std]

mod pricing;
mod registry;
mod types;


use soroban_sdk::{contract, contractimpl, log, symbol_short, token, Address, Env, Symbol};

pub use registry::{AssetRegistryClient, AssetRegistryInterface};
pub use types::{AuctionConfig, Error, Phase, Sale, AUCTION_CANCELLED, AUCTION_SOLD, AUCTION_STARTED};

#[contract]
pub struct DutchAuctionContract;

// Storage keys, all in instance storage
const CONFIG_KEY: Symbol = symbol_short!("CONFIG");           // AuctionConfig, written once
const PHASE_KEY: Symbol = symbol_short!("PHASE");             // Phase
const START_TICK_KEY: Symbol = symbol_short!("START_TCK");    // u32, set by start
const SALE_KEY: Symbol = symbol_short!("SALE");               // Sale, set by buy

const DAY_IN_LEDGERS: u32 = 17_280;
const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
const INSTANCE_LIFETIME_THRESHOLD: u32 = INSTANCE_BUMP_AMOUNT - DAY_IN_LEDGERS;

#[contractimpl]
impl DutchAuctionContract {
    /// Writes the auction terms. Can only be called once.
    ///
    /// # Arguments
    /// * `seller` - Asset owner, receives proceeds (must sign)
    /// * `payment_token` - Token contract buyers pay with
    /// * `asset_registry` - Registry contract holding the asset
    /// * `asset_id` - Asset to sell
    /// * `starting_price` - Price at the start ledger
    /// * `decay_rate_per_tick` - Price reduction per ledger
    /// * `duration` - Ledgers until expiry; `None` derives `starting_price / decay_rate_per_tick`
    ///
    /// # Errors
    /// - AlreadyInitialized: If terms were already written
    /// - InvalidAmount: If price or rate is negative
    /// - InvalidConfig: If the duration is zero or cannot be derived
    pub fn initialize(
        env: Env,
        seller: Address,
        payment_token: Address,
        asset_registry: Address,
        asset_id: u64,
        starting_price: i128,
        decay_rate_per_tick: i128,
        duration: Option<u32>,
    ) -> Result<(), Error> {
        if env.storage().instance().has(&CONFIG_KEY) {
            return Err(Error::AlreadyInitialized);
        }

        seller.require_auth();

        if starting_price < 0 || decay_rate_per_tick < 0 {
            return Err(Error::InvalidAmount);
        }

        let duration = match duration {
            Some(ticks) => ticks,
            None => pricing::derive_duration(starting_price, decay_rate_per_tick)
                .ok_or(Error::InvalidConfig)?,
        };
        if duration == 0 {
            log!(&env, "Auction duration must be positive. Price: {}, Rate: {}",
                starting_price, decay_rate_per_tick);
            return Err(Error::InvalidConfig);
        }

        let config = AuctionConfig {
            seller,
            payment_token,
            asset_registry,
            asset_id,
            starting_price,
            decay_rate_per_tick,
            duration,
        };

        env.storage().instance().set(&CONFIG_KEY, &config);
        env.storage().instance().set(&PHASE_KEY, &Phase::Pending);
        Self::_bump(&env);

        Ok(())
    }

    /// Starts the countdown at the current ledger. Seller only, once.
    ///
    /// # Errors
    /// - NotAuthorized: If caller is not the seller
    /// - InvalidState: If the auction is not pending
    /// - TransferDenied: If the seller no longer owns the asset
    pub fn start(env: Env, caller: Address) -> Result<u32, Error> {
        caller.require_auth();

        let config = Self::_config(&env)?;
        Self::_require_seller(&config, &caller)?;

        if Self::_phase(&env)? != Phase::Pending {
            return Err(Error::InvalidState);
        }

        Self::_require_custody(&env, &config)?;

        let start_tick = env.ledger().sequence();
        env.storage().instance().set(&START_TICK_KEY, &start_tick);
        env.storage().instance().set(&PHASE_KEY, &Phase::Active);
        Self::_bump(&env);

        env.events().publish((AUCTION_STARTED,), start_tick);

        Ok(start_tick)
    }

    /// Buys the asset at the current price and returns the refunded overpayment.
    ///
    /// # Settlement
    /// 1. All checks run before any transfer
    /// 2. `payment` is pulled from the buyer into the contract
    /// 3. The registry moves the asset from seller to buyer
    /// 4. Exactly the current price is credited to the seller
    /// 5. `payment - price` is refunded to the buyer
    ///
    /// Any error rolls back the whole invocation, so a failed step leaves no
    /// partial settlement behind.
    ///
    /// # Errors
    /// - AuctionEnded: If pending, sold, cancelled or expired
    /// - InvalidAmount: If payment is negative
    /// - NotAuthorized: If the seller tries to buy
    /// - InsufficientPayment: If payment is below the current price
    /// - TransferDenied: If the registry refuses the custody transfer
    /// - PaymentFailed: If a token transfer fails
    pub fn buy(env: Env, buyer: Address, payment: i128) -> Result<i128, Error> {
        buyer.require_auth();

        let config = Self::_config(&env)?;
        if Self::_phase(&env)? != Phase::Active {
            return Err(Error::AuctionEnded);
        }

        let tick = env.ledger().sequence();
        let start_tick = Self::_start_tick(&env)?;
        if pricing::is_expired(start_tick, config.duration, tick) {
            log!(&env, "Auction expired at {}, current ledger {}",
                pricing::expiry_tick(start_tick, config.duration), tick);
            return Err(Error::AuctionEnded);
        }

        if payment < 0 {
            return Err(Error::InvalidAmount);
        }
        if buyer == config.seller {
            return Err(Error::NotAuthorized);
        }

        let price = pricing::price_at(config.starting_price, config.decay_rate_per_tick, start_tick, tick);
        if payment < price {
            log!(&env, "Insufficient payment. Price: {}, Provided: {}", price, payment);
            return Err(Error::InsufficientPayment);
        }
        let refund = payment - price;

        Self::_require_custody(&env, &config)?;

        let contract = env.current_contract_address();
        let payment_client = token::Client::new(&env, &config.payment_token);
        let registry_client = AssetRegistryClient::new(&env, &config.asset_registry);

        if payment > 0 {
            match payment_client.try_transfer(&buyer, &contract, &payment) {
                Ok(_) => {},
                Err(_) => {
                    log!(&env, "Failed to collect payment {} from buyer", payment);
                    return Err(Error::PaymentFailed);
                }
            }
        }

        match registry_client.try_transfer_from(&contract, &config.seller, &buyer, &config.asset_id) {
            Ok(_) => {},
            Err(_) => {
                log!(&env, "Registry denied transfer of asset {}", config.asset_id);
                return Err(Error::TransferDenied);
            }
        }

        if price > 0 {
            match payment_client.try_transfer(&contract, &config.seller, &price) {
                Ok(_) => {},
                Err(_) => {
                    log!(&env, "Failed to credit {} to seller", price);
                    return Err(Error::PaymentFailed);
                }
            }
        }

        if refund > 0 {
            match payment_client.try_transfer(&contract, &buyer, &refund) {
                Ok(_) => {},
                Err(_) => {
                    log!(&env, "Failed to refund {} to buyer", refund);
                    return Err(Error::PaymentFailed);
                }
            }
        }

        let sale = Sale {
            buyer: buyer.clone(),
            price,
            refund,
            tick,
        };
        env.storage().instance().set(&PHASE_KEY, &Phase::Sold);
        env.storage().instance().set(&SALE_KEY, &sale);
        Self::_bump(&env);

        env.events().publish((AUCTION_SOLD, buyer), price);

        Ok(refund)
    }

    /// Withdraws the asset from sale. Seller only, while active.
    ///
    /// Allowed after expiry too, as long as no sale happened.
    ///
    /// # Errors
    /// - NotAuthorized: If caller is not the seller
    /// - InvalidState: If the auction is not active
    pub fn cancel(env: Env, caller: Address) -> Result<(), Error> {
        caller.require_auth();

        let config = Self::_config(&env)?;
        Self::_require_seller(&config, &caller)?;

        if Self::_phase(&env)? != Phase::Active {
            return Err(Error::InvalidState);
        }

        env.storage().instance().set(&PHASE_KEY, &Phase::Cancelled);
        Self::_bump(&env);

        env.events().publish((AUCTION_CANCELLED, caller), ());

        Ok(())
    }

    // ================================================================================================
    // INTERNAL HELPERS
    // ================================================================================================

    fn _config(env: &Env) -> Result<AuctionConfig, Error> {
        env.storage().instance().get(&CONFIG_KEY).ok_or(Error::NotInitialized)
    }

    fn _phase(env: &Env) -> Result<Phase, Error> {
        env.storage().instance().get(&PHASE_KEY).ok_or(Error::NotInitialized)
    }

    /// Start tick of an active or closed auction. Missing while pending.
    fn _start_tick(env: &Env) -> Result<u32, Error> {
        env.storage().instance().get(&START_TICK_KEY).ok_or(Error::InvalidState)
    }

    fn _require_seller(config: &AuctionConfig, caller: &Address) -> Result<(), Error> {
        if *caller != config.seller {
            return Err(Error::NotAuthorized);
        }
        Ok(())
    }

    /// The seller must still hold the asset in the registry.
    fn _require_custody(env: &Env, config: &AuctionConfig) -> Result<(), Error> {
        let registry_client = AssetRegistryClient::new(env, &config.asset_registry);
        match registry_client.try_owner_of(&config.asset_id) {
            Ok(Ok(owner)) if owner == config.seller => Ok(()),
            _ => {
                log!(env, "Seller does not hold asset {}", config.asset_id);
                Err(Error::TransferDenied)
            }
        }
    }

    fn _bump(env: &Env) {
        env.storage()
            .instance()
            .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
    }

    // ================================================================================================
    // QUERY FUNCTIONS (GETTERS)
    // ================================================================================================

    /// Current price at this ledger.
    ///
    /// Only defined while active. Past expiry the price reads 0; `buy` rejects
    /// those ledgers anyway.
    pub fn get_price(env: Env) -> Result<i128, Error> {
        Self::price_at(env.clone(), env.ledger().sequence())
    }

    /// Price the auction would have at `tick`. Only defined while active.
    pub fn price_at(env: Env, tick: u32) -> Result<i128, Error> {
        let config = Self::_config(&env)?;
        if Self::_phase(&env)? != Phase::Active {
            return Err(Error::InvalidState);
        }
        let start_tick = Self::_start_tick(&env)?;
        Ok(pricing::price_at(config.starting_price, config.decay_rate_per_tick, start_tick, tick))
    }

    /// Whether an active auction has run past its duration at this ledger.
    pub fn is_expired(env: Env) -> Result<bool, Error> {
        let config = Self::_config(&env)?;
        if Self::_phase(&env)? != Phase::Active {
            return Ok(false);
        }
        let start_tick = Self::_start_tick(&env)?;
        Ok(pricing::is_expired(start_tick, config.duration, env.ledger().sequence()))
    }

    pub fn phase(env: Env) -> Result<Phase, Error> {
        Self::_phase(&env)
    }

    pub fn starting_price(env: Env) -> Result<i128, Error> {
        Ok(Self::_config(&env)?.starting_price)
    }

    pub fn decay_rate_per_tick(env: Env) -> Result<i128, Error> {
        Ok(Self::_config(&env)?.decay_rate_per_tick)
    }

    pub fn duration(env: Env) -> Result<u32, Error> {
        Ok(Self::_config(&env)?.duration)
    }

    /// Ledger the auction was started at, `None` while pending.
    pub fn start_tick(env: Env) -> Option<u32> {
        env.storage().instance().get(&START_TICK_KEY)
    }

    /// First ledger at which `buy` is rejected, `None` while pending.
    pub fn expiry_tick(env: Env) -> Result<Option<u32>, Error> {
        let config = Self::_config(&env)?;
        Ok(Self::start_tick(env).map(|start| pricing::expiry_tick(start, config.duration)))
    }

    pub fn asset_id(env: Env) -> Result<u64, Error> {
        Ok(Self::_config(&env)?.asset_id)
    }

    pub fn seller(env: Env) -> Result<Address, Error> {
        Ok(Self::_config(&env)?.seller)
    }

    pub fn payment_token(env: Env) -> Result<Address, Error> {
        Ok(Self::_config(&env)?.payment_token)
    }

    pub fn asset_registry(env: Env) -> Result<Address, Error> {
        Ok(Self::_config(&env)?.asset_registry)
    }

    pub fn get_config(env: Env) -> Result<AuctionConfig, Error> {
        Self::_config(&env)
    }

    /// Settlement record, present once the auction is sold.
    pub fn get_sale(env: Env) -> Option<Sale> {
        env.storage().instance().get(&SALE_KEY)
    }
}
