/*!
 * Asset Registry Smart Contract
 *
 * Minimal custody ledger for unique assets, identified by a `u64` id.
 * Provides the surface a sale contract needs:
 * - Ownership lookup (`owner_of`)
 * - Single-operator approval per asset (`approve` / `revoke`)
 * - Transfers by the owner or the approved operator (`transfer_from`)
 *
 * Minting is restricted to the admin set at initialization.
 */

#![no_std]


use soroban_sdk::{
    contract, contracterror, contractimpl, contracttype, log, symbol_short, Address, Env, Symbol,
};

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Admin,
    Owner(u64),
    Approved(u64),
}

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum RegistryError {
    /// No asset was minted under this id
    AssetNotFound = 1,

    /// An asset with this id already exists
    AssetExists = 2,

    /// `from` is not the current owner
    NotOwner = 3,

    /// Spender is neither the owner nor the approved operator
    NotApproved = 4,

    AlreadyInitialized = 5,

    NotInitialized = 6,
}

/// Topics: (MINTED, to) Data: asset_id
pub const MINTED: Symbol = symbol_short!("minted");

/// Topics: (APPROVED, owner) Data: (asset_id, operator)
pub const APPROVED: Symbol = symbol_short!("approved");

/// Topics: (TRANSFERRED, from, to) Data: asset_id
pub const TRANSFERRED: Symbol = symbol_short!("transfer");

#[contract]
pub struct AssetRegistryContract;

#[contractimpl]
impl AssetRegistryContract {
    pub fn initialize(env: Env, admin: Address) -> Result<(), RegistryError> {
        if env.storage().instance().has(&DataKey::Admin) {
            return Err(RegistryError::AlreadyInitialized);
        }
        env.storage().instance().set(&DataKey::Admin, &admin);
        Ok(())
    }

    /// Creates `asset_id` owned by `to`. Admin only.
    pub fn mint(env: Env, to: Address, asset_id: u64) -> Result<(), RegistryError> {
        let admin: Address = env
            .storage()
            .instance()
            .get(&DataKey::Admin)
            .ok_or(RegistryError::NotInitialized)?;
        admin.require_auth();

        if env.storage().persistent().has(&DataKey::Owner(asset_id)) {
            return Err(RegistryError::AssetExists);
        }
        env.storage().persistent().set(&DataKey::Owner(asset_id), &to);

        env.events().publish((MINTED, to), asset_id);
        Ok(())
    }

    pub fn owner_of(env: Env, asset_id: u64) -> Result<Address, RegistryError> {
        env.storage()
            .persistent()
            .get(&DataKey::Owner(asset_id))
            .ok_or(RegistryError::AssetNotFound)
    }

    /// Lets `operator` move `asset_id` on the owner's behalf, replacing any
    /// previous approval.
    pub fn approve(env: Env, owner: Address, operator: Address, asset_id: u64) -> Result<(), RegistryError> {
        owner.require_auth();
        Self::_require_owner(&env, &owner, asset_id)?;

        env.storage().persistent().set(&DataKey::Approved(asset_id), &operator);
        env.events().publish((APPROVED, owner), (asset_id, operator));
        Ok(())
    }

    pub fn revoke(env: Env, owner: Address, asset_id: u64) -> Result<(), RegistryError> {
        owner.require_auth();
        Self::_require_owner(&env, &owner, asset_id)?;

        env.storage().persistent().remove(&DataKey::Approved(asset_id));
        Ok(())
    }

    pub fn get_approved(env: Env, asset_id: u64) -> Option<Address> {
        env.storage().persistent().get(&DataKey::Approved(asset_id))
    }

    /// Moves `asset_id` from `from` to `to`. The spender must sign and be either
    /// the owner or the approved operator. Any approval is cleared.
    pub fn transfer_from(
        env: Env,
        spender: Address,
        from: Address,
        to: Address,
        asset_id: u64,
    ) -> Result<(), RegistryError> {
        spender.require_auth();
        Self::_require_owner(&env, &from, asset_id)?;

        if spender != from {
            let approved: Option<Address> = env.storage().persistent().get(&DataKey::Approved(asset_id));
            if approved.as_ref() != Some(&spender) {
                log!(&env, "Spender not approved for asset {}", asset_id);
                return Err(RegistryError::NotApproved);
            }
        }

        env.storage().persistent().remove(&DataKey::Approved(asset_id));
        env.storage().persistent().set(&DataKey::Owner(asset_id), &to);

        env.events().publish((TRANSFERRED, from, to), asset_id);
        Ok(())
    }

    fn _require_owner(env: &Env, owner: &Address, asset_id: u64) -> Result<(), RegistryError> {
        let current = Self::owner_of(env.clone(), asset_id)?;
        if current != *owner {
            return Err(RegistryError::NotOwner);
        }
        Ok(())
    }
}
