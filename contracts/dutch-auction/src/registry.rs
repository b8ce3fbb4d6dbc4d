use soroban_sdk::{contractclient, Address, Env};

/// Custody interface the auction needs from the asset registry.
///
/// The registry is never owned by the auction; only its address and the asset
/// id are stored. `transfer_from` must reject the call when `from` is not the
/// current owner or `spender` is not allowed to move the asset.
#[contractclient(name = "AssetRegistryClient")]
pub trait AssetRegistryInterface {
    fn owner_of(env: Env, asset_id: u64) -> Address;

    fn transfer_from(env: Env, spender: Address, from: Address, to: Address, asset_id: u64);
}
