#![cfg_attr(not(feature = "std"), no_std)]

use ink::env::{DefaultEnvironment, Environment};

pub type AccountId = <DefaultEnvironment as Environment>::AccountId;
pub type Balance = <DefaultEnvironment as Environment>::Balance;

pub type Result<T> = core::result::Result<T, Error>;

/// Allowance value that is never spent down by `transfer_from`.
pub const MAX_AMOUNT: Balance = Balance::MAX;

#[derive(scale::Encode, scale::Decode, Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "std", derive(scale_info::TypeInfo))]
pub enum Error {
    /// A participant of the call is the zero account.
    InvalidAddress,
    InsufficientBalance,
    InsufficientAllowance,
    Overflow,
}

/// The all-zero account. Never a valid sender, recipient, owner or spender.
pub fn zero_account() -> AccountId {
    AccountId::from([0u8; 32])
}

pub fn is_zero(acc: &AccountId) -> bool {
    *acc == zero_account()
}

#[ink::trait_definition]
pub trait Erc20 {
    /// Returns the fixed amount issued at construction.
    #[ink(message)]
    fn total_supply(&self) -> Balance;

    /// Returns the balance of `owner_acc`, zero if never seen.
    #[ink(message)]
    fn balance_of(&self, owner_acc: AccountId) -> Balance;

    /// Returns how much `spender_acc` may still move out of `owner_acc`.
    #[ink(message)]
    fn allowance(&self, owner_acc: AccountId, spender_acc: AccountId) -> Balance;

    /// Moves `amount_val` from the caller to `to_acc`.
    #[ink(message)]
    fn transfer(&mut self, to_acc: AccountId, amount_val: Balance) -> Result<()>;

    /// Sets the caller's allowance for `spender_acc` to exactly `amount_val`.
    #[ink(message)]
    fn approve(&mut self, spender_acc: AccountId, amount_val: Balance) -> Result<()>;

    /// Moves `amount_val` from `from_acc` to `to_acc` against the caller's allowance.
    /// An allowance of `MAX_AMOUNT` is left untouched.
    #[ink(message)]
    fn transfer_from(
        &mut self,
        from_acc: AccountId,
        to_acc: AccountId,
        amount_val: Balance,
    ) -> Result<()>;
}
