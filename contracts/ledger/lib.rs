#![cfg_attr(not(feature = "std"), no_std, no_main)]

#[ink::contract]
mod ledger {
    use ink::prelude::string::String;
    use ink::storage::Mapping;
    use token_api::{is_zero, Erc20, Error, Result, MAX_AMOUNT};

    #[ink(event)]
    pub struct Transfer {
        #[ink(topic)]
        from_acc: AccountId,
        #[ink(topic)]
        to_acc: AccountId,
        amount_val: Balance,
    }

    #[ink(event)]
    pub struct Approval {
        #[ink(topic)]
        owner_acc: AccountId,
        #[ink(topic)]
        spender_acc: AccountId,
        amount_val: Balance,
    }

    /// Emitted once, when the constructor issues the whole supply.
    #[ink(event)]
    pub struct Minted {
        #[ink(topic)]
        to_acc: AccountId,
        amount_val: Balance,
    }

    #[ink(storage)]
    pub struct Ledger {
        // token state
        total_supply: Balance,
        balances: Mapping<AccountId, Balance>,
        allowances: Mapping<(AccountId, AccountId), Balance>,

        // metadata
        name_opt: Option<String>,
        symbol_opt: Option<String>,
        decimals_u8: u8,
    }

    /// Balances after a move, computed before anything is written.
    struct BalanceMove {
        from_acc: AccountId,
        to_acc: AccountId,
        amount_val: Balance,
        new_from: Balance,
        new_to: Balance,
    }

    impl Ledger {
        // -------- constructors --------

        /// Issues `initial_supply` to the deployer. This is the only mint path.
        #[ink(constructor)]
        pub fn new(initial_supply: Balance) -> Self {
            Self::with_metadata(initial_supply, None, None, 0)
        }

        #[ink(constructor)]
        pub fn with_metadata(
            initial_supply: Balance,
            name_opt: Option<String>,
            symbol_opt: Option<String>,
            decimals_u8: u8,
        ) -> Self {
            let deployer_acc = Self::env().caller();
            let mut balances = Mapping::default();
            balances.insert(deployer_acc, &initial_supply);
            Self::env().emit_event(Minted {
                to_acc: deployer_acc,
                amount_val: initial_supply,
            });
            Self {
                total_supply: initial_supply,
                balances,
                allowances: Mapping::default(),
                name_opt,
                symbol_opt,
                decimals_u8,
            }
        }

        // -------- read API --------

        #[ink(message)]
        pub fn my_balance(&self) -> Balance {
            let caller_acc = self.env().caller();
            self.balance_of_impl(&caller_acc)
        }

        #[ink(message)]
        pub fn token_name(&self) -> Option<String> {
            self.name_opt.clone()
        }

        #[ink(message)]
        pub fn token_symbol(&self) -> Option<String> {
            self.symbol_opt.clone()
        }

        #[ink(message)]
        pub fn token_decimals(&self) -> u8 {
            self.decimals_u8
        }

        // -------- write API --------

        #[ink(message)]
        pub fn increase_allowance(&mut self, spender_acc: AccountId, add_val: Balance) -> Result<()> {
            let owner_acc = self.env().caller();
            let current_val = self.allowance_impl(&owner_acc, &spender_acc);
            let new_val = current_val.checked_add(add_val).ok_or(Error::Overflow)?;
            self.set_allowance(owner_acc, spender_acc, new_val)
        }

        #[ink(message)]
        pub fn decrease_allowance(&mut self, spender_acc: AccountId, sub_val: Balance) -> Result<()> {
            let owner_acc = self.env().caller();
            let current_val = self.allowance_impl(&owner_acc, &spender_acc);
            let new_val = current_val
                .checked_sub(sub_val)
                .ok_or(Error::InsufficientAllowance)?;
            self.set_allowance(owner_acc, spender_acc, new_val)
        }

        // ---- internals ----

        fn balance_of_impl(&self, owner_acc: &AccountId) -> Balance {
            self.balances.get(owner_acc).unwrap_or(0)
        }

        fn allowance_impl(&self, owner_acc: &AccountId, spender_acc: &AccountId) -> Balance {
            self.allowances.get((*owner_acc, *spender_acc)).unwrap_or(0)
        }

        fn set_allowance(
            &mut self,
            owner_acc: AccountId,
            spender_acc: AccountId,
            amount_val: Balance,
        ) -> Result<()> {
            if is_zero(&owner_acc) || is_zero(&spender_acc) {
                return Err(Error::InvalidAddress)
            }
            self.allowances.insert((owner_acc, spender_acc), &amount_val);
            self.env().emit_event(Approval { owner_acc, spender_acc, amount_val });
            Ok(())
        }

        fn plan_move(
            &self,
            from_acc: AccountId,
            to_acc: AccountId,
            amount_val: Balance,
        ) -> Result<BalanceMove> {
            if is_zero(&from_acc) || is_zero(&to_acc) {
                return Err(Error::InvalidAddress)
            }
            let from_bal = self.balance_of_impl(&from_acc);
            if from_bal < amount_val {
                return Err(Error::InsufficientBalance)
            }
            // Self-moves keep the balance; reading `to_bal` here would double count.
            let (new_from, new_to) = if from_acc == to_acc {
                (from_bal, from_bal)
            } else {
                let to_bal = self.balance_of_impl(&to_acc);
                (
                    from_bal.checked_sub(amount_val).ok_or(Error::Overflow)?,
                    to_bal.checked_add(amount_val).ok_or(Error::Overflow)?,
                )
            };
            Ok(BalanceMove { from_acc, to_acc, amount_val, new_from, new_to })
        }

        fn apply_move(&mut self, mv: BalanceMove) {
            let BalanceMove { from_acc, to_acc, amount_val, new_from, new_to } = mv;
            if from_acc != to_acc {
                self.balances.insert(from_acc, &new_from);
                self.balances.insert(to_acc, &new_to);
            }
            self.env().emit_event(Transfer { from_acc, to_acc, amount_val });
        }
    }

    impl Erc20 for Ledger {
        #[ink(message)]
        fn total_supply(&self) -> Balance {
            self.total_supply
        }

        #[ink(message)]
        fn balance_of(&self, owner_acc: AccountId) -> Balance {
            self.balance_of_impl(&owner_acc)
        }

        #[ink(message)]
        fn allowance(&self, owner_acc: AccountId, spender_acc: AccountId) -> Balance {
            self.allowance_impl(&owner_acc, &spender_acc)
        }

        #[ink(message)]
        fn transfer(&mut self, to_acc: AccountId, amount_val: Balance) -> Result<()> {
            let from_acc = self.env().caller();
            let mv = self.plan_move(from_acc, to_acc, amount_val)?;
            self.apply_move(mv);
            Ok(())
        }

        #[ink(message)]
        fn approve(&mut self, spender_acc: AccountId, amount_val: Balance) -> Result<()> {
            let owner_acc = self.env().caller();
            self.set_allowance(owner_acc, spender_acc, amount_val)
        }

        #[ink(message)]
        fn transfer_from(
            &mut self,
            from_acc: AccountId,
            to_acc: AccountId,
            amount_val: Balance,
        ) -> Result<()> {
            let spender_acc = self.env().caller();

            // Precheck balances before touching the allowance
            let mv = self.plan_move(from_acc, to_acc, amount_val)?;

            let current_allow = self.allowance_impl(&from_acc, &spender_acc);
            if current_allow < amount_val {
                return Err(Error::InsufficientAllowance)
            }
            let new_allow = if current_allow == MAX_AMOUNT {
                None
            } else {
                Some(current_allow.checked_sub(amount_val).ok_or(Error::Overflow)?)
            };

            self.apply_move(mv);
            if let Some(new_allow) = new_allow {
                self.allowances.insert((from_acc, spender_acc), &new_allow);
            }
            Ok(())
        }
    }


    #[cfg(all(test, feature = "e2e-tests"))]
    mod e2e_tests {
        use super::*;
        use ink_e2e::ContractsBackend;

        type E2EResult<T> = std::result::Result<T, Box<dyn std::error::Error>>;

        #[ink_e2e::test]
        async fn e2e_transfer_and_delegate<Client: E2EBackend>(mut client: Client) -> E2EResult<()> {
            let mut constructor = LedgerRef::new(100);
            let contract = client
                .instantiate("ledger", &ink_e2e::alice(), &mut constructor)
                .submit()
                .await
                .expect("instantiate failed");
            let mut call_builder = contract.call_builder::<Ledger>();

            let alice_acc = ink_e2e::account_id(ink_e2e::AccountKeyring::Alice);
            let bob_acc = ink_e2e::account_id(ink_e2e::AccountKeyring::Bob);
            let charlie_acc = ink_e2e::account_id(ink_e2e::AccountKeyring::Charlie);

            let transfer = call_builder.transfer(bob_acc, 50);
            client
                .call(&ink_e2e::alice(), &transfer)
                .submit()
                .await
                .expect("transfer failed");

            let approve = call_builder.approve(charlie_acc, 50);
            client
                .call(&ink_e2e::bob(), &approve)
                .submit()
                .await
                .expect("approve failed");

            let transfer_from = call_builder.transfer_from(bob_acc, charlie_acc, 50);
            client
                .call(&ink_e2e::charlie(), &transfer_from)
                .submit()
                .await
                .expect("transfer_from failed");

            let balance_of = call_builder.balance_of(charlie_acc);
            let charlie_bal = client.call(&ink_e2e::alice(), &balance_of).dry_run().await?;
            let allowance = call_builder.allowance(bob_acc, charlie_acc);
            let allowance_res = client.call(&ink_e2e::alice(), &allowance).dry_run().await?;
            let balance_of = call_builder.balance_of(alice_acc);
            let alice_bal = client.call(&ink_e2e::alice(), &balance_of).dry_run().await?;

            assert_eq!(charlie_bal.return_value(), 50);
            assert_eq!(allowance_res.return_value(), 0);
            assert_eq!(alice_bal.return_value(), 50);
            Ok(())
        }

        #[ink_e2e::test]
        async fn e2e_overdraw_reverts<Client: E2EBackend>(mut client: Client) -> E2EResult<()> {
            let mut constructor = LedgerRef::new(100);
            let contract = client
                .instantiate("ledger", &ink_e2e::alice(), &mut constructor)
                .submit()
                .await
                .expect("instantiate failed");
            let mut call_builder = contract.call_builder::<Ledger>();

            let bob_acc = ink_e2e::account_id(ink_e2e::AccountKeyring::Bob);
            let transfer = call_builder.transfer(bob_acc, 101);
            let transfer_res = client.call(&ink_e2e::alice(), &transfer).submit().await;
            assert!(transfer_res.is_err(), "overdrawn transfer should revert");

            let balance_of = call_builder.balance_of(bob_acc);
            let bob_bal = client.call(&ink_e2e::alice(), &balance_of).dry_run().await?;
            assert_eq!(bob_bal.return_value(), 0);
            Ok(())
        }
    }
}
