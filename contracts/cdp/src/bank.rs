use cosmwasm_std::{
    attr, coin, Addr, BankMsg, DepsMut, MessageInfo, Response, StdResult, Storage, Uint128,
};

use crate::error::ContractError;
use crate::state::{BALANCES, CONFIG};

/// Balance store the position ledger settles against.
/// Calls take the storage they operate on so a keeper can be used alongside other state writes.
pub trait BalanceKeeper {
    fn get_balance(&self, storage: &dyn Storage, account: &Addr, denom: &str) -> StdResult<Uint128>;

    fn has_balance(
        &self,
        storage: &dyn Storage,
        account: &Addr,
        denom: &str,
        amount: Uint128,
    ) -> StdResult<bool> {
        Ok(self.get_balance(storage, account, denom)? >= amount)
    }

    fn credit(
        &self,
        storage: &mut dyn Storage,
        account: &Addr,
        denom: &str,
        amount: Uint128,
    ) -> Result<(), ContractError>;

    /// Errors with InsufficientFunds, leaving the balance untouched
    fn debit(
        &self,
        storage: &mut dyn Storage,
        account: &Addr,
        denom: &str,
        amount: Uint128,
    ) -> Result<(), ContractError>;
}

/// Balances held in this contract's own storage
pub struct ContractBank;

impl BalanceKeeper for ContractBank {
    fn get_balance(&self, storage: &dyn Storage, account: &Addr, denom: &str) -> StdResult<Uint128> {
        Ok(BALANCES
            .may_load(storage, (account.clone(), denom.to_string()))?
            .unwrap_or_default())
    }

    fn credit(
        &self,
        storage: &mut dyn Storage,
        account: &Addr,
        denom: &str,
        amount: Uint128,
    ) -> Result<(), ContractError> {
        if amount.is_zero() {
            return Ok(());
        }
        let balance = self.get_balance(storage, account, denom)?;
        BALANCES.save(
            storage,
            (account.clone(), denom.to_string()),
            &balance.checked_add(amount)?,
        )?;
        Ok(())
    }

    fn debit(
        &self,
        storage: &mut dyn Storage,
        account: &Addr,
        denom: &str,
        amount: Uint128,
    ) -> Result<(), ContractError> {
        if amount.is_zero() {
            return Ok(());
        }
        let balance = self.get_balance(storage, account, denom)?;
        if balance < amount {
            return Err(ContractError::InsufficientFunds {
                denom: denom.to_string(),
                available: balance,
                required: amount,
            });
        }

        let key = (account.clone(), denom.to_string());
        if balance == amount {
            BALANCES.remove(storage, key);
        } else {
            BALANCES.save(storage, key, &(balance - amount))?;
        }
        Ok(())
    }
}

/// Credit the sent funds to the sender's ledger balance
pub fn deposit(deps: DepsMut, info: MessageInfo) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;

    if info.funds.len() != 1 || info.funds[0].amount.is_zero() {
        return Err(ContractError::InvalidDeposit {});
    }
    let funds = &info.funds[0];
    if funds.denom == config.debt_denom {
        return Err(ContractError::InternalAsset {});
    }

    ContractBank.credit(deps.storage, &info.sender, &funds.denom, funds.amount)?;

    Ok(Response::new().add_attributes(vec![
        attr("method", "deposit"),
        attr("account", info.sender),
        attr("amount", funds.to_string()),
    ]))
}

/// Debit the sender's ledger balance and send it out as native funds.
/// The stable asset can't leave the ledger.
pub fn withdraw(
    deps: DepsMut,
    info: MessageInfo,
    denom: String,
    amount: Uint128,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if denom == config.debt_denom {
        return Err(ContractError::InternalAsset {});
    }
    if amount.is_zero() {
        return Err(ContractError::ZeroAmount {});
    }

    ContractBank.debit(deps.storage, &info.sender, &denom, amount)?;

    let withdrawn = coin(amount.u128(), denom);
    let msg = BankMsg::Send {
        to_address: info.sender.to_string(),
        amount: vec![withdrawn.clone()],
    };

    Ok(Response::new().add_message(msg).add_attributes(vec![
        attr("method", "withdraw"),
        attr("account", info.sender),
        attr("amount", withdrawn.to_string()),
    ]))
}

/// Move ledger balance, stable included, to another account
pub fn transfer(
    deps: DepsMut,
    info: MessageInfo,
    recipient: String,
    denom: String,
    amount: Uint128,
) -> Result<Response, ContractError> {
    let recipient = deps.api.addr_validate(&recipient)?;
    if amount.is_zero() {
        return Err(ContractError::ZeroAmount {});
    }

    ContractBank.debit(deps.storage, &info.sender, &denom, amount)?;
    ContractBank.credit(deps.storage, &recipient, &denom, amount)?;

    Ok(Response::new().add_attributes(vec![
        attr("method", "transfer"),
        attr("sender", info.sender),
        attr("recipient", recipient),
        attr("amount", format!("{}{}", amount, denom)),
    ]))
}
