//! Owner settings and contract funds.

use super::tx::submit;
use super::{amount_of, count_of, format_outputs, Session};
use anyhow::{Context, Result};
use colored::Colorize;
use pqm_core::{Address, Amount, ArgValue};
use pqm_rpc::{ContractClient, SendOptions};

pub async fn set_stake_wallet<C>(
    session: &Session<'_, C>,
    wallet: ArgValue,
    sender: Address,
) -> Result<()>
where
    C: ContractClient + ?Sized,
{
    let confirmed = submit(session, "setStakeWallet", &[wallet], SendOptions::new(sender)).await?;
    if confirmed.is_none() {
        return Ok(());
    }

    let current = session
        .contract
        .call("getStakeWallet", &[], Some(&sender))
        .await
        .context("Failed to read back the stake wallet")?;
    println!(
        "Stake wallet changed to {}",
        format_outputs(&current).bright_yellow()
    );
    Ok(())
}

pub async fn set_min_purchase<C>(
    session: &Session<'_, C>,
    amount: Amount,
    sender: Address,
) -> Result<()>
where
    C: ContractClient + ?Sized,
{
    let args = [ArgValue::from(amount.base_units())];
    submit(session, "setMinPurchase", &args, SendOptions::new(sender)).await?;
    Ok(())
}

pub async fn min_purchase<C>(session: &Session<'_, C>, sender: Option<&Address>) -> Result<()>
where
    C: ContractClient + ?Sized,
{
    let value = session
        .contract
        .call_first("getMinPurchase", &[], sender)
        .await
        .context("Failed to query minimum purchase")?;
    println!(
        "Min purchase quantity set to {}",
        amount_of("getMinPurchase", &value)?
    );
    Ok(())
}

pub async fn set_min_redeem<C>(
    session: &Session<'_, C>,
    amount: Amount,
    sender: Address,
) -> Result<()>
where
    C: ContractClient + ?Sized,
{
    let args = [ArgValue::from(amount.base_units())];
    submit(session, "setMinRedeem", &args, SendOptions::new(sender)).await?;
    Ok(())
}

pub async fn min_redeem<C>(session: &Session<'_, C>, sender: Option<&Address>) -> Result<()>
where
    C: ContractClient + ?Sized,
{
    let value = session
        .contract
        .call_first("getMinRedeem", &[], sender)
        .await
        .context("Failed to query minimum redeem")?;
    println!(
        "Min redeem quantity set to {}",
        amount_of("getMinRedeem", &value)?
    );
    Ok(())
}

pub async fn set_max_requests<C>(session: &Session<'_, C>, count: u64, sender: Address) -> Result<()>
where
    C: ContractClient + ?Sized,
{
    let args = [ArgValue::from(count)];
    submit(session, "setMaxReqs", &args, SendOptions::new(sender)).await?;
    Ok(())
}

pub async fn max_requests<C>(session: &Session<'_, C>, sender: Option<&Address>) -> Result<()>
where
    C: ContractClient + ?Sized,
{
    let value = session
        .contract
        .call_first("getMaxReqs", &[], sender)
        .await
        .context("Failed to query maximum requests")?;
    println!("Max requests set to {}", count_of("getMaxReqs", &value)?);
    Ok(())
}

/// QTUM held by the contract.
pub async fn contract_balance<C>(session: &Session<'_, C>, sender: Option<&Address>) -> Result<()>
where
    C: ContractClient + ?Sized,
{
    let value = session
        .contract
        .call_first("getContractBal", &[], sender)
        .await
        .context("Failed to query contract balance")?;
    println!(
        "QTUM balance of contract is {}",
        amount_of("getContractBal", &value)?.to_string().bright_cyan()
    );
    Ok(())
}

pub async fn withdraw<C>(session: &Session<'_, C>, sender: Address) -> Result<()>
where
    C: ContractClient + ?Sized,
{
    submit(session, "withdrawQtum", &[], SendOptions::new(sender)).await?;
    Ok(())
}

pub async fn feed_contract<C>(session: &Session<'_, C>, amount: Amount, sender: Address) -> Result<()>
where
    C: ContractClient + ?Sized,
{
    let options = SendOptions::new(sender).with_value(amount);
    submit(session, "feedContract", &[], options).await?;
    Ok(())
}
