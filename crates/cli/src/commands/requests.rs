//! Redeem request queries and maintenance.

use super::tx::submit;
use super::{amount_of, count_of, format_outputs, Session};
use anyhow::{Context, Result};
use colored::Colorize;
use pqm_core::{Address, ArgValue};
use pqm_rpc::{ContractClient, SendOptions};

pub async fn count<C>(session: &Session<'_, C>, sender: Option<&Address>) -> Result<()>
where
    C: ContractClient + ?Sized,
{
    println!("{}", fetch_count(session, sender).await?);
    Ok(())
}

pub async fn total<C>(session: &Session<'_, C>, sender: Option<&Address>) -> Result<()>
where
    C: ContractClient + ?Sized,
{
    let total = session
        .contract
        .call_first("getTotReqs", &[], sender)
        .await
        .context("Failed to query request total")?;
    println!("{}", amount_of("getTotReqs", &total)?);
    Ok(())
}

pub async fn single<C>(session: &Session<'_, C>, index: u64) -> Result<()>
where
    C: ContractClient + ?Sized,
{
    let outputs = session
        .contract
        .call("getSingleRedeemReq", &[ArgValue::from(index)], None)
        .await
        .with_context(|| format!("Failed to query request {}", index))?;
    println!("{}", format_outputs(&outputs));
    Ok(())
}

/// Print the request count, every request, then the total.
pub async fn list_all<C>(session: &Session<'_, C>, sender: Option<&Address>) -> Result<()>
where
    C: ContractClient + ?Sized,
{
    let count = fetch_count(session, sender).await?;
    println!("{} {}", "Redeem N.:".bold(), count);

    for index in 1..=count {
        let outputs = session
            .contract
            .call("getSingleRedeemReq", &[ArgValue::from(index)], sender)
            .await
            .with_context(|| format!("Failed to query request {}", index))?;
        println!("  {}", format_outputs(&outputs));
    }

    let total = session
        .contract
        .call_first("getTotReqs", &[], sender)
        .await
        .context("Failed to query request total")?;
    println!(
        "{} {}",
        "Redeem Total:".bold(),
        amount_of("getTotReqs", &total)?
    );
    Ok(())
}

pub async fn refill<C>(session: &Session<'_, C>, sender: Address) -> Result<()>
where
    C: ContractClient + ?Sized,
{
    submit(session, "refillReqs", &[], SendOptions::new(sender)).await?;
    Ok(())
}

pub async fn reset_all<C>(session: &Session<'_, C>, sender: Address) -> Result<()>
where
    C: ContractClient + ?Sized,
{
    if submit(session, "resetAllReqs", &[], SendOptions::new(sender))
        .await?
        .is_some()
    {
        println!("Requests reset.");
        summary(session, &sender).await?;
    }
    Ok(())
}

pub async fn reset_single<C>(session: &Session<'_, C>, index: u64, sender: Address) -> Result<()>
where
    C: ContractClient + ?Sized,
{
    let args = [ArgValue::from(index)];
    if submit(session, "resetSingleReq", &args, SendOptions::new(sender))
        .await?
        .is_some()
    {
        println!("Request {} reset.", index);
        summary(session, &sender).await?;
    }
    Ok(())
}

async fn fetch_count<C>(session: &Session<'_, C>, sender: Option<&Address>) -> Result<u64>
where
    C: ContractClient + ?Sized,
{
    let count = session
        .contract
        .call_first("getNumReqs", &[], sender)
        .await
        .context("Failed to query request count")?;
    count_of("getNumReqs", &count)
}

async fn summary<C>(session: &Session<'_, C>, sender: &Address) -> Result<()>
where
    C: ContractClient + ?Sized,
{
    count(session, Some(sender)).await?;
    total(session, Some(sender)).await
}
