//! Token purchase, balances and transfers.

use super::tx::submit;
use super::{amount_of, Session};
use anyhow::{Context, Result};
use colored::Colorize;
use pqm_core::{Address, Amount, ArgValue};
use pqm_rpc::{ContractClient, SendOptions};

pub async fn buy<C>(
    session: &Session<'_, C>,
    beneficiary: ArgValue,
    amount: Amount,
    sender: Address,
) -> Result<()>
where
    C: ContractClient + ?Sized,
{
    println!("{}", "Buying tokens...".bold().cyan());
    println!("  Beneficiary: {}", beneficiary.as_str().bright_yellow());
    println!("  Amount:      {} QTUM", amount.to_string().bright_cyan());
    println!();

    let options = SendOptions::new(sender).with_value(amount);
    submit(session, "buyTokens", &[beneficiary], options).await?;
    Ok(())
}

pub async fn balance_of<C>(session: &Session<'_, C>, holder: ArgValue) -> Result<()>
where
    C: ContractClient + ?Sized,
{
    let balance = session
        .contract
        .call_first("balanceOf", &[holder], None)
        .await
        .context("Failed to query balance")?;
    println!("{}", amount_of("balanceOf", &balance)?);
    Ok(())
}

pub async fn mint<C>(session: &Session<'_, C>, amount: Amount, sender: Address) -> Result<()>
where
    C: ContractClient + ?Sized,
{
    let args = [ArgValue::from(amount.base_units())];
    submit(session, "mintReservedTokens", &args, SendOptions::new(sender)).await?;
    Ok(())
}

/// Queue a redeem request for `amount` tokens.
pub async fn send_back<C>(session: &Session<'_, C>, sender: Address, amount: Amount) -> Result<()>
where
    C: ContractClient + ?Sized,
{
    let args = [ArgValue::from(amount.base_units())];
    submit(session, "reqRedeemEntry", &args, SendOptions::new(sender)).await?;
    Ok(())
}

pub async fn transfer<C>(
    session: &Session<'_, C>,
    sender: Address,
    to: ArgValue,
    amount: Amount,
) -> Result<()>
where
    C: ContractClient + ?Sized,
{
    println!("{}", "Transferring tokens...".bold().cyan());
    println!("  From:   {}", sender.to_base58().bright_yellow());
    println!("  To:     {}", to.as_str().bright_yellow());
    println!("  Amount: {}", amount.to_string().bright_cyan());
    println!();

    let args = [to, ArgValue::from(amount.base_units())];
    submit(session, "transfer", &args, SendOptions::new(sender)).await?;
    Ok(())
}

/// Balance of the calling address as the contract sees it.
pub async fn token_balance<C>(session: &Session<'_, C>, sender: &Address) -> Result<()>
where
    C: ContractClient + ?Sized,
{
    let balance = session
        .contract
        .call_first("findBalance", &[], Some(sender))
        .await
        .context("Failed to query token balance")?;
    println!(
        "Token balance of {} is {}",
        sender.to_base58().bright_yellow(),
        amount_of("findBalance", &balance)?
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::testing::{session, RecordingClient};
    use super::*;
    use pqm_core::{Token, U256};

    fn sender() -> Address {
        "qZD6MiUWPtSsQSn69tyvCV1YcE1SVvkVH3".parse().unwrap()
    }

    #[tokio::test]
    async fn test_buy_attaches_value() {
        let client = RecordingClient::new();
        let beneficiary = ArgValue::new("11".repeat(32)).unwrap();
        let amount = Amount::parse_decimal("2.5").unwrap();

        buy(&session(&client), beneficiary.clone(), amount, sender())
            .await
            .unwrap();

        let calls = client.calls();
        assert_eq!(calls[0].label(), "send buyTokens");
        assert_eq!(calls[0].args, vec![beneficiary]);
        assert_eq!(calls[0].value, amount);
        assert_eq!(calls[0].sender, Some(sender()));
    }

    #[tokio::test]
    async fn test_transfer_arguments() {
        let client = RecordingClient::new();
        let to = ArgValue::new("qHfQ5uKcbWvJ4dhyfy1Vh4RRtETb2AA14v").unwrap();

        transfer(&session(&client), sender(), to.clone(), Amount::from_base_units(42))
            .await
            .unwrap();

        let call = &client.calls()[0];
        assert_eq!(call.method, "transfer");
        assert_eq!(call.args, vec![to, ArgValue::from(42u64)]);
        assert_eq!(call.value, Amount::ZERO);
    }

    #[tokio::test]
    async fn test_token_balance_uses_sender() {
        let client = RecordingClient::new()
            .with_response("findBalance", vec![Token::Uint(U256::from(150_000_000u64))]);

        token_balance(&session(&client), &sender()).await.unwrap();

        let call = &client.calls()[0];
        assert_eq!(call.label(), "call findBalance");
        assert_eq!(call.sender, Some(sender()));
    }

    #[tokio::test]
    async fn test_balance_of_rejects_non_integer() {
        let client = RecordingClient::new()
            .with_response("balanceOf", vec![Token::String("oops".into())]);
        let holder = ArgValue::new("qHfQ5uKcbWvJ4dhyfy1Vh4RRtETb2AA14v").unwrap();

        assert!(balance_of(&session(&client), holder).await.is_err());
    }
}
