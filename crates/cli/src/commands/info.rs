//! Token overview.

use super::{amount_of, requests, Session};
use anyhow::{Context, Result};
use colored::Colorize;
use pqm_core::{format_token, Address};
use pqm_rpc::ContractClient;

pub async fn show<C>(session: &Session<'_, C>, sender: &Address) -> Result<()>
where
    C: ContractClient + ?Sized,
{
    let contract = session.contract;
    let from = Some(sender);

    let read = move |method: &'static str| async move {
        contract
            .call_first(method, &[], from)
            .await
            .with_context(|| format!("Failed to query {}", method))
    };

    let name = read("getName").await?;
    let symbol = read("getSymbol").await?;
    let rate = read("getExchangeRate").await?;
    let supply = read("totalSupply").await?;
    let sold = read("getTokenSold").await?;
    let min_purchase = read("getMinPurchase").await?;
    let min_redeem = read("getMinRedeem").await?;
    let max_requests = read("getMaxReqs").await?;

    println!("{}", "Token Information".bold().cyan());
    println!("  Name:           {}", format_token(&name).bright_yellow());
    println!("  Symbol:         {}", format_token(&symbol).bright_yellow());
    println!("  Exchange rate:  {}", format_token(&rate));
    println!(
        "  Supply:         {}",
        amount_of("totalSupply", &supply)?.to_string().bright_cyan()
    );
    println!("  Sold:           {}", amount_of("getTokenSold", &sold)?);
    println!("  Min purchase:   {}", format_token(&min_purchase));
    println!("  Min redeem:     {}", format_token(&min_redeem));
    println!("  Max requests:   {}", format_token(&max_requests));
    println!();

    requests::list_all(session, from).await
}

#[cfg(test)]
mod tests {
    use super::super::testing::{session, RecordingClient};
    use super::*;
    use pqm_core::{Token, U256};

    #[tokio::test]
    async fn test_info_queries_in_order() {
        let sender: Address = "qZD6MiUWPtSsQSn69tyvCV1YcE1SVvkVH3".parse().unwrap();
        let client = RecordingClient::new()
            .with_response("getName", vec![Token::String("TokenPQM".into())])
            .with_response("getSymbol", vec![Token::String("PQM".into())])
            .with_response("getNumReqs", vec![Token::Uint(U256::zero())]);

        show(&session(&client), &sender).await.unwrap();

        assert_eq!(
            client.methods(),
            vec![
                "getName",
                "getSymbol",
                "getExchangeRate",
                "totalSupply",
                "getTokenSold",
                "getMinPurchase",
                "getMinRedeem",
                "getMaxReqs",
                "getNumReqs",
                "getTotReqs"
            ]
        );
        assert!(client.calls().iter().all(|c| c.sender == Some(sender)));
    }
}
