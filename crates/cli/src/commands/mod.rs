//! CLI commands module.
//!
//! Every subcommand maps to one or more contract methods. Handlers receive a
//! [`Session`] holding the contract capability, so they can be driven by any
//! [`ContractClient`].

use anyhow::{anyhow, bail, Result};
use clap::Subcommand;
use pqm_core::{format_token, token_to_uint, Address, Amount, ArgValue, Token};
use pqm_rpc::{ContractClient, TrackerConfig};
use tokio_util::sync::CancellationToken;

mod admin;
mod args;
mod info;
mod requests;
mod token;
mod tx;

#[cfg(test)]
pub(crate) mod testing;

use args::{parse_coin_amount, parse_index, parse_sender, parse_token_amount, parse_units};

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show token parameters and the pending redeem requests
    #[command(name = "info")]
    Info {
        #[arg(value_parser = parse_sender)]
        sender: Address,
    },
    /// Buy tokens with QTUM
    #[command(name = "buy")]
    Buy {
        /// Beneficiary (bytes32 hex)
        beneficiary: ArgValue,
        /// QTUM to spend
        #[arg(value_parser = parse_coin_amount)]
        amount: Amount,
        /// Paying address
        #[arg(value_parser = parse_sender)]
        sender: Address,
    },
    /// Token balance of a holder
    #[command(name = "balanceOf")]
    BalanceOf { holder: ArgValue },
    /// Mint reserved tokens (owner only)
    #[command(name = "mint")]
    Mint {
        /// Base units
        #[arg(value_parser = parse_token_amount)]
        amount: Amount,
        #[arg(value_parser = parse_sender)]
        sender: Address,
    },
    /// Request a redeem of tokens
    #[command(name = "sendBack")]
    SendBack {
        #[arg(value_parser = parse_sender)]
        sender: Address,
        /// Base units
        #[arg(value_parser = parse_token_amount)]
        amount: Amount,
    },
    /// Transfer tokens between holders
    #[command(name = "transferTokens")]
    TransferTokens {
        #[arg(value_parser = parse_sender)]
        sender: Address,
        to: ArgValue,
        /// Base units
        #[arg(value_parser = parse_token_amount)]
        amount: Amount,
    },
    /// Number of pending redeem requests
    #[command(name = "getNumReqs")]
    GetNumReqs {
        #[arg(value_parser = parse_sender)]
        sender: Option<Address>,
    },
    /// Total tokens in pending redeem requests
    #[command(name = "getTotQReqs")]
    GetTotQReqs {
        #[arg(value_parser = parse_sender)]
        sender: Option<Address>,
    },
    /// Show one redeem request
    #[command(name = "getSingleRequest")]
    GetSingleRequest {
        /// Request number, starting at 1
        #[arg(value_parser = parse_index)]
        index: u64,
    },
    /// List every pending redeem request
    #[command(name = "getAllRequests")]
    GetAllRequests {
        #[arg(value_parser = parse_sender)]
        sender: Option<Address>,
    },
    /// Refill redeem requests (owner only)
    #[command(name = "refill")]
    Refill {
        #[arg(value_parser = parse_sender)]
        sender: Address,
    },
    /// Reset every redeem request (owner only)
    #[command(name = "resetOwnerVars")]
    ResetOwnerVars {
        #[arg(value_parser = parse_sender)]
        sender: Address,
    },
    /// Reset one redeem request (owner only)
    #[command(name = "resetOwnerSigleVars")]
    ResetOwnerSigleVars {
        #[arg(value_parser = parse_index)]
        index: u64,
        #[arg(value_parser = parse_sender)]
        sender: Address,
    },
    /// Change the stake wallet (owner only)
    #[command(name = "setStakeWallet")]
    SetStakeWallet {
        wallet: ArgValue,
        #[arg(value_parser = parse_sender)]
        sender: Address,
    },
    /// Set the minimum purchase (owner only)
    #[command(name = "setMinPurch")]
    SetMinPurch {
        /// Base units
        #[arg(value_parser = parse_units)]
        amount: Amount,
        #[arg(value_parser = parse_sender)]
        sender: Address,
    },
    /// Show the minimum purchase
    #[command(name = "minPurch")]
    MinPurch {
        #[arg(value_parser = parse_sender)]
        sender: Option<Address>,
    },
    /// Set the minimum redeem (owner only)
    #[command(name = "setMinRed")]
    SetMinRed {
        /// Base units
        #[arg(value_parser = parse_units)]
        amount: Amount,
        #[arg(value_parser = parse_sender)]
        sender: Address,
    },
    /// Show the minimum redeem
    #[command(name = "minRedeem")]
    MinRedeem {
        #[arg(value_parser = parse_sender)]
        sender: Option<Address>,
    },
    /// Set the maximum number of redeem requests (owner only)
    #[command(name = "setMaxRqs")]
    SetMaxRqs {
        count: u64,
        #[arg(value_parser = parse_sender)]
        sender: Address,
    },
    /// Show the maximum number of redeem requests
    #[command(name = "maxRqs")]
    MaxRqs {
        #[arg(value_parser = parse_sender)]
        sender: Option<Address>,
    },
    /// Token balance of the calling address
    #[command(name = "tokenBalance")]
    TokenBalance {
        #[arg(value_parser = parse_sender)]
        sender: Address,
    },
    /// QTUM held by the contract
    #[command(name = "getQRC20Bal")]
    GetQrc20Bal {
        #[arg(value_parser = parse_sender)]
        sender: Option<Address>,
    },
    /// Withdraw the contract's QTUM (owner only)
    #[command(name = "withdrawQtum")]
    WithdrawQtum {
        #[arg(value_parser = parse_sender)]
        sender: Address,
    },
    /// Send QTUM to the contract
    #[command(name = "sendQtumFrom")]
    SendQtumFrom {
        /// QTUM to send
        #[arg(value_parser = parse_coin_amount)]
        amount: Amount,
        #[arg(value_parser = parse_sender)]
        sender: Address,
    },
    #[command(external_subcommand)]
    Unrecognized(Vec<String>),
}

impl Commands {
    /// Name of an unknown subcommand, if this is one.
    pub fn unrecognized(&self) -> Option<&str> {
        match self {
            Commands::Unrecognized(argv) => Some(argv.first().map(String::as_str).unwrap_or("")),
            _ => None,
        }
    }
}

/// What happened to a dispatched command.
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    Done,
    /// The subcommand is unknown; nothing was sent.
    Unrecognized(String),
}

/// Everything a handler may use.
pub struct Session<'a, C: ContractClient + ?Sized> {
    pub contract: &'a C,
    /// Confirmations required before a transaction counts as done.
    pub confirmations: u64,
    pub tracker: TrackerConfig,
    /// Wait for confirmations after sending.
    pub wait: bool,
    pub cancel: CancellationToken,
}

pub async fn run<C>(command: Commands, session: &Session<'_, C>) -> Result<Outcome>
where
    C: ContractClient + ?Sized,
{
    match command {
        Commands::Info { sender } => info::show(session, &sender).await?,
        Commands::Buy {
            beneficiary,
            amount,
            sender,
        } => token::buy(session, beneficiary, amount, sender).await?,
        Commands::BalanceOf { holder } => token::balance_of(session, holder).await?,
        Commands::Mint { amount, sender } => token::mint(session, amount, sender).await?,
        Commands::SendBack { sender, amount } => token::send_back(session, sender, amount).await?,
        Commands::TransferTokens { sender, to, amount } => {
            token::transfer(session, sender, to, amount).await?
        }
        Commands::TokenBalance { sender } => token::token_balance(session, &sender).await?,
        Commands::GetNumReqs { sender } => requests::count(session, sender.as_ref()).await?,
        Commands::GetTotQReqs { sender } => requests::total(session, sender.as_ref()).await?,
        Commands::GetSingleRequest { index } => requests::single(session, index).await?,
        Commands::GetAllRequests { sender } => {
            requests::list_all(session, sender.as_ref()).await?
        }
        Commands::Refill { sender } => requests::refill(session, sender).await?,
        Commands::ResetOwnerVars { sender } => requests::reset_all(session, sender).await?,
        Commands::ResetOwnerSigleVars { index, sender } => {
            requests::reset_single(session, index, sender).await?
        }
        Commands::SetStakeWallet { wallet, sender } => {
            admin::set_stake_wallet(session, wallet, sender).await?
        }
        Commands::SetMinPurch { amount, sender } => {
            admin::set_min_purchase(session, amount, sender).await?
        }
        Commands::MinPurch { sender } => admin::min_purchase(session, sender.as_ref()).await?,
        Commands::SetMinRed { amount, sender } => {
            admin::set_min_redeem(session, amount, sender).await?
        }
        Commands::MinRedeem { sender } => admin::min_redeem(session, sender.as_ref()).await?,
        Commands::SetMaxRqs { count, sender } => {
            admin::set_max_requests(session, count, sender).await?
        }
        Commands::MaxRqs { sender } => admin::max_requests(session, sender.as_ref()).await?,
        Commands::GetQrc20Bal { sender } => {
            admin::contract_balance(session, sender.as_ref()).await?
        }
        Commands::WithdrawQtum { sender } => admin::withdraw(session, sender).await?,
        Commands::SendQtumFrom { amount, sender } => {
            admin::feed_contract(session, amount, sender).await?
        }
        Commands::Unrecognized(argv) => {
            let name = argv.into_iter().next().unwrap_or_default();
            return Ok(Outcome::Unrecognized(name));
        }
    }
    Ok(Outcome::Done)
}

/// Interpret a result as an 8-decimal amount.
fn amount_of(method: &str, token: &Token) -> Result<Amount> {
    token_to_uint(token)
        .map(Amount::from)
        .ok_or_else(|| anyhow!("{} returned {} instead of an amount", method, format_token(token)))
}

/// Interpret a result as a count.
fn count_of(method: &str, token: &Token) -> Result<u64> {
    let value = token_to_uint(token)
        .ok_or_else(|| anyhow!("{} returned {} instead of a count", method, format_token(token)))?;
    if value.bits() > 64 {
        bail!("{} returned an out of range count: {}", method, value);
    }
    Ok(value.low_u64())
}

/// Render every output of a call on one line.
fn format_outputs(tokens: &[Token]) -> String {
    tokens.iter().map(format_token).collect::<Vec<_>>().join(" ")
}
