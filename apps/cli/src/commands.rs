//! Command-line front end over the calculator and the saved entries.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};

use borsa_go_core::calculator::{
    calculate, CalculationInput, CalculationResult, FeeBreakdown, FeeItem, MarketValueSource,
};
use borsa_go_core::entries::{format_amount, NewEntry, SavedEntry};

use crate::config::Config;
use crate::main_lib::AppState;

/// Stock trade profit/loss calculator
#[derive(Debug, Parser)]
#[command(name = "borsa-go", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Calculate profit without saving
    Calculate(TradeArgs),
    /// Calculate and save to the history
    Save(SaveArgs),
    /// List saved calculations, newest first
    List,
    /// Delete a saved calculation
    Delete {
        /// Id of the entry to delete
        id: String,
    },
    /// Export saved calculations as CSV
    Export {
        /// Output file (defaults to BORSA_GO_EXPORT_PATH)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Args)]
pub struct TradeArgs {
    /// Purchase value (cost basis)
    #[arg(long)]
    pub purchase: Option<f64>,

    /// Market value
    #[arg(long, conflicts_with_all = ["shares", "price"])]
    pub market: Option<f64>,

    /// Number of shares, used with --price instead of --market
    #[arg(long, requires = "price")]
    pub shares: Option<f64>,

    /// Share price, used with --shares instead of --market
    #[arg(long, requires = "shares")]
    pub price: Option<f64>,

    /// Total fees
    #[arg(long, conflicts_with = "fee")]
    pub fees: Option<f64>,

    /// Individual fee as NAME=AMOUNT (repeatable)
    #[arg(long = "fee", value_parser = parse_fee_item)]
    pub fee: Vec<FeeItem>,

    /// Third-party fee
    #[arg(long)]
    pub third_party_fee: Option<f64>,

    /// Purifying percentage (0-100)
    #[arg(long)]
    pub purifying: Option<f64>,
}

#[derive(Debug, Clone, Args)]
pub struct SaveArgs {
    /// Stock name
    #[arg(long, default_value = "")]
    pub name: String,

    /// Id of an existing entry to overwrite
    #[arg(long)]
    pub id: Option<String>,

    #[command(flatten)]
    pub trade: TradeArgs,
}

/// Parses `NAME=AMOUNT`. An unreadable amount is kept as a blank fee.
fn parse_fee_item(raw: &str) -> std::result::Result<FeeItem, String> {
    let (name, amount) = raw.split_once('=').unwrap_or((raw, ""));
    Ok(FeeItem {
        name: name.trim().to_string(),
        amount: amount.trim().parse::<f64>().ok(),
    })
}

impl TradeArgs {
    pub fn market_value_source(&self) -> MarketValueSource {
        match (self.market, self.shares, self.price) {
            (Some(market_value), _, _) => MarketValueSource::Direct { market_value },
            (None, Some(number_of_shares), Some(share_price)) => MarketValueSource::Shares {
                number_of_shares,
                share_price,
            },
            _ => MarketValueSource::Direct {
                market_value: f64::NAN,
            },
        }
    }

    pub fn fee_breakdown(&self) -> FeeBreakdown {
        if self.fee.is_empty() {
            FeeBreakdown::Total { amount: self.fees }
        } else {
            FeeBreakdown::Itemized {
                items: self.fee.clone(),
            }
        }
    }

    pub fn to_input(&self) -> CalculationInput {
        CalculationInput {
            purchase_value: self.purchase.unwrap_or(f64::NAN),
            market_value: self.market_value_source().resolve(),
            app_fees: Some(self.fee_breakdown().total()),
            third_party_fee: self.third_party_fee,
            purifying_percentage: self.purifying,
        }
    }
}

fn compute(trade: &TradeArgs) -> Result<(CalculationInput, CalculationResult)> {
    let input = trade.to_input();
    match calculate(&input) {
        Ok(result) => Ok((input, result)),
        Err(e) => bail!("No result: {}", e),
    }
}

fn write_result(out: &mut impl Write, result: &CalculationResult) -> Result<()> {
    writeln!(out, "Gross profit:     {}", format_amount(result.profit))?;
    writeln!(out, "Net profit:       {}", format_amount(result.net_profit))?;
    writeln!(out, "Purifying amount: {}", format_amount(result.purifying_amount))?;
    writeln!(out, "Final profit:     {}", format_amount(result.final_profit))?;
    Ok(())
}

fn write_entry(out: &mut impl Write, entry: &SavedEntry) -> Result<()> {
    writeln!(
        out,
        "{}  {}  {}  purchase={} market={} fees={} final={}",
        entry.id,
        entry.saved_at.to_rfc3339(),
        entry.stock_name,
        format_amount(entry.purchase_value),
        format_amount(entry.market_value),
        format_amount(entry.total_fees()),
        format_amount(entry.final_profit),
    )?;
    Ok(())
}

pub async fn run(cli: Cli, state: &AppState, config: &Config, out: &mut impl Write) -> Result<()> {
    let service = &state.entry_service;

    match cli.command {
        Command::Calculate(trade) => {
            let (_, result) = compute(&trade)?;
            write_result(out, &result)?;
        }
        Command::Save(args) => {
            let (input, result) = compute(&args.trade)?;
            let mut new_entry = NewEntry::from_calculation(args.name, &input, &result);
            new_entry.id = args.id;
            let saved = service.save(new_entry).await?;
            tracing::info!("Saved entry {}", saved.id);
            write_result(out, &result)?;
            writeln!(out, "Saved as {}", saved.id)?;
        }
        Command::List => {
            let entries = service.list();
            if entries.is_empty() {
                writeln!(out, "No saved calculations yet.")?;
            }
            for entry in &entries {
                write_entry(out, entry)?;
            }
        }
        Command::Delete { id } => {
            service.delete(&id).await?;
            writeln!(out, "Deleted {}", id)?;
        }
        Command::Export { output } => match service.export_csv()? {
            Some(csv) => {
                let path = output.unwrap_or_else(|| config.export_path.clone());
                std::fs::write(&path, csv)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                writeln!(out, "Exported to {}", path.display())?;
            }
            None => writeln!(out, "No saved calculations to export.")?,
        },
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("borsa-go").chain(args.iter().copied())).unwrap()
    }

    fn trade(cli: Cli) -> TradeArgs {
        match cli.command {
            Command::Calculate(trade) => trade,
            Command::Save(args) => args.trade,
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_direct_market_value() {
        let trade = trade(parse(&["calculate", "--purchase", "100", "--market", "150.9996"]));

        let input = trade.to_input();

        assert_eq!(input.market_value, 150.9996);
        assert_eq!(input.app_fees, Some(0.0));
    }

    #[test]
    fn test_market_value_from_shares() {
        let trade = trade(parse(&[
            "calculate",
            "--purchase",
            "100",
            "--shares",
            "10",
            "--price",
            "12.5",
        ]));

        assert_eq!(trade.to_input().market_value, 125.0);
    }

    #[test]
    fn test_market_and_shares_conflict() {
        let result = Cli::try_parse_from([
            "borsa-go",
            "calculate",
            "--purchase",
            "1",
            "--market",
            "2",
            "--shares",
            "3",
            "--price",
            "4",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_itemized_fees_are_summed() {
        let trade = trade(parse(&[
            "save",
            "--name",
            "ACME",
            "--purchase",
            "100",
            "--market",
            "110",
            "--fee",
            "commission=2.5",
            "--fee",
            "stamp=abc",
            "--fee",
            "exchange=0.5",
        ]));

        assert_eq!(trade.to_input().app_fees, Some(3.0));
    }

    #[test]
    fn test_missing_market_value_is_not_computable() {
        let trade = trade(parse(&["calculate", "--purchase", "100"]));
        assert!(compute(&trade).is_err());
    }

    #[test]
    fn test_write_result_uses_three_decimals() {
        let trade = trade(parse(&[
            "calculate",
            "--purchase",
            "100",
            "--market",
            "150.9996",
            "--purifying",
            "10",
        ]));
        let (_, result) = compute(&trade).unwrap();
        let mut out = Vec::new();

        write_result(&mut out, &result).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Gross profit:     51.000"));
        assert!(text.contains("Purifying amount: 5.100"));
        assert!(text.contains("Final profit:     45.900"));
    }
}
