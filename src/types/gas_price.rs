//! Gas price with fixed-point decimal precision

use crate::constants::{GAS_PRICE_DECIMALS, GAS_PRICE_SCALE};
use cosmrs::{Coin, Denom};
use eyre::{ensure, eyre, Context, Report, Result};
use std::fmt;
use std::str::FromStr;

/// Price of one gas unit, e.g. `0.025uatom`
///
/// The amount is stored as an integer number of 10^-18 units, so every price with up
/// to 18 fractional digits is represented exactly and fee computation never goes
/// through floating point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GasPrice {
    denom: Denom,
    atomics: u128,
}

impl GasPrice {
    /// Create a gas price from a decimal amount string and a denomination
    pub fn new(amount: &str, denom: &str) -> Result<Self> {
        let atomics = parse_decimal(amount)?;
        let denom: Denom = denom
            .parse()
            .wrap_err_with(|| format!("Invalid gas price denom: {denom}"))?;
        Ok(Self { denom, atomics })
    }

    /// Denomination fees are paid in
    pub fn denom(&self) -> &Denom {
        &self.denom
    }

    /// Price scaled by 10^18
    pub fn atomics(&self) -> u128 {
        self.atomics
    }

    /// Fees to pay for `gas` units: `ceil(gas * price)` in this denomination
    ///
    /// A zero amount yields an empty coin list.
    pub fn fees(&self, gas: u64) -> Result<Vec<Coin>> {
        let gas = u128::from(gas);
        let whole = self.atomics / GAS_PRICE_SCALE;
        let fraction = self.atomics % GAS_PRICE_SCALE;

        // gas < 2^64 and fraction < 2^60, so the fractional product cannot overflow
        let whole_part = gas
            .checked_mul(whole)
            .ok_or_else(|| eyre!("Fee overflow: {gas} gas at {self}"))?;
        let fraction_part = (gas * fraction).div_ceil(GAS_PRICE_SCALE);
        let amount = whole_part
            .checked_add(fraction_part)
            .ok_or_else(|| eyre!("Fee overflow: {gas} gas at {self}"))?;

        if amount == 0 {
            return Ok(Vec::new());
        }

        let coin = Coin::new(amount, self.denom.as_ref()).wrap_err("Failed to build fee coin")?;
        Ok(vec![coin])
    }
}

impl FromStr for GasPrice {
    type Err = Report;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let split = s
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .ok_or_else(|| eyre!("Gas price {s:?} has no denomination"))?;
        let (amount, denom) = s.split_at(split);
        Self::new(amount, denom).wrap_err_with(|| format!("Invalid gas price: {s}"))
    }
}

impl fmt::Display for GasPrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.atomics / GAS_PRICE_SCALE;
        let fraction = self.atomics % GAS_PRICE_SCALE;
        if fraction == 0 {
            return write!(f, "{whole}{}", self.denom);
        }

        let digits = format!("{fraction:018}");
        write!(f, "{whole}.{}{}", digits.trim_end_matches('0'), self.denom)
    }
}

/// Parse a non-negative decimal with at most 18 fractional digits into 10^-18 units
fn parse_decimal(amount: &str) -> Result<u128> {
    let (whole, fraction) = match amount.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (amount, ""),
    };

    ensure!(
        !whole.is_empty() && whole.bytes().all(|b| b.is_ascii_digit()),
        "Invalid decimal amount: {amount:?}"
    );
    ensure!(
        fraction.bytes().all(|b| b.is_ascii_digit()),
        "Invalid decimal amount: {amount:?}"
    );
    ensure!(
        !(amount.contains('.') && fraction.is_empty()),
        "Invalid decimal amount: {amount:?}"
    );
    ensure!(
        fraction.len() <= GAS_PRICE_DECIMALS as usize,
        "Decimal amount {amount} has more than {GAS_PRICE_DECIMALS} fractional digits"
    );

    let whole: u128 = whole
        .parse()
        .wrap_err_with(|| format!("Decimal amount out of range: {amount}"))?;
    let fraction_atomics = if fraction.is_empty() {
        0
    } else {
        let digits: u128 = fraction.parse().wrap_err("Invalid fractional digits")?;
        digits * 10u128.pow(GAS_PRICE_DECIMALS - fraction.len() as u32)
    };

    whole
        .checked_mul(GAS_PRICE_SCALE)
        .and_then(|scaled| scaled.checked_add(fraction_atomics))
        .ok_or_else(|| eyre!("Decimal amount out of range: {amount}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amount_of(coins: &[Coin]) -> u128 {
        assert_eq!(coins.len(), 1);
        coins[0].amount
    }

    #[test]
    fn test_parse_gas_price() {
        let price: GasPrice = "0.025uatom".parse().unwrap();
        assert_eq!(price.denom().as_ref(), "uatom");
        assert_eq!(price.atomics(), 25_000_000_000_000_000);
        assert_eq!(price.to_string(), "0.025uatom");

        let price: GasPrice = " 1ustake ".parse().unwrap();
        assert_eq!(price.atomics(), GAS_PRICE_SCALE);
        assert_eq!(price.to_string(), "1ustake");

        let price: GasPrice = "0.000000000000000001ibc/27394FB092D2ECCD56123C74F36E4C1F926001CEADA9CA97EA622B25F41E5EB2"
            .parse()
            .unwrap();
        assert_eq!(price.atomics(), 1);
    }

    #[test]
    fn test_parse_gas_price_rejects_malformed_input() {
        assert!("0.025".parse::<GasPrice>().is_err());
        assert!("uatom".parse::<GasPrice>().is_err());
        assert!("0.uatom".parse::<GasPrice>().is_err());
        assert!("1.2.3uatom".parse::<GasPrice>().is_err());
        assert!("0.0000000000000000001uatom".parse::<GasPrice>().is_err());
        assert!(GasPrice::new("-1", "uatom").is_err());
    }

    #[test]
    fn test_fees_round_up() {
        let price: GasPrice = "0.025uatom".parse().unwrap();
        assert_eq!(amount_of(&price.fees(120_000).unwrap()), 3000);
        assert_eq!(amount_of(&price.fees(1).unwrap()), 1);
        assert_eq!(amount_of(&price.fees(41).unwrap()), 2);
        assert_eq!(price.fees(1).unwrap()[0].denom.as_ref(), "uatom");
    }

    #[test]
    fn test_fees_zero_is_empty() {
        let price: GasPrice = "0.025uatom".parse().unwrap();
        assert!(price.fees(0).unwrap().is_empty());

        let free: GasPrice = "0uatom".parse().unwrap();
        assert!(free.fees(200_000).unwrap().is_empty());
    }

    #[test]
    fn test_fees_at_maximum_gas() {
        let max_gas = i64::MAX as u64;

        let tiny: GasPrice = "0.000000000000000001uatom".parse().unwrap();
        assert_eq!(amount_of(&tiny.fees(max_gas).unwrap()), 10);

        let price: GasPrice = "1.5uatom".parse().unwrap();
        assert_eq!(
            amount_of(&price.fees(max_gas).unwrap()),
            13_835_058_055_282_163_711
        );
    }

    #[test]
    fn test_fees_overflow_is_an_error() {
        let huge = GasPrice::new("340282366920938463463", "uatom").unwrap();
        assert!(huge.fees(u64::MAX).is_err());
    }
}
