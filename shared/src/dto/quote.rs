//! # Swap Quotes
//!
//! The quote backend answers every request with either a trade quote or a
//! structured quote error. The two are a tagged union: consumers must branch
//! on the error tag before touching any trade field.

use serde::{Deserialize, Serialize};

use super::chain::ChainId;

/// Which side of the swap the user is editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwapSide {
    Input,
    Output,
}

/// How the resolved trade executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwapType {
    Normal,
    Crosschain,
    Wrap,
    Unwrap,
}

/// A successful trade quote.
///
/// Amounts are decimal strings in the smallest unit of the respective token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    #[serde(rename = "sellAmount")]
    pub sell_amount: String,
    #[serde(rename = "buyAmount")]
    pub buy_amount: String,
    /// Display amounts may differ from the raw amounts (fees deducted);
    /// wrap/unwrap trades force them equal.
    #[serde(rename = "sellAmountDisplay")]
    pub sell_amount_display: String,
    #[serde(rename = "buyAmountDisplay")]
    pub buy_amount_display: String,
    pub to: String,
    pub from: String,
    /// Native value attached to the transaction, decimal string in wei.
    pub value: String,
    pub data: String,
    #[serde(rename = "swapType")]
    pub swap_type: SwapType,
    #[serde(rename = "chainId")]
    pub chain_id: ChainId,
    /// Protocol fee in sell-token smallest units. Zero for wrap/unwrap.
    pub fee: String,
    /// Estimated bridge completion time in seconds; only meaningful for
    /// crosschain quotes.
    #[serde(rename = "serviceTime", skip_serializing_if = "Option::is_none")]
    pub service_time_secs: Option<u64>,
}

/// A structured error returned by the quote backend.
///
/// This is a valid, successfully fetched result - not a transport failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteError {
    /// Always `true` on the wire; the tag consumers branch on.
    pub error: bool,
    pub error_code: i64,
    pub message: String,
}

/// Tagged union of quote outcomes.
///
/// Deserialization tries the error shape first: its `error` marker field is
/// unambiguous, while a quote requires the full trade field set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuoteResult {
    Err(QuoteError),
    Ok(Box<Quote>),
}

impl QuoteResult {
    pub fn as_quote(&self) -> Option<&Quote> {
        match self {
            QuoteResult::Ok(quote) => Some(quote),
            QuoteResult::Err(_) => None,
        }
    }

    pub fn as_error(&self) -> Option<&QuoteError> {
        match self {
            QuoteResult::Ok(_) => None,
            QuoteResult::Err(err) => Some(err),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, QuoteResult::Err(_))
    }

    /// Estimated crosschain service time, zero for same-chain trades.
    pub fn service_time_secs(&self) -> u64 {
        self.as_quote().and_then(|q| q.service_time_secs).unwrap_or(0)
    }
}

/// A prepared transaction request, the identity the L1 security fee and
/// gas-limit simulation are keyed by.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TxRequest {
    pub to: String,
    pub from: String,
    pub value: String,
    pub data: String,
    #[serde(rename = "chainId")]
    pub chain_id: ChainId,
}

impl TxRequest {
    /// Build the request for a quote's swap transaction. `None` for quote
    /// errors, which carry nothing to simulate.
    pub fn from_quote(result: &QuoteResult) -> Option<TxRequest> {
        let quote = result.as_quote()?;
        Some(TxRequest {
            to: quote.to.clone(),
            from: quote.from.clone(),
            value: quote.value.clone(),
            data: quote.data.clone(),
            chain_id: quote.chain_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_error_deserializes_as_err_variant() {
        let json = r#"{"error": true, "error_code": 502, "message": "no routes found"}"#;
        let result: QuoteResult = serde_json::from_str(json).unwrap();
        assert!(result.is_error());
        assert_eq!(result.as_error().unwrap().error_code, 502);
        assert!(TxRequest::from_quote(&result).is_none());
    }

    #[test]
    fn test_quote_deserializes_as_ok_variant() {
        let json = r#"{
            "sellAmount": "1000000000000000000",
            "buyAmount": "3195000000",
            "sellAmountDisplay": "1000000000000000000",
            "buyAmountDisplay": "3195000000",
            "to": "0x1111111111111111111111111111111111111111",
            "from": "0x2222222222222222222222222222222222222222",
            "value": "1000000000000000000",
            "data": "0xabcdef",
            "swapType": "normal",
            "chainId": 1,
            "fee": "5000000000000000"
        }"#;
        let result: QuoteResult = serde_json::from_str(json).unwrap();
        let quote = result.as_quote().expect("should be a quote");
        assert_eq!(quote.chain_id, ChainId::MAINNET);
        assert_eq!(quote.swap_type, SwapType::Normal);
        assert_eq!(result.service_time_secs(), 0);
    }
}
