//! Tests for the paper trading ledger types
//!
//! Covers:
//! - Enum serialization used by the API and storage layers
//! - Instrument identity (position keys, quote symbols)
//! - Order lifecycle predicates
//! - Position P&L arithmetic
//! - Trade net value per side
//! - Account day P&L rollover

use chrono::NaiveDate;
use folio::types::*;
use rust_decimal_macros::dec;

fn expiry() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, 16).unwrap()
}

// =============================================================================
// Enum Tests
// =============================================================================

mod enum_tests {
    use super::*;

    #[test]
    fn test_order_type_serialization() {
        assert_eq!(serde_json::to_string(&OrderType::Market).unwrap(), "\"market\"");
        assert_eq!(serde_json::to_string(&OrderType::Limit).unwrap(), "\"limit\"");
        assert_eq!(
            serde_json::to_string(&OrderType::StopLoss).unwrap(),
            "\"stop_loss\""
        );
        assert_eq!(
            serde_json::to_string(&OrderType::StopLossMarket).unwrap(),
            "\"stop_loss_market\""
        );
    }

    #[test]
    fn test_order_status_serialization() {
        assert_eq!(serde_json::to_string(&OrderStatus::Pending).unwrap(), "\"pending\"");
        assert_eq!(
            serde_json::to_string(&OrderStatus::Executed).unwrap(),
            "\"executed\""
        );
        assert_eq!(
            serde_json::to_string(&OrderStatus::Rejected).unwrap(),
            "\"rejected\""
        );
        assert_eq!(
            serde_json::to_string(&OrderStatus::Cancelled).unwrap(),
            "\"cancelled\""
        );
    }

    #[test]
    fn test_status_display_matches_storage_encoding() {
        assert_eq!(OrderStatus::Pending.to_string(), "pending");
        assert_eq!(PositionStatus::Open.to_string(), "open");
        assert_eq!(PositionStatus::Closed.to_string(), "closed");
        assert_eq!(OrderSide::Buy.to_string(), "buy");
        assert_eq!(OrderSide::Sell.to_string(), "sell");
    }
}

// =============================================================================
// Instrument Tests
// =============================================================================

mod instrument_tests {
    use super::*;

    #[test]
    fn test_equity_position_key() {
        let instrument = Instrument::Equity {
            symbol: "AAPL".to_string(),
        };
        assert_eq!(instrument.position_key(), "equity:AAPL");
        assert_eq!(instrument.quote_symbol(), "AAPL");
        assert_eq!(instrument.kind(), InstrumentKind::Equity);
    }

    #[test]
    fn test_option_position_key_includes_contract_identity() {
        let call = Instrument::Option {
            symbol: "AAPL".to_string(),
            option_type: OptionType::Call,
            strike: dec!(150),
            expiry: expiry(),
        };
        let put = Instrument::Option {
            symbol: "AAPL".to_string(),
            option_type: OptionType::Put,
            strike: dec!(150),
            expiry: expiry(),
        };

        assert_eq!(call.position_key(), "option:AAPL:call:150:2026-01-16");
        assert_ne!(call.position_key(), put.position_key());
    }

    #[test]
    fn test_option_quote_symbol_is_occ_style() {
        let call = Instrument::Option {
            symbol: "AAPL".to_string(),
            option_type: OptionType::Call,
            strike: dec!(150),
            expiry: expiry(),
        };
        assert_eq!(call.quote_symbol(), "AAPL260116C00150000");
    }

    #[test]
    fn test_instrument_serde_round_trip() {
        let instrument = Instrument::Option {
            symbol: "NIFTY".to_string(),
            option_type: OptionType::Put,
            strike: dec!(22500),
            expiry: expiry(),
        };

        let json = serde_json::to_string(&instrument).unwrap();
        assert!(json.contains("\"kind\":\"option\""));

        let parsed: Instrument = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, instrument);
    }
}

// =============================================================================
// Order Tests
// =============================================================================

mod order_tests {
    use super::*;

    fn equity(symbol: &str) -> Instrument {
        Instrument::Equity {
            symbol: symbol.to_string(),
        }
    }

    #[test]
    fn test_market_order_creation() {
        let order = Order::market("acct-1".to_string(), equity("AAPL"), OrderSide::Buy, 10);

        assert!(!order.id.is_empty());
        assert_eq!(order.account_id, "acct-1");
        assert_eq!(order.order_type, OrderType::Market);
        assert_eq!(order.quantity, 10);
        assert_eq!(order.filled_quantity, 0);
        assert_eq!(order.status, OrderStatus::Pending);
        assert!(order.avg_filled_price.is_none());
    }

    #[test]
    fn test_limit_order_creation() {
        let order = Order::limit(
            "acct-1".to_string(),
            equity("AAPL"),
            OrderSide::Sell,
            5,
            dec!(210.50),
        );

        assert_eq!(order.order_type, OrderType::Limit);
        assert_eq!(order.price, Some(dec!(210.50)));
        assert_eq!(order.status, OrderStatus::Pending);
    }

    #[test]
    fn test_order_lifecycle_predicates() {
        let mut order = Order::market("acct-1".to_string(), equity("AAPL"), OrderSide::Buy, 10);
        assert!(!order.is_terminal());
        assert!(order.can_cancel());

        order.mark_executed(dec!(100));
        assert!(order.is_terminal());
        assert!(!order.can_cancel());
        assert_eq!(order.filled_quantity, 10);
        assert_eq!(order.avg_filled_price, Some(dec!(100)));
    }

    #[test]
    fn test_rejected_order_records_reason() {
        let mut order = Order::market("acct-1".to_string(), equity("AAPL"), OrderSide::Sell, 10);
        order.mark_rejected("no open position");

        assert_eq!(order.status, OrderStatus::Rejected);
        assert_eq!(order.rejection_reason.as_deref(), Some("no open position"));
        assert!(order.is_terminal());
    }
}

// =============================================================================
// Position Tests
// =============================================================================

mod position_tests {
    use super::*;

    #[test]
    fn test_new_position_from_first_fill() {
        let position = Position::new(
            "acct-1".to_string(),
            Instrument::Equity {
                symbol: "TCS".to_string(),
            },
            10,
            dec!(100),
        );

        assert_eq!(position.quantity, 10);
        assert_eq!(position.avg_price, dec!(100));
        assert_eq!(position.current_price, dec!(100));
        assert_eq!(position.pnl, dec!(0));
        assert_eq!(position.status, PositionStatus::Open);
    }

    #[test]
    fn test_price_update_recomputes_unrealized_pnl() {
        let mut position = Position::new(
            "acct-1".to_string(),
            Instrument::Equity {
                symbol: "TCS".to_string(),
            },
            10,
            dec!(100),
        );

        position.update_price(dec!(110));
        assert_eq!(position.current_price, dec!(110));
        assert_eq!(position.pnl, dec!(100));
        assert_eq!(position.pnl_percent, dec!(10));

        position.update_price(dec!(95));
        assert_eq!(position.pnl, dec!(-50));
        assert_eq!(position.pnl_percent, dec!(-5));
    }

    #[test]
    fn test_notional_and_cost_basis() {
        let mut position = Position::new(
            "acct-1".to_string(),
            Instrument::Equity {
                symbol: "TCS".to_string(),
            },
            10,
            dec!(100),
        );
        position.update_price(dec!(120));

        assert_eq!(position.cost_basis(), dec!(1000));
        assert_eq!(position.notional_value(), dec!(1200));
    }
}

// =============================================================================
// Trade Tests
// =============================================================================

mod trade_tests {
    use super::*;

    fn equity_order(side: OrderSide) -> Order {
        Order::market(
            "acct-1".to_string(),
            Instrument::Equity {
                symbol: "INFY".to_string(),
            },
            side,
            10,
        )
    }

    #[test]
    fn test_buy_net_value_adds_brokerage() {
        let order = equity_order(OrderSide::Buy);
        let trade = Trade::new(&order, 10, dec!(100), dec!(0.3));

        assert_eq!(trade.trade_value, dec!(1000));
        assert_eq!(trade.net_value, dec!(1000.3));
        assert_eq!(trade.order_id, order.id);
    }

    #[test]
    fn test_sell_net_value_subtracts_brokerage() {
        let order = equity_order(OrderSide::Sell);
        let trade = Trade::new(&order, 10, dec!(110), dec!(0.33));

        assert_eq!(trade.trade_value, dec!(1100));
        assert_eq!(trade.net_value, dec!(1099.67));
    }
}

// =============================================================================
// Account Tests
// =============================================================================

mod account_tests {
    use super::*;

    #[test]
    fn test_new_account_has_clean_slate() {
        let account = Account::new("acct-1".to_string(), dec!(1000000));

        assert_eq!(account.balance, dec!(1000000));
        assert_eq!(account.invested_amount, dec!(0));
        assert_eq!(account.total_pnl, dec!(0));
        assert_eq!(account.day_pnl, dec!(0));
    }

    #[test]
    fn test_realized_pnl_accrues_to_total_and_day() {
        let mut account = Account::new("acct-1".to_string(), dec!(1000000));

        account.record_realized(dec!(100));
        account.record_realized(dec!(-40));

        assert_eq!(account.total_pnl, dec!(60));
        assert_eq!(account.day_pnl, dec!(60));
    }

    #[test]
    fn test_day_rollover_resets_day_pnl_only() {
        let mut account = Account::new("acct-1".to_string(), dec!(1000000));
        account.record_realized(dec!(250));

        let next_day = account.day_anchor.succ_opt().unwrap();
        account.roll_day(next_day);

        assert_eq!(account.day_pnl, dec!(0));
        assert_eq!(account.total_pnl, dec!(250));
        assert_eq!(account.day_anchor, next_day);

        // Same-day roll is a no-op
        account.record_realized(dec!(10));
        account.roll_day(next_day);
        assert_eq!(account.day_pnl, dec!(10));
    }
}
