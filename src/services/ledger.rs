//! Position fill arithmetic.
//!
//! Pure functions that compute the effect of a fill on a position: new
//! quantity, new average price, realized P&L, and the cost basis released
//! back to the account. No storage concerns here.
//!
//! The contract:
//! - average price is a fill-size-weighted mean, recomputed only on
//!   quantity-increasing fills
//! - reducing fills never touch the average price
//! - a fill that takes quantity to zero closes the position

use crate::services::orders::TradingError;
use crate::types::{OrderSide, PositionStatus};
use rust_decimal::Decimal;

/// Net effect of applying one fill to a position.
#[derive(Debug, Clone, PartialEq)]
pub struct FillEffect {
    /// Quantity after the fill
    pub quantity: i64,
    /// Average price after the fill
    pub avg_price: Decimal,
    /// Position status after the fill
    pub status: PositionStatus,
    /// Realized P&L of the reducing part, zero for buys
    pub realized_pnl: Decimal,
    /// Cost basis released by the reducing part (avg_price × fill qty)
    pub released_cost: Decimal,
}

/// Apply a fill to an existing position state (quantity, average price),
/// or to no position at all.
pub fn apply_fill(
    existing: Option<(i64, Decimal)>,
    side: OrderSide,
    fill_quantity: i64,
    fill_price: Decimal,
) -> Result<FillEffect, TradingError> {
    match (existing, side) {
        (None, OrderSide::Buy) => Ok(FillEffect {
            quantity: fill_quantity,
            avg_price: fill_price,
            status: PositionStatus::Open,
            realized_pnl: Decimal::ZERO,
            released_cost: Decimal::ZERO,
        }),
        (None, OrderSide::Sell) => Err(TradingError::OverSell {
            requested: fill_quantity,
            held: 0,
        }),
        (Some((old_qty, old_avg)), OrderSide::Buy) => {
            let new_qty = old_qty + fill_quantity;
            let total_cost = old_avg * Decimal::from(old_qty)
                + fill_price * Decimal::from(fill_quantity);
            let new_avg = total_cost / Decimal::from(new_qty);

            Ok(FillEffect {
                quantity: new_qty,
                avg_price: new_avg,
                status: PositionStatus::Open,
                realized_pnl: Decimal::ZERO,
                released_cost: Decimal::ZERO,
            })
        }
        (Some((old_qty, old_avg)), OrderSide::Sell) => {
            if fill_quantity > old_qty {
                return Err(TradingError::OverSell {
                    requested: fill_quantity,
                    held: old_qty,
                });
            }

            let new_qty = old_qty - fill_quantity;
            let realized = (fill_price - old_avg) * Decimal::from(fill_quantity);
            let released = old_avg * Decimal::from(fill_quantity);

            Ok(FillEffect {
                quantity: new_qty,
                avg_price: old_avg,
                status: if new_qty == 0 {
                    PositionStatus::Closed
                } else {
                    PositionStatus::Open
                },
                realized_pnl: realized,
                released_cost: released,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(n: i64) -> Decimal {
        Decimal::from(n)
    }

    #[test]
    fn test_first_buy_opens_position() {
        let effect = apply_fill(None, OrderSide::Buy, 10, dec(100)).unwrap();
        assert_eq!(effect.quantity, 10);
        assert_eq!(effect.avg_price, dec(100));
        assert_eq!(effect.status, PositionStatus::Open);
        assert_eq!(effect.realized_pnl, Decimal::ZERO);
    }

    #[test]
    fn test_buy_recomputes_weighted_average() {
        // 10 @ 100 then 30 @ 120: (1000 + 3600) / 40 = 115
        let effect = apply_fill(Some((10, dec(100))), OrderSide::Buy, 30, dec(120)).unwrap();
        assert_eq!(effect.quantity, 40);
        assert_eq!(effect.avg_price, dec(115));
    }

    #[test]
    fn test_sell_keeps_average_price() {
        let effect = apply_fill(Some((10, dec(100))), OrderSide::Sell, 4, dec(110)).unwrap();
        assert_eq!(effect.quantity, 6);
        assert_eq!(effect.avg_price, dec(100));
        assert_eq!(effect.status, PositionStatus::Open);
        // (110 - 100) * 4
        assert_eq!(effect.realized_pnl, dec(40));
        assert_eq!(effect.released_cost, dec(400));
    }

    #[test]
    fn test_full_sell_closes_position() {
        let effect = apply_fill(Some((10, dec(100))), OrderSide::Sell, 10, dec(90)).unwrap();
        assert_eq!(effect.quantity, 0);
        assert_eq!(effect.status, PositionStatus::Closed);
        assert_eq!(effect.realized_pnl, dec(-100));
        assert_eq!(effect.released_cost, dec(1000));
    }

    #[test]
    fn test_oversell_is_rejected() {
        let err = apply_fill(Some((5, dec(100))), OrderSide::Sell, 6, dec(100)).unwrap_err();
        assert!(matches!(err, TradingError::OverSell { requested: 6, held: 5 }));

        let err = apply_fill(None, OrderSide::Sell, 1, dec(100)).unwrap_err();
        assert!(matches!(err, TradingError::OverSell { requested: 1, held: 0 }));
    }

    #[test]
    fn test_weighted_average_order_independence() {
        // Equal-sized fills: any fill order yields the same average.
        let prices = [dec(100), dec(110), dec(95)];
        let permutations: [[usize; 3]; 6] = [
            [0, 1, 2],
            [0, 2, 1],
            [1, 0, 2],
            [1, 2, 0],
            [2, 0, 1],
            [2, 1, 0],
        ];

        let mut results = Vec::new();
        for perm in permutations {
            let mut state: Option<(i64, Decimal)> = None;
            for idx in perm {
                let effect = apply_fill(state, OrderSide::Buy, 10, prices[idx]).unwrap();
                state = Some((effect.quantity, effect.avg_price));
            }
            results.push(state.unwrap());
        }

        for (qty, avg) in &results {
            assert_eq!(*qty, 30);
            assert_eq!(*avg, results[0].1);
        }
    }
}
