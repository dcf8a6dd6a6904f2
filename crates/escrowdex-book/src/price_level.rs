//! Aggregated depth view of one side of the book.
//!
//! The book itself keeps one entry per order; a [`PriceLevel`] folds the
//! consecutive orders sharing a price into a single row for depth queries.

use rust_decimal::Decimal;

/// All resting orders at one price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceLevel {
    pub price: Decimal,
    /// Total remaining quantity across the orders at this price.
    pub quantity: Decimal,
    pub order_count: usize,
}

impl PriceLevel {
    /// Fold `(price, remaining)` pairs, already in priority order, into at
    /// most `max_levels` levels.
    pub fn aggregate<I>(entries: I, max_levels: usize) -> Vec<PriceLevel>
    where
        I: IntoIterator<Item = (Decimal, Decimal)>,
    {
        let mut levels: Vec<PriceLevel> = Vec::new();
        for (price, qty) in entries {
            match levels.last_mut() {
                Some(level) if level.price == price => {
                    level.quantity += qty;
                    level.order_count += 1;
                }
                _ => {
                    if levels.len() == max_levels {
                        break;
                    }
                    levels.push(PriceLevel {
                        price,
                        quantity: qty,
                        order_count: 1,
                    });
                }
            }
        }
        levels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(n: i64) -> Decimal {
        Decimal::new(n, 0)
    }

    #[test]
    fn groups_consecutive_prices() {
        let levels = PriceLevel::aggregate(
            vec![(dec(2), dec(5)), (dec(2), dec(3)), (dec(4), dec(1))],
            10,
        );
        assert_eq!(levels.len(), 2);
        assert_eq!(levels[0].price, dec(2));
        assert_eq!(levels[0].quantity, dec(8));
        assert_eq!(levels[0].order_count, 2);
        assert_eq!(levels[1].quantity, dec(1));
    }

    #[test]
    fn respects_level_limit() {
        let levels = PriceLevel::aggregate(
            vec![(dec(1), dec(1)), (dec(2), dec(1)), (dec(3), dec(1))],
            2,
        );
        assert_eq!(levels.len(), 2);
        assert_eq!(levels[1].price, dec(2));
    }

    #[test]
    fn empty_input() {
        assert!(PriceLevel::aggregate(Vec::new(), 5).is_empty());
    }
}
