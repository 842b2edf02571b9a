// Test cases for the portfolio history projection.
#[cfg(test)]
mod tests {
    use crate::portfolio::history::history_calculator::calculate_portfolio_history;
    use crate::quotes::PriceMap;
    use crate::transactions::{Transaction, TransactionKind};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::str::FromStr;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::from_str(s).unwrap()
    }

    fn transaction(
        id: &str,
        kind: TransactionKind,
        symbol: &str,
        amount: Decimal,
        price: Option<Decimal>,
        day: &str,
    ) -> Transaction {
        Transaction {
            id: id.to_string(),
            kind,
            asset_symbol: symbol.to_string(),
            amount,
            price_per_unit: price,
            date: date(day),
            notes: None,
        }
    }

    fn deposit(id: &str, symbol: &str, amount: Decimal, price: Decimal, day: &str) -> Transaction {
        transaction(
            id,
            TransactionKind::Deposit {
                funding: None,
                lp: None,
            },
            symbol,
            amount,
            Some(price),
            day,
        )
    }

    fn withdrawal(
        id: &str,
        symbol: &str,
        amount: Decimal,
        price: Option<Decimal>,
        day: &str,
    ) -> Transaction {
        transaction(id, TransactionKind::Withdrawal, symbol, amount, price, day)
    }

    fn interest(id: &str, symbol: &str, amount: Decimal, day: &str) -> Transaction {
        transaction(id, TransactionKind::Interest, symbol, amount, None, day)
    }

    fn prices(entries: &[(&str, Decimal)]) -> PriceMap {
        entries.iter().map(|(s, p)| (*s, *p)).collect()
    }

    #[test]
    fn empty_log_returns_empty_series() {
        let history =
            calculate_portfolio_history(&[], &PriceMap::new(), date("2023-06-01"));
        assert!(history.invested.is_empty());
        assert!(history.earnings.is_empty());
    }

    #[test]
    fn series_extend_to_today() {
        let transactions = vec![deposit("t1", "ETH", dec!(10), dec!(100), "2023-01-01")];
        let history =
            calculate_portfolio_history(&transactions, &PriceMap::new(), date("2023-01-05"));

        let dates: Vec<NaiveDate> = history.invested.iter().map(|p| p.date).collect();
        assert_eq!(dates, vec![date("2023-01-01"), date("2023-01-05")]);
        assert_eq!(history.invested[0].value, dec!(1000));
        assert_eq!(history.invested[1].value, dec!(1000));
        assert_eq!(history.earnings[1].value, Decimal::ZERO);
    }

    #[test]
    fn no_duplicate_point_when_the_last_transaction_is_today() {
        let today = date("2023-01-02");
        let transactions = vec![
            deposit("t1", "ETH", dec!(1), dec!(100), "2023-01-01"),
            deposit("t2", "ETH", dec!(1), dec!(100), "2023-01-02"),
        ];
        let history = calculate_portfolio_history(&transactions, &PriceMap::new(), today);

        assert_eq!(history.invested.len(), 2);
        assert_eq!(history.invested.last().map(|p| p.date), Some(today));
    }

    #[test]
    fn invested_books_withdrawals_at_their_recorded_price() {
        // Capital committed, not cost basis: the withdrawal subtracts at its
        // own price even though the average cost was 100.
        let transactions = vec![
            deposit("t1", "ETH", dec!(10), dec!(100), "2023-01-01"),
            withdrawal("t2", "ETH", dec!(5), Some(dec!(200)), "2023-01-02"),
        ];
        let history =
            calculate_portfolio_history(&transactions, &PriceMap::new(), date("2023-01-02"));

        let values: Vec<Decimal> = history.invested.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![dec!(1000), dec!(0)]);
    }

    #[test]
    fn unpriced_withdrawal_subtracts_nothing() {
        let transactions = vec![
            deposit("t1", "ETH", dec!(10), dec!(100), "2023-01-01"),
            withdrawal("t2", "ETH", dec!(5), None, "2023-01-02"),
        ];
        let history =
            calculate_portfolio_history(&transactions, &PriceMap::new(), date("2023-01-02"));

        assert_eq!(history.invested.last().map(|p| p.value), Some(dec!(1000)));
    }

    #[test]
    fn earnings_revalue_accrued_quantities_at_todays_price() {
        let transactions = vec![
            interest("t1", "ETH", dec!(1), "2023-01-01"),
            interest("t2", "ETH", dec!(1), "2023-01-08"),
        ];
        let history = calculate_portfolio_history(
            &transactions,
            &prices(&[("ETH", dec!(100))]),
            date("2023-01-15"),
        );

        let values: Vec<Decimal> = history.earnings.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![dec!(100), dec!(200), dec!(200)]);

        // Interest never counts as invested capital.
        assert!(history.invested.iter().all(|p| p.value.is_zero()));
    }

    #[test]
    fn earnings_sum_across_symbols() {
        let transactions = vec![
            interest("t1", "ETH", dec!(2), "2023-01-01"),
            interest("t2", "ATOM", dec!(10), "2023-01-01"),
        ];
        let history = calculate_portfolio_history(
            &transactions,
            &prices(&[("ETH", dec!(100)), ("ATOM", dec!(7))]),
            date("2023-01-01"),
        );

        assert_eq!(history.earnings[0].value, dec!(270));
    }

    #[test]
    fn transfers_affect_neither_series() {
        let transactions = vec![
            deposit("t1", "ETH", dec!(1), dec!(100), "2023-01-01"),
            transaction(
                "t2",
                TransactionKind::Transfer,
                "ETH",
                dec!(1),
                Some(dec!(500)),
                "2023-01-02",
            ),
        ];
        let history =
            calculate_portfolio_history(&transactions, &PriceMap::new(), date("2023-01-02"));

        let values: Vec<Decimal> = history.invested.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![dec!(100), dec!(100)]);
        assert!(history.earnings.iter().all(|p| p.value.is_zero()));
    }

    #[test]
    fn same_date_transactions_collapse_into_one_point() {
        let transactions = vec![
            deposit("t1", "ETH", dec!(1), dec!(100), "2023-01-01"),
            deposit("t2", "BTC", dec!(1), dec!(200), "2023-01-01"),
        ];
        let history =
            calculate_portfolio_history(&transactions, &PriceMap::new(), date("2023-01-01"));

        assert_eq!(history.invested.len(), 1);
        assert_eq!(history.invested[0].value, dec!(300));
    }

    #[test]
    fn dates_are_strictly_ascending_and_end_today() {
        let today = date("2023-03-01");
        let transactions = vec![
            deposit("t3", "ETH", dec!(1), dec!(100), "2023-02-01"),
            deposit("t1", "ETH", dec!(1), dec!(100), "2023-01-01"),
            interest("t2", "ETH", dec!(1), "2023-01-15"),
            deposit("t4", "ETH", dec!(1), dec!(100), "2023-01-01"),
        ];
        let history = calculate_portfolio_history(&transactions, &PriceMap::new(), today);

        let dates: Vec<NaiveDate> = history.invested.iter().map(|p| p.date).collect();
        assert!(dates.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(dates.last(), Some(&today));
        let earnings_dates: Vec<NaiveDate> = history.earnings.iter().map(|p| p.date).collect();
        assert_eq!(dates, earnings_dates);
    }
}
