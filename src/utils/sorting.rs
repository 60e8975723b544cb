use std::cmp::Ordering;
use std::str::FromStr;

use crate::domain::Transaction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Date,
    Amount,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "date" => Ok(SortKey::Date),
            "amount" => Ok(SortKey::Amount),
            other => Err(format!(
                "there is no sort like '{other}'; available sorts: date,amount"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(format!(
                "there is no order like '{other}'; available orders: asc,desc"
            )),
        }
    }
}

fn compare(a: &Transaction, b: &Transaction, key: SortKey) -> Ordering {
    match key {
        SortKey::Date => a.created_at.cmp(&b.created_at),
        SortKey::Amount => a.amount.total_cmp(&b.amount),
    }
}

/// Stable sort by `key`. `Desc` is the exact reverse of the `Asc` sequence.
pub fn sort_transactions(transactions: &mut [Transaction], key: SortKey, order: SortOrder) {
    transactions.sort_by(|a, b| compare(a, b, key));
    if order == SortOrder::Desc {
        transactions.reverse();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TransactionStatus;
    use chrono::{Duration, TimeZone, Utc};

    fn tx(id: i64, amount: f64, minutes: i64) -> Transaction {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::minutes(minutes);
        Transaction {
            id,
            user_id: 1,
            email: "a@b.com".to_string(),
            amount,
            currency: "USD".to_string(),
            created_at: created,
            changed_at: created,
            status: TransactionStatus::New,
        }
    }

    fn ids(transactions: &[Transaction]) -> Vec<i64> {
        transactions.iter().map(|t| t.id).collect()
    }

    #[test]
    fn parses_keys_and_orders() {
        assert_eq!("date".parse::<SortKey>(), Ok(SortKey::Date));
        assert_eq!("amount".parse::<SortKey>(), Ok(SortKey::Amount));
        assert!("user".parse::<SortKey>().is_err());
        assert_eq!("desc".parse::<SortOrder>(), Ok(SortOrder::Desc));
        assert!("wrong".parse::<SortOrder>().is_err());
    }

    #[test]
    fn amount_desc_puts_largest_first() {
        let mut list = vec![tx(1, 1.2, 0), tx(2, 11.2, 1)];
        sort_transactions(&mut list, SortKey::Amount, SortOrder::Desc);
        assert_eq!(ids(&list), vec![2, 1]);
    }

    #[test]
    fn date_sort_uses_creation_time() {
        let mut list = vec![tx(1, 5.0, 30), tx(2, 5.0, 10), tx(3, 5.0, 20)];
        sort_transactions(&mut list, SortKey::Date, SortOrder::Asc);
        assert_eq!(ids(&list), vec![2, 3, 1]);
    }

    #[test]
    fn equal_keys_keep_store_order() {
        let mut list = vec![tx(1, 3.0, 0), tx(2, 1.0, 0), tx(3, 3.0, 0), tx(4, 1.0, 0)];
        sort_transactions(&mut list, SortKey::Amount, SortOrder::Asc);
        assert_eq!(ids(&list), vec![2, 4, 1, 3]);
    }

    #[test]
    fn desc_reverses_asc_exactly() {
        let original = vec![
            tx(1, 3.0, 5),
            tx(2, 1.0, 5),
            tx(3, 3.0, 1),
            tx(4, 7.5, 9),
            tx(5, 1.0, 2),
        ];
        for key in [SortKey::Date, SortKey::Amount] {
            let mut asc = original.clone();
            let mut desc = original.clone();
            sort_transactions(&mut asc, key, SortOrder::Asc);
            sort_transactions(&mut desc, key, SortOrder::Desc);

            let mut reversed = ids(&asc);
            reversed.reverse();
            assert_eq!(ids(&desc), reversed, "{key:?}");
        }
    }
}
