use time::{Date, Weekday};

/// Monday to Friday; exchange holidays are not modelled.
pub fn is_business_day(date: Date) -> bool {
    !matches!(date.weekday(), Weekday::Saturday | Weekday::Sunday)
}

/// The `count` business days strictly after `after`, in order.
pub fn next_business_days(after: Date, count: usize) -> Vec<Date> {
    let mut days = Vec::with_capacity(count);
    let mut cursor = after;
    while days.len() < count {
        let Some(next) = cursor.next_day() else {
            break;
        };
        if is_business_day(next) {
            days.push(next);
        }
        cursor = next;
    }
    days
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::*;

    #[test]
    fn skips_weekends() {
        // 2025-10-31 is a Friday.
        let days = next_business_days(date!(2025 - 10 - 31), 3);
        assert_eq!(
            days,
            vec![
                date!(2025 - 11 - 03),
                date!(2025 - 11 - 04),
                date!(2025 - 11 - 05)
            ]
        );
    }

    #[test]
    fn starts_after_a_weekend_anchor() {
        let days = next_business_days(date!(2024 - 01 - 06), 1);
        assert_eq!(days, vec![date!(2024 - 01 - 08)]);
    }

    #[test]
    fn sixty_days_are_strictly_increasing_weekdays() {
        let anchor = date!(2025 - 10 - 30);
        let days = next_business_days(anchor, 60);

        assert_eq!(days.len(), 60);
        assert!(days[0] > anchor);
        assert!(days.windows(2).all(|pair| pair[0] < pair[1]));
        assert!(days.iter().all(|day| is_business_day(*day)));
    }

    #[test]
    fn zero_count_is_empty() {
        assert!(next_business_days(date!(2024 - 01 - 01), 0).is_empty());
    }
}
