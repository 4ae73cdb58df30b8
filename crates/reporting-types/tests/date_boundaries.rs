//! Day-boundary properties of `DateRange`
//!
//! Both bounds are inclusive at day granularity, so the first and the last
//! instant of the bound date always satisfy either bound.

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use reporting_types::{DateRange, end_of_day, start_of_day};

fn any_date() -> impl Strategy<Value = NaiveDate> {
    (1900i32..2100, 1u32..=12, 1u32..=28)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

proptest! {
    #[test]
    fn start_of_day_included_on_or_after(d in any_date()) {
        prop_assert!(DateRange::new(Some(d), None).contains(start_of_day(d)));
    }

    #[test]
    fn end_of_day_included_on_or_after(d in any_date()) {
        prop_assert!(DateRange::new(Some(d), None).contains(end_of_day(d)));
    }

    #[test]
    fn start_of_day_included_on_or_before(d in any_date()) {
        prop_assert!(DateRange::new(None, Some(d)).contains(start_of_day(d)));
    }

    #[test]
    fn end_of_day_included_on_or_before(d in any_date()) {
        prop_assert!(DateRange::new(None, Some(d)).contains(end_of_day(d)));
    }

    #[test]
    fn previous_day_excluded_on_or_after(d in any_date()) {
        let just_before = start_of_day(d) - Duration::nanoseconds(1);
        prop_assert!(!DateRange::new(Some(d), None).contains(just_before));
    }

    #[test]
    fn next_day_excluded_on_or_before(d in any_date()) {
        let just_after = end_of_day(d) + Duration::nanoseconds(1);
        prop_assert!(!DateRange::new(None, Some(d)).contains(just_after));
    }

    #[test]
    fn single_day_range_covers_whole_day(d in any_date(), secs in 0i64..86_400) {
        let range = DateRange::new(Some(d), Some(d));
        prop_assert!(range.contains(start_of_day(d) + Duration::seconds(secs)));
    }
}
