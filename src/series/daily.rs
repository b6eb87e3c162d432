use chrono::NaiveDate;
use std::collections::BTreeMap;

/// A station's provider-native daily maxima, keyed by calendar date.
///
/// A date can be present with no value: the provider published a row for that day but the
/// `tmax` cell is empty. Lookups treat that the same as a missing row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DailySeries {
    values: BTreeMap<NaiveDate, Option<f64>>,
}

impl DailySeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// The recorded maximum for `date`, if there is one.
    pub fn get(&self, date: NaiveDate) -> Option<f64> {
        self.values.get(&date).copied().flatten()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// First and last date with a row, if any.
    pub fn first_date(&self) -> Option<NaiveDate> {
        self.values.keys().next().copied()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.values.keys().next_back().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, Option<f64>)> + '_ {
        self.values.iter().map(|(date, value)| (*date, *value))
    }
}

impl FromIterator<(NaiveDate, Option<f64>)> for DailySeries {
    /// Later rows for the same date replace earlier ones. NaN cells count as empty.
    fn from_iter<T: IntoIterator<Item = (NaiveDate, Option<f64>)>>(iter: T) -> Self {
        let values = iter
            .into_iter()
            .map(|(date, value)| (date, value.filter(|v| !v.is_nan())))
            .collect();
        Self { values }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_empty_slot_reads_as_absent() {
        let series: DailySeries = [
            (date(2020, 7, 28), Some(27.4)),
            (date(2020, 7, 29), None),
            (date(2020, 7, 30), Some(f64::NAN)),
        ]
        .into_iter()
        .collect();

        assert_eq!(series.len(), 3);
        assert_eq!(series.get(date(2020, 7, 28)), Some(27.4));
        assert_eq!(series.get(date(2020, 7, 29)), None);
        assert_eq!(series.get(date(2020, 7, 30)), None);
        assert_eq!(series.get(date(1999, 1, 1)), None);
    }

    #[test]
    fn test_bounds() {
        let series: DailySeries = [(date(2001, 5, 1), Some(1.0)), (date(1999, 3, 2), Some(2.0))]
            .into_iter()
            .collect();
        assert_eq!(series.first_date(), Some(date(1999, 3, 2)));
        assert_eq!(series.last_date(), Some(date(2001, 5, 1)));
        assert!(DailySeries::new().first_date().is_none());
    }
}
