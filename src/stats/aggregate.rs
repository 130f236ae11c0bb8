//! Aggregator
//! Grouped means and correlation matrices over filtered record views.

use super::calculator::StatsCalculator;
use crate::data::{DailyDataset, DailyField, DailyRecord};
use serde::Serialize;
use std::collections::BTreeMap;

/// Hourly-averaged weather covariates plus the rental count.
pub const PREFERRED_FIELDS: [DailyField; 4] = [
    DailyField::TempHourAvg,
    DailyField::HumHourAvg,
    DailyField::WindspeedHourAvg,
    DailyField::Count,
];

/// Raw daily weather covariates plus the rental count.
pub const FALLBACK_FIELDS: [DailyField; 4] = [
    DailyField::Temp,
    DailyField::Hum,
    DailyField::Windspeed,
    DailyField::Count,
];

/// Mean of one category and the number of values behind it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Mean {
    pub value: f64,
    pub count: usize,
}

#[derive(Default)]
struct Accumulator {
    sum: f64,
    count: usize,
}

impl Accumulator {
    fn push(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    fn finish(&self) -> Mean {
        Mean {
            value: self.sum / self.count as f64,
            count: self.count,
        }
    }
}

fn present(value: Option<f64>) -> Option<f64> {
    value.filter(|v| !v.is_nan())
}

/// Mean of `value_key` per `group_key`.
///
/// Null or NaN values are skipped, and a category without a single usable
/// value is absent from the result rather than reported as zero.
pub fn mean_by_category<'a, R, K, G, V>(
    records: impl IntoIterator<Item = &'a R>,
    group_key: G,
    value_key: V,
) -> BTreeMap<K, Mean>
where
    R: 'a,
    K: Ord,
    G: Fn(&R) -> K,
    V: Fn(&R) -> Option<f64>,
{
    let mut groups: BTreeMap<K, Accumulator> = BTreeMap::new();
    for record in records {
        if let Some(value) = present(value_key(record)) {
            groups.entry(group_key(record)).or_default().push(value);
        }
    }
    groups
        .into_iter()
        .map(|(key, acc)| (key, acc.finish()))
        .collect()
}

/// Mean of `value_key` for every observed `(key_a, key_b)` pair, sorted by
/// `key_a` then `key_b`.
pub fn mean_by_two_keys<'a, R, A, B, FA, FB, V>(
    records: impl IntoIterator<Item = &'a R>,
    key_a: FA,
    key_b: FB,
    value_key: V,
) -> Vec<(A, B, f64)>
where
    R: 'a,
    A: Ord,
    B: Ord,
    FA: Fn(&R) -> A,
    FB: Fn(&R) -> B,
    V: Fn(&R) -> Option<f64>,
{
    let mut groups: BTreeMap<(A, B), Accumulator> = BTreeMap::new();
    for record in records {
        if let Some(value) = present(value_key(record)) {
            groups
                .entry((key_a(record), key_b(record)))
                .or_default()
                .push(value);
        }
    }
    groups
        .into_iter()
        .map(|((a, b), acc)| (a, b, acc.finish().value))
        .collect()
}

/// Square matrix of pairwise Pearson correlations, indexed like `fields`.
///
/// Each pair uses only the records where both fields are present.
pub fn correlation_matrix(records: &[&DailyRecord], fields: &[DailyField]) -> Vec<Vec<f64>> {
    let n = fields.len();
    let mut matrix = vec![vec![f64::NAN; n]; n];

    for i in 0..n {
        for j in i..n {
            let (xs, ys): (Vec<f64>, Vec<f64>) = records
                .iter()
                .filter_map(|r| {
                    let x = present(fields[i].value(r))?;
                    let y = present(fields[j].value(r))?;
                    Some((x, y))
                })
                .unzip();

            let r = StatsCalculator::pearson(&xs, &ys);
            let r = if i == j && !r.is_nan() { 1.0 } else { r };
            matrix[i][j] = r;
            matrix[j][i] = r;
        }
    }
    matrix
}

/// Which covariate set a correlation was computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FieldSet {
    /// `temp_hour_avg`, `hum_hour_avg`, `windspeed_hour_avg`, `cnt`.
    Preferred,
    /// `temp`, `hum`, `windspeed`, `cnt`.
    Fallback,
}

impl FieldSet {
    /// Preferred when the source carries the hourly-averaged columns.
    pub fn for_dataset(dataset: &DailyDataset) -> Self {
        if dataset.has_hour_averages {
            FieldSet::Preferred
        } else {
            FieldSet::Fallback
        }
    }

    pub fn fields(&self) -> &'static [DailyField] {
        match self {
            FieldSet::Preferred => &PREFERRED_FIELDS,
            FieldSet::Fallback => &FALLBACK_FIELDS,
        }
    }
}

/// Correlation matrix tagged with the field set that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Correlation {
    pub used: FieldSet,
    pub fields: Vec<DailyField>,
    pub matrix: Vec<Vec<f64>>,
}

/// Weather/rental correlation over a filtered daily view of `dataset`.
pub fn weather_correlation(dataset: &DailyDataset, records: &[&DailyRecord]) -> Correlation {
    let used = FieldSet::for_dataset(dataset);
    let fields = used.fields().to_vec();
    let matrix = correlation_matrix(records, &fields);
    Correlation {
        used,
        fields,
        matrix,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{HourlyRecord, Season};
    use chrono::NaiveDate;
    use std::path::PathBuf;

    fn daily(day: u32, code: i64, temp: f64, cnt: u32) -> DailyRecord {
        DailyRecord {
            date: NaiveDate::from_ymd_opt(2011, 1, day).unwrap(),
            season_code: code,
            season: Season::from_code(code),
            temp: Some(temp),
            hum: Some(1.0 - temp / 2.0),
            windspeed: Some(((day * 7) % 5) as f64 / 10.0),
            temp_hour_avg: None,
            hum_hour_avg: None,
            windspeed_hour_avg: None,
            cnt,
        }
    }

    fn hourly(hour: u8, working_day: u8, cnt: u32) -> HourlyRecord {
        HourlyRecord {
            date: NaiveDate::from_ymd_opt(2011, 1, 1).unwrap(),
            hour,
            working_day,
            cnt,
        }
    }

    #[test]
    fn test_mean_by_season() {
        let records = vec![daily(1, 1, 0.2, 100), daily(2, 1, 0.3, 150), daily(3, 4, 0.1, 200)];
        let means = mean_by_category(&records, |r| r.season, |r| Some(r.cnt as f64));

        assert_eq!(means.len(), 2);
        assert_eq!(means[&Season::Spring].value, 125.0);
        assert_eq!(means[&Season::Spring].count, 2);
        assert_eq!(means[&Season::Winter].value, 200.0);
        assert!(!means.contains_key(&Season::Summer));
    }

    #[test]
    fn test_mean_by_category_skips_missing_values() {
        let mut records = vec![daily(1, 1, 0.2, 100), daily(2, 2, 0.3, 150), daily(3, 2, 0.1, 200)];
        records[0].temp = None;
        records[1].temp = Some(f64::NAN);

        let means = mean_by_category(&records, |r| r.season, |r| r.temp);
        assert!(!means.contains_key(&Season::Spring));
        assert_eq!(means[&Season::Summer].count, 1);
        assert_eq!(means[&Season::Summer].value, 0.1);

        let used: usize = means.values().map(|m| m.count).sum();
        let non_null = records
            .iter()
            .filter(|r| r.temp.is_some_and(|t| !t.is_nan()))
            .count();
        assert_eq!(used, non_null);
    }

    #[test]
    fn test_mean_by_two_keys_only_observed_pairs() {
        let records = vec![
            hourly(8, 1, 300),
            hourly(8, 1, 100),
            hourly(8, 0, 50),
            hourly(17, 1, 400),
        ];
        let rows = mean_by_two_keys(
            &records,
            |r| r.hour,
            |r| r.working_day,
            |r| Some(r.cnt as f64),
        );
        assert_eq!(rows, vec![(8, 0, 50.0), (8, 1, 200.0), (17, 1, 400.0)]);
    }

    #[test]
    fn test_correlation_matrix_symmetric_unit_diagonal() {
        let records: Vec<DailyRecord> = (1..=12)
            .map(|d| daily(d, 1, d as f64 / 12.0, 50 + d * d))
            .collect();
        let view: Vec<&DailyRecord> = records.iter().collect();
        let m = correlation_matrix(&view, &FALLBACK_FIELDS);

        assert_eq!(m.len(), 4);
        for i in 0..4 {
            assert_eq!(m[i][i], 1.0);
            for j in 0..4 {
                assert_eq!(m[i][j].to_bits(), m[j][i].to_bits());
                assert!(m[i][j] <= 1.0 && m[i][j] >= -1.0);
            }
        }
        // hum is a decreasing linear function of temp
        assert!((m[0][1] + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_correlation_degenerate_field_is_nan() {
        let records: Vec<DailyRecord> = (1..=5).map(|d| daily(d, 1, 0.5, d * 10)).collect();
        let view: Vec<&DailyRecord> = records.iter().collect();
        let m = correlation_matrix(&view, &[DailyField::Temp, DailyField::Count]);
        assert!(m[0][0].is_nan());
        assert!(m[0][1].is_nan());
        assert_eq!(m[1][1], 1.0);
    }

    #[test]
    fn test_weather_correlation_reports_field_set() {
        let mut records: Vec<DailyRecord> = (1..=6)
            .map(|d| daily(d, 2, d as f64 / 6.0, 100 + d * 3))
            .collect();
        let fallback_ds = DailyDataset {
            source: PathBuf::from("day.csv"),
            records: records.clone(),
            has_hour_averages: false,
        };
        let view: Vec<&DailyRecord> = fallback_ds.records.iter().collect();
        let corr = weather_correlation(&fallback_ds, &view);
        assert_eq!(corr.used, FieldSet::Fallback);
        assert_eq!(corr.fields, FALLBACK_FIELDS.to_vec());

        for r in records.iter_mut() {
            r.temp_hour_avg = r.temp;
            r.hum_hour_avg = r.hum;
            r.windspeed_hour_avg = r.windspeed;
        }
        let preferred_ds = DailyDataset {
            records,
            has_hour_averages: true,
            ..fallback_ds
        };
        let view: Vec<&DailyRecord> = preferred_ds.records.iter().collect();
        let corr = weather_correlation(&preferred_ds, &view);
        assert_eq!(corr.used, FieldSet::Preferred);
        assert_eq!(corr.fields[0], DailyField::TempHourAvg);
        assert_eq!(corr.matrix.len(), 4);
    }
}
