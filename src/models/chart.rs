// Aggregation output and the chart-ready shape handed to the renderer.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Month;

/// Day of month -> requested field -> mean of that day's samples.
/// Only days with at least one sample are present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DailyAverages(BTreeMap<u32, BTreeMap<String, f64>>);

impl DailyAverages {
    pub fn new(days: BTreeMap<u32, BTreeMap<String, f64>>) -> Self {
        DailyAverages(days)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Days in ascending order.
    pub fn days(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.keys().copied()
    }

    pub fn get(&self, day: u32, field: &str) -> Option<f64> {
        self.0.get(&day).and_then(|fields| fields.get(field)).copied()
    }

    pub fn day(&self, day: u32) -> Option<&BTreeMap<String, f64>> {
        self.0.get(&day)
    }
}

/// One line on the chart. `None` marks a day without data for this field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSeries {
    pub field: String,
    pub data: Vec<Option<f64>>,
}

/// Chart payload for one request: day labels plus one series per requested field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartData {
    pub month: Month,
    pub labels: Vec<u32>,
    pub series: Vec<FieldSeries>,
}

impl ChartData {
    pub fn build(month: Month, averages: &DailyAverages, fields: &[String]) -> Self {
        let labels: Vec<u32> = averages.days().collect();
        let series = fields
            .iter()
            .map(|field| FieldSeries {
                field: field.clone(),
                data: labels.iter().map(|&day| averages.get(day, field)).collect(),
            })
            .collect();
        ChartData {
            month,
            labels,
            series,
        }
    }
}
