//! OTel-style metric envelope.
//!
//! One envelope carries exactly one data point:
//! ```text
//! { "resourceMetrics": [{ "scopeMetrics": [{ "metrics": [{
//!     "name", "unit",
//!     "<sum|gauge>": { "dataPoints": [{ "asInt"|"asDouble", "timeUnixNano" }],
//!                      sum only: "aggregationTemporality", "isMonotonic" } }]}]}] }
//! ```

use std::fmt;

use serde::Serialize;

pub const CUMULATIVE: &str = "AGGREGATION_TEMPORALITY_CUMULATIVE";

/// Instrument kind on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    /// Monotonic, cumulative counter.
    Sum,
    /// Instantaneous value.
    Gauge,
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricKind::Sum => f.write_str("sum"),
            MetricKind::Gauge => f.write_str("gauge"),
        }
    }
}

/// A data point value, tagged integer or floating.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricValue {
    Int(i64),
    Double(f64),
}

impl From<f64> for MetricValue {
    /// Exact integers within `i64` range become `Int`.
    fn from(v: f64) -> Self {
        if v.is_finite() && v.fract() == 0.0 && v >= i64::MIN as f64 && v < i64::MAX as f64 {
            MetricValue::Int(v as i64)
        } else {
            MetricValue::Double(v)
        }
    }
}

impl From<i64> for MetricValue {
    fn from(v: i64) -> Self {
        MetricValue::Int(v)
    }
}

impl From<u64> for MetricValue {
    fn from(v: u64) -> Self {
        MetricValue::Int(i64::try_from(v).unwrap_or(i64::MAX))
    }
}

impl From<usize> for MetricValue {
    fn from(v: usize) -> Self {
        MetricValue::from(v as u64)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DataPoint {
    #[serde(skip_serializing_if = "Option::is_none")]
    as_int: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    as_double: Option<f64>,
    time_unix_nano: u64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SumData {
    data_points: [DataPoint; 1],
    aggregation_temporality: &'static str,
    is_monotonic: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GaugeData {
    data_points: [DataPoint; 1],
}

#[derive(Serialize)]
enum MetricData {
    #[serde(rename = "sum")]
    Sum(SumData),
    #[serde(rename = "gauge")]
    Gauge(GaugeData),
}

#[derive(Serialize)]
struct Metric<'a> {
    name: &'a str,
    unit: &'a str,
    #[serde(flatten)]
    data: MetricData,
}

#[derive(Serialize)]
struct ScopeMetrics<'a> {
    metrics: [Metric<'a>; 1],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ResourceMetrics<'a> {
    scope_metrics: [ScopeMetrics<'a>; 1],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Envelope<'a> {
    resource_metrics: [ResourceMetrics<'a>; 1],
}

/// A single metric observation ready to be pushed.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricEnvelope {
    pub name: String,
    pub unit: String,
    pub kind: MetricKind,
    pub value: MetricValue,
    pub time_unix_nano: u64,
}

impl MetricEnvelope {
    pub fn new(
        name: impl Into<String>,
        value: impl Into<MetricValue>,
        kind: MetricKind,
        unit: impl Into<String>,
        time_unix_nano: u64,
    ) -> Self {
        Self {
            name: name.into(),
            unit: unit.into(),
            kind,
            value: value.into(),
            time_unix_nano,
        }
    }

    /// Serialize into the push body.
    pub fn to_body(&self) -> serde_json::Result<String> {
        let (as_int, as_double) = match self.value {
            MetricValue::Int(v) => (Some(v), None),
            MetricValue::Double(v) => (None, Some(v)),
        };
        let data_points = [DataPoint {
            as_int,
            as_double,
            time_unix_nano: self.time_unix_nano,
        }];

        let data = match self.kind {
            MetricKind::Sum => MetricData::Sum(SumData {
                data_points,
                aggregation_temporality: CUMULATIVE,
                is_monotonic: true,
            }),
            MetricKind::Gauge => MetricData::Gauge(GaugeData { data_points }),
        };

        serde_json::to_string(&Envelope {
            resource_metrics: [ResourceMetrics {
                scope_metrics: [ScopeMetrics {
                    metrics: [Metric {
                        name: &self.name,
                        unit: &self.unit,
                        data,
                    }],
                }],
            }],
        })
    }
}
