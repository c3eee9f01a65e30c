//! CloudWatch metrics and alarms

use std::time::Duration;

use serde::Serialize;

use super::intrinsic::Reference;

/// Name/value pair scoping a metric
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Dimension {
    /// Dimension name
    pub name: String,
    /// Dimension value
    pub value: String,
}

/// Result of looking up a metric dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DimensionLookup<'a> {
    /// The dimension is present with this value
    Found(&'a str),
    /// The metric carries no such dimension
    NotFound,
}

/// A metric identity. Not a resource on its own; alarms inline it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metric {
    /// Metric namespace, e.g. `AWS/Billing`
    pub namespace: String,
    /// Metric name
    pub metric_name: String,
    /// Dimensions in declaration order
    pub dimensions: Vec<Dimension>,
    /// Region the metric is published in
    pub region: String,
}

impl Metric {
    /// A metric with no dimensions
    pub fn new(
        namespace: impl Into<String>,
        metric_name: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            metric_name: metric_name.into(),
            dimensions: Vec::new(),
            region: region.into(),
        }
    }

    /// Add a dimension
    pub fn with_dimension(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.dimensions.push(Dimension {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    /// Look up a dimension by name
    pub fn dimension(&self, name: &str) -> DimensionLookup<'_> {
        self.dimensions
            .iter()
            .find(|dimension| dimension.name == name)
            .map_or(DimensionLookup::NotFound, |dimension| {
                DimensionLookup::Found(&dimension.value)
            })
    }
}

/// Aggregation applied over each period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Statistic {
    /// Average
    Average,
    /// Maximum
    Maximum,
    /// Minimum
    Minimum,
    /// Number of data points
    SampleCount,
    /// Sum
    Sum,
}

/// Comparison between the statistic and the threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ComparisonOperator {
    /// `>=`
    GreaterThanOrEqualToThreshold,
    /// `>`
    GreaterThanThreshold,
    /// `<`
    LessThanThreshold,
    /// `<=`
    LessThanOrEqualToThreshold,
}

/// Shape of an alarm, independent of the metric it watches
#[derive(Debug, Clone, PartialEq)]
pub struct AlarmProps {
    /// Alarm name
    pub alarm_name: String,
    /// Aggregation
    pub statistic: Statistic,
    /// Aggregation period
    pub period: Duration,
    /// Comparison
    pub comparison_operator: ComparisonOperator,
    /// Threshold
    pub threshold: f64,
    /// Periods evaluated
    pub evaluation_periods: u32,
    /// Breaching periods required to alarm
    pub datapoints_to_alarm: u32,
}

/// Publish-to-topic action shared by alarm state transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnsAction {
    topic: Reference,
}

impl SnsAction {
    /// Publish to `topic`
    pub fn new(topic: Reference) -> Self {
        Self { topic }
    }
}

/// `AWS::CloudWatch::Alarm`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Alarm {
    /// Alarm name
    pub alarm_name: String,
    /// Metric namespace
    pub namespace: String,
    /// Metric name
    pub metric_name: String,
    /// Metric dimensions
    pub dimensions: Vec<Dimension>,
    /// Aggregation
    pub statistic: Statistic,
    /// Aggregation period in seconds
    pub period: u64,
    /// Comparison
    pub comparison_operator: ComparisonOperator,
    /// Threshold
    pub threshold: f64,
    /// Periods evaluated
    pub evaluation_periods: u32,
    /// Breaching periods required to alarm
    pub datapoints_to_alarm: u32,
    /// Actions on entering ALARM
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub alarm_actions: Vec<Reference>,
    /// Actions on entering INSUFFICIENT_DATA
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub insufficient_data_actions: Vec<Reference>,
    /// Region of the watched metric
    #[serde(skip)]
    pub metric_region: String,
}

impl Alarm {
    /// An alarm on `metric` with no actions
    pub fn new(metric: &Metric, props: AlarmProps) -> Self {
        Self {
            alarm_name: props.alarm_name,
            namespace: metric.namespace.clone(),
            metric_name: metric.metric_name.clone(),
            dimensions: metric.dimensions.clone(),
            statistic: props.statistic,
            period: props.period.as_secs(),
            comparison_operator: props.comparison_operator,
            threshold: props.threshold,
            evaluation_periods: props.evaluation_periods,
            datapoints_to_alarm: props.datapoints_to_alarm,
            alarm_actions: Vec::new(),
            insufficient_data_actions: Vec::new(),
            metric_region: metric.region.clone(),
        }
    }

    /// Run `action` when the alarm enters ALARM
    pub fn add_alarm_action(&mut self, action: &SnsAction) {
        self.alarm_actions.push(action.topic.clone());
    }

    /// Run `action` when the alarm enters INSUFFICIENT_DATA
    pub fn add_insufficient_data_action(&mut self, action: &SnsAction) {
        self.insufficient_data_actions.push(action.topic.clone());
    }
}
