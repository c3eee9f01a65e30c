//! AWS Budgets declarations

use serde::Serialize;

use super::intrinsic::Reference;

/// What the budget tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BudgetType {
    /// Spend in currency
    Cost,
    /// Usage quantity
    Usage,
}

/// Budget period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimeUnit {
    /// Calendar day
    Daily,
    /// Calendar month
    Monthly,
    /// Calendar quarter
    Quarterly,
    /// Calendar year
    Annually,
}

/// Comparison applied between spend and the notification threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BudgetComparison {
    /// Spend equals the threshold
    EqualTo,
    /// Spend exceeds the threshold
    GreaterThan,
    /// Spend is below the threshold
    LessThan,
}

/// Whether notifications look at actual or forecast spend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationType {
    /// Spend already incurred
    Actual,
    /// Projected spend
    Forecasted,
}

/// How the threshold is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ThresholdType {
    /// Percentage of the budget limit
    Percentage,
    /// Absolute amount in the budget currency
    AbsoluteValue,
}

/// Delivery channel of a budget subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubscriptionType {
    /// SNS topic
    Sns,
    /// Email address
    Email,
}

/// Amount of money
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Spend {
    /// Amount
    pub amount: f64,
    /// Currency code
    pub unit: String,
}

/// Limit and period of a budget
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct BudgetData {
    /// Spend ceiling
    pub budget_limit: Spend,
    /// What is tracked
    pub budget_type: BudgetType,
    /// Period
    pub time_unit: TimeUnit,
}

/// When a budget notification fires
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Notification {
    /// Comparison against the threshold
    pub comparison_operator: BudgetComparison,
    /// Actual or forecast spend
    pub notification_type: NotificationType,
    /// Threshold value
    pub threshold: f64,
    /// Threshold interpretation
    pub threshold_type: ThresholdType,
}

/// Recipient of a budget notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Subscriber {
    /// Topic ARN or email address
    pub address: Reference,
    /// Delivery channel
    pub subscription_type: SubscriptionType,
}

/// A notification rule together with its recipients
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct NotificationWithSubscribers {
    /// Rule
    pub notification: Notification,
    /// Recipients
    pub subscribers: Vec<Subscriber>,
}

/// `AWS::Budgets::Budget`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Budget {
    /// Limit and period
    pub budget: BudgetData,
    /// Notification rules
    pub notifications_with_subscribers: Vec<NotificationWithSubscribers>,
}

impl Budget {
    /// A monthly cost budget capped at `limit`
    pub fn monthly_cost(limit: Spend) -> Self {
        Self {
            budget: BudgetData {
                budget_limit: limit,
                budget_type: BudgetType::Cost,
                time_unit: TimeUnit::Monthly,
            },
            notifications_with_subscribers: Vec::new(),
        }
    }

    /// Notify `topic` when actual spend compares to `percent` of the limit
    pub fn notify_on_actual(
        mut self,
        comparison: BudgetComparison,
        percent: f64,
        topic: Reference,
    ) -> Self {
        self.notifications_with_subscribers
            .push(NotificationWithSubscribers {
                notification: Notification {
                    comparison_operator: comparison,
                    notification_type: NotificationType::Actual,
                    threshold: percent,
                    threshold_type: ThresholdType::Percentage,
                },
                subscribers: vec![Subscriber {
                    address: topic,
                    subscription_type: SubscriptionType::Sns,
                }],
            });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LogicalId;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_budget_serialization() {
        let topic = LogicalId::derive("S", "topic");
        let budget = Budget::monthly_cost(Spend {
            amount: 1.0,
            unit: "USD".to_string(),
        })
        .notify_on_actual(BudgetComparison::GreaterThan, 10.0, Reference::Ref(topic.clone()));

        assert_eq!(
            serde_json::to_value(&budget).unwrap(),
            json!({
                "Budget": {
                    "BudgetLimit": { "Amount": 1.0, "Unit": "USD" },
                    "BudgetType": "COST",
                    "TimeUnit": "MONTHLY"
                },
                "NotificationsWithSubscribers": [{
                    "Notification": {
                        "ComparisonOperator": "GREATER_THAN",
                        "NotificationType": "ACTUAL",
                        "Threshold": 10.0,
                        "ThresholdType": "PERCENTAGE"
                    },
                    "Subscribers": [{
                        "Address": { "Ref": topic.as_str() },
                        "SubscriptionType": "SNS"
                    }]
                }]
            })
        );
    }
}
