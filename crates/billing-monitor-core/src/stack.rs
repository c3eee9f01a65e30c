//! The billing monitor stack
//!
//! [`StackDefinition::build`] declares, in dependency order, the chatbot role,
//! the notification topic, the Slack channel binding, the monthly budget, the
//! budgets publish grant and one billing alarm per watched service. The result
//! is an immutable [`Stack`]; turning it into a template is the job of
//! [`crate::synth`].

use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info};

use crate::config::{ChatSettings, ChatTarget, Settings, StackSettings};
use crate::error::{Error, Result};
use crate::models::{
    Alarm, AlarmProps, Budget, BudgetComparison, ComparisonOperator, DimensionLookup, LogicalId,
    Metric, PolicyDocument, PolicyResource, PolicyStatement, Principal, Reference, Resource,
    ResourceKind, ResourceProperties, Role, SlackChannelConfiguration, SnsAction, Spend,
    Statistic, Topic, TopicPolicy,
};
use crate::services::BilledService;

/// Principal of the chat integration
pub const CHATBOT_PRINCIPAL: &str = "chatbot.amazonaws.com";
/// Principal of the budgeting service
pub const BUDGETS_PRINCIPAL: &str = "budgets.amazonaws.com";
/// Actions the chat integration may perform
pub const CHATBOT_ACTIONS: [&str; 3] = [
    "cloudwatch:Describe*",
    "cloudwatch:Get*",
    "cloudwatch:List*",
];
/// Name of the chat role's inline policy
pub const CHATBOT_POLICY_NAME: &str = "ChatbotNotificationsOnlyPolicy";
/// Sid of the statement letting budgets publish to the topic
pub const BUDGETS_PUBLISH_SID: &str = "AWSBudgetsSNSPublishingPermissions";

/// Monthly spend ceiling
pub const BUDGET_LIMIT: f64 = 1.0;
/// Currency of the ceiling and of the billing metrics
pub const CURRENCY: &str = "USD";
/// Percentage of the ceiling at which budget notifications fire
pub const BUDGET_THRESHOLD_PERCENT: f64 = 10.0;
/// One budget notification per operator
pub const BUDGET_COMPARISONS: [BudgetComparison; 3] = [
    BudgetComparison::EqualTo,
    BudgetComparison::GreaterThan,
    BudgetComparison::LessThan,
];

/// Billing metrics are only published in us-east-1
pub const BILLING_REGION: &str = "us-east-1";
/// Namespace of the billing metrics
pub const BILLING_NAMESPACE: &str = "AWS/Billing";
/// Billing metric name
pub const BILLING_METRIC: &str = "EstimatedCharges";
/// Dimension carrying the service name
pub const SERVICE_NAME_DIMENSION: &str = "ServiceName";
/// Alarm aggregation period
pub const ALARM_PERIOD: Duration = Duration::from_secs(24 * 60 * 60);
/// Any estimated charge at all trips the alarm
pub const ALARM_THRESHOLD: f64 = 0.0;

static STACK_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new("^[A-Za-z][-A-Za-z0-9]*$").expect("static regex is valid"));

/// Check `name` against the CloudFormation stack name rules.
///
/// The name also becomes the template file name, so anything outside
/// `[-A-Za-z0-9]` is rejected.
pub fn validate_stack_name(name: &str) -> Result<()> {
    if STACK_NAME.is_match(name) {
        Ok(())
    } else {
        Err(Error::validation(format!(
            "invalid stack name '{name}': use a letter followed by letters, digits or hyphens"
        )))
    }
}

/// Handle to a declared role
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleHandle(LogicalId);

impl RoleHandle {
    /// The role ARN
    pub fn arn(&self) -> Reference {
        Reference::GetAtt(self.0.clone(), "Arn".to_string())
    }
}

/// Handle to a declared topic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicHandle(LogicalId);

impl TopicHandle {
    /// The topic ARN (`Ref` of a topic resolves to its ARN)
    pub fn arn(&self) -> Reference {
        Reference::Ref(self.0.clone())
    }
}

/// An immutable declaration graph, ready for synthesis
#[derive(Debug, Clone, PartialEq)]
pub struct Stack {
    name: String,
    description: Option<String>,
    region: Option<String>,
    resources: Vec<Resource>,
}

macro_rules! kind_accessor {
    ($(#[$doc:meta])* $name:ident, $variant:ident, $ty:ty) => {
        $(#[$doc])*
        pub fn $name(&self) -> impl Iterator<Item = &$ty> + '_ {
            self.resources.iter().filter_map(|resource| match &resource.properties {
                ResourceProperties::$variant(inner) => Some(inner),
                _ => None,
            })
        }
    };
}

impl Stack {
    /// Stack name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Template description
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Region the stack is pinned to
    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    /// Resources in declaration order
    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    /// Resources of one kind
    pub fn of_kind(&self, kind: ResourceKind) -> impl Iterator<Item = &Resource> + '_ {
        self.resources
            .iter()
            .filter(move |resource| resource.kind() == kind)
    }

    kind_accessor!(
        /// Declared roles
        roles, Role, Role
    );
    kind_accessor!(
        /// Declared topics
        topics, Topic, Topic
    );
    kind_accessor!(
        /// Declared topic policies
        topic_policies, TopicPolicy, TopicPolicy
    );
    kind_accessor!(
        /// Declared chat channel bindings
        chat_bindings, SlackChannelConfiguration, SlackChannelConfiguration
    );
    kind_accessor!(
        /// Declared budgets
        budgets, Budget, Budget
    );
    kind_accessor!(
        /// Declared alarms
        alarms, Alarm, Alarm
    );
}

/// Collects declarations and checks each one as it is added
#[derive(Debug)]
pub struct StackBuilder {
    name: String,
    description: Option<String>,
    region: Option<String>,
    resources: Vec<Resource>,
}

impl StackBuilder {
    /// Start an empty stack
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            region: None,
            resources: Vec::new(),
        }
    }

    /// Set the template description
    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    /// Pin the stack to a region
    pub fn region(mut self, region: Option<String>) -> Self {
        self.region = region;
        self
    }

    /// Declare a resource under `construct_id`.
    ///
    /// Fails on a duplicate id, on a reference to anything not yet declared,
    /// and on an alarm whose metric lives outside the pinned region.
    pub fn declare(
        &mut self,
        construct_id: &str,
        properties: ResourceProperties,
    ) -> Result<LogicalId> {
        let logical_id = LogicalId::derive(&self.name, construct_id);

        if self
            .resources
            .iter()
            .any(|r| r.construct_id == construct_id || r.logical_id == logical_id)
        {
            return Err(Error::validation(format!(
                "'{construct_id}' is already declared in stack '{}'",
                self.name
            )));
        }

        if let Some(missing) = properties
            .references()
            .into_iter()
            .find(|reference| !self.contains(reference.logical_id()))
        {
            return Err(Error::validation(format!(
                "'{construct_id}' references '{}' which is not declared yet",
                missing.logical_id()
            )));
        }

        if let (ResourceProperties::Alarm(alarm), Some(region)) = (&properties, &self.region) {
            if &alarm.metric_region != region {
                return Err(Error::validation(format!(
                    "alarm '{construct_id}' watches a metric in {} but the stack is in {region}",
                    alarm.metric_region
                )));
            }
        }

        debug!(
            construct_id,
            logical_id = %logical_id,
            kind = %properties.kind(),
            "resource declared"
        );
        self.resources.push(Resource {
            construct_id: construct_id.to_string(),
            logical_id: logical_id.clone(),
            properties,
        });
        Ok(logical_id)
    }

    /// Declare a role
    pub fn add_role(&mut self, construct_id: &str, role: Role) -> Result<RoleHandle> {
        self.declare(construct_id, ResourceProperties::Role(role))
            .map(RoleHandle)
    }

    /// Declare a topic
    pub fn add_topic(&mut self, construct_id: &str, topic: Topic) -> Result<TopicHandle> {
        self.declare(construct_id, ResourceProperties::Topic(topic))
            .map(TopicHandle)
    }

    fn contains(&self, logical_id: &LogicalId) -> bool {
        self.resources.iter().any(|r| &r.logical_id == logical_id)
    }

    /// Freeze the declarations
    pub fn build(self) -> Stack {
        Stack {
            name: self.name,
            description: self.description,
            region: self.region,
            resources: self.resources,
        }
    }
}

/// Declares the billing monitor
#[derive(Debug, Clone)]
pub struct StackDefinition {
    stack: StackSettings,
    chat: ChatSettings,
}

impl StackDefinition {
    /// A definition driven by `settings`
    pub fn new(settings: &Settings) -> Self {
        Self {
            stack: settings.stack.clone(),
            chat: settings.chat.clone(),
        }
    }

    /// Declare every resource. Missing Slack ids fail before anything is declared.
    pub fn build(&self) -> Result<Stack> {
        let target = self.chat.require()?;
        validate_stack_name(&self.stack.name)?;

        info!(stack = %self.stack.name, "declaring billing monitor");
        let mut builder = StackBuilder::new(&self.stack.name)
            .description(self.stack.description.clone())
            .region(self.stack.region.clone());

        let role = declare_chatbot_role(&mut builder)?;
        let topic = builder.add_topic("topic", Topic::default())?;
        declare_chat_binding(&mut builder, &target, &role, &topic)?;
        declare_budget(&mut builder, &topic)?;
        grant_budget_publish(&mut builder, &topic)?;
        declare_billing_alarms(&mut builder, &topic)?;

        let stack = builder.build();
        info!(
            stack = %stack.name(),
            resources = stack.resources().len(),
            "billing monitor declared"
        );
        Ok(stack)
    }
}

fn declare_chatbot_role(builder: &mut StackBuilder) -> Result<RoleHandle> {
    let statement = PolicyStatement::allow(CHATBOT_ACTIONS).on(PolicyResource::any());
    let policy = PolicyDocument::new(vec![statement]);
    let role = Role::assumed_by(CHATBOT_PRINCIPAL).with_inline_policy(CHATBOT_POLICY_NAME, policy);

    if let Some(action) = role.granted_actions().find(|action| !action.is_read_only()) {
        return Err(Error::validation(format!(
            "chatbot role may only read, but grants '{}'",
            action.as_str()
        )));
    }

    info!("declaring read-only chatbot role");
    builder.add_role("chatbotRole", role)
}

fn declare_chat_binding(
    builder: &mut StackBuilder,
    target: &ChatTarget,
    role: &RoleHandle,
    topic: &TopicHandle,
) -> Result<LogicalId> {
    info!(
        workspace_id = %target.workspace_id,
        channel_id = %target.channel_id,
        "binding topic to slack channel"
    );
    builder.declare(
        "chatbot",
        ResourceProperties::SlackChannelConfiguration(SlackChannelConfiguration {
            configuration_name: target.configuration_name.clone(),
            iam_role_arn: role.arn(),
            slack_channel_id: target.channel_id.clone(),
            slack_workspace_id: target.workspace_id.clone(),
            sns_topic_arns: vec![topic.arn()],
        }),
    )
}

fn declare_budget(builder: &mut StackBuilder, topic: &TopicHandle) -> Result<LogicalId> {
    let budget = BUDGET_COMPARISONS.into_iter().fold(
        Budget::monthly_cost(Spend {
            amount: BUDGET_LIMIT,
            unit: CURRENCY.to_string(),
        }),
        |budget, comparison| {
            budget.notify_on_actual(comparison, BUDGET_THRESHOLD_PERCENT, topic.arn())
        },
    );

    info!(
        limit = BUDGET_LIMIT,
        currency = CURRENCY,
        threshold_percent = BUDGET_THRESHOLD_PERCENT,
        "declaring monthly budget"
    );
    builder.declare("budget", ResourceProperties::Budget(budget))
}

fn grant_budget_publish(builder: &mut StackBuilder, topic: &TopicHandle) -> Result<LogicalId> {
    let statement = PolicyStatement::allow(["SNS:Publish"])
        .with_sid(BUDGETS_PUBLISH_SID)
        .with_principal(Principal::service(BUDGETS_PRINCIPAL))
        .on(PolicyResource::Reference(topic.arn()));

    builder.declare(
        "topicPolicy",
        ResourceProperties::TopicPolicy(TopicPolicy {
            policy_document: PolicyDocument::new(vec![statement]),
            topics: vec![topic.arn()],
        }),
    )
}

fn declare_billing_alarms(builder: &mut StackBuilder, topic: &TopicHandle) -> Result<()> {
    let action = SnsAction::new(topic.arn());

    for service in BilledService::ALL {
        let metric = estimated_charges(service);
        let (construct_id, mut alarm) = billing_alarm(&metric)?;
        alarm.add_alarm_action(&action);
        alarm.add_insufficient_data_action(&action);
        builder.declare(&construct_id, ResourceProperties::Alarm(alarm))?;
    }

    info!(count = BilledService::ALL.len(), "declared billing alarms");
    Ok(())
}

/// The estimated-charges metric of one service
pub fn estimated_charges(service: BilledService) -> Metric {
    Metric::new(BILLING_NAMESPACE, BILLING_METRIC, BILLING_REGION)
        .with_dimension("Currency", CURRENCY)
        .with_dimension(SERVICE_NAME_DIMENSION, service.as_str())
}

fn billing_alarm(metric: &Metric) -> Result<(String, Alarm)> {
    let DimensionLookup::Found(service) = metric.dimension(SERVICE_NAME_DIMENSION) else {
        return Err(Error::invariant(format!(
            "billing metric {}/{} has no {SERVICE_NAME_DIMENSION} dimension",
            metric.namespace, metric.metric_name
        )));
    };

    debug!(service, "declaring billing alarm");
    let alarm = Alarm::new(
        metric,
        AlarmProps {
            alarm_name: format!("billing-of-{service}"),
            statistic: Statistic::Maximum,
            period: ALARM_PERIOD,
            comparison_operator: ComparisonOperator::GreaterThanOrEqualToThreshold,
            threshold: ALARM_THRESHOLD,
            evaluation_periods: 1,
            datapoints_to_alarm: 1,
        },
    );
    Ok((format!("alarm-{service}"), alarm))
}
