//! A declared resource and its type-tagged properties

use std::fmt;

use serde::Serialize;

use super::budgets::Budget;
use super::chatbot::SlackChannelConfiguration;
use super::cloudwatch::Alarm;
use super::iam::{PolicyDocument, PolicyResource, Role};
use super::intrinsic::{LogicalId, Reference};
use super::sns::{Topic, TopicPolicy};

/// Kind of a declared resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// IAM role
    Role,
    /// SNS topic
    Topic,
    /// SNS topic policy
    TopicPolicy,
    /// Chatbot Slack channel binding
    SlackChannelConfiguration,
    /// Budget
    Budget,
    /// CloudWatch alarm
    Alarm,
}

impl ResourceKind {
    /// CloudFormation resource type
    pub fn type_name(self) -> &'static str {
        match self {
            Self::Role => "AWS::IAM::Role",
            Self::Topic => "AWS::SNS::Topic",
            Self::TopicPolicy => "AWS::SNS::TopicPolicy",
            Self::SlackChannelConfiguration => "AWS::Chatbot::SlackChannelConfiguration",
            Self::Budget => "AWS::Budgets::Budget",
            Self::Alarm => "AWS::CloudWatch::Alarm",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Properties of a resource, tagged with its CloudFormation type
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "Type", content = "Properties")]
pub enum ResourceProperties {
    /// `AWS::IAM::Role`
    #[serde(rename = "AWS::IAM::Role")]
    Role(Role),
    /// `AWS::SNS::Topic`
    #[serde(rename = "AWS::SNS::Topic")]
    Topic(Topic),
    /// `AWS::SNS::TopicPolicy`
    #[serde(rename = "AWS::SNS::TopicPolicy")]
    TopicPolicy(TopicPolicy),
    /// `AWS::Chatbot::SlackChannelConfiguration`
    #[serde(rename = "AWS::Chatbot::SlackChannelConfiguration")]
    SlackChannelConfiguration(SlackChannelConfiguration),
    /// `AWS::Budgets::Budget`
    #[serde(rename = "AWS::Budgets::Budget")]
    Budget(Budget),
    /// `AWS::CloudWatch::Alarm`
    #[serde(rename = "AWS::CloudWatch::Alarm")]
    Alarm(Alarm),
}

impl ResourceProperties {
    /// Kind of the resource
    pub fn kind(&self) -> ResourceKind {
        match self {
            Self::Role(_) => ResourceKind::Role,
            Self::Topic(_) => ResourceKind::Topic,
            Self::TopicPolicy(_) => ResourceKind::TopicPolicy,
            Self::SlackChannelConfiguration(_) => ResourceKind::SlackChannelConfiguration,
            Self::Budget(_) => ResourceKind::Budget,
            Self::Alarm(_) => ResourceKind::Alarm,
        }
    }

    /// Every reference to another declaration
    pub fn references(&self) -> Vec<&Reference> {
        match self {
            Self::Role(role) => std::iter::once(&role.assume_role_policy_document)
                .chain(role.policies.iter().map(|policy| &policy.policy_document))
                .flat_map(document_references)
                .collect(),
            Self::Topic(_) => Vec::new(),
            Self::TopicPolicy(policy) => document_references(&policy.policy_document)
                .chain(&policy.topics)
                .collect(),
            Self::SlackChannelConfiguration(binding) => std::iter::once(&binding.iam_role_arn)
                .chain(&binding.sns_topic_arns)
                .collect(),
            Self::Budget(budget) => budget
                .notifications_with_subscribers
                .iter()
                .flat_map(|rule| &rule.subscribers)
                .map(|subscriber| &subscriber.address)
                .collect(),
            Self::Alarm(alarm) => alarm
                .alarm_actions
                .iter()
                .chain(&alarm.insufficient_data_actions)
                .collect(),
        }
    }
}

fn document_references(document: &PolicyDocument) -> impl Iterator<Item = &Reference> {
    document
        .statement
        .iter()
        .filter_map(|statement| match &statement.resource {
            Some(PolicyResource::Reference(reference)) => Some(reference),
            _ => None,
        })
}

/// A resource declared in a stack
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    /// Id the resource was declared under
    pub construct_id: String,
    /// Id in the synthesized template
    pub logical_id: LogicalId,
    /// Properties
    pub properties: ResourceProperties,
}

impl Resource {
    /// Kind of the resource
    pub fn kind(&self) -> ResourceKind {
        self.properties.kind()
    }
}
