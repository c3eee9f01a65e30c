//! SNS topics and topic policies

use serde::Serialize;

use super::iam::PolicyDocument;
use super::intrinsic::Reference;

/// `AWS::SNS::Topic` with no initial subscriptions
///
/// The topic name is left to the orchestrator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Topic {}

/// `AWS::SNS::TopicPolicy`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TopicPolicy {
    /// Resource policy applied to the topics
    pub policy_document: PolicyDocument,
    /// Topics the policy applies to
    pub topics: Vec<Reference>,
}
