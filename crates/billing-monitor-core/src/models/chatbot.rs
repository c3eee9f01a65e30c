//! AWS Chatbot channel bindings

use serde::Serialize;

use super::intrinsic::Reference;

/// `AWS::Chatbot::SlackChannelConfiguration`
///
/// Binds topics to a Slack channel. The workspace must already be authorised
/// in the Chatbot console; nothing here checks that the ids exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SlackChannelConfiguration {
    /// Configuration name shown in the Chatbot console
    pub configuration_name: String,
    /// Role the integration assumes
    pub iam_role_arn: Reference,
    /// Slack channel id
    pub slack_channel_id: String,
    /// Slack workspace id
    pub slack_workspace_id: String,
    /// Topics relayed to the channel
    pub sns_topic_arns: Vec<Reference>,
}
