//! IAM roles and policy documents

use serde::ser::Serializer;
use serde::Serialize;

use super::intrinsic::Reference;

const POLICY_VERSION: &str = "2012-10-17";
const READ_ONLY_VERBS: [&str; 3] = ["Describe", "Get", "List"];

/// Statement effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Effect {
    /// Grant
    Allow,
    /// Explicit deny
    Deny,
}

/// An IAM action such as `cloudwatch:Get*`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Action(String);

impl Action {
    /// Wrap an action string
    pub fn new(action: impl Into<String>) -> Self {
        Self(action.into())
    }

    /// The action as written in the policy
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the verb after the service prefix only inspects state
    pub fn is_read_only(&self) -> bool {
        let Some((service, verb)) = self.0.split_once(':') else {
            return false;
        };
        !service.is_empty() && READ_ONLY_VERBS.iter().any(|prefix| verb.starts_with(prefix))
    }
}

/// Principal of a trust or resource policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Principal {
    /// Service principal such as `chatbot.amazonaws.com`
    #[serde(rename = "Service")]
    pub service: String,
}

impl Principal {
    /// A platform service principal
    pub fn service(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }
}

/// Target of a policy statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PolicyResource {
    /// Literal ARN or wildcard
    Literal(String),
    /// A declared resource
    Reference(Reference),
}

impl PolicyResource {
    /// Every resource
    pub fn any() -> Self {
        Self::Literal("*".to_string())
    }
}

/// A single statement of a policy document
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyStatement {
    /// Statement id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sid: Option<String>,
    /// Effect
    pub effect: Effect,
    /// Principal, for trust and resource policies
    #[serde(skip_serializing_if = "Option::is_none")]
    pub principal: Option<Principal>,
    /// Actions covered by the statement
    #[serde(serialize_with = "one_or_many")]
    pub action: Vec<Action>,
    /// Resources covered by the statement
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<PolicyResource>,
}

impl PolicyStatement {
    /// An allow statement over `actions`
    pub fn allow<I, A>(actions: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        Self {
            sid: None,
            effect: Effect::Allow,
            principal: None,
            action: actions.into_iter().map(Action::new).collect(),
            resource: None,
        }
    }

    /// Set the statement id
    pub fn with_sid(mut self, sid: impl Into<String>) -> Self {
        self.sid = Some(sid.into());
        self
    }

    /// Set the principal
    pub fn with_principal(mut self, principal: Principal) -> Self {
        self.principal = Some(principal);
        self
    }

    /// Set the resource
    pub fn on(mut self, resource: PolicyResource) -> Self {
        self.resource = Some(resource);
        self
    }
}

fn one_or_many<S: Serializer>(actions: &[Action], serializer: S) -> Result<S::Ok, S::Error> {
    match actions {
        [single] => single.serialize(serializer),
        many => many.serialize(serializer),
    }
}

/// A versioned list of statements
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyDocument {
    /// Policy language version
    pub version: &'static str,
    /// Statements
    pub statement: Vec<PolicyStatement>,
}

impl PolicyDocument {
    /// A document holding `statements`
    pub fn new(statements: Vec<PolicyStatement>) -> Self {
        Self {
            version: POLICY_VERSION,
            statement: statements,
        }
    }

    /// Every action of every statement
    pub fn actions(&self) -> impl Iterator<Item = &Action> {
        self.statement.iter().flat_map(|statement| &statement.action)
    }
}

/// Named policy embedded in a role
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct InlinePolicy {
    /// Policy name
    pub policy_name: String,
    /// Policy body
    pub policy_document: PolicyDocument,
}

/// `AWS::IAM::Role`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Role {
    /// Who may assume the role
    pub assume_role_policy_document: PolicyDocument,
    /// Inline permissions
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub policies: Vec<InlinePolicy>,
}

impl Role {
    /// A role only `service` can assume
    pub fn assumed_by(service: impl Into<String>) -> Self {
        let trust =
            PolicyStatement::allow(["sts:AssumeRole"]).with_principal(Principal::service(service));
        Self {
            assume_role_policy_document: PolicyDocument::new(vec![trust]),
            policies: Vec::new(),
        }
    }

    /// Attach an inline policy
    pub fn with_inline_policy(mut self, name: impl Into<String>, document: PolicyDocument) -> Self {
        self.policies.push(InlinePolicy {
            policy_name: name.into(),
            policy_document: document,
        });
        self
    }

    /// Services trusted to assume the role
    pub fn trusted_services(&self) -> impl Iterator<Item = &str> {
        self.assume_role_policy_document
            .statement
            .iter()
            .filter_map(|statement| statement.principal.as_ref())
            .map(|principal| principal.service.as_str())
    }

    /// Every action granted by the inline policies
    pub fn granted_actions(&self) -> impl Iterator<Item = &Action> {
        self.policies
            .iter()
            .flat_map(|policy| policy.policy_document.actions())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_read_only_actions() {
        assert!(Action::new("cloudwatch:Describe*").is_read_only());
        assert!(Action::new("cloudwatch:GetMetricData").is_read_only());
        assert!(Action::new("cloudwatch:List*").is_read_only());
    }

    #[test]
    fn test_mutating_actions_are_not_read_only() {
        assert!(!Action::new("cloudwatch:PutMetricAlarm").is_read_only());
        assert!(!Action::new("cloudwatch:DeleteAlarms").is_read_only());
        assert!(!Action::new("cloudwatch:*").is_read_only());
        assert!(!Action::new("*").is_read_only());
        assert!(!Action::new(":Get*").is_read_only());
    }

    #[test]
    fn test_single_action_serializes_as_string() {
        let statement = PolicyStatement::allow(["SNS:Publish"]).on(PolicyResource::any());
        assert_eq!(
            serde_json::to_value(statement).unwrap(),
            json!({ "Effect": "Allow", "Action": "SNS:Publish", "Resource": "*" })
        );
    }

    #[test]
    fn test_role_serialization() {
        let role = Role::assumed_by("chatbot.amazonaws.com").with_inline_policy(
            "ReadOnly",
            PolicyDocument::new(vec![PolicyStatement::allow([
                "cloudwatch:Get*",
                "cloudwatch:List*",
            ])
            .on(PolicyResource::any())]),
        );

        assert_eq!(
            serde_json::to_value(&role).unwrap(),
            json!({
                "AssumeRolePolicyDocument": {
                    "Version": "2012-10-17",
                    "Statement": [{
                        "Effect": "Allow",
                        "Principal": { "Service": "chatbot.amazonaws.com" },
                        "Action": "sts:AssumeRole"
                    }]
                },
                "Policies": [{
                    "PolicyName": "ReadOnly",
                    "PolicyDocument": {
                        "Version": "2012-10-17",
                        "Statement": [{
                            "Effect": "Allow",
                            "Action": ["cloudwatch:Get*", "cloudwatch:List*"],
                            "Resource": "*"
                        }]
                    }
                }]
            })
        );
        assert_eq!(role.trusted_services().collect::<Vec<_>>(), ["chatbot.amazonaws.com"]);
        assert_eq!(role.granted_actions().count(), 2);
    }
}
