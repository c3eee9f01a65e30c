//! Services whose estimated charges are watched

use std::fmt;

use serde::Serialize;

/// A service reported under the `ServiceName` dimension of `AWS/Billing`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum BilledService {
    /// Amazon EC2
    #[serde(rename = "AmazonEC2")]
    AmazonEc2,
    /// AWS Marketplace
    #[serde(rename = "AWSMarketplace")]
    AwsMarketplace,
    /// Amazon CloudWatch
    #[serde(rename = "AmazonCloudWatch")]
    AmazonCloudWatch,
    /// Amazon SNS
    #[serde(rename = "AmazonSNS")]
    AmazonSns,
    /// Data transfer
    #[serde(rename = "AWSDataTransfer")]
    AwsDataTransfer,
    /// AWS KMS
    #[serde(rename = "awskms")]
    AwsKms,
    /// Amazon S3
    #[serde(rename = "AmazonS3")]
    AmazonS3,
    /// AWS Lambda
    #[serde(rename = "AWSLambda")]
    AwsLambda,
    /// AWS X-Ray
    #[serde(rename = "AWSXRay")]
    AwsXRay,
    /// Amazon API Gateway
    #[serde(rename = "AmazonApiGateway")]
    AmazonApiGateway,
    /// AWS Budgets
    #[serde(rename = "AWSBudgets")]
    AwsBudgets,
}

impl BilledService {
    /// The watch-list, in alarm declaration order
    pub const ALL: [Self; 11] = [
        Self::AmazonEc2,
        Self::AwsMarketplace,
        Self::AmazonCloudWatch,
        Self::AmazonSns,
        Self::AwsDataTransfer,
        Self::AwsKms,
        Self::AmazonS3,
        Self::AwsLambda,
        Self::AwsXRay,
        Self::AmazonApiGateway,
        Self::AwsBudgets,
    ];

    /// Value of the `ServiceName` dimension
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AmazonEc2 => "AmazonEC2",
            Self::AwsMarketplace => "AWSMarketplace",
            Self::AmazonCloudWatch => "AmazonCloudWatch",
            Self::AmazonSns => "AmazonSNS",
            Self::AwsDataTransfer => "AWSDataTransfer",
            Self::AwsKms => "awskms",
            Self::AmazonS3 => "AmazonS3",
            Self::AwsLambda => "AWSLambda",
            Self::AwsXRay => "AWSXRay",
            Self::AmazonApiGateway => "AmazonApiGateway",
            Self::AwsBudgets => "AWSBudgets",
        }
    }
}

impl fmt::Display for BilledService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
