//! Typed resource declarations and their CloudFormation shape

mod budgets;
mod chatbot;
mod cloudwatch;
mod iam;
mod intrinsic;
mod resource;
mod sns;

pub use budgets::*;
pub use chatbot::*;
pub use cloudwatch::*;
pub use iam::*;
pub use intrinsic::*;
pub use resource::*;
pub use sns::*;
