//! Evaluation machinery: dispatch, evaluation, orchestration and dumping.
//!
//! ```text
//! Validator::validate ──► Evaluator::evaluate ──► RuleDispatcher::dispatch ──► RuleHandler
//!                               ▲                                                  │
//!                               └──────────── container rules recurse ◄────────────┘
//! ```

mod dispatch;
mod dumper;
mod evaluator;
mod validator;

pub use dispatch::RuleDispatcher;
pub use dumper::{RulesDumper, UnparametrizedPolicy, dump_rules};
pub use evaluator::Evaluator;
pub use validator::{EmptyCheck, Validator, ValidatorBuilder};
