mod actor;
mod target;
mod transition;
mod vote;
mod votes_count;

pub use actor::{Actor, UserId};
pub use target::{ObjectId, Target, TargetRef};
pub use transition::TransitionKind;
pub use vote::{ParseVoteValueError, Vote, VoteValue};
pub use votes_count::VotesCount;
