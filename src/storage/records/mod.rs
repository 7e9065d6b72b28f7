pub mod link;
pub mod user;

pub(crate) use link::LinkRecord;
pub(crate) use user::UserRecord;
