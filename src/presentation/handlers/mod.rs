pub(crate) mod auth;
pub(crate) mod posts;
pub(crate) mod users;
pub(crate) mod votes;
