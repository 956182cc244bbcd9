mod user;

pub use user::{
    NewUser, ProfileChanges, UserCreateOutcome, UserRecord, ROLE_ADMIN, ROLE_USER,
};
