pub mod common;

mod test_session;
